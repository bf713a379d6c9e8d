//! Rendering of decoded API results.
//!
//! Lists of networks and members have a compact table form; everything else,
//! and every list in verbose mode, is dumped in the selected text format.

use crate::models::{JsonMap, MemberInfo, NetworkInfo};
use crate::Result;
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use std::io::Write;
use ztctl_core::{dumps, render_table, Cell};

/// Line printed instead of an empty table.
pub const EMPTY_PLACEHOLDER: &str = "<empty>";

/// How results are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// Dump every list element instead of a summary table.
    pub verbose: bool,
    /// Format name handed to [`dumps`].
    pub format: String,
}

impl ViewOptions {
    /// Table view with the given dump format.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            verbose: false,
            format: format.into(),
        }
    }

    /// Toggle verbose mode.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Decoded result handed from an operation to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Network listing.
    Networks(Vec<NetworkInfo>),
    /// Member listing.
    Members(Vec<MemberInfo>),
    /// A single network.
    Network(NetworkInfo),
    /// A single member.
    Member(MemberInfo),
    /// Response without a modeled shape.
    Raw(JsonMap),
}

impl Envelope {
    /// Render to `out` using the current time for relative columns.
    ///
    /// # Errors
    ///
    /// [`ztctl_core::Error::RenderError`] when a value cannot be dumped and
    /// [`ztctl_core::Error::Io`] when `out` fails.
    pub fn render<W>(&self, view: &ViewOptions, out: &mut W) -> Result<()>
    where
        W: Write + ?Sized,
    {
        self.render_at(view, Utc::now(), out)
    }

    /// Render to `out` with an explicit reference time.
    ///
    /// # Errors
    ///
    /// See [`Envelope::render`].
    pub fn render_at<W>(&self, view: &ViewOptions, now: DateTime<Utc>, out: &mut W) -> Result<()>
    where
        W: Write + ?Sized,
    {
        match self {
            Self::Networks(networks) => render_list(networks, view, now, out),
            Self::Members(members) => render_list(members, view, now, out),
            Self::Network(network) => render_value(network, view, out),
            Self::Member(member) => render_value(member, view, out),
            Self::Raw(map) => render_value(map, view, out),
        }
    }
}

/// Resources with a summary row.
pub trait Tabular: Serialize {
    /// Column names, in row order.
    const HEADER: &'static [&'static str];
    /// Word used in verbose separator lines.
    const LABEL: &'static str;

    /// Identifier shown in verbose separator lines.
    fn key(&self) -> &str;

    /// Summary row with one cell per [`Tabular::HEADER`] column.
    fn row(&self, now: DateTime<Utc>) -> Vec<Cell>;
}

impl Tabular for NetworkInfo {
    const HEADER: &'static [&'static str] =
        &["NID", "Name", "Route", "Private", "O/T/A", "CreationTime"];
    const LABEL: &'static str = "net";

    fn key(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    fn row(&self, _now: DateTime<Utc>) -> Vec<Cell> {
        let config = self.config.clone().unwrap_or_default();
        let route = config
            .routes
            .as_deref()
            .and_then(<[_]>::first)
            .map_or_else(|| "-".to_string(), |r| r.target.clone().unwrap_or_default());
        let ota = format!(
            "{}/{}/{}",
            self.online_member_count.unwrap_or_default(),
            self.total_member_count.unwrap_or_default(),
            self.authorized_member_count.unwrap_or_default()
        );

        vec![
            Cell::from(self.key()),
            Cell::from(config.name.unwrap_or_default()),
            Cell::from(route),
            Cell::from(config.private.unwrap_or_default()),
            Cell::from(ota),
            Cell::from(local_rfc3339(config.creation_time.unwrap_or_default())),
        ]
    }
}

impl Tabular for MemberInfo {
    const HEADER: &'static [&'static str] = &[
        "MID",
        "Name",
        "IP_assign",
        "IP_physical",
        "Version",
        "LastOnline",
        "Auth",
        "Hidden",
    ];
    const LABEL: &'static str = "netm";

    fn key(&self) -> &str {
        self.node_id.as_deref().unwrap_or_default()
    }

    fn row(&self, now: DateTime<Utc>) -> Vec<Cell> {
        let config = self.config.clone().unwrap_or_default();
        let ip = config
            .ip_assignments
            .as_deref()
            .and_then(<[_]>::first)
            .map_or_else(|| "-".to_string(), Clone::clone);

        vec![
            Cell::from(self.key()),
            Cell::from(self.name.clone().unwrap_or_default()),
            Cell::from(ip),
            Cell::from(self.physical_address.clone().unwrap_or_default()),
            Cell::from(self.client_version.clone().unwrap_or_default()),
            Cell::from(elapsed_since(self.last_online.unwrap_or_default(), now)),
            Cell::from(config.authorized.unwrap_or_default()),
            Cell::from(self.hidden.unwrap_or_default()),
        ]
    }
}

fn render_list<T, W>(items: &[T], view: &ViewOptions, now: DateTime<Utc>, out: &mut W) -> Result<()>
where
    T: Tabular,
    W: Write + ?Sized,
{
    if items.is_empty() {
        writeln!(out, "{EMPTY_PLACEHOLDER}")?;
        return Ok(());
    }

    if view.verbose {
        for (idx, item) in items.iter().enumerate() {
            writeln!(out, "-- {} {idx}: {}", T::LABEL, item.key())?;
            writeln!(out, "{}", dumps(item, &view.format)?)?;
        }
        return Ok(());
    }

    let mut rows = Vec::with_capacity(items.len() + 1);
    rows.push(T::HEADER.iter().map(|name| Cell::from(*name)).collect());
    rows.extend(items.iter().map(|item| item.row(now)));
    out.write_all(render_table(&rows).as_bytes())?;
    Ok(())
}

fn render_value<T, W>(value: &T, view: &ViewOptions, out: &mut W) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "{}", dumps(value, &view.format)?)?;
    Ok(())
}

/// Millisecond epoch as an RFC 3339 timestamp in the local time zone.
#[must_use]
pub fn local_rfc3339(epoch_ms: i64) -> String {
    Local
        .timestamp_opt(epoch_ms / 1000, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Whole seconds elapsed between a millisecond epoch and `now`, formatted
/// like `1h2m3s`.
#[must_use]
pub fn elapsed_since(epoch_ms: i64, now: DateTime<Utc>) -> String {
    let seconds = DateTime::<Utc>::from_timestamp(epoch_ms / 1000, 0)
        .map_or(0, |then| now.signed_duration_since(then).num_seconds());
    format_seconds(seconds)
}

/// `0s`, `45s`, `2m5s`, `1h0m5s`; negative values get a leading `-`.
#[must_use]
pub fn format_seconds(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (hours, minutes, secs) = (total / 3600, total / 60 % 60, total % 60);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{secs}s")
    } else {
        format!("{sign}{secs}s")
    }
}

//! Structured text encodings for displaying API values.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::util::contains;

/// Format names accepted by [`dumps`].
pub const FORMATS: [&str; 3] = ["toml", "yaml", "json"];

/// Encode `value` in the format named by `format`.
///
/// Supported names are `toml`, `yaml` and `json` (indented with tabs). Any
/// other name yields an empty string; callers validate the name upstream.
/// TOML has no null, so `null` entries are left out of TOML output.
///
/// # Errors
///
/// Returns [`Error::RenderError`] when the value cannot be represented in the
/// requested format (for example a bare scalar as a TOML document).
pub fn dumps<T>(value: &T, format: &str) -> Result<String>
where
    T: Serialize + ?Sized,
{
    if !contains(&FORMATS, &format) {
        debug!(format, "unknown output format");
        return Ok(String::new());
    }

    let encoded = match format {
        "toml" => to_toml(value)?,
        "yaml" => serde_yaml::to_string(value).map_err(|err| render_error(format, err))?,
        _ => to_tab_indented_json(value)?,
    };
    Ok(encoded)
}

fn to_toml<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let mut tree = serde_json::to_value(value).map_err(|err| render_error("toml", err))?;
    strip_nulls(&mut tree);
    toml::to_string(&tree).map_err(|err| render_error("toml", err))
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, item| !item.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => {
            items.retain(|item| !item.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

fn to_tab_indented_json<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| render_error("json", err))?;
    String::from_utf8(buf).map_err(|err| render_error("json", err))
}

fn render_error(format: &str, err: impl std::fmt::Display) -> Error {
    Error::RenderError(format!("{format}: {err}"))
}

//! CLI argument definitions using clap

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use ztctl_api::models::{
    IpAssignmentPool, MemberPost, MemberPostConfig, NetworkPost, NetworkPostConfig, Route,
    V4AssignMode, V6AssignMode,
};
use ztctl_core::config::ZeroTierConfig;
use ztctl_core::format::FORMATS;

/// Manage ZeroTier Central networks and members
#[derive(Parser, Debug)]
#[command(name = "ztctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: <config dir>/ztctl/config.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "yaml", value_parser = FORMATS)]
    pub format: String,

    /// Dump every element instead of a table
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging; repeat for more (-d -d -d)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// API base URL
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub url: Option<String>,

    /// API token
    #[arg(long, global = true, env = "ZTCTL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Account ID
    #[arg(long, global = true)]
    pub uid: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Layer command-line values over the file configuration.
    pub fn apply_overrides(&self, mut config: ZeroTierConfig) -> ZeroTierConfig {
        if let Some(url) = &self.url {
            config = config.with_url(url);
        }
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(uid) = &self.uid {
            config = config.with_uid(uid);
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the effective configuration
    Info,

    /// Dump the user record (own account unless --uid is given)
    User,

    /// Manage networks
    Net {
        #[command(subcommand)]
        command: NetCommands,
    },

    /// Manage network members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum NetCommands {
    /// List networks
    List,

    /// Create a network and apply settings
    Create(NetworkArgs),

    /// Change network settings
    Set {
        /// Network ID
        nid: String,
        #[command(flatten)]
        settings: NetworkArgs,
    },

    /// Delete a network
    Del {
        /// Network ID
        nid: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// List members of a network, or of every network
    List {
        /// Network ID
        nid: Option<String>,
    },

    /// Change member settings
    Set {
        /// Network ID
        nid: String,
        /// Member (node) ID
        mid: String,
        #[command(flatten)]
        settings: MemberArgs,
    },

    /// Remove a member from a network
    Del {
        /// Network ID
        nid: String,
        /// Member (node) ID
        mid: String,
    },
}

/// Settable network fields
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct NetworkArgs {
    /// Network name
    #[arg(long)]
    pub name: Option<String>,

    /// Network description
    #[arg(long)]
    pub description: Option<String>,

    /// Require member authorization
    #[arg(long)]
    pub private: Option<bool>,

    /// Allow broadcast (ff:ff:ff:ff:ff:ff)
    #[arg(long)]
    pub broadcast: Option<bool>,

    /// Maximum recipients of a multicast packet
    #[arg(long)]
    pub multicast_limit: Option<u32>,

    /// Network MTU
    #[arg(long)]
    pub mtu: Option<u32>,

    /// Managed route, repeatable
    #[arg(long = "route", value_name = "TARGET[@VIA]", value_parser = parse_route)]
    pub routes: Vec<Route>,

    /// IPv4 auto-assign range, repeatable
    #[arg(long = "pool", value_name = "START-END", value_parser = parse_pool)]
    pub pools: Vec<IpAssignmentPool>,

    /// Auto-assign IPv4 addresses from the pools
    #[arg(long = "v4-zt")]
    pub v4_zt: Option<bool>,

    /// Assign 6PLANE IPv6 addresses
    #[arg(long = "v6-6plane")]
    pub v6_six_plane: Option<bool>,

    /// Assign RFC4193 IPv6 addresses
    #[arg(long = "v6-rfc4193")]
    pub v6_rfc4193: Option<bool>,

    /// Auto-assign IPv6 addresses from the pools
    #[arg(long = "v6-zt")]
    pub v6_zt: Option<bool>,
}

impl NetworkArgs {
    /// Request body carrying only the fields that were given.
    pub fn to_post(&self) -> NetworkPost {
        let v6_given = self.v6_six_plane.is_some() || self.v6_rfc4193.is_some() || self.v6_zt.is_some();
        let config = NetworkPostConfig {
            name: self.name.clone(),
            private: self.private,
            enable_broadcast: self.broadcast,
            multicast_limit: self.multicast_limit,
            mtu: self.mtu,
            routes: non_empty(&self.routes),
            ip_assignment_pools: non_empty(&self.pools),
            v4_assign_mode: self.v4_zt.map(|zt| V4AssignMode { zt: Some(zt) }),
            v6_assign_mode: v6_given.then(|| V6AssignMode {
                six_plane: self.v6_six_plane,
                rfc4193: self.v6_rfc4193,
                zt: self.v6_zt,
            }),
        };

        NetworkPost {
            description: self.description.clone(),
            config: (config != NetworkPostConfig::default()).then_some(config),
        }
    }
}

/// Settable member fields
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct MemberArgs {
    /// Member name
    #[arg(long)]
    pub name: Option<String>,

    /// Member description
    #[arg(long)]
    pub description: Option<String>,

    /// Hide the member in listings on the web console
    #[arg(long)]
    pub hidden: Option<bool>,

    /// Authorize the member on a private network
    #[arg(long)]
    pub authorized: Option<bool>,

    /// Allow the member to bridge other Ethernet devices
    #[arg(long)]
    pub active_bridge: Option<bool>,

    /// Do not auto-assign addresses to this member
    #[arg(long)]
    pub no_auto_assign_ips: Option<bool>,

    /// Managed IP address, repeatable
    #[arg(long = "ip", value_name = "IP")]
    pub ips: Vec<IpAddr>,
}

impl MemberArgs {
    /// Request body carrying only the fields that were given.
    pub fn to_post(&self) -> MemberPost {
        let ips: Vec<String> = self.ips.iter().map(ToString::to_string).collect();
        let config = MemberPostConfig {
            authorized: self.authorized,
            active_bridge: self.active_bridge,
            no_auto_assign_ips: self.no_auto_assign_ips,
            ip_assignments: non_empty(&ips),
        };

        MemberPost {
            name: self.name.clone(),
            description: self.description.clone(),
            hidden: self.hidden,
            config: (config != MemberPostConfig::default()).then_some(config),
        }
    }
}

fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    (!items.is_empty()).then(|| items.to_vec())
}

/// Parse `TARGET` or `TARGET@VIA`.
fn parse_route(s: &str) -> Result<Route, String> {
    let (target, via) = match s.split_once('@') {
        Some((target, via)) => (target, Some(via)),
        None => (s, None),
    };
    if target.is_empty() {
        return Err("route target is empty".to_string());
    }
    if via.is_some_and(str::is_empty) {
        return Err("route gateway after '@' is empty".to_string());
    }

    Ok(Route {
        target: Some(target.to_string()),
        via: via.map(str::to_string),
    })
}

/// Parse `START-END`.
fn parse_pool(s: &str) -> Result<IpAssignmentPool, String> {
    match s.split_once('-') {
        Some((start, end)) if !start.is_empty() && !end.is_empty() => Ok(IpAssignmentPool {
            ip_range_start: Some(start.to_string()),
            ip_range_end: Some(end.to_string()),
        }),
        _ => Err(format!("expected START-END, got `{s}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ztctl").chain(args.iter().copied()))
            .unwrap_or_else(|e| panic!("failed to parse {args:?}: {e}"))
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["net", "list"]);
        assert_eq!(cli.format, "yaml");
        assert!(!cli.verbose);
        assert_eq!(cli.debug, 0);
        assert!(matches!(
            cli.command,
            Commands::Net {
                command: NetCommands::List
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["member", "list", "-v", "-f", "json", "-dd"]);
        assert!(cli.verbose);
        assert_eq!(cli.format, "json");
        assert_eq!(cli.debug, 2);
        match cli.command {
            Commands::Member {
                command: MemberCommands::List { nid },
            } => assert!(nid.is_none()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        let res = Cli::try_parse_from(["ztctl", "-f", "xml", "net", "list"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_user_uid() {
        let cli = parse(&["user", "--uid", "u-1"]);
        assert!(matches!(cli.command, Commands::User));
        assert_eq!(cli.uid.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_network_settings() {
        let cli = parse(&[
            "net",
            "set",
            "8056c2e21c000001",
            "--name",
            "office",
            "--private",
            "true",
            "--route",
            "10.144.0.0/24",
            "--route",
            "0.0.0.0/0@10.144.0.1",
            "--pool",
            "10.144.0.1-10.144.0.254",
            "--v6-rfc4193",
            "true",
        ]);
        let Commands::Net {
            command: NetCommands::Set { nid, settings },
        } = cli.command
        else {
            panic!("expected net set");
        };
        assert_eq!(nid, "8056c2e21c000001");

        let post = settings.to_post();
        assert!(post.description.is_none());
        let config = post.config.unwrap();
        assert_eq!(config.name.as_deref(), Some("office"));
        assert_eq!(config.private, Some(true));
        assert!(config.enable_broadcast.is_none());

        let routes = config.routes.unwrap();
        assert_eq!(routes.len(), 2);
        assert!(routes[0].via.is_none());
        assert_eq!(routes[1].via.as_deref(), Some("10.144.0.1"));

        let pools = config.ip_assignment_pools.unwrap();
        assert_eq!(pools[0].ip_range_end.as_deref(), Some("10.144.0.254"));

        assert!(config.v4_assign_mode.is_none());
        let v6 = config.v6_assign_mode.unwrap();
        assert_eq!(v6.rfc4193, Some(true));
        assert!(v6.six_plane.is_none());
    }

    #[test]
    fn test_empty_network_settings_post_nothing() {
        let post = NetworkArgs::default().to_post();
        assert_eq!(post, NetworkPost::default());
    }

    #[test]
    fn test_member_settings() {
        let cli = parse(&[
            "member",
            "set",
            "n1",
            "a1b2c3d4e5",
            "--authorized",
            "true",
            "--ip",
            "10.144.0.12",
            "--ip",
            "fd00::1",
        ]);
        let Commands::Member {
            command: MemberCommands::Set { nid, mid, settings },
        } = cli.command
        else {
            panic!("expected member set");
        };
        assert_eq!((nid.as_str(), mid.as_str()), ("n1", "a1b2c3d4e5"));

        let post = settings.to_post();
        assert!(post.name.is_none());
        let config = post.config.unwrap();
        assert_eq!(config.authorized, Some(true));
        assert_eq!(
            config.ip_assignments,
            Some(vec!["10.144.0.12".to_string(), "fd00::1".to_string()])
        );
    }

    #[test]
    fn test_member_rejects_bad_ip() {
        let res = Cli::try_parse_from(["ztctl", "member", "set", "n1", "m1", "--ip", "nope"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_bool_flags_take_values() {
        let res = Cli::try_parse_from(["ztctl", "member", "set", "n1", "m1", "--hidden", "maybe"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_route() {
        assert_eq!(
            parse_route("10.0.0.0/8").unwrap(),
            Route {
                target: Some("10.0.0.0/8".into()),
                via: None
            }
        );
        assert!(parse_route("@10.0.0.1").is_err());
        assert!(parse_route("10.0.0.0/8@").is_err());
    }

    #[test]
    fn test_parse_pool() {
        assert!(parse_pool("10.0.0.1").is_err());
        assert!(parse_pool("10.0.0.1-").is_err());
        let pool = parse_pool("10.0.0.1-10.0.0.9").unwrap();
        assert_eq!(pool.ip_range_start.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&["--url", "http://localhost:9993/api", "--timeout", "5", "info"]);
        let config = cli.apply_overrides(ZeroTierConfig::default());
        assert_eq!(config.url, "http://localhost:9993/api");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.uid.is_none());
    }
}

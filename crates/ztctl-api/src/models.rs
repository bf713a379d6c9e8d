//! ZeroTier Central data models for networks and members.
//!
//! Every field is optional: the service omits empty fields and treats absent
//! fields on a POST as "leave unchanged", so `None` must never be sent as a
//! zero value.

use serde::{Deserialize, Serialize};

/// Untyped JSON object, used for responses that are not modeled.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Managed route pushed to network members.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Destination in CIDR notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Gateway address; absent for LAN routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

/// Range of addresses the controller assigns from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpAssignmentPool {
    /// First address of the range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range_start: Option<String>,
    /// Last address of the range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range_end: Option<String>,
}

/// IPv4 auto-assignment mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct V4AssignMode {
    /// Assign from the IP pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zt: Option<bool>,
}

/// IPv6 auto-assignment modes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct V6AssignMode {
    /// 6PLANE addressing.
    #[serde(rename = "6plane", default, skip_serializing_if = "Option::is_none")]
    pub six_plane: Option<bool>,
    /// RFC4193 addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfc4193: Option<bool>,
    /// Assign from the IP pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zt: Option<bool>,
}

/// DNS settings pushed to members.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dns {
    /// Search domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Resolver addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<String>>,
}

/// Settable network configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPostConfig {
    /// Network name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether members need authorization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Ethernet broadcast flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_broadcast: Option<bool>,
    /// Maximum multicast recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_limit: Option<u32>,
    /// MTU value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Managed routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
    /// Auto-assignment pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_assignment_pools: Option<Vec<IpAssignmentPool>>,
    /// IPv4 assignment mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v4_assign_mode: Option<V4AssignMode>,
    /// IPv6 assignment modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v6_assign_mode: Option<V6AssignMode>,
}

/// Request payload to create or update a network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPost {
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Network configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<NetworkPostConfig>,
}

/// Network configuration as returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Network name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether members need authorization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Ethernet broadcast flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_broadcast: Option<bool>,
    /// Maximum multicast recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_limit: Option<u32>,
    /// MTU value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Creation time, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    /// Last modification time, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
    /// DNS settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<Dns>,
    /// Auto-assignment pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_assignment_pools: Option<Vec<IpAssignmentPool>>,
    /// Managed routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
    /// IPv4 assignment mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v4_assign_mode: Option<V4AssignMode>,
    /// IPv6 assignment modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v6_assign_mode: Option<V6AssignMode>,
}

/// Network representation returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// 16 hex digit network ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Network configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<NetworkConfig>,
    /// Owning account ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Members currently online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_member_count: Option<u32>,
    /// Authorized members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_member_count: Option<u32>,
    /// All members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_member_count: Option<u32>,
}

/// Settable member configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberPostConfig {
    /// Authorization flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
    /// Bridging flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_bridge: Option<bool>,
    /// Opt out of pool auto-assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_auto_assign_ips: Option<bool>,
    /// Static addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_assignments: Option<Vec<String>>,
}

/// Request payload to update a network member.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberPost {
    /// Member name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hide the member from listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Member configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<MemberPostConfig>,
}

/// Member configuration as returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberConfig {
    /// Bridging flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_bridge: Option<bool>,
    /// Authorization flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
    /// Opt out of pool auto-assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_auto_assign_ips: Option<bool>,
    /// Assigned addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_assignments: Option<Vec<String>>,
    /// Join time, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    /// Last authorization, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_authorized_time: Option<i64>,
    /// Last deauthorization, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deauthorized_time: Option<i64>,
}

/// Network member representation returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    /// Member name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Network the member belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    /// 10 hex digit node ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    /// Hidden flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Last known physical address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_address: Option<String>,
    /// Client version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,
    /// Protocol version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<i64>,
    /// Controller clock, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<i64>,
    /// Last time the member was seen, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_online: Option<i64>,
    /// Member configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<MemberConfig>,
}

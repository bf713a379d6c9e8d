//! Owner lookup through a transient network.
//!
//! ZeroTier Central does not expose the caller's user id directly. Creating a
//! network reveals it in `ownerId`, so the probe creates one and then deletes
//! it again.

use crate::client::ZeroTierApi;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of deleting the transient network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProbeRelease {
    /// No network id came back, so nothing was deleted.
    #[default]
    NotAttempted,
    /// The transient network was deleted.
    Released,
    /// The delete failed; the network may still exist.
    Failed(String),
}

/// Result of [`resolve_owner_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerProbe {
    /// `ownerId` of the transient network.
    pub owner_id: Option<String>,
    /// Id of the transient network, when one was created.
    pub transient_network: Option<String>,
    /// What happened to the transient network.
    pub release: ProbeRelease,
}

/// Create a throwaway network to read its `ownerId`, then delete it.
///
/// Failures never propagate: a failed create yields no owner and no delete,
/// and a failed delete is recorded in [`OwnerProbe::release`].
pub async fn resolve_owner_id<A>(api: &A) -> OwnerProbe
where
    A: ZeroTierApi + ?Sized,
{
    let mut probe = OwnerProbe::default();

    let created = match api.create_network().await {
        Ok(exchange) if exchange.is_ok() => exchange.into_data(),
        Ok(exchange) => {
            warn!(status = %exchange.status, "owner probe: create rejected");
            None
        }
        Err(err) => {
            warn!(error = %err, "owner probe: create failed");
            None
        }
    };
    let Some(network) = created else {
        return probe;
    };

    probe.owner_id = network
        .get("ownerId")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let Some(nid) = network.get("id").and_then(Value::as_str) else {
        warn!("owner probe: created network has no id");
        return probe;
    };
    probe.transient_network = Some(nid.to_owned());

    probe.release = match api.delete_network(nid).await {
        Ok(exchange) if exchange.is_ok() => {
            debug!(nid, "owner probe: transient network deleted");
            ProbeRelease::Released
        }
        Ok(exchange) => ProbeRelease::Failed(exchange.status_line()),
        Err(err) => ProbeRelease::Failed(err.to_string()),
    };
    if let ProbeRelease::Failed(reason) = &probe.release {
        warn!(nid, reason = %reason, "owner probe: transient network left behind");
    }

    probe
}

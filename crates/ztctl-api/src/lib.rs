//! ZeroTier Central client, resource operations and result rendering.
//!
//! [`ZtClient`] performs the HTTP exchanges, [`Operations`] composes them into
//! user-facing commands and [`Envelope`] renders their results as tables or
//! serialized documents.

#![deny(missing_docs)]

pub mod client;
pub mod display;
pub mod models;
pub mod ops;
pub mod probe;

pub use client::{Exchange, ZeroTierApi, ZtClient, ZtClientBuilder};
pub use display::{Envelope, Tabular, ViewOptions};
pub use models::{
    JsonMap, MemberInfo, MemberPost, MemberPostConfig, NetworkInfo, NetworkPost,
    NetworkPostConfig,
};
pub use ops::Operations;
pub use probe::{resolve_owner_id, OwnerProbe, ProbeRelease};

/// Convenient result alias sharing the `ztctl-core` error type.
pub type Result<T> = ztctl_core::Result<T>;

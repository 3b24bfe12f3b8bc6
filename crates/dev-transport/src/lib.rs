//! devnet-rs transport
//!
//! Device-configuration collaborators: the [`InterfaceConfigClient`] trait the
//! reconfiguration procedure is written against, plus two implementations —
//! RESTCONF for IOS-XE and NX-API for NX-OS. Session establishment, encoding
//! and authentication live here; the procedure only sees typed snapshots.

pub mod client;
pub mod nxapi;
pub mod restconf;

pub use client::{InterfaceConfigClient, InterfaceState, RawInterfaceConfig, TransportError};
pub use nxapi::NxapiClient;
pub use restconf::RestconfClient;

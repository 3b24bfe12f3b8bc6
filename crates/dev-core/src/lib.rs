//! devnet-rs core
//!
//! Core types shared by the transport clients and the reconfiguration
//! procedure: interface identifiers, configuration snapshots and the
//! validation helpers callers run before mutating a device.

pub mod error;
pub mod types;
pub mod validate;

pub use error::ValidationError;
pub use types::{AdminState, InterfaceId, InterfaceSnapshot};
pub use validate::validate_desired;

//! Error types for core operations

use thiserror::Error;

/// Desired-state validation errors
///
/// The reconfiguration procedure trusts its inputs; these are raised by the
/// caller-side checks in [`crate::validate`] before any device session exists.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Description must not be empty")]
    EmptyDescription,

    #[error("Invalid IP address: {value}")]
    InvalidIpAddress { value: String },

    #[error("Invalid subnet mask: {value}")]
    InvalidSubnetMask { value: String },

    #[error("Invalid interface identifier: {value}")]
    InvalidInterfaceId { value: String },
}

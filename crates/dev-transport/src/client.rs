//! Device configuration client trait and wire-independent representations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use devnet_core::{AdminState, InterfaceId, InterfaceSnapshot};

/// Transport and protocol errors raised by device collaborators
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Device returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Device rejected command: {message}")]
    DeviceError { message: String },

    #[error("Response parsing failed: {0}")]
    Decode(String),

    #[error("Authentication failed")]
    Authentication,

    #[error("Interface not found: {interface}")]
    InterfaceNotFound { interface: String },
}

/// Loosely-typed interface configuration as fetched from a device
///
/// Fields the device did not report stay `None`; [`RawInterfaceConfig::snapshot`]
/// resolves them to empty strings so downstream comparison logic never deals
/// with absence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInterfaceConfig {
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub admin_state: Option<AdminState>,
}

impl RawInterfaceConfig {
    /// Collapse into a snapshot, defaulting missing fields to empty strings
    pub fn snapshot(&self) -> InterfaceSnapshot {
        InterfaceSnapshot {
            description: self.description.clone().unwrap_or_default(),
            ip_address: self.ip_address.clone().unwrap_or_default(),
            subnet_mask: self.subnet_mask.clone().unwrap_or_default(),
        }
    }
}

/// Operational state of one interface, as shown by the `status` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceState {
    pub name: String,
    pub description: String,
    pub admin_status: String,
    pub oper_status: String,
}

/// Normalize a device-reported status string to `up` / `down`, falling back
/// to the raw value, or `N/A` when the device reported nothing.
pub(crate) fn normalize_status(raw: Option<&str>) -> String {
    match raw {
        None => "N/A".to_string(),
        Some(raw) if raw.is_empty() => "N/A".to_string(),
        Some(raw) => {
            let lower = raw.to_lowercase();
            if lower.contains("ready") || lower.contains("up") {
                "up".to_string()
            } else if lower.contains("no-pass") || lower.contains("down") {
                "down".to_string()
            } else {
                raw.to_string()
            }
        }
    }
}

/// Read/write access to one device's interface configuration
///
/// `set_admin_state` carries the administrative-state-only payload;
/// `apply_config` carries the full field set. The reconfiguration procedure
/// issues shut, modify, un-shut and rollback through these two calls.
#[async_trait]
pub trait InterfaceConfigClient: Send + Sync {
    /// Fetch the current configuration of `id`
    async fn fetch_interface(
        &self,
        id: &InterfaceId,
    ) -> Result<RawInterfaceConfig, TransportError>;

    /// Administratively shut or un-shut `id`
    async fn set_admin_state(
        &self,
        id: &InterfaceId,
        state: AdminState,
    ) -> Result<(), TransportError>;

    /// Apply description, IP address and subnet mask to `id`
    async fn apply_config(
        &self,
        id: &InterfaceId,
        fields: &InterfaceSnapshot,
    ) -> Result<(), TransportError>;
}

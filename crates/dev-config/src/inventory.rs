//! Device inventory parsing and lookup

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default HTTPS management port
const DEFAULT_PORT: u16 = 443;

/// Default per-request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Inventory loading and lookup errors
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to read inventory file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse inventory file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Unknown device: {name}")]
    UnknownDevice { name: String },
}

/// Connection parameters for one managed device
///
/// Credentials are treated as opaque; `verify_tls` defaults to off to match
/// the self-signed certificates of lab devices.
#[derive(Clone, Serialize, Deserialize)]
pub struct Device {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// Keeps the password out of log output
impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Device {
    /// Apply `DEVNET_HOST` / `DEVNET_PORT` / `DEVNET_USERNAME` /
    /// `DEVNET_PASSWORD` overrides on top of an inventory entry.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = env::var("DEVNET_HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("DEVNET_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(username) = env::var("DEVNET_USERNAME") {
            self.username = username;
        }
        if let Ok(password) = env::var("DEVNET_PASSWORD") {
            self.password = password;
        }
        self
    }
}

/// Named device inventory loaded from a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceInventory {
    devices: HashMap<String, Device>,
}

impl DeviceInventory {
    /// Load an inventory from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let inventory: DeviceInventory =
            serde_json::from_str(&content).map_err(|source| InventoryError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        debug!(
            "Loaded {} device(s) from {}",
            inventory.devices.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Look up a device by name, with environment overrides applied
    pub fn get(&self, name: &str) -> Result<Device, InventoryError> {
        self.devices
            .get(name)
            .cloned()
            .map(Device::with_env_overrides)
            .ok_or_else(|| InventoryError::UnknownDevice {
                name: name.to_string(),
            })
    }

    /// Names of all inventoried devices
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.devices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

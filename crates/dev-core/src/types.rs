//! Core interface types and snapshots

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Device-scoped interface identifier
///
/// Carries whatever form the device uses to name the interface: a bare slot
/// number on IOS-XE RESTCONF (`"2"` for GigabitEthernet2) or a slot/port name
/// on NX-OS (`"eth1/2"`). Immutable for the duration of one procedure run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceId(String);

impl InterfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InterfaceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidInterfaceId {
                value: s.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Administrative state of an interface, independent of operational link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    Up,
    Down,
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminState::Up => f.write_str("up"),
            AdminState::Down => f.write_str("down"),
        }
    }
}

/// Point-in-time capture of the procedure-relevant interface fields
///
/// Three instances exist per invocation: the parsed current state, the desired
/// state supplied by the caller, and (when a change is required) the captured
/// original kept verbatim for rollback. Fields missing on the device parse to
/// empty strings, so comparisons never have to handle absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSnapshot {
    pub description: String,
    pub ip_address: String,
    pub subnet_mask: String,
}

impl InterfaceSnapshot {
    pub fn new(
        description: impl Into<String>,
        ip_address: impl Into<String>,
        subnet_mask: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            ip_address: ip_address.into(),
            subnet_mask: subnet_mask.into(),
        }
    }

    /// Field-wise change decision: true if any field differs from `desired`
    pub fn differs(&self, desired: &InterfaceSnapshot) -> bool {
        self != desired
    }
}

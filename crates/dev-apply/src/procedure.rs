//! Guarded interface reconfiguration
//!
//! One invocation runs a single linear transaction against one interface:
//!
//! ```text
//! guard check -> fetch -> change decision -> shut -> modify -> un-shut
//! ```
//!
//! Any failure in the mutating steps triggers a best-effort rollback: the
//! captured original snapshot is pushed back, then the interface is brought
//! up again. Rollback sub-step failures are reported alongside the original
//! cause, never instead of it, so the caller always learns both what failed
//! and whether the device state is now uncertain. No step is retried.

use std::fmt;

use log::{info, warn};
use thiserror::Error;

use devnet_core::{AdminState, InterfaceId, InterfaceSnapshot};
use devnet_transport::{InterfaceConfigClient, TransportError};

/// Errors surfaced by [`reconfigure`]
#[derive(Debug, Error)]
pub enum ProcedureError {
    /// The target is the protected management interface; no I/O was issued
    #[error("Refusing to modify management interface {interface}")]
    RefusedManagementInterface { interface: InterfaceId },

    /// The read-side fetch failed; no mutation was attempted
    #[error("Failed to fetch interface configuration: {source}")]
    ConfigFetchFailed {
        #[source]
        source: TransportError,
    },

    /// A mutating step failed; rollback was attempted (see `rollback`)
    #[error("Reconfiguration failed: {cause} ({rollback})")]
    ReconfigurationFailed {
        #[source]
        cause: TransportError,
        rollback: RollbackOutcome,
    },
}

/// What the best-effort rollback achieved after a failed mutating step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollbackOutcome {
    /// The original snapshot was pushed back successfully
    pub config_restored: bool,
    /// The final un-shut succeeded
    pub interface_up: bool,
}

impl fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rollback: config {}, interface {}",
            if self.config_restored {
                "restored"
            } else {
                "NOT restored"
            },
            if self.interface_up { "up" } else { "state unknown" },
        )
    }
}

/// Successful result of [`reconfigure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconfigureOutcome {
    /// Current configuration already matched the desired one; nothing was sent
    NoChangeNeeded,
    /// The desired configuration was applied; `previous` is the replaced state
    Reconfigured { previous: InterfaceSnapshot },
}

/// Safely transition `interface` to the `desired` configuration.
///
/// Refuses to touch `management_guard` before any device I/O. Fetches the
/// current state, compares field-wise (missing fields read as empty strings)
/// and returns [`ReconfigureOutcome::NoChangeNeeded`] without mutating the
/// device when they match. Otherwise captures the current state and runs the
/// shut / modify / un-shut sequence, rolling back on any failure.
pub async fn reconfigure(
    client: &dyn InterfaceConfigClient,
    interface: &InterfaceId,
    desired: &InterfaceSnapshot,
    management_guard: &InterfaceId,
) -> Result<ReconfigureOutcome, ProcedureError> {
    if interface == management_guard {
        return Err(ProcedureError::RefusedManagementInterface {
            interface: interface.clone(),
        });
    }

    let raw = client
        .fetch_interface(interface)
        .await
        .map_err(|source| ProcedureError::ConfigFetchFailed { source })?;
    let current = raw.snapshot();

    if !current.differs(desired) {
        info!(
            "Interface {} already has the desired configuration, no changes needed",
            interface
        );
        return Ok(ReconfigureOutcome::NoChangeNeeded);
    }

    // Captured verbatim; used only for rollback
    let original = current;

    match apply_sequence(client, interface, desired).await {
        Ok(()) => Ok(ReconfigureOutcome::Reconfigured { previous: original }),
        Err(cause) => {
            warn!(
                "Modification of interface {} failed: {}. Rolling back previous configuration",
                interface, cause
            );
            let rollback = roll_back(client, interface, &original).await;
            Err(ProcedureError::ReconfigurationFailed { cause, rollback })
        }
    }
}

/// The three mutating steps, strictly in order
async fn apply_sequence(
    client: &dyn InterfaceConfigClient,
    interface: &InterfaceId,
    desired: &InterfaceSnapshot,
) -> Result<(), TransportError> {
    info!("Shutting interface {}", interface);
    client.set_admin_state(interface, AdminState::Down).await?;

    info!("Modifying interface {}", interface);
    client.apply_config(interface, desired).await?;

    info!("Bringing interface {} up", interface);
    client.set_admin_state(interface, AdminState::Up).await?;

    Ok(())
}

/// Push the original snapshot back and bring the interface up. Both steps are
/// best-effort: failures are logged and reported, and the second step runs
/// even when the first fails.
async fn roll_back(
    client: &dyn InterfaceConfigClient,
    interface: &InterfaceId,
    original: &InterfaceSnapshot,
) -> RollbackOutcome {
    info!("Rolling back interface {} configuration", interface);
    let config_restored = match client.apply_config(interface, original).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Rollback push for interface {} failed: {}", interface, e);
            false
        }
    };

    info!("Bringing interface {} up after rollback", interface);
    let interface_up = match client.set_admin_state(interface, AdminState::Up).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Failed to bring interface {} up after rollback: {}",
                interface, e
            );
            false
        }
    };

    RollbackOutcome {
        config_restored,
        interface_up,
    }
}

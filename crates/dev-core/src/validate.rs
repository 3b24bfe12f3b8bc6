//! Caller-side validation of desired interface state
//!
//! The reconfiguration procedure trusts the desired snapshot it is handed;
//! these checks run in the CLI (or any other caller) before a device session
//! is opened.

use std::net::Ipv4Addr;

use crate::error::ValidationError;
use crate::types::InterfaceSnapshot;

/// Validate a desired snapshot: non-empty description, dotted-quad address,
/// contiguous dotted-quad subnet mask.
pub fn validate_desired(desired: &InterfaceSnapshot) -> Result<(), ValidationError> {
    if desired.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }

    desired
        .ip_address
        .parse::<Ipv4Addr>()
        .map_err(|_| ValidationError::InvalidIpAddress {
            value: desired.ip_address.clone(),
        })?;

    let mask: Ipv4Addr =
        desired
            .subnet_mask
            .parse()
            .map_err(|_| ValidationError::InvalidSubnetMask {
                value: desired.subnet_mask.clone(),
            })?;
    if !is_contiguous_mask(mask) {
        return Err(ValidationError::InvalidSubnetMask {
            value: desired.subnet_mask.clone(),
        });
    }

    Ok(())
}

/// A valid netmask is a run of ones followed by a run of zeros
fn is_contiguous_mask(mask: Ipv4Addr) -> bool {
    let bits = u32::from(mask);
    bits != 0 && bits.leading_ones() + bits.trailing_zeros() == 32
}

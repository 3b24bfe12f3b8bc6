//! Reconfigure command

use anyhow::{Context, Result};
use clap::ValueEnum;

use devnet_apply::{reconfigure, ReconfigureOutcome};
use devnet_config::Device;
use devnet_core::{validate_desired, InterfaceId, InterfaceSnapshot};
use devnet_transport::{InterfaceConfigClient, NxapiClient, RestconfClient};

/// Which management protocol to reconfigure through
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// IOS-XE RESTCONF (yang-data JSON)
    Restconf,
    /// NX-OS NX-API (cli_conf)
    Nxapi,
}

/// Reconfigure command implementation
pub struct ReconfigureCommand {
    device: Device,
}

impl ReconfigureCommand {
    /// Create new reconfigure command
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Execute the guarded reconfiguration against the device
    pub async fn execute(
        &self,
        transport: Transport,
        interface: &str,
        desired: InterfaceSnapshot,
        management_guard: &str,
    ) -> Result<()> {
        validate_desired(&desired).context("Desired configuration is invalid")?;

        let interface: InterfaceId = interface
            .parse()
            .context("Invalid interface identifier")?;
        let guard: InterfaceId = management_guard
            .parse()
            .context("Invalid management guard identifier")?;

        let client: Box<dyn InterfaceConfigClient> = match transport {
            Transport::Restconf => Box::new(
                RestconfClient::new(&self.device).context("Failed to create RESTCONF client")?,
            ),
            Transport::Nxapi => Box::new(
                NxapiClient::new(&self.device).context("Failed to create NX-API client")?,
            ),
        };

        println!(
            "Reconfiguring interface {} on {} ...",
            interface, self.device.host
        );

        let outcome = reconfigure(client.as_ref(), &interface, &desired, &guard).await?;

        match outcome {
            ReconfigureOutcome::NoChangeNeeded => {
                println!(
                    "Interface {} already has the desired configuration. No changes needed.",
                    interface
                );
            }
            ReconfigureOutcome::Reconfigured { previous } => {
                println!("✓ Interface {} reconfigured", interface);
                println!(
                    "  description: {:?} -> {:?}",
                    previous.description, desired.description
                );
                println!(
                    "  address:     {}/{} -> {}/{}",
                    display_or_dash(&previous.ip_address),
                    display_or_dash(&previous.subnet_mask),
                    desired.ip_address,
                    desired.subnet_mask
                );
            }
        }

        Ok(())
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

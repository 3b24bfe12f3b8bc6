//! Descr command

use anyhow::{Context, Result};

use devnet_config::Device;
use devnet_core::InterfaceId;
use devnet_transport::NxapiClient;

/// Descr command implementation: NX-API REST description edit
pub struct DescrCommand {
    device: Device,
}

impl DescrCommand {
    /// Create new descr command
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Set the description of a physical interface through the DME
    pub async fn execute(&self, interface: &str, description: &str) -> Result<()> {
        let interface: InterfaceId = interface
            .parse()
            .context("Invalid interface identifier")?;

        let client = NxapiClient::new(&self.device).context("Failed to create NX-API client")?;

        let token = client
            .login()
            .await
            .context("NX-API REST login failed")?;

        let reply = client
            .set_interface_descr(&token, &interface, description)
            .await
            .with_context(|| format!("Failed to set description of {}", interface))?;

        println!("✓ Description of {} set to {:?}", interface, description);
        println!("{}", serde_json::to_string_pretty(&reply)?);
        Ok(())
    }
}

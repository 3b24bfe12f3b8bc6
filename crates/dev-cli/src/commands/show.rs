//! Show command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use devnet_config::Device;
use devnet_transport::NxapiClient;

/// Show command implementation
pub struct ShowCommand {
    device: Device,
}

impl ShowCommand {
    /// Create new show command
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Run NX-API show commands, print the JSON reply and optionally save it
    pub async fn execute(&self, commands: &[String], output: Option<&Path>) -> Result<()> {
        let client = NxapiClient::new(&self.device).context("Failed to create NX-API client")?;

        let refs: Vec<&str> = commands.iter().map(String::as_str).collect();
        let reply = client
            .cli_show(&refs)
            .await
            .context("NX-API show request failed")?;

        let pretty = serde_json::to_string_pretty(&reply)?;
        println!("{}", pretty);

        if let Some(path) = output {
            fs::write(path, format!("{}\n", pretty))
                .with_context(|| format!("Failed to save output to {}", path.display()))?;
            println!("Saved output to: {}", path.display());
        }

        Ok(())
    }
}

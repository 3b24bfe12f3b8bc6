//! Status command

use anyhow::{Context, Result};

use devnet_config::Device;
use devnet_transport::{InterfaceState, RestconfClient};

/// Status command implementation
pub struct StatusCommand {
    device: Device,
}

impl StatusCommand {
    /// Create new status command
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Show operational state of one interface as a table
    pub async fn execute(&self, interface: &str) -> Result<()> {
        let client =
            RestconfClient::new(&self.device).context("Failed to create RESTCONF client")?;

        let state = client
            .interface_state(interface)
            .await
            .with_context(|| format!("Failed to fetch state of interface {}", interface))?;

        print!("{}", render_table(&[state]));
        Ok(())
    }
}

const COLUMNS: [&str; 4] = ["Interface", "Description", "Admin-state", "Oper-state"];

/// Render interface states as an aligned table with a separator line,
/// columns sized to their widest cell.
fn render_table(states: &[InterfaceState]) -> String {
    let rows: Vec<[&str; 4]> = states
        .iter()
        .map(|s| {
            [
                s.name.as_str(),
                s.description.as_str(),
                s.admin_status.as_str(),
                s.oper_status.as_str(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.len());
        }
    }

    let format_row = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{:<width$}", cell))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut out = String::new();
    out.push_str(&format_row(&COLUMNS));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

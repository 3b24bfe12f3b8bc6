//! devnet CLI entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use devnet::commands::{
    reconfigure::Transport, DescrCommand, ReconfigureCommand, ShowCommand, StatusCommand,
};
use devnet_config::DeviceInventory;
use devnet_core::InterfaceSnapshot;

#[derive(Parser)]
#[command(name = "devnet")]
#[command(about = "Network device management CLI (RESTCONF / NX-API)")]
#[command(version)]
#[command(long_about = "
Network device management CLI

Queries and reconfigures single network devices over RESTCONF (IOS-XE) and
NX-API (NX-OS). The reconfigure command runs a guarded shut / modify / un-shut
sequence and rolls back to the original configuration on any failure, always
leaving the interface administratively up.

Examples:
  devnet -d lab-xe status -i GigabitEthernet1      # Operational state, tabular
  devnet -d lab-nx show 'show version'             # NX-API show command
  devnet -d lab-nx show 'show version' -o out.json # ... saved to a file
  devnet -d lab-nx descr -i eth1/2 --description uplink-to-core
  devnet -d lab-xe reconfigure -i 2 \\
      --description uplink --ip 192.168.151.99 --mask 255.255.255.0
  devnet -d lab-nx reconfigure -t nxapi -i eth1/2 \\
      --description uplink --ip 10.0.0.2 --mask 255.255.255.0 -g mgmt0
")]
struct Cli {
    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Device inventory file
    #[arg(short = 'f', long, global = true, default_value = "devices.json")]
    inventory: String,

    /// Device name in the inventory
    #[arg(short, long, global = true, default_value = "default")]
    device: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Safely reconfigure an interface (shut, modify, un-shut, rollback on failure)
    Reconfigure {
        /// Interface to modify (e.g. "2" for GigabitEthernet2, "eth1/2" on NX-OS)
        #[arg(short, long)]
        interface: String,

        /// Desired interface description
        #[arg(long)]
        description: String,

        /// Desired IP address (dotted quad)
        #[arg(long)]
        ip: String,

        /// Desired subnet mask (dotted quad)
        #[arg(long)]
        mask: String,

        /// Management interface that must never be modified
        #[arg(short = 'g', long, default_value = "1")]
        management_guard: String,

        /// Management protocol to use
        #[arg(short, long, value_enum, default_value = "restconf")]
        transport: Transport,
    },

    /// Show operational state of an interface (RESTCONF)
    Status {
        /// Full interface name (e.g. GigabitEthernet1)
        #[arg(short, long)]
        interface: String,
    },

    /// Run NX-API show commands and print the JSON reply
    Show {
        /// Commands to run (e.g. "show version")
        #[arg(required = true)]
        commands: Vec<String>,

        /// Save the reply to a file as well
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set an interface description via NX-API REST (token login)
    Descr {
        /// Physical interface (e.g. eth1/2)
        #[arg(short, long)]
        interface: String,

        /// New description
        #[arg(long)]
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let inventory = DeviceInventory::load(&cli.inventory)
        .with_context(|| format!("Failed to load inventory {}", cli.inventory))?;
    let device = inventory
        .get(&cli.device)
        .with_context(|| format!("Device {} not found in inventory", cli.device))?;

    match cli.command {
        Commands::Reconfigure {
            interface,
            description,
            ip,
            mask,
            management_guard,
            transport,
        } => {
            let desired = InterfaceSnapshot::new(description, ip, mask);
            let cmd = ReconfigureCommand::new(device);
            cmd.execute(transport, &interface, desired, &management_guard)
                .await
        }

        Commands::Status { interface } => {
            let cmd = StatusCommand::new(device);
            cmd.execute(&interface).await
        }

        Commands::Show { commands, output } => {
            let cmd = ShowCommand::new(device);
            cmd.execute(&commands, output.as_deref()).await
        }

        Commands::Descr {
            interface,
            description,
        } => {
            let cmd = DescrCommand::new(device);
            cmd.execute(&interface, &description).await
        }
    }
}

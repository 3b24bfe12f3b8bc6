//! CLI commands

pub mod descr;
pub mod reconfigure;
pub mod show;
pub mod status;

pub use descr::DescrCommand;
pub use reconfigure::ReconfigureCommand;
pub use show::ShowCommand;
pub use status::StatusCommand;

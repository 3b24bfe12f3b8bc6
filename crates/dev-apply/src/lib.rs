//! devnet-rs apply
//!
//! The guarded interface reconfiguration procedure: shut, modify, un-shut,
//! with best-effort rollback to the captured original configuration when any
//! mutating step fails.

pub mod procedure;

#[cfg(test)]
mod tests;

pub use procedure::{reconfigure, ProcedureError, ReconfigureOutcome, RollbackOutcome};

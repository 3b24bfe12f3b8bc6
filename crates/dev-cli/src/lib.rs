//! devnet CLI
//!
//! Command-line tooling for querying and reconfiguring network devices over
//! RESTCONF (IOS-XE) and NX-API (NX-OS). The `reconfigure` command wraps the
//! guarded shut / modify / un-shut procedure with rollback; `status` and
//! `show` are read-only queries.

pub mod commands;

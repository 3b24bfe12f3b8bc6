//! devnet-rs config
//!
//! Device inventory loading: connection parameters and credentials for the
//! managed devices the CLI talks to. The inventory is a JSON map of device
//! name to connection entry; individual fields can be overridden through
//! `DEVNET_*` environment variables so credentials stay out of files in lab
//! setups.

pub mod inventory;

pub use inventory::{Device, DeviceInventory, InventoryError};

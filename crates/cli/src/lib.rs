//! CLI tool for inspecting node addresses.
//!
//! Provides commands for:
//! - Inspecting an address (family, flags, raw buffer)
//! - Comparing two addresses in key order
//! - Sorting a list of addresses

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;

//! # routekit-cli
//!
//! Library behind the `routekit` command-line tool.
//!
//! ## Architecture
//!
//! - [`config`] - `routekit.toml` loading and CLI overrides
//! - [`loader`] - Building a compiled router from a route table
//! - [`error`] - Error types and exit codes

pub mod config;
pub mod error;
pub mod loader;

// Re-export main types for convenience
pub use config::{CliArgs, ConfigManager, RouteEntry, RoutesFile};
pub use error::{CliError, CliResult};
pub use loader::{RouteTable, build_router, check};

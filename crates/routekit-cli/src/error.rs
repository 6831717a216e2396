//! Error types for the CLI.
//!
//! Library errors are wrapped as they are, so their messages (including the
//! caret pointer under a bad definition character) reach the terminal intact.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error loading the route table file.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// A route in the table could not be registered.
    #[error("Route #{index}{}: {source}", describe_name(.name))]
    Route {
        /// Position of the entry in the `[[routes]]` array.
        index: usize,
        /// Name of the entry, if it has one.
        name: Option<String>,
        /// The registration error.
        #[source]
        source: routekit::RouteError,
    },

    /// The `[types]` table does not form a valid registry.
    #[error("Invalid types: {0}")]
    Types(#[from] routekit::TypesError),

    /// Building the router failed.
    #[error(transparent)]
    Router(#[from] routekit::Error),

    /// URI generation failed.
    #[error("Cannot build URI: {0}")]
    Uri(#[from] routekit::UriError),

    /// A command-line argument could not be interpreted.
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// The argument as given.
        argument: String,
        /// What is wrong with it.
        message: String,
    },

    /// The request did not match any route (404) or not for its method (405).
    #[error("{status} {message}")]
    NoMatch {
        /// HTTP status the failure corresponds to.
        status: u16,
        /// Human readable summary.
        message: String,
    },

    /// Several routes failed the check.
    #[error("{} route(s) failed to compile", .0.len())]
    Check(Vec<CliError>),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create an invalid argument error.
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error: 2 for an unmatched request, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoMatch { .. } => 2,
            _ => 1,
        }
    }
}

fn describe_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" ({})", name),
        None => String::new(),
    }
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {path} (run `routekit init` to create one)")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax or shape.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// IO error reading the file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target file already exists.
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path: path.into(),
            message: message.into(),
        }
    }
}

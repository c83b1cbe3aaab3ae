//! Error types for console operations.

use std::io;
use thiserror::Error;

/// Errors surfaced by the console, its configuration and the terminal host.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid TOML for [`ConsoleConfig`](crate::ConsoleConfig).
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value parsed but is out of range.
    #[error("Invalid configuration value for `{field}`: {reason}")]
    ConfigValue {
        /// Name of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A resize asked for a surface with no area.
    #[error("Invalid surface geometry {width}x{height}")]
    InvalidGeometry {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConsoleError>;

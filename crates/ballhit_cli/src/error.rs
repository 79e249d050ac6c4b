//! Errors reported by the `ballhit` binary.

use std::io;
use std::path::PathBuf;

use ballhit::{ConfigError, StartError};

/// Everything that can stop a command.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ReadConfig {
        /// File that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for a lab.
    #[error("failed to parse config {}: {source}", path.display())]
    ParseConfig {
        /// File that was parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration parsed but describes an impossible lab.
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// A ball index does not exist in the rack.
    #[error("no ball #{index} in the rack (it holds {len} balls)")]
    UnknownBall {
        /// Requested index.
        index: usize,
        /// Number of balls in the rack.
        len: usize,
    },

    /// The same ball was asked for on both arms.
    #[error("ball #{0} cannot hang on both arms")]
    SameBall(usize),

    /// The bench ignored a setup step.
    #[error("the bench refused to {0}")]
    Refused(String),

    /// The bench refused to start the run.
    #[error("cannot start: {0}")]
    Start(#[from] StartError),

    /// The run was still going when the tick cap was reached.
    #[error("simulation did not finish within {ticks} ticks")]
    Timeout {
        /// Ticks performed.
        ticks: u64,
    },

    /// A file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration could not be rendered as TOML.
    #[error("failed to render config: {0}")]
    RenderConfig(#[from] toml::ser::Error),

    /// A report could not be rendered as JSON.
    #[error("failed to render report: {0}")]
    RenderReport(#[from] serde_json::Error),
}

/// A specialized [`Result`] type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

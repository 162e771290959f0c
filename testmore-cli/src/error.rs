//! Errors surfaced by the `testmore` command.

use std::path::PathBuf;

use crate::config::ConfigLoadError;

/// Error type for the `testmore` command.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An assertion could not be evaluated, or its outcome could not be reported.
    #[error(transparent)]
    Harness(#[from] testmore_core::Error),

    /// An explicitly requested configuration file could not be loaded.
    #[error("{}: {source}", path.display())]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Why loading failed.
        #[source]
        source: ConfigLoadError,
    },

    /// The tracing subscriber could not be installed.
    #[error("tracing not initialized")]
    TracingNotInitialized,

    /// The tracing filter could not be updated.
    #[error("failed to enable tracing events")]
    TracingReload,
}

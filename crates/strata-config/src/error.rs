//! Resolution error types.

use std::fmt;

use thiserror::Error;

use crate::remote::RemoteFetchError;

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required load options were missing or inconsistent. Surfaced to the
    /// caller before any I/O happens.
    #[error("invalid options: {message}")]
    InvalidOptions {
        /// What was wrong with the options
        message: String,
    },

    /// A configuration source could not be read.
    #[error("source unavailable: {path}")]
    SourceUnavailable {
        /// The path that could not be read
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configuration source could not be parsed as YAML.
    #[error("failed to parse {path}")]
    ParseError {
        /// The path of the malformed source
        path: String,
        /// The underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// A configuration source exceeded the size limit.
    #[error("{path} is {len} bytes, over the {limit} byte limit")]
    Oversized {
        /// The path of the oversized source
        path: String,
        /// Actual size in bytes
        len: u64,
        /// Maximum allowed size in bytes
        limit: u64,
    },

    /// The remote collaborator failed. Only ever constructed inside the
    /// degrading remote stage; a fetch failure never escapes a pass.
    #[error(transparent)]
    RemoteFetch(#[from] RemoteFetchError),

    /// A pipeline stage failed, annotated with which stage produced it.
    #[error("{stage} stage failed")]
    Stage {
        /// The stage that produced the error
        stage: Stage,
        /// The underlying error
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Wrap this error with the pipeline stage that produced it.
    #[must_use]
    pub fn at_stage(self, stage: Stage) -> Self {
        ConfigError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Construct an [`ConfigError::InvalidOptions`] from a message.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        ConfigError::InvalidOptions {
            message: message.into(),
        }
    }
}

/// The four sequential stages of a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading `bootstrap.yml`
    Bootstrap,
    /// Loading `application.yml` and its profile overlays
    Local,
    /// Fetching from the remote configuration service
    Remote,
    /// Merging the three layers into the final tree
    Compose,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Bootstrap => "bootstrap",
            Stage::Local => "local",
            Stage::Remote => "remote",
            Stage::Compose => "compose",
        };
        f.write_str(name)
    }
}

//! Remote configuration collaborator contract.
//!
//! The transport to the remote configuration service is deliberately outside
//! this crate: the pipeline only needs *something* that, given the bootstrap
//! `remote` section, asynchronously returns a flat or nested key/value tree.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::warn;

use crate::{PropertyTree, empty_tree};

/// Bootstrap section holding the remote collaborator's options.
pub const REMOTE_SECTION: &str = "remote";

/// Path at which the active profiles are injected into the bootstrap tree.
pub const REMOTE_PROFILES_PATH: &[&str] = &[REMOTE_SECTION, "profiles"];

/// Path of the logical application name used for remote lookup. Local config
/// may override it.
pub const REMOTE_NAME_PATH: &[&str] = &[REMOTE_SECTION, "name"];

/// Error produced by a [`RemoteFetcher`] implementation.
#[derive(Debug, Error)]
#[error("remote fetch failed: {message}")]
pub struct RemoteFetchError {
    message: String,
}

impl RemoteFetchError {
    /// Build an error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Options handed to the remote collaborator, deserialized from the bootstrap
/// tree's `remote` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteOptions {
    /// Whether the remote stage runs at all. Absent means disabled.
    pub enabled: bool,
    /// Logical application name for remote lookup.
    pub name: Option<String>,
    /// Profiles requested by the caller, injected by the bootstrap stage.
    pub profiles: Vec<String>,
    /// Transport-specific settings (endpoint, timeouts, ...) passed through
    /// untouched.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl RemoteOptions {
    /// Extract the options from a bootstrap tree.
    ///
    /// Returns `None` when the tree has no `remote` section or the section
    /// does not deserialize; a malformed section is logged, not fatal.
    #[must_use]
    pub fn from_tree(bootstrap: &Value) -> Option<Self> {
        let section = bootstrap.get(REMOTE_SECTION)?;
        match serde_yaml::from_value(section.clone()) {
            Ok(options) => Some(options),
            Err(err) => {
                warn!(error = %err, "malformed remote section, skipping remote stage");
                None
            },
        }
    }
}

/// Asynchronous source of remote configuration.
///
/// Implementations may return a flat dotted-key set, a nested tree, or a mix;
/// the pipeline normalizes the shape. A failed fetch never aborts resolution.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch the property set for the given options.
    async fn fetch(&self, options: &RemoteOptions) -> Result<PropertyTree, RemoteFetchError>;
}

/// Fetcher for deployments without a remote configuration service. Always
/// returns an empty tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

#[async_trait]
impl RemoteFetcher for NoRemote {
    async fn fetch(&self, _options: &RemoteOptions) -> Result<PropertyTree, RemoteFetchError> {
        Ok(empty_tree())
    }
}

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration resolution for the Strata runtime.
//!
//! This crate merges three configuration layers — a bootstrap document, local
//! environment-specific documents, and an optional remote configuration
//! service — into a single property tree.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strata_config::{LoadOptions, NoRemote, Resolver};
//!
//! # async fn example() -> strata_config::ConfigResult<()> {
//! let options = LoadOptions::new("config", vec!["dev".to_owned()]);
//! let resolver = Resolver::new(options, Arc::new(NoRemote))?;
//! let config = resolver.resolve().await?;
//! println!("{config:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Layer precedence
//!
//! From lowest to highest priority:
//!
//! 1. **Bootstrap** (`{bootstrap_path or config_path}/bootstrap.yml`) —
//!    primarily supplies the remote-service connection parameters
//! 2. **Local** (`{config_path}/application.yml` plus one optional
//!    `application-<profile>.yml` overlay per active profile, in profile order)
//! 3. **Remote** — fetched through a [`RemoteFetcher`] collaborator; fetch
//!    failure degrades to an empty layer and never aborts resolution
//!
//! # Design
//!
//! All merging operates on raw [`serde_yaml::Value`] trees rather than
//! deserialized structs. This correctly handles "absent vs default" — a key
//! missing from an overlay document never overrides a lower layer — and keeps
//! the engine agnostic of the shape of the application's configuration.

/// Resolution error types.
pub mod error;
/// Document loading: multi-document parsing, profile filtering, overlays.
pub mod loader;
/// Deep merge and dot-path expansion over property trees.
pub mod merge;
/// Load options supplied by the caller.
pub mod options;
/// The four-stage resolution pipeline.
pub mod pipeline;
/// Profile-aware document filtering.
pub mod profile;
/// Remote configuration collaborator contract.
pub mod remote;

// Re-export primary types at the crate root.
pub use error::{ConfigError, ConfigResult, Stage};
pub use options::LoadOptions;
pub use pipeline::{ResolutionContext, Resolver};
pub use remote::{NoRemote, RemoteFetchError, RemoteFetcher, RemoteOptions};

/// The core configuration value type: an ordered key-value tree.
///
/// Mappings preserve insertion order, which makes the layered merge
/// deterministic for a given input sequence.
pub type PropertyTree = serde_yaml::Value;

/// An empty property tree (an empty mapping, not YAML `null`).
#[must_use]
pub fn empty_tree() -> PropertyTree {
    PropertyTree::Mapping(serde_yaml::Mapping::new())
}

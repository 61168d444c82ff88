#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration client for the Strata resolution engine.
//!
//! [`ConfigClient`] wraps a [`strata_config::Resolver`] with the pieces an
//! application actually holds on to at runtime: the last successfully
//! composed tree (swapped atomically from the reader's perspective), an event
//! bus for refresh/error notifications, and a cancellable periodic watcher
//! that re-runs resolution.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use strata_client::ConfigClient;
//! use strata_config::{LoadOptions, NoRemote};
//!
//! # async fn example() -> strata_config::ConfigResult<()> {
//! let options = LoadOptions::new("config", vec!["dev".to_owned()]);
//! let client = ConfigClient::new(options, Arc::new(NoRemote))?;
//!
//! let config = client.load().await?;
//! println!("port: {:?}", config.get("port"));
//!
//! let mut events = client.subscribe();
//! client.start_watch(Some(Duration::from_secs(60)));
//! # Ok(())
//! # }
//! ```

mod client;
mod watch;

pub use client::ConfigClient;
pub use watch::DEFAULT_WATCH_INTERVAL;

// The caller-facing option and event types, re-exported for convenience.
pub use strata_config::{
    ConfigError, ConfigResult, LoadOptions, NoRemote, PropertyTree, RemoteFetcher,
};
pub use strata_events::{ConfigEvent, EventBus, EventReceiver};

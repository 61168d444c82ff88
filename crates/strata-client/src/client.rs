//! The configuration client.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use strata_config::{ConfigResult, LoadOptions, PropertyTree, RemoteFetcher, Resolver};
use strata_events::{EventBus, EventReceiver};

use crate::watch::WatchState;

/// Handle to one configuration instance.
///
/// Cheap to clone; all clones share the resolver, the resolved-configuration
/// slot, the event bus, and the watch state.
#[derive(Debug, Clone)]
pub struct ConfigClient {
    pub(crate) inner: Arc<Inner>,
}

#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) resolver: Resolver,
    /// Last successfully composed tree. Replaced whole, never mutated in
    /// place, so readers never observe a partially merged tree.
    current: RwLock<Option<Arc<PropertyTree>>>,
    pub(crate) events: EventBus,
    pub(crate) watch: Mutex<WatchState>,
}

impl ConfigClient {
    /// Validate `options` and build a client.
    ///
    /// # Errors
    ///
    /// Returns [`strata_config::ConfigError::InvalidOptions`] before any I/O
    /// when required options are missing.
    pub fn new(options: LoadOptions, fetcher: Arc<dyn RemoteFetcher>) -> ConfigResult<Self> {
        let resolver = Resolver::new(options, fetcher)?;
        Ok(Self {
            inner: Arc::new(Inner {
                resolver,
                current: RwLock::new(None),
                events: EventBus::new(),
                watch: Mutex::new(WatchState::default()),
            }),
        })
    }

    /// Run one resolution pass and store the composed tree.
    ///
    /// # Errors
    ///
    /// The pass's first fatal error, annotated with its stage. The stored
    /// tree is left untouched on failure.
    pub async fn load(&self) -> ConfigResult<Arc<PropertyTree>> {
        let composed = Arc::new(self.inner.resolver.resolve().await?);
        self.store(Arc::clone(&composed));
        Ok(composed)
    }

    /// The last successfully composed tree, or `None` if no pass has
    /// completed yet.
    #[must_use]
    pub fn config(&self) -> Option<Arc<PropertyTree>> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The event bus this client publishes refresh/error notifications on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Subscribe to refresh/error notifications.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.inner.events.subscribe()
    }

    pub(crate) fn store(&self, composed: Arc<PropertyTree>) {
        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(composed);
    }
}

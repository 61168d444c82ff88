//! Event types published by the watcher.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strata_config::PropertyTree;
use uuid::Uuid;

/// Metadata attached to every event.
#[derive(Debug, Clone, Serialize)]
pub struct EventMetadata {
    /// Unique event id.
    pub id: Uuid,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// Which component published the event (e.g. `"watcher"`).
    pub source: String,
}

impl EventMetadata {
    /// Create metadata with a fresh id and the current time.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

/// A configuration lifecycle notification.
#[derive(Debug, Clone, Serialize)]
pub enum ConfigEvent {
    /// A resolution pass succeeded; carries the newly composed tree.
    Refreshed {
        /// Event metadata.
        metadata: EventMetadata,
        /// The composed configuration.
        config: PropertyTree,
    },
    /// A resolution pass failed; carries the rendered pass error.
    Failed {
        /// Event metadata.
        metadata: EventMetadata,
        /// The error, including the stage that produced it.
        error: String,
    },
}

impl ConfigEvent {
    /// Stable string identifying the event kind.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            ConfigEvent::Refreshed { .. } => "config_refresh",
            ConfigEvent::Failed { .. } => "config_error",
        }
    }

    /// The event's metadata.
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            ConfigEvent::Refreshed { metadata, .. } | ConfigEvent::Failed { metadata, .. } => {
                metadata
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        let refreshed = ConfigEvent::Refreshed {
            metadata: EventMetadata::new("test"),
            config: strata_config::empty_tree(),
        };
        assert_eq!(refreshed.event_type(), "config_refresh");

        let failed = ConfigEvent::Failed {
            metadata: EventMetadata::new("test"),
            error: "boom".to_owned(),
        };
        assert_eq!(failed.event_type(), "config_error");
    }

    #[test]
    fn test_metadata_source() {
        let event = ConfigEvent::Failed {
            metadata: EventMetadata::new("watcher"),
            error: "boom".to_owned(),
        };
        assert_eq!(event.metadata().source, "watcher");
    }
}

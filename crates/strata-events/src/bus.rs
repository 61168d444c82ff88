//! Broadcast bus delivering events to subscribers.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::event::ConfigEvent;

/// Default channel capacity for the event bus. Configuration events are rare,
/// so a lagging receiver indicates a stalled consumer rather than load.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast bus for [`ConfigEvent`]s.
///
/// Cloning the bus shares the underlying channel: events published on any
/// clone reach subscribers of every clone.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<Arc<ConfigEvent>>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of receivers that were handed the event. Zero
    /// receivers is not an error.
    pub fn publish(&self, event: ConfigEvent) -> usize {
        let event = Arc::new(event);

        trace!(event_type = %event.event_type(), "publishing event");

        if let Ok(count) = self.sender.send(Arc::clone(&event)) {
            debug!(
                event_type = %event.event_type(),
                receiver_count = count,
                "event published"
            );
            count
        } else {
            trace!(event_type = %event.event_type(), "no receivers for event");
            0
        }
    }

    /// Subscribe to all subsequently published events.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of currently attached receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }
}

/// Receiving end of the bus.
pub struct EventReceiver {
    receiver: broadcast::Receiver<Arc<ConfigEvent>>,
}

impl EventReceiver {
    /// Receive the next event.
    ///
    /// Returns `None` once the channel is closed. If this receiver lagged and
    /// events were dropped, the loss is logged and receiving continues.
    pub async fn recv(&mut self) -> Option<Arc<ConfigEvent>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(skipped = count, "event receiver lagged, events dropped");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive the next event without blocking, or `None` if nothing is
    /// pending.
    pub fn try_recv(&mut self) -> Option<Arc<ConfigEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(skipped = count, "event receiver lagged, events dropped");
                },
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}

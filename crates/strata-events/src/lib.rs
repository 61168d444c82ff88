#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Event bus carrying configuration refresh and error notifications.
//!
//! Watch passes publish a [`ConfigEvent`] to an [`EventBus`], which broadcasts
//! it to all connected receivers. Events are delivered asynchronously and in
//! order.
//!
//! # Example
//!
//! ```rust
//! use strata_events::{ConfigEvent, EventBus, EventMetadata};
//!
//! # async fn example() {
//! let bus = EventBus::new();
//! let mut receiver = bus.subscribe();
//!
//! bus.publish(ConfigEvent::Failed {
//!     metadata: EventMetadata::new("watcher"),
//!     error: "bootstrap stage failed".to_owned(),
//! });
//!
//! let event = receiver.recv().await.unwrap();
//! assert_eq!(event.event_type(), "config_error");
//! # }
//! ```

mod bus;
mod event;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventReceiver};
pub use event::{ConfigEvent, EventMetadata};

//! Cross-widget events within a document
//!
//! Widgets never talk to each other directly. An event button publishes a
//! [`ResetEvent`] on the [`EventBus`], scoped to its document, and every
//! stateful widget of that document that subscribed to the `reset` topic
//! decides for itself whether and how far to reset.

pub mod bus;
pub mod context;
pub mod scope;
pub mod topics;


pub use bus::{EventBus, EventCallback, SubscriberId, Subscription};
pub use context::FileContext;
pub use scope::normalize_scope;
pub use topics::{BusEvent, ResetEvent, Topic};

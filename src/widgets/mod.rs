//! Stateful widget handlers
//!
//! A widget is mounted with the [`FileContext`](crate::events::FileContext)
//! of its document, the shared [`KeyValueStore`](crate::storage::KeyValueStore)
//! and its parsed block definition. Mounting loads (or initializes and
//! persists) the widget's state and subscribes it to `reset` events of the
//! document; [`unload`](HealthWidget::unload) removes the subscription.

mod cell;
pub mod consumables;
pub mod event_buttons;
pub mod health;
pub mod initiative;


pub use consumables::ConsumableWidget;
pub use event_buttons::EventButtons;
pub use health::HealthWidget;
pub use initiative::InitiativeWidget;

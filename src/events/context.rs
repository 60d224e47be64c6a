//! Per-document view of the event bus

use std::sync::{Arc, PoisonError, RwLock};

use super::bus::{EventBus, Subscription};
use super::scope::normalize_scope;
use super::topics::{BusEvent, ResetEvent};
use crate::domains::frontmatter::Frontmatter;

/// A document path bound to the session's event bus.
///
/// Widgets mounted in a document receive one of these and use it for all of
/// their event traffic, so every subscription and publish is scoped to the
/// same document. Clones share the document's latest frontmatter.
#[derive(Debug, Clone)]
pub struct FileContext {
    file_path: String,
    bus: EventBus,
    frontmatter: Arc<RwLock<Frontmatter>>,
}

impl FileContext {
    pub fn new(file_path: impl Into<String>, bus: EventBus) -> Self {
        Self {
            file_path: file_path.into(),
            bus,
            frontmatter: Arc::new(RwLock::new(Frontmatter::default())),
        }
    }

    /// Start from the frontmatter the document was opened with
    pub fn with_frontmatter(self, frontmatter: Frontmatter) -> Self {
        self.set_frontmatter(frontmatter);
        self
    }

    /// Latest known frontmatter of the document
    pub fn frontmatter(&self) -> Frontmatter {
        self.frontmatter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_frontmatter(&self, frontmatter: Frontmatter) {
        *self
            .frontmatter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = frontmatter;
    }

    /// Document path as given by the host
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Normalized scope used on the bus
    pub fn scope(&self) -> String {
        normalize_scope(&self.file_path)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn on_reset<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ResetEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bus.subscribe_reset(&self.file_path, callback)
    }

    pub fn on_frontmatter_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Frontmatter) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bus.subscribe_frontmatter(&self.file_path, callback)
    }

    pub fn on_abilities_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bus.subscribe_abilities(&self.file_path, callback)
    }

    /// Publish a reset for this document. Returns the number of receivers.
    pub fn publish_reset(&self, event_type: &str, amount: Option<i64>) -> usize {
        let event = ResetEvent {
            file_path: self.file_path.clone(),
            event_type: event_type.to_string(),
            amount,
        };
        self.bus.publish(&self.file_path, event)
    }

    /// Record new frontmatter for the document and notify its widgets
    pub fn publish_frontmatter(&self, frontmatter: Frontmatter) -> usize {
        self.set_frontmatter(frontmatter.clone());
        self.bus.publish(&self.file_path, frontmatter)
    }

    pub fn publish_abilities_changed(&self) -> usize {
        self.bus.publish(&self.file_path, BusEvent::AbilitiesChanged)
    }
}

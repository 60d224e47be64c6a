//! Document-scoped publish/subscribe dispatcher

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, error, trace, warn};

use super::scope::normalize_scope;
use super::topics::{BusEvent, ResetEvent, Topic};
use crate::domains::frontmatter::Frontmatter;
use crate::error::{ErrorCode, ToolkitError};

/// Callback invoked for every event published to a subscribed scope and topic
pub type EventCallback = Arc<dyn Fn(&BusEvent) -> anyhow::Result<()> + Send + Sync>;

/// Identifier of one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScopeKey {
    scope: String,
    topic: Topic,
}

impl ScopeKey {
    fn new(scope: &str, topic: Topic) -> Self {
        Self {
            scope: normalize_scope(scope),
            topic,
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.topic)
    }
}

struct Subscriber {
    id: SubscriberId,
    callback: EventCallback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: HashMap<ScopeKey, Vec<Subscriber>>,
}

impl Registry {
    fn remove(&mut self, key: &ScopeKey, id: SubscriberId) -> bool {
        let Some(subscribers) = self.subscribers.get_mut(key) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            self.subscribers.remove(key);
        }
        removed
    }
}

/// Publish/subscribe dispatcher keyed by (document scope, topic).
///
/// Cloning is cheap and every clone shares the same registry, so one bus is
/// created per session and handed to each widget. Delivery is synchronous and
/// in registration order. Callbacks run outside the registry lock and may
/// subscribe, unsubscribe or publish themselves; a publish delivers to the
/// subscribers registered when it started.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `callback` for events on `topic` within `scope`
    pub fn subscribe<F>(&self, scope: &str, topic: Topic, callback: F) -> Subscription
    where
        F: Fn(&BusEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let key = ScopeKey::new(scope, topic);
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = SubscriberId(registry.next_id);
        trace!("Subscribing {:?} to {}", id, key);
        registry
            .subscribers
            .entry(key.clone())
            .or_default()
            .push(Subscriber {
                id,
                callback: Arc::new(callback),
            });

        Subscription {
            registry: Arc::downgrade(&self.registry),
            key,
            id,
            active: AtomicBool::new(true),
        }
    }

    /// Register a callback for reset events only
    pub fn subscribe_reset<F>(&self, scope: &str, callback: F) -> Subscription
    where
        F: Fn(&ResetEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe(scope, Topic::Reset, move |event| match event {
            BusEvent::Reset(reset) => callback(reset),
            _ => Ok(()),
        })
    }

    /// Register a callback for frontmatter changes only
    pub fn subscribe_frontmatter<F>(&self, scope: &str, callback: F) -> Subscription
    where
        F: Fn(&Frontmatter) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe(scope, Topic::FrontmatterChanged, move |event| match event {
            BusEvent::FrontmatterChanged(fm) => callback(fm),
            _ => Ok(()),
        })
    }

    /// Register a callback for ability recalculation notices only
    pub fn subscribe_abilities<F>(&self, scope: &str, callback: F) -> Subscription
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe(scope, Topic::AbilitiesChanged, move |event| match event {
            BusEvent::AbilitiesChanged => callback(),
            _ => Ok(()),
        })
    }

    /// Remove one callback. Returns whether it was registered.
    pub fn unsubscribe(&self, scope: &str, topic: Topic, id: SubscriberId) -> bool {
        let key = ScopeKey::new(scope, topic);
        self.lock().remove(&key, id)
    }

    /// Deliver `event` to every subscriber of its topic within `scope`.
    ///
    /// Returns the number of callbacks invoked. A callback that fails or
    /// panics is logged and does not stop delivery to the rest.
    pub fn publish(&self, scope: &str, event: impl Into<BusEvent>) -> usize {
        let event = event.into();
        let key = ScopeKey::new(scope, event.topic());
        let callbacks: Vec<(SubscriberId, EventCallback)> = self
            .lock()
            .subscribers
            .get(&key)
            .map(|subs| subs.iter().map(|s| (s.id, s.callback.clone())).collect())
            .unwrap_or_default();

        debug!(
            "Publishing event {} to {} subscriber(s): {:?}",
            key,
            callbacks.len(),
            event
        );

        for (id, callback) in &callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    let err = subscriber_failure(*id, &key, "failed").with_source(e);
                    warn!("{}", err.developer_message());
                }
                Err(_) => error!("{}", subscriber_failure(*id, &key, "panicked")),
            }
        }

        callbacks.len()
    }

    /// Number of callbacks per `scope:topic` key, for debugging
    pub fn subscriber_counts(&self) -> BTreeMap<String, usize> {
        self.lock()
            .subscribers
            .iter()
            .map(|(key, subs)| (key.to_string(), subs.len()))
            .collect()
    }

    /// Drop every subscription within `scope`, on all topics
    pub fn clear_scope(&self, scope: &str) {
        let scope = normalize_scope(scope);
        let mut registry = self.lock();
        registry.subscribers.retain(|key, _| key.scope != scope);
        debug!("Cleared subscriptions for scope {}", scope);
    }
}

pub(crate) fn subscriber_failure(id: SubscriberId, key: &impl fmt::Display, what: &str) -> ToolkitError {
    ToolkitError::event(
        ErrorCode::EVENT_SUBSCRIBER_FAILED,
        format!("Subscriber {id:?} for {key} {what}"),
        Some(key.to_string()),
    )
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_counts())
            .finish()
    }
}

/// Handle to one registered callback.
///
/// Dropping the handle leaves the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    key: ScopeKey,
    id: SubscriberId,
    active: AtomicBool,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Normalized scope this subscription listens on
    pub fn scope(&self) -> &str {
        &self.key.scope
    }

    pub fn topic(&self) -> Topic {
        self.key.topic
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Remove the callback from the bus. Safe to call more than once, and
    /// after the bus itself has been dropped.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.key, self.id);
            trace!("Unsubscribed {:?} from {}", self.id, self.key);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key.to_string())
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::cell::{require_state_key, StateCell};
use crate::domains::health::{HealthBlock, HealthState};
use crate::error::Result;
use crate::events::{FileContext, Subscription};
use crate::reset;
use crate::storage::KeyValueStore;

/// A mounted `healthpoints` block
pub struct HealthWidget {
    block: HealthBlock,
    cell: StateCell<HealthState>,
    max_health: Arc<AtomicI64>,
    subscriptions: Vec<Subscription>,
}

impl HealthWidget {
    /// Load or initialize the state for `block` and start listening for
    /// resets in the widget's document.
    ///
    /// Health resets on `long-rest` unless the block says otherwise. A
    /// matching reset always restores full health; amounts are ignored.
    /// A templated maximum is rendered against the document's frontmatter
    /// and rendered again whenever the frontmatter changes.
    pub async fn mount(ctx: &FileContext, kv: Arc<KeyValueStore>, block: HealthBlock) -> Result<Self> {
        let state_key = require_state_key(block.state_key.as_deref(), "healthpoints")?;
        let initial_max = block.max_health(&ctx.frontmatter());
        let cell = StateCell::load(kv, state_key, || HealthState::full(initial_max)).await?;
        let max_health = Arc::new(AtomicI64::new(initial_max));

        let reset_on = block.reset_config();
        let mut subscriptions = Vec::with_capacity(2);
        subscriptions.push({
            let cell = cell.clone();
            let max_health = max_health.clone();
            ctx.on_reset(move |event| {
                if reset::should_reset_on_event(Some(&reset_on), &event.event_type) {
                    debug!(
                        "Resetting health {} due to {} event",
                        cell.state_key(),
                        event.event_type
                    );
                    let max_health = max_health.load(Ordering::Acquire);
                    cell.apply_reset(|_| HealthState::full(max_health));
                }
                Ok(())
            })
        });

        if block.health.is_template() {
            let health = block.health.clone();
            let state_key = cell.state_key().to_string();
            let max_health = max_health.clone();
            subscriptions.push(ctx.on_frontmatter_change(move |frontmatter| {
                let next = health.resolve(frontmatter);
                let previous = max_health.swap(next, Ordering::AcqRel);
                if previous != next {
                    debug!(
                        "Maximum health of {} changed from {} to {}",
                        state_key, previous, next
                    );
                }
                Ok(())
            }));
        }

        Ok(Self {
            block,
            cell,
            max_health,
            subscriptions,
        })
    }

    pub fn block(&self) -> &HealthBlock {
        &self.block
    }

    pub fn state_key(&self) -> &str {
        self.cell.state_key()
    }

    pub fn state(&self) -> HealthState {
        self.cell.get()
    }

    /// Current maximum hit points
    pub fn max_health(&self) -> i64 {
        self.max_health.load(Ordering::Acquire)
    }

    pub async fn damage(&self, amount: i64) -> Result<HealthState> {
        self.cell.update(|state| state.damage(amount)).await
    }

    pub async fn heal(&self, amount: i64) -> Result<HealthState> {
        let max_health = self.max_health();
        self.cell.update(|state| state.heal(amount, max_health)).await
    }

    pub async fn add_temporary(&self, amount: i64) -> Result<HealthState> {
        self.cell.update(|state| state.add_temporary(amount)).await
    }

    pub async fn toggle_hit_die(&self, index: u32) -> Result<HealthState> {
        self.cell.update(|state| state.toggle_hit_die(index)).await
    }

    pub async fn toggle_death_save(&self, success: bool, index: u32) -> Result<HealthState> {
        self.cell
            .update(|state| state.toggle_death_save(success, index))
            .await
    }

    /// Wait for writes queued by reset events
    pub async fn flush(&self) {
        self.cell.flush().await
    }

    /// Stop listening for resets and frontmatter changes. Safe to call more
    /// than once.
    pub fn unload(&self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}

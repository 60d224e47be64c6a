use std::sync::Arc;
use tracing::debug;

use super::cell::{require_state_key, StateCell};
use crate::domains::consumables::{ConsumableBlock, ConsumableState, ConsumablesBlock};
use crate::error::Result;
use crate::events::{FileContext, Subscription};
use crate::reset;
use crate::storage::KeyValueStore;

/// A mounted consumable: one row of checkboxes
pub struct ConsumableWidget {
    block: ConsumableBlock,
    cell: StateCell<ConsumableState>,
    subscription: Subscription,
}

impl ConsumableWidget {
    /// Load or initialize the state for `block` and start listening for
    /// resets in the widget's document.
    ///
    /// A reset restores the event's amount when it carries one, otherwise
    /// the amount configured for that event, otherwise every use.
    pub async fn mount(
        ctx: &FileContext,
        kv: Arc<KeyValueStore>,
        block: ConsumableBlock,
    ) -> Result<Self> {
        let state_key = require_state_key(block.state_key.as_deref(), "consumable")?;
        let cell = StateCell::load(kv, state_key, ConsumableState::default).await?;

        let reset_on = block.reset_config();
        let subscription = {
            let cell = cell.clone();
            ctx.on_reset(move |event| {
                let configs = reset_on.as_deref();
                if !reset::should_reset_on_event(configs, &event.event_type) {
                    return Ok(());
                }
                let amount = event
                    .amount
                    .or_else(|| reset::get_reset_amount(configs, &event.event_type));
                debug!(
                    "Resetting consumable {} due to {} event (amount {:?})",
                    cell.state_key(),
                    event.event_type,
                    amount
                );
                cell.apply_reset(|state| state.reset(amount));
                Ok(())
            })
        };

        Ok(Self {
            block,
            cell,
            subscription,
        })
    }

    /// Mount every consumable of a `consumables` block.
    ///
    /// Fails on the first item without a `state_key`; items mounted before
    /// it are unloaded again.
    pub async fn mount_all(
        ctx: &FileContext,
        kv: Arc<KeyValueStore>,
        block: ConsumablesBlock,
    ) -> Result<Vec<Self>> {
        let mut widgets = Vec::with_capacity(block.items.len());
        for item in block.items {
            match Self::mount(ctx, kv.clone(), item).await {
                Ok(widget) => widgets.push(widget),
                Err(e) => {
                    widgets.iter().for_each(Self::unload);
                    return Err(e);
                }
            }
        }
        Ok(widgets)
    }

    pub fn block(&self) -> &ConsumableBlock {
        &self.block
    }

    pub fn state_key(&self) -> &str {
        self.cell.state_key()
    }

    pub fn state(&self) -> ConsumableState {
        self.cell.get()
    }

    /// Toggle the checkbox at `index`
    pub async fn toggle_use(&self, index: u32) -> Result<ConsumableState> {
        self.cell.update(|state| state.toggle(index)).await
    }

    pub async fn flush(&self) {
        self.cell.flush().await
    }

    pub fn unload(&self) {
        self.subscription.unsubscribe();
    }
}

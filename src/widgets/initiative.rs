use std::sync::Arc;
use tracing::debug;

use super::cell::{require_state_key, StateCell};
use crate::domains::initiative::{InitiativeBlock, InitiativeState};
use crate::error::Result;
use crate::events::{FileContext, Subscription};
use crate::storage::KeyValueStore;

/// A mounted `initiative` block
pub struct InitiativeWidget {
    block: Arc<InitiativeBlock>,
    cell: StateCell<InitiativeState>,
    subscription: Subscription,
}

impl InitiativeWidget {
    /// Load or initialize the encounter and listen for resets of its
    /// consumables
    pub async fn mount(ctx: &FileContext, kv: Arc<KeyValueStore>, block: InitiativeBlock) -> Result<Self> {
        let state_key = require_state_key(block.state_key.as_deref(), "initiative")?;
        let block = Arc::new(block);
        let cell = StateCell::load(kv, state_key, || InitiativeState::for_block(&block)).await?;

        let subscription = {
            let cell = cell.clone();
            let block = block.clone();
            ctx.on_reset(move |event| {
                let current = cell.get();
                if let Some(next) = current.apply_reset(&block, &event.event_type, event.amount) {
                    debug!(
                        "Resetting initiative consumables of {} due to {} event",
                        cell.state_key(),
                        event.event_type
                    );
                    cell.apply_reset(|_| next);
                }
                Ok(())
            })
        };

        Ok(Self {
            block,
            cell,
            subscription,
        })
    }

    pub fn block(&self) -> &InitiativeBlock {
        &self.block
    }

    pub fn state_key(&self) -> &str {
        self.cell.state_key()
    }

    pub fn state(&self) -> InitiativeState {
        self.cell.get()
    }

    pub async fn set_initiative(&self, name: &str, initiative: i64) -> Result<InitiativeState> {
        self.cell
            .update(|state| state.set_initiative(name, initiative))
            .await
    }

    pub async fn next_turn(&self) -> Result<InitiativeState> {
        self.cell.update(|state| state.next_turn(&self.block)).await
    }

    pub async fn prev_turn(&self) -> Result<InitiativeState> {
        self.cell.update(|state| state.prev_turn(&self.block)).await
    }

    pub async fn reset_encounter(&self) -> Result<InitiativeState> {
        self.cell
            .update(|state| state.reset_encounter(&self.block))
            .await
    }

    pub async fn damage(&self, name: &str, monster: &str, amount: i64) -> Result<InitiativeState> {
        self.cell
            .update(|state| state.damage(name, monster, amount))
            .await
    }

    pub async fn heal(&self, name: &str, monster: &str, amount: i64) -> Result<InitiativeState> {
        self.cell
            .update(|state| state.heal(&self.block, name, monster, amount))
            .await
    }

    pub async fn toggle_consumable(&self, state_key: &str, index: u32) -> Result<InitiativeState> {
        self.cell
            .update(|state| state.toggle_consumable(state_key, index))
            .await
    }

    pub async fn flush(&self) {
        self.cell.flush().await
    }

    pub fn unload(&self) {
        self.subscription.unsubscribe();
    }
}

use tracing::debug;

use crate::domains::event_buttons::{EventButtonItem, EventButtonsBlock};
use crate::events::FileContext;

/// A mounted `event-btns` block. Stateless: pressing a button publishes a
/// reset event to the document and every subscribed widget reacts.
#[derive(Debug, Clone)]
pub struct EventButtons {
    ctx: FileContext,
    block: EventButtonsBlock,
}

impl EventButtons {
    pub fn new(ctx: FileContext, block: EventButtonsBlock) -> Self {
        Self { ctx, block }
    }

    pub fn items(&self) -> &[EventButtonItem] {
        &self.block.items
    }

    /// Publish the reset event of `item` to the document of `ctx`.
    /// Returns the number of widgets that received it.
    pub fn press(ctx: &FileContext, item: &EventButtonItem) -> usize {
        let event = item.value.event();
        let amount = item.value.amount();
        debug!(
            "Button '{}' publishing {} (amount {:?}) to {}",
            item.name,
            event,
            amount,
            ctx.scope()
        );
        ctx.publish_reset(event, amount)
    }

    /// Press the button at `index`, `None` if there is no such button
    pub fn press_index(&self, index: usize) -> Option<usize> {
        self.block
            .items
            .get(index)
            .map(|item| Self::press(&self.ctx, item))
    }
}

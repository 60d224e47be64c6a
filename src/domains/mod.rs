//! Block definitions and persisted state for each widget kind
//!
//! Block definitions are parsed from the YAML inside a document's code
//! blocks. State types are what the widgets persist in the key-value store
//! under the block's `state_key`.

pub mod consumables;
pub mod event_buttons;
pub mod frontmatter;
pub mod health;
pub mod initiative;
pub mod template;

pub use consumables::{ConsumableBlock, ConsumableState, ConsumablesBlock};
pub use event_buttons::{EventButtonItem, EventButtonValue, EventButtonsBlock};
pub use frontmatter::Frontmatter;
pub use health::{HealthBlock, HealthState, HealthValue, HitDice};
pub use initiative::{InitiativeBlock, InitiativeConsumable, InitiativeHp, InitiativeItem, InitiativeState};

//! Limited-use resources: spell slots, ki points, potions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::health::toggle_tally;
use crate::error::Result;
use crate::reset::{self, ResetConfig};

/// One consumable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableBlock {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub state_key: Option<String>,
    /// Number of checkboxes
    #[serde(default = "default_uses")]
    pub uses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_on: Option<Value>,
}

fn default_label() -> String {
    "Consumable".to_string()
}

fn default_uses() -> u32 {
    3
}

impl Default for ConsumableBlock {
    fn default() -> Self {
        Self {
            label: default_label(),
            state_key: None,
            uses: default_uses(),
            reset_on: None,
        }
    }
}

impl ConsumableBlock {
    /// Parse a single consumable definition
    pub fn parse(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    /// Normalized reset configuration; `None` means the consumable never resets
    pub fn reset_config(&self) -> Option<Vec<ResetConfig>> {
        reset::normalize(self.reset_on.as_ref())
    }
}

/// A `consumables` block: several consumables rendered together
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsumablesBlock {
    pub items: Vec<ConsumableBlock>,
}

impl ConsumablesBlock {
    /// Parse either an `items` list or, for older notes, a single consumable
    pub fn parse(source: &str) -> Result<Self> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(source)?;
        if let Some(items) = parsed.get("items").filter(|items| items.is_sequence()) {
            let items: Vec<ConsumableBlock> = serde_yaml::from_value(items.clone())?;
            return Ok(Self { items });
        }
        Ok(Self {
            items: vec![ConsumableBlock::parse(source)?],
        })
    }
}

/// Persisted consumable state: the number of uses spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumableState {
    #[serde(default)]
    pub value: u32,
}

impl ConsumableState {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Toggle the checkbox at `index`
    pub fn toggle(&self, index: u32) -> Self {
        Self::new(toggle_tally(self.value, index))
    }

    /// Restore `amount` uses, or every use when no amount is given
    pub fn reset(&self, amount: Option<i64>) -> Self {
        match amount {
            Some(amount) => {
                let remaining = i64::from(self.value).saturating_sub(amount).max(0);
                Self::new(u32::try_from(remaining).unwrap_or(self.value))
            }
            None => Self::default(),
        }
    }
}

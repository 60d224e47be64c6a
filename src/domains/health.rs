//! Hit point tracking

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::frontmatter::Frontmatter;
use super::template::{has_template_variables, parse_integer, render_template};
use crate::error::Result;
use crate::reset::{self, ResetConfig};

/// Event that resets health when a block does not say otherwise
pub const DEFAULT_HEALTH_RESET_EVENT: &str = "long-rest";

/// Hit dice shown on a health card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDice {
    /// Die size, e.g. `d8`
    pub dice: String,
    /// Number of hit dice available
    pub value: u32,
}

/// Maximum hit points as written in a block: a number, or a template over
/// the document's frontmatter such as `"{{ frontmatter.level * 8 }}"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthValue {
    Fixed(i64),
    Template(String),
}

impl Default for HealthValue {
    fn default() -> Self {
        Self::Fixed(default_health())
    }
}

impl From<i64> for HealthValue {
    fn from(value: i64) -> Self {
        Self::Fixed(value)
    }
}

impl HealthValue {
    /// True if the value depends on frontmatter
    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template(text) if has_template_variables(text))
    }

    /// Maximum hit points for `frontmatter`.
    ///
    /// A template that fails to render or does not render a number falls
    /// back to the default maximum.
    pub fn resolve(&self, frontmatter: &Frontmatter) -> i64 {
        let text = match self {
            Self::Fixed(value) => return *value,
            Self::Template(text) => text,
        };
        match render_template(text, frontmatter) {
            Ok(rendered) => parse_integer(&rendered).unwrap_or_else(|| {
                warn!(
                    "Health template {:?} rendered {:?}, which is not a number",
                    text, rendered
                );
                default_health()
            }),
            Err(e) => {
                warn!("{}", e.developer_message());
                default_health()
            }
        }
    }
}

/// `healthpoints` block definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthBlock {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub state_key: Option<String>,
    /// Maximum hit points
    #[serde(default)]
    pub health: HealthValue,
    #[serde(default)]
    pub hitdice: Option<HitDice>,
    #[serde(default = "default_death_saves")]
    pub death_saves: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_on: Option<Value>,
}

fn default_label() -> String {
    "Hit Points".to_string()
}

fn default_health() -> i64 {
    6
}

fn default_death_saves() -> bool {
    true
}

impl Default for HealthBlock {
    fn default() -> Self {
        Self {
            label: default_label(),
            state_key: None,
            health: HealthValue::default(),
            hitdice: None,
            death_saves: default_death_saves(),
            reset_on: None,
        }
    }
}

impl HealthBlock {
    /// Parse a block definition. An empty block yields the defaults.
    pub fn parse(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    /// Maximum hit points given the document's current frontmatter
    pub fn max_health(&self, frontmatter: &Frontmatter) -> i64 {
        self.health.resolve(frontmatter)
    }

    /// Normalized reset configuration, `long-rest` when none is given
    pub fn reset_config(&self) -> Vec<ResetConfig> {
        reset::normalize(self.reset_on.as_ref())
            .unwrap_or_else(|| vec![ResetConfig::full(DEFAULT_HEALTH_RESET_EVENT)])
    }
}

/// Persisted health state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthState {
    pub current: i64,
    pub temporary: i64,
    pub hitdice_used: u32,
    pub death_save_successes: u32,
    pub death_save_failures: u32,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::full(default_health())
    }
}

impl HealthState {
    /// Full health with nothing spent
    pub fn full(max_health: i64) -> Self {
        Self {
            current: max_health,
            temporary: 0,
            hitdice_used: 0,
            death_save_successes: 0,
            death_save_failures: 0,
        }
    }

    /// Initial state for a block in a document with `frontmatter`
    pub fn for_block(block: &HealthBlock, frontmatter: &Frontmatter) -> Self {
        Self::full(block.max_health(frontmatter))
    }

    /// Heal up to `max_health`. Coming back from 0 clears death saves.
    pub fn heal(&self, amount: i64, max_health: i64) -> Self {
        if amount <= 0 {
            return self.clone();
        }
        let current = self.current.saturating_add(amount).min(max_health);
        let mut next = Self {
            current,
            ..self.clone()
        };
        if current > 0 && self.current <= 0 {
            next.death_save_successes = 0;
            next.death_save_failures = 0;
        }
        next
    }

    /// Take damage, spending temporary hit points first
    pub fn damage(&self, amount: i64) -> Self {
        if amount <= 0 {
            return self.clone();
        }
        let absorbed = amount.min(self.temporary);
        let remaining = amount.saturating_sub(absorbed);
        Self {
            temporary: self.temporary.saturating_sub(absorbed),
            current: self.current.saturating_sub(remaining).max(0),
            ..self.clone()
        }
    }

    /// Grant temporary hit points. They do not stack; the higher value wins.
    pub fn add_temporary(&self, amount: i64) -> Self {
        if amount <= 0 {
            return self.clone();
        }
        Self {
            temporary: self.temporary.max(amount),
            ..self.clone()
        }
    }

    /// Toggle the hit die at `index`, checking or unchecking everything before it
    pub fn toggle_hit_die(&self, index: u32) -> Self {
        Self {
            hitdice_used: toggle_tally(self.hitdice_used, index),
            ..self.clone()
        }
    }

    /// Toggle a death save success or failure box
    pub fn toggle_death_save(&self, success: bool, index: u32) -> Self {
        let mut next = self.clone();
        if success {
            next.death_save_successes = toggle_tally(self.death_save_successes, index);
        } else {
            next.death_save_failures = toggle_tally(self.death_save_failures, index);
        }
        next
    }
}

/// Checkbox row semantics shared by hit dice, death saves and consumables:
/// clicking a checked box unchecks it and everything after it, clicking an
/// unchecked one checks it and everything before it.
pub(crate) fn toggle_tally(used: u32, index: u32) -> u32 {
    if index < used {
        index
    } else {
        index.saturating_add(1)
    }
}

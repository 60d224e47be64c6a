//! Buttons that fire reset events for their document

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, Result, ToolkitError};

/// What a button publishes: a bare event name, or an event with an amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventButtonValue {
    Event(String),
    Configured {
        event: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<i64>,
    },
}

impl EventButtonValue {
    pub fn event(&self) -> &str {
        match self {
            Self::Event(event) => event,
            Self::Configured { event, .. } => event,
        }
    }

    pub fn amount(&self) -> Option<i64> {
        match self {
            Self::Event(_) => None,
            Self::Configured { amount, .. } => *amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventButtonItem {
    pub name: String,
    pub value: EventButtonValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventButtonsBlock {
    pub items: Vec<EventButtonItem>,
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    value: Option<EventButtonValue>,
}

fn default_name() -> String {
    "Unnamed Button".to_string()
}

impl EventButtonsBlock {
    /// Parse an `event-btns` block. The block must have an `items` list and
    /// every item needs a non-empty `value`.
    pub fn parse(source: &str) -> Result<Self> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(source)?;
        let Some(items) = parsed.get("items").filter(|items| items.is_sequence()) else {
            return Err(ToolkitError::missing_field(
                "items",
                "Event buttons block must contain an 'items' array",
            ));
        };

        let raw: Vec<RawItem> = serde_yaml::from_value(items.clone())?;
        let items = raw
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item.value {
                Some(value) if !value.event().is_empty() => Ok(EventButtonItem {
                    name: item.name,
                    value,
                }),
                _ => Err(ToolkitError::config_with_code(
                    ErrorCode::CONFIG_MISSING_REQUIRED,
                    format!("Event button item at index {index} must contain a 'value' property"),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { items })
    }
}

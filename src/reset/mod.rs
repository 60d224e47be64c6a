//! Reset configuration
//!
//! Block definitions describe when a stateful widget resets with a `reset_on`
//! field that authors write in one of three shapes:
//!
//! ```yaml
//! reset_on: long-rest
//! reset_on: [short-rest, long-rest]
//! reset_on:
//!   - event: short-rest
//!     amount: 1
//!   - event: long-rest
//! ```
//!
//! [`normalize`] turns all of them into one ordered list of [`ResetConfig`]
//! records. Duplicates are kept; lookups use the first matching record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One reset trigger: an event name and an optional partial amount.
///
/// Without an amount a matching event resets the resource completely. With
/// one, only that much is restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetConfig {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

impl ResetConfig {
    /// A full reset on `event`
    pub fn full(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            amount: None,
        }
    }

    /// A partial reset restoring `amount` on `event`
    pub fn partial(event: impl Into<String>, amount: i64) -> Self {
        Self {
            event: event.into(),
            amount: Some(amount),
        }
    }
}

/// Normalize a user-supplied `reset_on` value.
///
/// Returns `None` when nothing is configured or the value has an unsupported
/// shape. Only the first element of an object list is checked for an `event`
/// key; later elements without one are dropped.
pub fn normalize(input: Option<&Value>) -> Option<Vec<ResetConfig>> {
    match input? {
        Value::String(event) if !event.is_empty() => Some(vec![ResetConfig::full(event.clone())]),
        Value::Array(items) => normalize_list(items),
        _ => None,
    }
}

fn normalize_list(items: &[Value]) -> Option<Vec<ResetConfig>> {
    match items.first() {
        None => Some(Vec::new()),
        Some(Value::String(_)) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(event) => Some(ResetConfig::full(event.clone())),
                    other => {
                        debug!("Skipping non-string reset event {}", other);
                        None
                    }
                })
                .collect(),
        ),
        Some(Value::Object(first)) if first.contains_key("event") => {
            Some(items.iter().filter_map(config_from_object).collect())
        }
        _ => None,
    }
}

fn config_from_object(item: &Value) -> Option<ResetConfig> {
    let Some(event) = item.get("event").and_then(Value::as_str) else {
        debug!("Skipping reset entry without an event name: {}", item);
        return None;
    };
    let amount = item.get("amount").and_then(|amount| {
        amount.as_i64().or_else(|| {
            amount.as_f64().map(|f| {
                warn!("Reset amount {} for {} truncated to {}", f, event, f.trunc());
                f.trunc() as i64
            })
        })
    });
    Some(ResetConfig {
        event: event.to_string(),
        amount,
    })
}

/// True if any record in `configs` is for `event_type`
pub fn should_reset_on_event(configs: Option<&[ResetConfig]>, event_type: &str) -> bool {
    configs
        .unwrap_or_default()
        .iter()
        .any(|config| config.event == event_type)
}

/// Amount of the first record for `event_type`.
///
/// `None` either when no record matches or when the first match is a full
/// reset; callers check [`should_reset_on_event`] to tell the two apart.
pub fn get_reset_amount(configs: Option<&[ResetConfig]>, event_type: &str) -> Option<i64> {
    configs
        .unwrap_or_default()
        .iter()
        .find(|config| config.event == event_type)
        .and_then(|config| config.amount)
}

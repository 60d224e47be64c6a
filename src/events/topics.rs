//! Event topics and their payloads

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domains::frontmatter::Frontmatter;

/// Category of event delivered on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    /// A stateful widget should restore some or all of a resource
    Reset,
    /// The document's frontmatter changed
    FrontmatterChanged,
    /// Ability scores were recalculated; dependents recompute derived values
    AbilitiesChanged,
}

impl Topic {
    /// Wire name of the topic
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Reset => "reset",
            Topic::FrontmatterChanged => "fm:changed",
            Topic::AbilitiesChanged => "abilities:changed",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reset request published by event buttons and consumed by stateful widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetEvent {
    /// Document the event was fired from
    pub file_path: String,
    /// Semantic trigger such as `short-rest`, `long-rest` or `round`
    pub event_type: String,
    /// Partial amount; `None` requests a full reset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

impl ResetEvent {
    pub fn new(file_path: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            event_type: event_type.into(),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// An event on the bus. Each variant carries the payload of one topic.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    Reset(ResetEvent),
    FrontmatterChanged(Frontmatter),
    AbilitiesChanged,
}

impl BusEvent {
    /// Topic this event is delivered on
    pub fn topic(&self) -> Topic {
        match self {
            BusEvent::Reset(_) => Topic::Reset,
            BusEvent::FrontmatterChanged(_) => Topic::FrontmatterChanged,
            BusEvent::AbilitiesChanged => Topic::AbilitiesChanged,
        }
    }
}

impl From<ResetEvent> for BusEvent {
    fn from(event: ResetEvent) -> Self {
        BusEvent::Reset(event)
    }
}

impl From<Frontmatter> for BusEvent {
    fn from(fm: Frontmatter) -> Self {
        BusEvent::FrontmatterChanged(fm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_topic_wire_names() {
        assert_eq!(Topic::Reset.to_string(), "reset");
        assert_eq!(Topic::FrontmatterChanged.to_string(), "fm:changed");
        assert_eq!(Topic::AbilitiesChanged.to_string(), "abilities:changed");
    }

    #[test]
    fn test_event_topics() {
        assert_eq!(BusEvent::from(ResetEvent::new("a.md", "long-rest")).topic(), Topic::Reset);
        assert_eq!(
            BusEvent::from(Frontmatter::default()).topic(),
            Topic::FrontmatterChanged
        );
        assert_eq!(BusEvent::AbilitiesChanged.topic(), Topic::AbilitiesChanged);
    }

    #[test]
    fn test_reset_event_wire_shape() {
        let event = ResetEvent::new("Characters/Tordek.md", "short-rest").with_amount(1);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"filePath": "Characters/Tordek.md", "eventType": "short-rest", "amount": 1})
        );

        let full: ResetEvent =
            serde_json::from_value(json!({"filePath": "a.md", "eventType": "long-rest"})).unwrap();
        assert_eq!(full.amount, None);
    }
}

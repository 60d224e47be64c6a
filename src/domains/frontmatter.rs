//! Document frontmatter as seen by widgets

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const PROFICIENCY_BONUS_KEYS: &[&str] = &["proficiencyBonus", "Proficiency Bonus", "proficiency_bonus"];
const LEVEL_KEYS: &[&str] = &["level", "Level"];

/// Frontmatter of a character document, with the well-known keys resolved
/// from their aliases and everything else carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub proficiency_bonus: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            proficiency_bonus: 2,
            level: None,
            extra: Map::new(),
        }
    }
}

impl Frontmatter {
    /// Build frontmatter from an arbitrary mapping.
    ///
    /// Numeric strings are coerced. Without an explicit proficiency bonus
    /// one is derived from `level`.
    pub fn from_value(fm: &Value) -> Self {
        let Some(map) = fm.as_object() else {
            return Self::default();
        };

        let mut frontmatter = Self::default();
        if let Some(bonus) = lookup_number(map, PROFICIENCY_BONUS_KEYS) {
            frontmatter.proficiency_bonus = bonus;
        }
        frontmatter.level = lookup_number(map, LEVEL_KEYS);

        if !has_proficiency_bonus(map) {
            if let Some(level) = frontmatter.level {
                frontmatter.proficiency_bonus = level_to_proficiency_bonus(level);
            }
        }

        frontmatter.extra = map
            .iter()
            .filter(|(key, _)| key.as_str() != "proficiency_bonus" && key.as_str() != "level")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        frontmatter
    }

    /// Look up an untyped frontmatter key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// First alias present in `map`, trying each alias as written and then
/// lowercased
fn lookup_alias<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        map.get(*alias)
            .or_else(|| map.get(&alias.to_lowercase()))
    })
}

fn lookup_number(map: &Map<String, Value>, aliases: &[&str]) -> Option<i64> {
    match lookup_alias(map, aliases)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

fn has_proficiency_bonus(map: &Map<String, Value>) -> bool {
    PROFICIENCY_BONUS_KEYS.iter().any(|alias| {
        [alias.to_string(), alias.to_lowercase()]
            .iter()
            .any(|key| map.get(key).is_some_and(|v| !v.is_null()))
    })
}

/// Proficiency bonus for a character level
pub fn level_to_proficiency_bonus(level: i64) -> i64 {
    match level {
        l if l >= 17 => 6,
        l if l >= 13 => 5,
        l if l >= 9 => 4,
        l if l >= 5 => 3,
        _ => 2,
    }
}

//! Combat initiative tracking
//!
//! Per-combatant values in [`InitiativeState`] are keyed by combatant name,
//! so reordering the block does not shuffle saved initiatives or hit points.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::consumables::ConsumableState;
use super::health::toggle_tally;
use crate::error::Result;
use crate::reset::{self, ResetConfig};

/// Event published when a new combat round starts
pub const ROUND_EVENT: &str = "round";

/// Key used for a combatant that has a single hit point pool
pub const MAIN_HP_KEY: &str = "main";

/// Hit points of a combatant: one creature, or a named group of creatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitiativeHp {
    Single(i64),
    Group(BTreeMap<String, i64>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<InitiativeHp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl InitiativeItem {
    /// Full hit points for every creature of this combatant
    pub fn full_hp(&self) -> BTreeMap<String, i64> {
        match &self.hp {
            Some(InitiativeHp::Single(hp)) => BTreeMap::from([(MAIN_HP_KEY.to_string(), *hp)]),
            Some(InitiativeHp::Group(group)) => group.clone(),
            None => BTreeMap::new(),
        }
    }

    /// Maximum hit points of one creature, 0 when unknown
    pub fn max_hp(&self, monster: &str) -> i64 {
        match &self.hp {
            Some(InitiativeHp::Single(hp)) => *hp,
            Some(InitiativeHp::Group(group)) => match group.get(monster) {
                Some(hp) => *hp,
                None if group.len() == 1 => group.values().next().copied().unwrap_or(0),
                None => 0,
            },
            None => 0,
        }
    }
}

/// A resource tracked by the initiative card, e.g. legendary actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeConsumable {
    pub label: String,
    pub state_key: String,
    pub uses: u32,
    #[serde(default)]
    pub reset_on_round: bool,
}

impl InitiativeConsumable {
    pub fn reset_config(&self) -> Option<Vec<ResetConfig>> {
        self.reset_on_round.then(|| vec![ResetConfig::full(ROUND_EVENT)])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitiativeBlock {
    #[serde(default)]
    pub state_key: Option<String>,
    #[serde(default)]
    pub items: Vec<InitiativeItem>,
    #[serde(default)]
    pub consumables: Vec<InitiativeConsumable>,
}

impl InitiativeBlock {
    pub fn parse(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    fn item(&self, name: &str) -> Option<&InitiativeItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

/// A combatant in turn order
#[derive(Debug, Clone, PartialEq)]
pub struct TurnEntry<'a> {
    /// Position in the block's `items`
    pub index: usize,
    pub initiative: i64,
    pub item: &'a InitiativeItem,
}

/// Persisted initiative state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitiativeState {
    /// Block index of the active combatant, -1 before combat starts
    pub active_index: i64,
    pub initiatives: BTreeMap<String, i64>,
    pub hp: BTreeMap<String, BTreeMap<String, i64>>,
    pub round: u32,
    pub consumables: BTreeMap<String, u32>,
}

impl Default for InitiativeState {
    fn default() -> Self {
        Self {
            active_index: -1,
            initiatives: BTreeMap::new(),
            hp: BTreeMap::new(),
            round: 1,
            consumables: BTreeMap::new(),
        }
    }
}

impl InitiativeState {
    /// Fresh encounter: no initiatives rolled, everyone at full health
    pub fn for_block(block: &InitiativeBlock) -> Self {
        Self::default().reset_encounter(block)
    }

    /// Combatants ordered by initiative, highest first. Ties keep block order.
    pub fn turn_order<'a>(&self, block: &'a InitiativeBlock) -> Vec<TurnEntry<'a>> {
        let mut entries: Vec<TurnEntry<'a>> = block
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| TurnEntry {
                index,
                initiative: self.initiatives.get(&item.name).copied().unwrap_or(0),
                item,
            })
            .collect();
        entries.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        entries
    }

    fn active_position(&self, order: &[TurnEntry<'_>]) -> Option<usize> {
        order
            .iter()
            .position(|entry| entry.index as i64 == self.active_index)
    }

    pub fn set_initiative(&self, name: &str, initiative: i64) -> Self {
        let mut next = self.clone();
        next.initiatives.insert(name.to_string(), initiative);
        next
    }

    /// Advance to the next combatant. Wrapping around starts a new round and
    /// resets consumables that reset every round.
    pub fn next_turn(&self, block: &InitiativeBlock) -> Self {
        let order = self.turn_order(block);
        let Some(first) = order.first() else {
            return self.clone();
        };

        let mut next = self.clone();
        match self.active_position(&order) {
            Some(pos) if pos + 1 < order.len() => {
                next.active_index = order[pos + 1].index as i64;
            }
            Some(_) => {
                next.active_index = first.index as i64;
                next.round = self.round.saturating_add(1);
                next = next.apply_reset(block, ROUND_EVENT, None).unwrap_or(next);
            }
            None => next.active_index = first.index as i64,
        }
        next
    }

    /// Step back to the previous combatant. Wrapping around goes back one
    /// round, never below round 1.
    pub fn prev_turn(&self, block: &InitiativeBlock) -> Self {
        let order = self.turn_order(block);
        let Some(last) = order.last() else {
            return self.clone();
        };

        let mut next = self.clone();
        match self.active_position(&order) {
            Some(pos) if pos > 0 => {
                next.active_index = order[pos - 1].index as i64;
            }
            Some(_) => {
                next.active_index = last.index as i64;
                next.round = self.round.saturating_sub(1).max(1);
            }
            None => next.active_index = last.index as i64,
        }
        next
    }

    /// Start over: round 1, nobody active, initiatives cleared, full health,
    /// every consumable unused
    pub fn reset_encounter(&self, block: &InitiativeBlock) -> Self {
        let mut next = Self {
            active_index: -1,
            round: 1,
            initiatives: self.initiatives.clone(),
            hp: BTreeMap::new(),
            consumables: BTreeMap::new(),
        };
        for item in &block.items {
            next.initiatives.insert(item.name.clone(), 0);
            next.hp.insert(item.name.clone(), item.full_hp());
        }
        for consumable in &block.consumables {
            next.consumables.insert(consumable.state_key.clone(), 0);
        }
        next
    }

    /// Damage one creature of a combatant, not below 0
    pub fn damage(&self, name: &str, monster: &str, amount: i64) -> Self {
        if amount <= 0 {
            return self.clone();
        }
        let mut next = self.clone();
        let pool = next.hp.entry(name.to_string()).or_default();
        let current = pool.get(monster).copied().unwrap_or(0);
        pool.insert(monster.to_string(), current.saturating_sub(amount).max(0));
        next
    }

    /// Heal one creature of a combatant, up to its maximum
    pub fn heal(&self, block: &InitiativeBlock, name: &str, monster: &str, amount: i64) -> Self {
        if amount <= 0 {
            return self.clone();
        }
        let max = block.item(name).map(|item| item.max_hp(monster)).unwrap_or(0);
        let mut next = self.clone();
        let pool = next.hp.entry(name.to_string()).or_default();
        let current = pool.get(monster).copied().unwrap_or(0);
        pool.insert(monster.to_string(), current.saturating_add(amount).min(max));
        next
    }

    pub fn toggle_consumable(&self, state_key: &str, index: u32) -> Self {
        let mut next = self.clone();
        let used = next.consumables.entry(state_key.to_string()).or_insert(0);
        *used = toggle_tally(*used, index);
        next
    }

    /// Reset the encounter's consumables configured for `event_type`.
    /// Returns `None` when none of them is.
    pub fn apply_reset(
        &self,
        block: &InitiativeBlock,
        event_type: &str,
        amount: Option<i64>,
    ) -> Option<Self> {
        let mut next = self.clone();
        let mut matched = false;
        for consumable in &block.consumables {
            let configs = consumable.reset_config();
            if !reset::should_reset_on_event(configs.as_deref(), event_type) {
                continue;
            }
            matched = true;
            let amount = amount.or_else(|| reset::get_reset_amount(configs.as_deref(), event_type));
            let used = next.consumables.entry(consumable.state_key.clone()).or_insert(0);
            *used = ConsumableState::new(*used).reset(amount).value;
        }
        matched.then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"
state_key: goblin_ambush
items:
  - name: Tordek
    ac: 18
    hp: 30
  - name: Goblins
    ac: 15
    hp:
      goblin_1: 7
      goblin_2: 7
  - name: Lidda
consumables:
  - label: Legendary Actions
    state_key: legendary
    uses: 3
    reset_on_round: true
  - label: Lair Action
    state_key: lair
    uses: 1
"#;

    fn block() -> InitiativeBlock {
        InitiativeBlock::parse(BLOCK).unwrap()
    }

    fn rolled(block: &InitiativeBlock) -> InitiativeState {
        InitiativeState::for_block(block)
            .set_initiative("Tordek", 12)
            .set_initiative("Goblins", 17)
            .set_initiative("Lidda", 12)
    }

    #[test]
    fn test_parse_and_default_state() {
        let block = block();
        assert_eq!(block.items.len(), 3);
        assert_eq!(block.items[1].hp.as_ref().map(|_| ()), Some(()));
        assert!(block.consumables[0].reset_on_round);
        assert!(!block.consumables[1].reset_on_round);

        let state = InitiativeState::for_block(&block);
        assert_eq!(state.active_index, -1);
        assert_eq!(state.round, 1);
        assert_eq!(state.initiatives.get("Tordek"), Some(&0));
        assert_eq!(state.hp["Tordek"], BTreeMap::from([("main".to_string(), 30)]));
        assert_eq!(state.hp["Goblins"].len(), 2);
        assert!(state.hp["Lidda"].is_empty());
        assert_eq!(state.consumables.get("legendary"), Some(&0));
    }

    #[test]
    fn test_turn_order_is_stable() {
        let block = block();
        let state = rolled(&block);
        let order: Vec<usize> = state.turn_order(&block).iter().map(|e| e.index).collect();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_next_turn_wraps_into_new_round() {
        let block = block();
        let state = rolled(&block).toggle_consumable("legendary", 1).toggle_consumable("lair", 0);

        let first = state.next_turn(&block);
        assert_eq!(first.active_index, 1);
        assert_eq!(first.round, 1);

        let last = first.next_turn(&block).next_turn(&block);
        assert_eq!(last.active_index, 2);
        assert_eq!(last.consumables["legendary"], 2);

        let wrapped = last.next_turn(&block);
        assert_eq!(wrapped.active_index, 1);
        assert_eq!(wrapped.round, 2);
        assert_eq!(wrapped.consumables["legendary"], 0);
        assert_eq!(wrapped.consumables["lair"], 1);
    }

    #[test]
    fn test_prev_turn_never_goes_below_round_one() {
        let block = block();
        let state = rolled(&block);

        let from_start = state.prev_turn(&block);
        assert_eq!(from_start.active_index, 2);
        assert_eq!(from_start.round, 1);

        let first = state.next_turn(&block);
        let wrapped = first.prev_turn(&block);
        assert_eq!(wrapped.active_index, 2);
        assert_eq!(wrapped.round, 1);

        let round_two = InitiativeState { round: 2, ..first };
        assert_eq!(round_two.prev_turn(&block).round, 1);
    }

    #[test]
    fn test_turns_without_combatants_do_nothing() {
        let block = InitiativeBlock::default();
        let state = InitiativeState::for_block(&block);
        assert_eq!(state.next_turn(&block), state);
        assert_eq!(state.prev_turn(&block), state);
    }

    #[test]
    fn test_damage_and_heal_per_creature() {
        let block = block();
        let state = InitiativeState::for_block(&block);

        let hurt = state.damage("Goblins", "goblin_2", 10);
        assert_eq!(hurt.hp["Goblins"]["goblin_2"], 0);
        assert_eq!(hurt.hp["Goblins"]["goblin_1"], 7);

        let healed = hurt.heal(&block, "Goblins", "goblin_2", 20);
        assert_eq!(healed.hp["Goblins"]["goblin_2"], 7);

        let tordek = state.damage("Tordek", MAIN_HP_KEY, 12).heal(&block, "Tordek", MAIN_HP_KEY, 5);
        assert_eq!(tordek.hp["Tordek"]["main"], 23);
        assert_eq!(tordek.damage("Tordek", MAIN_HP_KEY, -3), tordek);
    }

    #[test]
    fn test_extreme_damage_and_heal_saturate() {
        let block = block();
        let state = InitiativeState::for_block(&block);

        let dead = state.damage("Tordek", MAIN_HP_KEY, i64::MAX);
        assert_eq!(dead.hp["Tordek"]["main"], 0);
        assert_eq!(dead.heal(&block, "Tordek", MAIN_HP_KEY, i64::MAX).hp["Tordek"]["main"], 30);

        let last_round = InitiativeState {
            round: u32::MAX,
            ..rolled(&block)
        };
        let mut wrapped = last_round.clone();
        for _ in 0..=block.items.len() {
            wrapped = wrapped.next_turn(&block);
        }
        assert_eq!(wrapped.round, u32::MAX);
    }

    #[test]
    fn test_reset_encounter() {
        let block = block();
        let messy = rolled(&block)
            .next_turn(&block)
            .damage("Tordek", MAIN_HP_KEY, 9)
            .toggle_consumable("lair", 0);
        let fresh = messy.reset_encounter(&block);
        assert_eq!(fresh, InitiativeState::for_block(&block));
    }

    #[test]
    fn test_apply_reset_only_touches_round_consumables() {
        let block = block();
        let state = InitiativeState::for_block(&block)
            .toggle_consumable("legendary", 2)
            .toggle_consumable("lair", 0);

        assert_eq!(state.apply_reset(&block, "long-rest", None), None);
        let reset = state.apply_reset(&block, ROUND_EVENT, Some(1)).unwrap();
        assert_eq!(reset.consumables["legendary"], 2);
        assert_eq!(reset.consumables["lair"], 1);
    }
}

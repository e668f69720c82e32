//! Normalized Dock State
//!
//! The persisted snapshot: theme, stacks and the flat card list.
//! Every snapshot handed out by the store satisfies the ownership invariant:
//! a card's `stack_id` names exactly one stack and that stack's `card_ids`
//! lists the card exactly once.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::{Card, CardId, Entity, Stack, StackId, Theme};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockState {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub stacks: Vec<Stack>,
    #[serde(default)]
    pub all_cards: Vec<Card>,
}

/// What `repair` had to fix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub duplicate_stacks: usize,
    pub duplicate_cards: usize,
    pub orphan_cards: usize,
    pub dangling_refs: usize,
    pub relinked_cards: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == RepairReport::default()
    }
}

impl std::fmt::Display for RepairReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} duplicate stacks, {} duplicate cards, {} orphan cards, {} dangling refs, {} relinked cards",
            self.duplicate_stacks,
            self.duplicate_cards,
            self.orphan_cards,
            self.dangling_refs,
            self.relinked_cards
        )
    }
}

fn find<'a, T: Entity>(items: &'a [T], id: &T::Id) -> Option<&'a T> {
    items.iter().find(|e| e.id() == id)
}

fn find_mut<'a, T: Entity>(items: &'a mut [T], id: &T::Id) -> Option<&'a mut T> {
    items.iter_mut().find(|e| e.id() == id)
}

impl DockState {
    pub fn stack(&self, id: &StackId) -> Option<&Stack> {
        find(&self.stacks, id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        find(&self.all_cards, id)
    }

    pub(crate) fn stack_mut(&mut self, id: &StackId) -> Option<&mut Stack> {
        find_mut(&mut self.stacks, id)
    }

    pub(crate) fn card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        find_mut(&mut self.all_cards, id)
    }

    /// Cards of a stack in persisted order; ids without a card are skipped
    pub fn cards_in(&self, stack_id: &StackId) -> Vec<&Card> {
        let Some(stack) = self.stack(stack_id) else {
            return Vec::new();
        };
        let by_id: HashMap<&CardId, &Card> = self.all_cards.iter().map(|c| (&c.id, c)).collect();
        stack
            .card_ids
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect()
    }

    /// Describe every ownership violation; empty means the state is consistent
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut stack_ids = HashSet::new();
        for stack in &self.stacks {
            if !stack_ids.insert(&stack.id) {
                problems.push(format!("stack {} appears more than once", stack.id));
            }
        }

        let mut cards: HashMap<&CardId, &Card> = HashMap::new();
        for card in &self.all_cards {
            if cards.insert(&card.id, card).is_some() {
                problems.push(format!("card {} appears more than once", card.id));
            }
        }

        let mut listed: HashMap<&CardId, usize> = HashMap::new();
        for stack in &self.stacks {
            for card_id in &stack.card_ids {
                *listed.entry(card_id).or_default() += 1;
                match cards.get(card_id) {
                    None => problems.push(format!("stack {} lists missing card {}", stack.id, card_id)),
                    Some(card) if card.stack_id != stack.id => problems.push(format!(
                        "stack {} lists card {} owned by {}",
                        stack.id, card_id, card.stack_id
                    )),
                    Some(_) => {}
                }
            }
        }

        for card in &self.all_cards {
            if !stack_ids.contains(&card.stack_id) {
                problems.push(format!("card {} references missing stack {}", card.id, card.stack_id));
            }
            match listed.get(&card.id).copied().unwrap_or(0) {
                0 => problems.push(format!("card {} is not listed by any stack", card.id)),
                1 => {}
                n => problems.push(format!("card {} is listed {} times", card.id, n)),
            }
        }

        problems
    }

    pub fn is_consistent(&self) -> bool {
        self.integrity_violations().is_empty()
    }

    /// Rebuild a consistent state, dropping or relinking whatever breaks ownership
    pub fn repair(self) -> (DockState, RepairReport) {
        let mut report = RepairReport::default();
        let DockState { theme, stacks, all_cards } = self;

        let mut seen_stacks = HashSet::new();
        let mut stacks: Vec<Stack> = stacks
            .into_iter()
            .filter(|s| {
                let fresh = seen_stacks.insert(s.id.clone());
                if !fresh {
                    report.duplicate_stacks += 1;
                }
                fresh
            })
            .collect();

        let mut seen_cards = HashSet::new();
        let all_cards: Vec<Card> = all_cards
            .into_iter()
            .filter(|c| {
                if !seen_cards.insert(c.id.clone()) {
                    report.duplicate_cards += 1;
                    return false;
                }
                if !seen_stacks.contains(&c.stack_id) {
                    report.orphan_cards += 1;
                    return false;
                }
                true
            })
            .collect();

        let owner: HashMap<&CardId, &StackId> = all_cards.iter().map(|c| (&c.id, &c.stack_id)).collect();
        for stack in &mut stacks {
            let mut kept = HashSet::new();
            let before = stack.card_ids.len();
            stack
                .card_ids
                .retain(|id| owner.get(id) == Some(&&stack.id) && kept.insert(id.clone()));
            report.dangling_refs += before - stack.card_ids.len();
        }

        for card in &all_cards {
            if let Some(stack) = stacks.iter_mut().find(|s| s.id == card.stack_id) {
                if !stack.card_ids.contains(&card.id) {
                    stack.card_ids.push(card.id.clone());
                    report.relinked_cards += 1;
                }
            }
        }

        (DockState { theme, stacks, all_cards }, report)
    }
}

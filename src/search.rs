//! Dock Search
//!
//! Case-insensitive substring search over stack titles and card
//! titles/descriptions.

use crate::domain::{Card, Stack};
use crate::state::DockState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults<'a> {
    pub stacks: Vec<&'a Stack>,
    pub cards: Vec<&'a Card>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty() && self.cards.is_empty()
    }
}

pub fn search<'a>(state: &'a DockState, query: &str) -> SearchResults<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    SearchResults {
        stacks: state.stacks.iter().filter(|s| hit(&s.title)).collect(),
        cards: state
            .all_cards
            .iter()
            .filter(|c| hit(&c.title) || c.description.as_deref().is_some_and(hit))
            .collect(),
    }
}

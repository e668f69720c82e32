//! Deck Projector
//!
//! Keeps the visible order of the active stack's deck. Persisted changes
//! (cards added, removed, moved, or a different stack selected) resync the
//! order from the stack's `card_ids`; swipe cycling only rotates the local
//! copy and survives re-renders until the source changes.

use crate::domain::{Card, CardId, StackId};
use crate::gesture::CycleDirection;
use crate::state::DockState;

/// Default number of cards actually rendered from the front of the deck
pub const DEFAULT_DISPLAY_DEPTH: usize = 3;

/// Deepest deck the layered rendering supports
pub const MAX_DISPLAY_DEPTH: usize = 4;

/// One rendered card, `depth` 0 is the draggable top card
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCard<'a> {
    pub card: &'a Card,
    pub depth: usize,
    pub is_top: bool,
}

#[derive(Debug, Clone)]
pub struct DeckProjector {
    /// Active stack and its resolved persisted order at last sync
    source: Option<(StackId, Vec<CardId>)>,
    visible: Vec<CardId>,
    display_depth: usize,
}

impl Default for DeckProjector {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_DEPTH)
    }
}

impl DeckProjector {
    /// Depth is clamped to `DEFAULT_DISPLAY_DEPTH..=MAX_DISPLAY_DEPTH`
    pub fn new(display_depth: usize) -> Self {
        Self {
            source: None,
            visible: Vec::new(),
            display_depth: display_depth.clamp(DEFAULT_DISPLAY_DEPTH, MAX_DISPLAY_DEPTH),
        }
    }

    /// Persisted order of `stack_id`, skipping ids whose card is gone
    fn source_order(state: &DockState, stack_id: &StackId) -> Vec<CardId> {
        state.cards_in(stack_id).into_iter().map(|c| c.id.clone()).collect()
    }

    /// Bring the deck in line with the latest snapshot.
    ///
    /// Returns true when the source changed and the transient order was dropped.
    pub fn sync(&mut self, state: &DockState, active: Option<&StackId>) -> bool {
        let next = active.map(|id| (id.clone(), Self::source_order(state, id)));
        if next == self.source {
            return false;
        }
        self.visible = next.as_ref().map(|(_, ids)| ids.clone()).unwrap_or_default();
        self.source = next;
        true
    }

    pub fn active_stack(&self) -> Option<&StackId> {
        self.source.as_ref().map(|(id, _)| id)
    }

    pub fn visible(&self) -> &[CardId] {
        &self.visible
    }

    pub fn top(&self) -> Option<&CardId> {
        self.visible.first()
    }

    /// Only the top card accepts pointer input
    pub fn is_draggable(&self, card_id: &CardId) -> bool {
        self.top() == Some(card_id)
    }

    pub fn cycle(&mut self, direction: CycleDirection) {
        if self.visible.len() < 2 {
            return;
        }
        match direction {
            CycleDirection::Forward => self.visible.rotate_left(1),
            CycleDirection::Backward => self.visible.rotate_right(1),
        }
    }

    /// Front of the deck resolved against `state`, capped at the display depth
    pub fn rendered<'a>(&self, state: &'a DockState) -> Vec<RenderedCard<'a>> {
        self.visible
            .iter()
            .filter_map(|id| state.card(id))
            .take(self.display_depth)
            .enumerate()
            .map(|(depth, card)| RenderedCard {
                card,
                depth,
                is_top: depth == 0,
            })
            .collect()
    }
}

//! Gesture Interpreter
//!
//! Turns one drag of the top deck card into exactly one action:
//! `Idle -> Dragging -> Resolved(Move | Delete | Dismiss | Reorder | Cancelled)`.
//!
//! Precedence at release, first match wins:
//! 1. a drop target other than the card's own stack is hovered: Move
//! 2. `dy < -150`: Delete
//! 3. `dy > 150`: Dismiss
//! 4. `dx < -100`: cycle forward
//! 5. `dx > 100`: cycle backward
//! 6. otherwise Cancelled

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, DomainError, DomainResult, StackId};
use crate::dropzone::{DropTargetRegistry, Point};

/// Vertical travel that deletes (upward) or dismisses (downward)
pub const VERTICAL_THRESHOLD: f64 = 150.0;
/// Horizontal travel that cycles the deck
pub const HORIZONTAL_THRESHOLD: f64 = 100.0;

/// Drag displacement from the press point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn between(from: Point, to: Point) -> Self {
        Self {
            dx: to.x - from.x,
            dy: to.y - from.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleDirection {
    /// Top card goes to the back
    Forward,
    /// Last card comes to the front
    Backward,
}

/// Outcome of a drag, animated by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureAction {
    Move { card_id: CardId, target: StackId },
    Delete { card_id: CardId },
    Dismiss,
    Reorder(CycleDirection),
    /// No effect; the card springs back to its origin
    Cancelled,
}

/// Apply the precedence rules to a released drag
pub fn resolve_gesture(card_id: &CardId, offset: Offset, drop_target: Option<&StackId>) -> GestureAction {
    if let Some(target) = drop_target {
        return GestureAction::Move {
            card_id: card_id.clone(),
            target: target.clone(),
        };
    }
    if offset.dy < -VERTICAL_THRESHOLD {
        GestureAction::Delete {
            card_id: card_id.clone(),
        }
    } else if offset.dy > VERTICAL_THRESHOLD {
        GestureAction::Dismiss
    } else if offset.dx < -HORIZONTAL_THRESHOLD {
        GestureAction::Reorder(CycleDirection::Forward)
    } else if offset.dx > HORIZONTAL_THRESHOLD {
        GestureAction::Reorder(CycleDirection::Backward)
    } else {
        GestureAction::Cancelled
    }
}

/// The drag in progress
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub card_id: CardId,
    pub origin: StackId,
    pub start: Point,
    /// Live drop target, refreshed on every pointer move
    pub hover: Option<StackId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging(DragSession),
    Resolved(GestureAction),
}

#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    phase: GesturePhase,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &GesturePhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging(_))
    }

    /// Card currently being dragged
    pub fn dragging_card(&self) -> Option<&CardId> {
        match &self.phase {
            GesturePhase::Dragging(session) => Some(&session.card_id),
            _ => None,
        }
    }

    /// Live drop target for hover feedback
    pub fn hover_target(&self) -> Option<&StackId> {
        match &self.phase {
            GesturePhase::Dragging(session) => session.hover.as_ref(),
            _ => None,
        }
    }

    /// Begin dragging `card_id` out of `origin`
    pub fn on_drag_start(&mut self, card_id: CardId, origin: StackId, start: Point) -> DomainResult<()> {
        if let GesturePhase::Dragging(session) = &self.phase {
            return Err(DomainError::Conflict(format!(
                "card {} is already being dragged",
                session.card_id
            )));
        }
        log::debug!("Drag start: card {} from stack {}", card_id, origin);
        self.phase = GesturePhase::Dragging(DragSession {
            card_id,
            origin,
            start,
            hover: None,
        });
        Ok(())
    }

    /// Re-sample the drop target under `point`; returns the hovered stack
    pub fn on_drag_move(&mut self, point: Point, registry: &DropTargetRegistry) -> Option<StackId> {
        let GesturePhase::Dragging(session) = &mut self.phase else {
            return None;
        };
        session.hover = registry.resolve(point, Some(&session.origin));
        session.hover.clone()
    }

    /// Release the drag and resolve it. Without an active drag this is `Cancelled`.
    pub fn on_drag_end(&mut self, offset: Offset, point: Point, registry: &DropTargetRegistry) -> GestureAction {
        self.on_drag_move(point, registry);
        let action = match std::mem::take(&mut self.phase) {
            GesturePhase::Dragging(session) => resolve_gesture(&session.card_id, offset, session.hover.as_ref()),
            _ => GestureAction::Cancelled,
        };
        log::debug!("Drag resolved: {:?}", action);
        self.phase = GesturePhase::Resolved(action.clone());
        action
    }

    /// Abort the drag without effect
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            self.phase = GesturePhase::Resolved(GestureAction::Cancelled);
        }
    }

    /// Return to `Idle` once the presentation layer has finished animating
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
    }
}

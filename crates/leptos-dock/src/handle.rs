//! Dock Handle
//!
//! Holds the core `Dock` in a local stored value and mirrors what the UI
//! renders into a `reactive_stores` store with field-level reactivity.
//! Components reach it through context, the way they reach any app store.

use leptos::prelude::*;
use reactive_stores::Store;

use stack_dock::domain::{Card, CardId, DomainResult, Stack, StackId, Theme};
use stack_dock::dropzone::{Point, Rect};
use stack_dock::forms::{CardDraft, StackDraft};
use stack_dock::gesture::{GestureAction, Offset};
use stack_dock::{Dock, DockConfig, DockState, RepairReport};

use crate::storage::BrowserStorage;

/// Render-facing copy of the dock, refreshed after every intent
#[derive(Clone, Debug, Default, Store)]
pub struct DockView {
    pub stacks: Vec<Stack>,
    /// Front of the active deck, top card first
    pub deck: Vec<Card>,
    pub active_stack_id: Option<StackId>,
    pub dock_open: bool,
    pub theme: Theme,
    /// Stack highlighted as drop target during a drag
    pub hover_target: Option<StackId>,
    pub dragging: Option<CardId>,
}

impl DockView {
    fn from_dock(dock: &Dock) -> Self {
        let state = dock.snapshot();
        Self {
            stacks: state.stacks.clone(),
            deck: dock.deck().into_iter().map(|r| r.card.clone()).collect(),
            active_stack_id: dock.session().active_stack_id.clone(),
            dock_open: dock.session().dock_open,
            theme: state.theme,
            hover_target: dock.gestures().hover_target().cloned(),
            dragging: dock.gestures().dragging_card().cloned(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct DockHandle {
    dock: StoredValue<Dock, LocalStorage>,
    view: Store<DockView>,
}

/// Get the dock handle from context
pub fn use_dock() -> DockHandle {
    expect_context::<DockHandle>()
}

impl DockHandle {
    /// Open the dock from `localStorage` and provide it as context
    pub fn provide(config: DockConfig) -> Self {
        let handle = Self::from_dock(Dock::open(config, BrowserStorage::new()));
        provide_context(handle);
        handle
    }

    pub fn from_dock(dock: Dock) -> Self {
        let view = Store::new(DockView::from_dock(&dock));
        Self {
            dock: StoredValue::new_local(dock),
            view,
        }
    }

    pub fn view(&self) -> Store<DockView> {
        self.view
    }

    pub fn config(&self) -> DockConfig {
        self.dock.with_value(|d| d.config().clone())
    }

    /// Read the core dock without mutating it
    pub fn with<U>(&self, f: impl FnOnce(&Dock) -> U) -> U {
        self.dock.with_value(f)
    }

    fn mutate<U>(&self, f: impl FnOnce(&mut Dock) -> U) -> Option<U> {
        let out = self.dock.try_update_value(f);
        self.refresh();
        out
    }

    fn refresh(&self) {
        let next = self.dock.with_value(DockView::from_dock);
        *self.view.stacks().write() = next.stacks;
        *self.view.deck().write() = next.deck;
        *self.view.active_stack_id().write() = next.active_stack_id;
        *self.view.dock_open().write() = next.dock_open;
        *self.view.theme().write() = next.theme;
        *self.view.hover_target().write() = next.hover_target;
        *self.view.dragging().write() = next.dragging;
    }

    // ========================
    // Intents
    // ========================

    pub fn create_stack(&self, title: &str, cover: Option<&str>) -> Option<DomainResult<StackId>> {
        self.mutate(|d| d.request_create_stack(title, cover))
    }

    pub fn update_stack(&self, id: &StackId, title: &str, cover: Option<&str>) -> Option<DomainResult<()>> {
        self.mutate(|d| d.request_update_stack(id, title, cover))
    }

    pub fn delete_stack(&self, id: &StackId) {
        self.mutate(|d| d.request_delete_stack(id));
    }

    pub fn create_card(
        &self,
        stack_id: &StackId,
        title: &str,
        description: Option<&str>,
        cover: Option<&str>,
    ) -> Option<DomainResult<CardId>> {
        self.mutate(|d| d.request_create_card(stack_id, title, description, cover))
    }

    pub fn delete_card(&self, id: &CardId) {
        self.mutate(|d| d.request_delete_card(id));
    }

    pub fn move_card(&self, id: &CardId, target: &StackId) -> Option<DomainResult<bool>> {
        self.mutate(|d| d.request_move_card(id, target))
    }

    /// Replace the dock's state, e.g. from an imported file
    pub fn restore(&self, state: DockState) -> Option<RepairReport> {
        self.mutate(|d| d.request_restore(state))
    }

    pub fn new_stack_draft(&self) -> StackDraft {
        self.dock.with_value(|d| d.new_stack_draft())
    }

    pub fn new_card_draft(&self) -> CardDraft {
        self.dock.with_value(|d| d.new_card_draft())
    }

    pub fn submit_stack_draft(&self, draft: &StackDraft) -> Option<DomainResult<StackId>> {
        self.mutate(|d| d.submit_stack_draft(draft))
    }

    pub fn submit_card_draft(&self, draft: &CardDraft) -> Option<DomainResult<CardId>> {
        self.mutate(|d| d.submit_card_draft(draft))
    }

    pub fn set_active_stack(&self, id: Option<&StackId>) {
        if let Some(Err(e)) = self.mutate(|d| d.request_set_active_stack(id)) {
            log::warn!("[Dock] Cannot select stack: {}", e);
        }
    }

    pub fn toggle_dock_open(&self) {
        self.mutate(|d| d.request_toggle_dock_open());
    }

    pub fn set_theme(&self, theme: Theme) {
        self.mutate(|d| d.request_set_theme(theme));
    }

    pub fn register_drop_region(&self, stack_id: StackId, rect: Rect, z_index: i32) {
        // Layout only, nothing to re-render
        self.dock.update_value(|d| d.register_drop_region(stack_id, rect, z_index));
    }

    // ========================
    // Drag Telemetry
    // ========================

    pub fn drag_start(&self, card_id: &CardId, point: Point) -> bool {
        match self.mutate(|d| d.on_drag_start(card_id, point)) {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                log::debug!("[DND] Drag refused: {}", e);
                false
            }
            None => false,
        }
    }

    pub fn drag_move(&self, point: Point) {
        let before = self.view.hover_target().get_untracked();
        let hover = self.dock.try_update_value(|d| d.on_drag_move(point)).flatten();
        if hover != before {
            *self.view.hover_target().write() = hover;
        }
    }

    pub fn drag_cancel(&self) {
        self.mutate(|d| d.on_drag_cancel());
    }

    pub fn drag_end(&self, offset: Offset, point: Point) -> GestureAction {
        match self.mutate(|d| d.on_drag_end(offset, point)) {
            Some(Ok(action)) => action,
            Some(Err(e)) => {
                log::error!("[DND] Failed to apply gesture: {}", e);
                GestureAction::Cancelled
            }
            None => GestureAction::Cancelled,
        }
    }
}

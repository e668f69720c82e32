//! Dock Application Root
//!
//! Owns the store, drop-target registry, gesture interpreter and deck
//! projector, and is the only place presentation intents enter the core.
//! Consumers get it passed in; there is no global instance.

use std::sync::Arc;

use crate::config::DockConfig;
use crate::domain::{CardId, DomainError, DomainResult, StackId, Theme};
use crate::dropzone::{DropTargetRegistry, Point, Rect};
use crate::forms::{validate_card_fields, validate_stack_fields, CardDraft, StackDraft};
use crate::gesture::{GestureAction, GestureInterpreter, Offset};
use crate::projector::{DeckProjector, RenderedCard};
use crate::repository::{PersistenceAdapter, SnapshotStorage};
use crate::search::{search, SearchResults};
use crate::state::{DockState, RepairReport};
use crate::store::{EntityStore, SessionState, StoreChange, SubscriptionId};

#[derive(Debug)]
pub struct Dock {
    config: DockConfig,
    store: EntityStore,
    registry: DropTargetRegistry,
    gestures: GestureInterpreter,
    deck: DeckProjector,
}

impl Dock {
    /// Dock over an existing store
    pub fn new(config: DockConfig, store: EntityStore) -> Self {
        let deck = DeckProjector::new(config.display_depth);
        let mut dock = Self {
            config,
            store,
            registry: DropTargetRegistry::new(),
            gestures: GestureInterpreter::new(),
            deck,
        };
        dock.resync();
        dock
    }

    /// Load from `storage` and persist every later change back to it
    pub fn open<S: SnapshotStorage + 'static>(config: DockConfig, storage: S) -> Self {
        let (store, _) = PersistenceAdapter::new(storage, config.storage_key.clone()).open_store();
        Self::new(config, store)
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<DockState> {
        self.store.snapshot()
    }

    pub fn session(&self) -> &SessionState {
        self.store.session()
    }

    pub fn registry(&self) -> &DropTargetRegistry {
        &self.registry
    }

    pub fn gestures(&self) -> &GestureInterpreter {
        &self.gestures
    }

    fn resync(&mut self) {
        let active = self.store.session().active_stack_id.clone();
        self.deck.sync(self.store.state(), active.as_ref());
        let state = self.store.state();
        self.registry.retain_stacks(state.stacks.iter().map(|s| &s.id));
    }

    /// Observe every store change; the deck is already resynced when called
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&Arc<DockState>, &StoreChange) + 'static,
    {
        self.store.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // ========================
    // Presentation Intents
    // ========================

    pub fn request_create_stack(&mut self, title: &str, cover: Option<&str>) -> DomainResult<StackId> {
        validate_stack_fields(&self.config, title)?;
        let id = self.store.create_stack(title, cover)?;
        self.resync();
        Ok(id)
    }

    pub fn request_update_stack(&mut self, id: &StackId, title: &str, cover: Option<&str>) -> DomainResult<()> {
        validate_stack_fields(&self.config, title)?;
        self.store.update_stack(id, title, cover)?;
        self.resync();
        Ok(())
    }

    pub fn request_delete_stack(&mut self, id: &StackId) -> bool {
        let removed = self.store.delete_stack(id);
        self.resync();
        removed
    }

    pub fn request_create_card(
        &mut self,
        stack_id: &StackId,
        title: &str,
        description: Option<&str>,
        cover: Option<&str>,
    ) -> DomainResult<CardId> {
        if self.store.state().stack(stack_id).is_none() {
            return Err(DomainError::NotFound(format!("stack {}", stack_id)));
        }
        validate_card_fields(&self.config, title, description)?;
        let id = self.store.create_card(stack_id, title, description, cover)?;
        self.resync();
        Ok(id)
    }

    pub fn request_update_card(
        &mut self,
        id: &CardId,
        title: &str,
        description: Option<&str>,
        cover: Option<&str>,
    ) -> DomainResult<()> {
        validate_card_fields(&self.config, title, description)?;
        self.store.update_card(id, title, description, cover)?;
        self.resync();
        Ok(())
    }

    pub fn request_delete_card(&mut self, id: &CardId) -> bool {
        let removed = self.store.delete_card(id);
        self.resync();
        removed
    }

    /// Move a card to the end of `target` outside of a drag
    pub fn request_move_card(&mut self, card_id: &CardId, target: &StackId) -> DomainResult<bool> {
        let moved = self.store.move_card(card_id, target)?;
        self.resync();
        Ok(moved)
    }

    /// Replace the whole state (import, external sync), repairing what breaks ownership
    pub fn request_restore(&mut self, state: DockState) -> RepairReport {
        let report = self.store.restore(state);
        self.resync();
        report
    }

    pub fn request_set_active_stack(&mut self, id: Option<&StackId>) -> DomainResult<()> {
        self.store.set_active_stack(id)?;
        self.resync();
        Ok(())
    }

    pub fn request_toggle_dock_open(&mut self) -> bool {
        self.store.toggle_dock()
    }

    pub fn request_set_theme(&mut self, theme: Theme) {
        self.store.set_theme(theme);
    }

    // ========================
    // Forms
    // ========================

    pub fn new_stack_draft(&self) -> StackDraft {
        StackDraft::default()
    }

    /// Empty card draft aimed at the active stack, else the first stack
    pub fn new_card_draft(&self) -> CardDraft {
        CardDraft::new(self.store.state(), self.store.session())
    }

    pub fn submit_stack_draft(&mut self, draft: &StackDraft) -> DomainResult<StackId> {
        draft.validate(&self.config)?;
        self.request_create_stack(&draft.title, Some(&draft.cover))
    }

    pub fn submit_card_draft(&mut self, draft: &CardDraft) -> DomainResult<CardId> {
        draft.validate(&self.config)?;
        let stack_id = draft
            .stack_id
            .clone()
            .ok_or_else(|| DomainError::Validation("No stack selected".to_string()))?;
        self.request_create_card(&stack_id, &draft.title, Some(&draft.description), Some(&draft.cover))
    }

    pub fn search(&self, query: &str) -> SearchResults<'_> {
        search(self.store.state(), query)
    }

    // ========================
    // Deck
    // ========================

    /// Rendered front of the active deck
    pub fn deck(&self) -> Vec<RenderedCard<'_>> {
        self.deck.rendered(self.store.state())
    }

    pub fn deck_order(&self) -> &[CardId] {
        self.deck.visible()
    }

    // ========================
    // Drop Regions
    // ========================

    pub fn register_drop_region(&mut self, stack_id: StackId, rect: Rect, z_index: i32) {
        self.registry.register(stack_id, rect, z_index);
    }

    pub fn unregister_drop_region(&mut self, stack_id: &StackId) -> bool {
        self.registry.unregister(stack_id)
    }

    // ========================
    // Drag Telemetry
    // ========================

    /// Start dragging; only the top card of the active deck may move
    pub fn on_drag_start(&mut self, card_id: &CardId, point: Point) -> DomainResult<()> {
        if !self.deck.is_draggable(card_id) {
            return Err(DomainError::Conflict(format!("card {} is not the top of the deck", card_id)));
        }
        let origin = self
            .store
            .state()
            .card(card_id)
            .map(|c| c.stack_id.clone())
            .ok_or_else(|| DomainError::NotFound(format!("card {}", card_id)))?;
        self.gestures.on_drag_start(card_id.clone(), origin, point)
    }

    /// Pointer moved; returns the stack to highlight
    pub fn on_drag_move(&mut self, point: Point) -> Option<StackId> {
        self.gestures.on_drag_move(point, &self.registry)
    }

    /// Pointer released: resolve the gesture and apply its single effect
    pub fn on_drag_end(&mut self, offset: Offset, point: Point) -> DomainResult<GestureAction> {
        let action = self.gestures.on_drag_end(offset, point, &self.registry);
        let applied = self.apply(&action);
        self.gestures.reset();
        applied.map(|_| action)
    }

    /// Pointer lost (window blur, release outside the page): abort without effect
    pub fn on_drag_cancel(&mut self) {
        self.gestures.cancel();
        self.gestures.reset();
    }

    fn apply(&mut self, action: &GestureAction) -> DomainResult<()> {
        match action {
            GestureAction::Move { card_id, target } => {
                self.store.move_card(card_id, target)?;
            }
            GestureAction::Delete { card_id } => {
                self.store.delete_card(card_id);
            }
            GestureAction::Dismiss => {
                self.store.set_active_stack(None)?;
            }
            GestureAction::Reorder(direction) => self.deck.cycle(*direction),
            GestureAction::Cancelled => {}
        }
        self.resync();
        Ok(())
    }
}

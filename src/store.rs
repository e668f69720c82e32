//! Entity Store
//!
//! Single source of truth for stacks and cards. Every mutation either fails
//! before touching anything or swaps in a new consistent snapshot, then
//! notifies subscribers. Snapshots are `Arc`-shared and never change once
//! handed out; a write on a shared snapshot clones it first.

use log::debug;
use std::sync::Arc;

use crate::domain::{Card, CardId, DomainError, DomainResult, Stack, StackId, Theme};
use crate::state::{DockState, RepairReport};

/// What a mutation changed, delivered to subscribers with the new snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    StackCreated(StackId),
    StackUpdated(StackId),
    StackDeleted { stack_id: StackId, removed_cards: Vec<CardId> },
    CardCreated { card_id: CardId, stack_id: StackId },
    CardUpdated(CardId),
    CardDeleted { card_id: CardId, stack_id: StackId },
    CardMoved { card_id: CardId, from: StackId, to: StackId },
    ThemeChanged(Theme),
    Restored(RepairReport),
    /// Active stack or dock visibility changed; nothing to persist
    SessionChanged,
}

impl StoreChange {
    /// Whether the persisted snapshot changed
    pub fn is_persistent(&self) -> bool {
        !matches!(self, StoreChange::SessionChanged)
    }
}

/// Ephemeral UI selection, dropped on reload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub active_stack_id: Option<StackId>,
    pub dock_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Subscriber = Box<dyn FnMut(&Arc<DockState>, &StoreChange)>;

pub struct EntityStore {
    state: Arc<DockState>,
    session: SessionState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn required_title(title: &str, what: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation(format!("{} title is empty", what)));
    }
    Ok(title.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(DockState::default()),
            session: SessionState::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Start from a loaded snapshot, repairing it first
    pub fn with_state(state: DockState) -> Self {
        let (state, report) = state.repair();
        if !report.is_clean() {
            log::warn!("Repaired loaded dock state: {}", report);
        }
        Self {
            state: Arc::new(state),
            ..Self::new()
        }
    }

    /// Latest immutable snapshot
    pub fn snapshot(&self) -> Arc<DockState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &DockState {
        &self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&Arc<DockState>, &StoreChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        debug!("Store change: {:?}", change);
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state, &change);
        }
    }

    // ========================
    // Stack Operations
    // ========================

    /// Append a new empty stack
    pub fn create_stack(&mut self, title: &str, cover: Option<&str>) -> DomainResult<StackId> {
        let stack = Stack::new(required_title(title, "Stack")?, optional_text(cover));
        let id = stack.id.clone();
        Arc::make_mut(&mut self.state).stacks.push(stack);
        self.notify(StoreChange::StackCreated(id.clone()));
        Ok(id)
    }

    /// Rename a stack and/or change its cover
    pub fn update_stack(&mut self, id: &StackId, title: &str, cover: Option<&str>) -> DomainResult<()> {
        let title = required_title(title, "Stack")?;
        if self.state.stack(id).is_none() {
            return Err(DomainError::NotFound(format!("stack {}", id)));
        }
        if let Some(stack) = Arc::make_mut(&mut self.state).stack_mut(id) {
            stack.title = title;
            stack.cover = optional_text(cover);
        }
        self.notify(StoreChange::StackUpdated(id.clone()));
        Ok(())
    }

    /// Remove a stack and every card it owns. Returns false if it did not exist.
    pub fn delete_stack(&mut self, id: &StackId) -> bool {
        if self.state.stack(id).is_none() {
            return false;
        }
        let state = Arc::make_mut(&mut self.state);
        let removed_cards: Vec<CardId> = state
            .all_cards
            .iter()
            .filter(|c| &c.stack_id == id)
            .map(|c| c.id.clone())
            .collect();
        state.stacks.retain(|s| &s.id != id);
        state.all_cards.retain(|c| &c.stack_id != id);

        let was_active = self.session.active_stack_id.as_ref() == Some(id);
        if was_active {
            self.session.active_stack_id = None;
        }
        self.notify(StoreChange::StackDeleted {
            stack_id: id.clone(),
            removed_cards,
        });
        true
    }

    // ========================
    // Card Operations
    // ========================

    /// Append a new card to the end of a stack
    pub fn create_card(
        &mut self,
        stack_id: &StackId,
        title: &str,
        description: Option<&str>,
        cover: Option<&str>,
    ) -> DomainResult<CardId> {
        if self.state.stack(stack_id).is_none() {
            return Err(DomainError::NotFound(format!("stack {}", stack_id)));
        }
        let card = Card::new(
            stack_id.clone(),
            required_title(title, "Card")?,
            optional_text(description),
            optional_text(cover),
        );
        let card_id = card.id.clone();

        let state = Arc::make_mut(&mut self.state);
        if let Some(stack) = state.stack_mut(stack_id) {
            stack.card_ids.push(card_id.clone());
        }
        state.all_cards.push(card);

        self.notify(StoreChange::CardCreated {
            card_id: card_id.clone(),
            stack_id: stack_id.clone(),
        });
        Ok(card_id)
    }

    /// Edit a card's text fields in place
    pub fn update_card(
        &mut self,
        id: &CardId,
        title: &str,
        description: Option<&str>,
        cover: Option<&str>,
    ) -> DomainResult<()> {
        let title = required_title(title, "Card")?;
        if self.state.card(id).is_none() {
            return Err(DomainError::NotFound(format!("card {}", id)));
        }
        if let Some(card) = Arc::make_mut(&mut self.state).card_mut(id) {
            card.title = title;
            card.description = optional_text(description);
            card.cover = optional_text(cover);
        }
        self.notify(StoreChange::CardUpdated(id.clone()));
        Ok(())
    }

    /// Remove a card from the store and from its stack. Returns false if it did not exist.
    pub fn delete_card(&mut self, id: &CardId) -> bool {
        let Some(stack_id) = self.state.card(id).map(|c| c.stack_id.clone()) else {
            return false;
        };
        let state = Arc::make_mut(&mut self.state);
        state.all_cards.retain(|c| &c.id != id);
        if let Some(stack) = state.stack_mut(&stack_id) {
            stack.card_ids.retain(|cid| cid != id);
        }
        self.notify(StoreChange::CardDeleted {
            card_id: id.clone(),
            stack_id,
        });
        true
    }

    /// Move a card to the end of another stack.
    ///
    /// Returns `Ok(false)` when the card already lives in `target`.
    pub fn move_card(&mut self, card_id: &CardId, target: &StackId) -> DomainResult<bool> {
        let from = self
            .state
            .card(card_id)
            .map(|c| c.stack_id.clone())
            .ok_or_else(|| DomainError::NotFound(format!("card {}", card_id)))?;
        if self.state.stack(target).is_none() {
            return Err(DomainError::NotFound(format!("stack {}", target)));
        }
        if &from == target {
            return Ok(false);
        }

        // Subscribers only ever see the snapshot after all three edits
        let state = Arc::make_mut(&mut self.state);
        if let Some(source) = state.stack_mut(&from) {
            source.card_ids.retain(|cid| cid != card_id);
        }
        if let Some(card) = state.card_mut(card_id) {
            card.stack_id = target.clone();
        }
        if let Some(dest) = state.stack_mut(target) {
            dest.card_ids.push(card_id.clone());
        }

        self.notify(StoreChange::CardMoved {
            card_id: card_id.clone(),
            from,
            to: target.clone(),
        });
        Ok(true)
    }

    // ========================
    // Snapshot / Settings
    // ========================

    /// Replace the whole state, repairing ownership violations
    pub fn restore(&mut self, state: DockState) -> RepairReport {
        let (state, report) = state.repair();
        if !report.is_clean() {
            log::warn!("Repaired restored dock state: {}", report);
        }
        if let Some(active) = &self.session.active_stack_id {
            if state.stack(active).is_none() {
                self.session.active_stack_id = None;
            }
        }
        self.state = Arc::new(state);
        self.notify(StoreChange::Restored(report.clone()));
        report
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.state.theme == theme {
            return;
        }
        Arc::make_mut(&mut self.state).theme = theme;
        self.notify(StoreChange::ThemeChanged(theme));
    }

    /// Select the stack whose deck is shown; `None` closes the deck
    pub fn set_active_stack(&mut self, id: Option<&StackId>) -> DomainResult<()> {
        if let Some(id) = id {
            if self.state.stack(id).is_none() {
                return Err(DomainError::NotFound(format!("stack {}", id)));
            }
        }
        let next = id.cloned();
        if self.session.active_stack_id == next {
            return Ok(());
        }
        self.session.active_stack_id = next;
        self.notify(StoreChange::SessionChanged);
        Ok(())
    }

    /// Flip the dock between open and minimized; returns the new state
    pub fn toggle_dock(&mut self) -> bool {
        self.session.dock_open = !self.session.dock_open;
        self.notify(StoreChange::SessionChanged);
        self.session.dock_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn assert_consistent(store: &EntityStore) {
        let problems = store.state().integrity_violations();
        assert!(problems.is_empty(), "integrity violated: {:?}", problems);
    }

    fn ids(stack: &Stack) -> Vec<&str> {
        stack.card_ids.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_create_stack() {
        let mut store = EntityStore::new();
        let id = store.create_stack("  Books ", Some("book")).unwrap();
        let stack = store.state().stack(&id).unwrap();
        assert_eq!(stack.title, "Books");
        assert_eq!(stack.cover.as_deref(), Some("book"));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_create_stack_rejects_blank_title() {
        let mut store = EntityStore::new();
        let err = store.create_stack("   ", None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.state().stacks.is_empty());
    }

    #[test]
    fn test_create_card_appends_to_stack() {
        let mut store = EntityStore::new();
        let stack = store.create_stack("Books", None).unwrap();
        let a = store.create_card(&stack, "Dune", Some("https://dune.example"), None).unwrap();
        let b = store.create_card(&stack, "Emma", Some("   "), None).unwrap();

        let s = store.state().stack(&stack).unwrap();
        assert_eq!(s.card_ids, vec![a.clone(), b.clone()]);
        assert_eq!(store.state().card(&b).unwrap().description, None);
        assert_consistent(&store);
    }

    #[test]
    fn test_create_card_in_missing_stack() {
        let mut store = EntityStore::new();
        let err = store.create_card(&StackId::from("nope"), "Dune", None, None).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(store.state().all_cards.is_empty());
    }

    #[test]
    fn test_delete_stack_cascades() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        let tech = store.create_stack("Tech", None).unwrap();
        for title in ["a", "b", "c"] {
            store.create_card(&books, title, None, None).unwrap();
        }
        let keep = store.create_card(&tech, "keep", None, None).unwrap();

        assert!(store.delete_stack(&books));
        assert!(store.state().all_cards.iter().all(|c| c.stack_id != books));
        assert_eq!(store.state().all_cards.len(), 1);
        assert!(store.state().card(&keep).is_some());
        assert_consistent(&store);

        assert!(!store.delete_stack(&books));
    }

    #[test]
    fn test_delete_active_stack_clears_selection() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        store.set_active_stack(Some(&books)).unwrap();
        store.delete_stack(&books);
        assert_eq!(store.session().active_stack_id, None);
    }

    #[test]
    fn test_delete_card_is_idempotent() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        let dune = store.create_card(&books, "Dune", None, None).unwrap();
        store.create_card(&books, "Emma", None, None).unwrap();

        assert!(store.delete_card(&dune));
        let once = store.snapshot();
        assert!(!store.delete_card(&dune));
        assert_eq!(*store.snapshot(), *once);
        assert_consistent(&store);
    }

    #[test]
    fn test_move_card() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        let tech = store.create_stack("Tech", None).unwrap();
        let rust = store.create_card(&tech, "Rust", None, None).unwrap();
        let dune = store.create_card(&books, "Dune", None, None).unwrap();

        assert_eq!(store.move_card(&dune, &tech), Ok(true));
        assert_eq!(store.state().card(&dune).unwrap().stack_id, tech);
        assert!(store.state().stack(&books).unwrap().is_empty());
        assert_eq!(store.state().stack(&tech).unwrap().card_ids, vec![rust, dune.clone()]);
        assert_consistent(&store);

        // Same stack is a no-op
        let before = store.snapshot();
        assert_eq!(store.move_card(&dune, &tech), Ok(false));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_move_card_missing_ids() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        let dune = store.create_card(&books, "Dune", None, None).unwrap();

        let err = store.move_card(&CardId::from("ghost"), &books).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = store.move_card(&dune, &StackId::from("ghost")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(store.state().card(&dune).unwrap().stack_id, books);
    }

    #[test]
    fn test_move_is_observed_atomically() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        let tech = store.create_stack("Tech", None).unwrap();
        let dune = store.create_card(&books, "Dune", None, None).unwrap();

        let observed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&observed);
        let watched = dune.clone();
        store.subscribe(move |state, _change| {
            let owners = state.stacks.iter().filter(|s| s.contains(&watched)).count();
            sink.borrow_mut().push((owners, state.is_consistent()));
        });

        store.move_card(&dune, &tech).unwrap();
        assert_eq!(*observed.borrow(), vec![(1, true)]);
        assert_eq!(ids(store.state().stack(&tech).unwrap()), vec![dune.as_str()]);
    }

    #[test]
    fn test_prior_snapshot_is_unaffected_by_mutation() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        let held = store.snapshot();
        store.create_card(&books, "Dune", None, None).unwrap();
        assert!(held.all_cards.is_empty());
        assert!(held.stack(&books).unwrap().is_empty());
        assert_eq!(store.state().all_cards.len(), 1);
    }

    #[test]
    fn test_subscribers_receive_changes_and_can_unsubscribe() {
        let mut store = EntityStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |_, change| sink.borrow_mut().push(change.clone()));

        let books = store.create_stack("Books", None).unwrap();
        store.delete_stack(&StackId::from("ghost"));
        store.toggle_dock();
        assert!(store.unsubscribe(sub));
        store.delete_stack(&books);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], StoreChange::StackCreated(books));
        assert_eq!(seen[1], StoreChange::SessionChanged);
        assert!(!seen[1].is_persistent());
    }

    #[test]
    fn test_update_stack_and_card() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        let dune = store.create_card(&books, "Dune", None, None).unwrap();

        store.update_stack(&books, "Novels", Some("heart")).unwrap();
        store.update_card(&dune, "Dune Messiah", Some("https://x.example"), Some("star")).unwrap();
        assert_eq!(store.state().stack(&books).unwrap().title, "Novels");
        let card = store.state().card(&dune).unwrap();
        assert_eq!(card.title, "Dune Messiah");
        assert_eq!(card.cover.as_deref(), Some("star"));

        assert!(matches!(store.update_stack(&books, "", None), Err(DomainError::Validation(_))));
        assert!(matches!(
            store.update_card(&CardId::from("ghost"), "x", None, None),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_restore_repairs_and_clears_stale_selection() {
        let mut store = EntityStore::new();
        let books = store.create_stack("Books", None).unwrap();
        store.set_active_stack(Some(&books)).unwrap();

        let broken: DockState = serde_json::from_str(
            r#"{
                "theme": "dark",
                "stacks": [{"id": "s1", "title": "Tech", "cardIds": ["c1", "ghost"], "createdAt": 1}],
                "allCards": [
                    {"id": "c1", "stackId": "s1", "title": "Rust", "createdAt": 1},
                    {"id": "c2", "stackId": "gone", "title": "Orphan", "createdAt": 1}
                ]
            }"#,
        )
        .unwrap();

        let report = store.restore(broken);
        assert_eq!(report.orphan_cards, 1);
        assert_eq!(report.dangling_refs, 1);
        assert_eq!(store.state().theme, Theme::Dark);
        assert_eq!(store.session().active_stack_id, None);
        assert_consistent(&store);
    }

    #[test]
    fn test_set_active_stack_requires_existing_stack() {
        let mut store = EntityStore::new();
        let err = store.set_active_stack(Some(&StackId::from("ghost"))).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(store.set_active_stack(None).is_ok());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use proptest::sample::Index;
        use proptest::test_runner::Config;

        #[derive(Debug, Clone)]
        enum Op {
            CreateStack,
            CreateCard(Index),
            DeleteStack(Index),
            DeleteCard(Index),
            Move(Index, Index),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                2 => Just(Op::CreateStack),
                4 => any::<Index>().prop_map(Op::CreateCard),
                1 => any::<Index>().prop_map(Op::DeleteStack),
                2 => any::<Index>().prop_map(Op::DeleteCard),
                4 => (any::<Index>(), any::<Index>()).prop_map(|(c, s)| Op::Move(c, s)),
            ]
        }

        fn apply(store: &mut EntityStore, op: &Op) {
            let stacks: Vec<StackId> = store.state().stacks.iter().map(|s| s.id.clone()).collect();
            let cards: Vec<CardId> = store.state().all_cards.iter().map(|c| c.id.clone()).collect();
            match op {
                Op::CreateStack => {
                    store.create_stack("stack", None).unwrap();
                }
                Op::CreateCard(s) if !stacks.is_empty() => {
                    store.create_card(s.get(&stacks), "card", None, None).unwrap();
                }
                Op::DeleteStack(s) if !stacks.is_empty() => {
                    store.delete_stack(s.get(&stacks));
                }
                Op::DeleteCard(c) if !cards.is_empty() => {
                    store.delete_card(c.get(&cards));
                }
                Op::Move(c, s) if !cards.is_empty() && !stacks.is_empty() => {
                    store.move_card(c.get(&cards), s.get(&stacks)).unwrap();
                }
                _ => {}
            }
        }

        proptest! {
            #![proptest_config(Config::with_cases(128))]
            #[test]
            fn test_operation_sequences_keep_integrity(ops in prop::collection::vec(op(), 1..80)) {
                let mut store = EntityStore::new();
                for op in &ops {
                    apply(&mut store, op);
                    let problems = store.state().integrity_violations();
                    prop_assert!(problems.is_empty(), "after {:?}: {:?}", op, problems);
                }
            }

            #[test]
            fn test_delete_card_twice_equals_once(
                ops in prop::collection::vec(op(), 1..40),
                pick in any::<Index>()
            ) {
                let mut store = EntityStore::new();
                store.create_stack("seed", None).unwrap();
                let seed = store.state().stacks[0].id.clone();
                store.create_card(&seed, "seed", None, None).unwrap();
                for op in &ops {
                    apply(&mut store, op);
                }
                let cards: Vec<CardId> = store.state().all_cards.iter().map(|c| c.id.clone()).collect();
                prop_assume!(!cards.is_empty());
                let card = pick.get(&cards).clone();

                prop_assert!(store.delete_card(&card));
                let once = store.snapshot();
                prop_assert!(!store.delete_card(&card));
                prop_assert_eq!(&*store.snapshot(), &*once);
            }

            #[test]
            fn test_move_is_never_observed_half_done(
                ops in prop::collection::vec(op(), 1..40),
                card_pick in any::<Index>(),
                stack_pick in any::<Index>()
            ) {
                let mut store = EntityStore::new();
                for _ in 0..2 {
                    let s = store.create_stack("seed", None).unwrap();
                    store.create_card(&s, "seed", None, None).unwrap();
                }
                for op in &ops {
                    apply(&mut store, op);
                }
                let stacks: Vec<StackId> = store.state().stacks.iter().map(|s| s.id.clone()).collect();
                let cards: Vec<CardId> = store.state().all_cards.iter().map(|c| c.id.clone()).collect();
                prop_assume!(!stacks.is_empty() && !cards.is_empty());
                let card = card_pick.get(&cards).clone();
                let target = stack_pick.get(&stacks).clone();

                let owners: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
                let sink = Rc::clone(&owners);
                let watched = card.clone();
                store.subscribe(move |state, _| {
                    let listed = state.stacks.iter().filter(|s| s.contains(&watched)).count();
                    sink.borrow_mut().push(listed);
                });

                let moved = store.move_card(&card, &target).unwrap();
                prop_assert_eq!(&store.state().card(&card).unwrap().stack_id, &target);
                prop_assert!(store.state().is_consistent());
                let seen = owners.borrow();
                prop_assert_eq!(seen.len(), usize::from(moved));
                prop_assert!(seen.iter().all(|&n| n == 1));
            }
        }
    }
}

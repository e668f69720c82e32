//! Form Drafts
//!
//! Input held by the create/edit popovers. Validation happens here so the
//! presentation layer can disable submit instead of hitting a store error.

use crate::config::DockConfig;
use crate::domain::{DomainError, DomainResult, StackId};
use crate::state::DockState;
use crate::store::SessionState;

/// Cover picked when the user does not choose an icon
pub const DEFAULT_COVER: &str = "star";

fn check_len(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!("{} exceeds {} characters", field, max)));
    }
    Ok(())
}

/// Title of a stack as entered; checked before any store call
pub fn validate_stack_fields(config: &DockConfig, title: &str) -> DomainResult<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("Stack title is empty".to_string()));
    }
    check_len("Stack title", title, config.title_max_len)
}

/// Title and description of a card as entered
pub fn validate_card_fields(config: &DockConfig, title: &str, description: Option<&str>) -> DomainResult<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("Card title is empty".to_string()));
    }
    check_len("Card title", title, config.title_max_len)?;
    check_len("Description", description.unwrap_or("").trim(), config.description_max_len)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackDraft {
    pub title: String,
    pub cover: String,
}

impl Default for StackDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            cover: DEFAULT_COVER.to_string(),
        }
    }
}

impl StackDraft {
    pub fn validate(&self, config: &DockConfig) -> DomainResult<()> {
        validate_stack_fields(config, &self.title)
    }

    pub fn can_submit(&self, config: &DockConfig) -> bool {
        self.validate(config).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardDraft {
    pub stack_id: Option<StackId>,
    pub title: String,
    pub description: String,
    pub cover: String,
}

impl CardDraft {
    /// Empty draft targeting the active stack, else the first stack
    pub fn new(state: &DockState, session: &SessionState) -> Self {
        let stack_id = session
            .active_stack_id
            .clone()
            .or_else(|| state.stacks.first().map(|s| s.id.clone()));
        Self {
            stack_id,
            title: String::new(),
            description: String::new(),
            cover: DEFAULT_COVER.to_string(),
        }
    }

    pub fn validate(&self, config: &DockConfig) -> DomainResult<()> {
        validate_card_fields(config, &self.title, Some(&self.description))?;
        if self.stack_id.is_none() {
            return Err(DomainError::Validation("No stack selected".to_string()));
        }
        Ok(())
    }

    pub fn can_submit(&self, config: &DockConfig) -> bool {
        self.validate(config).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntityStore;

    #[test]
    fn test_field_limits_count_characters() {
        let config = DockConfig::default();
        assert!(validate_stack_fields(&config, &"é".repeat(40)).is_ok());
        assert!(validate_stack_fields(&config, &"é".repeat(41)).is_err());
        assert!(validate_card_fields(&config, "Dune", None).is_ok());
        assert!(validate_card_fields(&config, "Dune", Some(&"d".repeat(101))).is_err());
    }

    #[test]
    fn test_stack_draft_validation() {
        let config = DockConfig::default();
        let mut draft = StackDraft::default();
        assert!(!draft.can_submit(&config));
        draft.title = "  Books  ".to_string();
        assert!(draft.can_submit(&config));
        draft.title = "x".repeat(41);
        assert!(matches!(draft.validate(&config), Err(DomainError::Validation(_))));
        assert_eq!(draft.cover, DEFAULT_COVER);
    }

    #[test]
    fn test_card_draft_targets_active_or_first_stack() {
        let mut store = EntityStore::new();
        let empty = CardDraft::new(store.state(), store.session());
        assert_eq!(empty.stack_id, None);

        let books = store.create_stack("Books", None).unwrap();
        let tech = store.create_stack("Tech", None).unwrap();
        assert_eq!(CardDraft::new(store.state(), store.session()).stack_id, Some(books));
        store.set_active_stack(Some(&tech)).unwrap();
        assert_eq!(CardDraft::new(store.state(), store.session()).stack_id, Some(tech));
    }

    #[test]
    fn test_card_draft_validation() {
        let config = DockConfig::default();
        let mut draft = CardDraft {
            stack_id: None,
            title: "Dune".to_string(),
            description: String::new(),
            cover: DEFAULT_COVER.to_string(),
        };
        assert!(!draft.can_submit(&config), "needs a stack");
        draft.stack_id = Some(StackId::from("s1"));
        assert!(draft.can_submit(&config));
        draft.description = "d".repeat(101);
        assert!(!draft.can_submit(&config));
    }
}

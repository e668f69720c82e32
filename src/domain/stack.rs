//! Stack Entity
//!
//! A named collection of cards. `card_ids` is the authoritative order.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::ids::{CardId, StackId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: StackId,
    pub title: String,
    /// Icon name, URL or color code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Ordered, unique ids of the cards owned by this stack
    #[serde(default)]
    pub card_ids: Vec<CardId>,
    #[serde(default)]
    pub created_at: i64,
}

impl Stack {
    /// Create a new empty stack with a fresh id
    pub fn new(title: String, cover: Option<String>) -> Self {
        Self {
            id: StackId::generate(),
            title,
            cover,
            card_ids: Vec::new(),
            created_at: super::now_millis(),
        }
    }

    pub fn contains(&self, card_id: &CardId) -> bool {
        self.card_ids.contains(card_id)
    }

    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.card_ids.len()
    }
}

impl Entity for Stack {
    type Id = StackId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_creation() {
        let stack = Stack::new("Books".to_string(), Some("book".to_string()));
        assert_eq!(stack.title, "Books");
        assert!(stack.is_empty());
        assert!(stack.created_at > 0);
    }

    #[test]
    fn test_stack_json_shape() {
        let mut stack = Stack::new("Tech".to_string(), None);
        stack.card_ids.push(CardId::from("c1"));
        let json = serde_json::to_value(&stack).unwrap();
        assert_eq!(json["cardIds"][0], "c1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("cover").is_none());
    }
}

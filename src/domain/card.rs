//! Card Entity
//!
//! A single bookmarked item, owned by exactly one stack.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::ids::{CardId, StackId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    /// Owning stack; never absent while the card exists
    pub stack_id: StackId,
    pub title: String,
    /// Free text, usually the bookmarked URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl Card {
    /// Create a new card owned by `stack_id` with a fresh id
    pub fn new(
        stack_id: StackId,
        title: String,
        description: Option<String>,
        cover: Option<String>,
    ) -> Self {
        Self {
            id: CardId::generate(),
            stack_id,
            title,
            description,
            cover,
            created_at: super::now_millis(),
        }
    }
}

impl Entity for Card {
    type Id = CardId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with(desc: Option<&str>) -> Card {
        Card::new(StackId::from("s1"), "Dune".to_string(), desc.map(String::from), None)
    }

    #[test]
    fn test_card_creation() {
        let card = card_with(None);
        assert_eq!(card.stack_id, StackId::from("s1"));
        assert_eq!(card.title, "Dune");
    }

    #[test]
    fn test_card_json_shape() {
        let card = card_with(Some("x"));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["stackId"], "s1");
        assert_eq!(json["description"], "x");
    }
}

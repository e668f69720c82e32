//! Domain Layer
//!
//! Contains the dock's entities and core abstractions.
//! No storage or browser concerns live here.

mod card;
mod entity;
mod ids;
mod stack;
mod theme;

pub use card::Card;
pub use entity::{DomainError, DomainResult, Entity};
pub use ids::{CardId, StackId};
pub use stack::Stack;
pub use theme::{ColorScheme, Theme, ThemeTracker};

/// Current time as epoch milliseconds, used for `created_at`
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

//! Stack Dock Core
//!
//! Client-side state for the floating bookmark dock:
//! - domain: entities, ids, theme and error taxonomy
//! - state / store: normalized snapshot and the mutation layer
//! - repository: snapshot persistence behind a storage trait
//! - dropzone / gesture / projector: drag interaction and deck ordering
//! - dock: application root wiring everything together

pub mod config;
pub mod dock;
pub mod domain;
pub mod dropzone;
pub mod forms;
pub mod gesture;
pub mod projector;
pub mod repository;
pub mod search;
pub mod state;
pub mod store;

pub use config::DockConfig;
pub use dock::Dock;
pub use domain::{Card, CardId, ColorScheme, DomainError, DomainResult, Entity, Stack, StackId, Theme};
pub use dropzone::{DropTargetRegistry, Point, Rect};
pub use gesture::{CycleDirection, GestureAction, GestureInterpreter, GesturePhase, Offset};
pub use projector::{DeckProjector, RenderedCard};
pub use state::{DockState, RepairReport};
pub use store::{EntityStore, SessionState, StoreChange, SubscriptionId};

//! Leptos Dock Bindings
//!
//! Browser glue for the stack dock core:
//! - handle: the dock behind a Leptos reactive store
//! - dragdrop: mouse events to drag telemetry, with a click/drag threshold
//! - storage: `localStorage` snapshot backend
//! - theme: host color-scheme detection

pub mod dragdrop;
pub mod handle;
pub mod storage;
pub mod theme;

pub use dragdrop::{bind_global_drag_handlers, create_dnd_signals, make_on_card_mousedown, register_drop_element, DndSignals};
pub use handle::{use_dock, DockHandle, DockView};
pub use storage::BrowserStorage;
pub use theme::{apply_color_scheme, bind_color_scheme_listener, prefers_dark};

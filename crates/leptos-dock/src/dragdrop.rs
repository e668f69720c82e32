//! Deck Drag Handling
//!
//! Mouse events to drag telemetry for the core gesture interpreter.
//! A press on the top card only becomes a drag once the pointer travels
//! past the configured activation distance, so plain clicks stay clicks.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use stack_dock::domain::{CardId, StackId};
use stack_dock::dropzone::{Point, Rect};
use stack_dock::gesture::{GestureAction, Offset};

use crate::handle::DockHandle;

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Card pressed but not yet dragging
    pub pending_id_read: ReadSignal<Option<CardId>>,
    pub pending_id_write: WriteSignal<Option<CardId>>,
    pub dragging_read: ReadSignal<bool>,
    pub dragging_write: WriteSignal<bool>,
    /// Press position, the origin of the drag offset
    pub start_read: ReadSignal<Point>,
    pub start_write: WriteSignal<Point>,
    /// Live offset for the presentation layer to translate the card
    pub offset_read: ReadSignal<Offset>,
    pub offset_write: WriteSignal<Offset>,
    /// Last resolved action, for the presentation layer to animate
    pub last_action_read: ReadSignal<Option<GestureAction>>,
    pub last_action_write: WriteSignal<Option<GestureAction>>,
}

pub fn create_dnd_signals() -> DndSignals {
    let (pending_id_read, pending_id_write) = signal(None::<CardId>);
    let (dragging_read, dragging_write) = signal(false);
    let (start_read, start_write) = signal(Point::default());
    let (offset_read, offset_write) = signal(Offset::default());
    let (last_action_read, last_action_write) = signal(None::<GestureAction>);
    DndSignals {
        pending_id_read,
        pending_id_write,
        dragging_read,
        dragging_write,
        start_read,
        start_write,
        offset_read,
        offset_write,
        last_action_read,
        last_action_write,
    }
}

fn client_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(ev.client_x() as f64, ev.client_y() as f64)
}

/// Clear pending/drag state
fn end_drag(dnd: &DndSignals) {
    dnd.pending_id_write.set(None);
    dnd.dragging_write.set(false);
    dnd.offset_write.set(Offset::default());
}

/// Mousedown handler for a rendered deck card. Inert unless it is the top card.
pub fn make_on_card_mousedown(
    handle: DockHandle,
    dnd: DndSignals,
    card_id: CardId,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Links and controls inside the card keep their own behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlAnchorElement>().is_some() { return; }
        }
        let is_top = handle.view().with_untracked(|v| v.deck.first().map(|c| &c.id) == Some(&card_id));
        if !is_top {
            return;
        }
        dnd.pending_id_write.set(Some(card_id.clone()));
        dnd.start_write.set(client_point(&ev));
    }
}

/// Measure a stack's element and register it as that stack's drop region
pub fn register_drop_element(handle: DockHandle, stack_id: StackId, el: &web_sys::Element, z_index: i32) {
    let r = el.get_bounding_client_rect();
    handle.register_drop_region(stack_id, Rect::new(r.left(), r.top(), r.width(), r.height()), z_index);
}

/// Bind document-level mousemove/mouseup handlers that drive the gesture.
///
/// `on_resolved` receives every resolved action so the caller can animate it.
pub fn bind_global_drag_handlers<F>(handle: DockHandle, dnd: DndSignals, on_resolved: F)
where
    F: Fn(GestureAction) + 'static,
{
    let activation = handle.config().drag_activation_px;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(card_id) = dnd.pending_id_read.get_untracked() else {
            return;
        };
        let start = dnd.start_read.get_untracked();
        let point = client_point(&ev);
        let offset = Offset::between(start, point);

        if !dnd.dragging_read.get_untracked() {
            // Start dragging only once moved beyond the threshold
            if offset.dx.abs() <= activation && offset.dy.abs() <= activation {
                return;
            }
            if !handle.drag_start(&card_id, start) {
                end_drag(&dnd);
                return;
            }
            dnd.dragging_write.set(true);
        }

        dnd.offset_write.set(offset);
        handle.drag_move(point);
    });

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let was_dragging = dnd.dragging_read.get_untracked();
        let start = dnd.start_read.get_untracked();
        end_drag(&dnd);

        // Not dragging: the click event fires naturally on the element
        if !was_dragging {
            return;
        }
        // Measured at release; the last mousemove may lag behind it
        let point = client_point(&ev);
        let action = handle.drag_end(Offset::between(start, point), point);
        log::debug!("[DND] Resolved {:?}", action);
        dnd.last_action_write.set(Some(action.clone()));
        on_resolved(action);
    });

    // The mouseup may never arrive once the window loses focus
    let on_blur = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        let was_dragging = dnd.dragging_read.get_untracked();
        end_drag(&dnd);
        if was_dragging {
            log::debug!("[DND] Drag cancelled on blur");
            handle.drag_cancel();
        }
    });

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref());
        if let Some(doc) = window.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
    on_mouseup.forget();
    on_blur.forget();
}

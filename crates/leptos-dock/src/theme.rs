//! Host Color Scheme
//!
//! Reads `prefers-color-scheme` and re-applies the resolved scheme when the
//! host preference flips while the theme setting is `system`.

use leptos::prelude::*;
use stack_dock::domain::{ColorScheme, ThemeTracker};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::handle::DockHandle;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn dark_query() -> Option<web_sys::MediaQueryList> {
    web_sys::window()?.match_media(DARK_QUERY).ok().flatten()
}

/// Whether the host currently prefers a dark scheme
pub fn prefers_dark() -> bool {
    dark_query().map(|q| q.matches()).unwrap_or(false)
}

/// Set `data-theme` on the widget root
pub fn apply_color_scheme(root: &web_sys::Element, scheme: ColorScheme) {
    if let Err(e) = root.set_attribute("data-theme", scheme.as_str()) {
        log::warn!("[Theme] Failed to set data-theme: {:?}", e);
    }
}

/// Keep `root`'s scheme in sync with both the dock's theme setting and the host
pub fn bind_color_scheme_listener(handle: DockHandle, root: web_sys::Element) {
    let theme = handle.view().with_untracked(|v| v.theme);
    let tracker = StoredValue::new_local(ThemeTracker::new(theme, prefers_dark()));
    apply_color_scheme(&root, tracker.with_value(|t| t.applied()));

    // Setting changes from the dock
    let setting_root = root.clone();
    Effect::new(move |_| {
        let theme = handle.view().with(|v| v.theme);
        if let Some(Some(scheme)) = tracker.try_update_value(|t| t.set_theme(theme)) {
            apply_color_scheme(&setting_root, scheme);
        }
    });

    // Host preference changes
    let Some(query) = dark_query() else {
        return;
    };
    let list = query.clone();
    let on_change = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
        if let Some(Some(scheme)) = tracker.try_update_value(|t| t.on_system_change(list.matches())) {
            apply_color_scheme(&root, scheme);
        }
    });
    let _ = query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
    on_change.forget();
}

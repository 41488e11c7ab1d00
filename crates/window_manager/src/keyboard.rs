//! Global keyboard shortcuts that drive the window manager.
//!
//! The close-active shortcut only fires when no editable text control holds focus, so typing
//! Backspace in an editor never closes its window.

use wasm_bindgen::JsCast;

use crate::config::KeyboardConfig;
use crate::model::WindowManagerState;
use crate::reducer::WindowAction;
use crate::store::WindowManagerStore;

/// `<input type=...>` values that do not accept typed text.
const NON_TEXT_INPUT_TYPES: [&str; 10] = [
    "button", "checkbox", "color", "file", "hidden", "image", "radio", "range", "reset", "submit",
];

/// Framework-independent view of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress<'a> {
    /// `KeyboardEvent.key` value.
    pub key: &'a str,
    /// Whether an editable text control currently has input focus.
    pub editable_focused: bool,
    /// Whether another listener already called `preventDefault` on the event.
    pub default_prevented: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl<'a> KeyPress<'a> {
    pub fn plain(key: &'a str) -> Self {
        Self {
            key,
            editable_focused: false,
            default_prevented: false,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn in_editable(mut self) -> Self {
        self.editable_focused = true;
        self
    }

    pub fn already_handled(mut self) -> Self {
        self.default_prevented = true;
        self
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Maps a key press to the window action it triggers, if any.
///
/// A `Some` result means the caller must dispatch the action and suppress the key's default
/// browser behavior.
pub fn shortcut_action(
    state: &WindowManagerState,
    press: &KeyPress<'_>,
    config: &KeyboardConfig,
) -> Option<WindowAction> {
    if press.key != config.close_active_key
        || press.default_prevented
        || press.editable_focused
        || press.has_modifier()
    {
        return None;
    }
    state
        .active_id
        .clone()
        .map(|window_id| WindowAction::Close { window_id })
}

/// Returns whether an element accepts typed text.
///
/// `tag_name` is compared case-insensitively; `input_type` is only consulted for `<input>`.
pub fn is_editable_element(
    tag_name: &str,
    input_type: Option<&str>,
    content_editable: bool,
) -> bool {
    if content_editable {
        return true;
    }
    if tag_name.eq_ignore_ascii_case("textarea") {
        return true;
    }
    if tag_name.eq_ignore_ascii_case("input") {
        let input_type = input_type.unwrap_or("text").to_ascii_lowercase();
        return !NON_TEXT_INPUT_TYPES.contains(&input_type.as_str());
    }
    false
}

/// Returns whether the document's focused element is an editable text control.
pub fn active_element_is_editable() -> bool {
    let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.active_element())
    else {
        return false;
    };
    let content_editable = element
        .dyn_ref::<web_sys::HtmlElement>()
        .map(|html| html.is_content_editable())
        .unwrap_or(false);
    let input_type = element
        .dyn_ref::<web_sys::HtmlInputElement>()
        .map(|input| input.type_());
    is_editable_element(&element.tag_name(), input_type.as_deref(), content_editable)
}

/// Runs the shortcut for `press` against `store`.
///
/// `prevent_default` is called exactly once, before the dispatch, when the press maps to an
/// action; returns whether it did.
pub fn handle_key_press(
    store: &WindowManagerStore,
    config: &KeyboardConfig,
    press: &KeyPress<'_>,
    prevent_default: &dyn Fn(),
) -> bool {
    let Some(action) = shortcut_action(&store.snapshot(), press, config) else {
        return false;
    };
    prevent_default();
    store.dispatch(action);
    true
}

/// Browser adapter for [`handle_key_press`] used by the window-level keydown listener.
pub fn handle_global_keydown(
    store: &WindowManagerStore,
    config: &KeyboardConfig,
    ev: &web_sys::KeyboardEvent,
) -> bool {
    let key = ev.key();
    let press = KeyPress {
        key: &key,
        editable_focused: active_element_is_editable(),
        default_prevented: ev.default_prevented(),
        ctrl: ev.ctrl_key(),
        alt: ev.alt_key(),
        meta: ev.meta_key(),
    };
    handle_key_press(store, config, &press, &|| ev.prevent_default())
}

//! Reducer actions, side-effect intents, and transition logic for the window manager.

use leptos::logging;

use crate::model::{WindowDescriptor, WindowId, WindowManagerState, WindowPatch, WindowRecord};
use crate::window_manager::{
    claim_stack_level, close_focus_successor, raise_and_focus, stack_level_taken,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Actions accepted by [`reduce_windows`] to mutate [`WindowManagerState`].
pub enum WindowAction {
    /// Open a window, or bring an already-open window with the same id back to front.
    Open(WindowDescriptor),
    /// Close a window by id.
    Close {
        /// Window to close.
        window_id: WindowId,
    },
    /// Minimize a window.
    Minimize {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Toggle the maximized flag of a window.
    Maximize {
        /// Window to maximize or restore.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    Focus {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Merge a partial field update into a window.
    Patch {
        /// Window to update.
        window_id: WindowId,
        /// Fields to overwrite.
        patch: WindowPatch,
    },
    /// Taskbar button press: restore a minimized window, minimize the active one, or focus.
    ToggleTaskbar {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Remove every window and clear focus.
    Reset,
}

impl WindowAction {
    /// Target window of the action, if it has one.
    pub fn window_id(&self) -> Option<&WindowId> {
        match self {
            Self::Open(descriptor) => Some(&descriptor.id),
            Self::Close { window_id }
            | Self::Minimize { window_id }
            | Self::Maximize { window_id }
            | Self::Focus { window_id }
            | Self::Patch { window_id, .. }
            | Self::ToggleTaskbar { window_id } => Some(window_id),
            Self::Reset => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_windows`] for the host to execute.
pub enum WindowEffect {
    /// Move keyboard focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
    /// Fetch file content for a freshly opened window. The window is already registered.
    LoadWindowContent {
        /// Window that will display the content.
        window_id: WindowId,
        /// Opaque path from the open request.
        path: String,
    },
}

/// Applies a [`WindowAction`] to the window manager state and collects resulting side effects.
///
/// Every action is total: actions naming an id that is not open leave the state untouched and
/// return no effects.
pub fn reduce_windows(state: &mut WindowManagerState, action: WindowAction) -> Vec<WindowEffect> {
    let mut effects = Vec::new();
    match action {
        WindowAction::Open(descriptor) => {
            let window_id = descriptor.id.clone();
            if state.contains(&window_id) {
                raise_and_focus(state, &window_id);
            } else {
                let level = claim_stack_level(state);
                let load_path = descriptor.file_path.clone();
                state.windows.push(descriptor.into_record(level));
                state.active_id = Some(window_id.clone());
                if let Some(path) = load_path {
                    effects.push(WindowEffect::LoadWindowContent {
                        window_id: window_id.clone(),
                        path,
                    });
                }
            }
            effects.push(WindowEffect::FocusWindowInput(window_id));
        }
        WindowAction::Close { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                ignore_unknown("close", &window_id);
                return effects;
            }
            if state.active_id.as_ref() == Some(&window_id) {
                state.active_id = close_focus_successor(state);
            }
        }
        WindowAction::Minimize { window_id } => {
            let Some(window) = find_window_mut(state, &window_id) else {
                ignore_unknown("minimize", &window_id);
                return effects;
            };
            window.is_minimized = true;
            if state.active_id.as_ref() == Some(&window_id) {
                state.active_id = None;
            }
        }
        WindowAction::Maximize { window_id } => {
            let Some(window) = find_window_mut(state, &window_id) else {
                ignore_unknown("maximize", &window_id);
                return effects;
            };
            window.is_maximized = !window.is_maximized;
        }
        WindowAction::Focus { window_id } => {
            if !raise_and_focus(state, &window_id) {
                ignore_unknown("focus", &window_id);
                return effects;
            }
            effects.push(WindowEffect::FocusWindowInput(window_id));
        }
        WindowAction::Patch { window_id, patch } => {
            apply_patch(state, &window_id, patch);
        }
        WindowAction::ToggleTaskbar { window_id } => {
            let Some(minimized) = state.window(&window_id).map(|w| w.is_minimized) else {
                ignore_unknown("toggle taskbar", &window_id);
                return effects;
            };
            let active = state.active_id.as_ref() == Some(&window_id);
            let next = if !minimized && active {
                WindowAction::Minimize { window_id }
            } else {
                WindowAction::Focus { window_id }
            };
            return reduce_windows(state, next);
        }
        WindowAction::Reset => {
            state.windows.clear();
            state.active_id = None;
        }
    }

    effects
}

/// Pure form of [`reduce_windows`]: returns the next state and leaves `state` untouched.
pub fn apply(state: &WindowManagerState, action: WindowAction) -> WindowManagerState {
    let mut next = state.clone();
    let _ = reduce_windows(&mut next, action);
    next
}

fn apply_patch(state: &mut WindowManagerState, window_id: &WindowId, patch: WindowPatch) {
    if !state.contains(window_id) {
        ignore_unknown("patch", window_id);
        return;
    }

    let requested_level = match patch.stack_level {
        Some(level) if stack_level_taken(state, level, window_id) => {
            logging::debug_warn!(
                "window manager: patch for `{window_id}` dropped stack level {level} already in use"
            );
            None
        }
        other => other,
    };

    let Some(window) = find_window_mut(state, window_id) else {
        return;
    };

    if let Some(title) = patch.title {
        window.title = title;
    }
    if let Some(kind) = patch.kind {
        window.kind = kind;
    }
    if let Some(position) = patch.position {
        window.position = position;
    }
    if let Some(size) = patch.size {
        window.size = size;
    }
    if let Some(is_minimized) = patch.is_minimized {
        window.is_minimized = is_minimized;
    }
    if let Some(is_maximized) = patch.is_maximized {
        window.is_maximized = is_maximized;
    }
    if let Some(initial_path) = patch.initial_path {
        window.initial_path = initial_path;
    }
    if let Some(file_path) = patch.file_path {
        window.file_path = file_path;
    }
    if let Some(level) = requested_level {
        window.stack_level = level;
        state.stack_high_water = state.stack_high_water.max(level);
    }
}

fn find_window_mut<'a>(
    state: &'a mut WindowManagerState,
    window_id: &WindowId,
) -> Option<&'a mut WindowRecord> {
    state.windows.iter_mut().find(|w| &w.id == window_id)
}

fn ignore_unknown(operation: &str, window_id: &WindowId) {
    logging::debug_warn!("window manager: {operation} ignored, no open window `{window_id}`");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{CloseFocusFallback, WindowKind, WindowPosition, WindowSize};

    fn open(state: &mut WindowManagerState, id: &str) -> Vec<WindowEffect> {
        reduce_windows(
            state,
            WindowAction::Open(WindowDescriptor::new(id, WindowKind::FileExplorer)),
        )
    }

    fn id(raw: &str) -> WindowId {
        WindowId::from(raw)
    }

    fn level(state: &WindowManagerState, raw: &str) -> u32 {
        state.window(&id(raw)).expect("window").stack_level
    }

    #[test]
    fn fresh_open_appends_raises_and_focuses() {
        let mut state = WindowManagerState::default();

        let effects = open(&mut state, "a");
        open(&mut state, "b");

        assert_eq!(state.windows.len(), 2);
        assert_eq!(level(&state, "a"), 1);
        assert_eq!(level(&state, "b"), 2);
        assert_eq!(state.active_id, Some(id("b")));
        assert_eq!(effects, vec![WindowEffect::FocusWindowInput(id("a"))]);
        let a = state.window(&id("a")).expect("a");
        assert!(!a.is_minimized);
        assert!(!a.is_maximized);
    }

    #[test]
    fn reopen_keeps_existing_fields_and_discards_descriptor() {
        let mut state = WindowManagerState::default();
        reduce_windows(
            &mut state,
            WindowAction::Open(
                WindowDescriptor::new("docs", WindowKind::FileExplorer)
                    .with_title("Documents")
                    .at(10, 20)
                    .sized(500, 400),
            ),
        );
        reduce_windows(&mut state, WindowAction::Maximize { window_id: id("docs") });
        reduce_windows(&mut state, WindowAction::Minimize { window_id: id("docs") });

        let effects = reduce_windows(
            &mut state,
            WindowAction::Open(
                WindowDescriptor::new("docs", WindowKind::Paint)
                    .with_title("Other")
                    .at(99, 99)
                    .sized(1, 1)
                    .with_file_path("/ignored.png"),
            ),
        );

        assert_eq!(state.windows.len(), 1);
        let docs = state.window(&id("docs")).expect("docs");
        assert_eq!(docs.title, "Documents");
        assert_eq!(docs.kind, WindowKind::FileExplorer);
        assert_eq!(docs.position, WindowPosition { x: 10, y: 20 });
        assert_eq!(docs.size, WindowSize { width: 500, height: 400 });
        assert_eq!(docs.file_path, None);
        assert!(docs.is_maximized);
        assert!(!docs.is_minimized);
        assert_eq!(docs.stack_level, 2);
        assert_eq!(state.active_id, Some(id("docs")));
        assert_eq!(effects, vec![WindowEffect::FocusWindowInput(id("docs"))]);
    }

    #[test]
    fn fresh_open_with_file_path_requests_content_after_registering() {
        let mut state = WindowManagerState::default();

        let effects = reduce_windows(
            &mut state,
            WindowAction::Open(
                WindowDescriptor::new("readme", WindowKind::TextEditor)
                    .with_file_path("/home/readme.md"),
            ),
        );

        assert!(state.contains(&id("readme")));
        assert_eq!(
            effects,
            vec![
                WindowEffect::LoadWindowContent {
                    window_id: id("readme"),
                    path: "/home/readme.md".to_string(),
                },
                WindowEffect::FocusWindowInput(id("readme")),
            ]
        );
    }

    #[test]
    fn closing_active_window_falls_back_to_last_inserted_not_topmost() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        open(&mut state, "b");
        open(&mut state, "c");
        reduce_windows(&mut state, WindowAction::Focus { window_id: id("a") });
        reduce_windows(&mut state, WindowAction::Focus { window_id: id("c") });

        reduce_windows(&mut state, WindowAction::Close { window_id: id("c") });

        // "a" is topmost, but "b" was inserted last.
        assert_eq!(state.active_id, Some(id("b")));
    }

    #[test]
    fn closing_active_window_with_topmost_fallback_picks_highest_level() {
        let mut state =
            WindowManagerState::with_policy(Default::default(), CloseFocusFallback::TopmostStack);
        open(&mut state, "a");
        open(&mut state, "b");
        open(&mut state, "c");
        reduce_windows(&mut state, WindowAction::Focus { window_id: id("a") });
        reduce_windows(&mut state, WindowAction::Focus { window_id: id("c") });

        reduce_windows(&mut state, WindowAction::Close { window_id: id("c") });

        assert_eq!(state.active_id, Some(id("a")));
    }

    #[test]
    fn closing_inactive_window_keeps_focus_and_last_close_clears_it() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        open(&mut state, "b");

        reduce_windows(&mut state, WindowAction::Close { window_id: id("a") });
        assert_eq!(state.active_id, Some(id("b")));

        reduce_windows(&mut state, WindowAction::Close { window_id: id("b") });
        assert!(state.windows.is_empty());
        assert_eq!(state.active_id, None);
    }

    #[test]
    fn minimize_clears_focus_only_for_active_window() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        open(&mut state, "b");

        reduce_windows(&mut state, WindowAction::Minimize { window_id: id("a") });
        assert_eq!(state.active_id, Some(id("b")));
        assert!(state.window(&id("a")).expect("a").is_minimized);

        reduce_windows(&mut state, WindowAction::Minimize { window_id: id("b") });
        assert_eq!(state.active_id, None);
    }

    #[test]
    fn maximize_toggles_without_touching_stack_or_focus() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        open(&mut state, "b");

        reduce_windows(&mut state, WindowAction::Maximize { window_id: id("a") });
        assert!(state.window(&id("a")).expect("a").is_maximized);
        assert_eq!(level(&state, "a"), 1);
        assert_eq!(state.active_id, Some(id("b")));

        reduce_windows(&mut state, WindowAction::Maximize { window_id: id("a") });
        assert!(!state.window(&id("a")).expect("a").is_maximized);
    }

    #[test]
    fn focusing_top_window_still_claims_a_new_level() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");

        let effects = reduce_windows(&mut state, WindowAction::Focus { window_id: id("a") });

        assert_eq!(level(&state, "a"), 2);
        assert_eq!(effects, vec![WindowEffect::FocusWindowInput(id("a"))]);
    }

    #[test]
    fn patch_merges_present_fields_only() {
        let mut state = WindowManagerState::default();
        reduce_windows(
            &mut state,
            WindowAction::Open(
                WindowDescriptor::new("img", WindowKind::ImageViewer)
                    .with_initial_path("/pictures"),
            ),
        );

        reduce_windows(
            &mut state,
            WindowAction::Patch {
                window_id: id("img"),
                patch: WindowPatch {
                    position: Some(WindowPosition { x: 300, y: 120 }),
                    initial_path: Some(None),
                    ..WindowPatch::default()
                },
            },
        );

        let img = state.window(&id("img")).expect("img");
        assert_eq!(img.position, WindowPosition { x: 300, y: 120 });
        assert_eq!(img.initial_path, None);
        assert_eq!(img.title, WindowKind::ImageViewer.title());
        assert_eq!(img.stack_level, 1);
        assert_eq!(state.active_id, Some(id("img")));
    }

    #[test]
    fn patch_applies_free_stack_level_and_drops_colliding_one() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        open(&mut state, "b");

        reduce_windows(
            &mut state,
            WindowAction::Patch {
                window_id: id("a"),
                patch: WindowPatch {
                    stack_level: Some(2),
                    title: Some("Renamed".into()),
                    ..WindowPatch::default()
                },
            },
        );
        assert_eq!(level(&state, "a"), 1);
        assert_eq!(state.window(&id("a")).expect("a").title, "Renamed");

        reduce_windows(
            &mut state,
            WindowAction::Patch {
                window_id: id("a"),
                patch: WindowPatch {
                    stack_level: Some(10),
                    ..WindowPatch::default()
                },
            },
        );
        assert_eq!(level(&state, "a"), 10);
    }

    #[test]
    fn open_after_patching_the_last_level_renumbers_instead_of_colliding() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        reduce_windows(
            &mut state,
            WindowAction::Patch {
                window_id: id("a"),
                patch: WindowPatch {
                    stack_level: Some(u32::MAX),
                    ..WindowPatch::default()
                },
            },
        );

        open(&mut state, "b");

        assert_eq!(level(&state, "a"), 1);
        assert_eq!(level(&state, "b"), 2);
        assert_eq!(crate::window_manager::check_invariants(&state), Ok(()));
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        let before = state.clone();
        let ghost = id("ghost");

        for action in [
            WindowAction::Close { window_id: ghost.clone() },
            WindowAction::Minimize { window_id: ghost.clone() },
            WindowAction::Maximize { window_id: ghost.clone() },
            WindowAction::Focus { window_id: ghost.clone() },
            WindowAction::ToggleTaskbar { window_id: ghost.clone() },
            WindowAction::Patch {
                window_id: ghost.clone(),
                patch: WindowPatch::position(1, 1),
            },
        ] {
            let effects = reduce_windows(&mut state, action);
            assert!(effects.is_empty());
            assert_eq!(state, before);
        }
    }

    #[test]
    fn taskbar_toggle_minimizes_active_and_restores_minimized() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        open(&mut state, "b");

        reduce_windows(&mut state, WindowAction::ToggleTaskbar { window_id: id("b") });
        assert!(state.window(&id("b")).expect("b").is_minimized);
        assert_eq!(state.active_id, None);

        reduce_windows(&mut state, WindowAction::ToggleTaskbar { window_id: id("b") });
        assert!(!state.window(&id("b")).expect("b").is_minimized);
        assert_eq!(state.active_id, Some(id("b")));

        reduce_windows(&mut state, WindowAction::ToggleTaskbar { window_id: id("a") });
        assert_eq!(state.active_id, Some(id("a")));
        assert_eq!(state.topmost_visible().map(|w| w.id.clone()), Some(id("a")));
    }

    #[test]
    fn reset_removes_every_window() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        open(&mut state, "b");

        reduce_windows(&mut state, WindowAction::Reset);

        assert!(state.windows.is_empty());
        assert_eq!(state.active_id, None);
        open(&mut state, "c");
        assert_eq!(level(&state, "c"), 1);
    }

    #[test]
    fn apply_leaves_input_state_untouched() {
        let mut state = WindowManagerState::default();
        open(&mut state, "a");
        let before = state.clone();

        let next = apply(&state, WindowAction::Minimize { window_id: id("a") });

        assert_eq!(state, before);
        assert!(next.window(&id("a")).expect("a").is_minimized);
        assert_eq!(next.active_id, None);
    }
}

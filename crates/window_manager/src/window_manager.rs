//! Stacking and focus transition helpers shared by the window reducer.

use std::collections::HashSet;

use leptos::logging;
use thiserror::Error;

use crate::model::{CloseFocusFallback, StackingStrategy, WindowId, WindowManagerState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Broken registry invariants reported by [`check_invariants`].
pub enum InvariantViolation {
    /// Two open windows share an id.
    #[error("duplicate window id `{0}`")]
    DuplicateId(WindowId),
    /// Two open windows share a stack level.
    #[error("stack level {level} is held by both `{first}` and `{second}`")]
    DuplicateStackLevel {
        /// Shared level.
        level: u32,
        /// First window holding the level, in insertion order.
        first: WindowId,
        /// Second window holding the level.
        second: WindowId,
    },
    /// The active id points at a window that is not open.
    #[error("active window `{0}` is not in the registry")]
    DanglingActiveId(WindowId),
}

/// Highest level the next claim has to clear.
fn stack_ceiling(state: &WindowManagerState) -> u32 {
    let current_max = state.max_stack_level().unwrap_or(0);
    match state.stacking {
        StackingStrategy::MaxPlusOne => current_max,
        StackingStrategy::Counter => current_max.max(state.stack_high_water),
    }
}

/// Returns the stack level the next open/reopen/focus must receive.
///
/// When the ceiling already sits at `u32::MAX` (only reachable through a patched level) this
/// reports `u32::MAX`; [`claim_stack_level`] compacts the stack first in that case.
pub fn next_stack_level(state: &WindowManagerState) -> u32 {
    stack_ceiling(state).saturating_add(1)
}

/// Reserves the next stack level, advancing the high-water mark.
pub(crate) fn claim_stack_level(state: &mut WindowManagerState) -> u32 {
    if stack_ceiling(state) == u32::MAX {
        compact_stack_levels(state);
    }
    let level = next_stack_level(state);
    state.stack_high_water = state.stack_high_water.max(level);
    level
}

/// Renumbers open windows `1..=n` back to front and resets the high-water mark to `n`.
///
/// Relative order is preserved, so the topmost window stays topmost.
pub fn compact_stack_levels(state: &mut WindowManagerState) {
    let mut order: Vec<usize> = (0..state.windows.len()).collect();
    order.sort_by_key(|&idx| state.windows[idx].stack_level);
    let mut level = 0;
    for idx in order {
        level += 1;
        state.windows[idx].stack_level = level;
    }
    state.stack_high_water = level;
    logging::debug_warn!("window manager: stack levels exhausted, renumbered {level} windows");
}

/// Raises `window_id` above every other window, un-minimizes it and makes it active.
///
/// Returns `false` without touching the state when the id is not registered.
pub fn raise_and_focus(state: &mut WindowManagerState, window_id: &WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| &w.id == window_id) else {
        return false;
    };

    let level = claim_stack_level(state);
    let Some(window) = state.windows.get_mut(index) else {
        return false;
    };
    window.is_minimized = false;
    window.stack_level = level;
    state.active_id = Some(window_id.clone());
    true
}

/// Picks the window that inherits focus after the active window closed.
pub fn close_focus_successor(state: &WindowManagerState) -> Option<WindowId> {
    match state.close_focus {
        CloseFocusFallback::InsertionOrder => state.windows.last().map(|w| w.id.clone()),
        CloseFocusFallback::TopmostStack => state
            .windows
            .iter()
            .max_by_key(|w| w.stack_level)
            .map(|w| w.id.clone()),
    }
}

/// Returns whether `level` is already held by an open window other than `except`.
pub fn stack_level_taken(state: &WindowManagerState, level: u32, except: &WindowId) -> bool {
    state
        .windows
        .iter()
        .any(|w| &w.id != except && w.stack_level == level)
}

/// Verifies id uniqueness, stack-level uniqueness and active-id validity.
///
/// # Errors
///
/// Returns the first [`InvariantViolation`] found, scanning in insertion order.
pub fn check_invariants(state: &WindowManagerState) -> Result<(), InvariantViolation> {
    let mut ids = HashSet::new();
    for window in &state.windows {
        if !ids.insert(&window.id) {
            return Err(InvariantViolation::DuplicateId(window.id.clone()));
        }
    }

    for (idx, window) in state.windows.iter().enumerate() {
        if let Some(other) = state
            .windows
            .iter()
            .skip(idx + 1)
            .find(|other| other.stack_level == window.stack_level)
        {
            return Err(InvariantViolation::DuplicateStackLevel {
                level: window.stack_level,
                first: window.id.clone(),
                second: other.id.clone(),
            });
        }
    }

    if let Some(active) = &state.active_id {
        if !ids.contains(active) {
            return Err(InvariantViolation::DanglingActiveId(active.clone()));
        }
    }

    Ok(())
}

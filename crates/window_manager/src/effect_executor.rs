//! Runs reducer-emitted [`WindowEffect`]s outside the reducer.

use leptos::logging;
use leptos::*;

use crate::reducer::WindowEffect;
use crate::runtime_context::WindowManagerContext;

/// Watches the context's effect queue and hands each queued effect to `handler`, oldest first.
///
/// Hosts move DOM focus or start content loads in the handler. A failed load stays in the
/// host's own state; it is never dispatched back as a window action.
pub fn install(runtime: WindowManagerContext, handler: impl Fn(WindowEffect) + 'static) {
    create_effect(move |_| {
        let batch = runtime.effects.get();
        if batch.is_empty() {
            return;
        }
        // Empty the queue first: a handler that dispatches appends to a new batch, which
        // re-triggers this effect after the current one finishes.
        runtime.effects.set(Vec::new());
        batch.into_iter().for_each(&handler);
    });
}

/// Fallback handler used when the host registered none.
pub(crate) fn discard(effect: WindowEffect) {
    if let WindowEffect::LoadWindowContent { window_id, path } = effect {
        logging::debug_warn!(
            "window manager: no effect handler, content `{path}` for `{window_id}` not loaded"
        );
    }
}

//! Leptos provider and context wiring for the window manager.
//!
//! This module owns the long-lived [`WindowManagerStore`], mirrors every published snapshot into
//! a reactive signal for rendering surfaces, drains reducer effects into the host's handler, and
//! installs the global keyboard listener.

use std::rc::Rc;

use leptos::*;

use crate::{
    config::{KeyboardConfig, WindowManagerConfig},
    effect_executor, keyboard,
    model::WindowManagerState,
    reducer::{WindowAction, WindowEffect},
    store::WindowManagerStore,
};

#[derive(Clone, Copy)]
/// Leptos context for reading window manager state and dispatching [`WindowAction`] values.
pub struct WindowManagerContext {
    /// Single-writer store that owns the authoritative snapshot.
    pub store: StoredValue<Rc<WindowManagerStore>>,
    /// Latest published snapshot; rendering surfaces re-derive their views from it.
    pub state: RwSignal<Rc<WindowManagerState>>,
    /// Effects emitted by the reducer and not yet executed by the host.
    pub effects: RwSignal<Vec<WindowEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<WindowAction>,
    /// Keyboard shortcut settings used by the global keydown listener.
    pub keyboard: StoredValue<KeyboardConfig>,
}

impl WindowManagerContext {
    /// Dispatches a reducer action through the context callback.
    pub fn dispatch_action(&self, action: WindowAction) {
        self.dispatch.call(action);
    }

    /// Drains queued effects without tracking the signal.
    pub fn take_effects(&self) -> Vec<WindowEffect> {
        let queued = self.effects.get_untracked();
        if !queued.is_empty() {
            self.effects.set(Vec::new());
        }
        queued
    }
}

/// Builds the context around `store` and links store notifications to the state signal.
pub fn create_window_manager_context(
    store: Rc<WindowManagerStore>,
    keyboard_config: KeyboardConfig,
) -> WindowManagerContext {
    let state = create_rw_signal(store.snapshot());
    let effects = create_rw_signal(Vec::<WindowEffect>::new());
    store.subscribe(move |snapshot| state.set(snapshot));

    let store = store_value(store);
    let dispatch = Callback::new(move |action: WindowAction| {
        let new_effects = store.with_value(|store| store.dispatch(action));
        if !new_effects.is_empty() {
            effects.update(|queue| queue.extend(new_effects));
        }
    });

    WindowManagerContext {
        store,
        state,
        effects,
        dispatch,
        keyboard: store_value(keyboard_config),
    }
}

fn install_global_keyboard(runtime: WindowManagerContext) {
    let keydown_listener = window_event_listener(ev::keydown, move |ev| {
        runtime.store.with_value(|store| {
            runtime
                .keyboard
                .with_value(|config| keyboard::handle_global_keydown(store, config, &ev))
        });
    });
    on_cleanup(move || keydown_listener.remove());
}

/// Builds the store and context for `config` and starts draining effects into `on_effect`.
///
/// Without a handler, queued effects are still drained so the queue cannot grow unbounded; a
/// dropped content load is logged.
pub fn mount_window_manager(
    config: WindowManagerConfig,
    on_effect: Option<Callback<WindowEffect>>,
) -> WindowManagerContext {
    let store = Rc::new(WindowManagerStore::from_config(&config));
    let runtime = create_window_manager_context(store, config.keyboard);
    effect_executor::install(runtime, move |effect| match on_effect {
        Some(handler) => handler.call(effect),
        None => effect_executor::discard(effect),
    });
    runtime
}

#[component]
/// Provides [`WindowManagerContext`] to descendant components.
pub fn WindowManagerProvider(
    /// Stacking, focus and keyboard policy. Defaults apply when omitted.
    #[prop(optional)]
    config: Option<WindowManagerConfig>,
    /// Receives every reducer effect in emission order (DOM focus, content loads).
    #[prop(optional, into)]
    on_effect: Option<Callback<WindowEffect>>,
    children: Children,
) -> impl IntoView {
    let runtime = mount_window_manager(config.unwrap_or_default(), on_effect);

    provide_context(runtime);
    install_global_keyboard(runtime);

    children().into_view()
}

/// Returns the current [`WindowManagerContext`].
///
/// # Panics
///
/// Panics if called outside [`WindowManagerProvider`].
pub fn use_window_manager() -> WindowManagerContext {
    use_context::<WindowManagerContext>().expect("WindowManagerContext not provided")
}

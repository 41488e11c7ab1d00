//! Single-writer container that owns the latest window manager snapshot and notifies observers.
//!
//! The store lives on the UI thread. Each dispatch reduces a copy of the current snapshot,
//! swaps the copy in wholesale, and then hands the new `Rc` snapshot to every subscriber.
//! Subscribers may dispatch again from inside their callback; the nested transition completes
//! (and notifies) before the outer notification loop moves on, and the remaining subscribers of
//! the outer loop then receive the newer snapshot rather than the one that started the loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::WindowManagerConfig;
use crate::model::{WindowDescriptor, WindowId, WindowManagerState, WindowPatch};
use crate::reducer::{reduce_windows, WindowAction, WindowEffect};

type Subscriber = Rc<dyn Fn(Rc<WindowManagerState>)>;

/// Handle returned by [`WindowManagerStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct WindowManagerStore {
    state: RefCell<Rc<WindowManagerState>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
}

impl std::fmt::Debug for WindowManagerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManagerStore")
            .field("state", &self.state.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl Default for WindowManagerStore {
    fn default() -> Self {
        Self::new(WindowManagerState::default())
    }
}

impl WindowManagerStore {
    pub fn new(initial: WindowManagerState) -> Self {
        Self {
            state: RefCell::new(Rc::new(initial)),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(1),
        }
    }

    /// Empty store using the policies from `config`.
    pub fn from_config(config: &WindowManagerConfig) -> Self {
        Self::new(config.initial_state())
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Rc<WindowManagerState> {
        Rc::clone(&self.state.borrow())
    }

    pub fn active_id(&self) -> Option<WindowId> {
        self.state.borrow().active_id.clone()
    }

    /// Registers `callback` to receive every new snapshot.
    pub fn subscribe(&self, callback: impl Fn(Rc<WindowManagerState>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` when the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Applies `action`, publishes the new snapshot when it differs, and returns the effects the
    /// host should run.
    pub fn dispatch(&self, action: WindowAction) -> Vec<WindowEffect> {
        let current = self.snapshot();
        let mut next = (*current).clone();
        let effects = reduce_windows(&mut next, action);

        if next == *current {
            return effects;
        }

        #[cfg(debug_assertions)]
        if let Err(err) = crate::window_manager::check_invariants(&next) {
            leptos::logging::error!("window manager invariant violated: {err}");
        }

        *self.state.borrow_mut() = Rc::new(next);
        self.notify();
        effects
    }

    pub fn open(&self, descriptor: WindowDescriptor) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::Open(descriptor))
    }

    pub fn close(&self, window_id: impl Into<WindowId>) {
        self.dispatch(WindowAction::Close {
            window_id: window_id.into(),
        });
    }

    pub fn minimize(&self, window_id: impl Into<WindowId>) {
        self.dispatch(WindowAction::Minimize {
            window_id: window_id.into(),
        });
    }

    pub fn maximize(&self, window_id: impl Into<WindowId>) {
        self.dispatch(WindowAction::Maximize {
            window_id: window_id.into(),
        });
    }

    pub fn focus(&self, window_id: impl Into<WindowId>) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::Focus {
            window_id: window_id.into(),
        })
    }

    pub fn patch(&self, window_id: impl Into<WindowId>, patch: WindowPatch) {
        self.dispatch(WindowAction::Patch {
            window_id: window_id.into(),
            patch,
        });
    }

    fn notify(&self) {
        // Clone the list so callbacks can subscribe, unsubscribe or dispatch re-entrantly.
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in subscribers {
            // Read the slot per callback: an earlier subscriber may have dispatched again.
            callback(self.snapshot());
        }
    }
}

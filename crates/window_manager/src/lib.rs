//! Window lifecycle and stacking state machine for the browser desktop shell.

pub mod config;
pub mod effect_executor;
pub mod keyboard;
pub mod model;
pub mod reducer;
pub mod runtime_context;
pub mod store;
pub mod window_manager;

pub use config::{ConfigError, KeyboardConfig, WindowManagerConfig};
pub use model::*;
pub use reducer::{apply, reduce_windows, WindowAction, WindowEffect};
pub use runtime_context::{
    mount_window_manager, use_window_manager, WindowManagerContext, WindowManagerProvider,
};
pub use store::{SubscriptionId, WindowManagerStore};
pub use window_manager::{check_invariants, InvariantViolation};

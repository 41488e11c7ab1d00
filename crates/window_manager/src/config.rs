//! Typed window manager configuration loaded from TOML.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    CloseFocusFallback, StackingStrategy, WindowDescriptor, WindowId, WindowKind,
    WindowManagerState, WindowPosition, WindowSize, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};

#[derive(Debug, Error)]
/// Failures while loading or validating a [`WindowManagerConfig`].
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed to load.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The TOML body did not match the config schema.
    #[error("failed to parse window manager config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The config parsed but holds values the manager cannot use.
    #[error("invalid window manager config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// `KeyboardEvent.key` value that closes the active window.
    pub close_active_key: String,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            close_active_key: "Backspace".to_string(),
        }
    }
}

/// Largest diagonal cascade offset, in pixels, that validation accepts.
pub const MAX_CASCADE_STEP: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowDefaults {
    pub width: i32,
    pub height: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    /// Diagonal offset between consecutively opened windows.
    pub cascade_step: i32,
    /// Number of cascade positions before wrapping back to the origin.
    pub cascade_slots: u32,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            origin_x: 40,
            origin_y: 48,
            cascade_step: 20,
            cascade_slots: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KindOverride {
    pub title: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    pub stacking: StackingStrategy,
    pub close_focus: CloseFocusFallback,
    pub keyboard: KeyboardConfig,
    pub window_defaults: WindowDefaults,
    /// Per-kind overrides keyed by kind slug (for example `text-editor`).
    pub kinds: BTreeMap<String, KindOverride>,
}

impl WindowManagerConfig {
    /// Parses and validates a TOML config body.
    ///
    /// ```
    /// use window_manager_core::{StackingStrategy, WindowManagerConfig};
    ///
    /// let config = WindowManagerConfig::from_toml_str("stacking = \"counter\"").unwrap();
    /// assert_eq!(config.stacking, StackingStrategy::Counter);
    /// ```
    pub fn from_toml_str(body: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&body)
    }

    /// Checks semantic constraints that TOML deserialization cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = &self.keyboard.close_active_key;
        if key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "keyboard.close_active_key must not be empty".to_string(),
            ));
        }
        // Key presses are matched verbatim against `KeyboardEvent.key`.
        if key.trim() != key {
            return Err(ConfigError::Invalid(format!(
                "keyboard.close_active_key `{key}` has surrounding whitespace"
            )));
        }
        let defaults = self.window_defaults;
        if defaults.width <= 0 || defaults.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "window_defaults size must be positive, got {}x{}",
                defaults.width, defaults.height
            )));
        }
        if defaults.cascade_slots == 0 {
            return Err(ConfigError::Invalid(
                "window_defaults.cascade_slots must be at least 1".to_string(),
            ));
        }
        if defaults.cascade_step.unsigned_abs() > MAX_CASCADE_STEP {
            return Err(ConfigError::Invalid(format!(
                "window_defaults.cascade_step must be within +/-{MAX_CASCADE_STEP}, got {}",
                defaults.cascade_step
            )));
        }
        for (slug, over) in &self.kinds {
            if WindowKind::from_slug(slug).is_none() {
                return Err(ConfigError::Invalid(format!("unknown window kind `{slug}`")));
            }
            let too_small =
                over.width.is_some_and(|w| w <= 0) || over.height.is_some_and(|h| h <= 0);
            if too_small {
                return Err(ConfigError::Invalid(format!(
                    "kinds.{slug} size must be positive"
                )));
            }
        }
        Ok(())
    }

    /// Empty state carrying this config's stacking and close-focus policy.
    pub fn initial_state(&self) -> WindowManagerState {
        WindowManagerState::with_policy(self.stacking, self.close_focus)
    }

    pub fn title_for(&self, kind: WindowKind) -> String {
        self.kind_override(kind)
            .and_then(|over| over.title.clone())
            .unwrap_or_else(|| kind.title().to_string())
    }

    pub fn size_for(&self, kind: WindowKind) -> WindowSize {
        let over = self.kind_override(kind);
        WindowSize {
            width: over
                .and_then(|o| o.width)
                .unwrap_or(self.window_defaults.width),
            height: over
                .and_then(|o| o.height)
                .unwrap_or(self.window_defaults.height),
        }
    }

    fn kind_override(&self, kind: WindowKind) -> Option<&KindOverride> {
        self.kinds.get(kind.slug())
    }

    /// Cascaded placement for the window opened while `open_count` windows are registered.
    pub fn cascade_position(&self, open_count: usize) -> WindowPosition {
        let defaults = self.window_defaults;
        let slots = defaults.cascade_slots.max(1) as usize;
        let slot = i32::try_from(open_count % slots).unwrap_or(i32::MAX);
        let step = slot.saturating_mul(defaults.cascade_step);
        WindowPosition {
            x: defaults.origin_x,
            y: defaults.origin_y,
        }
        .offset(step, step)
    }

    /// Builds an open request for `kind` using the configured title, size and cascade slot.
    pub fn descriptor_for(
        &self,
        state: &WindowManagerState,
        window_id: impl Into<WindowId>,
        kind: WindowKind,
    ) -> WindowDescriptor {
        let size = self.size_for(kind);
        let position = self.cascade_position(state.windows.len());
        WindowDescriptor::new(window_id, kind)
            .with_title(self.title_for(kind))
            .at(position.x, position.y)
            .sized(size.width, size.height)
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;

/// Caller-chosen window identifier.
///
/// Ids are unique among open windows only. Opening an id that is already registered reopens that
/// window instead of creating a second one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WindowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    FileExplorer,
    FileViewer,
    TextEditor,
    ImageViewer,
    Calculator,
    ImageGallery,
    Terminal,
    Calendar,
    Clock,
    Paint,
    MusicPlayer,
    Settings,
}

impl WindowKind {
    pub const ALL: [WindowKind; 12] = [
        Self::FileExplorer,
        Self::FileViewer,
        Self::TextEditor,
        Self::ImageViewer,
        Self::Calculator,
        Self::ImageGallery,
        Self::Terminal,
        Self::Calendar,
        Self::Clock,
        Self::Paint,
        Self::MusicPlayer,
        Self::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::FileExplorer => "File Explorer",
            Self::FileViewer => "File Viewer",
            Self::TextEditor => "Text Editor",
            Self::ImageViewer => "Image Viewer",
            Self::Calculator => "Calculator",
            Self::ImageGallery => "Gallery",
            Self::Terminal => "Terminal",
            Self::Calendar => "Calendar",
            Self::Clock => "Clock",
            Self::Paint => "Paint",
            Self::MusicPlayer => "Music Player",
            Self::Settings => "Settings",
        }
    }

    pub fn icon_id(self) -> &'static str {
        match self {
            Self::FileExplorer => "folder",
            Self::FileViewer => "document",
            Self::TextEditor => "notepad",
            Self::ImageViewer => "image",
            Self::Calculator => "calculator",
            Self::ImageGallery => "gallery",
            Self::Terminal => "terminal",
            Self::Calendar => "calendar",
            Self::Clock => "clock",
            Self::Paint => "paint",
            Self::MusicPlayer => "music",
            Self::Settings => "settings",
        }
    }

    /// Stable kebab-case name, matching the serialized form.
    pub fn slug(self) -> &'static str {
        match self {
            Self::FileExplorer => "file-explorer",
            Self::FileViewer => "file-viewer",
            Self::TextEditor => "text-editor",
            Self::ImageViewer => "image-viewer",
            Self::Calculator => "calculator",
            Self::ImageGallery => "image-gallery",
            Self::Terminal => "terminal",
            Self::Calendar => "calendar",
            Self::Clock => "clock",
            Self::Paint => "paint",
            Self::MusicPlayer => "music-player",
            Self::Settings => "settings",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// One open application window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub kind: WindowKind,
    pub position: WindowPosition,
    pub size: WindowSize,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub stack_level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Open request: everything a [`WindowRecord`] carries except the fields the manager computes
/// (`is_minimized`, `is_maximized`, `stack_level`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDescriptor {
    pub id: WindowId,
    pub title: String,
    pub kind: WindowKind,
    pub position: WindowPosition,
    pub size: WindowSize,
    #[serde(default)]
    pub initial_path: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl WindowDescriptor {
    /// Builds a descriptor with the kind's default title and the built-in default placement.
    pub fn new(id: impl Into<WindowId>, kind: WindowKind) -> Self {
        Self {
            id: id.into(),
            title: kind.title().to_string(),
            kind,
            position: WindowPosition { x: 48, y: 48 },
            size: WindowSize::default(),
            initial_path: None,
            file_path: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = WindowPosition { x, y };
        self
    }

    pub fn sized(mut self, width: i32, height: i32) -> Self {
        self.size = WindowSize { width, height };
        self
    }

    pub fn with_initial_path(mut self, path: impl Into<String>) -> Self {
        self.initial_path = Some(path.into());
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub(crate) fn into_record(self, stack_level: u32) -> WindowRecord {
        WindowRecord {
            id: self.id,
            title: self.title,
            kind: self.kind,
            position: self.position,
            size: self.size,
            is_minimized: false,
            is_maximized: false,
            stack_level,
            initial_path: self.initial_path,
            file_path: self.file_path,
        }
    }
}

/// Partial field update for an open window. `None` leaves the field untouched.
///
/// The path fields use a nested option so a patch can clear them: `Some(None)` removes the
/// payload, `None` keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowPatch {
    pub title: Option<String>,
    pub kind: Option<WindowKind>,
    pub position: Option<WindowPosition>,
    pub size: Option<WindowSize>,
    pub is_minimized: Option<bool>,
    pub is_maximized: Option<bool>,
    pub stack_level: Option<u32>,
    pub initial_path: Option<Option<String>>,
    pub file_path: Option<Option<String>>,
}

impl WindowPatch {
    pub fn position(x: i32, y: i32) -> Self {
        Self {
            position: Some(WindowPosition { x, y }),
            ..Self::default()
        }
    }

    pub fn size(width: i32, height: i32) -> Self {
        Self {
            size: Some(WindowSize { width, height }),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// How new stack levels are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackingStrategy {
    /// Highest level currently in the registry plus one, or 1 for an empty registry.
    #[default]
    MaxPlusOne,
    /// Monotonic counter that never hands out a level twice, even after windows close.
    Counter,
}

/// Which window inherits focus when the active window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseFocusFallback {
    /// Last remaining window in insertion order, regardless of stacking.
    #[default]
    InsertionOrder,
    /// Remaining window with the highest stack level.
    TopmostStack,
}

/// Complete window manager state: the registry plus the focus tracker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowManagerState {
    /// Open windows in insertion order (not stacking order).
    pub windows: Vec<WindowRecord>,
    pub active_id: Option<WindowId>,
    pub stacking: StackingStrategy,
    pub close_focus: CloseFocusFallback,
    /// Highest level ever assigned. Only consulted by [`StackingStrategy::Counter`].
    #[serde(default)]
    pub stack_high_water: u32,
}

impl WindowManagerState {
    pub fn with_policy(stacking: StackingStrategy, close_focus: CloseFocusFallback) -> Self {
        Self {
            stacking,
            close_focus,
            ..Self::default()
        }
    }

    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn active_id(&self) -> Option<&WindowId> {
        self.active_id.as_ref()
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn contains(&self, window_id: &WindowId) -> bool {
        self.window(window_id).is_some()
    }

    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.active_id.as_ref().and_then(|id| self.window(id))
    }

    pub fn max_stack_level(&self) -> Option<u32> {
        self.windows.iter().map(|w| w.stack_level).max()
    }

    /// Windows ordered back-to-front for painting.
    pub fn stacking_order(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|w| w.stack_level);
        ordered
    }

    /// Highest non-minimized window, if any.
    pub fn topmost_visible(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized)
            .max_by_key(|w| w.stack_level)
    }

    /// Taskbar buttons, one per open window, in insertion order.
    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        self.windows
            .iter()
            .map(|w| TaskbarEntry {
                window_id: w.id.clone(),
                title: w.title.clone(),
                icon_id: w.kind.icon_id(),
                is_active: self.active_id.as_ref() == Some(&w.id),
                is_minimized: w.is_minimized,
            })
            .collect()
    }

    /// Serializes the snapshot for a JavaScript renderer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub title: String,
    pub icon_id: &'static str,
    pub is_active: bool,
    pub is_minimized: bool,
}

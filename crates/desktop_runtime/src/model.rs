use desktop_app_contract::ApplicationId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::window_state::{DisplayState, SnapState};

pub const DEFAULT_SCREEN_WIDTH: f64 = 1280.0;
pub const DEFAULT_SCREEN_HEIGHT: f64 = 800.0;
pub const DEFAULT_TASKBAR_HEIGHT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl WindowRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: f64, min_h: f64) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    pub fn right(self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(self) -> f64 {
        self.y + self.h
    }

    pub fn contains(self, point: PointerPosition) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns `true` when the two rectangles share interior area.
    pub fn overlaps(self, other: WindowRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Viewport dimensions with the taskbar docked along the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: f64,
    pub height: f64,
    pub taskbar_height: f64,
}

impl ScreenMetrics {
    pub const fn new(width: f64, height: f64, taskbar_height: f64) -> Self {
        Self {
            width,
            height,
            taskbar_height,
        }
    }

    /// Area available to windows: everything below the taskbar.
    pub fn usable_area(self) -> WindowRect {
        let taskbar = self.taskbar_height.clamp(0.0, self.height.max(0.0));
        WindowRect {
            x: 0.0,
            y: taskbar,
            w: self.width.max(0.0),
            h: (self.height - taskbar).max(0.0),
        }
    }
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self::new(
            DEFAULT_SCREEN_WIDTH,
            DEFAULT_SCREEN_HEIGHT,
            DEFAULT_TASKBAR_HEIGHT,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon_id: String,
    pub bounds: WindowRect,
    pub snap_state: SnapState,
    pub display_state: DisplayState,
    pub prev_bounds: Option<WindowRect>,
    pub prev_snap_state: SnapState,
    pub z_order: u64,
    pub instance_count: u32,
    pub parent_id: Option<WindowId>,
    pub is_focused: bool,
    pub resizable: bool,
    pub launch_params: Value,
}

impl WindowRecord {
    pub fn is_visible(&self) -> bool {
        self.display_state == DisplayState::Visible
    }

    pub fn is_minimized(&self) -> bool {
        self.display_state == DisplayState::Minimized
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub next_z_order: u64,
    pub windows: Vec<WindowRecord>,
    pub screen: ScreenMetrics,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            next_z_order: 1,
            windows: Vec::new(),
            screen: ScreenMetrics::default(),
        }
    }
}

impl DesktopState {
    pub fn with_screen(screen: ScreenMetrics) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn instance_count(&self, app_id: &ApplicationId) -> usize {
        self.windows.iter().filter(|w| &w.app_id == app_id).count()
    }

    /// Topmost visible window under `point`.
    pub fn window_at(&self, point: PointerPosition) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|w| w.is_visible() && w.bounds.contains(point))
            .max_by_key(|w| w.z_order)
            .map(|w| w.id)
    }

    /// Windows sorted bottom-to-top for painting.
    pub fn windows_in_paint_order(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|w| w.z_order);
        ordered
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: ApplicationId,
    pub title: Option<String>,
    pub icon_id: Option<String>,
    pub size: Option<desktop_app_contract::WindowSize>,
    pub parent_id: Option<WindowId>,
    pub resizable: bool,
    pub launch_params: Value,
}

impl OpenWindowRequest {
    pub fn new(app_id: ApplicationId) -> Self {
        Self {
            app_id,
            title: None,
            icon_id: None,
            size: None,
            parent_id: None,
            resizable: true,
            launch_params: Value::Null,
        }
    }

    pub fn child_of(mut self, parent_id: WindowId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

/// Pointer grab recorded by the reducer while a window is being moved.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub moving: Option<MoveSession>,
    pub resizing: Option<ResizeSession>,
}

pub mod apps;
pub mod config;
pub mod drag;
pub mod effect_executor;
pub mod geometry;
pub mod host;
pub mod model;
pub mod reducer;
pub mod runtime_context;
pub mod snap_zone;
pub mod taskbar;
pub mod throttle;
pub mod window_manager;
pub mod window_state;

pub use apps::AppRegistry;
pub use config::{ConfigError, WmConfig};
pub use drag::{DragCommit, DragManager, DragSnapshot};
pub use geometry::{half_bounds, quadrant_bounds, Half, QuadrantSlot};
pub use host::{HostCall, NoopHost, RecordingHost, RuntimeHost};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerContext, ReducerError, RuntimeEffect};
pub use runtime_context::DesktopRuntime;
pub use snap_zone::{detect_snap_zone, SnapZone, SnapZoneThresholds};
pub use taskbar::{TaskbarEntry, TaskbarPreview};
pub use window_state::{
    resolve_action, DisplayAction, DisplayState, InvalidTransition, Resolution, SnapAction,
    SnapState, UserAction,
};

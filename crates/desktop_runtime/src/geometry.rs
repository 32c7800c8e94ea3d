//! Pure rectangle math for halves, quadrants, and the full usable area.
//!
//! All functions take the usable area (viewport minus taskbar) rather than raw screen size so the
//! taskbar offset is applied in exactly one place ([`crate::model::ScreenMetrics::usable_area`]).

use serde::{Deserialize, Serialize};

use crate::model::WindowRect;
use crate::window_state::SnapState;

/// Default spacing between quadrant cells.
pub const QUADRANT_GUTTER: f64 = 12.0;

/// Smallest rectangle side ever returned; degenerate screens still produce a usable window.
const MIN_SIDE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadrantSlot {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl QuadrantSlot {
    pub const ALL: [QuadrantSlot; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Maps a slot index to a quadrant, wrapping modulo four.
    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::TopLeft,
            1 => Self::TopRight,
            2 => Self::BottomLeft,
            _ => Self::BottomRight,
        }
    }

    const fn column(self) -> f64 {
        match self {
            Self::TopLeft | Self::BottomLeft => 0.0,
            Self::TopRight | Self::BottomRight => 1.0,
        }
    }

    const fn row(self) -> f64 {
        match self {
            Self::TopLeft | Self::TopRight => 0.0,
            Self::BottomLeft | Self::BottomRight => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    Left,
    Right,
    Top,
    Bottom,
}

fn non_degenerate(rect: WindowRect) -> WindowRect {
    rect.clamped_min(MIN_SIDE, MIN_SIDE)
}

/// Returns the 2x2 grid cell for `slot`, separated from its neighbours by `gutter`.
///
/// Cell size is `floor((dimension - gutter) / 2)`; there is no outer padding.
pub fn quadrant_bounds(slot: QuadrantSlot, area: WindowRect, gutter: f64) -> WindowRect {
    let gutter = gutter.max(0.0);
    let w = ((area.w - gutter) / 2.0).floor();
    let h = ((area.h - gutter) / 2.0).floor();
    non_degenerate(WindowRect {
        x: area.x + slot.column() * (w + gutter),
        y: area.y + slot.row() * (h + gutter),
        w,
        h,
    })
}

/// Returns one half of the usable area. Left/right (and top/bottom) tile it exactly.
pub fn half_bounds(half: Half, area: WindowRect) -> WindowRect {
    let half_w = (area.w / 2.0).floor();
    let half_h = (area.h / 2.0).floor();
    let rect = match half {
        Half::Left => WindowRect {
            w: half_w,
            ..area
        },
        Half::Right => WindowRect {
            x: area.x + half_w,
            w: area.w - half_w,
            ..area
        },
        Half::Top => WindowRect {
            h: half_h,
            ..area
        },
        Half::Bottom => WindowRect {
            y: area.y + half_h,
            h: area.h - half_h,
            ..area
        },
    };
    non_degenerate(rect)
}

pub fn full_bounds(area: WindowRect) -> WindowRect {
    non_degenerate(area)
}

/// Geometry formula for a snap state; `None` for the free-floating state.
pub fn snap_bounds(snap_state: SnapState, area: WindowRect, gutter: f64) -> Option<WindowRect> {
    let rect = match snap_state {
        SnapState::None => return None,
        SnapState::Left => half_bounds(Half::Left, area),
        SnapState::Right => half_bounds(Half::Right, area),
        SnapState::Top => half_bounds(Half::Top, area),
        SnapState::Bottom => half_bounds(Half::Bottom, area),
        SnapState::Full => full_bounds(area),
        SnapState::Quad(slot) => quadrant_bounds(slot, area, gutter),
    };
    Some(rect)
}

/// Moves `rect` so it lies inside `area`, pinning to the top-left when it is larger than the area.
pub fn clamp_into(rect: WindowRect, area: WindowRect) -> WindowRect {
    let max_x = (area.right() - rect.w).max(area.x);
    let max_y = (area.bottom() - rect.h).max(area.y);
    WindowRect {
        x: rect.x.clamp(area.x, max_x),
        y: rect.y.clamp(area.y, max_y),
        ..rect
    }
}

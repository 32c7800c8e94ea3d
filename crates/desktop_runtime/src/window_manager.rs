//! Shared window-manager transition helpers used by the desktop reducer.

use crate::geometry::{self, clamp_into};
use crate::model::{DesktopState, PointerPosition, ResizeEdge, WindowId, WindowRect};
use crate::window_state::{DisplayState, SnapState};

/// Raises `window_id` to the top of the stack and gives it focus.
///
/// Display and snap state are untouched; focusing a minimized window only raises it, and
/// [`normalize_window_stack`] will hand focus to the next visible window.
///
/// Returns `false` when the window does not exist.
pub fn focus_window_internal(state: &mut DesktopState, window_id: WindowId) -> bool {
    let top_z = state.windows.iter().map(|w| w.z_order).max().unwrap_or(0);
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return false;
    };

    let already_focused_top = window.is_focused && window.z_order == top_z && window.is_visible();
    if already_focused_top {
        return true;
    }

    window.z_order = state.next_z_order;
    state.next_z_order = state.next_z_order.saturating_add(1);
    for window in &mut state.windows {
        window.is_focused = window.id == window_id;
    }
    normalize_window_stack(state);
    true
}

/// Re-establishes the focus invariant: at most one focused window, always a visible one, and the
/// highest-z visible window when the previous holder is gone or hidden.
pub fn normalize_window_stack(state: &mut DesktopState) {
    state.windows.sort_by_key(|w| w.z_order);

    let mut has_focused = false;
    for window in state.windows.iter_mut().rev() {
        if !window.is_visible() {
            window.is_focused = false;
        }
        if window.is_focused {
            if has_focused {
                window.is_focused = false;
            } else {
                has_focused = true;
            }
        }
    }

    if !has_focused {
        if let Some(top_visible) = state.windows.iter_mut().rev().find(|w| w.is_visible()) {
            top_visible.is_focused = true;
        }
    }
}

/// Enters `target`, saving floating geometry only when leaving the floating state.
///
/// Chained snaps keep the original save point so unsnapping returns to where the window floated
/// before the first snap.
pub fn apply_snap(state: &mut DesktopState, window_id: WindowId, target: SnapState, gutter: f64) {
    let area = state.screen.usable_area();
    let Some(bounds) = geometry::snap_bounds(target, area, gutter) else {
        return;
    };
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return;
    };
    if window.snap_state == SnapState::None {
        window.prev_bounds = Some(window.bounds);
        window.prev_snap_state = SnapState::None;
    }
    window.bounds = bounds;
    window.snap_state = target;
}

/// Snaps to `target` using caller-supplied bounds (a drag preview already computed for the
/// current screen). Follows the same save-point rule as [`apply_snap`].
pub fn apply_snap_with_bounds(
    state: &mut DesktopState,
    window_id: WindowId,
    target: SnapState,
    bounds: WindowRect,
) {
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return;
    };
    if window.snap_state == SnapState::None {
        window.prev_bounds = Some(window.bounds);
        window.prev_snap_state = SnapState::None;
    }
    window.bounds = bounds.clamped_min(1.0, 1.0);
    window.snap_state = target;
}

/// Returns to floating geometry, restoring the saved bounds when present.
pub fn release_snap(state: &mut DesktopState, window_id: WindowId) {
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return;
    };
    if let Some(prev) = window.prev_bounds.take() {
        window.bounds = prev;
    }
    window.snap_state = window.prev_snap_state;
    window.prev_snap_state = SnapState::None;
}

pub fn set_display_state(state: &mut DesktopState, window_id: WindowId, display: DisplayState) {
    if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
        window.display_state = display;
        if display != DisplayState::Visible {
            window.is_focused = false;
        }
    }
}

/// Places a window of `size` centered under `pointer`, kept inside the usable area.
pub fn float_under_cursor(
    size: WindowRect,
    pointer: PointerPosition,
    area: WindowRect,
) -> WindowRect {
    let centered = WindowRect {
        x: pointer.x - size.w / 2.0,
        y: pointer.y - size.h / 2.0,
        ..size
    };
    clamp_into(centered, area)
}

/// Recomputes geometry of snapped windows after the screen changed size. Saved floating bounds
/// are pulled back inside the new area too.
pub fn relayout_snapped(state: &mut DesktopState, gutter: f64) {
    let area = state.screen.usable_area();
    for window in &mut state.windows {
        window.prev_bounds = window.prev_bounds.map(|prev| clamp_into(prev, area));
        if let Some(bounds) = geometry::snap_bounds(window.snap_state, area, gutter) {
            window.bounds = bounds;
        } else {
            window.bounds = clamp_into(window.bounds, area);
        }
    }
}

/// Collects `root` and every window transitively parented to it.
pub fn window_family(state: &DesktopState, root: WindowId) -> Vec<WindowId> {
    let mut family = vec![root];
    let mut cursor = 0;
    while cursor < family.len() {
        let parent = family[cursor];
        let children: Vec<WindowId> = state
            .windows
            .iter()
            .filter(|w| w.parent_id == Some(parent) && !family.contains(&w.id))
            .map(|w| w.id)
            .collect();
        family.extend(children);
        cursor += 1;
    }
    family
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: f64, dy: f64) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

/// Clamps a manually resized rectangle to the minimum size, pinning the edge opposite the one
/// being dragged so shrinking past the minimum does not push the window sideways.
pub fn clamp_resized(
    start: WindowRect,
    resized: WindowRect,
    edge: ResizeEdge,
    min_w: f64,
    min_h: f64,
) -> WindowRect {
    let mut rect = resized.clamped_min(min_w, min_h);
    if matches!(
        edge,
        ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
    ) {
        rect.x = start.right() - rect.w;
    }
    if matches!(
        edge,
        ResizeEdge::North | ResizeEdge::NorthWest | ResizeEdge::NorthEast
    ) {
        rect.y = start.bottom() - rect.h;
    }
    rect
}

//! Reducer actions, side-effect intents, and transition logic for the window manager.

use desktop_app_contract::{AppLifecycleEvent, ApplicationId};
use thiserror::Error;
use tracing::debug;

use crate::apps::AppRegistry;
use crate::config::WmConfig;
use crate::geometry::{clamp_into, quadrant_bounds, QuadrantSlot};
use crate::model::{
    DesktopState, InteractionState, MoveSession, OpenWindowRequest, PointerPosition, ResizeEdge,
    ResizeSession, ScreenMetrics, WindowId, WindowRecord, WindowRect,
};
use crate::snap_zone::{zone_bounds, SnapZone};
use crate::window_manager::{
    apply_snap, apply_snap_with_bounds, clamp_resized, float_under_cursor, focus_window_internal,
    normalize_window_stack, relayout_snapped, release_snap, resize_rect, set_display_state,
    window_family,
};
use crate::window_state::{
    resolve_action, DisplayAction, DisplayState, InvalidTransition, SnapAction, SnapState,
    UserAction,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window for an app, subject to its instance policy.
    OpenWindow(OpenWindowRequest),
    /// Close a window and every window parented to it.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a visible window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Restore a minimized window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize to the full usable area.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
    },
    /// Leave the maximized state, restoring the saved floating bounds.
    UnmaximizeWindow {
        /// Window to unmaximize.
        window_id: WindowId,
    },
    /// Title-bar double click: maximize, or unmaximize when already maximized.
    ToggleMaximize {
        /// Window whose title bar was double clicked.
        window_id: WindowId,
    },
    /// Snap into a half, a quadrant, or the full area.
    SnapWindow {
        /// Window to snap.
        window_id: WindowId,
        /// Target snap state.
        snap: SnapState,
    },
    /// Snap into a quadrant slot.
    SnapQuadrant {
        /// Window to snap.
        window_id: WindowId,
        /// Quadrant to occupy.
        slot: QuadrantSlot,
    },
    /// Snap into a zone using bounds computed by the drag preview.
    SnapToBounds {
        /// Window to snap.
        window_id: WindowId,
        /// Zone the window was dropped on.
        zone: SnapZone,
        /// Rectangle to occupy.
        bounds: WindowRect,
    },
    /// Return a snapped window to its saved floating bounds.
    UnsnapWindow {
        /// Window to unsnap.
        window_id: WindowId,
    },
    /// Replace the bounds of a floating window.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// Requested bounds; clamped to the minimum window size.
        rect: WindowRect,
    },
    /// Begin an edge/corner resize gesture.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress resize gesture.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active resize gesture.
    EndResize,
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Release a window drag at `pointer`, snapping to `zone` when one matched.
    EndMove {
        /// Window that was dragged.
        window_id: WindowId,
        /// Drop position.
        pointer: PointerPosition,
        /// Zone under the drop position, if any.
        zone: Option<SnapZone>,
    },
    /// Taskbar button click: restore if minimized, minimize if focused, otherwise focus.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// The viewport changed size.
    SetScreen {
        /// New viewport metrics.
        screen: ScreenMetrics,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the runtime to execute.
pub enum RuntimeEffect {
    /// A new window record was created.
    WindowOpened(WindowId),
    /// Move keyboard focus into the window's primary input.
    FocusWindowInput(WindowId),
    /// Notify the app hosted in a window about a lifecycle transition.
    AppLifecycle {
        /// Window whose app is notified.
        window_id: WindowId,
        /// Lifecycle transition.
        event: AppLifecycleEvent,
    },
    /// Snap a dropped window once the current dispatch has completed.
    CommitSnap {
        /// Window to snap.
        window_id: WindowId,
        /// Zone it was dropped on.
        zone: SnapZone,
        /// Zone rectangle at drop time.
        bounds: WindowRect,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
/// Reducer errors. None of them leave the state partially updated when the caller discards the
/// working copy.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("{0} not found")]
    WindowNotFound(WindowId),
    /// The window state machine rejected the requested transition.
    #[error("{window_id}: {reason}")]
    InvalidTransition {
        /// Window the action targeted.
        window_id: WindowId,
        /// Why the transition was rejected.
        reason: InvalidTransition,
    },
    /// The app is not present in the registry.
    #[error("app `{0}` is not registered")]
    UnknownApp(ApplicationId),
    /// Opening another window would exceed the app's instance limit.
    #[error("app `{app_id}` already has {max_instances} open window(s)")]
    InstanceLimitReached {
        /// App that refused to open.
        app_id: ApplicationId,
        /// Its concurrent window limit.
        max_instances: u32,
    },
    /// The window is snapped, hidden, or declared non-resizable.
    #[error("{0} cannot be resized in its current state")]
    NotResizable(WindowId),
}

/// Read-only collaborators the reducer consults.
#[derive(Debug, Clone, Copy)]
pub struct ReducerContext<'a> {
    /// App descriptors for titles and instance policy.
    pub registry: &'a AppRegistry,
    /// Geometry and size tuning.
    pub config: &'a WmConfig,
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for window management. Callers
/// that need all-or-nothing updates should reduce into a working copy and keep it only on `Ok`.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action targets a missing window, violates an app instance
/// policy, or requests a transition the window state machine rejects.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    ctx: ReducerContext<'_>,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let focused_before = state.focused_window_id();
    let mut effects = Vec::new();
    let gutter = ctx.config.quadrant_gutter;

    match action {
        DesktopAction::OpenWindow(req) => open_window(state, ctx, req, &mut effects)?,
        DesktopAction::CloseWindow { window_id } => {
            apply_user_action(state, window_id, UserAction::Close, gutter, &mut effects)?;
            if interaction
                .moving
                .as_ref()
                .is_some_and(|s| state.window(s.window_id).is_none())
            {
                interaction.moving = None;
            }
            if interaction
                .resizing
                .as_ref()
                .is_some_and(|s| state.window(s.window_id).is_none())
            {
                interaction.resizing = None;
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            if !focus_window_internal(state, window_id) {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => {
            apply_user_action(state, window_id, UserAction::Minimize, gutter, &mut effects)?;
        }
        DesktopAction::RestoreWindow { window_id } => {
            apply_user_action(state, window_id, UserAction::Restore, gutter, &mut effects)?;
        }
        DesktopAction::MaximizeWindow { window_id } => {
            apply_user_action(state, window_id, UserAction::Maximize, gutter, &mut effects)?;
        }
        DesktopAction::UnmaximizeWindow { window_id } => {
            apply_user_action(state, window_id, UserAction::Unmaximize, gutter, &mut effects)?;
        }
        DesktopAction::ToggleMaximize { window_id } => {
            apply_user_action(
                state,
                window_id,
                UserAction::ToggleMaximize,
                gutter,
                &mut effects,
            )?;
        }
        DesktopAction::SnapWindow { window_id, snap } => {
            apply_user_action(state, window_id, UserAction::Snap(snap), gutter, &mut effects)?;
        }
        DesktopAction::SnapQuadrant { window_id, slot } => {
            apply_user_action(
                state,
                window_id,
                UserAction::Snap(SnapState::Quad(slot)),
                gutter,
                &mut effects,
            )?;
        }
        DesktopAction::SnapToBounds {
            window_id,
            zone,
            bounds,
        } => {
            let target = zone.snap_state();
            resolve_for(state, window_id, UserAction::Snap(target))?;
            wake_if_minimized(state, window_id, &mut effects);
            apply_snap_with_bounds(state, window_id, target, bounds);
            focus_window_internal(state, window_id);
        }
        DesktopAction::UnsnapWindow { window_id } => {
            apply_user_action(state, window_id, UserAction::Unsnap, gutter, &mut effects)?;
        }
        DesktopAction::ResizeWindow { window_id, rect } => {
            let window = resizable_window_mut(state, window_id)?;
            window.bounds =
                rect.clamped_min(ctx.config.min_window_width, ctx.config.min_window_height);
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let rect_start = resizable_window_mut(state, window_id)?.bounds;
            focus_window_internal(state, window_id);
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let resized = resize_rect(session.rect_start, session.edge, dx, dy);
                let bounds = clamp_resized(
                    session.rect_start,
                    resized,
                    session.edge,
                    ctx.config.min_window_width,
                    ctx.config.min_window_height,
                );
                let window = resizable_window_mut(state, session.window_id)?;
                window.bounds = bounds;
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let window = find_window(state, window_id)?;
            if !window.is_visible() {
                return Err(ReducerError::InvalidTransition {
                    window_id,
                    reason: InvalidTransition::NotVisible,
                });
            }
            let rect_start = window.bounds;
            focus_window_internal(state, window_id);
            interaction.moving = Some(MoveSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.moving.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, session.window_id)?;
                if window.snap_state == SnapState::None {
                    window.bounds = session.rect_start.offset(dx, dy);
                }
            }
        }
        DesktopAction::EndMove {
            window_id,
            pointer,
            zone,
        } => {
            let rect_start = match interaction.moving.take() {
                Some(session) if session.window_id == window_id => Some(session.rect_start),
                other => {
                    interaction.moving = other;
                    None
                }
            };
            end_move(state, ctx, window_id, pointer, zone, rect_start, &mut effects)?;
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let window = find_window(state, window_id)?;
            let minimized = window.is_minimized();
            let focused = window.is_focused;
            if minimized {
                apply_user_action(state, window_id, UserAction::Restore, gutter, &mut effects)?;
            } else if focused {
                apply_user_action(state, window_id, UserAction::Minimize, gutter, &mut effects)?;
            } else {
                focus_window_internal(state, window_id);
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::SetScreen { screen } => {
            state.screen = screen;
            relayout_snapped(state, gutter);
        }
    }

    normalize_window_stack(state);
    push_focus_change(state, focused_before, &mut effects);
    Ok(effects)
}

fn open_window(
    state: &mut DesktopState,
    ctx: ReducerContext<'_>,
    req: OpenWindowRequest,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let descriptor = ctx
        .registry
        .descriptor(&req.app_id)
        .ok_or_else(|| ReducerError::UnknownApp(req.app_id.clone()))?;
    let policy = descriptor.instance_policy;

    if policy.is_single_instance() {
        let existing = state
            .windows
            .iter()
            .find(|w| w.app_id == req.app_id)
            .map(|w| w.id);
        if let Some(existing) = existing {
            debug!(app = %req.app_id, window = %existing, "single-instance app already open");
            wake_if_minimized(state, existing, effects);
            focus_window_internal(state, existing);
            effects.push(RuntimeEffect::FocusWindowInput(existing));
            return Ok(());
        }
    }

    let running = state.instance_count(&req.app_id);
    if running >= policy.max_instances() as usize {
        return Err(ReducerError::InstanceLimitReached {
            app_id: req.app_id,
            max_instances: policy.max_instances(),
        });
    }
    if let Some(parent_id) = req.parent_id {
        find_window(state, parent_id)?;
    }

    let window_id = next_window_id(state);
    let slot = QuadrantSlot::from_index(state.windows.len());
    let cell = quadrant_bounds(slot, state.screen.usable_area(), ctx.config.quadrant_gutter);
    let bounds = match req.size {
        Some(size) => WindowRect {
            w: size.w,
            h: size.h,
            ..cell
        }
        .clamped_min(1.0, 1.0),
        None => cell,
    };

    state.windows.push(WindowRecord {
        id: window_id,
        title: req.title.unwrap_or_else(|| descriptor.title.clone()),
        icon_id: req.icon_id.unwrap_or_else(|| descriptor.icon_id.clone()),
        app_id: req.app_id,
        bounds,
        snap_state: SnapState::None,
        display_state: DisplayState::Visible,
        prev_bounds: None,
        prev_snap_state: SnapState::None,
        z_order: 0,
        instance_count: running as u32 + 1,
        parent_id: req.parent_id,
        is_focused: false,
        resizable: req.resizable,
        launch_params: req.launch_params,
    });
    focus_window_internal(state, window_id);
    effects.push(RuntimeEffect::WindowOpened(window_id));
    effects.push(RuntimeEffect::AppLifecycle {
        window_id,
        event: AppLifecycleEvent::Mounted,
    });
    effects.push(RuntimeEffect::FocusWindowInput(window_id));
    Ok(())
}

fn end_move(
    state: &mut DesktopState,
    ctx: ReducerContext<'_>,
    window_id: WindowId,
    pointer: PointerPosition,
    zone: Option<SnapZone>,
    rect_start: Option<WindowRect>,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let area = state.screen.usable_area();
    let zone = zone.filter(|zone| *zone != SnapZone::None);
    let target = zone.and_then(|zone| {
        zone_bounds(zone, area, ctx.config.quadrant_gutter).map(|bounds| (zone, bounds))
    });

    let window = find_window_mut(state, window_id)?;
    if let Some((zone, bounds)) = target {
        // The snap save point is where the window floated before the drag, not mid-gesture.
        if window.snap_state == SnapState::None {
            window.bounds = clamp_into(rect_start.unwrap_or(window.bounds), area);
        }
        effects.push(RuntimeEffect::CommitSnap {
            window_id,
            zone,
            bounds,
        });
        return Ok(());
    }

    let size = match (window.snap_state, window.prev_bounds) {
        (SnapState::None, _) | (_, None) => window.bounds,
        (_, Some(prev)) => prev,
    };
    if window.snap_state.is_snapped() {
        window.prev_bounds = None;
        window.prev_snap_state = SnapState::None;
        window.snap_state = SnapState::None;
    }
    window.bounds = float_under_cursor(size, pointer, area);
    Ok(())
}

/// Runs `action` through the window state machine and applies the resolved primitives.
fn apply_user_action(
    state: &mut DesktopState,
    window_id: WindowId,
    action: UserAction,
    gutter: f64,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let resolution = resolve_for(state, window_id, action)?;

    match resolution.display_action {
        Some(DisplayAction::Minimize) => {
            set_display_state(state, window_id, DisplayState::Minimized);
            effects.push(RuntimeEffect::AppLifecycle {
                window_id,
                event: AppLifecycleEvent::Minimized,
            });
        }
        Some(DisplayAction::Restore) => {
            set_display_state(state, window_id, DisplayState::Visible);
            effects.push(RuntimeEffect::AppLifecycle {
                window_id,
                event: AppLifecycleEvent::Restored,
            });
            focus_window_internal(state, window_id);
        }
        Some(DisplayAction::Close) => {
            let family = window_family(state, window_id);
            for id in &family {
                set_display_state(state, *id, DisplayState::Closed);
            }
            state.windows.retain(|w| w.display_state != DisplayState::Closed);
            effects.extend(family.into_iter().rev().map(|id| RuntimeEffect::AppLifecycle {
                window_id: id,
                event: AppLifecycleEvent::Closed,
            }));
            return Ok(());
        }
        None => {}
    }

    match resolution.snap_action {
        Some(SnapAction::Apply(target)) => {
            apply_snap(state, window_id, target, gutter);
            focus_window_internal(state, window_id);
            debug!(window = %window_id, ?target, "snap applied");
        }
        Some(SnapAction::Release) => {
            release_snap(state, window_id);
            focus_window_internal(state, window_id);
            debug!(window = %window_id, "snap released");
        }
        None => {}
    }
    Ok(())
}

fn resolve_for(
    state: &DesktopState,
    window_id: WindowId,
    action: UserAction,
) -> Result<crate::window_state::Resolution, ReducerError> {
    let window = find_window(state, window_id)?;
    resolve_action(window.display_state, window.snap_state, action)
        .into_result()
        .map_err(|reason| ReducerError::InvalidTransition { window_id, reason })
}

fn wake_if_minimized(
    state: &mut DesktopState,
    window_id: WindowId,
    effects: &mut Vec<RuntimeEffect>,
) {
    if state.window(window_id).is_some_and(|w| w.is_minimized()) {
        set_display_state(state, window_id, DisplayState::Visible);
        effects.push(RuntimeEffect::AppLifecycle {
            window_id,
            event: AppLifecycleEvent::Restored,
        });
    }
}

fn push_focus_change(
    state: &DesktopState,
    focused_before: Option<WindowId>,
    effects: &mut Vec<RuntimeEffect>,
) {
    let focused_after = state.focused_window_id();
    if focused_before == focused_after {
        return;
    }
    if let Some(previous) = focused_before.filter(|id| state.window(*id).is_some()) {
        effects.push(RuntimeEffect::AppLifecycle {
            window_id: previous,
            event: AppLifecycleEvent::Blurred,
        });
    }
    if let Some(current) = focused_after {
        effects.push(RuntimeEffect::AppLifecycle {
            window_id: current,
            event: AppLifecycleEvent::Focused,
        });
    }
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window(
    state: &DesktopState,
    window_id: WindowId,
) -> Result<&WindowRecord, ReducerError> {
    state
        .window(window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn resizable_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    let window = find_window_mut(state, window_id)?;
    if !window.resizable || window.snap_state.is_snapped() || !window.is_visible() {
        return Err(ReducerError::NotResizable(window_id));
    }
    Ok(window)
}

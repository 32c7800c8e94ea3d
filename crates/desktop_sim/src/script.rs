//! Replay scripts: a JSON list of input events fed to a [`DesktopRuntime`].

use desktop_app_contract::ApplicationId;
use desktop_runtime::{
    DesktopAction, DesktopRuntime, PointerPosition, QuadrantSlot, ResizeEdge, RuntimeHost,
    SnapState, WindowId, WindowRecord,
};
use platform_host::ManualClock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step {index}: {message}")]
    Step { index: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(raw: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// One input event. Window ids are the numbers assigned in open order, starting at 1.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Open { app: String },
    Close { window: WindowId },
    Focus { window: WindowId },
    Minimize { window: WindowId },
    Restore { window: WindowId },
    Maximize { window: WindowId },
    Unmaximize { window: WindowId },
    DoubleClick { window: WindowId },
    Snap { window: WindowId, snap: SnapState },
    SnapQuadrant { window: WindowId, slot: QuadrantSlot },
    Unsnap { window: WindowId },
    PointerDown { window: WindowId, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    BeginResize { window: WindowId, edge: ResizeEdge, x: f64, y: f64 },
    TaskbarClick { window: WindowId },
    TaskbarHover { window: WindowId },
    TaskbarLeave,
    Viewport { width: f64, height: f64 },
    /// Advances the clock and runs one animation frame.
    Frame { ms: u64 },
}

/// Final desktop snapshot printed after a replay.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub active_window: Option<WindowId>,
    pub taskbar_preview: Option<WindowId>,
    pub windows: Vec<&'a WindowRecord>,
}

pub fn summarize<H: RuntimeHost>(runtime: &DesktopRuntime<ManualClock, H>) -> Summary<'_> {
    Summary {
        active_window: runtime.active_window_id(),
        taskbar_preview: runtime.taskbar_preview(),
        windows: runtime.windows_in_paint_order(),
    }
}

/// Feeds every step to `runtime`, advancing `clock` for frame steps.
///
/// Rejected window actions are logged by the runtime and do not stop the replay; only malformed
/// steps (an invalid app id) abort it.
pub fn replay<H: RuntimeHost>(
    runtime: &mut DesktopRuntime<ManualClock, H>,
    clock: &ManualClock,
    script: &Script,
) -> Result<(), ScriptError> {
    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, ?step, "replaying step");
        apply_step(runtime, clock, step).map_err(|message| ScriptError::Step { index, message })?;
    }
    info!(
        steps = script.steps.len(),
        windows = runtime.state().windows.len(),
        "replay finished"
    );
    Ok(())
}

fn apply_step<H: RuntimeHost>(
    runtime: &mut DesktopRuntime<ManualClock, H>,
    clock: &ManualClock,
    step: &Step,
) -> Result<(), String> {
    match *step {
        Step::Open { ref app } => {
            let app_id = ApplicationId::new(app.as_str())?;
            if let Some(window_id) = runtime.open_app(&app_id) {
                info!(app = %app_id, window = %window_id, "opened");
            }
        }
        Step::Close { window } => runtime.close(window),
        Step::Focus { window } => runtime.set_active(window),
        Step::Minimize { window } => runtime.minimize(window),
        Step::Restore { window } => runtime.restore(window),
        Step::Maximize { window } => {
            runtime.dispatch(DesktopAction::MaximizeWindow { window_id: window })
        }
        Step::Unmaximize { window } => {
            runtime.dispatch(DesktopAction::UnmaximizeWindow { window_id: window })
        }
        Step::DoubleClick { window } => runtime.double_click(window),
        Step::Snap { window, snap } => runtime.dispatch(DesktopAction::SnapWindow {
            window_id: window,
            snap,
        }),
        Step::SnapQuadrant { window, slot } => runtime.dispatch(DesktopAction::SnapQuadrant {
            window_id: window,
            slot,
        }),
        Step::Unsnap { window } => {
            runtime.dispatch(DesktopAction::UnsnapWindow { window_id: window })
        }
        Step::PointerDown { window, x, y } => {
            runtime.pointer_down(window, PointerPosition::new(x, y))
        }
        Step::PointerMove { x, y } => runtime.pointer_move(PointerPosition::new(x, y)),
        Step::PointerUp { x, y } => runtime.pointer_up(PointerPosition::new(x, y)),
        Step::BeginResize { window, edge, x, y } => {
            runtime.begin_resize(window, edge, PointerPosition::new(x, y))
        }
        Step::TaskbarClick { window } => runtime.taskbar_click(window),
        Step::TaskbarHover { window } => runtime.taskbar_hover(window),
        Step::TaskbarLeave => runtime.taskbar_leave(),
        Step::Viewport { width, height } => runtime.resize_viewport(width, height),
        Step::Frame { ms } => {
            clock.advance(ms);
            runtime.animation_frame();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use desktop_runtime::{AppRegistry, NoopHost, WindowRect, WmConfig};
    use pretty_assertions::assert_eq;

    use super::*;

    fn runtime(clock: &ManualClock) -> DesktopRuntime<ManualClock, NoopHost> {
        DesktopRuntime::new(
            AppRegistry::builtin(),
            WmConfig::default(),
            clock.clone(),
            NoopHost,
            1280.0,
            800.0,
        )
    }

    #[test]
    fn parses_tagged_steps() {
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "open", "app": "system.notepad"},
                {"op": "snap", "window": 1, "snap": "Left"},
                {"op": "snap_quadrant", "window": 1, "slot": "BottomRight"},
                {"op": "frame", "ms": 16},
                {"op": "taskbar_leave"}
            ]}"#,
        )
        .expect("parse script");
        assert_eq!(script.steps.len(), 5);
        assert_eq!(
            script.steps[1],
            Step::Snap {
                window: WindowId(1),
                snap: SnapState::Left,
            }
        );
    }

    #[test]
    fn drag_script_snaps_window_left() {
        let clock = ManualClock::new(0);
        let mut rt = runtime(&clock);
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "open", "app": "system.notepad"},
                {"op": "pointer_down", "window": 1, "x": 200, "y": 60},
                {"op": "pointer_move", "x": 5, "y": 400},
                {"op": "frame", "ms": 16},
                {"op": "pointer_up", "x": 5, "y": 400}
            ]}"#,
        )
        .expect("parse script");

        replay(&mut rt, &clock, &script).expect("replay");
        let summary = summarize(&rt);
        assert_eq!(summary.active_window, Some(WindowId(1)));
        assert_eq!(summary.windows[0].snap_state, SnapState::Left);
        assert_eq!(summary.windows[0].bounds, WindowRect::new(0.0, 40.0, 640.0, 760.0));
    }

    #[test]
    fn invalid_app_id_aborts_with_step_index() {
        let clock = ManualClock::new(0);
        let mut rt = runtime(&clock);
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "open", "app": "system.notepad"},
                {"op": "open", "app": "Not An Id"}
            ]}"#,
        )
        .expect("parse script");
        let err = replay(&mut rt, &clock, &script).unwrap_err();
        assert!(matches!(err, ScriptError::Step { index: 1, .. }));
    }

    #[test]
    fn rejected_actions_do_not_abort_replay() {
        let clock = ManualClock::new(0);
        let mut rt = runtime(&clock);
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "close", "window": 42},
                {"op": "open", "app": "system.calculator"},
                {"op": "unmaximize", "window": 1}
            ]}"#,
        )
        .expect("parse script");
        replay(&mut rt, &clock, &script).expect("replay");
        assert_eq!(rt.state().windows.len(), 1);
    }
}

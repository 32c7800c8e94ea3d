//! Runtime container and input wiring for the window manager.
//!
//! [`DesktopRuntime`] owns the long-lived reducer state, the drag session, the taskbar preview and
//! the injected collaborators (app registry, config, clock, host). Every state change goes through
//! [`DesktopRuntime::dispatch`], which reduces into a working copy, commits only on success, and
//! then drains the effect queue through [`crate::effect_executor`].

use desktop_app_contract::ApplicationId;
use platform_host::Clock;
use tracing::{debug, warn};

use crate::{
    apps::AppRegistry,
    config::WmConfig,
    drag::{DragManager, DragSnapshot},
    effect_executor,
    host::RuntimeHost,
    model::{
        DesktopState, InteractionState, PointerPosition, ResizeEdge, WindowId, WindowRecord,
    },
    reducer::{reduce_desktop, DesktopAction, ReducerContext, ReducerError, RuntimeEffect},
    taskbar::{preferred_window_for_app, taskbar_entries, TaskbarEntry, TaskbarPreview},
};

/// Long-lived window-manager container.
pub struct DesktopRuntime<C: Clock, H: RuntimeHost> {
    state: DesktopState,
    interaction: InteractionState,
    drag: DragManager,
    preview: TaskbarPreview,
    registry: AppRegistry,
    config: WmConfig,
    clock: C,
    host: H,
}

impl<C: Clock, H: RuntimeHost> DesktopRuntime<C, H> {
    /// Builds a runtime with an empty desktop sized `width` x `height`.
    pub fn new(
        registry: AppRegistry,
        config: WmConfig,
        clock: C,
        host: H,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            state: DesktopState::with_screen(config.screen(width, height)),
            interaction: InteractionState::default(),
            drag: DragManager::new(&config),
            preview: TaskbarPreview::new(config.taskbar_preview_dismiss_ms),
            registry,
            config,
            clock,
            host,
        }
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Reduces `action` and runs its effects. Rejections are logged and leave state untouched.
    pub fn dispatch(&mut self, action: DesktopAction) {
        if let Err(err) = self.try_dispatch(action) {
            warn!("desktop reducer error: {err}");
        }
    }

    /// Like [`Self::dispatch`], but returns the rejection and the effects of `action` itself.
    ///
    /// Effects of deferred follow-up actions are executed but not returned.
    ///
    /// # Errors
    ///
    /// Returns the [`ReducerError`] for a rejected `action`; the state is not modified.
    pub fn try_dispatch(
        &mut self,
        action: DesktopAction,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let effects = self.reduce_and_commit(action)?;

        let Self {
            state,
            interaction,
            registry,
            config,
            host,
            ..
        } = self;
        let applied = effect_executor::drain(host, effects.clone(), |follow_up| {
            commit_reduction(state, interaction, registry, config, follow_up)
        });
        if applied > 0 {
            debug!(applied, "deferred desktop actions applied");
        }

        self.after_commit();
        Ok(effects)
    }

    fn reduce_and_commit(
        &mut self,
        action: DesktopAction,
    ) -> Result<Vec<RuntimeEffect>, ReducerError> {
        commit_reduction(
            &mut self.state,
            &mut self.interaction,
            &self.registry,
            &self.config,
            action,
        )
    }

    fn after_commit(&mut self) {
        if let Some(window_id) = self.drag.session().map(|session| session.window_id) {
            if self.state.window(window_id).is_none() {
                self.drag.forget_window(window_id);
            }
        }
        self.preview.retain_existing(&self.state);
    }

    /// Opens `app_id` with its registry defaults.
    ///
    /// Returns the new window, the existing window of a single-instance app, or `None` when the
    /// open was refused.
    pub fn open_app(&mut self, app_id: &ApplicationId) -> Option<WindowId> {
        let request = self.registry.default_open_request(app_id);
        match self.try_dispatch(DesktopAction::OpenWindow(request)) {
            Ok(effects) => effects.iter().find_map(|effect| match effect {
                RuntimeEffect::WindowOpened(id) | RuntimeEffect::FocusWindowInput(id) => Some(*id),
                _ => None,
            }),
            Err(err) => {
                warn!(app = %app_id, "open refused: {err}");
                None
            }
        }
    }

    pub fn set_active(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::FocusWindow { window_id });
    }

    pub fn minimize(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::MinimizeWindow { window_id });
    }

    pub fn restore(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::RestoreWindow { window_id });
    }

    pub fn toggle_maximize(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::ToggleMaximize { window_id });
    }

    pub fn close(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::CloseWindow { window_id });
    }

    /// Title-bar double click.
    pub fn double_click(&mut self, window_id: WindowId) {
        self.toggle_maximize(window_id);
    }

    pub fn taskbar_click(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::ToggleTaskbarWindow { window_id });
    }

    /// Pinned-app click: toggles the app's most relevant window, or launches the app.
    pub fn activate_app(&mut self, app_id: &ApplicationId) -> Option<WindowId> {
        match preferred_window_for_app(&self.state, app_id) {
            Some(window_id) => {
                self.taskbar_click(window_id);
                Some(window_id)
            }
            None => self.open_app(app_id),
        }
    }

    pub fn taskbar_hover(&mut self, window_id: WindowId) {
        if self.state.window(window_id).is_some() {
            self.preview.hover(window_id);
        }
    }

    pub fn taskbar_leave(&mut self) {
        let now = self.clock.now_ms();
        self.preview.leave(now);
    }

    /// Viewport resize.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        let screen = self.config.screen(width, height);
        self.dispatch(DesktopAction::SetScreen { screen });
    }

    /// Title-bar press: starts a drag session and a move gesture.
    pub fn pointer_down(&mut self, window_id: WindowId, pointer: PointerPosition) {
        match self.try_dispatch(DesktopAction::BeginMove { window_id, pointer }) {
            Ok(_) => {
                let now = self.clock.now_ms();
                self.drag.drag_start(window_id, pointer, now);
            }
            Err(err) => {
                warn!("drag not started: {err}");
                self.drag.cancel();
            }
        }
    }

    /// Resize-handle press.
    pub fn begin_resize(
        &mut self,
        window_id: WindowId,
        edge: ResizeEdge,
        pointer: PointerPosition,
    ) {
        self.drag.cancel();
        self.dispatch(DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        });
    }

    /// Pointer motion. Drag samples are coalesced until the next animation frame; resize
    /// gestures apply immediately.
    pub fn pointer_move(&mut self, pointer: PointerPosition) {
        if self.interaction.resizing.is_some() {
            self.dispatch(DesktopAction::UpdateResize { pointer });
        } else if self.drag.is_dragging() {
            self.drag.drag_move(pointer);
        }
    }

    /// Pointer release: ends a resize, or releases the drag and commits its drop target.
    pub fn pointer_up(&mut self, pointer: PointerPosition) {
        if self.interaction.resizing.is_some() {
            self.dispatch(DesktopAction::EndResize);
            return;
        }
        let area = self.state.screen.usable_area();
        let Some(commit) = self.drag.drag_end(pointer, area) else {
            return;
        };
        self.dispatch(DesktopAction::EndMove {
            window_id: commit.window_id,
            pointer: commit.pointer,
            zone: commit.zone,
        });
    }

    /// Abandons an in-progress drag (pointer left the tracked area).
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.interaction.moving = None;
    }

    /// Runs one animation frame: throttled drag evaluation, window follow, preview dismissal.
    ///
    /// Returns `true` when anything a renderer shows may have changed.
    pub fn animation_frame(&mut self) -> bool {
        let now = self.clock.now_ms();
        let area = self.state.screen.usable_area();
        let mut changed = self.drag.on_frame(now, area);

        let follow = self
            .drag
            .session()
            .map(|session| session.pointer)
            .filter(|_| self.interaction.moving.is_some());
        if let Some(pointer) = follow {
            let before = self.state.clone();
            self.dispatch(DesktopAction::UpdateMove { pointer });
            changed |= before != self.state;
        }

        changed |= self.preview.tick(now);
        changed
    }

    pub fn windows_in_paint_order(&self) -> Vec<&WindowRecord> {
        self.state.windows_in_paint_order()
    }

    /// Topmost visible window under `pointer`, for routing presses.
    pub fn window_at(&self, pointer: PointerPosition) -> Option<WindowId> {
        self.state.window_at(pointer)
    }

    pub fn active_window_id(&self) -> Option<WindowId> {
        self.state.focused_window_id()
    }

    pub fn drag_snapshot(&self) -> DragSnapshot {
        self.drag.snapshot()
    }

    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        taskbar_entries(&self.state)
    }

    pub fn taskbar_preview(&self) -> Option<WindowId> {
        self.preview.visible()
    }
}

/// Reduces into a working copy and commits it only when the reducer accepts the action.
fn commit_reduction(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    registry: &AppRegistry,
    config: &WmConfig,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut desktop = state.clone();
    let mut ui = interaction.clone();
    let ctx = ReducerContext { registry, config };
    let effects = reduce_desktop(&mut desktop, &mut ui, ctx, action)?;
    *state = desktop;
    *interaction = ui;
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::AppLifecycleEvent;
    use platform_host::ManualClock;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use crate::model::WindowRect;
    use crate::snap_zone::SnapZone;
    use crate::window_state::SnapState;

    fn runtime() -> (DesktopRuntime<ManualClock, RecordingHost>, ManualClock) {
        let clock = ManualClock::new(1_000);
        let runtime = DesktopRuntime::new(
            AppRegistry::builtin(),
            WmConfig::default(),
            clock.clone(),
            RecordingHost::new(),
            1280.0,
            800.0,
        );
        (runtime, clock)
    }

    fn open(runtime: &mut DesktopRuntime<ManualClock, RecordingHost>, app: &str) -> WindowId {
        runtime
            .open_app(&ApplicationId::trusted(app))
            .expect("app opens")
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let (mut rt, _) = runtime();
        let id = open(&mut rt, "system.notepad");
        let before = rt.state().clone();

        rt.dispatch(DesktopAction::UnmaximizeWindow { window_id: id });
        rt.close(WindowId(99));

        assert_eq!(rt.state(), &before);
    }

    #[test]
    fn open_reports_host_effects_in_order() {
        let (mut rt, _) = runtime();
        let id = open(&mut rt, "system.notepad");
        assert_eq!(
            rt.host().calls(),
            &[
                HostCall::Opened(id),
                HostCall::Lifecycle(id, AppLifecycleEvent::Mounted),
                HostCall::FocusInput(id),
                HostCall::Lifecycle(id, AppLifecycleEvent::Focused),
            ]
        );
    }

    #[test]
    fn drag_to_left_edge_snaps_after_release() {
        let (mut rt, clock) = runtime();
        let id = open(&mut rt, "system.notepad");

        rt.pointer_down(id, PointerPosition::new(300.0, 60.0));
        rt.pointer_move(PointerPosition::new(200.0, 300.0));
        rt.pointer_move(PointerPosition::new(5.0, 400.0));
        clock.advance(16);
        assert!(rt.animation_frame());
        assert_eq!(rt.drag_snapshot().candidate_zone, Some(SnapZone::Left));
        assert!(!rt.drag_snapshot().show_overlay);

        clock.advance(100);
        rt.animation_frame();
        assert!(rt.drag_snapshot().show_overlay);

        rt.pointer_up(PointerPosition::new(5.0, 400.0));
        let window = rt.state().window(id).expect("window");
        assert_eq!(window.snap_state, SnapState::Left);
        assert_eq!(window.bounds, WindowRect::new(0.0, 40.0, 640.0, 760.0));
        assert_eq!(rt.drag_snapshot(), DragSnapshot::default());
        assert!(rt.interaction().moving.is_none());

        rt.pointer_up(PointerPosition::new(1275.0, 45.0));
        assert_eq!(rt.state().window(id).map(|w| w.snap_state), Some(SnapState::Left));
    }

    #[test]
    fn drag_of_minimized_window_is_refused() {
        let (mut rt, _) = runtime();
        let id = open(&mut rt, "system.notepad");
        rt.minimize(id);
        rt.pointer_down(id, PointerPosition::new(10.0, 50.0));
        assert!(rt.drag_snapshot().active_id.is_none());
    }

    #[test]
    fn closing_dragged_window_drops_the_session() {
        let (mut rt, _) = runtime();
        let id = open(&mut rt, "system.notepad");
        rt.pointer_down(id, PointerPosition::new(100.0, 60.0));
        rt.close(id);
        assert!(rt.drag_snapshot().active_id.is_none());
        rt.pointer_up(PointerPosition::new(5.0, 400.0));
        assert!(rt.state().windows.is_empty());
    }

    #[test]
    fn taskbar_preview_dismisses_on_frame_after_delay() {
        let (mut rt, clock) = runtime();
        let id = open(&mut rt, "system.notepad");
        rt.taskbar_hover(id);
        rt.taskbar_leave();
        clock.advance(200);
        rt.animation_frame();
        assert_eq!(rt.taskbar_preview(), Some(id));
        clock.advance(20);
        assert!(rt.animation_frame());
        assert_eq!(rt.taskbar_preview(), None);
    }

    #[test]
    fn pinned_app_click_launches_then_toggles() {
        let (mut rt, _) = runtime();
        let app_id = ApplicationId::trusted("system.terminal");
        let id = rt.activate_app(&app_id).expect("launch");
        assert_eq!(rt.state().windows.len(), 1);

        assert_eq!(rt.activate_app(&app_id), Some(id));
        assert!(rt.state().window(id).is_some_and(|w| w.is_minimized()));
        rt.activate_app(&app_id);
        assert_eq!(rt.active_window_id(), Some(id));
        assert_eq!(rt.state().windows.len(), 1);
    }

    #[test]
    fn window_at_prefers_topmost_visible_window() {
        let (mut rt, _) = runtime();
        let below = open(&mut rt, "system.notepad");
        rt.dispatch(DesktopAction::ResizeWindow {
            window_id: below,
            rect: WindowRect::new(0.0, 40.0, 800.0, 600.0),
        });
        let above = open(&mut rt, "system.explorer");
        let point = PointerPosition::new(700.0, 100.0);

        assert_eq!(rt.window_at(point), Some(above));
        rt.minimize(above);
        assert_eq!(rt.window_at(point), Some(below));
        assert_eq!(rt.window_at(PointerPosition::new(1200.0, 780.0)), None);
    }

    #[test]
    fn viewport_resize_keeps_maximized_window_full() {
        let (mut rt, _) = runtime();
        let id = open(&mut rt, "system.notepad");
        rt.double_click(id);
        rt.resize_viewport(1920.0, 1080.0);
        assert_eq!(
            rt.state().window(id).map(|w| w.bounds),
            Some(WindowRect::new(0.0, 40.0, 1920.0, 1040.0))
        );
    }
}

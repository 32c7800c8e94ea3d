//! Host boundary for runtime side effects.
//!
//! The reducer never talks to the outside world. Effects it emits are routed by
//! [`crate::effect_executor`] to a [`RuntimeHost`], which a rendering layer implements to move
//! keyboard focus and notify hosted apps. [`NoopHost`] discards everything and [`RecordingHost`]
//! keeps an ordered log for assertions.

use desktop_app_contract::AppLifecycleEvent;
use tracing::trace;

use crate::model::WindowId;

/// Side-effect sink injected into [`crate::runtime_context::DesktopRuntime`].
pub trait RuntimeHost {
    /// A window record was created and is ready to mount.
    fn window_opened(&mut self, window_id: WindowId);

    /// Moves keyboard focus into the window's primary input.
    fn focus_window_input(&mut self, window_id: WindowId);

    /// Delivers a lifecycle transition to the app hosted in `window_id`.
    fn dispatch_lifecycle(&mut self, window_id: WindowId, event: AppLifecycleEvent);
}

#[derive(Debug, Clone, Copy, Default)]
/// Host that ignores every effect.
pub struct NoopHost;

impl RuntimeHost for NoopHost {
    fn window_opened(&mut self, window_id: WindowId) {
        trace!(window = %window_id, "window opened (noop host)");
    }

    fn focus_window_input(&mut self, _window_id: WindowId) {}

    fn dispatch_lifecycle(&mut self, _window_id: WindowId, _event: AppLifecycleEvent) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One call observed by [`RecordingHost`].
pub enum HostCall {
    Opened(WindowId),
    FocusInput(WindowId),
    Lifecycle(WindowId, AppLifecycleEvent),
}

#[derive(Debug, Clone, Default)]
/// Host that records every call in order.
pub struct RecordingHost {
    calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Lifecycle events delivered to `window_id`, oldest first.
    pub fn lifecycle_events(&self, window_id: WindowId) -> Vec<AppLifecycleEvent> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Lifecycle(id, event) if *id == window_id => Some(*event),
                _ => None,
            })
            .collect()
    }
}

impl RuntimeHost for RecordingHost {
    fn window_opened(&mut self, window_id: WindowId) {
        self.calls.push(HostCall::Opened(window_id));
    }

    fn focus_window_input(&mut self, window_id: WindowId) {
        self.calls.push(HostCall::FocusInput(window_id));
    }

    fn dispatch_lifecycle(&mut self, window_id: WindowId, event: AppLifecycleEvent) {
        self.calls.push(HostCall::Lifecycle(window_id, event));
    }
}

impl<H: RuntimeHost + ?Sized> RuntimeHost for &mut H {
    fn window_opened(&mut self, window_id: WindowId) {
        (**self).window_opened(window_id);
    }

    fn focus_window_input(&mut self, window_id: WindowId) {
        (**self).focus_window_input(window_id);
    }

    fn dispatch_lifecycle(&mut self, window_id: WindowId, event: AppLifecycleEvent) {
        (**self).dispatch_lifecycle(window_id, event);
    }
}

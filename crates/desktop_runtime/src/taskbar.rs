//! Taskbar model: button ordering and the hover preview with delayed dismissal.

use desktop_app_contract::ApplicationId;

use crate::model::{DesktopState, WindowId};

/// One running-window button on the taskbar.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon_id: String,
    pub is_focused: bool,
    pub is_minimized: bool,
}

/// Taskbar buttons in launch order. Focus changes never reshuffle the buttons.
pub fn taskbar_entries(state: &DesktopState) -> Vec<TaskbarEntry> {
    let mut entries: Vec<TaskbarEntry> = state
        .windows
        .iter()
        .map(|win| TaskbarEntry {
            window_id: win.id,
            app_id: win.app_id.clone(),
            title: win.title.clone(),
            icon_id: win.icon_id.clone(),
            is_focused: win.is_focused,
            is_minimized: win.is_minimized(),
        })
        .collect();
    entries.sort_by_key(|entry| entry.window_id);
    entries
}

/// Most relevant window of `app_id` for a pinned-app click: the focused one, then any visible one,
/// then the newest.
pub fn preferred_window_for_app(state: &DesktopState, app_id: &ApplicationId) -> Option<WindowId> {
    let mut candidates: Vec<_> = state.windows.iter().filter(|w| &w.app_id == app_id).collect();
    candidates.sort_by_key(|w| w.z_order);
    candidates
        .iter()
        .rev()
        .find(|w| w.is_focused)
        .or_else(|| candidates.iter().rev().find(|w| w.is_visible()))
        .or_else(|| candidates.iter().max_by_key(|w| w.id))
        .map(|w| w.id)
}

/// Hover preview for taskbar buttons.
///
/// Entering a button shows its preview at once. Leaving schedules dismissal after the configured
/// delay so the pointer can travel from the button to the preview; entering any button before the
/// deadline cancels it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskbarPreview {
    dismiss_after_ms: u64,
    visible: Option<WindowId>,
    dismiss_at_ms: Option<u64>,
}

impl TaskbarPreview {
    pub fn new(dismiss_after_ms: u64) -> Self {
        Self {
            dismiss_after_ms,
            visible: None,
            dismiss_at_ms: None,
        }
    }

    pub fn visible(&self) -> Option<WindowId> {
        self.visible
    }

    pub fn is_dismiss_pending(&self) -> bool {
        self.dismiss_at_ms.is_some()
    }

    pub fn hover(&mut self, window_id: WindowId) {
        self.visible = Some(window_id);
        self.dismiss_at_ms = None;
    }

    pub fn leave(&mut self, now_ms: u64) {
        if self.visible.is_some() {
            self.dismiss_at_ms = Some(now_ms.saturating_add(self.dismiss_after_ms));
        }
    }

    /// Applies a due dismissal. Returns `true` when the preview was hidden.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.dismiss_at_ms {
            Some(deadline) if now_ms >= deadline => {
                self.visible = None;
                self.dismiss_at_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Hides the preview immediately if it belongs to a window that no longer exists.
    pub fn retain_existing(&mut self, state: &DesktopState) {
        if self.visible.is_some_and(|id| state.window(id).is_none()) {
            self.visible = None;
            self.dismiss_at_ms = None;
        }
    }
}

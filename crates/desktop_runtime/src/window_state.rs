//! Two-axis window state machine: display (visible/minimized/closed) by snap (floating or one
//! of the snapped layouts).
//!
//! [`resolve_action`] turns a compound user intent into at most one primitive transition per
//! axis. Invalid requests come back with `valid: false` and an [`InvalidTransition`] reason; the
//! caller decides whether to log and ignore them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::QuadrantSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayState {
    Visible,
    Minimized,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapState {
    None,
    Left,
    Right,
    Top,
    Bottom,
    Full,
    Quad(QuadrantSlot),
}

impl SnapState {
    pub const fn is_snapped(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayAction {
    Minimize,
    Restore,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapAction {
    /// Enter (or switch to) a snapped state, including `Full` for maximize.
    Apply(SnapState),
    /// Return to floating geometry, restoring the saved bounds.
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    ToggleMaximize,
    Maximize,
    Unmaximize,
    Snap(SnapState),
    Unsnap,
    Minimize,
    Restore,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InvalidTransition {
    #[error("window is closed")]
    WindowClosed,
    #[error("window is already minimized")]
    AlreadyMinimized,
    #[error("window is not minimized")]
    NotMinimized,
    #[error("window is not visible")]
    NotVisible,
    #[error("window is not maximized")]
    NotMaximized,
    #[error("window is not snapped")]
    NotSnapped,
    #[error("snapping to the floating state is not a snap; use unsnap")]
    SnapToNone,
}

/// Outcome of resolving a [`UserAction`] against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub display_action: Option<DisplayAction>,
    pub snap_action: Option<SnapAction>,
    pub valid: bool,
    pub reason: Option<InvalidTransition>,
}

impl Resolution {
    fn ok(display_action: Option<DisplayAction>, snap_action: Option<SnapAction>) -> Self {
        Self {
            display_action,
            snap_action,
            valid: true,
            reason: None,
        }
    }

    fn invalid(reason: InvalidTransition) -> Self {
        Self {
            display_action: None,
            snap_action: None,
            valid: false,
            reason: Some(reason),
        }
    }

    /// Converts to a `Result`, surfacing the rejection reason.
    pub fn into_result(self) -> Result<Self, InvalidTransition> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(self),
        }
    }
}

/// Display-axis transition table. `None` means the transition does not exist.
pub fn display_transition(state: DisplayState, action: DisplayAction) -> Option<DisplayState> {
    match (state, action) {
        (DisplayState::Visible, DisplayAction::Minimize) => Some(DisplayState::Minimized),
        (DisplayState::Minimized, DisplayAction::Restore) => Some(DisplayState::Visible),
        (DisplayState::Visible | DisplayState::Minimized, DisplayAction::Close) => {
            Some(DisplayState::Closed)
        }
        _ => None,
    }
}

/// Snap-axis transition table. Chained snaps go directly between snapped states.
pub fn snap_transition(state: SnapState, action: SnapAction) -> Option<SnapState> {
    match (state, action) {
        (_, SnapAction::Apply(SnapState::None)) => None,
        (_, SnapAction::Apply(target)) => Some(target),
        (SnapState::None, SnapAction::Release) => None,
        (_, SnapAction::Release) => Some(SnapState::None),
    }
}

/// Resolves a compound user intent into primitive display/snap transitions.
///
/// Snap-axis actions on a minimized window restore it first, so the window wakes up in the
/// requested layout instead of floating.
pub fn resolve_action(display: DisplayState, snap: SnapState, action: UserAction) -> Resolution {
    if display == DisplayState::Closed {
        return Resolution::invalid(InvalidTransition::WindowClosed);
    }
    let wake = match display {
        DisplayState::Minimized => Some(DisplayAction::Restore),
        _ => None,
    };

    match action {
        UserAction::Minimize => match display {
            DisplayState::Visible => Resolution::ok(Some(DisplayAction::Minimize), None),
            _ => Resolution::invalid(InvalidTransition::AlreadyMinimized),
        },
        UserAction::Restore => match display {
            DisplayState::Minimized => Resolution::ok(Some(DisplayAction::Restore), None),
            _ => Resolution::invalid(InvalidTransition::NotMinimized),
        },
        UserAction::Close => Resolution::ok(Some(DisplayAction::Close), None),
        UserAction::ToggleMaximize => match (display, snap) {
            (DisplayState::Visible, SnapState::Full) => {
                Resolution::ok(None, Some(SnapAction::Release))
            }
            _ => Resolution::ok(wake, Some(SnapAction::Apply(SnapState::Full))),
        },
        UserAction::Maximize => Resolution::ok(wake, Some(SnapAction::Apply(SnapState::Full))),
        UserAction::Snap(SnapState::None) => Resolution::invalid(InvalidTransition::SnapToNone),
        UserAction::Snap(target) => Resolution::ok(wake, Some(SnapAction::Apply(target))),
        UserAction::Unmaximize => match snap {
            SnapState::Full => Resolution::ok(wake, Some(SnapAction::Release)),
            _ => Resolution::invalid(InvalidTransition::NotMaximized),
        },
        UserAction::Unsnap => match snap {
            SnapState::None => Resolution::invalid(InvalidTransition::NotSnapped),
            _ => Resolution::ok(wake, Some(SnapAction::Release)),
        },
    }
}

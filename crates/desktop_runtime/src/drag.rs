//! Drag session tracking: throttled snap-zone evaluation and a single commit per drop.

use tracing::debug;

use crate::config::WmConfig;
use crate::model::{PointerPosition, WindowId, WindowRect};
use crate::snap_zone::{detect_snap_zone, zone_bounds, SnapZone, SnapZoneThresholds};
use crate::throttle::FrameThrottle;

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer: PointerPosition,
    pub candidate: Option<SnapZone>,
    pub preview: Option<WindowRect>,
    pub started_at_ms: u64,
    pub show_overlay: bool,
}

/// Read-only view of the live drag for rendering snap guides.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSnapshot {
    pub active_id: Option<WindowId>,
    pub candidate_zone: Option<SnapZone>,
    pub preview_rect: Option<WindowRect>,
    pub show_overlay: bool,
}

/// Result of releasing a drag. `zone` is `None` when the drop landed in the dead zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCommit {
    pub window_id: WindowId,
    pub zone: Option<SnapZone>,
    pub pointer: PointerPosition,
}

#[derive(Debug, Clone)]
pub struct DragManager {
    session: Option<DragSession>,
    frames: FrameThrottle<PointerPosition>,
    thresholds: SnapZoneThresholds,
    gutter: f64,
    overlay_delay_ms: u64,
}

impl DragManager {
    pub fn new(config: &WmConfig) -> Self {
        Self {
            session: None,
            frames: FrameThrottle::new(config.frame_interval_ms),
            thresholds: config.snap_thresholds(),
            gutter: config.quadrant_gutter,
            overlay_delay_ms: config.overlay_delay_ms,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a new session, abandoning any previous one together with its queued frame.
    pub fn drag_start(&mut self, window_id: WindowId, pointer: PointerPosition, now_ms: u64) {
        if let Some(previous) = self.session.take() {
            debug!(window = %previous.window_id, "drag session superseded");
        }
        self.frames.cancel();
        self.session = Some(DragSession {
            window_id,
            pointer,
            candidate: None,
            preview: None,
            started_at_ms: now_ms,
            show_overlay: false,
        });
    }

    /// Queues a pointer sample; only the latest sample survives until the next frame.
    pub fn drag_move(&mut self, pointer: PointerPosition) {
        if self.session.is_some() {
            self.frames.push(pointer);
        }
    }

    /// Runs one animation frame. Returns `true` when the snapshot visible to renderers changed.
    pub fn on_frame(&mut self, now_ms: u64, area: WindowRect) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let mut changed = false;

        if !session.show_overlay
            && now_ms.saturating_sub(session.started_at_ms) >= self.overlay_delay_ms
        {
            session.show_overlay = true;
            changed = true;
        }

        if let Some(pointer) = self.frames.poll(now_ms) {
            session.pointer = pointer;
            let zone = detect_snap_zone(pointer, area, self.thresholds);
            let candidate = (zone != SnapZone::None).then_some(zone);
            let preview = candidate.and_then(|zone| zone_bounds(zone, area, self.gutter));
            if candidate != session.candidate || preview != session.preview {
                debug!(window = %session.window_id, ?candidate, "snap candidate changed");
                session.candidate = candidate;
                session.preview = preview;
                changed = true;
            }
        }

        changed
    }

    /// Ends the session at `pointer` and returns the commit target.
    ///
    /// Taking the session is the commit guard: calling this again (or after [`Self::cancel`])
    /// returns `None`.
    pub fn drag_end(&mut self, pointer: PointerPosition, area: WindowRect) -> Option<DragCommit> {
        self.frames.cancel();
        let session = self.session.take()?;
        let zone = detect_snap_zone(pointer, area, self.thresholds);
        let commit = DragCommit {
            window_id: session.window_id,
            zone: (zone != SnapZone::None).then_some(zone),
            pointer,
        };
        debug!(window = %commit.window_id, zone = ?commit.zone, "drag released");
        Some(commit)
    }

    /// Abandons the active session without committing.
    pub fn cancel(&mut self) {
        self.frames.cancel();
        if let Some(session) = self.session.take() {
            debug!(window = %session.window_id, "drag cancelled");
        }
    }

    /// Drops the session if it belongs to `window_id` (for example after the window closed).
    pub fn forget_window(&mut self, window_id: WindowId) {
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.window_id == window_id)
        {
            self.cancel();
        }
    }

    pub fn snapshot(&self) -> DragSnapshot {
        match &self.session {
            Some(session) => DragSnapshot {
                active_id: Some(session.window_id),
                candidate_zone: session.candidate,
                preview_rect: session.preview,
                show_overlay: session.show_overlay,
            },
            None => DragSnapshot::default(),
        }
    }
}

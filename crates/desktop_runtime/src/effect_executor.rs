//! Explicit effect-queue executor for reducer-emitted side effects.
//!
//! Effects drain in FIFO order. Follow-up actions (a snap committed by a drag release) are reduced
//! only after the dispatch that produced them has been committed, and their own effects join the
//! back of the same queue. This keeps the reducer free of re-entrant dispatches.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::host::RuntimeHost;
use crate::reducer::{DesktopAction, ReducerError, RuntimeEffect};

/// Action to reduce after the current dispatch, if `effect` asks for one.
pub fn follow_up_action(effect: &RuntimeEffect) -> Option<DesktopAction> {
    match effect {
        RuntimeEffect::CommitSnap {
            window_id,
            zone,
            bounds,
        } => Some(DesktopAction::SnapToBounds {
            window_id: *window_id,
            zone: *zone,
            bounds: *bounds,
        }),
        _ => None,
    }
}

/// Hands a single host-facing effect to `host`.
pub fn run_runtime_effect<H: RuntimeHost + ?Sized>(host: &mut H, effect: RuntimeEffect) {
    match effect {
        RuntimeEffect::WindowOpened(window_id) => host.window_opened(window_id),
        RuntimeEffect::FocusWindowInput(window_id) => host.focus_window_input(window_id),
        RuntimeEffect::AppLifecycle { window_id, event } => {
            host.dispatch_lifecycle(window_id, event)
        }
        RuntimeEffect::CommitSnap { window_id, .. } => {
            debug!(window = %window_id, "commit effect reached host; ignoring");
        }
    }
}

/// Drains `initial` and every effect produced by follow-up actions.
///
/// `reduce` must commit the state for each follow-up it is given. Rejected follow-ups are logged
/// and dropped; the remaining queue keeps draining. Returns the number of follow-up actions that
/// were reduced successfully.
pub fn drain<H, F>(host: &mut H, initial: Vec<RuntimeEffect>, mut reduce: F) -> usize
where
    H: RuntimeHost + ?Sized,
    F: FnMut(DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError>,
{
    let mut queue: VecDeque<RuntimeEffect> = initial.into();
    let mut applied = 0;

    while let Some(effect) = queue.pop_front() {
        let Some(action) = follow_up_action(&effect) else {
            run_runtime_effect(host, effect);
            continue;
        };
        match reduce(action) {
            Ok(effects) => {
                applied += 1;
                queue.extend(effects);
            }
            Err(err) => warn!("deferred desktop action rejected: {err}"),
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::AppLifecycleEvent;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use crate::model::{WindowId, WindowRect};
    use crate::snap_zone::SnapZone;

    fn commit(id: u64) -> RuntimeEffect {
        RuntimeEffect::CommitSnap {
            window_id: WindowId(id),
            zone: SnapZone::Left,
            bounds: WindowRect::new(0.0, 40.0, 640.0, 760.0),
        }
    }

    #[test]
    fn follow_up_effects_queue_behind_pending_effects() {
        let mut host = RecordingHost::new();
        let mut reduced = Vec::new();
        let initial = vec![
            commit(1),
            RuntimeEffect::FocusWindowInput(WindowId(1)),
        ];

        let applied = drain(&mut host, initial, |action| {
            reduced.push(action);
            Ok(vec![RuntimeEffect::AppLifecycle {
                window_id: WindowId(1),
                event: AppLifecycleEvent::Focused,
            }])
        });

        assert_eq!(applied, 1);
        assert_eq!(reduced.len(), 1);
        assert_eq!(
            host.calls(),
            &[
                HostCall::FocusInput(WindowId(1)),
                HostCall::Lifecycle(WindowId(1), AppLifecycleEvent::Focused),
            ]
        );
    }

    #[test]
    fn rejected_follow_up_does_not_stop_the_queue() {
        let mut host = RecordingHost::new();
        let applied = drain(
            &mut host,
            vec![commit(9), RuntimeEffect::WindowOpened(WindowId(2))],
            |_| Err(ReducerError::WindowNotFound(WindowId(9))),
        );
        assert_eq!(applied, 0);
        assert_eq!(host.calls(), &[HostCall::Opened(WindowId(2))]);
    }
}

use desktop_app_contract::{AppLifecycleEvent, ApplicationId};
use desktop_runtime::{
    detect_snap_zone, half_bounds, quadrant_bounds, resolve_action, AppRegistry, DesktopAction,
    DesktopRuntime, DisplayAction, DisplayState, Half, HostCall, PointerPosition, QuadrantSlot,
    RecordingHost, ScreenMetrics, SnapAction, SnapState, SnapZone, SnapZoneThresholds, UserAction,
    WindowId, WindowRect, WmConfig,
};
use platform_host::ManualClock;
use pretty_assertions::assert_eq;

type Runtime = DesktopRuntime<ManualClock, RecordingHost>;

fn runtime() -> (Runtime, ManualClock) {
    let clock = ManualClock::new(0);
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

fn app(id: &str) -> ApplicationId {
    ApplicationId::trusted(id)
}

#[test]
fn single_instance_app_opens_once() {
    let (mut rt, _) = runtime();
    let first = rt.open_app(&app("system.calculator")).expect("first open");
    let second = rt.open_app(&app("system.calculator")).expect("second open");

    assert_eq!(first, second);
    assert_eq!(rt.state().windows.len(), 1);
}

#[test]
fn quadrant_one_on_default_screen() {
    let area = ScreenMetrics::new(1280.0, 800.0, 40.0).usable_area();
    assert_eq!(area.h, 760.0);
    assert_eq!(
        quadrant_bounds(QuadrantSlot::from_index(1), area, 12.0),
        WindowRect::new(646.0, 40.0, 634.0, 374.0)
    );
}

#[test]
fn left_edge_point_detects_left_zone() {
    let area = ScreenMetrics::new(1280.0, 800.0, 40.0).usable_area();
    assert_eq!(
        detect_snap_zone(
            PointerPosition::new(5.0, 400.0),
            area,
            SnapZoneThresholds::default()
        ),
        SnapZone::Left
    );
}

#[test]
fn unmaximize_restores_pre_maximize_bounds() {
    let (mut rt, _) = runtime();
    let id = rt.open_app(&app("system.notepad")).expect("open");
    let floating = WindowRect::new(90.0, 120.0, 480.0, 360.0);
    rt.dispatch(DesktopAction::ResizeWindow {
        window_id: id,
        rect: floating,
    });
    rt.dispatch(DesktopAction::MaximizeWindow { window_id: id });
    rt.dispatch(DesktopAction::UnmaximizeWindow { window_id: id });

    let window = rt.state().window(id).expect("window");
    assert_eq!(window.snap_state, SnapState::None);
    assert_eq!(window.bounds, floating);
}

#[test]
fn toggle_maximize_on_minimized_resolves_to_restore_and_maximize() {
    let resolution = resolve_action(
        DisplayState::Minimized,
        SnapState::None,
        UserAction::ToggleMaximize,
    );
    assert!(resolution.valid);
    assert_eq!(resolution.display_action, Some(DisplayAction::Restore));
    assert_eq!(
        resolution.snap_action,
        Some(SnapAction::Apply(SnapState::Full))
    );
}

#[test]
fn quadrants_tile_without_overlap_for_many_screens() {
    let screens = [
        (1280.0, 800.0),
        (800.0, 600.0),
        (3840.0, 2160.0),
        (333.0, 201.0),
        (30.0, 50.0),
    ];
    for (w, h) in screens {
        let area = ScreenMetrics::new(w, h, 40.0).usable_area();
        let cells: Vec<WindowRect> = QuadrantSlot::ALL
            .iter()
            .map(|slot| quadrant_bounds(*slot, area, 12.0))
            .collect();
        for (i, a) in cells.iter().enumerate() {
            assert!(a.w > 0.0 && a.h > 0.0, "{w}x{h} slot {i} is empty");
            for b in &cells[i + 1..] {
                assert!(!a.overlaps(*b), "{w}x{h}: {a:?} overlaps {b:?}");
            }
        }
    }
}

#[test]
fn halves_cover_usable_width_and_height() {
    for (w, h) in [(1280.0, 800.0), (1281.0, 801.0), (1024.0, 768.0)] {
        let area = ScreenMetrics::new(w, h, 40.0).usable_area();
        let left = half_bounds(Half::Left, area);
        let right = half_bounds(Half::Right, area);
        assert_eq!(left.right(), right.x);
        assert_eq!(left.w + right.w, area.w);
        let top = half_bounds(Half::Top, area);
        let bottom = half_bounds(Half::Bottom, area);
        assert_eq!(top.bottom(), bottom.y);
        assert_eq!(top.h + bottom.h, area.h);
    }
}

#[test]
fn chained_snap_then_unsnap_restores_original_bounds() {
    let (mut rt, _) = runtime();
    let id = rt.open_app(&app("system.terminal")).expect("open");
    let original = rt.state().window(id).expect("window").bounds;

    rt.dispatch(DesktopAction::SnapWindow {
        window_id: id,
        snap: SnapState::Left,
    });
    rt.dispatch(DesktopAction::SnapQuadrant {
        window_id: id,
        slot: QuadrantSlot::BottomRight,
    });
    rt.dispatch(DesktopAction::SnapWindow {
        window_id: id,
        snap: SnapState::Right,
    });
    rt.dispatch(DesktopAction::UnsnapWindow { window_id: id });

    assert_eq!(rt.state().window(id).map(|w| w.bounds), Some(original));
}

#[test]
fn closing_twice_is_harmless() {
    let (mut rt, _) = runtime();
    let keep = rt.open_app(&app("system.notepad")).expect("open");
    let doomed = rt.open_app(&app("system.notepad")).expect("open");

    rt.close(doomed);
    rt.close(doomed);

    assert_eq!(rt.state().windows.len(), 1);
    assert!(rt.state().window(keep).is_some());
    assert_eq!(rt.active_window_id(), Some(keep));
}

#[test]
fn focus_follows_minimize() {
    let (mut rt, _) = runtime();
    let only = rt.open_app(&app("system.notepad")).expect("open");
    rt.minimize(only);
    assert_eq!(rt.active_window_id(), None);

    rt.restore(only);
    let other = rt.open_app(&app("system.explorer")).expect("open");
    assert_eq!(rt.active_window_id(), Some(other));
    rt.minimize(other);
    assert_eq!(rt.active_window_id(), Some(only));
}

#[test]
fn paint_order_tracks_activation() {
    let (mut rt, _) = runtime();
    let a = rt.open_app(&app("system.notepad")).expect("open");
    let b = rt.open_app(&app("system.explorer")).expect("open");
    rt.set_active(a);

    let order: Vec<WindowId> = rt.windows_in_paint_order().iter().map(|w| w.id).collect();
    assert_eq!(order, vec![b, a]);
    assert_eq!(rt.active_window_id(), Some(a));
}

#[test]
fn instance_limit_refuses_silently() {
    let (mut rt, _) = runtime();
    assert!(rt.open_app(&app("system.photos")).is_some());
    assert!(rt.open_app(&app("system.photos")).is_some());
    assert_eq!(rt.open_app(&app("system.photos")), None);
    assert_eq!(rt.state().windows.len(), 2);
}

#[test]
fn dead_zone_drop_floats_under_cursor() {
    let (mut rt, clock) = runtime();
    let id = rt.open_app(&app("system.notepad")).expect("open");
    let size = rt.state().window(id).expect("window").bounds;

    rt.pointer_down(id, PointerPosition::new(100.0, 50.0));
    rt.pointer_move(PointerPosition::new(640.0, 420.0));
    clock.advance(16);
    rt.animation_frame();
    assert_eq!(rt.drag_snapshot().candidate_zone, None);
    rt.pointer_up(PointerPosition::new(640.0, 420.0));

    let window = rt.state().window(id).expect("window");
    assert_eq!(window.snap_state, SnapState::None);
    assert_eq!(
        window.bounds,
        WindowRect::new(640.0 - size.w / 2.0, 420.0 - size.h / 2.0, size.w, size.h)
    );
}

#[test]
fn corner_drop_snaps_to_quadrant_and_notifies_host() {
    let (mut rt, clock) = runtime();
    let id = rt.open_app(&app("system.notepad")).expect("open");
    rt.host_mut().take_calls();

    rt.pointer_down(id, PointerPosition::new(100.0, 50.0));
    rt.pointer_move(PointerPosition::new(1270.0, 790.0));
    clock.advance(16);
    rt.animation_frame();
    assert_eq!(
        rt.drag_snapshot().preview_rect,
        Some(WindowRect::new(646.0, 426.0, 634.0, 374.0))
    );
    rt.pointer_up(PointerPosition::new(1270.0, 790.0));

    let window = rt.state().window(id).expect("window");
    assert_eq!(window.snap_state, SnapState::Quad(QuadrantSlot::BottomRight));
    assert_eq!(window.bounds, WindowRect::new(646.0, 426.0, 634.0, 374.0));
    assert!(!rt
        .host()
        .calls()
        .contains(&HostCall::Lifecycle(id, AppLifecycleEvent::Closed)));
}

#[test]
fn edge_drop_then_unsnap_returns_to_pre_drag_bounds() {
    let (mut rt, clock) = runtime();
    let id = rt.open_app(&app("system.notepad")).expect("open");
    let original = rt.state().window(id).expect("window").bounds;

    rt.pointer_down(id, PointerPosition::new(100.0, 50.0));
    rt.pointer_move(PointerPosition::new(640.0, 795.0));
    clock.advance(16);
    rt.animation_frame();
    assert_eq!(rt.drag_snapshot().candidate_zone, Some(SnapZone::Bottom));
    rt.pointer_up(PointerPosition::new(640.0, 795.0));
    assert_eq!(
        rt.state().window(id).expect("window").snap_state,
        SnapState::Bottom
    );

    rt.dispatch(DesktopAction::UnsnapWindow { window_id: id });
    let window = rt.state().window(id).expect("window");
    assert_eq!(window.snap_state, SnapState::None);
    assert_eq!(window.bounds, original);
}

#[test]
fn viewport_shrink_keeps_saved_bounds_on_screen() {
    let clock = ManualClock::new(0);
    let mut rt = DesktopRuntime::new(
        AppRegistry::builtin(),
        WmConfig::default(),
        clock,
        RecordingHost::new(),
        1920.0,
        1080.0,
    );
    let id = rt.open_app(&app("system.notepad")).expect("open");
    rt.dispatch(DesktopAction::ResizeWindow {
        window_id: id,
        rect: WindowRect::new(1500.0, 700.0, 400.0, 300.0),
    });
    rt.dispatch(DesktopAction::MaximizeWindow { window_id: id });

    rt.resize_viewport(1280.0, 800.0);
    assert_eq!(
        rt.state().window(id).expect("window").prev_bounds,
        Some(WindowRect::new(880.0, 500.0, 400.0, 300.0))
    );

    rt.dispatch(DesktopAction::UnmaximizeWindow { window_id: id });
    let window = rt.state().window(id).expect("window");
    assert_eq!(window.snap_state, SnapState::None);
    assert_eq!(window.bounds, WindowRect::new(880.0, 500.0, 400.0, 300.0));
}

#[test]
fn close_cascades_to_child_dialogs() {
    let (mut rt, _) = runtime();
    let parent = rt.open_app(&app("system.notepad")).expect("open");
    rt.dispatch(DesktopAction::OpenWindow(
        desktop_runtime::OpenWindowRequest::new(app("system.about")).child_of(parent),
    ));
    let child = rt.active_window_id().expect("child focused");
    assert_ne!(child, parent);

    rt.close(parent);
    assert!(rt.state().windows.is_empty());
    assert!(rt
        .host()
        .calls()
        .contains(&HostCall::Lifecycle(child, AppLifecycleEvent::Closed)));
}

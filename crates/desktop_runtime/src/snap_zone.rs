//! Pointer hit-testing against the snap perimeter.
//!
//! Corner squares are tested before edge bands. Edge bands exclude the corner squares, so the
//! ordering only matters when thresholds are reconfigured, but corners must always win.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Half, QuadrantSlot};
use crate::model::{PointerPosition, WindowRect};
use crate::window_state::SnapState;

pub const DEFAULT_CORNER_SIZE: f64 = 200.0;
pub const DEFAULT_EDGE_BAND: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapZone {
    None,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapZone {
    /// Snap state a window enters when dropped on this zone.
    pub const fn snap_state(self) -> SnapState {
        match self {
            Self::None => SnapState::None,
            Self::Left => SnapState::Left,
            Self::Right => SnapState::Right,
            Self::Top => SnapState::Top,
            Self::Bottom => SnapState::Bottom,
            Self::TopLeft => SnapState::Quad(QuadrantSlot::TopLeft),
            Self::TopRight => SnapState::Quad(QuadrantSlot::TopRight),
            Self::BottomLeft => SnapState::Quad(QuadrantSlot::BottomLeft),
            Self::BottomRight => SnapState::Quad(QuadrantSlot::BottomRight),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapZoneThresholds {
    /// Side of the square at each corner that triggers a quadrant snap.
    pub corner_size: f64,
    /// Depth of the band along each edge that triggers a half snap.
    pub edge_band: f64,
}

impl Default for SnapZoneThresholds {
    fn default() -> Self {
        Self {
            corner_size: DEFAULT_CORNER_SIZE,
            edge_band: DEFAULT_EDGE_BAND,
        }
    }
}

impl SnapZoneThresholds {
    /// Shrinks thresholds on small areas. Corners stay under a third of the shorter side and edge
    /// bands under a quarter, so the interior dead zone never disappears.
    fn effective(self, area: WindowRect) -> Self {
        let shorter = area.w.min(area.h).max(0.0);
        Self {
            corner_size: self.corner_size.max(0.0).min(shorter / 3.0),
            edge_band: self.edge_band.max(0.0).min(shorter / 4.0),
        }
    }
}

/// Maps a pointer position to the zone it would snap a dragged window into.
///
/// Coordinates outside `area` are clamped onto its border first, so a pointer resting on the
/// taskbar still counts as the top edge.
pub fn detect_snap_zone(
    point: PointerPosition,
    area: WindowRect,
    thresholds: SnapZoneThresholds,
) -> SnapZone {
    if area.w <= 0.0 || area.h <= 0.0 {
        return SnapZone::None;
    }
    let SnapZoneThresholds {
        corner_size,
        edge_band,
    } = thresholds.effective(area);

    let x = (point.x - area.x).clamp(0.0, area.w);
    let y = (point.y - area.y).clamp(0.0, area.h);
    let near = |value: f64, extent: f64, size: f64| (value < size, value > extent - size);

    let (corner_left, corner_right) = near(x, area.w, corner_size);
    let (corner_top, corner_bottom) = near(y, area.h, corner_size);
    match (corner_left, corner_right, corner_top, corner_bottom) {
        (true, _, true, _) => return SnapZone::TopLeft,
        (_, true, true, _) => return SnapZone::TopRight,
        (true, _, _, true) => return SnapZone::BottomLeft,
        (_, true, _, true) => return SnapZone::BottomRight,
        _ => {}
    }

    let along_x = x >= corner_size && x <= area.w - corner_size;
    let along_y = y >= corner_size && y <= area.h - corner_size;
    let (band_left, band_right) = near(x, area.w, edge_band);
    let (band_top, band_bottom) = near(y, area.h, edge_band);

    if along_y && band_left {
        SnapZone::Left
    } else if along_y && band_right {
        SnapZone::Right
    } else if along_x && band_top {
        SnapZone::Top
    } else if along_x && band_bottom {
        SnapZone::Bottom
    } else {
        SnapZone::None
    }
}

/// Preview rectangle for a zone, or `None` for the dead zone.
pub fn zone_bounds(zone: SnapZone, area: WindowRect, gutter: f64) -> Option<WindowRect> {
    match zone {
        SnapZone::None => None,
        SnapZone::Left => Some(geometry::half_bounds(Half::Left, area)),
        SnapZone::Right => Some(geometry::half_bounds(Half::Right, area)),
        SnapZone::Top => Some(geometry::half_bounds(Half::Top, area)),
        SnapZone::Bottom => Some(geometry::half_bounds(Half::Bottom, area)),
        corner => geometry::snap_bounds(corner.snap_state(), area, gutter),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::geometry::QUADRANT_GUTTER;
    use crate::model::ScreenMetrics;

    fn area() -> WindowRect {
        ScreenMetrics::new(1280.0, 800.0, 40.0).usable_area()
    }

    fn detect(x: f64, y: f64) -> SnapZone {
        detect_snap_zone(PointerPosition::new(x, y), area(), SnapZoneThresholds::default())
    }

    #[test]
    fn left_edge_band_outside_corners_is_left() {
        assert_eq!(detect(5.0, 400.0), SnapZone::Left);
    }

    #[test]
    fn each_edge_band_maps_to_its_half() {
        assert_eq!(detect(1275.0, 400.0), SnapZone::Right);
        assert_eq!(detect(640.0, 45.0), SnapZone::Top);
        assert_eq!(detect(640.0, 795.0), SnapZone::Bottom);
    }

    #[test]
    fn corners_win_over_edges() {
        assert_eq!(detect(5.0, 45.0), SnapZone::TopLeft);
        assert_eq!(detect(1275.0, 60.0), SnapZone::TopRight);
        assert_eq!(detect(10.0, 790.0), SnapZone::BottomLeft);
        assert_eq!(detect(1270.0, 799.0), SnapZone::BottomRight);
    }

    #[test]
    fn corners_win_even_when_edge_band_is_wider_than_corner() {
        let thresholds = SnapZoneThresholds {
            corner_size: 50.0,
            edge_band: 300.0,
        };
        let zone = detect_snap_zone(PointerPosition::new(10.0, 60.0), area(), thresholds);
        assert_eq!(zone, SnapZone::TopLeft);
    }

    #[test]
    fn interior_is_dead_zone() {
        assert_eq!(detect(640.0, 420.0), SnapZone::None);
        assert_eq!(detect(160.0, 420.0), SnapZone::None);
    }

    #[test]
    fn pointer_over_taskbar_counts_as_top_edge() {
        assert_eq!(detect(640.0, 10.0), SnapZone::Top);
    }

    #[test]
    fn small_screens_clamp_thresholds() {
        let small = ScreenMetrics::new(300.0, 240.0, 40.0).usable_area();
        let thresholds = SnapZoneThresholds::default();
        assert_eq!(
            detect_snap_zone(PointerPosition::new(10.0, 50.0), small, thresholds),
            SnapZone::TopLeft
        );
        assert_eq!(
            detect_snap_zone(PointerPosition::new(290.0, 230.0), small, thresholds),
            SnapZone::BottomRight
        );
    }

    #[test]
    fn short_screen_keeps_interior_dead_zone() {
        let short = ScreenMetrics::new(1280.0, 340.0, 40.0).usable_area();
        let thresholds = SnapZoneThresholds::default();
        let detect_short = |x: f64, y: f64| {
            detect_snap_zone(PointerPosition::new(x, y), short, thresholds)
        };

        assert_eq!(detect_short(640.0, 190.0), SnapZone::None);
        assert_eq!(detect_short(640.0, 130.0), SnapZone::None);
        assert_eq!(detect_short(640.0, 250.0), SnapZone::None);
        assert_eq!(detect_short(640.0, 45.0), SnapZone::Top);
        assert_eq!(detect_short(640.0, 335.0), SnapZone::Bottom);
        assert_eq!(detect_short(5.0, 190.0), SnapZone::Left);

        let dead = (0..=300)
            .filter(|dy| detect_short(640.0, 40.0 + f64::from(*dy)) == SnapZone::None)
            .count();
        assert!(dead > 100, "only {dead} dead rows on a 300px high area");
    }

    #[test]
    fn zone_bounds_follow_geometry() {
        assert_eq!(zone_bounds(SnapZone::None, area(), QUADRANT_GUTTER), None);
        assert_eq!(
            zone_bounds(SnapZone::TopRight, area(), QUADRANT_GUTTER),
            Some(WindowRect::new(646.0, 40.0, 634.0, 374.0))
        );
        assert_eq!(
            zone_bounds(SnapZone::Bottom, area(), QUADRANT_GUTTER),
            Some(WindowRect::new(0.0, 420.0, 1280.0, 380.0))
        );
    }
}

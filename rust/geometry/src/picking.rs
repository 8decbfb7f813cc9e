// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Screen-space hit testing and snapping
//!
//! Tolerances are in screen pixels and converted through the viewport
//! scale, so picking feels the same at every zoom level.

use crate::error::Result;
use crate::joints::{JointIssue, JointIssues};
use crate::primitives::point_segment_distance;
use plan_lite_core::{PlanEditor, Point2D, Segment, SegmentEnd, SegmentId, Viewport};

/// Segment pick tolerance (pixels)
pub const SEGMENT_TOLERANCE_PX: f64 = 6.0;

/// Endpoint pick radius (pixels)
pub const ENDPOINT_RADIUS_PX: f64 = 8.0;

/// Snap reach for endpoints and grid nodes (pixels)
pub const SNAP_DISTANCE_PX: f64 = 12.0;

/// Grid spacing in world inches
pub const GRID_SPACING: f64 = 12.0;

/// An axis is locked when its delta is below this fraction of the other
pub const AXIS_LOCK_RATIO: f64 = 0.2;

/// Reach for hovering a misaligned joint (pixels)
pub const HOVER_JOINT_PX: f64 = 10.0;

/// Nearest segment within `tolerance_px` of a world point
pub fn find_segment_at<'a>(
    segments: &'a [Segment],
    world: &Point2D,
    viewport: &Viewport,
    tolerance_px: f64,
) -> Option<&'a Segment> {
    let mut best: Option<(f64, &Segment)> = None;
    for s in segments {
        let d = point_segment_distance(world, &s.start, &s.end) * viewport.scale;
        if d <= tolerance_px && best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, s));
        }
    }
    best.map(|(_, s)| s)
}

/// An endpoint under the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointHit {
    pub segment: SegmentId,
    pub end: SegmentEnd,
    pub distance_px: f64,
}

/// Nearest segment endpoint within `radius_px` of a screen point
pub fn find_endpoint_at(
    segments: &[Segment],
    screen: &Point2D,
    viewport: &Viewport,
    radius_px: f64,
) -> Option<EndpointHit> {
    let mut best: Option<EndpointHit> = None;
    for s in segments {
        for end in [SegmentEnd::Start, SegmentEnd::End] {
            let d = viewport.world_to_screen(s.point(end)).distance_to(screen);
            if d <= radius_px && best.map_or(true, |b| d < b.distance_px) {
                best = Some(EndpointHit {
                    segment: s.id,
                    end,
                    distance_px: d,
                });
            }
        }
    }
    best
}

/// Snap a raw world point for drawing or dragging.
///
/// The nearest endpoint or grid node within [`SNAP_DISTANCE_PX`] wins, with
/// endpoints preferred on ties. With an `anchor`, the result is then locked
/// horizontal or vertical when it is nearly so. `exclude` leaves one
/// endpoint out of the candidates, normally the one being dragged.
pub fn snap_point(
    segments: &[Segment],
    raw: Point2D,
    anchor: Option<Point2D>,
    viewport: &Viewport,
    exclude: Option<(SegmentId, SegmentEnd)>,
) -> Point2D {
    let mut best: Option<(f64, Point2D)> = None;
    for s in segments {
        for end in [SegmentEnd::Start, SegmentEnd::End] {
            if exclude == Some((s.id, end)) {
                continue;
            }
            let p = s.point(end);
            let d = p.distance_to(&raw) * viewport.scale;
            if d <= SNAP_DISTANCE_PX && best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, p));
            }
        }
    }

    let grid = Point2D::new(
        (raw.x / GRID_SPACING).round() * GRID_SPACING,
        (raw.y / GRID_SPACING).round() * GRID_SPACING,
    );
    let dg = grid.distance_to(&raw) * viewport.scale;
    if dg <= SNAP_DISTANCE_PX && best.map_or(true, |(bd, _)| dg < bd) {
        best = Some((dg, grid));
    }

    let mut p = best.map_or(raw, |(_, p)| p);

    if let Some(anchor) = anchor {
        let dx = (p.x - anchor.x).abs();
        let dy = (p.y - anchor.y).abs();
        if dx > 0.0 || dy > 0.0 {
            if dy < dx * AXIS_LOCK_RATIO {
                p.y = anchor.y;
            } else if dx < dy * AXIS_LOCK_RATIO {
                p.x = anchor.x;
            }
        }
    }
    p
}

/// Misaligned joint under the cursor, if any
pub fn hover_joint<'a>(
    issues: &'a JointIssues,
    screen: &Point2D,
    viewport: &Viewport,
) -> Option<&'a JointIssue> {
    let world = viewport.screen_to_world(*screen);
    issues.nearest_issue(&world, viewport.pixels_to_world(HOVER_JOINT_PX))
}

/// Move the editor's dragged endpoint toward a raw world point, snapped and
/// axis-locked against the segment's other end. Returns the point used.
pub fn drag_endpoint_snapped(
    editor: &mut PlanEditor,
    raw: Point2D,
    viewport: &Viewport,
) -> Result<Point2D> {
    let drag = editor
        .active_drag()
        .ok_or(plan_lite_core::Error::NoActiveDrag)?;
    let anchor = editor.drag_anchor();
    let snapped = snap_point(
        editor.plan().segments(),
        raw,
        anchor,
        viewport,
        Some((drag.segment, drag.end)),
    );
    editor.drag_endpoint_to(snapped)?;
    Ok(snapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plan_lite_core::SegmentKind;

    fn wall(id: u32, a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(
            SegmentId(id),
            SegmentKind::wall(),
            Point2D::new(a.0, a.1),
            Point2D::new(b.0, b.1),
        )
    }

    #[test]
    fn test_find_segment_scales_tolerance() {
        let segs = vec![wall(1, (0.0, 0.0), (100.0, 0.0)), wall(2, (0.0, 10.0), (100.0, 10.0))];
        let vp = Viewport::default();
        assert_eq!(
            find_segment_at(&segs, &Point2D::new(50.0, 4.0), &vp, SEGMENT_TOLERANCE_PX).map(|s| s.id),
            Some(SegmentId(1))
        );
        assert_eq!(
            find_segment_at(&segs, &Point2D::new(50.0, 7.0), &vp, SEGMENT_TOLERANCE_PX).map(|s| s.id),
            Some(SegmentId(2))
        );
        // At 0.5 px/in the same 4 in is only 2 px
        let zoomed_out = Viewport::new(0.5, Point2D::new(0.0, 0.0));
        assert!(find_segment_at(&segs, &Point2D::new(50.0, -11.0), &zoomed_out, SEGMENT_TOLERANCE_PX).is_some());
        assert!(find_segment_at(&segs, &Point2D::new(50.0, -13.0), &zoomed_out, SEGMENT_TOLERANCE_PX).is_none());
    }

    #[test]
    fn test_find_endpoint_reports_which_end() {
        let segs = vec![wall(1, (0.0, 0.0), (100.0, 0.0))];
        let vp = Viewport::new(2.0, Point2D::new(0.0, 0.0));
        let hit = find_endpoint_at(&segs, &Point2D::new(195.0, 3.0), &vp, ENDPOINT_RADIUS_PX).unwrap();
        assert_eq!(hit.end, SegmentEnd::End);
        assert_relative_eq!(hit.distance_px, 34.0_f64.sqrt());
        assert!(find_endpoint_at(&segs, &Point2D::new(100.0, 0.0), &vp, ENDPOINT_RADIUS_PX).is_none());
    }

    #[test]
    fn test_snap_to_endpoint_before_grid() {
        let segs = vec![wall(1, (0.0, 0.0), (31.0, 0.0))];
        let vp = Viewport::default();
        // Endpoint is 5 px away, grid node (36, 0) is 0 px: grid is nearer
        assert_eq!(snap_point(&segs, Point2D::new(36.0, 0.0), None, &vp, None), Point2D::new(36.0, 0.0));
        // Endpoint 1 px away, grid node (36, 0) 4 px away
        assert_eq!(snap_point(&segs, Point2D::new(32.0, 0.0), None, &vp, None), Point2D::new(31.0, 0.0));
        // Equal distance keeps the endpoint
        assert_eq!(snap_point(&segs, Point2D::new(33.5, 0.0), None, &vp, None), Point2D::new(31.0, 0.0));
    }

    #[test]
    fn test_snap_leaves_far_points_alone() {
        let vp = Viewport::new(0.5, Point2D::new(0.0, 0.0));
        // Halfway between nodes rounds up; 6 in is 3 px at this scale
        assert_eq!(snap_point(&[], Point2D::new(30.0, 0.0), None, &vp, None), Point2D::new(36.0, 0.0));
        let vp = Viewport::new(5.0, Point2D::new(0.0, 0.0));
        // 6 in is 30 px here
        assert_eq!(snap_point(&[], Point2D::new(30.0, 0.0), None, &vp, None), Point2D::new(30.0, 0.0));
    }

    #[test]
    fn test_axis_lock() {
        let vp = Viewport::new(10.0, Point2D::new(0.0, 0.0));
        let anchor = Some(Point2D::new(0.0, 0.0));
        let p = snap_point(&[], Point2D::new(100.3, 5.1), anchor, &vp, None);
        assert_eq!(p, Point2D::new(100.3, 0.0));
        let p = snap_point(&[], Point2D::new(5.1, 100.3), anchor, &vp, None);
        assert_eq!(p, Point2D::new(0.0, 100.3));
        let p = snap_point(&[], Point2D::new(50.3, 40.1), anchor, &vp, None);
        assert_eq!(p, Point2D::new(50.3, 40.1));
    }

    #[test]
    fn test_hover_joint_within_screen_reach() {
        let segs = vec![wall(1, (0.0, 0.0), (-100.0, 0.0)), wall(2, (0.5, 0.0), (100.0, 0.0))];
        let issues = crate::joints::compute_joints(&segs);
        let vp = Viewport::new(2.0, Point2D::new(-10.0, -10.0));
        // Issue centre (0.25, 0) is at screen (20.5, 20)
        assert!(hover_joint(&issues, &Point2D::new(26.0, 24.0), &vp).is_some());
        assert!(hover_joint(&issues, &Point2D::new(32.0, 20.0), &vp).is_none());
    }

    #[test]
    fn test_drag_snaps_and_excludes_itself() {
        let mut editor = PlanEditor::new();
        let id = editor
            .commit_drawn_segment(
                plan_lite_core::ElementType::Wall,
                Point2D::new(0.0, 0.0),
                Point2D::new(100.0, 0.0),
            )
            .unwrap()
            .unwrap();
        editor.commit_drawn_segment(
            plan_lite_core::ElementType::Wall,
            Point2D::new(100.5, 60.2),
            Point2D::new(200.0, 60.2),
        )
        .unwrap();

        let vp = Viewport::new(10.0, Point2D::new(0.0, 0.0));
        editor.begin_endpoint_drag(id, SegmentEnd::End).unwrap();
        let p = drag_endpoint_snapped(&mut editor, Point2D::new(100.9, 60.0), &vp).unwrap();
        assert_eq!(p, Point2D::new(100.5, 60.2));
        assert_eq!(editor.plan().segment(id).unwrap().end, p);
        editor.end_endpoint_drag();

        assert!(drag_endpoint_snapped(&mut editor, Point2D::new(0.0, 0.0), &vp).is_err());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Which side of a wall its thickness goes to
//!
//! A drawn wall is its measured face. Thickness is applied along one normal:
//!
//! 1. start from the normal pointing away from the centroid of all wall
//!    endpoints;
//! 2. cast a ray along it and count crossings with the other walls; an odd
//!    count means that side is enclosed, so take the other side;
//! 3. a wall's manual `facing_flipped` flag reverses the result.
//!
//! A wall with nothing around it keeps the away-from-centroid side.

use crate::primitives::{count_ray_crossings, left_normal};
use nalgebra::Vector2;
use plan_lite_core::{Point2D, Segment, SegmentId};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Mean of every wall endpoint, or the origin when there are no walls
pub fn wall_centroid(segments: &[Segment]) -> Point2D {
    let (sum_x, sum_y, count) = segments
        .iter()
        .filter(|s| s.is_wall())
        .fold((0.0, 0.0, 0usize), |(sx, sy, n), w| {
            (sx + w.start.x + w.end.x, sy + w.start.y + w.end.y, n + 2)
        });
    if count == 0 {
        Point2D::new(0.0, 0.0)
    } else {
        Point2D::new(sum_x / count as f64, sum_y / count as f64)
    }
}

/// Resolve facing with a precomputed wall centroid
pub fn resolve_wall_facing_with_centroid(
    wall: &Segment,
    segments: &[Segment],
    centroid: &Point2D,
) -> Option<Vector2<f64>> {
    if !wall.is_wall() {
        return None;
    }
    let u = wall.unit_direction()?;
    let mid = wall.midpoint();

    let mut n = left_normal(&u);
    let to_centroid = Vector2::new(centroid.x - mid.x, centroid.y - mid.y);
    if n.dot(&to_centroid) > 0.0 {
        n = -n;
    }

    let others = segments.iter().filter(|s| s.is_wall() && s.id != wall.id);
    let crossings = count_ray_crossings(&mid, n, others);
    if crossings % 2 == 1 {
        n = -n;
    }

    if wall.facing_flipped() {
        n = -n;
    }

    trace!(wall = %wall.id, crossings, nx = n.x, ny = n.y, "Resolved wall facing");
    Some(n)
}

/// Unit normal along which `wall`'s thickness extends.
///
/// `None` for openings and zero-length walls.
pub fn resolve_wall_facing(wall: &Segment, segments: &[Segment]) -> Option<Vector2<f64>> {
    let centroid = wall_centroid(segments);
    resolve_wall_facing_with_centroid(wall, segments, &centroid)
}

/// Facing of every non-degenerate wall
pub fn resolve_all_facings(segments: &[Segment]) -> FxHashMap<SegmentId, Vector2<f64>> {
    let centroid = wall_centroid(segments);
    segments
        .iter()
        .filter(|s| s.is_wall())
        .filter_map(|w| {
            resolve_wall_facing_with_centroid(w, segments, &centroid).map(|n| (w.id, n))
        })
        .collect()
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

    fn room() -> Vec<Segment> {
        vec![
            wall(1, (0.0, 0.0), (120.0, 0.0)),
            wall(2, (120.0, 0.0), (120.0, 96.0)),
            wall(3, (120.0, 96.0), (0.0, 96.0)),
            wall(4, (0.0, 96.0), (0.0, 0.0)),
        ]
    }

    #[test]
    fn test_room_walls_face_outward() {
        let segs = room();
        let expected = [(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];
        for (w, (ex, ey)) in segs.iter().zip(expected) {
            let n = resolve_wall_facing(w, &segs).unwrap();
            assert_relative_eq!(n.x, ex, epsilon = 1e-12);
            assert_relative_eq!(n.y, ey, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_manual_flip_reverses() {
        let mut segs = room();
        segs[0].kind = SegmentKind::Wall {
            facing_flipped: true,
        };
        let n = resolve_wall_facing(&segs[0], &segs).unwrap();
        assert_relative_eq!(n.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_floating_wall_keeps_default() {
        let segs = vec![wall(1, (0.0, 0.0), (100.0, 0.0))];
        // Centroid lies on the wall; the default left normal is kept
        let n = resolve_wall_facing(&segs[0], &segs).unwrap();
        assert_eq!(n, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_idempotent() {
        let segs = room();
        for w in &segs {
            assert_eq!(resolve_wall_facing(w, &segs), resolve_wall_facing(w, &segs));
        }
    }

    #[test]
    fn test_openings_and_degenerate_walls_have_no_facing() {
        let door = Segment::new(
            SegmentId(9),
            SegmentKind::Door(plan_lite_core::Opening::new(80.0, 0.0)),
            Point2D::new(0.0, 0.0),
            Point2D::new(36.0, 0.0),
        );
        assert!(resolve_wall_facing(&door, &[door.clone()]).is_none());
        let dot = wall(1, (5.0, 5.0), (5.0, 5.0));
        assert!(resolve_wall_facing(&dot, &[dot.clone()]).is_none());
        assert!(resolve_all_facings(&[dot]).is_empty());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D primitives shared by every geometry pass

use nalgebra::Vector2;
use plan_lite_core::{Point2D, Segment};

/// Determinant below which two directions are treated as parallel
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// Length of the rays cast for interior detection
pub const RAY_LENGTH: f64 = 10000.0;

/// Distance from `p` to the closed segment `a`-`b`.
///
/// A degenerate segment (`a == b`) is treated as the point `a`.
pub fn point_segment_distance(p: &Point2D, a: &Point2D, b: &Point2D) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < PARALLEL_EPSILON {
        return p.distance_to(a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    let proj = Point2D::new(a.x + t * dx, a.y + t * dy);
    p.distance_to(&proj)
}

/// Whether the segment `ray_start`-`ray_end` crosses `seg_a`-`seg_b`.
///
/// Solves for the parameters of both segments; parallel pairs never
/// intersect, and both parameters must lie in `[0, 1]`. Pass a far
/// `ray_end` (see [`RAY_LENGTH`]) to use it as a directed ray.
pub fn ray_intersects_segment(
    ray_start: &Point2D,
    ray_end: &Point2D,
    seg_a: &Point2D,
    seg_b: &Point2D,
) -> bool {
    let dx = ray_end.x - ray_start.x;
    let dy = ray_end.y - ray_start.y;
    let sdx = seg_b.x - seg_a.x;
    let sdy = seg_b.y - seg_a.y;

    let denom = dx * sdy - dy * sdx;
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let ox = seg_a.x - ray_start.x;
    let oy = seg_a.y - ray_start.y;
    let t = (ox * sdy - oy * sdx) / denom;
    let u = (ox * dy - oy * dx) / denom;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Count crossings of a ray from `origin` along `direction` with `walls`
pub fn count_ray_crossings<'a>(
    origin: &Point2D,
    direction: Vector2<f64>,
    walls: impl IntoIterator<Item = &'a Segment>,
) -> usize {
    let far = origin.translated(direction * RAY_LENGTH);
    walls
        .into_iter()
        .filter(|w| ray_intersects_segment(origin, &far, &w.start, &w.end))
        .count()
}

/// Signed projection of `p` onto the line through `origin` along unit `dir`
#[inline]
pub fn project_onto(p: &Point2D, origin: &Point2D, dir: &Vector2<f64>) -> f64 {
    (p.x - origin.x) * dir.x + (p.y - origin.y) * dir.y
}

/// Distance from `p` to the infinite line through `origin` along unit `dir`
#[inline]
pub fn distance_to_line(p: &Point2D, origin: &Point2D, dir: &Vector2<f64>) -> f64 {
    ((p.x - origin.x) * dir.y - (p.y - origin.y) * dir.x).abs()
}

/// Left-hand normal of a unit direction: `(-dy, dx)`
#[inline]
pub fn left_normal(dir: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-dir.y, dir.x)
}

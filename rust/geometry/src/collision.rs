// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Walk-mode collision against walls
//!
//! Walls are slabs of their thickness behind the drawn face. A walker is a
//! circle of [`WALK_RADIUS`] in plan; it passes through a wall only inside
//! a door opening whose vertical range contains [`EYE_HEIGHT`].

use crate::facing::resolve_all_facings;
use crate::placement::assign_openings;
use nalgebra::Vector2;
use plan_lite_core::{ElementType, Point2D, Segment, SegmentId};
use smallvec::SmallVec;

/// Walker radius in plan (inches)
pub const WALK_RADIUS: f64 = 10.0;

/// Eye height above the floor (inches)
pub const EYE_HEIGHT: f64 = 72.0;

/// Distance moved per step (inches)
pub const WALK_SPEED: f64 = 10.0;

/// A door's passable span in a wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorGap {
    pub t_start: f64,
    pub t_end: f64,
    pub base: f64,
    pub height: f64,
}

impl DoorGap {
    fn admits(&self, t: f64, radius: f64, eye_height: f64) -> bool {
        t >= self.t_start - radius
            && t <= self.t_end + radius
            && eye_height >= self.base
            && eye_height <= self.base + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallCollider {
    pub wall: SegmentId,
    pub start: Point2D,
    pub direction: Vector2<f64>,
    pub normal: Vector2<f64>,
    pub length: f64,
    pub thickness: f64,
    pub doors: SmallVec<[DoorGap; 2]>,
}

impl WallCollider {
    /// Whether a walker of `radius` centred at `p` overlaps this wall
    pub fn blocks(&self, p: &Point2D, radius: f64, eye_height: f64) -> bool {
        let rel = Vector2::new(p.x - self.start.x, p.y - self.start.y);
        let t = rel.dot(&self.direction);
        if t < -radius || t > self.length + radius {
            return false;
        }

        // Distance from the slab's centre line, half a thickness behind the face
        let dist = (rel.dot(&self.normal) - self.thickness / 2.0).abs();
        if dist >= self.thickness / 2.0 + radius {
            return false;
        }

        !self.doors.iter().any(|d| d.admits(t, radius, eye_height))
    }
}

/// One collider per non-degenerate wall, with its hosted doors
pub fn build_wall_colliders(segments: &[Segment], thickness: f64) -> Vec<WallCollider> {
    let facings = resolve_all_facings(segments);
    let hosted = assign_openings(segments);

    segments
        .iter()
        .filter(|s| s.is_wall())
        .filter_map(|wall| {
            let normal = *facings.get(&wall.id)?;
            let direction = wall.unit_direction()?;
            let doors = hosted
                .get(&wall.id)
                .into_iter()
                .flatten()
                .filter(|h| h.opening.element_type() == ElementType::Door)
                .filter_map(|h| {
                    let o = h.opening.opening()?;
                    Some(DoorGap {
                        t_start: h.span.t_start,
                        t_end: h.span.t_end,
                        base: o.base_offset_inches,
                        height: o.height_inches,
                    })
                })
                .collect();
            Some(WallCollider {
                wall: wall.id,
                start: wall.start,
                direction,
                normal,
                length: wall.length(),
                thickness,
                doors,
            })
        })
        .collect()
}

/// Whether a walker at `p` overlaps any wall
pub fn is_position_blocked(colliders: &[WallCollider], p: &Point2D, radius: f64) -> bool {
    colliders.iter().any(|c| c.blocks(p, radius, EYE_HEIGHT))
}

/// Where a walker at `from` ends up after trying to move by `delta`.
///
/// The full move is taken when clear. Otherwise each axis is tried on its
/// own from `from`, so the walker slides along walls.
pub fn resolve_walk_step(
    colliders: &[WallCollider],
    from: &Point2D,
    delta: Vector2<f64>,
    radius: f64,
) -> Point2D {
    let full = from.translated(delta);
    if !is_position_blocked(colliders, &full, radius) {
        return full;
    }

    let mut next = *from;
    if !is_position_blocked(colliders, &Point2D::new(from.x + delta.x, from.y), radius) {
        next.x += delta.x;
    }
    if !is_position_blocked(colliders, &Point2D::new(from.x, from.y + delta.y), radius) {
        next.y += delta.y;
    }
    next
}

/// Movement keys held for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Plan displacement for one step at heading `yaw` (radians)
pub fn walk_delta(yaw: f64, input: WalkInput, speed: f64) -> Vector2<f64> {
    let forward = Vector2::new(yaw.sin(), yaw.cos());
    let right = Vector2::new(yaw.cos(), -yaw.sin());
    let mut delta = Vector2::zeros();
    if input.forward {
        delta += forward * speed;
    }
    if input.back {
        delta -= forward * speed;
    }
    if input.left {
        delta -= right * speed;
    }
    if input.right {
        delta += right * speed;
    }
    delta
}

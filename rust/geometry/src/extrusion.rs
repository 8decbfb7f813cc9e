// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall solids around openings, wall footprints and joint fill polygons
//!
//! A wall is split along its length at the openings it hosts. Between
//! openings the wall is solid to the ceiling; over each opening there is an
//! optional block below the sill and an optional block above the head.
//! Every solid piece is an oriented box that sits behind the wall's face,
//! offset by half the thickness along the wall's facing normal.
//!
//! The same pieces feed the plan view (their footprints) and the 3D view
//! (their boxes). Coordinates are Z-up: x/y are plan coordinates and z is
//! height above the floor.

use crate::facing::{resolve_all_facings, resolve_wall_facing};
use crate::joints::{closed_clusters, JointCluster};
use crate::placement::{assign_openings, openings_on_wall, HostedOpening, WallSpan};
use nalgebra::{Point3, Vector2};
use plan_lite_core::{ElementType, Point2D, Segment, SegmentEnd, SegmentId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Gaps along the wall at or below this length (inches) are left open
pub const MIN_SOLID_SPAN: f64 = 1.0;

/// Blocks above or below an opening at or below this height are skipped
pub const MIN_SOLID_HEIGHT: f64 = 1.0;

/// The drawn face of a wall and its back line, `thickness` behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallFootprint {
    pub wall: SegmentId,
    /// Start and end of the face (the drawn line)
    pub face: [Point2D; 2],
    /// Start and end of the back line
    pub back: [Point2D; 2],
    pub normal: Vector2<f64>,
}

impl WallFootprint {
    pub fn new(wall: &Segment, normal: Vector2<f64>, thickness: f64) -> Self {
        let offset = normal * thickness;
        Self {
            wall: wall.id,
            face: [wall.start, wall.end],
            back: [wall.start.translated(offset), wall.end.translated(offset)],
            normal,
        }
    }

    /// Face and back corner at one end of the wall
    pub fn corners(&self, end: SegmentEnd) -> [Point2D; 2] {
        match end {
            SegmentEnd::Start => [self.face[0], self.back[0]],
            SegmentEnd::End => [self.face[1], self.back[1]],
        }
    }

    /// Closed outline: face start, face end, back end, back start
    pub fn polygon(&self) -> [Point2D; 4] {
        [self.face[0], self.face[1], self.back[1], self.back[0]]
    }
}

/// Which part of the wall a solid box is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidRole {
    /// Floor to ceiling
    Full,
    /// Under an opening's sill
    BelowOpening,
    /// Over an opening's head
    AboveOpening,
}

/// An oriented box of wall material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBox {
    pub wall: SegmentId,
    pub role: SolidRole,
    /// Box centre; z is the vertical centre
    pub center: Point3<f64>,
    /// Extent along the wall
    pub length: f64,
    /// Extent across the wall
    pub thickness: f64,
    /// Vertical extent
    pub height: f64,
    /// Unit direction along the wall
    pub direction: Vector2<f64>,
    /// Unit facing normal
    pub normal: Vector2<f64>,
}

impl SolidBox {
    /// Rotation about the vertical axis, radians
    pub fn angle(&self) -> f64 {
        self.direction.y.atan2(self.direction.x)
    }

    /// Plan outline of the box
    pub fn footprint(&self) -> [Point2D; 4] {
        let c = Point2D::new(self.center.x, self.center.y);
        let du = self.direction * (self.length / 2.0);
        let dn = self.normal * (self.thickness / 2.0);
        [
            c.translated(-du - dn),
            c.translated(du - dn),
            c.translated(du + dn),
            c.translated(-du + dn),
        ]
    }

    /// Bottom and top z
    pub fn z_range(&self) -> (f64, f64) {
        (
            self.center.z - self.height / 2.0,
            self.center.z + self.height / 2.0,
        )
    }
}

/// The hole an opening leaves in its wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningVoid {
    pub opening: SegmentId,
    pub wall: SegmentId,
    pub element: ElementType,
    /// Span along the wall, clamped to the wall's extent
    pub span: WallSpan,
    pub base: f64,
    pub top: f64,
}

/// Solid boxes and voids of one wall
#[derive(Debug, Clone, Default)]
pub struct WallExtrusion {
    pub boxes: Vec<SolidBox>,
    pub voids: Vec<OpeningVoid>,
}

impl WallExtrusion {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty() && self.voids.is_empty()
    }
}

struct WallFrame {
    id: SegmentId,
    start: Point2D,
    u: Vector2<f64>,
    n: Vector2<f64>,
    thickness: f64,
}

impl WallFrame {
    fn solid(&self, role: SolidRole, t0: f64, t1: f64, z0: f64, z1: f64) -> SolidBox {
        let tc = (t0 + t1) / 2.0;
        let c = self
            .start
            .translated(self.u * tc + self.n * (self.thickness / 2.0));
        SolidBox {
            wall: self.id,
            role,
            center: Point3::new(c.x, c.y, (z0 + z1) / 2.0),
            length: t1 - t0,
            thickness: self.thickness,
            height: z1 - z0,
            direction: self.u,
            normal: self.n,
        }
    }
}

/// Split one wall around the openings it hosts.
///
/// `hosted` must be sorted by span start. Zero-length walls and walls
/// without a facing yield nothing.
pub fn segment_wall(
    wall: &Segment,
    normal: Vector2<f64>,
    hosted: &[HostedOpening<'_>],
    thickness: f64,
    ceiling_height: f64,
) -> WallExtrusion {
    let mut out = WallExtrusion::default();
    let Some(u) = wall.unit_direction() else {
        return out;
    };
    let length = wall.length();
    let frame = WallFrame {
        id: wall.id,
        start: wall.start,
        u,
        n: normal,
        thickness,
    };

    let mut current_t: f64 = 0.0;
    for hosted in hosted {
        let Some(opening) = hosted.opening.opening() else {
            continue;
        };
        let t_start = hosted.span.t_start.clamp(0.0, length);
        let t_end = hosted.span.t_end.clamp(0.0, length);

        if t_start > current_t + MIN_SOLID_SPAN {
            out.boxes
                .push(frame.solid(SolidRole::Full, current_t, t_start, 0.0, ceiling_height));
        }

        let base = opening.base_offset_inches;
        let top = opening.top();
        if t_end > t_start {
            if top < ceiling_height - MIN_SOLID_HEIGHT {
                out.boxes.push(frame.solid(
                    SolidRole::AboveOpening,
                    t_start,
                    t_end,
                    top,
                    ceiling_height,
                ));
            }
            if base > MIN_SOLID_HEIGHT {
                out.boxes
                    .push(frame.solid(SolidRole::BelowOpening, t_start, t_end, 0.0, base));
            }
        }

        out.voids.push(OpeningVoid {
            opening: hosted.opening.id,
            wall: wall.id,
            element: hosted.opening.element_type(),
            span: WallSpan { t_start, t_end },
            base,
            top,
        });

        current_t = current_t.max(t_end);
    }

    if current_t < length - MIN_SOLID_SPAN {
        out.boxes
            .push(frame.solid(SolidRole::Full, current_t, length, 0.0, ceiling_height));
    }

    out
}

/// Solid boxes and opening voids for one wall of the plan.
///
/// Resolves the wall's facing and every opening that fits it. Returns
/// an empty result for openings and zero-length walls.
pub fn segment_wall_for_extrusion(
    wall: &Segment,
    segments: &[Segment],
    thickness: f64,
    ceiling_height: f64,
) -> WallExtrusion {
    let Some(normal) = resolve_wall_facing(wall, segments) else {
        return WallExtrusion::default();
    };
    let hosted = openings_on_wall(wall, segments);
    segment_wall(wall, normal, &hosted, thickness, ceiling_height)
}

/// Extrusions and footprints for every wall, in plan order
pub fn extrude_walls(
    segments: &[Segment],
    thickness: f64,
    ceiling_height: f64,
) -> (Vec<WallExtrusion>, FxHashMap<SegmentId, WallFootprint>) {
    let facings = resolve_all_facings(segments);
    let hosted = assign_openings(segments);
    let mut extrusions = Vec::with_capacity(facings.len());
    let mut footprints = FxHashMap::default();

    for wall in segments.iter().filter(|s| s.is_wall()) {
        let Some(&normal) = facings.get(&wall.id) else {
            continue;
        };
        let on_wall = hosted.get(&wall.id).map(Vec::as_slice).unwrap_or(&[]);
        extrusions.push(segment_wall(wall, normal, on_wall, thickness, ceiling_height));
        footprints.insert(wall.id, WallFootprint::new(wall, normal, thickness));
    }

    (extrusions, footprints)
}

/// Filled polygon covering the corner where walls meet
#[derive(Debug, Clone, PartialEq)]
pub struct JointPolygon {
    pub center: Point2D,
    /// Points ordered by angle around `center`
    pub points: SmallVec<[Point2D; 8]>,
}

/// Corner fill polygons for closed joints.
///
/// Each wall endpoint in a closed cluster contributes its face and back
/// corners; the distinct points are ordered by angle around the cluster
/// centre. Joints with fewer than three distinct points get no polygon.
pub fn joint_fill_polygons(
    clusters: &[JointCluster],
    footprints: &FxHashMap<SegmentId, WallFootprint>,
) -> Vec<JointPolygon> {
    let mut polygons = Vec::new();
    for cluster in closed_clusters(clusters) {
        let mut points: SmallVec<[Point2D; 8]> = SmallVec::new();
        for ep in cluster.endpoints.iter().filter(|e| e.element == ElementType::Wall) {
            let Some(footprint) = footprints.get(&ep.segment) else {
                continue;
            };
            for corner in footprint.corners(ep.end) {
                if !points.contains(&corner) {
                    points.push(corner);
                }
            }
        }
        if points.len() < 3 {
            continue;
        }

        let c = cluster.center;
        points.sort_by(|a, b| {
            let aa = (a.y - c.y).atan2(a.x - c.x);
            let ab = (b.y - c.y).atan2(b.x - c.x);
            aa.total_cmp(&ab)
        });
        polygons.push(JointPolygon { center: c, points });
    }
    polygons
}

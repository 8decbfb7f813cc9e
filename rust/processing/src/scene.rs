// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-pass scene build for the plan view and the 3D view
//!
//! Both views are derived from the same wall extrusion: the plan view fills
//! wall footprints and corner polygons, the 3D view meshes the solid boxes
//! and fixtures. Nothing here draws; renderers consume [`PlanScene`].

use nalgebra::{Point3, Vector3};
use plan_lite_core::units::format_length;
use plan_lite_core::{Point2D, ResolvedSettings, Segment, SegmentId};
use plan_lite_geometry::extrusion::{extrude_walls, joint_fill_polygons, JointPolygon, WallExtrusion, WallFootprint};
use plan_lite_geometry::fixtures::{build_fixtures, Fixture};
use plan_lite_geometry::joints::{build_endpoint_clusters, joint_issues, JointIssues};
use plan_lite_geometry::placement::{resolve_parent_wall, WallPlacement};
use plan_lite_geometry::{build_wall_colliders, Mesh, WallCollider};
use tracing::debug;

/// Half extent used when the plan is empty
pub const EMPTY_PLAN_EXTENT: f64 = 200.0;

/// Smallest framed size along either axis
pub const MIN_FRAMED_SIZE: f64 = 200.0;

/// Orbit radius relative to the larger framed size
pub const ORBIT_RADIUS_FACTOR: f64 = 1.4;

/// Floor plane size relative to the framed size
pub const FLOOR_SCALE: f64 = 1.5;

/// Decimal places used for dimension labels
pub const LABEL_PRECISION: u32 = 2;

/// Axis-aligned extent of the plan's segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanBounds {
    pub min: Point2D,
    pub max: Point2D,
}

impl PlanBounds {
    /// Bounds of every endpoint, or ±[`EMPTY_PLAN_EXTENT`] for an empty plan
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut points = segments.iter().flat_map(|s| [s.start, s.end]);
        let Some(first) = points.next() else {
            return Self {
                min: Point2D::new(-EMPTY_PLAN_EXTENT, -EMPTY_PLAN_EXTENT),
                max: Point2D::new(EMPTY_PLAN_EXTENT, EMPTY_PLAN_EXTENT),
            };
        };
        points.fold(Self { min: first, max: first }, |b, p| Self {
            min: Point2D::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: Point2D::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        })
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Width and depth, each at least [`MIN_FRAMED_SIZE`]
    pub fn framed_size(&self) -> (f64, f64) {
        (
            (self.max.x - self.min.x).max(MIN_FRAMED_SIZE),
            (self.max.y - self.min.y).max(MIN_FRAMED_SIZE),
        )
    }

    pub fn orbit_radius(&self) -> f64 {
        let (w, d) = self.framed_size();
        w.max(d) * ORBIT_RADIUS_FACTOR
    }
}

/// Floor rectangle under the plan, at z = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorPlane {
    pub center: Point2D,
    pub width: f64,
    pub depth: f64,
}

impl FloorPlane {
    pub fn framing(bounds: &PlanBounds) -> Self {
        let (w, d) = bounds.framed_size();
        Self {
            center: bounds.center(),
            width: w * FLOOR_SCALE,
            depth: d * FLOOR_SCALE,
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        let (hw, hd) = (self.width / 2.0, self.depth / 2.0);
        let (cx, cy) = (self.center.x, self.center.y);
        let mut mesh = Mesh::with_capacity(4, 6);
        mesh.add_quad(
            [
                Point3::new(cx - hw, cy - hd, 0.0),
                Point3::new(cx + hw, cy - hd, 0.0),
                Point3::new(cx + hw, cy + hd, 0.0),
                Point3::new(cx - hw, cy + hd, 0.0),
            ],
            Vector3::z(),
        );
        mesh
    }
}

/// Length label drawn along a segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLabel {
    pub segment: SegmentId,
    pub position: Point2D,
    /// Text rotation in radians, kept within ±π/2 so it never reads upside down
    pub angle: f64,
    pub text: String,
}

/// Wall-relative dimensions of a door or window
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningDimensions {
    pub opening: SegmentId,
    pub placement: WallPlacement,
    pub from_start: String,
    pub from_end: String,
}

/// Everything a renderer needs for one plan
#[derive(Debug, Clone)]
pub struct PlanScene {
    pub settings: ResolvedSettings,
    pub bounds: PlanBounds,
    pub floor: FloorPlane,
    pub footprints: Vec<WallFootprint>,
    pub joint_polygons: Vec<JointPolygon>,
    pub joint_issues: JointIssues,
    pub walls: Vec<WallExtrusion>,
    pub fixtures: Vec<Fixture>,
    pub colliders: Vec<WallCollider>,
    pub labels: Vec<SegmentLabel>,
    pub opening_dimensions: Vec<OpeningDimensions>,
}

fn readable_angle(s: &Segment) -> f64 {
    let d = s.direction();
    let mut angle = d.y.atan2(d.x);
    if angle > std::f64::consts::FRAC_PI_2 {
        angle -= std::f64::consts::PI;
    } else if angle < -std::f64::consts::FRAC_PI_2 {
        angle += std::f64::consts::PI;
    }
    angle
}

fn segment_labels(segments: &[Segment]) -> Vec<SegmentLabel> {
    segments
        .iter()
        .filter(|s| !s.is_degenerate())
        .map(|s| SegmentLabel {
            segment: s.id,
            position: s.midpoint(),
            angle: readable_angle(s),
            text: format_length(s.length(), LABEL_PRECISION),
        })
        .collect()
}

fn opening_dimensions(segments: &[Segment]) -> Vec<OpeningDimensions> {
    segments
        .iter()
        .filter(|s| s.is_opening())
        .filter_map(|opening| {
            let placement = resolve_parent_wall(opening, segments)?;
            Some(OpeningDimensions {
                opening: opening.id,
                from_start: format_length(placement.from_start, LABEL_PRECISION),
                from_end: format_length(placement.from_end, LABEL_PRECISION),
                placement,
            })
        })
        .collect()
}

/// Derive the full scene from a segment list
pub fn build_scene(segments: &[Segment], settings: &ResolvedSettings) -> PlanScene {
    let thickness = settings.wall_thickness;
    let (walls, footprint_map) = extrude_walls(segments, thickness, settings.ceiling_height);

    let clusters = build_endpoint_clusters(segments);
    let joint_polygons = joint_fill_polygons(&clusters, &footprint_map);
    let joint_issues = joint_issues(&clusters);

    // Keep footprints in plan order
    let footprints: Vec<WallFootprint> = segments
        .iter()
        .filter_map(|s| footprint_map.get(&s.id).copied())
        .collect();

    let fixtures = build_fixtures(segments, settings);
    let colliders = build_wall_colliders(segments, thickness);
    let bounds = PlanBounds::from_segments(segments);

    let scene = PlanScene {
        settings: *settings,
        bounds,
        floor: FloorPlane::framing(&bounds),
        footprints,
        joint_polygons,
        joint_issues,
        walls,
        fixtures,
        colliders,
        labels: segment_labels(segments),
        opening_dimensions: opening_dimensions(segments),
    };

    debug!(
        segments = segments.len(),
        walls = scene.walls.len(),
        boxes = scene.solid_count(),
        fixtures = scene.fixtures.len(),
        joint_issues = scene.joint_issues.len(),
        "Built plan scene"
    );
    scene
}

impl PlanScene {
    /// Wall footprints to fill in the plan view; empty when walls are hidden
    pub fn plan_fill(&self) -> (&[WallFootprint], &[JointPolygon]) {
        if self.settings.show_walls {
            (&self.footprints, &self.joint_polygons)
        } else {
            (&self.footprints[..0], &self.joint_polygons[..0])
        }
    }

    pub fn solid_count(&self) -> usize {
        self.walls.iter().map(|w| w.boxes.len()).sum()
    }

    /// Every wall solid as one mesh
    pub fn wall_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.solid_count() * 24, self.solid_count() * 36);
        for solid in self.walls.iter().flat_map(|w| &w.boxes) {
            let axes = [
                Vector3::new(solid.direction.x, solid.direction.y, 0.0),
                Vector3::new(solid.normal.x, solid.normal.y, 0.0),
                Vector3::z(),
            ];
            let half = Vector3::new(solid.length, solid.thickness, solid.height) / 2.0;
            mesh.add_box(solid.center, axes, half);
        }
        mesh
    }

    /// Every door and window fixture as one mesh
    pub fn fixture_mesh(&self) -> Mesh {
        let meshes: Vec<Mesh> = self.fixtures.iter().map(Fixture::to_mesh).collect();
        let mut mesh = Mesh::new();
        mesh.merge_all(&meshes);
        mesh
    }

    /// Named meshes for export: floor, walls, fixtures
    pub fn mesh_objects(&self) -> Vec<(&'static str, Mesh)> {
        vec![
            ("floor", self.floor.to_mesh()),
            ("walls", self.wall_mesh()),
            ("fixtures", self.fixture_mesh()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plan_lite_core::{Opening, SegmentKind};

    fn seg(id: u32, kind: SegmentKind, a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(
            SegmentId(id),
            kind,
            Point2D::new(a.0, a.1),
            Point2D::new(b.0, b.1),
        )
    }

    fn room() -> Vec<Segment> {
        vec![
            seg(1, SegmentKind::wall(), (0.0, 0.0), (300.0, 0.0)),
            seg(2, SegmentKind::wall(), (300.0, 0.0), (300.0, 150.0)),
            seg(3, SegmentKind::wall(), (300.0, 150.0), (0.0, 150.0)),
            seg(4, SegmentKind::wall(), (0.0, 150.0), (0.0, 0.0)),
            seg(5, SegmentKind::Door(Opening::new(80.0, 0.0)), (100.0, 0.0), (136.0, 0.0)),
            seg(6, SegmentKind::Window(Opening::new(48.0, 36.0)), (300.0, 40.0), (300.0, 100.0)),
        ]
    }

    #[test]
    fn test_empty_plan_framing() {
        let bounds = PlanBounds::from_segments(&[]);
        assert_eq!(bounds.center(), Point2D::new(0.0, 0.0));
        assert_relative_eq!(bounds.orbit_radius(), 560.0);
        let floor = FloorPlane::framing(&bounds);
        assert_relative_eq!(floor.width, 600.0);
    }

    #[test]
    fn test_small_plan_is_floored() {
        let segs = vec![seg(1, SegmentKind::wall(), (10.0, 10.0), (60.0, 10.0))];
        let bounds = PlanBounds::from_segments(&segs);
        assert_eq!(bounds.framed_size(), (200.0, 200.0));
        assert_eq!(bounds.center(), Point2D::new(35.0, 10.0));
    }

    #[test]
    fn test_room_scene() {
        let scene = build_scene(&room(), &ResolvedSettings::default());
        assert_eq!(scene.footprints.len(), 4);
        assert_eq!(scene.joint_polygons.len(), 4);
        assert!(scene.joint_issues.is_empty());
        // Door wall: 2 full + 1 above; window wall: 2 full + above + below
        assert_eq!(scene.solid_count(), 2 + 1 + 4 + 1 + 1);
        assert_eq!(scene.fixtures.len(), 2);
        assert_eq!(scene.colliders.len(), 4);
        assert_eq!(scene.labels.len(), 6);
        assert_eq!(scene.opening_dimensions.len(), 2);
        assert_eq!(scene.opening_dimensions[0].from_start, "8' 4\"");

        let (min, max) = scene.wall_mesh().bounds();
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 96.0);
        // Walls extend outward from the drawn faces
        assert_relative_eq!(min.x, -6.0);
        assert_relative_eq!(max.y, 156.0);
    }

    #[test]
    fn test_hidden_walls_skip_plan_fill() {
        let settings = ResolvedSettings {
            show_walls: false,
            ..ResolvedSettings::default()
        };
        let scene = build_scene(&room(), &settings);
        let (footprints, polygons) = scene.plan_fill();
        assert!(footprints.is_empty() && polygons.is_empty());
        // The 3D side is unaffected
        assert_eq!(scene.walls.len(), 4);
    }

    #[test]
    fn test_labels_read_left_to_right() {
        let segs = vec![seg(1, SegmentKind::wall(), (120.0, 0.0), (0.0, 0.0))];
        let scene = build_scene(&segs, &ResolvedSettings::default());
        assert_relative_eq!(scene.labels[0].angle, 0.0, epsilon = 1e-12);
        assert_eq!(scene.labels[0].text, "10' 0\"");
    }
}

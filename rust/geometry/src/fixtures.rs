// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window fixtures set into wall openings
//!
//! Each opening gets a local frame centred on the opening: `x` runs along
//! the opening, `y` is up (0 at the opening's vertical centre) and `z`
//! points across the wall along its facing. Parts are described in that
//! frame and placed with [`FixturePlacement`].

use crate::facing::resolve_all_facings;
use crate::mesh::Mesh;
use crate::placement::resolve_parent_wall;
use crate::primitives::left_normal;
use nalgebra::{Point3, Vector2, Vector3};
use plan_lite_core::{ElementType, ResolvedSettings, Segment, SegmentId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Height of a door knob above the door's base (inches)
pub const KNOB_HEIGHT: f64 = 36.0;
pub const KNOB_RADIUS: f64 = 1.4;
/// Knob inset from the panel's latch edge
pub const KNOB_EDGE_INSET: f64 = 4.0;
pub const HANDLE_RADIUS: f64 = 0.35;
pub const HANDLE_LENGTH: f64 = 2.8;
pub const MUNTIN_WIDTH: f64 = 0.5;
pub const MUNTIN_DEPTH: f64 = 0.6;
pub const VERTICAL_MUNTINS: usize = 2;

/// What a fixture part represents, for material lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureMaterial {
    DoorTrim,
    DoorPanel,
    DoorInset,
    Hardware,
    WindowTrim,
    Sash,
    Glass,
    Muntin,
    Sill,
}

/// Part geometry in the opening's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    /// Box with extents along local x, y, z
    Box { size: Vector3<f64> },
    /// Flat pane in the local x/y plane
    Pane { width: f64, height: f64 },
    Sphere { radius: f64 },
    /// Cylinder centred on its position, axis along local z
    Cylinder { radius: f64, length: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixturePart {
    pub material: FixtureMaterial,
    pub shape: PartShape,
    /// Centre in the local frame
    pub position: Vector3<f64>,
}

impl FixturePart {
    fn cuboid(material: FixtureMaterial, size: (f64, f64, f64), position: (f64, f64, f64)) -> Self {
        Self {
            material,
            shape: PartShape::Box {
                size: Vector3::new(size.0, size.1, size.2),
            },
            position: Vector3::new(position.0, position.1, position.2),
        }
    }
}

/// Local frame of an opening in plan space (Z-up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixturePlacement {
    pub origin: Point3<f64>,
    /// Unit plan direction of local x
    pub along: Vector2<f64>,
    /// Unit plan direction of local z
    pub across: Vector2<f64>,
}

impl FixturePlacement {
    /// Local x, y, z axes in world space
    pub fn axes(&self) -> [Vector3<f64>; 3] {
        [
            Vector3::new(self.along.x, self.along.y, 0.0),
            Vector3::z(),
            Vector3::new(self.across.x, self.across.y, 0.0),
        ]
    }

    pub fn to_world(&self, local: &Vector3<f64>) -> Point3<f64> {
        let [x, y, z] = self.axes();
        self.origin + x * local.x + y * local.y + z * local.z
    }
}

/// Trim, panel, sash and hardware of one opening
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub opening: SegmentId,
    pub element: ElementType,
    /// Wall the opening sits in, if any
    pub wall: Option<SegmentId>,
    pub placement: FixturePlacement,
    pub parts: Vec<FixturePart>,
}

impl Fixture {
    /// Parts made of one material
    pub fn parts_of(&self, material: FixtureMaterial) -> impl Iterator<Item = &FixturePart> {
        self.parts.iter().filter(move |p| p.material == material)
    }

    /// Triangulate every part into world space
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        let axes = self.placement.axes();
        for part in &self.parts {
            let center = self.placement.to_world(&part.position);
            match part.shape {
                PartShape::Box { size } => mesh.add_box(center, axes, size / 2.0),
                PartShape::Pane { width, height } => {
                    let a = axes[0] * (width / 2.0);
                    let b = axes[1] * (height / 2.0);
                    let n = axes[2];
                    mesh.add_quad([center - a - b, center + a - b, center + a + b, center - a + b], n);
                    mesh.add_quad([center - a - b, center - a + b, center + a + b, center + a - b], -n);
                }
                PartShape::Sphere { radius } => mesh.add_sphere(center, radius, 18, 18),
                PartShape::Cylinder { radius, length } => {
                    let start = center - axes[2] * (length / 2.0);
                    mesh.add_cylinder(start, axes[2], length, radius, 16)
                }
            }
        }
        mesh
    }
}

/// Four bars framing an opening of `width` × `height`, centred at `z`
fn trim_frame(
    material: FixtureMaterial,
    width: f64,
    height: f64,
    trim: f64,
    depth: f64,
    z: f64,
) -> SmallVec<[FixturePart; 4]> {
    let mut bars = SmallVec::new();
    if trim <= 0.0 {
        return bars;
    }
    let y = height / 2.0 - trim / 2.0;
    let x = width / 2.0 - trim / 2.0;
    bars.push(FixturePart::cuboid(material, (width, trim, depth), (0.0, y, z)));
    bars.push(FixturePart::cuboid(material, (width, trim, depth), (0.0, -y, z)));
    bars.push(FixturePart::cuboid(material, (trim, height, depth), (-x, 0.0, z)));
    bars.push(FixturePart::cuboid(material, (trim, height, depth), (x, 0.0, z)));
    bars
}

/// Front and back trim frames at the two wall faces
fn trim_frames(
    parts: &mut Vec<FixturePart>,
    material: FixtureMaterial,
    width: f64,
    height: f64,
    trim: f64,
    depth: f64,
    thickness: f64,
) {
    let z = thickness / 2.0 - depth / 2.0;
    parts.extend(trim_frame(material, width, height, trim, depth, z));
    parts.extend(trim_frame(material, width, height, trim, depth, -z));
}

fn door_parts(length: f64, height: f64, thickness: f64, trim: f64) -> Vec<FixturePart> {
    let mut parts = Vec::with_capacity(12);
    let trim_depth = (thickness * 0.4).max(0.5);
    trim_frames(&mut parts, FixtureMaterial::DoorTrim, length, height, trim, trim_depth, thickness);

    let panel_w = (length - 2.0 * trim).max(length * 0.65);
    let panel_h = (height - trim).max(height * 0.9);
    let panel_t = (thickness * 0.2).max(1.2);
    parts.push(FixturePart::cuboid(
        FixtureMaterial::DoorPanel,
        (panel_w, panel_h, panel_t),
        (0.0, 0.0, 0.0),
    ));
    parts.push(FixturePart::cuboid(
        FixtureMaterial::DoorInset,
        (panel_w * 0.8, panel_h * 0.4, panel_t * 0.6),
        (0.0, 0.0, panel_t * 0.15),
    ));

    // Knob height is measured from the door's base; local y is from its centre
    let knob_x = panel_w / 2.0 - KNOB_EDGE_INSET;
    let knob_y = KNOB_HEIGHT - height / 2.0;
    let knob_z = panel_t / 2.0 + 0.5;
    parts.push(FixturePart {
        material: FixtureMaterial::Hardware,
        shape: PartShape::Sphere {
            radius: KNOB_RADIUS,
        },
        position: Vector3::new(knob_x, knob_y, knob_z),
    });
    parts.push(FixturePart {
        material: FixtureMaterial::Hardware,
        shape: PartShape::Cylinder {
            radius: HANDLE_RADIUS,
            length: HANDLE_LENGTH,
        },
        position: Vector3::new(knob_x, knob_y, knob_z + KNOB_RADIUS),
    });
    parts
}

fn window_parts(length: f64, height: f64, thickness: f64, trim: f64) -> Vec<FixturePart> {
    let mut parts = Vec::with_capacity(14);
    let trim_depth = (thickness * 0.35).max(0.4);
    trim_frames(&mut parts, FixtureMaterial::WindowTrim, length, height, trim, trim_depth, thickness);

    let sash_w = (length - 2.0 * trim).max(length * 0.7);
    let sash_h = (height - 2.0 * trim).max(height * 0.7);
    let sash_t = (thickness * 0.15).max(0.6);
    parts.push(FixturePart::cuboid(
        FixtureMaterial::Sash,
        (sash_w, sash_h, sash_t),
        (0.0, 0.0, 0.0),
    ));
    parts.push(FixturePart {
        material: FixtureMaterial::Glass,
        shape: PartShape::Pane {
            width: (sash_w - 3.0).max(1.0),
            height: (sash_h - 3.0).max(1.0),
        },
        position: Vector3::new(0.0, 0.0, 0.05),
    });

    let bays = (VERTICAL_MUNTINS + 1) as f64;
    for i in 1..=VERTICAL_MUNTINS {
        let x = (i as f64 - bays / 2.0) * (sash_w / bays);
        parts.push(FixturePart::cuboid(
            FixtureMaterial::Muntin,
            (MUNTIN_WIDTH, (sash_h - 1.0).max(1.0), MUNTIN_DEPTH),
            (x, 0.0, 0.0),
        ));
    }
    parts.push(FixturePart::cuboid(
        FixtureMaterial::Muntin,
        ((sash_w - 1.0).max(1.0), MUNTIN_WIDTH, MUNTIN_DEPTH),
        (0.0, 0.0, 0.0),
    ));

    let sill_h = trim.max(2.0);
    let sill_d = thickness.min(12.0);
    parts.push(FixturePart::cuboid(
        FixtureMaterial::Sill,
        (length, sill_h, sill_d),
        (0.0, -sash_h / 2.0 - sill_h / 2.0, thickness / 2.0 - sill_d / 2.0),
    ));
    parts
}

/// Fixture for one door or window.
///
/// `host` is the parent wall and its facing when the opening has one; the
/// fixture is then centred in the wall's thickness and aligned with it.
/// Otherwise it sits on the opening's own line. Returns `None` for walls
/// and zero-length openings.
pub fn opening_fixture(
    opening: &Segment,
    host: Option<(&Segment, Vector2<f64>)>,
    settings: &ResolvedSettings,
) -> Option<Fixture> {
    let dims = opening.opening()?;
    let own_u = opening.unit_direction()?;
    let length = opening.length();
    let thickness = settings.wall_thickness;
    let mid = opening.midpoint();

    let (wall, along, across, center) = match host.and_then(|(w, n)| Some((w, w.unit_direction()?, n))) {
        Some((wall, u, n)) => (Some(wall.id), u, n, mid.translated(n * (thickness / 2.0))),
        None => (None, own_u, left_normal(&own_u), mid),
    };

    let height = dims.height_inches;
    let y_center = dims.base_offset_inches + height / 2.0;
    let placement = FixturePlacement {
        origin: Point3::new(center.x, center.y, y_center),
        along,
        across,
    };

    let element = opening.element_type();
    let parts = match element {
        ElementType::Door => door_parts(length, height, thickness, settings.door_trim),
        ElementType::Window => window_parts(length, height, thickness, settings.window_trim),
        ElementType::Wall => return None,
    };

    Some(Fixture {
        opening: opening.id,
        element,
        wall,
        placement,
        parts,
    })
}

/// Fixtures for every door and window in the plan
pub fn build_fixtures(segments: &[Segment], settings: &ResolvedSettings) -> Vec<Fixture> {
    let facings = resolve_all_facings(segments);
    let walls: FxHashMap<SegmentId, &Segment> = segments
        .iter()
        .filter(|s| s.is_wall())
        .map(|s| (s.id, s))
        .collect();

    segments
        .iter()
        .filter(|s| s.is_opening())
        .filter_map(|opening| {
            let host = resolve_parent_wall(opening, segments).and_then(|p| {
                let wall = *walls.get(&p.wall)?;
                Some((wall, *facings.get(&p.wall)?))
            });
            opening_fixture(opening, host, settings)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plan_lite_core::{Opening, Point2D, SegmentKind};

    fn seg(id: u32, kind: SegmentKind, a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(
            SegmentId(id),
            kind,
            Point2D::new(a.0, a.1),
            Point2D::new(b.0, b.1),
        )
    }

    fn settings(door_trim: f64, window_trim: f64) -> ResolvedSettings {
        ResolvedSettings {
            door_trim,
            window_trim,
            ..ResolvedSettings::default()
        }
    }

    fn size(part: &FixturePart) -> Vector3<f64> {
        match part.shape {
            PartShape::Box { size } => size,
            _ => panic!("not a box"),
        }
    }

    #[test]
    fn test_door_without_trim() {
        let door = seg(1, SegmentKind::Door(Opening::new(80.0, 0.0)), (0.0, 0.0), (36.0, 0.0));
        let f = opening_fixture(&door, None, &settings(0.0, 0.0)).unwrap();
        assert_eq!(f.parts_of(FixtureMaterial::DoorTrim).count(), 0);

        let panel = f.parts_of(FixtureMaterial::DoorPanel).next().unwrap();
        let s = size(panel);
        assert_relative_eq!(s.x, 36.0);
        assert_relative_eq!(s.y, 80.0);
        assert_relative_eq!(s.z, 1.2);

        let knob = f
            .parts
            .iter()
            .find(|p| matches!(p.shape, PartShape::Sphere { .. }))
            .unwrap();
        assert_relative_eq!(knob.position.x, 14.0);
        assert_relative_eq!(knob.position.y, -4.0);
        // Knob sits 36 in above the floor
        assert_relative_eq!(f.placement.to_world(&knob.position).z, 36.0);
    }

    #[test]
    fn test_door_trim_frames() {
        let door = seg(1, SegmentKind::Door(Opening::new(80.0, 0.0)), (0.0, 0.0), (36.0, 0.0));
        let f = opening_fixture(&door, None, &settings(3.0, 0.0)).unwrap();
        let trims: Vec<_> = f.parts_of(FixtureMaterial::DoorTrim).collect();
        assert_eq!(trims.len(), 8);
        // Trim depth max(0.4 * 6, 0.5) = 2.4, so frames sit at z = ±1.8
        assert!(trims.iter().all(|t| (t.position.z.abs() - 1.8).abs() < 1e-12));
        assert_relative_eq!(size(trims[0]).y, 3.0);

        let panel = f.parts_of(FixtureMaterial::DoorPanel).next().unwrap();
        // max(36 - 6, 0.65 * 36) and max(80 - 3, 72)
        assert_relative_eq!(size(panel).x, 30.0);
        assert_relative_eq!(size(panel).y, 77.0);
    }

    #[test]
    fn test_window_parts() {
        let window = seg(
            1,
            SegmentKind::Window(Opening::new(48.0, 36.0)),
            (0.0, 0.0),
            (30.0, 0.0),
        );
        let f = opening_fixture(&window, None, &settings(0.0, 2.0)).unwrap();
        assert_relative_eq!(f.placement.origin.z, 60.0);
        assert_eq!(f.parts_of(FixtureMaterial::WindowTrim).count(), 8);
        assert_eq!(f.parts_of(FixtureMaterial::Muntin).count(), 3);
        assert_eq!(f.parts_of(FixtureMaterial::Glass).count(), 1);

        let sash = size(f.parts_of(FixtureMaterial::Sash).next().unwrap());
        assert_relative_eq!(sash.x, 26.0);
        assert_relative_eq!(sash.y, 44.0);

        let muntin_x: Vec<f64> = f
            .parts_of(FixtureMaterial::Muntin)
            .take(2)
            .map(|p| p.position.x)
            .collect();
        assert_relative_eq!(muntin_x[0], -26.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(muntin_x[1], 26.0 / 6.0, epsilon = 1e-12);

        let sill = f.parts_of(FixtureMaterial::Sill).next().unwrap();
        assert_relative_eq!(size(sill).y, 2.0);
        assert_relative_eq!(sill.position.y, -23.0);
    }

    #[test]
    fn test_fixture_follows_parent_wall() {
        let segs = vec![
            seg(1, SegmentKind::wall(), (0.0, 0.0), (120.0, 0.0)),
            seg(2, SegmentKind::wall(), (120.0, 0.0), (120.0, 96.0)),
            seg(3, SegmentKind::wall(), (120.0, 96.0), (0.0, 96.0)),
            seg(4, SegmentKind::wall(), (0.0, 96.0), (0.0, 0.0)),
            seg(5, SegmentKind::Door(Opening::new(80.0, 0.0)), (78.0, 0.0), (42.0, 0.0)),
        ];
        let fixtures = build_fixtures(&segs, &ResolvedSettings::default());
        assert_eq!(fixtures.len(), 1);
        let f = &fixtures[0];
        assert_eq!(f.wall, Some(SegmentId(1)));
        // Centred in the wall, which extends outward to y = -6
        assert_relative_eq!(f.placement.origin.x, 60.0);
        assert_relative_eq!(f.placement.origin.y, -3.0);
        assert_eq!(f.placement.along, Vector2::new(1.0, 0.0));
        assert!(!f.to_mesh().is_empty());
    }

    #[test]
    fn test_zero_length_opening_has_no_fixture() {
        let door = seg(1, SegmentKind::Door(Opening::new(80.0, 0.0)), (5.0, 5.0), (5.0, 5.0));
        assert!(opening_fixture(&door, None, &ResolvedSettings::default()).is_none());
        let wall = seg(2, SegmentKind::wall(), (0.0, 0.0), (5.0, 0.0));
        assert!(opening_fixture(&wall, None, &ResolvedSettings::default()).is_none());
    }
}

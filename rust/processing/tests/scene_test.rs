// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Imported plan through scene build, cameras and OBJ export.

use approx::assert_relative_eq;
use plan_lite_core::{import_json, PlanSettings, Point2D};
use plan_lite_geometry::collision::WalkInput;
use plan_lite_geometry::{FixtureMaterial, SolidRole};
use plan_lite_processing::{build_scene, write_obj, OrbitCamera, WalkCamera};
use std::f64::consts::PI;

/// 20' x 12' room; front door on the bottom wall, window on the right,
/// and the top-left corner left 1/2" open.
const PLAN: &str = r#"{
  "lines": [
    {"x1": 0,   "y1": 0,   "x2": 240, "y2": 0,   "kind": "wall"},
    {"x1": 240, "y1": 0,   "x2": 240, "y2": 144, "kind": "wall"},
    {"x1": 240, "y1": 144, "x2": 0.5, "y2": 144, "kind": "wall"},
    {"x1": 0,   "y1": 144, "x2": 0,   "y2": 0,   "kind": "wall"},
    {"x1": 100, "y1": 0,   "x2": 136, "y2": 0,   "kind": "door"},
    {"x1": 240, "y1": 48,  "x2": 240, "y2": 96,  "kind": "window", "heightInches": 40}
  ],
  "settings": {"ceilingHeight": "9'", "doorTrim": "3\"", "wallThickness": "6"}
}"#;

fn scene() -> plan_lite_processing::PlanScene {
    let imported = import_json(PLAN, &PlanSettings::default()).unwrap();
    let settings = imported.settings.unwrap().resolve();
    build_scene(imported.plan.segments(), &settings)
}

#[test]
fn settings_from_file_drive_the_scene() {
    let scene = scene();
    assert_relative_eq!(scene.settings.ceiling_height, 108.0);
    assert_relative_eq!(scene.settings.door_trim, 3.0);

    let (_, max) = scene.wall_mesh().bounds();
    assert_relative_eq!(max.z, 108.0);
}

#[test]
fn open_corner_is_reported_and_not_filled() {
    let scene = scene();
    assert_eq!(scene.joint_issues.len(), 1);
    let issue = scene.joint_issues.get_at(&Point2D::new(0.5, 144.0)).unwrap();
    assert_relative_eq!(issue.gap, 0.5, epsilon = 1e-9);
    assert_eq!(issue.endpoints.len(), 2);
    assert_eq!(scene.joint_polygons.len(), 3);
}

#[test]
fn openings_cut_walls_and_get_fixtures() {
    let scene = scene();
    let bottom = &scene.walls[0];
    let roles: Vec<_> = bottom.boxes.iter().map(|b| b.role).collect();
    assert_eq!(roles, vec![SolidRole::Full, SolidRole::AboveOpening, SolidRole::Full]);

    let right = &scene.walls[1];
    assert_eq!(right.voids.len(), 1);
    assert_relative_eq!(right.voids[0].base, 36.0);
    assert_relative_eq!(right.voids[0].top, 76.0);

    assert_eq!(scene.fixtures.len(), 2);
    let door = &scene.fixtures[0];
    assert!(door.parts_of(FixtureMaterial::DoorTrim).count() > 0);
    let window = &scene.fixtures[1];
    assert_eq!(window.parts_of(FixtureMaterial::Glass).count(), 1);

    let dims = &scene.opening_dimensions;
    assert_eq!(dims[0].from_start, "8' 4\"");
    assert_eq!(dims[0].from_end, "8' 8\"");
    assert_eq!(dims[1].from_start, "4' 0\"");
}

#[test]
fn obj_export_contains_every_object() {
    let scene = scene();
    let objects = scene.mesh_objects();
    let named: Vec<_> = objects.iter().map(|(n, m)| (*n, m)).collect();
    let mut out = Vec::new();
    write_obj(&mut out, &named).unwrap();
    let text = String::from_utf8(out).unwrap();

    for name in ["o floor", "o walls", "o fixtures"] {
        assert!(text.contains(name), "missing {}", name);
    }
    let vertices: usize = objects.iter().map(|(_, m)| m.vertex_count()).sum();
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), vertices);
}

#[test]
fn walker_leaves_through_the_door_but_not_the_wall() {
    let scene = scene();
    let out = WalkInput {
        forward: true,
        ..WalkInput::default()
    };

    // Facing -Y, lined up with the door
    let mut walker = WalkCamera {
        position: Point2D::new(118.0, 60.0),
        yaw: PI,
        pitch: 0.0,
    };
    for _ in 0..15 {
        walker.step(&scene.colliders, out);
    }
    assert!(walker.position.y < -10.0);

    // Same heading, away from the door
    let mut walker = WalkCamera {
        position: Point2D::new(40.0, 60.0),
        yaw: PI,
        pitch: 0.0,
    };
    for _ in 0..15 {
        walker.step(&scene.colliders, out);
    }
    assert!(walker.position.y > 0.0);
}

#[test]
fn orbit_frames_the_room() {
    let scene = scene();
    let camera = OrbitCamera::framing(&scene.bounds, scene.settings.ceiling_height);
    assert_relative_eq!(camera.target.x, 120.0);
    assert_relative_eq!(camera.target.y, 72.0);
    let expected = (2.0 * 336.0f64.powi(2) + 129.6f64.powi(2)).sqrt();
    assert_relative_eq!(camera.radius, expected, epsilon = 1e-9);
}

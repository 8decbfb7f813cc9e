// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A closed rectangular room with a door, end to end through every pass.

use approx::assert_relative_eq;
use plan_lite_core::{ElementType, Opening, PlanEditor, Point2D, Segment, SegmentId, SegmentKind};
use plan_lite_geometry::extrusion::extrude_walls;
use plan_lite_geometry::placement::{set_offset_from_end, set_offset_from_start};
use plan_lite_geometry::{
    build_endpoint_clusters, compute_joints, joint_fill_polygons, resolve_parent_wall,
    resolve_wall_facing, segment_wall_for_extrusion, SolidRole,
};

fn seg(id: u32, kind: SegmentKind, a: (f64, f64), b: (f64, f64)) -> Segment {
    Segment::new(
        SegmentId(id),
        kind,
        Point2D::new(a.0, a.1),
        Point2D::new(b.0, b.1),
    )
}

/// 144 x 120 room, door 36 wide centred on the bottom wall
fn room_with_door() -> Vec<Segment> {
    vec![
        seg(1, SegmentKind::wall(), (0.0, 0.0), (144.0, 0.0)),
        seg(2, SegmentKind::wall(), (144.0, 0.0), (144.0, 120.0)),
        seg(3, SegmentKind::wall(), (144.0, 120.0), (0.0, 120.0)),
        seg(4, SegmentKind::wall(), (0.0, 120.0), (0.0, 0.0)),
        seg(5, SegmentKind::Door(Opening::new(80.0, 0.0)), (54.0, 0.0), (90.0, 0.0)),
    ]
}

#[test]
fn door_offsets_sum_to_wall_length() {
    let segs = room_with_door();
    let placement = resolve_parent_wall(&segs[4], &segs).expect("door has a parent wall");
    assert_eq!(placement.wall, SegmentId(1));
    assert_relative_eq!(placement.from_start, 54.0);
    assert_relative_eq!(placement.from_end, 54.0);
    assert_relative_eq!(
        placement.from_start + placement.span.width() + placement.from_end,
        placement.wall_length,
        epsilon = 1e-9
    );
}

#[test]
fn three_walls_meeting_within_a_hundredth() {
    let segs = vec![
        seg(1, SegmentKind::wall(), (0.0, 0.0), (100.0, 0.0)),
        seg(2, SegmentKind::wall(), (0.01, 0.0), (0.01, 100.0)),
        seg(3, SegmentKind::wall(), (0.005, 0.0), (0.005, -100.0)),
    ];
    let clusters = build_endpoint_clusters(&segs);
    let corner: Vec<_> = clusters.iter().filter(|c| c.is_joint()).collect();
    assert_eq!(corner.len(), 1);
    assert_eq!(corner[0].endpoints.len(), 3);
    assert_relative_eq!(corner[0].max_pair_distance, 0.01, epsilon = 1e-9);
    assert!(corner[0].max_pair_distance < 0.25);
    assert!(!corner[0].is_misaligned());
    assert!(compute_joints(&segs).is_empty());
}

#[test]
fn facing_is_stable_across_calls() {
    let segs = room_with_door();
    for wall in segs.iter().filter(|s| s.is_wall()) {
        let first = resolve_wall_facing(wall, &segs);
        let second = resolve_wall_facing(wall, &segs);
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}

#[test]
fn room_extrudes_with_door_gap() {
    let segs = room_with_door();
    let bottom = segment_wall_for_extrusion(&segs[0], &segs, 6.0, 96.0);
    let roles: Vec<_> = bottom.boxes.iter().map(|b| b.role).collect();
    assert_eq!(
        roles,
        vec![SolidRole::Full, SolidRole::AboveOpening, SolidRole::Full]
    );
    assert_eq!(bottom.voids.len(), 1);
    assert_eq!(bottom.voids[0].element, ElementType::Door);
    // Exterior side of the bottom wall is -y
    assert!(bottom.boxes.iter().all(|b| (b.center.y + 3.0).abs() < 1e-9));

    let (extrusions, footprints) = extrude_walls(&segs, 6.0, 96.0);
    assert_eq!(extrusions.len(), 4);
    let total_boxes: usize = extrusions.iter().map(|e| e.boxes.len()).sum();
    assert_eq!(total_boxes, 6);

    let polygons = joint_fill_polygons(&build_endpoint_clusters(&segs), &footprints);
    assert_eq!(polygons.len(), 4);
    assert!(polygons.iter().all(|p| p.points.len() >= 3));
}

#[test]
fn wall_relative_offsets_move_the_door() {
    let mut editor = PlanEditor::new();
    let mut ids = Vec::new();
    for s in room_with_door() {
        let id = editor
            .commit_drawn_segment(s.element_type(), s.start, s.end)
            .unwrap()
            .unwrap();
        ids.push(id);
    }
    let door = ids[4];
    let undo_depth = editor.history().len();

    set_offset_from_start(&mut editor, door, "2'").unwrap();
    let segs = editor.plan().segments();
    let p = resolve_parent_wall(editor.plan().segment(door).unwrap(), segs).unwrap();
    assert_relative_eq!(p.from_start, 24.0, epsilon = 1e-9);
    assert_relative_eq!(p.from_end, 84.0, epsilon = 1e-9);
    assert_eq!(editor.history().len(), undo_depth + 1);

    set_offset_from_end(&mut editor, door, "12\"").unwrap();
    let segs = editor.plan().segments();
    let p = resolve_parent_wall(editor.plan().segment(door).unwrap(), segs).unwrap();
    assert_relative_eq!(p.from_end, 12.0, epsilon = 1e-9);
    assert_relative_eq!(p.from_start, 96.0, epsilon = 1e-9);

    // Unparseable text changes nothing and saves nothing
    let before = editor.plan().segment(door).cloned();
    let depth = editor.history().len();
    assert!(set_offset_from_start(&mut editor, door, "abc").is_err());
    assert_eq!(editor.plan().segment(door).cloned(), before);
    assert_eq!(editor.history().len(), depth);

    // Walls have no parent
    assert!(set_offset_from_start(&mut editor, ids[0], "10").is_err());
}

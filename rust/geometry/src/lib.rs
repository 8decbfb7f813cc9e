// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-Lite Geometry
//!
//! Geometry derived from a floor plan: endpoint joints, wall-relative
//! opening placement, wall facing, wall solids around openings, opening
//! fixtures, walk colliders, and triangle meshes. Everything is recomputed
//! from the segment list on demand and returned as plain data for a
//! renderer to draw.

pub mod collision;
pub mod error;
pub mod extrusion;
pub mod facing;
pub mod fixtures;
pub mod joints;
pub mod mesh;
pub mod picking;
pub mod placement;
pub mod primitives;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector2, Vector3};

pub use collision::{build_wall_colliders, is_position_blocked, resolve_walk_step, WallCollider};
pub use error::{Error, Result};
pub use extrusion::{
    extrude_walls, joint_fill_polygons, segment_wall_for_extrusion, JointPolygon, OpeningVoid,
    SolidBox, SolidRole, WallExtrusion, WallFootprint,
};
pub use facing::{resolve_all_facings, resolve_wall_facing};
pub use fixtures::{build_fixtures, Fixture, FixtureMaterial, FixturePart, PartShape};
pub use joints::{build_endpoint_clusters, compute_joints, JointCluster, JointIssue, JointIssues, JointKey};
pub use mesh::Mesh;
pub use picking::{find_endpoint_at, find_segment_at, hover_joint, snap_point};
pub use placement::{resolve_parent_wall, WallPlacement, WallSpan};
pub use primitives::point_segment_distance;

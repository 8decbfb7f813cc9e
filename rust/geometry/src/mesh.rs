// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Triangle mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a flat quad, corners counter-clockwise seen from the normal side
    pub fn add_quad(&mut self, corners: [Point3<f64>; 4], normal: Vector3<f64>) {
        let base = self.vertex_count() as u32;
        for c in corners {
            self.add_vertex(c, normal);
        }
        self.add_triangle(base, base + 1, base + 2);
        self.add_triangle(base, base + 2, base + 3);
    }

    /// Add an oriented box.
    ///
    /// `axes` are the box's orthonormal local axes and `half` its half
    /// extents along them. Each face gets its own vertices so normals stay
    /// flat.
    pub fn add_box(&mut self, center: Point3<f64>, axes: [Vector3<f64>; 3], half: Vector3<f64>) {
        let mut axes = axes;
        // Faces wind counter-clockwise only in a right-handed frame
        if axes[0].cross(&axes[1]).dot(&axes[2]) < 0.0 {
            axes[1] = -axes[1];
        }

        self.positions.reserve(24 * 3);
        self.normals.reserve(24 * 3);
        self.indices.reserve(36);

        for i in 0..3 {
            let j = (i + 1) % 3;
            let k = (i + 2) % 3;
            let a = axes[j] * half[j];
            let b = axes[k] * half[k];
            for sign in [1.0, -1.0] {
                let normal = axes[i] * sign;
                let face = center + normal * half[i];
                let corners = if sign > 0.0 {
                    [face - a - b, face + a - b, face + a + b, face - a + b]
                } else {
                    [face - a - b, face - a + b, face + a + b, face + a - b]
                };
                self.add_quad(corners, normal);
            }
        }
    }

    /// Add an axis-aligned box
    pub fn add_aabb(&mut self, min: Point3<f64>, max: Point3<f64>) {
        let center = nalgebra::center(&min, &max);
        let half = (max - min) / 2.0;
        self.add_box(center, [Vector3::x(), Vector3::y(), Vector3::z()], half);
    }

    /// Add a UV sphere
    pub fn add_sphere(&mut self, center: Point3<f64>, radius: f64, segments: u32, rings: u32) {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let base = self.vertex_count() as u32;

        for r in 0..=rings {
            let phi = PI * r as f64 / rings as f64;
            for s in 0..=segments {
                let theta = 2.0 * PI * s as f64 / segments as f64;
                let n = Vector3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
                self.add_vertex(center + n * radius, n);
            }
        }

        let row = segments + 1;
        for r in 0..rings {
            for s in 0..segments {
                let a = base + r * row + s;
                let b = a + row;
                self.add_triangle(a, b, a + 1);
                self.add_triangle(a + 1, b, b + 1);
            }
        }
    }

    /// Add a capped cylinder from `start` along `axis` (unit) for `length`
    pub fn add_cylinder(
        &mut self,
        start: Point3<f64>,
        axis: Vector3<f64>,
        length: f64,
        radius: f64,
        segments: u32,
    ) {
        let segments = segments.max(3);
        let helper = if axis.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let e1 = axis.cross(&helper).normalize();
        let e2 = axis.cross(&e1);
        let end = start + axis * length;

        let base = self.vertex_count() as u32;
        for s in 0..=segments {
            let theta = 2.0 * PI * s as f64 / segments as f64;
            let n = e1 * theta.cos() + e2 * theta.sin();
            self.add_vertex(start + n * radius, n);
            self.add_vertex(end + n * radius, n);
        }
        for s in 0..segments {
            let a = base + s * 2;
            self.add_triangle(a, a + 2, a + 1);
            self.add_triangle(a + 1, a + 2, a + 3);
        }

        for (cap, normal) in [(start, -axis), (end, axis)] {
            let center = self.vertex_count() as u32;
            self.add_vertex(cap, normal);
            for s in 0..=segments {
                let theta = 2.0 * PI * s as f64 / segments as f64;
                self.add_vertex(cap + (e1 * theta.cos() + e2 * theta.sin()) * radius, normal);
            }
            for s in 0..segments {
                let a = center + 1 + s;
                if normal.dot(&axis) > 0.0 {
                    self.add_triangle(center, a, a + 1);
                } else {
                    self.add_triangle(center, a + 1, a);
                }
            }
        }
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = (self.positions.len() / 3) as u32;

        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Batch merge multiple meshes at once
    #[inline]
    pub fn merge_all(&mut self, meshes: &[Mesh]) {
        let total_positions: usize = meshes.iter().map(|m| m.positions.len()).sum();
        let total_indices: usize = meshes.iter().map(|m| m.indices.len()).sum();

        self.positions.reserve(total_positions);
        self.normals.reserve(total_positions);
        self.indices.reserve(total_indices);

        for mesh in meshes {
            if !mesh.is_empty() {
                let vertex_offset = (self.positions.len() / 3) as u32;
                self.positions.extend_from_slice(&mesh.positions);
                self.normals.extend_from_slice(&mesh.normals);
                self.indices
                    .extend(mesh.indices.iter().map(|&i| i + vertex_offset));
            }
        }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Clear the mesh
    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

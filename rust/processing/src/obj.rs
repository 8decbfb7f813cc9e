// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export
//!
//! Plan geometry is Z-up in inches. OBJ viewers expect Y-up, so vertices
//! are written as `(x, z, -y)` and triangle winding is reversed to keep the
//! faces pointing outward after the flip.

use crate::error::Result;
use crate::scene::PlanScene;
use plan_lite_geometry::Mesh;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write named meshes as separate OBJ objects. Empty meshes are skipped.
pub fn write_obj<W: Write>(w: &mut W, objects: &[(&str, &Mesh)]) -> io::Result<()> {
    writeln!(w, "# Generated by plan-to-3d (plan-lite)")?;
    writeln!(w, "# Units: inches")?;
    writeln!(w, "# Coordinate system: Y-up (OBJ convention)")?;
    writeln!(w)?;

    let mut vertex_offset: u32 = 0;
    for (name, mesh) in objects.iter().filter(|(_, m)| !m.is_empty()) {
        writeln!(w, "o {}", name)?;

        for p in mesh.positions.chunks_exact(3) {
            writeln!(w, "v {:.6} {:.6} {:.6}", p[0], p[2], -p[1])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(w, "vn {:.6} {:.6} {:.6}", n[0], n[2], -n[1])?;
        }
        for t in mesh.indices.chunks_exact(3) {
            let i0 = t[0] + vertex_offset + 1;
            let i1 = t[1] + vertex_offset + 1;
            let i2 = t[2] + vertex_offset + 1;
            writeln!(w, "f {}//{} {}//{} {}//{}", i0, i0, i2, i2, i1, i1)?;
        }

        vertex_offset += mesh.vertex_count() as u32;
        writeln!(w)?;
    }
    Ok(())
}

/// Write a scene's floor, walls and fixtures to an OBJ file
pub fn write_scene_obj(scene: &PlanScene, path: &Path) -> Result<()> {
    let objects = scene.mesh_objects();
    let named: Vec<(&str, &Mesh)> = objects.iter().map(|(name, mesh)| (*name, mesh)).collect();
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(&mut writer, &named)?;
    writer.flush()?;
    Ok(())
}

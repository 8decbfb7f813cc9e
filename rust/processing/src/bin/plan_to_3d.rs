// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan JSON to 3D OBJ
//!
//! Usage: plan-to-3d <plan.json> [--output plan.obj] [--thickness 6]

use anyhow::{bail, Context};
use plan_lite_core::PlanSettings;
use plan_lite_processing::{build_scene, write_scene_obj, Config, OrbitCamera};
use std::env;
use std::path::Path;
use std::time::Instant;
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,plan_lite_processing=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let plan_path = &args[1];
    let config = Config::from_env();

    // Parse options
    let mut output_path = config.output.clone();
    let mut flags = PlanSettings::default();
    let mut show_report = true;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--output" => output_path = option_value(&args, &mut i)?,
            "--thickness" => flags.wall_thickness = Some(option_value(&args, &mut i)?),
            "--ceiling" => flags.ceiling_height = Some(option_value(&args, &mut i)?),
            "--door-trim" => flags.door_trim = Some(option_value(&args, &mut i)?),
            "--window-trim" => flags.window_trim = Some(option_value(&args, &mut i)?),
            "--quiet" => show_report = false,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => {
                print_usage();
                bail!("unknown option: {}", other);
            }
        }
        i += 1;
    }

    let start = Instant::now();

    // 1. Load plan
    println!("Loading {}...", plan_path);
    let (imported, file_settings) = config
        .load_plan(Path::new(plan_path))
        .with_context(|| format!("cannot load plan '{}'", plan_path))?;
    if imported.skipped > 0 {
        println!("  Skipped {} unreadable entries", imported.skipped);
    }

    let settings = flags.or(&file_settings).resolve();
    let plan = &imported.plan;
    println!(
        "  {} segments ({} walls, {} openings)",
        plan.len(),
        plan.walls().count(),
        plan.openings().count()
    );
    println!(
        "  Wall thickness {}\", ceiling {}\"",
        settings.wall_thickness, settings.ceiling_height
    );

    // 2. Build scene
    let scene = build_scene(plan.segments(), &settings);
    println!(
        "  {} wall solids, {} openings cut, {} fixtures",
        scene.solid_count(),
        scene.walls.iter().map(|w| w.voids.len()).sum::<usize>(),
        scene.fixtures.len()
    );

    // 3. Joint report
    if show_report {
        print_joint_report(&scene);
    }

    // 4. Write OBJ
    write_scene_obj(&scene, Path::new(&output_path))
        .with_context(|| format!("cannot write output file '{}'", output_path))?;

    let objects = scene.mesh_objects();
    let vertices: usize = objects.iter().map(|(_, m)| m.vertex_count()).sum();
    let triangles: usize = objects.iter().map(|(_, m)| m.triangle_count()).sum();
    let camera = OrbitCamera::framing(&scene.bounds, settings.ceiling_height);
    let eye = camera.position();

    info!(
        output = %output_path,
        vertices,
        triangles,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Wrote OBJ"
    );

    println!();
    println!("=== Summary ===");
    println!("  Output:     {}", output_path);
    println!("  Vertices:   {}", vertices);
    println!("  Triangles:  {}", triangles);
    println!(
        "  Suggested camera: eye ({:.1}, {:.1}, {:.1}) looking at ({:.1}, {:.1}, 0.0)",
        eye.x, eye.y, eye.z, camera.target.x, camera.target.y
    );
    println!("  Time:       {:.2?}", start.elapsed());

    Ok(())
}

/// Value following the option at `args[*i]`; advances `i` onto it
fn option_value(args: &[String], i: &mut usize) -> anyhow::Result<String> {
    let name = &args[*i];
    *i += 1;
    args.get(*i)
        .cloned()
        .with_context(|| format!("{} needs a value", name))
}

fn print_joint_report(scene: &plan_lite_processing::PlanScene) {
    if scene.joint_issues.is_empty() {
        println!("  All wall ends meet cleanly");
        return;
    }
    println!("  {} wall joints need attention:", scene.joint_issues.len());
    for issue in scene.joint_issues.iter() {
        println!(
            "    ({:.2}, {:.2}): gap \u{2248} {}, {} connected edges",
            issue.center.x,
            issue.center.y,
            plan_lite_core::units::format_inches(issue.gap, 2),
            issue.endpoints.len()
        );
    }
}

fn print_usage() {
    println!(
        r#"Floor Plan to 3D
================

Converts a plan-lite JSON floor plan into a 3D mesh (OBJ format, Y-up, inches).

USAGE:
  plan-to-3d <plan.json> [OPTIONS]

ARGUMENTS:
  <plan.json>              Exported plan: a list of lines or {{ "lines": [...], "settings": {{...}} }}

OPTIONS:
  --output <path>          Output OBJ file path (default: $PLAN_OUTPUT or plan.obj)
  --thickness <inches>     Wall thickness (default: 6)
  --ceiling <length>       Ceiling height, e.g. 8' or 96" (default: 8' 0")
  --door-trim <length>     Door trim width (default: 0)
  --window-trim <length>   Window trim width (default: 0)
  --quiet                  Skip the joint report
  -h, --help               Show this help message

ENVIRONMENT:
  PLAN_WALL_THICKNESS, PLAN_CEILING_HEIGHT, PLAN_DOOR_TRIM, PLAN_WINDOW_TRIM,
  PLAN_SHOW_WALLS, PLAN_OUTPUT
  Settings stored in the plan file take precedence over the environment;
  options above take precedence over both.

EXAMPLES:
  plan-to-3d kitchen.json
  plan-to-3d kitchen.json --ceiling "9'" --output kitchen.obj
  RUST_LOG=debug plan-to-3d kitchen.json
"#
    );
}

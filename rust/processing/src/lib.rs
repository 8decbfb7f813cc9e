// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-Lite Processing
//!
//! Turns a floor plan into a renderable scene: wall fills and corner
//! polygons for the plan view, wall solids and opening fixtures for the 3D
//! view, cameras for orbiting and walking through it, and OBJ export.
//!
//! ```no_run
//! use plan_lite_processing::{build_scene, write_scene_obj, Config};
//! use std::path::Path;
//!
//! let config = Config::from_env();
//! let (imported, settings) = config.load_plan(Path::new("plan.json"))?;
//! let scene = build_scene(imported.plan.segments(), &settings.resolve());
//! write_scene_obj(&scene, Path::new("plan.obj"))?;
//! # Ok::<(), plan_lite_processing::Error>(())
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod obj;
pub mod scene;

pub use camera::{OrbitCamera, WalkCamera};
pub use config::Config;
pub use error::{Error, Result};
pub use obj::{write_obj, write_scene_obj};
pub use scene::{build_scene, FloorPlane, OpeningDimensions, PlanBounds, PlanScene, SegmentLabel};

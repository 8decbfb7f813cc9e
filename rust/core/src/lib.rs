// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Plan-Lite Core
//!
//! Data model and editing API for 2D floor plans drawn as line segments.
//!
//! ## Overview
//!
//! - **Segments**: walls, doors and windows with stable ids ([`Segment`])
//! - **Floor plan**: the single owned segment store ([`FloorPlan`])
//! - **Editing**: undoable mutations with a bounded history ([`PlanEditor`])
//! - **Units**: architectural length text, parsed with [nom](https://docs.rs/nom)
//! - **Exchange**: JSON import/export and settings persistence
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plan_lite_core::{ElementType, PlanEditor, Point2D};
//!
//! let mut editor = PlanEditor::new();
//! let wall = editor
//!     .commit_drawn_segment(ElementType::Wall, Point2D::new(0.0, 0.0), Point2D::new(96.0, 0.0))?
//!     .unwrap();
//! editor.set_length(wall, "10' 6\"")?;
//! editor.undo();
//! ```
//!
//! Geometry derived from the plan (joints, facing, extrusion) lives in
//! `plan-lite-geometry`.

pub mod editor;
pub mod error;
pub mod exchange;
pub mod history;
pub mod plan;
pub mod segment;
pub mod settings;
pub mod units;
pub mod viewport;

pub use editor::{EndpointDrag, PlanEditor, MIN_DRAW_LENGTH};
pub use error::{Error, Result};
pub use exchange::{export_json, import_json, ExportedLine, ExportedPlan, ImportedPlan};
pub use history::{PlanSnapshot, SegmentRecord, UndoHistory, MAX_UNDO_STEPS};
pub use plan::FloorPlan;
pub use segment::{ElementType, Opening, Point2D, Segment, SegmentEnd, SegmentId, SegmentKind};
pub use settings::{PlanSettings, ResolvedSettings};
pub use units::{format_length, parse_length};
pub use viewport::Viewport;

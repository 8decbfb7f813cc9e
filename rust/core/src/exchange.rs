// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON import and export of plans
//!
//! Export shape:
//!
//! ```json
//! { "lines": [ { "x1": 0, "y1": 0, "x2": 120, "y2": 0, "kind": "wall" } ],
//!   "settings": { "wallThickness": "6" } }
//! ```
//!
//! Import also accepts a bare array of line objects. Entries that cannot be
//! read are skipped one by one; a wrong top-level shape fails the whole
//! import before anything is built.

use crate::error::{Error, Result};
use crate::history::SegmentRecord;
use crate::plan::FloorPlan;
use crate::segment::{ElementType, Opening, Point2D, Segment, SegmentId, SegmentKind};
use crate::settings::PlanSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One line in the exchange format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub kind: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_inches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_offset_inches: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub facing_flipped: bool,
}

impl From<&Segment> for ExportedLine {
    fn from(s: &Segment) -> Self {
        let opening = s.opening();
        Self {
            x1: s.start.x,
            y1: s.start.y,
            x2: s.end.x,
            y2: s.end.y,
            kind: s.element_type(),
            height_inches: opening.map(|o| o.height_inches),
            base_offset_inches: opening.map(|o| o.base_offset_inches),
            facing_flipped: s.facing_flipped(),
        }
    }
}

/// Whole exported document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedPlan {
    pub lines: Vec<ExportedLine>,
    pub settings: PlanSettings,
}

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct ImportedPlan {
    /// Segments with ids 1..=n in file order
    pub plan: FloorPlan,
    /// Settings block, when the document carried one
    pub settings: Option<PlanSettings>,
    /// Entries that were dropped
    pub skipped: usize,
}

/// Serialize the plan and its settings as pretty JSON
pub fn export_json(plan: &FloorPlan, settings: &PlanSettings) -> Result<String> {
    let doc = ExportedPlan {
        lines: plan.segments().iter().map(ExportedLine::from).collect(),
        settings: settings.clone(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse an exchange document.
///
/// `current` supplies the door/window defaults for entries that carry no
/// usable height or base offset; a settings block in the document takes
/// precedence over it.
pub fn import_json(text: &str, current: &PlanSettings) -> Result<ImportedPlan> {
    if text.trim().is_empty() {
        return Err(Error::InvalidImport("document is empty".into()));
    }
    let data: Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidImport(format!("invalid JSON: {}", e)))?;

    let (entries, settings) = match &data {
        Value::Array(items) => (items, None),
        Value::Object(obj) => match obj.get("lines") {
            Some(Value::Array(items)) => (items, obj.get("settings").map(PlanSettings::from_value)),
            _ => {
                return Err(Error::InvalidImport(
                    "expected an array of lines or { \"lines\": [...] }".into(),
                ))
            }
        },
        _ => {
            return Err(Error::InvalidImport(
                "expected an array of lines or { \"lines\": [...] }".into(),
            ))
        }
    };

    let defaults = match &settings {
        Some(s) => s.clone().or(current).resolve(),
        None => current.resolve(),
    };

    let mut segments = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for (index, item) in entries.iter().enumerate() {
        let next = SegmentId(segments.len() as u32 + 1);
        match read_line(item, next, |t| defaults.opening_for(t)) {
            Some(segment) => segments.push(segment),
            None => {
                warn!(index, "Skipping unreadable line entry");
                skipped += 1;
            }
        }
    }

    let next_id = segments.len() as u32 + 1;
    debug!(lines = segments.len(), skipped, "Imported plan");

    Ok(ImportedPlan {
        plan: FloorPlan::from_segments(segments, next_id),
        settings,
        skipped,
    })
}

/// Read a numeric field: a JSON number or a numeric string, finite
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let v = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => fast_float::parse::<f64, _>(s.trim()).ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn read_line(
    item: &Value,
    id: SegmentId,
    default_opening: impl Fn(ElementType) -> Option<Opening>,
) -> Option<Segment> {
    let obj: &Map<String, Value> = item.as_object()?;

    let start = Point2D::new(coerce_number(obj.get("x1"))?, coerce_number(obj.get("y1"))?);
    let end = Point2D::new(coerce_number(obj.get("x2"))?, coerce_number(obj.get("y2"))?);
    if start == end {
        return None;
    }

    // A missing or unknown kind is not guessed
    let element = ElementType::parse(&obj.get("kind")?.as_str()?.to_lowercase())?;

    let kind = match default_opening(element) {
        None => SegmentKind::Wall {
            facing_flipped: obj.get("facingFlipped").and_then(Value::as_bool) == Some(true),
        },
        Some(fallback) => {
            let height = coerce_number(obj.get("heightInches"))
                .filter(|h| *h > 0.0)
                .unwrap_or(fallback.height_inches);
            let base = coerce_number(obj.get("baseOffsetInches"))
                .filter(|b| *b >= 0.0)
                .unwrap_or(fallback.base_offset_inches);
            let opening = Opening::new(height, base);
            if element == ElementType::Door {
                SegmentKind::Door(opening)
            } else {
                SegmentKind::Window(opening)
            }
        }
    };

    Some(Segment::new(id, kind, start, end))
}

/// Local autosave: the live collection with ids, plus the id counter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AutosaveDocument {
    #[serde(default)]
    next_id: u32,
    segments: Vec<SegmentRecord>,
}

/// Serialize the live collection with ids, for local autosave
pub fn save_snapshot_json(plan: &FloorPlan) -> Result<String> {
    let document = AutosaveDocument {
        next_id: plan.next_id(),
        segments: plan.snapshot().segments,
    };
    Ok(serde_json::to_string(&document)?)
}

/// Restore an autosave written by [`save_snapshot_json`].
///
/// Records with id 0, a repeated id, zero length, or a door or window
/// without opening dimensions are skipped. The id counter never falls
/// below the stored one.
pub fn load_snapshot_json(text: &str) -> Result<FloorPlan> {
    let document: AutosaveDocument = serde_json::from_str(text)?;
    let mut seen = HashSet::with_capacity(document.segments.len());
    let mut segments = Vec::with_capacity(document.segments.len());

    for record in &document.segments {
        if record.id.0 == 0 || seen.contains(&record.id) {
            warn!(id = %record.id, "Skipping autosave record with invalid id");
            continue;
        }
        match record.to_segment() {
            Some(segment) => {
                seen.insert(record.id);
                segments.push(segment);
            }
            None => warn!(id = %record.id, kind = ?record.kind, "Skipping unreadable autosave record"),
        }
    }

    debug!(
        kept = segments.len(),
        skipped = document.segments.len() - segments.len(),
        "Loaded autosave"
    );
    Ok(FloorPlan::from_segments(segments, document.next_id))
}

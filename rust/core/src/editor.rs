// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editing session: the plan, its undo history, settings and gesture state
//!
//! Every mutation goes through [`PlanEditor::edit`], which saves one undo
//! snapshot when the change succeeds and rolls the plan back when it fails,
//! so a rejected edit leaves both the plan and the history untouched.

use crate::error::{Error, Result};
use crate::exchange::ImportedPlan;
use crate::history::UndoHistory;
use crate::plan::FloorPlan;
use crate::segment::{ElementType, Point2D, Segment, SegmentEnd, SegmentId, SegmentKind};
use crate::settings::{PlanSettings, ResolvedSettings};
use crate::units::{parse_angle, parse_length};
use nalgebra::Vector2;
use smallvec::SmallVec;
use tracing::debug;

/// Drawn segments at or below this length (inches) are discarded
pub const MIN_DRAW_LENGTH: f64 = 2.0;

/// Length used when setting the angle of a zero-length segment
pub const DEFAULT_ANGLE_LENGTH: f64 = 12.0;

/// An endpoint being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDrag {
    pub segment: SegmentId,
    pub end: SegmentEnd,
}

#[derive(Debug, Clone)]
struct DragState {
    drag: EndpointDrag,
    /// The dragged segment when the drag began
    origin: Segment,
    /// History push count right after the drag's own snapshot
    pushes: u64,
}

/// Owns the live plan and everything that mutates it
#[derive(Debug, Clone, Default)]
pub struct PlanEditor {
    plan: FloorPlan,
    history: UndoHistory,
    settings: PlanSettings,
    resolved: ResolvedSettings,
    selected: Option<SegmentId>,
    drag: Option<DragState>,
}

impl PlanEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(plan: FloorPlan, settings: PlanSettings) -> Self {
        let resolved = settings.resolve();
        Self {
            plan,
            settings,
            resolved,
            ..Self::default()
        }
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    pub fn resolved_settings(&self) -> &ResolvedSettings {
        &self.resolved
    }

    /// Replace the settings. Settings changes are not undoable.
    pub fn set_settings(&mut self, settings: PlanSettings) {
        self.resolved = settings.resolve();
        self.settings = settings;
    }

    pub fn selected(&self) -> Option<SegmentId> {
        self.selected
    }

    pub fn selected_segment(&self) -> Option<&Segment> {
        self.selected.and_then(|id| self.plan.segment(id))
    }

    pub fn select(&mut self, id: Option<SegmentId>) {
        self.selected = id.filter(|id| self.plan.segment(*id).is_some());
    }

    pub fn active_drag(&self) -> Option<EndpointDrag> {
        self.drag.as_ref().map(|state| state.drag)
    }

    /// Run a mutation as one undoable step.
    ///
    /// On `Ok` the pre-edit state is pushed onto the history; on `Err` the
    /// plan is restored and nothing is pushed.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut FloorPlan) -> Result<T>) -> Result<T> {
        let backup = self.plan.clone();
        match f(&mut self.plan) {
            Ok(value) => {
                self.history.push(backup.segments());
                Ok(value)
            }
            Err(e) => {
                self.plan = backup;
                Err(e)
            }
        }
    }

    /// Commit a finished draw gesture.
    ///
    /// Returns `Ok(None)` when the gesture was too short to keep. Doors and
    /// windows take their vertical extent from the current settings.
    pub fn commit_drawn_segment(
        &mut self,
        element: ElementType,
        start: Point2D,
        end: Point2D,
    ) -> Result<Option<SegmentId>> {
        if !(start.distance_to(&end) > MIN_DRAW_LENGTH) {
            return Ok(None);
        }
        let kind = match self.resolved.opening_for(element) {
            None => SegmentKind::wall(),
            Some(o) if element == ElementType::Door => SegmentKind::Door(o),
            Some(o) => SegmentKind::Window(o),
        };
        let id = self.edit(|plan| plan.add_segment(kind, start, end))?;
        debug!(%id, %element, "Committed drawn segment");
        self.selected = Some(id);
        Ok(Some(id))
    }

    pub fn delete_segment(&mut self, id: SegmentId) -> Result<Segment> {
        let removed = self.edit(|plan| plan.remove_segment(id).ok_or(Error::SegmentNotFound(id)))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.active_drag().map(|d| d.segment) == Some(id) {
            self.drag = None;
        }
        Ok(removed)
    }

    /// Set a segment's length from user text, keeping its start point
    pub fn set_length(&mut self, id: SegmentId, text: &str) -> Result<()> {
        let inches = parse_length(text)
            .filter(|v| *v > 0.0)
            .ok_or_else(|| Error::InvalidLength(text.to_string()))?;
        self.set_length_inches(id, inches)
    }

    pub fn set_length_inches(&mut self, id: SegmentId, inches: f64) -> Result<()> {
        if !(inches.is_finite() && inches > 0.0) {
            return Err(Error::InvalidLength(inches.to_string()));
        }
        self.edit(|plan| {
            let seg = plan.segment_mut(id).ok_or(Error::SegmentNotFound(id))?;
            let current = seg.length();
            if current == 0.0 {
                return Err(Error::DegenerateSegment(id));
            }
            let d = seg.direction() * (inches / current);
            seg.end = seg.start.translated(d);
            Ok(())
        })
    }

    /// Rotate a segment about its start point to an absolute angle in degrees
    pub fn set_angle(&mut self, id: SegmentId, text: &str) -> Result<()> {
        let degrees = parse_angle(text).ok_or_else(|| Error::InvalidAngle(text.to_string()))?;
        self.edit(|plan| {
            let seg = plan.segment_mut(id).ok_or(Error::SegmentNotFound(id))?;
            let mut len = seg.length();
            if len == 0.0 {
                len = DEFAULT_ANGLE_LENGTH;
            }
            let rad = degrees.to_radians();
            seg.end = seg.start.translated(Vector2::new(rad.cos(), rad.sin()) * len);
            Ok(())
        })
    }

    /// Set a door/window height from length text; must be positive
    pub fn set_opening_height(&mut self, id: SegmentId, text: &str) -> Result<()> {
        let inches = parse_length(text)
            .filter(|v| *v > 0.0)
            .ok_or_else(|| Error::InvalidLength(text.to_string()))?;
        self.edit(|plan| {
            let seg = plan.segment_mut(id).ok_or(Error::SegmentNotFound(id))?;
            let opening = seg.opening_mut().ok_or(Error::NotAnOpening(id))?;
            opening.height_inches = inches;
            Ok(())
        })
    }

    /// Set a door/window sill height from length text; must not be negative
    pub fn set_base_offset(&mut self, id: SegmentId, text: &str) -> Result<()> {
        let inches = parse_length(text)
            .filter(|v| *v >= 0.0)
            .ok_or_else(|| Error::InvalidLength(text.to_string()))?;
        self.edit(|plan| {
            let seg = plan.segment_mut(id).ok_or(Error::SegmentNotFound(id))?;
            let opening = seg.opening_mut().ok_or(Error::NotAnOpening(id))?;
            opening.base_offset_inches = inches;
            Ok(())
        })
    }

    /// Flip which side of a wall its thickness goes to. Returns the new flag.
    pub fn toggle_facing(&mut self, id: SegmentId) -> Result<bool> {
        self.edit(|plan| {
            let seg = plan.segment_mut(id).ok_or(Error::SegmentNotFound(id))?;
            match &mut seg.kind {
                SegmentKind::Wall { facing_flipped } => {
                    *facing_flipped = !*facing_flipped;
                    Ok(*facing_flipped)
                }
                _ => Err(Error::NotAWall(id)),
            }
        })
    }

    /// Move a whole segment rigidly
    pub fn translate_segment(&mut self, id: SegmentId, offset: Vector2<f64>) -> Result<()> {
        self.edit(|plan| {
            let seg = plan.segment_mut(id).ok_or(Error::SegmentNotFound(id))?;
            seg.translate(offset);
            Ok(())
        })
    }

    /// Start dragging one end of a segment. Saves the single undo snapshot
    /// for the whole drag.
    pub fn begin_endpoint_drag(&mut self, id: SegmentId, end: SegmentEnd) -> Result<()> {
        let origin = self.plan.segment(id).ok_or(Error::SegmentNotFound(id))?.clone();
        self.history.push(self.plan.segments());
        self.drag = Some(DragState {
            drag: EndpointDrag { segment: id, end },
            origin,
            pushes: self.history.pushes(),
        });
        self.selected = Some(id);
        Ok(())
    }

    /// Fixed end of the segment being dragged, used as the axis-lock anchor
    pub fn drag_anchor(&self) -> Option<Point2D> {
        let drag = self.active_drag()?;
        let seg = self.plan.segment(drag.segment)?;
        Some(seg.point(drag.end.opposite()))
    }

    /// Move the dragged endpoint to an already snapped world point
    pub fn drag_endpoint_to(&mut self, point: Point2D) -> Result<()> {
        let drag = self.active_drag().ok_or(Error::NoActiveDrag)?;
        match self.plan.segment_mut(drag.segment) {
            Some(seg) => {
                seg.set_point(drag.end, point);
                Ok(())
            }
            None => {
                self.drag = None;
                Err(Error::SegmentNotFound(drag.segment))
            }
        }
    }

    /// Finish the drag. A drag that collapsed its segment to a point puts
    /// the segment back where the drag found it, and drops the drag's
    /// snapshot when nothing was pushed after it.
    pub fn end_endpoint_drag(&mut self) -> Option<EndpointDrag> {
        let state = self.drag.take()?;
        let Some(seg) = self.plan.segment_mut(state.drag.segment) else {
            return Some(state.drag);
        };
        if seg.is_degenerate() {
            seg.start = state.origin.start;
            seg.end = state.origin.end;
            if self.history.pushes() == state.pushes {
                self.history.pop();
            }
        }
        Some(state.drag)
    }

    /// Paste copies of `segments` with fresh ids, shifted by `offset`.
    ///
    /// Zero-length sources are skipped; an empty paste saves no snapshot.
    pub fn paste(
        &mut self,
        segments: &[Segment],
        offset: Vector2<f64>,
    ) -> Result<SmallVec<[SegmentId; 4]>> {
        let sources: SmallVec<[&Segment; 4]> =
            segments.iter().filter(|s| !s.is_degenerate()).collect();
        if sources.is_empty() {
            return Ok(SmallVec::new());
        }
        self.edit(|plan| {
            sources
                .iter()
                .map(|s| plan.add_segment(s.kind, s.start.translated(offset), s.end.translated(offset)))
                .collect()
        })
    }

    /// Restore the most recent snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                self.plan.restore(&snapshot);
                self.selected = None;
                self.drag = None;
                true
            }
            None => false,
        }
    }

    /// Replace the plan with an import result as one undoable step
    pub fn load(&mut self, imported: ImportedPlan) {
        self.history.push(self.plan.segments());
        self.plan = imported.plan;
        debug!(
            segments = self.plan.len(),
            next_id = self.plan.next_id(),
            "Loaded plan"
        );
        if let Some(settings) = imported.settings {
            self.set_settings(settings);
        }
        self.selected = None;
        self.drag = None;
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The authoritative segment store

use crate::error::{Error, Result};
use crate::history::PlanSnapshot;
use crate::segment::{Point2D, Segment, SegmentId, SegmentKind};

/// Ordered collection of segments with a monotonic id counter.
///
/// Iteration order is insertion order. Ids start at 1 and are never
/// reissued, even after the segment that held one is removed.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    segments: Vec<Segment>,
    next_id: u32,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl FloorPlan {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            next_id: 1,
        }
    }

    /// Build a plan from already-identified segments (import, tests).
    ///
    /// `next_id` is raised past the largest id present.
    pub fn from_segments(segments: Vec<Segment>, next_id: u32) -> Self {
        let floor = segments.iter().map(|s| s.id.0 + 1).max().unwrap_or(1);
        Self {
            segments,
            next_id: next_id.max(floor),
        }
    }

    /// Add a new segment, assigning it the next id.
    ///
    /// Zero-length segments are never committed.
    pub fn add_segment(&mut self, kind: SegmentKind, start: Point2D, end: Point2D) -> Result<SegmentId> {
        if start == end {
            return Err(Error::ZeroLengthSegment);
        }
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        self.segments.push(Segment::new(id, kind, start, end));
        Ok(id)
    }

    /// Remove a segment by id, returning it
    pub fn remove_segment(&mut self, id: SegmentId) -> Option<Segment> {
        let index = self.segments.iter().position(|s| s.id == id)?;
        Some(self.segments.remove(index))
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn walls(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_wall())
    }

    pub fn openings(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_opening())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Id the next added segment will receive
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Deep copy of the current segments
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot::capture(&self.segments)
    }

    /// Replace the segments with a snapshot's contents.
    ///
    /// The id counter only moves forward.
    pub fn restore(&mut self, snapshot: &PlanSnapshot) {
        self.segments = snapshot.to_segments();
        let floor = self.segments.iter().map(|s| s.id.0 + 1).max().unwrap_or(1);
        self.next_id = self.next_id.max(floor);
    }

    /// Remove every segment. The id counter is kept.
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded undo history of plan snapshots

use crate::segment::{Opening, Point2D, Segment, SegmentId, SegmentKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of snapshots kept; the oldest is dropped on overflow
pub const MAX_UNDO_STEPS: usize = 50;

/// Essential fields of one segment, detached from the live plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub id: SegmentId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub kind: crate::segment::ElementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<Opening>,
    #[serde(default)]
    pub facing_flipped: bool,
}

impl From<&Segment> for SegmentRecord {
    fn from(s: &Segment) -> Self {
        Self {
            id: s.id,
            x1: s.start.x,
            y1: s.start.y,
            x2: s.end.x,
            y2: s.end.y,
            kind: s.element_type(),
            opening: s.opening().copied(),
            facing_flipped: s.facing_flipped(),
        }
    }
}

impl SegmentRecord {
    /// Rebuild the live segment.
    ///
    /// `None` for a zero-length record or a door or window record without
    /// opening dimensions.
    pub fn to_segment(&self) -> Option<Segment> {
        use crate::segment::ElementType;
        let start = Point2D::new(self.x1, self.y1);
        let end = Point2D::new(self.x2, self.y2);
        if start == end {
            return None;
        }
        let kind = match self.kind {
            ElementType::Wall => SegmentKind::Wall {
                facing_flipped: self.facing_flipped,
            },
            ElementType::Door => SegmentKind::Door(self.opening?),
            ElementType::Window => SegmentKind::Window(self.opening?),
        };
        Some(Segment::new(self.id, kind, start, end))
    }
}

/// A deep copy of the segment collection at one point in time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub segments: Vec<SegmentRecord>,
}

impl PlanSnapshot {
    pub fn capture(segments: &[Segment]) -> Self {
        Self {
            segments: segments.iter().map(SegmentRecord::from).collect(),
        }
    }

    /// Live segments for every record that can be rebuilt
    pub fn to_segments(&self) -> Vec<Segment> {
        self.segments.iter().filter_map(SegmentRecord::to_segment).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Undo stack bounded to [`MAX_UNDO_STEPS`]
#[derive(Debug, Clone, Default)]
pub struct UndoHistory {
    stack: VecDeque<PlanSnapshot>,
    pushes: u64,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self {
            stack: VecDeque::with_capacity(MAX_UNDO_STEPS),
            pushes: 0,
        }
    }

    /// Save a snapshot of `segments`, dropping the oldest when full
    pub fn push(&mut self, segments: &[Segment]) {
        self.push_snapshot(PlanSnapshot::capture(segments));
    }

    pub fn push_snapshot(&mut self, snapshot: PlanSnapshot) {
        self.stack.push_back(snapshot);
        self.pushes += 1;
        while self.stack.len() > MAX_UNDO_STEPS {
            self.stack.pop_front();
        }
    }

    /// Take the most recent snapshot, if any
    pub fn pop(&mut self) -> Option<PlanSnapshot> {
        self.stack.pop_back()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Snapshots pushed over the history's lifetime. Pops and eviction
    /// do not lower it.
    pub fn pushes(&self) -> u64 {
        self.pushes
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

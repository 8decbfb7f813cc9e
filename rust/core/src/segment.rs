// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment model: walls, doors and windows drawn as 2D lines

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point in world inches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn translated(&self, offset: Vector2<f64>) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Stable segment identity. Never reused within one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u32);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Segment kind without attributes, as stored in the exchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Wall,
    Door,
    Window,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Wall => "wall",
            ElementType::Door => "door",
            ElementType::Window => "window",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wall" => Some(ElementType::Wall),
            "door" => Some(ElementType::Door),
            "window" => Some(ElementType::Window),
            _ => None,
        }
    }

    pub fn is_opening(&self) -> bool {
        !matches!(self, ElementType::Wall)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical extent of a door or window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    pub height_inches: f64,
    pub base_offset_inches: f64,
}

impl Opening {
    pub fn new(height_inches: f64, base_offset_inches: f64) -> Self {
        Self {
            height_inches,
            base_offset_inches,
        }
    }

    /// Height of the opening's head above the floor
    #[inline]
    pub fn top(&self) -> f64 {
        self.base_offset_inches + self.height_inches
    }
}

/// Kind-specific attributes of a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentKind {
    Wall { facing_flipped: bool },
    Door(Opening),
    Window(Opening),
}

impl SegmentKind {
    pub fn wall() -> Self {
        SegmentKind::Wall {
            facing_flipped: false,
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            SegmentKind::Wall { .. } => ElementType::Wall,
            SegmentKind::Door(_) => ElementType::Door,
            SegmentKind::Window(_) => ElementType::Window,
        }
    }
}

/// Which end of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentEnd {
    Start,
    End,
}

impl SegmentEnd {
    pub fn opposite(&self) -> Self {
        match self {
            SegmentEnd::Start => SegmentEnd::End,
            SegmentEnd::End => SegmentEnd::Start,
        }
    }
}

/// A wall, door or window on the plan
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub kind: SegmentKind,
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn new(id: SegmentId, kind: SegmentKind, start: Point2D, end: Point2D) -> Self {
        Self {
            id,
            kind,
            start,
            end,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.kind, SegmentKind::Wall { .. })
    }

    pub fn is_opening(&self) -> bool {
        !self.is_wall()
    }

    /// Vertical extent for doors and windows
    pub fn opening(&self) -> Option<&Opening> {
        match &self.kind {
            SegmentKind::Door(o) | SegmentKind::Window(o) => Some(o),
            SegmentKind::Wall { .. } => None,
        }
    }

    pub fn opening_mut(&mut self) -> Option<&mut Opening> {
        match &mut self.kind {
            SegmentKind::Door(o) | SegmentKind::Window(o) => Some(o),
            SegmentKind::Wall { .. } => None,
        }
    }

    /// Manual facing override; always false for openings
    pub fn facing_flipped(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::Wall {
                facing_flipped: true
            }
        )
    }

    pub fn point(&self, which: SegmentEnd) -> Point2D {
        match which {
            SegmentEnd::Start => self.start,
            SegmentEnd::End => self.end,
        }
    }

    pub fn set_point(&mut self, which: SegmentEnd, p: Point2D) {
        match which {
            SegmentEnd::Start => self.start = p,
            SegmentEnd::End => self.end = p,
        }
    }

    /// Start-to-end vector
    pub fn direction(&self) -> Vector2<f64> {
        Vector2::new(self.end.x - self.start.x, self.end.y - self.start.y)
    }

    /// Unit start-to-end vector, `None` for a zero-length segment
    pub fn unit_direction(&self) -> Option<Vector2<f64>> {
        let d = self.direction();
        let len = d.norm();
        if len > 0.0 {
            Some(d / len)
        } else {
            None
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn midpoint(&self) -> Point2D {
        Point2D::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Angle of the start-to-end direction in degrees
    pub fn angle_degrees(&self) -> f64 {
        (self.end.y - self.start.y)
            .atan2(self.end.x - self.start.x)
            .to_degrees()
    }

    pub fn translate(&mut self, offset: Vector2<f64>) {
        self.start = self.start.translated(offset);
        self.end = self.end.translated(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wall(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(
            SegmentId(1),
            SegmentKind::wall(),
            Point2D::new(x1, y1),
            Point2D::new(x2, y2),
        )
    }

    #[test]
    fn test_segment_measures() {
        let s = wall(0.0, 0.0, 30.0, 40.0);
        assert_relative_eq!(s.length(), 50.0);
        assert_eq!(s.midpoint(), Point2D::new(15.0, 20.0));
        let u = s.unit_direction().unwrap();
        assert_relative_eq!(u.x, 0.6);
        assert_relative_eq!(u.y, 0.8);
    }

    #[test]
    fn test_degenerate_has_no_direction() {
        let s = wall(5.0, 5.0, 5.0, 5.0);
        assert!(s.is_degenerate());
        assert!(s.unit_direction().is_none());
    }

    #[test]
    fn test_opening_attributes_only_on_openings() {
        let mut door = Segment::new(
            SegmentId(2),
            SegmentKind::Door(Opening::new(80.0, 0.0)),
            Point2D::new(0.0, 0.0),
            Point2D::new(36.0, 0.0),
        );
        assert!(door.is_opening());
        assert_eq!(door.opening().map(|o| o.top()), Some(80.0));
        door.opening_mut().unwrap().base_offset_inches = 2.0;
        assert_eq!(door.opening().unwrap().top(), 82.0);

        let w = wall(0.0, 0.0, 1.0, 0.0);
        assert!(w.opening().is_none());
        assert!(!w.facing_flipped());
    }

    #[test]
    fn test_element_type_names() {
        assert_eq!(ElementType::parse("window"), Some(ElementType::Window));
        assert_eq!(ElementType::parse("Window"), None);
        assert_eq!(ElementType::Door.to_string(), "door");
    }
}

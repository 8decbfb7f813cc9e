// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall-relative placement of doors and windows
//!
//! An opening belongs to the wall it lies along: its projected span must sit
//! within the wall's extent (give or take [`SPAN_TOLERANCE`]), its midpoint
//! must be within [`MAX_WALL_DISTANCE`] of the wall's line, and it must be
//! nearly parallel to the wall. The closest qualifying wall wins; on equal
//! distance the earlier wall in plan order is kept.

use crate::error::{Error, Result};
use crate::primitives::{distance_to_line, project_onto};
use nalgebra::Vector2;
use plan_lite_core::units::parse_length;
use plan_lite_core::{PlanEditor, Segment, SegmentId};
use rustc_hash::FxHashMap;

/// Allowed overhang of an opening past either wall end (inches)
pub const SPAN_TOLERANCE: f64 = 5.0;

/// Largest midpoint-to-wall-line distance for an opening on a wall (inches)
pub const MAX_WALL_DISTANCE: f64 = 10.0;

/// Minimum |cos| of the angle between opening and wall
pub const MIN_PARALLEL_DOT: f64 = 0.9;

/// Interval an opening covers along a wall, measured from the wall's start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSpan {
    pub t_start: f64,
    pub t_end: f64,
}

impl WallSpan {
    pub fn width(&self) -> f64 {
        self.t_end - self.t_start
    }

    pub fn center(&self) -> f64 {
        (self.t_start + self.t_end) / 2.0
    }
}

/// An opening's position on its parent wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPlacement {
    pub wall: SegmentId,
    pub wall_length: f64,
    /// Clear distance from the wall's start to the opening
    pub from_start: f64,
    /// Clear distance from the opening to the wall's end
    pub from_end: f64,
    pub span: WallSpan,
    /// Midpoint distance from the wall's line
    pub distance: f64,
}

/// Span and distance when `opening` qualifies for `wall`
fn fit(opening: &Segment, wall: &Segment) -> Option<(WallSpan, f64)> {
    if !wall.is_wall() || !opening.is_opening() {
        return None;
    }
    let u = wall.unit_direction()?;
    let ou = opening.unit_direction()?;
    let wall_length = wall.length();

    let t1 = project_onto(&opening.start, &wall.start, &u);
    let t2 = project_onto(&opening.end, &wall.start, &u);
    let span = WallSpan {
        t_start: t1.min(t2),
        t_end: t1.max(t2),
    };
    if span.t_start < -SPAN_TOLERANCE || span.t_end > wall_length + SPAN_TOLERANCE {
        return None;
    }

    let distance = distance_to_line(&opening.midpoint(), &wall.start, &u);
    if distance > MAX_WALL_DISTANCE {
        return None;
    }

    if ou.dot(&u).abs() <= MIN_PARALLEL_DOT {
        return None;
    }

    Some((span, distance))
}

/// Whether `opening` passes the span, distance and parallelism tests for `wall`
pub fn opening_fits_wall(opening: &Segment, wall: &Segment) -> bool {
    fit(opening, wall).is_some()
}

/// Find the wall a door or window sits in.
///
/// Returns `None` for walls, degenerate openings, and openings no wall
/// qualifies for.
pub fn resolve_parent_wall(opening: &Segment, segments: &[Segment]) -> Option<WallPlacement> {
    let mut best: Option<(&Segment, WallSpan, f64)> = None;
    for wall in segments.iter().filter(|s| s.is_wall()) {
        if let Some((span, distance)) = fit(opening, wall) {
            if best.map_or(true, |(_, _, d)| distance < d) {
                best = Some((wall, span, distance));
            }
        }
    }

    let (wall, span, distance) = best?;
    let wall_length = wall.length();
    Some(WallPlacement {
        wall: wall.id,
        wall_length,
        from_start: span.t_start.max(0.0),
        from_end: (wall_length - span.t_end).max(0.0),
        span,
        distance,
    })
}

/// An opening hosted by a wall
#[derive(Debug, Clone, Copy)]
pub struct HostedOpening<'a> {
    pub opening: &'a Segment,
    pub span: WallSpan,
}

/// Openings that fit `wall`, sorted by their start along it.
///
/// Every qualifying opening is listed, not only those whose parent is
/// `wall`; an opening between two close parallel walls cuts both.
pub fn openings_on_wall<'a>(wall: &Segment, segments: &'a [Segment]) -> Vec<HostedOpening<'a>> {
    let mut hosted: Vec<HostedOpening<'a>> = segments
        .iter()
        .filter(|s| s.is_opening())
        .filter_map(|opening| {
            let (span, _) = fit(opening, wall)?;
            Some(HostedOpening { opening, span })
        })
        .collect();
    hosted.sort_by(|a, b| a.span.t_start.total_cmp(&b.span.t_start));
    hosted
}

/// [`openings_on_wall`] for every wall that hosts at least one opening
pub fn assign_openings(segments: &[Segment]) -> FxHashMap<SegmentId, Vec<HostedOpening<'_>>> {
    segments
        .iter()
        .filter(|s| s.is_wall())
        .filter_map(|wall| {
            let hosted = openings_on_wall(wall, segments);
            (!hosted.is_empty()).then_some((wall.id, hosted))
        })
        .collect()
}

/// Parent wall placement and wall unit direction for an opening in the editor
fn placement_in(editor: &PlanEditor, id: SegmentId) -> Result<(WallPlacement, Vector2<f64>)> {
    let segments = editor.plan().segments();
    let opening = editor.plan().segment(id).ok_or(Error::SegmentNotFound(id))?;
    if !opening.is_opening() {
        return Err(plan_lite_core::Error::NotAnOpening(id).into());
    }
    let placement = resolve_parent_wall(opening, segments).ok_or(Error::NoParentWall(id))?;
    let u = editor
        .plan()
        .segment(placement.wall)
        .and_then(Segment::unit_direction)
        .ok_or(Error::NoParentWall(id))?;
    Ok((placement, u))
}

fn parse_offset(text: &str) -> Result<f64> {
    parse_length(text)
        .filter(|v| *v >= 0.0)
        .ok_or_else(|| plan_lite_core::Error::InvalidLength(text.to_string()).into())
}

/// Slide an opening along its wall so it starts `inches` from the wall start
pub fn set_offset_from_start_inches(editor: &mut PlanEditor, id: SegmentId, inches: f64) -> Result<()> {
    if !(inches.is_finite() && inches >= 0.0) {
        return Err(Error::InvalidOffset(inches.to_string()));
    }
    let (placement, u) = placement_in(editor, id)?;
    let delta = inches - placement.from_start;
    editor.translate_segment(id, u * delta)?;
    Ok(())
}

/// Slide an opening along its wall so it ends `inches` from the wall end
pub fn set_offset_from_end_inches(editor: &mut PlanEditor, id: SegmentId, inches: f64) -> Result<()> {
    if !(inches.is_finite() && inches >= 0.0) {
        return Err(Error::InvalidOffset(inches.to_string()));
    }
    let (placement, u) = placement_in(editor, id)?;
    let delta = inches - placement.from_end;
    editor.translate_segment(id, -u * delta)?;
    Ok(())
}

/// [`set_offset_from_start_inches`] from length text
pub fn set_offset_from_start(editor: &mut PlanEditor, id: SegmentId, text: &str) -> Result<()> {
    let inches = parse_offset(text)?;
    set_offset_from_start_inches(editor, id, inches)
}

/// [`set_offset_from_end_inches`] from length text
pub fn set_offset_from_end(editor: &mut PlanEditor, id: SegmentId, text: &str) -> Result<()> {
    let inches = parse_offset(text)?;
    set_offset_from_end_inches(editor, id, inches)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for floor plan editing and exchange.

use crate::segment::SegmentId;
use thiserror::Error;

/// Result type for floor plan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing, importing or exporting a floor plan
#[derive(Error, Debug)]
pub enum Error {
    #[error("Couldn't understand length '{0}'")]
    InvalidLength(String),

    #[error("Couldn't understand angle '{0}'")]
    InvalidAngle(String),

    #[error("Segment {0} not found")]
    SegmentNotFound(SegmentId),

    #[error("Segment {0} is not a door or window")]
    NotAnOpening(SegmentId),

    #[error("Segment {0} is not a wall")]
    NotAWall(SegmentId),

    #[error("Segment {0} has zero length")]
    DegenerateSegment(SegmentId),

    #[error("Segment would have zero length")]
    ZeroLengthSegment,

    #[error("No endpoint drag in progress")]
    NoActiveDrag,

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

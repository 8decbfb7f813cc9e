// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use plan_lite_core::SegmentId;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry-driven edits
#[derive(Error, Debug)]
pub enum Error {
    #[error("No parent wall found for opening {0}")]
    NoParentWall(SegmentId),

    #[error("Segment {0} not found")]
    SegmentNotFound(SegmentId),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Plan error: {0}")]
    Core(#[from] plan_lite_core::Error),
}

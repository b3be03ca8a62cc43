// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors reported by [`XkdTree`](crate::XkdTree).
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum XkdError {
    /// Leaves must be able to hold at least one value.
    #[error("bucket size must be at least 1")]
    InvalidBucketSize,
    /// The point lies outside the tree's fixed bounds.
    #[error("point ({x}, {y}) lies outside the index bounds")]
    OutOfBounds {
        /// X coordinate of the rejected point.
        x: f64,
        /// Y coordinate of the rejected point.
        y: f64,
    },
    /// No value is stored at the point.
    #[error("no value stored at ({x}, {y})")]
    NotFound {
        /// X coordinate of the missing point.
        x: f64,
        /// Y coordinate of the missing point.
        y: f64,
    },
}

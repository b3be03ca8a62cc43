// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;
use understory_xkd::XkdError;

/// Errors reported by [`KCapFL`](crate::KCapFL).
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum KCapError {
    /// Clusters must hold at least one point.
    #[error("cluster capacity must be at least 1")]
    InvalidCapacity,
    /// The point set cannot be split into clusters of exactly `capacity` points.
    #[error("point count {len} is not a positive multiple of the capacity {capacity}")]
    InvalidSize {
        /// Number of points offered to the build.
        len: usize,
        /// Configured cluster capacity.
        capacity: usize,
    },
    /// The underlying index rejected the request.
    #[error(transparent)]
    Index(#[from] XkdError),
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Construction parameters for [`KCapFL`](crate::KCapFL).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KCapParams {
    /// Number of points in every cluster. Must be at least 1.
    pub capacity: usize,
    /// Leaf bucket size of the backing kd-tree. Must be at least 1.
    ///
    /// Small buckets give deeper trees with tighter cells; larger buckets trade
    /// pruning for fewer nodes.
    pub bucket_size: usize,
    /// Region every point must lie in (edges included).
    pub bounds: Rect,
}

impl Default for KCapParams {
    fn default() -> Self {
        Self {
            capacity: 2,
            bucket_size: 3,
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
        }
    }
}

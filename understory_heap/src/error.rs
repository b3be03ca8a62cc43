// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors reported by [`LeftistHeap`](crate::LeftistHeap).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum HeapError {
    /// Tried to extract from a heap with no entries.
    #[error("extract-min on an empty heap")]
    Empty,
}

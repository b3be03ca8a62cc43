// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_heap --heading-base-level=0

//! Understory Heap: priority structures for greedy spatial algorithms.
//!
//! - [`LeftistHeap`]: a meldable min-heap over key/value pairs. Insert, extract-min and
//!   melding two heaps are `O(log n)`; it also supports splitting off every entry above a key.
//! - [`MinK`]: a bounded selector that keeps the `k` smallest keys offered to it. It backs the
//!   k-nearest-neighbor queries of `understory_xkd`, where its current `k`-th key is the pruning
//!   bound.
//!
//! Both are generic over a [`PartialOrd`] key so `f64` squared distances can be used directly.
//! Keys are assumed to be totally ordered in practice (no NaNs). Debug builds may assert.
//!
//! # Example
//!
//! ```rust
//! use understory_heap::{HeapError, LeftistHeap, MinK};
//!
//! // Keep the two closest labels.
//! let mut closest = MinK::new(2, f64::MAX);
//! for (d2, label) in [(4.0, "d"), (1.0, "a"), (9.0, "z"), (2.0, "b")] {
//!     closest.add(d2, label);
//! }
//! let cluster = closest.into_sorted_vec();
//! assert_eq!(cluster, ["a", "b"]);
//!
//! // Queue it by radius.
//! let mut queue = LeftistHeap::new();
//! queue.insert(2.0, cluster);
//! assert_eq!(queue.extract_min(), Ok(vec!["a", "b"]));
//! assert_eq!(queue.extract_min(), Err(HeapError::Empty));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod leftist;
mod min_k;

pub use error::HeapError;
pub use leftist::LeftistHeap;
pub use min_k::MinK;

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_kcap --heading-base-level=0

//! Understory KCap: greedy k-capacitated facility location.
//!
//! Given `n` points and a capacity `k` dividing `n`, [`KCapFL`] partitions the points into `n / k`
//! disjoint clusters of exactly `k` points, preferring clusters that fit in a small radius.
//!
//! It composes the other Understory spatial building blocks:
//! - [`understory_xkd::XkdTree`] holds the points that are still unassigned and answers
//!   k-nearest-neighbor queries.
//! - [`understory_heap::LeftistHeap`] queues candidate clusters by squared radius.
//!
//! ## How extraction works
//!
//! [`KCapFL::build`] computes, for every point, the cluster formed by its `k` nearest neighbors
//! (itself included) and queues it under the squared distance to the farthest member.
//! [`KCapFL::extract_cluster`] then repeatedly takes the smallest queued candidate:
//! - if all of its members are still unassigned, they are removed from the tree and returned;
//! - otherwise the candidate is stale. If its anchor point is still unassigned, a fresh candidate
//!   is computed for it and queued; either way the next smallest candidate is tried.
//!
//! Recomputation only happens for anchors whose stale candidate reaches the front of the queue,
//! so points are never re-queried eagerly when a neighbor is claimed.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_kcap::{KCapError, KCapFL};
//! use understory_xkd::LabeledPoint;
//!
//! let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 20.0, 20.0))?;
//! kcap.build([
//!     LabeledPoint::new('A', 0.0, 0.0),
//!     LabeledPoint::new('B', 1.0, 0.0),
//!     LabeledPoint::new('C', 10.0, 10.0),
//!     LabeledPoint::new('D', 11.0, 10.0),
//! ])?;
//!
//! let mut clusters: Vec<Vec<char>> = kcap
//!     .drain_clusters()
//!     .map(|c| {
//!         let mut labels: Vec<char> = c.iter().map(|p| p.label).collect();
//!         labels.sort();
//!         labels
//!     })
//!     .collect();
//! clusters.sort();
//! assert_eq!(clusters, [vec!['A', 'B'], vec!['C', 'D']]);
//!
//! // Three points cannot be split into pairs.
//! assert!(matches!(
//!     kcap.build([LabeledPoint::new('E', 1.0, 1.0)].repeat(3)),
//!     Err(KCapError::InvalidSize { len: 3, capacity: 2 })
//! ));
//! # Ok::<(), KCapError>(())
//! ```
//!
//! Parameters can also be grouped in a [`KCapParams`] and passed to [`KCapFL::with_params`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod kcap;
mod params;

pub use error::KCapError;
pub use kcap::KCapFL;
pub use params::KCapParams;

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_xkd --heading-base-level=0

//! Understory Xkd: an extended (bucketed) kd-tree over a fixed 2D region.
//!
//! - Bulk-load or insert labeled points; insertions outside the region are rejected.
//! - Exact point lookup, nearest-neighbor and k-nearest-neighbor queries with cell pruning.
//! - Delete a point; leaves that empty out are collapsed into their sibling.
//! - A deterministic [`XkdTree::debug_dump`] of the tree shape for tests and diagnostics.
//!
//! Points and rectangles are [`kurbo`] types. Stored values implement [`Labeled`], which exposes
//! the value's location and a label used only for ordering and display; [`LabeledPoint`] is the
//! ready-made implementation.
//!
//! k-nearest-neighbor queries are driven by [`understory_heap::MinK`]: a subtree is skipped as
//! soon as its cell is farther from the query than the current `k`-th best distance.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_xkd::{LabeledPoint, XkdError, XkdTree};
//!
//! let mut tree = XkdTree::new(3, Rect::new(0.0, 0.0, 10.0, 10.0))?;
//! tree.bulk_insert((0..8_u32).map(|i| LabeledPoint::new(i, f64::from(i), 2.0)))?;
//!
//! let nearest = tree.nearest_neighbor(Point::new(4.2, 9.0)).map(|p| p.label);
//! assert_eq!(nearest, Some(4));
//!
//! assert_eq!(
//!     tree.insert(LabeledPoint::new(99, 11.0, 5.0)),
//!     Err(XkdError::OutOfBounds { x: 11.0, y: 5.0 })
//! );
//! assert_eq!(
//!     tree.delete(Point::new(0.5, 2.0)).err(),
//!     Some(XkdError::NotFound { x: 0.5, y: 2.0 })
//! );
//! # Ok::<(), XkdError>(())
//! ```
//!
//! ## Float semantics
//!
//! Coordinates are assumed finite (no NaNs). Lookups and deletes match on exact coordinate
//! equality.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod geom;
mod tree;
mod types;

pub use error::XkdError;
pub use geom::Axis;
pub use tree::XkdTree;
pub use types::{Labeled, LabeledPoint};

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extended kd-tree: structure, bulk insertion, queries and deletion.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::mem;

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use understory_heap::MinK;

use crate::error::XkdError;
use crate::geom::{Axis, bounds_of, contains_closed, min_distance_squared, split_at, width_along};
use crate::types::Labeled;

type Bucket<P> = SmallVec<[P; 4]>;

#[derive(Clone, Debug)]
enum Node<P> {
    /// Unordered bucket of at most `bucket_size` values.
    Leaf(Bucket<P>),
    /// Values with `coord <= cut` live on the left, `coord >= cut` on the right.
    Internal {
        axis: Axis,
        cut: f64,
        left: Box<Node<P>>,
        right: Box<Node<P>>,
    },
}

impl<P> Node<P> {
    fn empty() -> Self {
        Self::Leaf(SmallVec::new())
    }

    fn is_empty_leaf(&self) -> bool {
        matches!(self, Self::Leaf(bucket) if bucket.is_empty())
    }
}

impl<P: Labeled> Node<P> {
    fn insert_batch(&mut self, batch: Vec<P>, bucket_size: usize) {
        match self {
            Self::Internal {
                axis,
                cut,
                left,
                right,
            } => {
                let (lo, hi): (Vec<P>, Vec<P>) =
                    batch.into_iter().partition(|p| axis.coord(p.point()) < *cut);
                if !lo.is_empty() {
                    left.insert_batch(lo, bucket_size);
                }
                if !hi.is_empty() {
                    right.insert_batch(hi, bucket_size);
                }
            }
            Self::Leaf(bucket) => {
                bucket.extend(batch);
                if bucket.len() > bucket_size {
                    let points = mem::take(bucket).into_vec();
                    *self = Self::split_bucket(points, bucket_size);
                }
            }
        }
    }

    /// Turn an overfull bucket into an internal node over two new leaves.
    ///
    /// The cut is made across the wider extent of the bucket, at the median
    /// (the mean of the two middle values for an even count).
    fn split_bucket(mut points: Vec<P>, bucket_size: usize) -> Self {
        let axis = match bounds_of(points.iter().map(Labeled::point)) {
            Some(b) if width_along(b, Axis::X) < width_along(b, Axis::Y) => Axis::Y,
            _ => Axis::X,
        };
        points.sort_by(|a, b| axis.cmp_points(a.point(), b.point()));

        let m = points.len() / 2;
        let cut = if points.len() % 2 == 0 {
            (axis.coord(points[m - 1].point()) + axis.coord(points[m].point())) / 2.0
        } else {
            axis.coord(points[m].point())
        };
        let upper = points.split_off(m);
        tracing::trace!(%axis, cut, left = points.len(), right = upper.len(), "xkd bucket split");

        let mut left = Self::empty();
        left.insert_batch(points, bucket_size);
        let mut right = Self::empty();
        right.insert_batch(upper, bucket_size);
        Self::Internal {
            axis,
            cut,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn find(&self, q: Point) -> Option<&P> {
        match self {
            Self::Leaf(bucket) => bucket.iter().find(|p| p.point() == q),
            Self::Internal {
                axis,
                cut,
                left,
                right,
            } => {
                let c = axis.coord(q);
                if c < *cut {
                    left.find(q)
                } else if c > *cut {
                    right.find(q)
                } else {
                    left.find(q).or_else(|| right.find(q))
                }
            }
        }
    }

    fn count(&self, q: Point) -> usize {
        match self {
            Self::Leaf(bucket) => bucket.iter().filter(|p| p.point() == q).count(),
            Self::Internal {
                axis,
                cut,
                left,
                right,
            } => {
                let c = axis.coord(q);
                let lo = if c <= *cut { left.count(q) } else { 0 };
                let hi = if c >= *cut { right.count(q) } else { 0 };
                lo + hi
            }
        }
    }

    /// Remove one value located at `q`, collapsing this node onto the
    /// surviving sibling when a child leaf empties.
    fn remove(&mut self, q: Point) -> Option<P> {
        let (removed, survivor) = match self {
            Self::Leaf(bucket) => {
                let at = bucket.iter().position(|p| p.point() == q)?;
                return Some(bucket.swap_remove(at));
            }
            Self::Internal {
                axis,
                cut,
                left,
                right,
            } => {
                let c = axis.coord(q);
                let from_left = if c <= *cut { left.remove(q) } else { None };
                let (removed, emptied, sibling) = match from_left {
                    Some(p) => (p, left.is_empty_leaf(), right),
                    None if c >= *cut => (right.remove(q)?, right.is_empty_leaf(), left),
                    None => return None,
                };
                (removed, emptied.then(|| mem::replace(&mut **sibling, Self::empty())))
            }
        };
        if let Some(sibling) = survivor {
            *self = sibling;
        }
        Some(removed)
    }

    fn nearest<'a>(&'a self, q: Point, cell: Rect, best: &mut Option<(&'a P, f64)>) {
        match self {
            Self::Leaf(bucket) => {
                for p in bucket {
                    let d2 = q.distance_squared(p.point());
                    if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
                        *best = Some((p, d2));
                    }
                }
            }
            Self::Internal {
                axis,
                cut,
                left,
                right,
            } => {
                let (lo_cell, hi_cell) = split_at(cell, *axis, *cut);
                let ((near, near_cell), (far, far_cell)) = if axis.coord(q) < *cut {
                    ((left, lo_cell), (right, hi_cell))
                } else {
                    ((right, hi_cell), (left, lo_cell))
                };
                near.nearest(q, near_cell, best);
                let bound = best.map_or(f64::INFINITY, |(_, d2)| d2);
                if min_distance_squared(far_cell, q) < bound {
                    far.nearest(q, far_cell, best);
                }
            }
        }
    }

    fn k_nearest<'a>(&'a self, q: Point, cell: Rect, acc: &mut MinK<f64, &'a P>) {
        match self {
            Self::Leaf(bucket) => {
                for p in bucket {
                    acc.add(q.distance_squared(p.point()), p);
                }
            }
            Self::Internal {
                axis,
                cut,
                left,
                right,
            } => {
                if min_distance_squared(cell, q) > *acc.kth_key() {
                    return;
                }
                let (lo_cell, hi_cell) = split_at(cell, *axis, *cut);
                if axis.coord(q) < *cut {
                    left.k_nearest(q, lo_cell, acc);
                    right.k_nearest(q, hi_cell, acc);
                } else {
                    right.k_nearest(q, hi_cell, acc);
                    left.k_nearest(q, lo_cell, acc);
                }
            }
        }
    }
}

/// Extended kd-tree over a fixed rectangular region.
///
/// Values live in leaf buckets of at most `bucket_size` entries. When a bucket
/// overflows it is replaced by an internal node cutting across the wider extent
/// of its contents at the median, so bulk loads produce a balanced tree.
/// Deleting the last value of a leaf collapses its parent onto the sibling
/// subtree. There is no other rebalancing.
///
/// Values are matched by exact coordinate equality of [`Labeled::point`].
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_xkd::{LabeledPoint, XkdTree};
///
/// let mut tree = XkdTree::new(2, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
/// tree.bulk_insert([
///     LabeledPoint::new("a", 1.0, 1.0),
///     LabeledPoint::new("b", 2.0, 8.0),
///     LabeledPoint::new("c", 6.0, 3.0),
///     LabeledPoint::new("d", 9.0, 9.0),
/// ])
/// .unwrap();
///
/// assert_eq!(tree.find(Point::new(6.0, 3.0)).map(|p| p.label), Some("c"));
/// let near: Vec<_> = tree
///     .k_nearest_neighbor(Point::new(0.0, 0.0), 2)
///     .into_iter()
///     .map(|p| p.label)
///     .collect();
/// assert_eq!(near, ["a", "c"]);
///
/// tree.delete(Point::new(1.0, 1.0)).unwrap();
/// assert_eq!(tree.len(), 3);
/// assert!(tree.insert(LabeledPoint::new("e", 11.0, 5.0)).is_err());
/// ```
#[derive(Clone)]
pub struct XkdTree<P> {
    root: Node<P>,
    len: usize,
    bucket_size: usize,
    bounds: Rect,
}

impl<P> Debug for XkdTree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XkdTree")
            .field("len", &self.len)
            .field("bucket_size", &self.bucket_size)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl<P> XkdTree<P> {
    /// Create an empty tree accepting points inside `bounds` (edges included).
    ///
    /// Fails with [`XkdError::InvalidBucketSize`] when `bucket_size` is zero.
    pub fn new(bucket_size: usize, bounds: Rect) -> Result<Self, XkdError> {
        if bucket_size == 0 {
            return Err(XkdError::InvalidBucketSize);
        }
        Ok(Self {
            root: Node::empty(),
            len: 0,
            bucket_size,
            bounds: bounds.abs(),
        })
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of values per leaf.
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// The fixed region accepted by insertions.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Reset to a single empty leaf. The bounds and bucket size are kept.
    pub fn clear(&mut self) {
        self.root = Node::empty();
        self.len = 0;
    }
}

impl<P: Labeled> XkdTree<P> {
    /// Insert a single value.
    pub fn insert(&mut self, value: P) -> Result<(), XkdError> {
        self.bulk_insert([value])
    }

    /// Insert a batch of values.
    ///
    /// Every point is checked against the bounds before anything is inserted,
    /// so a failing call leaves the tree unchanged.
    pub fn bulk_insert(&mut self, values: impl IntoIterator<Item = P>) -> Result<(), XkdError> {
        let batch: Vec<P> = values.into_iter().collect();
        if let Some(p) = batch.iter().map(Labeled::point).find(|&p| !contains_closed(self.bounds, p)) {
            return Err(XkdError::OutOfBounds { x: p.x, y: p.y });
        }
        if batch.is_empty() {
            return Ok(());
        }
        self.len += batch.len();
        self.root.insert_batch(batch, self.bucket_size);
        Ok(())
    }

    /// The stored value located exactly at `q`, if any.
    pub fn find(&self, q: Point) -> Option<&P> {
        self.root.find(q)
    }

    /// Whether a value is stored exactly at `q`.
    pub fn contains(&self, q: Point) -> bool {
        self.find(q).is_some()
    }

    /// Number of stored values located exactly at `q`.
    pub fn count(&self, q: Point) -> usize {
        self.root.count(q)
    }

    /// Remove and return the value located exactly at `q`.
    ///
    /// When several values share the location only one is removed.
    pub fn delete(&mut self, q: Point) -> Result<P, XkdError> {
        let removed = self
            .root
            .remove(q)
            .ok_or(XkdError::NotFound { x: q.x, y: q.y })?;
        self.len -= 1;
        Ok(removed)
    }

    /// The stored value closest to `q`, or `None` when empty.
    pub fn nearest_neighbor(&self, q: Point) -> Option<&P> {
        let mut best = None;
        self.root.nearest(q, self.bounds, &mut best);
        best.map(|(p, _)| p)
    }

    /// The `k` stored values closest to `q`, nearest first.
    ///
    /// Fewer than `k` values are returned only when the tree holds fewer than
    /// `k`. Values at equal distance come out in an unspecified order.
    pub fn k_nearest_neighbor(&self, q: Point, k: usize) -> Vec<&P> {
        if k == 0 || self.is_empty() {
            return Vec::new();
        }
        let mut acc = MinK::new(k, f64::MAX);
        self.root.k_nearest(q, self.bounds, &mut acc);
        acc.into_sorted_vec()
    }

    /// Textual dump of the tree shape.
    ///
    /// Preorder, right subtree before left. Internal nodes render as
    /// `(x=<cut>)` or `(y=<cut>)`; leaves as `[ {<label>: (<x>, <y>)} ... ]`
    /// with entries ordered by label, or `[ ]` when empty.
    pub fn debug_dump(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Internal {
                    axis,
                    cut,
                    left,
                    right,
                } => {
                    out.push(format!("({axis}={cut})"));
                    stack.push(left);
                    stack.push(right);
                }
                Node::Leaf(bucket) => {
                    let mut entries: Vec<&P> = bucket.iter().collect();
                    entries.sort_by(|a, b| a.label().cmp(b.label()));
                    let mut line = String::from("[");
                    for p in entries {
                        let pt = p.point();
                        line.push_str(&format!(" {{{}: ({}, {})}}", p.label(), pt.x, pt.y));
                    }
                    line.push_str(" ]");
                    out.push(line);
                }
            }
        }
        out
    }
}

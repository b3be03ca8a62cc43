// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values stored in the tree: a point plus a display label.

use core::fmt::{self, Debug, Display};

use kurbo::Point;

/// A value with a 2D location and a label.
///
/// The tree routes and matches values by [`point`][Labeled::point] alone; the
/// label only orders entries in [`XkdTree::debug_dump`][crate::XkdTree::debug_dump]
/// and identifies them in output. Labels are expected to be unique but this
/// is not enforced.
pub trait Labeled {
    /// Label type, ordered for deterministic dumps.
    type Label: Ord + Display;

    /// Location of this value.
    fn point(&self) -> Point;

    /// Label of this value.
    fn label(&self) -> &Self::Label;
}

/// A [`Point`] paired with a label.
#[derive(Clone, Copy, PartialEq)]
pub struct LabeledPoint<L> {
    /// The label.
    pub label: L,
    /// The location.
    pub point: Point,
}

impl<L> LabeledPoint<L> {
    /// Create a labeled point at `(x, y)`.
    #[inline]
    pub const fn new(label: L, x: f64, y: f64) -> Self {
        Self {
            label,
            point: Point::new(x, y),
        }
    }
}

impl<L: Ord + Display> Labeled for LabeledPoint<L> {
    type Label = L;

    #[inline]
    fn point(&self) -> Point {
        self.point
    }

    #[inline]
    fn label(&self) -> &L {
        &self.label
    }
}

impl<L: Display> Display for LabeledPoint<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ({}, {})", self.label, self.point.x, self.point.y)
    }
}

impl<L: Display> Debug for LabeledPoint<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

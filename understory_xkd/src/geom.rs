// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis selection and the closed-rectangle helpers used for cells.

use core::cmp::Ordering;
use core::fmt;

use kurbo::{Point, Rect};

/// Cutting dimension of an internal node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Split on the x coordinate.
    X,
    /// Split on the y coordinate.
    Y,
}

impl Axis {
    /// The coordinate of `p` along this axis.
    #[inline]
    pub fn coord(self, p: Point) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }

    /// Order points along this axis, breaking ties on the other one.
    pub(crate) fn cmp_points(self, a: Point, b: Point) -> Ordering {
        let (a0, a1, b0, b1) = match self {
            Self::X => (a.x, a.y, b.x, b.y),
            Self::Y => (a.y, a.x, b.y, b.x),
        };
        a0.total_cmp(&b0).then(a1.total_cmp(&b1))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

/// Containment with all four edges included (`Rect::contains` is half-open).
#[inline]
pub(crate) fn contains_closed(r: Rect, p: Point) -> bool {
    r.x0 <= p.x && p.x <= r.x1 && r.y0 <= p.y && p.y <= r.y1
}

#[inline]
pub(crate) fn width_along(r: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::X => r.x1 - r.x0,
        Axis::Y => r.y1 - r.y0,
    }
}

/// Squared distance from `p` to the nearest point of `r`; zero inside.
#[inline]
pub(crate) fn min_distance_squared(r: Rect, p: Point) -> f64 {
    let dx = (r.x0 - p.x).max(0.0).max(p.x - r.x1);
    let dy = (r.y0 - p.y).max(0.0).max(p.y - r.y1);
    dx * dx + dy * dy
}

/// Cut `r` at `value` along `axis` into its lower and upper halves.
pub(crate) fn split_at(r: Rect, axis: Axis, value: f64) -> (Rect, Rect) {
    match axis {
        Axis::X => (
            Rect::new(r.x0, r.y0, value, r.y1),
            Rect::new(value, r.y0, r.x1, r.y1),
        ),
        Axis::Y => (
            Rect::new(r.x0, r.y0, r.x1, value),
            Rect::new(r.x0, value, r.x1, r.y1),
        ),
    }
}

/// Smallest rectangle containing every point, or `None` for no points.
pub(crate) fn bounds_of(mut points: impl Iterator<Item = Point>) -> Option<Rect> {
    let first = points.next()?;
    Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
}

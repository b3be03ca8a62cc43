// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy cluster extraction over a kd-tree and a leftist heap of candidates.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Debug};

use kurbo::{Point, Rect};
use understory_heap::LeftistHeap;
use understory_xkd::{Labeled, XkdTree};

use crate::error::KCapError;
use crate::params::KCapParams;

/// k-capacitated facility locator.
///
/// Partitions a point set into clusters of exactly `capacity` points. Every
/// point seeds one candidate cluster: itself plus its `capacity - 1` nearest
/// neighbors, keyed by the squared distance to the farthest of them. Clusters
/// are then committed greedily, smallest radius first.
///
/// Candidates are invalidated lazily. When the smallest candidate has lost a
/// member to an earlier cluster, it is discarded; if its anchor (first member)
/// is still unclaimed, a fresh candidate is computed for that anchor against
/// the points that remain and queued again.
///
/// Points are identified by location. Several points may share a location; a
/// candidate is valid only while the index still holds at least as many
/// points at each location as the candidate has members there. Committed
/// clusters carry the values removed from the index, so two points at the
/// same location may come out in either cluster.
///
/// Calling [`build`][Self::build] again replaces every point and candidate
/// left over from the previous build; no [`clear`][Self::clear] is needed.
///
/// The result is a greedy approximation, not an optimal partition. Candidates
/// with equal radius are taken in heap order, which is unspecified.
pub struct KCapFL<P> {
    capacity: usize,
    index: XkdTree<P>,
    candidates: LeftistHeap<f64, Vec<P>>,
}

impl<P> Debug for KCapFL<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KCapFL")
            .field("capacity", &self.capacity)
            .field("remaining", &self.index.len())
            .field("index", &self.index)
            .field("next_radius", &self.candidates.peek_min_key())
            .finish_non_exhaustive()
    }
}

impl<P> KCapFL<P> {
    /// Create an empty locator.
    ///
    /// Shorthand for [`KCapFL::with_params`].
    pub fn new(capacity: usize, bucket_size: usize, bounds: Rect) -> Result<Self, KCapError> {
        Self::with_params(KCapParams {
            capacity,
            bucket_size,
            bounds,
        })
    }

    /// Create an empty locator from a parameter set.
    pub fn with_params(params: KCapParams) -> Result<Self, KCapError> {
        if params.capacity == 0 {
            return Err(KCapError::InvalidCapacity);
        }
        Ok(Self {
            capacity: params.capacity,
            index: XkdTree::new(params.bucket_size, params.bounds)?,
            candidates: LeftistHeap::new(),
        })
    }

    /// Points per cluster.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of points not yet assigned to a cluster.
    pub fn remaining(&self) -> usize {
        self.index.len()
    }

    /// Drop every point and pending candidate.
    pub fn clear(&mut self) {
        self.index.clear();
        self.candidates.clear();
    }
}

impl<P: Labeled + Clone> KCapFL<P> {
    /// Load a point set and seed one candidate cluster per point.
    ///
    /// On success, points and candidates from an earlier build are replaced.
    /// Fails with [`KCapError::InvalidSize`] unless the number of points is a
    /// positive multiple of the capacity, and with an index error if any point
    /// lies outside the bounds. The previous state is kept on failure.
    pub fn build(&mut self, points: impl IntoIterator<Item = P>) -> Result<(), KCapError> {
        let points: Vec<P> = points.into_iter().collect();
        if points.is_empty() || points.len() % self.capacity != 0 {
            return Err(KCapError::InvalidSize {
                len: points.len(),
                capacity: self.capacity,
            });
        }
        let anchors: Vec<Point> = points.iter().map(Labeled::point).collect();
        let mut index = XkdTree::new(self.index.bucket_size(), self.index.bounds())?;
        index.bulk_insert(points)?;
        self.index = index;
        self.candidates.clear();
        for &anchor in &anchors {
            let (radius, members) = self.candidate_for(anchor);
            self.candidates.insert(radius, members);
        }
        tracing::debug!(
            points = anchors.len(),
            capacity = self.capacity,
            bucket_size = self.index.bucket_size(),
            "kcap candidates seeded"
        );
        Ok(())
    }

    /// Commit and return the next cluster, or `None` once every point has
    /// been assigned.
    ///
    /// # Panics
    ///
    /// Panics if the candidate queue runs dry while unassigned points remain.
    /// Every unassigned point always has a queued candidate, so this indicates
    /// a bookkeeping bug rather than bad input.
    pub fn extract_cluster(&mut self) -> Option<Vec<P>> {
        loop {
            if self.index.is_empty() {
                self.candidates.clear();
                return None;
            }
            let radius = self.candidates.peek_min_key().copied();
            let members = self
                .candidates
                .extract_min()
                .expect("kcap invariant violated: candidate queue drained while points remain");

            if self.is_available(&members) {
                let cluster: Vec<P> = members
                    .iter()
                    .map(|p| {
                        self.index
                            .delete(p.point())
                            .expect("kcap invariant violated: validated member missing from index")
                    })
                    .collect();
                if let Some(anchor) = cluster.first() {
                    tracing::trace!(radius, anchor = %anchor.label(), "kcap cluster committed");
                }
                return Some(cluster);
            }

            let Some(anchor) = members.first() else {
                continue;
            };
            if self.index.contains(anchor.point()) {
                let (fresh, neighbors) = self.candidate_for(anchor.point());
                tracing::trace!(
                    anchor = %anchor.label(),
                    stale = radius,
                    fresh,
                    "kcap candidate re-issued"
                );
                self.candidates.insert(fresh, neighbors);
            } else {
                tracing::trace!(anchor = %anchor.label(), "kcap stale candidate dropped");
            }
        }
    }

    /// Whether the index still holds enough points at every member location.
    fn is_available(&self, members: &[P]) -> bool {
        members.iter().all(|p| {
            let at = p.point();
            let wanted = members.iter().filter(|m| m.point() == at).count();
            self.index.count(at) >= wanted
        })
    }

    /// Extract clusters until every point has been assigned.
    pub fn drain_clusters(&mut self) -> impl Iterator<Item = Vec<P>> + '_ {
        core::iter::from_fn(move || self.extract_cluster())
    }

    /// The current neighborhood of `anchor` and its squared radius.
    fn candidate_for(&self, anchor: Point) -> (f64, Vec<P>) {
        let members: Vec<P> = self
            .index
            .k_nearest_neighbor(anchor, self.capacity)
            .into_iter()
            .cloned()
            .collect();
        let radius = members
            .last()
            .map_or(0.0, |p| anchor.distance_squared(p.point()));
        (radius, members)
    }

    /// Shape of the backing kd-tree; see [`XkdTree::debug_dump`].
    pub fn list_kd_tree(&self) -> Vec<String> {
        self.index.debug_dump()
    }
}

impl<P: Debug> KCapFL<P> {
    /// Shape of the candidate heap; see [`LeftistHeap::debug_dump`].
    pub fn list_heap(&self) -> Vec<String> {
        self.candidates.debug_dump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use hashbrown::HashSet;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use understory_xkd::{LabeledPoint, XkdError};

    type Lp = LabeledPoint<&'static str>;

    fn labels(cluster: &[Lp]) -> Vec<&'static str> {
        let mut out: Vec<_> = cluster.iter().map(|p| p.label).collect();
        out.sort_unstable();
        out
    }

    fn two_pairs() -> Vec<Lp> {
        vec![
            Lp::new("A", 0.0, 0.0),
            Lp::new("B", 1.0, 0.0),
            Lp::new("C", 10.0, 10.0),
            Lp::new("D", 11.0, 10.0),
        ]
    }

    fn line_of_four(names: [&'static str; 4]) -> Vec<Lp> {
        let [a, b, c, d] = names;
        vec![
            Lp::new(a, 0.0, 0.0),
            Lp::new(b, 1.0, 0.0),
            Lp::new(c, 2.5, 0.0),
            Lp::new(d, 10.0, 0.0),
        ]
    }

    #[test]
    fn rejects_zero_capacity_and_bucket_size() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            KCapFL::<Lp>::new(0, 3, bounds).err(),
            Some(KCapError::InvalidCapacity)
        );
        assert_eq!(
            KCapFL::<Lp>::new(2, 0, bounds).err(),
            Some(KCapError::Index(XkdError::InvalidBucketSize))
        );
    }

    #[test]
    fn rejects_sizes_that_are_not_multiples_of_capacity() {
        let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        assert_eq!(
            kcap.build(Vec::<Lp>::new()),
            Err(KCapError::InvalidSize {
                len: 0,
                capacity: 2
            })
        );
        assert_eq!(
            kcap.build(two_pairs().into_iter().take(3)),
            Err(KCapError::InvalidSize {
                len: 3,
                capacity: 2
            })
        );
        assert_eq!(kcap.remaining(), 0);
    }

    #[test]
    fn out_of_bounds_build_loads_nothing() {
        let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(
            kcap.build(two_pairs()),
            Err(KCapError::Index(XkdError::OutOfBounds { x: 11.0, y: 10.0 }))
        );
        assert_eq!(kcap.remaining(), 0);
        assert_eq!(kcap.list_heap(), vec!["[]"]);
        assert_eq!(kcap.extract_cluster(), None);
    }

    #[test]
    fn pairs_up_nearby_points() {
        let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        kcap.build(two_pairs()).unwrap();
        assert_eq!(kcap.remaining(), 4);

        let first = kcap.extract_cluster().map(|c| labels(&c));
        let second = kcap.extract_cluster().map(|c| labels(&c));
        let mut got = vec![first, second];
        got.sort();
        assert_eq!(got, vec![Some(vec!["A", "B"]), Some(vec!["C", "D"])]);
        assert_eq!(kcap.remaining(), 0);
        assert_eq!(kcap.extract_cluster(), None);
    }

    #[test]
    fn seeded_heap_holds_one_candidate_per_point() {
        let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        kcap.build(two_pairs()).unwrap();
        let dump = kcap.list_heap();
        let nodes: Vec<&String> = dump.iter().filter(|line| *line != "[]").collect();
        assert_eq!(nodes.len(), 4);
        // Every pair is one unit apart, so every candidate has radius 1.
        assert!(nodes.iter().all(|line| line.starts_with("(1, [")), "{dump:?}");
        assert_eq!(dump[0], "(1, [A: (0, 0), B: (1, 0)]) [1]");
        assert_eq!(
            kcap.list_kd_tree(),
            vec![
                "(x=5.5)",
                "[ {C: (10, 10)} {D: (11, 10)} ]",
                "[ {A: (0, 0)} {B: (1, 0)} ]",
            ]
        );
    }

    #[test]
    fn stale_candidates_are_reissued_or_dropped() {
        // B's and A's candidates coincide; C's initial candidate borrows B.
        let mut kcap = KCapFL::new(2, 1, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        kcap.build(line_of_four(["A", "B", "C", "D"])).unwrap();

        let first = kcap.extract_cluster().map(|c| labels(&c));
        assert_eq!(first, Some(vec!["A", "B"]));
        let second = kcap.extract_cluster().map(|c| labels(&c));
        assert_eq!(second, Some(vec!["C", "D"]));
        assert_eq!(kcap.extract_cluster(), None);
    }

    #[test]
    fn shared_locations_are_counted_per_copy() {
        let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        kcap.build([
            Lp::new("P1", 0.0, 0.0),
            Lp::new("P2", 0.0, 0.0),
            Lp::new("P3", 0.0, 0.0),
            Lp::new("Q", 15.0, 15.0),
        ])
        .unwrap();

        let mut all = Vec::new();
        for expected_remaining in [2, 0] {
            let cluster = kcap.extract_cluster().unwrap_or_default();
            assert_eq!(cluster.len(), 2);
            assert_eq!(kcap.remaining(), expected_remaining);
            all.extend(labels(&cluster));
        }
        assert_eq!(kcap.extract_cluster(), None);
        all.sort_unstable();
        assert_eq!(all, vec!["P1", "P2", "P3", "Q"]);
        assert_eq!(kcap.list_heap(), vec!["[]"]);
    }

    #[test]
    fn many_copies_of_one_location_partition_completely() {
        let mut kcap = KCapFL::new(3, 2, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        kcap.build(names.iter().enumerate().map(|(i, name)| {
            if i < 5 {
                Lp::new(*name, 3.0, 3.0)
            } else {
                Lp::new(*name, 4.0 + i as f64, 9.0)
            }
        }))
        .unwrap();

        let mut all: Vec<&str> = kcap.drain_clusters().flat_map(|c| labels(&c)).collect();
        all.sort_unstable();
        assert_eq!(all, names);
        assert_eq!(kcap.remaining(), 0);
    }

    #[test]
    fn drained_locator_holds_no_candidates() {
        let mut kcap = KCapFL::new(2, 1, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        kcap.build(line_of_four(["A", "B", "C", "D"])).unwrap();
        assert_eq!(kcap.drain_clusters().count(), 2);
        assert_eq!(kcap.list_heap(), vec!["[]"]);

        // Same coordinates, new values: only the new values come back.
        kcap.build(line_of_four(["a", "b", "c", "d"])).unwrap();
        let nodes = kcap.list_heap().iter().filter(|line| *line != "[]").count();
        assert_eq!(nodes, 4);
        let mut all: Vec<&str> = kcap.drain_clusters().flat_map(|c| labels(&c)).collect();
        all.sort_unstable();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
        assert_eq!(kcap.list_heap(), vec!["[]"]);
    }

    #[test]
    fn build_replaces_previous_points() {
        let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        kcap.build(two_pairs()).unwrap();
        assert!(kcap.extract_cluster().is_some(), "first build yields a cluster");

        kcap.build(line_of_four(["w", "x", "y", "z"])).unwrap();
        assert_eq!(kcap.remaining(), 4);
        let mut all: Vec<&str> = kcap.drain_clusters().flat_map(|c| labels(&c)).collect();
        all.sort_unstable();
        assert_eq!(all, vec!["w", "x", "y", "z"]);

        // A failed build leaves the current state alone.
        kcap.build(two_pairs()).unwrap();
        assert!(kcap.build(two_pairs().into_iter().take(3)).is_err(), "odd size");
        assert_eq!(kcap.remaining(), 4);
        assert_eq!(kcap.list_heap().iter().filter(|l| *l != "[]").count(), 4);
    }

    #[test]
    fn clear_resets_points_and_candidates() {
        let mut kcap = KCapFL::new(2, 3, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        kcap.build(two_pairs()).unwrap();
        kcap.clear();
        assert_eq!(kcap.remaining(), 0);
        assert_eq!(kcap.list_heap(), vec!["[]"]);
        assert_eq!(kcap.list_kd_tree(), vec!["[ ]"]);
        assert_eq!(kcap.extract_cluster(), None);

        // Usable again after a clear.
        kcap.build(two_pairs()).unwrap();
        assert_eq!(kcap.drain_clusters().count(), 2);
    }

    #[test]
    fn random_sets_partition_completely() {
        let mut rng = StdRng::seed_from_u64(0x6b63_6170);
        for (capacity, clusters, bucket_size) in [(1, 17, 2), (2, 40, 3), (3, 25, 1), (5, 20, 6)] {
            // Distinct grid locations, shuffled.
            let mut cells: Vec<(u32, u32)> =
                (0..60).flat_map(|x| (0..60).map(move |y| (x, y))).collect();
            cells.shuffle(&mut rng);
            let n = capacity * clusters;
            let points: Vec<LabeledPoint<u32>> = cells[..n]
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    let jitter = rng.gen_range(0.0..0.5);
                    LabeledPoint::new(i as u32, f64::from(x) + jitter, f64::from(y))
                })
                .collect();

            let mut kcap = KCapFL::new(capacity, bucket_size, Rect::new(0.0, 0.0, 60.0, 60.0))
                .unwrap();
            kcap.build(points.iter().copied()).unwrap();

            let mut seen: HashSet<u32> = HashSet::new();
            for _ in 0..clusters {
                let cluster = kcap.extract_cluster();
                assert!(cluster.is_some(), "ran out of clusters early");
                let cluster = cluster.unwrap_or_default();
                assert_eq!(cluster.len(), capacity);
                for p in cluster {
                    assert!(seen.insert(p.label), "point {} assigned twice", p.label);
                }
            }
            assert_eq!(seen.len(), n);
            assert_eq!(kcap.remaining(), 0);
            assert!(kcap.extract_cluster().is_none());
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded selector retaining the `k` smallest keys seen.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

/// Keeps the `k` smallest-keyed entries offered to it.
///
/// Internally this is an array-backed max-heap of at most `k` entries, so the
/// root is always the worst of the retained entries. That key is what
/// [`MinK::kth_key`] reports once the selector is full, and callers use it as a
/// pruning bound during nearest-neighbor searches.
///
/// Until `k` entries have been offered, [`MinK::kth_key`] reports the sentinel
/// passed to [`MinK::new`], which should compare greater than any real key.
///
/// ```rust
/// use understory_heap::MinK;
///
/// let mut best = MinK::new(2, f64::MAX);
/// best.add(5.0, "e");
/// assert_eq!(*best.kth_key(), f64::MAX);
/// best.add(1.0, "a");
/// best.add(3.0, "c");
/// assert_eq!(*best.kth_key(), 3.0);
/// assert_eq!(best.into_sorted_vec(), ["a", "c"]);
/// ```
#[derive(Clone, Debug)]
pub struct MinK<K, V> {
    // 0-based: children of `i` live at `2i + 1` and `2i + 2`.
    entries: Vec<(K, V)>,
    capacity: usize,
    sentinel: K,
}

impl<K: PartialOrd, V> MinK<K, V> {
    /// Create an empty selector that retains up to `k` entries.
    pub fn new(k: usize, sentinel: K) -> Self {
        Self {
            entries: Vec::with_capacity(k),
            capacity: k,
            sentinel,
        }
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been retained yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` this selector was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every retained entry. The capacity and sentinel are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The current `k`-th smallest key, or the sentinel while fewer than `k`
    /// entries are held.
    pub fn kth_key(&self) -> &K {
        match self.entries.first() {
            Some((key, _)) if self.entries.len() == self.capacity => key,
            _ => &self.sentinel,
        }
    }

    /// Offer an entry.
    ///
    /// While not full the entry is always kept. Once full, it replaces the
    /// current maximum only when its key is strictly smaller.
    pub fn add(&mut self, key: K, value: V) {
        debug_assert!(
            key.partial_cmp(&key).is_some(),
            "MinK keys must be totally ordered (no NaN)"
        );
        if self.entries.len() < self.capacity {
            self.entries.push((key, value));
            self.sift_up(self.entries.len() - 1);
        } else if let Some((worst, _)) = self.entries.first()
            && key < *worst
        {
            self.entries[0] = (key, value);
            self.sift_down(0);
        }
    }

    /// Consume the selector, returning the retained values by ascending key.
    ///
    /// Equal keys come out in an unspecified order.
    pub fn into_sorted_vec(self) -> Vec<V> {
        let mut entries = self.entries;
        entries.sort_unstable_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        entries.into_iter().map(|(_, v)| v).collect()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].0 > self.entries[parent].0 {
                self.entries.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.entries.len();
        loop {
            let mut child = 2 * i + 1;
            if child >= len {
                break;
            }
            if child + 1 < len && self.entries[child + 1].0 > self.entries[child].0 {
                child += 1;
            }
            if self.entries[child].0 > self.entries[i].0 {
                self.entries.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
    }
}

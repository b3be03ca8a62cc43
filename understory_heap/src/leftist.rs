// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Meldable min-heap built on a leftist tree.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Debug, Display};
use core::mem;

use crate::error::HeapError;

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    // Null-path length: shortest distance to a node with a missing child.
    npl: i32,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            npl: 0,
            left: None,
            right: None,
        })
    }
}

/// NPL of a possibly-missing child; a missing child counts as `-1`.
fn npl<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(-1, |n| n.npl)
}

/// Leftist min-heap over key/value pairs.
///
/// Every structural operation reduces to a single recursive two-way merge that
/// walks the right spines of both trees, so insert, extract-min and melding
/// two heaps are all `O(log n)`.
///
/// Two invariants hold after every public operation:
/// - heap order: a node's key is `<=` the keys of both of its children;
/// - leftist shape: the left child's NPL is `>=` the right child's NPL.
///
/// Keys only need [`PartialOrd`]; NaN-like keys that compare as unordered are
/// not supported.
///
/// ```rust
/// use understory_heap::LeftistHeap;
///
/// let mut a = LeftistHeap::new();
/// a.insert(4, "four");
/// a.insert(1, "one");
///
/// let mut b = LeftistHeap::new();
/// b.insert(2, "two");
/// a.merge_with(&mut b);
/// assert!(b.is_empty());
///
/// assert_eq!(a.extract_min().unwrap(), "one");
/// assert_eq!(a.peek_min_key(), Some(&2));
///
/// // Everything above 2 moves to a new heap.
/// let upper = a.split(&2);
/// assert_eq!(upper.peek_min_key(), Some(&4));
/// assert_eq!(a.peek_min_key(), Some(&2));
/// ```
pub struct LeftistHeap<K, V> {
    root: Link<K, V>,
}

impl<K: Debug, V: Debug> Debug for LeftistHeap<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LeftistHeap")
            .field("min_key", &self.root.as_ref().map(|n| &n.key))
            .field("root_npl", &npl(&self.root))
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LeftistHeap<K, V> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K, V> Drop for LeftistHeap<K, V> {
    fn drop(&mut self) {
        // Left spines can be long; unlink iteratively instead of relying on
        // recursive `Box` drops.
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<K: PartialOrd, V> LeftistHeap<K, V> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the heap holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        let _ = mem::take(self);
    }

    /// Insert a key/value pair by merging a singleton tree into the root.
    pub fn insert(&mut self, key: K, value: V) {
        debug_assert!(
            key.partial_cmp(&key).is_some(),
            "LeftistHeap keys must be totally ordered (no NaN)"
        );
        self.root = merge(self.root.take(), Some(Node::leaf(key, value)));
    }

    /// Meld `donor` into this heap.
    ///
    /// The donor is left structurally empty and can be reused as a fresh heap.
    pub fn merge_with(&mut self, donor: &mut Self) {
        if donor.is_empty() {
            return;
        }
        self.root = merge(self.root.take(), donor.root.take());
    }

    /// The smallest key, if any.
    pub fn peek_min_key(&self) -> Option<&K> {
        self.root.as_ref().map(|n| &n.key)
    }

    /// Remove the entry with the smallest key and return its value.
    pub fn extract_min(&mut self) -> Result<V, HeapError> {
        let mut root = self.root.take().ok_or(HeapError::Empty)?;
        self.root = merge(root.left.take(), root.right.take());
        Ok(root.value)
    }

    /// Move every entry whose key is greater than `threshold` into a new heap.
    ///
    /// Subtrees rooted at such keys are unlinked in preorder (left before
    /// right), the remaining tree has its shape and NPL values repaired, and the
    /// unlinked subtrees are melded one by one into the returned heap. This is
    /// `O(m log n)` for `m` unlinked subtrees.
    pub fn split(&mut self, threshold: &K) -> Self {
        let mut detached: Vec<Box<Node<K, V>>> = Vec::new();
        let mut stack: Vec<&mut Link<K, V>> = vec![&mut self.root];
        while let Some(link) = stack.pop() {
            if link.as_ref().is_some_and(|n| n.key > *threshold) {
                detached.extend(link.take());
            } else if let Some(node) = link {
                stack.push(&mut node.right);
                stack.push(&mut node.left);
            }
        }

        let mut upper = Self::new();
        if detached.is_empty() {
            return upper;
        }
        tracing::trace!(subtrees = detached.len(), "leftist heap split");
        for subtree in detached {
            upper.root = merge(upper.root.take(), Some(subtree));
        }
        self.root = repair(self.root.take());
        upper
    }
}

impl<K: Display, V: Debug> LeftistHeap<K, V> {
    /// Textual dump of the tree shape.
    ///
    /// Nodes are listed in preorder, visiting the right child before the left
    /// one. A node renders as `(key, value) [npl]` and a missing child as `[]`.
    pub fn debug_dump(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<&Link<K, V>> = vec![&self.root];
        while let Some(link) = stack.pop() {
            match link {
                None => out.push(String::from("[]")),
                Some(node) => {
                    out.push(format!("({}, {:?}) [{}]", node.key, node.value, node.npl));
                    stack.push(&node.left);
                    stack.push(&node.right);
                }
            }
        }
        out
    }
}

fn merge<K: PartialOrd, V>(a: Link<K, V>, b: Link<K, V>) -> Link<K, V> {
    let (mut u, mut v) = match (a, b) {
        (None, b) => return b,
        (a, None) => return a,
        (Some(u), Some(v)) => (u, v),
    };
    if u.key > v.key {
        mem::swap(&mut u, &mut v);
    }
    if u.left.is_none() {
        u.left = Some(v);
    } else {
        u.right = merge(u.right.take(), Some(v));
        if npl(&u.left) < npl(&u.right) {
            mem::swap(&mut u.left, &mut u.right);
        }
        u.npl = npl(&u.right) + 1;
    }
    Some(u)
}

/// Restore the leftist shape and NPL values of every node, bottom-up.
///
/// The tree is flattened breadth-first so every child sits after its parent,
/// then nodes are fixed and reattached from the back.
fn repair<K, V>(link: Link<K, V>) -> Link<K, V> {
    // (node, parent index, is left child)
    let mut nodes: Vec<(Box<Node<K, V>>, Option<(usize, bool)>)> = vec![(link?, None)];
    let mut i = 0;
    while i < nodes.len() {
        let left = nodes[i].0.left.take();
        let right = nodes[i].0.right.take();
        nodes.extend(left.map(|n| (n, Some((i, true)))));
        nodes.extend(right.map(|n| (n, Some((i, false)))));
        i += 1;
    }
    while let Some((mut node, parent)) = nodes.pop() {
        if node.left.is_none() {
            node.left = node.right.take();
        }
        if npl(&node.left) < npl(&node.right) {
            mem::swap(&mut node.left, &mut node.right);
        }
        node.npl = npl(&node.right) + 1;
        match parent {
            None => return Some(node),
            Some((p, true)) => nodes[p].0.left = Some(node),
            Some((p, false)) => nodes[p].0.right = Some(node),
        }
    }
    None
}

//! Positions in a `ChainedHashMap` and the borrowing iterators built on them.
//!
//! A `Cursor` names one entry (or the end marker) without borrowing the
//! map; every access takes the map by reference, so a cursor can be held
//! across `erase`. Arena keys are generational: once an entry is erased,
//! cursors to it stop resolving instead of aliasing a later entry.
//!
//! Misuse is defined: dereferencing the end marker or an erased entry
//! yields `None` (or a `CursorError` from `try_entry`), and advancing
//! either yields the end marker.

use crate::chain::{Chains, NodeKey};
use crate::chained_hash_map::ChainedHashMap;
use crate::error::CursorError;
use core::iter::FusedIterator;

/// Whole-table position. Advances in global order: down the current chain,
/// then to the head of the next non-empty bucket.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor(Option<NodeKey>);

impl Cursor {
    pub(crate) fn new(node: Option<NodeKey>) -> Self {
        Cursor(node)
    }

    pub(crate) fn at(node: NodeKey) -> Self {
        Cursor(Some(node))
    }

    pub(crate) fn node(&self) -> Option<NodeKey> {
        self.0
    }

    /// The end marker, equal to `map.end()` for every map.
    pub const fn end() -> Self {
        Cursor(None)
    }

    pub fn is_end(&self) -> bool {
        self.0.is_none()
    }

    pub fn key<'a, K, V, H, E>(&self, map: &'a ChainedHashMap<K, V, H, E>) -> Option<&'a K> {
        self.entry(map).map(|(k, _)| k)
    }

    pub fn value<'a, K, V, H, E>(&self, map: &'a ChainedHashMap<K, V, H, E>) -> Option<&'a V> {
        self.entry(map).map(|(_, v)| v)
    }

    pub fn value_mut<'a, K, V, H, E>(
        &self,
        map: &'a mut ChainedHashMap<K, V, H, E>,
    ) -> Option<&'a mut V> {
        let k = self.0?;
        map.chains_mut().node_mut(k).map(|n| &mut n.value)
    }

    pub fn entry<'a, K, V, H, E>(
        &self,
        map: &'a ChainedHashMap<K, V, H, E>,
    ) -> Option<(&'a K, &'a V)> {
        let k = self.0?;
        map.chains().node(k).map(|n| (&n.key, &n.value))
    }

    /// Like `entry`, but tells the end marker apart from an erased entry.
    pub fn try_entry<'a, K, V, H, E>(
        &self,
        map: &'a ChainedHashMap<K, V, H, E>,
    ) -> Result<(&'a K, &'a V), CursorError> {
        let k = self.0.ok_or(CursorError::End)?;
        map.chains()
            .node(k)
            .map(|n| (&n.key, &n.value))
            .ok_or(CursorError::Stale)
    }

    /// The position after this one in global order.
    #[must_use]
    pub fn next<K, V, H, E>(&self, map: &ChainedHashMap<K, V, H, E>) -> Cursor {
        Cursor(self.0.and_then(|k| map.chains().successor(k)))
    }
}

/// Position within a single bucket's chain; advancing never leaves the
/// bucket.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BucketCursor(Option<NodeKey>);

impl BucketCursor {
    pub(crate) fn new(node: Option<NodeKey>) -> Self {
        BucketCursor(node)
    }

    pub fn is_end(&self) -> bool {
        self.0.is_none()
    }

    pub fn entry<'a, K, V, H, E>(
        &self,
        map: &'a ChainedHashMap<K, V, H, E>,
    ) -> Option<(&'a K, &'a V)> {
        let k = self.0?;
        map.chains().node(k).map(|n| (&n.key, &n.value))
    }

    #[must_use]
    pub fn next<K, V, H, E>(&self, map: &ChainedHashMap<K, V, H, E>) -> BucketCursor {
        BucketCursor(self.0.and_then(|k| map.chains().node(k)).and_then(|n| n.next))
    }

    /// Converts to a whole-table cursor at the same entry.
    pub fn to_cursor(&self) -> Cursor {
        Cursor(self.0)
    }
}

/// Iterator over entries in global order.
pub struct Iter<'a, K, V> {
    chains: &'a Chains<K, V>,
    cur: Option<NodeKey>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(chains: &'a Chains<K, V>) -> Self {
        Iter {
            chains,
            cur: chains.head(),
            remaining: chains.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            chains: self.chains,
            cur: self.cur,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let node = self.chains.node(k)?;
        self.cur = self.chains.successor(k);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Keys in global order.
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Values in global order.
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Iterator over one bucket's chain, most recent insert first.
pub struct BucketIter<'a, K, V> {
    chains: &'a Chains<K, V>,
    cur: Option<NodeKey>,
}

impl<'a, K, V> BucketIter<'a, K, V> {
    pub(crate) fn new(chains: &'a Chains<K, V>, index: usize) -> Self {
        BucketIter {
            chains,
            cur: chains.bucket_head(index),
        }
    }
}

impl<'a, K, V> Iterator for BucketIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chains.node(self.cur?)?;
        self.cur = node.next;
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for BucketIter<'_, K, V> {}

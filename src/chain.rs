//! Bucket array and collision chains.
//!
//! Nodes live in a generational arena; each bucket holds the key of its
//! chain head and each node holds the key of its successor, so a chain is
//! a singly linked list without raw pointers. `head` caches the first node
//! in global order (the head of the lowest-indexed non-empty bucket).
//!
//! `Chains` never calls user code: bucket selection and chain search work
//! on hash codes cached in the nodes, and key comparison is delegated to a
//! caller-supplied predicate.

use slotmap::{new_key_type, SlotMap};
use std::collections::TryReserveError;

new_key_type! {
    /// Arena key of a chain node.
    pub(crate) struct NodeKey;
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) next: Option<NodeKey>,
}

#[derive(Debug)]
pub(crate) struct Chains<K, V> {
    buckets: Vec<Option<NodeKey>>,
    nodes: SlotMap<NodeKey, Node<K, V>>,
    head: Option<NodeKey>,
}

impl<K, V> Chains<K, V> {
    /// Allocates `bucket_count` empty buckets, reporting allocation failure.
    pub(crate) fn try_with_bucket_count(bucket_count: usize) -> Result<Self, TryReserveError> {
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        buckets.resize(bucket_count, None);
        Ok(Self {
            buckets,
            nodes: SlotMap::with_key(),
            head: None,
        })
    }

    pub(crate) fn with_bucket_count(bucket_count: usize) -> Self {
        Self {
            buckets: vec![None; bucket_count],
            nodes: SlotMap::with_key(),
            head: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn bucket_of(&self, hash: u64) -> usize {
        // bucket_count is at least 2, and the remainder fits in usize.
        (hash % self.buckets.len() as u64) as usize
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<NodeKey> {
        self.head
    }

    /// Head of bucket `index`. Panics when `index >= bucket_count()`.
    #[inline]
    pub(crate) fn bucket_head(&self, index: usize) -> Option<NodeKey> {
        self.buckets[index]
    }

    #[inline]
    pub(crate) fn node(&self, k: NodeKey) -> Option<&Node<K, V>> {
        self.nodes.get(k)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, k: NodeKey) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(k)
    }

    /// Panics if `k` is stale; callers pass keys they just obtained.
    #[inline]
    pub(crate) fn value_at_mut(&mut self, k: NodeKey) -> &mut V {
        &mut self.nodes[k].value
    }

    /// Walks the chain for `hash`, returning the first node whose cached
    /// hash equals `hash` and whose key satisfies `matches`.
    pub(crate) fn find<F>(&self, hash: u64, mut matches: F) -> Option<NodeKey>
    where
        F: FnMut(&K) -> bool,
    {
        let mut cur = self.buckets[self.bucket_of(hash)];
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if node.hash == hash && matches(&node.key) {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// First chain head at or after bucket `start`.
    pub(crate) fn first_from(&self, start: usize) -> Option<NodeKey> {
        self.buckets.get(start..)?.iter().find_map(|head| *head)
    }

    /// Next node in global order: the chain successor, else the head of
    /// the next non-empty bucket. `None` for the last node or a stale key.
    pub(crate) fn successor(&self, k: NodeKey) -> Option<NodeKey> {
        let node = self.nodes.get(k)?;
        node.next
            .or_else(|| self.first_from(self.bucket_of(node.hash) + 1))
    }

    /// Links a new node at the front of its bucket and promotes it to
    /// `head` when its bucket is at or before the current head's bucket.
    pub(crate) fn push_front(&mut self, key: K, value: V, hash: u64) -> NodeKey {
        let bucket = self.bucket_of(hash);
        let next = self.buckets[bucket];
        // The node is allocated before any link changes.
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next,
        });
        self.buckets[bucket] = Some(k);

        let promote = match self.head.and_then(|h| self.nodes.get(h)) {
            None => true,
            Some(h) => bucket <= self.bucket_of(h.hash),
        };
        if promote {
            self.head = Some(k);
        }
        k
    }

    /// Unlinks and returns node `k` together with its successor in global
    /// order as observed before removal. `None` if `k` is stale.
    pub(crate) fn unlink(&mut self, k: NodeKey) -> Option<(Node<K, V>, Option<NodeKey>)> {
        let (hash, after) = {
            let node = self.nodes.get(k)?;
            (node.hash, node.next)
        };
        let successor = self.successor(k);
        let bucket = self.bucket_of(hash);

        let mut prev: Option<NodeKey> = None;
        let mut cur = self.buckets[bucket];
        while let Some(c) = cur {
            if c == k {
                break;
            }
            prev = Some(c);
            cur = self.nodes.get(c).and_then(|n| n.next);
        }
        debug_assert_eq!(cur, Some(k), "live node missing from its bucket chain");

        match prev {
            None => self.buckets[bucket] = after,
            Some(p) => {
                if let Some(pn) = self.nodes.get_mut(p) {
                    pn.next = after;
                }
            }
        }

        let node = self.nodes.remove(k)?;
        if self.head == Some(k) {
            self.head = successor;
        }
        Some((node, successor))
    }

    pub(crate) fn clear(&mut self) {
        let nodes = core::mem::take(&mut self.nodes);
        self.buckets.fill(None);
        self.head = None;
        // Keys and values drop here, after the table is empty again.
        drop(nodes);
    }

    /// Asserts the structural invariants: every node sits in the chain of
    /// its own bucket, every node is reachable exactly once, and `head` is
    /// the first chain head in bucket order.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = 0usize;
        for (index, head) in self.buckets.iter().enumerate() {
            let mut cur = *head;
            while let Some(k) = cur {
                let node = self.nodes.get(k).expect("chain links a live node");
                assert_eq!(self.bucket_of(node.hash), index, "node in wrong bucket");
                seen += 1;
                assert!(seen <= self.nodes.len(), "chain cycle or shared node");
                cur = node.next;
            }
        }
        assert_eq!(seen, self.nodes.len(), "unreachable nodes in arena");
        assert_eq!(self.head.is_none(), self.nodes.is_empty());
        assert_eq!(self.head, self.first_from(0), "head is not the first chain head");
    }
}

impl<K: Clone, V: Clone> Clone for Chains<K, V> {
    /// Rebuilds every chain in a fresh arena, keeping chain order so the
    /// copy iterates exactly like the source.
    fn clone(&self) -> Self {
        let mut out = Self {
            buckets: vec![None; self.buckets.len()],
            nodes: SlotMap::with_capacity_and_key(self.nodes.len()),
            head: None,
        };
        let mut chain = Vec::new();
        for (index, head) in self.buckets.iter().enumerate() {
            chain.clear();
            let mut cur = *head;
            while let Some(node) = cur.and_then(|k| self.nodes.get(k)) {
                chain.push(node);
                cur = node.next;
            }
            for node in chain.iter().rev() {
                let k = out.nodes.insert(Node {
                    key: node.key.clone(),
                    value: node.value.clone(),
                    hash: node.hash,
                    next: out.buckets[index],
                });
                out.buckets[index] = Some(k);
            }
        }
        out.head = out.first_from(0);
        out
    }
}

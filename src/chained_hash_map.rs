//! ChainedHashMap: fixed-bucket separate chaining with cursors.

use crate::chain::{Chains, NodeKey};
use crate::cursor::{BucketCursor, BucketIter, Cursor, Iter, Keys, Values};
use crate::error::TableError;
use crate::hash_functions::{KeyHasher, StdHash};
use crate::key_eq::{DefaultEq, KeyEquivalence};
use crate::primes;
use crate::reentrancy::DebugReentrancy;
use crate::render::Dump;
use core::borrow::Borrow;
use core::fmt;
use core::ops::Index;
use log::{debug, trace};

/// Bucket request used by `new`, `Default` and the builder.
pub const DEFAULT_BUCKETS: usize = 16;

/// Hash map with a bucket count fixed at construction.
///
/// The bucket count is the smallest prime at or above the requested count
/// and never changes; the map does not rehash. Iteration runs in ascending
/// bucket index and, within a bucket, most recent insert first.
///
/// `H` hashes keys and `E` compares them; they must agree (equivalent keys
/// hash equal). Lookups accept any borrowed form `Q` of the key for which
/// both are implemented.
pub struct ChainedHashMap<K, V, H = StdHash, E = DefaultEq> {
    hasher: H,
    key_eq: E,
    chains: Chains<K, V>,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// # Panics
    /// If no prime bucket count at or above `requested` fits in `usize`, or
    /// the bucket array cannot be allocated.
    pub fn with_buckets(requested: usize) -> Self {
        Self::with_buckets_hasher_and_eq(requested, StdHash::default(), DefaultEq)
    }
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, E> ChainedHashMap<K, V, H, E> {
    pub fn with_buckets_and_hasher(requested: usize, hasher: H) -> Self
    where
        E: Default,
    {
        Self::with_buckets_hasher_and_eq(requested, hasher, E::default())
    }

    /// # Panics
    /// If no prime bucket count at or above `requested` fits in `usize`, or
    /// the bucket array cannot be allocated. Use
    /// [`try_with_buckets_hasher_and_eq`](Self::try_with_buckets_hasher_and_eq)
    /// to handle those cases.
    pub fn with_buckets_hasher_and_eq(requested: usize, hasher: H, key_eq: E) -> Self {
        match Self::try_with_buckets_hasher_and_eq(requested, hasher, key_eq) {
            Ok(map) => map,
            Err(e) => panic!("ChainedHashMap construction failed: {e}"),
        }
    }

    pub fn try_with_buckets_hasher_and_eq(
        requested: usize,
        hasher: H,
        key_eq: E,
    ) -> Result<Self, TableError> {
        let Some(bucket_count) = primes::next_prime_at_least(requested) else {
            debug!("no prime bucket count at or above {requested}");
            return Err(TableError::CapacityOverflow { requested });
        };
        let chains = Chains::try_with_bucket_count(bucket_count).map_err(|e| {
            debug!("bucket array allocation of {bucket_count} failed: {e}");
            TableError::from(e)
        })?;
        trace!("ChainedHashMap: requested {requested} buckets, using {bucket_count}");
        Ok(Self {
            hasher,
            key_eq,
            chains,
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub(crate) fn chains(&self) -> &Chains<K, V> {
        &self.chains
    }

    pub(crate) fn chains_mut(&mut self) -> &mut Chains<K, V> {
        &mut self.chains
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.chains.bucket_count()
    }

    /// Entries per bucket.
    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.bucket_count() as f32
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn key_eq(&self) -> &E {
        &self.key_eq
    }

    /// Cursor at the first entry in global order, or the end marker.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.chains.head())
    }

    pub fn end(&self) -> Cursor {
        Cursor::end()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.chains)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// # Panics
    /// If `index >= bucket_count()`.
    pub fn bucket_begin(&self, index: usize) -> BucketCursor {
        BucketCursor::new(self.chains.bucket_head(index))
    }

    /// # Panics
    /// If `index >= bucket_count()`.
    pub fn bucket_iter(&self, index: usize) -> BucketIter<'_, K, V> {
        BucketIter::new(&self.chains, index)
    }

    /// Length of bucket `index`'s chain.
    ///
    /// # Panics
    /// If `index >= bucket_count()`.
    pub fn bucket_size(&self, index: usize) -> usize {
        let mut cursor = self.bucket_begin(index);
        let mut count = 0;
        while !cursor.is_end() {
            count += 1;
            cursor = cursor.next(self);
        }
        count
    }

    /// Removes the entry at `cursor` and returns the cursor that followed
    /// it in global order. Iteration can continue from the returned cursor.
    ///
    /// The end marker and cursors to already-erased entries are ignored and
    /// yield the end marker.
    pub fn erase(&mut self, cursor: Cursor) -> Cursor {
        let removed = {
            let _g = self.reentrancy.enter("erase");
            cursor.node().and_then(|k| self.chains.unlink(k))
        };
        // Key and value drop here, after the chains are consistent again.
        match removed {
            Some((_node, next)) => Cursor::new(next),
            None => Cursor::end(),
        }
    }

    /// Removes every entry. The bucket count is unchanged.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        trace!("ChainedHashMap: clearing {} entries", self.chains.len());
        self.chains.clear();
    }

    /// Moves all entries into a new map, leaving `self` empty with a fresh
    /// bucket array of the same size. Both maps stay usable.
    pub fn take(&mut self) -> Self
    where
        H: Clone,
        E: Clone,
    {
        let _g = self.reentrancy.enter("take");
        let fresh = Chains::with_bucket_count(self.chains.bucket_count());
        let chains = core::mem::replace(&mut self.chains, fresh);
        trace!("ChainedHashMap: moved out {} entries", chains.len());
        Self {
            hasher: self.hasher.clone(),
            key_eq: self.key_eq.clone(),
            chains,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Display adapter printing one line per bucket.
    pub fn dump(&self) -> Dump<'_, K, V> {
        Dump::new(&self.chains)
    }

    fn find_node<Q>(&self, q: &Q, hash: u64) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: KeyEquivalence<Q>,
    {
        self.chains
            .find(hash, |k| self.key_eq.equivalent(k.borrow(), q))
    }

    /// Bucket a key maps to: `hash(key) mod bucket_count()`.
    pub fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        let _g = self.reentrancy.enter("bucket_index");
        self.chains.bucket_of(self.hasher.hash_key(q))
    }

    /// Cursor at the entry for `q`, or the end marker.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        let _g = self.reentrancy.enter("find");
        let hash = self.hasher.hash_key(q);
        Cursor::new(self.find_node(q, hash))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        !self.find(q).is_end()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        self.find(q).value(self)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        self.find(q).entry(self)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        let cursor = self.find(q);
        cursor.value_mut(self)
    }

    /// Removes `q`'s entry. Returns 1 if an entry was removed, 0 if the key
    /// was absent.
    pub fn erase_key<Q>(&mut self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        match self.remove_entry(q) {
            Some(_) => 1,
            None => 0,
        }
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEquivalence<Q>,
    {
        let node = self.find(q).node()?;
        let removed = {
            let _g = self.reentrancy.enter("remove");
            self.chains.unlink(node)
        };
        removed.map(|(n, _)| (n.key, n.value))
    }

    /// Inserts `key` if absent.
    ///
    /// Returns the cursor of the entry for `key` and whether it was newly
    /// inserted. An existing entry keeps its value; `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool)
    where
        H: KeyHasher<K>,
        E: KeyEquivalence<K>,
    {
        self.insert_with(key, || value)
    }

    /// Like `insert`, but only builds the value when the key is absent.
    pub fn insert_with<F>(&mut self, key: K, make: F) -> (Cursor, bool)
    where
        H: KeyHasher<K>,
        E: KeyEquivalence<K>,
        F: FnOnce() -> V,
    {
        let (k, inserted) = self.insert_node(key, make);
        (Cursor::at(k), inserted)
    }

    fn insert_node<F>(&mut self, key: K, make: F) -> (NodeKey, bool)
    where
        H: KeyHasher<K>,
        E: KeyEquivalence<K>,
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter("insert");
        let hash = self.hasher.hash_key(&key);
        if let Some(existing) = self.find_node(&key, hash) {
            return (existing, false);
        }
        (self.chains.push_front(key, make(), hash), true)
    }

    /// Value for `key`, inserting `V::default()` first if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
        H: KeyHasher<K>,
        E: KeyEquivalence<K>,
    {
        let (k, _) = self.insert_node(key, V::default);
        self.chains.value_at_mut(k)
    }

    /// Checks the chain invariants plus agreement between cached hash codes
    /// and the hasher.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self)
    where
        H: KeyHasher<K>,
    {
        self.chains.assert_invariants();
        let mut c = self.begin();
        while let Some(k) = c.node() {
            let node = self.chains.node(k).expect("live cursor");
            assert_eq!(node.hash, self.hasher.hash_key(&node.key), "stale cached hash");
            c = c.next(self);
        }
    }
}

impl<K, V, H, E> Clone for ChainedHashMap<K, V, H, E>
where
    K: Clone,
    V: Clone,
    H: Clone,
    E: Clone,
{
    /// Deep copy with the same bucket count and iteration order.
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            key_eq: self.key_eq.clone(),
            chains: self.chains.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K, V, H, E> Extend<(K, V)> for ChainedHashMap<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquivalence<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a ChainedHashMap<K, V, H, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, Q, V, H, E> Index<&Q> for ChainedHashMap<K, V, H, E>
where
    K: Borrow<Q>,
    Q: ?Sized,
    H: KeyHasher<Q>,
    E: KeyEquivalence<Q>,
{
    type Output = V;

    /// # Panics
    /// If the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not present in ChainedHashMap"),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H, E> fmt::Debug for ChainedHashMap<K, V, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

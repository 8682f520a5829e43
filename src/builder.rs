//! Builder collecting the construction parameters of a `ChainedHashMap`.

use crate::chained_hash_map::{ChainedHashMap, DEFAULT_BUCKETS};
use crate::error::TableError;
use crate::hash_functions::StdHash;
use crate::key_eq::DefaultEq;

/// Configures bucket count, hasher and key equivalence, then builds a map.
///
/// ```
/// use chained_hashmap::{ChainedHashMapBuilder, Fnv1aHash};
///
/// let mut m = ChainedHashMapBuilder::new()
///     .buckets(100)
///     .hasher(Fnv1aHash)
///     .build::<String, u32>();
/// m.insert("a".to_string(), 1);
/// assert_eq!(m.bucket_count(), 101);
/// ```
#[derive(Clone, Debug)]
pub struct ChainedHashMapBuilder<H = StdHash, E = DefaultEq> {
    buckets: usize,
    hasher: H,
    key_eq: E,
}

impl ChainedHashMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for ChainedHashMapBuilder {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
            hasher: StdHash::default(),
            key_eq: DefaultEq,
        }
    }
}

impl<H, E> ChainedHashMapBuilder<H, E> {
    /// Requested bucket count; the map rounds it up to a prime.
    pub fn buckets(mut self, requested: usize) -> Self {
        self.buckets = requested;
        self
    }

    pub fn hasher<H2>(self, hasher: H2) -> ChainedHashMapBuilder<H2, E> {
        ChainedHashMapBuilder {
            buckets: self.buckets,
            hasher,
            key_eq: self.key_eq,
        }
    }

    pub fn key_eq<E2>(self, key_eq: E2) -> ChainedHashMapBuilder<H, E2> {
        ChainedHashMapBuilder {
            buckets: self.buckets,
            hasher: self.hasher,
            key_eq,
        }
    }

    pub fn requested_buckets(&self) -> usize {
        self.buckets
    }

    /// # Panics
    /// Under the same conditions as
    /// [`ChainedHashMap::with_buckets_hasher_and_eq`].
    pub fn build<K, V>(self) -> ChainedHashMap<K, V, H, E> {
        ChainedHashMap::with_buckets_hasher_and_eq(self.buckets, self.hasher, self.key_eq)
    }

    pub fn try_build<K, V>(self) -> Result<ChainedHashMap<K, V, H, E>, TableError> {
        ChainedHashMap::try_with_buckets_hasher_and_eq(self.buckets, self.hasher, self.key_eq)
    }
}

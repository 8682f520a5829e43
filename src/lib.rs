//! chained-hashmap: a single-threaded hash map with separate chaining over
//! a fixed, prime-sized bucket array, copyable cursors, and pluggable hash
//! and equivalence strategies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a classic chained hash table whose behaviour is fully
//!   predictable: the bucket count is fixed at construction, iteration
//!   order is defined, and cursors survive erasure of other entries.
//! - Layers:
//!   - `Chains<K, V>` (chain): bucket array of chain heads plus a
//!     generational arena of nodes. Owns the `head` pointer to the first
//!     node in global order. Never calls user code.
//!   - `ChainedHashMap<K, V, H, E>`: hashes and compares keys through `H`
//!     and `E`, guards user callbacks with a debug reentrancy check, and
//!     exposes the insert/find/erase/iterate API.
//!   - `Cursor` / `BucketCursor`: position tokens that take the map by
//!     reference on each access; `Iter` / `BucketIter` are borrowing
//!     iterators over the same walk.
//!
//! Ordering
//! - Global order is ascending bucket index; within a bucket, most recent
//!   insert first (inserts link at the chain head).
//! - `head` is the head node of the lowest-indexed non-empty bucket, or
//!   nothing when the map is empty. Insert promotes the new node when its
//!   bucket is at or before `head`'s bucket; erasing `head` advances it to
//!   the erased node's successor. `begin()` is O(1).
//!
//! Cursor validity
//! - Cursors are arena keys, so erasing an entry invalidates exactly the
//!   cursors to that entry: they resolve to `None` and advance to the end
//!   marker. `erase` returns the successor cursor for continued walking.
//! - Iterators borrow the map, so the borrow checker rules out mutation
//!   during iteration.
//!
//! Hashing
//! - Each node caches its `u64` hash code. Chain search rejects on cached
//!   codes before calling the equivalence predicate, and advancing a
//!   cursor derives the bucket from the cached code; `H` is never invoked
//!   after insertion.
//! - `PolynomialRollingHash` and `Fnv1aHash` hash string keys; `StdHash`
//!   adapts any `BuildHasher` and is the default.
//!
//! Constraints and non-goals
//! - Single-threaded: the map is `!Send`/`!Sync`.
//! - No resize or rehash; `load_factor` grows with the entry count.
//! - Insert is insert-if-absent; use `get_mut` or
//!   `get_or_insert_default` to update values.

mod builder;
mod chain;
mod chained_hash_map;
#[cfg(test)]
mod chained_hash_map_proptest;
mod cursor;
mod error;
pub mod hash_functions;
pub mod key_eq;
pub mod primes;
mod reentrancy;
mod render;

// Public surface
pub use builder::ChainedHashMapBuilder;
pub use chained_hash_map::{ChainedHashMap, DEFAULT_BUCKETS};
pub use cursor::{BucketCursor, BucketIter, Cursor, Iter, Keys, Values};
pub use error::{CursorError, TableError};
pub use hash_functions::{Fnv1aHash, KeyHasher, PolynomialRollingHash, StdHash};
pub use key_eq::{DefaultEq, KeyEquivalence};
pub use render::Dump;

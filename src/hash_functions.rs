//! Hash functors consumed by `ChainedHashMap`.
//!
//! A hasher maps a key to a `u64` code; the map reduces that code modulo
//! its bucket count. Any `Fn(&K) -> u64` closure is a hasher, as are the
//! two string hashes below and `StdHash`, which adapts a `BuildHasher`.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Maps keys of type `Q` to hash codes.
///
/// Implementations must be deterministic: equal keys (under the map's
/// `KeyEquivalence`) must produce equal codes for the lifetime of the map.
pub trait KeyHasher<Q: ?Sized> {
    fn hash_key(&self, key: &Q) -> u64;
}

impl<Q, F> KeyHasher<Q> for F
where
    Q: ?Sized,
    F: Fn(&Q) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self(key)
    }
}

/// Polynomial rolling hash with base 19.
///
/// Computes `sum(byte_i * p_i)` where `p_0 = 1` and
/// `p_{i+1} = p_i * 19 mod 3298534883309`. Only the running multiplier is
/// reduced; the accumulator wraps over the full `u64` range.
///
/// `byte_i` is the i-th UTF-8 byte of the key taken as an unsigned value in
/// `0..=255`. ASCII keys hash the same as they would by code point, but a
/// non-ASCII character contributes one term per encoded byte, so `"é"`
/// hashes to `0xC3 + 0xA9 * 19` rather than to its code point 233.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PolynomialRollingHash;

impl PolynomialRollingHash {
    pub const BASE: u64 = 19;
    pub const MODULUS: u64 = 3_298_534_883_309;

    pub fn hash_bytes(bytes: &[u8]) -> u64 {
        let mut hash = 0u64;
        let mut p = 1u64;
        for &b in bytes {
            hash = hash.wrapping_add(u64::from(b).wrapping_mul(p));
            // p < MODULUS, so p * BASE stays well inside u64.
            p = (p * Self::BASE) % Self::MODULUS;
        }
        hash
    }
}

impl<Q> KeyHasher<Q> for PolynomialRollingHash
where
    Q: ?Sized + AsRef<str>,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        Self::hash_bytes(key.as_ref().as_bytes())
    }
}

/// 64-bit FNV-1a.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Fnv1aHash;

impl Fnv1aHash {
    pub const OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
    pub const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub fn hash_bytes(bytes: &[u8]) -> u64 {
        bytes.iter().fold(Self::OFFSET_BASIS, |hash, &b| {
            (hash ^ u64::from(b)).wrapping_mul(Self::PRIME)
        })
    }
}

impl<Q> KeyHasher<Q> for Fnv1aHash
where
    Q: ?Sized + AsRef<str>,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        Self::hash_bytes(key.as_ref().as_bytes())
    }
}

/// Adapter from a `BuildHasher` to `KeyHasher` for any `Hash` key.
///
/// The default builder is hashbrown's, which is randomly seeded per
/// instance; clones share the seed, so a cloned map hashes identically.
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = DefaultHashBuilder> {
    build: S,
}

impl<S> StdHash<S> {
    pub fn new(build: S) -> Self {
        Self { build }
    }

    pub fn builder(&self) -> &S {
        &self.build
    }
}

impl<Q, S> KeyHasher<Q> for StdHash<S>
where
    Q: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self.build.hash_one(key)
    }
}

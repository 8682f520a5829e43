//! Per-bucket text dump for diagnostics.

use crate::chain::Chains;
use core::fmt;

/// `Display` adapter returned by `ChainedHashMap::dump`.
///
/// Prints one line per bucket: the bucket index, a colon, then each entry
/// of the chain as ` (key, value)` in chain order.
pub struct Dump<'a, K, V> {
    chains: &'a Chains<K, V>,
}

impl<'a, K, V> Dump<'a, K, V> {
    pub(crate) fn new(chains: &'a Chains<K, V>) -> Self {
        Dump { chains }
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Dump<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.chains.bucket_count() {
            write!(f, "{index}:")?;
            let mut cur = self.chains.bucket_head(index);
            while let Some(node) = cur.and_then(|k| self.chains.node(k)) {
                write!(f, " ({}, {})", node.key, node.value)?;
                cur = node.next;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

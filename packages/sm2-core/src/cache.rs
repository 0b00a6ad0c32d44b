//! # Memoization Cache
//!
//! Optional memo tables for modular inverses, point additions and
//! identity-binding digests.
//!
//! The cache is an explicit object: callers create one, hand it to an
//! [`Sm2Context`](crate::Sm2Context) (or several), and drop it when done.
//! Nothing global is involved, so independent contexts never observe each
//! other's entries.
//!
//! Tables are `DashMap`s (sharded locks) and grow for as long as the cache
//! lives. Whether an entry is present only affects speed; every value stored
//! is exactly what the uncached computation would return.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use num_bigint::BigUint;

use crate::curve::Point;

/// Memo tables shared by curve arithmetic and identity binding
#[derive(Debug, Default)]
pub struct ArithmeticCache {
    /// (value, modulus) → inverse
    inverses: DashMap<(BigUint, BigUint), Option<BigUint>>,
    /// (P, Q) → P + Q
    additions: DashMap<(Point, Point), Point>,
    /// (user id, public key) → ZA
    identities: DashMap<(String, Point), [u8; 32]>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot of cache usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from a table
    pub hits: u64,
    /// Lookups that had to compute
    pub misses: u64,
    /// Stored modular inverses
    pub inverse_entries: usize,
    /// Stored point additions
    pub addition_entries: usize,
    /// Stored identity digests
    pub identity_entries: usize,
}

impl ArithmeticCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized modular inverse
    pub(crate) fn inverse<F>(&self, value: &BigUint, modulus: &BigUint, compute: F) -> Option<BigUint>
    where
        F: FnOnce() -> Option<BigUint>,
    {
        let key = (value.clone(), modulus.clone());
        if let Some(hit) = self.inverses.get(&key) {
            self.record_hit("inverse");
            return hit.value().clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = compute();
        self.inverses.insert(key, result.clone());
        result
    }

    /// Memoized point addition
    pub(crate) fn addition<F>(&self, lhs: &Point, rhs: &Point, compute: F) -> Point
    where
        F: FnOnce() -> Point,
    {
        let key = (lhs.clone(), rhs.clone());
        if let Some(hit) = self.additions.get(&key) {
            self.record_hit("addition");
            return hit.value().clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = compute();
        self.additions.insert(key, result.clone());
        result
    }

    /// Memoized identity digest
    pub(crate) fn identity<F>(&self, user_id: &str, public: &Point, compute: F) -> [u8; 32]
    where
        F: FnOnce() -> [u8; 32],
    {
        let key = (user_id.to_owned(), public.clone());
        if let Some(hit) = self.identities.get(&key) {
            self.record_hit("identity");
            return *hit.value();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = compute();
        self.identities.insert(key, result);
        result
    }

    fn record_hit(&self, table: &'static str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(table, "memo cache hit");
    }

    /// Current usage counters and table sizes
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inverse_entries: self.inverses.len(),
            addition_entries: self.additions.len(),
            identity_entries: self.identities.len(),
        }
    }

    /// Drop every stored entry and reset the counters
    pub fn clear(&self) {
        self.inverses.clear();
        self.additions.clear();
        self.identities.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{mod_inverse, params::base_point, point_add};

    #[test]
    fn test_inverse_memoized() {
        let cache = ArithmeticCache::new();
        let m = BigUint::from(17u32);
        let v = BigUint::from(3u32);

        let first = cache.inverse(&v, &m, || mod_inverse(&v, &m));
        let second = cache.inverse(&v, &m, || panic!("should be cached"));

        assert_eq!(first, second);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inverse_entries, 1);
    }

    #[test]
    fn test_addition_memoized() {
        let cache = ArithmeticCache::new();
        let g = base_point();
        let doubled = cache.addition(g, g, || point_add(g, g));
        let again = cache.addition(g, g, || Point::Infinity);
        assert_eq!(doubled, again);
        assert_eq!(cache.stats().addition_entries, 1);
    }

    #[test]
    fn test_clear_resets() {
        let cache = ArithmeticCache::new();
        cache.identity("alice", base_point(), || [7u8; 32]);
        assert_eq!(cache.stats().identity_entries, 1);

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}

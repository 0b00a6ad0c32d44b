//! # Field and Curve Arithmetic
//!
//! Exact modular arithmetic over the 256-bit prime field and affine point
//! arithmetic on the fixed curve.
//!
//! - [`params`] - Domain parameters `(a, b, p, n, G)`
//! - [`field`] - Modular inverse and reduced add/sub/mul helpers
//! - [`point`] - [`Point`], point addition, scalar multiplication
//!
//! [`CurveOps`] is the handle higher layers use. It performs the same
//! arithmetic as the free functions, optionally routed through an
//! [`ArithmeticCache`].

pub mod field;
pub mod params;
pub mod point;

pub use field::mod_inverse;
pub use params::{base_point, order, params, CurveParams, FIELD_SIZE, POINT_SIZE};
pub use point::{point_add, scalar_multiply, Point};

use num_bigint::BigUint;

use crate::cache::ArithmeticCache;
use crate::error::Result;

/// Arithmetic dispatch, with or without memoization
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveOps<'c> {
    cache: Option<&'c ArithmeticCache>,
}

impl<'c> CurveOps<'c> {
    /// Plain arithmetic, no cache
    pub fn plain() -> Self {
        Self { cache: None }
    }

    /// Arithmetic memoized in `cache`
    pub fn cached(cache: &'c ArithmeticCache) -> Self {
        Self { cache: Some(cache) }
    }

    /// The backing cache, if any
    pub fn cache(&self) -> Option<&'c ArithmeticCache> {
        self.cache
    }

    /// `value⁻¹ mod modulus`
    pub fn inverse(&self, value: &BigUint, modulus: &BigUint) -> Option<BigUint> {
        match self.cache {
            Some(cache) => cache.inverse(value, modulus, || mod_inverse(value, modulus)),
            None => mod_inverse(value, modulus),
        }
    }

    /// `P + Q`
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        match self.cache {
            Some(cache) => cache.addition(lhs, rhs, || {
                point::add_with(lhs, rhs, |v, m| self.inverse(v, m))
            }),
            None => point_add(lhs, rhs),
        }
    }

    /// `k · P`, `k ∈ [1, n-1]`
    pub fn multiply(&self, k: &BigUint, point: &Point) -> Result<Point> {
        point::multiply_with(k, point, |p, q| self.add(p, q))
    }

    /// `k · G`
    pub fn multiply_base(&self, k: &BigUint) -> Result<Point> {
        self.multiply(k, base_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_matches_plain() {
        let cache = ArithmeticCache::new();
        let cached = CurveOps::cached(&cache);
        let plain = CurveOps::plain();

        let k = BigUint::from_bytes_be(b"cached-vs-plain");
        let a = plain.multiply_base(&k).unwrap();
        let b = cached.multiply_base(&k).unwrap();
        let c = cached.multiply_base(&k).unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(cache.stats().hits > 0);
    }

    #[test]
    fn test_multiply_distributes() {
        let ops = CurveOps::plain();
        let p5 = ops.multiply_base(&BigUint::from(5u32)).unwrap();
        let p7 = ops.multiply_base(&BigUint::from(7u32)).unwrap();
        let p12 = ops.multiply_base(&BigUint::from(12u32)).unwrap();
        assert_eq!(ops.add(&p5, &p7), p12);
    }
}

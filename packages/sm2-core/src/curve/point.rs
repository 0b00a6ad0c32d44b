//! # Curve Points
//!
//! Affine points on the fixed curve plus the point at infinity `O`.
//!
//! ## Addition Cases
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        POINT ADDITION  P + Q                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  P = O                 → Q                                              │
//! │  Q = O                 → P                                              │
//! │                                                                         │
//! │  SamePoint     (P = Q, y ≠ 0)                                           │
//! │      λ = (3x² + a) / 2y                                                 │
//! │                                                                         │
//! │  VerticalPair  (same x, otherwise)                                      │
//! │      → O                                                                │
//! │                                                                         │
//! │  GeneralCase   (x₁ ≠ x₂)                                                │
//! │      λ = (y₂ - y₁) / (x₂ - x₁)                                          │
//! │                                                                         │
//! │  x₃ = λ² - x₁ - x₂                                                      │
//! │  y₃ = λ(x₁ - x₃) - y₁                                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use num_bigint::BigUint;
use num_traits::Zero;

use super::field::{add_mod, mod_inverse, mul_mod, neg_mod, sub_mod, to_bytes32};
use super::params::{params, FIELD_SIZE, POINT_SIZE};
use crate::error::{Error, Result};

/// A point on the curve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Point {
    /// The identity element `O`
    Infinity,
    /// An affine point `(x, y)`
    Affine {
        /// x-coordinate in `[0, p)`
        x: BigUint,
        /// y-coordinate in `[0, p)`
        y: BigUint,
    },
}

/// Which addition formula applies to a pair of affine points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdditionCase {
    SamePoint,
    VerticalPair,
    GeneralCase,
}

impl AdditionCase {
    pub(crate) fn classify(x1: &BigUint, y1: &BigUint, x2: &BigUint, y2: &BigUint) -> Self {
        if x1 != x2 {
            AdditionCase::GeneralCase
        } else if y1 == y2 && !y1.is_zero() {
            AdditionCase::SamePoint
        } else {
            AdditionCase::VerticalPair
        }
    }
}

impl Point {
    /// Build an affine point without checking the curve equation
    pub fn affine(x: BigUint, y: BigUint) -> Self {
        Point::Affine { x, y }
    }

    /// Whether this is the identity element
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// The x-coordinate, if affine
    pub fn x(&self) -> Option<&BigUint> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, .. } => Some(x),
        }
    }

    /// The y-coordinate, if affine
    pub fn y(&self) -> Option<&BigUint> {
        match self {
            Point::Infinity => None,
            Point::Affine { y, .. } => Some(y),
        }
    }

    /// Check `y² = x³ + a·x + b (mod p)` with both coordinates in range
    ///
    /// The identity element counts as on the curve.
    pub fn is_on_curve(&self) -> bool {
        match self {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                let params = params();
                let p = &params.p;
                if x >= p || y >= p {
                    return false;
                }
                let lhs = mul_mod(y, y, p);
                let x3 = mul_mod(&mul_mod(x, x, p), x, p);
                let rhs = add_mod(&add_mod(&x3, &mul_mod(&params.a, x, p), p), &params.b, p);
                lhs == rhs
            }
        }
    }

    /// `-P`
    pub fn negate(&self) -> Point {
        match self {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::Affine {
                x: x.clone(),
                y: neg_mod(y, &params().p),
            },
        }
    }

    /// Encode as `x || y`, 32-byte big-endian each
    ///
    /// `O` encodes as 64 zero bytes, which no affine point can produce
    /// because the curve's `b` is non-zero.
    pub fn to_bytes(&self) -> [u8; POINT_SIZE] {
        let mut out = [0u8; POINT_SIZE];
        if let Point::Affine { x, y } = self {
            out[..FIELD_SIZE].copy_from_slice(&to_bytes32(x));
            out[FIELD_SIZE..].copy_from_slice(&to_bytes32(y));
        }
        out
    }

    /// Decode `x || y` without checking the curve equation
    ///
    /// 64 zero bytes decode to [`Point::Infinity`].
    pub fn from_bytes_unchecked(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POINT_SIZE {
            return Err(Error::InvalidPoint(format!(
                "Point must be {} bytes, got {}",
                POINT_SIZE,
                bytes.len()
            )));
        }
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Point::Infinity);
        }
        Ok(Point::Affine {
            x: BigUint::from_bytes_be(&bytes[..FIELD_SIZE]),
            y: BigUint::from_bytes_be(&bytes[FIELD_SIZE..]),
        })
    }

    /// Decode `x || y` and require the result to lie on the curve
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let point = Self::from_bytes_unchecked(bytes)?;
        if !point.is_on_curve() {
            return Err(Error::InvalidPoint("Coordinates do not satisfy the curve equation".into()));
        }
        Ok(point)
    }
}

/// Affine point addition using an injected inverse
///
/// `inverse` computes `v⁻¹ mod p`; it is a parameter so a memoizing caller
/// can route it through a cache.
pub(crate) fn add_with<F>(lhs: &Point, rhs: &Point, inverse: F) -> Point
where
    F: Fn(&BigUint, &BigUint) -> Option<BigUint>,
{
    let (x1, y1, x2, y2) = match (lhs, rhs) {
        (Point::Infinity, _) => return rhs.clone(),
        (_, Point::Infinity) => return lhs.clone(),
        (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
    };

    let params = params();
    let p = &params.p;

    let slope = match AdditionCase::classify(x1, y1, x2, y2) {
        AdditionCase::VerticalPair => return Point::Infinity,
        AdditionCase::SamePoint => {
            let numerator = add_mod(&mul_mod(&(x1 * 3u32), x1, p), &params.a, p);
            let denominator = add_mod(y1, y1, p);
            match inverse(&denominator, p) {
                Some(inv) => mul_mod(&numerator, &inv, p),
                // 2y ≡ 0 only for y = 0, which classify() already routes away
                None => return Point::Infinity,
            }
        }
        AdditionCase::GeneralCase => {
            let numerator = sub_mod(y2, y1, p);
            let denominator = sub_mod(x2, x1, p);
            match inverse(&denominator, p) {
                Some(inv) => mul_mod(&numerator, &inv, p),
                None => return Point::Infinity,
            }
        }
    };

    let x3 = sub_mod(&sub_mod(&mul_mod(&slope, &slope, p), x1, p), x2, p);
    let y3 = sub_mod(&mul_mod(&slope, &sub_mod(x1, &x3, p), p), y1, p);

    Point::Affine { x: x3, y: y3 }
}

/// Double-and-add, least-significant bit first, using an injected addition
pub(crate) fn multiply_with<F>(k: &BigUint, point: &Point, add: F) -> Result<Point>
where
    F: Fn(&Point, &Point) -> Point,
{
    check_scalar(k)?;

    let mut result = Point::Infinity;
    let mut current = point.clone();

    let bits = k.bits();
    for i in 0..bits {
        if k.bit(i) {
            result = add(&result, &current);
        }
        if i + 1 < bits {
            current = add(&current, &current);
        }
    }

    Ok(result)
}

/// Require `k ∈ [1, n-1]`
pub(crate) fn check_scalar(k: &BigUint) -> Result<()> {
    if k.is_zero() || k >= &params().n {
        return Err(Error::InvalidScalar("Scalar must lie in [1, n-1]".into()));
    }
    Ok(())
}

/// `P + Q` on the curve
pub fn point_add(lhs: &Point, rhs: &Point) -> Point {
    add_with(lhs, rhs, mod_inverse)
}

/// `k · P` for `k ∈ [1, n-1]`
///
/// Fails with [`Error::InvalidScalar`] for any other `k`.
pub fn scalar_multiply(k: &BigUint, point: &Point) -> Result<Point> {
    multiply_with(k, point, point_add)
}

//! # Domain Parameters
//!
//! The single fixed curve `y² = x³ + a·x + b (mod p)` this crate works on:
//! the 256-bit prime-field example curve published alongside the SM2
//! standard. Every constant is stored as a 32-byte big-endian array and
//! parsed once into [`CurveParams`].

use num_bigint::BigUint;
use once_cell::sync::Lazy;

use super::point::Point;

/// Size of a field element or scalar in bytes
pub const FIELD_SIZE: usize = 32;

/// Size of an encoded curve point (`x || y`) in bytes
pub const POINT_SIZE: usize = 2 * FIELD_SIZE;

/// Prime modulus `p`
pub const P_BYTES: [u8; FIELD_SIZE] = [
    0x85, 0x42, 0xD6, 0x9E, 0x4C, 0x04, 0x4F, 0x18,
    0xE8, 0xB9, 0x24, 0x35, 0xBF, 0x6F, 0xF7, 0xDE,
    0x45, 0x72, 0x83, 0x91, 0x5C, 0x45, 0x51, 0x7D,
    0x72, 0x2E, 0xDB, 0x8B, 0x08, 0xF1, 0xDF, 0xC3,
];

/// Curve coefficient `a`
pub const A_BYTES: [u8; FIELD_SIZE] = [
    0x78, 0x79, 0x68, 0xB4, 0xFA, 0x32, 0xC3, 0xFD,
    0x24, 0x17, 0x84, 0x2E, 0x73, 0xBB, 0xFE, 0xFF,
    0x2F, 0x3C, 0x84, 0x8B, 0x68, 0x31, 0xD7, 0xE0,
    0xEC, 0x65, 0x22, 0x8B, 0x39, 0x37, 0xE4, 0x98,
];

/// Curve coefficient `b`
pub const B_BYTES: [u8; FIELD_SIZE] = [
    0x63, 0xE4, 0xC6, 0xD3, 0xB2, 0x3B, 0x0C, 0x84,
    0x9C, 0xF8, 0x42, 0x41, 0x48, 0x4B, 0xFE, 0x48,
    0xF6, 0x1D, 0x59, 0xA5, 0xB1, 0x6B, 0xA0, 0x6E,
    0x6E, 0x12, 0xD1, 0xDA, 0x27, 0xC5, 0x24, 0x9A,
];

/// Order `n` of the base point
pub const N_BYTES: [u8; FIELD_SIZE] = [
    0x85, 0x42, 0xD6, 0x9E, 0x4C, 0x04, 0x4F, 0x18,
    0xE8, 0xB9, 0x24, 0x35, 0xBF, 0x6F, 0xF7, 0xDD,
    0x29, 0x77, 0x20, 0x63, 0x04, 0x85, 0x62, 0x8D,
    0x5A, 0xE7, 0x4E, 0xE7, 0xC3, 0x2E, 0x79, 0xB7,
];

/// Base point x-coordinate `Gx`
pub const GX_BYTES: [u8; FIELD_SIZE] = [
    0x42, 0x1D, 0xEB, 0xD6, 0x1B, 0x62, 0xEA, 0xB6,
    0x74, 0x64, 0x34, 0xEB, 0xC3, 0xCC, 0x31, 0x5E,
    0x32, 0x22, 0x0B, 0x3B, 0xAD, 0xD5, 0x0B, 0xDC,
    0x4C, 0x4E, 0x6C, 0x14, 0x7F, 0xED, 0xD4, 0x3D,
];

/// Base point y-coordinate `Gy`
pub const GY_BYTES: [u8; FIELD_SIZE] = [
    0x06, 0x80, 0x51, 0x2B, 0xCB, 0xB4, 0x2C, 0x07,
    0xD4, 0x73, 0x49, 0xD2, 0x15, 0x3B, 0x70, 0xC4,
    0xE5, 0xD7, 0xFD, 0xFC, 0xBF, 0xA3, 0x6E, 0xA1,
    0xA8, 0x58, 0x41, 0xB9, 0xE4, 0x6E, 0x09, 0xA2,
];

const fn is_zero(bytes: &[u8; FIELD_SIZE]) -> bool {
    let mut acc = 0u8;
    let mut i = 0;
    while i < FIELD_SIZE {
        acc |= bytes[i];
        i += 1;
    }
    acc == 0
}

// (0, 0) lies on the curve only when b = 0, so the all-zero encoding is free
// to stand for the point at infinity.
const _: () = assert!(!is_zero(&B_BYTES), "curve coefficient b must be non-zero");

/// Parsed domain parameters
#[derive(Debug, Clone)]
pub struct CurveParams {
    /// Prime modulus of the base field
    pub p: BigUint,
    /// Coefficient `a`
    pub a: BigUint,
    /// Coefficient `b`
    pub b: BigUint,
    /// Group order
    pub n: BigUint,
    /// Base point `G`
    pub g: Point,
}

static PARAMS: Lazy<CurveParams> = Lazy::new(|| CurveParams {
    p: BigUint::from_bytes_be(&P_BYTES),
    a: BigUint::from_bytes_be(&A_BYTES),
    b: BigUint::from_bytes_be(&B_BYTES),
    n: BigUint::from_bytes_be(&N_BYTES),
    g: Point::Affine {
        x: BigUint::from_bytes_be(&GX_BYTES),
        y: BigUint::from_bytes_be(&GY_BYTES),
    },
});

/// The curve's domain parameters
pub fn params() -> &'static CurveParams {
    &PARAMS
}

/// The base point `G`
pub fn base_point() -> &'static Point {
    &PARAMS.g
}

/// The group order `n`
pub fn order() -> &'static BigUint {
    &PARAMS.n
}

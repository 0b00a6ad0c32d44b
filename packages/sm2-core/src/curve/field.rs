//! Modular arithmetic over `Z/pZ` and `Z/nZ`.
//!
//! `BigUint` cannot go negative, so subtraction is always expressed as
//! `a + (m - b)` after reducing both operands. Every helper returns a value
//! already reduced into `[0, modulus)`.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use super::params::FIELD_SIZE;

/// Extended-Euclidean modular inverse
///
/// Returns the unique `x` in `[1, modulus)` with `value · x ≡ 1 (mod modulus)`,
/// or `None` when no inverse exists (`value ≡ 0`, or `value` shares a factor
/// with `modulus`).
pub fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    if modulus.is_zero() {
        return None;
    }

    let reduced = value % modulus;
    if reduced.is_zero() {
        return None;
    }

    let mut low = BigInt::from_biguint(Sign::Plus, reduced);
    let mut high = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let mut lm = BigInt::one();
    let mut hm = BigInt::zero();

    while low > BigInt::one() {
        let ratio = &high / &low;
        let next_m = &hm - &lm * &ratio;
        let next_low = &high - &low * &ratio;
        hm = std::mem::replace(&mut lm, next_m);
        high = std::mem::replace(&mut low, next_low);
    }

    // gcd(value, modulus) != 1
    if low.is_zero() {
        return None;
    }

    let modulus = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let inverse = ((lm % &modulus) + &modulus) % &modulus;
    inverse.to_biguint()
}

/// `(a + b) mod m`
pub fn add_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// `(a - b) mod m`
pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let a = a % m;
    let b = b % m;
    (a + m - b) % m
}

/// `(a · b) mod m`
pub fn mul_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// `-a mod m`
pub fn neg_mod(a: &BigUint, m: &BigUint) -> BigUint {
    sub_mod(&BigUint::zero(), a, m)
}

/// Left-padded 32-byte big-endian encoding
///
/// Callers only pass values already reduced below a 256-bit modulus; wider
/// values keep their low 32 bytes.
pub fn to_bytes32(value: &BigUint) -> [u8; FIELD_SIZE] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; FIELD_SIZE];
    if bytes.len() >= FIELD_SIZE {
        out.copy_from_slice(&bytes[bytes.len() - FIELD_SIZE..]);
    } else {
        out[FIELD_SIZE - bytes.len()..].copy_from_slice(&bytes);
    }
    out
}

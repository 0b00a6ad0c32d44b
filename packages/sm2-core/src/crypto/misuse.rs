//! # Nonce Misuse Analysis
//!
//! Recovers a private key from signatures whose nonce was leaked or reused.
//! Every function here is an attack; they exist to demonstrate why
//! [`sign_with_nonce`](super::signing::sign_with_nonce) must never be fed a
//! predictable or repeated `k`.
//!
//! ## Recoverable Situations
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       NONCE MISUSE → KEY RECOVERY                       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SM2 signing equation:   s·(1 + d) = k - r·d   (mod n)                 │
//! │                                                                         │
//! │  Leaked k                                                              │
//! │    d = (k - s) · (s + r)⁻¹                                             │
//! │                                                                         │
//! │  Same k, same signer, two messages                                     │
//! │    d = (s₂ - s₁) · (s₁ - s₂ + r₁ - r₂)⁻¹                               │
//! │                                                                         │
//! │  Same k, two signers, one key known                                    │
//! │    k  = s_A·(1 + d_A) + r_A·d_A                                        │
//! │    d_B = (k - s_B) · (s_B + r_B)⁻¹                                     │
//! │                                                                         │
//! │  Same k and d, one ECDSA and one SM2 signature                         │
//! │    d = (s₁·s₂ - e₁) · (r₁ - s₁·s₂ - s₁·r₂)⁻¹                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All recovery functions return `None` when the required inverse does not
//! exist (for example, two identical signatures).

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

use super::keys::PrivateKey;
use super::signing::Signature;
use crate::curve::field::{add_mod, mul_mod, sub_mod};
use crate::curve::{mod_inverse, order, CurveOps};
use crate::error::{Error, Result};

/// Textbook ECDSA signature `(r, s)` over the same curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// `(k·G).x mod n`
    pub r: BigUint,
    /// `k⁻¹ · (e + d·r) mod n`
    pub s: BigUint,
}

/// `d = (k - s) · (s + r)⁻¹ mod n`
pub fn recover_from_leaked_nonce(signature: &Signature, k: &BigUint) -> Option<BigUint> {
    let n = order();
    let (r, s) = (signature.r(), signature.s());

    let numerator = sub_mod(k, s, n);
    let denominator = mod_inverse(&add_mod(s, r, n), n)?;
    Some(mul_mod(&numerator, &denominator, n))
}

/// `d = (s₂ - s₁) · (s₁ - s₂ + r₁ - r₂)⁻¹ mod n`
///
/// Both signatures must come from the same key and the same `k`.
pub fn recover_from_reused_nonce(first: &Signature, second: &Signature) -> Option<BigUint> {
    let n = order();
    let (r1, s1) = (first.r(), first.s());
    let (r2, s2) = (second.r(), second.s());

    let numerator = sub_mod(s2, s1, n);
    let denominator = add_mod(&sub_mod(s1, s2, n), &sub_mod(r1, r2, n), n);
    let inverse = mod_inverse(&denominator, n)?;
    Some(mul_mod(&numerator, &inverse, n))
}

/// Recover user B's key from a nonce shared with user A, whose key is known
pub fn recover_across_users(
    known: &PrivateKey,
    known_signature: &Signature,
    target_signature: &Signature,
) -> Option<BigUint> {
    let n = order();
    let d_a = known.scalar();
    let (r_a, s_a) = (known_signature.r(), known_signature.s());

    let k = add_mod(&mul_mod(s_a, &(&d_a + 1u32), n), &mul_mod(r_a, &d_a, n), n);
    recover_from_leaked_nonce(target_signature, &k)
}

/// SHA-256 message digest reduced mod `n`, as used by [`ecdsa_sign_with_nonce`]
pub fn ecdsa_digest(message: &[u8]) -> BigUint {
    let digest = Sha256::digest(message);
    BigUint::from_bytes_be(&digest) % order()
}

/// Textbook ECDSA with a caller-chosen nonce
///
/// ## Errors
///
/// - [`Error::InvalidScalar`] if `k` is outside `[1, n-1]`
/// - [`Error::SigningFailed`] if `k` gives `r = 0` or `s = 0`
pub fn ecdsa_sign_with_nonce(
    private: &PrivateKey,
    message: &[u8],
    k: &BigUint,
) -> Result<EcdsaSignature> {
    let n = order();
    let d = private.scalar();
    let e = ecdsa_digest(message);

    let kg = CurveOps::plain().multiply_base(k)?;
    let x = kg
        .x()
        .ok_or_else(|| Error::SigningFailed("k·G is the point at infinity".into()))?;

    let r = x % n;
    if r.is_zero() {
        return Err(Error::SigningFailed("Supplied nonce gives r = 0".into()));
    }

    let k_inv = mod_inverse(k, n)
        .ok_or_else(|| Error::InvalidScalar("Nonce has no inverse mod n".into()))?;
    let s = mul_mod(&k_inv, &add_mod(&e, &mul_mod(&d, &r, n), n), n);
    if s.is_zero() {
        return Err(Error::SigningFailed("Supplied nonce gives s = 0".into()));
    }

    Ok(EcdsaSignature { r, s })
}

/// Recover `d` from an ECDSA and an SM2 signature sharing both `d` and `k`
///
/// `e1` is the ECDSA digest of the first message (see [`ecdsa_digest`]).
pub fn recover_from_mixed_schemes(
    ecdsa: &EcdsaSignature,
    e1: &BigUint,
    sm2: &Signature,
) -> Option<BigUint> {
    let n = order();
    let (r1, s1) = (&ecdsa.r, &ecdsa.s);
    let (r2, s2) = (sm2.r(), sm2.s());

    let s1s2 = mul_mod(s1, s2, n);
    let numerator = sub_mod(&s1s2, &(e1 % n), n);
    let denominator = sub_mod(&sub_mod(r1, &s1s2, n), &mul_mod(s1, r2, n), n);
    let inverse = mod_inverse(&denominator, n)?;
    Some(mul_mod(&numerator, &inverse, n))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;
    use crate::crypto::signing::{sign_with_nonce, verify};

    const ID: &str = "1234567812345678";

    fn nonce() -> BigUint {
        BigUint::parse_bytes(
            b"6cb28d99385c175c94f94e934817663fc176d925dd72b727260dbaee1fb2f96f",
            16,
        )
        .unwrap()
    }

    fn sign_fixed(kp: &KeyPair, message: &[u8]) -> Signature {
        sign_with_nonce(kp.private(), message, ID, kp.public(), &nonce()).unwrap()
    }

    #[test]
    fn test_leaked_nonce() {
        let kp = KeyPair::generate().unwrap();
        let sig = sign_fixed(&kp, b"message");
        assert!(verify(kp.public(), b"message", ID, &sig));

        let recovered = recover_from_leaked_nonce(&sig, &nonce()).unwrap();
        assert_eq!(recovered, kp.private().scalar());
    }

    #[test]
    fn test_reused_nonce() {
        let kp = KeyPair::generate().unwrap();
        let first = sign_fixed(&kp, b"first message");
        let second = sign_fixed(&kp, b"second message");

        let recovered = recover_from_reused_nonce(&first, &second).unwrap();
        assert_eq!(recovered, kp.private().scalar());
    }

    #[test]
    fn test_reused_nonce_identical_signatures() {
        let kp = KeyPair::generate().unwrap();
        let sig = sign_fixed(&kp, b"same message");
        assert_eq!(recover_from_reused_nonce(&sig, &sig), None);
    }

    #[test]
    fn test_nonce_shared_across_users() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let sig_a = sign_fixed(&alice, b"from alice");
        let sig_b = sign_fixed(&bob, b"from bob");

        let recovered = recover_across_users(alice.private(), &sig_a, &sig_b).unwrap();
        assert_eq!(recovered, bob.private().scalar());
    }

    #[test]
    fn test_ecdsa_signature_verifies() {
        let kp = KeyPair::generate().unwrap();
        let sig = ecdsa_sign_with_nonce(kp.private(), b"ecdsa", &nonce()).unwrap();
        let n = order();
        let ops = CurveOps::plain();

        // u1·G + u2·P must have x ≡ r
        let w = mod_inverse(&sig.s, n).unwrap();
        let u1 = mul_mod(&ecdsa_digest(b"ecdsa"), &w, n);
        let u2 = mul_mod(&sig.r, &w, n);
        let point = ops.add(
            &ops.multiply_base(&u1).unwrap(),
            &ops.multiply(&u2, kp.public().point()).unwrap(),
        );
        assert_eq!(point.x().unwrap() % n, sig.r);
    }

    #[test]
    fn test_mixed_schemes() {
        let kp = KeyPair::generate().unwrap();
        let ecdsa = ecdsa_sign_with_nonce(kp.private(), b"ecdsa message", &nonce()).unwrap();
        let sm2 = sign_fixed(&kp, b"sm2 message");

        let e1 = ecdsa_digest(b"ecdsa message");
        let recovered = recover_from_mixed_schemes(&ecdsa, &e1, &sm2).unwrap();
        assert_eq!(recovered, kp.private().scalar());
    }

    #[test]
    fn test_ecdsa_rejects_zero_nonce() {
        let kp = KeyPair::generate().unwrap();
        assert!(matches!(
            ecdsa_sign_with_nonce(kp.private(), b"m", &BigUint::zero()),
            Err(Error::InvalidScalar(_))
        ));
    }
}

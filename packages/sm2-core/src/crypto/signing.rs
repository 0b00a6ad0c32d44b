//! # Digital Signatures Module
//!
//! SM2 signatures bound to a user identity.
//!
//! ## Signature Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SIGNING FLOW                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  e = SM3(ZA || M)                                                      │
//! │                                                                         │
//! │  loop:                                                                  │
//! │    k ← [1, n-1]                                                        │
//! │    (x₁, _) = k·G                                                       │
//! │    r = (e + x₁) mod n          restart if r = 0 or r + k = n           │
//! │    s = (1 + d)⁻¹ · (k - r·d)   restart if s = 0                        │
//! │                                                                         │
//! │  signature = (r, s)                                                    │
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                       VERIFICATION FLOW                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  reject unless r, s ∈ [1, n-1]                                         │
//! │  t = (r + s) mod n             reject if t = 0                         │
//! │  (x₁, _) = s·G + t·P                                                   │
//! │  accept iff (e + x₁) mod n = r   (constant-time compare)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every restart draws a fresh `k` and recomputes `r` and `s` from scratch.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use super::ct::ct_eq;
use super::identity::message_digest;
use super::keys::{random_scalar, PrivateKey, PublicKey};
use crate::curve::field::{add_mod, mul_mod, sub_mod, to_bytes32};
use crate::curve::{order, CurveOps, FIELD_SIZE};
use crate::error::{Error, Result};

/// Size of an encoded signature (`r || s`) in bytes
pub const SIGNATURE_SIZE: usize = 2 * FIELD_SIZE;

/// An SM2 signature `(r, s)`
///
/// Immutable once produced. Values decoded from bytes are not range-checked;
/// [`verify`] rejects anything outside `[1, n-1]`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Assemble from components
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    /// The `r` component
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The `s` component
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Create from a slice (must be exactly 64 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != SIGNATURE_SIZE {
            return Err(Error::InvalidSignature(format!(
                "Signature must be {} bytes, got {}",
                SIGNATURE_SIZE,
                slice.len()
            )));
        }
        Ok(Self {
            r: BigUint::from_bytes_be(&slice[..FIELD_SIZE]),
            s: BigUint::from_bytes_be(&slice[FIELD_SIZE..]),
        })
    }

    /// Encode as `r || s`, 32-byte big-endian each
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..FIELD_SIZE].copy_from_slice(&to_bytes32(&self.r));
        out[FIELD_SIZE..].copy_from_slice(&to_bytes32(&self.s));
        out
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| Error::InvalidSignature(format!("Invalid signature hex: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("r", &self.r.to_str_radix(16))
            .field("s", &self.s.to_str_radix(16))
            .finish()
    }
}

impl TryFrom<String> for Signature {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Signature> for String {
    fn from(sig: Signature) -> Self {
        sig.to_hex()
    }
}

/// Where the per-signature nonce comes from
#[derive(Clone, Copy)]
enum NonceSource<'a> {
    Random,
    Fixed(&'a BigUint),
}

/// Sign `message` for `user_id`
///
/// `public` must be the public key belonging to `private`; it feeds the
/// identity binding.
///
/// ## Errors
///
/// [`Error::InvalidScalar`] if `private` is `n-1`, the one scalar in range
/// for which `1 + d` has no inverse.
pub fn sign(
    private: &PrivateKey,
    message: &[u8],
    user_id: &str,
    public: &PublicKey,
) -> Result<Signature> {
    sign_with(&CurveOps::plain(), private, message, user_id, public)
}

/// Sign with a caller-chosen nonce `k`
///
/// Exists for nonce-misuse analysis and known-answer tests only. Reusing or
/// leaking `k` discloses the private key (see [`crate::crypto::misuse`]).
///
/// ## Errors
///
/// - [`Error::InvalidScalar`] if `k` or `private` is out of range
/// - [`Error::SigningFailed`] if `k` yields `r = 0`, `r + k = n` or `s = 0`;
///   the call is not retried because that would discard the caller's `k`
pub fn sign_with_nonce(
    private: &PrivateKey,
    message: &[u8],
    user_id: &str,
    public: &PublicKey,
    k: &BigUint,
) -> Result<Signature> {
    sign_with_nonce_with(&CurveOps::plain(), private, message, user_id, public, k)
}

pub(crate) fn sign_with(
    ops: &CurveOps<'_>,
    private: &PrivateKey,
    message: &[u8],
    user_id: &str,
    public: &PublicKey,
) -> Result<Signature> {
    sign_inner(ops, private, message, user_id, public, NonceSource::Random)
}

pub(crate) fn sign_with_nonce_with(
    ops: &CurveOps<'_>,
    private: &PrivateKey,
    message: &[u8],
    user_id: &str,
    public: &PublicKey,
    k: &BigUint,
) -> Result<Signature> {
    sign_inner(ops, private, message, user_id, public, NonceSource::Fixed(k))
}

fn sign_inner(
    ops: &CurveOps<'_>,
    private: &PrivateKey,
    message: &[u8],
    user_id: &str,
    public: &PublicKey,
    nonce: NonceSource<'_>,
) -> Result<Signature> {
    let n = order();
    let d = private.scalar();

    let inv_one_plus_d = ops
        .inverse(&(&d + 1u32), n)
        .ok_or_else(|| Error::InvalidScalar("Private key n-1 cannot sign".into()))?;

    let e = message_digest(ops, user_id, public.point(), message)?;

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let k = match nonce {
            NonceSource::Random => random_scalar(),
            NonceSource::Fixed(k) => k.clone(),
        };

        let kg = ops.multiply_base(&k)?;
        let x1 = kg
            .x()
            .ok_or_else(|| Error::SigningFailed("k·G is the point at infinity".into()))?;

        let r = add_mod(&e, x1, n);
        if r.is_zero() || &(&r + &k) == n {
            if let NonceSource::Fixed(_) = nonce {
                return Err(Error::SigningFailed("Supplied nonce gives a degenerate r".into()));
            }
            tracing::debug!(attempt, "Degenerate r, drawing a fresh nonce");
            continue;
        }

        let s = mul_mod(&inv_one_plus_d, &sub_mod(&k, &mul_mod(&r, &d, n), n), n);
        if s.is_zero() {
            if let NonceSource::Fixed(_) = nonce {
                return Err(Error::SigningFailed("Supplied nonce gives s = 0".into()));
            }
            tracing::debug!(attempt, "Degenerate s, drawing a fresh nonce");
            continue;
        }

        return Ok(Signature { r, s });
    }
}

/// Verify `signature` over `message` for `user_id` under `public`
///
/// Returns `false` for any malformed input instead of an error.
pub fn verify(public: &PublicKey, message: &[u8], user_id: &str, signature: &Signature) -> bool {
    verify_with(&CurveOps::plain(), public, message, user_id, signature)
}

pub(crate) fn verify_with(
    ops: &CurveOps<'_>,
    public: &PublicKey,
    message: &[u8],
    user_id: &str,
    signature: &Signature,
) -> bool {
    let n = order();
    let (r, s) = (&signature.r, &signature.s);

    if r.is_zero() || r >= n || s.is_zero() || s >= n {
        return false;
    }

    let e = match message_digest(ops, user_id, public.point(), message) {
        Ok(e) => e,
        Err(_) => return false,
    };

    let t = add_mod(r, s, n);
    if t.is_zero() {
        return false;
    }

    let (sg, tp) = match (ops.multiply_base(s), ops.multiply(&t, public.point())) {
        (Ok(sg), Ok(tp)) => (sg, tp),
        _ => return false,
    };
    let point = ops.add(&sg, &tp);
    let x1 = match point.x() {
        Some(x) => x,
        None => return false,
    };

    let expected = add_mod(&e, x1, n);
    ct_eq(&to_bytes32(r), &to_bytes32(&expected))
}

/// True when `signature` has both components in `[1, n-1]`
pub fn is_well_formed(signature: &Signature) -> bool {
    let n = order();
    let one = BigUint::one();
    signature.r >= one && &signature.r < n && signature.s >= one && &signature.s < n
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;

    fn hex_int(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    fn unit_keypair() -> KeyPair {
        KeyPair::from_private(PrivateKey::from_scalar(&BigUint::one()).unwrap()).unwrap()
    }

    #[test]
    fn test_sign_verify() {
        let kp = KeyPair::generate().unwrap();
        let message = b"Hello, World!";

        let signature = sign(kp.private(), message, "alice", kp.public()).unwrap();
        assert!(is_well_formed(&signature));
        assert!(verify(kp.public(), message, "alice", &signature));
    }

    #[test]
    fn test_unit_key_scenario() {
        let kp = unit_keypair();

        let signature = sign(kp.private(), b"hello", "alice", kp.public()).unwrap();
        assert!(verify(kp.public(), b"hello", "alice", &signature));
        assert!(!verify(kp.public(), b"hello", "bob", &signature));
    }

    #[test]
    fn test_known_answer() {
        let private = PrivateKey::from_hex(
            "128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263",
        )
        .unwrap();
        let kp = KeyPair::from_private(private).unwrap();
        assert_eq!(
            kp.public().to_hex(),
            "0ae4c7798aa0f119471bee11825be46202bb79e2a5844495e97c04ff4df2548a\
             7c0240f88f1cd4e16352a73c17b7f16f07353e53a176d684a9fe0c6bb798e857"
        );

        let k = hex_int("6cb28d99385c175c94f94e934817663fc176d925dd72b727260dbaee1fb2f96f");
        let signature = sign_with_nonce(
            kp.private(),
            b"message digest",
            "ALICE123@YAHOO.COM",
            kp.public(),
            &k,
        )
        .unwrap();

        assert_eq!(
            signature.r(),
            &hex_int("2bdbf16b77c45fdac73cae8c0436c7cfb2c3ca513e8c45026c2b6a35d4cc86d5")
        );
        assert_eq!(
            signature.s(),
            &hex_int("166fd253969f5fb733a77d48994de588460ef76954051d1c19d718ce638c0919")
        );
        assert!(verify(kp.public(), b"message digest", "ALICE123@YAHOO.COM", &signature));
    }

    #[test]
    fn test_verify_wrong_message_fails() {
        let kp = KeyPair::generate().unwrap();
        let signature = sign(kp.private(), b"Hello, World!", "alice", kp.public()).unwrap();
        assert!(!verify(kp.public(), b"Hello, World?", "alice", &signature));
    }

    #[test]
    fn test_verify_wrong_key_fails() {
        let kp1 = KeyPair::generate().unwrap();
        let kp2 = KeyPair::generate().unwrap();
        let signature = sign(kp1.private(), b"msg", "alice", kp1.public()).unwrap();
        assert!(!verify(kp2.public(), b"msg", "alice", &signature));
    }

    #[test]
    fn test_tampered_components_fail() {
        let kp = KeyPair::generate().unwrap();
        let signature = sign(kp.private(), b"msg", "alice", kp.public()).unwrap();

        let flipped_r = Signature::new(signature.r() ^ BigUint::one(), signature.s().clone());
        let flipped_s = Signature::new(signature.r().clone(), signature.s() ^ BigUint::from(4u32));

        assert!(!verify(kp.public(), b"msg", "alice", &flipped_r));
        assert!(!verify(kp.public(), b"msg", "alice", &flipped_s));
    }

    #[test]
    fn test_out_of_range_components_rejected() {
        let kp = unit_keypair();
        let n = order().clone();
        let one = BigUint::one();

        for sig in [
            Signature::new(BigUint::zero(), one.clone()),
            Signature::new(one.clone(), BigUint::zero()),
            Signature::new(n.clone(), one.clone()),
            Signature::new(one.clone(), n.clone()),
        ] {
            assert!(!is_well_formed(&sig));
            assert!(!verify(kp.public(), b"msg", "alice", &sig));
        }
    }

    #[test]
    fn test_r_plus_s_equal_n_rejected() {
        let kp = unit_keypair();
        let r = BigUint::from(5u32);
        let s = order() - 5u32;
        assert!(!verify(kp.public(), b"msg", "alice", &Signature::new(r, s)));
    }

    #[test]
    fn test_fixed_nonce_out_of_range() {
        let kp = unit_keypair();
        let result = sign_with_nonce(kp.private(), b"msg", "alice", kp.public(), &BigUint::zero());
        assert!(matches!(result, Err(Error::InvalidScalar(_))));
    }

    #[test]
    fn test_largest_private_key_cannot_sign() {
        let private = PrivateKey::from_scalar(&(order() - 1u32)).unwrap();
        let kp = KeyPair::from_private(private).unwrap();
        let result = sign(kp.private(), b"msg", "alice", kp.public());
        assert!(matches!(result, Err(Error::InvalidScalar(_))));
    }

    #[test]
    fn test_signature_serialization() {
        let kp = KeyPair::generate().unwrap();
        let signature = sign(kp.private(), b"test", "alice", kp.public()).unwrap();

        let json = serde_json::to_string(&signature).unwrap();
        let restored: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(signature, restored);

        let restored = Signature::from_hex(&signature.to_hex()).unwrap();
        assert_eq!(signature, restored);
        assert!(Signature::from_slice(&[0u8; 63]).is_err());
    }

    #[test]
    fn test_randomized_signatures() {
        let kp = KeyPair::generate().unwrap();
        let sig1 = sign(kp.private(), b"same", "alice", kp.public()).unwrap();
        let sig2 = sign(kp.private(), b"same", "alice", kp.public()).unwrap();

        // Fresh nonce per signature
        assert_ne!(sig1, sig2);
        assert!(verify(kp.public(), b"same", "alice", &sig1));
        assert!(verify(kp.public(), b"same", "alice", &sig2));
    }
}

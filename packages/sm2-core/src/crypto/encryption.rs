//! # Encryption Module
//!
//! SM2 public-key encryption.
//!
//! ## Encryption Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PUBLIC-KEY ENCRYPTION FLOW                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SENDER (knows recipient public key P)                                 │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  1. k ← [1, n-1]                                                       │
//! │  2. C1 = k·G                                   (64 bytes)              │
//! │  3. (x₂, y₂) = k·P                                                     │
//! │  4. t  = KDF(x₂ || y₂, 8·|M|)                  fail if all zero        │
//! │  5. C2 = M ⊕ t                                 (|M| bytes)             │
//! │  6. C3 = SM3(x₂ || M || y₂)                    (32 bytes)              │
//! │                                                                         │
//! │  RECIPIENT (knows d, P = d·G)                                          │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  1. split C1 || C3 || C2                                               │
//! │  2. (x₂, y₂) = d·C1            (= k·d·G = k·P)                         │
//! │  3. M = C2 ⊕ KDF(x₂ || y₂, 8·|C2|)                                     │
//! │  4. require SM3(x₂ || M || y₂) = C3            (constant-time)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────────────────┬──────────────────┬───────────────────────────┐
//! │  C1: 64 bytes        │  C3: 32 bytes    │  C2: len(plaintext) bytes │
//! │  x || y big-endian   │  SM3 tag         │  plaintext ⊕ keystream    │
//! └──────────────────────┴──────────────────┴───────────────────────────┘
//! ```

use super::ct::ct_eq;
use super::kdf::{derive_key, is_degenerate, sm3_concat, DIGEST_SIZE};
use super::keys::{random_scalar, PrivateKey, PublicKey};
use crate::curve::{CurveOps, Point, FIELD_SIZE, POINT_SIZE};
use crate::error::{Error, Result};

/// Size of the C1 segment in bytes
pub const C1_SIZE: usize = POINT_SIZE;

/// Size of the C3 integrity tag in bytes
pub const C3_SIZE: usize = DIGEST_SIZE;

/// Fixed overhead added to every plaintext (`C1 || C3`)
pub const CIPHERTEXT_OVERHEAD: usize = C1_SIZE + C3_SIZE;

/// A parsed ciphertext `C1 || C3 || C2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    c1: [u8; C1_SIZE],
    c3: [u8; C3_SIZE],
    c2: Vec<u8>,
}

impl Ciphertext {
    /// Split raw bytes into segments
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < CIPHERTEXT_OVERHEAD {
            return Err(Error::CiphertextTooShort {
                len: bytes.len(),
                min: CIPHERTEXT_OVERHEAD,
            });
        }

        let mut c1 = [0u8; C1_SIZE];
        c1.copy_from_slice(&bytes[..C1_SIZE]);
        let mut c3 = [0u8; C3_SIZE];
        c3.copy_from_slice(&bytes[C1_SIZE..CIPHERTEXT_OVERHEAD]);

        Ok(Self {
            c1,
            c3,
            c2: bytes[CIPHERTEXT_OVERHEAD..].to_vec(),
        })
    }

    /// Concatenate `C1 || C3 || C2`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CIPHERTEXT_OVERHEAD + self.c2.len());
        out.extend_from_slice(&self.c1);
        out.extend_from_slice(&self.c3);
        out.extend_from_slice(&self.c2);
        out
    }

    /// Ephemeral point `k·G`
    pub fn c1(&self) -> &[u8; C1_SIZE] {
        &self.c1
    }

    /// Integrity tag
    pub fn c3(&self) -> &[u8; C3_SIZE] {
        &self.c3
    }

    /// Masked payload
    pub fn c2(&self) -> &[u8] {
        &self.c2
    }

    /// Total encoded length, always `96 + plaintext length`
    pub fn len(&self) -> usize {
        CIPHERTEXT_OVERHEAD + self.c2.len()
    }

    /// True when the payload is empty
    pub fn is_empty(&self) -> bool {
        self.c2.is_empty()
    }
}

/// Keystream and tag inputs derived from the shared point `(x₂, y₂)`
struct SharedPoint {
    x2: [u8; FIELD_SIZE],
    y2: [u8; FIELD_SIZE],
}

impl SharedPoint {
    fn new(point: &Point) -> Self {
        let bytes = point.to_bytes();
        let mut x2 = [0u8; FIELD_SIZE];
        let mut y2 = [0u8; FIELD_SIZE];
        x2.copy_from_slice(&bytes[..FIELD_SIZE]);
        y2.copy_from_slice(&bytes[FIELD_SIZE..]);
        Self { x2, y2 }
    }

    fn keystream(&self, len: usize) -> Result<Vec<u8>> {
        let keystream = derive_key(&[&self.x2[..], &self.y2[..]].concat(), len * 8);
        if is_degenerate(&keystream) {
            tracing::debug!(len, "KDF produced an all-zero keystream");
            return Err(Error::KdfDegenerate);
        }
        Ok(keystream)
    }

    fn tag(&self, plaintext: &[u8]) -> [u8; C3_SIZE] {
        sm3_concat(&[&self.x2, plaintext, &self.y2])
    }
}

fn xor(data: &[u8], keystream: &[u8]) -> Vec<u8> {
    data.iter().zip(keystream).map(|(d, k)| d ^ k).collect()
}

/// Encrypt `plaintext` to `public`
///
/// ## Returns
///
/// `C1 || C3 || C2`, exactly `96 + plaintext.len()` bytes
///
/// ## Errors
///
/// - [`Error::InvalidPublicKey`] if `public` is the point at infinity
/// - [`Error::KdfDegenerate`] if the keystream is all zero; retrying draws a
///   fresh ephemeral scalar
pub fn encrypt(public: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    encrypt_with(&CurveOps::plain(), public, plaintext)
}

pub(crate) fn encrypt_with(
    ops: &CurveOps<'_>,
    public: &PublicKey,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    if public.is_identity() {
        return Err(Error::InvalidPublicKey("Cannot encrypt to the point at infinity".into()));
    }

    let k = random_scalar();
    let c1 = ops.multiply_base(&k)?.to_bytes();
    let shared = SharedPoint::new(&ops.multiply(&k, public.point())?);

    let keystream = shared.keystream(plaintext.len())?;
    let c2 = xor(plaintext, &keystream);
    let c3 = shared.tag(plaintext);

    Ok(Ciphertext { c1, c3, c2 }.to_bytes())
}

/// Decrypt `C1 || C3 || C2` with `private`
///
/// ## Errors
///
/// - [`Error::CiphertextTooShort`] below 96 bytes
/// - [`Error::KdfDegenerate`] if the recomputed keystream is all zero
/// - [`Error::TagMismatch`] if the ciphertext was tampered with or the key is
///   wrong; no plaintext is released in that case
pub fn decrypt(private: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    decrypt_with(&CurveOps::plain(), private, ciphertext)
}

pub(crate) fn decrypt_with(
    ops: &CurveOps<'_>,
    private: &PrivateKey,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let parsed = Ciphertext::from_bytes(ciphertext)?;

    // Tampered C1 bytes may land off the curve; the tag check rejects them
    let c1 = Point::from_bytes_unchecked(parsed.c1())?;
    let shared = SharedPoint::new(&ops.multiply(&private.scalar(), &c1)?);

    let keystream = shared.keystream(parsed.c2().len())?;
    let plaintext = xor(parsed.c2(), &keystream);

    if !ct_eq(&shared.tag(&plaintext), parsed.c3()) {
        tracing::debug!("Ciphertext tag mismatch");
        return Err(Error::TagMismatch);
    }

    Ok(plaintext)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;

    #[test]
    fn test_encrypt_decrypt_lengths() {
        let kp = KeyPair::generate().unwrap();

        for len in [0usize, 1, 31, 32, 1000] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
            let ciphertext = encrypt(kp.public(), &plaintext).unwrap();
            assert_eq!(ciphertext.len(), CIPHERTEXT_OVERHEAD + len);

            let decrypted = decrypt(kp.private(), &ciphertext).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_decrypt_known_answer() {
        let private = PrivateKey::from_hex(
            "1649AB77A00637BD5E2EFE283FBF353534AA7F7CB89463F208DDBC2920BB0DA0",
        )
        .unwrap();
        let ciphertext = hex::decode(concat!(
            "245c26fb68b1ddddb12c4b6bf9f2b6d5fe60a383b0d18d1c4144abf17f6252e7",
            "76cb9264c2a7e88e52b19903fdc47378f605e36811f5c07423a24b84400f01b8",
            "9c3d7360c30156fab7c80a0276712da9d8094a634b766d3a285e07480653426d",
            "650053a89b41c418b0c3aad00d886c00286467",
        ))
        .unwrap();

        assert_eq!(ciphertext.len(), CIPHERTEXT_OVERHEAD + 19);
        let plaintext = decrypt(&private, &ciphertext).unwrap();
        assert_eq!(plaintext, b"encryption standard");

        // C3 is SM3(x2 || M || y2); swapping the segments must break it
        let parsed = Ciphertext::from_bytes(&ciphertext).unwrap();
        let mut reordered = parsed.c1().to_vec();
        reordered.extend_from_slice(parsed.c2());
        reordered.extend_from_slice(parsed.c3());
        assert!(decrypt(&private, &reordered).is_err());
    }

    #[test]
    fn test_garbage_c1_rejected() {
        let kp = KeyPair::generate().unwrap();
        let ciphertext = encrypt(kp.public(), b"payload").unwrap();

        for fill in [0x00u8, 0xff, 0x85] {
            let mut tampered = ciphertext.clone();
            tampered[..C1_SIZE].fill(fill);
            assert_eq!(decrypt(kp.private(), &tampered), Err(Error::TagMismatch));
        }
    }

    #[test]
    fn test_ciphertext_is_randomized() {
        let kp = KeyPair::generate().unwrap();
        let c1 = encrypt(kp.public(), b"same").unwrap();
        let c2 = encrypt(kp.public(), b"same").unwrap();
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_tampered_c2_rejected() {
        let kp = KeyPair::generate().unwrap();
        let mut ciphertext = encrypt(kp.public(), b"Secret message").unwrap();
        ciphertext[CIPHERTEXT_OVERHEAD + 3] ^= 0x01;

        assert_eq!(decrypt(kp.private(), &ciphertext), Err(Error::TagMismatch));
    }

    #[test]
    fn test_tampered_c3_rejected() {
        let kp = KeyPair::generate().unwrap();
        let mut ciphertext = encrypt(kp.public(), b"Secret message").unwrap();
        ciphertext[C1_SIZE + 31] ^= 0x80;

        assert_eq!(decrypt(kp.private(), &ciphertext), Err(Error::TagMismatch));
    }

    #[test]
    fn test_tampered_c1_never_accepted() {
        let kp = KeyPair::generate().unwrap();
        let plaintext = b"Secret message";
        let mut ciphertext = encrypt(kp.public(), plaintext).unwrap();
        ciphertext[5] ^= 0x04;

        match decrypt(kp.private(), &ciphertext) {
            Err(Error::TagMismatch) => {}
            Ok(recovered) => assert_ne!(recovered, plaintext.to_vec()),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let alice = KeyPair::generate().unwrap();
        let eve = KeyPair::generate().unwrap();
        let ciphertext = encrypt(alice.public(), b"for alice").unwrap();

        assert_eq!(decrypt(eve.private(), &ciphertext), Err(Error::TagMismatch));
    }

    #[test]
    fn test_short_ciphertext() {
        let kp = KeyPair::generate().unwrap();
        let result = decrypt(kp.private(), &[0u8; CIPHERTEXT_OVERHEAD - 1]);
        assert!(matches!(result, Err(Error::CiphertextTooShort { len: 95, min: 96 })));
    }

    #[test]
    fn test_identity_public_key_rejected() {
        let public = PublicKey::from_point(Point::Infinity);
        assert!(matches!(
            encrypt(&public, b"data"),
            Err(Error::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_ciphertext_segments() {
        let kp = KeyPair::generate().unwrap();
        let bytes = encrypt(kp.public(), b"segments").unwrap();
        let parsed = Ciphertext::from_bytes(&bytes).unwrap();

        assert_eq!(parsed.len(), bytes.len());
        assert_eq!(parsed.c2().len(), 8);
        assert!(Point::from_bytes(parsed.c1()).unwrap().is_on_curve());
        assert_eq!(parsed.to_bytes(), bytes);
    }
}

//! # Key Derivation
//!
//! Counter-mode SM3 key derivation function used by encryption.
//!
//! ## Process
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KEY DERIVATION (KDF)                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  seed = x₂ || y₂   (shared point, 64 bytes)                            │
//! │                                                                         │
//! │  H₁ = SM3(seed || 00 00 00 01)                                         │
//! │  H₂ = SM3(seed || 00 00 00 02)                                         │
//! │  ...                                                                    │
//! │  Hₖ = SM3(seed || ct₃₂(k))       k = ⌈klen / 256⌉                      │
//! │                                                                         │
//! │  K  = (H₁ || H₂ || ... || Hₖ)[0 .. ⌈klen / 8⌉]                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sm3::{Digest, Sm3};

/// Output size of SM3 in bytes
pub const DIGEST_SIZE: usize = 32;

/// SM3 over the concatenation of `parts`
pub(crate) fn sm3_concat(parts: &[&[u8]]) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sm3::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Derive `⌈output_bits / 8⌉` bytes from `seed`
///
/// Deterministic and side-effect free; `output_bits = 0` yields an empty
/// vector.
pub fn derive_key(seed: &[u8], output_bits: usize) -> Vec<u8> {
    let output_len = (output_bits + 7) / 8;
    let mut derived = Vec::with_capacity(output_len + DIGEST_SIZE);

    let mut counter: u32 = 1;
    while derived.len() < output_len {
        let block = sm3_concat(&[seed, &counter.to_be_bytes()]);
        derived.extend_from_slice(&block);
        counter = counter.wrapping_add(1);
    }

    derived.truncate(output_len);
    derived
}

/// True when the keystream carries no key material at all
///
/// An empty keystream (empty plaintext) is not degenerate.
pub(crate) fn is_degenerate(keystream: &[u8]) -> bool {
    !keystream.is_empty() && keystream.iter().all(|&b| b == 0)
}

// ============================================================================
// TESTS
// ============================================================================

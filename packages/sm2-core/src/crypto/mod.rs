//! # Cryptography Module
//!
//! The SM2 schemes built on top of [`crate::curve`].
//!
//! ## Scheme Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    KEYS                                         │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  d ← [1, n-2]  (OsRng)          P = d·G                        │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                          │                                              │
//! │            ┌─────────────┴─────────────┐                               │
//! │            ▼                           ▼                               │
//! │  ┌─────────────────────┐     ┌─────────────────────┐                  │
//! │  │  Signature          │     │  Encryption         │                  │
//! │  │                     │     │                     │                  │
//! │  │ • ZA identity bind  │     │ • Ephemeral k·G     │                  │
//! │  │ • e = SM3(ZA || M)  │     │ • SM3 counter KDF   │                  │
//! │  │ • (r, s) 64 bytes   │     │ • SM3 tag C3        │                  │
//! │  └─────────────────────┘     └─────────────────────┘                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose |
//! |-----------|---------|
//! | SM2 | Signing and public-key encryption |
//! | SM3 | Hash for ZA, message digest, KDF and tag |
//! | SHA-256 | ECDSA comparison in [`misuse`] only |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: The stored bytes of a private key are zeroized when
//!    dropped. `BigUint` working copies made during signing and decryption are
//!    not; they live only for the duration of the call
//! 2. **Constant-Time Comparison**: Signature and tag checks use [`ct_eq`]
//! 3. **Secure Random**: Keys and nonces come from `rand::rngs::OsRng`
//! 4. **Nonce Uniqueness**: A leaked or repeated nonce reveals the key (see [`misuse`])

mod ct;
mod encryption;
mod identity;
mod kdf;
mod keys;
pub mod misuse;
mod signing;

pub use ct::ct_eq;
pub use encryption::{
    decrypt, encrypt, Ciphertext, C1_SIZE, C3_SIZE, CIPHERTEXT_OVERHEAD,
};
pub use identity::{compute_za, DEFAULT_USER_ID, MAX_USER_ID_BYTES};
pub use kdf::{derive_key, DIGEST_SIZE};
pub use keys::{KeyPair, PrivateKey, PublicKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use signing::{is_well_formed, sign, sign_with_nonce, verify, Signature, SIGNATURE_SIZE};

pub(crate) use encryption::{decrypt_with, encrypt_with};
pub(crate) use identity::compute_za_with;
pub(crate) use signing::{sign_with, sign_with_nonce_with, verify_with};

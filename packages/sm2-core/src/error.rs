//! # Error Handling
//!
//! Error types for every SM2 operation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Arithmetic Errors                                                 │
//! │  │   ├── InvalidScalar         - Scalar outside [1, n-1]               │
//! │  │   └── InvalidPoint          - Coordinates not on the curve          │
//! │  │                                                                      │
//! │  ├── Key / Encoding Errors                                             │
//! │  │   ├── InvalidKey            - Malformed key bytes or hex            │
//! │  │   ├── InvalidPublicKey      - Public key is the point at infinity   │
//! │  │   └── InvalidSignature      - Malformed signature bytes or hex      │
//! │  │                                                                      │
//! │  └── Scheme Errors                                                     │
//! │      ├── SigningFailed         - Caller-fixed nonce is degenerate      │
//! │      ├── CiphertextTooShort    - Shorter than C1 || C3                 │
//! │      ├── KdfDegenerate         - Keystream came out all zero           │
//! │      └── TagMismatch           - C3 integrity check failed             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check happens at function entry or on freshly computed values.
//! No key, point or buffer owned by the caller is ever mutated, so a failed
//! call leaves nothing half-done.

use thiserror::Error;

/// Result type alias for SM2 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for SM2 operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Arithmetic Errors (100-199)
    // ========================================================================

    /// A scalar used for multiplication or as a private key is out of range
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// Coordinates do not describe a point on the curve
    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    // ========================================================================
    // Key / Encoding Errors (200-299)
    // ========================================================================

    /// Invalid key format or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The public key is the identity element
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid signature format or length
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),

    // ========================================================================
    // Scheme Errors (300-399)
    // ========================================================================

    /// Signing with a caller-supplied nonce produced a degenerate `r` or `s`
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Ciphertext cannot even hold `C1 || C3`
    #[error("Ciphertext too short: {len} bytes, need at least {min}")]
    CiphertextTooShort {
        /// Length that was supplied
        len: usize,
        /// Minimum accepted length
        min: usize,
    },

    /// The derived keystream is all zero bytes
    #[error("Key derivation produced an all-zero keystream")]
    KdfDegenerate,

    /// The recomputed integrity tag does not match `C3`
    #[error("Ciphertext integrity check failed: tag mismatch")]
    TagMismatch,
}

impl Error {
    /// Get a stable numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Curve arithmetic
    /// - 200-299: Keys and encodings
    /// - 300-399: Signature / encryption scheme
    pub fn code(&self) -> i32 {
        match self {
            // Arithmetic (100-199)
            Error::InvalidScalar(_) => 100,
            Error::InvalidPoint(_) => 101,

            // Keys (200-299)
            Error::InvalidKey(_) => 200,
            Error::InvalidPublicKey(_) => 201,
            Error::InvalidSignature(_) => 202,

            // Scheme (300-399)
            Error::SigningFailed(_) => 300,
            Error::CiphertextTooShort { .. } => 301,
            Error::KdfDegenerate => 302,
            Error::TagMismatch => 303,
        }
    }

    /// Check if the failed call may succeed when repeated
    ///
    /// Only a degenerate keystream during encryption qualifies: a fresh
    /// ephemeral scalar yields a different keystream. During decryption the
    /// same error is final, since the inputs fully determine the keystream.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::KdfDegenerate)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidScalar("test".into()).code(), 100);
        assert_eq!(Error::InvalidKey("test".into()).code(), 200);
        assert_eq!(Error::SigningFailed("test".into()).code(), 300);
        assert_eq!(Error::TagMismatch.code(), 303);
        assert_eq!(Error::CiphertextTooShort { len: 0, min: 96 }.code(), 301);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(Error::KdfDegenerate.is_retryable());
        assert!(!Error::TagMismatch.is_retryable());
        assert!(!Error::CiphertextTooShort { len: 3, min: 96 }.is_retryable());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::CiphertextTooShort { len: 10, min: 96 };
        assert!(err.to_string().contains("10 bytes"));

        let err = Error::InvalidPublicKey("Public key is the point at infinity".into());
        assert_eq!(err.to_string(), "Invalid public key: Public key is the point at infinity");
    }
}

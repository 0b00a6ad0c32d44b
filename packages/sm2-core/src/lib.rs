//! # SM2 Core
//!
//! SM2 elliptic-curve signatures and public-key encryption over the
//! 256-bit prime-field example curve, with SM3 as the hash.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SM2 CORE MODULES                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        Sm2Context                                │  │
//! │  │          config + optional Arc<ArithmeticCache>                  │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │                                       │
//! │  ┌─────────────┐  ┌─────────────┴──┐  ┌─────────────┐  ┌────────────┐  │
//! │  │    Keys     │  │   Signature    │  │ Encryption  │  │   Misuse   │  │
//! │  │             │  │                │  │             │  │            │  │
//! │  │ - Generate  │  │ - ZA binding   │  │ - C1 C3 C2  │  │ - Leaked k │  │
//! │  │ - Encode    │  │ - Sign/Verify  │  │ - SM3 KDF   │  │ - Reused k │  │
//! │  └──────┬──────┘  └───────┬────────┘  └──────┬──────┘  └─────┬──────┘  │
//! │         │                 │                  │               │         │
//! │         └─────────────────┴────────┬─────────┴───────────────┘         │
//! │                                    │                                    │
//! │  ┌─────────────────────────────────┴───┐  ┌─────────────────────────┐  │
//! │  │           Curve                     │  │         Cache           │  │
//! │  │                                     │◄─┤                         │  │
//! │  │ - Field inverse / reduce            │  │ - inverses              │  │
//! │  │ - Point add, k·P                    │  │ - additions             │  │
//! │  │ - Domain parameters                 │  │ - ZA digests            │  │
//! │  └─────────────────────────────────────┘  └─────────────────────────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`curve`] - Field and point arithmetic, domain parameters
//! - [`crypto`] - Keys, KDF, identity binding, signatures, encryption
//! - [`cache`] - Optional memoization of pure arithmetic
//! - [`context`] - [`Sm2Context`], the configured entry point
//!
//! ## Example
//!
//! ```
//! use sm2_core::{Sm2Config, Sm2Context, DEFAULT_USER_ID};
//!
//! let ctx = Sm2Context::new(Sm2Config::default());
//! let keypair = ctx.generate_keypair()?;
//!
//! let signature = ctx.sign(&keypair, b"hello", DEFAULT_USER_ID)?;
//! assert!(ctx.verify(keypair.public(), b"hello", DEFAULT_USER_ID, &signature));
//!
//! let ciphertext = ctx.encrypt(keypair.public(), b"secret")?;
//! assert_eq!(ctx.decrypt(keypair.private(), &ciphertext)?, b"secret");
//! # Ok::<(), sm2_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod cache;
pub mod context;
pub mod crypto;
pub mod curve;
pub mod error;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use cache::{ArithmeticCache, CacheStats};
pub use context::{Sm2Config, Sm2Context};
pub use crypto::{
    decrypt, encrypt, sign, verify, Ciphertext, KeyPair, PrivateKey, PublicKey, Signature,
    DEFAULT_USER_ID,
};
pub use curve::Point;
pub use error::{Error, Result};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of SM2 Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

//! # Key Management
//!
//! Key generation, encoding and validation.
//!
//! ## Key Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY TYPES                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PrivateKey                                                     │   │
//! │  │  ──────────                                                      │   │
//! │  │  • Scalar d ∈ [1, n-1], 32 bytes big-endian                     │   │
//! │  │  • Kept secret, zeroized on drop                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PublicKey                                                      │   │
//! │  │  ─────────                                                       │   │
//! │  │  • Point P = d·G, 64 bytes (x || y)                             │   │
//! │  │  • Shared freely, serializes as hex                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  KeyPair                                                        │   │
//! │  │  ───────                                                         │   │
//! │  │  Both halves, with P = d·G guaranteed at construction.          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::curve::field::to_bytes32;
use crate::curve::{order, CurveOps, Point, FIELD_SIZE, POINT_SIZE};
use crate::error::{Error, Result};

/// Size of an encoded private key in bytes
pub const PRIVATE_KEY_SIZE: usize = FIELD_SIZE;

/// Size of an encoded public key in bytes
pub const PUBLIC_KEY_SIZE: usize = POINT_SIZE;

/// Uniform scalar in `[1, n-1]` from the OS generator
pub(crate) fn random_scalar() -> BigUint {
    OsRng.gen_biguint_range(&BigUint::one(), order())
}

/// Private signing / decryption scalar `d`
///
/// ## Security
///
/// - The bytes are zeroized when this struct is dropped
/// - `Debug` never prints the scalar
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_SIZE],
}

impl PrivateKey {
    /// Create from a scalar, requiring `d ∈ [1, n-1]`
    pub fn from_scalar(d: &BigUint) -> Result<Self> {
        if d < &BigUint::one() || d >= order() {
            return Err(Error::InvalidScalar("Private key must lie in [1, n-1]".into()));
        }
        Ok(Self { bytes: to_bytes32(d) })
    }

    /// Create from 32 big-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(Error::InvalidKey(format!(
                "Private key must be {} bytes, got {}",
                PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }
        Self::from_scalar(&BigUint::from_bytes_be(bytes))
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let mut bytes = hex::decode(hex_str.trim())
            .map_err(|e| Error::InvalidKey(format!("Invalid hex: {}", e)))?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// The scalar `d`
    ///
    /// ## Security Warning
    ///
    /// The returned `BigUint` is a copy that is not zeroized on drop. Keep it
    /// short-lived and never store it.
    pub fn scalar(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }

    /// Get the secret key bytes (for backup/storage)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit these bytes.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.bytes
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// `d · G`
    pub fn public_key(&self) -> Result<PublicKey> {
        self.public_key_with(&CurveOps::plain())
    }

    pub(crate) fn public_key_with(&self, ops: &CurveOps<'_>) -> Result<PublicKey> {
        let point = ops.multiply_base(&self.scalar())?;
        Ok(PublicKey { point })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Public key `P = d·G`
///
/// This contains only public information and can be serialized,
/// transmitted, and stored without security concerns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    point: Point,
}

impl PublicKey {
    /// Wrap a point as a public key without validation
    ///
    /// Operations that cannot accept the identity element (encryption)
    /// check for it themselves.
    pub fn from_point(point: Point) -> Self {
        Self { point }
    }

    /// Decode `x || y`; the point must lie on the curve and not be `O`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(Error::InvalidKey(format!(
                "Public key must be {} bytes, got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            )));
        }
        let point = Point::from_bytes(bytes)
            .map_err(|e| Error::InvalidKey(format!("Invalid public key: {}", e)))?;
        if point.is_infinity() {
            return Err(Error::InvalidPublicKey("Public key is the point at infinity".into()));
        }
        Ok(Self { point })
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| Error::InvalidKey(format!("Invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// The underlying point
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Whether the key is the identity element
    pub fn is_identity(&self) -> bool {
        self.point.is_infinity()
    }

    /// Encode as `x || y`
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.point.to_bytes()
    }

    /// Encode as hex string (for display)
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl TryFrom<String> for PublicKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

/// Private key together with its public key
///
/// Never mutated after creation; `public == private · G` always holds.
#[derive(Clone)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a new random keypair
    ///
    /// `d` is drawn uniformly from `[1, n-2]` using the operating system's
    /// secure random number generator, so every generated key can sign.
    pub fn generate() -> Result<Self> {
        Self::generate_with(&CurveOps::plain())
    }

    pub(crate) fn generate_with(ops: &CurveOps<'_>) -> Result<Self> {
        let upper = order() - 1u32;
        let d = OsRng.gen_biguint_range(&BigUint::one(), &upper);
        let private = PrivateKey::from_scalar(&d)?;
        let keypair = Self::from_private_with(private, ops)?;
        tracing::debug!(public_key = %keypair.public.to_hex(), "Generated keypair");
        Ok(keypair)
    }

    /// Rebuild a keypair from its private half
    pub fn from_private(private: PrivateKey) -> Result<Self> {
        Self::from_private_with(private, &CurveOps::plain())
    }

    pub(crate) fn from_private_with(private: PrivateKey, ops: &CurveOps<'_>) -> Result<Self> {
        let public = private.public_key_with(ops)?;
        Ok(Self { private, public })
    }

    /// The private key
    pub fn private(&self) -> &PrivateKey {
        &self.private
    }

    /// The public key
    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public.to_hex())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================

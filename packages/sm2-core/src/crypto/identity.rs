//! # Identity Binding (ZA)
//!
//! Binds a user identifier and public key to the curve parameters so that a
//! signature made for one identity cannot be replayed under another.
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ZA = SM3( ENTL || ID || a || b || Gx || Gy || Px || Py )               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ENTL   2 bytes   bit length of ID, big-endian                         │
//! │  ID     var       UTF-8 bytes of the user identifier                   │
//! │  a, b   32 bytes  curve coefficients                                   │
//! │  Gx,Gy  32 bytes  base point                                           │
//! │  Px,Py  32 bytes  signer's public key                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use num_bigint::BigUint;

use super::kdf::{sm3_concat, DIGEST_SIZE};
use crate::curve::params::{A_BYTES, B_BYTES, GX_BYTES, GY_BYTES};
use crate::curve::{CurveOps, Point};
use crate::error::{Error, Result};

/// Conventional identifier used when a caller has no better one
pub const DEFAULT_USER_ID: &str = "1234567812345678";

/// Longest identifier whose bit length still fits the 2-byte ENTL prefix
pub const MAX_USER_ID_BYTES: usize = (u16::MAX as usize) / 8;

fn check_user_id(user_id: &str) -> Result<()> {
    let len = user_id.len();
    if len > MAX_USER_ID_BYTES {
        return Err(Error::InvalidKey(format!(
            "User id is {} bytes, at most {} supported",
            len, MAX_USER_ID_BYTES
        )));
    }
    Ok(())
}

/// Serialize the ZA preimage; `user_id` must already pass `check_user_id`
fn za_preimage(user_id: &str, public: &Point) -> Vec<u8> {
    let id = user_id.as_bytes();
    let entl = (id.len() * 8) as u16;

    let mut data = Vec::with_capacity(2 + id.len() + 6 * 32);
    data.extend_from_slice(&entl.to_be_bytes());
    data.extend_from_slice(id);
    data.extend_from_slice(&A_BYTES);
    data.extend_from_slice(&B_BYTES);
    data.extend_from_slice(&GX_BYTES);
    data.extend_from_slice(&GY_BYTES);
    data.extend_from_slice(&public.to_bytes());
    data
}

/// `ZA(user_id, public)`
pub fn compute_za(user_id: &str, public: &Point) -> Result<[u8; DIGEST_SIZE]> {
    compute_za_with(&CurveOps::plain(), user_id, public)
}

/// `ZA(user_id, public)`, memoized when `ops` carries a cache
pub(crate) fn compute_za_with(
    ops: &CurveOps<'_>,
    user_id: &str,
    public: &Point,
) -> Result<[u8; DIGEST_SIZE]> {
    check_user_id(user_id)?;
    let digest = || sm3_concat(&[&za_preimage(user_id, public)]);
    Ok(match ops.cache() {
        Some(cache) => cache.identity(user_id, public, digest),
        None => digest(),
    })
}

/// Message digest `e = SM3(ZA || M)` as an integer
pub(crate) fn message_digest(
    ops: &CurveOps<'_>,
    user_id: &str,
    public: &Point,
    message: &[u8],
) -> Result<BigUint> {
    let za = compute_za_with(ops, user_id, public)?;
    let e = sm3_concat(&[&za, message]);
    Ok(BigUint::from_bytes_be(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ArithmeticCache;
    use crate::curve::params::base_point;

    fn hex_point(x: &str, y: &str) -> Point {
        Point::affine(
            BigUint::parse_bytes(x.as_bytes(), 16).unwrap(),
            BigUint::parse_bytes(y.as_bytes(), 16).unwrap(),
        )
    }

    #[test]
    fn test_preimage_layout() {
        let data = za_preimage("alice", base_point());
        assert_eq!(data.len(), 2 + 5 + 6 * 32);
        assert_eq!(&data[..2], &[0x00, 0x28]);
        assert_eq!(&data[2..7], b"alice");
    }

    #[test]
    fn test_published_za_vector() {
        let public = hex_point(
            "0ae4c7798aa0f119471bee11825be46202bb79e2a5844495e97c04ff4df2548a",
            "7c0240f88f1cd4e16352a73c17b7f16f07353e53a176d684a9fe0c6bb798e857",
        );
        let za = compute_za("ALICE123@YAHOO.COM", &public).unwrap();
        assert_eq!(
            hex::encode(za),
            "f4a38489e32b45b6f876e3ac2168ca392362dc8f23459c1d1146fc3dbfb7bc9a"
        );
    }

    #[test]
    fn test_za_depends_on_identity() {
        let g = base_point();
        assert_ne!(compute_za("alice", g).unwrap(), compute_za("bob", g).unwrap());
        assert_eq!(compute_za("alice", g).unwrap(), compute_za("alice", g).unwrap());
    }

    #[test]
    fn test_za_cached_matches_plain() {
        let cache = ArithmeticCache::new();
        let ops = CurveOps::cached(&cache);
        let g = base_point();

        let plain = compute_za("alice", g).unwrap();
        assert_eq!(compute_za_with(&ops, "alice", g).unwrap(), plain);
        assert_eq!(compute_za_with(&ops, "alice", g).unwrap(), plain);
        assert_eq!(cache.stats().identity_entries, 1);
    }

    #[test]
    fn test_oversized_user_id_rejected() {
        let id = "x".repeat(MAX_USER_ID_BYTES + 1);
        assert!(compute_za(&id, base_point()).is_err());
    }
}

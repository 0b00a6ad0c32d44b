//! # SM2 Context
//!
//! An owned handle bundling configuration with the optional memoization
//! cache. Every scheme operation is available here; the free functions in
//! [`crate::crypto`] are the same operations without a cache.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CONTEXT SHARING                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   Sm2Context::new(Sm2Config { memoize: true })                          │
//! │          │                                                              │
//! │          ├── clone() ──► thread A ─┐                                    │
//! │          ├── clone() ──► thread B ─┼──► Arc<ArithmeticCache>            │
//! │          └── clone() ──► thread C ─┘    (DashMap tables)                │
//! │                                                                         │
//! │   Sm2Context::new(Sm2Config::default())  → no cache, plain arithmetic   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use num_bigint::BigUint;

use crate::cache::{ArithmeticCache, CacheStats};
use crate::crypto::{self, KeyPair, PrivateKey, PublicKey, Signature};
use crate::curve::CurveOps;
use crate::error::Result;

/// Configuration for an [`Sm2Context`]
#[derive(Debug, Clone, Default)]
pub struct Sm2Config {
    /// Memoize inverses, point additions and ZA digests
    pub memoize: bool,
}

/// Entry point for SM2 operations
///
/// Cheap to clone; clones share the same cache.
#[derive(Debug, Clone, Default)]
pub struct Sm2Context {
    cache: Option<Arc<ArithmeticCache>>,
}

impl Sm2Context {
    /// Create a context from `config`
    pub fn new(config: Sm2Config) -> Self {
        let cache = config.memoize.then(|| Arc::new(ArithmeticCache::new()));
        tracing::debug!(memoize = config.memoize, "Created SM2 context");
        Self { cache }
    }

    /// Create a memoizing context backed by an existing cache
    pub fn with_cache(cache: Arc<ArithmeticCache>) -> Self {
        Self { cache: Some(cache) }
    }

    fn ops(&self) -> CurveOps<'_> {
        match &self.cache {
            Some(cache) => CurveOps::cached(cache),
            None => CurveOps::plain(),
        }
    }

    /// Generate a fresh keypair
    pub fn generate_keypair(&self) -> Result<KeyPair> {
        KeyPair::generate_with(&self.ops())
    }

    /// Rebuild a keypair from its private half
    pub fn keypair_from_private(&self, private: PrivateKey) -> Result<KeyPair> {
        KeyPair::from_private_with(private, &self.ops())
    }

    /// `ZA(user_id, public)`
    pub fn compute_za(&self, user_id: &str, public: &PublicKey) -> Result<[u8; 32]> {
        crypto::compute_za_with(&self.ops(), user_id, public.point())
    }

    /// Sign `message` with `keypair` for `user_id`
    pub fn sign(&self, keypair: &KeyPair, message: &[u8], user_id: &str) -> Result<Signature> {
        crypto::sign_with(
            &self.ops(),
            keypair.private(),
            message,
            user_id,
            keypair.public(),
        )
    }

    /// Sign with a caller-chosen nonce; see [`crypto::sign_with_nonce`]
    pub fn sign_with_nonce(
        &self,
        keypair: &KeyPair,
        message: &[u8],
        user_id: &str,
        k: &BigUint,
    ) -> Result<Signature> {
        crypto::sign_with_nonce_with(
            &self.ops(),
            keypair.private(),
            message,
            user_id,
            keypair.public(),
            k,
        )
    }

    /// Verify `signature` over `message`
    pub fn verify(
        &self,
        public: &PublicKey,
        message: &[u8],
        user_id: &str,
        signature: &Signature,
    ) -> bool {
        crypto::verify_with(&self.ops(), public, message, user_id, signature)
    }

    /// Encrypt `plaintext` to `public`
    pub fn encrypt(&self, public: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        crypto::encrypt_with(&self.ops(), public, plaintext)
    }

    /// Decrypt `ciphertext` with `private`
    pub fn decrypt(&self, private: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
        crypto::decrypt_with(&self.ops(), private, ciphertext)
    }

    /// Whether this context memoizes
    pub fn is_memoized(&self) -> bool {
        self.cache.is_some()
    }

    /// Usage statistics, `None` without a cache
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const ID: &str = "1234567812345678";

    fn memoized() -> Sm2Context {
        Sm2Context::new(Sm2Config { memoize: true })
    }

    #[test]
    fn test_default_is_plain() {
        let ctx = Sm2Context::new(Sm2Config::default());
        assert!(!ctx.is_memoized());
        assert_eq!(ctx.cache_stats(), None);
    }

    #[test]
    fn test_sign_verify_through_context() {
        let ctx = memoized();
        let kp = ctx.generate_keypair().unwrap();

        let sig = ctx.sign(&kp, b"hello", ID).unwrap();
        assert!(ctx.verify(kp.public(), b"hello", ID, &sig));
        assert!(!ctx.verify(kp.public(), b"hellp", ID, &sig));

        let stats = ctx.cache_stats().unwrap();
        assert!(stats.misses > 0);
        assert_eq!(stats.identity_entries, 1);
        assert!(stats.hits > 0);
    }

    #[test]
    fn test_memoized_matches_plain() {
        let plain = Sm2Context::default();
        let cached = memoized();
        let kp = plain.generate_keypair().unwrap();
        let k = BigUint::from(0x1234_5678u32);

        let a = plain.sign_with_nonce(&kp, b"msg", ID, &k).unwrap();
        let b = cached.sign_with_nonce(&kp, b"msg", ID, &k).unwrap();
        let c = cached.sign_with_nonce(&kp, b"msg", ID, &k).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);

        assert_eq!(
            plain.compute_za(ID, kp.public()).unwrap(),
            cached.compute_za(ID, kp.public()).unwrap()
        );
    }

    #[test]
    fn test_cross_context_interop() {
        let plain = Sm2Context::default();
        let cached = memoized();
        let kp = cached.generate_keypair().unwrap();

        let sig = cached.sign(&kp, b"interop", ID).unwrap();
        assert!(plain.verify(kp.public(), b"interop", ID, &sig));

        let ciphertext = plain.encrypt(kp.public(), b"interop").unwrap();
        assert_eq!(cached.decrypt(kp.private(), &ciphertext).unwrap(), b"interop");
    }

    #[test]
    fn test_shared_cache() {
        let cache = Arc::new(ArithmeticCache::new());
        let a = Sm2Context::with_cache(Arc::clone(&cache));
        let b = Sm2Context::with_cache(Arc::clone(&cache));

        let kp = a.generate_keypair().unwrap();
        a.compute_za(ID, kp.public()).unwrap();
        b.compute_za(ID, kp.public()).unwrap();

        assert_eq!(cache.stats().identity_entries, 1);
        assert_eq!(a.cache_stats(), b.cache_stats());
    }

    #[test]
    fn test_concurrent_memoized_use() {
        let ctx = memoized();
        let kp = ctx.generate_keypair().unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let ctx = ctx.clone();
                let kp = kp.clone();
                thread::spawn(move || {
                    let message = format!("message {}", i);
                    let sig = ctx.sign(&kp, message.as_bytes(), ID).unwrap();
                    assert!(ctx.verify(kp.public(), message.as_bytes(), ID, &sig));

                    let ciphertext = ctx.encrypt(kp.public(), message.as_bytes()).unwrap();
                    let plaintext = ctx.decrypt(kp.private(), &ciphertext).unwrap();
                    assert_eq!(plaintext, message.as_bytes());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ctx.cache_stats().unwrap().identity_entries, 1);
    }
}

//! # Nonce Misuse Demo
//!
//! Shows how a leaked or reused signing nonce discloses the private key.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example nonce_reuse_demo
//! ```

use num_bigint::BigUint;
use sm2_core::crypto::misuse::{
    ecdsa_digest, ecdsa_sign_with_nonce, recover_across_users, recover_from_leaked_nonce,
    recover_from_mixed_schemes, recover_from_reused_nonce,
};
use sm2_core::crypto::{sign_with_nonce, KeyPair, DEFAULT_USER_ID};

fn report(label: &str, recovered: Option<BigUint>, expected: &BigUint) {
    match recovered {
        Some(d) if &d == expected => println!("  [OK] {}: recovered d = {:x}", label, d),
        Some(d) => println!("  [FAILED] {}: wrong value {:x}", label, d),
        None => println!("  [FAILED] {}: no inverse", label),
    }
}

fn main() {
    println!("=== SM2 Core: Nonce Misuse Demo ===\n");

    let alice = KeyPair::generate().expect("Failed to create keypair");
    let bob = KeyPair::generate().expect("Failed to create keypair");
    let d_alice = alice.private().scalar();
    let d_bob = bob.private().scalar();

    // A nonce that should have been random
    let k = BigUint::from(0xdead_beef_u64);
    println!("Fixed nonce k = {:x}\n", k);

    // Scenario 1: k leaks
    println!("Scenario 1: Leaked nonce");
    let sig = sign_with_nonce(alice.private(), b"hello", DEFAULT_USER_ID, alice.public(), &k)
        .expect("Failed to sign");
    report("leaked k", recover_from_leaked_nonce(&sig, &k), &d_alice);
    println!();

    // Scenario 2: same k for two messages
    println!("Scenario 2: Reused nonce, same signer");
    let sig1 = sign_with_nonce(alice.private(), b"first", DEFAULT_USER_ID, alice.public(), &k)
        .expect("Failed to sign");
    let sig2 = sign_with_nonce(alice.private(), b"second", DEFAULT_USER_ID, alice.public(), &k)
        .expect("Failed to sign");
    report("reused k", recover_from_reused_nonce(&sig1, &sig2), &d_alice);
    println!();

    // Scenario 3: two users share k
    println!("Scenario 3: Shared nonce across users");
    let sig_a = sign_with_nonce(alice.private(), b"alice", DEFAULT_USER_ID, alice.public(), &k)
        .expect("Failed to sign");
    let sig_b = sign_with_nonce(bob.private(), b"bob", DEFAULT_USER_ID, bob.public(), &k)
        .expect("Failed to sign");
    println!("  Alice (who knows her own key) attacks Bob...");
    report(
        "Bob's key",
        recover_across_users(alice.private(), &sig_a, &sig_b),
        &d_bob,
    );
    println!();

    // Scenario 4: same d and k in ECDSA and SM2
    println!("Scenario 4: Same key and nonce in ECDSA and SM2");
    let ecdsa = ecdsa_sign_with_nonce(alice.private(), b"ecdsa", &k).expect("Failed to sign");
    let sm2 = sign_with_nonce(alice.private(), b"sm2", DEFAULT_USER_ID, alice.public(), &k)
        .expect("Failed to sign");
    report(
        "mixed schemes",
        recover_from_mixed_schemes(&ecdsa, &ecdsa_digest(b"ecdsa"), &sm2),
        &d_alice,
    );
    println!();

    println!("=== Example Complete ===");
}

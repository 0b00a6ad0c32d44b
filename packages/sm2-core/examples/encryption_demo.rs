//! # Public-Key Encryption Demo
//!
//! Demonstrates SM2 encryption, the ciphertext layout and tamper detection.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example encryption_demo
//! ```

use sm2_core::{Ciphertext, Error, Sm2Config, Sm2Context};

fn main() {
    println!("=== SM2 Core: Encryption Demo ===\n");

    // Step 1: Recipient creates a keypair
    println!("Step 1: Bob creates a keypair...");

    let ctx = Sm2Context::new(Sm2Config { memoize: true });
    let bob = ctx.generate_keypair().expect("Failed to create keypair");

    println!("  Bob's public key: {}...", &bob.public().to_hex()[..32]);
    println!();

    // Step 2: Alice encrypts to Bob's public key
    println!("Step 2: Alice encrypts a message for Bob...");

    let plaintext = b"Meet at the usual place at noon.";
    let ciphertext = ctx
        .encrypt(bob.public(), plaintext)
        .expect("Failed to encrypt");

    println!("  Plaintext:  \"{}\"", String::from_utf8_lossy(plaintext));
    println!("  Plaintext length:  {} bytes", plaintext.len());
    println!("  Ciphertext length: {} bytes", ciphertext.len());
    println!();

    // Step 3: Show the layout
    println!("Step 3: Ciphertext layout (C1 || C3 || C2)");

    let parsed = Ciphertext::from_bytes(&ciphertext).expect("Failed to parse ciphertext");
    println!("  C1 (k·G, 64 bytes):  {}...", hex::encode(&parsed.c1()[..16]));
    println!("  C3 (tag, 32 bytes):  {}...", hex::encode(&parsed.c3()[..16]));
    println!("  C2 ({} bytes):       {}...", parsed.c2().len(), hex::encode(&parsed.c2()[..16]));
    println!();

    // Step 4: Bob decrypts
    println!("Step 4: Bob decrypts...");

    let decrypted = ctx
        .decrypt(bob.private(), &ciphertext)
        .expect("Failed to decrypt");
    println!("  Decrypted: \"{}\"", String::from_utf8_lossy(&decrypted));
    println!(
        "  Match: {}",
        if decrypted == plaintext { "[OK]" } else { "[FAILED]" }
    );
    println!();

    // Step 5: Tamper detection
    println!("Step 5: Tamper detection...");

    let mut tampered = ciphertext.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;
    match ctx.decrypt(bob.private(), &tampered) {
        Err(Error::TagMismatch) => println!("  [OK] Modified C2 rejected"),
        other => println!("  [FAILED] Unexpected result: {:?}", other),
    }

    let eve = ctx.generate_keypair().expect("Failed to create keypair");
    match ctx.decrypt(eve.private(), &ciphertext) {
        Err(Error::TagMismatch) => println!("  [OK] Wrong private key rejected"),
        other => println!("  [FAILED] Unexpected result: {:?}", other),
    }

    match ctx.decrypt(bob.private(), &ciphertext[..50]) {
        Err(e) => println!("  [OK] Truncated ciphertext rejected: {}", e),
        Ok(_) => println!("  [FAILED] Truncated ciphertext accepted"),
    }
    println!();

    if let Some(stats) = ctx.cache_stats() {
        println!(
            "Cache: {} hits, {} misses, {} additions stored",
            stats.hits, stats.misses, stats.addition_entries
        );
        println!();
    }

    println!("=== Example Complete ===");
}

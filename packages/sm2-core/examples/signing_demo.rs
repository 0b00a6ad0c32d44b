//! # Digital Signature Demo
//!
//! Demonstrates SM2 signatures with identity binding.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example signing_demo
//! ```

use sm2_core::crypto::{compute_za, sign, verify, KeyPair, DEFAULT_USER_ID};

fn main() {
    println!("=== SM2 Core: Digital Signature Demo ===\n");

    // Step 1: Create a keypair
    println!("Step 1: Creating SM2 keypair...");

    let keypair = KeyPair::generate().expect("Failed to create keypair");

    println!("  Public key (hex): {}", keypair.public().to_hex());
    println!();

    // Step 2: Explain the signing process
    println!("Step 2: Understanding SM2 Signatures");
    println!();
    println!("  ┌─────────────────────────────────────────────────────────────┐");
    println!("  │                   SIGNATURE FLOW                            │");
    println!("  ├─────────────────────────────────────────────────────────────┤");
    println!("  │                                                             │");
    println!("  │  SIGNING (Private Key Holder Only):                        │");
    println!("  │                                                             │");
    println!("  │    User ID + Public Key ─► ZA                              │");
    println!("  │    e = SM3(ZA || Message)                                  │");
    println!("  │    Private ─► SM2 Sign ─► (r, s) 64 bytes                  │");
    println!("  │                                                             │");
    println!("  │  VERIFICATION (Anyone with Public Key + User ID):          │");
    println!("  │                                                             │");
    println!("  │    Public, User ID, Message, (r, s) ─► Valid / Invalid     │");
    println!("  │                                                             │");
    println!("  │  PROPERTIES:                                               │");
    println!("  │  • Signature is bound to the signer's identity             │");
    println!("  │  • Randomized: same message, different signature           │");
    println!("  │                                                             │");
    println!("  └─────────────────────────────────────────────────────────────┘");
    println!();

    let za = compute_za(DEFAULT_USER_ID, keypair.public().point()).expect("Failed to compute ZA");
    println!("  ZA for \"{}\": {}", DEFAULT_USER_ID, hex::encode(za));
    println!();

    // Step 3: Sign a message
    println!("Step 3: Signing a message...");

    let message = b"This message was sent by me and has not been tampered with.";
    println!("  Message: \"{}\"", String::from_utf8_lossy(message));

    let signature = sign(keypair.private(), message, DEFAULT_USER_ID, keypair.public())
        .expect("Failed to sign");

    println!("  Signature (hex): {}", signature.to_hex());
    println!("  Signature length: {} bytes", signature.to_bytes().len());
    println!();

    // Step 4: Verify the signature
    println!("Step 4: Verifying the signature...");

    if verify(keypair.public(), message, DEFAULT_USER_ID, &signature) {
        println!("  [OK] Signature is valid!");
    } else {
        println!("  [FAILED] Signature verification failed!");
    }
    println!();

    // Step 5: Demonstrate forgery detection
    println!("Step 5: Forgery detection...");

    let tampered_message = b"This message was MODIFIED by an attacker!";
    if verify(keypair.public(), tampered_message, DEFAULT_USER_ID, &signature) {
        println!("  [FAILED] Tampered message was accepted!");
    } else {
        println!("  [OK] Tampered message detected - signature invalid!");
    }

    if verify(keypair.public(), message, "mallory@example.com", &signature) {
        println!("  [FAILED] Wrong user ID was accepted!");
    } else {
        println!("  [OK] Wrong user ID detected - signature invalid!");
    }

    let wrong_keypair = KeyPair::generate().expect("Failed to create wrong keypair");
    if verify(wrong_keypair.public(), message, DEFAULT_USER_ID, &signature) {
        println!("  [FAILED] Wrong public key was accepted!");
    } else {
        println!("  [OK] Wrong public key detected - signature invalid!");
    }
    println!();

    // Step 6: Same message, fresh nonce each time
    println!("Step 6: Signing the same message twice...");

    for i in 1..=2 {
        let sig = sign(keypair.private(), message, DEFAULT_USER_ID, keypair.public())
            .expect("Failed to sign");
        let valid = verify(keypair.public(), message, DEFAULT_USER_ID, &sig);
        println!("  Signature {}: {}...", i, hex::encode(&sig.to_bytes()[..16]));
        println!("    Valid: {}", if valid { "[OK]" } else { "[FAILED]" });
    }
    println!();

    println!("=== Example Complete ===");
}

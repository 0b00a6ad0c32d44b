//! SM2 command-line tool
//!
//! Thin front end over `sm2-core`:
//!
//! 1. **keygen**: print a fresh keypair as JSON.
//! 2. **sign / verify**: identity-bound signatures, hex encoded.
//! 3. **encrypt / decrypt**: public-key encryption, ciphertext as hex.
//!
//! Keys and identifiers can come from the environment (`SM2_PRIVATE_KEY`,
//! `SM2_USER_ID`, `SM2_MEMOIZE`). Logging goes to stderr and is controlled by
//! `RUST_LOG`.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Serialize;

use sm2_core::crypto::CIPHERTEXT_OVERHEAD;
use sm2_core::{PrivateKey, PublicKey, Signature, Sm2Config, Sm2Context, DEFAULT_USER_ID};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sm2", version, about = "SM2 signatures and public-key encryption")]
struct Cli {
    /// Memoize field inverses, point additions and ZA digests
    #[arg(long, global = true, env = "SM2_MEMOIZE")]
    memoize: bool,

    /// User identifier bound into signatures
    #[arg(long, global = true, default_value = DEFAULT_USER_ID, env = "SM2_USER_ID")]
    user_id: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a keypair
    Keygen,

    /// Sign a message
    Sign {
        /// Private key (64 hex characters)
        #[arg(long, env = "SM2_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Message text
        #[arg(required_unless_present = "message_hex", conflicts_with = "message_hex")]
        message: Option<String>,

        /// Message as hex
        #[arg(long)]
        message_hex: Option<String>,
    },

    /// Verify a signature; exits non-zero when invalid
    Verify {
        /// Public key (128 hex characters)
        #[arg(long)]
        public_key: String,

        /// Signature (128 hex characters)
        #[arg(long)]
        signature: String,

        /// Message text
        #[arg(required_unless_present = "message_hex", conflicts_with = "message_hex")]
        message: Option<String>,

        /// Message as hex
        #[arg(long)]
        message_hex: Option<String>,
    },

    /// Encrypt to a public key
    Encrypt {
        /// Recipient public key (128 hex characters)
        #[arg(long)]
        public_key: String,

        /// Plaintext
        #[arg(required_unless_present = "plaintext_hex", conflicts_with = "plaintext_hex")]
        plaintext: Option<String>,

        /// Plaintext as hex
        #[arg(long)]
        plaintext_hex: Option<String>,
    },

    /// Decrypt with a private key
    Decrypt {
        /// Private key (64 hex characters)
        #[arg(long, env = "SM2_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Ciphertext as hex (C1 || C3 || C2)
        ciphertext: String,

        /// Print the plaintext as hex instead of UTF-8
        #[arg(long)]
        hex: bool,
    },
}

#[derive(Serialize)]
struct KeygenOutput {
    private_key: String,
    public_key: PublicKey,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn payload(text: Option<String>, hex_text: Option<String>) -> Result<Vec<u8>> {
    match (text, hex_text) {
        (_, Some(h)) => hex::decode(h.trim()).wrap_err("Payload is not valid hex"),
        (Some(t), None) => Ok(t.into_bytes()),
        (None, None) => Err(eyre!("No payload given")),
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<ExitCode> {
    let ctx = Sm2Context::new(Sm2Config {
        memoize: cli.memoize,
    });

    match cli.command {
        Command::Keygen => {
            let keypair = ctx.generate_keypair()?;
            let output = KeygenOutput {
                private_key: keypair.private().to_hex(),
                public_key: keypair.public().clone(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }

        Command::Sign {
            private_key,
            message,
            message_hex,
        } => {
            let private = PrivateKey::from_hex(&private_key)?;
            let keypair = ctx.keypair_from_private(private)?;
            let message = payload(message, message_hex)?;
            let signature = ctx.sign(&keypair, &message, &cli.user_id)?;
            writeln!(out, "{}", signature.to_hex())?;
        }

        Command::Verify {
            public_key,
            signature,
            message,
            message_hex,
        } => {
            let public = PublicKey::from_hex(&public_key)?;
            let signature = Signature::from_hex(&signature)?;
            let message = payload(message, message_hex)?;

            if ctx.verify(&public, &message, &cli.user_id, &signature) {
                writeln!(out, "valid")?;
            } else {
                writeln!(out, "invalid")?;
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Encrypt {
            public_key,
            plaintext,
            plaintext_hex,
        } => {
            let public = PublicKey::from_hex(&public_key)?;
            let plaintext = payload(plaintext, plaintext_hex)?;
            let ciphertext = ctx.encrypt(&public, &plaintext)?;
            writeln!(out, "{}", hex::encode(ciphertext))?;
        }

        Command::Decrypt {
            private_key,
            ciphertext,
            hex: as_hex,
        } => {
            let private = PrivateKey::from_hex(&private_key)?;
            let bytes = hex::decode(ciphertext.trim()).wrap_err("Ciphertext is not valid hex")?;
            tracing::debug!(
                payload_len = bytes.len().saturating_sub(CIPHERTEXT_OVERHEAD),
                "Decrypting"
            );

            let plaintext = ctx.decrypt(&private, &bytes)?;
            if as_hex {
                writeln!(out, "{}", hex::encode(plaintext))?;
            } else {
                let text = String::from_utf8(plaintext)
                    .wrap_err("Plaintext is not UTF-8, use --hex")?;
                writeln!(out, "{}", text)?;
            }
        }
    }

    if let Some(stats) = ctx.cache_stats() {
        tracing::debug!(hits = stats.hits, misses = stats.misses, "Cache usage");
    }

    Ok(ExitCode::SUCCESS)
}

// ── Entry Point ───────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sm2=warn,sm2_core=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli, &mut io::stdout().lock())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn run_args(args: &[&str]) -> (ExitCode, String) {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        let code = run(cli, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap().trim().to_string())
    }

    fn keygen() -> (String, String) {
        let (_, json) = run_args(&["sm2", "keygen"]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        (
            value["private_key"].as_str().unwrap().to_string(),
            value["public_key"].as_str().unwrap().to_string(),
        )
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_keygen_output() {
        let (private, public) = keygen();
        assert_eq!(private.len(), 64);
        assert_eq!(public.len(), 128);
    }

    #[test]
    fn test_sign_then_verify() {
        let (private, public) = keygen();
        let (_, signature) = run_args(&["sm2", "sign", "--private-key", &private, "hello"]);

        let (code, verdict) = run_args(&[
            "sm2", "verify", "--public-key", &public, "--signature", &signature, "hello",
        ]);
        assert_eq!(verdict, "valid");
        assert_eq!(code, ExitCode::SUCCESS);

        let (code, verdict) = run_args(&[
            "sm2", "verify", "--public-key", &public, "--signature", &signature, "hellp",
        ]);
        assert_eq!(verdict, "invalid");
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_user_id_is_bound() {
        let (private, public) = keygen();
        let (_, signature) = run_args(&[
            "sm2", "--user-id", "alice@example.com", "sign", "--private-key", &private, "hi",
        ]);
        let (_, verdict) = run_args(&[
            "sm2", "--user-id", "bob@example.com", "verify", "--public-key", &public,
            "--signature", &signature, "hi",
        ]);
        assert_eq!(verdict, "invalid");
    }

    #[test]
    fn test_encrypt_then_decrypt() {
        let (private, public) = keygen();
        let (_, ciphertext) = run_args(&["sm2", "--memoize", "encrypt", "--public-key", &public, "secret"]);
        assert_eq!(ciphertext.len(), 2 * (96 + 6));

        let (_, plaintext) = run_args(&["sm2", "decrypt", "--private-key", &private, &ciphertext]);
        assert_eq!(plaintext, "secret");

        let (_, plaintext) =
            run_args(&["sm2", "decrypt", "--private-key", &private, "--hex", &ciphertext]);
        assert_eq!(plaintext, hex::encode("secret"));
    }

    #[test]
    fn test_decrypt_rejects_short_ciphertext() {
        let (private, _) = keygen();
        let short = "00".repeat(CIPHERTEXT_OVERHEAD - 1);
        let cli = Cli::try_parse_from([
            "sm2", "decrypt", "--private-key", private.as_str(), short.as_str(),
        ])
        .unwrap();

        let err = run(cli, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_hex_payloads() {
        assert_eq!(payload(None, Some("6869".into())).unwrap(), b"hi");
        assert_eq!(payload(Some("hi".into()), None).unwrap(), b"hi");
        assert!(payload(None, Some("zz".into())).is_err());
        assert!(Cli::try_parse_from(["sm2", "encrypt", "--public-key", "00"]).is_err());
    }
}

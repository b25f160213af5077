use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hdkey_address::Address;
use hdkey_bip::keygen::BIP44_PATH_ETHEREUM;
use hdkey_bip::KeyGenerator;
use hdkey_crypto::codec::{parse_hex, parse_hex_exact};
use hdkey_crypto::{EcdsaSignature, KeyPair};
use hdkey_wallet::AddressDerivator;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hdkey",
    about = "BIP32/BIP44 Ethereum key derivation and recoverable ECDSA signatures"
)]
struct Args {
    /// Log at debug level (overrides the RUST_LOG default of "warn")
    #[arg(short = 'v', long = "verbose", global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print checksummed addresses for a run of indices
    Addresses {
        /// Seed as hex (16 to 64 bytes)
        #[arg(long = "seed")]
        seed: String,

        /// Branch path the indices are taken under
        #[arg(long = "path", default_value = BIP44_PATH_ETHEREUM)]
        path: String,

        /// First address index
        #[arg(long = "start", default_value_t = 0)]
        start: u32,

        /// Number of addresses (zero or negative prints nothing)
        #[arg(long = "count", default_value_t = 10, allow_negative_numbers = true)]
        count: i64,
    },

    /// Print the private key for one address index
    Key {
        #[arg(long = "seed")]
        seed: String,

        #[arg(long = "path", default_value = BIP44_PATH_ETHEREUM)]
        path: String,

        #[arg(long = "index")]
        index: u32,
    },

    /// Print the extended key (xprv, or xpub with --public) at a path
    Xkey {
        #[arg(long = "seed")]
        seed: String,

        #[arg(long = "path", default_value = BIP44_PATH_ETHEREUM)]
        path: String,

        #[arg(long = "public", default_value_t = false)]
        public: bool,
    },

    /// Sign a 32-byte digest, printing r || s || v as hex
    Sign {
        /// Private key as hex (up to 32 bytes, left-padded)
        #[arg(long = "key")]
        key: String,

        /// Digest as hex (32 bytes)
        #[arg(long = "digest")]
        digest: String,
    },

    /// Check a signature against a SEC1 public key
    Verify {
        /// Public key as hex (33 or 65 bytes)
        #[arg(long = "public")]
        public: String,

        #[arg(long = "digest")]
        digest: String,

        /// Signature as hex (r || s || v, 65 bytes)
        #[arg(long = "signature")]
        signature: String,
    },

    /// Recover the signer address from a signature
    Recover {
        #[arg(long = "digest")]
        digest: String,

        #[arg(long = "signature")]
        signature: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn strip_0x(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode variable-length hex, e.g. a seed.
fn decode_hex(s: &str, what: &str) -> Result<Vec<u8>> {
    hex::decode(strip_0x(s)).with_context(|| format!("{what} is not valid hex"))
}

fn parse_digest(s: &str) -> Result<[u8; 32]> {
    parse_hex_exact::<32>(s).context("digest must be 32 bytes of hex")
}

fn parse_private_key(s: &str) -> Result<[u8; 32]> {
    parse_hex::<32>(s).context("key must be at most 32 bytes of hex")
}

fn parse_signature(s: &str) -> Result<EcdsaSignature> {
    let bytes = decode_hex(s, "signature")?;
    EcdsaSignature::from_rsv_bytes(&bytes).context("signature must be r || s || v (65 bytes)")
}

fn derivator(seed: &str, path: &str) -> Result<AddressDerivator> {
    let seed = decode_hex(seed, "seed")?;
    let mut derivator = AddressDerivator::new();
    derivator
        .initialize_with_path(&seed, path)
        .with_context(|| format!("failed to derive branch {path}"))?;
    Ok(derivator)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Addresses {
            seed,
            path,
            start,
            count,
        } => {
            let derivator = derivator(&seed, &path)?;
            for (offset, address) in derivator
                .addresses_for_page(start, count)?
                .into_iter()
                .enumerate()
            {
                println!("{}/{}\t{}", path, u64::from(start) + offset as u64, address);
            }
        }
        Command::Key { seed, path, index } => {
            let key = derivator(&seed, &path)?.key_for_index(index)?;
            println!("0x{}", hex::encode(*key));
        }
        Command::Xkey { seed, path, public } => {
            let seed = decode_hex(&seed, "seed")?;
            let node = KeyGenerator::master_node(&seed)?
                .derive(&path)
                .with_context(|| format!("failed to derive {path}"))?;
            if public {
                println!("{}", node.to_base58_public());
            } else {
                println!("{}", node.to_base58()?);
            }
        }
        Command::Sign { key, digest } => {
            let key_pair = KeyPair::from_private_bytes(&parse_private_key(&key)?)?;
            let signature = key_pair.sign(&parse_digest(&digest)?)?;
            tracing::debug!(v = signature.v, "signed digest");
            println!("0x{}", hex::encode(signature.to_rsv_bytes()));
        }
        Command::Verify {
            public,
            digest,
            signature,
        } => {
            let key_pair = KeyPair::from_public_bytes(&decode_hex(&public, "public key")?)
                .context("invalid public key")?;
            let valid = key_pair.verify(&parse_digest(&digest)?, &parse_signature(&signature)?);
            println!("{valid}");
            if !valid {
                bail!("signature does not verify");
            }
        }
        Command::Recover { digest, signature } => {
            let address =
                KeyPair::recover_address(&parse_digest(&digest)?, &parse_signature(&signature)?)?;
            println!("{}", Address::new(address));
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args.command) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_0x() {
        assert_eq!(strip_0x("0xabcd"), "abcd");
        assert_eq!(strip_0x(" 0Xabcd "), "abcd");
        assert_eq!(strip_0x("abcd"), "abcd");
    }

    #[test]
    fn test_parse_digest_length() {
        assert!(parse_digest(&"11".repeat(32)).is_ok());
        assert!(parse_digest(&"11".repeat(31)).is_err());
        assert!(parse_digest("0xzz").is_err());
    }

    #[test]
    fn test_parse_private_key_pads() {
        let key = parse_private_key("0x1").unwrap();
        assert_eq!(key[31], 1);
        assert!(key[..31].iter().all(|&b| b == 0));
        assert!(parse_private_key(&"11".repeat(33)).is_err());
    }

    #[test]
    fn test_parse_signature_length() {
        assert!(parse_signature(&"00".repeat(64)).is_err());
        let sig = parse_signature(&format!("{}{}1b", "01".repeat(32), "02".repeat(32))).unwrap();
        assert_eq!(sig.v, 27);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "hdkey", "addresses", "--seed", "00", "--start", "5", "--count", "-1",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::Addresses { start: 5, count: -1, .. }
        ));
    }

    #[test]
    fn test_derivator_rejects_short_seed() {
        assert!(derivator("00", BIP44_PATH_ETHEREUM).is_err());
    }
}

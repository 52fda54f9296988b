//! Pairseal throughput binary.
//!
//! # Usage
//!
//! ```bash
//! # 10 MiB x 50 rounds with AES-256 (defaults)
//! pairseal-perf
//!
//! # Smaller run with AES-128 and debug logging
//! pairseal-perf --size-bytes 1048576 --rounds 200 --key-bits 128 --log-level debug
//! ```

use clap::{Parser, ValueEnum};
use pairseal_crypto::SystemRandom;
use pairseal_perf::PerfConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// AES key size for the run
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyBits {
    #[value(name = "128")]
    Aes128,
    #[value(name = "192")]
    Aes192,
    #[value(name = "256")]
    Aes256,
}

impl KeyBits {
    fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }
}

/// AES-GCM cipher throughput measurement
#[derive(Parser, Debug)]
#[command(name = "pairseal-perf")]
#[command(about = "Measure pairseal encrypt/decrypt throughput")]
#[command(version)]
struct Args {
    /// Plaintext size per round in bytes
    #[arg(long, default_value = "10485760")]
    size_bytes: usize,

    /// Number of rounds
    #[arg(long, default_value = "50")]
    rounds: usize,

    /// AES key size
    #[arg(long, value_enum, default_value = "256")]
    key_bits: KeyBits,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = PerfConfig {
        size_bytes: args.size_bytes,
        rounds: args.rounds,
        key_len: args.key_bits.key_len(),
    };

    let report = pairseal_perf::run(config, &SystemRandom::new())?;

    tracing::info!("AesGcmCipher encrypt: {:.2} MB/s", report.encrypt_mbps);
    tracing::info!("AesGcmCipher decrypt: {:.2} MB/s", report.decrypt_mbps);

    Ok(())
}

//! Cipher throughput measurement.
//!
//! Encrypts one random buffer repeatedly, then decrypts the resulting
//! payloads, and reports MB/s for each direction. Used by the
//! `pairseal-perf` binary; not part of the library contract.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::time::{Duration, Instant};

use pairseal_crypto::{AesGcmCipher, CipherError, RandomSource};
use thiserror::Error;

/// Errors that abort a measurement run
#[derive(Error, Debug)]
pub enum PerfError {
    /// Cipher construction, encryption or decryption failed
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Round-trip produced different bytes than were encrypted
    #[error("decryption output does not match input")]
    Mismatch,
}

/// Measurement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfConfig {
    /// Plaintext size per round in bytes
    pub size_bytes: usize,
    /// Number of encrypt (and decrypt) operations
    pub rounds: usize,
    /// AES key length in bytes (16, 24 or 32)
    pub key_len: usize,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self { size_bytes: 10 * 1024 * 1024, rounds: 50, key_len: 32 }
    }
}

/// Throughput results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfReport {
    /// Encryption throughput in MB/s
    pub encrypt_mbps: f64,
    /// Decryption throughput in MB/s
    pub decrypt_mbps: f64,
}

/// Run the encrypt and decrypt measurements.
///
/// The first payload is decrypted and compared against the input before any
/// decryption timing starts.
pub fn run(config: PerfConfig, rng: &impl RandomSource) -> Result<PerfReport, PerfError> {
    let mut key = vec![0u8; config.key_len];
    rng.random_bytes(&mut key);
    let mut cipher = AesGcmCipher::new(&key, rng)?;

    let mut data = vec![0u8; config.size_bytes];
    rng.random_bytes(&mut data);

    tracing::info!(
        size_bytes = config.size_bytes,
        rounds = config.rounds,
        key_bits = cipher.key_size().bits(),
        "measuring encryption"
    );

    let mut payloads = Vec::with_capacity(config.rounds);
    let start = now();
    for _ in 0..config.rounds {
        payloads.push(cipher.encrypt(&data)?);
    }
    let encrypt_elapsed = now() - start;

    let first_matches = match payloads.first() {
        Some(first) => cipher.decrypt(first)? == data,
        None => true,
    };
    if !first_matches {
        return Err(PerfError::Mismatch);
    }

    tracing::info!("measuring decryption");

    let start = now();
    for payload in &payloads {
        cipher.decrypt(payload)?;
    }
    let decrypt_elapsed = now() - start;

    Ok(PerfReport {
        encrypt_mbps: throughput(config.size_bytes, config.rounds, encrypt_elapsed),
        decrypt_mbps: throughput(config.size_bytes, config.rounds, decrypt_elapsed),
    })
}

/// MB/s for `rounds` operations of `size_bytes` each.
fn throughput(size_bytes: usize, rounds: usize, elapsed: Duration) -> f64 {
    let total_mb = size_bytes as f64 * rounds as f64 / (1024.0 * 1024.0);
    total_mb / elapsed.as_secs_f64().max(f64::EPSILON)
}

#[allow(clippy::disallowed_methods)]
fn now() -> Instant {
    Instant::now()
}

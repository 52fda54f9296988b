//! Error types for cipher and key exchange operations

use thiserror::Error;

/// Errors from [`crate::AesGcmCipher`] and [`crate::NonceSequencer`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Raw key is not 128, 192 or 256 bits
    #[error("invalid key length: expected 16, 24 or 32 bytes, got {actual}")]
    InvalidKey {
        /// Actual key length in bytes
        actual: usize,
    },

    /// Payload too short to hold a nonce and authentication tag
    #[error("invalid input: payload must be at least {expected_at_least} bytes, got {actual}")]
    InvalidInput {
        /// Minimum payload length (nonce + tag)
        expected_at_least: usize,
        /// Actual payload length
        actual: usize,
    },

    /// AEAD seal rejected the plaintext (beyond the AES-GCM length limit)
    #[error("encryption failed: plaintext of {len} bytes exceeds the AES-GCM limit")]
    SealFailed {
        /// Plaintext length in bytes
        len: usize,
    },

    /// Authentication tag did not verify (tampering, wrong key, corrupted
    /// nonce)
    #[error("authentication failed")]
    Authentication,

    /// The nonce counter reached its limit; this instance can no longer
    /// encrypt
    #[error("nonce space exhausted after {limit} messages")]
    NonceExhausted {
        /// Number of nonces issued before exhaustion
        limit: u64,
    },
}

impl CipherError {
    /// Returns true if the cipher instance can no longer encrypt.
    ///
    /// Every error is final for the operation that produced it (nothing is
    /// retried internally). Only nonce exhaustion poisons the instance.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::NonceExhausted { .. } => true,

            // Scoped to a single call
            Self::InvalidKey { .. } => false,
            Self::InvalidInput { .. } => false,
            Self::SealFailed { .. } => false,
            Self::Authentication => false,
        }
    }
}

/// Errors from [`crate::KeyPair`] key agreement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyExchangeError {
    /// Peer public key is malformed or a low-order point
    #[error("invalid peer public key: {reason}")]
    InvalidPeerKey {
        /// Why the key was rejected
        reason: String,
    },

    /// HKDF refused the requested output length
    #[error("key derivation failed")]
    DerivationFailed,
}

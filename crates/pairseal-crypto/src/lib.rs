//! Pairseal Cryptographic Primitives
//!
//! Two building blocks for point-to-point message protection: an AES-GCM
//! cipher whose nonces never repeat within an instance, and an X25519 key
//! agreement that gives both peers the same cipher key.
//!
//! # Key Lifecycle
//!
//! Each peer generates an ephemeral keypair and sends its raw public key to
//! the other side. Both sides run X25519 followed by HKDF-SHA256 with a shared
//! salt and arrive at the same 32-byte key. Each side then builds its own
//! cipher from that key.
//!
//! ```text
//! KeyPair::generate ──► public key ──► peer
//!        │
//!        ▼
//! X25519 + HKDF → DerivedKey (identical on both sides)
//!        │
//!        ▼
//! AesGcmCipher (salt ‖ counter nonces)
//!        │
//!        ▼
//! Payload: nonce[12] ‖ ciphertext ‖ tag[16]
//! ```
//!
//! # Security
//!
//! Nonce Uniqueness:
//! - Nonce = 4-byte random salt ‖ 8-byte big-endian counter
//! - Counter advances on every encryption and never wraps; the cipher fails
//!   closed at its message limit
//! - Guaranteed per instance only: never build two ciphers from one key
//!
//! Authenticity:
//! - AES-GCM tag covers the ciphertext; the nonce is bound through GCM
//! - Failed tag verification -> `CipherError::Authentication`, never
//!   partial plaintext
//!
//! Secret Hygiene:
//! - X25519 shared secrets live only inside one derivation call
//! - Private keys are never exported
//! - Derived keys and private scalars are zeroized on drop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod env;
pub mod error;
pub mod exchange;
pub mod nonce;

pub use cipher::{
    AesGcmCipher, CipherConfig, KeySize, PAYLOAD_OVERHEAD, TAG_SIZE, payload_len, plaintext_len,
};
pub use env::{RandomSource, SystemRandom};
pub use error::{CipherError, KeyExchangeError};
pub use exchange::{DEFAULT_CONTEXT, DERIVED_KEY_SIZE, DerivedKey, KeyPair, PUBLIC_KEY_SIZE};
pub use nonce::{NONCE_SALT_SIZE, NONCE_SIZE, NonceSequencer};

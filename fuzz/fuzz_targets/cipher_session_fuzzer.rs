//! Fuzz target for a cipher session
//!
//! Drives one sender and one receiver through arbitrary encrypt, tamper and
//! truncate operations.
//!
//! # Strategy
//!
//! - All three AES key sizes
//! - Arbitrary salts and small message limits
//! - Random bit flips and truncations of produced payloads
//!
//! # Invariants
//!
//! - Encrypt/decrypt roundtrip succeeds until the message limit
//! - Payload length is always plaintext + 28
//! - Nonces never repeat
//! - Tampered or truncated payloads fail decryption
//! - Exhausted senders keep failing with `NonceExhausted`

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pairseal_crypto::{AesGcmCipher, CipherError, NonceSequencer, NONCE_SIZE, PAYLOAD_OVERHEAD};

#[derive(Debug, Clone, Arbitrary)]
enum KeyMaterial {
    Aes128([u8; 16]),
    Aes192([u8; 24]),
    Aes256([u8; 32]),
}

impl KeyMaterial {
    fn as_bytes(&self) -> &[u8] {
        match self {
            KeyMaterial::Aes128(b) => b,
            KeyMaterial::Aes192(b) => b,
            KeyMaterial::Aes256(b) => b,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum SessionOperation {
    /// Encrypt and decrypt a message
    Send { message: Vec<u8> },
    /// Encrypt, flip one bit, and expect rejection
    Tamper { message: Vec<u8>, position: u16, bit: u8 },
    /// Encrypt, drop trailing bytes, and expect rejection
    Truncate { message: Vec<u8>, drop: u8 },
}

#[derive(Debug, Clone, Arbitrary)]
struct SessionScenario {
    key: KeyMaterial,
    salt: [u8; 4],
    message_limit: u8,
    operations: Vec<SessionOperation>,
}

fuzz_target!(|scenario: SessionScenario| {
    let limit = u64::from(scenario.message_limit);
    let sequencer = NonceSequencer::with_salt(scenario.salt).with_limit(limit);
    let mut sender = AesGcmCipher::with_sequencer(scenario.key.as_bytes(), sequencer)
        .expect("fuzz key sizes are always valid");
    let receiver = AesGcmCipher::with_sequencer(
        scenario.key.as_bytes(),
        NonceSequencer::with_salt([0xFF; 4]),
    )
    .expect("fuzz key sizes are always valid");

    let mut nonces = HashSet::new();
    let mut sent = 0u64;

    for op in scenario.operations {
        let message = match &op {
            SessionOperation::Send { message }
            | SessionOperation::Tamper { message, .. }
            | SessionOperation::Truncate { message, .. } => message.clone(),
        };

        let payload = match sender.encrypt(&message) {
            Ok(payload) => payload,
            Err(CipherError::NonceExhausted { limit: reported }) => {
                // INVARIANT: exhaustion only at the configured limit
                assert_eq!(sent, limit);
                assert_eq!(reported, limit);
                continue;
            },
            Err(other) => panic!("unexpected encrypt error: {other}"),
        };
        sent += 1;

        // INVARIANT: fixed overhead
        assert_eq!(payload.len(), message.len() + PAYLOAD_OVERHEAD);

        // INVARIANT: nonce uniqueness
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&payload[..NONCE_SIZE]);
        assert!(nonces.insert(nonce), "nonce reused");

        match op {
            SessionOperation::Send { .. } => {
                let decrypted = receiver.decrypt(&payload).expect("valid payload must decrypt");
                assert_eq!(decrypted, message);
            },
            SessionOperation::Tamper { position, bit, .. } => {
                let mut tampered = payload;
                let index = usize::from(position) % tampered.len();
                tampered[index] ^= 1 << (bit % 8);
                assert!(receiver.decrypt(&tampered).is_err(), "tampered payload accepted");
            },
            SessionOperation::Truncate { drop, .. } => {
                let drop = usize::from(drop).max(1).min(payload.len());
                let truncated = &payload[..payload.len() - drop];
                assert!(receiver.decrypt(truncated).is_err(), "truncated payload accepted");
            },
        }
    }
});

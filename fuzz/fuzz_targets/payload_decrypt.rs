//! Fuzz target for payload decryption
//!
//! Feeds arbitrary bytes to `AesGcmCipher::decrypt`.
//!
//! # Invariants
//!
//! - Decrypt never panics
//! - Payloads shorter than nonce + tag are rejected as invalid input
//! - Forged payloads never authenticate

#![no_main]

use libfuzzer_sys::fuzz_target;
use pairseal_crypto::{AesGcmCipher, CipherError, NonceSequencer, PAYLOAD_OVERHEAD};

fuzz_target!(|data: &[u8]| {
    let Ok(cipher) = AesGcmCipher::with_sequencer(&[0x42; 32], NonceSequencer::with_salt([0; 4]))
    else {
        return;
    };

    match cipher.decrypt(data) {
        Ok(_) => panic!("forged payload authenticated"),
        Err(CipherError::InvalidInput { actual, .. }) => {
            assert!(actual < PAYLOAD_OVERHEAD, "only short payloads are invalid input");
        },
        Err(CipherError::Authentication) => {
            assert!(data.len() >= PAYLOAD_OVERHEAD);
        },
        Err(other) => panic!("unexpected decrypt error: {other}"),
    }
});

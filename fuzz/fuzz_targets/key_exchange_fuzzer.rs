//! Fuzz target for X25519 key agreement
//!
//! # Strategy
//!
//! - Arbitrary private key seeds for both peers
//! - Arbitrary salts and contexts (empty, small, large)
//! - Arbitrary peer key bytes of any length
//!
//! # Invariants
//!
//! - Honest peers always derive the same key
//! - Derivation is deterministic
//! - Malformed peer keys are rejected without panicking

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pairseal_crypto::{KeyExchangeError, KeyPair, RandomSource, PUBLIC_KEY_SIZE};

struct Seed([u8; 32]);

impl RandomSource for Seed {
    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.copy_from_slice(&self.0[..buffer.len()]);
    }
}

#[derive(Debug, Clone, Arbitrary)]
struct ExchangeScenario {
    alice_seed: [u8; 32],
    bob_seed: [u8; 32],
    salt: Vec<u8>,
    context: Vec<u8>,
    hostile_peer_key: Vec<u8>,
}

fuzz_target!(|scenario: ExchangeScenario| {
    let alice = KeyPair::generate(&Seed(scenario.alice_seed));
    let bob = KeyPair::generate(&Seed(scenario.bob_seed));

    // INVARIANT 1: Symmetry
    let alice_key = alice
        .derive_shared_key_with_context(bob.public_key(), &scenario.salt, &scenario.context)
        .expect("honest peer key must be accepted");
    let bob_key = bob
        .derive_shared_key_with_context(alice.public_key(), &scenario.salt, &scenario.context)
        .expect("honest peer key must be accepted");
    assert_eq!(alice_key.as_bytes(), bob_key.as_bytes(), "peers must agree");

    // INVARIANT 2: Determinism
    let again = alice
        .derive_shared_key_with_context(bob.public_key(), &scenario.salt, &scenario.context)
        .expect("honest peer key must be accepted");
    assert_eq!(alice_key.as_bytes(), again.as_bytes());

    // INVARIANT 3: Hostile input never panics; wrong lengths always fail
    match alice.derive_shared_key(&scenario.hostile_peer_key, &scenario.salt) {
        Ok(_) => assert_eq!(scenario.hostile_peer_key.len(), PUBLIC_KEY_SIZE),
        Err(KeyExchangeError::InvalidPeerKey { .. }) => {},
        Err(other) => panic!("unexpected key exchange error: {other}"),
    }
});

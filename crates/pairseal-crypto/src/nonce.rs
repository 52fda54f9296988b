//! Counter-based nonce sequencer
//!
//! Each sequencer owns a 4-byte random salt and a 64-bit counter. Nonces are
//! `salt || counter` with the counter big-endian, so two nonces from the same
//! instance differ whenever their counters differ. The counter never wraps:
//! once the configured limit is reached, [`NonceSequencer::next`] fails
//! closed.

use crate::{env::RandomSource, error::CipherError};

/// AES-GCM nonce size (12 bytes)
pub const NONCE_SIZE: usize = 12;

/// Size of the per-instance random salt (4 bytes)
pub const NONCE_SALT_SIZE: usize = 4;

/// Produces unique 96-bit nonces for a single cipher instance.
///
/// # Security
///
/// - Uniqueness holds only within one instance. Two sequencers used under
///   the same key share nothing but a 32-bit salt; callers must use a fresh
///   key per cipher instance.
/// - `next()` takes `&mut self`: concurrent producers need external
///   serialization.
/// - Not `Clone`: a copy would replay the same nonces.
#[derive(Debug)]
pub struct NonceSequencer {
    /// Random prefix fixed for the instance lifetime
    salt: [u8; NONCE_SALT_SIZE],
    /// Counter value for the next nonce
    counter: u64,
    /// Number of nonces this instance may ever issue
    limit: u64,
}

impl NonceSequencer {
    /// Create a sequencer with a random salt and the default limit
    /// (`u64::MAX` nonces).
    pub fn new(rng: &impl RandomSource) -> Self {
        Self::with_salt(rng.random_array())
    }

    /// Create a sequencer with a caller-chosen salt.
    ///
    /// Intended for tests and fuzzing; production callers use
    /// [`new`](Self::new).
    pub fn with_salt(salt: [u8; NONCE_SALT_SIZE]) -> Self {
        Self { salt, counter: 0, limit: u64::MAX }
    }

    /// Cap the number of nonces this sequencer will issue.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// The instance salt (first 4 bytes of every nonce).
    pub fn salt(&self) -> [u8; NONCE_SALT_SIZE] {
        self.salt
    }

    /// Counter value that the next nonce will carry.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Nonces left before the sequencer is exhausted.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.counter)
    }

    /// Issue the next nonce and advance the counter.
    ///
    /// # Errors
    ///
    /// - `NonceExhausted`: the counter reached the limit. Every later call
    ///   fails the same way.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<[u8; NONCE_SIZE], CipherError> {
        if self.counter >= self.limit {
            return Err(CipherError::NonceExhausted { limit: self.limit });
        }

        let nonce = build_nonce(self.salt, self.counter);
        self.counter += 1;

        if self.counter == self.limit {
            tracing::warn!(limit = self.limit, "nonce sequencer reached its limit");
        }

        Ok(nonce)
    }
}

/// Build a 12-byte nonce.
///
/// Structure:
/// - bytes 0-3: salt
/// - bytes 4-11: counter (big-endian)
fn build_nonce(salt: [u8; NONCE_SALT_SIZE], counter: u64) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    nonce[..NONCE_SALT_SIZE].copy_from_slice(&salt);
    nonce[NONCE_SALT_SIZE..].copy_from_slice(&counter.to_be_bytes());
    nonce
}

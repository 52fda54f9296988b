//! Randomness abstraction for deterministic testing.
//!
//! Decouples nonce salts and key generation from the OS entropy source.
//! Production code uses [`SystemRandom`]; tests and fuzz targets supply
//! seeded or constant sources so that salts and keypairs are reproducible.

/// Source of random bytes for salts and private keys.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - The method is infallible except in exceptional circumstances (e.g., OS
///   entropy exhaustion)
pub trait RandomSource {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Returns a fixed-size array of random bytes.
    fn random_array<const N: usize>(&self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.random_bytes(&mut bytes);
        bytes
    }
}

impl<R: RandomSource> RandomSource for &R {
    fn random_bytes(&self, buffer: &mut [u8]) {
        (**self).random_bytes(buffer);
    }
}

/// OS cryptographic RNG (getrandom).
///
/// Uses `/dev/urandom`, `getrandom(2)`, `BCryptGenRandom` or the platform
/// equivalent. Not reproducible.
///
/// # Panics
///
/// Panics if the OS RNG fails. A process without functioning cryptographic
/// randomness cannot produce unique nonce salts or private keys, and
/// continuing would compromise every cipher built afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl SystemRandom {
    /// Create a handle to the OS RNG.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for SystemRandom {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - cannot generate salts or keys");
    }
}

//! X25519 key agreement with HKDF-SHA256 key derivation
//!
//! Both parties generate a [`KeyPair`], swap raw 32-byte public keys, and call
//! [`KeyPair::derive_shared_key`] with the same salt. Diffie-Hellman
//! commutativity makes both results identical:
//!
//! ```text
//! X25519(a, B) == X25519(b, A)
//!        │
//!        ▼ HKDF-Extract(salt)
//!       PRK
//!        │
//!        ▼ HKDF-Expand(context, 32)
//! DerivedKey → AesGcmCipher
//! ```

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::{env::RandomSource, error::KeyExchangeError};

/// Raw X25519 public key size (32 bytes)
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Derived symmetric key size (32 bytes, AES-256)
pub const DERIVED_KEY_SIZE: usize = 32;

/// Domain separation label naming this construction (curve + KDF + cipher)
pub const DEFAULT_CONTEXT: &[u8] = b"ctx:x25519+hkdf+aes-gcm";

/// A 32-byte key derived from an X25519 exchange.
///
/// Suitable as the raw key of an [`crate::AesGcmCipher`]. Zeroized on drop.
#[derive(Clone)]
pub struct DerivedKey {
    key: [u8; DERIVED_KEY_SIZE],
}

impl DerivedKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; DERIVED_KEY_SIZE] {
        &self.key
    }
}

impl AsRef<[u8]> for DerivedKey {
    fn as_ref(&self) -> &[u8] {
        &self.key
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// An X25519 keypair.
///
/// The private half never leaves this struct: there is no accessor, `Debug`
/// shows only the public key, and the secret is zeroized on drop.
pub struct KeyPair {
    secret: StaticSecret,
    public: [u8; PUBLIC_KEY_SIZE],
}

impl KeyPair {
    /// Generate a fresh keypair from `rng`.
    ///
    /// The 32 random bytes are clamped into an X25519 scalar.
    pub fn generate(rng: &impl RandomSource) -> Self {
        let secret = random_secret(rng);
        let public = PublicKey::from(&secret).to_bytes();

        tracing::debug!("generated X25519 keypair");

        Self { secret, public }
    }

    /// Raw public key to send to the peer.
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public
    }

    /// Derive the shared key with [`DEFAULT_CONTEXT`] as HKDF info.
    ///
    /// # Errors
    ///
    /// - `InvalidPeerKey`: peer key is not 32 bytes or is a low-order point
    pub fn derive_shared_key(
        &self,
        peer_public: &[u8],
        salt: &[u8],
    ) -> Result<DerivedKey, KeyExchangeError> {
        self.derive_shared_key_with_context(peer_public, salt, DEFAULT_CONTEXT)
    }

    /// Derive the shared key with an explicit HKDF info string.
    ///
    /// Only for constructions other than the default one; both sides must
    /// agree on `context` out of band.
    ///
    /// # Security
    ///
    /// - The raw shared secret exists only inside this call and is zeroized
    ///   before it returns
    /// - The HKDF pseudorandom key lives only until the output key is
    ///   expanded; `hkdf` does not zeroize it, so it is dropped before this
    ///   call logs or returns
    /// - All-zero shared secrets (low-order peer points) are rejected
    pub fn derive_shared_key_with_context(
        &self,
        peer_public: &[u8],
        salt: &[u8],
        context: &[u8],
    ) -> Result<DerivedKey, KeyExchangeError> {
        let peer = import_peer(peer_public)?;

        let shared = self.secret.diffie_hellman(&peer);
        if !shared.was_contributory() {
            tracing::warn!("rejected low-order peer public key");
            return Err(KeyExchangeError::InvalidPeerKey {
                reason: "low-order point yields an all-zero shared secret".to_string(),
            });
        }

        let mut key = [0u8; DERIVED_KEY_SIZE];
        {
            let hkdf = Hkdf::<Sha256>::new(Some(salt), shared.as_bytes());
            drop(shared);
            hkdf.expand(context, &mut key).map_err(|_| KeyExchangeError::DerivationFailed)?;
        }

        tracing::debug!(salt_len = salt.len(), context_len = context.len(), "derived shared key");

        Ok(DerivedKey { key })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair").field("public", &self.public).finish_non_exhaustive()
    }
}

/// Draw a private scalar from `rng`.
///
/// The scalar is moved into the `StaticSecret` and the local buffer is
/// zeroized, so no unmanaged copy outlives this call.
fn random_secret(rng: &impl RandomSource) -> StaticSecret {
    let mut scalar = [0u8; 32];
    rng.random_bytes(&mut scalar);

    let secret = StaticSecret::from(scalar);
    scalar.zeroize();

    secret
}

/// Import a raw 32-byte peer public key.
fn import_peer(raw: &[u8]) -> Result<PublicKey, KeyExchangeError> {
    let bytes: [u8; PUBLIC_KEY_SIZE] =
        raw.try_into().map_err(|_| KeyExchangeError::InvalidPeerKey {
            reason: format!("expected {PUBLIC_KEY_SIZE} bytes, got {}", raw.len()),
        })?;

    Ok(PublicKey::from(bytes))
}

//! Payload encryption using AES-GCM with sequenced nonces
//!
//! A payload is self-describing:
//!
//! ```text
//! +-------------+---------------------+-----------+
//! | nonce (12)  | ciphertext (n)      | tag (16)  |
//! +-------------+---------------------+-----------+
//! ```
//!
//! No version byte and no length prefix; the transport frames payloads.

use std::fmt;

use aes_gcm::{
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
    aead::{Aead, KeyInit, consts::U12},
    aes::Aes192,
};

use crate::{
    env::RandomSource,
    error::CipherError,
    nonce::{NONCE_SIZE, NonceSequencer},
};

/// AES-GCM authentication tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Bytes a payload adds on top of its plaintext (nonce + tag)
pub const PAYLOAD_OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Payload length for a plaintext of `plaintext_len` bytes.
///
/// Returns `None` when the payload length would not fit in `usize`.
pub const fn payload_len(plaintext_len: usize) -> Option<usize> {
    plaintext_len.checked_add(PAYLOAD_OVERHEAD)
}

/// Plaintext length carried by a payload of `payload_len` bytes.
pub const fn plaintext_len(payload_len: usize) -> usize {
    payload_len.saturating_sub(PAYLOAD_OVERHEAD)
}

/// AES key size, selected by the raw key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 16-byte key
    Aes128,
    /// 24-byte key
    Aes192,
    /// 32-byte key
    Aes256,
}

impl KeySize {
    /// Key size for a raw key of `len` bytes, if supported.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }

    /// Key size in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::Aes128 => 128,
            Self::Aes192 => 192,
            Self::Aes256 => 256,
        }
    }
}

/// Cipher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherConfig {
    /// Number of payloads one cipher instance may ever encrypt
    pub message_limit: u64,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self { message_limit: u64::MAX }
    }
}

/// Imported AES key schedule, built once per cipher.
#[allow(clippy::large_enum_variant)]
enum ImportedKey {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl ImportedKey {
    fn import(raw_key: &[u8]) -> Result<Self, CipherError> {
        let invalid = CipherError::InvalidKey { actual: raw_key.len() };

        let imported = match KeySize::from_len(raw_key.len()).ok_or(invalid.clone())? {
            KeySize::Aes128 => Aes128Gcm::new_from_slice(raw_key).map(Self::Aes128),
            KeySize::Aes192 => Aes192Gcm::new_from_slice(raw_key).map(Self::Aes192),
            KeySize::Aes256 => Aes256Gcm::new_from_slice(raw_key).map(Self::Aes256),
        };

        imported.map_err(|_| invalid)
    }

    fn size(&self) -> KeySize {
        match self {
            Self::Aes128(_) => KeySize::Aes128,
            Self::Aes192(_) => KeySize::Aes192,
            Self::Aes256(_) => KeySize::Aes256,
        }
    }

    fn seal(&self, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Self::Aes128(cipher) => cipher.encrypt(nonce, plaintext),
            Self::Aes192(cipher) => cipher.encrypt(nonce, plaintext),
            Self::Aes256(cipher) => cipher.encrypt(nonce, plaintext),
        }
    }

    fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Self::Aes128(cipher) => cipher.decrypt(nonce, ciphertext),
            Self::Aes192(cipher) => cipher.decrypt(nonce, ciphertext),
            Self::Aes256(cipher) => cipher.decrypt(nonce, ciphertext),
        }
    }
}

/// AES-GCM cipher bound to one key and one nonce sequencer.
///
/// # Security
///
/// - Use a fresh key for every instance. Nonce uniqueness is guaranteed
///   within an instance only; two instances under one key collide on their
///   4-byte salt with probability ~2^-32 per pair.
/// - `encrypt` takes `&mut self`. Sharing one instance between producers
///   requires external locking; one instance per connection direction is the
///   intended shape.
/// - `decrypt` either returns the full verified plaintext or an error.
pub struct AesGcmCipher {
    key: ImportedKey,
    nonces: NonceSequencer,
}

impl AesGcmCipher {
    /// Import `raw_key` and draw a fresh nonce salt from `rng`.
    ///
    /// # Errors
    ///
    /// - `InvalidKey`: key length is not 16, 24 or 32 bytes
    pub fn new(raw_key: &[u8], rng: &impl RandomSource) -> Result<Self, CipherError> {
        Self::with_config(raw_key, rng, CipherConfig::default())
    }

    /// Same as [`new`](Self::new) with explicit configuration.
    pub fn with_config(
        raw_key: &[u8],
        rng: &impl RandomSource,
        config: CipherConfig,
    ) -> Result<Self, CipherError> {
        let nonces = NonceSequencer::new(rng).with_limit(config.message_limit);
        Self::with_sequencer(raw_key, nonces)
    }

    /// Build a cipher around an existing sequencer (deterministic salts for
    /// tests and fuzzing).
    pub fn with_sequencer(raw_key: &[u8], nonces: NonceSequencer) -> Result<Self, CipherError> {
        let key = ImportedKey::import(raw_key)?;

        tracing::debug!(
            key_bits = key.size().bits(),
            message_limit = nonces.remaining(),
            "AES-GCM cipher constructed"
        );

        Ok(Self { key, nonces })
    }

    /// Size of the imported key.
    pub fn key_size(&self) -> KeySize {
        self.key.size()
    }

    /// Payloads this instance can still encrypt.
    pub fn nonces_remaining(&self) -> u64 {
        self.nonces.remaining()
    }

    /// Encrypt `plaintext` into `nonce || ciphertext || tag`.
    ///
    /// Output is always `plaintext.len() + 28` bytes. The nonce is consumed
    /// even if sealing fails.
    ///
    /// # Errors
    ///
    /// - `NonceExhausted`: the instance reached its message limit
    /// - `SealFailed`: plaintext beyond the AES-GCM length limit
    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let nonce = self.nonces.next()?;

        let ciphertext = self
            .key
            .seal(&nonce, plaintext)
            .map_err(|_| CipherError::SealFailed { len: plaintext.len() })?;

        let mut payload = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(payload)
    }

    /// Decrypt a payload produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: payload shorter than 28 bytes
    /// - `Authentication`: tag mismatch (tampered payload or wrong key)
    pub fn decrypt(&self, payload: &[u8]) -> Result<Vec<u8>, CipherError> {
        if payload.len() < PAYLOAD_OVERHEAD {
            return Err(CipherError::InvalidInput {
                expected_at_least: PAYLOAD_OVERHEAD,
                actual: payload.len(),
            });
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_SIZE);

        self.key.open(nonce, ciphertext).map_err(|_| {
            tracing::warn!(payload_len = payload.len(), "payload failed authentication");
            CipherError::Authentication
        })
    }
}

impl fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("key_size", &self.key.size())
            .field("nonces", &self.nonces)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRandom(u8);

    impl RandomSource for FixedRandom {
        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(self.0);
        }
    }

    fn test_key(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    fn test_cipher() -> AesGcmCipher {
        AesGcmCipher::new(&test_key(32), &FixedRandom(0x5A)).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut cipher = test_cipher();
        let plaintext = b"Hello, World!";

        let payload = cipher.encrypt(plaintext).unwrap();
        let decrypted = cipher.decrypt(&payload).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn encrypt_decrypt_empty_message() {
        let mut cipher = test_cipher();

        let payload = cipher.encrypt(b"").unwrap();
        assert_eq!(payload.len(), PAYLOAD_OVERHEAD);

        let decrypted = cipher.decrypt(&payload).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn encrypt_decrypt_large_message() {
        let mut cipher = test_cipher();
        let plaintext = vec![0x42u8; 64 * 1024]; // 64KB

        let payload = cipher.encrypt(&plaintext).unwrap();
        let decrypted = cipher.decrypt(&payload).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn payload_is_plaintext_plus_overhead() {
        let mut cipher = test_cipher();
        let plaintext = b"test message";

        let payload = cipher.encrypt(plaintext).unwrap();

        assert_eq!(payload.len(), plaintext.len() + 28);
        assert_eq!(Some(payload.len()), payload_len(plaintext.len()));
        assert_eq!(plaintext_len(payload.len()), plaintext.len());
    }

    #[test]
    fn payload_starts_with_sequenced_nonce() {
        let mut cipher = test_cipher();

        let first = cipher.encrypt(b"a").unwrap();
        let second = cipher.encrypt(b"a").unwrap();

        assert_eq!(&first[..12], &[0x5A, 0x5A, 0x5A, 0x5A, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&second[..12], &[0x5A, 0x5A, 0x5A, 0x5A, 0, 0, 0, 0, 0, 0, 0, 1]);
        // Same plaintext, different nonce
        assert_ne!(first[12..], second[12..]);
    }

    #[test]
    fn accepts_all_aes_key_sizes() {
        for (len, size) in [(16, KeySize::Aes128), (24, KeySize::Aes192), (32, KeySize::Aes256)] {
            let mut cipher = AesGcmCipher::new(&test_key(len), &FixedRandom(0)).unwrap();
            assert_eq!(cipher.key_size(), size);

            let payload = cipher.encrypt(b"key size check").unwrap();
            assert_eq!(cipher.decrypt(&payload).unwrap(), b"key size check");
        }
    }

    #[test]
    fn rejects_invalid_key_lengths() {
        for len in [0, 1, 10, 15, 17, 23, 25, 31, 33, 64] {
            let result = AesGcmCipher::new(&test_key(len), &FixedRandom(0));
            assert!(
                matches!(result, Err(CipherError::InvalidKey { actual }) if actual == len),
                "length {len} must be rejected"
            );
        }
    }

    #[test]
    fn rejects_short_payload() {
        let cipher = test_cipher();

        for len in [0, 10, 12, 27] {
            assert_eq!(
                cipher.decrypt(&vec![0u8; len]),
                Err(CipherError::InvalidInput { expected_at_least: 28, actual: len })
            );
        }
    }

    #[test]
    fn minimum_length_garbage_fails_authentication() {
        let cipher = test_cipher();
        assert_eq!(cipher.decrypt(&[0u8; 28]), Err(CipherError::Authentication));
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let mut sender = test_cipher();
        let payload = sender.encrypt(b"secret message").unwrap();

        let receiver = AesGcmCipher::new(&[0xFF; 32], &FixedRandom(0x5A)).unwrap();
        assert_eq!(receiver.decrypt(&payload), Err(CipherError::Authentication));
    }

    #[test]
    fn tampered_payload_fails_decryption() {
        let mut cipher = test_cipher();
        let payload = cipher.encrypt(b"original message").unwrap();

        // Nonce, ciphertext and tag regions
        for index in [0, 11, 12, payload.len() - 1] {
            let mut tampered = payload.clone();
            tampered[index] ^= 0x01;
            assert_eq!(cipher.decrypt(&tampered), Err(CipherError::Authentication));
        }
    }

    #[test]
    fn separate_instances_share_a_key() {
        let key = test_key(24);
        let mut alice = AesGcmCipher::new(&key, &FixedRandom(1)).unwrap();
        let mut bob = AesGcmCipher::new(&key, &FixedRandom(2)).unwrap();

        let to_bob = alice.encrypt(b"ping").unwrap();
        let to_alice = bob.encrypt(b"pong").unwrap();

        assert_eq!(bob.decrypt(&to_bob).unwrap(), b"ping");
        assert_eq!(alice.decrypt(&to_alice).unwrap(), b"pong");
    }

    #[test]
    fn message_limit_stops_encryption_but_not_decryption() {
        let config = CipherConfig { message_limit: 3 };
        let mut cipher = AesGcmCipher::with_config(&test_key(16), &FixedRandom(0), config).unwrap();

        let payloads: Vec<_> = (0..3).map(|_| cipher.encrypt(b"x").unwrap()).collect();
        assert_eq!(cipher.nonces_remaining(), 0);

        assert_eq!(cipher.encrypt(b"x"), Err(CipherError::NonceExhausted { limit: 3 }));
        assert!(cipher.encrypt(b"x").unwrap_err().is_fatal());

        for payload in &payloads {
            assert_eq!(cipher.decrypt(payload).unwrap(), b"x");
        }
    }

    #[test]
    fn debug_does_not_print_key() {
        let cipher = test_cipher();
        let rendered = format!("{cipher:?}");

        assert!(rendered.contains("Aes256"));
        assert!(!rendered.contains("000102"));
    }

    #[test]
    fn length_helpers_do_not_overflow() {
        assert_eq!(payload_len(0), Some(PAYLOAD_OVERHEAD));
        assert_eq!(payload_len(usize::MAX - PAYLOAD_OVERHEAD), Some(usize::MAX));
        assert_eq!(payload_len(usize::MAX - 10), None);
        assert_eq!(payload_len(usize::MAX), None);

        assert_eq!(plaintext_len(0), 0);
        assert_eq!(plaintext_len(PAYLOAD_OVERHEAD - 1), 0);
        assert_eq!(plaintext_len(usize::MAX), usize::MAX - PAYLOAD_OVERHEAD);
    }

    #[test]
    fn key_size_bits() {
        assert_eq!(KeySize::Aes128.bits(), 128);
        assert_eq!(KeySize::Aes192.bits(), 192);
        assert_eq!(KeySize::Aes256.bits(), 256);
        assert_eq!(KeySize::from_len(20), None);
    }
}

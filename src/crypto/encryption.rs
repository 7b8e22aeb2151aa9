//! AES-256-GCM authenticated encryption of individual secrets.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext, so `decrypt` is self-contained.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, VaultError};

use super::keys::CipherKey;

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypts and decrypts secret values under one vault key.
pub struct CipherCodec {
    cipher: Aes256Gcm,
}

impl CipherCodec {
    /// Build a codec from the vault key.
    pub fn new(key: &CipherKey) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;
        Ok(Self { cipher })
    }

    /// Encrypt `plaintext`, returning nonce || ciphertext.
    ///
    /// Two calls with the same input never produce the same output.
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    /// Decrypt data that was produced by `encrypt`.
    ///
    /// Fails with `Format` when the buffer cannot possibly be a ciphertext
    /// and with `Integrity` when the auth tag does not verify.
    pub fn decrypt(&self, ciphertext_with_nonce: &[u8]) -> Result<Zeroizing<String>> {
        if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
            return Err(VaultError::Format(format!(
                "expected at least {} bytes, got {}",
                NONCE_LEN + TAG_LEN,
                ciphertext_with_nonce.len()
            )));
        }

        let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| VaultError::Integrity)?;

        // On error, zeroize the bytes inside the error before discarding.
        String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::Format("decrypted secret is not valid UTF-8".into())
        })
    }
}

impl std::fmt::Debug for CipherCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(byte: u8) -> CipherCodec {
        CipherCodec::new(&CipherKey::new([byte; 32])).unwrap()
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let c = codec(0x01);
        let ct = c.encrypt("").unwrap();
        assert_eq!(ct.len(), NONCE_LEN + TAG_LEN);
        assert_eq!(c.decrypt(&ct).unwrap().as_str(), "");
    }

    #[test]
    fn short_input_is_a_format_error() {
        let c = codec(0x02);
        let result = c.decrypt(&[0u8; NONCE_LEN + TAG_LEN - 1]);
        assert!(matches!(result, Err(VaultError::Format(_))));
    }

    #[test]
    fn foreign_key_is_an_integrity_error() {
        let ct = codec(0x03).encrypt("hunter2").unwrap();
        let result = codec(0x04).decrypt(&ct);
        assert!(matches!(result, Err(VaultError::Integrity)));
    }

    #[test]
    fn unicode_roundtrips() {
        let c = codec(0x05);
        let secret = "contraseña-🔒-密码";
        let ct = c.encrypt(secret).unwrap();
        assert_eq!(c.decrypt(&ct).unwrap().as_str(), secret);
    }
}

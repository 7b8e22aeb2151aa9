//! Password-based key derivation using PBKDF2-HMAC-SHA512.
//!
//! The admin passphrase is never stored.  Only a random salt and the
//! PBKDF2 output are kept, and every verification re-derives the hash
//! from the candidate passphrase.

use rand::TryRngCore;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived hash in bytes (the SHA-512 output size).
pub const HASH_LEN: usize = 64;

/// PBKDF2 round count.  Fixed: the admin credentials file does not
/// record it, so changing it invalidates every existing vault.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive the 64-byte admin hash from a passphrase and salt.
///
/// The same passphrase + salt always produce the same hash.
pub fn derive_admin_hash(passphrase: &[u8], salt: &[u8]) -> [u8; HASH_LEN] {
    let mut hash = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(passphrase, salt, PBKDF2_ITERATIONS, &mut hash);
    hash
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("OS random source unavailable: {e}")))?;
    Ok(salt)
}

/// Compare two hashes without leaking where they first differ.
pub fn hashes_match(candidate: &[u8], stored: &[u8]) -> bool {
    candidate.ct_eq(stored).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_hash() {
        let salt = [0x11u8; SALT_LEN];
        assert_eq!(
            derive_admin_hash(b"Secret123", &salt),
            derive_admin_hash(b"Secret123", &salt)
        );
    }

    #[test]
    fn different_salt_different_hash() {
        let a = derive_admin_hash(b"Secret123", &[0x01; SALT_LEN]);
        let b = derive_admin_hash(b"Secret123", &[0x02; SALT_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }

    #[test]
    fn hashes_match_requires_equal_length_and_content() {
        assert!(hashes_match(&[1, 2, 3], &[1, 2, 3]));
        assert!(!hashes_match(&[1, 2, 3], &[1, 2, 4]));
        assert!(!hashes_match(&[1, 2, 3], &[1, 2]));
    }
}

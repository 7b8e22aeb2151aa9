//! Integration tests for the CredVault crypto module.

use credvault::crypto::encryption::{NONCE_LEN, TAG_LEN};
use credvault::crypto::kdf::{hashes_match, HASH_LEN, SALT_LEN};
use credvault::crypto::{derive_admin_hash, generate_salt, CipherCodec, CipherKey, KeyStore};
use credvault::errors::VaultError;
use tempfile::TempDir;

fn codec() -> CipherCodec {
    CipherCodec::new(&CipherKey::generate().unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let codec = codec();
    let plaintext = "correct horse battery staple";

    let ciphertext = codec.encrypt(plaintext).expect("encrypt should succeed");
    assert_eq!(ciphertext.len(), NONCE_LEN + plaintext.len() + TAG_LEN);

    let recovered = codec.decrypt(&ciphertext).expect("decrypt should succeed");
    assert_eq!(recovered.as_str(), plaintext);
}

#[test]
fn unicode_secret_roundtrip() {
    let codec = codec();
    let ct = codec.encrypt("pässwörd-🔑").unwrap();
    assert_eq!(codec.decrypt(&ct).unwrap().as_str(), "pässwörd-🔑");
}

#[test]
fn encrypt_produces_different_ciphertext_each_time() {
    let codec = codec();
    let ct1 = codec.encrypt("hunter2").unwrap();
    let ct2 = codec.encrypt("hunter2").unwrap();

    // Fresh nonce per call.
    assert_ne!(ct1, ct2, "two encryptions of the same plaintext must differ");
    assert_ne!(&ct1[..NONCE_LEN], &ct2[..NONCE_LEN]);
}

// ---------------------------------------------------------------------------
// Tampering
// ---------------------------------------------------------------------------

#[test]
fn every_single_bit_flip_is_detected() {
    let codec = codec();
    let ciphertext = codec.encrypt("s3cret!").unwrap();

    for byte in 0..ciphertext.len() {
        for bit in 0..8 {
            let mut tampered = ciphertext.clone();
            tampered[byte] ^= 1 << bit;
            assert!(
                matches!(codec.decrypt(&tampered), Err(VaultError::Integrity)),
                "flip of bit {bit} in byte {byte} went unnoticed"
            );
        }
    }
}

#[test]
fn wrong_key_fails_integrity() {
    let ciphertext = codec().encrypt("s3cret!").unwrap();
    assert!(matches!(
        codec().decrypt(&ciphertext),
        Err(VaultError::Integrity)
    ));
}

#[test]
fn truncated_ciphertext_is_a_format_error() {
    let codec = codec();
    let short = vec![0u8; NONCE_LEN + TAG_LEN - 1];
    assert!(matches!(codec.decrypt(&short), Err(VaultError::Format(_))));
    assert!(matches!(codec.decrypt(&[]), Err(VaultError::Format(_))));
}

// ---------------------------------------------------------------------------
// Admin passphrase hashing
// ---------------------------------------------------------------------------

#[test]
fn admin_hash_is_deterministic_per_salt() {
    let salt = generate_salt().unwrap();
    assert_eq!(salt.len(), SALT_LEN);

    let a = derive_admin_hash(b"Secret123", &salt);
    let b = derive_admin_hash(b"Secret123", &salt);
    assert_eq!(a.len(), HASH_LEN);
    assert!(hashes_match(&a, &b));

    let other_salt = generate_salt().unwrap();
    assert_ne!(salt, other_salt);
    let c = derive_admin_hash(b"Secret123", &other_salt);
    assert!(!hashes_match(&a, &c));
}

#[test]
fn admin_hash_differs_per_passphrase() {
    let salt = [7u8; SALT_LEN];
    let a = derive_admin_hash(b"Secret123", &salt);
    let b = derive_admin_hash(b"Secret124", &salt);
    assert!(!hashes_match(&a, &b));
}

// ---------------------------------------------------------------------------
// Key file
// ---------------------------------------------------------------------------

#[test]
fn key_file_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secret.key");

    let ciphertext = {
        let key = KeyStore::new(&path).get_or_create_key().unwrap();
        CipherCodec::new(&key).unwrap().encrypt("persisted").unwrap()
    };

    let key = KeyStore::new(&path).get_or_create_key().unwrap();
    let codec = CipherCodec::new(&key).unwrap();
    assert_eq!(codec.decrypt(&ciphertext).unwrap().as_str(), "persisted");
}

#[test]
fn wrong_length_key_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secret.key");
    std::fs::write(&path, [1u8; 31]).unwrap();

    let result = KeyStore::new(&path).get_or_create_key();
    assert!(matches!(result, Err(VaultError::Storage(_))));
    // The bad file is never silently replaced.
    assert_eq!(std::fs::read(&path).unwrap().len(), 31);
}

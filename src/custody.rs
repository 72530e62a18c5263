// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Signing-key custody: encryption at rest for wallet private keys.
//!
//! Keys are sealed with AES-256-GCM under a key derived from the
//! process-wide master secret via PBKDF2-SHA256 with a per-key random salt.
//! The stored form is `salt:nonce:tag:ciphertext`, all hex.
//!
//! This is a thin primitive: key *generation* happens in the excluded
//! wallet-provisioning collaborator, and the master secret arrives via
//! configuration.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use async_trait::async_trait;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::remit::KeyDecryptor;

const KEY_LEN: usize = 32;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const PBKDF2_ROUNDS: u32 = 100_000;

/// Errors from sealing or unsealing a signing key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyCipherError {
    #[error("Malformed encrypted key: {0}")]
    Malformed(String),

    #[error("Key decryption failed: wrong master secret or corrupted ciphertext")]
    Decrypt,

    #[error("Key encryption failed: {0}")]
    Encrypt(String),
}

/// AES-256-GCM cipher for signing keys.
#[derive(Debug, Clone, Default)]
pub struct KeyCipher;

impl KeyCipher {
    pub fn new() -> Self {
        Self
    }

    fn derive_key(master_secret: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2_hmac::<Sha256>(master_secret.as_bytes(), salt, PBKDF2_ROUNDS, &mut *key);
        key
    }

    /// Seal a signing key under the master secret.
    pub fn encrypt_signing_key(
        &self,
        signing_key: &str,
        master_secret: &str,
    ) -> Result<String, KeyCipherError> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

        let key = Self::derive_key(master_secret, &salt);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));

        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), signing_key.as_bytes())
            .map_err(|e| KeyCipherError::Encrypt(e.to_string()))?;

        // aes-gcm appends the tag; store it as its own segment.
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        Ok([
            hex::encode(salt),
            hex::encode(nonce_bytes),
            hex::encode(tag),
            hex::encode(ciphertext),
        ]
        .join(":"))
    }

    /// Unseal a signing key. Fails on a malformed blob or a wrong secret.
    pub fn decrypt_signing_key(
        &self,
        encrypted: &str,
        master_secret: &str,
    ) -> Result<String, KeyCipherError> {
        let parts: Vec<&str> = encrypted.split(':').collect();
        let [salt_hex, nonce_hex, tag_hex, ciphertext_hex] = parts.as_slice() else {
            return Err(KeyCipherError::Malformed(format!(
                "expected 4 segments, got {}",
                parts.len()
            )));
        };

        let salt = decode_segment(salt_hex, "salt")?;
        let nonce_bytes = decode_segment(nonce_hex, "nonce")?;
        let tag = decode_segment(tag_hex, "tag")?;
        let ciphertext = decode_segment(ciphertext_hex, "ciphertext")?;

        if nonce_bytes.len() != NONCE_LEN {
            return Err(KeyCipherError::Malformed("bad nonce length".to_string()));
        }

        let key = Self::derive_key(master_secret, &salt);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), sealed.as_slice())
            .map_err(|_| KeyCipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| KeyCipherError::Decrypt)
    }
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, KeyCipherError> {
    hex::decode(segment).map_err(|_| KeyCipherError::Malformed(format!("bad {name} hex")))
}

#[async_trait]
impl KeyDecryptor for KeyCipher {
    async fn decrypt_signing_key(
        &self,
        encrypted: &str,
        master_secret: &str,
    ) -> Result<String, KeyCipherError> {
        KeyCipher::decrypt_signing_key(self, encrypted, master_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const MASTER: &str = "correct horse battery staple but thirty-two bytes";

    #[test]
    fn seal_and_unseal_round_trip() {
        let cipher = KeyCipher::new();
        let sealed = cipher.encrypt_signing_key(SIGNING_KEY, MASTER).unwrap();

        assert_eq!(sealed.split(':').count(), 4);
        assert!(!sealed.contains(SIGNING_KEY));

        let opened = cipher.decrypt_signing_key(&sealed, MASTER).unwrap();
        assert_eq!(opened, SIGNING_KEY);
    }

    #[test]
    fn random_salt_makes_ciphertexts_differ() {
        let cipher = KeyCipher::new();
        let a = cipher.encrypt_signing_key(SIGNING_KEY, MASTER).unwrap();
        let b = cipher.encrypt_signing_key(SIGNING_KEY, MASTER).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_secret_fails() {
        let cipher = KeyCipher::new();
        let sealed = cipher.encrypt_signing_key(SIGNING_KEY, MASTER).unwrap();
        let err = cipher
            .decrypt_signing_key(&sealed, "wrong secret")
            .unwrap_err();
        assert_eq!(err, KeyCipherError::Decrypt);
    }

    #[test]
    fn malformed_blobs_are_rejected() {
        let cipher = KeyCipher::new();
        assert!(matches!(
            cipher.decrypt_signing_key("only:three:parts", MASTER),
            Err(KeyCipherError::Malformed(_))
        ));
        assert!(matches!(
            cipher.decrypt_signing_key("zz:zz:zz:zz", MASTER),
            Err(KeyCipherError::Malformed(_))
        ));
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let cipher = KeyCipher::new();
        let sealed = cipher.encrypt_signing_key(SIGNING_KEY, MASTER).unwrap();

        let mut parts: Vec<String> = sealed.split(':').map(str::to_string).collect();
        let flipped = if parts[3].ends_with('0') { "1" } else { "0" };
        let len = parts[3].len();
        parts[3].replace_range(len - 1..len, flipped);

        let err = cipher
            .decrypt_signing_key(&parts.join(":"), MASTER)
            .unwrap_err();
        assert_eq!(err, KeyCipherError::Decrypt);
    }
}

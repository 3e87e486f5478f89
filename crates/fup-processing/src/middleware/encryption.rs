//! Password-based encryption of the upload buffer
//!
//! Output layout is `salt(16) ‖ nonce(12) ‖ ciphertext`, where the AES-256-GCM key
//! is derived from the password and salt with Argon2.

use super::Middleware;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use argon2::Argon2;
use async_trait::async_trait;
use fup_core::{FupError, FupResult, ProcessedFile, ProcessedFileUpdate};

/// Extension given to encrypted files
pub const ENCRYPTED_EXTENSION: &str = ".encf";

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32], argon2::Error> {
    let mut key = [0u8; 32];
    Argon2::default().hash_password_into(password.as_bytes(), salt, &mut key)?;
    Ok(key)
}

/// Encrypt `data` with a key derived from `password`
pub fn encrypt_buffer(data: &[u8], password: &str) -> FupResult<Vec<u8>> {
    let salt: [u8; SALT_LEN] = rand::random();
    let key = derive_key(password, &salt)
        .map_err(|e| FupError::Other(anyhow::anyhow!("Key derivation failed: {}", e)))?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, data)
        .map_err(|e| FupError::Other(anyhow::anyhow!("Encryption failed: {}", e)))?;

    let mut combined = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&salt);
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);
    Ok(combined)
}

/// Decrypt a buffer produced by [`encrypt_buffer`].
///
/// A wrong password or corrupt input yields an empty buffer.
pub fn decrypt_buffer(data: &[u8], password: &str) -> Vec<u8> {
    if data.len() < SALT_LEN + NONCE_LEN {
        tracing::debug!(size_bytes = data.len(), "Encrypted data too short");
        return Vec::new();
    }

    let (salt, rest) = data.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let Ok(key) = derive_key(password, salt) else {
        return Vec::new();
    };
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

    match cipher.decrypt(Nonce::from_slice(nonce), ciphertext) {
        Ok(plaintext) => plaintext,
        Err(_) => {
            tracing::debug!(size_bytes = data.len(), "Decryption failed");
            Vec::new()
        }
    }
}

/// Encrypts every file type and renames it to `<stem>.encf`
#[derive(Clone)]
pub struct EncryptionMiddleware {
    password: String,
    types_permitted: Vec<String>,
}

impl EncryptionMiddleware {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            types_permitted: vec![fup_core::mime_types::ALL_TYPES.to_string()],
        }
    }
}

impl std::fmt::Debug for EncryptionMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionMiddleware")
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Middleware for EncryptionMiddleware {
    async fn transform(&self, file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
        if self.password.is_empty() {
            return Err(FupError::EmptyPassword {
                stem: file.file_name_stem,
            });
        }

        let password = self.password.clone();
        let buffer = file.buffer;
        let encrypted = tokio::task::spawn_blocking(move || encrypt_buffer(&buffer, &password))
            .await
            .map_err(|e| FupError::Other(e.into()))??;

        Ok(ProcessedFileUpdate {
            file_name_stem: file.file_name_stem,
            file_extension: ENCRYPTED_EXTENSION.to_string(),
            buffer: encrypted,
        })
    }

    fn types_permitted(&self) -> &[String] {
        &self.types_permitted
    }

    fn name(&self) -> &str {
        "encryption"
    }
}

use sodiumoxide::crypto::hash::sha256;
use sodiumoxide::crypto::pwhash::argon2id13;
use sodiumoxide::crypto::secretbox;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::models::{SecureString, StoredEntry};

/// Must run before any other libsodium call.
pub fn init() -> Result<(), CryptoError> {
    sodiumoxide::init().map_err(|_| CryptoError::Init)
}

/// Secretbox key for store entries. `secretbox::Key` wipes itself on drop.
pub struct MasterKey {
    key: secretbox::Key,
}

impl MasterKey {
    pub fn from_password(
        password: &SecureString,
        salt: &argon2id13::Salt,
    ) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; secretbox::KEYBYTES];
        let derived = argon2id13::derive_key(
            &mut bytes,
            password.expose().as_bytes(),
            salt,
            argon2id13::OPSLIMIT_INTERACTIVE,
            argon2id13::MEMLIMIT_INTERACTIVE,
        )
        .map(|raw| secretbox::Key::from_slice(raw));
        bytes.zeroize();

        derived
            .ok()
            .flatten()
            .map(|key| Self { key })
            .ok_or(CryptoError::KeyDerivation)
    }

    /// Seals `value` under a fresh nonce.
    pub fn seal(&self, value: &SecureString) -> StoredEntry {
        let nonce = secretbox::gen_nonce();
        let ciphertext = secretbox::seal(value.expose().as_bytes(), &nonce, &self.key);
        StoredEntry::new(nonce, ciphertext)
    }

    pub fn open(&self, entry: &StoredEntry) -> Result<SecureString, CryptoError> {
        let plaintext = secretbox::open(&entry.ciphertext, &entry.nonce, &self.key)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext)
            .map(SecureString::new)
            .map_err(|err| {
                err.into_bytes().zeroize();
                CryptoError::InvalidUtf8
            })
    }
}

/// Derives entry keys from the master password and the configured salt.
#[derive(Debug, Default, Clone)]
pub struct Encryptor {
    salt: Option<argon2id13::Salt>,
}

impl Encryptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured salt is free text; the first `SALTBYTES` of its
    /// SHA-256 digest become the argon2id salt.
    pub fn set_salt(&mut self, salt: &str) {
        let digest = sha256::hash(salt.as_bytes());
        self.salt = argon2id13::Salt::from_slice(&digest.0[..argon2id13::SALTBYTES]);
    }

    pub fn derive_key(&self, master_password: &SecureString) -> Result<MasterKey, CryptoError> {
        let salt = self.salt.as_ref().ok_or(CryptoError::SaltNotSet)?;
        MasterKey::from_password(master_password, salt)
    }
}

pub fn hash_password(password: &str) -> Result<argon2id13::HashedPassword, CryptoError> {
    argon2id13::pwhash(
        password.as_bytes(),
        argon2id13::OPSLIMIT_INTERACTIVE,
        argon2id13::MEMLIMIT_INTERACTIVE,
    )
    .map_err(|_| CryptoError::PasswordHash)
}

pub fn verify_password(hash: &argon2id13::HashedPassword, password: &str) -> bool {
    argon2id13::pwhash_verify(hash, password.as_bytes())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sodiumoxide::crypto::secretbox;
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroizing;

/// A decrypted secret held in memory.
///
/// The text is wiped when the value is dropped. `Display` renders the text
/// because the tool prints secrets on purpose; `Debug` never does.
#[derive(Clone, Default)]
pub struct SecureString {
    inner: Zeroizing<String>,
}

impl SecureString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(value.into()),
        }
    }

    pub fn expose(&self) -> &str {
        self.inner.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SecureString {}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expose())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureString([REDACTED])")
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// An encrypted value as kept in the password store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub nonce: secretbox::Nonce,
    pub ciphertext: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredEntry {
    pub fn new(nonce: secretbox::Nonce, ciphertext: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            nonce,
            ciphertext,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreData {
    pub entries: BTreeMap<String, StoredEntry>,
    pub version: String,
}

impl StoreData {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            version: "1.0.0".to_string(),
        }
    }

    /// Inserts or replaces the entry for `handle`, keeping the original
    /// creation time on replace.
    pub fn upsert(&mut self, handle: &str, mut entry: StoredEntry) {
        if let Some(existing) = self.entries.get(handle) {
            entry.created_at = existing.created_at;
        }
        self.entries.insert(handle.to_string(), entry);
    }

    pub fn remove(&mut self, handle: &str) -> bool {
        self.entries.remove(handle).is_some()
    }

    pub fn find(&self, handle: &str) -> Option<&StoredEntry> {
        self.entries.get(handle)
    }

    pub fn handles(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl Default for StoreData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_string_renders_text_but_redacts_debug() {
        let secret = SecureString::new("s3cret");
        assert_eq!(secret.to_string(), "s3cret");
        assert_eq!(format!("{:?}", secret), "SecureString([REDACTED])");
    }

    #[test]
    fn secure_string_compares_by_content() {
        assert_eq!(SecureString::from("abc"), SecureString::from("abc".to_string()));
        assert_ne!(SecureString::from("abc"), SecureString::from("abd"));
    }

    #[test]
    fn upsert_keeps_creation_time() {
        let mut data = StoreData::new();
        let mut first = StoredEntry::new(secretbox::gen_nonce(), vec![1]);
        first.created_at = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        data.upsert("apiKey", first);

        data.upsert("apiKey", StoredEntry::new(secretbox::gen_nonce(), vec![2]));

        let entry = data.find("apiKey").unwrap();
        assert_eq!(entry.ciphertext, vec![2]);
        assert_eq!(entry.created_at.timestamp(), 0);
    }

    #[test]
    fn remove_reports_whether_anything_was_removed() {
        let mut data = StoreData::new();
        data.upsert("a", StoredEntry::new(secretbox::gen_nonce(), vec![]));

        assert!(data.remove("a"));
        assert!(!data.remove("a"));
        assert!(data.handles().is_empty());
    }
}

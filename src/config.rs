//! Passman configuration and runtime settings.
//!
//! The passman configuration file is not well-formed XML, so the salt is
//! pulled out with a literal substring scan instead of a parser. The value
//! is taken verbatim: no trimming, no entity decoding.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub const SALT_TAG: &str = "<value name=\"salt\">";
pub const SALT_TAG_CLOSE: &str = "</value>";

pub const STRICT_STORE_ENV_VAR: &str = "PASSMAN_STRICT_STORE";

/// Returns the text between the first salt tag and the next closing tag.
pub fn extract_salt(document: &str) -> Option<&str> {
    let start = document.find(SALT_TAG)? + SALT_TAG.len();
    let len = document[start..].find(SALT_TAG_CLOSE)?;
    Some(&document[start..start + len])
}

pub fn read_salt(path: &Path) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // Non-UTF-8 bytes outside the salt tags must not break the scan.
    let document = String::from_utf8_lossy(&bytes);

    extract_salt(&document)
        .map(str::to_string)
        .ok_or_else(|| ConfigError::SaltNotFound {
            path: path.to_path_buf(),
        })
}

/// What to do when the password store cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreInitPolicy {
    /// Report the failure and carry on; every store access then fails.
    #[default]
    Lenient,
    /// Abort the run.
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub store_policy: StoreInitPolicy,
}

impl Settings {
    pub fn from_env() -> Self {
        let strict = std::env::var(STRICT_STORE_ENV_VAR)
            .map(|value| is_truthy(&value))
            .unwrap_or(false);

        Self {
            store_policy: if strict {
                StoreInitPolicy::Strict
            } else {
                StoreInitPolicy::Lenient
            },
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

//! Master password file and retrieval with a bounded number of attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sodiumoxide::crypto::pwhash::argon2id13;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::crypto;
use crate::error::MasterPasswordError;
use crate::logging::Logger;
use crate::models::SecureString;

/// Non-interactive master password source, checked before prompting.
pub const MASTER_PASSWORD_ENV_VAR: &str = "PASSMAN_MASTER_PASSWORD";

pub const DEFAULT_RETRY_LIMIT: u32 = 3;

#[derive(Debug, Serialize, Deserialize)]
pub struct MasterPasswordFile {
    pub hash: argon2id13::HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where candidate master passwords come from.
pub trait PasswordPrompt {
    fn read_password(&mut self, attempt: u32, limit: u32) -> io::Result<SecureString>;
}

/// Reads `PASSMAN_MASTER_PASSWORD`, otherwise asks on the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&mut self, attempt: u32, limit: u32) -> io::Result<SecureString> {
        if let Ok(password) = std::env::var(MASTER_PASSWORD_ENV_VAR) {
            if !password.is_empty() {
                return Ok(SecureString::new(password));
            }
        }

        let password = rpassword::prompt_password(format!(
            "Enter master password (attempt {attempt} of {limit}): "
        ))?;
        Ok(SecureString::new(password))
    }
}

pub struct MasterPassword {
    file_name: PathBuf,
    retry_limit: u32,
    logger: Logger,
}

impl MasterPassword {
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            retry_limit: DEFAULT_RETRY_LIMIT,
            logger: Logger::silent(),
        }
    }

    pub fn set_retry_limit(&mut self, limit: u32) {
        self.retry_limit = limit.max(1);
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Writes a fresh master password file. Never replaces an existing one.
    pub fn create(path: &Path, password: &str) -> Result<(), MasterPasswordError> {
        if path.exists() {
            return Err(MasterPasswordError::WouldOverwrite(path.to_path_buf()));
        }

        let now = Utc::now();
        let file = MasterPasswordFile {
            hash: crypto::hash_password(password)?,
            created_at: now,
            updated_at: now,
        };
        let content = serde_json::to_vec(&file).map_err(|source| MasterPasswordError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        let io_err = |source| MasterPasswordError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut out = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)
            .map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            out.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }

        out.write_all(&content).map_err(io_err)?;
        Ok(())
    }

    /// Asks `prompt` for the master password until one matches the file or
    /// the retry limit runs out.
    pub fn retrieve(
        &self,
        prompt: &mut dyn PasswordPrompt,
    ) -> Result<SecureString, MasterPasswordError> {
        let file = self.load()?;
        self.logger.debug(format!(
            "master password file {} loaded",
            self.file_name().display()
        ));

        for attempt in 1..=self.retry_limit {
            let candidate = prompt
                .read_password(attempt, self.retry_limit)
                .map_err(MasterPasswordError::Prompt)?;

            if crypto::verify_password(&file.hash, candidate.expose()) {
                self.logger.debug("master password accepted");
                return Ok(candidate);
            }

            self.logger.warn(format!(
                "invalid master password, attempt {attempt} of {}",
                self.retry_limit
            ));
        }

        self.logger.error("master password retry limit reached");
        Err(MasterPasswordError::TooManyAttempts(self.retry_limit))
    }

    fn load(&self) -> Result<MasterPasswordFile, MasterPasswordError> {
        let content = fs::read(self.file_name()).map_err(|source| MasterPasswordError::Io {
            path: self.file_name.clone(),
            source,
        })?;
        serde_json::from_slice(&content).map_err(|source| MasterPasswordError::Format {
            path: self.file_name.clone(),
            source,
        })
    }
}

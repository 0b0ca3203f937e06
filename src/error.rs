use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can't read passman configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't read salt from passman configuration {path}")]
    SaltNotFound { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("failed to initialize libsodium")]
    Init,

    #[error("no salt configured for the encryptor")]
    SaltNotSet,

    #[error("failed to derive key from master password")]
    KeyDerivation,

    #[error("failed to hash master password")]
    PasswordHash,

    #[error("failed to decrypt data - wrong master password, wrong salt or corrupted entry")]
    Decrypt,

    #[error("decrypted value is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Error, Debug)]
pub enum MasterPasswordError {
    #[error("can't read master password file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("master password file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("refusing to overwrite existing master password file: {0}")]
    WouldOverwrite(PathBuf),

    #[error("failed to read master password: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("invalid master password entered {0} times")]
    TooManyAttempts(u32),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("can't access password store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("password store {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize password store: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PassManError {
    #[error("password store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("no default encryptor configured")]
    NoEncryptor,

    #[error("failed to decrypt value for key \"{handle}\": {source}")]
    Decrypt {
        handle: String,
        #[source]
        source: CryptoError,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("key \"{0}\" does not exist")]
    KeyNotFound(String),
}

/// Everything that can end a session after the arguments were accepted.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("fatal: {0}")]
    MasterPassword(#[from] MasterPasswordError),

    #[error("can't open password store: {0}")]
    StoreInit(#[source] StoreError),

    #[error("{0}")]
    Operation(anyhow::Error),
}

impl SessionError {
    pub fn exit_code(&self) -> u8 {
        match self {
            SessionError::Operation(_) | SessionError::StoreInit(_) => crate::cli::EXIT_OPERATION,
            SessionError::Config(_) => crate::cli::EXIT_CONFIG,
            SessionError::MasterPassword(_) => crate::cli::EXIT_MASTER_PASSWORD,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Operation(anyhow::Error::new(err).context("failed to write output"))
    }
}

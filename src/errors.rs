use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in mpm.
#[derive(Debug, Error)]
pub enum MpmError {
    // --- Crypto errors ---
    #[error("Wrong passphrase")]
    AuthenticationFailed,

    #[error("Malformed encoded secret: {0}")]
    InvalidEncoding(String),

    #[error("Passphrase hashing failed: {0}")]
    PassphraseHash(String),

    #[error("Secure random source unavailable: {0}")]
    RandomnessUnavailable(String),

    // --- Vault errors ---
    #[error("Vault not found at {0} (run `mpm init` first)")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Section '{0}' not found")]
    SectionNotFound(String),

    #[error("Password '{name}' not found in section '{section}'")]
    EntryNotFound { section: String, name: String },

    #[error("Section '{0}' already exists")]
    SectionAlreadyExists(String),

    // --- Generator errors ---
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("Password length must be between {min} and {max}, got {got}")]
    InvalidLength { min: usize, max: usize, got: usize },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl MpmError {
    /// True for lookups that missed, whether on the section or the entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SectionNotFound(_) | Self::EntryNotFound { .. })
    }
}

/// Convenience type alias for mpm results.
pub type Result<T> = std::result::Result<T, MpmError>;

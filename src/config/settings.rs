use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::crypto::passphrase::Argon2Params;
use crate::errors::{MpmError, Result};

/// User-level configuration, loaded from `~/.mpm.toml`.
///
/// Every field has a sensible default so mpm works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Where the vault lives.  `None` means `~/.mpm`.
    #[serde(default)]
    pub vault_file: Option<PathBuf>,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Shortest passphrase accepted by `init` and `change`.
    #[serde(default = "default_min_passphrase_length")]
    pub min_passphrase_length: usize,

    /// Length pre-filled in the `add` prompt.
    #[serde(default = "default_password_length")]
    pub default_password_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_min_passphrase_length() -> usize {
    8
}

fn default_password_length() -> usize {
    20
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: None,
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            min_passphrase_length: default_min_passphrase_length(),
            default_password_length: default_password_length(),
        }
    }
}

impl Settings {
    /// Name of the config file looked up in the home directory.
    pub const FILE_NAME: &'static str = ".mpm.toml";

    /// Name of the vault file in the home directory.
    pub const VAULT_FILE_NAME: &'static str = ".mpm";

    /// Default config location: `~/.mpm.toml`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(home_dir()?.join(Self::FILE_NAME))
    }

    /// Load settings from `config_path`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            MpmError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Resolve the vault path: explicit override, then config, then `~/.mpm`.
    pub fn vault_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.vault_file {
            return Ok(path.clone());
        }
        Ok(home_dir()?.join(Self::VAULT_FILE_NAME))
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| MpmError::ConfigError("cannot determine home directory".into()))
}

// ── Tests ────────────────────────────────────────────────────────────

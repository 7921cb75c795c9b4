//! Passphrase hashing and verification using Argon2id.
//!
//! The vault stores a PHC-format string
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`), which carries its
//! own salt and cost parameters.  Verification reads them back from the
//! string, so changing the configured parameters only affects hashes
//! created afterwards.
//!
//! Vaults written by older mpm releases carry a bcrypt hash (`$2a$`,
//! `$2b$`, `$2y$`) instead.  Those still verify, and the next passphrase
//! change replaces them with Argon2id.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use super::random::fill_random;
use crate::errors::{MpmError, Result};

/// Length of the salt in bytes (128 bits).
const SALT_LEN: usize = 16;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings` so the CLI can pass
/// whatever the user configured in `~/.mpm.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject parameters that would make the hash trivially cheap.
    fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(MpmError::PassphraseHash(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(MpmError::PassphraseHash(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(MpmError::PassphraseHash(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Hash `passphrase` with a fresh random salt and return the PHC string.
pub fn hash_passphrase(passphrase: &str, argon2_params: &Argon2Params) -> Result<String> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        None,
    )
    .map_err(|e| MpmError::PassphraseHash(format!("invalid Argon2 params: {e}")))?;

    let mut salt_bytes = [0u8; SALT_LEN];
    fill_random(&mut salt_bytes)?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| MpmError::PassphraseHash(format!("salt encoding: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| MpmError::PassphraseHash(format!("Argon2id hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Check `candidate` against a stored hash (Argon2id PHC or legacy bcrypt).
///
/// The digest comparison inside `argon2` and `bcrypt` is constant-time.
pub fn verify_passphrase(candidate: &str, stored: &str) -> Result<()> {
    if is_legacy_hash(stored) {
        return verify_bcrypt(candidate, stored);
    }

    let parsed = PasswordHash::new(stored)
        .map_err(|e| MpmError::InvalidVaultFormat(format!("passphrase hash: {e}")))?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(MpmError::AuthenticationFailed),
        Err(e) => Err(MpmError::InvalidVaultFormat(format!("passphrase hash: {e}"))),
    }
}

/// Returns `true` for bcrypt hashes left by older vault files.
pub fn is_legacy_hash(stored: &str) -> bool {
    stored.starts_with("$2")
}

fn verify_bcrypt(candidate: &str, stored: &str) -> Result<()> {
    match bcrypt::verify(candidate, stored) {
        Ok(true) => Ok(()),
        Ok(false) => Err(MpmError::AuthenticationFailed),
        Err(e) => Err(MpmError::InvalidVaultFormat(format!(
            "legacy bcrypt hash: {e}"
        ))),
    }
}

//! High-level vault operations used by CLI commands.
//!
//! `Vault` owns the passphrase hash and the section map.  It never sees
//! plaintext except during passphrase rotation: callers encode secrets
//! with a `Transcoder` before `set` and decode what `get` returns.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::crypto::passphrase::{hash_passphrase, is_legacy_hash, verify_passphrase, Argon2Params};
use crate::crypto::Transcoder;
use crate::errors::{MpmError, Result};

use super::format::{self, Entries, Sections, VaultFile};

/// The main vault handle.  Create one with `Vault::initialize` or
/// `Vault::load`, then `persist` it after mutating.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// Argon2id PHC string of the current passphrase.
    passphrase_hash: String,

    /// Section name -> entry name -> encoded ciphertext.
    sections: Sections,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Start a brand-new, empty vault that will live at `path`.
    ///
    /// Nothing is written until `persist` is called.
    pub fn initialize(path: &Path, passphrase: &str, params: &Argon2Params) -> Result<Self> {
        if path.exists() {
            return Err(MpmError::VaultAlreadyExists(path.to_path_buf()));
        }

        let passphrase_hash = hash_passphrase(passphrase, params)?;
        tracing::debug!(path = %path.display(), "initialized empty vault");

        Ok(Self {
            path: path.to_path_buf(),
            passphrase_hash,
            sections: Sections::new(),
        })
    }

    /// Read an existing vault file.
    ///
    /// Loading does not require the passphrase; listing names is allowed
    /// without it.  Call `check_passphrase` before touching secrets.
    pub fn load(path: &Path) -> Result<Self> {
        let file = format::read_vault(path)?;
        tracing::debug!(
            path = %path.display(),
            sections = file.sections.len(),
            "loaded vault"
        );
        if is_legacy_hash(&file.passphrase_hash) {
            tracing::warn!(path = %path.display(), "vault uses a legacy bcrypt passphrase hash");
        }

        Ok(Self {
            path: path.to_path_buf(),
            passphrase_hash: file.passphrase_hash,
            sections: file.sections,
        })
    }

    // ------------------------------------------------------------------
    // Passphrase
    // ------------------------------------------------------------------

    /// Verify `candidate` against the stored hash.
    pub fn check_passphrase(&self, candidate: &str) -> Result<()> {
        verify_passphrase(candidate, &self.passphrase_hash)
    }

    /// True while the stored hash is legacy bcrypt; a rotation upgrades it.
    pub fn needs_rehash(&self) -> bool {
        is_legacy_hash(&self.passphrase_hash)
    }

    /// Re-encrypt every entry under `new` and replace the passphrase hash.
    ///
    /// All-or-nothing: the new section map is built in full before
    /// anything on `self` changes, so any error leaves the vault exactly
    /// as it was.
    pub fn rotate_passphrase(
        &mut self,
        old: &str,
        new: &str,
        params: &Argon2Params,
    ) -> Result<()> {
        self.check_passphrase(old)?;

        let decoder = Transcoder::new(old);
        let encoder = Transcoder::new(new);

        let mut rotated = Sections::new();
        for (section, entries) in &self.sections {
            let mut reencoded = Entries::new();
            for (name, ciphertext) in entries {
                let plaintext = decoder.decode_bytes(ciphertext).map_err(|e| {
                    tracing::warn!(%section, %name, "rotation aborted: entry does not decode");
                    e
                })?;
                reencoded.insert(name.clone(), encoder.encode_bytes(&plaintext)?);
            }
            rotated.insert(section.clone(), reencoded);
        }

        let new_hash = hash_passphrase(new, params)?;

        // Commit point: nothing above touched `self`.
        self.sections = rotated;
        self.passphrase_hash = new_hash;

        tracing::info!(entries = self.entry_count(), "passphrase rotated");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Return the encoded ciphertext for `section`/`name`.
    pub fn get(&self, section: &str, name: &str) -> Result<&str> {
        let entries = self
            .sections
            .get(section)
            .ok_or_else(|| MpmError::SectionNotFound(section.to_string()))?;

        entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| MpmError::EntryNotFound {
                section: section.to_string(),
                name: name.to_string(),
            })
    }

    /// Store an already-encoded secret, creating the section if needed.
    ///
    /// Overwrites silently; asking the user first is the caller's call.
    pub fn set(&mut self, section: &str, name: &str, encoded: String) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(name.to_string(), encoded);
    }

    /// Returns `true` if an entry exists at `section`/`name`.
    pub fn contains(&self, section: &str, name: &str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|entries| entries.contains_key(name))
    }

    /// Create an empty section.
    pub fn add_section(&mut self, name: &str) -> Result<()> {
        if self.sections.contains_key(name) {
            return Err(MpmError::SectionAlreadyExists(name.to_string()));
        }
        self.sections.insert(name.to_string(), Entries::new());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    /// All section names.
    pub fn list_sections(&self) -> BTreeSet<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Entry names in `section`; empty if the section does not exist.
    pub fn list_entries(&self, section: &str) -> BTreeSet<&str> {
        self.sections
            .get(section)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every section with its entry names.
    pub fn list_all(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        self.sections
            .iter()
            .map(|(section, entries)| {
                (
                    section.as_str(),
                    entries.keys().map(String::as_str).collect(),
                )
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the vault and write it to disk atomically.
    pub fn persist(&self) -> Result<()> {
        let file = VaultFile {
            passphrase_hash: self.passphrase_hash.clone(),
            sections: self.sections.clone(),
        };
        format::write_vault(&self.path, &file)?;
        tracing::debug!(path = %self.path.display(), "persisted vault");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored passphrase hash (PHC string).
    pub fn passphrase_hash(&self) -> &str {
        &self.passphrase_hash
    }

    /// Returns the raw section map.
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Total number of entries across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.values().map(Entries::len).sum()
    }
}

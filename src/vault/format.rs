//! JSON vault file format and atomic persistence.
//!
//! A vault file is a single JSON object with exactly two fields:
//!
//! ```text
//! {
//!   "Pass": "$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>",
//!   "Sections": {
//!     "email": { "gmail": "<base64 IV || ciphertext>" }
//!   }
//! }
//! ```
//!
//! - **Pass**: PHC string of the passphrase hash.
//! - **Sections**: section name -> entry name -> encoded secret.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{MpmError, Result};

/// Entry name -> encoded ciphertext.
pub type Entries = BTreeMap<String, String>;

/// Section name -> entries.
pub type Sections = BTreeMap<String, Entries>;

/// The serialized shape of a vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultFile {
    #[serde(rename = "Pass")]
    pub passphrase_hash: String,

    #[serde(rename = "Sections", default)]
    pub sections: Sections,
}

/// Write a vault file to disk **atomically**.
///
/// 1. Serialize to JSON.
/// 2. Write to a temp file in the same directory (owner-only on Unix).
/// 3. Flush it to stable storage.
/// 4. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_vault(path: &Path, file: &VaultFile) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(file)
        .map_err(|e| MpmError::SerializationError(format!("vault: {e}")))?;

    // The temp file is in the same directory so rename is guaranteed
    // to be atomic on the same filesystem.
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = write_owner_only(&tmp_path, &bytes).and_then(|()| {
        fs::rename(&tmp_path, path)?;
        Ok(())
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Create (or truncate) `path` with 0600 permissions and write `bytes`.
fn write_owner_only(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // `mode` only applies on creation; tighten a leftover temp file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Read and parse a vault file from disk.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    let data = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MpmError::VaultNotFound(path.to_path_buf()),
        _ => MpmError::Io(e),
    })?;

    let file: VaultFile = serde_json::from_slice(&data)
        .map_err(|e| MpmError::InvalidVaultFormat(format!("vault JSON: {e}")))?;

    if file.passphrase_hash.is_empty() {
        return Err(MpmError::InvalidVaultFormat(
            "missing passphrase hash".into(),
        ));
    }

    Ok(file)
}

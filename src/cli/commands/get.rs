//! `mpm get`: decrypt a password and copy it to the clipboard.

use crate::cli::output;
use crate::cli::{open_vault, record, unlock, warn_legacy_hash, Cli, EntryArgs};
use crate::crypto::Transcoder;
use crate::errors::{MpmError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, entry: &EntryArgs, print: bool) -> Result<()> {
    entry.validate()?;

    let (_settings, vault) = open_vault(cli)?;
    let passphrase = unlock(&vault)?;
    warn_legacy_hash(&vault);

    let encoded = vault.get(&entry.section, &entry.name).inspect_err(|e| {
        if e.is_not_found() {
            output::tip("Run `mpm list all` to see what is stored.");
        }
    })?;
    let secret = Transcoder::new(&passphrase).decode(encoded)?;

    let detail = if print { "printed" } else { "clipboard" };
    record(
        vault.path(),
        "get",
        Some(&entry.section),
        Some(&entry.name),
        Some(detail),
    );

    if print {
        println!("{}", secret.as_str());
        return Ok(());
    }

    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| MpmError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(secret.as_str())
        .map_err(|e| MpmError::Clipboard(e.to_string()))?;

    output::success("Your password has been copied to your clipboard.");
    Ok(())
}

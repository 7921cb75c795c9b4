//! `mpm change`: change the vault passphrase.
//!
//! Verifies the current passphrase, re-encrypts every stored password
//! under the new one in memory, then writes the vault atomically.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_passphrase, record, unlock, Cli, NEW_PASSPHRASE_ENV};
use crate::errors::Result;

/// Execute the `change` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (settings, mut vault) = open_vault(cli)?;

    // 1. Current passphrase.
    output::info("Enter your current passphrase.");
    let old = unlock(&vault)?;

    // 2. New passphrase.
    output::info("Choose your new passphrase.");
    let new = prompt_new_passphrase(NEW_PASSPHRASE_ENV, settings.min_passphrase_length)?;

    // 3. Rotate in memory; nothing is written if this fails.
    let upgrading = vault.needs_rehash();
    vault.rotate_passphrase(&old, &new, &settings.argon2_params())?;

    // 4. Save atomically.
    vault.persist()?;

    let count = vault.entry_count();
    record(
        vault.path(),
        "change",
        None,
        None,
        Some(&format!("{count} passwords re-encrypted")),
    );
    output::success(&format!(
        "Passphrase changed ({count} passwords re-encrypted)"
    ));
    if upgrading {
        output::info("Passphrase hash upgraded from bcrypt to Argon2id.");
    }

    Ok(())
}

//! `mpm init`: create an empty vault protected by a new passphrase.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_passphrase, record, vault_path, Cli, PASSPHRASE_ENV};
use crate::errors::{MpmError, Result};
use crate::vault::Vault;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let path = vault_path(cli, &settings)?;

    // 1. Refuse to clobber an existing vault before asking for anything.
    if path.exists() {
        output::tip("Use `mpm change` to change the passphrase of the existing vault.");
        return Err(MpmError::VaultAlreadyExists(path));
    }

    // 2. Prompt for a new passphrase (with confirmation).
    let passphrase = prompt_new_passphrase(PASSPHRASE_ENV, settings.min_passphrase_length)?;

    // 3. Hash it and write the empty vault.
    let vault = Vault::initialize(&path, &passphrase, &settings.argon2_params())?;
    vault.persist()?;

    record(&path, "init", None, None, Some("vault created"));
    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `mpm add --section <S> --name <N>` to generate a password.");
    output::tip("Run `mpm import --section <S> --name <N>` to store an existing one.");

    Ok(())
}

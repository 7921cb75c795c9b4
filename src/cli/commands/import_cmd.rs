//! `mpm import`: store an existing password.

use crate::cli::output;
use crate::cli::{
    confirm_overwrite, open_vault, read_secret, record, unlock, warn_legacy_hash, Cli,
    EntryArgs,
};
use crate::crypto::Transcoder;
use crate::errors::Result;

/// Execute the `import` command.
pub fn execute(cli: &Cli, entry: &EntryArgs, force: bool) -> Result<()> {
    entry.validate()?;

    let (_settings, mut vault) = open_vault(cli)?;
    let passphrase = unlock(&vault)?;
    warn_legacy_hash(&vault);

    if !confirm_overwrite(&vault, entry, force)? {
        output::info("Ok, goodbye.");
        return Ok(());
    }

    let secret = read_secret(entry)?;
    let encoded = Transcoder::new(&passphrase).encode(&secret)?;
    vault.set(&entry.section, &entry.name, encoded);
    vault.persist()?;

    record(
        vault.path(),
        "import",
        Some(&entry.section),
        Some(&entry.name),
        None,
    );
    output::success(&format!(
        "Password stored for {}/{}",
        entry.section, entry.name
    ));

    Ok(())
}

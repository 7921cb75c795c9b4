//! `mpm section`: create an empty section.

use crate::cli::output;
use crate::cli::{open_vault, record, unlock, validate_name, warn_legacy_hash, Cli};
use crate::errors::Result;

/// Execute the `section` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    validate_name("section", name)?;

    let (_settings, mut vault) = open_vault(cli)?;
    unlock(&vault)?;
    warn_legacy_hash(&vault);

    vault.add_section(name)?;
    vault.persist()?;

    record(vault.path(), "section", Some(name), None, None);
    output::success(&format!("Section '{name}' created"));

    Ok(())
}

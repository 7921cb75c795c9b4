//! `mpm list`: show section and password names.
//!
//! Names are not secret, so no passphrase is required.

use crate::cli::output;
use crate::cli::{open_vault, Cli, ListAction};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, what: &ListAction) -> Result<()> {
    let (_settings, vault) = open_vault(cli)?;

    match what {
        ListAction::All => {
            output::info(&format!(
                "{} section(s), {} password(s)",
                vault.list_sections().len(),
                vault.entry_count()
            ));
            output::print_entries_table(&vault.list_all());
        }
        ListAction::Sections => {
            let sections = vault.list_sections();
            if sections.is_empty() {
                output::info("No sections yet.");
                return Ok(());
            }
            output::info("Here are the sections stored:");
            output::print_names(&sections);
        }
        ListAction::Passwords { section } => {
            let names = vault.list_entries(section);
            if names.is_empty() {
                output::info(&format!("No passwords in section '{section}'."));
                return Ok(());
            }
            output::info(&format!("Here are the passwords stored in '{section}':"));
            output::print_names(&names);
        }
    }

    Ok(())
}

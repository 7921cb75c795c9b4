//! `mpm add`: generate a new password and store it.

use crate::cli::output;
use crate::cli::{
    confirm_overwrite, open_vault, record, unlock, warn_legacy_hash, Cli, EntryArgs,
};
use crate::crypto::Transcoder;
use crate::errors::{MpmError, Result};
use crate::generator::{self, Alphabet, ALPHABETS};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    entry: &EntryArgs,
    alphabet: Option<usize>,
    length: Option<usize>,
    force: bool,
) -> Result<()> {
    entry.validate()?;
    if let Some(len) = length {
        generator::validate_length(len)?;
    }
    let alphabet = alphabet.map(Alphabet::by_index).transpose()?;

    let (settings, mut vault) = open_vault(cli)?;
    let passphrase = unlock(&vault)?;
    warn_legacy_hash(&vault);

    if !confirm_overwrite(&vault, entry, force)? {
        output::info("Ok, goodbye.");
        return Ok(());
    }

    let alphabet = match alphabet {
        Some(a) => a,
        None => choose_alphabet()?,
    };
    let length = match length {
        Some(len) => len,
        None => prompt_length(settings.default_password_length)?,
    };

    // Generate, encrypt, encode and save.
    let password = alphabet.gen_password(length)?;
    let encoded = Transcoder::new(&passphrase).encode(&password)?;
    vault.set(&entry.section, &entry.name, encoded);
    vault.persist()?;

    record(
        vault.path(),
        "add",
        Some(&entry.section),
        Some(&entry.name),
        Some(&format!("{} x{length}", alphabet.display)),
    );
    output::success(&format!(
        "Generated a {length}-character password for {}/{}",
        entry.section, entry.name
    ));
    output::tip(&format!(
        "Run `mpm get --section {} --name {}` to copy it.",
        entry.section, entry.name
    ));

    Ok(())
}

/// Show the alphabet menu and return the chosen alphabet.
fn choose_alphabet() -> Result<&'static Alphabet> {
    let labels: Vec<&str> = ALPHABETS.iter().map(|a| a.display).collect();
    let choice = dialoguer::Select::new()
        .with_prompt("Choose your alphabet")
        .items(&labels)
        .default(labels.len() - 1)
        .interact()
        .map_err(|e| MpmError::CommandFailed(format!("alphabet prompt: {e}")))?;
    Alphabet::by_index(choice)
}

/// Ask for the password length, re-prompting until it is in range.
fn prompt_length(default: usize) -> Result<usize> {
    dialoguer::Input::<usize>::new()
        .with_prompt(format!(
            "Length of your password ({}-{})",
            generator::MIN_LENGTH,
            generator::MAX_LENGTH
        ))
        .default(default.clamp(generator::MIN_LENGTH, generator::MAX_LENGTH))
        .validate_with(|len: &usize| generator::validate_length(*len).map_err(|e| e.to_string()))
        .interact_text()
        .map_err(|e| MpmError::CommandFailed(format!("length prompt: {e}")))
}

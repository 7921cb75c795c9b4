//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{MpmError, Result};
use crate::vault::Vault;

/// Env var holding the current (or initial) passphrase for scripted use.
pub const PASSPHRASE_ENV: &str = "MPM_PASSPHRASE";

/// Env var holding the new passphrase for `mpm change`.
pub const NEW_PASSPHRASE_ENV: &str = "MPM_NEW_PASSPHRASE";

/// Interactive passphrase attempts before giving up.
const MAX_ATTEMPTS: u32 = 3;

/// Longest accepted section or entry name.
const MAX_NAME_LEN: usize = 256;

/// mpm: a sweet and tiny password manager.
#[derive(Parser)]
#[command(
    name = "mpm",
    about = "A sweet and tiny password manager",
    long_about = "A sweet and tiny password manager.\n\n\
                  mpm keeps all of your passwords in one passphrase-protected file.\n\
                  Passwords are grouped into sections and can be generated from a\n\
                  choice of alphabets and lengths.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: ~/.mpm)
    #[arg(long, env = "MPM_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Config file (default: ~/.mpm.toml)
    #[arg(long, env = "MPM_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

/// Identifies one entry: `--section <section> --name <name>`.
#[derive(clap::Args, Debug, Clone)]
pub struct EntryArgs {
    /// Section the password belongs to
    #[arg(long)]
    pub section: String,

    /// Name of the password inside the section
    #[arg(long)]
    pub name: String,
}

impl EntryArgs {
    /// Validate both names before they reach the vault.
    pub fn validate(&self) -> Result<()> {
        validate_name("section", &self.section)?;
        validate_name("name", &self.name)
    }
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize an empty vault protected by a new passphrase
    Init,

    /// Generate a new password and store it
    Add {
        #[command(flatten)]
        entry: EntryArgs,

        /// Alphabet index (omit for an interactive menu)
        #[arg(short, long)]
        alphabet: Option<usize>,

        /// Password length, 1-1000 (omit for a prompt)
        #[arg(short, long)]
        length: Option<usize>,

        /// Overwrite an existing password without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Store an existing password (read from stdin or a hidden prompt)
    Import {
        #[command(flatten)]
        entry: EntryArgs,

        /// Overwrite an existing password without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Copy a password to the clipboard
    Get {
        #[command(flatten)]
        entry: EntryArgs,

        /// Print the password to stdout instead of copying it
        #[arg(long)]
        print: bool,
    },

    /// Change the vault passphrase (re-encrypts every password)
    Change,

    /// Create an empty section
    Section {
        /// Section name
        name: String,
    },

    /// List the sections and passwords stored
    List {
        #[command(subcommand)]
        what: ListAction,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },
}

/// What `mpm list` shows.
#[derive(clap::Subcommand)]
pub enum ListAction {
    /// List all sections and their passwords
    All,

    /// List section names only
    Sections,

    /// List the passwords of one section
    Passwords {
        /// Section to list
        #[arg(long)]
        section: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config` or `~/.mpm.toml`.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = match &cli.config {
        Some(p) => p.clone(),
        None => Settings::default_path()?,
    };
    Settings::load(&path)
}

/// Resolve the vault file path from the CLI and settings.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    settings.vault_path(cli.file.as_deref())
}

/// Load settings and the existing vault.
pub fn open_vault(cli: &Cli) -> Result<(Settings, Vault)> {
    let settings = load_settings(cli)?;
    let path = vault_path(cli, &settings)?;
    let vault = Vault::load(&path)?;
    Ok((settings, vault))
}

/// Obtain and verify the current passphrase, trying in order:
/// 1. `MPM_PASSPHRASE` env var (scripts/CI), checked once
/// 2. Interactive prompt, up to three attempts
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn unlock(vault: &Vault) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            let pw = Zeroizing::new(pw);
            vault.check_passphrase(&pw)?;
            return Ok(pw);
        }
    }

    for attempt in 1..=MAX_ATTEMPTS {
        let pw = dialoguer::Password::new()
            .with_prompt("Enter your passphrase")
            .interact()
            .map_err(|e| MpmError::CommandFailed(format!("passphrase prompt: {e}")))?;
        let pw = Zeroizing::new(pw);

        match vault.check_passphrase(&pw) {
            Ok(()) => return Ok(pw),
            Err(MpmError::AuthenticationFailed) if attempt < MAX_ATTEMPTS => {
                output::warning("Wrong passphrase, try again.");
            }
            Err(e) => return Err(e),
        }
    }

    Err(MpmError::AuthenticationFailed)
}

/// Nudge the user towards `mpm change` while the vault still has a
/// bcrypt passphrase hash.  Goes to stderr so `get --print` stays clean.
pub fn warn_legacy_hash(vault: &Vault) {
    if vault.needs_rehash() {
        output::warning(
            "This vault uses an old bcrypt passphrase hash. Run `mpm change` to upgrade it.",
        );
    }
}

/// Prompt for a new passphrase with confirmation.
///
/// `env_var` is consulted first for scripted use.  Enforces
/// `min_len` in both paths.
pub fn prompt_new_passphrase(env_var: &str, min_len: usize) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            if pw.chars().count() < min_len {
                return Err(MpmError::CommandFailed(format!(
                    "passphrase must be at least {min_len} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let passphrase = dialoguer::Password::new()
            .with_prompt("Enter your new passphrase")
            .with_confirmation("Re-enter your passphrase", "Passphrases mismatch, try again")
            .interact()
            .map_err(|e| MpmError::CommandFailed(format!("passphrase prompt: {e}")))?;
        let passphrase = Zeroizing::new(passphrase);

        if passphrase.chars().count() < min_len {
            output::warning(&format!(
                "Passphrase must be at least {min_len} characters. Try again."
            ));
            continue;
        }

        return Ok(passphrase);
    }
}

/// Read a secret value: piped stdin if not a terminal, else a hidden
/// prompt with confirmation.
pub fn read_secret(entry: &EntryArgs) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(MpmError::CommandFailed("no password received on stdin".into()));
        }
        return Ok(Zeroizing::new(trimmed.to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(format!("Enter the password for {}/{}", entry.section, entry.name))
        .with_confirmation("Re-enter the password", "Passwords mismatch, try again")
        .interact()
        .map_err(|e| MpmError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}

/// Ask before replacing an existing entry.  Returns `false` if the user
/// declined.
pub fn confirm_overwrite(vault: &Vault, entry: &EntryArgs, force: bool) -> Result<bool> {
    if force || !vault.contains(&entry.section, &entry.name) {
        return Ok(true);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Password '{}' exists in section '{}', are you sure you want to erase it?",
            entry.name, entry.section
        ))
        .default(false)
        .interact()
        .map_err(|e| MpmError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Record an operation in the audit log, if compiled in.
pub fn record(
    vault_path: &Path,
    op: &str,
    section: Option<&str>,
    name: Option<&str>,
    details: Option<&str>,
) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(vault_path, op, section, name, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (vault_path, op, section, name, details);
}

/// Validate a section or entry name.
///
/// Must be non-empty, at most 256 characters, and free of control
/// characters (so listings stay on one line).
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MpmError::CommandFailed(format!("{kind} cannot be empty")));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(MpmError::CommandFailed(format!(
            "{kind} cannot exceed {MAX_NAME_LEN} characters"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(MpmError::CommandFailed(format!(
            "{kind} '{}' contains control characters",
            name.escape_debug()
        )));
    }

    Ok(())
}

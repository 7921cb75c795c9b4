//! Integration tests for the vault: entries, rotation, persistence.

use std::fs;

use mpm::crypto::{Argon2Params, Transcoder};
use mpm::errors::MpmError;
use mpm::vault::Vault;
use tempfile::TempDir;

/// Minimum Argon2 cost so the suite stays fast.
const FAST: Argon2Params = Argon2Params {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
};

/// Helper: a fresh, persisted vault with one entry in `email/gmail`.
fn seeded_vault(dir: &TempDir, passphrase: &str, secret: &str) -> Vault {
    let path = dir.path().join(".mpm");
    let mut vault = Vault::initialize(&path, passphrase, &FAST).unwrap();
    let encoded = Transcoder::new(passphrase).encode(secret).unwrap();
    vault.set("email", "gmail", encoded);
    vault.persist().unwrap();
    vault
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn store_reload_and_read_back() {
    let dir = TempDir::new().unwrap();
    let vault = seeded_vault(&dir, "correct-horse", "s3cr3t!");

    let reloaded = Vault::load(vault.path()).unwrap();
    reloaded.check_passphrase("correct-horse").unwrap();

    let encoded = reloaded.get("email", "gmail").unwrap();
    let plain = Transcoder::new("correct-horse").decode(encoded).unwrap();
    assert_eq!(plain.as_str(), "s3cr3t!");
}

#[test]
fn initialize_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let vault = seeded_vault(&dir, "pw", "x");

    let result = Vault::initialize(vault.path(), "other", &FAST);
    assert!(matches!(result, Err(MpmError::VaultAlreadyExists(_))));
}

#[test]
fn load_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = Vault::load(&dir.path().join("nope"));
    assert!(matches!(result, Err(MpmError::VaultNotFound(_))));
}

#[test]
fn load_corrupted_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".mpm");
    fs::write(&path, "{ this is not json").unwrap();

    let result = Vault::load(&path);
    assert!(matches!(result, Err(MpmError::InvalidVaultFormat(_))));
}

#[test]
fn persisted_file_uses_pass_and_sections_fields() {
    let dir = TempDir::new().unwrap();
    let vault = seeded_vault(&dir, "pw", "x");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(vault.path()).unwrap()).unwrap();
    assert!(json["Pass"].as_str().unwrap().starts_with("$argon2id$"));
    assert!(json["Sections"]["email"]["gmail"].is_string());
}

// ---------------------------------------------------------------------------
// Passphrase check
// ---------------------------------------------------------------------------

#[test]
fn check_passphrase_accepts_only_the_right_one() {
    let dir = TempDir::new().unwrap();
    let vault = seeded_vault(&dir, "correct-horse", "x");

    assert!(vault.check_passphrase("correct-horse").is_ok());
    assert!(matches!(
        vault.check_passphrase("battery-staple"),
        Err(MpmError::AuthenticationFailed)
    ));
    assert!(matches!(
        vault.check_passphrase(""),
        Err(MpmError::AuthenticationFailed)
    ));
}

// ---------------------------------------------------------------------------
// Entries and sections
// ---------------------------------------------------------------------------

#[test]
fn get_missing_does_not_mutate() {
    let dir = TempDir::new().unwrap();
    let vault = seeded_vault(&dir, "pw", "x");
    let before = vault.sections().clone();

    assert!(matches!(
        vault.get("bank", "checking"),
        Err(MpmError::SectionNotFound(_))
    ));
    assert!(matches!(
        vault.get("email", "yahoo"),
        Err(MpmError::EntryNotFound { .. })
    ));
    assert_eq!(vault.sections(), &before);
}

#[test]
fn add_existing_section_fails_without_change() {
    let dir = TempDir::new().unwrap();
    let mut vault = seeded_vault(&dir, "pw", "x");
    let before = vault.sections().clone();

    let result = vault.add_section("email");
    assert!(matches!(result, Err(MpmError::SectionAlreadyExists(_))));
    assert_eq!(vault.sections(), &before);
}

#[test]
fn empty_section_survives_persistence() {
    let dir = TempDir::new().unwrap();
    let mut vault = seeded_vault(&dir, "pw", "x");
    vault.add_section("bank").unwrap();
    vault.persist().unwrap();

    let reloaded = Vault::load(vault.path()).unwrap();
    assert!(reloaded.list_sections().contains("bank"));
    assert!(reloaded.list_entries("bank").is_empty());
}

#[test]
fn listings_are_sorted() {
    let dir = TempDir::new().unwrap();
    let mut vault = Vault::initialize(&dir.path().join(".mpm"), "pw", &FAST).unwrap();
    for (section, name) in [("work", "vpn"), ("email", "yahoo"), ("email", "gmail")] {
        vault.set(section, name, "AAAAAAAAAAAAAAAAAAAAAA==".into());
    }

    let sections: Vec<_> = vault.list_sections().into_iter().collect();
    assert_eq!(sections, ["email", "work"]);

    let names: Vec<_> = vault.list_entries("email").into_iter().collect();
    assert_eq!(names, ["gmail", "yahoo"]);

    let all = vault.list_all();
    assert_eq!(all.len(), 2);
    assert_eq!(all["work"].len(), 1);
    assert_eq!(vault.entry_count(), 3);
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

#[test]
fn rotation_reencrypts_every_entry() {
    let dir = TempDir::new().unwrap();
    let mut vault = seeded_vault(&dir, "old-pass", "s3cr3t!");
    vault.set(
        "bank",
        "checking",
        Transcoder::new("old-pass").encode("1234").unwrap(),
    );

    vault.rotate_passphrase("old-pass", "new-pass", &FAST).unwrap();
    vault.persist().unwrap();

    let reloaded = Vault::load(vault.path()).unwrap();
    assert!(reloaded.check_passphrase("new-pass").is_ok());
    assert!(reloaded.check_passphrase("old-pass").is_err());

    let t = Transcoder::new("new-pass");
    let gmail = t.decode(reloaded.get("email", "gmail").unwrap()).unwrap();
    let checking = t.decode(reloaded.get("bank", "checking").unwrap()).unwrap();
    assert_eq!(gmail.as_str(), "s3cr3t!");
    assert_eq!(checking.as_str(), "1234");
}

#[test]
fn rotation_with_wrong_old_passphrase_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut vault = seeded_vault(&dir, "old-pass", "s3cr3t!");
    let file_before = fs::read(vault.path()).unwrap();
    let hash_before = vault.passphrase_hash().to_string();
    let sections_before = vault.sections().clone();

    let result = vault.rotate_passphrase("not-it", "new-pass", &FAST);
    assert!(matches!(result, Err(MpmError::AuthenticationFailed)));

    assert_eq!(vault.passphrase_hash(), hash_before);
    assert_eq!(vault.sections(), &sections_before);
    assert_eq!(fs::read(vault.path()).unwrap(), file_before);
}

#[test]
fn rotation_of_empty_vault_only_changes_hash() {
    let dir = TempDir::new().unwrap();
    let mut vault = Vault::initialize(&dir.path().join(".mpm"), "a-pass", &FAST).unwrap();
    vault.add_section("empty").unwrap();

    vault.rotate_passphrase("a-pass", "b-pass", &FAST).unwrap();
    assert!(vault.check_passphrase("b-pass").is_ok());
    assert!(vault.list_sections().contains("empty"));
}

// ---------------------------------------------------------------------------
// Legacy bcrypt vaults
// ---------------------------------------------------------------------------

/// Write a vault file the way older releases did: bcrypt `Pass`, same
/// transcoder for entries.
fn write_legacy_vault(dir: &TempDir, passphrase: &str, secret: &str) -> std::path::PathBuf {
    let path = dir.path().join(".mpm");
    let json = serde_json::json!({
        "Pass": bcrypt::hash(passphrase, 4).unwrap(),
        "Sections": {
            "email": { "gmail": Transcoder::new(passphrase).encode(secret).unwrap() }
        }
    });
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();
    path
}

#[test]
fn legacy_bcrypt_vault_unlocks_and_decodes() {
    let dir = TempDir::new().unwrap();
    let path = write_legacy_vault(&dir, "correct-horse", "s3cr3t!");

    let vault = Vault::load(&path).unwrap();
    assert!(vault.needs_rehash());
    vault.check_passphrase("correct-horse").unwrap();
    assert!(matches!(
        vault.check_passphrase("battery-staple"),
        Err(MpmError::AuthenticationFailed)
    ));

    let plain = Transcoder::new("correct-horse")
        .decode(vault.get("email", "gmail").unwrap())
        .unwrap();
    assert_eq!(plain.as_str(), "s3cr3t!");
}

#[test]
fn rotating_legacy_vault_upgrades_to_argon2() {
    let dir = TempDir::new().unwrap();
    let path = write_legacy_vault(&dir, "correct-horse", "s3cr3t!");

    let mut vault = Vault::load(&path).unwrap();
    vault
        .rotate_passphrase("correct-horse", "battery-staple", &FAST)
        .unwrap();
    vault.persist().unwrap();

    let reloaded = Vault::load(&path).unwrap();
    assert!(!reloaded.needs_rehash());
    assert!(reloaded.passphrase_hash().starts_with("$argon2id$"));
    reloaded.check_passphrase("battery-staple").unwrap();

    let plain = Transcoder::new("battery-staple")
        .decode(reloaded.get("email", "gmail").unwrap())
        .unwrap();
    assert_eq!(plain.as_str(), "s3cr3t!");
}

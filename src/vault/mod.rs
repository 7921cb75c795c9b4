//! Vault module: sectioned storage of encoded secrets.
//!
//! This module provides:
//! - The JSON vault file format with atomic writes (`format`)
//! - The `Vault` type: passphrase checks, entries, rotation (`store`)

pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use format::{Entries, Sections, VaultFile};
pub use store::Vault;

//! Cryptographic primitives for mpm.
//!
//! This module provides:
//! - AES-256-CTR transcoding of individual secrets (`transcoder`)
//! - Argon2id passphrase hashing and verification (`passphrase`)
//! - The OS-backed secure random source (`random`)

pub mod passphrase;
pub mod random;
pub mod transcoder;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{Transcoder, hash_passphrase, ...};
pub use passphrase::{hash_passphrase, verify_passphrase, Argon2Params};
pub use random::{fill_random, secure_rng};
pub use transcoder::{Transcoder, IV_LEN};

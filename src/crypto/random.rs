//! Access to the operating system's secure random source.
//!
//! Every random byte mpm uses (IVs, salts, generated passwords) comes
//! from here.  There is no fallback: if the OS source fails, the error
//! is surfaced as `RandomnessUnavailable`.

use rand::rngs::{OsRng, StdRng};
use rand::{SeedableRng, TryRngCore};

use crate::errors::{MpmError, Result};

/// Fill `buf` with bytes read straight from the OS CSPRNG.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| MpmError::RandomnessUnavailable(e.to_string()))
}

/// A ChaCha-based CSPRNG freshly seeded from the OS.
///
/// Used where many samples are drawn in a row (password generation),
/// so a seeding failure is reported once instead of per sample.
pub fn secure_rng() -> Result<StdRng> {
    StdRng::try_from_os_rng().map_err(|e| MpmError::RandomnessUnavailable(e.to_string()))
}

//! Random password generation from a fixed registry of alphabets.
//!
//! Each character is drawn independently with `rand`'s `Uniform`
//! sampler, which rejects out-of-zone values so non-power-of-two
//! alphabet sizes stay unbiased.

use rand::distr::{Distribution, Uniform};
use zeroize::Zeroizing;

use crate::crypto::secure_rng;
use crate::errors::{MpmError, Result};

/// Shortest password `gen_password` will produce.
pub const MIN_LENGTH: usize = 1;

/// Longest password the CLI accepts.
pub const MAX_LENGTH: usize = 1000;

/// A named character set passwords are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    /// Label shown in the selection menu.
    pub display: &'static str,
    choices: &'static str,
}

/// Every alphabet the user can pick, selectable by index.
pub const ALPHABETS: [Alphabet; 5] = [
    // Some sites still want numeric PINs.
    Alphabet {
        display: "[0-9]",
        choices: "0123456789",
    },
    Alphabet {
        display: "[a-zA-Z]",
        choices: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
    },
    // For legacy apps that choke on symbols.
    Alphabet {
        display: "[a-zA-Z0-9]",
        choices: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    },
    Alphabet {
        display: "[a-zA-Z0-9!&()*+,-./?[]~]",
        choices: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!&()*+,-./?[]~",
    },
    Alphabet {
        display: "[a-zA-Z0-9 !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~]",
        choices: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
    },
];

impl Alphabet {
    /// Look an alphabet up by its registry index.
    pub fn by_index(index: usize) -> Result<&'static Alphabet> {
        ALPHABETS.get(index).ok_or_else(|| {
            MpmError::InvalidAlphabet(format!(
                "no alphabet at index {index} (choose 0-{})",
                ALPHABETS.len() - 1
            ))
        })
    }

    /// The candidate characters, in order.
    pub fn choices(&self) -> &'static str {
        self.choices
    }

    /// Returns `true` if `c` belongs to this alphabet.
    pub fn contains(&self, c: char) -> bool {
        self.choices.contains(c)
    }

    /// Generate a random password of exactly `length` characters.
    pub fn gen_password(&self, length: usize) -> Result<Zeroizing<String>> {
        if length < MIN_LENGTH {
            return Err(MpmError::InvalidLength {
                min: MIN_LENGTH,
                max: MAX_LENGTH,
                got: length,
            });
        }

        let chars: Vec<char> = self.choices.chars().collect();
        let dist = Uniform::new(0, chars.len())
            .map_err(|e| MpmError::InvalidAlphabet(format!("{}: {e}", self.display)))?;
        let mut rng = secure_rng()?;

        let password: String = dist
            .sample_iter(&mut rng)
            .take(length)
            .map(|i| chars[i])
            .collect();

        tracing::debug!(alphabet = self.display, length, "generated password");
        Ok(Zeroizing::new(password))
    }
}

/// Validate a user-supplied password length.
pub fn validate_length(length: usize) -> Result<()> {
    if (MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(MpmError::InvalidLength {
            min: MIN_LENGTH,
            max: MAX_LENGTH,
            got: length,
        })
    }
}

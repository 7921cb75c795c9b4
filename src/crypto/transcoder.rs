//! AES-256-CTR transcoding of individual secrets.
//!
//! A `Transcoder` is bound to one passphrase.  The AES key is the
//! SHA-512/256 digest of the passphrase bytes, so the same passphrase
//! always yields the same key.  Each call to `encode` draws a fresh
//! random 16-byte IV and prepends it to the ciphertext before base64
//! encoding the whole buffer.
//!
//! Layout of the encoded text (before base64):
//!   [ 16-byte IV | ciphertext (same length as the plaintext) ]
//!
//! There is no authentication tag.  Decoding with the wrong passphrase
//! "succeeds" and yields garbage; passphrase correctness is checked
//! against the vault's stored hash instead.

use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ctr::cipher::generic_array::GenericArray;
use ctr::cipher::{KeyIvInit, StreamCipher};
use sha2::{Digest, Sha512_256};
use zeroize::Zeroizing;

use super::random::fill_random;
use crate::errors::{MpmError, Result};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Size of the IV in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
const KEY_LEN: usize = 32;

/// Encrypts and decrypts secrets under a single passphrase-derived key.
pub struct Transcoder {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl Transcoder {
    /// Derive the key for `passphrase` and build a transcoder around it.
    pub fn new(passphrase: &str) -> Self {
        let digest = Sha512_256::digest(passphrase.as_bytes());
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypt `secret` and return the printable encoding of IV || ciphertext.
    pub fn encode(&self, secret: &str) -> Result<String> {
        self.encode_bytes(secret.as_bytes())
    }

    /// Byte-level variant of `encode`.
    ///
    /// Rotation goes through this path so that entries whose plaintext
    /// is not valid UTF-8 are carried over unchanged.
    pub fn encode_bytes(&self, secret: &[u8]) -> Result<String> {
        let mut buf = Zeroizing::new(vec![0u8; IV_LEN + secret.len()]);
        let (iv, body) = buf.split_at_mut(IV_LEN);

        fill_random(iv)?;
        body.copy_from_slice(secret);

        let mut cipher = Aes256Ctr::new(
            GenericArray::from_slice(&self.key[..]),
            GenericArray::from_slice(iv),
        );
        cipher.apply_keystream(body);

        Ok(BASE64.encode(&buf[..]))
    }

    /// Decode `text` and decrypt it back into raw plaintext bytes.
    pub fn decode_bytes(&self, text: &str) -> Result<Zeroizing<Vec<u8>>> {
        let raw = BASE64
            .decode(text.trim())
            .map_err(|e| MpmError::InvalidEncoding(format!("not valid base64: {e}")))?;

        if raw.len() < IV_LEN {
            return Err(MpmError::InvalidEncoding(format!(
                "{} bytes is shorter than the {IV_LEN}-byte IV",
                raw.len()
            )));
        }

        let (iv, ciphertext) = raw.split_at(IV_LEN);
        let mut plaintext = Zeroizing::new(ciphertext.to_vec());

        let mut cipher = Aes256Ctr::new(
            GenericArray::from_slice(&self.key[..]),
            GenericArray::from_slice(iv),
        );
        cipher.apply_keystream(&mut plaintext[..]);

        Ok(plaintext)
    }

    /// Decode `text` into a UTF-8 string.
    ///
    /// A wrong passphrase usually shows up here as invalid UTF-8, but
    /// that is incidental and must not be relied on.
    pub fn decode(&self, text: &str) -> Result<Zeroizing<String>> {
        let bytes = self.decode_bytes(text)?;
        match std::str::from_utf8(&bytes) {
            Ok(s) => Ok(Zeroizing::new(s.to_owned())),
            Err(_) => Err(MpmError::InvalidEncoding(
                "decrypted secret is not valid UTF-8".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_passphrase_same_key() {
        let a = Transcoder::new("hunter2");
        let b = Transcoder::new("hunter2");
        assert_eq!(*a.key, *b.key);
    }

    #[test]
    fn different_passphrases_different_keys() {
        let a = Transcoder::new("hunter2");
        let b = Transcoder::new("hunter3");
        assert_ne!(*a.key, *b.key);
    }

    #[test]
    fn key_is_sha512_256_of_passphrase() {
        let t = Transcoder::new("abc");
        let expected = Sha512_256::digest(b"abc");
        assert_eq!(&t.key[..], expected.as_slice());
    }

    #[test]
    fn ciphertext_length_is_iv_plus_plaintext() {
        let t = Transcoder::new("pw");
        let encoded = t.encode("twelve bytes").unwrap();
        let raw = BASE64.decode(&encoded).unwrap();
        assert_eq!(raw.len(), IV_LEN + "twelve bytes".len());
    }

    #[test]
    fn empty_secret_roundtrips() {
        let t = Transcoder::new("pw");
        let encoded = t.encode("").unwrap();
        assert_eq!(t.decode(&encoded).unwrap().as_str(), "");
    }

    #[test]
    fn decode_rejects_short_input() {
        let t = Transcoder::new("pw");
        let short = BASE64.encode([0u8; IV_LEN - 1]);
        assert!(matches!(
            t.decode_bytes(&short),
            Err(MpmError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_non_base64() {
        let t = Transcoder::new("pw");
        assert!(matches!(
            t.decode_bytes("not base64 at all!"),
            Err(MpmError::InvalidEncoding(_))
        ));
    }
}

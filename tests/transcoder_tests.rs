//! Integration tests for the mpm transcoder.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use mpm::crypto::{Transcoder, IV_LEN};
use mpm::errors::MpmError;

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

#[test]
fn encode_decode_roundtrip() {
    let t = Transcoder::new("correct-horse");
    let encoded = t.encode("s3cr3t!").expect("encode should succeed");
    let decoded = t.decode(&encoded).expect("decode should succeed");
    assert_eq!(decoded.as_str(), "s3cr3t!");
}

#[test]
fn roundtrip_with_fresh_transcoder() {
    // The key depends only on the passphrase, not on the instance.
    let encoded = Transcoder::new("pw").encode("value").unwrap();
    let decoded = Transcoder::new("pw").decode(&encoded).unwrap();
    assert_eq!(decoded.as_str(), "value");
}

#[test]
fn roundtrip_unicode_and_long_secrets() {
    let t = Transcoder::new("pässwörd");
    let long = "x".repeat(5000);
    for secret in ["héllo wörld ✓", "", " leading and trailing ", long.as_str()] {
        let encoded = t.encode(secret).unwrap();
        assert_eq!(t.decode(&encoded).unwrap().as_str(), secret);
    }
}

#[test]
fn encoding_is_printable_base64() {
    let t = Transcoder::new("pw");
    let encoded = t.encode("some secret").unwrap();
    assert!(encoded.chars().all(|c| c.is_ascii_graphic()));
    assert!(BASE64.decode(&encoded).is_ok());
}

// ---------------------------------------------------------------------------
// Fresh IV per call
// ---------------------------------------------------------------------------

#[test]
fn encode_produces_different_output_each_time() {
    let t = Transcoder::new("pw");
    let a = t.encode("same secret").unwrap();
    let b = t.encode("same secret").unwrap();
    assert_ne!(a, b, "two encodings of the same secret must differ");

    let iv_a = &BASE64.decode(&a).unwrap()[..IV_LEN];
    let iv_b = &BASE64.decode(&b).unwrap()[..IV_LEN];
    assert_ne!(iv_a, iv_b);
}

// ---------------------------------------------------------------------------
// Wrong passphrase
// ---------------------------------------------------------------------------

#[test]
fn wrong_passphrase_yields_garbage_not_error() {
    let right = Transcoder::new("right-passphrase");
    let wrong = Transcoder::new("wrong-passphrase");

    let mut mismatches = 0;
    for i in 0..50 {
        let secret = format!("secret-number-{i}");
        let encoded = right.encode(&secret).unwrap();

        // Byte-level decode never fails on well-formed input.
        let garbage = wrong.decode_bytes(&encoded).expect("stream decode succeeds");
        assert_eq!(garbage.len(), secret.len());
        if garbage.as_slice() != secret.as_bytes() {
            mismatches += 1;
        }
    }
    assert_eq!(mismatches, 50);
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn decode_rejects_truncated_input() {
    let t = Transcoder::new("pw");
    let encoded = t.encode("abc").unwrap();
    let raw = BASE64.decode(&encoded).unwrap();
    let truncated = BASE64.encode(&raw[..IV_LEN - 1]);

    assert!(matches!(
        t.decode(&truncated),
        Err(MpmError::InvalidEncoding(_))
    ));
}

#[test]
fn decode_accepts_bare_iv_as_empty_secret() {
    let t = Transcoder::new("pw");
    let just_iv = BASE64.encode([7u8; IV_LEN]);
    assert_eq!(t.decode(&just_iv).unwrap().as_str(), "");
}

#[test]
fn decode_rejects_invalid_base64() {
    let t = Transcoder::new("pw");
    assert!(matches!(
        t.decode("@@@@"),
        Err(MpmError::InvalidEncoding(_))
    ));
}

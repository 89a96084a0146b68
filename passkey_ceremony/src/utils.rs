use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CodecError {
    #[error("Malformed base64url input: {0}")]
    Malformed(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

/// Decodes URL-safe, unpadded base64 text back into raw bytes.
///
/// The alphabet excludes `+`, `/` and `=`; any such character makes the
/// input malformed.
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, CodecError> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| CodecError::Malformed(format!("Failed to decode base64url: {e}")))
}

/// Encodes raw bytes as URL-safe, unpadded base64 text.
pub fn base64url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Generates `len` cryptographically random bytes, base64url-encoded.
pub fn gen_random_string(len: usize) -> Result<String, CodecError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| CodecError::Crypto("Failed to generate random string".to_string()))?;
    Ok(base64url_encode(bytes))
}

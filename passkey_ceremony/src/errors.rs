use thiserror::Error;

use crate::utils::CodecError;

/// Errors that can occur while orchestrating a passkey ceremony.
///
/// This is the stable taxonomy surfaced to callers. Codec and adapter
/// failures are raised as values of this type; protocol-level rejections
/// from a relying party come back inside `{success: false, message}`
/// result objects instead and are never represented here.
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// The device or browser has no credential-ceremony capability at all
    #[error("Platform unsupported: {0}")]
    PlatformUnsupported(String),

    /// The user cancelled the prompt or the platform prompt timed out
    #[error("Ceremony aborted: {0}")]
    Aborted(String),

    /// Attempted re-registration of an already-excluded authenticator
    #[error("Duplicate credential: {0}")]
    DuplicateCredential(String),

    /// No mutually acceptable signature scheme
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Ceremony attempted outside a secure or matching origin context
    #[error("Security context violation: {0}")]
    SecurityContext(String),

    /// No stored credential matches the presented assertion
    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    /// Missing, already-consumed, or expired challenge
    #[error("Invalid challenge: {0}")]
    ChallengeInvalid(String),

    /// Text-to-byte decoding failure
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// The remote relying party did not answer within the configured window
    #[error("Request timeout: {0}")]
    RequestTimeout(String),

    /// Rejected input before any ceremony state was created
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Network-level failure other than a timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error accessing the challenge or credential store
    #[error("Storage error: {0}")]
    Storage(String),

    /// General error not covered by other categories
    #[error("{0}")]
    Other(String),

    /// Error from JSON serialization/deserialization
    #[error("Json conversion(Serde) error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<CodecError> for CeremonyError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Malformed(msg) => CeremonyError::MalformedEncoding(msg),
            CodecError::Crypto(msg) => CeremonyError::Other(msg),
        }
    }
}

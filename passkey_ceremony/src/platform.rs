//! Injected platform credential capability.
//!
//! The platform credential API (the browser's `navigator.credentials` or an
//! OS passkey service) is modelled as a trait with two methods so the
//! ceremony adapter is testable without a real platform present.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::errors::CeremonyError;
use crate::protocol::{AuthenticatorSelection, PubKeyCredParam, RelyingPartyInfo};

/// Reason codes reported by platform credential APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// User cancelled the prompt or the prompt timed out
    NotAllowed,
    /// Authenticator already holds one of the excluded credentials
    InvalidState,
    /// No requested algorithm is supported by the authenticator
    NotSupported,
    /// Insecure or mismatching origin context
    Security,
    /// The operation was aborted before completion
    Abort,
    /// No usable credential was found
    NotFound,
    /// The platform exposes no credential-ceremony capability at all
    Unavailable,
    /// Anything the platform did not categorize
    Unknown,
}

#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct PlatformError {
    pub kind: PlatformErrorKind,
    pub message: String,
}

impl PlatformError {
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<PlatformError> for CeremonyError {
    fn from(err: PlatformError) -> Self {
        match err.kind {
            PlatformErrorKind::NotAllowed => CeremonyError::Aborted(err.message),
            PlatformErrorKind::InvalidState => CeremonyError::DuplicateCredential(err.message),
            PlatformErrorKind::NotSupported => CeremonyError::UnsupportedAlgorithm(err.message),
            PlatformErrorKind::Security => CeremonyError::SecurityContext(err.message),
            PlatformErrorKind::Abort => CeremonyError::Aborted(err.message),
            PlatformErrorKind::NotFound => CeremonyError::CredentialNotFound(err.message),
            PlatformErrorKind::Unavailable => CeremonyError::PlatformUnsupported(err.message),
            PlatformErrorKind::Unknown => CeremonyError::Other(err.message),
        }
    }
}

/// User entity with the handle decoded to raw bytes.
#[derive(Debug, Clone)]
pub struct PlatformUserEntity {
    pub id: Vec<u8>,
    pub name: String,
    pub display_name: String,
}

/// Creation options after wire decoding; byte fields are raw bytes.
#[derive(Debug)]
pub struct PlatformCreateOptions {
    pub challenge: Vec<u8>,
    pub rp: RelyingPartyInfo,
    pub user: PlatformUserEntity,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub timeout: u32,
    pub attestation: String,
    pub authenticator_selection: AuthenticatorSelection,
    pub exclude_credentials: Vec<Vec<u8>>,
}

/// Assertion options after wire decoding.
///
/// An empty `allow_credentials` means discoverable-credential mode and must
/// reach the platform as such.
#[derive(Debug)]
pub struct PlatformGetOptions {
    pub challenge: Vec<u8>,
    pub timeout: u32,
    pub rp_id: String,
    pub user_verification: String,
    pub allow_credentials: Vec<Vec<u8>>,
}

/// Raw result of a successful credential creation.
#[derive(Debug, Clone)]
pub struct CreatedCredential {
    pub raw_id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub attestation_object: Vec<u8>,
    pub authenticator_attachment: Option<String>,
    pub client_extension_results: Option<Value>,
}

/// Raw result of a successful assertion.
#[derive(Debug, Clone)]
pub struct PlatformAssertion {
    pub raw_id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
    pub authenticator_attachment: Option<String>,
}

/// Platform credential API surface.
///
/// Both operations suspend on a user-mediated prompt (biometric, PIN,
/// security key) that this code cannot cancel. `Ok(None)` models the
/// platform returning no credential.
#[async_trait]
pub trait PlatformAuthenticator: Send + Sync {
    async fn create(
        &self,
        options: PlatformCreateOptions,
    ) -> Result<Option<CreatedCredential>, PlatformError>;

    async fn get(
        &self,
        options: PlatformGetOptions,
    ) -> Result<Option<PlatformAssertion>, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_mapping() {
        let cases = [
            (PlatformErrorKind::NotAllowed, "Ceremony aborted"),
            (PlatformErrorKind::InvalidState, "Duplicate credential"),
            (PlatformErrorKind::NotSupported, "Unsupported algorithm"),
            (PlatformErrorKind::Security, "Security context violation"),
            (PlatformErrorKind::Abort, "Ceremony aborted"),
            (PlatformErrorKind::NotFound, "Credential not found"),
            (PlatformErrorKind::Unavailable, "Platform unsupported"),
        ];

        for (kind, prefix) in cases {
            let err: CeremonyError = PlatformError::new(kind, "detail").into();
            assert!(
                err.to_string().starts_with(prefix),
                "{kind:?} mapped to {err}"
            );
        }
    }

    #[test]
    fn test_unknown_maps_to_other() {
        let err: CeremonyError =
            PlatformError::new(PlatformErrorKind::Unknown, "mystery failure").into();
        assert_eq!(err.to_string(), "mystery failure");
    }
}

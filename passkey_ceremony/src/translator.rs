//! Maps ceremony failures to stable, human-readable messages.
//!
//! This is the single place user-facing strings are produced; call sites
//! must route caught errors through here rather than displaying raw error
//! text.

use crate::errors::CeremonyError;

/// Returns a display message for any ceremony failure. Never fails; error
/// shapes outside the stable taxonomy fall back to a generic message.
pub fn user_message(err: &CeremonyError) -> String {
    match err {
        CeremonyError::PlatformUnsupported(_) => {
            "This device or browser does not support passkeys.".to_string()
        }
        CeremonyError::Aborted(_) => {
            "The passkey prompt was cancelled or timed out.".to_string()
        }
        CeremonyError::DuplicateCredential(_) => {
            "A passkey for this account already exists on this device.".to_string()
        }
        CeremonyError::UnsupportedAlgorithm(_) => {
            "This authenticator does not support a compatible signature algorithm.".to_string()
        }
        CeremonyError::SecurityContext(_) => {
            "Passkeys require a secure connection with a matching origin.".to_string()
        }
        CeremonyError::CredentialNotFound(_) => {
            "No matching passkey was found for this account.".to_string()
        }
        CeremonyError::ChallengeInvalid(_) => {
            "This attempt has expired or was already used. Please try again.".to_string()
        }
        CeremonyError::MalformedEncoding(_) => {
            "Received malformed data during the passkey ceremony.".to_string()
        }
        CeremonyError::RequestTimeout(_) => {
            "The server did not respond in time. Please try again.".to_string()
        }
        CeremonyError::Validation(msg) => msg.clone(),
        CeremonyError::Transport(_)
        | CeremonyError::Storage(_)
        | CeremonyError::Serde(_)
        | CeremonyError::Other(_) => "An unknown error occurred. Please try again.".to_string(),
    }
}

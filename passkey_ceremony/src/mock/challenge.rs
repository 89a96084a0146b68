//! Challenge issuance, consumption, and the client-data/attestation parsing
//! the finish operations rely on.

use ciborium::value::Value as CborValue;

use crate::config::{self, PASSKEY_CHALLENGE_TIMEOUT};
use crate::errors::CeremonyError;
use crate::protocol::CeremonyUserEntity;
use crate::utils::{base64url_decode, gen_random_string};

use super::store::CeremonyStore;
use super::types::{ChallengeKind, StoredChallenge};

pub(super) fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Generates a fresh challenge (32 random bytes, base64url) and records it
/// keyed by its own value.
pub(super) async fn issue_challenge(
    store: &mut dyn CeremonyStore,
    kind: ChallengeKind,
    user: CeremonyUserEntity,
) -> Result<String, CeremonyError> {
    let value = gen_random_string(32)?;

    store
        .put_challenge(StoredChallenge {
            challenge: value.clone(),
            kind,
            user,
            timestamp: now_secs(),
            ttl: *PASSKEY_CHALLENGE_TIMEOUT as u64,
        })
        .await?;

    tracing::debug!("Issued {:?} challenge", kind);
    Ok(value)
}

/// Atomically consumes a challenge. Fails when the challenge is missing,
/// was already consumed, was issued for the other ceremony kind, or has
/// outlived its validity window.
pub(super) async fn consume_challenge(
    store: &mut dyn CeremonyStore,
    value: &str,
    kind: ChallengeKind,
) -> Result<StoredChallenge, CeremonyError> {
    let challenge = store.take_challenge(value).await?.ok_or_else(|| {
        CeremonyError::ChallengeInvalid("Challenge not found or already used".to_string())
    })?;

    if challenge.kind != kind {
        return Err(CeremonyError::ChallengeInvalid(
            "Challenge was issued for a different ceremony".to_string(),
        ));
    }

    let now = now_secs();
    if challenge.is_expired_at(now) {
        tracing::warn!(
            "Challenge expired after {} seconds (timeout: {})",
            now.saturating_sub(challenge.timestamp),
            challenge.ttl
        );
        return Err(CeremonyError::ChallengeInvalid(
            "Challenge has expired".to_string(),
        ));
    }

    Ok(challenge)
}

#[derive(Debug)]
pub(super) struct ParsedClientData {
    pub(super) challenge: String,
    pub(super) origin: String,
    pub(super) type_: String,
}

impl ParsedClientData {
    pub(super) fn from_base64(client_data_json: &str) -> Result<Self, CeremonyError> {
        let raw_data = base64url_decode(client_data_json)?;

        let data_str = String::from_utf8(raw_data).map_err(|e| {
            CeremonyError::MalformedEncoding(format!("Client data is not valid UTF-8: {e}"))
        })?;

        let data: serde_json::Value = serde_json::from_str(&data_str)
            .map_err(|e| CeremonyError::MalformedEncoding(format!("Invalid JSON: {e}")))?;

        let field = |name: &str| -> Result<String, CeremonyError> {
            data[name]
                .as_str()
                .map(String::from)
                .ok_or_else(|| CeremonyError::MalformedEncoding(format!("Missing {name}")))
        };

        Ok(Self {
            challenge: field("challenge")?,
            origin: field("origin")?,
            type_: field("type")?,
        })
    }

    /// Checks the ceremony type discriminator and that the client data was
    /// produced in the expected origin context.
    pub(super) fn verify(&self, expected_type: &str) -> Result<(), CeremonyError> {
        if self.type_ != expected_type {
            return Err(CeremonyError::Validation(format!(
                "Invalid client data type. Expected '{}', got '{}'",
                expected_type, self.type_
            )));
        }

        if self.origin != *config::ORIGIN {
            return Err(CeremonyError::SecurityContext(format!(
                "Invalid origin. Expected: {}, Got: {}",
                *config::ORIGIN,
                self.origin
            )));
        }

        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct ParsedAttestation {
    pub(super) fmt: String,
    #[allow(dead_code)]
    pub(super) auth_data: Vec<u8>,
}

/// Sanity-parses a base64url attestation object: a CBOR map carrying
/// `fmt`, `authData` (>= 37 bytes) and `attStmt`. No chain or signature
/// verification happens here.
pub(super) fn parse_attestation_object(
    attestation_base64: &str,
) -> Result<ParsedAttestation, CeremonyError> {
    let attestation_bytes = base64url_decode(attestation_base64)?;

    let attestation_cbor: CborValue = ciborium::de::from_reader(&attestation_bytes[..])
        .map_err(|e| CeremonyError::MalformedEncoding(format!("Invalid CBOR data: {e}")))?;

    let CborValue::Map(map) = attestation_cbor else {
        return Err(CeremonyError::MalformedEncoding(
            "Attestation object is not a CBOR map".to_string(),
        ));
    };

    let mut fmt = None;
    let mut auth_data = None;
    let mut att_stmt = None;

    for (key, value) in map {
        if let CborValue::Text(k) = key {
            match k.as_str() {
                "fmt" => {
                    if let CborValue::Text(f) = value {
                        fmt = Some(f);
                    }
                }
                "authData" => {
                    if let CborValue::Bytes(data) = value {
                        auth_data = Some(data);
                    }
                }
                "attStmt" => {
                    if let CborValue::Map(stmt) = value {
                        att_stmt = Some(stmt);
                    }
                }
                _ => {}
            }
        }
    }

    match (fmt, auth_data, att_stmt) {
        (Some(fmt), Some(auth_data), Some(_)) => {
            if auth_data.len() < 37 {
                return Err(CeremonyError::MalformedEncoding(
                    "Authenticator data too short".to_string(),
                ));
            }
            Ok(ParsedAttestation { fmt, auth_data })
        }
        _ => Err(CeremonyError::MalformedEncoding(
            "Attestation object missing fmt, authData or attStmt".to_string(),
        )),
    }
}

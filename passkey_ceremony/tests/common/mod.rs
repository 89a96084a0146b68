//! Shared helpers: a platform authenticator stand-in that fabricates the
//! browser-side artifacts of a ceremony.

use std::sync::Mutex;

use async_trait::async_trait;
use ciborium::value::Value as CborValue;

use passkey_ceremony::{
    CreatedCredential, PlatformAssertion, PlatformAuthenticator, PlatformCreateOptions,
    PlatformError, PlatformErrorKind, PlatformGetOptions, base64url_encode, expected_origin,
};

#[derive(Clone)]
struct FakeCredentialRecord {
    raw_id: Vec<u8>,
    user_handle: Vec<u8>,
}

/// In-memory authenticator. Creation honors the exclude list the way a real
/// authenticator does, and assertions report the user handle captured at
/// creation time.
pub struct FakeAuthenticator {
    origin: String,
    credentials: Mutex<Vec<FakeCredentialRecord>>,
}

impl FakeAuthenticator {
    pub fn new() -> Self {
        Self {
            origin: expected_origin().to_string(),
            credentials: Mutex::new(Vec::new()),
        }
    }

    fn client_data(&self, type_: &str, challenge: &[u8]) -> Vec<u8> {
        serde_json::json!({
            "type": type_,
            "challenge": base64url_encode(challenge),
            "origin": self.origin,
        })
        .to_string()
        .into_bytes()
    }

    fn attestation_object() -> Vec<u8> {
        let value = CborValue::Map(vec![
            (
                CborValue::Text("fmt".to_string()),
                CborValue::Text("none".to_string()),
            ),
            (
                CborValue::Text("attStmt".to_string()),
                CborValue::Map(vec![]),
            ),
            (
                CborValue::Text("authData".to_string()),
                CborValue::Bytes(vec![0u8; 37]),
            ),
        ]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).expect("attestation CBOR serialization");
        bytes
    }
}

#[async_trait]
impl PlatformAuthenticator for FakeAuthenticator {
    async fn create(
        &self,
        options: PlatformCreateOptions,
    ) -> Result<Option<CreatedCredential>, PlatformError> {
        let mut credentials = self.credentials.lock().expect("credentials lock poisoned");

        if credentials
            .iter()
            .any(|c| options.exclude_credentials.contains(&c.raw_id))
        {
            return Err(PlatformError::new(
                PlatformErrorKind::InvalidState,
                "A credential for this relying party already exists",
            ));
        }

        let raw_id = format!("fake-credential-{}", credentials.len()).into_bytes();
        credentials.push(FakeCredentialRecord {
            raw_id: raw_id.clone(),
            user_handle: options.user.id.clone(),
        });

        Ok(Some(CreatedCredential {
            raw_id,
            client_data_json: self.client_data("webauthn.create", &options.challenge),
            attestation_object: Self::attestation_object(),
            authenticator_attachment: Some("platform".to_string()),
            client_extension_results: None,
        }))
    }

    async fn get(
        &self,
        options: PlatformGetOptions,
    ) -> Result<Option<PlatformAssertion>, PlatformError> {
        let credentials = self.credentials.lock().expect("credentials lock poisoned");

        let chosen = if options.allow_credentials.is_empty() {
            // Discoverable mode: the platform may present any stored
            // credential.
            credentials.last().cloned()
        } else {
            credentials
                .iter()
                .find(|c| options.allow_credentials.contains(&c.raw_id))
                .cloned()
        };

        let Some(chosen) = chosen else {
            return Err(PlatformError::new(
                PlatformErrorKind::NotFound,
                "No usable credential on this authenticator",
            ));
        };

        Ok(Some(PlatformAssertion {
            raw_id: chosen.raw_id,
            client_data_json: self.client_data("webauthn.get", &options.challenge),
            authenticator_data: vec![0u8; 37],
            signature: b"fake-signature".to_vec(),
            user_handle: Some(chosen.user_handle),
            authenticator_attachment: Some("platform".to_string()),
        }))
    }
}

/// Authenticator that reports no credential, as when the user dismisses the
/// prompt.
pub struct DismissingAuthenticator;

#[async_trait]
impl PlatformAuthenticator for DismissingAuthenticator {
    async fn create(
        &self,
        _options: PlatformCreateOptions,
    ) -> Result<Option<CreatedCredential>, PlatformError> {
        Ok(None)
    }

    async fn get(
        &self,
        _options: PlatformGetOptions,
    ) -> Result<Option<PlatformAssertion>, PlatformError> {
        Err(PlatformError::new(
            PlatformErrorKind::NotAllowed,
            "User cancelled the prompt",
        ))
    }
}

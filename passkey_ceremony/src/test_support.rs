//! Fabricated ceremony artifacts shared across unit tests.

use ciborium::value::Value as CborValue;

use crate::config;
use crate::protocol::{
    AssertionCredential, AssertionResponse, AttestationResponse, RegisterCredential,
};
use crate::utils::base64url_encode;

/// Base64url client data JSON carrying the configured origin.
pub(crate) fn client_data_json(type_: &str, challenge: &str) -> String {
    let json = serde_json::json!({
        "type": type_,
        "challenge": challenge,
        "origin": config::ORIGIN.as_str(),
    });
    base64url_encode(json.to_string())
}

/// Minimal well-formed attestation object: `fmt: "none"`, empty `attStmt`,
/// and a 37-byte `authData`.
pub(crate) fn attestation_object() -> String {
    attestation_object_with_auth_data(vec![0u8; 37])
}

pub(crate) fn attestation_object_with_auth_data(auth_data: Vec<u8>) -> String {
    let value = CborValue::Map(vec![
        (
            CborValue::Text("fmt".to_string()),
            CborValue::Text("none".to_string()),
        ),
        (CborValue::Text("attStmt".to_string()), CborValue::Map(vec![])),
        (
            CborValue::Text("authData".to_string()),
            CborValue::Bytes(auth_data),
        ),
    ]);
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&value, &mut bytes).expect("attestation CBOR serialization");
    base64url_encode(bytes)
}

pub(crate) fn register_credential(id: &str, challenge: &str) -> RegisterCredential {
    RegisterCredential {
        id: id.to_string(),
        raw_id: id.to_string(),
        type_: "public-key".to_string(),
        response: AttestationResponse {
            client_data_json: client_data_json("webauthn.create", challenge),
            attestation_object: attestation_object(),
        },
        authenticator_attachment: Some("platform".to_string()),
        client_extension_results: None,
    }
}

pub(crate) fn assertion_credential(
    id: &str,
    challenge: &str,
    user_handle: Option<String>,
) -> AssertionCredential {
    AssertionCredential {
        id: id.to_string(),
        raw_id: id.to_string(),
        type_: "public-key".to_string(),
        response: AssertionResponse {
            client_data_json: client_data_json("webauthn.get", challenge),
            authenticator_data: base64url_encode(vec![0u8; 37]),
            signature: base64url_encode(b"test-signature"),
            user_handle,
        },
        authenticator_attachment: Some("platform".to_string()),
    }
}

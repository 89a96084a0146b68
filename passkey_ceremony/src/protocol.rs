//! Wire-format types for the four ceremony endpoints.
//!
//! Every byte-valued field (challenge, credential ids, client data,
//! attestation/authenticator data, signature, user handle, user id) is
//! URL-safe unpadded base64 text on the wire and raw bytes only after
//! decoding for platform API use.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// COSE identifier for ECDSA w/ SHA-256 (ES256).
pub const COSE_ALG_ES256: i32 = -7;
/// COSE identifier for RSASSA-PKCS1-v1_5 w/ SHA-256 (RS256).
pub const COSE_ALG_RS256: i32 = -257;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CeremonyUserEntity {
    /// User handle, base64url-encoded random bytes.
    pub id: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RelyingPartyInfo {
    pub name: String,
    pub id: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PubKeyCredParam {
    #[serde(rename = "type")]
    pub type_: String,
    pub alg: i32,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelection {
    pub authenticator_attachment: String,
    pub resident_key: String,
    pub require_resident_key: bool,
    pub user_verification: String,
}

/// Reference to an existing credential in exclude/allow lists.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CredentialDescriptor {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
}

impl CredentialDescriptor {
    pub fn public_key(id: String) -> Self {
        Self {
            type_: "public-key".to_string(),
            id,
        }
    }
}

/// Options for initiating a registration ceremony, as produced by a relying
/// party and consumed by the platform credential API after decoding.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOptions {
    pub challenge: String,
    pub rp: RelyingPartyInfo,
    pub user: CeremonyUserEntity,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub timeout: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<String>,
    pub authenticator_selection: AuthenticatorSelection,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_credentials: Vec<CredentialDescriptor>,
}

/// Options for initiating an authentication ceremony.
///
/// An absent or empty `allow_credentials` list signals discoverable-credential
/// mode: the platform may present any stored credential for the relying party.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationOptions {
    pub challenge: String,
    pub timeout: u32,
    pub rp_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow_credentials: Vec<CredentialDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AttestationResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
}

/// Credential data returned by the platform after a successful creation,
/// serialized back into wire form.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCredential {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AttestationResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_extension_results: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AssertionResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    pub signature: String,
    /// Omitted entirely (never an empty string) when the platform reports
    /// no user handle.
    #[serde(
        rename = "userHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_handle: Option<String>,
}

/// Assertion returned by the platform after a successful authentication,
/// serialized back into wire form.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssertionCredential {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AssertionResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStartRequest {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AuthStartRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Outcome of `register/finish`. Protocol-level rejection is carried in
/// `success`/`message`, never as an error.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFinishResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegistrationFinishResult {
    pub fn accepted(credential_id: String, message: impl Into<String>) -> Self {
        Self {
            success: true,
            credential_id: Some(credential_id),
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            credential_id: None,
            message: Some(message.into()),
        }
    }
}

/// Outcome of `auth/finish`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationFinishResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthenticationFinishResult {
    pub fn accepted(username: String, message: impl Into<String>) -> Self {
        Self {
            success: true,
            username: Some(username),
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            username: None,
            message: Some(message.into()),
        }
    }
}

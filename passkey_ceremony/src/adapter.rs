//! Conversion between relying-party wire options and platform API calls.
//!
//! The adapter decodes the base64url fields a relying party sends into the
//! raw bytes the platform credential API expects, invokes the injected
//! platform capability, and serializes the opaque binary results back into
//! transport-safe wire form. It runs on the client side of a ceremony only.

use std::sync::Arc;

use crate::errors::CeremonyError;
use crate::platform::{
    PlatformAuthenticator, PlatformCreateOptions, PlatformGetOptions, PlatformUserEntity,
};
use crate::protocol::{
    AssertionCredential, AssertionResponse, AttestationResponse, AuthenticationOptions,
    RegisterCredential, RegistrationOptions,
};
use crate::utils::{base64url_decode, base64url_encode};

pub struct CeremonyAdapter {
    platform: Arc<dyn PlatformAuthenticator>,
}

impl CeremonyAdapter {
    pub fn new(platform: Arc<dyn PlatformAuthenticator>) -> Self {
        Self { platform }
    }

    /// Decodes registration options for the platform's create call.
    ///
    /// `challenge`, `user.id` and every `excludeCredentials[].id` are
    /// decoded to raw bytes; all other fields pass through unchanged.
    /// Attestation preference defaults to "none" when absent.
    pub fn to_platform_create_options(
        &self,
        options: &RegistrationOptions,
    ) -> Result<PlatformCreateOptions, CeremonyError> {
        let challenge = base64url_decode(&options.challenge)?;
        let user_id = base64url_decode(&options.user.id)?;

        let exclude_credentials = options
            .exclude_credentials
            .iter()
            .map(|cred| base64url_decode(&cred.id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlatformCreateOptions {
            challenge,
            rp: options.rp.clone(),
            user: PlatformUserEntity {
                id: user_id,
                name: options.user.name.clone(),
                display_name: options.user.display_name.clone(),
            },
            pub_key_cred_params: options.pub_key_cred_params.clone(),
            timeout: options.timeout,
            attestation: options
                .attestation
                .clone()
                .unwrap_or_else(|| "none".to_string()),
            authenticator_selection: options.authenticator_selection.clone(),
            exclude_credentials,
        })
    }

    /// Decodes authentication options for the platform's get call.
    ///
    /// An absent or empty `allowCredentials` list signals discoverable
    /// mode and is passed through empty, never fabricated. User
    /// verification defaults to "preferred" when absent.
    pub fn to_platform_get_options(
        &self,
        options: &AuthenticationOptions,
    ) -> Result<PlatformGetOptions, CeremonyError> {
        let challenge = base64url_decode(&options.challenge)?;

        let allow_credentials = options
            .allow_credentials
            .iter()
            .map(|cred| base64url_decode(&cred.id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlatformGetOptions {
            challenge,
            timeout: options.timeout,
            rp_id: options.rp_id.clone(),
            user_verification: options
                .user_verification
                .clone()
                .unwrap_or_else(|| "preferred".to_string()),
            allow_credentials,
        })
    }

    /// Invokes credential creation and serializes the result to wire form.
    ///
    /// Suspends on the platform's user-mediated prompt. Fails with
    /// `Aborted` when the platform returns no credential.
    pub async fn create_credential(
        &self,
        options: PlatformCreateOptions,
    ) -> Result<RegisterCredential, CeremonyError> {
        tracing::debug!("Invoking platform credential creation");

        let created = self
            .platform
            .create(options)
            .await?
            .ok_or_else(|| CeremonyError::Aborted("Platform returned no credential".to_string()))?;

        let id = base64url_encode(&created.raw_id);

        Ok(RegisterCredential {
            id: id.clone(),
            raw_id: id,
            type_: "public-key".to_string(),
            response: AttestationResponse {
                client_data_json: base64url_encode(&created.client_data_json),
                attestation_object: base64url_encode(&created.attestation_object),
            },
            authenticator_attachment: created.authenticator_attachment,
            client_extension_results: created.client_extension_results,
        })
    }

    /// Invokes assertion and serializes the result to wire form.
    ///
    /// `userHandle` is omitted, not encoded as empty, when the platform
    /// reports none.
    pub async fn get_credential(
        &self,
        options: PlatformGetOptions,
    ) -> Result<AssertionCredential, CeremonyError> {
        tracing::debug!("Invoking platform assertion");

        let assertion = self
            .platform
            .get(options)
            .await?
            .ok_or_else(|| CeremonyError::Aborted("Platform returned no credential".to_string()))?;

        let id = base64url_encode(&assertion.raw_id);

        Ok(AssertionCredential {
            id: id.clone(),
            raw_id: id,
            type_: "public-key".to_string(),
            response: AssertionResponse {
                client_data_json: base64url_encode(&assertion.client_data_json),
                authenticator_data: base64url_encode(&assertion.authenticator_data),
                signature: base64url_encode(&assertion.signature),
                user_handle: assertion.user_handle.map(base64url_encode),
            },
            authenticator_attachment: assertion.authenticator_attachment,
        })
    }
}

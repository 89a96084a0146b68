use chrono::Utc;

use crate::config::{
    PASSKEY_ATTESTATION, PASSKEY_AUTHENTICATOR_ATTACHMENT, PASSKEY_REQUIRE_RESIDENT_KEY,
    PASSKEY_RESIDENT_KEY, PASSKEY_RP_ID, PASSKEY_RP_NAME, PASSKEY_TIMEOUT,
    PASSKEY_USER_VERIFICATION,
};
use crate::errors::CeremonyError;
use crate::protocol::{
    AuthenticatorSelection, COSE_ALG_ES256, COSE_ALG_RS256, CeremonyUserEntity,
    CredentialDescriptor, PubKeyCredParam, RegisterCredential, RegistrationFinishResult,
    RegistrationOptions, RelyingPartyInfo,
};
use crate::translator::user_message;
use crate::utils::gen_random_string;

use super::MockRelyingParty;
use super::challenge::{
    ParsedClientData, consume_challenge, issue_challenge, now_secs, parse_attestation_object,
};
use super::types::{ChallengeKind, StoredCredential};

impl MockRelyingParty {
    /// Starts a registration ceremony for `username`.
    ///
    /// Issues a fresh challenge and user handle, and populates
    /// `excludeCredentials` with the user's existing credential ids so the
    /// platform avoids re-registering the same authenticator.
    pub async fn register_start(
        &self,
        username: &str,
        display_name: Option<&str>,
    ) -> Result<RegistrationOptions, CeremonyError> {
        if username.trim().is_empty() {
            return Err(CeremonyError::Validation(
                "Username must not be empty".to_string(),
            ));
        }

        let mut store = self.store.lock().await;
        store.sweep_expired(now_secs()).await?;

        let user = CeremonyUserEntity {
            id: gen_random_string(32)?,
            name: username.to_string(),
            display_name: display_name.unwrap_or(username).to_string(),
        };

        let exclude_credentials = store
            .credentials_for_user(username)
            .await?
            .into_iter()
            .map(|credential| CredentialDescriptor::public_key(credential.credential_id))
            .collect();

        let challenge =
            issue_challenge(&mut **store, ChallengeKind::Registration, user.clone()).await?;

        let options = RegistrationOptions {
            challenge,
            rp: RelyingPartyInfo {
                name: PASSKEY_RP_NAME.to_string(),
                id: PASSKEY_RP_ID.to_string(),
            },
            user,
            pub_key_cred_params: vec![
                PubKeyCredParam {
                    type_: "public-key".to_string(),
                    alg: COSE_ALG_ES256,
                },
                PubKeyCredParam {
                    type_: "public-key".to_string(),
                    alg: COSE_ALG_RS256,
                },
            ],
            timeout: (*PASSKEY_TIMEOUT) * 1000, // Convert seconds to milliseconds
            attestation: Some(PASSKEY_ATTESTATION.to_string()),
            authenticator_selection: AuthenticatorSelection {
                authenticator_attachment: PASSKEY_AUTHENTICATOR_ATTACHMENT.to_string(),
                resident_key: PASSKEY_RESIDENT_KEY.to_string(),
                require_resident_key: *PASSKEY_REQUIRE_RESIDENT_KEY,
                user_verification: PASSKEY_USER_VERIFICATION.to_string(),
            },
            exclude_credentials,
        };

        tracing::debug!("Registration options for {}: {:?}", username, options);

        Ok(options)
    }

    /// Concludes a registration ceremony.
    ///
    /// Consumes the challenge the client data points at and persists the
    /// credential bound to the username that started the ceremony.
    /// Protocol-level rejection comes back as `{success: false, message}`;
    /// this method never fails.
    pub async fn register_finish(&self, credential: &RegisterCredential) -> RegistrationFinishResult {
        match self.try_register_finish(credential).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("Registration rejected: {}", err);
                RegistrationFinishResult::rejected(user_message(&err))
            }
        }
    }

    async fn try_register_finish(
        &self,
        credential: &RegisterCredential,
    ) -> Result<RegistrationFinishResult, CeremonyError> {
        if credential.type_ != "public-key" {
            return Err(CeremonyError::Validation(format!(
                "Unexpected credential type: {}",
                credential.type_
            )));
        }

        let client_data = ParsedClientData::from_base64(&credential.response.client_data_json)?;
        client_data.verify("webauthn.create")?;

        let attestation = parse_attestation_object(&credential.response.attestation_object)?;
        tracing::debug!("Attestation format: {}", attestation.fmt);

        let mut store = self.store.lock().await;
        let challenge = consume_challenge(
            &mut **store,
            &client_data.challenge,
            ChallengeKind::Registration,
        )
        .await?;

        if challenge.user.name.is_empty() {
            return Err(CeremonyError::ChallengeInvalid(
                "Challenge is not bound to a user".to_string(),
            ));
        }

        let stored = StoredCredential {
            credential_id: credential.id.clone(),
            attestation_object: credential.response.attestation_object.clone(),
            user: challenge.user,
            created_at: Utc::now(),
        };

        if !store.put_credential(stored).await? {
            return Err(CeremonyError::DuplicateCredential(format!(
                "Credential {} is already registered",
                credential.id
            )));
        }

        tracing::debug!("Stored credential {}", credential.id);

        Ok(RegistrationFinishResult::accepted(
            credential.id.clone(),
            "Registration successful",
        ))
    }
}

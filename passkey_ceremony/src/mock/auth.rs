use subtle::ConstantTimeEq;

use crate::config::{PASSKEY_RP_ID, PASSKEY_TIMEOUT, PASSKEY_USER_VERIFICATION};
use crate::errors::CeremonyError;
use crate::protocol::{
    AssertionCredential, AuthenticationFinishResult, AuthenticationOptions, CeremonyUserEntity,
    CredentialDescriptor,
};
use crate::translator::user_message;

use super::MockRelyingParty;
use super::challenge::{ParsedClientData, consume_challenge, issue_challenge, now_secs};
use super::types::ChallengeKind;

impl MockRelyingParty {
    /// Starts an authentication ceremony.
    ///
    /// With a username, `allowCredentials` lists that user's stored
    /// credential ids; a user with no credentials gets an empty list, which
    /// is discoverable mode, not an error. Without a username the list is
    /// always empty by design.
    pub async fn auth_start(
        &self,
        username: Option<&str>,
    ) -> Result<AuthenticationOptions, CeremonyError> {
        let mut store = self.store.lock().await;
        store.sweep_expired(now_secs()).await?;

        let mut allow_credentials = Vec::new();
        if let Some(username) = username {
            for credential in store.credentials_for_user(username).await? {
                allow_credentials.push(CredentialDescriptor::public_key(credential.credential_id));
            }
        }

        let user = CeremonyUserEntity {
            id: String::new(),
            name: username.unwrap_or_default().to_string(),
            display_name: String::new(),
        };

        let challenge = issue_challenge(&mut **store, ChallengeKind::Authentication, user).await?;

        let options = AuthenticationOptions {
            challenge,
            timeout: (*PASSKEY_TIMEOUT) * 1000, // Convert seconds to milliseconds
            rp_id: PASSKEY_RP_ID.to_string(),
            allow_credentials,
            user_verification: Some(PASSKEY_USER_VERIFICATION.to_string()),
        };

        tracing::debug!("Authentication options: {:?}", options);

        Ok(options)
    }

    /// Concludes an authentication ceremony.
    ///
    /// Consumes the challenge and resolves the presented credential id
    /// against the store. An unknown id is a hard failure; no placeholder
    /// identity is ever minted. Signature verification is out of scope for
    /// the simulator. Never fails; rejection is `{success: false, message}`.
    pub async fn auth_finish(&self, credential: &AssertionCredential) -> AuthenticationFinishResult {
        match self.try_auth_finish(credential).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("Authentication rejected: {}", err);
                AuthenticationFinishResult::rejected(user_message(&err))
            }
        }
    }

    async fn try_auth_finish(
        &self,
        credential: &AssertionCredential,
    ) -> Result<AuthenticationFinishResult, CeremonyError> {
        if credential.type_ != "public-key" {
            return Err(CeremonyError::Validation(format!(
                "Unexpected credential type: {}",
                credential.type_
            )));
        }

        let client_data = ParsedClientData::from_base64(&credential.response.client_data_json)?;
        client_data.verify("webauthn.get")?;

        let mut store = self.store.lock().await;
        let challenge = consume_challenge(
            &mut **store,
            &client_data.challenge,
            ChallengeKind::Authentication,
        )
        .await?;

        let stored = store.get_credential(&credential.id).await?.ok_or_else(|| {
            CeremonyError::CredentialNotFound(format!(
                "No stored credential with id {}",
                credential.id
            ))
        })?;

        // A username-scoped ceremony only concludes with that user's
        // credential.
        if !challenge.user.name.is_empty() && challenge.user.name != stored.user.name {
            return Err(CeremonyError::CredentialNotFound(
                "Credential does not belong to the user who started this ceremony".to_string(),
            ));
        }

        // Discoverable-mode assertions report the user handle; it must match
        // the handle recorded at registration.
        if let Some(user_handle) = &credential.response.user_handle {
            let matches: bool = user_handle
                .as_bytes()
                .ct_eq(stored.user.id.as_bytes())
                .into();
            if !matches {
                return Err(CeremonyError::CredentialNotFound(
                    "User handle does not match the stored credential".to_string(),
                ));
            }
        }

        tracing::debug!("Authentication accepted for {}", stored.user.name);

        Ok(AuthenticationFinishResult::accepted(
            stored.user.name,
            "Authentication successful",
        ))
    }
}

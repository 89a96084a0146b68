//! Single call surface for the four ceremony operations.
//!
//! Each call re-reads the settings provider and routes to either the
//! injected mock relying party or a remote relying party over HTTP,
//! transparently to the caller. Routing is never cached; the backend flag
//! may change between calls.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::{Settings, SettingsProvider};
use crate::errors::CeremonyError;
use crate::mock::MockRelyingParty;
use crate::protocol::{
    AssertionCredential, AuthStartRequest, AuthenticationFinishResult, AuthenticationOptions,
    RegisterCredential, RegisterStartRequest, RegistrationFinishResult, RegistrationOptions,
};
use crate::transport::HttpTransport;

const REGISTER_START_PATH: &str = "/api/passkey/register/start";
const REGISTER_FINISH_PATH: &str = "/api/passkey/register/finish";
const AUTH_START_PATH: &str = "/api/passkey/auth/start";
const AUTH_FINISH_PATH: &str = "/api/passkey/auth/finish";

pub struct CeremonyClient {
    settings: Arc<dyn SettingsProvider>,
    mock: Arc<MockRelyingParty>,
    transport: Arc<dyn HttpTransport>,
}

impl CeremonyClient {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        mock: Arc<MockRelyingParty>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            settings,
            mock,
            transport,
        }
    }

    pub async fn register_start(
        &self,
        request: RegisterStartRequest,
    ) -> Result<RegistrationOptions, CeremonyError> {
        let settings = self.settings.settings();
        if settings.use_mock_server {
            tracing::debug!("Routing register/start to mock relying party");
            self.mock
                .register_start(&request.username, request.display_name.as_deref())
                .await
        } else {
            let response = self
                .post(&settings, REGISTER_START_PATH, serde_json::to_value(&request)?)
                .await?;
            Ok(serde_json::from_value(response)?)
        }
    }

    pub async fn register_finish(
        &self,
        credential: &RegisterCredential,
    ) -> Result<RegistrationFinishResult, CeremonyError> {
        let settings = self.settings.settings();
        if settings.use_mock_server {
            tracing::debug!("Routing register/finish to mock relying party");
            Ok(self.mock.register_finish(credential).await)
        } else {
            let response = self
                .post(
                    &settings,
                    REGISTER_FINISH_PATH,
                    serde_json::to_value(credential)?,
                )
                .await?;
            Ok(serde_json::from_value(response)?)
        }
    }

    pub async fn auth_start(
        &self,
        request: AuthStartRequest,
    ) -> Result<AuthenticationOptions, CeremonyError> {
        let settings = self.settings.settings();
        if settings.use_mock_server {
            tracing::debug!("Routing auth/start to mock relying party");
            self.mock.auth_start(request.username.as_deref()).await
        } else {
            let response = self
                .post(&settings, AUTH_START_PATH, serde_json::to_value(&request)?)
                .await?;
            Ok(serde_json::from_value(response)?)
        }
    }

    pub async fn auth_finish(
        &self,
        credential: &AssertionCredential,
    ) -> Result<AuthenticationFinishResult, CeremonyError> {
        let settings = self.settings.settings();
        if settings.use_mock_server {
            tracing::debug!("Routing auth/finish to mock relying party");
            Ok(self.mock.auth_finish(credential).await)
        } else {
            let response = self
                .post(
                    &settings,
                    AUTH_FINISH_PATH,
                    serde_json::to_value(credential)?,
                )
                .await?;
            Ok(serde_json::from_value(response)?)
        }
    }

    /// Sends a request to the remote relying party with the configured
    /// window. The in-flight request is aborted when the window elapses.
    async fn post(
        &self,
        settings: &Settings,
        path: &str,
        body: Value,
    ) -> Result<Value, CeremonyError> {
        let base = Url::parse(&settings.server_url).map_err(|e| {
            CeremonyError::Validation(format!(
                "Invalid server url '{}': {e}",
                settings.server_url
            ))
        })?;
        let url = base.join(path).map_err(|e| {
            CeremonyError::Validation(format!("Invalid endpoint path '{path}': {e}"))
        })?;

        tracing::debug!("POST {} (timeout {} ms)", url, settings.timeout_ms);

        match tokio::time::timeout(
            Duration::from_millis(settings.timeout_ms),
            self.transport.send(url.as_str(), &body),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(CeremonyError::RequestTimeout(format!(
                "Relying party did not respond within {} ms",
                settings.timeout_ms
            ))),
        }
    }
}

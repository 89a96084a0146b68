//! End-to-end ceremony flows: facade -> mock relying party -> adapter ->
//! fake platform authenticator and back.

mod common;

use std::sync::Arc;

use passkey_ceremony::{
    AuthStartRequest, CeremonyAdapter, CeremonyClient, CeremonyError, FixedSettings,
    MockRelyingParty, RegisterStartRequest, ReqwestTransport, Settings, base64url_decode,
    user_message,
};

use common::{DismissingAuthenticator, FakeAuthenticator};

fn mock_client() -> (CeremonyClient, Arc<MockRelyingParty>) {
    let mock = Arc::new(MockRelyingParty::in_memory());
    let client = CeremonyClient::new(
        Arc::new(FixedSettings::new(Settings::default())),
        mock.clone(),
        Arc::new(ReqwestTransport::new()),
    );
    (client, mock)
}

fn register_request(username: &str) -> RegisterStartRequest {
    RegisterStartRequest {
        username: username.to_string(),
        display_name: None,
    }
}

fn auth_request(username: Option<&str>) -> AuthStartRequest {
    AuthStartRequest {
        username: username.map(String::from),
    }
}

#[tokio::test]
async fn test_register_then_authenticate_round_trip() {
    let (client, _) = mock_client();
    let adapter = CeremonyAdapter::new(Arc::new(FakeAuthenticator::new()));

    // Start registration: options carry the username and decodable fields.
    let options = client.register_start(register_request("alice")).await.unwrap();
    assert_eq!(options.user.name, "alice");

    let platform_options = adapter.to_platform_create_options(&options).unwrap();
    assert_eq!(
        platform_options.challenge,
        base64url_decode(&options.challenge).unwrap()
    );
    assert_eq!(
        platform_options.user.id,
        base64url_decode(&options.user.id).unwrap()
    );

    // Create the credential and finish registration.
    let credential = adapter.create_credential(platform_options).await.unwrap();
    let result = client.register_finish(&credential).await.unwrap();
    assert!(result.success, "registration failed: {:?}", result.message);
    let credential_id = result.credential_id.expect("credential id on success");
    assert_eq!(credential_id, credential.id);

    // Authenticate with an allow list scoped to alice.
    let auth_options = client.auth_start(auth_request(Some("alice"))).await.unwrap();
    assert_eq!(auth_options.allow_credentials.len(), 1);
    assert_eq!(auth_options.allow_credentials[0].id, credential_id);

    let assertion = adapter
        .get_credential(adapter.to_platform_get_options(&auth_options).unwrap())
        .await
        .unwrap();
    let result = client.auth_finish(&assertion).await.unwrap();
    assert!(result.success, "authentication failed: {:?}", result.message);
    assert_eq!(result.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_reregistration_excludes_existing_authenticator() {
    let (client, _) = mock_client();
    let platform = Arc::new(FakeAuthenticator::new());
    let adapter = CeremonyAdapter::new(platform);

    let options = client.register_start(register_request("alice")).await.unwrap();
    let credential = adapter
        .create_credential(adapter.to_platform_create_options(&options).unwrap())
        .await
        .unwrap();
    let result = client.register_finish(&credential).await.unwrap();
    assert!(result.success);

    // The second start for alice carries the stored id in the exclude list,
    // and the authenticator consequently refuses to re-register.
    let options = client.register_start(register_request("alice")).await.unwrap();
    assert_eq!(options.exclude_credentials.len(), 1);
    assert_eq!(options.exclude_credentials[0].id, credential.id);

    let err = adapter
        .create_credential(adapter.to_platform_create_options(&options).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CeremonyError::DuplicateCredential(_)));
    assert_eq!(
        user_message(&err),
        "A passkey for this account already exists on this device."
    );
}

#[tokio::test]
async fn test_discoverable_authentication_reports_owner() {
    let (client, _) = mock_client();
    let adapter = CeremonyAdapter::new(Arc::new(FakeAuthenticator::new()));

    let options = client.register_start(register_request("alice")).await.unwrap();
    let credential = adapter
        .create_credential(adapter.to_platform_create_options(&options).unwrap())
        .await
        .unwrap();
    assert!(client.register_finish(&credential).await.unwrap().success);

    // No username: discoverable mode, empty allow list.
    let auth_options = client.auth_start(auth_request(None)).await.unwrap();
    assert!(auth_options.allow_credentials.is_empty());

    let assertion = adapter
        .get_credential(adapter.to_platform_get_options(&auth_options).unwrap())
        .await
        .unwrap();
    // The fake reports the user handle minted at registration; the mock
    // resolves it to the owning username.
    assert!(assertion.response.user_handle.is_some());

    let result = client.auth_finish(&assertion).await.unwrap();
    assert!(result.success);
    assert_eq!(result.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_auth_start_for_user_without_credentials() {
    let (client, _) = mock_client();

    // bob has nothing registered: empty allow list, not an error.
    let options = client.auth_start(auth_request(Some("bob"))).await.unwrap();
    assert!(options.allow_credentials.is_empty());
}

#[tokio::test]
async fn test_assertion_challenge_is_single_use() {
    let (client, _) = mock_client();
    let adapter = CeremonyAdapter::new(Arc::new(FakeAuthenticator::new()));

    let options = client.register_start(register_request("alice")).await.unwrap();
    let credential = adapter
        .create_credential(adapter.to_platform_create_options(&options).unwrap())
        .await
        .unwrap();
    assert!(client.register_finish(&credential).await.unwrap().success);

    let auth_options = client.auth_start(auth_request(Some("alice"))).await.unwrap();
    let assertion = adapter
        .get_credential(adapter.to_platform_get_options(&auth_options).unwrap())
        .await
        .unwrap();

    assert!(client.auth_finish(&assertion).await.unwrap().success);
    // Replaying the same assertion re-presents a consumed challenge.
    let replay = client.auth_finish(&assertion).await.unwrap();
    assert!(!replay.success);
}

#[tokio::test]
async fn test_clear_all_invalidates_previous_credentials() {
    let (client, mock) = mock_client();
    let adapter = CeremonyAdapter::new(Arc::new(FakeAuthenticator::new()));

    let options = client.register_start(register_request("alice")).await.unwrap();
    let credential = adapter
        .create_credential(adapter.to_platform_create_options(&options).unwrap())
        .await
        .unwrap();
    assert!(client.register_finish(&credential).await.unwrap().success);

    mock.clear_all().await.unwrap();

    let auth_options = client.auth_start(auth_request(None)).await.unwrap();
    let assertion = adapter
        .get_credential(adapter.to_platform_get_options(&auth_options).unwrap())
        .await
        .unwrap();
    let result = client.auth_finish(&assertion).await.unwrap();
    assert!(!result.success);
    assert!(result.username.is_none());
}

#[tokio::test]
async fn test_dismissed_prompt_translates_to_aborted() {
    let (client, _) = mock_client();
    let adapter = CeremonyAdapter::new(Arc::new(DismissingAuthenticator));

    let options = client.register_start(register_request("alice")).await.unwrap();
    let err = adapter
        .create_credential(adapter.to_platform_create_options(&options).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CeremonyError::Aborted(_)));
    assert_eq!(
        user_message(&err),
        "The passkey prompt was cancelled or timed out."
    );

    let auth_options = client.auth_start(auth_request(None)).await.unwrap();
    let err = adapter
        .get_credential(adapter.to_platform_get_options(&auth_options).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, CeremonyError::Aborted(_)));
}

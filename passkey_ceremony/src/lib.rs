//! passkey-ceremony - WebAuthn/FIDO2 passkey ceremony orchestration
//!
//! This crate converts relying-party challenge/options payloads into the
//! structures a platform credential API expects, invokes credential
//! creation/assertion through an injected capability, and serializes the
//! opaque binary results back into transport-safe form. In the absence of a
//! real backend it locally emulates a FIDO2 server: issuing challenges,
//! tracking their validity window, storing credentials, and validating
//! assertions.
//!
//! The [`CeremonyClient`] facade exposes the four ceremony operations and
//! routes each call to either the [`MockRelyingParty`] or a remote relying
//! party, depending on the current [`Settings`].

mod adapter;
mod config;
mod errors;
mod facade;
mod mock;
mod platform;
mod protocol;
mod translator;
mod transport;
mod utils;

#[cfg(test)]
mod test_support;

pub use adapter::CeremonyAdapter;
pub use config::{EnvSettings, FixedSettings, Settings, SettingsProvider, expected_origin};
pub use errors::CeremonyError;
pub use facade::CeremonyClient;
pub use mock::{
    CeremonyStore, ChallengeKind, InMemoryCeremonyStore, MockRelyingParty, StoredChallenge,
    StoredCredential,
};
pub use platform::{
    CreatedCredential, PlatformAssertion, PlatformAuthenticator, PlatformCreateOptions,
    PlatformError, PlatformErrorKind, PlatformGetOptions, PlatformUserEntity,
};
pub use protocol::{
    AssertionCredential, AssertionResponse, AttestationResponse, AuthStartRequest,
    AuthenticationFinishResult, AuthenticationOptions, AuthenticatorSelection, COSE_ALG_ES256,
    COSE_ALG_RS256, CeremonyUserEntity, CredentialDescriptor, PubKeyCredParam, RegisterCredential,
    RegisterStartRequest, RegistrationFinishResult, RegistrationOptions, RelyingPartyInfo,
};
pub use translator::user_message;
pub use transport::{HttpTransport, ReqwestTransport};
pub use utils::{CodecError, base64url_decode, base64url_encode, gen_random_string};

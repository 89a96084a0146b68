//! Local, non-networked relying party implementing the four ceremony
//! endpoints against an injected store.
//!
//! The simulator issues and expires challenges and persists credentials,
//! but deliberately does not verify attestation chains, assertion
//! signatures, or replay counters: presence of a stored credential is
//! treated as sufficient proof.

mod auth;
mod challenge;
mod register;
mod store;
mod types;

pub use store::{CeremonyStore, InMemoryCeremonyStore};
pub use types::{ChallengeKind, StoredChallenge, StoredCredential};

use tokio::sync::Mutex;

use crate::errors::CeremonyError;

pub struct MockRelyingParty {
    store: Mutex<Box<dyn CeremonyStore>>,
}

impl MockRelyingParty {
    /// Creates a relying party over an injected store, so callers (and
    /// tests) control state isolation.
    pub fn new(store: Box<dyn CeremonyStore>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryCeremonyStore::new()))
    }

    /// Empties both collections. Test/reset flows only; not part of the
    /// protocol surface.
    pub async fn clear_all(&self) -> Result<(), CeremonyError> {
        let mut store = self.store.lock().await;
        store.clear_all().await
    }

    /// Removes challenges past their validity window. Idempotent; also run
    /// lazily before every start operation.
    pub async fn sweep_expired_challenges(&self) -> Result<usize, CeremonyError> {
        let mut store = self.store.lock().await;
        store.sweep_expired(challenge::now_secs()).await
    }

    pub async fn pending_challenges(&self) -> Result<usize, CeremonyError> {
        let store = self.store.lock().await;
        store.challenge_count().await
    }
}

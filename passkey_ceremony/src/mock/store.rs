//! Keyed state behind the mock relying party: challenges by value,
//! credentials by id.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CeremonyError;

use super::types::{StoredChallenge, StoredCredential};

/// Storage backing a relying party. Injected at construction so tests can
/// instantiate isolated stores per case.
///
/// Challenge consumption must be atomic: `take_challenge` removes and
/// returns the record in a single operation, so no two callers can conclude
/// a ceremony with the same challenge.
#[async_trait]
pub trait CeremonyStore: Send + Sync + 'static {
    async fn put_challenge(&mut self, challenge: StoredChallenge) -> Result<(), CeremonyError>;

    /// Atomic check-and-delete. A challenge can be taken at most once.
    async fn take_challenge(&mut self, value: &str)
    -> Result<Option<StoredChallenge>, CeremonyError>;

    /// Removes every challenge whose validity window has elapsed at `now`.
    /// Idempotent; returns the number of records deleted.
    async fn sweep_expired(&mut self, now: u64) -> Result<usize, CeremonyError>;

    /// Persists a credential. Returns false without storing when the
    /// credential id already exists.
    async fn put_credential(&mut self, credential: StoredCredential)
    -> Result<bool, CeremonyError>;

    async fn get_credential(
        &self,
        credential_id: &str,
    ) -> Result<Option<StoredCredential>, CeremonyError>;

    async fn credentials_for_user(
        &self,
        username: &str,
    ) -> Result<Vec<StoredCredential>, CeremonyError>;

    /// Empties both collections. Test/reset flows only.
    async fn clear_all(&mut self) -> Result<(), CeremonyError>;

    async fn challenge_count(&self) -> Result<usize, CeremonyError>;
}

pub struct InMemoryCeremonyStore {
    challenges: HashMap<String, StoredChallenge>,
    credentials: HashMap<String, StoredCredential>,
}

impl InMemoryCeremonyStore {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory ceremony store");
        Self {
            challenges: HashMap::new(),
            credentials: HashMap::new(),
        }
    }
}

impl Default for InMemoryCeremonyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CeremonyStore for InMemoryCeremonyStore {
    async fn put_challenge(&mut self, challenge: StoredChallenge) -> Result<(), CeremonyError> {
        self.challenges
            .insert(challenge.challenge.clone(), challenge);
        Ok(())
    }

    async fn take_challenge(
        &mut self,
        value: &str,
    ) -> Result<Option<StoredChallenge>, CeremonyError> {
        Ok(self.challenges.remove(value))
    }

    async fn sweep_expired(&mut self, now: u64) -> Result<usize, CeremonyError> {
        let before = self.challenges.len();
        self.challenges.retain(|_, c| !c.is_expired_at(now));
        let removed = before - self.challenges.len();
        if removed > 0 {
            tracing::debug!("Swept {} expired challenge(s)", removed);
        }
        Ok(removed)
    }

    async fn put_credential(
        &mut self,
        credential: StoredCredential,
    ) -> Result<bool, CeremonyError> {
        if self.credentials.contains_key(&credential.credential_id) {
            return Ok(false);
        }
        self.credentials
            .insert(credential.credential_id.clone(), credential);
        Ok(true)
    }

    async fn get_credential(
        &self,
        credential_id: &str,
    ) -> Result<Option<StoredCredential>, CeremonyError> {
        Ok(self.credentials.get(credential_id).cloned())
    }

    async fn credentials_for_user(
        &self,
        username: &str,
    ) -> Result<Vec<StoredCredential>, CeremonyError> {
        Ok(self
            .credentials
            .values()
            .filter(|c| c.user.name == username)
            .cloned()
            .collect())
    }

    async fn clear_all(&mut self) -> Result<(), CeremonyError> {
        self.challenges.clear();
        self.credentials.clear();
        Ok(())
    }

    async fn challenge_count(&self) -> Result<usize, CeremonyError> {
        Ok(self.challenges.len())
    }
}

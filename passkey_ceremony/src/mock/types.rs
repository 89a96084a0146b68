use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::CeremonyUserEntity;

/// Which ceremony a challenge was issued for. A registration challenge must
/// not conclude an authentication ceremony or vice versa.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    Registration,
    Authentication,
}

/// A single-use challenge record, keyed in the store by its own value.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StoredChallenge {
    pub challenge: String,
    pub kind: ChallengeKind,
    /// User entity captured at ceremony start; `name` is empty for
    /// authentication ceremonies not scoped to a known user.
    pub user: CeremonyUserEntity,
    /// Issuance time, unix seconds.
    pub timestamp: u64,
    /// Validity window, seconds.
    pub ttl: u64,
}

impl StoredChallenge {
    pub fn is_expired_at(&self, now: u64) -> bool {
        now.saturating_sub(self.timestamp) > self.ttl
    }
}

/// A credential record persisted after successful registration. Never
/// mutated; removed only by the bulk clear operation.
///
/// The raw attestation payload stands in for parsed key material; private
/// keys never leave the platform's secure storage and do not appear here.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StoredCredential {
    pub credential_id: String,
    pub attestation_object: String,
    pub user: CeremonyUserEntity,
    pub created_at: DateTime<Utc>,
}

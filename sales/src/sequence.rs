//! Sequential identity issuance for clients, collaborators, and events.
//!
//! Each entity kind has its own named counter in the [`SequenceStore`] and
//! its own short-lived issuance lock, independent of the sale lock: client
//! registration never waits behind a running sale, and vice versa. The lock
//! only spans the single `next` call.

use crate::config::SalesConfig;
use cartela_core::error::SalesError;
use cartela_core::store::SequenceStore;
use cartela_core::types::{ClientId, CollaboratorId, EventId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Counter name for sale identifiers.
pub const SALES_SEQUENCE: &str = "sales";
/// Counter name for client identifiers.
pub const CLIENTS_SEQUENCE: &str = "clients";
/// Counter name for collaborator identifiers.
pub const COLLABORATORS_SEQUENCE: &str = "collaborators";
/// Counter name for event identifiers.
pub const EVENTS_SEQUENCE: &str = "events";

/// Issues sequential integer identities for the registration flows.
///
/// Sale identifiers are NOT issued here; the coordinator takes those from
/// the `"sales"` counter inside its own critical section.
pub struct IdIssuer {
    sequences: Arc<dyn SequenceStore>,
    client_lock: Mutex<()>,
    collaborator_lock: Mutex<()>,
    event_lock: Mutex<()>,
    lock_timeout: Duration,
}

impl IdIssuer {
    /// Creates an issuer over the given sequence store.
    #[must_use]
    pub fn new(sequences: Arc<dyn SequenceStore>, lock_timeout: Duration) -> Self {
        Self {
            sequences,
            client_lock: Mutex::new(()),
            collaborator_lock: Mutex::new(()),
            event_lock: Mutex::new(()),
            lock_timeout,
        }
    }

    /// Creates an issuer using the configured issuance bound.
    #[must_use]
    pub fn from_config(sequences: Arc<dyn SequenceStore>, config: &SalesConfig) -> Self {
        Self::new(sequences, config.id_lock_timeout)
    }

    /// Issues the next client identifier.
    ///
    /// # Errors
    ///
    /// [`SalesError::Busy`] if the issuance lock is not acquired within its
    /// bound; [`SalesError::Transaction`] if the counter update fails.
    pub async fn next_client_id(&self) -> Result<ClientId, SalesError> {
        self.issue(&self.client_lock, CLIENTS_SEQUENCE)
            .await
            .map(ClientId::new)
    }

    /// Issues the next collaborator identifier.
    ///
    /// # Errors
    ///
    /// Same as [`IdIssuer::next_client_id`].
    pub async fn next_collaborator_id(&self) -> Result<CollaboratorId, SalesError> {
        self.issue(&self.collaborator_lock, COLLABORATORS_SEQUENCE)
            .await
            .map(CollaboratorId::new)
    }

    /// Issues the next event identifier.
    ///
    /// # Errors
    ///
    /// Same as [`IdIssuer::next_client_id`].
    pub async fn next_event_id(&self) -> Result<EventId, SalesError> {
        self.issue(&self.event_lock, EVENTS_SEQUENCE)
            .await
            .map(EventId::new)
    }

    async fn issue(&self, lock: &Mutex<()>, name: &str) -> Result<u64, SalesError> {
        let _guard = timeout(self.lock_timeout, lock.lock())
            .await
            .map_err(|_| SalesError::Busy(self.lock_timeout))?;
        Ok(self.sequences.next(name).await?)
    }
}

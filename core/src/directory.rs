//! Contracts consumed from the excluded CRUD layer.
//!
//! The event catalog and client registry are external collaborators: the
//! coordinator looks entities up before a sale and pokes the client's
//! last-purchase timestamp after one, but owns neither record.

use crate::error::StoreError;
use crate::store::StoreFuture;
use crate::types::{Client, ClientId, Event, EventId};
use chrono::{DateTime, Utc};

/// Read-only event lookup.
pub trait EventCatalog: Send + Sync {
    /// Fetches an event by id; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the catalog's backing store is unreachable.
    fn event(&self, id: EventId) -> StoreFuture<'_, Option<Event>>;
}

/// Client lookup plus the last-purchase write hook.
pub trait ClientRegistry: Send + Sync {
    /// Fetches a client by id; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the registry's backing store is unreachable.
    fn client(&self, id: ClientId) -> StoreFuture<'_, Option<Client>>;

    /// Records the moment of a client's latest purchase.
    ///
    /// Called as a side effect of a committed sale; the sale itself does not
    /// roll back when this fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the update fails.
    fn record_purchase(&self, id: ClientId, at: DateTime<Utc>) -> StoreFuture<'_, ()>;
}

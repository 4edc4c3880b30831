//! # Cartela Core
//!
//! Domain types and store contracts for the Cartela card-sales core.
//!
//! This crate defines everything the allocation and coordination logic in
//! `cartela-sales` depends on, without performing any I/O itself:
//!
//! - **Types**: sequential identities, money, card ranges, events, clients,
//!   cursors, and the immutable sale record
//! - **Store contracts**: the atomic persistence primitives (named sequence
//!   counters, per-event ticket cursors, sale partitions)
//! - **Collaborator contracts**: the event catalog and client registry owned
//!   by the surrounding CRUD layer
//! - **Errors**: the validation / busy / transaction taxonomy
//!
//! Store implementations live elsewhere: `cartela-testing` ships a
//! deterministic in-memory store, and any document store exposing an atomic
//! find-and-update-with-upsert primitive can back production.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod clock;
pub mod directory;
pub mod error;
pub mod store;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use directory::{ClientRegistry, EventCatalog};
pub use error::{SalesError, StoreError, ValidationError};
pub use store::{CursorStore, SaleStore, SequenceStore, StoreFuture};
pub use types::{
    CardRange, Client, ClientId, CollaboratorId, Event, EventId, EventStatus, EventTicketCursor,
    Money, RangeAllocation, SaleId, SaleRecord, SaleSummary,
};

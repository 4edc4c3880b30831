//! # Cartela Sales
//!
//! Sequence generation, ticket-range allocation, and sale transaction
//! coordination for numbered-card sales against scheduled events.
//!
//! Each event defines a finite, cyclically-reused numbering space
//! `[1, limit]`. The hard guarantee this crate provides: concurrently
//! submitted sales for the same event never receive overlapping card-number
//! ranges, and every sale obtains a globally unique sequential identifier.
//!
//! ## Control flow
//!
//! A sale request enters [`SaleCoordinator::submit_sale`], which validates
//! input, takes the process-wide sale lock with a bounded wait, draws a sale
//! identifier from the `"sales"` counter, asks the
//! [`TicketRangeAllocator`] for a range sized to the purchase, persists the
//! immutable [`SaleRecord`](cartela_core::types::SaleRecord), touches the
//! client's last-purchase timestamp, releases the lock, and finally builds
//! the client's cumulative summary outside the critical section.
//!
//! Registration flows obtain their sequential client/collaborator/event
//! identifiers through [`IdIssuer`], each kind under its own short-lived
//! lock.
//!
//! ## Concurrency policy
//!
//! A single coarse lock serializes sale submission across all events. The
//! cursor upsert already seeds brand-new cursors with the event's configured
//! starting number in the same atomic step, so nothing in the allocation
//! path depends on the coarse lock for first-sale correctness; narrowing to
//! a per-event lock is left as future work.

pub mod allocator;
pub mod config;
pub mod coordinator;
pub mod sequence;

pub use allocator::{TicketRangeAllocator, split_range};
pub use config::SalesConfig;
pub use coordinator::{CompletedSale, SaleCoordinator};
pub use sequence::IdIssuer;

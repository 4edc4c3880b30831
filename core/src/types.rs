//! Domain types for the Cartela sales core.
//!
//! This module contains the value objects and entities shared by the
//! allocator and the sale coordinator: sequential identities, money, card
//! ranges, events, clients, cursors, and the immutable sale record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Sequential identifier for an event.
///
/// Issued by the `"events"` sequence counter; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Creates an `EventId` from a raw sequence value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential identifier for a client.
///
/// Issued by the `"clients"` sequence counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(u64);

impl ClientId {
    /// Creates a `ClientId` from a raw sequence value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CLI{}", self.0)
    }
}

/// Sequential identifier for a collaborator (the person registering a sale).
///
/// Issued by the `"collaborators"` sequence counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollaboratorId(u64);

impl CollaboratorId {
    /// Creates a `CollaboratorId` from a raw sequence value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollaboratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique, monotonically increasing sale identifier.
///
/// Wraps the raw value obtained from the `"sales"` sequence counter. The
/// public form is the zero-padded string printed on receipts (`V00042`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SaleId(u64);

impl SaleId {
    /// Creates a `SaleId` from a raw sequence value
    #[must_use]
    pub const fn from_sequence(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence value
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:05}", self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in centavos to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Card Ranges
// ============================================================================

/// A contiguous, closed interval of card numbers within an event's numbering
/// space.
///
/// Both bounds are inclusive and `start <= end` always holds for ranges
/// produced by the allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRange {
    /// First card number in the range (inclusive)
    pub start: u32,
    /// Last card number in the range (inclusive)
    pub end: u32,
}

impl CardRange {
    /// Creates a new `CardRange`
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of cards covered by the range
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// A range produced by the allocator is never empty; provided for
    /// completeness over raw constructions
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Checks whether a card number falls inside the range
    #[must_use]
    pub const fn contains(&self, number: u32) -> bool {
        self.start <= number && number <= self.end
    }

    /// Checks whether two ranges share at least one card number
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for CardRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} a {}", self.start, self.end)
    }
}

/// The outcome of one ticket-range allocation.
///
/// A second range exists only when the allocation wrapped around the end of
/// the numbering space; it always starts at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAllocation {
    /// The range beginning at the allocation's start position
    pub first: CardRange,
    /// Continuation from position 1 when the allocation wrapped
    pub second: Option<CardRange>,
}

impl RangeAllocation {
    /// Creates a new `RangeAllocation`
    #[must_use]
    pub const fn new(first: CardRange, second: Option<CardRange>) -> Self {
        Self { first, second }
    }

    /// Total number of cards across both ranges
    #[must_use]
    pub const fn total_cards(&self) -> u32 {
        match self.second {
            Some(second) => self.first.len() + second.len(),
            None => self.first.len(),
        }
    }

    /// Checks whether the allocation wrapped around the numbering space
    #[must_use]
    pub const fn wrapped(&self) -> bool {
        self.second.is_some()
    }
}

// ============================================================================
// Domain Entities
// ============================================================================

/// Event lifecycle status.
///
/// The full taxonomy is owned by the catalog layer; the coordinator only
/// cares whether sales are currently allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    /// Event is being configured (not sellable)
    Draft,
    /// Sales are open
    Active,
    /// Sales are closed
    Closed,
    /// Event was cancelled
    Cancelled,
}

impl EventStatus {
    /// Whether sales may be registered against an event in this status
    #[must_use]
    pub const fn is_sellable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Event entity as read from the event catalog.
///
/// `limit` is the size of the event's cyclic numbering space `[1, limit]`;
/// `starting_number` is where the very first sale for the event begins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier
    pub id: EventId,
    /// Human-readable description
    pub description: String,
    /// Initial cursor position for the event's first sale
    pub starting_number: u32,
    /// Size of the numbering space
    pub limit: u32,
    /// How many numbered cards one purchased unit yields
    pub cards_per_unit: u32,
    /// Price of one unit
    pub unit_price: Money,
    /// Current event status
    pub status: EventStatus,
}

/// Client entity as read from the client registry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier
    pub id: ClientId,
    /// Client's full name
    pub name: String,
    /// Short name used on receipts
    pub nick: String,
    /// When the client last completed a purchase
    pub last_purchase_at: Option<DateTime<Utc>>,
}

/// Per-event cursor into the cyclic numbering space.
///
/// `next_position` is the first card number the next allocation will receive
/// and always lies in `[1, limit]`. Created lazily on the event's first sale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTicketCursor {
    /// Event this cursor belongs to
    pub event_id: EventId,
    /// Next unallocated position
    pub next_position: u32,
    /// When the cursor last advanced
    pub last_update: DateTime<Utc>,
}

/// Immutable record of one completed sale.
///
/// Written exactly once into the event's sale partition and never mutated.
/// The range lengths always sum to `cards`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Globally unique sale identifier
    pub sale_id: SaleId,
    /// Event the cards belong to
    pub event_id: EventId,
    /// Purchasing client
    pub client_id: ClientId,
    /// Collaborator who registered the sale
    pub collaborator_id: CollaboratorId,
    /// Units purchased
    pub units: u32,
    /// Cards granted (`units * cards_per_unit`)
    pub cards: u32,
    /// The granted card range(s)
    pub ranges: RangeAllocation,
    /// Price of one unit at sale time
    pub unit_price: Money,
    /// Total charged (`unit_price * units`)
    pub total_price: Money,
    /// When the sale was committed
    pub sold_at: DateTime<Utc>,
}

/// Cumulative view of one client's sales for one event.
///
/// Purely derived data, recomputable at any time from the persisted sale
/// records; not part of the correctness invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSummary {
    /// Event the summary is scoped to
    pub event_id: EventId,
    /// Client the summary is scoped to
    pub client_id: ClientId,
    /// Number of completed sales
    pub sale_count: u32,
    /// Units purchased across all sales
    pub total_units: u32,
    /// Cards granted across all sales
    pub total_cards: u32,
    /// Total value across all sales
    pub total_value: Money,
    /// Every range ever granted, in commit order
    pub ranges: Vec<CardRange>,
}

impl SaleSummary {
    /// An empty summary for a client with no sales yet
    #[must_use]
    pub const fn empty(event_id: EventId, client_id: ClientId) -> Self {
        Self {
            event_id,
            client_id,
            sale_count: 0,
            total_units: 0,
            total_cards: 0,
            total_value: Money::from_cents(0),
            ranges: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_id_formats_zero_padded() {
        assert_eq!(SaleId::from_sequence(42).to_string(), "V00042");
        assert_eq!(SaleId::from_sequence(123_456).to_string(), "V123456");
    }

    #[test]
    fn client_id_display_carries_prefix() {
        assert_eq!(ClientId::new(7).to_string(), "CLI7");
    }

    #[test]
    fn money_display_uses_cents() {
        assert_eq!(Money::from_cents(1250).to_string(), "R$ 12.50");
        assert_eq!(Money::from_cents(5).to_string(), "R$ 0.05");
    }

    #[test]
    fn money_checked_multiply_detects_overflow() {
        assert_eq!(
            Money::from_cents(100).checked_multiply(3),
            Some(Money::from_cents(300))
        );
        assert_eq!(Money::from_cents(u64::MAX).checked_multiply(2), None);
    }

    #[test]
    fn card_range_len_is_inclusive() {
        assert_eq!(CardRange::new(8, 10).len(), 3);
        assert_eq!(CardRange::new(5, 5).len(), 1);
    }

    #[test]
    fn card_range_overlap_detection() {
        let a = CardRange::new(1, 12);
        let b = CardRange::new(13, 24);
        let c = CardRange::new(12, 13);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn allocation_totals_both_ranges() {
        let wrapped = RangeAllocation::new(
            CardRange::new(71_995, 72_000),
            Some(CardRange::new(1, 6)),
        );
        assert_eq!(wrapped.total_cards(), 12);
        assert!(wrapped.wrapped());

        let plain = RangeAllocation::new(CardRange::new(1, 12), None);
        assert_eq!(plain.total_cards(), 12);
        assert!(!plain.wrapped());
    }

    #[test]
    fn only_active_events_are_sellable() {
        assert!(EventStatus::Active.is_sellable());
        assert!(!EventStatus::Draft.is_sellable());
        assert!(!EventStatus::Closed.is_sellable());
        assert!(!EventStatus::Cancelled.is_sellable());
    }
}

//! Ticket-range allocation against an event's cyclic numbering space.
//!
//! One allocation takes the event's cursor forward by `quantity` positions in
//! a single atomic store step and turns the previous cursor position into one
//! or two contiguous [`CardRange`]s. The second range appears only when the
//! allocation runs past the end of the space and continues from position 1.
//!
//! As long as allocations for one event are issued one at a time, no two
//! allocations ever share a card number, and a number is handed out again
//! only after exactly `limit` cumulative cards have been allocated since it
//! was last given out.

use cartela_core::error::StoreError;
use cartela_core::store::CursorStore;
use cartela_core::types::{CardRange, EventId, RangeAllocation};
use std::sync::Arc;

/// Splits an allocation beginning at `start` into its range(s).
///
/// `end = start + quantity - 1`; past `limit` the allocation wraps into a
/// second range starting at 1. Callers keep `1 <= quantity <= limit` and
/// `1 <= start <= limit`; the split is then guaranteed self-disjoint with
/// lengths summing to `quantity`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // spill < quantity and end <= limit in their branches
pub const fn split_range(start: u32, quantity: u32, limit: u32) -> RangeAllocation {
    let end = start as u64 + quantity as u64 - 1;
    if end > limit as u64 {
        let spill = (end - limit as u64) as u32;
        RangeAllocation::new(
            CardRange::new(start, limit),
            Some(CardRange::new(1, spill)),
        )
    } else {
        RangeAllocation::new(CardRange::new(start, end as u32), None)
    }
}

/// Hands out contiguous card-number ranges from per-event cyclic cursors.
pub struct TicketRangeAllocator {
    cursors: Arc<dyn CursorStore>,
}

impl TicketRangeAllocator {
    /// Creates an allocator over the given cursor store.
    #[must_use]
    pub fn new(cursors: Arc<dyn CursorStore>) -> Self {
        Self { cursors }
    }

    /// Allocates `quantity` card numbers for an event.
    ///
    /// The cursor advance — including creation of a missing cursor at
    /// `starting_number` for the event's first-ever sale — happens in one
    /// atomic store step, so a failure leaves no partial update behind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the cursor store cannot complete the
    /// atomic advance.
    pub async fn allocate(
        &self,
        event_id: EventId,
        quantity: u32,
        limit: u32,
        starting_number: u32,
    ) -> Result<RangeAllocation, StoreError> {
        let start = self
            .cursors
            .advance(event_id, quantity, limit, starting_number)
            .await?;
        let allocation = split_range(start, quantity, limit);
        tracing::debug!(
            %event_id,
            quantity,
            start,
            wrapped = allocation.wrapped(),
            "allocated ticket range"
        );
        Ok(allocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_wrap_case() {
        // limit 10, cursor at 3, quantity 4 -> cards 3..=6, no second range.
        let allocation = split_range(3, 4, 10);
        assert_eq!(allocation.first, CardRange::new(3, 6));
        assert_eq!(allocation.second, None);
    }

    #[test]
    fn wrap_case() {
        // limit 10, cursor at 8, quantity 5 -> 8,9,10 then 1,2.
        let allocation = split_range(8, 5, 10);
        assert_eq!(allocation.first, CardRange::new(8, 10));
        assert_eq!(allocation.second, Some(CardRange::new(1, 2)));
        assert_eq!(allocation.total_cards(), 5);
    }

    #[test]
    fn allocation_ending_exactly_on_limit_does_not_wrap() {
        let allocation = split_range(9, 2, 10);
        assert_eq!(allocation.first, CardRange::new(9, 10));
        assert_eq!(allocation.second, None);
    }

    #[test]
    fn full_space_allocation_is_one_range() {
        let allocation = split_range(1, 10, 10);
        assert_eq!(allocation.first, CardRange::new(1, 10));
        assert_eq!(allocation.second, None);
    }

    proptest! {
        #[test]
        fn split_covers_exactly_quantity_cards(
            limit in 1u32..100_000,
            start_offset in 0u32..100_000,
            quantity_offset in 0u32..100_000,
        ) {
            let start = start_offset % limit + 1;
            let quantity = quantity_offset % limit + 1;
            let allocation = split_range(start, quantity, limit);
            prop_assert_eq!(allocation.total_cards(), quantity);
        }

        #[test]
        fn split_stays_inside_the_numbering_space(
            limit in 1u32..100_000,
            start_offset in 0u32..100_000,
            quantity_offset in 0u32..100_000,
        ) {
            let start = start_offset % limit + 1;
            let quantity = quantity_offset % limit + 1;
            let allocation = split_range(start, quantity, limit);

            prop_assert_eq!(allocation.first.start, start);
            prop_assert!(allocation.first.end <= limit);
            prop_assert!(allocation.first.start <= allocation.first.end);
            if let Some(second) = allocation.second {
                prop_assert_eq!(second.start, 1);
                prop_assert!(second.end <= limit);
                // A wrapped allocation of at most `limit` cards never folds
                // back onto its own first range.
                prop_assert!(!second.overlaps(&allocation.first));
            }
        }
    }
}

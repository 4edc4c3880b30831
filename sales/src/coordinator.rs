//! The sale transaction coordinator.
//!
//! `submit_sale` commits one sale as a logical unit: sequence value, range
//! allocation, record insert, and the client's last-purchase side effect all
//! happen under one process-wide exclusive lock with a bounded acquisition
//! wait. The receipt aggregation runs after the lock is released; it is
//! derived data and may race with other clients' sales without harm.
//!
//! The coordinator never retries on its own. Validation failures are
//! reported before any shared state is touched, a lock timeout is reported
//! as busy, and any store failure inside the critical section aborts the
//! sale (the lock is released by guard drop on every path).

use crate::allocator::TicketRangeAllocator;
use crate::config::SalesConfig;
use crate::sequence::SALES_SEQUENCE;
use cartela_core::clock::Clock;
use cartela_core::directory::{ClientRegistry, EventCatalog};
use cartela_core::error::{SalesError, StoreError, ValidationError};
use cartela_core::store::{CursorStore, SaleStore, SequenceStore};
use cartela_core::types::{
    ClientId, CollaboratorId, EventId, SaleId, SaleRecord, SaleSummary,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// A committed sale together with its receipt data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedSale {
    /// The record as persisted into the event's sale partition
    pub record: SaleRecord,
    /// The client's cumulative history for the event, including this sale
    pub summary: SaleSummary,
    /// Set when the last-purchase side effect failed after the sale was
    /// already committed; the sale stands regardless
    pub client_update_failure: Option<StoreError>,
}

/// Serializes sale submission and owns the concurrency-control policy.
pub struct SaleCoordinator {
    sequences: Arc<dyn SequenceStore>,
    allocator: TicketRangeAllocator,
    sales: Arc<dyn SaleStore>,
    catalog: Arc<dyn EventCatalog>,
    clients: Arc<dyn ClientRegistry>,
    clock: Arc<dyn Clock>,
    sale_lock: Mutex<()>,
    config: SalesConfig,
}

impl SaleCoordinator {
    /// Creates a coordinator over the given stores and collaborators.
    #[must_use]
    pub fn new(
        sequences: Arc<dyn SequenceStore>,
        cursors: Arc<dyn CursorStore>,
        sales: Arc<dyn SaleStore>,
        catalog: Arc<dyn EventCatalog>,
        clients: Arc<dyn ClientRegistry>,
        clock: Arc<dyn Clock>,
        config: SalesConfig,
    ) -> Self {
        Self {
            sequences,
            allocator: TicketRangeAllocator::new(cursors),
            sales,
            catalog,
            clients,
            clock,
            sale_lock: Mutex::new(()),
            config,
        }
    }

    /// Commits one sale: `units` purchased by `client_id` against
    /// `event_id`, registered by `collaborator_id`.
    ///
    /// Preconditions are checked before the critical section; they never
    /// touch shared mutable state. Inside the critical section the sale
    /// obtains its globally unique identifier, its card range(s), and its
    /// place in the event's sale partition. Sales are committed in lock
    /// acquisition order.
    ///
    /// # Errors
    ///
    /// - [`SalesError::Validation`]: non-positive units, unknown event or
    ///   client, event not open for sales, or more cards than the numbering
    ///   space holds
    /// - [`SalesError::Busy`]: the sale lock was not acquired within the
    ///   configured bound
    /// - [`SalesError::Transaction`]: a store primitive failed; the sale was
    ///   not committed
    pub async fn submit_sale(
        &self,
        event_id: EventId,
        client_id: ClientId,
        units: u32,
        collaborator_id: CollaboratorId,
    ) -> Result<CompletedSale, SalesError> {
        if units == 0 {
            return Err(ValidationError::NonPositiveQuantity.into());
        }
        let event = self
            .catalog
            .event(event_id)
            .await?
            .ok_or(ValidationError::UnknownEvent(event_id))?;
        if !event.status.is_sellable() {
            return Err(ValidationError::EventNotSellable(event_id).into());
        }
        if self.clients.client(client_id).await?.is_none() {
            return Err(ValidationError::UnknownClient(client_id).into());
        }

        let requested = u64::from(units) * u64::from(event.cards_per_unit);
        let cards = u32::try_from(requested)
            .ok()
            .filter(|cards| (1..=event.limit).contains(cards))
            .ok_or(ValidationError::TooManyCards {
                requested,
                limit: event.limit,
            })?;

        let (record, client_update_failure) = {
            let _guard = timeout(self.config.sale_lock_timeout, self.sale_lock.lock())
                .await
                .map_err(|_| {
                    tracing::warn!(%event_id, %client_id, "sale lock not acquired within bound");
                    SalesError::Busy(self.config.sale_lock_timeout)
                })?;

            let sale_id = SaleId::from_sequence(self.sequences.next(SALES_SEQUENCE).await?);
            let ranges = self
                .allocator
                .allocate(event_id, cards, event.limit, event.starting_number)
                .await?;
            let total_price = event.unit_price.checked_multiply(units).ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "total price overflows for {units} units at {}",
                    event.unit_price
                ))
            })?;

            let now = self.clock.now();
            let record = SaleRecord {
                sale_id,
                event_id,
                client_id,
                collaborator_id,
                units,
                cards,
                ranges,
                unit_price: event.unit_price,
                total_price,
                sold_at: now,
            };
            self.sales.insert(record.clone()).await?;

            // Committed from here on; the side effect below must not undo it.
            let client_update_failure = match self.clients.record_purchase(client_id, now).await {
                Ok(()) => None,
                Err(error) => {
                    tracing::warn!(
                        %client_id,
                        %error,
                        "last-purchase update failed after committed sale"
                    );
                    Some(error)
                }
            };

            tracing::info!(
                sale_id = %record.sale_id,
                %event_id,
                %client_id,
                units,
                cards,
                wrapped = record.ranges.wrapped(),
                "sale committed"
            );
            (record, client_update_failure)
        };

        let summary = self.client_summary(event_id, client_id).await?;
        Ok(CompletedSale {
            record,
            summary,
            client_update_failure,
        })
    }

    /// Aggregates one client's sale history for one event.
    ///
    /// Read-only and lock-free; safe to recompute at any time. Two calls
    /// with no writes in between yield identical summaries.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Transaction`] if the sale partition cannot be
    /// read.
    pub async fn client_summary(
        &self,
        event_id: EventId,
        client_id: ClientId,
    ) -> Result<SaleSummary, SalesError> {
        let records = self.sales.sales_for_client(event_id, client_id).await?;
        let mut summary = SaleSummary::empty(event_id, client_id);
        for record in &records {
            summary.sale_count += 1;
            summary.total_units += record.units;
            summary.total_cards += record.cards;
            summary.total_value = summary
                .total_value
                .checked_add(record.total_price)
                .ok_or_else(|| StoreError::Corrupt("summary value overflows".into()))?;
            summary.ranges.push(record.ranges.first);
            if let Some(second) = record.ranges.second {
                summary.ranges.push(second);
            }
        }
        Ok(summary)
    }
}

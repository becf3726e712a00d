use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db::traits::{InsertOrderResult, RecordStore},
    ne_api::{
        errors::{IntakeError, OrderIntakeError},
        order_objects::IntakeSummary,
    },
    traits::{OrderSource, SourceHealth, SourceOrder},
    validation::build_order_record,
};

/// `IntakeApi` records every non-cancelled order reported by the order source, exactly once.
pub struct IntakeApi<S, R> {
    source: S,
    store: R,
}

impl<S, R> Debug for IntakeApi<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IntakeApi")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderOutcome {
    Inserted,
    AlreadyRecorded,
    Cancelled,
}

impl<S, R> IntakeApi<S, R> {
    pub fn new(source: S, store: R) -> Self {
        Self { source, store }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &R {
        &self.store
    }
}

impl<S, R> IntakeApi<S, R>
where
    S: OrderSource,
    R: RecordStore,
{
    /// Runs one intake pass over every order updated at or after `cutoff` in the given marketplaces.
    ///
    /// The run is abandoned without writing anything if the source is unhealthy or the order listing fails; the next
    /// scheduled run covers the same window again. Once orders have been listed, a failure on one order (fetching its
    /// items, validating it or storing it) is logged and counted, and the remaining orders are still processed.
    pub async fn run_intake(
        &self,
        cutoff: DateTime<Utc>,
        marketplace_ids: &[String],
    ) -> Result<IntakeSummary, IntakeError> {
        let health = self.source.health().await.map_err(|e| IntakeError::SourceUnavailable(e.to_string()))?;
        if let SourceHealth::Unhealthy(reason) = health {
            error!("📥️ The order source looks to be down ({reason}). Skipping this run.");
            return Err(IntakeError::SourceUnavailable(reason));
        }
        let orders = self.source.orders_updated_since(cutoff, marketplace_ids).await?;
        let mut summary = IntakeSummary { received: orders.len(), ..Default::default() };
        if orders.is_empty() {
            info!("📥️ No orders updated since {cutoff}");
            return Ok(summary);
        }
        info!("📥️ {} orders updated since {cutoff}", orders.len());
        for order in &orders {
            match self.process_order(order).await {
                Ok(OrderOutcome::Inserted) => summary.inserted += 1,
                Ok(OrderOutcome::AlreadyRecorded) => summary.duplicates += 1,
                Ok(OrderOutcome::Cancelled) => summary.cancelled += 1,
                Err(e) => {
                    error!("📥️ Could not record order {}. {e}", order.order_id);
                    summary.failed += 1;
                },
            }
        }
        info!("📥️ Intake complete. {summary}");
        Ok(summary)
    }

    async fn process_order(&self, order: &SourceOrder) -> Result<OrderOutcome, OrderIntakeError> {
        if order.status.is_cancelled() {
            debug!("📥️ Order {} is cancelled. Ignoring it.", order.order_id);
            return Ok(OrderOutcome::Cancelled);
        }
        let items = self.source.order_items(&order.order_id).await?;
        let record = build_order_record(order, &items)?;
        match self.store.insert_if_absent(record).await? {
            InsertOrderResult::Inserted(id) => {
                info!("📥️ New order {id} recorded");
                Ok(OrderOutcome::Inserted)
            },
            InsertOrderResult::AlreadyExists(id) => {
                debug!("📥️ Order {id} was already recorded. Skipping insert.");
                Ok(OrderOutcome::AlreadyRecorded)
            },
        }
    }
}

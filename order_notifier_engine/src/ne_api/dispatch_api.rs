use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::RecordStore,
    db_types::ChangeEvent,
    ne_api::order_objects::DispatchSummary,
    traits::NotificationSink,
    validation::NotificationPayload,
};

/// `DispatchApi` turns record creations from the change feed into notifications.
///
/// For each creation entry the notification status goes through exactly one transition: `Pending -> Notified` when
/// the sink accepts the message, or `Pending -> Failed` when it does not. Failed notifications are not retried.
///
/// Change feed delivery is at-least-once, so the same creation entry can arrive more than once. Before sending, the
/// current record is checked, and if a flag is already set the entry is skipped. A redelivery that races ahead of
/// the first delivery's write-back can still produce a second message; that is accepted.
pub struct DispatchApi<R, N> {
    store: R,
    sink: N,
}

impl<R, N> Debug for DispatchApi<R, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DispatchApi")
    }
}

impl<R, N> DispatchApi<R, N> {
    pub fn new(store: R, sink: N) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }
}

impl<R, N> DispatchApi<R, N>
where
    R: RecordStore,
    N: NotificationSink,
{
    /// Processes a batch of change feed entries in order. Only creation entries are acted on; updates (including the
    /// flag write-backs made here) and removals are ignored. A failure on one entry never stops the rest of the batch.
    pub async fn dispatch_batch(&self, events: &[ChangeEvent]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for event in events {
            if !event.is_insert() {
                trace!("📨️ Ignoring {} entry #{} for order {}", event.event_type, event.sequence, event.order_id);
                summary.ignored += 1;
                continue;
            }
            self.dispatch_creation(event, &mut summary).await;
        }
        if summary.attempts() > 0 || summary.errors > 0 {
            info!("📨️ Batch of {} entries dispatched. {summary}", events.len());
        }
        summary
    }

    async fn dispatch_creation(&self, event: &ChangeEvent, summary: &mut DispatchSummary) {
        let payload = match NotificationPayload::try_from(event) {
            Ok(p) => p,
            Err(e) => {
                error!("📨️ Cannot dispatch entry #{}. {e}", event.sequence);
                summary.errors += 1;
                return;
            },
        };
        info!("📨️ Got a new order! {payload}");
        match self.store.fetch_order(&payload.order_id).await {
            Ok(Some(record)) if record.is_handled() => {
                info!(
                    "📨️ Order {} is already {}. Entry #{} is a redelivery and will not be sent again.",
                    payload.order_id,
                    record.notification_status(),
                    event.sequence
                );
                summary.already_handled += 1;
                return;
            },
            Ok(Some(_)) => {},
            Ok(None) => {
                warn!("📨️ Order {} is no longer stored. Notifying from the feed image.", payload.order_id);
            },
            Err(e) => {
                warn!("📨️ Could not check the flags for order {}. Notifying anyway. {e}", payload.order_id);
            },
        }
        match self.sink.send_message(&payload.message()).await {
            Ok(()) => {
                info!("📨️ Notification for order {} was delivered", payload.order_id);
                summary.notified += 1;
                if let Err(e) = self.store.mark_notified(&payload.order_id).await {
                    error!("📨️ Order {} was notified, but the flag could not be saved. {e}", payload.order_id);
                    summary.errors += 1;
                }
            },
            Err(e) => {
                error!("📨️ Notification for order {} failed. {e}", payload.order_id);
                summary.failed += 1;
                if let Err(e) = self.store.mark_failed(&payload.order_id).await {
                    error!("📨️ Could not flag order {} as failed. {e}", payload.order_id);
                    summary.errors += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        db_types::{ChangeType, OrderId},
        test_utils::{
            doubles::{source_items, source_order, RecordingSink},
            prepare_env::{new_test_database, tear_down},
        },
        validation::build_order_record,
        ChangeFeed,
        SqliteDatabase,
    };

    async fn record_order(db: &SqliteDatabase, order_id: &str, asin: &str, qty: u32) {
        let record = build_order_record(&source_order(order_id, "Unshipped"), &source_items(&[(asin, qty)])).unwrap();
        assert!(db.insert_if_absent(record).await.unwrap().was_inserted());
    }

    #[tokio::test]
    async fn only_creations_are_sent() {
        let db = new_test_database().await;
        record_order(&db, "A1", "B2", 3).await;
        record_order(&db, "A2", "B7", 1).await;
        let changes = db.fetch_changes(0, 10).await.unwrap();
        assert_eq!(changes.len(), 2);
        let mut update = changes[0].clone();
        update.event_type = ChangeType::Modify;
        let batch = vec![changes[0].clone(), update, changes[1].clone()];

        let sink = RecordingSink::new();
        let api = DispatchApi::new(db.clone(), sink.clone());
        let summary = api.dispatch_batch(&batch).await;
        assert_eq!(summary.attempts(), 2);
        assert_eq!(summary.ignored, 1);
        assert_eq!(sink.messages(), vec!["New order for 3 x B2 (A1)", "New order for 1 x B7 (A2)"]);
        tear_down(db).await;
    }

    #[tokio::test]
    async fn accepted_message_sets_notified() {
        let db = new_test_database().await;
        record_order(&db, "A1", "B2", 3).await;
        let changes = db.fetch_changes(0, 10).await.unwrap();
        let api = DispatchApi::new(db.clone(), RecordingSink::new());
        let summary = api.dispatch_batch(&changes).await;
        assert_eq!(summary.notified, 1);
        assert_eq!(summary.errors, 0);
        let record = db.fetch_order(&OrderId::new("A1")).await.unwrap().unwrap();
        assert!(record.notified);
        assert!(!record.failed);
        tear_down(db).await;
    }

    #[tokio::test]
    async fn rejected_message_sets_failed() {
        let db = new_test_database().await;
        record_order(&db, "A1", "B2", 3).await;
        let changes = db.fetch_changes(0, 10).await.unwrap();
        let sink = RecordingSink::new();
        sink.reject_with(500);
        let api = DispatchApi::new(db.clone(), sink.clone());
        let summary = api.dispatch_batch(&changes).await;
        assert_eq!(summary.failed, 1);
        assert_eq!(sink.attempts(), 1);
        let record = db.fetch_order(&OrderId::new("A1")).await.unwrap().unwrap();
        assert!(!record.notified);
        assert!(record.failed);
        let failed = db.fetch_failed_orders().await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].order_id, OrderId::new("A1"));
        tear_down(db).await;
    }

    #[tokio::test]
    async fn unreachable_sink_sets_failed() {
        let db = new_test_database().await;
        record_order(&db, "A1", "B2", 3).await;
        let changes = db.fetch_changes(0, 10).await.unwrap();
        let sink = RecordingSink::new();
        sink.fail_transport();
        let api = DispatchApi::new(db.clone(), sink.clone());
        let summary = api.dispatch_batch(&changes).await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.notified, 0);
        assert_eq!(summary.errors, 0);
        assert_eq!(sink.attempts(), 1);
        let record = db.fetch_order(&OrderId::new("A1")).await.unwrap().unwrap();
        assert!(!record.notified);
        assert!(record.failed);
        tear_down(db).await;
    }

    #[tokio::test]
    async fn redelivery_is_not_sent_again() {
        let db = new_test_database().await;
        record_order(&db, "A1", "B2", 3).await;
        let creation = db.fetch_changes(0, 10).await.unwrap();
        let sink = RecordingSink::new();
        let api = DispatchApi::new(db.clone(), sink.clone());
        api.dispatch_batch(&creation).await;
        let summary = api.dispatch_batch(&creation).await;
        assert_eq!(summary.already_handled, 1);
        assert_eq!(summary.attempts(), 0);
        assert_eq!(sink.attempts(), 1);
        tear_down(db).await;
    }

    #[tokio::test]
    async fn write_backs_are_ignored_by_the_next_batch() {
        let db = new_test_database().await;
        record_order(&db, "A1", "B2", 3).await;
        let first = db.fetch_changes(0, 10).await.unwrap();
        let sink = RecordingSink::new();
        let api = DispatchApi::new(db.clone(), sink.clone());
        api.dispatch_batch(&first).await;
        let next = db.fetch_changes(first[0].sequence, 10).await.unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].event_type, ChangeType::Modify);
        let summary = api.dispatch_batch(&next).await;
        assert_eq!(summary.ignored, 1);
        assert_eq!(sink.attempts(), 1);
        tear_down(db).await;
    }

    #[tokio::test]
    async fn bad_entries_do_not_stop_the_batch() {
        let db = new_test_database().await;
        record_order(&db, "A1", "B2", 3).await;
        let mut changes = db.fetch_changes(0, 10).await.unwrap();
        let mut no_image = changes[0].clone();
        no_image.new_image = None;
        let mut vanished = changes[0].clone();
        vanished.order_id = OrderId::new("Z9");
        if let Some(image) = vanished.new_image.as_mut() {
            image.order_id = OrderId::new("Z9");
        }
        changes.insert(0, vanished);
        changes.insert(0, no_image);

        let sink = RecordingSink::new();
        let api = DispatchApi::new(db.clone(), sink.clone());
        let summary = api.dispatch_batch(&changes).await;
        // The missing image is an error, and Z9 is sent but cannot be flagged
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.notified, 2);
        assert_eq!(sink.messages(), vec!["New order for 3 x B2 (Z9)", "New order for 3 x B2 (A1)"]);
        assert!(db.fetch_order(&OrderId::new("A1")).await.unwrap().unwrap().notified);
        tear_down(db).await;
    }
}

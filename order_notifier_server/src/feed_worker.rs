use log::*;
use order_notifier_engine::{
    ChangeFeed,
    DispatchApi,
    DispatchSummary,
    NotificationSink,
    RecordStore,
    RecordStoreError,
    SqliteDatabase,
};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{config::FeedConfig, integrations::slack::SlackWebhook};

/// The name the dispatcher's change feed cursor is stored under.
pub const FEED_CONSUMER: &str = "notification_dispatcher";

/// Starts the change feed worker. Do not await the returned JoinHandle, as it will run indefinitely.
pub fn start_feed_worker(db: SqliteDatabase, sink: SlackWebhook, config: FeedConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(config.poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let api = DispatchApi::new(db.clone(), sink);
        info!("🕰️ Change feed worker started");
        loop {
            timer.tick().await;
            match drain_feed(&db, &api, config.batch_size).await {
                Ok(summary) if summary.attempts() > 0 => info!("🕰️ Change feed processed. {summary}"),
                Ok(_) => trace!("🕰️ No new orders on the change feed"),
                Err(e) => error!("🕰️ Could not process the change feed. It will be retried on the next tick. {e}"),
            }
        }
    })
}

/// Hands change feed entries to the dispatcher, batch by batch, until the feed is drained.
///
/// The cursor is saved after each batch has been dispatched. If the process stops in between, the batch is
/// delivered again on restart, and the dispatcher's flag check absorbs the repeat.
pub async fn drain_feed<F, R, N>(
    feed: &F,
    api: &DispatchApi<R, N>,
    batch_size: u32,
) -> Result<DispatchSummary, RecordStoreError>
where
    F: ChangeFeed,
    R: RecordStore,
    N: NotificationSink,
{
    let mut cursor = feed.load_cursor(FEED_CONSUMER).await?;
    let mut total = DispatchSummary::default();
    loop {
        let batch = feed.fetch_changes(cursor, batch_size).await?;
        let Some(last) = batch.last().map(|e| e.sequence) else {
            break;
        };
        debug!("🕰️ Dispatching change feed entries #{} to #{last}", batch[0].sequence);
        let summary = api.dispatch_batch(&batch).await;
        total.notified += summary.notified;
        total.failed += summary.failed;
        total.ignored += summary.ignored;
        total.already_handled += summary.already_handled;
        total.errors += summary.errors;
        feed.save_cursor(FEED_CONSUMER, last).await?;
        cursor = last;
        if batch.len() < batch_size as usize {
            break;
        }
    }
    Ok(total)
}

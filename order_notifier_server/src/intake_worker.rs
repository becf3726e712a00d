use chrono::Utc;
use log::*;
use order_notifier_engine::{IntakeApi, SqliteDatabase};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{config::IntakeConfig, integrations::mws::MwsOrderSource};

/// Starts the intake worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Runs are sequential, so a slow run delays the next tick rather than overlapping with it.
pub fn start_intake_worker(
    source: MwsOrderSource,
    db: SqliteDatabase,
    config: IntakeConfig,
    marketplace_ids: Vec<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(config.poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let api = IntakeApi::new(source, db);
        info!("🕰️ Order intake worker started");
        loop {
            timer.tick().await;
            if marketplace_ids.is_empty() {
                warn!("🕰️ No marketplaces are configured. Skipping the intake job.");
                continue;
            }
            let cutoff = config.cutoff(Utc::now());
            info!("🕰️ Running intake job for orders updated since {cutoff}");
            match api.run_intake(cutoff, &marketplace_ids).await {
                Ok(summary) => info!("🕰️ Intake job complete. {summary}"),
                Err(e) => error!("🕰️ Intake job abandoned. It will be retried on the next tick. {e}"),
            }
        }
    })
}

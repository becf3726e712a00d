use chrono::{DateTime, TimeZone, Utc};
use cucumber::World;
use log::*;
use order_notifier_engine::{
    test_utils::{
        doubles::{MemoryOrderSource, RecordingSink},
        prepare_env::{create_database, random_db_path, run_migrations},
    },
    ChangeFeed,
    DispatchApi,
    DispatchSummary,
    IntakeApi,
    IntakeError,
    IntakeSummary,
    SqliteDatabase,
};

pub const CONSUMER: &str = "cucumber";
pub const MARKETPLACE: &str = "ATVPDKIKX0DER";

#[derive(Default, Debug, World)]
pub struct NotifierWorld {
    pub system: Option<NotifierSystem>,
}

#[derive(Debug)]
pub struct NotifierSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub source: MemoryOrderSource,
    pub sink: RecordingSink,
    pub last_intake: Option<Result<IntakeSummary, IntakeError>>,
    pub last_dispatch: DispatchSummary,
}

impl NotifierWorld {
    pub fn system(&mut self) -> &mut NotifierSystem {
        self.system.as_mut().expect("System not initialised")
    }
}

impl NotifierSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        Self {
            db_path: url,
            db,
            source: MemoryOrderSource::new(),
            sink: RecordingSink::new(),
            last_intake: None,
            last_dispatch: DispatchSummary::default(),
        }
    }

    pub fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    pub async fn run_intake(&mut self) {
        let api = IntakeApi::new(self.source.clone(), self.db.clone());
        let result = api.run_intake(Self::cutoff(), &[MARKETPLACE.to_string()]).await;
        self.last_intake = Some(result);
    }

    /// Reads the change feed from the saved cursor until it is drained, the way the feed worker does.
    pub async fn drain_feed(&mut self) {
        let api = DispatchApi::new(self.db.clone(), self.sink.clone());
        let mut cursor = self.db.load_cursor(CONSUMER).await.expect("Error loading cursor");
        let mut total = DispatchSummary::default();
        loop {
            let batch = self.db.fetch_changes(cursor, 2).await.expect("Error reading change feed");
            let Some(last) = batch.last() else { break };
            let last = last.sequence;
            let summary = api.dispatch_batch(&batch).await;
            total.notified += summary.notified;
            total.failed += summary.failed;
            total.ignored += summary.ignored;
            total.already_handled += summary.already_handled;
            total.errors += summary.errors;
            self.db.save_cursor(CONSUMER, last).await.expect("Error saving cursor");
            cursor = last;
        }
        self.last_dispatch = total;
    }

    /// Dispatches every feed entry again from the beginning, without touching the saved cursor.
    pub async fn replay_feed(&mut self) {
        let api = DispatchApi::new(self.db.clone(), self.sink.clone());
        let batch = self.db.fetch_changes(0, 1000).await.expect("Error reading change feed");
        self.last_dispatch = api.dispatch_batch(&batch).await;
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}

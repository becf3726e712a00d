//! Server configuration
//!
//! Everything is read from environment variables (a `.env` file is loaded first, if present). Missing or invalid
//! values are logged and replaced with their defaults, so the server always starts; run the binary with any
//! argument to see the full list of variables.
use std::{env, fmt::Display, str::FromStr, time::Duration};

use chrono::{DateTime, NaiveTime, Utc};
use log::*;
use mon_common::Secret;
use mws_tools::MwsConfig;
use order_notifier_engine::helpers::lookback_cutoff;

const DEFAULT_MON_HOST: &str = "127.0.0.1";
const DEFAULT_MON_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/order_notifier.db";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 900;
const DEFAULT_LOOKBACK_HOURS: i64 = 24;
const DEFAULT_FEED_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_FEED_BATCH_SIZE: u32 = 100;

#[derive(Clone, Debug)]
pub struct NotifierConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The incoming webhook that notification messages are posted to
    pub webhook_url: Secret<String>,
    pub intake: IntakeConfig,
    pub feed: FeedConfig,
    /// Marketplace credentials and the marketplaces to poll
    pub mws: MwsConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Time between intake runs
    pub poll_interval: Duration,
    /// How far back each intake run looks for updated orders
    pub lookback: chrono::Duration,
    /// The UTC time of day that the lookback window is aligned to
    pub cutoff_time: NaiveTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedConfig {
    /// Time between change feed reads when the feed has been drained
    pub poll_interval: Duration,
    /// Maximum number of change feed entries handed to the dispatcher at once
    pub batch_size: u32,
}

fn default_cutoff_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            lookback: chrono::Duration::hours(DEFAULT_LOOKBACK_HOURS),
            cutoff_time: default_cutoff_time(),
        }
    }
}

impl IntakeConfig {
    /// The "updated since" bound for an intake run starting at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        lookback_cutoff(now, self.lookback, self.cutoff_time)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_FEED_POLL_INTERVAL_SECS),
            batch_size: DEFAULT_FEED_BATCH_SIZE,
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MON_HOST.to_string(),
            port: DEFAULT_MON_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            webhook_url: Secret::default(),
            intake: IntakeConfig::default(),
            feed: FeedConfig::default(),
            mws: MwsConfig::default(),
        }
    }
}

impl NotifierConfig {
    pub fn from_env_or_default() -> Self {
        let mut config = Self::from_vars(|name| env::var(name).ok());
        config.mws = MwsConfig::new_from_env_or_default();
        config
    }

    /// Builds the configuration from `lookup`, which returns the value of a variable if it is set. The marketplace
    /// settings are left at their defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let host = lookup("MON_HOST").unwrap_or_else(|| DEFAULT_MON_HOST.into());
        let port = parse_or_default(&lookup, "MON_PORT", DEFAULT_MON_PORT);
        let database_url = lookup("MON_DATABASE_URL").unwrap_or_else(|| {
            warn!("🪛️ MON_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let webhook_url = lookup("MON_WEBHOOK_URL").filter(|s| !s.trim().is_empty()).unwrap_or_else(|| {
            error!("🪛️ MON_WEBHOOK_URL is not set. The server will not start until it is configured.");
            String::default()
        });
        let poll_secs = positive_or_default(&lookup, "MON_POLL_INTERVAL", DEFAULT_POLL_INTERVAL_SECS);
        let lookback_hours = positive_or_default(&lookup, "MON_LOOKBACK_HOURS", DEFAULT_LOOKBACK_HOURS);
        let cutoff_time = lookup("MON_CUTOFF_TIME")
            .and_then(|s| {
                s.parse::<NaiveTime>()
                    .map_err(|e| error!("🪛️ {s} is not a valid value for MON_CUTOFF_TIME. {e} Using 08:00:00."))
                    .ok()
            })
            .unwrap_or_else(default_cutoff_time);
        let intake = IntakeConfig {
            poll_interval: Duration::from_secs(poll_secs),
            lookback: chrono::Duration::hours(lookback_hours),
            cutoff_time,
        };
        let feed_secs = positive_or_default(&lookup, "MON_FEED_POLL_INTERVAL", DEFAULT_FEED_POLL_INTERVAL_SECS);
        let batch_size = positive_or_default(&lookup, "MON_FEED_BATCH_SIZE", DEFAULT_FEED_BATCH_SIZE);
        let feed = FeedConfig { poll_interval: Duration::from_secs(feed_secs), batch_size };
        Self {
            host,
            port,
            database_url,
            webhook_url: Secret::new(webhook_url),
            intake,
            feed,
            mws: MwsConfig::default(),
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display + Copy,
    T::Err: Display,
{
    match lookup(name) {
        Some(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        None => default,
    }
}

fn positive_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display + Copy + PartialOrd + Default,
    T::Err: Display,
{
    let value = parse_or_default(lookup, name, default);
    if value > T::default() {
        value
    } else {
        error!("🪛️ {name} must be greater than zero. Using the default, {default}, instead.");
        default
    }
}

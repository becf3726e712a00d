use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Works out the "updated since" bound for an intake run.
///
/// The bound is `now - lookback`, moved back to `time_of_day` (UTC) on the same date. If `time_of_day` is later in
/// the day than `now - lookback`, the previous day is used, so the window is never shorter than `lookback`. With the
/// defaults (24 hours, 08:00) the window is between 24 and 48 hours long. Orders seen in more than one window are
/// deduplicated by the store, so overlap only costs some redundant work.
pub fn lookback_cutoff(now: DateTime<Utc>, lookback: Duration, time_of_day: NaiveTime) -> DateTime<Utc> {
    let start = now - lookback;
    let cutoff = start.date_naive().and_time(time_of_day).and_utc();
    if cutoff > start {
        cutoff - Duration::days(1)
    } else {
        cutoff
    }
}

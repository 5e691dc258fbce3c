//! Daily trigger.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{error, info};

use crate::handler::ChapterJob;

/// Next firing of a daily schedule at `hour_utc`:00, strictly after `now`.
pub fn next_daily_run(now: DateTime<Utc>, hour_utc: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour_utc, 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive().and_time(time).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Firing after `previous`: one day later, unless the clock has already
/// moved past that (e.g. after a suspend), in which case the next slot
/// after `now`.
pub fn following_run(
    previous: DateTime<Utc>,
    now: DateTime<Utc>,
    hour_utc: u32,
) -> DateTime<Utc> {
    let candidate = previous + Duration::days(1);
    if candidate > now {
        candidate
    } else {
        next_daily_run(now, hour_utc)
    }
}

/// Fires the job once a day.
///
/// Each firing spawns an independent run; a run still in flight does not
/// delay or suppress the next one.
pub struct DailyScheduler {
    job: Arc<ChapterJob>,
    hour_utc: u32,
}

impl DailyScheduler {
    pub fn new(job: Arc<ChapterJob>, hour_utc: u32) -> Self {
        Self { job, hour_utc }
    }

    /// Loop forever, sleeping until each firing.
    pub async fn run(self) {
        let mut next = next_daily_run(Utc::now(), self.hour_utc);
        loop {
            info!(next_run = %next.to_rfc3339(), "Next scheduled run");

            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            let job = Arc::clone(&self.job);
            tokio::spawn(async move {
                let response = job.handle().await;
                if response.is_success() {
                    info!("Scheduled run finished");
                } else {
                    error!(
                        error = response.error.as_deref().unwrap_or("unknown"),
                        "Scheduled run failed"
                    );
                }
            });

            // Advance from the slot just fired, not from the wall clock,
            // which may read slightly before `next` after the sleep.
            next = following_run(next, Utc::now(), self.hour_utc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_midnight_schedule_fires_next_day() {
        assert_eq!(
            next_daily_run(at(2024, 3, 10, 15, 30, 0), 0),
            at(2024, 3, 11, 0, 0, 0)
        );
    }

    #[test]
    fn test_later_hour_fires_same_day() {
        assert_eq!(
            next_daily_run(at(2024, 3, 10, 5, 59, 59), 6),
            at(2024, 3, 10, 6, 0, 0)
        );
    }

    #[test]
    fn test_exact_firing_time_moves_to_next_day() {
        assert_eq!(
            next_daily_run(at(2024, 3, 10, 0, 0, 0), 0),
            at(2024, 3, 11, 0, 0, 0)
        );
    }

    #[test]
    fn test_rolls_over_month_and_year() {
        assert_eq!(
            next_daily_run(at(2024, 12, 31, 23, 0, 0), 0),
            at(2025, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            next_daily_run(at(2024, 2, 28, 12, 0, 0), 3),
            at(2024, 2, 29, 3, 0, 0)
        );
    }

    #[test]
    fn test_early_wakeup_does_not_refire_same_slot() {
        let fired = at(2024, 3, 11, 0, 0, 0);
        let woke_early = at(2024, 3, 10, 23, 59, 59);

        assert_eq!(next_daily_run(woke_early, 0), fired);
        assert_eq!(following_run(fired, woke_early, 0), at(2024, 3, 12, 0, 0, 0));
    }

    #[test]
    fn test_following_run_skips_missed_days() {
        let fired = at(2024, 3, 11, 6, 0, 0);
        let after_suspend = at(2024, 3, 14, 9, 0, 0);

        assert_eq!(
            following_run(fired, after_suspend, 6),
            at(2024, 3, 15, 6, 0, 0)
        );
    }

    #[test]
    fn test_invalid_hour_falls_back_to_midnight() {
        assert_eq!(
            next_daily_run(at(2024, 3, 10, 15, 0, 0), 30),
            at(2024, 3, 11, 0, 0, 0)
        );
    }
}

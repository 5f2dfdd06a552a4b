use arc_swap::ArcSwap;
use chrono::{DateTime, Days, Local, LocalResult, NaiveDate, TimeZone, Utc};
use std::fmt::Debug;
use std::sync::Arc;

/// Source of "now" for timestamps and for deciding which calendar day is today
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;

    /// The local calendar day containing `now()`
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: ArcSwap<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock {
            now: ArcSwap::from_pointee(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.store(Arc::new(now));
    }

    pub fn advance(&self, by: chrono::Duration) {
        let next = **self.now.load() + by;
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        **self.now.load()
    }
}

///
/// Half-open window `[start, end)` covering one local calendar day, in UTC.
///
/// Midnight may not exist locally when a DST transition lands on it,
/// in which case the earliest valid instant of that day is used.
///
pub fn local_day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
    (start_of_local_day(day), start_of_local_day(next))
}

///
/// The same local wall-clock time one calendar day later.
///
/// Crosses DST transitions by calendar day rather than by 24 hours. A wall-clock time that does
/// not exist on the next day falls back to 24 hours later.
///
pub fn next_local_day(at: DateTime<Utc>) -> DateTime<Utc> {
    let local = at.with_timezone(&Local).naive_local();

    local
        .checked_add_days(Days::new(1))
        .and_then(|next| Local.from_local_datetime(&next).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| at + chrono::Duration::days(1))
}

fn start_of_local_day(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();

    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Skipped midnight: fall back to the first instant an hour later
        LocalResult::None => Local
            .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_moves_on_demand() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);

        assert_eq!(clock.now(), start);

        clock.advance(chrono::Duration::days(1));
        assert_eq!(clock.now(), start + chrono::Duration::days(1));
    }

    #[test]
    fn next_local_day_keeps_wall_clock_time() {
        for (month, day) in [(3, 1), (3, 30), (6, 12), (10, 26), (12, 31)] {
            let start = Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap();
            let next = next_local_day(start).with_timezone(&Local);
            let start = start.with_timezone(&Local);

            assert_eq!(
                next.date_naive(),
                start.date_naive().checked_add_days(Days::new(1)).unwrap()
            );
            assert_eq!(next.time(), start.time());
        }
    }

    #[test]
    fn local_day_is_a_half_open_day_long_window() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let (start, end) = local_day_bounds(day);

        assert!(start < end);
        assert_eq!(start.with_timezone(&Local).date_naive(), day);
        assert_eq!(
            end.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2024, 6, 13).unwrap()
        );
    }
}

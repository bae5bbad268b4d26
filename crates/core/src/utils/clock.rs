//! Source of "today" and "now" for the tracking engine.
//!
//! Toggling is only allowed for the current day, so every operation that
//! depends on the calendar reads it through a [`Clock`] once per invocation.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};

/// One reading of the clock: the calendar day and the instant taken together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

pub trait Clock: Send + Sync {
    /// Reads the clock once.
    fn snapshot(&self) -> ClockSnapshot;

    /// The process-wide current calendar day.
    fn today(&self) -> NaiveDate {
        self.snapshot().today
    }

    /// The current instant, used for completion and creation timestamps.
    fn now(&self) -> DateTime<Utc> {
        self.snapshot().now
    }
}

/// Wall-clock time: local calendar day, UTC instants.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn snapshot(&self) -> ClockSnapshot {
        let local = Local::now();
        ClockSnapshot {
            today: local.date_naive(),
            now: local.with_timezone(&Utc),
        }
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    /// Noon UTC on `date`, so that `today()` is `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(Self::noon()).and_utc())
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.write().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.set(date.and_time(Self::noon()).and_utc());
    }

    pub fn advance_days(&self, days: i64) {
        let mut guard = self.instant.write().unwrap_or_else(|e| e.into_inner());
        *guard += Duration::days(days);
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time of day")
    }
}

impl Clock for FixedClock {
    fn snapshot(&self) -> ClockSnapshot {
        let now = *self.instant.read().unwrap_or_else(|e| e.into_inner());
        ClockSnapshot {
            today: now.date_naive(),
            now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_reports_the_given_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let clock = FixedClock::at_date(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        clock.set_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_snapshot_day_matches_its_instant() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap());
        let reading = clock.snapshot();
        assert_eq!(reading.today, reading.now.date_naive());
        assert_eq!(reading.today, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        let system = SystemClock.snapshot();
        assert_eq!(
            system.today,
            system.now.with_timezone(&Local).date_naive()
        );
    }
}

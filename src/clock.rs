use chrono::{DateTime, Local, NaiveDate};

/// Source of wall-clock time. All durations are derived by subtracting two
/// readings of this clock.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Calendar date of `now()` in local time
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Whole seconds elapsed between two instants, floored and never negative
pub fn whole_seconds_between(start: DateTime<Local>, end: DateTime<Local>) -> u64 {
    end.signed_duration_since(start).num_seconds().max(0) as u64
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::Clock;
    use chrono::{DateTime, Duration, Local, TimeZone};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Rc<Cell<DateTime<Local>>>,
    }

    impl ManualClock {
        pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
            let start = Local
                .with_ymd_and_hms(year, month, day, hour, min, sec)
                .earliest()
                .expect("valid local time");
            Self {
                now: Rc::new(Cell::new(start)),
            }
        }

        pub fn advance_secs(&self, secs: i64) {
            self.now.set(self.now.get() + Duration::seconds(secs));
        }

        pub fn advance_days(&self, days: i64) {
            self.now.set(self.now.get() + Duration::days(days));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            self.now.get()
        }
    }
}

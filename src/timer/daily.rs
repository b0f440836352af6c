use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day counters and the activity streak
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStats {
    pub completed_today: u32,
    /// Hours logged today
    pub total_time_today: f64,
    pub streak_days: u32,
    pub last_active_date: Option<NaiveDate>,
}

impl DailyStats {
    /// Start a new day when `last_active_date` is not `today`.
    ///
    /// The streak grows when the last active day was yesterday and restarts
    /// at 1 after a gap. A first-ever rollover leaves it untouched.
    pub fn roll_day(&mut self, today: NaiveDate) -> bool {
        if self.last_active_date == Some(today) {
            return false;
        }

        if let Some(last) = self.last_active_date {
            let yesterday = today.pred_opt();
            if Some(last) == yesterday {
                self.streak_days += 1;
            } else if Some(last) < yesterday {
                self.streak_days = 1;
            }
        }

        self.completed_today = 0;
        self.total_time_today = 0.0;
        self.last_active_date = Some(today);
        true
    }

    /// Roll the day if needed, then take the recount of tasks completed today
    pub fn refresh(&mut self, today: NaiveDate, completed_today: u32) {
        self.roll_day(today);
        self.completed_today = completed_today;
    }

    pub fn add_hours(&mut self, hours: f64) {
        self.total_time_today += hours;
    }
}

/// Remembers the last date the day-change check saw
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DayChangeDetector {
    pub last_checked_date: Option<NaiveDate>,
}

impl DayChangeDetector {
    /// Record `today`; returns true when it differs from a previously seen date
    pub fn observe(&mut self, today: NaiveDate) -> bool {
        let changed = matches!(self.last_checked_date, Some(last) if last != today);
        self.last_checked_date = Some(today);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    #[test]
    fn test_streak_grows_on_consecutive_days() {
        let mut stats = DailyStats {
            streak_days: 3,
            last_active_date: Some(date(9)),
            completed_today: 4,
            total_time_today: 2.5,
        };
        assert!(stats.roll_day(date(10)));
        assert_eq!(
            stats,
            DailyStats {
                streak_days: 4,
                last_active_date: Some(date(10)),
                completed_today: 0,
                total_time_today: 0.0,
            }
        );
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let mut stats = DailyStats {
            streak_days: 7,
            last_active_date: Some(date(5)),
            ..Default::default()
        };
        stats.roll_day(date(10));
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn test_first_rollover_keeps_streak() {
        let mut stats = DailyStats::default();
        stats.roll_day(date(10));
        assert_eq!(stats.streak_days, 0);
        assert_eq!(stats.last_active_date, Some(date(10)));
    }

    #[test]
    fn test_same_day_is_noop() {
        let mut stats = DailyStats {
            last_active_date: Some(date(10)),
            total_time_today: 1.0,
            ..Default::default()
        };
        assert!(!stats.roll_day(date(10)));
        assert_eq!(stats.total_time_today, 1.0);
    }

    #[test]
    fn test_refresh_takes_recount() {
        let mut stats = DailyStats::default();
        stats.refresh(date(10), 5);
        assert_eq!(stats.completed_today, 5);
    }

    #[test]
    fn test_detector_first_observation_is_not_a_change() {
        let mut detector = DayChangeDetector::default();
        assert!(!detector.observe(date(10)));
        assert!(!detector.observe(date(10)));
        assert!(detector.observe(date(11)));
        assert_eq!(detector.last_checked_date, Some(date(11)));
    }
}

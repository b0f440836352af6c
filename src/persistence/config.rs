use super::files::{atomic_write, read_file};
use crate::history::DEFAULT_MAX_HISTORY;
use crate::timer::PomodoroSettings;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Focus sessions longer than this (seconds) trigger a completion notification
pub const DEFAULT_FOCUS_NOTIFY_SECS: u64 = 360;

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Work phase length in minutes
    pub work_minutes: u64,
    pub short_break_minutes: u64,
    pub long_break_minutes: u64,
    pub rounds_before_long_break: u32,
    pub max_history_size: usize,
    pub notifications: bool,
    /// Minimum focus session length in seconds that earns a notification
    pub focus_notify_after_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let pomodoro = PomodoroSettings::default();
        Self {
            work_minutes: pomodoro.work_duration / 60,
            short_break_minutes: pomodoro.short_break_duration / 60,
            long_break_minutes: pomodoro.long_break_duration / 60,
            rounds_before_long_break: pomodoro.rounds_before_long_break,
            max_history_size: DEFAULT_MAX_HISTORY,
            notifications: true,
            focus_notify_after_secs: DEFAULT_FOCUS_NOTIFY_SECS,
        }
    }
}

impl Settings {
    /// Pomodoro durations in seconds. Zero values fall back to defaults.
    pub fn pomodoro(&self) -> PomodoroSettings {
        let defaults = PomodoroSettings::default();
        let secs = |minutes: u64, fallback: u64| if minutes == 0 { fallback } else { minutes * 60 };
        PomodoroSettings {
            work_duration: secs(self.work_minutes, defaults.work_duration),
            short_break_duration: secs(self.short_break_minutes, defaults.short_break_duration),
            long_break_duration: secs(self.long_break_minutes, defaults.long_break_duration),
            rounds_before_long_break: if self.rounds_before_long_break == 0 {
                defaults.rounds_before_long_break
            } else {
                self.rounds_before_long_break
            },
        }
    }

    /// History cap, never below one entry
    pub fn history_cap(&self) -> usize {
        self.max_history_size.max(1)
    }
}

/// Load settings. A missing file gives defaults; a corrupt one gives defaults and a warning.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Settings {
    let path = path.as_ref();
    let content = match read_file(path) {
        Ok(Some(content)) => content,
        Ok(None) => return Settings::default(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read settings, using defaults");
            return Settings::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "settings file is corrupt, using defaults");
            Settings::default()
        }
    }
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let settings = load_settings(temp_dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pomodoro(), PomodoroSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"work_minutes": 50, "notifications": false}"#).unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.work_minutes, 50);
        assert!(!settings.notifications);
        assert_eq!(settings.pomodoro().work_duration, 3000);
        assert_eq!(settings.pomodoro().short_break_duration, 300);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        let settings = Settings {
            rounds_before_long_break: 3,
            max_history_size: 10,
            ..Default::default()
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn test_zero_values_fall_back() {
        let settings = Settings {
            work_minutes: 0,
            rounds_before_long_break: 0,
            max_history_size: 0,
            ..Default::default()
        };
        assert_eq!(settings.pomodoro().work_duration, 25 * 60);
        assert_eq!(settings.pomodoro().rounds_before_long_break, 4);
        assert_eq!(settings.history_cap(), 1);
    }
}

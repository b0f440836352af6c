/// Cross-platform notification support
/// Implements macOS (osascript) and Linux (notify-send); other platforms are a no-op

#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;

/// Presentation hints for a notification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyOptions {
    /// Play the platform's alert sound
    pub sound: bool,
}

impl NotifyOptions {
    pub fn with_sound() -> Self {
        Self { sound: true }
    }
}

/// Sink for user-facing notifications. Returns whether the notification was delivered.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str, options: &NotifyOptions) -> bool;
}

/// Sends desktop notifications through the platform's command-line tool
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str, options: &NotifyOptions) -> bool {
        if !self.enabled {
            return false;
        }

        let delivered = send_platform_notification(title, body, options);
        if !delivered {
            tracing::debug!(title, "desktop notification not delivered");
        }
        delivered
    }
}

#[cfg(target_os = "macos")]
fn send_platform_notification(title: &str, body: &str, options: &NotifyOptions) -> bool {
    let mut script = format!(
        r#"display notification "{}" with title "Stride - {}""#,
        escape_quotes(body),
        escape_quotes(title)
    );
    if options.sound {
        script.push_str(r#" sound name "Glass""#);
    }

    Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[cfg(target_os = "linux")]
fn send_platform_notification(title: &str, body: &str, options: &NotifyOptions) -> bool {
    let mut command = Command::new("notify-send");
    command.arg("--app-name=stride");
    if options.sound {
        command.arg("--hint=string:sound-name:message-new-instant");
    }

    command
        .arg(title)
        .arg(body)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn send_platform_notification(_title: &str, _body: &str, _options: &NotifyOptions) -> bool {
    // No-op on other platforms
    false
}

#[cfg(target_os = "macos")]
fn escape_quotes(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
pub use recording::RecordingNotifier;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_desktop_notifier_reports_not_delivered() {
        let notifier = DesktopNotifier::new(false);
        assert!(!notifier.notify("Title", "Body", &NotifyOptions::default()));
    }

    #[test]
    fn test_notify_options_sound_flag() {
        assert!(NotifyOptions::with_sound().sound);
        assert!(!NotifyOptions::default().sound);
    }

    #[test]
    fn test_recording_notifier_shares_log() {
        let notifier = RecordingNotifier::default();
        let handle = notifier.clone();
        handle.notify("Focus Session Complete!", "done", &NotifyOptions::with_sound());
        assert_eq!(notifier.titles(), vec!["Focus Session Complete!".to_string()]);
    }
}

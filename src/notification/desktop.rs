use notify_rust::{Notification, Timeout};

use super::*;

/// Shows toasts through the desktop notification daemon.
///
/// Action callbacks cannot be run from here since the daemon reports clicks
/// asynchronously; the action label is appended to the body instead.
pub struct DesktopNotifier {
    app_name: String,
    durations: Durations,
    next_id: u64,
}

impl DesktopNotifier {
    pub fn new(app_name: &str, durations: Durations) -> Self {
        DesktopNotifier {
            app_name: app_name.to_owned(),
            durations,
            next_id: 0,
        }
    }

    fn summary(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::Success => "Done",
            NotificationKind::Error => "Error",
            NotificationKind::Warning => "Warning",
            NotificationKind::Info | NotificationKind::Custom => "Info",
            NotificationKind::Loading => "Working",
        }
    }
}

impl Notifier for DesktopNotifier {
    fn enqueue(
        &mut self,
        kind: NotificationKind,
        message: &str,
        options: NotifyOptions,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);

        let timeout = match options.display_duration(kind, &self.durations) {
            Some(duration) => Timeout::Milliseconds(duration.as_millis().min(u32::MAX as u128) as u32),
            None => Timeout::Never,
        };

        let mut body = message.to_owned();
        if let Some(action) = &options.action {
            body += &format!(" [{}]", action.label);
        }

        let mut n = Notification::new();
        n.appname(&self.app_name)
            .summary(Self::summary(kind))
            .body(&body)
            .timeout(timeout);
        if let Some(icon) = &options.icon {
            n.icon(icon);
        }

        if let Err(e) = n.show() {
            log::warn!("Could not show desktop notification {}: {}", id, e);
        }
        id
    }
}

//! Toast notifications.
//!
//! Anything that can show a transient message implements [`Notifier`]. The
//! [`Toasts`] helper wraps a notifier with the typed shortcuts used across the
//! application, so callers never talk to a concrete backend directly.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::provider::Platform;

pub mod desktop;
pub mod queue;

pub use desktop::DesktopNotifier;
pub use queue::{Toast, ToastQueue};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
    Custom,
    Loading,
}

impl NotificationKind {
    /// `None` means the toast stays until dismissed.
    pub fn default_duration(&self) -> Option<Duration> {
        match self {
            NotificationKind::Success => Some(Duration::from_millis(3000)),
            NotificationKind::Error => Some(Duration::from_millis(5000)),
            NotificationKind::Warning => Some(Duration::from_millis(4000)),
            NotificationKind::Info => Some(Duration::from_millis(3000)),
            NotificationKind::Custom => Some(Duration::from_millis(4000)),
            NotificationKind::Loading => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            NotificationKind::Success => '✔',
            NotificationKind::Error => '✘',
            NotificationKind::Warning => '!',
            NotificationKind::Info => 'i',
            NotificationKind::Custom => '•',
            NotificationKind::Loading => '…',
        }
    }
}

/// Per-kind display durations in milliseconds, overriding the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Durations {
    pub success: Option<u64>,
    pub error: Option<u64>,
    pub warning: Option<u64>,
    pub info: Option<u64>,
    pub custom: Option<u64>,
}

impl Durations {
    pub fn of(&self, kind: NotificationKind) -> Option<Duration> {
        let configured = match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Error => self.error,
            NotificationKind::Warning => self.warning,
            NotificationKind::Info => self.info,
            NotificationKind::Custom => self.custom,
            NotificationKind::Loading => None,
        };

        configured
            .map(Duration::from_millis)
            .or_else(|| kind.default_duration())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn new(id: u64) -> Self {
        NotificationId(id)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct NotifyAction {
    pub label: String,
    callback: Box<dyn FnMut()>,
}

impl NotifyAction {
    pub fn new(label: &str, callback: impl FnMut() + 'static) -> Self {
        NotifyAction {
            label: label.to_owned(),
            callback: Box::new(callback),
        }
    }

    pub fn run(&mut self) {
        (self.callback)()
    }
}

impl fmt::Debug for NotifyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyAction")
            .field("label", &self.label)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct NotifyOptions {
    pub duration: Option<Duration>,
    pub persistent: bool,
    pub icon: Option<String>,
    pub action: Option<NotifyAction>,
}

impl NotifyOptions {
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_owned());
        self
    }

    pub fn action(mut self, action: NotifyAction) -> Self {
        self.action = Some(action);
        self
    }

    /// How long the toast stays visible given the configured kind durations.
    pub fn display_duration(&self, kind: NotificationKind, durations: &Durations) -> Option<Duration> {
        if self.persistent {
            None
        } else {
            self.duration.or_else(|| durations.of(kind))
        }
    }
}

pub trait Notifier {
    fn enqueue(
        &mut self,
        kind: NotificationKind,
        message: &str,
        options: NotifyOptions,
    ) -> NotificationId;

    fn dismiss(&mut self, _id: NotificationId) {}
}

/// Writes every toast to the log.
#[derive(Default)]
pub struct LogNotifier {
    next_id: u64,
}

impl Notifier for LogNotifier {
    fn enqueue(
        &mut self,
        kind: NotificationKind,
        message: &str,
        options: NotifyOptions,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        let action = options
            .action
            .as_ref()
            .map(|a| format!(" [{}]", a.label))
            .unwrap_or_default();

        match kind {
            NotificationKind::Error => log::error!("{} {}{}", id, message, action),
            NotificationKind::Warning => log::warn!("{} {}{}", id, message, action),
            _ => log::info!("{} {}{}", id, message, action),
        }
        id
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn enqueue(
        &mut self,
        kind: NotificationKind,
        message: &str,
        options: NotifyOptions,
    ) -> NotificationId {
        (**self).enqueue(kind, message, options)
    }

    fn dismiss(&mut self, id: NotificationId) {
        (**self).dismiss(id)
    }
}

pub struct Toasts<N: Notifier> {
    notifier: N,
}

impl<N: Notifier> Toasts<N> {
    const ACTION_DURATION: Duration = Duration::from_millis(6000);

    pub fn new(notifier: N) -> Self {
        Toasts { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn success(&mut self, message: &str) -> NotificationId {
        self.notifier
            .enqueue(NotificationKind::Success, message, NotifyOptions::default())
    }

    pub fn error(&mut self, message: &str) -> NotificationId {
        self.notifier
            .enqueue(NotificationKind::Error, message, NotifyOptions::default())
    }

    pub fn warning(&mut self, message: &str) -> NotificationId {
        self.notifier
            .enqueue(NotificationKind::Warning, message, NotifyOptions::default())
    }

    pub fn info(&mut self, message: &str) -> NotificationId {
        self.notifier
            .enqueue(NotificationKind::Info, message, NotifyOptions::default())
    }

    pub fn custom(&mut self, message: &str, icon: &str) -> NotificationId {
        self.notifier.enqueue(
            NotificationKind::Custom,
            message,
            NotifyOptions::default().icon(icon),
        )
    }

    pub fn loading(&mut self, message: &str) -> NotificationId {
        self.notifier
            .enqueue(NotificationKind::Loading, message, NotifyOptions::default())
    }

    pub fn with_action(
        &mut self,
        message: &str,
        label: &str,
        callback: impl FnMut() + 'static,
    ) -> NotificationId {
        self.notifier.enqueue(
            NotificationKind::Info,
            message,
            NotifyOptions::default()
                .duration(Self::ACTION_DURATION)
                .action(NotifyAction::new(label, callback)),
        )
    }

    pub fn dismiss(&mut self, id: NotificationId) {
        self.notifier.dismiss(id)
    }

    pub fn post_scheduled(&mut self, platform: Platform, when: &str) -> NotificationId {
        self.notifier.enqueue(
            NotificationKind::Success,
            &format!("Post scheduled for {} on {}", platform.label(), when),
            NotifyOptions::default().icon("📅"),
        )
    }

    pub fn post_published(&mut self, platform: Platform) -> NotificationId {
        self.notifier.enqueue(
            NotificationKind::Success,
            &format!("Post published to {}", platform.label()),
            NotifyOptions::default().icon("🚀"),
        )
    }

    pub fn post_failed(&mut self, platform: Platform, reason: &str) -> NotificationId {
        self.error(&format!(
            "Could not publish to {}: {}",
            platform.label(),
            reason
        ))
    }

    pub fn draft_saved(&mut self) -> NotificationId {
        self.notifier.enqueue(
            NotificationKind::Info,
            "Draft saved",
            NotifyOptions::default().icon("💾"),
        )
    }

    pub fn media_uploaded(&mut self) -> NotificationId {
        self.notifier.enqueue(
            NotificationKind::Success,
            "Media uploaded",
            NotifyOptions::default().icon("🖼"),
        )
    }

    pub fn account_connected(&mut self, platform: Platform) -> NotificationId {
        self.success(&format!("{} account connected", platform.label()))
    }
}

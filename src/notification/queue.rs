use std::time::{Duration, Instant};

use super::*;

#[derive(Debug)]
pub struct Toast {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub icon: Option<String>,
    pub action: Option<NotifyAction>,
    expires: Option<Instant>,
}

impl Toast {
    pub fn expires(&self) -> Option<Instant> {
        self.expires
    }

    fn expired(&self, now: Instant) -> bool {
        matches!(self.expires, Some(deadline) if deadline <= now)
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.icon {
            Some(icon) => write!(f, "{} {}", icon, self.message)?,
            None => write!(f, "{} {}", self.kind.symbol(), self.message)?,
        }
        if let Some(action) = &self.action {
            write!(f, " [{}]", action.label)?;
        }
        Ok(())
    }
}

/// Toasts currently on screen, newest last.
pub struct ToastQueue {
    toasts: Vec<Toast>,
    durations: Durations,
    limit: usize,
    next_id: u64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        ToastQueue::new(Durations::default())
    }
}

impl ToastQueue {
    const DEFAULT_LIMIT: usize = 3;

    pub fn new(durations: Durations) -> Self {
        ToastQueue {
            toasts: Vec::new(),
            durations,
            limit: Self::DEFAULT_LIMIT,
            next_id: 0,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn enqueue_at(
        &mut self,
        now: Instant,
        kind: NotificationKind,
        message: &str,
        options: NotifyOptions,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        let expires = options
            .display_duration(kind, &self.durations)
            .map(|d: Duration| now + d);

        self.toasts.push(Toast {
            id,
            kind,
            message: message.to_owned(),
            icon: options.icon,
            action: options.action,
            expires,
        });

        if self.toasts.len() > self.limit {
            let overflow = self.toasts.len() - self.limit;
            self.toasts.drain(..overflow);
        }

        log::debug!("Toast {} ({:?}): {}", id, kind, message);
        id
    }

    /// Drops every toast whose display time has passed.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.expired(now));
    }

    /// Runs the toast's action and dismisses it. Returns false if there was nothing to run.
    pub fn trigger_action(&mut self, id: NotificationId) -> bool {
        let ran = match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(Toast {
                action: Some(action),
                ..
            }) => {
                action.run();
                true
            }
            _ => false,
        };

        if ran {
            self.dismiss_toast(id);
        }
        ran
    }

    /// Action of the newest toast that has one.
    pub fn latest_action(&self) -> Option<NotificationId> {
        self.toasts
            .iter()
            .rev()
            .find(|t| t.action.is_some())
            .map(|t| t.id)
    }

    fn dismiss_toast(&mut self, id: NotificationId) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

impl Notifier for ToastQueue {
    fn enqueue(
        &mut self,
        kind: NotificationKind,
        message: &str,
        options: NotifyOptions,
    ) -> NotificationId {
        self.enqueue_at(Instant::now(), kind, message, options)
    }

    fn dismiss(&mut self, id: NotificationId) {
        self.dismiss_toast(id)
    }
}

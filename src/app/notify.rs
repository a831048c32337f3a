//! Transient user notifications (toasts).
//!
//! Persistence and stream failures never propagate out of the session; they end
//! up here. Toasts expire after a configurable time-to-live and are pruned on
//! every tick of the runtime loop.

use chrono::{DateTime, Duration, Utc};

/// Maximum number of toasts kept at once. Older ones are dropped first.
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Queue of live toasts, newest last.
#[derive(Debug, Clone)]
pub struct Notifications {
    toasts: Vec<Toast>,
    ttl: Duration,
}

impl Notifications {
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            toasts: Vec::new(),
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message.into(), Utc::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message.into(), Utc::now());
    }

    fn push(&mut self, level: ToastLevel, message: String, created_at: DateTime<Utc>) {
        tracing::debug!(level = ?level, message = %message, "toast");
        self.toasts.push(Toast {
            level,
            message,
            created_at,
        });
        if self.toasts.len() > MAX_TOASTS {
            let excess = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..excess);
        }
    }

    /// Drops toasts older than the time-to-live. Returns `true` if any expired.
    pub fn prune(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts.retain(|toast| now.signed_duration_since(toast.created_at) < ttl);
        self.toasts.len() != before
    }

    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_toasts_are_pruned() {
        let mut notifications = Notifications::new(4);
        let start = Utc::now();
        notifications.push(ToastLevel::Error, "old".into(), start - Duration::seconds(10));
        notifications.push(ToastLevel::Info, "fresh".into(), start);

        assert!(notifications.prune(start));
        assert_eq!(notifications.toasts().len(), 1);
        assert_eq!(notifications.toasts()[0].message, "fresh");
        assert!(!notifications.prune(start));
    }

    #[test]
    fn keeps_only_the_newest_toasts() {
        let mut notifications = Notifications::default();
        for n in 0..5 {
            notifications.info(format!("toast {n}"));
        }
        let messages: Vec<&str> = notifications.toasts().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["toast 2", "toast 3", "toast 4"]);
    }
}

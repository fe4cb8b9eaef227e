// src/export/notifier.rs
//! User-facing notifications, decoupled from however they get presented

use std::sync::Mutex;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, description)
    }

    fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sends notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.kind {
            NotificationKind::Error => error!(title = %n.title, "{}", n.description),
            _ => info!(title = %n.title, kind = ?n.kind, "{}", n.description),
        }
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notification);
        }
    }
}

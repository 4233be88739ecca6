use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub user_id: Option<String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Notification {
            title: title.into(),
            message: message.into(),
            kind,
            user_id: None,
        }
    }

    pub fn for_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// Fire-and-forget user notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits each notification as a structured log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.kind {
            NotificationKind::Success | NotificationKind::Info => info!(
                target: "estatebook",
                event = "notification",
                kind = ?n.kind,
                title = %n.title,
                message = %n.message
            ),
            NotificationKind::Warning => warn!(
                target: "estatebook",
                event = "notification",
                kind = ?n.kind,
                title = %n.title,
                message = %n.message
            ),
            NotificationKind::Error => error!(
                target: "estatebook",
                event = "notification",
                kind = ?n.kind,
                title = %n.title,
                message = %n.message
            ),
        }
    }
}

/// Collects notifications for later inspection.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notification::new(NotificationKind::Info, "One", "first"));
        notifier.notify(
            Notification::new(NotificationKind::Error, "Two", "second").for_user(Some("u1".into())),
        );
        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn serializes_kind_as_type() {
        let json = serde_json::to_value(Notification::new(NotificationKind::Warning, "t", "m"))
            .expect("serialize");
        assert_eq!(json["type"], "warning");
        assert!(json.get("userId").is_none());
    }
}

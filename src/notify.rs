use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::model::{Notification, NotificationKind};

/// Display duration consumers apply when the caller does not pick one.
const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// In-memory queue of transient UI notifications.
///
/// Constructed once per application session and injected wherever
/// notifications are raised; clones share the same queue. Entries are only
/// removed through [`Notifications::remove`], the advisory `timeout` on
/// each entry is left to the consumer to act on.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an info notification with the default timeout and returns
    /// its generated id.
    pub fn add(&self, message: impl Into<String>) -> String {
        self.add_with(
            message,
            NotificationKind::Info,
            None,
            Some(DEFAULT_TIMEOUT_MS),
        )
    }

    /// Appends a notification and returns its generated id. Ids are random
    /// and practically unique within a session.
    pub fn add_with(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        title: Option<String>,
        timeout: Option<u64>,
    ) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let notification = Notification {
            id: id.clone(),
            kind,
            title,
            message: message.into(),
            timeout,
        };

        self.entries
            .lock()
            .expect("notification store poisoned")
            .push(notification);
        id
    }

    /// Removes the notification with the given id; unknown ids are ignored.
    pub fn remove(&self, id: &str) {
        self.entries
            .lock()
            .expect("notification store poisoned")
            .retain(|notification| notification.id != id);
    }

    /// Snapshot of the active notifications, oldest first.
    pub fn current(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .expect("notification store poisoned")
            .clone()
    }
}

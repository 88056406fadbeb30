use serde_with::skip_serializing_none;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// A transient UI message held by [`Notifications`](crate::Notifications).
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    /// Session-unique identifier, generated on insertion
    pub id: String,
    /// Severity
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Optional heading
    pub title: Option<String>,
    /// Body text
    pub message: String,
    /// Advisory display duration in milliseconds; expiry is up to the
    /// consumer, the store never removes entries on its own
    pub timeout: Option<u64>,
}

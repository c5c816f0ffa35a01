use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A notification, fetched from the list endpoint or pushed over the socket.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub title: Option<String>,
    pub kind: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

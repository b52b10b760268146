use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One authenticated participant of a call.
///
/// The participant list is ordered by join time and unique by `user_id`;
/// the repository enforces the uniqueness on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallParticipant {
    /// User ID
    pub user_id: String,

    /// Login name at join time
    pub username: String,

    /// Display name at join time
    pub name: String,

    /// Avatar cache tag, if the user has an avatar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_etag: Option<String>,

    /// When the user joined the call
    pub joined_at: DateTime<Utc>,
}

impl CallParticipant {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
        avatar_etag: Option<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            name: name.into(),
            avatar_etag,
            joined_at,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Snapshot of a user's identity as embedded in conference records.
///
/// Used for the call creator and terminator. The snapshot is denormalized at
/// write time; `update_user_references` propagates later renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReference {
    /// User ID
    pub user_id: String,

    /// Login name at the time of the snapshot
    pub username: String,

    /// Display name at the time of the snapshot
    pub name: String,
}

impl UserReference {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            name: name.into(),
        }
    }
}

use async_stream::try_stream;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use serde::Deserialize;
use serde_json::Value;
use surrealdb::{Surreal, engine::any::Any};
use tracing::debug;
use uuid::Uuid;

use huddle_entity::types::{
    CallMessageType, CallParticipant, CallStatus, CallType, UserReference, VideoConference,
    VideoConferencePatch,
};

use crate::pagination::Pagination;
use crate::repository::error::RepositoryError;

/// Page size for the lazy history cursors
const FETCH_BATCH: u64 = 50;

/// Summary of a write against a single record.
///
/// A keyed write that matched nothing is not an error at this layer; callers
/// that care inspect the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
}

/// Typed access to conference records in the `video_conference` table.
///
/// This layer normalizes input and injects creation defaults; it does not
/// enforce status transition order or type-specific field eligibility. See
/// [`crate::repository::CallLifecycleService`] for the validated boundary.
#[derive(Clone)]
pub struct VideoConferenceRepository {
    db: Surreal<Any>,
}

impl VideoConferenceRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    async fn insert(&self, call: VideoConference) -> Result<String, RepositoryError> {
        let call_id = call.call_id.clone();
        debug!("Creating {} call {} in room {}", call.call_type(), call_id, call.room_id);

        let created: Option<VideoConference> =
            self.db.create(("video_conference", call_id.as_str())).content(call).await?;

        created.map(|call| call.call_id).ok_or_else(|| RepositoryError::DatabaseError {
            message: "insert returned no record".to_string(),
            operation: "create_conference".to_string(),
        })
    }

    /// Create a direct call record: status `calling`, ringing
    pub async fn create_direct(
        &self,
        room_id: &str,
        created_by: &UserReference,
        provider_name: &str,
    ) -> Result<String, RepositoryError> {
        let call = VideoConference::direct(
            Uuid::new_v4().simple().to_string(),
            room_id.to_string(),
            created_by.clone(),
            provider_name,
        );
        self.insert(call).await
    }

    /// Create a group call record: status `started`, zero anonymous users.
    /// `ringing` is caller-supplied, no default.
    pub async fn create_group(
        &self,
        room_id: &str,
        title: &str,
        created_by: &UserReference,
        provider_name: &str,
        ringing: bool,
    ) -> Result<String, RepositoryError> {
        let call = VideoConference::group(
            Uuid::new_v4().simple().to_string(),
            room_id.to_string(),
            title.to_string(),
            created_by.clone(),
            provider_name,
            ringing,
        );
        self.insert(call).await
    }

    /// Create a livechat call record: status `started`
    pub async fn create_livechat(
        &self,
        room_id: &str,
        created_by: &UserReference,
        provider_name: &str,
    ) -> Result<String, RepositoryError> {
        let call = VideoConference::livechat(
            Uuid::new_v4().simple().to_string(),
            room_id.to_string(),
            created_by.clone(),
            provider_name,
        );
        self.insert(call).await
    }

    pub async fn find_one_by_id(
        &self,
        call_id: &str,
    ) -> Result<Option<VideoConference>, RepositoryError> {
        let call: Option<VideoConference> =
            self.db.select(("video_conference", call_id)).await?;
        Ok(call)
    }

    /// All calls of a room, newest first, fetched lazily in batches as the
    /// stream is polled. Provider-specific data is omitted from the
    /// projection and never produced by this query.
    pub fn find_all_by_room_id(
        &self,
        room_id: &str,
        pagination: Pagination,
    ) -> impl Stream<Item = Result<VideoConference, RepositoryError>> + Send + 'static {
        let db = self.db.clone();
        let room_id = room_id.to_string();

        try_stream! {
            let mut cursor = pagination.start();
            let mut remaining = pagination.count;

            loop {
                let batch = remaining.map_or(FETCH_BATCH, |left| left.min(FETCH_BATCH));
                if batch == 0 {
                    break;
                }

                let mut response = db
                    .query(
                        "SELECT * OMIT provider_data FROM video_conference \
                         WHERE room_id = $room_id \
                         ORDER BY created_at DESC LIMIT $limit START $start",
                    )
                    .bind(("room_id", room_id.clone()))
                    .bind(("limit", batch))
                    .bind(("start", cursor))
                    .await?;

                let page: Vec<VideoConference> = response.take(0)?;
                let fetched = page.len() as u64;

                for record in page {
                    yield record;
                }

                if fetched < batch {
                    break;
                }
                cursor += fetched;
                if let Some(left) = remaining.as_mut() {
                    *left -= fetched;
                }
            }
        }
    }

    /// Identifiers of calls created at or before `cutoff` that never ended.
    /// Feeds external reconciliation of stuck calls; oldest first.
    pub fn find_all_long_running(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Stream<Item = Result<String, RepositoryError>> + Send + 'static {
        #[derive(Deserialize)]
        struct CallId {
            call_id: String,
        }

        let db = self.db.clone();

        try_stream! {
            let mut cursor: u64 = 0;

            loop {
                let mut response = db
                    .query(
                        "SELECT call_id FROM video_conference \
                         WHERE created_at <= <datetime> $cutoff AND ended_at IS NONE \
                         ORDER BY created_at ASC LIMIT $limit START $start",
                    )
                    .bind(("cutoff", cutoff))
                    .bind(("limit", FETCH_BATCH))
                    .bind(("start", cursor))
                    .await?;

                let page: Vec<CallId> = response.take(0)?;
                let fetched = page.len() as u64;

                for record in page {
                    yield record.call_id;
                }

                if fetched < FETCH_BATCH {
                    break;
                }
                cursor += fetched;
            }
        }
    }

    pub async fn count_by_type_and_status(
        &self,
        call_type: CallType,
        status: CallStatus,
    ) -> Result<u64, RepositoryError> {
        let mut response = self
            .db
            .query(
                "SELECT count() AS total FROM video_conference \
                 WHERE type = $call_type AND status = $status GROUP ALL",
            )
            .bind(("call_type", call_type.as_str().to_string()))
            .bind(("status", status.as_str().to_string()))
            .await?;

        #[derive(Deserialize)]
        struct CountRow {
            total: u64,
        }

        let row: Option<CountRow> = response.take(0)?;
        Ok(row.map(|row| row.total).unwrap_or(0))
    }

    async fn merge_by_id(
        &self,
        call_id: &str,
        patch: Value,
    ) -> Result<UpdateResult, RepositoryError> {
        let updated: Option<VideoConference> =
            self.db.update(("video_conference", call_id)).merge(patch).await?;

        Ok(UpdateResult { matched_count: if updated.is_some() { 1 } else { 0 } })
    }

    /// Generic escape hatch: merge an arbitrary update document into one
    /// record. The identifier is immutable; `id`/`call_id` keys are dropped
    /// from the document before the write. All typed setters below are
    /// convenience wrappers over this.
    pub async fn update_one_by_id(
        &self,
        call_id: &str,
        update: Value,
    ) -> Result<UpdateResult, RepositoryError> {
        let Value::Object(mut doc) = update else {
            return Err(RepositoryError::Validation {
                field: "update".to_string(),
                message: "update document must be an object".to_string(),
            });
        };
        doc.remove("id");
        doc.remove("call_id");

        self.merge_by_id(call_id, Value::Object(doc)).await
    }

    /// Stamp who ended the call and when, in a single write. `ended_at`
    /// defaults to now. Repeated calls overwrite; double-termination guards
    /// live in the lifecycle service, not here.
    pub async fn set_ended_by_id(
        &self,
        call_id: &str,
        ended_by: Option<&UserReference>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<UpdateResult, RepositoryError> {
        let mut doc = serde_json::Map::new();
        if let Some(user) = ended_by {
            doc.insert("ended_by".to_string(), serde_json::to_value(user)?);
        }
        doc.insert(
            "ended_at".to_string(),
            serde_json::to_value(ended_at.unwrap_or_else(Utc::now))?,
        );

        debug!("Ending call {}", call_id);
        self.merge_by_id(call_id, Value::Object(doc)).await
    }

    /// Merge a whitelisted partial update in one write
    pub async fn set_data_by_id(
        &self,
        call_id: &str,
        data: &VideoConferencePatch,
    ) -> Result<UpdateResult, RepositoryError> {
        self.merge_by_id(call_id, serde_json::to_value(data)?).await
    }

    pub async fn set_ringing_by_id(
        &self,
        call_id: &str,
        ringing: bool,
    ) -> Result<UpdateResult, RepositoryError> {
        self.merge_by_id(call_id, serde_json::json!({ "ringing": ringing })).await
    }

    pub async fn set_status_by_id(
        &self,
        call_id: &str,
        status: CallStatus,
    ) -> Result<UpdateResult, RepositoryError> {
        self.merge_by_id(call_id, serde_json::json!({ "status": status })).await
    }

    pub async fn set_url_by_id(
        &self,
        call_id: &str,
        url: &url::Url,
    ) -> Result<UpdateResult, RepositoryError> {
        self.merge_by_id(call_id, serde_json::json!({ "url": url })).await
    }

    /// Replace the provider-specific blob, or remove the field entirely when
    /// `data` is absent. The two write shapes are chosen on presence, not
    /// value: `Some(Value::Null)` still stores a value.
    pub async fn set_provider_data_by_id(
        &self,
        call_id: &str,
        data: Option<Value>,
    ) -> Result<UpdateResult, RepositoryError> {
        match data {
            Some(data) => {
                self.merge_by_id(call_id, serde_json::json!({ "provider_data": data })).await
            },
            None => {
                let mut response = self
                    .db
                    .query(
                        "UPDATE type::thing('video_conference', $call_id) \
                         SET provider_data = NONE",
                    )
                    .bind(("call_id", call_id.to_string()))
                    .await?;

                let updated: Vec<Value> = response.take(0)?;
                Ok(UpdateResult { matched_count: updated.len() as u64 })
            },
        }
    }

    /// Add a participant unless a participant with the same user id is
    /// already present; duplicate adds are no-ops. `joined_at` defaults to
    /// now when the caller does not supply one.
    pub async fn add_user_by_id(
        &self,
        call_id: &str,
        user: &UserReference,
        avatar_etag: Option<String>,
        joined_at: Option<DateTime<Utc>>,
    ) -> Result<UpdateResult, RepositoryError> {
        let participant = CallParticipant::new(
            user.user_id.clone(),
            user.username.clone(),
            user.name.clone(),
            avatar_etag,
            joined_at.unwrap_or_else(Utc::now),
        );

        let mut response = self
            .db
            .query(
                "UPDATE type::thing('video_conference', $call_id) \
                 SET users += $user \
                 WHERE $user_id NOT IN users.user_id",
            )
            .bind(("call_id", call_id.to_string()))
            .bind(("user", participant))
            .bind(("user_id", user.user_id.clone()))
            .await?;

        let updated: Vec<Value> = response.take(0)?;
        Ok(UpdateResult { matched_count: updated.len() as u64 })
    }

    /// Link the message announcing a lifecycle event, leaving the other
    /// message links untouched
    pub async fn set_message_by_id(
        &self,
        call_id: &str,
        message_type: CallMessageType,
        message_id: &str,
    ) -> Result<UpdateResult, RepositoryError> {
        let mut entry = serde_json::Map::new();
        entry.insert(message_type.as_str().to_string(), Value::String(message_id.to_string()));

        let mut doc = serde_json::Map::new();
        doc.insert("messages".to_string(), Value::Object(entry));

        self.merge_by_id(call_id, Value::Object(doc)).await
    }

    /// Propagate a renamed identity into every record where the user appears
    /// as participant, creator, or terminator.
    ///
    /// Three independent bulk updates, not atomic as a whole: a failure
    /// between them leaves partial propagation. Each statement is idempotent,
    /// so re-running after a partial failure converges.
    pub async fn update_user_references(
        &self,
        user_id: &str,
        username: &str,
        name: &str,
    ) -> Result<(), RepositoryError> {
        debug!("Propagating identity change for user {}", user_id);

        self.db
            .query(
                "UPDATE video_conference \
                 SET users = array::map(users, |$u| { \
                     IF $u.user_id = $user_id { \
                         RETURN { \
                             user_id: $u.user_id, \
                             username: $username, \
                             name: $name, \
                             avatar_etag: $u.avatar_etag, \
                             joined_at: $u.joined_at \
                         }; \
                     } ELSE { \
                         RETURN $u; \
                     }; \
                 }) \
                 WHERE $user_id IN users.user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("username", username.to_string()))
            .bind(("name", name.to_string()))
            .await?
            .check()
            .map_err(|e| RepositoryError::DatabaseError {
                message: e.to_string(),
                operation: "update_user_references_participants".to_string(),
            })?;

        self.db
            .query(
                "UPDATE video_conference \
                 SET created_by.username = $username, created_by.name = $name \
                 WHERE created_by.user_id = $user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("username", username.to_string()))
            .bind(("name", name.to_string()))
            .await?
            .check()
            .map_err(|e| RepositoryError::DatabaseError {
                message: e.to_string(),
                operation: "update_user_references_creator".to_string(),
            })?;

        self.db
            .query(
                "UPDATE video_conference \
                 SET ended_by.username = $username, ended_by.name = $name \
                 WHERE ended_by.user_id = $user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("username", username.to_string()))
            .bind(("name", name.to_string()))
            .await?
            .check()
            .map_err(|e| RepositoryError::DatabaseError {
                message: e.to_string(),
                operation: "update_user_references_terminator".to_string(),
            })?;

        Ok(())
    }

    /// Atomically bump the anonymous participant counter by one
    pub async fn increase_anonymous_count(
        &self,
        call_id: &str,
    ) -> Result<UpdateResult, RepositoryError> {
        let mut response = self
            .db
            .query(
                "UPDATE type::thing('video_conference', $call_id) \
                 SET anonymous_users = (anonymous_users ?? 0) + 1",
            )
            .bind(("call_id", call_id.to_string()))
            .await?;

        let updated: Vec<Value> = response.take(0)?;
        Ok(UpdateResult { matched_count: updated.len() as u64 })
    }
}

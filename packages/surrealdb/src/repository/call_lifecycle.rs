use chrono::{DateTime, Utc};
use serde_json::Value;
use surrealdb::{Surreal, engine::any::Any};

use huddle_entity::types::{CallStateError, CallStatus, UserReference, VideoConference};

use crate::repository::error::RepositoryError;
use crate::repository::video_conference::VideoConferenceRepository;

/// Validated boundary over the conference record store.
///
/// The raw repository is a typed pass-through; this service is where status
/// transitions, type-specific field eligibility, and double-termination are
/// checked before a write is issued. Reads and validation are not atomic
/// with the write, so concurrent callers can still race; the checks close
/// the caller-discipline gap, not the race.
#[derive(Clone)]
pub struct CallLifecycleService {
    calls: VideoConferenceRepository,
}

impl CallLifecycleService {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { calls: VideoConferenceRepository::new(db) }
    }

    /// The underlying store, for operations the lifecycle does not gate
    pub fn repository(&self) -> &VideoConferenceRepository {
        &self.calls
    }

    async fn load(&self, call_id: &str) -> Result<VideoConference, RepositoryError> {
        self.calls.find_one_by_id(call_id).await?.ok_or_else(|| RepositoryError::NotFound {
            entity_type: "VideoConference".to_string(),
            id: call_id.to_string(),
        })
    }

    /// Move a call to `next`, rejecting transitions the call type does not
    /// allow
    pub async fn advance_status(
        &self,
        call_id: &str,
        next: CallStatus,
    ) -> Result<(), RepositoryError> {
        let call = self.load(call_id).await?;
        call.call_type().ensure_transition(call.status, next)?;
        self.calls.set_status_by_id(call_id, next).await?;
        Ok(())
    }

    /// Terminate a call: status, terminator, and end time stamped in one
    /// write. Rejects calls that already ended.
    pub async fn end_call(
        &self,
        call_id: &str,
        ended_by: Option<&UserReference>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let call = self.load(call_id).await?;
        if call.is_ended() {
            return Err(CallStateError::AlreadyEnded { call_id: call_id.to_string() }.into());
        }
        call.call_type().ensure_transition(call.status, CallStatus::Ended)?;

        let mut doc = serde_json::Map::new();
        doc.insert("status".to_string(), serde_json::to_value(CallStatus::Ended)?);
        if let Some(user) = ended_by {
            doc.insert("ended_by".to_string(), serde_json::to_value(user)?);
        }
        doc.insert(
            "ended_at".to_string(),
            serde_json::to_value(ended_at.unwrap_or_else(Utc::now))?,
        );

        self.calls.update_one_by_id(call_id, Value::Object(doc)).await?;
        Ok(())
    }

    /// Flip the ringing flag, rejecting call types that do not ring
    pub async fn set_ringing(&self, call_id: &str, ringing: bool) -> Result<(), RepositoryError> {
        let call = self.load(call_id).await?;
        if !call.call_type().supports_ringing() {
            return Err(RepositoryError::Validation {
                field: "ringing".to_string(),
                message: format!("{} calls do not ring", call.call_type()),
            });
        }
        self.calls.set_ringing_by_id(call_id, ringing).await?;
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{CallMessages, CallParticipant, CallStatus, CallType, UserReference};

/// Type-specific payload of a conference record.
///
/// The variant is tagged by the `type` field and flattened into the record,
/// so the stored document stays flat: a direct call document carries
/// `type: "direct"` and `ringing` next to the common fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CallKind {
    /// One-to-one call; rings until answered or declined
    #[serde(rename = "direct")]
    Direct { ringing: bool },

    /// Group call in a channel
    #[serde(rename = "videoconference")]
    Group {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        ringing: Option<bool>,
        anonymous_users: i64,
    },

    /// Call attached to a livechat conversation
    #[serde(rename = "livechat")]
    Livechat,
}

impl CallKind {
    pub fn call_type(&self) -> CallType {
        match self {
            CallKind::Direct { .. } => CallType::Direct,
            CallKind::Group { .. } => CallType::Videoconference,
            CallKind::Livechat => CallType::Livechat,
        }
    }
}

/// One persisted call session: a direct call, a group call, or a call
/// attached to a livechat conversation.
///
/// The record is never physically deleted; termination only stamps
/// `ended_by`/`ended_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConference {
    /// Store-assigned identifier, unique and never reused
    pub call_id: String,

    /// Room the call belongs to
    pub room_id: String,

    /// User who started the call
    pub created_by: UserReference,

    /// Creation time, set once
    pub created_at: DateTime<Utc>,

    /// Current lifecycle status
    pub status: CallStatus,

    /// Lower-cased name of the calling backend
    pub provider_name: String,

    /// Opaque provider-specific state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_data: Option<serde_json::Value>,

    /// Participants in join order, unique by user id
    pub users: Vec<CallParticipant>,

    /// Linked lifecycle messages
    pub messages: CallMessages,

    /// Join URL handed out by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,

    /// Who ended the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_by: Option<UserReference>,

    /// When the call ended; once set, never cleared or changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Type tag and type-specific fields
    #[serde(flatten)]
    pub kind: CallKind,
}

impl VideoConference {
    fn new(
        call_id: String,
        room_id: String,
        created_by: UserReference,
        provider_name: &str,
        kind: CallKind,
    ) -> Self {
        Self {
            call_id,
            room_id,
            created_by,
            created_at: Utc::now(),
            status: kind.call_type().initial_status(),
            provider_name: provider_name.to_lowercase(),
            provider_data: None,
            users: Vec::new(),
            messages: CallMessages::default(),
            url: None,
            ended_by: None,
            ended_at: None,
            kind,
        }
    }

    /// New direct call: status `calling`, ringing
    pub fn direct(
        call_id: String,
        room_id: String,
        created_by: UserReference,
        provider_name: &str,
    ) -> Self {
        Self::new(call_id, room_id, created_by, provider_name, CallKind::Direct { ringing: true })
    }

    /// New group call: status `started`, no anonymous participants yet
    pub fn group(
        call_id: String,
        room_id: String,
        title: String,
        created_by: UserReference,
        provider_name: &str,
        ringing: bool,
    ) -> Self {
        Self::new(
            call_id,
            room_id,
            created_by,
            provider_name,
            CallKind::Group { title, ringing: Some(ringing), anonymous_users: 0 },
        )
    }

    /// New livechat call: status `started`
    pub fn livechat(
        call_id: String,
        room_id: String,
        created_by: UserReference,
        provider_name: &str,
    ) -> Self {
        Self::new(call_id, room_id, created_by, provider_name, CallKind::Livechat)
    }

    pub fn call_type(&self) -> CallType {
        self.kind.call_type()
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Ringing flag, for the types that carry one
    pub fn ringing(&self) -> Option<bool> {
        match &self.kind {
            CallKind::Direct { ringing } => Some(*ringing),
            CallKind::Group { ringing, .. } => *ringing,
            CallKind::Livechat => None,
        }
    }

    /// Anonymous participant counter, for group calls
    pub fn anonymous_users(&self) -> Option<i64> {
        match &self.kind {
            CallKind::Group { anonymous_users, .. } => Some(*anonymous_users),
            _ => None,
        }
    }

    /// Group call title
    pub fn title(&self) -> Option<&str> {
        match &self.kind {
            CallKind::Group { title, .. } => Some(title.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> UserReference {
        UserReference::new("user-1", "alice", "Alice")
    }

    #[test]
    fn direct_call_document_is_flat_and_tagged() {
        let call = VideoConference::direct(
            "call-1".into(),
            "room-1".into(),
            creator(),
            "WebRTC",
        );

        let doc = serde_json::to_value(&call).unwrap();
        assert_eq!(doc["type"], "direct");
        assert_eq!(doc["ringing"], true);
        assert_eq!(doc["status"], "calling");
        assert_eq!(doc["provider_name"], "webrtc");
        assert_eq!(doc["users"], serde_json::json!([]));
        assert_eq!(doc["messages"], serde_json::json!({}));
        // absent optionals must be absent, not null
        assert!(doc.get("ended_at").is_none());
        assert!(doc.get("provider_data").is_none());
        assert!(doc.get("url").is_none());
    }

    #[test]
    fn group_call_starts_started_with_zero_anonymous_users() {
        let call = VideoConference::group(
            "call-2".into(),
            "room-1".into(),
            "Standup".into(),
            creator(),
            "Jitsi",
            false,
        );

        assert_eq!(call.status, CallStatus::Started);
        assert_eq!(call.anonymous_users(), Some(0));
        assert_eq!(call.ringing(), Some(false));
        assert_eq!(call.title(), Some("Standup"));

        let doc = serde_json::to_value(&call).unwrap();
        assert_eq!(doc["type"], "videoconference");
        assert_eq!(doc["anonymous_users"], 0);
    }

    #[test]
    fn livechat_call_has_no_type_specific_fields() {
        let call = VideoConference::livechat(
            "call-3".into(),
            "room-2".into(),
            creator(),
            "webrtc",
        );

        assert_eq!(call.call_type(), CallType::Livechat);
        assert_eq!(call.ringing(), None);
        assert_eq!(call.anonymous_users(), None);

        let doc = serde_json::to_value(&call).unwrap();
        assert_eq!(doc["type"], "livechat");
        assert!(doc.get("ringing").is_none());
        assert!(doc.get("anonymous_users").is_none());
    }

    #[test]
    fn records_round_trip_through_their_document_shape() {
        let call = VideoConference::group(
            "call-4".into(),
            "room-9".into(),
            "All hands".into(),
            creator(),
            "BigBlueButton",
            true,
        );

        let doc = serde_json::to_value(&call).unwrap();
        let back: VideoConference = serde_json::from_value(doc).unwrap();
        assert_eq!(back, call);
    }
}

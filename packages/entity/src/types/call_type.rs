use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::CallStatus;

/// The three kinds of call a conference record can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// One-to-one call between two users
    Direct,
    /// Group call in a channel or team
    Videoconference,
    /// Call attached to an omnichannel livechat conversation
    Livechat,
}

impl CallType {
    /// String representation as stored in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Direct => "direct",
            CallType::Videoconference => "videoconference",
            CallType::Livechat => "livechat",
        }
    }

    /// Status a freshly created call of this type starts in
    pub fn initial_status(&self) -> CallStatus {
        match self {
            CallType::Direct => CallStatus::Calling,
            CallType::Videoconference | CallType::Livechat => CallStatus::Started,
        }
    }

    /// Whether records of this type carry a ringing flag
    pub fn supports_ringing(&self) -> bool {
        matches!(self, CallType::Direct | CallType::Videoconference)
    }

    /// Whether records of this type track an anonymous participant counter
    pub fn tracks_anonymous_users(&self) -> bool {
        matches!(self, CallType::Videoconference)
    }
}

impl std::fmt::Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(CallType::Direct),
            "videoconference" => Ok(CallType::Videoconference),
            "livechat" => Ok(CallType::Livechat),
            _ => Err(()),
        }
    }
}

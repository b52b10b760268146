use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a conference record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Direct call is ringing and has not been answered yet
    Calling,
    /// Call is live
    Started,
    /// Call has finished
    Ended,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Calling => "calling",
            CallStatus::Started => "started",
            CallStatus::Ended => "ended",
        }
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calling" => Ok(CallStatus::Calling),
            "started" => Ok(CallStatus::Started),
            "ended" => Ok(CallStatus::Ended),
            _ => Err(()),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Chat messages linked to call lifecycle events, at most one per tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMessages {
    /// Message announcing the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,

    /// Message announcing that the call finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended: Option<String>,
}

/// Tag selecting which message link a write targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMessageType {
    Started,
    Ended,
}

impl CallMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallMessageType::Started => "started",
            CallMessageType::Ended => "ended",
        }
    }
}

impl std::fmt::Display for CallMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

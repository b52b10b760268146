use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::CallStatus;

/// Partial update applied to a conference record in a single write.
///
/// Only whitelisted fields can be patched; the record identifier, type tag,
/// and creation metadata are not representable here. Absent fields are left
/// untouched by the merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoConferencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CallStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ringing: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_data: Option<serde_json::Value>,
}

impl VideoConferencePatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.url.is_none()
            && self.ringing.is_none()
            && self.title.is_none()
            && self.provider_data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_serializes_to_an_empty_document() {
        let patch = VideoConferencePatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn only_set_fields_appear_in_the_document() {
        let patch = VideoConferencePatch {
            status: Some(CallStatus::Started),
            ringing: Some(false),
            ..Default::default()
        };

        let doc = serde_json::to_value(&patch).unwrap();
        assert_eq!(doc, serde_json::json!({ "status": "started", "ringing": false }));
    }
}

use thiserror::Error;

use crate::types::{CallStatus, CallType};

/// Violation of the call lifecycle rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallStateError {
    #[error("illegal status transition for {call_type} call: {from} -> {to}")]
    InvalidTransition {
        call_type: CallType,
        from: CallStatus,
        to: CallStatus,
    },

    #[error("call {call_id} has already ended")]
    AlreadyEnded { call_id: String },
}

impl CallType {
    /// Whether a status transition is legal for this call type.
    ///
    /// Direct calls ring before they are answered, so they may move from
    /// `calling` to `started` (answered) or straight to `ended` (declined or
    /// timed out). Group and livechat calls are created live and can only
    /// end. `ended` is terminal for every type.
    pub fn allows_transition(&self, from: CallStatus, to: CallStatus) -> bool {
        match self {
            CallType::Direct => matches!(
                (from, to),
                (CallStatus::Calling, CallStatus::Started)
                    | (CallStatus::Calling, CallStatus::Ended)
                    | (CallStatus::Started, CallStatus::Ended)
            ),
            CallType::Videoconference | CallType::Livechat => {
                matches!((from, to), (CallStatus::Started, CallStatus::Ended))
            },
        }
    }

    /// Validate a status transition, returning the violation on failure
    pub fn ensure_transition(
        &self,
        from: CallStatus,
        to: CallStatus,
    ) -> Result<(), CallStateError> {
        if self.allows_transition(from, to) {
            Ok(())
        } else {
            Err(CallStateError::InvalidTransition { call_type: *self, from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_calls_follow_ring_answer_end() {
        assert!(CallType::Direct.allows_transition(CallStatus::Calling, CallStatus::Started));
        assert!(CallType::Direct.allows_transition(CallStatus::Calling, CallStatus::Ended));
        assert!(CallType::Direct.allows_transition(CallStatus::Started, CallStatus::Ended));
        assert!(!CallType::Direct.allows_transition(CallStatus::Started, CallStatus::Calling));
        assert!(!CallType::Direct.allows_transition(CallStatus::Ended, CallStatus::Started));
    }

    #[test]
    fn group_and_livechat_calls_only_end() {
        for call_type in [CallType::Videoconference, CallType::Livechat] {
            assert!(call_type.allows_transition(CallStatus::Started, CallStatus::Ended));
            assert!(!call_type.allows_transition(CallStatus::Calling, CallStatus::Started));
            assert!(!call_type.allows_transition(CallStatus::Started, CallStatus::Calling));
            assert!(!call_type.allows_transition(CallStatus::Ended, CallStatus::Started));
        }
    }

    #[test]
    fn ended_is_terminal() {
        for call_type in [CallType::Direct, CallType::Videoconference, CallType::Livechat] {
            for to in [CallStatus::Calling, CallStatus::Started, CallStatus::Ended] {
                assert!(!call_type.allows_transition(CallStatus::Ended, to));
            }
        }
    }

    #[test]
    fn ensure_transition_reports_the_violation() {
        let err = CallType::Livechat
            .ensure_transition(CallStatus::Ended, CallStatus::Started)
            .unwrap_err();
        assert_eq!(
            err,
            CallStateError::InvalidTransition {
                call_type: CallType::Livechat,
                from: CallStatus::Ended,
                to: CallStatus::Started,
            }
        );
    }
}

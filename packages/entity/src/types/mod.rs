mod call_messages;
mod call_participant;
mod call_state;
mod call_status;
mod call_type;
mod user_reference;
mod video_conference;
mod video_conference_patch;

pub use call_messages::{CallMessageType, CallMessages};
pub use call_participant::CallParticipant;
pub use call_state::CallStateError;
pub use call_status::CallStatus;
pub use call_type::CallType;
pub use user_reference::UserReference;
pub use video_conference::{CallKind, VideoConference};
pub use video_conference_patch::VideoConferencePatch;

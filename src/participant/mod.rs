//! Participant records and the transport-owned status they carry.

mod core;

pub use self::core::{
    MediaHandle, Participant, ParticipantFlags, ParticipantId, ParticipantState, ReactionKind,
    RemoteMedia, StateMap, decode_state_map, fallback_name,
};

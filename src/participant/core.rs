use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

pub type ParticipantId = String;

/// Snapshot of transport-reported status keyed by participant id.
pub type StateMap = HashMap<ParticipantId, ParticipantState>;

/// Opaque reference to a media stream owned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaHandle(String);

impl MediaHandle {
    pub fn new(stream_ref: impl Into<String>) -> Self {
        Self(stream_ref.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A remote stream as delivered by the transport, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMedia {
    pub participant_id: ParticipantId,
    pub handle: MediaHandle,
}

impl RemoteMedia {
    pub fn new(participant_id: impl Into<ParticipantId>, handle: MediaHandle) -> Self {
        Self {
            participant_id: participant_id.into(),
            handle,
        }
    }
}

/// Ephemeral reactions a participant can broadcast. Expiry belongs to the
/// transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionKind {
    ThumbsUp,
    ThumbsDown,
    Clapping,
    Waving,
    Smiling,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 5] = [
        ReactionKind::ThumbsUp,
        ReactionKind::ThumbsDown,
        ReactionKind::Clapping,
        ReactionKind::Waving,
        ReactionKind::Smiling,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "👍",
            ReactionKind::ThumbsDown => "👎",
            ReactionKind::Clapping => "👏",
            ReactionKind::Waving => "👋",
            ReactionKind::Smiling => "😊",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticipantState {
    pub is_audio_enabled: bool,
    pub is_video_enabled: bool,
    pub is_hand_raised: bool,
    pub is_speaking: bool,
    pub is_screen_sharing: bool,
    pub reactions: BTreeSet<ReactionKind>,
}

impl Default for ParticipantState {
    fn default() -> Self {
        Self {
            is_audio_enabled: true,
            is_video_enabled: true,
            is_hand_raised: false,
            is_speaking: false,
            is_screen_sharing: false,
            reactions: BTreeSet::new(),
        }
    }
}

impl ParticipantState {
    pub fn has_reaction(&self, kind: ReactionKind) -> bool {
        self.reactions.contains(&kind)
    }

    pub fn is_muted(&self) -> bool {
        !self.is_audio_enabled
    }
}

/// Flat boolean shape the transport publishes for each participant.
///
/// Decode with serde, then convert into [`ParticipantState`] so the rest of
/// the crate only sees the reaction set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticipantFlags {
    pub is_audio_enabled: bool,
    pub is_video_enabled: bool,
    pub is_hand_raised: bool,
    pub is_speaking: bool,
    pub is_screen_sharing: bool,
    pub is_thumbs_up: bool,
    pub is_thumbs_down: bool,
    pub is_clapping: bool,
    pub is_waving: bool,
    pub is_smiling: bool,
}

impl Default for ParticipantFlags {
    fn default() -> Self {
        Self {
            is_audio_enabled: true,
            is_video_enabled: true,
            is_hand_raised: false,
            is_speaking: false,
            is_screen_sharing: false,
            is_thumbs_up: false,
            is_thumbs_down: false,
            is_clapping: false,
            is_waving: false,
            is_smiling: false,
        }
    }
}

impl From<ParticipantFlags> for ParticipantState {
    fn from(flags: ParticipantFlags) -> Self {
        let reactions = [
            (flags.is_thumbs_up, ReactionKind::ThumbsUp),
            (flags.is_thumbs_down, ReactionKind::ThumbsDown),
            (flags.is_clapping, ReactionKind::Clapping),
            (flags.is_waving, ReactionKind::Waving),
            (flags.is_smiling, ReactionKind::Smiling),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect();

        Self {
            is_audio_enabled: flags.is_audio_enabled,
            is_video_enabled: flags.is_video_enabled,
            is_hand_raised: flags.is_hand_raised,
            is_speaking: flags.is_speaking,
            is_screen_sharing: flags.is_screen_sharing,
            reactions,
        }
    }
}

/// Decode a transport status document (`{"id": {flags...}}`) into a
/// [`StateMap`].
pub fn decode_state_map(json: &str) -> serde_json::Result<StateMap> {
    let raw: HashMap<ParticipantId, ParticipantFlags> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(|(id, f)| (id, f.into())).collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub is_local: bool,
    pub media: Option<MediaHandle>,
    pub state: ParticipantState,
}

impl Participant {
    /// Whether a live video tile can be shown instead of an avatar.
    pub fn shows_video(&self) -> bool {
        self.media.is_some() && self.state.is_video_enabled
    }
}

/// Name shown when the directory has not resolved one yet.
pub fn fallback_name(id: &str) -> String {
    let prefix: String = id.chars().take(5).collect();
    format!("User {prefix}")
}

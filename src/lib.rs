//! Call session orchestration for the multi-participant call screen.
//!
//! A transport snapshot flows through the participant registry, the
//! pin/screen-share resolver and the grid layout engine into a render
//! list. Overlay state, controls auto-hide and the in-call chat log sit
//! alongside and are driven by user events. Everything here is
//! synchronous and single-owner; media, signalling and persistence stay
//! behind [`CallActions`].

pub mod avatar;
pub mod config;
pub mod error;
pub mod focus;
pub mod layout;
pub mod logging;
pub mod messaging;
pub mod metrics;
pub mod participant;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod session;
pub mod width;

pub use avatar::{AvatarColor, AvatarStyle, TextTone, avatar_for, color_for, text_tone_for};
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use focus::{FocusReason, FocusResolution, FocusState, Partition, PinOutcome, resolve_focus};
pub use layout::{LayoutConfig, LayoutPlan, TierLayout, compute_layout, compute_layout_with};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use messaging::{InCallMessage, MessageLog, MessageReaction, ReactionBadge};
pub use metrics::{MetricSnapshot, SessionMetrics};
pub use participant::{
    MediaHandle, Participant, ParticipantId, ParticipantState, ReactionKind, RemoteMedia, StateMap,
};
pub use registry::{
    LocalIdentity, ParticipantRegistry, ParticipantSnapshot, RegistryDiff, build_registry,
};
pub use render::{RenderTile, TileBadges};
pub use runtime::{
    CallActions, CallRoom, ControlAvailability, NoopActions, RecordedAction, RecordingActions,
    SessionEvent,
};
pub use session::{AutoHideTimer, Overlay, OverlayState, SessionUi};
pub use width::display_width;

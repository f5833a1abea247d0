//! Call-scoped chat log with per-message reactions.

mod core;

pub use self::core::{InCallMessage, MessageLog, MessageReaction, ReactionBadge, ReactionEntry};

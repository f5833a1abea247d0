use serde::{Deserialize, Serialize};

use crate::participant::ParticipantId;

/// Reactions that can be attached to a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageReaction {
    ThumbsUp,
    ThumbsDown,
    Heart,
    Laugh,
    Wow,
    Sad,
}

impl MessageReaction {
    pub const ALL: [MessageReaction; 6] = [
        MessageReaction::ThumbsUp,
        MessageReaction::ThumbsDown,
        MessageReaction::Heart,
        MessageReaction::Laugh,
        MessageReaction::Wow,
        MessageReaction::Sad,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            MessageReaction::ThumbsUp => "👍",
            MessageReaction::ThumbsDown => "👎",
            MessageReaction::Heart => "❤️",
            MessageReaction::Laugh => "😂",
            MessageReaction::Wow => "😮",
            MessageReaction::Sad => "😢",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEntry {
    pub user_id: ParticipantId,
    pub reaction: MessageReaction,
}

/// Aggregated count for one reaction type on one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionBadge {
    pub reaction: MessageReaction,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InCallMessage {
    pub id: String,
    pub sender_id: ParticipantId,
    pub sender_name: String,
    pub text: String,
    pub timestamp_ms: u64,
    pub is_me: bool,
    /// One entry per reacting user, in the order users first reacted.
    #[serde(default)]
    pub reactions: Vec<ReactionEntry>,
}

impl InCallMessage {
    pub fn reaction_of(&self, user_id: &str) -> Option<MessageReaction> {
        self.reactions
            .iter()
            .find(|e| e.user_id == user_id)
            .map(|e| e.reaction)
    }

    /// Upsert the user's reaction. A user who already reacted keeps their
    /// slot and only the reaction type changes.
    pub fn set_reaction(&mut self, user_id: &str, reaction: MessageReaction) {
        match self.reactions.iter_mut().find(|e| e.user_id == user_id) {
            Some(entry) => entry.reaction = reaction,
            None => self.reactions.push(ReactionEntry {
                user_id: user_id.to_string(),
                reaction,
            }),
        }
    }

    /// Counts per reaction type, ordered by where each type first shows up
    /// in the reaction list.
    pub fn badges(&self) -> Vec<ReactionBadge> {
        let mut badges: Vec<ReactionBadge> = Vec::new();
        for entry in &self.reactions {
            match badges.iter_mut().find(|b| b.reaction == entry.reaction) {
                Some(badge) => badge.count += 1,
                None => badges.push(ReactionBadge {
                    reaction: entry.reaction,
                    count: 1,
                }),
            }
        }
        badges
    }
}

/// Append-only chat log scoped to one call. Messages keep arrival order and
/// are never removed.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<InCallMessage>,
    next_seq: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: InCallMessage) {
        self.next_seq += 1;
        self.messages.push(message);
    }

    /// Build and append a message with a log-assigned id of the form
    /// `{sender_id}-{seq}`, so ids never collide with another peer's.
    /// Blank text is rejected.
    pub fn compose(
        &mut self,
        sender_id: &str,
        sender_name: &str,
        text: &str,
        is_me: bool,
        timestamp_ms: u64,
    ) -> Option<&InCallMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let message = InCallMessage {
            id: format!("{sender_id}-{}", self.next_seq + 1),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            text: text.to_string(),
            timestamp_ms,
            is_me,
            reactions: Vec::new(),
        };
        self.append(message);
        self.messages.last()
    }

    /// Returns false when the message is unknown; the log is left as is.
    pub fn set_reaction(
        &mut self,
        message_id: &str,
        user_id: &str,
        reaction: MessageReaction,
    ) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => {
                message.set_reaction(user_id, reaction);
                true
            }
            None => false,
        }
    }

    /// Whether this sender's message with this id is already logged.
    pub fn contains(&self, sender_id: &str, message_id: &str) -> bool {
        self.messages
            .iter()
            .any(|m| m.sender_id == sender_id && m.id == message_id)
    }

    pub fn get(&self, message_id: &str) -> Option<&InCallMessage> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    pub fn messages(&self) -> &[InCallMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, sender: &str, ts: u64) -> InCallMessage {
        InCallMessage {
            id: id.to_string(),
            sender_id: sender.to_string(),
            sender_name: sender.to_uppercase(),
            text: format!("hello from {sender}"),
            timestamp_ms: ts,
            is_me: false,
            reactions: Vec::new(),
        }
    }

    #[test]
    fn messages_keep_arrival_order() {
        let mut log = MessageLog::new();
        log.append(message("a", "u2", 300));
        log.append(message("b", "u3", 100));
        let ids: Vec<_> = log.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn changing_reaction_replaces_it() {
        let mut log = MessageLog::new();
        log.append(message("m1", "u2", 1));
        assert!(log.set_reaction("m1", "u1", MessageReaction::Heart));
        assert!(log.set_reaction("m1", "u1", MessageReaction::Laugh));

        let m1 = log.get("m1").unwrap();
        assert_eq!(m1.reactions.len(), 1);
        assert_eq!(m1.reaction_of("u1"), Some(MessageReaction::Laugh));
    }

    #[test]
    fn badge_reflects_only_latest_reaction() {
        let mut log = MessageLog::new();
        log.append(message("m1", "u2", 1));
        log.set_reaction("m1", "u1", MessageReaction::ThumbsUp);
        log.set_reaction("m1", "u1", MessageReaction::ThumbsDown);
        assert_eq!(
            log.get("m1").unwrap().badges(),
            vec![ReactionBadge {
                reaction: MessageReaction::ThumbsDown,
                count: 1
            }]
        );
    }

    #[test]
    fn badges_count_distinct_users_in_first_seen_order() {
        let mut msg = message("m1", "u2", 1);
        msg.set_reaction("u3", MessageReaction::Heart);
        msg.set_reaction("u4", MessageReaction::ThumbsUp);
        msg.set_reaction("u5", MessageReaction::Heart);
        let badges = msg.badges();
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].reaction, MessageReaction::Heart);
        assert_eq!(badges[0].count, 2);
        assert_eq!(badges[1].reaction, MessageReaction::ThumbsUp);
    }

    #[test]
    fn composed_ids_do_not_collide_with_peer_sequences() {
        let mut log = MessageLog::new();
        let mine = log.compose("u1", "Me", "hi", true, 1).unwrap().id.clone();
        log.append(message("u2-1", "u2", 2));

        assert_ne!(mine, "u2-1");
        assert!(log.contains("u1", &mine));
        assert!(log.contains("u2", "u2-1"));
        assert!(!log.contains("u2", &mine));
        assert!(log.set_reaction("u2-1", "u1", MessageReaction::Wow));
        assert!(log.get(&mine).unwrap().reactions.is_empty());
    }

    #[test]
    fn reacting_to_unknown_message_is_noop() {
        let mut log = MessageLog::new();
        log.append(message("m1", "u2", 1));
        assert!(!log.set_reaction("nope", "u1", MessageReaction::Wow));
        assert!(log.get("m1").unwrap().reactions.is_empty());
    }

    #[test]
    fn compose_assigns_ids_and_rejects_blank_text() {
        let mut log = MessageLog::new();
        assert!(log.compose("u1", "Me", "   ", true, 5).is_none());
        let first = log.compose("u1", "Me", " hi ", true, 5).unwrap().id.clone();
        log.append(message("external", "u2", 6));
        let third = log.compose("u1", "Me", "again", true, 7).unwrap();
        assert_eq!(first, "u1-1");
        assert_eq!(third.id, "u1-3");
        assert_eq!(third.text, "again");
        assert_eq!(log.len(), 3);
    }
}

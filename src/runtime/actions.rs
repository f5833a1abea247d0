use std::sync::{Arc, Mutex};

use crate::messaging::MessageReaction;
use crate::participant::ReactionKind;

/// Outbound intents. The session only signals; media, signalling and
/// persistence live behind the implementor. Every method defaults to a
/// no-op so hosts implement only what they wire up.
pub trait CallActions: Send {
    fn on_toggle_audio(&mut self) {}

    fn on_toggle_video(&mut self) {}

    fn on_flip_camera(&mut self) {}

    fn on_end_call(&mut self) {}

    fn on_send_message(&mut self, _text: &str) {}

    fn on_react_to_message(&mut self, _message_id: &str, _reaction: MessageReaction) {}

    fn on_raise_hand(&mut self, _raised: bool) {}

    fn on_reaction(&mut self, _kind: ReactionKind) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopActions;

impl CallActions for NoopActions {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAction {
    ToggleAudio,
    ToggleVideo,
    FlipCamera,
    EndCall,
    SendMessage(String),
    ReactToMessage(String, MessageReaction),
    RaiseHand(bool),
    Reaction(ReactionKind),
}

/// Records every intent in order. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingActions {
    log: Arc<Mutex<Vec<RecordedAction>>>,
}

impl RecordingActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<RecordedAction> {
        self.log.lock().map(|g| g.clone()).unwrap_or_default()
    }

    fn push(&self, action: RecordedAction) {
        if let Ok(mut guard) = self.log.lock() {
            guard.push(action);
        }
    }
}

impl CallActions for RecordingActions {
    fn on_toggle_audio(&mut self) {
        self.push(RecordedAction::ToggleAudio);
    }

    fn on_toggle_video(&mut self) {
        self.push(RecordedAction::ToggleVideo);
    }

    fn on_flip_camera(&mut self) {
        self.push(RecordedAction::FlipCamera);
    }

    fn on_end_call(&mut self) {
        self.push(RecordedAction::EndCall);
    }

    fn on_send_message(&mut self, text: &str) {
        self.push(RecordedAction::SendMessage(text.to_string()));
    }

    fn on_react_to_message(&mut self, message_id: &str, reaction: MessageReaction) {
        self.push(RecordedAction::ReactToMessage(message_id.to_string(), reaction));
    }

    fn on_raise_hand(&mut self, raised: bool) {
        self.push(RecordedAction::RaiseHand(raised));
    }

    fn on_reaction(&mut self, kind: ReactionKind) {
        self.push(RecordedAction::Reaction(kind));
    }
}

use serde::Serialize;

/// Panels that can cover the call grid. Exactly one value is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    None,
    Chat,
    Reactions,
    QuickMessages,
    Participants,
    /// Reaction picker for one chat message, layered over Chat.
    MessageReactions,
}

impl Overlay {
    pub fn is_full_screen(self) -> bool {
        matches!(self, Overlay::Chat | Overlay::Participants)
    }
}

/// Before/after pair for an overlay change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTransition {
    pub from: Overlay,
    pub to: Overlay,
}

impl OverlayTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Single-slot overlay state. Opening anything replaces whatever was
/// active, so rapid taps can never leave two panels open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayState {
    active: Overlay,
    reaction_target: Option<String>,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            active: Overlay::None,
            reaction_target: None,
        }
    }
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Overlay {
        self.active
    }

    /// Message whose reaction picker is showing.
    pub fn reaction_target(&self) -> Option<&str> {
        self.reaction_target.as_deref()
    }

    /// Chat counts as open while its message reaction picker is up.
    pub fn is_chat_open(&self) -> bool {
        matches!(self.active, Overlay::Chat | Overlay::MessageReactions)
    }

    /// Open `overlay`, last write wins. `MessageReactions` needs a message and
    /// can only be reached through [`OverlayState::long_press_message`].
    pub fn open(&mut self, overlay: Overlay) -> OverlayTransition {
        if overlay == Overlay::MessageReactions {
            return self.unchanged();
        }
        self.set(overlay, None)
    }

    /// Close the active overlay. The message reaction picker falls back to
    /// Chat; everything else falls back to nothing.
    pub fn close(&mut self) -> OverlayTransition {
        match self.active {
            Overlay::MessageReactions => self.set(Overlay::Chat, None),
            _ => self.set(Overlay::None, None),
        }
    }

    /// Open when inactive, close when already showing.
    pub fn toggle(&mut self, overlay: Overlay) -> OverlayTransition {
        if self.active == overlay {
            self.close()
        } else {
            self.open(overlay)
        }
    }

    /// Long-press on a chat message. Ignored unless Chat is open.
    pub fn long_press_message(&mut self, message_id: &str) -> OverlayTransition {
        if !self.is_chat_open() {
            return self.unchanged();
        }
        self.set(Overlay::MessageReactions, Some(message_id.to_string()))
    }

    fn set(&mut self, to: Overlay, target: Option<String>) -> OverlayTransition {
        let from = self.active;
        self.active = to;
        self.reaction_target = target;
        OverlayTransition { from, to }
    }

    fn unchanged(&self) -> OverlayTransition {
        OverlayTransition {
            from: self.active,
            to: self.active,
        }
    }
}

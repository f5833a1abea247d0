//! Placeholder styling for participants without video.

mod core;

pub use self::core::{
    AvatarColor, AvatarStyle, PALETTE, TextTone, avatar_for, char_code_sum, color_for, initials,
    text_tone_for,
};

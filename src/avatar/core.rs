use serde::Serialize;

/// Material accent hues used for avatar backgrounds.
pub const PALETTE: [&str; 8] = [
    "#FF5252", // red A200
    "#FF4081", // pink A200
    "#E040FB", // purple A200
    "#7C4DFF", // deep purple A200
    "#448AFF", // blue A200
    "#18FFFF", // cyan A200
    "#69F0AE", // green A200
    "#FFAB40", // orange A200
];

/// Sum of UTF-16 code units, matching how the id is hashed on every other
/// client so colours agree across devices. Accumulates in `u64`, which
/// long ids cannot overflow.
pub fn char_code_sum(id: &str) -> u64 {
    id.encode_utf16().map(u64::from).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvatarColor {
    pub hex: &'static str,
    /// Hue derived from the same hash, used for the text-tone heuristic.
    pub hue: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTone {
    Light,
    Dark,
}

pub fn color_for(participant_id: &str) -> AvatarColor {
    let sum = char_code_sum(participant_id);
    AvatarColor {
        hex: PALETTE[(sum % PALETTE.len() as u64) as usize],
        hue: (sum % 360) as u16,
    }
}

/// Dark text on warm/green hues, light text elsewhere. This is a hue range
/// check, not a luminance contrast computation.
pub fn text_tone_for(color: AvatarColor) -> TextTone {
    tone_for_hue(color.hue)
}

fn tone_for_hue(hue: u16) -> TextTone {
    if hue > 30 && hue < 190 {
        TextTone::Dark
    } else {
        TextTone::Light
    }
}

/// First letter of up to two words, uppercased. `?` for blank names.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

/// Everything needed to draw a placeholder tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarStyle {
    pub color: AvatarColor,
    pub text: TextTone,
    pub initials: String,
}

pub fn avatar_for(participant_id: &str, display_name: &str) -> AvatarStyle {
    let color = color_for(participant_id);
    AvatarStyle {
        color,
        text: text_tone_for(color),
        initials: initials(display_name),
    }
}

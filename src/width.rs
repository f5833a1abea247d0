//! Display width helpers for tile labels.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal-style display width of `text` (wide glyphs count as two).
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate `text` so it fits `max_width` columns, appending an ellipsis
/// when anything was cut. Returns the input untouched when it already fits.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

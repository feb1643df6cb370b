//! Display width of styled text.

use unicode_display_width::width as display_width_impl;

use crate::strip::{StripMode, Stripper};

/// Terminal columns taken by `text` once escape sequences are removed.
pub fn visible_width(text: &str) -> usize {
    let stripped = Stripper::new(StripMode::Escaped).strip(text);
    display_width_impl(&stripped.text) as usize
}

/// Terminal columns taken by markup `text` once rendered.
pub fn markup_width(text: &str) -> usize {
    let stripped = Stripper::new(StripMode::Markup).strip(text);
    display_width_impl(&stripped.text) as usize
}

//! Inline bracket markup compiled to ANSI escape sequences.
//!
//! # Overview
//!
//! Markup uses square brackets for style tags:
//!
//! - `[b]text` - bold from here on
//! - `[red](text)` - red for the parenthesized text only, then restored
//! - `[b | bg:#224]text` - several keys in one tag, separated by `|`
//! - `[_]`, `[_b]`, `[_color]` - reset everything, bold, or the text color
//! - `[/red]` - escaped, shown as the literal `[red]`
//!
//! Brackets that do not form a valid tag are written out as they are, so
//! rendering never fails on its input.
//!
//! A group's closing `)` is searched skipping quoted text. Quotes pair with
//! the next identical quote anywhere after them, so ordinary apostrophes in
//! two separate groups can pair up: `[b](it's) and [i](it's)` makes the
//! first group end at the last `)`. Groups nest up to
//! [`parser::MAX_GROUP_DEPTH`] deep; deeper parentheses are plain text.
//!
//! # Usage
//!
//! ```
//! use fmtcodes::{escape_markup, render, strip_escaped, strip_markup};
//!
//! let ansi = render("[red](A[b](B)C)");
//! assert_eq!(ansi, "\x1b[31mA\x1b[1mB\x1b[22mC\x1b[0m");
//!
//! assert_eq!(strip_escaped(&ansi).text, "ABC");
//! assert_eq!(strip_markup("[red](A[b](B)C)").text, "ABC");
//! assert_eq!(render(&escape_markup("[red]x")), "[red]x");
//! ```
//!
//! [`Renderer`] and [`Stripper`] carry the configurable forms of these
//! operations, such as a default text color or removal reports.

pub mod color;
pub mod error;
pub mod parser;
pub mod patterns;
pub mod render;
pub mod strip;
pub mod style;
pub mod width;

mod escape;

// Re-export main types at crate root
pub use color::{AnsiColor, Color, Hsla, Layer, Rgba};
pub use error::{ColorParseError, FormatError};
pub use escape::{EscapeMarker, escape_ansi};
pub use render::Renderer;
pub use strip::{Removal, StripMode, Stripped, Stripper};
pub use style::{Attributes, StyleStack, StyleState};
pub use width::{markup_width, visible_width};

/// Renders markup with the default configuration.
///
/// Without a default color there is nothing to validate, so this cannot
/// fail.
pub fn render(text: &str) -> String {
    Renderer::new().render_markup(text)
}

/// Removes markup tags, keeping the text they style.
///
/// Removal positions, when reported through [`Stripper`], are byte offsets
/// into `text`.
pub fn strip_markup(text: &str) -> Stripped {
    Stripper::new(StripMode::Markup).strip(text)
}

/// Removes ANSI escape sequences.
///
/// Removal positions, when reported through [`Stripper`], are byte offsets
/// into `text`.
pub fn strip_escaped(text: &str) -> Stripped {
    Stripper::new(StripMode::Escaped).strip(text)
}

/// Escapes every tag in `text` so that [`render`] reproduces it verbatim.
pub fn escape_markup(text: &str) -> String {
    Renderer::new().escape(text)
}

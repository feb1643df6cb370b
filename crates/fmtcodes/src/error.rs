//! Error types for the markup compiler.
//!
//! Malformed markup is never an error: unknown keys, unmatched brackets and
//! stray quotes all degrade to literal text. The types here cover the
//! API surface only, where a caller hands over a value that is structurally
//! wrong.

use thiserror::Error;

/// Errors that can occur when parsing or validating a color value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColorParseError {
    /// Invalid hex color format.
    #[error("invalid hex color: {0} (expected #RGB, #RGBA, #RRGGBB or #RRGGBBAA)")]
    InvalidHex(String),

    /// Invalid RGB color format.
    #[error("invalid RGB color: {0} (expected rgb(r, g, b) or rgba(r, g, b, a))")]
    InvalidRgb(String),

    /// Invalid HSL color format.
    #[error("invalid HSL color: {0} (expected hsl(h, s, l) or hsla(h, s, l, a))")]
    InvalidHsl(String),

    /// A channel value outside of its allowed range.
    #[error("{channel} channel out of range: {value} (expected {expected})")]
    OutOfRange {
        /// Channel name, e.g. `"alpha"`.
        channel: &'static str,
        /// The offending value as written.
        value: String,
        /// Human readable range, e.g. `"0.0-1.0"`.
        expected: &'static str,
    },

    /// Input that matches none of the accepted color syntaxes.
    #[error("unrecognized color: {0}")]
    UnknownFormat(String),
}

/// Errors returned by the rendering API.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    /// The explicitly configured default color failed validation.
    #[error("invalid default color {value}: {source}")]
    InvalidDefaultColor {
        /// The color as it was passed in.
        value: String,
        /// Why it was rejected.
        #[source]
        source: ColorParseError,
    },
}

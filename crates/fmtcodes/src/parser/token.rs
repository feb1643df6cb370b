//! Resolution of tag bodies into style tokens.
//!
//! A tag body holds one or more keys separated by `|`. Each key is
//! normalized (whitespace removed, lowercased) and resolved on its own, so a
//! body like `b | bg:#224 | italic` yields three tokens applied left to
//! right.

use phf::phf_map;

use crate::color::{self, AnsiColor, Color, EXTENDED_COLORS, Hsla, Layer, Rgba};
use crate::patterns::{self, Pattern};
use crate::style::Attributes;

/// Separator between keys in a tag body.
pub const KEY_SEPARATOR: char = '|';

/// Modifier keywords, long and short forms.
pub static MODIFIERS: phf::Map<&'static str, Attributes> = phf_map! {
    "bold" => Attributes::BOLD,
    "b" => Attributes::BOLD,
    "dim" => Attributes::DIM,
    "d" => Attributes::DIM,
    "italic" => Attributes::ITALIC,
    "i" => Attributes::ITALIC,
    "underline" => Attributes::UNDERLINE,
    "u" => Attributes::UNDERLINE,
    "blink" => Attributes::BLINK,
    "inverse" => Attributes::INVERSE,
    "invert" => Attributes::INVERSE,
    "in" => Attributes::INVERSE,
    "hidden" => Attributes::HIDDEN,
    "hide" => Attributes::HIDDEN,
    "h" => Attributes::HIDDEN,
    "strikethrough" => Attributes::STRIKE,
    "strike" => Attributes::STRIKE,
    "s" => Attributes::STRIKE,
    "double-underline" => Attributes::DOUBLE_UNDERLINE,
    "du" => Attributes::DOUBLE_UNDERLINE,
};

/// A modifier directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modifier {
    /// Switch attributes on.
    Enable(Attributes),
    /// Switch attributes off (`_bold`, `_u`, ...).
    Disable(Attributes),
    /// Return a layer to the terminal default (`_color`, `_bg`).
    ClearColor(Layer),
}

/// One resolved key of a tag body.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleToken {
    /// Palette or extended color name.
    NamedColor { layer: Layer, color: Color },
    /// `#RGB`, `#RRGGBB`, `#RGBA`, `#RRGGBBAA`.
    HexColor { layer: Layer, color: Rgba },
    /// `rgb(...)`, `rgba(...)`, `(r,g,b)` or `r,g,b`.
    RgbColor { layer: Layer, color: Rgba },
    /// `hsl(...)` or `hsla(...)`.
    HslColor { layer: Layer, color: Hsla },
    Modifier(Modifier),
    /// `default`, the configured default color.
    DefaultColor { layer: Layer, color: Rgba },
    /// `*`
    DefaultColorReset,
    /// `_`
    FullReset,
    /// A key that matches no syntax, kept as written.
    Unknown(String),
}

/// Resolves tag bodies.
///
/// # Examples
///
/// ```
/// use fmtcodes::parser::{Resolver, StyleToken};
///
/// let tokens = Resolver::new().resolve("b | _");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[1], StyleToken::FullReset);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Resolver {
    default_color: Option<Rgba>,
    skip_validation: bool,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the `default` key, resolving to `color`.
    pub fn with_default_color(mut self, color: Option<Rgba>) -> Self {
        self.default_color = color;
        self
    }

    /// Clamp out-of-range color channels instead of rejecting the key.
    pub fn skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    /// Resolves every non-empty key of `body`, in order.
    pub fn resolve(&self, body: &str) -> Vec<StyleToken> {
        body.split(KEY_SEPARATOR)
            .map(color::normalize)
            .filter(|key| !key.is_empty())
            .map(|key| self.resolve_key(&key))
            .collect()
    }

    /// The tokens of a tag that is to be applied, or `None` if the tag must
    /// be shown literally: no keys at all, or any key unknown.
    pub fn directives(&self, body: &str) -> Option<Vec<StyleToken>> {
        let tokens = self.resolve(body);
        if tokens.is_empty() {
            return None;
        }
        if let Some(StyleToken::Unknown(key)) = tokens.iter().find(|t| matches!(t, StyleToken::Unknown(_))) {
            log::trace!("unknown key {key:?} in tag [{body}], keeping it as text");
            return None;
        }
        Some(tokens)
    }

    fn resolve_key(&self, key: &str) -> StyleToken {
        match key {
            "_" => return StyleToken::FullReset,
            "*" => return StyleToken::DefaultColorReset,
            _ => {}
        }
        if let Some(&attrs) = MODIFIERS.get(key) {
            return StyleToken::Modifier(Modifier::Enable(attrs));
        }
        if let Some(name) = key.strip_prefix('_') {
            if let Some(modifier) = Self::specific_reset(name) {
                return StyleToken::Modifier(modifier);
            }
        }

        let (layer, value) = match key
            .strip_prefix("bg:")
            .or_else(|| key.strip_prefix("background:"))
        {
            Some(value) => (Layer::Background, value),
            None => (Layer::Foreground, key),
        };
        self.resolve_color(layer, value)
            .unwrap_or_else(|| StyleToken::Unknown(key.to_string()))
    }

    fn specific_reset(name: &str) -> Option<Modifier> {
        match name {
            "color" | "c" => Some(Modifier::ClearColor(Layer::Foreground)),
            "background" | "bg" => Some(Modifier::ClearColor(Layer::Background)),
            _ => MODIFIERS.get(name).map(|&attrs| Modifier::Disable(attrs)),
        }
    }

    fn resolve_color(&self, layer: Layer, value: &str) -> Option<StyleToken> {
        if value == "default" {
            return self
                .default_color
                .map(|color| StyleToken::DefaultColor { layer, color });
        }

        let (bright, name) = match value
            .strip_prefix("bright:")
            .or_else(|| value.strip_prefix("br:"))
        {
            Some(name) => (true, name),
            None => (false, value),
        };
        if let Some(ansi) = AnsiColor::from_name(name) {
            let color = Color::Ansi { color: ansi, bright };
            return Some(StyleToken::NamedColor { layer, color });
        }
        if bright {
            return None;
        }
        if let Some(&(r, g, b)) = EXTENDED_COLORS.get(value) {
            let color = Color::Rgb(Rgba::rgb(r, g, b));
            return Some(StyleToken::NamedColor { layer, color });
        }

        let validate = !self.skip_validation;
        match color::parse_hex(value) {
            Ok(Some(color)) => return Some(StyleToken::HexColor { layer, color }),
            Ok(None) => {}
            Err(_) => return None,
        }
        if layer == Layer::Foreground && patterns::get(Pattern::ShorthandModifiers).is_match(value) {
            let attrs = (0..value.len())
                .filter_map(|i| MODIFIERS.get(&value[i..=i]))
                .fold(Attributes::empty(), |acc, &attrs| acc | attrs);
            return Some(StyleToken::Modifier(Modifier::Enable(attrs)));
        }
        if value.starts_with("hsl") {
            return Hsla::parse_literal(value, validate)
                .ok()
                .map(|color| StyleToken::HslColor { layer, color });
        }
        color::parse_rgb(value, validate)
            .ok()
            .map(|color| StyleToken::RgbColor { layer, color })
    }
}

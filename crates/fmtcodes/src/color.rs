//! Color values for markup keys.
//!
//! Two families live here:
//!
//! - [`Rgba`] and [`Hsla`] are the resolved literal colors (hex, `rgb(...)`,
//!   `hsl(...)`). Alpha is optional so an explicit `0.0` stays distinct from
//!   "no alpha given" through every conversion.
//! - [`Color`] is what ends up in a style state: either a terminal palette
//!   color ([`AnsiColor`], optionally bright) or a 24-bit [`Rgba`].

use std::fmt;
use std::str::FromStr;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, terminated, tuple},
};
use phf::phf_map;

use crate::error::ColorParseError;
use crate::patterns::{self, Pattern};

/// Which layer of a cell a color applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Text color.
    Foreground,
    /// Cell background.
    Background,
}

/// An RGB color with optional alpha.
///
/// Channels are 0-255. Alpha, when present, is 0.0-1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha (0.0 = transparent, 1.0 = opaque), `None` if never specified.
    pub a: Option<f32>,
}

impl Rgba {
    /// Creates an opaque color without an alpha channel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    /// Creates a color with an explicit alpha channel.
    ///
    /// The alpha is stored as given; call [`Rgba::validate`] to check it.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Alpha value, treating a missing channel as fully opaque.
    pub fn alpha(&self) -> f32 {
        self.a.unwrap_or(1.0)
    }

    /// Checks that the alpha channel (if any) lies within 0.0-1.0.
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError::OutOfRange`] naming the alpha value.
    pub fn validate(&self) -> Result<(), ColorParseError> {
        match self.a {
            Some(a) if !(0.0..=1.0).contains(&a) => Err(ColorParseError::OutOfRange {
                channel: "alpha",
                value: a.to_string(),
                expected: "0.0-1.0",
            }),
            _ => Ok(()),
        }
    }

    /// Converts to HSL, carrying the alpha channel over unchanged.
    pub fn to_hsla(&self) -> Hsla {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        Hsla {
            h: ((h * 360.0).round() as u16) % 360,
            s: (s * 100.0).round() as u8,
            l: (l * 100.0).round() as u8,
            a: self.a,
        }
    }

    /// Formats as `#RRGGBB`, or `#RRGGBBAA` when alpha is present.
    pub fn to_hex(&self) -> String {
        match self.a {
            Some(a) => format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r,
                self.g,
                self.b,
                (a.clamp(0.0, 1.0) * 255.0).round() as u8
            ),
            None => format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b),
        }
    }

    /// Parses any accepted literal syntax.
    ///
    /// With `validate` unset, out-of-range channels are clamped instead of
    /// rejected. Syntax is still checked.
    pub(crate) fn parse_literal(input: &str, validate: bool) -> Result<Self, ColorParseError> {
        let key = normalize(input);

        if let Some(color) = parse_hex(&key)? {
            return Ok(color);
        }
        if key.starts_with("hsl") {
            return Ok(Hsla::parse_literal(&key, validate)?.to_rgba());
        }
        if let Ok((_, channels)) = all_consuming(rgb_literal)(key.as_str()) {
            return rgb_from_channels(channels, validate);
        }
        if let Some(&(r, g, b)) = EXTENDED_COLORS.get(key.as_str()) {
            return Ok(Self::rgb(r, g, b));
        }

        Err(ColorParseError::UnknownFormat(input.trim().to_string()))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            Some(a) => write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, a),
            None => write!(f, "rgb({}, {}, {})", self.r, self.g, self.b),
        }
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    /// Parses hex (`#RGB`, `#RRGGBB`, `0x...`, with or without alpha),
    /// `rgb(...)`/`rgba(...)`, `hsl(...)`/`hsla(...)` and extended color names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_literal(s, true)
    }
}

impl From<Hsla> for Rgba {
    fn from(hsla: Hsla) -> Self {
        hsla.to_rgba()
    }
}

/// An HSL color with optional alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    /// Hue in degrees (0-360).
    pub h: u16,
    /// Saturation in percent (0-100).
    pub s: u8,
    /// Lightness in percent (0-100).
    pub l: u8,
    /// Alpha (0.0-1.0), `None` if never specified.
    pub a: Option<f32>,
}

impl Hsla {
    /// Checks hue, saturation, lightness and alpha ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError::OutOfRange`] for the first channel that
    /// falls outside its range.
    pub fn validate(&self) -> Result<(), ColorParseError> {
        if self.h > 360 {
            return Err(out_of_range("hue", self.h, "0-360"));
        }
        if self.s > 100 {
            return Err(out_of_range("saturation", self.s, "0-100"));
        }
        if self.l > 100 {
            return Err(out_of_range("lightness", self.l, "0-100"));
        }
        match self.a {
            Some(a) if !(0.0..=1.0).contains(&a) => Err(out_of_range("alpha", a, "0.0-1.0")),
            _ => Ok(()),
        }
    }

    /// Converts to RGB, carrying the alpha channel over unchanged.
    pub fn to_rgba(&self) -> Rgba {
        let h = f32::from(self.h % 360) / 360.0;
        let s = f32::from(self.s.min(100)) / 100.0;
        let l = f32::from(self.l.min(100)) / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Rgba {
            r: (r * 255.0).round() as u8,
            g: (g * 255.0).round() as u8,
            b: (b * 255.0).round() as u8,
            a: self.a,
        }
    }

    pub(crate) fn parse_literal(key: &str, validate: bool) -> Result<Self, ColorParseError> {
        let (_, (h, s, l, a)) =
            all_consuming(hsl_literal)(key).map_err(|_| ColorParseError::InvalidHsl(key.to_string()))?;

        if validate {
            let hsla = Hsla {
                h: u16::try_from(h).map_err(|_| out_of_range("hue", h, "0-360"))?,
                s: u8::try_from(s).map_err(|_| out_of_range("saturation", s, "0-100"))?,
                l: u8::try_from(l).map_err(|_| out_of_range("lightness", l, "0-100"))?,
                a,
            };
            hsla.validate()?;
            Ok(hsla)
        } else {
            Ok(Hsla {
                h: h.min(360) as u16,
                s: s.min(100) as u8,
                l: l.min(100) as u8,
                a: a.map(|a| a.clamp(0.0, 1.0)),
            })
        }
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            Some(a) => write!(f, "hsla({}, {}%, {}%, {})", self.h, self.s, self.l, a),
            None => write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l),
        }
    }
}

impl FromStr for Hsla {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_literal(&normalize(s), true)
    }
}

impl From<Rgba> for Hsla {
    fn from(rgba: Rgba) -> Self {
        rgba.to_hsla()
    }
}

/// The eight standard terminal palette colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiColor {
    /// Looks up a palette color by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            _ => return None,
        };
        Some(color)
    }

    /// Palette index (0-7).
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A color as held by a style state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    /// Palette color, emitted as a 30-37/90-97 (or 40-47/100-107) code.
    Ansi { color: AnsiColor, bright: bool },
    /// 24-bit color, emitted as `38;2;r;g;b` (or `48;2;...`). Alpha is not
    /// representable on a terminal and is ignored on output.
    Rgb(Rgba),
}

impl Color {
    /// Appends the SGR parameters selecting this color on `layer`.
    pub(crate) fn push_params(&self, layer: Layer, params: &mut Vec<u8>) {
        match (self, layer) {
            (Color::Ansi { color, bright }, Layer::Foreground) => {
                params.push((if *bright { 90 } else { 30 }) + color.index());
            }
            (Color::Ansi { color, bright }, Layer::Background) => {
                params.push((if *bright { 100 } else { 40 }) + color.index());
            }
            (Color::Rgb(rgba), Layer::Foreground) => {
                params.extend([38, 2, rgba.r, rgba.g, rgba.b]);
            }
            (Color::Rgb(rgba), Layer::Background) => {
                params.extend([48, 2, rgba.r, rgba.g, rgba.b]);
            }
        }
    }
}

impl From<Rgba> for Color {
    fn from(rgba: Rgba) -> Self {
        Color::Rgb(rgba)
    }
}

/// Named colors beyond the terminal palette, rendered as 24-bit colors.
pub static EXTENDED_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "gray" => (128, 128, 128),
    "grey" => (128, 128, 128),
    "silver" => (192, 192, 192),
    "maroon" => (128, 0, 0),
    "olive" => (128, 128, 0),
    "navy" => (0, 0, 128),
    "purple" => (128, 0, 128),
    "teal" => (0, 128, 128),
    "lime" => (0, 255, 0),
    "orange" => (255, 165, 0),
    "pink" => (255, 192, 203),
    "brown" => (165, 42, 42),
    "coral" => (255, 127, 80),
    "gold" => (255, 215, 0),
    "indigo" => (75, 0, 130),
    "violet" => (238, 130, 238),
    "crimson" => (220, 20, 60),
    "tomato" => (255, 99, 71),
    "salmon" => (250, 128, 114),
    "turquoise" => (64, 224, 208),
    "skyblue" => (135, 206, 235),
    "lavender" => (230, 230, 250),
    "chocolate" => (210, 105, 30),
    "khaki" => (240, 230, 140),
};

/// Lowercases and removes all whitespace, the canonical form of a key.
pub(crate) fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parses a normalized hex key. `Ok(None)` means "not hex syntax at all".
pub(crate) fn parse_hex(key: &str) -> Result<Option<Rgba>, ColorParseError> {
    let Some(caps) = patterns::get(Pattern::HexColor).captures(key) else {
        return Ok(None);
    };
    let digits = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default();

    let invalid = |_: std::num::ParseIntError| ColorParseError::InvalidHex(key.to_string());
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map(|v| v * 17).map_err(invalid);
    let pair = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(invalid);

    let color = match digits.len() {
        3 => Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?),
        4 => Rgba::rgba(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            f32::from(nibble(3)?) / 255.0,
        ),
        6 => Rgba::rgb(pair(0)?, pair(2)?, pair(4)?),
        8 => Rgba::rgba(pair(0)?, pair(2)?, pair(4)?, f32::from(pair(6)?) / 255.0),
        _ => return Err(ColorParseError::InvalidHex(key.to_string())),
    };
    Ok(Some(color))
}

/// Parses a normalized `rgb(...)` key.
pub(crate) fn parse_rgb(key: &str, validate: bool) -> Result<Rgba, ColorParseError> {
    let (_, channels) =
        all_consuming(rgb_literal)(key).map_err(|_| ColorParseError::InvalidRgb(key.to_string()))?;
    rgb_from_channels(channels, validate)
}

type Channels = (u32, u32, u32, Option<f32>);

fn rgb_from_channels((r, g, b, a): Channels, validate: bool) -> Result<Rgba, ColorParseError> {
    if validate {
        let channel = |name, value: u32| {
            u8::try_from(value).map_err(|_| out_of_range(name, value, "0-255"))
        };
        let color = Rgba {
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
            a,
        };
        color.validate()?;
        Ok(color)
    } else {
        Ok(Rgba {
            r: r.min(255) as u8,
            g: g.min(255) as u8,
            b: b.min(255) as u8,
            a: a.map(|a| a.clamp(0.0, 1.0)),
        })
    }
}

fn out_of_range(channel: &'static str, value: impl fmt::Display, expected: &'static str) -> ColorParseError {
    ColorParseError::OutOfRange {
        channel,
        value: value.to_string(),
        expected,
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Parse an integer channel value.
fn channel(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

/// Parse an alpha value such as `1`, `0.5`, `.25` or `1.`.
fn alpha(input: &str) -> IResult<&str, f32> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        |s: &str| s.parse::<f32>(),
    )(input)
}

fn rgb_channels(input: &str) -> IResult<&str, Channels> {
    tuple((
        channel,
        preceded(char(','), channel),
        preceded(char(','), channel),
        opt(preceded(char(','), alpha)),
    ))(input)
}

/// `rgb(r,g,b)`, `rgba(r,g,b,a)`, `(r,g,b)` or bare `r,g,b`.
fn rgb_literal(input: &str) -> IResult<&str, Channels> {
    preceded(
        opt(alt((tag("rgba"), tag("rgb")))),
        alt((delimited(char('('), rgb_channels, char(')')), rgb_channels)),
    )(input)
}

fn hsl_channels(input: &str) -> IResult<&str, Channels> {
    tuple((
        terminated(channel, opt(char('°'))),
        preceded(char(','), terminated(channel, opt(char('%')))),
        preceded(char(','), terminated(channel, opt(char('%')))),
        opt(preceded(char(','), alpha)),
    ))(input)
}

/// `hsl(h,s,l)` or `hsla(h,s,l,a)`, parentheses optional.
fn hsl_literal(input: &str) -> IResult<&str, Channels> {
    preceded(
        alt((tag("hsla"), tag("hsl"))),
        alt((delimited(char('('), hsl_channels, char(')')), hsl_channels)),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_short() {
        assert_eq!("#f00".parse::<Rgba>().unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!("0x0f0".parse::<Rgba>().unwrap(), Rgba::rgb(0, 255, 0));
        assert_eq!("00F".parse::<Rgba>().unwrap(), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn parse_hex_long() {
        assert_eq!("#7788FF".parse::<Rgba>().unwrap(), Rgba::rgb(0x77, 0x88, 0xFF));
        assert_eq!("7788ff".parse::<Rgba>().unwrap(), Rgba::rgb(0x77, 0x88, 0xFF));
    }

    #[test]
    fn parse_hex_alpha_requires_prefix() {
        let color = "#ff000080".parse::<Rgba>().unwrap();
        assert_eq!((color.r, color.g, color.b), (255, 0, 0));
        assert!((color.alpha() - 128.0 / 255.0).abs() < 1e-6);

        assert!("ff000080".parse::<Rgba>().is_err());
    }

    #[test]
    fn parse_rgb_forms() {
        let expected = Rgba::rgb(255, 0, 136);
        assert_eq!("rgb(255, 0, 136)".parse::<Rgba>().unwrap(), expected);
        assert_eq!("(255, 0, 136)".parse::<Rgba>().unwrap(), expected);
        assert_eq!("255,0,136".parse::<Rgba>().unwrap(), expected);
        assert_eq!(
            "rgba(1, 2, 3, 0.5)".parse::<Rgba>().unwrap(),
            Rgba::rgba(1, 2, 3, 0.5)
        );
    }

    #[test]
    fn parse_rgb_out_of_range() {
        let err = "rgb(256, 0, 0)".parse::<Rgba>().unwrap_err();
        assert!(matches!(err, ColorParseError::OutOfRange { channel: "red", .. }));

        let err = "rgba(0, 0, 0, 1.5)".parse::<Rgba>().unwrap_err();
        assert!(matches!(err, ColorParseError::OutOfRange { channel: "alpha", .. }));
    }

    #[test]
    fn skip_validation_clamps() {
        let color = Rgba::parse_literal("rgba(300, 0, 0, 2)", false).unwrap();
        assert_eq!(color, Rgba::rgba(255, 0, 0, 1.0));
    }

    #[test]
    fn parse_hsl() {
        let hsla = "hsl(0, 100%, 50%)".parse::<Hsla>().unwrap();
        assert_eq!(hsla.to_rgba(), Rgba::rgb(255, 0, 0));

        let rgba = "hsla(120°, 100%, 25%, 0.3)".parse::<Rgba>().unwrap();
        assert_eq!((rgba.r, rgba.g, rgba.b), (0, 128, 0));
        assert_eq!(rgba.a, Some(0.3));
    }

    #[test]
    fn zero_alpha_survives_conversions() {
        let rgba = Rgba::rgba(10, 20, 30, 0.0);
        let hsla = rgba.to_hsla();
        assert_eq!(hsla.a, Some(0.0));
        assert_eq!(hsla.to_rgba().a, Some(0.0));

        let opaque = Rgba::rgb(10, 20, 30);
        assert_eq!(opaque.to_hsla().a, None);
    }

    #[test]
    fn rgb_hsl_roundtrip_primary() {
        let blue = Rgba::rgb(0, 0, 255);
        let hsla = blue.to_hsla();
        assert_eq!((hsla.h, hsla.s, hsla.l), (240, 100, 50));
        assert_eq!(hsla.to_rgba(), blue);
    }

    #[test]
    fn display_and_hex() {
        assert_eq!(Rgba::rgb(1, 2, 3).to_string(), "rgb(1, 2, 3)");
        assert_eq!(Rgba::rgba(1, 2, 3, 0.0).to_string(), "rgba(1, 2, 3, 0)");
        assert_eq!(Rgba::rgb(255, 0, 136).to_hex(), "#FF0088");
        assert_eq!(Rgba::rgba(255, 0, 136, 1.0).to_hex(), "#FF0088FF");
    }

    #[test]
    fn extended_names() {
        assert_eq!("Orange".parse::<Rgba>().unwrap(), Rgba::rgb(255, 165, 0));
        assert!("notacolor".parse::<Rgba>().is_err());
    }

    #[test]
    fn palette_params() {
        let mut params = Vec::new();
        Color::Ansi { color: AnsiColor::Red, bright: false }.push_params(Layer::Foreground, &mut params);
        Color::Ansi { color: AnsiColor::Blue, bright: true }.push_params(Layer::Background, &mut params);
        Color::Rgb(Rgba::rgb(1, 2, 3)).push_params(Layer::Foreground, &mut params);
        assert_eq!(params, vec![31, 104, 38, 2, 1, 2, 3]);
    }
}

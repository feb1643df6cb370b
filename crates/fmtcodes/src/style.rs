//! Style state and the SGR transitions between states.
//!
//! A [`StyleState`] is the full set of active attributes at one point in the
//! output. The emitter never writes a state directly; it asks for the
//! transition from what the terminal currently shows to the state it wants,
//! and [`StyleState::transition_to`] returns the shortest parameter list that
//! gets there.

use bitflags::bitflags;

use crate::color::{Color, Layer};
use crate::parser::{Modifier, StyleToken};

bitflags! {
    /// Boolean text attributes.
    ///
    /// # Example
    ///
    /// ```
    /// use fmtcodes::Attributes;
    ///
    /// let attrs = Attributes::BOLD | Attributes::UNDERLINE;
    /// assert!(attrs.contains(Attributes::BOLD));
    /// assert!(!attrs.contains(Attributes::ITALIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u16 {
        /// Bold / increased intensity
        const BOLD             = 1 << 0;
        /// Dim / decreased intensity
        const DIM              = 1 << 1;
        const ITALIC           = 1 << 2;
        const UNDERLINE        = 1 << 3;
        const BLINK            = 1 << 4;
        /// Swapped foreground and background
        const INVERSE          = 1 << 5;
        const HIDDEN           = 1 << 6;
        const STRIKE           = 1 << 7;
        const DOUBLE_UNDERLINE = 1 << 8;
    }
}

/// Attribute groups that share a single "off" code, with that code.
const OFF_CODES: [(Attributes, u8); 7] = [
    (Attributes::BOLD.union(Attributes::DIM), 22),
    (Attributes::ITALIC, 23),
    (Attributes::UNDERLINE.union(Attributes::DOUBLE_UNDERLINE), 24),
    (Attributes::BLINK, 25),
    (Attributes::INVERSE, 27),
    (Attributes::HIDDEN, 28),
    (Attributes::STRIKE, 29),
];

/// SGR code switching each single attribute on.
const ON_CODES: [(Attributes, u8); 9] = [
    (Attributes::BOLD, 1),
    (Attributes::DIM, 2),
    (Attributes::ITALIC, 3),
    (Attributes::UNDERLINE, 4),
    (Attributes::BLINK, 5),
    (Attributes::INVERSE, 7),
    (Attributes::HIDDEN, 8),
    (Attributes::STRIKE, 9),
    (Attributes::DOUBLE_UNDERLINE, 21),
];

impl Attributes {
    /// SGR code that switches a single attribute on.
    fn on_code(self) -> Option<u8> {
        ON_CODES
            .iter()
            .find(|(attr, _)| *attr == self)
            .map(|&(_, code)| code)
    }
}

/// The complete set of attributes active at one point of the output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleState {
    /// Foreground (text) color, `None` for the terminal default.
    pub fg: Option<Color>,
    /// Background color, `None` for the terminal default.
    pub bg: Option<Color>,
    /// Boolean text attributes.
    pub attrs: Attributes,
}

impl StyleState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state with only a foreground color set.
    pub fn with_fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }

    /// Returns true if no attribute is set.
    pub fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_empty()
    }

    /// Applies resolved tokens left to right, returning the new state.
    ///
    /// Later tokens override earlier ones touching the same attribute.
    /// `base` is what a default-color reset (`*`) returns to.
    pub fn merged(&self, tokens: &[StyleToken], base: &StyleState) -> StyleState {
        let mut state = self.clone();
        for token in tokens {
            state.apply(token, base);
        }
        state
    }

    fn apply(&mut self, token: &StyleToken, base: &StyleState) {
        match token {
            StyleToken::NamedColor { layer, color } => self.set_color(*layer, Some(*color)),
            StyleToken::HexColor { layer, color } | StyleToken::RgbColor { layer, color } => {
                self.set_color(*layer, Some(Color::Rgb(*color)));
            }
            StyleToken::HslColor { layer, color } => {
                self.set_color(*layer, Some(Color::Rgb(color.to_rgba())));
            }
            StyleToken::DefaultColor { layer, color } => {
                self.set_color(*layer, Some(Color::Rgb(*color)));
            }
            StyleToken::Modifier(Modifier::Enable(attrs)) => self.attrs.insert(*attrs),
            StyleToken::Modifier(Modifier::Disable(attrs)) => self.attrs.remove(*attrs),
            StyleToken::Modifier(Modifier::ClearColor(layer)) => self.set_color(*layer, None),
            StyleToken::DefaultColorReset => *self = base.clone(),
            StyleToken::FullReset => *self = StyleState::default(),
            StyleToken::Unknown(_) => {}
        }
    }

    fn set_color(&mut self, layer: Layer, color: Option<Color>) {
        match layer {
            Layer::Foreground => self.fg = color,
            Layer::Background => self.bg = color,
        }
    }

    fn color_params(&self, layer: Layer) -> Vec<u8> {
        let (color, reset) = match layer {
            Layer::Foreground => (self.fg, 39),
            Layer::Background => (self.bg, 49),
        };
        let mut params = Vec::new();
        match color {
            Some(color) => color.push_params(layer, &mut params),
            None => params.push(reset),
        }
        params
    }

    /// Parameters that build this state up from the default state.
    pub fn params(&self) -> Vec<u8> {
        let mut params: Vec<u8> = self.attrs.iter().filter_map(Attributes::on_code).collect();
        if let Some(fg) = self.fg {
            fg.push_params(Layer::Foreground, &mut params);
        }
        if let Some(bg) = self.bg {
            bg.push_params(Layer::Background, &mut params);
        }
        params
    }

    /// Attribute-by-attribute difference from `self` to `target`.
    fn diff_params(&self, target: &StyleState) -> Vec<u8> {
        let removed = self.attrs.difference(target.attrs);
        let mut enable = target.attrs.difference(self.attrs);
        let mut params = Vec::new();

        for (group, off) in OFF_CODES {
            if removed.intersects(group) {
                params.push(off);
                // The shared off code also clears siblings that stay on.
                enable |= target.attrs & group;
            }
        }
        params.extend(enable.iter().filter_map(Attributes::on_code));

        for layer in [Layer::Foreground, Layer::Background] {
            let wanted = target.color_params(layer);
            if self.color_params(layer) != wanted {
                params.extend(wanted);
            }
        }
        params
    }

    /// The shortest SGR parameter list turning `self` into `target`.
    ///
    /// Empty when nothing visible changes. Returning to the default state
    /// is always a single `0`; otherwise the attribute diff is compared
    /// against a full reset followed by a rebuild, and the shorter wins.
    pub fn transition_to(&self, target: &StyleState) -> Vec<u8> {
        let diff = self.diff_params(target);
        if diff.is_empty() {
            return diff;
        }
        if target.is_default() {
            return vec![0];
        }

        let mut rebuilt = vec![0];
        rebuilt.extend(target.params());
        if rebuilt.len() < diff.len() { rebuilt } else { diff }
    }
}

/// Writes `ESC [ p1 ; p2 ... m` for a non-empty parameter list.
pub fn write_sgr(out: &mut String, params: &[u8]) {
    if params.is_empty() {
        return;
    }
    out.push_str("\x1b[");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(&param.to_string());
    }
    out.push('m');
}

/// Stack of style snapshots, one frame per entered group.
///
/// The bottom of the stack is the base state of the whole render. Popping a
/// frame restores exactly the state that was current when it was pushed.
#[derive(Clone, Debug, Default)]
pub struct StyleStack {
    base: StyleState,
    frames: Vec<StyleState>,
}

impl StyleStack {
    /// Create a stack whose bottom frame is `base`.
    pub fn new(base: StyleState) -> Self {
        Self {
            base,
            frames: Vec::new(),
        }
    }

    /// The current (top-of-stack) state.
    pub fn current(&self) -> &StyleState {
        self.frames.last().unwrap_or(&self.base)
    }

    /// Replaces the top-of-stack state (a standalone tag).
    pub fn replace(&mut self, state: StyleState) {
        match self.frames.last_mut() {
            Some(top) => *top = state,
            None => self.base = state,
        }
    }

    /// Enters a group whose interior starts in `state`.
    pub fn push(&mut self, state: StyleState) {
        self.frames.push(state);
    }

    /// Leaves the innermost group, returning its final state.
    pub fn pop(&mut self) -> Option<StyleState> {
        self.frames.pop()
    }
}

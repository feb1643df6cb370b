//! The style stack emitter.
//!
//! Walks tokenized markup, keeps one [`StyleState`] per open group, and
//! writes SGR sequences only where the visible style actually changes.
//! Transitions are emitted lazily, right before text that needs them, so
//! tags that cancel out before any text is written cost nothing.

use crate::color::{Color, Rgba};
use crate::error::FormatError;
use crate::escape::{self, EscapeMarker};
use crate::parser::{Group, Resolver, Span, Tag, tokenize};
use crate::style::{StyleStack, StyleState, write_sgr};

/// Converts markup to text with ANSI escape sequences.
///
/// # Examples
///
/// ```
/// use fmtcodes::Renderer;
///
/// let out = Renderer::new().render("[b](bold) plain").unwrap();
/// assert_eq!(out, "\x1b[1mbold\x1b[0m plain");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer {
    default_color: Option<Rgba>,
    skip_validation: bool,
    escape_marker: EscapeMarker,
}

impl Renderer {
    /// Create a renderer without a default color.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text color used at the start of output and restored by `[*]`.
    ///
    /// Also enables the `default` and `bg:default` keys.
    pub fn with_default_color(mut self, color: Rgba) -> Self {
        self.default_color = Some(color);
        self
    }

    /// Skips range checks on the default color and clamps out-of-range
    /// channels in color keys instead of treating them as unknown.
    pub fn skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    /// Sets the marker [`Renderer::escape`] inserts, `/` unless changed.
    pub fn escape_marker(mut self, marker: EscapeMarker) -> Self {
        self.escape_marker = marker;
        self
    }

    pub(crate) fn resolver(&self) -> Resolver {
        Resolver::new()
            .with_default_color(self.default_color)
            .skip_validation(self.skip_validation)
    }

    /// Renders `text`.
    ///
    /// Malformed markup is never an error; it is written out literally.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidDefaultColor`] if the configured
    /// default color fails validation.
    pub fn render(&self, text: &str) -> Result<String, FormatError> {
        if let (Some(color), false) = (self.default_color, self.skip_validation) {
            color.validate().map_err(|source| {
                log::debug!("rejecting default color {color}: {source}");
                FormatError::InvalidDefaultColor {
                    value: color.to_string(),
                    source,
                }
            })?;
        }
        Ok(self.render_markup(text))
    }

    /// Renders `text` without validating the default color.
    pub(crate) fn render_markup(&self, text: &str) -> String {
        let base = match self.default_color {
            Some(color) => StyleState::with_fg(Color::Rgb(color)),
            None => StyleState::new(),
        };
        let spans = tokenize(text);
        let mut emitter = Emitter::new(self.resolver(), base, text.len());
        emitter.start();
        emitter.spans(&spans);
        emitter.finish()
    }

    /// Escapes every tag this renderer would interpret.
    pub fn escape(&self, text: &str) -> String {
        escape::escape_with(&self.resolver(), self.escape_marker, text)
    }
}

struct Emitter {
    resolver: Resolver,
    /// State that `[*]` returns to.
    base: StyleState,
    stack: StyleStack,
    /// What the terminal shows after everything written so far.
    emitted: StyleState,
    out: String,
}

impl Emitter {
    fn new(resolver: Resolver, base: StyleState, capacity: usize) -> Self {
        Self {
            resolver,
            stack: StyleStack::new(base.clone()),
            base,
            emitted: StyleState::new(),
            out: String::with_capacity(capacity),
        }
    }

    fn start(&mut self) {
        if !self.base.is_default() {
            self.flush();
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.out
    }

    fn flush(&mut self) {
        let target = self.stack.current();
        let params = self.emitted.transition_to(target);
        if !params.is_empty() {
            write_sgr(&mut self.out, &params);
            self.emitted = target.clone();
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush();
        self.out.push_str(text);
    }

    fn spans(&mut self, spans: &[Span<'_>]) {
        for span in spans {
            match span {
                Span::Literal(literal) => self.text(literal.text),
                Span::Tag(tag) => self.tag(tag),
                Span::Group(group) => self.group(group),
            }
        }
    }

    fn tag(&mut self, tag: &Tag<'_>) {
        if tag.is_escaped() {
            self.text(&tag.unescaped());
            return;
        }
        match self.resolver.directives(tag.body) {
            Some(tokens) => {
                let next = self.stack.current().merged(&tokens, &self.base);
                self.stack.replace(next);
            }
            None => self.text(tag.text),
        }
    }

    fn group(&mut self, group: &Group<'_>) {
        let tokens = if group.tag.is_escaped() {
            None
        } else {
            self.resolver.directives(group.tag.body)
        };

        match tokens {
            Some(tokens) => {
                let inner = self.stack.current().merged(&tokens, &self.base);
                self.stack.push(inner);
                self.spans(&group.inner);
                self.stack.pop();
            }
            None => {
                self.text(&group.tag.unescaped());
                self.text("(");
                self.spans(&group.inner);
                self.text(")");
            }
        }
    }
}

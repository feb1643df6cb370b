//! Escaping markup so it renders literally, and escape sequences so they
//! print visibly.

use crate::parser::{Resolver, Span, Tag, tokenize};

/// The character inserted right after `[` to escape a tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EscapeMarker {
    /// `[/red]`
    #[default]
    Slash,
    /// `[\red]`
    Backslash,
}

impl EscapeMarker {
    pub fn as_char(self) -> char {
        match self {
            EscapeMarker::Slash => '/',
            EscapeMarker::Backslash => '\\',
        }
    }
}

/// Inserts `marker` into every tag `resolver` would act on.
///
/// Valid tags and tags that are already escaped gain one marker, so
/// rendering the result shows exactly the input. Tags that would render
/// literally anyway are left untouched. Group contents are escaped too.
pub(crate) fn escape_with(resolver: &Resolver, marker: EscapeMarker, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let escaper = Escaper {
        resolver,
        marker: marker.as_char(),
    };
    escaper.spans(&tokenize(text), &mut out);
    out
}

struct Escaper<'r> {
    resolver: &'r Resolver,
    marker: char,
}

impl Escaper<'_> {
    fn spans(&self, spans: &[Span<'_>], out: &mut String) {
        for span in spans {
            match span {
                Span::Literal(literal) => out.push_str(literal.text),
                Span::Tag(tag) => self.tag(tag, out),
                Span::Group(group) => {
                    self.tag(&group.tag, out);
                    out.push('(');
                    self.spans(&group.inner, out);
                    out.push(')');
                }
            }
        }
    }

    fn tag(&self, tag: &Tag<'_>, out: &mut String) {
        if tag.is_escaped() || self.resolver.directives(tag.body).is_some() {
            out.push('[');
            out.push(self.marker);
            out.push_str(&tag.text[1..]);
        } else {
            out.push_str(tag.text);
        }
    }
}

/// Replaces every ESC character with the four characters `\x1b`, so
/// escape sequences show up as text instead of acting on the terminal.
///
/// # Examples
///
/// ```
/// use fmtcodes::{escape_ansi, render};
///
/// assert_eq!(escape_ansi(&render("[b]x")), r"\x1b[1mx");
/// ```
pub fn escape_ansi(text: &str) -> String {
    text.replace('\x1b', r"\x1b")
}

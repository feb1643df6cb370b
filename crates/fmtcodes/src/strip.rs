//! Removing markup or escape sequences from text.
//!
//! Both modes can report what was removed and where, so callers can map
//! positions in the cleaned text back to the original. Positions are byte
//! offsets, not character counts.

use crate::color::Rgba;
use crate::parser::{Group, Resolver, Span, Tag, tokenize};
use crate::patterns::{self, Pattern};

/// What [`Stripper::strip`] removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripMode {
    /// Markup tags and group parentheses. Escaped tags lose their marker.
    Markup,
    /// Already emitted ANSI escape sequences.
    Escaped,
}

/// One removed piece of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal {
    /// Byte offset of the removed text in the original string.
    pub position: usize,
    /// The removed text.
    pub text: String,
}

impl Removal {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Result of a strip.
///
/// Each [`Removal::position`] is a byte offset into the string passed to
/// [`Stripper::strip`]. Convert with `char_indices` before doing width or
/// cursor math on non-ASCII text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    /// Removals in ascending position order, if requested.
    pub removals: Option<Vec<Removal>>,
}

/// Strips markup or escape sequences.
///
/// Reported removal positions are byte offsets into the input.
///
/// # Examples
///
/// ```
/// use fmtcodes::{Removal, StripMode, Stripper};
///
/// let stripped = Stripper::new(StripMode::Markup)
///     .report_removals(true)
///     .strip("[b](hi) there");
/// assert_eq!(stripped.text, "hi there");
/// assert_eq!(stripped.removals.unwrap()[0], Removal::new(0, "[b]"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Stripper {
    mode: StripMode,
    report_removals: bool,
    ignore_line_breaks: bool,
    resolver: Resolver,
}

impl Stripper {
    pub fn new(mode: StripMode) -> Self {
        Self {
            mode,
            report_removals: false,
            ignore_line_breaks: false,
            resolver: Resolver::new(),
        }
    }

    /// Collect a [`Removal`] for every removed piece.
    pub fn report_removals(mut self, report: bool) -> Self {
        self.report_removals = report;
        self
    }

    /// Count positions without line breaks and never remove a line break.
    pub fn ignore_line_breaks(mut self, ignore: bool) -> Self {
        self.ignore_line_breaks = ignore;
        self
    }

    /// Treat `default` keys as valid markup, as a renderer with a default
    /// color does.
    pub fn with_default_color(mut self, color: Rgba) -> Self {
        self.resolver = self.resolver.with_default_color(Some(color));
        self
    }

    pub fn strip(&self, text: &str) -> Stripped {
        let mut collector = Collector::new(text, self.report_removals, self.ignore_line_breaks);
        match self.mode {
            StripMode::Markup => self.strip_spans(&tokenize(text), &mut collector),
            StripMode::Escaped => {
                let mut last = 0;
                for found in patterns::get(Pattern::EscapeSequence).find_iter(text) {
                    collector.keep(&text[last..found.start()]);
                    collector.remove(found.start(), found.as_str());
                    last = found.end();
                }
                collector.keep(&text[last..]);
            }
        }
        collector.finish()
    }

    fn strip_spans(&self, spans: &[Span<'_>], collector: &mut Collector<'_>) {
        for span in spans {
            match span {
                Span::Literal(literal) => collector.keep(literal.text),
                Span::Tag(tag) => {
                    if !self.strip_tag(tag, collector) {
                        collector.keep(tag.text);
                    }
                }
                Span::Group(group) => self.strip_group(group, collector),
            }
        }
    }

    /// Removes a tag, or only its escape marker. Returns false for a tag
    /// that stays as written.
    fn strip_tag(&self, tag: &Tag<'_>, collector: &mut Collector<'_>) -> bool {
        if let Some(marker) = tag.marker {
            let split = marker - tag.start;
            collector.keep(&tag.text[..split]);
            collector.remove(marker, &tag.text[split..split + 1]);
            collector.keep(&tag.text[split + 1..]);
            return true;
        }
        if self.resolver.directives(tag.body).is_some() {
            collector.remove(tag.start, tag.text);
            return true;
        }
        false
    }

    fn strip_group(&self, group: &Group<'_>, collector: &mut Collector<'_>) {
        let applied = !group.tag.is_escaped() && self.resolver.directives(group.tag.body).is_some();
        if applied {
            collector.remove(group.tag.start, group.tag.text);
            collector.remove(group.open, "(");
            self.strip_spans(&group.inner, collector);
            collector.remove(group.close, ")");
        } else {
            if !self.strip_tag(&group.tag, collector) {
                collector.keep(group.tag.text);
            }
            collector.keep("(");
            self.strip_spans(&group.inner, collector);
            collector.keep(")");
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Accumulates kept text and removal records.
struct Collector<'s> {
    source: &'s str,
    report: bool,
    ignore_line_breaks: bool,
    out: String,
    removals: Vec<Removal>,
    /// Line breaks counted in `source[..scanned]`.
    scanned: usize,
    line_breaks: usize,
}

impl<'s> Collector<'s> {
    fn new(source: &'s str, report: bool, ignore_line_breaks: bool) -> Self {
        Self {
            source,
            report,
            ignore_line_breaks,
            out: String::with_capacity(source.len()),
            removals: Vec::new(),
            scanned: 0,
            line_breaks: 0,
        }
    }

    fn keep(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn remove(&mut self, position: usize, text: &str) {
        if !self.ignore_line_breaks {
            if self.report {
                self.removals.push(Removal::new(position, text));
            }
            return;
        }

        let removed: String = text.chars().filter(|&c| !is_line_break(c)).collect();
        self.out.extend(text.chars().filter(|&c| is_line_break(c)));
        if self.report && !removed.is_empty() {
            let position = position - self.line_breaks_before(position);
            self.removals.push(Removal::new(position, removed));
        }
    }

    /// Removal positions only grow, so the count is carried forward.
    fn line_breaks_before(&mut self, position: usize) -> usize {
        if position > self.scanned {
            self.line_breaks += self.source[self.scanned..position]
                .chars()
                .filter(|&c| is_line_break(c))
                .count();
            self.scanned = position;
        }
        self.line_breaks
    }

    fn finish(self) -> Stripped {
        Stripped {
            text: self.out,
            removals: self.report.then_some(self.removals),
        }
    }
}

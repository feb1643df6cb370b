//! Tag tokenizer.
//!
//! Splits markup into [`Span`]s: literal text, standalone tags and tags
//! with an attached parenthesized group. Spans are produced in source order
//! and cover the input exactly once. Every offset is a byte offset into the
//! string originally handed to [`tokenize`], also for spans nested inside
//! groups.
//!
//! Groups nest at most [`MAX_GROUP_DEPTH`] deep. Below that, a `(` after a
//! tag is plain text and the tag stands alone, so deeply nested input still
//! tokenizes into a tree of bounded depth.

use super::brackets::{BracketMatch, BracketMatcher, BracketPairs};

/// Tag delimiters. Tag bodies never span lines.
const TAG: BracketMatcher = BracketMatcher::new(b'[', b']').trim(true).single_line(true);

/// Group delimiters, first tried skipping quoted text.
const GROUP: BracketMatcher = BracketMatcher::new(b'(', b')');

/// Deepest nesting of groups that is still parsed as groups.
pub const MAX_GROUP_DEPTH: usize = 128;

/// Returns true for the characters that escape a tag or detach a group.
pub fn is_escape_marker(byte: u8) -> bool {
    byte == b'/' || byte == b'\\'
}

/// A classified slice of the source.
#[derive(Clone, Debug, PartialEq)]
pub enum Span<'a> {
    /// Plain text.
    Literal(Literal<'a>),
    /// A tag applying from its position onward.
    Tag(Tag<'a>),
    /// A tag whose style applies to a parenthesized span only.
    Group(Group<'a>),
}

impl<'a> Span<'a> {
    /// Byte offset of the first byte of the span.
    pub fn start(&self) -> usize {
        match self {
            Span::Literal(literal) => literal.start,
            Span::Tag(tag) => tag.start,
            Span::Group(group) => group.tag.start,
        }
    }

    /// Byte offset one past the last byte of the span.
    pub fn end(&self) -> usize {
        match self {
            Span::Literal(literal) => literal.start + literal.text.len(),
            Span::Tag(tag) => tag.end,
            Span::Group(group) => group.close + 1,
        }
    }
}

/// Literal text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal<'a> {
    pub start: usize,
    pub text: &'a str,
}

/// A bracketed tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Offset of the opening `[`.
    pub start: usize,
    /// Offset one past the tag, including a trailing group-detaching marker.
    pub end: usize,
    /// The tag's full source text.
    pub text: &'a str,
    /// Trimmed content between the brackets, after the escape marker.
    pub body: &'a str,
    /// Offset of the escape marker right inside `[`.
    pub marker: Option<usize>,
    /// Offset of a marker between `]` and `(` that detaches the group.
    pub group_marker: Option<usize>,
}

impl<'a> Tag<'a> {
    /// Returns true if the tag is to be shown literally.
    pub fn is_escaped(&self) -> bool {
        self.marker.is_some()
    }

    /// The source text with the escape marker removed.
    pub fn unescaped(&self) -> String {
        match self.marker {
            Some(at) => {
                let at = at - self.start;
                let mut text = String::with_capacity(self.text.len());
                text.push_str(&self.text[..at]);
                text.push_str(&self.text[at + 1..]);
                text
            }
            None => self.text.to_string(),
        }
    }
}

/// A tag followed by a parenthesized span.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<'a> {
    pub tag: Tag<'a>,
    /// Offset of `(`.
    pub open: usize,
    /// Offset of the matching `)`.
    pub close: usize,
    /// The tokenized content between the parentheses.
    pub inner: Vec<Span<'a>>,
}

/// Tokenizes markup into spans.
///
/// Never fails: brackets that do not form a tag are literal text.
///
/// # Examples
///
/// ```
/// use fmtcodes::parser::{tokenize, Span};
///
/// let spans = tokenize("[b](bold) plain");
/// assert_eq!(spans.len(), 2);
/// assert!(matches!(spans[0], Span::Group(_)));
/// assert!(matches!(spans[1], Span::Literal(_)));
/// ```
pub fn tokenize(source: &str) -> Vec<Span<'_>> {
    let pairs = Pairs::new(source);
    Lexer::new(&pairs, 0, source.len(), 0).collect()
}

/// Delimiter pairs of the whole source, shared by every nesting level.
struct Pairs<'a> {
    source: &'a str,
    tags: BracketPairs<'a>,
    quoted: BracketPairs<'a>,
    plain: BracketPairs<'a>,
}

impl<'a> Pairs<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tags: TAG.pairs(source),
            quoted: GROUP.quote_aware(true).pairs(source),
            plain: GROUP.pairs(source),
        }
    }
}

/// Iterator over the spans of one nesting level, `source[pos..end]`.
struct Lexer<'p, 'a> {
    pairs: &'p Pairs<'a>,
    pos: usize,
    end: usize,
    /// Number of groups enclosing this level.
    depth: usize,
}

impl<'p, 'a> Lexer<'p, 'a> {
    fn new(pairs: &'p Pairs<'a>, start: usize, end: usize, depth: usize) -> Self {
        Self {
            pairs,
            pos: start,
            end,
            depth,
        }
    }

    fn source(&self) -> &'a str {
        self.pairs.source
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos < self.end {
            self.source().as_bytes().get(pos).copied()
        } else {
            None
        }
    }

    fn literal(&self, start: usize, end: usize) -> Span<'a> {
        Span::Literal(Literal {
            start,
            text: &self.source()[start..end],
        })
    }

    /// Finds the next `[` at or after `from` that opens a tag.
    fn next_tag(&self, from: usize) -> Option<BracketMatch> {
        let mut search = from;
        while let Some(offset) = self.source()[search..self.end].find('[') {
            let at = search + offset;
            if let Some(found) = self.pairs.tags.find(at, self.end) {
                return Some(found);
            }
            search = at + 1;
        }
        None
    }

    fn tag(&self, found: &BracketMatch, end: usize, group_marker: Option<usize>) -> Tag<'a> {
        let source = self.source();
        let content = found.content.clone();
        let escaped = self.byte_at(content.start).filter(|_| !content.is_empty()).is_some_and(is_escape_marker);
        let (marker, body) = if escaped {
            (Some(content.start), source[content.start + 1..content.end].trim())
        } else {
            (None, &source[content])
        };
        Tag {
            start: found.open,
            end,
            text: &source[found.open..end],
            body,
            marker,
            group_marker,
        }
    }

    /// Builds the span for a matched tag and whatever follows it.
    fn tag_or_group(&mut self, found: BracketMatch) -> Span<'a> {
        let after = found.close + 1;

        if self.byte_at(after).is_some_and(is_escape_marker) && self.byte_at(after + 1) == Some(b'(') {
            self.pos = after + 1;
            return Span::Tag(self.tag(&found, after + 1, Some(after)));
        }

        if self.byte_at(after) == Some(b'(') {
            if self.depth >= MAX_GROUP_DEPTH {
                log::trace!("group at {after} nested too deep, tag stands alone");
                self.pos = after;
                return Span::Tag(self.tag(&found, after, None));
            }

            let group = self.pairs.quoted.find(after, self.end).or_else(|| {
                log::trace!("group at {after} unmatched with quotes, retrying without");
                self.pairs.plain.find(after, self.end)
            });
            if let Some(group) = group {
                self.pos = group.close + 1;
                let inner = Lexer::new(self.pairs, group.content.start, group.content.end, self.depth + 1).collect();
                return Span::Group(Group {
                    tag: self.tag(&found, after, None),
                    open: group.open,
                    close: group.close,
                    inner,
                });
            }
            log::trace!("group at {after} never closes, tag stands alone");
        }

        self.pos = after;
        Span::Tag(self.tag(&found, after, None))
    }
}

impl<'a> Iterator for Lexer<'_, 'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }

        let start = self.pos;
        match self.next_tag(start) {
            Some(found) if found.open > start => {
                self.pos = found.open;
                Some(self.literal(start, found.open))
            }
            Some(found) => Some(self.tag_or_group(found)),
            None => {
                self.pos = self.end;
                Some(self.literal(start, self.end))
            }
        }
    }
}

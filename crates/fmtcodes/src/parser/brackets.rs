//! Quote-aware bracket matching.
//!
//! Finds the closing delimiter that pairs with a given opening delimiter,
//! counting nested pairs of the same kind. Unmatched input is reported as
//! `None`; the caller decides how to degrade.
//!
//! [`BracketMatcher::pairs`] resolves every opener of a text in one
//! right-to-left pass, so a tokenizer asking about many openers never
//! rescans the text.

use std::ops::Range;

/// A matched delimiter pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BracketMatch {
    /// Byte offset of the opening delimiter.
    pub open: usize,
    /// Byte offset of the closing delimiter.
    pub close: usize,
    /// Byte range of the content between the delimiters, trimmed when the
    /// matcher trims.
    pub content: Range<usize>,
}

/// Matching policy for one kind of delimiter pair.
///
/// Delimiters must be ASCII, so scanning works on bytes without ever
/// splitting a multi-byte character.
///
/// # Examples
///
/// ```
/// use fmtcodes::parser::BracketMatcher;
///
/// let parens = BracketMatcher::new(b'(', b')').quote_aware(true);
/// let m = parens.find("(say \"a)b\" here) tail", 0).unwrap();
/// assert_eq!(m.close, 15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BracketMatcher {
    open: u8,
    close: u8,
    quote_aware: bool,
    trim: bool,
    single_line: bool,
}

impl BracketMatcher {
    /// Create a matcher for `open`/`close` with every option disabled.
    pub const fn new(open: u8, close: u8) -> Self {
        Self {
            open,
            close,
            quote_aware: false,
            trim: false,
            single_line: false,
        }
    }

    /// Ignore delimiters inside `'...'` or `"..."`.
    ///
    /// A quote only opens a quoted span if the same quote character occurs
    /// again later; a lone apostrophe is ordinary text.
    ///
    /// Quotes are not checked against the pair being matched, so two
    /// apostrophes in separate groups pair up with each other. In
    /// `(it's) and (it's)` the first `(` closes at the very last `)`.
    pub const fn quote_aware(mut self, enabled: bool) -> Self {
        self.quote_aware = enabled;
        self
    }

    /// Exclude leading and trailing whitespace from the reported content.
    pub const fn trim(mut self, enabled: bool) -> Self {
        self.trim = enabled;
        self
    }

    /// Give up at the first line break.
    pub const fn single_line(mut self, enabled: bool) -> Self {
        self.single_line = enabled;
        self
    }

    /// Finds the delimiter closing the one at byte offset `open_at`.
    ///
    /// Returns `None` if `open_at` does not hold an opening delimiter or if
    /// the pair is never closed.
    pub fn find(&self, text: &str, open_at: usize) -> Option<BracketMatch> {
        self.pairs(text).find(open_at, text.len())
    }

    /// Resolves the closing delimiter of every opener in `text` at once.
    ///
    /// Linear in the length of `text`.
    pub fn pairs<'t>(&self, text: &'t str) -> BracketPairs<'t> {
        let bytes = text.as_bytes();

        // Next occurrence of the same quote character, for quote openers.
        let mut partner = vec![UNMATCHED; bytes.len()];
        if self.quote_aware {
            let (mut single, mut double) = (UNMATCHED, UNMATCHED);
            for (i, &byte) in bytes.iter().enumerate().rev() {
                match byte {
                    b'\'' => {
                        partner[i] = single;
                        single = i;
                    }
                    b'"' => {
                        partner[i] = double;
                        double = i;
                    }
                    _ => {}
                }
            }
        }

        // scan[i]: where a scan entering at `i` with depth zero stops on a
        // closing delimiter.
        let mut scan = vec![UNMATCHED; bytes.len() + 1];
        for i in (0..bytes.len()).rev() {
            let byte = bytes[i];
            scan[i] = if byte == self.close {
                i
            } else if byte == self.open {
                match scan[i + 1] {
                    UNMATCHED => UNMATCHED,
                    inner => scan[inner + 1],
                }
            } else if self.single_line && (byte == b'\n' || byte == b'\r') {
                UNMATCHED
            } else if partner[i] != UNMATCHED {
                scan[partner[i] + 1]
            } else {
                scan[i + 1]
            };
        }

        BracketPairs {
            matcher: *self,
            bytes,
            scan,
        }
    }

    fn matched(&self, bytes: &[u8], open: usize, close: usize) -> BracketMatch {
        let mut start = open + 1;
        let mut end = close;
        if self.trim {
            while start < end && bytes[start].is_ascii_whitespace() {
                start += 1;
            }
            while end > start && bytes[end - 1].is_ascii_whitespace() {
                end -= 1;
            }
        }
        BracketMatch {
            open,
            close,
            content: start..end,
        }
    }
}

const UNMATCHED: usize = usize::MAX;

/// Every opener of one text resolved by a [`BracketMatcher`].
#[derive(Clone, Debug)]
pub struct BracketPairs<'t> {
    matcher: BracketMatcher,
    bytes: &'t [u8],
    scan: Vec<usize>,
}

impl BracketPairs<'_> {
    /// Finds the delimiter closing the one at `open_at`, if it closes
    /// before byte offset `end`.
    ///
    /// Limiting `end` gives the same answer as matching within
    /// `text[..end]`, as long as no quoted span crosses `end`.
    pub fn find(&self, open_at: usize, end: usize) -> Option<BracketMatch> {
        if self.bytes.get(open_at) != Some(&self.matcher.open) {
            return None;
        }
        let close = self.scan[open_at + 1];
        (close < end).then(|| self.matcher.matched(self.bytes, open_at, close))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: BracketMatcher = BracketMatcher::new(b'[', b']');
    const PARENS: BracketMatcher = BracketMatcher::new(b'(', b')');

    #[test]
    fn simple_pair() {
        let m = SQUARE.find("[red]text", 0).unwrap();
        assert_eq!(m.open, 0);
        assert_eq!(m.close, 4);
        assert_eq!(m.content, 1..4);
    }

    #[test]
    fn not_an_opener() {
        assert_eq!(SQUARE.find("red]", 0), None);
        assert_eq!(SQUARE.find("", 0), None);
    }

    #[test]
    fn nested_pairs() {
        let text = "(a(b)c)d";
        assert_eq!(PARENS.find(text, 0).unwrap().close, 6);
        assert_eq!(PARENS.find(text, 2).unwrap().close, 4);
    }

    #[test]
    fn unmatched() {
        assert_eq!(PARENS.find("(a(b)c", 0), None);
        assert_eq!(SQUARE.find("[red text without close", 0), None);
    }

    #[test]
    fn quotes_hide_delimiters() {
        let text = r#"(say "a)b" here)"#;
        assert_eq!(PARENS.find(text, 0).unwrap().close, 7);
        assert_eq!(PARENS.quote_aware(true).find(text, 0).unwrap().close, 15);
    }

    #[test]
    fn lone_quote_is_text() {
        let m = PARENS.quote_aware(true).find("(it's fine) x", 0).unwrap();
        assert_eq!(m.close, 10);
    }

    #[test]
    fn quoted_span_can_swallow_close() {
        // The apostrophes pair up across the closing paren.
        assert_eq!(PARENS.quote_aware(true).find("(it's) it's", 0), None);
    }

    #[test]
    fn single_line_stops_at_newline() {
        assert_eq!(SQUARE.single_line(true).find("[re\nd]", 0), None);
        assert!(SQUARE.find("[re\nd]", 0).is_some());
    }

    #[test]
    fn trimmed_content() {
        let m = SQUARE.trim(true).find("[  b | u ]", 0).unwrap();
        assert_eq!(m.content, 3..8);
        let m = SQUARE.trim(true).find("[   ]", 0).unwrap();
        assert!(m.content.is_empty());
    }

    #[test]
    fn apostrophes_pair_across_groups() {
        let text = "(it's) and (it's)";
        assert_eq!(PARENS.quote_aware(true).find(text, 0).unwrap().close, 16);
        assert_eq!(PARENS.find(text, 0).unwrap().close, 5);
    }

    #[test]
    fn pairs_answer_every_opener() {
        let text = "[a][b [c] d\n[e]";
        let pairs = SQUARE.single_line(true).pairs(text);
        assert_eq!(pairs.find(0, text.len()).unwrap().close, 2);
        assert_eq!(pairs.find(3, text.len()), None);
        assert_eq!(pairs.find(6, text.len()).unwrap().close, 8);
        assert_eq!(pairs.find(12, text.len()).unwrap().close, 14);
        assert_eq!(pairs.find(1, text.len()), None);
    }

    #[test]
    fn pairs_respect_end_bound() {
        let text = "(a (b) c)";
        let pairs = PARENS.pairs(text);
        assert_eq!(pairs.find(0, text.len()).unwrap().close, 8);
        assert_eq!(pairs.find(0, 8), None);
        assert_eq!(pairs.find(3, 8).unwrap().close, 5);
    }

    #[test]
    fn pairs_with_quotes() {
        let text = r#"(x '(' y) ("a)" (b) [c]) it's (z"#;
        let pairs = PARENS.quote_aware(true).pairs(text);
        assert_eq!(pairs.find(0, text.len()).unwrap().close, 8);
        assert_eq!(pairs.find(4, text.len()), None);
        assert_eq!(pairs.find(10, text.len()).unwrap().close, 23);
        assert_eq!(pairs.find(16, text.len()).unwrap().close, 18);
        assert_eq!(pairs.find(30, text.len()), None);
    }

    #[test]
    fn multibyte_content() {
        let text = "[hsl(120°,50%,50%)]é";
        let m = SQUARE.find(text, 0).unwrap();
        assert_eq!(&text[m.content.clone()], "hsl(120°,50%,50%)");
    }
}

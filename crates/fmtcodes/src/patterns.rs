//! Process-wide registry of compiled patterns.
//!
//! Each [`Pattern`] is compiled the first time it is requested and kept for
//! the rest of the process. Initialization goes through
//! [`once_cell::sync::OnceCell`], so concurrent first calls compile a pattern
//! exactly once and later reads never take a lock.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Identity of a registered pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// An emitted escape sequence: ESC, then either a single final byte or
    /// `[`, parameter bytes, intermediate bytes and a final byte.
    EscapeSequence,
    /// A normalized (lowercase, whitespace-free) hex color key.
    HexColor,
    /// A key made only of single-letter modifier shorthands, e.g. `bu`.
    ShorthandModifiers,
}

impl Pattern {
    /// Every registered pattern, in registry order.
    pub const ALL: [Pattern; 3] = [
        Pattern::EscapeSequence,
        Pattern::HexColor,
        Pattern::ShorthandModifiers,
    ];

    fn source(self) -> &'static str {
        match self {
            Pattern::EscapeSequence => r"\x1b(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])",
            Pattern::HexColor => {
                r"^(?:(?:#|0x)([0-9a-f]{8}|[0-9a-f]{4})|(?:#|0x)?([0-9a-f]{6}|[0-9a-f]{3}))$"
            }
            Pattern::ShorthandModifiers => r"^[bdihsu]{2,}$",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

static REGISTRY: [OnceCell<Regex>; 3] = [OnceCell::new(), OnceCell::new(), OnceCell::new()];

/// Returns the compiled regex for `pattern`, compiling it on first use.
pub fn get(pattern: Pattern) -> &'static Regex {
    REGISTRY[pattern.slot()].get_or_init(|| {
        log::trace!("compiling pattern {:?}", pattern);
        Regex::new(pattern.source())
            .unwrap_or_else(|err| panic!("built-in pattern {pattern:?} is invalid: {err}"))
    })
}

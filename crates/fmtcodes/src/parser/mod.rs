//! Markup parsing.
//!
//! This module contains the bracket matcher, the tag tokenizer and the
//! resolver turning tag bodies into style tokens.

mod brackets;
mod lexer;
mod token;

pub use brackets::{BracketMatch, BracketMatcher, BracketPairs};
pub use lexer::{Group, Literal, MAX_GROUP_DEPTH, Span, Tag, is_escape_marker, tokenize};
pub use token::{KEY_SEPARATOR, MODIFIERS, Modifier, Resolver, StyleToken};

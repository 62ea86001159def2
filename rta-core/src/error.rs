//! Error types for the translator
//!
//! All user-facing failures come from the extent parser: either the pattern
//! is structurally malformed, or it exceeds the configured [`Limits`].
//! The automaton builder and the acceptance classifier never fail on a
//! well-formed extent tree.
//!
//! [`Limits`]: crate::parser::Limits

use std::fmt;
use thiserror::Error;

/// The main error type for the translator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The pattern is structurally malformed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The parser was handed an empty pattern
    #[error("empty pattern")]
    EmptyPattern,

    /// The pattern is longer than the configured limit
    #[error("pattern has {len} characters, limit is {limit}")]
    TooLong {
        /// Length of the pattern in characters
        len: usize,
        /// The configured maximum
        limit: usize,
    },

    /// Parsing recursed deeper than the configured limit
    #[error("pattern exceeds the parser recursion depth limit of {limit}")]
    TooDeep {
        /// The configured maximum depth
        limit: usize,
    },
}

/// Specific kinds of structural errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An opening parenthesis is never closed
    MissingClose,
    /// A closing parenthesis has no matching opening one
    UnexpectedClose,
    /// `(^`
    MarkerAfterOpen,
    /// `|^`
    MarkerAfterBar,
    /// `()^`
    EmptyRepetition,
    /// A repetition marker with nothing before it
    NothingToRepeat,
    /// `()`
    EmptyGroup,
    /// An alternative of a union is empty, as in `a|` or `a||b`
    EmptyAlternative,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseErrorKind::MissingClose => "missing ')'",
            ParseErrorKind::UnexpectedClose => "unexpected ')'",
            ParseErrorKind::MarkerAfterOpen => "unexpected '^' after '('",
            ParseErrorKind::MarkerAfterBar => "unexpected '^' after '|'",
            ParseErrorKind::EmptyRepetition => "empty repetition group",
            ParseErrorKind::NothingToRepeat => "'^' has nothing to repeat",
            ParseErrorKind::EmptyGroup => "empty group",
            ParseErrorKind::EmptyAlternative => "empty alternative",
        };
        f.write_str(msg)
    }
}

/// A structural error with its location in the normalized pattern
///
/// Positions count characters (not bytes) in the pattern after runs of `^`
/// have been collapsed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {} in `{fragment}`", .span.start)]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Where it went wrong
    pub span: Span,
    /// The part of the pattern being parsed when the error was found
    pub fragment: String,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ParseErrorKind, span: Span, fragment: impl Into<String>) -> Self {
        ParseError {
            kind,
            span,
            fragment: fragment.into(),
        }
    }
}

/// A span of character positions in the normalized pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single character
    pub fn single(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }
}

/// Result type alias for translator operations
pub type Result<T> = std::result::Result<T, TranslateError>;

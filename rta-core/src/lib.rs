//! RTA Core Library
//!
//! Compiles a small regex notation into an NFA with epsilon transitions and
//! renders it as a transition table and a Mermaid diagram.
//!
//! The notation has implicit concatenation, `|` for alternation, a postfix
//! `^` for repetition and parentheses for grouping.

pub mod acceptance;
pub mod error;
pub mod extent;
pub mod nfa;
pub mod parser;
pub mod render;
pub mod translator;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use acceptance::classify;
pub use error::{ParseError, ParseErrorKind, Result, Span, TranslateError};
pub use extent::{Extent, ExtentValue, Operation};
pub use nfa::{Automaton, State, StateId, StateLayout, Symbol};
pub use parser::{Limits, Parser, parse, parse_with_limits};
pub use render::{diagram, table};
pub use translator::{
    PLACEHOLDER_DIAGRAM, Translation, TranslationReport, compile, translate, translate_debug,
    translate_or_diagnose, translate_with_limits,
};

//! Translator from pattern text to table and diagram
//!
//! This is the entry point request handlers call. It special-cases the empty
//! pattern, runs parse → build → classify → render, and can turn failures
//! into a diagnostic instead of an error.

use crate::acceptance::classify;
use crate::error::Result;
use crate::nfa::Automaton;
use crate::parser::{Limits, Parser};
use crate::render::{FLOWCHART_HEADER, diagram, table};
use log::{debug, warn};

/// Diagram returned alongside a diagnostic message
pub const PLACEHOLDER_DIAGRAM: &str = FLOWCHART_HEADER;

/// The two renderings of a translated pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// The transition table, or a diagnostic message
    pub table: String,
    /// The Mermaid diagram, or [`PLACEHOLDER_DIAGRAM`]
    pub diagram: String,
    /// Whether `table` holds a diagnostic instead of a table
    pub is_diagnostic: bool,
}

impl Translation {
    /// Render a classified automaton
    pub fn from_automaton(automaton: &Automaton) -> Self {
        Translation {
            table: table(automaton),
            diagram: diagram(automaton),
            is_diagnostic: false,
        }
    }

    /// A diagnostic message paired with the placeholder diagram
    pub fn diagnostic(message: impl Into<String>) -> Self {
        Translation {
            table: message.into(),
            diagram: PLACEHOLDER_DIAGRAM.to_string(),
            is_diagnostic: true,
        }
    }
}

/// Compile a pattern into a classified automaton
///
/// The empty pattern yields the one-state automaton without invoking the
/// parser. It is returned unclassified, so its start state carries no
/// marker.
pub fn compile(input: &str, limits: Limits) -> Result<Automaton> {
    if input.is_empty() {
        debug!("empty pattern, returning trivial automaton");
        return Ok(Automaton::new());
    }

    let extent = Parser::with_limits(input, limits).parse()?;
    let mut automaton = Automaton::from_extent(&extent);
    classify(&mut automaton);
    Ok(automaton)
}

/// Translate a pattern with default limits
///
/// # Example
/// ```
/// use rta_core::translate;
///
/// let result = translate("a").unwrap();
/// assert_eq!(result.table, "\t'a'\ns\t{*q0}\n*q0\t");
/// assert_eq!(result.diagram, "flowchart LR\n\ts((s)) -->|a| *q0((*q0))");
/// ```
pub fn translate(input: &str) -> Result<Translation> {
    translate_with_limits(input, Limits::default())
}

/// Translate a pattern with custom limits
pub fn translate_with_limits(input: &str, limits: Limits) -> Result<Translation> {
    let automaton = compile(input, limits)?;
    Ok(Translation::from_automaton(&automaton))
}

/// Translate a pattern, reporting failures as a diagnostic
pub fn translate_or_diagnose(input: &str, limits: Limits) -> Translation {
    match translate_with_limits(input, limits) {
        Ok(translation) => translation,
        Err(e) => {
            warn!("could not translate `{}`: {}", input, e);
            Translation::diagnostic(e.to_string())
        }
    }
}

/// Translate with verbose output for debugging
pub fn translate_debug(input: &str, limits: Limits) -> Result<TranslationReport> {
    let parser = Parser::with_limits(input, limits);
    let (extent, automaton) = if input.is_empty() {
        (String::from("<empty>"), Automaton::new())
    } else {
        let extent = parser.parse()?;
        let mut automaton = Automaton::from_extent(&extent);
        classify(&mut automaton);
        (format!("{:?}", extent), automaton)
    };

    Ok(TranslationReport {
        input: input.to_string(),
        normalized: parser.normalized(),
        extent,
        state_count: automaton.len(),
        translation: Translation::from_automaton(&automaton),
    })
}

/// Result of a translation with debug information
#[derive(Debug, Clone)]
pub struct TranslationReport {
    /// The original input pattern
    pub input: String,
    /// The pattern after collapsing repetition markers
    pub normalized: String,
    /// The extent tree (debug format)
    pub extent: String,
    /// Number of states, the start state included
    pub state_count: usize,
    /// The rendered outputs
    pub translation: Translation,
}

impl TranslationReport {
    /// Print a formatted report of the translation
    pub fn report(&self) {
        println!("Translation Report");
        println!("==================");
        println!("Input:      {}", self.input);
        println!("Normalized: {}", self.normalized);
        println!("Extents:    {}", self.extent);
        println!("States:     {}", self.state_count);
        println!();
        println!("{}", self.translation.table);
        println!();
        println!("{}", self.translation.diagram);
    }
}

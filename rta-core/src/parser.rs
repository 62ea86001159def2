//! Parser for patterns
//!
//! This module turns pattern text into an [`Extent`] tree. The notation has
//! implicit concatenation, `|` for alternation, a postfix `^` for repetition
//! and parentheses for grouping.
//!
//! Parsing works top-down over spans of the normalized pattern:
//!
//!   1. A span of the form `( ... )^` whose first parenthesis closes right
//!      before the marker is a repetition of its inner span.
//!   2. Otherwise, parentheses enclosing the whole span are stripped.
//!   3. A `|` at nesting level 0 makes the span a union, split on every
//!      such bar. Anything else is a concatenation.
//!
//! Runs of `^` are collapsed to a single marker before parsing, so every
//! position reported in an error refers to the collapsed pattern.

use crate::error::{ParseError, ParseErrorKind, Result, Span, TranslateError};
use crate::extent::{Extent, ExtentValue};
use log::{debug, trace};

/// The postfix repetition marker
pub const REPETITION_MARKER: char = '^';

/// The alternation bar
pub const ALTERNATION_BAR: char = '|';

/// Resource limits applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum pattern length in characters
    pub max_len: usize,
    /// Maximum recursion depth of the parser
    pub max_depth: usize,
}

impl Limits {
    /// Default maximum pattern length
    pub const DEFAULT_MAX_LEN: usize = 4096;
    /// Default maximum recursion depth
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Create limits with the given length and depth bounds
    pub fn new(max_len: usize, max_depth: usize) -> Self {
        Limits { max_len, max_depth }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits::new(Self::DEFAULT_MAX_LEN, Self::DEFAULT_MAX_DEPTH)
    }
}

/// Parser for patterns
pub struct Parser {
    text: Vec<char>,
    input_len: usize,
    limits: Limits,
}

impl Parser {
    /// Create a new parser with default limits
    pub fn new(input: &str) -> Self {
        Parser::with_limits(input, Limits::default())
    }

    /// Create a new parser with custom limits
    pub fn with_limits(input: &str, limits: Limits) -> Self {
        Parser {
            text: collapse_markers(input),
            input_len: input.chars().count(),
            limits,
        }
    }

    /// The pattern after runs of `^` have been collapsed
    pub fn normalized(&self) -> String {
        self.text.iter().collect()
    }

    /// Parse the entire pattern and return the extent tree
    pub fn parse(&self) -> Result<Extent> {
        if self.input_len > self.limits.max_len {
            return Err(TranslateError::TooLong {
                len: self.input_len,
                limit: self.limits.max_len,
            });
        }
        if self.text.is_empty() {
            return Err(TranslateError::EmptyPattern);
        }

        debug!("parsing pattern `{}`", self.normalized());
        self.parse_span(0, self.text.len(), 1)
    }

    /// Parse the span `start..end` at the given recursion depth
    fn parse_span(&self, start: usize, end: usize, depth: usize) -> Result<Extent> {
        if depth > self.limits.max_depth {
            return Err(TranslateError::TooDeep {
                limit: self.limits.max_depth,
            });
        }
        trace!(
            "span {}..{} `{}` at depth {}",
            start,
            end,
            self.fragment(start, end),
            depth
        );

        if let Some((inner_start, inner_end)) = self.repetition_wrapper(start, end)? {
            let inner = self.parse_span(inner_start, inner_end, depth + 1)?;
            return Ok(Extent::repetition(ExtentValue::Extent(inner)));
        }

        let (inner_start, inner_end) = self.strip_redundant(start, end)?;
        if inner_start == inner_end {
            return Err(self.error(ParseErrorKind::EmptyGroup, Span::new(start, end), start, end));
        }

        if self.has_top_level_bar(inner_start, inner_end) {
            self.parse_union(inner_start, inner_end, depth)
        } else {
            self.parse_concatenation(inner_start, inner_end, depth)
        }
    }

    /// Detect a `( ... )^` wrapper around the whole span
    ///
    /// Returns the inner span when the parenthesis at `start` closes exactly
    /// before the trailing marker.
    fn repetition_wrapper(&self, start: usize, end: usize) -> Result<Option<(usize, usize)>> {
        if end - start < 3
            || self.text[start] != '('
            || self.text[end - 1] != REPETITION_MARKER
            || self.text[end - 2] != ')'
        {
            return Ok(None);
        }
        if self.matching_close(start, end) != Some(end - 2) {
            return Ok(None);
        }
        if end - 2 == start + 1 {
            return Err(self.error(
                ParseErrorKind::EmptyRepetition,
                Span::new(start, end),
                start,
                end,
            ));
        }
        self.check_marker_after(start, end, ParseErrorKind::MarkerAfterOpen, start, end)?;
        Ok(Some((start + 1, end - 2)))
    }

    /// Strip parentheses that enclose the whole span, as often as they apply
    fn strip_redundant(&self, mut start: usize, mut end: usize) -> Result<(usize, usize)> {
        let (span_start, span_end) = (start, end);
        while start < end
            && self.text[start] == '('
            && self.matching_close(start, end) == Some(end - 1)
        {
            self.check_marker_after(start, end, ParseErrorKind::MarkerAfterOpen, span_start, span_end)?;
            start += 1;
            end -= 1;
        }
        Ok((start, end))
    }

    /// Check whether the span contains a `|` outside any group
    fn has_top_level_bar(&self, start: usize, end: usize) -> bool {
        let mut level: isize = 0;
        for &c in &self.text[start..end] {
            match c {
                '(' => level += 1,
                ')' => level -= 1,
                ALTERNATION_BAR if level == 0 => return true,
                _ => {}
            }
        }
        false
    }

    /// Parse a concatenation
    fn parse_concatenation(&self, start: usize, end: usize, depth: usize) -> Result<Extent> {
        let mut children = Vec::new();
        let mut level = 0usize;
        let mut open = None;

        let mut i = start;
        while i < end {
            match self.text[i] {
                '(' => {
                    self.check_marker_after(i, end, ParseErrorKind::MarkerAfterOpen, start, end)?;
                    if level == 0 {
                        open = Some(i);
                    }
                    level += 1;
                }
                ')' => {
                    if level == 0 {
                        return Err(self.error(ParseErrorKind::UnexpectedClose, Span::single(i), start, end));
                    }
                    level -= 1;
                    if level == 0 {
                        let group_start = open.take().unwrap_or(start);
                        let mut group_end = i + 1;
                        if self.marker_at(i + 1, end) {
                            group_end += 1;
                            i += 1;
                        }
                        let group = self.parse_span(group_start, group_end, depth + 1)?;
                        children.push(ExtentValue::Extent(group));
                    }
                }
                _ if level > 0 => {}
                REPETITION_MARKER => {
                    return Err(self.error(ParseErrorKind::NothingToRepeat, Span::single(i), start, end));
                }
                c => {
                    if self.marker_at(i + 1, end) {
                        children.push(ExtentValue::Extent(Extent::repetition(ExtentValue::Char(c))));
                        i += 1;
                    } else {
                        children.push(ExtentValue::Char(c));
                    }
                }
            }
            i += 1;
        }

        if let Some(pos) = open {
            return Err(self.error(ParseErrorKind::MissingClose, Span::new(pos, end), start, end));
        }

        Ok(Extent::concatenation(children))
    }

    /// Parse a union, splitting on bars outside any group
    fn parse_union(&self, start: usize, end: usize, depth: usize) -> Result<Extent> {
        let mut alternatives = Vec::new();
        let mut level = 0usize;
        let mut open = None;
        let mut segment_start = start;

        for i in start..end {
            match self.text[i] {
                '(' => {
                    self.check_marker_after(i, end, ParseErrorKind::MarkerAfterOpen, start, end)?;
                    if level == 0 {
                        open = Some(i);
                    }
                    level += 1;
                }
                ')' => {
                    if level == 0 {
                        return Err(self.error(ParseErrorKind::UnexpectedClose, Span::single(i), start, end));
                    }
                    level -= 1;
                    if level == 0 {
                        open = None;
                    }
                }
                ALTERNATION_BAR if level == 0 => {
                    self.check_marker_after(i, end, ParseErrorKind::MarkerAfterBar, start, end)?;
                    alternatives.push(self.parse_alternative(segment_start, i, depth, start, end)?);
                    segment_start = i + 1;
                }
                _ => {}
            }
        }

        if let Some(pos) = open {
            return Err(self.error(ParseErrorKind::MissingClose, Span::new(pos, end), start, end));
        }
        alternatives.push(self.parse_alternative(segment_start, end, depth, start, end)?);

        Ok(Extent::union(alternatives))
    }

    /// Parse one alternative of a union; `outer` is the span of the union
    fn parse_alternative(
        &self,
        start: usize,
        end: usize,
        depth: usize,
        outer_start: usize,
        outer_end: usize,
    ) -> Result<Extent> {
        if start == end {
            return Err(self.error(
                ParseErrorKind::EmptyAlternative,
                Span::new(start, end),
                outer_start,
                outer_end,
            ));
        }
        self.parse_span(start, end, depth + 1)
    }

    /// Find the parenthesis closing the one at `open`, within `..end`
    fn matching_close(&self, open: usize, end: usize) -> Option<usize> {
        let mut level = 0usize;
        for (i, &c) in self.text[open..end].iter().enumerate() {
            match c {
                '(' => level += 1,
                ')' => {
                    level = level.saturating_sub(1);
                    if level == 0 {
                        return Some(open + i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn marker_at(&self, pos: usize, end: usize) -> bool {
        pos < end && self.text[pos] == REPETITION_MARKER
    }

    /// Reject a repetition marker directly after the character at `pos`
    fn check_marker_after(
        &self,
        pos: usize,
        end: usize,
        kind: ParseErrorKind,
        outer_start: usize,
        outer_end: usize,
    ) -> Result<()> {
        if self.marker_at(pos + 1, end) {
            return Err(self.error(kind, Span::single(pos + 1), outer_start, outer_end));
        }
        Ok(())
    }

    fn fragment(&self, start: usize, end: usize) -> String {
        self.text[start..end].iter().collect()
    }

    fn error(&self, kind: ParseErrorKind, span: Span, start: usize, end: usize) -> TranslateError {
        ParseError::new(kind, span, self.fragment(start, end)).into()
    }
}

/// Collapse every run of repetition markers into a single marker
pub fn collapse_markers(input: &str) -> Vec<char> {
    let mut text: Vec<char> = Vec::with_capacity(input.len());
    for c in input.chars() {
        if c == REPETITION_MARKER && text.last() == Some(&REPETITION_MARKER) {
            continue;
        }
        text.push(c);
    }
    text
}

/// Parse a pattern string into an extent tree with default limits
pub fn parse(input: &str) -> Result<Extent> {
    Parser::new(input).parse()
}

/// Parse a pattern string into an extent tree with custom limits
pub fn parse_with_limits(input: &str, limits: Limits) -> Result<Extent> {
    Parser::with_limits(input, limits).parse()
}

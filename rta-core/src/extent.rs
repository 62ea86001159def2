//! Extent tree for parsed patterns
//!
//! An extent is a maximal region of a pattern that shares one operation:
//! concatenation, union or repetition. The parser produces a tree of extents
//! whose leaves are single characters.

use std::fmt;

/// The operation shared by all children of an extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Children follow one another (`ab`)
    Concatenation,
    /// Children are alternatives (`a|b`)
    Union,
    /// The single child occurs one or more times (`a^`, `(ab)^`)
    Repetition,
}

/// A child of an extent
#[derive(Debug, Clone, PartialEq)]
pub enum ExtentValue {
    /// A single character leaf
    Char(char),
    /// A nested extent
    Extent(Extent),
}

/// A node in the extent tree
#[derive(Debug, Clone, PartialEq)]
pub struct Extent {
    operation: Operation,
    children: Vec<ExtentValue>,
}

impl Extent {
    /// Create a concatenation of the given children
    pub fn concatenation(children: Vec<ExtentValue>) -> Self {
        Extent {
            operation: Operation::Concatenation,
            children,
        }
    }

    /// Create a union of the given alternatives
    ///
    /// Alternatives are always extents, never bare characters.
    pub fn union(alternatives: Vec<Extent>) -> Self {
        Extent {
            operation: Operation::Union,
            children: alternatives.into_iter().map(ExtentValue::Extent).collect(),
        }
    }

    /// Create a repetition of a single value
    pub fn repetition(child: ExtentValue) -> Self {
        Extent {
            operation: Operation::Repetition,
            children: vec![child],
        }
    }

    /// Create a concatenation of plain characters
    pub fn literal(text: &str) -> Self {
        Extent::concatenation(text.chars().map(ExtentValue::Char).collect())
    }

    /// The operation of this extent
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The ordered children of this extent
    pub fn children(&self) -> &[ExtentValue] {
        &self.children
    }

    /// Count the character leaves in this tree, nested ones included
    ///
    /// Every leaf receives exactly one state when the tree is compiled.
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                ExtentValue::Char(_) => 1,
                ExtentValue::Extent(sub) => sub.leaf_count(),
            })
            .sum()
    }

    /// Maximum nesting depth of the tree, counting this node as 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|child| match child {
                ExtentValue::Extent(sub) => Some(sub.depth()),
                ExtentValue::Char(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Write the tree back out in pattern notation
    pub fn to_notation(&self) -> String {
        match self.operation {
            Operation::Concatenation => self
                .children
                .iter()
                .map(|child| match child {
                    ExtentValue::Char(c) => c.to_string(),
                    ExtentValue::Extent(sub) if sub.operation == Operation::Repetition => {
                        sub.to_notation()
                    }
                    ExtentValue::Extent(sub) => format!("({})", sub.to_notation()),
                })
                .collect(),
            Operation::Union => {
                let parts: Vec<_> = self
                    .children
                    .iter()
                    .map(|child| match child {
                        ExtentValue::Char(c) => c.to_string(),
                        ExtentValue::Extent(sub) if sub.operation == Operation::Union => {
                            format!("({})", sub.to_notation())
                        }
                        ExtentValue::Extent(sub) => sub.to_notation(),
                    })
                    .collect();
                parts.join("|")
            }
            Operation::Repetition => match self.children.first() {
                Some(ExtentValue::Char(c)) => format!("{}^", c),
                Some(ExtentValue::Extent(sub)) => format!("({})^", sub.to_notation()),
                None => String::new(),
            },
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

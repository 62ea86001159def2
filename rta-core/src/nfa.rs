//! NFA (Nondeterministic Finite Automaton) construction
//!
//! This module compiles an [`Extent`] tree into an automaton with epsilon
//! transitions. States live in a single arena owned by the [`Automaton`];
//! transitions refer to them by [`StateId`], so loops and self-loops need no
//! shared ownership.
//!
//! Construction runs in two passes:
//!
//! 1. *Enrichment* walks the tree depth-first and allocates one state per
//!    character leaf. The allocated states are returned as a [`StateLayout`]
//!    tree that mirrors the extent tree.
//! 2. *Wiring* walks both trees together and adds transitions. Each step
//!    receives the *starter* states transitions originate from, and the
//!    *repeater* states of an enclosing repetition that the end of a
//!    repeated region loops back to. It returns the *exit* states left once
//!    the sub-extent has been consumed.

use crate::extent::{Extent, ExtentValue, Operation};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// An NFA state ID, an index into [`Automaton::states`]
pub type StateId = usize;

/// An ordered set of states
pub type StateSet = IndexSet<StateId>;

/// The ID of the start state
pub const START: StateId = 0;

/// Name of the start state
pub const START_NAME: &str = "s";

/// Marker prefixed to the name of an accepting state
pub const ACCEPT_MARKER: char = '*';

/// A transition symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Transition on a specific character
    Char(char),
    /// Epsilon transition (no input consumed)
    Epsilon,
}

impl Symbol {
    /// Check whether this is the epsilon symbol
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{}", c),
            Symbol::Epsilon => f.write_str("ε"),
        }
    }
}

/// An NFA state
#[derive(Debug, Clone)]
pub struct State {
    label: String,
    /// Whether the acceptance classifier marked this state
    pub accepting: bool,
    /// Transitions from this state, in insertion order
    pub transitions: IndexMap<Symbol, StateSet>,
}

impl State {
    fn new(label: String) -> Self {
        State {
            label,
            accepting: false,
            transitions: IndexMap::new(),
        }
    }

    /// The name given at creation, without the acceptance marker
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The display name, prefixed with [`ACCEPT_MARKER`] when accepting
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Check whether this state has any outgoing transition
    pub fn has_transitions(&self) -> bool {
        self.transitions.values().any(|targets| !targets.is_empty())
    }

    /// Iterate over `(symbol, target)` pairs in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(symbol, targets)| targets.iter().map(move |&target| (*symbol, target)))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.accepting {
            write!(f, "{}{}", ACCEPT_MARKER, self.label)
        } else {
            f.write_str(&self.label)
        }
    }
}

/// An NFA (Nondeterministic Finite Automaton)
#[derive(Debug, Clone)]
pub struct Automaton {
    /// All states, in creation order; index 0 is the start state
    pub states: Vec<State>,
}

impl Automaton {
    /// Create an automaton holding only the start state
    pub fn new() -> Self {
        Automaton {
            states: vec![State::new(START_NAME.to_string())],
        }
    }

    /// Build an automaton from an extent tree
    ///
    /// The result is not yet classified; see [`crate::acceptance::classify`].
    pub fn from_extent(extent: &Extent) -> Self {
        let mut automaton = Automaton::new();
        let layout = automaton.enrich(extent);
        let starters: StateSet = [START].into_iter().collect();
        let exits = automaton.wire(extent, &layout, &starters, None);
        debug!(
            "built automaton with {} states, exits {:?}",
            automaton.states.len(),
            exits
        );
        automaton
    }

    /// Number of states, the start state included
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// An automaton always holds its start state, so this is never true
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The start state
    pub fn start(&self) -> &State {
        &self.states[START]
    }

    /// Look up a state by its label (without the acceptance marker)
    pub fn find(&self, label: &str) -> Option<StateId> {
        self.states.iter().position(|state| state.label == label)
    }

    /// Targets of `from` on `symbol`, empty when there is no such transition
    pub fn targets(&self, from: StateId, symbol: Symbol) -> Vec<StateId> {
        self.states[from]
            .transitions
            .get(&symbol)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Total number of edges across all states
    pub fn edge_count(&self) -> usize {
        self.states.iter().map(|state| state.edges().count()).sum()
    }

    /// Whether some epsilon transition leads to each state, indexed by ID
    pub fn epsilon_targets(&self) -> Vec<bool> {
        let mut targeted = vec![false; self.states.len()];
        for state in &self.states {
            for (symbol, to) in state.edges() {
                if symbol.is_epsilon() {
                    targeted[to] = true;
                }
            }
        }
        targeted
    }

    /// States reachable from `from` over any symbol, `from` included
    pub fn reachable_from(&self, from: StateId) -> BTreeSet<StateId> {
        let mut reached = BTreeSet::new();
        let mut queue = VecDeque::from([from]);

        while let Some(state) = queue.pop_front() {
            if !reached.insert(state) {
                continue;
            }
            for (_, target) in self.states[state].edges() {
                if !reached.contains(&target) {
                    queue.push_back(target);
                }
            }
        }

        reached
    }

    /// Allocate a new state and return its ID
    fn new_state(&mut self) -> StateId {
        let id = self.states.len();
        let label = format!("q{}", id - 1);
        trace!("allocated state {}", label);
        self.states.push(State::new(label));
        id
    }

    /// Add a transition between states
    fn add_transition(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from]
            .transitions
            .entry(symbol)
            .or_default()
            .insert(to);
    }

    /// Pass 1: allocate one state per character leaf, depth-first
    fn enrich(&mut self, extent: &Extent) -> StateLayout {
        let mut layout = StateLayout::default();
        for child in extent.children() {
            match child {
                ExtentValue::Char(_) => {
                    debug_assert_ne!(extent.operation(), Operation::Union);
                    layout.states.push(self.new_state());
                }
                ExtentValue::Extent(sub) => layout.nested.push(self.enrich(sub)),
            }
        }
        layout
    }

    /// Pass 2: wire transitions for `extent` and return its exit states
    fn wire(
        &mut self,
        extent: &Extent,
        layout: &StateLayout,
        starters: &StateSet,
        repeaters: Option<&StateSet>,
    ) -> StateSet {
        match extent.operation() {
            Operation::Concatenation => self.wire_concatenation(extent, layout, starters, repeaters),
            Operation::Union => self.wire_union(extent, layout, starters, repeaters),
            Operation::Repetition => self.wire_repetition(extent, layout, starters, repeaters),
        }
    }

    /// Chain the children one after the other
    fn wire_concatenation(
        &mut self,
        extent: &Extent,
        layout: &StateLayout,
        starters: &StateSet,
        repeaters: Option<&StateSet>,
    ) -> StateSet {
        let mut current = starters.clone();
        let mut states = layout.states.iter().copied();
        let mut nested = layout.nested.iter();
        let last = extent.children().len().saturating_sub(1);

        for (i, child) in extent.children().iter().enumerate() {
            let is_last = i == last;
            match child {
                ExtentValue::Char(c) => {
                    let state = states.next().expect("enrichment allocated a state per leaf");
                    for &from in &current {
                        self.add_transition(from, Symbol::Char(*c), state);
                    }
                    if is_last {
                        self.loop_back(state, repeaters);
                    }
                    current = [state].into_iter().collect();
                }
                ExtentValue::Extent(sub) => {
                    let sub_layout = nested.next().expect("enrichment mirrored every sub-extent");
                    let sub_repeaters = if is_last { repeaters } else { None };
                    current = self.wire(sub, sub_layout, &current, sub_repeaters);
                }
            }
        }

        current
    }

    /// Branch every alternative from the same starters
    fn wire_union(
        &mut self,
        extent: &Extent,
        layout: &StateLayout,
        starters: &StateSet,
        repeaters: Option<&StateSet>,
    ) -> StateSet {
        let mut exits = StateSet::new();
        let mut nested = layout.nested.iter();

        for child in extent.children() {
            match child {
                ExtentValue::Extent(sub) => {
                    let sub_layout = nested.next().expect("enrichment mirrored every sub-extent");
                    exits.extend(self.wire(sub, sub_layout, starters, repeaters));
                }
                ExtentValue::Char(c) => {
                    unreachable!("union alternative {:?} was not wrapped in an extent", c)
                }
            }
        }

        exits
    }

    /// Loop the single child back onto itself
    fn wire_repetition(
        &mut self,
        extent: &Extent,
        layout: &StateLayout,
        starters: &StateSet,
        repeaters: Option<&StateSet>,
    ) -> StateSet {
        let mut exits = StateSet::new();

        match extent.children() {
            [ExtentValue::Char(c)] => {
                let state = layout.states[0];
                for &from in starters {
                    self.add_transition(from, Symbol::Char(*c), state);
                }
                self.add_transition(state, Symbol::Char(*c), state);
                self.loop_back(state, repeaters);
                exits.insert(state);
            }
            [ExtentValue::Extent(sub)] => {
                let mut inner_repeaters = repeaters.cloned().unwrap_or_default();
                inner_repeaters.extend(starters.iter().copied());
                exits.extend(self.wire(sub, &layout.nested[0], starters, Some(&inner_repeaters)));
            }
            children => unreachable!(
                "repetition must have exactly one child, found {}",
                children.len()
            ),
        }

        // Zero occurrences: the starters are valid exits too.
        exits.extend(starters.iter().copied());
        exits
    }

    /// Add epsilon transitions from `state` to every repeater
    fn loop_back(&mut self, state: StateId, repeaters: Option<&StateSet>) {
        if let Some(repeaters) = repeaters {
            for &to in repeaters {
                self.add_transition(state, Symbol::Epsilon, to);
            }
        }
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

/// States allocated for one extent during enrichment
///
/// `states` holds one state per direct character leaf, in child order.
/// `nested` holds the layouts of the sub-extents, in child order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateLayout {
    /// States of the direct character leaves
    pub states: Vec<StateId>,
    /// Layouts of the nested extents
    pub nested: Vec<StateLayout>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn build(pattern: &str) -> Automaton {
        Automaton::from_extent(&parse(pattern).unwrap())
    }

    fn labels(automaton: &Automaton, ids: &[StateId]) -> Vec<String> {
        ids.iter()
            .map(|&id| automaton.states[id].label().to_string())
            .collect()
    }

    #[test]
    fn test_new_automaton() {
        let automaton = Automaton::new();
        assert_eq!(automaton.len(), 1);
        assert_eq!(automaton.start().label(), "s");
        assert!(!automaton.start().has_transitions());
    }

    #[test]
    fn test_single_char() {
        let automaton = build("a");
        assert_eq!(automaton.len(), 2);
        assert_eq!(automaton.states[1].label(), "q0");
        assert_eq!(labels(&automaton, &automaton.targets(START, Symbol::Char('a'))), ["q0"]);
        assert!(!automaton.states[1].has_transitions());
    }

    #[test]
    fn test_concatenation() {
        let automaton = build("ab");
        assert_eq!(automaton.len(), 3);
        assert_eq!(automaton.targets(0, Symbol::Char('a')), vec![1]);
        assert_eq!(automaton.targets(1, Symbol::Char('b')), vec![2]);
        assert_eq!(automaton.edge_count(), 2);
    }

    #[test]
    fn test_union_branches_from_same_starters() {
        let automaton = build("a|b");
        assert_eq!(automaton.len(), 3);
        assert_eq!(automaton.targets(0, Symbol::Char('a')), vec![1]);
        assert_eq!(automaton.targets(0, Symbol::Char('b')), vec![2]);
    }

    #[test]
    fn test_char_repetition_self_loop() {
        let automaton = build("a^");
        assert_eq!(automaton.len(), 2);
        assert_eq!(automaton.targets(0, Symbol::Char('a')), vec![1]);
        assert_eq!(automaton.targets(1, Symbol::Char('a')), vec![1]);
        assert!(!automaton.epsilon_targets()[START]);
    }

    #[test]
    fn test_zero_occurrence_exit() {
        // Both `s` (skipping the loop) and `q0` (after it) lead to `b`.
        let automaton = build("a^b");
        assert_eq!(automaton.targets(1, Symbol::Char('b')), vec![2]);
        assert_eq!(automaton.targets(0, Symbol::Char('b')), vec![2]);
    }

    #[test]
    fn test_group_repetition_loops_back() {
        let automaton = build("(ab)^");
        assert_eq!(automaton.targets(0, Symbol::Char('a')), vec![1]);
        assert_eq!(automaton.targets(1, Symbol::Char('b')), vec![2]);
        assert_eq!(automaton.targets(2, Symbol::Epsilon), vec![START]);
        assert_eq!(automaton.epsilon_targets(), [true, false, false]);
    }

    #[test]
    fn test_repeated_union_loops_every_branch() {
        let automaton = build("(a|b)^c");
        // ids: 1 = a, 2 = b, 3 = c
        assert_eq!(automaton.targets(1, Symbol::Epsilon), vec![START]);
        assert_eq!(automaton.targets(2, Symbol::Epsilon), vec![START]);
        assert_eq!(automaton.targets(0, Symbol::Char('c')), vec![3]);
        assert_eq!(automaton.targets(1, Symbol::Char('c')), vec![3]);
        assert_eq!(automaton.targets(2, Symbol::Char('c')), vec![3]);
    }

    #[test]
    fn test_nested_repetition_accumulates_repeaters() {
        // Inner loop `b^` sits at the end of the outer repeated region, so
        // it loops back to the outer entry `s` as well.
        let automaton = build("(ab^)^");
        let q1 = automaton.find("q1").unwrap();
        assert_eq!(automaton.targets(q1, Symbol::Char('b')), vec![q1]);
        assert_eq!(automaton.targets(q1, Symbol::Epsilon), vec![START]);
    }

    #[test]
    fn test_inner_group_repeaters_include_its_starters() {
        let automaton = build("x(ab)^");
        let q0 = automaton.find("q0").unwrap();
        let q2 = automaton.find("q2").unwrap();
        assert_eq!(automaton.targets(q2, Symbol::Epsilon), vec![q0]);
    }

    #[test]
    fn test_state_names_follow_creation_order() {
        let automaton = build("a(b|c)d");
        let names: Vec<_> = automaton.states.iter().map(|s| s.label().to_string()).collect();
        assert_eq!(names, ["s", "q0", "q1", "q2", "q3"]);
        assert_eq!(automaton.targets(2, Symbol::Char('d')), vec![4]);
        assert_eq!(automaton.targets(3, Symbol::Char('d')), vec![4]);
    }

    #[test]
    fn test_enrich_layout_mirrors_tree() {
        let extent = parse("a(b|c)d^").unwrap();
        let mut automaton = Automaton::new();
        let layout = automaton.enrich(&extent);
        assert_eq!(layout.states, vec![1]);
        assert_eq!(layout.nested.len(), 2);
        assert_eq!(layout.nested[0].nested[0].states, vec![2]);
        assert_eq!(layout.nested[0].nested[1].states, vec![3]);
        assert_eq!(layout.nested[1].states, vec![4]);
    }

    #[test]
    fn test_reachable_from() {
        let automaton = build("ab");
        assert_eq!(automaton.reachable_from(0), BTreeSet::from([0, 1, 2]));
        assert_eq!(automaton.reachable_from(2), BTreeSet::from([2]));
    }

    #[test]
    fn test_state_display_marks_accepting() {
        let mut automaton = build("a");
        assert_eq!(automaton.states[1].name(), "q0");
        automaton.states[1].accepting = true;
        assert_eq!(automaton.states[1].name(), "*q0");
        assert_eq!(automaton.states[1].label(), "q0");
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::Char('a').to_string(), "a");
        assert_eq!(Symbol::Epsilon.to_string(), "ε");
        assert!(Symbol::Epsilon.is_epsilon());
    }
}

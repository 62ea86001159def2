//! Acceptance classification
//!
//! States are not marked accepting while the automaton is built. Instead,
//! acceptance is derived afterwards from forward reachability. A state is
//! accepting when:
//!
//! 1. it has no outgoing transitions, or
//! 2. the only state it can reach is itself, or
//! 3. it is the target of an epsilon transition and sits in a closed region:
//!    every state it can reach can reach exactly the same set of states.
//!
//! Rule 3 matches how repetition loops are wired: the end of a repeated
//! region returns to the loop entry over an epsilon edge. Note that the
//! zero-occurrence exits of a repetition are not marked by these rules.
//!
//! The rules are evaluated on strongly connected components rather than on
//! per-state reachable sets. A state sits in a closed region exactly when
//! its component has no edge leaving it; every member of such a component
//! reaches the component and nothing else.

use crate::nfa::{Automaton, StateId};
use log::debug;
use std::collections::BTreeSet;

/// Mark the accepting states of `automaton` in place
///
/// No states or transitions are added. Running this twice gives the same
/// result as running it once.
pub fn classify(automaton: &mut Automaton) {
    let component = components(automaton);
    let closed = closed_components(automaton, &component);
    let epsilon_targets = automaton.epsilon_targets();

    let accepting: Vec<bool> = automaton
        .states
        .iter()
        .enumerate()
        .map(|(id, state)| {
            if !state.has_transitions() {
                return true;
            }
            if state.edges().all(|(_, to)| to == id) {
                return true;
            }
            epsilon_targets[id] && closed[component[id]]
        })
        .collect();

    for (state, accept) in automaton.states.iter_mut().zip(accepting) {
        state.accepting = accept;
    }

    debug!(
        "classified {} of {} states as accepting",
        automaton.states.iter().filter(|s| s.accepting).count(),
        automaton.len()
    );
}

/// Strongly connected component of every state, indexed by state ID
///
/// Components are numbered in the order Tarjan's algorithm completes them,
/// so sinks come before the components that lead into them. The walk keeps
/// its own stack and does not recurse.
pub fn components(automaton: &Automaton) -> Vec<usize> {
    const UNVISITED: usize = usize::MAX;

    let count = automaton.len();
    let successors: Vec<Vec<StateId>> = automaton
        .states
        .iter()
        .map(|state| state.edges().map(|(_, to)| to).collect())
        .collect();

    let mut index = vec![UNVISITED; count];
    let mut low = vec![0; count];
    let mut on_stack = vec![false; count];
    let mut component = vec![UNVISITED; count];
    let mut stack = Vec::new();
    let mut next_index = 0;
    let mut next_component = 0;

    for root in 0..count {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = next_index;
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        // (state, position of its next successor to visit)
        let mut work = vec![(root, 0usize)];

        while let Some(frame) = work.last_mut() {
            let (state, next) = *frame;

            if let Some(&to) = successors[state].get(next) {
                frame.1 += 1;
                if index[to] == UNVISITED {
                    index[to] = next_index;
                    low[to] = next_index;
                    next_index += 1;
                    stack.push(to);
                    on_stack[to] = true;
                    work.push((to, 0));
                } else if on_stack[to] {
                    low[state] = low[state].min(index[to]);
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                low[parent] = low[parent].min(low[state]);
            }

            if low[state] == index[state] {
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component[member] = next_component;
                    if member == state {
                        break;
                    }
                }
                next_component += 1;
            }
        }
    }

    component
}

/// Whether each component has no edge leaving it, indexed by component
fn closed_components(automaton: &Automaton, component: &[usize]) -> Vec<bool> {
    let count = component.iter().map(|&c| c + 1).max().unwrap_or(0);
    let mut closed = vec![true; count];

    for (from, state) in automaton.states.iter().enumerate() {
        for (_, to) in state.edges() {
            if component[from] != component[to] {
                closed[component[from]] = false;
            }
        }
    }

    closed
}

/// Forward-reachable set of every state, indexed by state ID
///
/// This costs a full walk per state. Classification does not use it.
pub fn reachable_sets(automaton: &Automaton) -> Vec<BTreeSet<StateId>> {
    (0..automaton.len())
        .map(|id| automaton.reachable_from(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn classified(pattern: &str) -> Automaton {
        let mut automaton = Automaton::from_extent(&parse(pattern).unwrap());
        classify(&mut automaton);
        automaton
    }

    fn accepting_names(automaton: &Automaton) -> Vec<String> {
        automaton
            .states
            .iter()
            .filter(|s| s.accepting)
            .map(|s| s.name())
            .collect()
    }

    #[test]
    fn test_sink_is_accepting() {
        let automaton = classified("a");
        assert_eq!(accepting_names(&automaton), ["*q0"]);
        assert!(!automaton.start().accepting);
    }

    #[test]
    fn test_concatenation_end_is_accepting() {
        let automaton = classified("ab");
        assert_eq!(accepting_names(&automaton), ["*q1"]);
    }

    #[test]
    fn test_union_ends_are_accepting() {
        let automaton = classified("a|b");
        assert_eq!(accepting_names(&automaton), ["*q0", "*q1"]);
    }

    #[test]
    fn test_self_loop_is_accepting() {
        let automaton = classified("a^");
        assert_eq!(accepting_names(&automaton), ["*q0"]);
    }

    #[test]
    fn test_zero_occurrence_start_is_not_marked() {
        // `s` is a valid exit of `a^` (zero occurrences), but it has an
        // outgoing edge and is not an epsilon target. This is the current,
        // possibly non-canonical, behavior of the classifier.
        let automaton = classified("a^");
        assert!(!automaton.start().accepting);
        assert_eq!(automaton.start().name(), "s");
    }

    #[test]
    fn test_closed_loop_entry_is_accepting() {
        // s -a-> q0 -b-> q1 -ε-> s forms a closed region entered over ε.
        let automaton = classified("(ab)^");
        assert!(automaton.start().accepting);
        assert_eq!(automaton.start().name(), "*s");
        assert!(!automaton.states[1].accepting);
        assert!(!automaton.states[2].accepting);
    }

    #[test]
    fn test_open_loop_entry_is_not_accepting() {
        // The loop can be left towards q2, so the region is not closed.
        let automaton = classified("(ab)^c");
        assert!(!automaton.start().accepting);
        assert_eq!(accepting_names(&automaton), ["*q2"]);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let mut automaton = classified("x(a|b)^");
        let before = accepting_names(&automaton);
        classify(&mut automaton);
        assert_eq!(accepting_names(&automaton), before);
    }

    #[test]
    fn test_components_group_loops() {
        let automaton = classified("(ab)^c");
        let component = components(&automaton);
        assert_eq!(component[0], component[1]);
        assert_eq!(component[1], component[2]);
        assert_ne!(component[0], component[3]);
        // The sink `q2` completes first.
        assert_eq!(component[3], 0);
    }

    #[test]
    fn test_closed_components() {
        let automaton = classified("(ab)^c");
        let component = components(&automaton);
        let closed = closed_components(&automaton, &component);
        assert!(!closed[component[0]]);
        assert!(closed[component[3]]);
    }

    #[test]
    fn test_matches_reachable_set_rules() {
        for pattern in ["a", "(ab)^", "(ab)^c", "x(a|b)^", "((a|b)^c(d|e^)^)^f", "a(b|c^)^d"] {
            let automaton = classified(pattern);
            let reachable = reachable_sets(&automaton);
            for (id, state) in automaton.states.iter().enumerate() {
                let own = &reachable[id];
                let expected = !state.has_transitions()
                    || (own.len() == 1 && own.contains(&id))
                    || (automaton.epsilon_targets()[id]
                        && own.iter().all(|&other| reachable[other] == *own));
                assert_eq!(state.accepting, expected, "pattern {} state {}", pattern, id);
            }
        }
    }

    #[test]
    fn test_long_repeated_group() {
        let pattern = format!("({})^", "a".repeat(4000));
        let automaton = classified(&pattern);
        assert_eq!(automaton.len(), 4001);
        assert_eq!(accepting_names(&automaton), ["*s"]);
    }

    #[test]
    fn test_reachable_sets_are_closed() {
        let automaton = classified("a(b|c^)^d");
        let reachable = reachable_sets(&automaton);
        for set in &reachable {
            let expanded: BTreeSet<StateId> = set
                .iter()
                .flat_map(|&id| reachable[id].iter().copied())
                .collect();
            assert_eq!(&expanded, set);
        }
    }
}

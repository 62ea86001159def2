//! Text renderings of an automaton
//!
//! [`table`] produces a tab-separated transition table and [`diagram`] a
//! Mermaid flowchart. Both are read-only views; classify the automaton
//! first if accepting states should carry their marker.

use crate::nfa::{Automaton, StateId, Symbol};
use indexmap::IndexSet;

/// First line of every diagram
pub const FLOWCHART_HEADER: &str = "flowchart LR";

/// Distinct symbols in first-discovery order
///
/// States are scanned in creation order, and each state's transitions in
/// insertion order.
pub fn alphabet(automaton: &Automaton) -> IndexSet<Symbol> {
    automaton
        .states
        .iter()
        .flat_map(|state| state.transitions.keys().copied())
        .collect()
}

/// Render the transition table
///
/// The header row holds an empty cell followed by one quoted cell per
/// symbol. Each following row holds a state name and, per symbol, either
/// `{a,b}` or an empty cell. The header is left out when the automaton has
/// no transitions at all.
pub fn table(automaton: &Automaton) -> String {
    let symbols = alphabet(automaton);
    let mut lines = Vec::with_capacity(automaton.len() + 1);

    if !symbols.is_empty() {
        let mut header = String::new();
        for symbol in &symbols {
            header.push('\t');
            header.push_str(&format!("'{}'", symbol));
        }
        lines.push(header);
    }

    for state in &automaton.states {
        let mut row = state.name();
        for symbol in &symbols {
            row.push('\t');
            if let Some(targets) = state.transitions.get(symbol) {
                row.push_str(&format!("{{{}}}", join_names(automaton, targets)));
            }
        }
        lines.push(row);
    }

    lines.join("\n")
}

/// Render the automaton as a Mermaid flowchart
///
/// Each edge becomes `src((src)) -->|symbol| dst((dst))`. A state without
/// any incoming or outgoing edge is drawn as a bare node.
pub fn diagram(automaton: &Automaton) -> String {
    let mut lines = vec![FLOWCHART_HEADER.to_string()];
    let mut connected = vec![false; automaton.len()];

    for (from, state) in automaton.states.iter().enumerate() {
        for (symbol, to) in state.edges() {
            connected[from] = true;
            connected[to] = true;
            let target = automaton.states[to].name();
            lines.push(format!(
                "\t{src}(({src})) -->|{symbol}| {dst}(({dst}))",
                src = state.name(),
                symbol = symbol,
                dst = target
            ));
        }
    }

    for (state, _) in automaton
        .states
        .iter()
        .zip(&connected)
        .filter(|(_, connected)| !**connected)
    {
        lines.push(format!("\t{name}(({name}))", name = state.name()));
    }

    lines.join("\n")
}

fn join_names<'a>(automaton: &Automaton, targets: impl IntoIterator<Item = &'a StateId>) -> String {
    targets
        .into_iter()
        .map(|&id| automaton.states[id].name())
        .collect::<Vec<_>>()
        .join(",")
}

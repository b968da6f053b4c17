use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::Nondeterministic;
use crate::{
    fsm::Fsm,
    set::{Set, overlaps},
};

type Row<S, N> = BTreeMap<S, Set<N>>;

/// Subset construction over only the subsets reachable from the initial set
///
/// The map doubles as the worklist: subsets are appended the first time they
/// are seen and their rows are filled in order.
pub fn determinize<M: Nondeterministic + ?Sized>(
    nfa: &M,
) -> Fsm<M::Symbol, Set<M::State>> {
    let start = nfa.initial();
    let mut seen: IndexMap<Set<M::State>, Row<M::Symbol, M::State>> = IndexMap::new();
    seen.insert(start.clone(), BTreeMap::new());

    let mut next = 0;
    while let Some((set, _)) = seen.get_index(next) {
        let row: Row<_, _> = nfa
            .alphabet()
            .iter()
            .map(|c| (c.clone(), nfa.step(set, c)))
            .collect();

        for target in row.values() {
            if !seen.contains_key(target) {
                seen.insert(target.clone(), BTreeMap::new());
            }
        }

        seen[next] = row;
        next += 1;
    }

    tracing::debug!(
        states = seen.len(),
        symbols = nfa.alphabet().len(),
        "Determinized machine"
    );

    let accept: Vec<_> = seen
        .keys()
        .filter(|s| overlaps(s, nfa.accept()))
        .cloned()
        .collect();

    Fsm::from_table(nfa.alphabet().clone(), seen, start, accept)
}

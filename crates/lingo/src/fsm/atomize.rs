use std::hash::Hash;

use hashbrown::HashMap;

use super::{Fsm, Node};

struct Atomizer<N>(HashMap<N, usize>);

impl<N: Eq + Hash> Atomizer<N> {
    fn get(&mut self, node: N) -> usize {
        let fresh = self.0.len();
        *self.0.entry(node).or_insert(fresh)
    }
}

impl<S: Clone + Ord, N: Clone + Ord + Hash> Fsm<S, N> {
    /// Renumber the states of the machine as consecutive integers
    ///
    /// The start state becomes `0`.  Also returns the mapping from old states
    /// to new ones.
    #[must_use]
    pub fn atomize(self) -> (Fsm<S, usize>, HashMap<N, usize>) {
        let Self {
            alphabet,
            states,
            start,
            accept,
        } = self;
        let mut atoms = Atomizer(HashMap::with_capacity(states.len()));
        let start = atoms.get(start);

        let states = states
            .into_iter()
            .map(|(q, Node(row))| {
                let row = row.into_iter().map(|(c, t)| (c, atoms.get(t))).collect();
                (atoms.get(q), Node(row))
            })
            .collect();
        let accept = accept.into_iter().map(|q| atoms.get(q)).collect();

        (
            Fsm {
                alphabet,
                states,
                start,
                accept,
            },
            atoms.0,
        )
    }
}

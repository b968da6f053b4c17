//! Nondeterministic machines, with and without epsilon transitions, and their
//! conversion to [`Fsm`]s

use std::{collections::BTreeMap, hash::Hash};

use crate::{
    closure_builder::closure,
    fsm::Fsm,
    set::{Alphabet, Set, overlaps, powerset},
};

mod dfa_builder;

/// Operations shared by machines that track a set of current states
pub trait Nondeterministic {
    type Symbol: Clone + Ord;
    type State: Clone + Ord + Hash;

    fn alphabet(&self) -> &Alphabet<Self::Symbol>;

    fn states(&self) -> Set<Self::State>;

    /// The set of states the machine occupies before reading anything
    fn initial(&self) -> Set<Self::State>;

    fn accept(&self) -> &Set<Self::State>;

    /// Every state reachable from a member of `from` by reading `sym`
    ///
    /// Symbols outside the alphabet lead to the empty set.
    fn step(&self, from: &Set<Self::State>, sym: &Self::Symbol) -> Set<Self::State>;

    fn run(&self, word: &[Self::Symbol]) -> Set<Self::State> {
        word.iter()
            .fold(self.initial(), |states, sym| self.step(&states, sym))
    }

    fn accepts(&self, word: &[Self::Symbol]) -> bool { overlaps(&self.run(word), self.accept()) }

    /// The subset construction over every subset of the state set
    ///
    /// This builds `2^n` states whether or not they are reachable; see
    /// [`Nondeterministic::determinize`] for the pruned version.
    fn to_fsm(&self) -> Fsm<Self::Symbol, Set<Self::State>> {
        let accept = self.accept();
        let subsets = powerset(&self.states());
        let accepting: Vec<_> = subsets
            .iter()
            .filter(|s| overlaps(s, accept))
            .cloned()
            .collect();

        Fsm::new(
            self.alphabet().clone(),
            subsets,
            self.initial(),
            accepting,
            |s, c| self.step(s, c),
        )
    }

    /// The subset construction, restricted to the subsets reachable from the
    /// initial one
    fn determinize(&self) -> Fsm<Self::Symbol, Set<Self::State>> {
        dfa_builder::determinize(self)
    }
}

/// A nondeterministic finite-state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfsm<S, N> {
    alphabet: Alphabet<S>,
    states: BTreeMap<N, BTreeMap<S, Set<N>>>,
    start: Set<N>,
    accept: Set<N>,
}

impl<S: Clone + Ord, N: Clone + Ord> Nfsm<S, N> {
    /// Build a machine by tabulating `delta` over every state and symbol
    ///
    /// # Panics
    /// Panics if a start or accepting state is missing from `states`, or if
    /// `delta` leads outside of `states`.
    pub fn new(
        alphabet: Alphabet<S>,
        states: impl IntoIterator<Item = N>,
        start: impl IntoIterator<Item = N>,
        accept: impl IntoIterator<Item = N>,
        delta: impl Fn(&N, &S) -> Set<N>,
    ) -> Self {
        let states = states
            .into_iter()
            .map(|q| {
                let row = alphabet
                    .iter()
                    .map(|c| (c.clone(), delta(&q, c)))
                    .filter(|(_, t)| !t.is_empty())
                    .collect();
                (q, row)
            })
            .collect();

        Self::checked(
            alphabet,
            states,
            start.into_iter().collect(),
            accept.into_iter().collect(),
        )
    }

    /// Build a machine from a list of `(from, symbol, to)` transitions
    ///
    /// # Panics
    /// Panics if an edge mentions a symbol outside the alphabet or a state
    /// outside `states`, or if a start or accepting state is missing from
    /// `states`.
    pub fn from_edges(
        alphabet: Alphabet<S>,
        states: impl IntoIterator<Item = N>,
        start: impl IntoIterator<Item = N>,
        accept: impl IntoIterator<Item = N>,
        edges: impl IntoIterator<Item = (N, S, N)>,
    ) -> Self {
        let mut table: BTreeMap<N, BTreeMap<S, Vec<N>>> =
            states.into_iter().map(|q| (q, BTreeMap::new())).collect();

        for (from, sym, to) in edges {
            let Some(row) = table.get_mut(&from) else {
                panic!("Edge source is not a state of the machine");
            };
            row.entry(sym).or_default().push(to);
        }

        let states = table
            .into_iter()
            .map(|(q, row)| (q, row.into_iter().map(|(c, t)| (c, t.into())).collect()))
            .collect();

        Self::checked(
            alphabet,
            states,
            start.into_iter().collect(),
            accept.into_iter().collect(),
        )
    }

    fn checked(
        alphabet: Alphabet<S>,
        states: BTreeMap<N, BTreeMap<S, Set<N>>>,
        start: Set<N>,
        accept: Set<N>,
    ) -> Self {
        assert!(
            start.iter().all(|q| states.contains_key(q)),
            "Start state is not a state of the machine"
        );
        assert!(
            accept.iter().all(|q| states.contains_key(q)),
            "Accepting state is not a state of the machine"
        );

        for row in states.values() {
            assert!(
                row.keys().all(|c| alphabet.contains(c)),
                "Transition symbol is not in the alphabet"
            );
            assert!(
                row.values().flatten().all(|q| states.contains_key(q)),
                "Transition target is not a state of the machine"
            );
        }

        Self {
            alphabet,
            states,
            start,
            accept,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> &Set<N> { &self.start }

    /// Every transition of the machine as `(from, symbol, to)`
    pub fn edges(&self) -> impl Iterator<Item = (&N, &S, &N)> {
        self.states.iter().flat_map(|(q, row)| {
            row.iter()
                .flat_map(move |(c, ts)| ts.iter().map(move |t| (q, c, t)))
        })
    }
}

impl<S: Clone + Ord, N: Clone + Ord + Hash> Nondeterministic for Nfsm<S, N> {
    type State = N;
    type Symbol = S;

    #[inline]
    fn alphabet(&self) -> &Alphabet<S> { &self.alphabet }

    #[inline]
    fn states(&self) -> Set<N> { self.states.keys().cloned().collect() }

    #[inline]
    fn initial(&self) -> Set<N> { self.start.clone() }

    #[inline]
    fn accept(&self) -> &Set<N> { &self.accept }

    fn step(&self, from: &Set<N>, sym: &S) -> Set<N> {
        from.iter()
            .filter_map(|q| self.states.get(q).and_then(|row| row.get(sym)))
            .flatten()
            .cloned()
            .collect()
    }
}

impl<S: Clone + Ord, N: Clone + Ord> From<Fsm<S, N>> for Nfsm<S, N> {
    fn from(fsm: Fsm<S, N>) -> Self {
        Self::from_edges(
            fsm.alphabet().clone(),
            fsm.states().cloned(),
            [fsm.start().clone()],
            fsm.accept().iter().cloned(),
            fsm.edges()
                .map(|(q, c, t)| (q.clone(), c.clone(), t.clone())),
        )
    }
}

/// A nondeterministic finite-state machine with epsilon transitions
///
/// Every set of states this machine reports, including the initial one, is
/// closed under epsilon transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Efsm<S, N> {
    nfsm: Nfsm<S, N>,
    eps: BTreeMap<N, Set<N>>,
}

impl<S: Clone + Ord, N: Clone + Ord> Efsm<S, N> {
    /// Add the epsilon transitions given by `eps` to a machine
    ///
    /// # Panics
    /// Panics if `eps` leads outside the states of `nfsm`.
    pub fn new(nfsm: Nfsm<S, N>, eps: impl Fn(&N) -> Set<N>) -> Self {
        let eps = nfsm
            .states
            .keys()
            .map(|q| (q.clone(), eps(q)))
            .filter(|(_, t)| !t.is_empty())
            .collect();

        Self::checked(nfsm, eps)
    }

    /// Build a machine from lists of symbol and epsilon transitions
    ///
    /// # Panics
    /// Panics under the same conditions as [`Nfsm::from_edges`], or if an
    /// epsilon transition mentions a state outside `states`.
    pub fn from_edges(
        alphabet: Alphabet<S>,
        states: impl IntoIterator<Item = N>,
        start: impl IntoIterator<Item = N>,
        accept: impl IntoIterator<Item = N>,
        edges: impl IntoIterator<Item = (N, S, N)>,
        eps_edges: impl IntoIterator<Item = (N, N)>,
    ) -> Self {
        let nfsm = Nfsm::from_edges(alphabet, states, start, accept, edges);

        let mut eps: BTreeMap<N, Vec<N>> = BTreeMap::new();
        for (from, to) in eps_edges {
            eps.entry(from).or_default().push(to);
        }

        Self::checked(nfsm, eps.into_iter().map(|(q, t)| (q, t.into())).collect())
    }

    fn checked(nfsm: Nfsm<S, N>, eps: BTreeMap<N, Set<N>>) -> Self {
        assert!(
            eps.iter()
                .all(|(q, t)| nfsm.states.contains_key(q)
                    && t.iter().all(|t| nfsm.states.contains_key(t))),
            "Epsilon transition leads outside the machine"
        );

        Self { nfsm, eps }
    }

    /// Every state reachable from a member of `states` using only epsilon
    /// transitions
    #[must_use]
    pub fn eps_closure(&self, states: &Set<N>) -> Set<N> {
        closure(states.iter().cloned(), |q| {
            self.eps.get(q).into_iter().flatten().cloned()
        })
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> &Set<N> { self.nfsm.start() }
}

impl<S: Clone + Ord, N: Clone + Ord + Hash> Nondeterministic for Efsm<S, N> {
    type State = N;
    type Symbol = S;

    #[inline]
    fn alphabet(&self) -> &Alphabet<S> { self.nfsm.alphabet() }

    #[inline]
    fn states(&self) -> Set<N> { self.nfsm.states() }

    #[inline]
    fn initial(&self) -> Set<N> { self.eps_closure(self.nfsm.start()) }

    #[inline]
    fn accept(&self) -> &Set<N> { self.nfsm.accept() }

    fn step(&self, from: &Set<N>, sym: &S) -> Set<N> { self.eps_closure(&self.nfsm.step(from, sym)) }
}

impl<S, N> From<Nfsm<S, N>> for Efsm<S, N> {
    #[inline]
    fn from(nfsm: Nfsm<S, N>) -> Self {
        Self {
            nfsm,
            eps: BTreeMap::new(),
        }
    }
}

#[cfg(any(test, feature = "proptest"))]
pub mod prop {
    use proptest::prelude::*;

    use super::{Efsm, Nfsm};
    use crate::{
        prop::{AB, symbol},
        set::Alphabet,
    };

    /// Arbitrary machines over `{a, b}` with between one and `max_states`
    /// states and up to two transitions per state
    pub fn nfsm(max_states: usize) -> impl Strategy<Value = Nfsm<char, usize>> {
        (1..=max_states).prop_flat_map(|n| {
            (
                prop::collection::vec(0..n, 0..=2),
                prop::collection::vec(0..n, 0..=n),
                prop::collection::vec((0..n, symbol(), 0..n), 0..=2 * n),
            )
                .prop_map(move |(start, accept, edges)| {
                    Nfsm::from_edges(Alphabet::new(AB), 0..n, start, accept, edges)
                })
        })
    }

    /// Like [`nfsm`], with up to one epsilon transition per state
    pub fn efsm(max_states: usize) -> impl Strategy<Value = Efsm<char, usize>> {
        (1..=max_states).prop_flat_map(|n| {
            (
                prop::collection::vec(0..n, 0..=2),
                prop::collection::vec(0..n, 0..=n),
                prop::collection::vec((0..n, symbol(), 0..n), 0..=2 * n),
                prop::collection::vec((0..n, 0..n), 0..=n),
            )
                .prop_map(move |(start, accept, edges, eps)| {
                    Efsm::from_edges(Alphabet::new(AB), 0..n, start, accept, edges, eps)
                })
        })
    }
}

//! Deterministic finite-state machines with total, tabulated transition
//! functions

use std::{collections::BTreeMap, fmt};

use crate::{
    closure_builder::closure,
    set::{Alphabet, Set, cartesian},
};

mod atomize;

/// The outgoing transitions of a single state, one per alphabet symbol
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
struct Node<S, N>(BTreeMap<S, N>);

/// A boolean combinator for [`Fsm::product`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    Union,
    Intersection,
    SymmetricDifference,
    Difference,
}

impl BoolOp {
    #[inline]
    #[must_use]
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Self::Union => lhs || rhs,
            Self::Intersection => lhs && rhs,
            Self::SymmetricDifference => lhs != rhs,
            Self::Difference => lhs && !rhs,
        }
    }
}

/// A deterministic finite-state machine
///
/// Every state has exactly one transition for every symbol of the alphabet.
/// The invariants are checked when the machine is built, and violating them
/// panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fsm<S, N> {
    alphabet: Alphabet<S>,
    states: BTreeMap<N, Node<S, N>>,
    start: N,
    accept: Set<N>,
}

impl<S: Clone + Ord, N: Clone + Ord> Fsm<S, N> {
    /// Build a machine by tabulating `delta` over every state and symbol
    ///
    /// # Panics
    /// Panics if `start` or any member of `accept` is missing from `states`,
    /// or if `delta` leads outside of `states`.
    pub fn new(
        alphabet: Alphabet<S>,
        states: impl IntoIterator<Item = N>,
        start: N,
        accept: impl IntoIterator<Item = N>,
        delta: impl Fn(&N, &S) -> N,
    ) -> Self {
        let states = states
            .into_iter()
            .map(|q| {
                let row = alphabet.iter().map(|c| (c.clone(), delta(&q, c))).collect();
                (q, Node(row))
            })
            .collect();

        Self::checked(alphabet, states, start, accept.into_iter().collect())
    }

    /// Build a machine from an explicit transition table
    ///
    /// # Panics
    /// Panics if the table is not total over the alphabet, if it mentions a
    /// symbol outside the alphabet, or if any state referenced by the table,
    /// `start` or `accept` has no row of its own.
    pub fn from_table<R: IntoIterator<Item = (S, N)>>(
        alphabet: Alphabet<S>,
        table: impl IntoIterator<Item = (N, R)>,
        start: N,
        accept: impl IntoIterator<Item = N>,
    ) -> Self {
        let states = table
            .into_iter()
            .map(|(q, row)| (q, Node(row.into_iter().collect())))
            .collect();

        Self::checked(alphabet, states, start, accept.into_iter().collect())
    }

    fn checked(
        alphabet: Alphabet<S>,
        states: BTreeMap<N, Node<S, N>>,
        start: N,
        accept: Set<N>,
    ) -> Self {
        assert!(
            states.contains_key(&start),
            "Start state is not a state of the machine"
        );
        assert!(
            accept.iter().all(|q| states.contains_key(q)),
            "Accepting state is not a state of the machine"
        );

        for Node(row) in states.values() {
            assert!(
                row.keys().eq(alphabet.iter()),
                "Transitions do not cover exactly the alphabet"
            );
            assert!(
                row.values().all(|q| states.contains_key(q)),
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
    pub fn alphabet(&self) -> &Alphabet<S> { &self.alphabet }

    #[inline]
    #[must_use]
    pub fn start(&self) -> &N { &self.start }

    #[inline]
    #[must_use]
    pub fn accept(&self) -> &Set<N> { &self.accept }

    #[inline]
    pub fn states(&self) -> impl Iterator<Item = &N> { self.states.keys() }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.states.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.states.is_empty() }

    /// Every transition of the machine as `(from, symbol, to)`
    pub fn edges(&self) -> impl Iterator<Item = (&N, &S, &N)> {
        self.states
            .iter()
            .flat_map(|(q, Node(row))| row.iter().map(move |(c, t)| (q, c, t)))
    }

    /// The state reached from `state` on `sym`, or `None` if `sym` is not in
    /// the alphabet
    #[inline]
    #[must_use]
    pub fn step(&self, state: &N, sym: &S) -> Option<&N> {
        self.states.get(state).and_then(|Node(row)| row.get(sym))
    }

    fn target(&self, state: &N, sym: &S) -> &N {
        self.step(state, sym).unwrap_or_else(|| unreachable!())
    }

    /// The state reached by reading `word` from the start state, or `None`
    /// if the word contains a symbol outside the alphabet
    #[must_use]
    pub fn run(&self, word: &[S]) -> Option<&N> {
        word.iter()
            .try_fold(&self.start, |state, sym| self.step(state, sym))
    }

    #[inline]
    #[must_use]
    pub fn accepts(&self, word: &[S]) -> bool {
        self.run(word).is_some_and(|q| self.accept.contains(q))
    }

    /// Discard every state that cannot be reached from the start state
    #[must_use]
    pub fn reachable_part(&self) -> Self {
        let reached = closure([self.start.clone()], |q| {
            self.states
                .get(q)
                .into_iter()
                .flat_map(|Node(row)| row.values().cloned())
        });
        tracing::trace!(
            reached = reached.len(),
            total = self.states.len(),
            "Pruned unreachable states"
        );

        Self {
            alphabet: self.alphabet.clone(),
            states: self
                .states
                .iter()
                .filter(|(q, _)| reached.contains(*q))
                .map(|(q, n)| (q.clone(), n.clone()))
                .collect(),
            start: self.start.clone(),
            accept: self
                .accept
                .iter()
                .filter(|q| reached.contains(*q))
                .cloned()
                .collect(),
        }
    }

    /// A machine over the same alphabet accepting exactly the words this one
    /// rejects
    #[must_use]
    pub fn complement(&self) -> Self {
        Self {
            accept: self
                .states
                .keys()
                .filter(|q| !self.accept.contains(*q))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Run two machines in lockstep, accepting when `op` combines their
    /// verdicts to true
    ///
    /// # Panics
    /// Panics if the machines are defined over different alphabets.
    pub fn product_with<M: Clone + Ord>(
        &self,
        other: &Fsm<S, M>,
        op: impl Fn(bool, bool) -> bool,
    ) -> Fsm<S, (N, M)> {
        assert!(
            self.alphabet == other.alphabet,
            "Cannot take the product of machines over different alphabets"
        );

        let states = cartesian(
            &self.states.keys().cloned().collect(),
            &other.states.keys().cloned().collect(),
        );
        let accept: Vec<_> = states
            .iter()
            .filter(|(p, q)| op(self.accept.contains(p), other.accept.contains(q)))
            .cloned()
            .collect();

        Fsm::new(
            self.alphabet.clone(),
            states,
            (self.start.clone(), other.start.clone()),
            accept,
            |(p, q), c| (self.target(p, c).clone(), other.target(q, c).clone()),
        )
    }

    #[inline]
    #[must_use]
    pub fn product<M: Clone + Ord>(&self, other: &Fsm<S, M>, op: BoolOp) -> Fsm<S, (N, M)> {
        self.product_with(other, |l, r| op.apply(l, r))
    }

    #[inline]
    #[must_use]
    pub fn union<M: Clone + Ord>(&self, other: &Fsm<S, M>) -> Fsm<S, (N, M)> {
        self.product(other, BoolOp::Union)
    }

    #[inline]
    #[must_use]
    pub fn intersection<M: Clone + Ord>(&self, other: &Fsm<S, M>) -> Fsm<S, (N, M)> {
        self.product(other, BoolOp::Intersection)
    }

    #[inline]
    #[must_use]
    pub fn symmetric_difference<M: Clone + Ord>(&self, other: &Fsm<S, M>) -> Fsm<S, (N, M)> {
        self.product(other, BoolOp::SymmetricDifference)
    }

    #[inline]
    #[must_use]
    pub fn difference<M: Clone + Ord>(&self, other: &Fsm<S, M>) -> Fsm<S, (N, M)> {
        self.product(other, BoolOp::Difference)
    }
}

impl<S: Clone + Ord> Fsm<S, usize> {
    /// A single non-accepting state that loops on every symbol
    #[must_use]
    pub fn empty(alphabet: Alphabet<S>) -> Self { Self::new(alphabet, [0], 0, [], |_, _| 0) }

    /// A machine accepting only the one-symbol word `sym`
    ///
    /// # Panics
    /// Panics if `sym` is not in the alphabet.
    #[must_use]
    pub fn letter(alphabet: Alphabet<S>, sym: &S) -> Self {
        assert!(alphabet.contains(sym), "Letter is not in the alphabet");

        Self::new(alphabet, [0, 1, 2], 0, [1], |&q, c| {
            if q == 0 && c == sym { 1 } else { 2 }
        })
    }
}

/// A transition table with one row per state and one column per symbol
///
/// The start state is marked with `>` and accepting states with `*`.
impl<S: fmt::Display + Ord, N: fmt::Display + Ord> fmt::Display for Fsm<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: BTreeMap<&N, String> = self.states.keys().map(|q| (q, q.to_string())).collect();
        let syms: Vec<String> = self.alphabet.symbols().iter().map(ToString::to_string).collect();
        let width = names
            .values()
            .chain(&syms)
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);

        write!(f, "  {:width$}", "")?;
        for sym in &syms {
            write!(f, " {sym:width$}")?;
        }

        for (q, Node(row)) in &self.states {
            let start = if *q == self.start { '>' } else { ' ' };
            let accept = if self.accept.contains(q) { '*' } else { ' ' };
            write!(f, "\n{start}{accept}{:width$}", names[q])?;

            for t in row.values() {
                write!(f, " {:width$}", names[t])?;
            }
        }

        Ok(())
    }
}

#[cfg(any(test, feature = "proptest"))]
pub mod prop {
    use proptest::prelude::*;

    use super::Fsm;
    use crate::{prop::AB, set::Alphabet};

    /// Arbitrary complete machines over `{a, b}` with between one and
    /// `max_states` states
    pub fn fsm(max_states: usize) -> impl Strategy<Value = Fsm<char, usize>> {
        (1..=max_states).prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(0..n, AB.len()), n),
                0..n,
                prop::collection::vec(any::<bool>(), n),
            )
                .prop_map(|(table, start, accept)| {
                    Fsm::from_table(
                        Alphabet::new(AB),
                        table
                            .into_iter()
                            .enumerate()
                            .map(|(q, row)| (q, AB.into_iter().zip(row))),
                        start,
                        accept
                            .into_iter()
                            .enumerate()
                            .filter_map(|(q, a)| a.then_some(q)),
                    )
                })
        })
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{BoolOp, Fsm, prop::fsm};
    use crate::{prop::word, set::Alphabet};

    fn chars(s: &str) -> Vec<char> { s.chars().collect() }

    fn even_a() -> Fsm<char, bool> {
        Fsm::new(Alphabet::from("ab"), [false, true], false, [false], |&odd, &c| {
            odd ^ (c == 'a')
        })
    }

    #[test]
    fn even_number_of_a() {
        let m = even_a();
        for w in ["", "aa", "bb", "aab", "aabb", "abab", "baab"] {
            assert!(m.accepts(&chars(w)), "{w:?}");
        }
        for w in ["a", "ab", "bab", "aaa"] {
            assert!(!m.accepts(&chars(w)), "{w:?}");
        }
    }

    #[test]
    fn even_length() {
        let m = Fsm::new(Alphabet::from("ab"), [false, true], false, [false], |&odd, _| !odd);
        for w in ["", "aa", "bb", "aabb"] {
            assert!(m.accepts(&chars(w)), "{w:?}");
        }
        for w in ["a", "aab"] {
            assert!(!m.accepts(&chars(w)), "{w:?}");
        }
    }

    #[test]
    fn foreign_symbols_reject() {
        let m = even_a();
        assert_eq!(m.run(&chars("aca")), None);
        assert!(!m.accepts(&chars("c")));
        assert!(!m.complement().accepts(&chars("c")));
    }

    #[test]
    fn trivial_machines() {
        let ab = Alphabet::from("ab");
        let empty = Fsm::empty(ab.clone());
        assert_eq!(empty.len(), 1);
        assert!(!empty.accepts(&[]) && !empty.accepts(&chars("ab")));

        let a = Fsm::letter(ab, &'a');
        assert!(a.accepts(&chars("a")));
        for w in ["", "b", "aa", "ab", "ba"] {
            assert!(!a.accepts(&chars(w)), "{w:?}");
        }
    }

    #[test]
    #[should_panic(expected = "Letter is not in the alphabet")]
    fn foreign_letter() { let _ = Fsm::letter(Alphabet::from("ab"), &'c'); }

    #[test]
    #[should_panic(expected = "Transitions do not cover exactly the alphabet")]
    fn partial_table() {
        let _ = Fsm::from_table(Alphabet::from("ab"), [(0, [('a', 0)])], 0, []);
    }

    #[test]
    #[should_panic(expected = "Transition target is not a state of the machine")]
    fn dangling_target() {
        let _ = Fsm::new(Alphabet::from("ab"), [0], 0, [], |_, _| 1);
    }

    #[test]
    #[should_panic(expected = "Cannot take the product of machines over different alphabets")]
    fn product_alphabet_mismatch() {
        let a = Fsm::letter(Alphabet::from("ab"), &'a');
        let b = Fsm::letter(Alphabet::from("abc"), &'a');
        let _ = a.union(&b);
    }

    #[test]
    fn reachable_part_drops_island() {
        let m = Fsm::new(Alphabet::from("ab"), 0..4, 0, [1, 3], |&q, &c| match (q, c) {
            (0 | 1, 'a') => 1,
            (0 | 1, _) => 0,
            (_, _) => 3,
        });
        let r = m.reachable_part();
        assert_eq!(r.states().copied().collect::<Vec<_>>(), [0, 1]);
        assert_eq!(r.accept().as_slice(), &[1]);
    }

    #[test]
    fn display() {
        let m = Fsm::letter(Alphabet::from("ab"), &'a');
        assert_eq!(m.to_string(), "    a b\n> 0 1 2\n *1 2 2\n  2 2 2");
    }

    proptest! {
        #[test]
        fn product_agrees(l in fsm(4), r in fsm(4), w in word(6)) {
            let (lw, rw) = (l.accepts(&w), r.accepts(&w));

            for op in [
                BoolOp::Union,
                BoolOp::Intersection,
                BoolOp::SymmetricDifference,
                BoolOp::Difference,
            ] {
                prop_assert_eq!(l.product(&r, op).accepts(&w), op.apply(lw, rw));
            }

            prop_assert_eq!(l.product_with(&r, |a, b| !a || b).accepts(&w), !lw || rw);
        }

        #[test]
        fn complement_flips(m in fsm(4), w in word(6)) {
            prop_assert_eq!(m.complement().accepts(&w), !m.accepts(&w));
        }

        #[test]
        fn reachable_part_preserves_language(m in fsm(5), w in word(6)) {
            let r = m.reachable_part();
            prop_assert_eq!(r.accepts(&w), m.accepts(&w));
            prop_assert_eq!(r.reachable_part(), r.clone());
            prop_assert!(r.len() <= m.len());
        }
    }
}

use super::Regex;
use crate::{nfa::Efsm, set::Alphabet};

const START: usize = 0;
const ACCEPT: usize = 1;

struct EfsmBuilder<'a, S> {
    alphabet: &'a Alphabet<S>,
    next: usize,
    edges: Vec<(usize, S, usize)>,
    eps: Vec<(usize, usize)>,
}

impl<'a, S: Clone + Ord> EfsmBuilder<'a, S> {
    fn new(alphabet: &'a Alphabet<S>) -> Self {
        Self {
            alphabet,
            next: ACCEPT + 1,
            edges: vec![],
            eps: vec![],
        }
    }

    fn push(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    #[inline]
    fn connect(&mut self, from: usize, to: usize) { self.eps.push((from, to)); }

    /// Build a fragment between `head` and `tail` matching `regex`
    fn build_in(&mut self, regex: &Regex<S>, head: usize, tail: usize) {
        match regex {
            Regex::Empty => (),
            Regex::Lit(l) => {
                if self.alphabet.contains(l) {
                    self.edges.push((head, l.clone(), tail));
                }
            },
            Regex::Alt(l, r) => {
                for re in [l, r] {
                    let h = self.push();
                    let t = self.push();

                    self.build_in(re, h, t);
                    self.connect(head, h);
                    self.connect(t, tail);
                }
            },
            Regex::Cat(l, r) => {
                let mid = self.push();
                self.build_in(l, head, mid);
                self.build_in(r, mid, tail);
            },
            Regex::Star(r) => {
                let h = self.push();
                let t = self.push();

                self.build_in(r, h, t);
                self.connect(head, h);
                self.connect(t, tail);
                self.connect(head, tail);
                self.connect(t, h);
            },
        }
    }

    fn finish(self) -> Efsm<S, usize> {
        Efsm::from_edges(
            self.alphabet.clone(),
            0..self.next,
            [START],
            [ACCEPT],
            self.edges,
            self.eps,
        )
    }
}

impl<S: Clone + Ord> Regex<S> {
    /// Compile the expression to an epsilon-NFA over `alphabet`
    ///
    /// Literals outside the alphabet can never be matched, so they compile
    /// to no transition at all.
    #[must_use]
    pub fn to_efsm(&self, alphabet: &Alphabet<S>) -> Efsm<S, usize> {
        let mut builder = EfsmBuilder::new(alphabet);
        builder.build_in(self, START, ACCEPT);
        builder.finish()
    }
}

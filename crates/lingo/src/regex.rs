//! Regular expressions over an arbitrary symbol type

use crate::{lang::Lang, lol::Lol, set::Set};

mod derivative;
mod matcher;
mod nfa_builder;
pub mod syntax;

pub use syntax::{ParseError, Postfix};

type BoxRe<S> = Box<Regex<S>>;

/// A regular expression
///
/// `Alt` is union, `Cat` is concatenation and `Star` is Kleene closure.  The
/// language containing only the empty word has no variant of its own and is
/// written `Star(Empty)`; see [`Regex::unit`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex<S> {
    Empty,
    Lit(S),
    Alt(BoxRe<S>, BoxRe<S>),
    Cat(BoxRe<S>, BoxRe<S>),
    Star(BoxRe<S>),
}

impl<S> Regex<S> {
    /// The expression matching only the empty word
    #[must_use]
    pub fn unit() -> Self { Self::Empty.star() }

    #[must_use]
    pub fn alt(self, rhs: Self) -> Self { Self::Alt(self.into(), rhs.into()) }

    #[must_use]
    pub fn cat(self, rhs: Self) -> Self { Self::Cat(self.into(), rhs.into()) }

    #[must_use]
    pub fn star(self) -> Self { Self::Star(self.into()) }

    /// True for the literal spelling of [`Regex::unit`]
    #[inline]
    #[must_use]
    pub fn is_unit(&self) -> bool { matches!(self, Self::Star(r) if matches!(**r, Self::Empty)) }

    /// The number of literals in the expression
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Lit(_) => 1,
            Self::Alt(l, r) | Self::Cat(l, r) => l.size() + r.size(),
            Self::Star(r) => r.size(),
        }
    }

    fn map_impl<T, F: FnMut(S) -> T>(self, f: &mut F) -> Regex<T> {
        match self {
            Self::Empty => Regex::Empty,
            Self::Lit(l) => Regex::Lit(f(l)),
            Self::Alt(l, r) => l.map_impl(f).alt(r.map_impl(f)),
            Self::Cat(l, r) => l.map_impl(f).cat(r.map_impl(f)),
            Self::Star(r) => r.map_impl(f).star(),
        }
    }

    #[inline]
    pub fn map<T, F: FnMut(S) -> T>(self, mut f: F) -> Regex<T> { self.map_impl(&mut f) }

    /// True if the expression denotes no words at all
    #[must_use]
    pub fn is_empty_language(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Lit(_) | Self::Star(_) => false,
            Self::Alt(l, r) => l.is_empty_language() && r.is_empty_language(),
            Self::Cat(l, r) => l.is_empty_language() || r.is_empty_language(),
        }
    }

    /// True if the expression denotes exactly the empty word
    #[must_use]
    pub fn is_unit_language(&self) -> bool {
        match self {
            Self::Empty | Self::Lit(_) => false,
            Self::Alt(l, r) => {
                (l.is_unit_language() && (r.is_empty_language() || r.is_unit_language()))
                    || (l.is_empty_language() && r.is_unit_language())
            },
            Self::Cat(l, r) => l.is_unit_language() && r.is_unit_language(),
            Self::Star(r) => r.is_empty_language() || r.is_unit_language(),
        }
    }

    /// True if the expression matches the empty word
    #[must_use]
    pub fn is_bypassable(&self) -> bool {
        match self {
            Self::Empty | Self::Lit(_) => false,
            Self::Alt(l, r) => l.is_bypassable() || r.is_bypassable(),
            Self::Cat(l, r) => l.is_bypassable() && r.is_bypassable(),
            Self::Star(_) => true,
        }
    }

    /// True if the expression denotes infinitely many words
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        match self {
            Self::Empty | Self::Lit(_) => false,
            Self::Alt(l, r) => l.is_infinite() || r.is_infinite(),
            Self::Cat(l, r) => {
                (l.is_infinite() && !r.is_empty_language())
                    || (!l.is_empty_language() && r.is_infinite())
            },
            Self::Star(r) => !r.is_empty_language() && !r.is_unit_language(),
        }
    }
}

impl<S: Clone> Regex<S> {
    /// An expression matching the reverse of every word this one matches
    #[must_use]
    pub fn reverse(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Lit(l) => Self::Lit(l.clone()),
            Self::Alt(l, r) => l.reverse().alt(r.reverse()),
            Self::Cat(l, r) => r.reverse().cat(l.reverse()),
            Self::Star(r) => r.reverse().star(),
        }
    }
}

impl<S: Clone + Ord> Regex<S> {
    /// Every symbol appearing in a literal of this expression
    #[must_use]
    pub fn literals(&self) -> Set<S> {
        fn visit<'a, S>(re: &'a Regex<S>, out: &mut Vec<&'a S>) {
            match re {
                Regex::Empty => (),
                Regex::Lit(l) => out.push(l),
                Regex::Alt(l, r) | Regex::Cat(l, r) => {
                    visit(l, out);
                    visit(r, out);
                },
                Regex::Star(r) => visit(r, out),
            }
        }

        let mut out = vec![];
        visit(self, &mut out);
        out.into_iter().cloned().collect()
    }
}

impl<S: Clone + Ord + 'static> Regex<S> {
    /// The language this expression denotes
    #[must_use]
    pub fn denote(&self) -> Lang<S> {
        match self {
            Self::Empty => Lang::empty(),
            Self::Lit(l) => Lang::singleton(Lol::from(vec![l.clone()])),
            Self::Alt(l, r) => l.denote().union(&r.denote()),
            Self::Cat(l, r) => l.denote().concat(&r.denote()),
            Self::Star(r) => r.denote().star(),
        }
    }
}

#[cfg(any(test, feature = "proptest"))]
pub mod prop {
    use std::fmt;

    use proptest::prelude::*;

    use super::Regex;

    /// Arbitrary expressions over the symbols produced by `sym`
    pub fn re<S: Clone + fmt::Debug + 'static>(
        depth: u32,
        tree_size: u32,
        sym: impl Strategy<Value = S> + 'static,
    ) -> impl Strategy<Value = Regex<S>> {
        prop_oneof![
            1 => Just(Regex::Empty),
            1 => Just(Regex::unit()),
            4 => sym.prop_map(Regex::Lit),
        ]
        .prop_recursive(depth, tree_size, 2, |s| {
            prop_oneof![
                (s.clone(), s.clone()).prop_map(|(l, r)| l.alt(r)),
                (s.clone(), s.clone()).prop_map(|(l, r)| l.cat(r)),
                s.prop_map(Regex::star),
            ]
        })
    }

    /// Small expressions over `{a, b}`, cheap enough to match by brute force
    pub fn small_re() -> impl Strategy<Value = Regex<char>> { re(4, 12, crate::prop::symbol()) }
}

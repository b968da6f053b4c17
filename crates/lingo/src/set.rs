//! Sorted, duplicate-free sequences used as finite sets throughout the crate

use std::{borrow::Borrow, cmp::Ordering, fmt, slice, vec};

use crate::{lang::Lang, lol::Lol};

/// Sort `xs` and collapse runs of equal elements
#[must_use]
pub fn normalize<T: Ord>(mut xs: Vec<T>) -> Set<T> {
    xs.sort_unstable();
    xs.dedup();
    Set(xs)
}

/// Every ordered pair `(x, y)` with `x` drawn from `xs` and `y` from `ys`
#[must_use]
pub fn cartesian<A: Clone + Ord, B: Clone + Ord>(xs: &Set<A>, ys: &Set<B>) -> Set<(A, B)> {
    // Both inputs are sorted, so the pairs come out in lexicographic order
    Set(xs
        .iter()
        .flat_map(|x| ys.iter().map(move |y| (x.clone(), y.clone())))
        .collect())
}

/// Every subset of `xs`
///
/// The subsets of the tail are computed first, then each is emitted twice:
/// once as-is and once with the head prepended.  This is exponential in the
/// size of `xs`.
#[must_use]
pub fn powerset<T: Clone + Ord>(xs: &Set<T>) -> Set<Set<T>> {
    fn subsets<T: Clone>(xs: &[T]) -> Vec<Vec<T>> {
        let Some((head, tail)) = xs.split_first() else {
            return vec![vec![]];
        };

        let rest = subsets(tail);
        let mut out: Vec<_> = rest
            .iter()
            .map(|s| {
                let mut v = Vec::with_capacity(s.len() + 1);
                v.push(head.clone());
                v.extend_from_slice(s);
                v
            })
            .collect();
        out.extend(rest);
        out
    }

    // Every subset inherits the order of xs, so only the outer set needs
    // sorting
    normalize(subsets(&xs.0).into_iter().map(Set).collect())
}

/// True if `xs` and `ys` share at least one element
#[must_use]
pub fn overlaps<T: Ord>(xs: &Set<T>, ys: &Set<T>) -> bool {
    let (mut l, mut r) = (xs.iter().peekable(), ys.iter().peekable());

    while let (Some(a), Some(b)) = (l.peek(), r.peek()) {
        match a.cmp(b) {
            Ordering::Less => {
                l.next();
            },
            Ordering::Greater => {
                r.next();
            },
            Ordering::Equal => return true,
        }
    }

    false
}

/// A finite set stored as a strictly increasing sequence
///
/// Because the representation is canonical, two sets are equal exactly when
/// their sequences are, and the derived [`Ord`] and [`Hash`] make a `Set` a
/// valid state for another automaton.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Set<T>(Vec<T>);

impl<T> Default for Set<T> {
    #[inline]
    fn default() -> Self { Self(Vec::new()) }
}

impl<T> Set<T> {
    pub const EMPTY: Self = Self(Vec::new());

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> { self.0.iter() }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] { &self.0 }
}

impl<T: Ord> Set<T> {
    #[inline]
    #[must_use]
    pub fn singleton(t: T) -> Self { Self(vec![t]) }

    #[inline]
    #[must_use]
    pub fn contains<Q: Ord + ?Sized>(&self, t: &Q) -> bool
    where T: Borrow<Q> {
        self.0.binary_search_by(|x| x.borrow().cmp(t)).is_ok()
    }

    /// Merge two sets, keeping a single copy of shared elements
    #[must_use]
    pub fn union(&self, other: &Self) -> Self
    where T: Clone {
        let mut out = Vec::with_capacity(self.len() + other.len());
        let (mut l, mut r) = (self.iter().peekable(), other.iter().peekable());

        loop {
            let next = match (l.peek(), r.peek()) {
                (None, None) => break,
                (Some(_), None) => l.next(),
                (None, Some(_)) => r.next(),
                (Some(a), Some(b)) => match a.cmp(b) {
                    Ordering::Less => l.next(),
                    Ordering::Greater => r.next(),
                    Ordering::Equal => {
                        r.next();
                        l.next()
                    },
                },
            };

            out.extend(next.cloned());
        }

        Self(out)
    }

    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool { self.iter().all(|t| other.contains(t)) }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(it: I) -> Self { normalize(it.into_iter().collect()) }
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
    #[inline]
    fn from(arr: [T; N]) -> Self { normalize(arr.into()) }
}

impl<T: Ord> From<Vec<T>> for Set<T> {
    #[inline]
    fn from(v: Vec<T>) -> Self { normalize(v) }
}

impl<T> From<Set<T>> for Vec<T> {
    #[inline]
    fn from(Set(v): Set<T>) -> Self { v }
}

impl<T> IntoIterator for Set<T> {
    type IntoIter = vec::IntoIter<T>;
    type Item = T;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type IntoIter = slice::Iter<'a, T>;
    type Item = &'a T;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl<T: fmt::Display> fmt::Display for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, t) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            t.fmt(f)?;
        }
        f.write_str("}")
    }
}

/// The finite set of symbols an automaton or language is defined over
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Alphabet<S>(Set<S>);

impl<S: Ord> Alphabet<S> {
    #[inline]
    pub fn new<I: IntoIterator<Item = S>>(syms: I) -> Self { Self(syms.into_iter().collect()) }

    #[inline]
    #[must_use]
    pub fn symbols(&self) -> &Set<S> { &self.0 }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, S> { self.0.iter() }

    #[inline]
    #[must_use]
    pub fn contains(&self, sym: &S) -> bool { self.0.contains(sym) }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<S: Clone + Ord + 'static> Alphabet<S> {
    /// Every word over this alphabet, shortest first
    #[must_use]
    pub fn words(&self) -> Lang<S> {
        self.iter()
            .map(|s| Lang::singleton(Lol::from(vec![s.clone()])))
            .fold(Lang::empty(), |l, r| l.union(&r))
            .star()
    }
}

impl From<&str> for Alphabet<char> {
    #[inline]
    fn from(s: &str) -> Self { Self::new(s.chars()) }
}

impl<S: Ord> FromIterator<S> for Alphabet<S> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = S>>(it: I) -> Self { Self::new(it) }
}

impl<'a, S> IntoIterator for &'a Alphabet<S> {
    type IntoIter = slice::Iter<'a, S>;
    type Item = &'a S;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

#[cfg(test)]
mod test {
    use proptest::{collection::vec, prelude::*};

    use super::*;

    #[test]
    fn normalize_drops_scattered_duplicates() {
        assert_eq!(normalize(vec![3, 1, 2, 1, 3, 3]).as_slice(), &[1, 2, 3]);
        assert!(normalize(Vec::<u8>::new()).is_empty());
    }

    #[test]
    fn powerset_of_three() {
        let p = powerset(&Set::from([1, 2, 3]));
        assert_eq!(p.len(), 8);
        assert!(p.contains(&Set::<i32>::EMPTY));
        assert!(p.contains(&Set::from([1, 3])));
        assert!(p.contains(&Set::from([1, 2, 3])));
        assert!(p.iter().all(|s| s.is_subset(&Set::from([1, 2, 3]))));
    }

    #[test]
    fn cartesian_pairs() {
        let c = cartesian(&Set::from([1, 2]), &Set::from(['x', 'y']));
        assert_eq!(c.as_slice(), &[(1, 'x'), (1, 'y'), (2, 'x'), (2, 'y')]);
        assert!(cartesian(&Set::<u8>::EMPTY, &Set::from([1])).is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(Set::from([2, 1]).to_string(), "{1, 2}");
        assert_eq!(Set::<u8>::EMPTY.to_string(), "{}");
    }

    #[test]
    fn alphabet_words() {
        let words: Vec<String> = Alphabet::from("ba")
            .words()
            .up_to(2)
            .into_iter()
            .map(|w| w.iter().collect())
            .collect();
        assert_eq!(words, ["", "a", "b", "aa", "ab", "ba", "bb"]);
    }

    proptest! {
        #[test]
        fn normalized(xs in vec(0_u8..16, 0..32)) {
            let s = normalize(xs.clone());
            prop_assert!(s.as_slice().windows(2).all(|w| w[0] < w[1]));
            prop_assert!(xs.iter().all(|x| s.contains(x)));
        }

        #[test]
        fn overlap_matches_naive(xs in vec(0_u8..16, 0..8), ys in vec(0_u8..16, 0..8)) {
            let naive = xs.iter().any(|x| ys.contains(x));
            prop_assert_eq!(overlaps(&Set::from(xs), &Set::from(ys)), naive);
        }

        #[test]
        fn union_matches_naive(xs in vec(0_u8..16, 0..8), ys in vec(0_u8..16, 0..8)) {
            let naive = Set::from_iter(xs.iter().chain(&ys).copied());
            prop_assert_eq!(Set::from(xs).union(&Set::from(ys)), naive);
        }

        #[test]
        fn powerset_size(xs in vec(0_u8..16, 0..6)) {
            let s = Set::from(xs);
            prop_assert_eq!(powerset(&s).len(), 1 << s.len());
        }
    }
}

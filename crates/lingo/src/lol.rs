//! Length-ordered lists: words that sort shortest-first

use std::{cmp::Ordering, fmt, ops::Deref, rc::Rc};

/// A word paired with its length
///
/// Words are ordered by length first and then lexicographically (shortlex
/// order), which unlike plain dictionary order places every word of an
/// infinite language at a finite position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Lol<S> {
    len: usize,
    syms: Rc<[S]>,
}

impl<S> Lol<S> {
    #[must_use]
    pub fn new(syms: impl Into<Rc<[S]>>) -> Self {
        let syms = syms.into();
        Self {
            len: syms.len(),
            syms,
        }
    }

    #[must_use]
    pub fn empty() -> Self { Self::new([]) }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.len }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len == 0 }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[S] { &self.syms }
}

impl<S: Clone> Lol<S> {
    #[must_use]
    pub fn concat(&self, rhs: &Self) -> Self {
        if rhs.is_empty() {
            return self.clone();
        }

        if self.is_empty() {
            return rhs.clone();
        }

        Self {
            len: self.len + rhs.len,
            syms: self.syms.iter().chain(rhs.syms.iter()).cloned().collect(),
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self { self.syms.iter().rev().cloned().collect() }
}

impl<S: Clone + PartialEq> Lol<S> {
    /// The suffix left after removing `prefix`, if this word begins with it
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        if prefix.len > self.len {
            return None;
        }

        if prefix.is_empty() {
            return Some(self.clone());
        }

        self.syms.strip_prefix(&*prefix.syms).map(Self::from)
    }
}

impl<S: Ord> Ord for Lol<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| self.syms.cmp(&other.syms))
    }
}

impl<S: Ord> PartialOrd for Lol<S> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<S> Deref for Lol<S> {
    type Target = [S];

    #[inline]
    fn deref(&self) -> &[S] { &self.syms }
}

impl<S> Default for Lol<S> {
    #[inline]
    fn default() -> Self { Self::empty() }
}

impl<S> From<Vec<S>> for Lol<S> {
    #[inline]
    fn from(v: Vec<S>) -> Self { Self::new(v) }
}

impl<S: Clone> From<&[S]> for Lol<S> {
    #[inline]
    fn from(s: &[S]) -> Self { Self::new(s) }
}

impl From<&str> for Lol<char> {
    #[inline]
    fn from(s: &str) -> Self { s.chars().collect() }
}

impl<S> FromIterator<S> for Lol<S> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = S>>(it: I) -> Self {
        Self::new(it.into_iter().collect::<Rc<[S]>>())
    }
}

impl<S: fmt::Debug> fmt::Debug for Lol<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.syms.iter()).finish()
    }
}

impl<S: fmt::Display> fmt::Display for Lol<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("ε");
        }

        self.syms.iter().try_for_each(|s| s.fmt(f))
    }
}

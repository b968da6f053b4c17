//! Possibly-infinite languages represented as lazy streams of words
//!
//! A [`Lang`] is a memoized lazy list: every cell holds a suspended
//! computation which, once forced, yields either the end of the stream or a
//! word followed by the (still suspended) rest of the stream.  Words appear in
//! strictly increasing shortlex order, so no word appears twice and every word
//! of the language sits at a finite position.
//!
//! Each operator drives its output cells from an iterator holding flat
//! cursors into its operands.  Forcing a cell therefore recurses only as deep
//! as the expression that built the stream, never as deep as the position
//! being forced, and `lang.iter().take(n)` stays finite even when `lang` is
//! not.

use std::{cmp::Ordering, fmt, iter, mem, rc::Rc, vec};

use once_cell::unsync::Lazy;

use crate::{lol::Lol, set::normalize};

type Thunk<S> = Box<dyn FnOnce() -> Node<S>>;

#[derive(Clone)]
enum Node<S> {
    Nil,
    Cons(Lol<S>, Lang<S>),
}

/// A shortlex-sorted, duplicate-free, possibly-infinite set of words
pub struct Lang<S>(Rc<Lazy<Node<S>, Thunk<S>>>);

impl<S> Lang<S> {
    /// Detach the tail of this cell if nothing else can observe it
    fn unlink(&mut self) -> Option<Self> {
        let node = Lazy::get_mut(Rc::get_mut(&mut self.0)?)?;

        match mem::replace(node, Node::Nil) {
            Node::Nil => None,
            Node::Cons(_, tail) => Some(tail),
        }
    }
}

impl<S> Drop for Lang<S> {
    fn drop(&mut self) {
        // Dropping a long forced list cell by cell would recurse once per word
        let mut next = self.unlink();
        while let Some(mut cell) = next {
            next = cell.unlink();
        }
    }
}

impl<S> Clone for Lang<S> {
    #[inline]
    fn clone(&self) -> Self { Self(Rc::clone(&self.0)) }
}

impl<S> fmt::Debug for Lang<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lang").finish_non_exhaustive()
    }
}

impl<S: 'static> Lang<S> {
    #[inline]
    fn suspend(thunk: Thunk<S>) -> Self { Self(Rc::new(Lazy::new(thunk))) }

    #[inline]
    fn ready(node: Node<S>) -> Self { Self::suspend(Box::new(move || node)) }

    #[inline]
    fn cons(head: Lol<S>, tail: Self) -> Self { Self::ready(Node::Cons(head, tail)) }

    /// Build a stream whose cells are pulled from `words` one at a time
    ///
    /// `words` must yield a strictly increasing sequence.
    fn unfold<I: Iterator<Item = Lol<S>> + 'static>(mut words: I) -> Self {
        Self::suspend(Box::new(move || match words.next() {
            Some(head) => Node::Cons(head, Self::unfold(words)),
            None => Node::Nil,
        }))
    }

    #[inline]
    #[must_use]
    pub fn empty() -> Self { Self::ready(Node::Nil) }

    #[inline]
    #[must_use]
    pub fn singleton(word: Lol<S>) -> Self { Self::cons(word, Self::empty()) }
}

impl<S: Clone + 'static> Lang<S> {
    /// Evaluate the first cell of the stream
    ///
    /// # Panics
    /// Panics if evaluating the cell requires the cell itself, which means an
    /// operator recursed before producing its first word.
    fn force(&self) -> Node<S> { Lazy::force(&*self.0).clone() }

    /// Split the stream into its least word and the remaining words
    #[must_use]
    pub fn uncons(&self) -> Option<(Lol<S>, Self)> {
        match self.force() {
            Node::Nil => None,
            Node::Cons(head, tail) => Some((head, tail)),
        }
    }

    /// True if the language has no words.  Only forces the first cell.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.uncons().is_none() }

    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<S> { Iter(self.clone()) }

    /// Every word of at most `max_len` symbols
    ///
    /// This forces the stream up to the first word longer than `max_len`.
    #[must_use]
    pub fn up_to(&self, max_len: usize) -> Vec<Lol<S>> {
        self.iter().take_while(|w| w.len() <= max_len).collect()
    }

    /// Remove the empty word, if present
    #[must_use]
    pub fn drop_empty(&self) -> Self { Self::unfold(self.iter().skip_while(Lol::is_empty)) }
}

impl<S: Clone + Ord + 'static> Lang<S> {
    /// Test whether `word` is in the language
    ///
    /// The stream is only forced up to the first word not less than `word`.
    #[must_use]
    pub fn contains(&self, word: &Lol<S>) -> bool {
        self.iter().find(|w| w >= word).is_some_and(|w| w == *word)
    }

    /// The union of two languages, computed by merging the two streams
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (mut l, mut r) = (self.iter().peekable(), other.iter().peekable());

        Self::unfold(iter::from_fn(move || match (l.peek(), r.peek()) {
            (None, _) => r.next(),
            (_, None) => l.next(),
            (Some(x), Some(y)) => match x.cmp(y) {
                Ordering::Less => l.next(),
                Ordering::Greater => r.next(),
                Ordering::Equal => {
                    r.next();
                    l.next()
                },
            },
        }))
    }

    /// Every word of `self` followed by every word of `other`
    ///
    /// Output is produced one length at a time: the words of length `n` are
    /// the concatenations of a word of length `i` from `self` with a word of
    /// length `n - i` from `other`.  Empty if either operand is empty.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self::unfold(Concat {
            lhs: Layers::new(self),
            rhs: Layers::new(other),
            len: 0,
            buf: vec![].into_iter(),
        })
    }

    /// The Kleene closure: the empty word, plus every concatenation of one or
    /// more words of `self`
    ///
    /// The words of each length are built from the nonempty words of `self`
    /// and the shorter words this closure already produced, so every call
    /// shares one table of previous results.
    #[must_use]
    pub fn star(&self) -> Self {
        Self::unfold(Kleene {
            plus: Layers::new(&self.drop_empty()),
            done: vec![],
            buf: vec![].into_iter(),
        })
    }

    /// The words `z` for which `prefix` followed by `z` is in the language
    ///
    /// Words shorter than `prefix` are skipped.  Note that asking for the next
    /// word of a quotient never returns if the underlying language is infinite
    /// but has no further words beginning with `prefix`.
    #[must_use]
    pub fn left_quotient(&self, prefix: &Lol<S>) -> Self {
        let prefix = prefix.clone();
        Self::unfold(self.iter().filter_map(move |w| w.strip_prefix(&prefix)))
    }
}

/// The words of a language bucketed by length, read from the stream on demand
struct Layers<S> {
    src: Iter<S>,
    pending: Option<Lol<S>>,
    exhausted: bool,
    layers: Vec<Vec<Lol<S>>>,
    /// Lengths of the nonempty layers, ascending
    lengths: Vec<usize>,
}

impl<S: Clone + 'static> Layers<S> {
    fn new(lang: &Lang<S>) -> Self {
        Self {
            src: lang.iter(),
            pending: None,
            exhausted: false,
            layers: vec![],
            lengths: vec![],
        }
    }

    /// Read every word of at most `len` symbols
    fn fill(&mut self, len: usize) {
        if self.layers.len() <= len {
            self.layers.resize_with(len + 1, Vec::new);
        }

        while !self.exhausted {
            let Some(word) = self.pending.take().or_else(|| self.src.next()) else {
                self.exhausted = true;
                break;
            };

            if word.len() > len {
                self.pending = Some(word);
                break;
            }

            if self.lengths.last() != Some(&word.len()) {
                self.lengths.push(word.len());
            }
            self.layers[word.len()].push(word);
        }
    }

    /// `None` while words may remain unread, otherwise the length of the
    /// longest word, if there is one
    fn finished(&self) -> Option<Option<usize>> {
        self.exhausted.then(|| self.lengths.last().copied())
    }

    fn layer(&self, len: usize) -> &[Lol<S>] {
        self.layers.get(len).map(Vec::as_slice).unwrap_or_default()
    }
}

struct Concat<S> {
    lhs: Layers<S>,
    rhs: Layers<S>,
    len: usize,
    buf: vec::IntoIter<Lol<S>>,
}

impl<S: Clone + Ord + 'static> Iterator for Concat<S> {
    type Item = Lol<S>;

    fn next(&mut self) -> Option<Lol<S>> {
        loop {
            if let Some(word) = self.buf.next() {
                return Some(word);
            }

            let len = self.len;
            self.lhs.fill(len);
            self.rhs.fill(len);

            match (self.lhs.finished(), self.rhs.finished()) {
                (Some(None), _) | (_, Some(None)) => return None,
                (Some(Some(m)), Some(Some(n))) if len > m + n => return None,
                _ => (),
            }

            let (lhs, rhs) = (&self.lhs, &self.rhs);
            let words = lhs
                .lengths
                .iter()
                .take_while(|&&i| i <= len)
                .flat_map(move |&i| {
                    let right = rhs.layer(len - i);
                    lhs.layer(i)
                        .iter()
                        .flat_map(move |x| right.iter().map(move |y| x.concat(y)))
                })
                .collect();

            self.buf = normalize(words).into_iter();
            self.len += 1;
        }
    }
}

struct Kleene<S> {
    plus: Layers<S>,
    /// Every word of the closure produced so far, bucketed by length
    done: Vec<Vec<Lol<S>>>,
    buf: vec::IntoIter<Lol<S>>,
}

impl<S: Clone + Ord + 'static> Iterator for Kleene<S> {
    type Item = Lol<S>;

    fn next(&mut self) -> Option<Lol<S>> {
        loop {
            if let Some(word) = self.buf.next() {
                return Some(word);
            }

            let len = self.done.len();
            let layer: Vec<_> = if len == 0 {
                vec![Lol::empty()]
            } else {
                self.plus.fill(len);

                // Repeating the empty word would never make progress
                if self.plus.finished() == Some(None) {
                    return None;
                }

                let (plus, done) = (&self.plus, &self.done);
                let words = plus
                    .lengths
                    .iter()
                    .take_while(|&&i| i <= len)
                    .flat_map(move |&i| {
                        let right = &done[len - i];
                        plus.layer(i)
                            .iter()
                            .flat_map(move |x| right.iter().map(move |y| x.concat(y)))
                    })
                    .collect();

                normalize(words).into()
            };

            self.done.push(layer.clone());
            self.buf = layer.into_iter();
        }
    }
}

impl<S: Clone + Ord + 'static> FromIterator<Lol<S>> for Lang<S> {
    fn from_iter<I: IntoIterator<Item = Lol<S>>>(it: I) -> Self {
        Self::unfold(normalize(it.into_iter().collect()).into_iter())
    }
}

/// Iterator over the words of a [`Lang`], shortest first
#[derive(Debug, Clone)]
pub struct Iter<S>(Lang<S>);

impl<S: Clone + 'static> Iterator for Iter<S> {
    type Item = Lol<S>;

    fn next(&mut self) -> Option<Self::Item> {
        let (head, tail) = self.0.uncons()?;
        self.0 = tail;
        Some(head)
    }
}

impl<S: Clone + 'static> IntoIterator for Lang<S> {
    type IntoIter = Iter<S>;
    type Item = Lol<S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { Iter(self) }
}

impl<S: Clone + 'static> IntoIterator for &Lang<S> {
    type IntoIter = Iter<S>;
    type Item = Lol<S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(any(test, feature = "proptest"))]
pub mod prop {
    use proptest::prelude::*;

    use crate::{lol::Lol, prop::word};

    /// A short list of words, suitable for collecting into a finite
    /// [`Lang`](super::Lang)
    pub fn words(max_words: usize, max_len: usize) -> impl Strategy<Value = Vec<Lol<char>>> {
        prop::collection::vec(word(max_len).prop_map(Lol::from), 0..=max_words)
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::{Lang, prop::words};
    use crate::{lol::Lol, set::Alphabet};

    fn lang(words: &[&str]) -> Lang<char> { words.iter().map(|&w| Lol::from(w)).collect() }

    fn strings(lang: &Lang<char>, max_len: usize) -> Vec<String> {
        lang.up_to(max_len)
            .iter()
            .map(|w| w.iter().collect())
            .collect()
    }

    fn all(lang: &Lang<char>) -> Vec<Lol<char>> { lang.iter().collect() }

    fn strictly_sorted(words: &[Lol<char>]) -> bool { words.windows(2).all(|w| w[0] < w[1]) }

    #[test]
    fn from_list_normalizes() {
        assert_eq!(strings(&lang(&["b", "", "ab", "b", "a"]), 9), [
            "", "a", "b", "ab"
        ]);
    }

    #[test]
    fn star_of_letter() {
        let a_star = lang(&["a"]).star();
        let first: Vec<String> = a_star
            .iter()
            .take(5)
            .map(|w| w.iter().collect())
            .collect();
        assert_eq!(first, ["", "a", "aa", "aaa", "aaaa"]);
        assert!(a_star.contains(&Lol::from("aaaaaaa")));
        assert!(!a_star.contains(&Lol::from("aab")));
    }

    #[test]
    fn star_of_trivial() {
        assert_eq!(strings(&Lang::<char>::empty().star(), 9), [""]);
        assert_eq!(strings(&lang(&[""]).star(), 9), [""]);
        assert_eq!(all(&lang(&[""]).star().star()).len(), 1);
    }

    #[test]
    fn star_with_empty_word() {
        assert_eq!(strings(&lang(&["", "ab"]).star(), 4), ["", "ab", "abab"]);
    }

    #[test]
    fn infinite_concat() {
        let l = lang(&["a", "b"]).star().concat(&lang(&["c"]).star());
        assert_eq!(strings(&l, 2), [
            "", "a", "b", "c", "aa", "ab", "ac", "ba", "bb", "bc", "cc"
        ]);
        assert!(l.contains(&Lol::from("abbacccc")));
        assert!(!l.contains(&Lol::from("cab")));
    }

    #[test]
    fn concat_with_empty() {
        let inf = lang(&["a"]).star();
        assert!(inf.concat(&Lang::empty()).is_empty());
        assert!(Lang::empty().concat(&inf).is_empty());
    }

    #[test]
    fn quotient() {
        let l = lang(&["a", "ab", "abb", "b", "ba"]);
        assert_eq!(strings(&l.left_quotient(&Lol::from("ab")), 9), ["", "b"]);
        assert_eq!(strings(&l.left_quotient(&Lol::empty()), 9), strings(&l, 9));

        let a_star_b = lang(&["a"]).star().concat(&lang(&["b"]));
        assert_eq!(
            strings(&a_star_b.left_quotient(&Lol::from("aa")), 3),
            ["b", "ab", "aab"],
        );
    }

    #[test]
    fn long_prefix_of_star() {
        let a_star = lang(&["a"]).star();
        let last = a_star.iter().take(10_000).last().unwrap();
        assert_eq!(last.len(), 9_999);
        assert!(last.iter().all(|&c| c == 'a'));

        // A second walk reads the memoized cells
        assert_eq!(a_star.iter().nth(9_999), Some(last));
    }

    #[test]
    fn long_prefix_of_all_words() {
        let words = Alphabet::from("ab").words();
        let prefix: Vec<_> = words.iter().take(50_000).collect();
        assert_eq!(prefix.len(), 50_000);
        assert!(strictly_sorted(&prefix));
        // 2^15 - 1 words are shorter than 15 symbols
        assert_eq!(prefix[32_767], Lol::from("aaaaaaaaaaaaaaa"));
    }

    #[test]
    fn drop_long_list() {
        let long: Lang<u32> = (0..1_000_000).map(|i| Lol::from(vec![i])).collect();
        assert_eq!(long.iter().count(), 1_000_000);
        drop(long);

        let a_star = lang(&["a"]).star();
        let forced = a_star.iter().take(5_000).count();
        assert_eq!(forced, 5_000);
        drop(a_star);
    }

    #[test]
    fn nested_operators() {
        let l = lang(&["a", "b"]).star().concat(&lang(&["", "c"])).union(&lang(&["c"]).star());
        let prefix: Vec<_> = l.iter().take(20_000).collect();
        assert!(strictly_sorted(&prefix));
        assert!(l.contains(&Lol::from("abbac")));
        assert!(l.contains(&Lol::from("cccc")));
        assert!(!l.contains(&Lol::from("acb")));
    }

    #[test]
    fn drop_empty() {
        assert_eq!(strings(&lang(&["", "a"]).drop_empty(), 9), ["a"]);
        assert_eq!(strings(&lang(&["a"]).drop_empty(), 9), ["a"]);
        assert!(Lang::<char>::empty().drop_empty().is_empty());
    }

    fn naive_concat(l: &[Lol<char>], r: &[Lol<char>]) -> BTreeSet<Lol<char>> {
        l.iter()
            .flat_map(|x| r.iter().map(move |y| x.concat(y)))
            .collect()
    }

    fn naive_star(l: &[Lol<char>], max_len: usize) -> BTreeSet<Lol<char>> {
        let mut set = BTreeSet::from([Lol::empty()]);
        loop {
            let next: BTreeSet<_> = naive_concat(&set.iter().cloned().collect::<Vec<_>>(), l)
                .into_iter()
                .filter(|w| w.len() <= max_len)
                .collect();

            if next.is_subset(&set) {
                break set;
            }

            set.extend(next);
        }
    }

    proptest! {
        #[test]
        fn union_laws(a in words(6, 3), b in words(6, 3), c in words(6, 3)) {
            let (a, b, c): (Lang<_>, Lang<_>, Lang<_>) =
                (a.into_iter().collect(), b.into_iter().collect(), c.into_iter().collect());

            let ab = all(&a.union(&b));
            prop_assert!(strictly_sorted(&ab));
            prop_assert_eq!(&ab, &all(&b.union(&a)));
            prop_assert_eq!(all(&a.union(&b).union(&c)), all(&a.union(&b.union(&c))));
            prop_assert_eq!(all(&a.union(&a)), all(&a));
        }

        #[test]
        fn concat_matches_naive(a in words(6, 3), b in words(6, 3)) {
            let expected: Vec<_> = naive_concat(&a, &b).into_iter().collect();
            let actual = all(&a.into_iter().collect::<Lang<_>>().concat(&b.into_iter().collect()));
            prop_assert!(strictly_sorted(&actual));
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn concat_distributes(a in words(4, 2), b in words(4, 2), c in words(4, 2)) {
            let (a, b, c): (Lang<_>, Lang<_>, Lang<_>) =
                (a.into_iter().collect(), b.into_iter().collect(), c.into_iter().collect());

            prop_assert_eq!(all(&a.concat(&b.union(&c))), all(&a.concat(&b).union(&a.concat(&c))));
            prop_assert_eq!(all(&b.union(&c).concat(&a)), all(&b.concat(&a).union(&c.concat(&a))));
        }

        #[test]
        fn star_matches_naive(a in words(4, 3)) {
            let expected: Vec<_> = naive_star(&a, 5).into_iter().collect();
            let star = a.into_iter().collect::<Lang<_>>().star();
            prop_assert_eq!(star.up_to(5), expected);
        }

        #[test]
        fn star_idempotent(a in words(4, 3)) {
            let a: Lang<_> = a.into_iter().collect();
            prop_assert_eq!(a.star().star().up_to(5), a.star().up_to(5));
        }

        #[test]
        fn quotient_matches_naive(a in words(8, 4), w in crate::prop::word(2)) {
            let w = Lol::from(w);
            let expected: BTreeSet<_> = a.iter().filter_map(|x| x.strip_prefix(&w)).collect();
            let actual = all(&a.into_iter().collect::<Lang<_>>().left_quotient(&w));
            prop_assert_eq!(actual, expected.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn contains_matches_list(a in words(8, 3), w in crate::prop::word(3)) {
            let w = Lol::from(w);
            let expected = a.contains(&w);
            prop_assert_eq!(a.into_iter().collect::<Lang<_>>().contains(&w), expected);
        }
    }
}

//! Direct matching of expressions against words, without building an
//! automaton

use super::Regex;

/// The work left to do after the expression currently being matched
#[derive(Debug, Clone, Copy)]
enum Cont<'a, S> {
    Done,
    Then(&'a Regex<S>, &'a Cont<'a, S>),
}

impl<S: PartialEq> Regex<S> {
    /// Match by trying every way of splitting `word` between subexpressions
    ///
    /// This is exponential in the length of the word and is mostly useful as
    /// a reference for the other matchers.
    #[must_use]
    pub fn matches_brute_force(&self, word: &[S]) -> bool {
        match self {
            Self::Empty => false,
            Self::Lit(l) => matches!(word, [c] if c == l),
            Self::Alt(l, r) => l.matches_brute_force(word) || r.matches_brute_force(word),
            Self::Cat(l, r) => (0..=word.len())
                .any(|i| l.matches_brute_force(&word[..i]) && r.matches_brute_force(&word[i..])),
            // Splitting off an empty prefix would recurse on the same word
            Self::Star(r) => {
                word.is_empty()
                    || (1..=word.len()).any(|i| {
                        r.matches_brute_force(&word[..i]) && self.matches_brute_force(&word[i..])
                    })
            },
        }
    }

    /// Match in a single left-to-right pass using continuations
    ///
    /// Each step matches one subexpression against a prefix of the input and
    /// hands the rest to the pending continuation.  The `looping` flag is set
    /// on entry to a fresh iteration of a closure and cleared once a symbol
    /// is consumed; while it is set the closure may not exit, and the only
    /// way to skip over a bypassable subexpression is to move on to its
    /// sibling.  This rules out iterations that consume nothing, so the
    /// search always terminates.
    #[must_use]
    pub fn matches_derivative(&self, word: &[S]) -> bool { self.step(&Cont::Done, false, word) }

    fn step(&self, k: &Cont<'_, S>, looping: bool, word: &[S]) -> bool {
        match self {
            Self::Empty => false,
            Self::Lit(l) => match word.split_first() {
                Some((c, rest)) if c == l => resume(k, false, rest),
                _ => false,
            },
            Self::Alt(l, r) => l.step(k, looping, word) || r.step(k, looping, word),
            Self::Cat(l, r) => {
                l.step(&Cont::Then(r, k), looping, word)
                    || (looping && l.is_bypassable() && r.step(k, looping, word))
            },
            Self::Star(r) => {
                (!looping && resume(k, false, word)) || r.step(&Cont::Then(self, k), true, word)
            },
        }
    }
}

fn resume<S: PartialEq>(k: &Cont<'_, S>, looping: bool, word: &[S]) -> bool {
    match *k {
        Cont::Done => !looping && word.is_empty(),
        Cont::Then(re, k) => re.step(k, looping, word),
    }
}

impl<S: Clone + PartialEq> Regex<S> {
    /// Match by taking the left derivative by each symbol in turn and
    /// checking whether the final expression accepts the empty word
    #[must_use]
    pub fn matches_brzozowski(&self, word: &[S]) -> bool {
        word.iter()
            .fold(self.clone(), |re, sym| re.derivative(sym))
            .is_bypassable()
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::{
        lol::Lol,
        prop::word,
        regex::{Regex, prop::small_re},
    };

    fn all_agree(re: &Regex<char>, word: &str) -> bool {
        let word: Vec<char> = word.chars().collect();
        let expected = re.matches_brute_force(&word);
        assert_eq!(re.matches_derivative(&word), expected, "{re} on {word:?}");
        assert_eq!(re.matches_brzozowski(&word), expected, "{re} on {word:?}");
        expected
    }

    #[test]
    fn concat_chain() {
        let abb: Regex<char> = "ab.b.".parse().unwrap();
        assert!(all_agree(&abb, "abb"));
        for w in ["", "a", "ab", "abbb", "bab", "aab"] {
            assert!(!all_agree(&abb, w));
        }
    }

    #[test]
    fn nested_stars() {
        // (a*b*)* matches everything over {a, b} but nests bypassable loops
        let re: Regex<char> = "a*b*.*".parse().unwrap();
        for w in ["", "a", "b", "ab", "ba", "abba", "bbbaab"] {
            assert!(all_agree(&re, w));
        }

        let re: Regex<char> = "1*a.".parse().unwrap();
        assert!(all_agree(&re, "a"));
        assert!(!all_agree(&re, ""));
    }

    #[test]
    fn empty_rejects() {
        for w in ["", "a"] {
            assert!(!all_agree(&Regex::Empty, w));
            assert!(!all_agree(&Regex::Empty.star().cat(Regex::Empty), w));
        }
        assert!(all_agree(&Regex::Empty.star(), ""));
        assert!(!all_agree(&Regex::Empty.star(), "a"));
    }

    proptest! {
        #[test]
        fn matchers_agree(re in small_re(), w in word(6)) {
            let brute = re.matches_brute_force(&w);
            prop_assert_eq!(re.matches_derivative(&w), brute);
            prop_assert_eq!(re.matches_brzozowski(&w), brute);
        }

        #[test]
        fn matchers_follow_denotation(re in small_re(), w in word(5)) {
            let member = re.denote().contains(&Lol::from(w.clone()));
            prop_assert_eq!(re.matches_brute_force(&w), member);
            prop_assert_eq!(re.matches_derivative(&w), member);
        }
    }
}

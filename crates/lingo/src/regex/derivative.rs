use super::Regex;

impl<S: Clone + PartialEq> Regex<S> {
    /// The left derivative of this expression by `sym`
    ///
    /// The result denotes exactly the words `w` such that `sym` followed by
    /// `w` is denoted by `self`.  No simplification is performed, so repeated
    /// derivatives grow quickly.
    #[must_use]
    pub fn derivative(&self, sym: &S) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Lit(l) if l == sym => Self::unit(),
            Self::Lit(_) => Self::Empty,
            Self::Alt(l, r) => l.derivative(sym).alt(r.derivative(sym)),
            Self::Cat(l, r) => {
                let head = l.derivative(sym).cat((**r).clone());

                if l.is_bypassable() {
                    head.alt(r.derivative(sym))
                } else {
                    head
                }
            },
            Self::Star(r) => r.derivative(sym).cat(self.clone()),
        }
    }
}

impl<S: Clone> Regex<S> {
    /// An expression denoting the same words as this one, minus the empty word
    #[must_use]
    pub fn non_empty_part(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Lit(l) => Self::Lit(l.clone()),
            Self::Alt(l, r) => l.non_empty_part().alt(r.non_empty_part()),
            Self::Cat(l, r) => l
                .non_empty_part()
                .cat((**r).clone())
                .alt((**l).clone().cat(r.non_empty_part())),
            Self::Star(r) => r.non_empty_part().cat(self.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::{
        lang::Lang,
        lol::Lol,
        prop::symbol,
        regex::{Regex, prop::small_re},
    };

    fn strings(re: &Regex<char>, max_len: usize) -> Vec<String> {
        re.denote()
            .up_to(max_len)
            .iter()
            .map(|w| w.iter().collect())
            .collect()
    }

    #[test]
    fn derivative_of_chain() {
        let abb: Regex<char> = "ab.b.".parse().unwrap();
        assert_eq!(strings(&abb.derivative(&'a'), 9), ["bb"]);
        assert!(abb.derivative(&'b').is_empty_language());
        assert!(
            abb.derivative(&'a')
                .derivative(&'b')
                .derivative(&'b')
                .is_unit_language()
        );
    }

    #[test]
    fn derivative_through_star() {
        let re: Regex<char> = "a*b.".parse().unwrap();
        assert_eq!(strings(&re.derivative(&'a'), 3), ["b", "ab", "aab"]);
        assert_eq!(strings(&re.derivative(&'b'), 3), [""]);
    }

    #[test]
    fn non_empty_of_star() {
        let re: Regex<char> = "ab+*".parse().unwrap();
        assert_eq!(strings(&re.non_empty_part(), 1), ["a", "b"]);
        assert!(Regex::<char>::unit().non_empty_part().is_empty_language());
    }

    proptest! {
        #[test]
        fn derivative_is_quotient(re in small_re(), c in symbol()) {
            // Bound the denotation first, since a quotient of an infinite
            // language need not be productive
            let bounded: Lang<_> = re.denote().up_to(5).into_iter().collect();
            let expected = bounded.left_quotient(&Lol::from(vec![c])).up_to(4);
            prop_assert_eq!(re.derivative(&c).denote().up_to(4), expected);
        }

        #[test]
        fn non_empty_part_drops_empty(re in small_re()) {
            let expected = re.denote().drop_empty().up_to(5);
            let ne = re.non_empty_part();
            prop_assert_eq!(ne.denote().up_to(5), expected);
            prop_assert!(!ne.is_bypassable());
        }
    }
}

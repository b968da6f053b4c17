use std::collections::BTreeSet;

use crate::set::Set;

/// Compute the least set containing `seed` and closed under `expand`
///
/// Each round expands only the elements discovered by the previous round,
/// so every element is expanded exactly once.  The state space reachable from
/// `seed` must be finite for this to terminate.
pub fn closure<T: Clone + Ord, I: IntoIterator<Item = T>>(
    seed: impl IntoIterator<Item = T>,
    expand: impl FnMut(&T) -> I,
) -> Set<T> {
    let mut builder = ClosureBuilder::default();
    builder.init(seed);
    builder.solve(expand)
}

#[derive(Debug)]
pub struct ClosureBuilder<T> {
    frontier: Set<T>,
    done: BTreeSet<T>,
}

impl<T> Default for ClosureBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self {
            frontier: Set::EMPTY,
            done: BTreeSet::new(),
        }
    }
}

impl<T: Clone + Ord> ClosureBuilder<T> {
    #[inline]
    pub fn init<I: IntoIterator<Item = T>>(&mut self, it: I) {
        assert!(self.frontier.is_empty() && self.done.is_empty());
        self.frontier = it.into_iter().collect();
    }

    pub fn solve<I: IntoIterator<Item = T>>(&mut self, mut expand: impl FnMut(&T) -> I) -> Set<T> {
        let mut round = 0_usize;

        while !self.frontier.is_empty() {
            let frontier = std::mem::take(&mut self.frontier);
            tracing::trace!(round, frontier = frontier.len(), "Expanding closure frontier");

            self.done.extend(frontier.iter().cloned());
            self.frontier = frontier
                .iter()
                .flat_map(&mut expand)
                .filter(|t| !self.done.contains(t))
                .collect();
            round += 1;
        }

        std::mem::take(&mut self.done).into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::closure;
    use crate::set::Set;

    #[test]
    fn two_state_reachability() {
        // 0 moves to 1 on every symbol, 1 loops to itself
        let step = |q: &u8, _: &char| -> u8 { if *q == 0 { 1 } else { *q } };
        let alphabet = ['a', 'b'];

        let reached = closure([0], |q| alphabet.iter().map(|c| step(q, c)).collect::<Vec<_>>());
        assert_eq!(reached, Set::from([0, 1]));
    }

    #[test]
    fn unreachable_states_stay_out() {
        let edges = [(0, 1), (1, 2), (2, 0), (3, 0), (4, 4)];
        let reached = closure([1], |q| {
            edges
                .iter()
                .filter(|(f, _)| f == q)
                .map(|&(_, t)| t)
                .collect::<Vec<_>>()
        });
        assert_eq!(reached, Set::from([0, 1, 2]));
    }

    #[test]
    fn empty_seed() {
        assert!(closure(Vec::<u8>::new(), |&q| [q + 1]).is_empty());
    }

    #[test]
    fn seed_is_normalized() {
        assert_eq!(closure([3, 1, 3], |_| None), Set::from([1, 3]));
    }
}

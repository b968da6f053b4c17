//! Lazy regular languages, regular expressions and the finite-state machines
//! that recognize them

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)] // TODO

pub mod closure_builder;
pub mod fsm;
pub mod lang;
pub mod lol;
pub mod nfa;
pub mod regex;
pub mod set;

pub use closure_builder::closure;
pub use fsm::{BoolOp, Fsm};
pub use lang::Lang;
pub use lol::Lol;
pub use nfa::{Efsm, Nfsm, Nondeterministic};
pub use regex::Regex;
pub use set::{Alphabet, Set};

#[cfg(any(test, feature = "proptest"))]
pub mod prop {
    //! Strategies for property-testing code built on this crate

    use proptest::prelude::*;

    pub use crate::{fsm::prop::*, lang::prop::*, nfa::prop::*, regex::prop::*};

    /// The two-letter alphabet most tests run over
    pub const AB: [char; 2] = ['a', 'b'];

    #[must_use]
    pub fn symbol() -> impl Strategy<Value = char> + Clone { prop::sample::select(AB.to_vec()) }

    #[must_use]
    pub fn word(max_len: usize) -> impl Strategy<Value = Vec<char>> + Clone {
        prop::collection::vec(symbol(), 0..=max_len)
    }
}

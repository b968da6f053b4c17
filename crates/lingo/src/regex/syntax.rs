//! Textual forms of [`Regex`]: a postfix grammar for input and both postfix
//! and infix forms for output
//!
//! The postfix grammar reads one character at a time against a stack of
//! expressions.  `+` pops two operands and pushes their union, `.` pops two
//! and pushes their concatenation, `*` pops one and pushes its closure, `0`
//! pushes the empty language, `1` pushes the unit language and any other
//! character pushes itself as a literal.

use std::{fmt, str::FromStr};

use super::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Missing operand for {op:?} at position {pos}")]
    MissingOperand { op: char, pos: usize },
    #[error("{0} operand(s) left over after parsing")]
    Trailing(usize),
    #[error("Expression was blank")]
    Blank,
}

/// Parse a postfix regular expression
///
/// # Errors
/// Fails if an operator finds too few operands on the stack, if more than one
/// expression remains once the input is exhausted, or if the input is empty.
pub fn parse(s: &str) -> Result<Regex<char>, ParseError> {
    let mut stack: Vec<Regex<char>> = vec![];

    for (pos, c) in s.chars().enumerate() {
        let missing = ParseError::MissingOperand { op: c, pos };

        let re = match c {
            '0' => Regex::Empty,
            '1' => Regex::unit(),
            '*' => stack.pop().ok_or(missing)?.star(),
            '+' | '.' => {
                let (Some(r), Some(l)) = (stack.pop(), stack.pop()) else {
                    return Err(missing);
                };

                if c == '+' { l.alt(r) } else { l.cat(r) }
            },
            c => Regex::Lit(c),
        };

        stack.push(re);
    }

    let re = stack.pop().ok_or(ParseError::Blank)?;

    if !stack.is_empty() {
        return Err(ParseError::Trailing(stack.len()));
    }

    Ok(re)
}

impl FromStr for Regex<char> {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> { parse(s) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Alt,
    Cat,
    Star,
}

impl<S: fmt::Display> Regex<S> {
    fn fmt_prec(&self, prec: Prec, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let own = match self {
            Self::Empty | Self::Lit(_) | Self::Star(_) => Prec::Star,
            Self::Alt(..) => Prec::Alt,
            Self::Cat(..) => Prec::Cat,
        };

        if own < prec {
            f.write_str("(")?;
            self.fmt_prec(own, f)?;
            return f.write_str(")");
        }

        match self {
            Self::Empty => f.write_str("0"),
            r if r.is_unit() => f.write_str("1"),
            Self::Lit(l) => l.fmt(f),
            Self::Alt(l, r) => {
                l.fmt_prec(Prec::Alt, f)?;
                f.write_str("+")?;
                r.fmt_prec(Prec::Alt, f)
            },
            Self::Cat(l, r) => {
                l.fmt_prec(Prec::Cat, f)?;
                r.fmt_prec(Prec::Cat, f)
            },
            Self::Star(r) => {
                r.fmt_prec(Prec::Star, f)?;
                f.write_str("*")
            },
        }
    }

    /// A display adapter printing this expression in the postfix grammar
    #[inline]
    #[must_use]
    pub fn postfix(&self) -> Postfix<'_, S> { Postfix(self) }
}

/// Infix form with as few parentheses as precedence allows
///
/// Union binds loosest, then concatenation (written by juxtaposition), then
/// closure.  Since union and concatenation are associative, nesting on either
/// side of them prints without parentheses.
impl<S: fmt::Display> fmt::Display for Regex<S> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.fmt_prec(Prec::Alt, f) }
}

/// Postfix form of a [`Regex`], as accepted by [`parse`]
#[derive(Debug, Clone, Copy)]
pub struct Postfix<'a, S>(&'a Regex<S>);

impl<S: fmt::Display> fmt::Display for Postfix<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Regex::Empty => f.write_str("0"),
            r if r.is_unit() => f.write_str("1"),
            Regex::Lit(l) => l.fmt(f),
            Regex::Alt(l, r) => write!(f, "{}{}+", l.postfix(), r.postfix()),
            Regex::Cat(l, r) => write!(f, "{}{}.", l.postfix(), r.postfix()),
            Regex::Star(r) => write!(f, "{}*", r.postfix()),
        }
    }
}

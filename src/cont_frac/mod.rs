//! Data structures and algorithms implementations related to
//! regular and generalized continued fraction
//!
//! Every transform here shares one state machine: a block of coefficients that
//! either ingests a term of its input(s) or, once the integer part of the
//! represented value is settled, emits that integer as the next output term.
//!
//! 1. [Rational] and [TermArray] are term sources
//! 2. [Homographic] and [Bihomographic] transform one or two continued fractions
//! 3. [GeneralizedHomographic] turns a generalized continued fraction into a simple one
//! 4. [Convergents] and [DecimalDigits] consume a continued fraction into approximations
//!
//! # References:
//! - <https://crypto.stanford.edu/pbc/notes/contfrac/>
//! - <http://www.numbertheory.org/continued_fractions.html>
//! - <https://github.com/blynn/frac>
//! - Gosper, R. W. "Continued Fraction Arithmetic" (HAKMEM item 101)
//!

mod bihomographic;
mod block;
mod coefficient;
mod compare;
mod convergents;
mod decimal;
mod general;
mod homographic;
mod simple;

pub use bihomographic::*;
pub use coefficient::Coefficient;
pub use compare::*;
pub use convergents::*;
pub use decimal::*;
pub use general::*;
pub use homographic::*;
pub use simple::*;

/// Progress of an engine on one of its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputState {
    /// no term consumed yet, the first term may have any sign
    Fresh,
    Active,
    /// the input ended and its tail was folded to infinity
    Done,
}

/// Pull the next term of an input, remembering when it ran out
pub(crate) fn pull<I: Iterator>(input: &mut I, state: &mut InputState) -> Option<I::Item> {
    if *state == InputState::Done {
        return None;
    }
    let next = input.next();
    *state = if next.is_some() { InputState::Active } else { InputState::Done };
    next
}

//! Bihomographic transform of two continued fractions

use super::block::{DualBlock, Quotients};
use super::coefficient::{check_precision, Coefficient};
use super::{pull, InputState};
use crate::config::Config;
use crate::error::Result;
use crate::traits::ContinuedFraction;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tracing::{debug, trace, warn};

/// Continued fraction of `(axy + bx + cy + d) / (exy + fx + gy + h)`,
/// produced lazily from the terms of `x` and `y`.
///
/// When no term is settled, the engine pulls from the input whose variation
/// moves the four corner quotients the most. Overflow is handled as in
/// [Homographic][crate::Homographic]: a term is emitted early only when the
/// pending input term settles it, which needs the other input to be past its
/// first term.
#[derive(Debug, Clone)]
pub struct Bihomographic<X, Y, T = i64> {
    block: DualBlock<T>,
    x: X,
    y: Y,
    x_state: InputState,
    y_state: InputState,
    config: Config,
}

/// Arbitrary precision bihomographic transform, its coefficients are capped by
/// the configured precision instead of the machine word
pub type BigBihomographic<X, Y> = Bihomographic<X, Y, BigInt>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    X,
    Y,
}

/// Distance between two corner quotients, a missing quotient is infinitely far
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Spread<T> {
    Finite(T),
    Infinite,
}

fn spread<T: Coefficient>(p: &Option<T>, q: &Option<T>) -> Spread<T> {
    match (p, q) {
        (Some(p), Some(q)) => {
            let (hi, lo) = if p > q { (p, q) } else { (q, p) };
            hi.checked_sub(lo).map_or(Spread::Infinite, Spread::Finite)
        }
        _ => Spread::Infinite,
    }
}

#[inline]
fn is_nonzero<T: Coefficient>(v: &Option<T>) -> bool {
    matches!(v, Some(v) if !v.is_zero())
}

impl<X, Y> Bihomographic<X, Y> {
    /// Coefficients are given in the order `[a, b, c, d, e, f, g, h]`
    pub fn new(x: X, y: Y, coeffs: [i64; 8]) -> Self {
        Bihomographic::with_coefficients(x, y, coeffs)
    }

    /// `x + y`
    pub fn sum(x: X, y: Y) -> Self {
        Bihomographic::new(x, y, [0, 1, 1, 0, 0, 0, 0, 1])
    }

    /// `x - y`
    pub fn difference(x: X, y: Y) -> Self {
        Bihomographic::new(x, y, [0, 1, -1, 0, 0, 0, 0, 1])
    }

    /// `x * y`
    pub fn product(x: X, y: Y) -> Self {
        Bihomographic::new(x, y, [1, 0, 0, 0, 0, 0, 0, 1])
    }

    /// `x / y`
    pub fn quotient(x: X, y: Y) -> Self {
        Bihomographic::new(x, y, [0, 1, 0, 0, 0, 0, 1, 0])
    }
}

impl<X, Y> BigBihomographic<X, Y> {
    /// Create an arbitrary precision transform whose coefficients may grow up to `bits` bits
    pub fn with_precision(x: X, y: Y, coeffs: [i64; 8], bits: u32) -> Result<Self> {
        Bihomographic::with_coefficients(x, y, coeffs.map(BigInt::from))
            .with_config(Config::default().with_precision(bits))
    }
}

impl<X, Y, T: Coefficient> Bihomographic<X, Y, T> {
    pub fn with_coefficients(x: X, y: Y, coeffs: [T; 8]) -> Self {
        let [a, b, c, d, e, f, g, h] = coeffs;
        Bihomographic {
            block: DualBlock::new(a, b, c, d, e, f, g, h),
            x,
            y,
            x_state: InputState::Fresh,
            y_state: InputState::Fresh,
            config: Config::default(),
        }
    }

    /// Apply the iteration limit and precision ceiling, rejecting coefficients
    /// that are already wider than the ceiling
    pub fn with_config(mut self, config: Config) -> Result<Self> {
        check_precision(&self.block.coeffs(), config.precision)?;
        self.config = config;
        Ok(self)
    }

    /// The transform over the unconsumed tails, as `[a, b, c, d, e, f, g, h]`
    #[inline]
    pub fn coefficients(&self) -> [&T; 8] {
        self.block.coeffs()
    }

    /// Decide which input to consume when no term is settled yet
    fn select(&self) -> Side {
        use InputState::*;
        match (self.x_state, self.y_state) {
            (Fresh, _) => return Side::X,
            (_, Fresh) => return Side::Y,
            (Done, _) => return Side::Y,
            (_, Done) => return Side::X,
            _ => {}
        }

        let [e, f, g, h] = self.block.zero_denominators();
        if f {
            return if e { Side::X } else { Side::Y };
        }
        if g {
            return if e { Side::Y } else { Side::X };
        }

        let Quotients { ixy, ix, iy, i0 } = self.block.quotients();
        // one axis is settled, move along the other
        if ixy == ix && is_nonzero(&ix) {
            return Side::X;
        }
        if ixy == iy && is_nonzero(&iy) {
            return Side::Y;
        }

        let pull_x = if h {
            spread(&ixy, &iy) > spread(&ixy, &ix)
        } else if e {
            spread(&i0, &ix) > spread(&i0, &iy)
        } else {
            spread(&ixy, &iy).max(spread(&i0, &ix)) > spread(&ixy, &ix).max(spread(&i0, &iy))
        };
        if pull_x { Side::X } else { Side::Y }
    }
}

impl<X, Y, T> Bihomographic<X, Y, T>
where
    X: Iterator<Item = i64>,
    Y: Iterator<Item = i64>,
    T: Coefficient,
{
    fn emit(&mut self, i: T) -> Option<i64> {
        let term = i.to_i64();
        if term.is_none() {
            debug!(?i, "term out of range, truncating");
            self.block.collapse();
        }
        term
    }

    fn ingest_side(&mut self, side: Side, t: &T) -> bool {
        match side {
            Side::X => self.block.ingest_right(t, self.config.precision),
            Side::Y => self.block.ingest_down(t, self.config.precision),
        }
    }

    /// Move the block with the next term of one input. On overflow, returns
    /// the term settled before the move
    fn ingest(&mut self, side: Side) -> Option<i64> {
        trace!(?side, "pulling a term");
        let next = match side {
            Side::X => pull(&mut self.x, &mut self.x_state),
            Side::Y => pull(&mut self.y, &mut self.y_state),
        };
        let t = match next {
            Some(t) => t,
            None => {
                match side {
                    Side::X => self.block.ingest_infinite_right(),
                    Side::Y => self.block.ingest_infinite_down(),
                }
                return None;
            }
        };

        let t = match T::from_i64(t) {
            Some(t) => t,
            None => {
                self.block.collapse();
                return None;
            }
        };
        if self.ingest_side(side, &t) {
            None
        } else {
            self.pre_output(side, &t)
        }
    }

    /// The term settled while `t` is pending on `side`, if the other input
    /// has started and the term fits
    fn settled_term(&self, side: Side, t: &T) -> Option<(i64, T)> {
        let settled = match side {
            Side::X if self.y_state != InputState::Fresh => self.block.settled_term_right(t),
            Side::Y if self.x_state != InputState::Fresh => self.block.settled_term_down(t),
            _ => None,
        };
        let term = settled?.to_i64()?;
        Some((term, T::from_i64(term)?))
    }

    fn pre_output(&mut self, side: Side, t: &T) -> Option<i64> {
        let (term, i) = match self.settled_term(side, t) {
            Some(v) => v,
            None => {
                debug!(?side, "coefficients overflow before the term is settled, truncating");
                self.block.collapse();
                return None;
            }
        };

        debug!(term, "coefficients overflow, emitting the settled term early");
        if !self.block.checked_extract(&i, self.config.precision) {
            debug!(term, "extracting the term overflows, truncating");
            self.block.collapse();
        } else if !self.ingest_side(side, t) {
            debug!(term, "coefficients still overflow, truncating");
            self.block.collapse();
        }
        Some(term)
    }
}

impl<X, Y, T> Iterator for Bihomographic<X, Y, T>
where
    X: Iterator<Item = i64>,
    Y: Iterator<Item = i64>,
    T: Coefficient,
{
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        for _ in 0..self.config.iteration_limit {
            if self.block.is_collapsed() {
                return None;
            }
            if self.x_state != InputState::Fresh && self.y_state != InputState::Fresh {
                if let Some(i) = self.block.reduce_integer() {
                    return self.emit(i);
                }
            }
            let side = self.select();
            if let Some(term) = self.ingest(side) {
                return Some(term);
            }
        }

        warn!(limit = self.config.iteration_limit, "no term settled within the iteration limit");
        self.block.collapse();
        None
    }
}

impl<X, Y, T> ContinuedFraction for Bihomographic<X, Y, T>
where
    X: ContinuedFraction + Clone,
    Y: ContinuedFraction + Clone,
    T: Coefficient,
{
    #[inline]
    fn is_finished(&self) -> bool {
        self.block.is_collapsed()
    }
}

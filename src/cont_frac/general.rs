use super::block::Block;
use super::coefficient::{check_precision, Coefficient};
use super::{pull, InputState};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::traits::ContinuedFraction;
use num_bigint::BigInt;
use tracing::{debug, warn};

/// One level `(a, b)` of a generalized continued fraction
/// `b_0 + a_1 / (b_1 + a_2 / (b_2 + ...))`, where the first pair is `(1, b_0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberPair {
    /// partial numerator
    pub a: i64,
    /// partial denominator
    pub b: i64,
}

impl NumberPair {
    #[inline]
    pub fn new(a: i64, b: i64) -> Self {
        NumberPair { a, b }
    }

    /// The pair of a simple continued fraction term
    #[inline]
    pub fn from_term(b: i64) -> Self {
        NumberPair { a: 1, b }
    }
}

impl From<(i64, i64)> for NumberPair {
    fn from((a, b): (i64, i64)) -> Self {
        NumberPair { a, b }
    }
}

/// This trait defines utility functions for generalized continued fraction number
/// `b_0 + a_1 / (b_1 + a_2 / (b_2 + ...))`. They are available for any
/// iterator that returns [NumberPair]s. The first value will be regarded
/// as a_k while the second value as b_k. Every pair after the first needs
/// `a > 0` and `b >= 0`.
pub trait GeneralizedContinuedFraction: Iterator<Item = NumberPair> {
    /// Simplify the generalized continued fraction to a simple one
    fn simplify(self) -> GeneralizedHomographic<Self>
    where
        Self: Sized,
    {
        self.ghomo(1, 0, 0, 1)
    }

    /// The simple continued fraction of `(ax + b) / (cx + d)` for the value `x`
    /// of this generalized continued fraction
    fn ghomo(self, a: i64, b: i64, c: i64, d: i64) -> GeneralizedHomographic<Self>
    where
        Self: Sized,
    {
        GeneralizedHomographic::new(self, a, b, c, d)
    }
}

impl<I: Iterator<Item = NumberPair>> GeneralizedContinuedFraction for I {}

/// A precomputed list of generalized continued fraction levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairArray {
    pairs: Vec<NumberPair>,
    pos: usize,
}

impl PairArray {
    pub fn new(pairs: Vec<NumberPair>) -> Result<Self> {
        let first = pairs.first().ok_or(Error::EmptyTerms)?;
        if first.a == 0 {
            return Err(Error::InvalidPair { index: 0, a: first.a, b: first.b });
        }
        for (index, p) in pairs.iter().enumerate().skip(1) {
            if p.a <= 0 || p.b < 0 {
                return Err(Error::InvalidPair { index, a: p.a, b: p.b });
            }
        }
        Ok(PairArray { pairs, pos: 0 })
    }

    #[inline]
    pub fn pairs(&self) -> &[NumberPair] {
        &self.pairs[..]
    }
}

impl Iterator for PairArray {
    type Item = NumberPair;

    fn next(&mut self) -> Option<NumberPair> {
        let p = self.pairs.get(self.pos).copied()?;
        self.pos += 1;
        Some(p)
    }
}

/// Simple continued fraction of a homographic function on a generalized
/// continued fraction, use the magic table method described in
/// <https://crypto.stanford.edu/pbc/notes/contfrac/nonsimple.html>
///
/// Partial numerators make the coefficients grow fast, so they are big
/// integers by default. The block is reduced by the common divisor of its
/// entries after every move.
#[derive(Debug, Clone)]
pub struct GeneralizedHomographic<G, T = BigInt> {
    block: Block<T>,
    g_coeffs: G,
    state: InputState,
    config: Config,
}

impl<G> GeneralizedHomographic<G> {
    pub fn new(g_coeffs: G, a: i64, b: i64, c: i64, d: i64) -> Self {
        GeneralizedHomographic::with_coefficients(
            g_coeffs,
            BigInt::from(a),
            BigInt::from(b),
            BigInt::from(c),
            BigInt::from(d),
        )
    }
}

impl<G, T: Coefficient> GeneralizedHomographic<G, T> {
    pub fn with_coefficients(g_coeffs: G, a: T, b: T, c: T, d: T) -> Self {
        GeneralizedHomographic {
            block: Block::new(a, b, c, d),
            g_coeffs,
            state: InputState::Fresh,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Result<Self> {
        check_precision(&self.block.coeffs(), config.precision)?;
        self.config = config;
        Ok(self)
    }
}

impl<G: Iterator<Item = NumberPair>, T: Coefficient> Iterator for GeneralizedHomographic<G, T> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        for _ in 0..self.config.iteration_limit {
            if self.block.is_collapsed() {
                return None;
            }
            if self.state != InputState::Fresh {
                if let Some(i) = self.block.reduce_integer() {
                    let term = i.to_i64();
                    if term.is_none() {
                        self.block.collapse();
                    }
                    return term;
                }
            }

            match pull(&mut self.g_coeffs, &mut self.state) {
                Some(NumberPair { a, b }) => {
                    let moved = match (T::from_i64(a), T::from_i64(b)) {
                        (Some(a), Some(b)) => self.block.checked_gmove(&a, &b, self.config.precision),
                        _ => false,
                    };
                    if !moved {
                        debug!(a, b, "coefficients overflow, truncating");
                        self.block.collapse();
                    }
                }
                None => self.block.ingest_infinite(),
            }
        }

        warn!(limit = self.config.iteration_limit, "no term settled within the iteration limit");
        self.block.collapse();
        None
    }
}

impl<G, T> ContinuedFraction for GeneralizedHomographic<G, T>
where
    G: Iterator<Item = NumberPair> + Clone,
    T: Coefficient,
{
    #[inline]
    fn is_finished(&self) -> bool {
        self.block.is_collapsed()
    }
}

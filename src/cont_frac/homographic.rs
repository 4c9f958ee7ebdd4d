//! Homographic transform of a continued fraction

use super::block::Block;
use super::coefficient::{check_precision, Coefficient};
use super::{pull, InputState};
use crate::config::Config;
use crate::error::Result;
use crate::traits::ContinuedFraction;
use num_traits::ToPrimitive;
use tracing::{debug, warn};

/// Continued fraction of `(ax + b) / (cx + d)`, produced lazily from the terms of `x`.
///
/// Coefficients are `i64` by default. When a move would overflow, the engine
/// checks whether the term is already settled by the pending input term. If
/// so it is emitted early, the block shrinks and the move is retried once.
/// Otherwise, or if the retry fails too, the stream ends without emitting
/// anything it cannot vouch for.
#[derive(Debug, Clone)]
pub struct Homographic<X, T = i64> {
    block: Block<T>,
    x: X,
    state: InputState,
    config: Config,
}

impl<X> Homographic<X> {
    pub fn new(x: X, a: i64, b: i64, c: i64, d: i64) -> Self {
        Homographic::with_coefficients(x, a, b, c, d)
    }
}

impl<X, T: Coefficient> Homographic<X, T> {
    pub fn with_coefficients(x: X, a: T, b: T, c: T, d: T) -> Self {
        Homographic {
            block: Block::new(a, b, c, d),
            x,
            state: InputState::Fresh,
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

    /// The transform over the unconsumed tail of `x`, as `[a, b, c, d]`
    #[inline]
    pub fn coefficients(&self) -> [&T; 4] {
        self.block.coeffs()
    }
}

impl<X: Iterator<Item = i64>, T: Coefficient> Homographic<X, T> {
    fn emit(&mut self, i: T) -> Option<i64> {
        let term = i.to_i64();
        if term.is_none() {
            debug!(?i, "term out of range, truncating");
            self.block.collapse();
        }
        term
    }

    /// Move the block with the next term of x. On overflow, returns the term
    /// settled before the move
    fn ingest(&mut self) -> Option<i64> {
        let t = match pull(&mut self.x, &mut self.state) {
            Some(t) => t,
            None => {
                self.block.ingest_infinite();
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
        if self.block.ingest(&t, self.config.precision) {
            None
        } else {
            self.pre_output(&t)
        }
    }

    fn pre_output(&mut self, t: &T) -> Option<i64> {
        let precision = self.config.precision;
        let settled = self.block.settled_term(t).and_then(|i| i.to_i64());
        let (term, i) = match settled.and_then(|term| T::from_i64(term).map(|i| (term, i))) {
            Some(v) => v,
            None => {
                debug!("coefficients overflow before the term is settled, truncating");
                self.block.collapse();
                return None;
            }
        };

        debug!(term, "coefficients overflow, emitting the settled term early");
        if !self.block.checked_extract(&i, precision) {
            debug!(term, "extracting the term overflows, truncating");
            self.block.collapse();
        } else if !self.block.ingest(t, precision) {
            debug!(term, "coefficients still overflow, truncating");
            self.block.collapse();
        }
        Some(term)
    }
}

impl<X: Iterator<Item = i64>, T: Coefficient> Iterator for Homographic<X, T> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        for _ in 0..self.config.iteration_limit {
            if self.block.is_collapsed() {
                return None;
            }
            if self.state != InputState::Fresh {
                if let Some(i) = self.block.reduce_integer() {
                    return self.emit(i);
                }
            }
            if let Some(term) = self.ingest() {
                return Some(term);
            }
        }

        warn!(limit = self.config.iteration_limit, "no term settled within the iteration limit");
        self.block.collapse();
        None
    }
}

impl<X: ContinuedFraction + Clone, T: Coefficient> ContinuedFraction for Homographic<X, T> {
    #[inline]
    fn is_finished(&self) -> bool {
        self.block.is_collapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cont_frac::{Rational, TermArray};
    use crate::error::Error;
    use crate::symbols::{ECoefficients, E};
    use num_bigint::BigInt;

    #[test]
    fn identity_test() {
        for (n, d) in [(16, 9), (-16, 9), (0, 1), (7, 1), (-1, 4), (355, 113)] {
            let x = Rational::new(n, d).unwrap();
            assert_eq!(
                x.homo(1, 0, 0, 1).collect::<Vec<_>>(),
                x.collect::<Vec<_>>()
            );
        }

        let mut h = Homographic::new(TermArray::new(vec![1, 2]).unwrap(), 1, 0, 0, 1);
        assert_eq!(h.next(), Some(1));
        assert!(!h.is_finished());
        assert_eq!(h.next(), Some(2));
        assert!(h.is_finished());
        assert_eq!(h.next(), None);
    }

    #[test]
    fn rational_homo_test() {
        let x = Rational::new(16, 9).unwrap();
        // 1 / x = 9 / 16
        assert_eq!(x.homo(0, 1, 1, 0).collect::<Vec<_>>(), vec![0, 1, 1, 3, 2]);
        // x - 2 = -2 / 9
        assert_eq!(x.homo(1, -2, 0, 1).collect::<Vec<_>>(), vec![-1, 1, 3, 2]);
        // (2x + 1) / (x + 3) = 41 / 43
        assert_eq!(
            x.homo(2, 1, 1, 3).collect::<Vec<_>>(),
            Rational::new(41, 43).unwrap().collect::<Vec<_>>()
        );
        // 0 * x + 5
        assert_eq!(x.homo(0, 5, 0, 1).collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn infinite_value_test() {
        // 1 / 0 has no terms
        let mut h = Rational::from(0).homo(0, 1, 1, 0);
        assert_eq!(h.next(), None);
        assert!(h.is_finished());

        // the zero function in the denominator finishes immediately
        let h = Homographic::new(E {}.cfrac(), 1, 0, 0, 0);
        assert!(h.is_finished());
    }

    #[test]
    fn inf_cont_frac_arithmetic_test() {
        let e = E {};
        assert_eq!(e.cfrac().homo(1, 1, 0, 1).take(5).collect::<Vec<_>>(), vec![3, 1, 2, 1, 1]);
        assert_eq!(
            e.cfrac().homo(1, -2, 0, 1).take(6).collect::<Vec<_>>(),
            vec![0, 1, 2, 1, 1, 4]
        );
        assert_eq!(
            e.cfrac().homo(1, -3, 0, 1).take(6).collect::<Vec<_>>(),
            vec![-1, 1, 2, 1, 1, 4]
        );

        let sq2 = TermArray::periodic(vec![1], vec![2]).unwrap();
        assert_eq!(
            sq2.clone().homo(1, 1, 0, 1).take(6).collect::<Vec<_>>(),
            vec![2, 2, 2, 2, 2, 2]
        );
        assert_eq!(
            sq2.homo(2, 0, 0, 1).take(7).collect::<Vec<_>>(),
            vec![2, 1, 4, 1, 4, 1, 4]
        );
    }

    fn big_homo(a: i64, b: i64, c: i64, d: i64) -> Homographic<ECoefficients, BigInt> {
        let [a, b, c, d] = [a, b, c, d].map(BigInt::from);
        Homographic::with_coefficients(E {}.cfrac(), a, b, c, d)
    }

    #[test]
    fn overflow_test() {
        // (kx + k) / (x + 1) = k, the first move overflows with k already settled
        let k = 1i64 << 62;
        let mut h = Rational::new(16, 9).unwrap().homo(k, k, 1, 1);
        assert_eq!(h.next(), Some(k));
        assert_eq!(h.next(), None);
        assert!(h.is_finished());

        // kx / (x + 1) = 16k / 25 is not settled when the move overflows
        let mut h = Rational::new(16, 9).unwrap().homo(k, 0, 1, 1);
        assert_eq!(h.next(), None);
        assert!(h.is_finished());

        // whatever the fixed width engine emits agrees with the exact one
        for (a, b, c, d) in [(1 << 40, 0, 0, 1), (1 << 61, 0, 0, 1), (1 << 61, 0, 1, 1), (3, 1 << 50, 7, 1)] {
            let mut h = E {}.cfrac().homo(a, b, c, d);
            let terms = h.by_ref().take(100).collect::<Vec<_>>();
            let exact = big_homo(a, b, c, d).take(terms.len()).collect::<Vec<_>>();
            assert_eq!(terms, exact, "({}x + {}) / ({}x + {})", a, b, c, d);
            assert!(terms.len() == 100 || h.is_finished());
        }
    }

    #[test]
    fn bigint_test() {
        let terms = big_homo(1 << 61, 0, 0, 1).take(30).collect::<Vec<_>>();
        assert_eq!(terms.len(), 30);
        assert_eq!(terms[0], 6267931151224907085);
    }

    #[test]
    fn config_test() {
        let h = Homographic::new(E {}.cfrac(), 1, 0, 0, 1)
            .with_config(Config::default().with_precision(8))
            .unwrap();
        // coefficients keep hitting the 8-bit ceiling, every term emitted
        // early is still exact until the terms of e themselves outgrow it
        let terms = h.take(500).collect::<Vec<_>>();
        assert!(terms.len() > 100 && terms.len() < 500);
        assert_eq!(terms, E {}.cfrac().take(terms.len()).collect::<Vec<_>>());

        let h = Homographic::new(E {}.cfrac(), 1000, 0, 0, 1)
            .with_config(Config::default().with_precision(8));
        assert_eq!(
            h.err(),
            Some(Error::InsufficientPrecision { precision: 8, required: 10 })
        );

        let mut h = Homographic::new(E {}.cfrac(), 1, 0, 0, 1)
            .with_config(Config::default().with_iteration_limit(0))
            .unwrap();
        assert_eq!(h.next(), None);
        assert!(h.is_finished());
    }
}

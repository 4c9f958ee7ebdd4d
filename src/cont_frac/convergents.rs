//! Running rational approximations of a continued fraction

use super::block::Block;
use crate::traits::{Approximation, ContinuedFraction, RationalApproximation};
use num_rational::Ratio;
use tracing::debug;

/// How far a convergent `p/q` is from the value `v` of the continued fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBound {
    /// the convergent is the value itself
    Exact,
    /// `1 / lower < |v - p/q| <= 1 / upper`
    Within { lower: u128, upper: u128 },
    /// the next convergent does not fit in `i64`, so no bound is known
    Unknown,
}

/// A term of the continued fraction together with the convergent it completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergent {
    pub term: i64,
    pub value: Ratio<i64>,
    pub error: ErrorBound,
}

/// Iterator over the convergents of a continued fraction.
///
/// The bounds of convergent `k` depend on the denominator of convergent
/// `k + 1`, so every item is produced one term after its own term was read.
#[derive(Debug, Clone)]
pub struct Convergents<X> {
    x: X,
    block: Block<i64>,
    pending: Option<i64>,
    finished: bool,
}

impl<X> Convergents<X> {
    pub fn new(x: X) -> Self {
        Convergents { x, block: Block::identity(), pending: None, finished: false }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Numerator and denominator of the latest convergent
    fn latest(&self) -> (i64, i64) {
        let [p, _, q, _] = self.block.coeffs();
        (*p, *q)
    }

    fn finish(&mut self, term: i64, error: ErrorBound) -> Option<Convergent> {
        self.finished = true;
        let (p, q) = self.latest();
        if q == 0 {
            return None;
        }
        Some(Convergent { term, value: Ratio::new(p, q), error })
    }
}

impl<X: Iterator<Item = i64>> Iterator for Convergents<X> {
    type Item = Convergent;

    fn next(&mut self) -> Option<Convergent> {
        if self.finished {
            return None;
        }

        let term = match self.pending {
            Some(t) => t,
            None => {
                let t = match self.x.next() {
                    Some(t) => t,
                    None => {
                        self.finished = true;
                        return None;
                    }
                };
                // the first move of the identity never overflows
                self.block.ingest(&t, None);
                t
            }
        };

        let next = match self.x.next() {
            Some(t) => t,
            None => return self.finish(term, ErrorBound::Exact),
        };
        let (p, q) = self.latest();
        if q == 0 {
            self.finished = true;
            return None;
        }
        if !self.block.ingest(&next, None) {
            debug!(term = next, "next convergent overflows, stopping");
            return self.finish(term, ErrorBound::Unknown);
        }

        self.pending = Some(next);
        let q_this = u128::from(q.unsigned_abs());
        let q_next = u128::from(self.latest().1.unsigned_abs());
        Some(Convergent {
            term,
            value: Ratio::new(p, q),
            error: ErrorBound::Within {
                lower: q_this * (q_this + q_next),
                upper: q_this * q_next,
            },
        })
    }
}

impl<X: ContinuedFraction + ?Sized> RationalApproximation<i64> for X {
    fn approx_rational(&self, limit: &i64) -> Option<Approximation<Ratio<i64>>> {
        let mut best = None;
        for c in Convergents::new(dyn_clone::clone_box(self)) {
            if c.value.denom() > limit {
                break;
            }
            best = Some(match c.error {
                ErrorBound::Exact => Approximation::Exact(c.value),
                _ => Approximation::Approximated(c.value),
            });
        }
        best
    }
}

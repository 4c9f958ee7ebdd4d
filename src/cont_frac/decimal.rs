//! Decimal expansion of a continued fraction

use super::block::Block;
use super::coefficient::{check_precision, Coefficient};
use super::{pull, InputState};
use crate::config::Config;
use crate::error::Result;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, warn};

/// Decimal expansion of the value of a continued fraction, produced lazily.
///
/// The first item is the integer part truncated toward zero, every later item
/// is the next digit `0..=9` of the fractional part of the magnitude. The sign
/// is reported by [DecimalDigits::is_negative] once the first item is out, so
/// `-1/4` expands to `0, 2, 5`. The expansion of a value with a finite decimal
/// representation ends after its last nonzero digit.
///
/// The coefficients grow with every digit, so they are big integers by default.
#[derive(Debug, Clone)]
pub struct DecimalDigits<X, T = BigInt> {
    block: Block<T>,
    x: X,
    state: InputState,
    leading: bool,
    negative: bool,
    config: Config,
}

impl<X> DecimalDigits<X> {
    pub fn new(x: X) -> Self {
        DecimalDigits::identity(x)
    }
}

impl<X, T: Coefficient> DecimalDigits<X, T> {
    /// Expansion with the given coefficient type
    pub fn identity(x: X) -> Self {
        DecimalDigits {
            block: Block::identity(),
            x,
            state: InputState::Fresh,
            leading: false,
            negative: false,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Result<Self> {
        check_precision(&self.block.coeffs(), config.precision)?;
        self.config = config;
        Ok(self)
    }

    /// Whether the value is negative, only known after the first item
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.block.is_collapsed() || (self.leading && self.block.is_numerator_zero())
    }

    /// Shift the next digit into the integer part
    fn shift(&mut self) {
        let scaled = T::from_u8(10)
            .map_or(false, |radix| self.block.checked_scale(&radix, self.config.precision));
        if !scaled {
            debug!("digit coefficients overflow, truncating");
            self.block.collapse();
        }
    }

    /// Settle the integer part, `None` while the input does not decide it.
    /// A negative value with a fractional part is rewritten as
    /// `(i + 1) - (1 - f)` so that later digits belong to the magnitude
    fn reduce_leading(&mut self) -> Option<T> {
        let mut trial = self.block.clone();
        let mut i = trial.reduce_remainder()?;
        if i.is_negative() {
            let [r1, r2, _, _] = trial.coeffs();
            match (r1.is_zero(), r2.is_zero()) {
                (true, true) => {}
                (false, false) => {
                    if !trial.complement(self.config.precision) {
                        debug!("digit coefficients overflow, truncating");
                        trial.collapse();
                    }
                    i = i + T::one();
                }
                // one bound is an integer, the other is not
                _ => return None,
            }
            self.negative = true;
        }

        self.block = trial;
        self.leading = true;
        Some(i)
    }
}

impl<X: Iterator<Item = i64>, T: Coefficient> Iterator for DecimalDigits<X, T> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        for _ in 0..self.config.iteration_limit {
            if self.is_finished() {
                return None;
            }

            if self.state != InputState::Fresh {
                let settled = if self.leading {
                    self.block.reduce_remainder()
                } else {
                    self.reduce_leading()
                };
                if let Some(i) = settled {
                    let item = i.to_i64();
                    match item {
                        Some(_) => self.shift(),
                        None => self.block.collapse(),
                    }
                    return item;
                }
            }

            match pull(&mut self.x, &mut self.state) {
                Some(t) => {
                    let moved = T::from_i64(t)
                        .map_or(false, |t| self.block.ingest(&t, self.config.precision));
                    if !moved {
                        debug!(term = t, "digit coefficients overflow, truncating");
                        self.block.collapse();
                    }
                }
                None => self.block.ingest_infinite(),
            }
        }

        warn!(limit = self.config.iteration_limit, "no digit settled within the iteration limit");
        self.block.collapse();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cont_frac::{Rational, TermArray};
    use crate::symbols::E;
    use crate::traits::ContinuedFraction;

    fn digits(n: i64, d: i64) -> Vec<i64> {
        Rational::new(n, d).unwrap().decimals().collect()
    }

    #[test]
    fn rational_digits_test() {
        assert_eq!(digits(1, 4), vec![0, 2, 5]);
        assert_eq!(digits(7, 1), vec![7]);
        assert_eq!(digits(0, 1), vec![0]);
        assert_eq!(digits(-2, 1), vec![-2]);
        assert_eq!(digits(123, 8), vec![15, 3, 7, 5]);

        let mut d = Rational::new(1, 4).unwrap().decimals();
        assert_eq!(d.by_ref().count(), 3);
        assert!(d.is_finished());
        assert_eq!(d.next(), None);

        let d = Rational::new(16, 9).unwrap().decimals();
        assert_eq!(d.take(6).collect::<Vec<_>>(), vec![1, 7, 7, 7, 7, 7]);
        let d = Rational::new(1, 7).unwrap().decimals();
        assert_eq!(d.take(7).collect::<Vec<_>>(), vec![0, 1, 4, 2, 8, 5, 7]);
    }

    #[test]
    fn negative_digits_test() {
        let mut d = Rational::new(-16, 9).unwrap().decimals();
        assert_eq!(d.by_ref().take(4).collect::<Vec<_>>(), vec![-1, 7, 7, 7]);
        assert!(d.is_negative());

        let mut d = Rational::new(-1, 4).unwrap().decimals();
        assert_eq!(d.by_ref().collect::<Vec<_>>(), vec![0, 2, 5]);
        assert!(d.is_negative());

        let mut d = Rational::new(-2, 1).unwrap().decimals();
        assert_eq!(d.by_ref().collect::<Vec<_>>(), vec![-2]);
        assert!(d.is_negative());

        let mut d = Rational::new(1, 4).unwrap().decimals();
        d.next();
        assert!(!d.is_negative());
    }

    #[test]
    fn irrational_digits_test() {
        let e = E {};
        assert_eq!(
            e.cfrac().decimals().take(11).collect::<Vec<_>>(),
            vec![2, 7, 1, 8, 2, 8, 1, 8, 2, 8, 4]
        );

        let sq2 = TermArray::periodic(vec![1], vec![2]).unwrap();
        assert_eq!(
            sq2.decimals().take(8).collect::<Vec<_>>(),
            vec![1, 4, 1, 4, 2, 1, 3, 5]
        );

        // 2 - e = -0.71828...
        let mut d = e.cfrac().homo(-1, 2, 0, 1).decimals();
        assert_eq!(d.by_ref().take(6).collect::<Vec<_>>(), vec![0, 7, 1, 8, 2, 8]);
        assert!(d.is_negative());
    }

    #[test]
    fn fixed_width_test() {
        let d = DecimalDigits::<_, i64>::identity(E {}.cfrac());
        let items = d.take(100).collect::<Vec<_>>();
        // i64 runs out after a handful of digits, the prefix is still correct
        assert!(items.len() < 100);
        assert_eq!(items[..5], [2, 7, 1, 8, 2]);

        let d = DecimalDigits::new(E {}.cfrac())
            .with_config(Config::default().with_iteration_limit(0))
            .unwrap();
        assert_eq!(d.count(), 0);
    }

    #[test]
    fn infinite_value_test() {
        let mut d = Rational::from(0).homo(0, 1, 1, 0).decimals();
        assert_eq!(d.next(), None);
        assert!(d.is_finished());
    }
}

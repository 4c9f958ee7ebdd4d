//! This module contains several predefined irrational math constants

use crate::cont_frac::{GeneralizedContinuedFraction, GeneralizedHomographic, NumberPair};
use crate::traits::ContinuedFraction;

pub struct E {}
pub struct Pi {}

impl E {
    /// Simple continued fraction of e, `[2; 1, 2, 1, 1, 4, 1, 1, 6, ...]`
    pub fn cfrac(&self) -> ECoefficients {
        ECoefficients { i: 0, m: 0, finished: false }
    }
}

/// Terms of e, ending once the even terms no longer fit in `i64`
#[derive(Debug, Clone)]
pub struct ECoefficients {
    i: i64,
    m: u8,
    finished: bool,
}

impl Iterator for ECoefficients {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.finished {
            return None;
        }
        if self.i == 0 {
            self.i = 2;
            return Some(2);
        }

        let result = match self.m {
            1 => self.i,
            _ => 1,
        };
        if self.m == 2 {
            self.m = 0;
            match self.i.checked_add(2) {
                Some(i) => self.i = i,
                None => self.finished = true,
            }
        } else {
            self.m += 1;
        }
        Some(result)
    }
}

impl ContinuedFraction for ECoefficients {
    #[inline]
    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Pi {
    /// Generalized continued fraction `4 / (1 + 1^2 / (3 + 2^2 / (5 + ...)))`
    pub fn gcf(&self) -> PiPairs {
        PiPairs { k: 0 }
    }

    /// Simple continued fraction of pi, `[3; 7, 15, 1, 292, ...]`
    pub fn cfrac(&self) -> GeneralizedHomographic<PiPairs> {
        self.gcf().simplify()
    }
}

#[derive(Debug, Clone)]
pub struct PiPairs {
    k: i64,
}

impl Iterator for PiPairs {
    type Item = NumberPair;

    fn next(&mut self) -> Option<NumberPair> {
        let pair = match self.k {
            0 => NumberPair::new(1, 0),
            1 => NumberPair::new(4, 1),
            k => {
                let a = (k - 1).checked_mul(k - 1)?;
                NumberPair::new(a, 2 * k - 1)
            }
        };
        self.k += 1;
        Some(pair)
    }
}

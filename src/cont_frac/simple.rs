//! Term sources of simple continued fractions

use crate::error::{Error, Result};
use crate::traits::ContinuedFraction;
use num_integer::Integer;
use num_rational::Ratio;
use std::fmt;

/// A rational number `numer / denom` expanded with the Euclidean algorithm.
///
/// The sign is folded into the numerator at construction, so only the first
/// term can be negative. Each term replaces the fraction with the reciprocal
/// of its remainder, the stream ends when the remainder is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    numer: i64,
    denom: i64,
}

impl Rational {
    pub fn new(numer: i64, denom: i64) -> Result<Self> {
        if denom == 0 {
            return Err(Error::ZeroDenominator);
        }
        if denom < 0 {
            Ok(Rational {
                numer: numer.checked_neg().ok_or(Error::Overflow)?,
                denom: denom.checked_neg().ok_or(Error::Overflow)?,
            })
        } else {
            Ok(Rational { numer, denom })
        }
    }

    /// The fraction that is still to be expanded, as (numerator, denominator).
    /// Once finished, the numerator is the last nonzero remainder
    #[inline]
    pub fn parts(&self) -> (i64, i64) {
        (self.numer, self.denom)
    }
}

impl From<i64> for Rational {
    fn from(v: i64) -> Self {
        Rational { numer: v, denom: 1 }
    }
}

impl TryFrom<Ratio<i64>> for Rational {
    type Error = Error;

    fn try_from(r: Ratio<i64>) -> Result<Self> {
        Rational::new(*r.numer(), *r.denom())
    }
}

impl Iterator for Rational {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.denom == 0 {
            return None;
        }

        // denom is positive here, the floor division never overflows
        let (q, r) = Integer::div_mod_floor(&self.numer, &self.denom);
        self.numer = self.denom;
        self.denom = r;
        Some(q)
    }
}

impl ContinuedFraction for Rational {
    #[inline]
    fn is_finished(&self) -> bool {
        self.denom == 0
    }
}

/// Greatest common divisor, obtained by running the Euclidean term source
/// of `a / b` to completion
pub fn gcd(a: i64, b: i64) -> u64 {
    if b == 0 {
        return a.unsigned_abs();
    }
    match Rational::new(a, b) {
        Ok(mut source) => {
            source.by_ref().for_each(drop);
            source.parts().0.unsigned_abs()
        }
        // only when a sign flip of i64::MIN is needed
        Err(_) => Integer::gcd(&a.unsigned_abs(), &b.unsigned_abs()),
    }
}

/// This struct replays a precomputed list of terms `[a0; a1, a2, ...]`,
/// optionally followed by a period that repeats forever.
/// Where a0 is an signed integer, a1, a2, .. are positive integers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermArray {
    /// Terms of aperiodic part
    a_terms: Vec<i64>,

    /// Terms of periodic part
    p_terms: Vec<i64>,

    pos: usize,
}

impl TermArray {
    /// Create a finite continued fraction from its terms
    pub fn new(terms: Vec<i64>) -> Result<Self> {
        TermArray::periodic(terms, Vec::new())
    }

    /// Create a continued fraction whose terms end with a repeating period
    pub fn periodic(a_terms: Vec<i64>, p_terms: Vec<i64>) -> Result<Self> {
        if a_terms.is_empty() && p_terms.is_empty() {
            return Err(Error::EmptyTerms);
        }

        for (index, &value) in a_terms.iter().enumerate().skip(1) {
            if value <= 0 {
                return Err(Error::NonPositiveTerm { index, value });
            }
        }
        // every periodic term occurs at a nonzero position eventually
        for (i, &value) in p_terms.iter().enumerate() {
            if value <= 0 {
                return Err(Error::NonPositiveTerm { index: a_terms.len() + i, value });
            }
        }

        Ok(TermArray { a_terms, p_terms, pos: 0 })
    }

    #[inline]
    pub fn aperiodic_terms(&self) -> &[i64] {
        &self.a_terms[..]
    }

    #[inline]
    pub fn periodic_terms(&self) -> &[i64] {
        &self.p_terms[..]
    }

    #[inline]
    pub fn is_rational(&self) -> bool {
        self.p_terms.is_empty()
    }
}

impl Iterator for TermArray {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if let Some(&v) = self.a_terms.get(self.pos) {
            self.pos += 1;
            return Some(v);
        }
        if self.p_terms.is_empty() {
            return None;
        }

        let v = self.p_terms[self.pos - self.a_terms.len()];
        self.pos += 1;
        if self.pos == self.a_terms.len() + self.p_terms.len() {
            self.pos = self.a_terms.len(); // wrap around the period
        }
        Some(v)
    }
}

impl ContinuedFraction for TermArray {
    #[inline]
    fn is_finished(&self) -> bool {
        self.p_terms.is_empty() && self.pos >= self.a_terms.len()
    }
}

impl fmt::Display for TermArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.a_terms.iter().enumerate() {
            match i {
                0 => write!(f, "{}", v)?,
                1 => write!(f, "; {}", v)?,
                _ => write!(f, ", {}", v)?,
            }
        }

        if !self.p_terms.is_empty() {
            match self.a_terms.len() {
                0 => {}
                1 => write!(f, "; ")?,
                _ => write!(f, ", ")?,
            }
            let mut piter = self.p_terms.iter();
            if let Some(v) = piter.next() {
                write!(f, "({}", v)?;
            }
            for v in piter {
                write!(f, ", {}", v)?;
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}

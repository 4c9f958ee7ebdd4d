use crate::cont_frac::{Bihomographic, Convergents, DecimalDigits, Homographic, NumberPair};
use core::iter::Map;
use dyn_clone::DynClone;
use num_rational::Ratio;

/// A simple continued fraction `a0 + 1/(a1 + 1/(a2 + ...))` produced lazily,
/// one term per call of [Iterator::next]. The first term can have any sign,
/// every following term is positive.
///
/// The stream ending (`next()` returning `None`) means the value is exactly the
/// convergent of the terms seen so far. A stream ending before its first term
/// represents an infinite value. Once ended, `next()` keeps returning `None`.
///
/// Cloning a stream gives an independent copy that continues from the same
/// position, so one value can feed several transforms.
pub trait ContinuedFraction: Iterator<Item = i64> + DynClone {
    /// Whether the stream is known to have no more terms
    fn is_finished(&self) -> bool;

    /// This method returns a homographic function result on the fraction
    /// A homographic function is `(ax + b)/(cx + d)`
    fn homo(self, a: i64, b: i64, c: i64, d: i64) -> Homographic<Self>
    where
        Self: Sized,
    {
        Homographic::new(self, a, b, c, d)
    }

    /// This method returns a bihomographic function result on the fraction
    /// A bihomographic function is `(axy + bx + cy + d)/(exy + fx + gy + h)`,
    /// with the coefficients given in the order `[a, b, c, d, e, f, g, h]`
    fn bihomo<Y: ContinuedFraction>(self, rhs: Y, coeffs: [i64; 8]) -> Bihomographic<Self, Y>
    where
        Self: Sized,
    {
        Bihomographic::new(self, rhs, coeffs)
    }

    /// Running rational approximations with error bounds
    fn convergents(self) -> Convergents<Self>
    where
        Self: Sized,
    {
        Convergents::new(self)
    }

    /// Decimal expansion of the value
    fn decimals(self) -> DecimalDigits<Self>
    where
        Self: Sized,
    {
        DecimalDigits::new(self)
    }

    /// View the terms as a generalized continued fraction with unit partial numerators
    fn generalize(self) -> Map<Self, fn(i64) -> NumberPair>
    where
        Self: Sized,
    {
        self.map(NumberPair::from_term as fn(i64) -> NumberPair)
    }

    /// Erase the concrete type, useful when building transforms at runtime
    fn boxed<'a>(self) -> Box<dyn ContinuedFraction + 'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

dyn_clone::clone_trait_object!(ContinuedFraction);

impl<'a> ContinuedFraction for Box<dyn ContinuedFraction + 'a> {
    #[inline]
    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Approximation<T> {
    Approximated(T),
    Exact(T),
}

impl<T> Approximation<T> {
    #[inline]
    pub fn value(&self) -> &T {
        match self {
            Approximation::Approximated(v) | Approximation::Exact(v) => v,
        }
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        matches!(self, Approximation::Exact(_))
    }
}

pub trait RationalApproximation<T> {
    /// Return the best convergent whose denominator does not exceed `limit`,
    /// or `None` if the number is infinite
    fn approx_rational(&self, limit: &T) -> Option<Approximation<Ratio<T>>>;
}

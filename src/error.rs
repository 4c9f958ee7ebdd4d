use thiserror::Error;

/// Failures that can happen while constructing a continued fraction.
///
/// Producing terms never fails: arithmetic overflow inside an engine ends the
/// stream instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("denominator must be nonzero")]
    ZeroDenominator,

    #[error("value does not fit in a 64-bit coefficient")]
    Overflow,

    #[error("at least one term is required")]
    EmptyTerms,

    #[error("term {value} at position {index} must be positive")]
    NonPositiveTerm { index: usize, value: i64 },

    #[error("pair ({a}, {b}) at position {index} is not a valid generalized term")]
    InvalidPair { index: usize, a: i64, b: i64 },

    #[error("coefficients need {required} bits but the precision is {precision} bits")]
    InsufficientPrecision { precision: u32, required: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

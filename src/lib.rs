//! Lazy arithmetic on continued fractions.
//!
//! Every value is a stream of continued fraction terms. Transforms consume
//! their inputs only as far as needed to settle the next output term, so
//! irrational values can be combined and expanded to any depth.

mod config;
mod cont_frac;
mod error;
pub mod symbols;
pub mod traits;

pub use config::{Config, DEFAULT_ITERATION_LIMIT};
pub use cont_frac::*;
pub use error::{Error, Result};
pub use traits::{Approximation, ContinuedFraction, RationalApproximation};

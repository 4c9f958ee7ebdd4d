/// Default cap on internal steps spent looking for one term
pub const DEFAULT_ITERATION_LIMIT: u32 = 10_000;

/// Tuning knobs shared by the transformation engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of ingest steps an engine may take for a single term before
    /// giving up and ending the stream
    pub iteration_limit: u32,

    /// Ceiling on the bit length of every stored coefficient, `None` means
    /// the coefficient type's own range is the only limit
    pub precision: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            precision: None,
        }
    }
}

impl Config {
    #[inline]
    pub fn with_iteration_limit(mut self, limit: u32) -> Self {
        self.iteration_limit = limit;
        self
    }

    #[inline]
    pub fn with_precision(mut self, bits: u32) -> Self {
        self.precision = Some(bits);
        self
    }
}

// Constants for the calculator engine

/// Largest `n` accepted by `n!`
pub const FACTORIAL_LIMIT: u64 = 12;

/// Denominator precision used when turning a decimal into an exact fraction
pub const FRACTION_PRECISION: f64 = 1e9;

/// Row operations snap magnitudes below this to exactly zero
pub const ROW_EPSILON: f64 = 1e-4;

/// Deepest bracket nesting the parser accepts
pub const MAX_NESTING_DEPTH: usize = 64;

/// Largest whole exponent applied to a polynomial by repeated multiplication
pub const MAX_POLYNOMIAL_POWER: u32 = 32;

/// Entries kept by the session history before the oldest is evicted
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Message returned for a linear system with no solution
pub const NO_SOLUTION_MESSAGE: &str = "There are no solutions for the given system";

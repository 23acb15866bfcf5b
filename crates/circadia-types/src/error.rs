// ─────────────────────────────────────────────────────────────────────
// Circadia — Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Circadia kernel failures.
///
/// Every error is local to a single evaluation. Nothing inside the
/// model catches these; an integrator that sees one aborts the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircadiaError {
    /// Mathematically undefined input (zero period, malformed schedule).
    #[error("domain error: {0}")]
    Domain(String),

    /// Missing or invalid configuration key.
    #[error("config error: {0}")]
    Config(String),

    /// State vector has the wrong number of components.
    #[error("dimension mismatch: expected {expected} state components, got {got}")]
    Dimension { expected: usize, got: usize },

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Integrator could not complete the requested span.
    #[error("solver error: {0}")]
    Solver(String),
}

pub type CircadiaResult<T> = Result<T, CircadiaError>;

impl CircadiaError {
    /// Shorthand for a missing required configuration key.
    pub fn missing_key(key: &str) -> Self {
        Self::Config(format!("missing required key `{key}`"))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Circadia — Integrator Options
// ─────────────────────────────────────────────────────────────────────

use circadia_types::{CircadiaError, CircadiaResult};
use serde::{Deserialize, Serialize};

/// Tolerances and step limits for the adaptive integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Relative tolerance. Default: 1e-3.
    pub rtol: f64,
    /// Absolute tolerance. Default: 1e-6.
    pub atol: f64,
    /// Upper bound on the step size (hours). Default: unbounded.
    pub max_step: f64,
    /// Initial step; selected automatically when `None`.
    pub first_step: Option<f64>,
    /// Step-attempt budget (accepted + rejected). Default: 1_000_000.
    pub max_steps: u64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 1_000_000,
        }
    }
}

impl SolverOptions {
    /// Tolerances used for reference trajectories: rtol=1e-8, atol=1e-10.
    pub fn reference() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-10,
            ..Self::default()
        }
    }

    pub fn with_tolerances(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> CircadiaResult<()> {
        if !(self.rtol.is_finite() && self.rtol > 0.0) {
            return Err(CircadiaError::Config(format!(
                "rtol must be > 0, got {}",
                self.rtol
            )));
        }
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            return Err(CircadiaError::Config(format!(
                "atol must be >= 0, got {}",
                self.atol
            )));
        }
        if self.max_step.is_nan() || self.max_step <= 0.0 {
            return Err(CircadiaError::Config(format!(
                "max_step must be > 0, got {}",
                self.max_step
            )));
        }
        if let Some(h) = self.first_step {
            if !(h.is_finite() && h > 0.0) {
                return Err(CircadiaError::Config(format!(
                    "first_step must be > 0, got {h}"
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(CircadiaError::Config("max_steps must be > 0".to_string()));
        }
        Ok(())
    }
}

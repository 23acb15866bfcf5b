// ─────────────────────────────────────────────────────────────────────
// Circadia — Clock Phase and Phase-Response Curve
// ─────────────────────────────────────────────────────────────────────
//! Wrapped clock phase and the light phase-response curve:
//!
//!   φ(t, T) = 2π · frac((t - t0) / T)
//!   PRC(φ)  = N(φ; π/2, π/4) - N(φ; 2π, π/4) - N(φ; 0, π/4)
//!   f_L(φ, L) = PRC(φ) · L

use std::f64::consts::TAU;

use circadia_types::{CircadiaError, CircadiaResult};
use statrs::distribution::{Continuous, Normal};

use crate::params::{PRC_LOBES, PRC_LOBE_WIDTH};

/// Phase of time `t` within a cycle of period `period`, in `[0, 2π)`.
///
/// Wrapping is floor based, so negative times stay in range.
pub fn phase(t: f64, period: f64, t0: f64) -> CircadiaResult<f64> {
    if period == 0.0 {
        return Err(CircadiaError::Domain(
            "phase undefined for zero period".to_string(),
        ));
    }
    if !t.is_finite() || !period.is_finite() || !t0.is_finite() {
        return Err(CircadiaError::Numerical(format!(
            "phase inputs must be finite, got t={t}, T={period}, t0={t0}"
        )));
    }
    let x = (t - t0) / period;
    let mut frac = x - x.floor();
    // x slightly below an integer can round frac up to exactly 1.0
    if frac >= 1.0 {
        frac = 0.0;
    }
    Ok(TAU * frac)
}

/// Dual-sensitivity phase-response curve.
///
/// The three Gaussian lobes are built once and reused for every
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseResponseCurve {
    lobes: [(Normal, f64); 3],
}

fn lobe((center, sign): (f64, f64)) -> CircadiaResult<(Normal, f64)> {
    let density = Normal::new(center, PRC_LOBE_WIDTH).map_err(|e| {
        CircadiaError::Domain(format!("PRC lobe at {center} rad is invalid: {e}"))
    })?;
    Ok((density, sign))
}

impl PhaseResponseCurve {
    pub fn new() -> CircadiaResult<Self> {
        Ok(Self {
            lobes: [lobe(PRC_LOBES[0])?, lobe(PRC_LOBES[1])?, lobe(PRC_LOBES[2])?],
        })
    }

    /// PRC(φ).
    pub fn value(&self, phase: f64) -> f64 {
        self.lobes
            .iter()
            .map(|(density, sign)| sign * density.pdf(phase))
            .sum()
    }

    /// Light nonlinearity: phase response scaled by light intensity.
    #[inline]
    pub fn light_response(&self, phase: f64, light: f64) -> f64 {
        self.value(phase) * light
    }
}

/// One-shot PRC(φ).
pub fn prc(phase: f64) -> CircadiaResult<f64> {
    Ok(PhaseResponseCurve::new()?.value(phase))
}

/// One-shot f_L(φ, L).
pub fn light_response(phase: f64, light: f64) -> CircadiaResult<f64> {
    Ok(PhaseResponseCurve::new()?.light_response(phase, light))
}

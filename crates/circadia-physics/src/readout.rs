// ─────────────────────────────────────────────────────────────────────
// Circadia — Waveform Readouts
// ─────────────────────────────────────────────────────────────────────
//! Readout transforms evaluated from trajectory samples:
//!
//!   f_T(T, t) = -cos(2π t / T)    circadian waveform in [-1, 1]
//!   f_S(S)    = S³                 sleepiness

use std::f64::consts::TAU;

use circadia_types::{CircadiaError, CircadiaResult};

/// Circadian waveform of period `period` at time `t`.
pub fn circadian_waveform(period: f64, t: f64) -> CircadiaResult<f64> {
    if period == 0.0 {
        return Err(CircadiaError::Domain(
            "circadian waveform undefined for zero period".to_string(),
        ));
    }
    Ok(-(TAU / period * t).cos())
}

/// Sleepiness readout of sleep pressure.
#[inline]
pub fn sleepiness(s: f64) -> f64 {
    s.powi(3)
}

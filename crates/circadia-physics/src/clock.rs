// ─────────────────────────────────────────────────────────────────────
// Circadia — Clock (Period) Dynamics
// ─────────────────────────────────────────────────────────────────────
//! dT/dt = R(T) - α · f_L(φ(t, T), L(t))
//!
//! with the restoring force R(T) either
//!   -tanh(T - μ) / τ                          (canonical)
//!   -tanh(T - μ) · exp(-(T - μ)² / (2σ²))     (earlier form)
//!
//! The phase is taken with the current period T, so the light term
//! feeds back on the state being differentiated.

use circadia_types::{CircadiaResult, ClockParams, RestoringForce};

use crate::forcing::ForcingInput;
use crate::phase::{phase, PhaseResponseCurve};
use crate::system::{check_dims, OdeSystem};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Restoring {
    Tanh { tau: f64 },
    GaussianTanh { sigma: f64 },
}

/// Clock-only model over the state `y = [T]`.
#[derive(Debug, Clone)]
pub struct ClockModel {
    mu: f64,
    alpha: f64,
    restoring: Restoring,
    prc: PhaseResponseCurve,
    light: ForcingInput,
}

impl ClockModel {
    pub fn new(params: &ClockParams) -> CircadiaResult<Self> {
        params.validate()?;
        let restoring = match params.restoring {
            RestoringForce::Tanh => Restoring::Tanh { tau: params.tau()? },
            RestoringForce::GaussianTanh { sigma } => Restoring::GaussianTanh { sigma },
        };
        Ok(Self {
            mu: params.mu,
            alpha: params.alpha,
            restoring,
            prc: PhaseResponseCurve::new()?,
            light: ForcingInput::from_spec(&params.light)?,
        })
    }

    /// Light forcing input.
    pub fn light(&self) -> &ForcingInput {
        &self.light
    }

    /// Restoring pull toward `mu`; always opposite in sign to `T - mu`.
    pub fn restoring_rate(&self, period: f64) -> f64 {
        let dev = period - self.mu;
        match self.restoring {
            Restoring::Tanh { tau } => -dev.tanh() / tau,
            Restoring::GaussianTanh { sigma } => {
                -dev.tanh() * (-dev * dev / (2.0 * sigma * sigma)).exp()
            }
        }
    }

    /// dT/dt for a given period and (already gated) light intensity.
    pub fn period_rate(&self, t: f64, period: f64, light: f64) -> CircadiaResult<f64> {
        let phi = phase(t, period, 0.0)?;
        Ok(self.restoring_rate(period) - self.alpha * self.prc.light_response(phi, light))
    }
}

impl OdeSystem for ClockModel {
    fn dim(&self) -> usize {
        1
    }

    fn labels(&self) -> &'static [&'static str] {
        &["T"]
    }

    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> CircadiaResult<()> {
        check_dims(y, dydt, 1)?;
        dydt[0] = self.period_rate(t, y[0], self.light.value(t))?;
        Ok(())
    }
}

/// One-shot clock derivative `[dT/dt]` from raw parameters.
pub fn clock_derivative(t: f64, y: &[f64], params: &ClockParams) -> CircadiaResult<Vec<f64>> {
    ClockModel::new(params)?.evaluate(t, y)
}

// ─────────────────────────────────────────────────────────────────────
// Circadia — Sleep-Pressure Dynamics
// ─────────────────────────────────────────────────────────────────────
//! dS/dt = (S_max - S) / τ_S - R(t) / τ_R
//!
//! Passive buildup toward the ceiling and active relief while resting.
//! S is not clamped to [0, S_max].

use circadia_types::{CircadiaResult, SleepParams};

use crate::forcing::ForcingInput;
use crate::system::{check_dims, OdeSystem};

/// Sleep-only model over the state `y = [S]`.
#[derive(Debug, Clone)]
pub struct SleepModel {
    tau_s: f64,
    tau_r: f64,
    s_max: f64,
    rest: ForcingInput,
}

impl SleepModel {
    pub fn new(params: &SleepParams) -> CircadiaResult<Self> {
        params.validate()?;
        Ok(Self {
            tau_s: params.tau_s,
            tau_r: params.tau_r,
            s_max: params.s_max,
            rest: ForcingInput::from_spec(&params.rest)?,
        })
    }

    /// Rest forcing input (0 = awake).
    pub fn rest(&self) -> &ForcingInput {
        &self.rest
    }

    /// dS/dt for a given pressure and rest intensity.
    #[inline]
    pub fn pressure_rate(&self, pressure: f64, rest: f64) -> f64 {
        (self.s_max - pressure) / self.tau_s - rest / self.tau_r
    }
}

impl OdeSystem for SleepModel {
    fn dim(&self) -> usize {
        1
    }

    fn labels(&self) -> &'static [&'static str] {
        &["S"]
    }

    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> CircadiaResult<()> {
        check_dims(y, dydt, 1)?;
        dydt[0] = self.pressure_rate(y[0], self.rest.value(t));
        Ok(())
    }
}

/// One-shot sleep derivative `[dS/dt]` from raw parameters.
pub fn sleep_derivative(t: f64, y: &[f64], params: &SleepParams) -> CircadiaResult<Vec<f64>> {
    SleepModel::new(params)?.evaluate(t, y)
}

// ─────────────────────────────────────────────────────────────────────
// Circadia — Combined Energy Model
// ─────────────────────────────────────────────────────────────────────
//! Clock period and sleep pressure coupled over `y = [T, S]`:
//!
//!   L_g(t) = L(t) · [R(t) == 0]
//!   dT/dt  = R_T(T) - α · f_L(φ(t, T), L_g(t))
//!   dS/dt  = (S_max - S) / τ_S - R(t) / τ_R + f_T(T, t) / τ
//!
//! Light is masked out entirely whenever any rest signal is present.

use circadia_types::{CircadiaResult, EnergyParams};

use crate::clock::ClockModel;
use crate::forcing::ForcingInput;
use crate::readout::circadian_waveform;
use crate::sleep::SleepModel;
use crate::system::{check_dims, OdeSystem};

/// Joint clock / sleep-pressure model.
#[derive(Debug, Clone)]
pub struct EnergyModel {
    clock: ClockModel,
    sleep: SleepModel,
    tau: f64,
}

impl EnergyModel {
    pub fn new(params: &EnergyParams) -> CircadiaResult<Self> {
        params.validate()?;
        Ok(Self {
            clock: ClockModel::new(&params.clock)?,
            sleep: SleepModel::new(&params.sleep)?,
            tau: params.clock.tau()?,
        })
    }

    pub fn clock(&self) -> &ClockModel {
        &self.clock
    }

    pub fn sleep(&self) -> &SleepModel {
        &self.sleep
    }

    pub fn light(&self) -> &ForcingInput {
        self.clock.light()
    }

    pub fn rest(&self) -> &ForcingInput {
        self.sleep.rest()
    }

    /// Light reaching the clock at `t`: zero whenever rest is nonzero.
    pub fn gated_light(&self, t: f64) -> f64 {
        Self::gate(self.clock.light().value(t), self.sleep.rest().value(t))
    }

    #[inline]
    fn gate(light: f64, rest: f64) -> f64 {
        if rest == 0.0 {
            light
        } else {
            0.0
        }
    }
}

impl OdeSystem for EnergyModel {
    fn dim(&self) -> usize {
        2
    }

    fn labels(&self) -> &'static [&'static str] {
        &["T", "S"]
    }

    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> CircadiaResult<()> {
        check_dims(y, dydt, 2)?;
        let (period, pressure) = (y[0], y[1]);
        let rest = self.sleep.rest().value(t);
        let light = Self::gate(self.clock.light().value(t), rest);

        dydt[0] = self.clock.period_rate(t, period, light)?;
        dydt[1] = self.sleep.pressure_rate(pressure, rest)
            + circadian_waveform(period, t)? / self.tau;
        Ok(())
    }
}

/// One-shot energy derivative `[dT/dt, dS/dt]` from raw parameters.
pub fn energy_derivative(t: f64, y: &[f64], params: &EnergyParams) -> CircadiaResult<Vec<f64>> {
    EnergyModel::new(params)?.evaluate(t, y)
}

// ─────────────────────────────────────────────────────────────────────
// Circadia — Clock and Sleep-Pressure Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Circadian period dynamics, homeostatic sleep pressure and their
//! coupling, driven by light and rest schedules.
//!
//! Every model is a pure right-hand side `dy/dt = f(t, y)` exposed
//! through [`OdeSystem`]; integration lives in `circadia-solver`.
//!
//! Architecture:
//!   - phase: wrapped clock phase, PRC, light nonlinearity
//!   - forcing: daily / smooth / day-varying drive signals
//!   - clock: dT/dt over `[T]`
//!   - sleep: dS/dt over `[S]`
//!   - energy: coupled `[T, S]` with rest-gated light
//!   - readout: circadian waveform and sleepiness transforms

pub mod clock;
pub mod energy;
pub mod forcing;
pub mod params;
pub mod phase;
pub mod readout;
pub mod sleep;
pub mod system;

pub use clock::{clock_derivative, ClockModel};
pub use energy::{energy_derivative, EnergyModel};
pub use forcing::{ForcingInput, Interval};
pub use params::{
    reference_clock_params, reference_energy_params, reference_sleep_params, HOURS_PER_DAY,
    SLEEP_THRESHOLD,
};
pub use phase::{light_response, phase, prc, PhaseResponseCurve};
pub use readout::{circadian_waveform, sleepiness};
pub use sleep::{sleep_derivative, SleepModel};
pub use system::OdeSystem;

// ─────────────────────────────────────────────────────────────────────
// Circadia — Reference Solver
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Reference integration for the Circadia models.
//!
//! Architecture:
//!   - DormandPrince / solve_ivp: adaptive 5(4) integrator with exact
//!     sampling on an evaluation grid
//!   - integrate_rk4: fixed-step baseline
//!   - Solution: sampled trajectory plus waveform / forcing readouts
//!   - get_intervals: boolean runs → time spans
//!   - run_conditions: paired light/rest batches through the energy model

pub mod conditions;
pub mod dopri;
pub mod intervals;
pub mod options;
pub mod rk4;
pub mod solution;

pub use conditions::{run_conditions, ConditionRun};
pub use dopri::{solve_ivp, DormandPrince};
pub use intervals::get_intervals;
pub use options::SolverOptions;
pub use rk4::integrate_rk4;
pub use solution::{Solution, SolverStats};

// ─────────────────────────────────────────────────────────────────────
// Circadia — Canonical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Model constants and the reference parameter sets used by the
//! regression scenarios and benchmarks.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use circadia_types::{ClockParams, EnergyParams, ForcingSpec, SleepParams};

/// Length of the forcing-schedule day (hours).
pub const HOURS_PER_DAY: f64 = 24.0;

/// Standard deviation shared by every PRC lobe (rad).
pub const PRC_LOBE_WIDTH: f64 = FRAC_PI_4;

/// PRC lobes as `(center, sign)`: delay lobe at π/2, advance lobes at
/// 2π and 0 so the curve is negative on both sides of the wrap.
pub const PRC_LOBES: [(f64, f64); 3] = [(FRAC_PI_2, 1.0), (TAU, -1.0), (0.0, -1.0)];

/// Rest values above this count as asleep when classifying trajectories.
pub const SLEEP_THRESHOLD: f64 = 0.5;

/// Reference clock scenario: `mu=24, tau=10, alpha=0.1`, light 06:00-22:00.
pub fn reference_clock_params() -> ClockParams {
    ClockParams::new(24.0, 10.0, 0.1, ForcingSpec::daily(vec![(6.0, 22.0)], 1.0))
}

/// Reference sleep scenario: night rest 22:00-06:00 split across midnight.
pub fn reference_sleep_params() -> SleepParams {
    SleepParams::new(
        16.0,
        4.0,
        ForcingSpec::daily(vec![(0.0, 6.0), (22.0, 24.0)], 1.0),
    )
}

/// Reference energy scenario combining the clock and sleep references.
pub fn reference_energy_params() -> EnergyParams {
    EnergyParams {
        clock: reference_clock_params(),
        sleep: reference_sleep_params(),
    }
}

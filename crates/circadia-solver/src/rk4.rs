// ─────────────────────────────────────────────────────────────────────
// Circadia — Fixed-Step RK4 Integrator
// ─────────────────────────────────────────────────────────────────────
//! Classical 4th-order Runge-Kutta on a uniform grid, used for baseline
//! trajectories. Grid times are `t0 + i·h`, not accumulated sums.

use circadia_physics::OdeSystem;
use circadia_types::{CircadiaError, CircadiaResult};

use crate::solution::Solution;

/// Integrate over `t_span` in `n_steps` equal steps, recording every step.
pub fn integrate_rk4<S: OdeSystem + ?Sized>(
    system: &S,
    t_span: (f64, f64),
    y0: &[f64],
    n_steps: usize,
) -> CircadiaResult<Solution> {
    let (t0, t1) = t_span;
    let n = system.dim();
    if y0.len() != n {
        return Err(CircadiaError::Dimension {
            expected: n,
            got: y0.len(),
        });
    }
    if n_steps == 0 || !(t1 > t0) || !t0.is_finite() || !t1.is_finite() {
        return Err(CircadiaError::Config(format!(
            "rk4 needs n_steps > 0 over an increasing finite span, got {n_steps} over ({t0}, {t1})"
        )));
    }
    let h = (t1 - t0) / n_steps as f64;

    let mut y = y0.to_vec();
    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut scratch = vec![0.0; n];

    let mut solution = Solution::new(system.labels());
    solution.t.reserve(n_steps + 1);
    solution.push(t0, &y);

    for step in 0..n_steps {
        let t = t0 + step as f64 * h;

        system.derivative(t, &y, &mut k1)?;
        for i in 0..n {
            scratch[i] = y[i] + 0.5 * h * k1[i];
        }
        system.derivative(t + 0.5 * h, &scratch, &mut k2)?;
        for i in 0..n {
            scratch[i] = y[i] + 0.5 * h * k2[i];
        }
        system.derivative(t + 0.5 * h, &scratch, &mut k3)?;
        for i in 0..n {
            scratch[i] = y[i] + h * k3[i];
        }
        system.derivative(t + h, &scratch, &mut k4)?;

        for i in 0..n {
            y[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(CircadiaError::Numerical(format!(
                "rk4 state became non-finite at t={}",
                t + h
            )));
        }
        solution.push(t0 + (step + 1) as f64 * h, &y);
    }

    solution.stats.nfev = 4 * n_steps as u64;
    solution.stats.n_accepted = n_steps as u64;
    Ok(solution)
}

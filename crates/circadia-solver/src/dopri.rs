// ─────────────────────────────────────────────────────────────────────
// Circadia — Dormand-Prince 5(4) Integrator
// ─────────────────────────────────────────────────────────────────────
//! Adaptive explicit Runge-Kutta integrator with embedded 4th-order
//! error estimate and FSAL reuse of the last stage.
//!
//!   err_norm = rms(err_i / (atol + rtol · max(|y_i|, |y_new_i|)))
//!
//! Steps with err_norm ≤ 1 are accepted. A trial whose state turns
//! non-finite, or whose stage evaluation reports a numerical error, is
//! rejected with the minimum shrink factor; any other model error aborts
//! the run. When an evaluation grid is given, steps are clipped to land
//! exactly on each grid time.
//!
//! Pre-allocated stage buffers; no allocation per step.

use circadia_physics::OdeSystem;
use circadia_types::{CircadiaError, CircadiaResult};

use crate::options::SolverOptions;
use crate::solution::{Solution, SolverStats};

const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [&[f64]; 5] = [
    &[1.0 / 5.0],
    &[3.0 / 40.0, 9.0 / 40.0],
    &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
    &[
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
    ],
    &[
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
];

/// 5th-order solution weights.
const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// Difference between the 5th- and embedded 4th-order weights.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

fn rms(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    (values.map(|v| v * v).sum::<f64>() / n.max(1) as f64).sqrt()
}

/// Dormand-Prince stepper over an [`OdeSystem`].
pub struct DormandPrince<'a, S: OdeSystem + ?Sized> {
    system: &'a S,
    opts: SolverOptions,
    n: usize,
    t: f64,
    y: Vec<f64>,
    // Stage derivatives; k[0] holds f(t, y) between steps.
    k: [Vec<f64>; 7],
    y_stage: Vec<f64>,
    y_new: Vec<f64>,
    stats: SolverStats,
}

impl<'a, S: OdeSystem + ?Sized> DormandPrince<'a, S> {
    pub fn new(system: &'a S, opts: SolverOptions, t0: f64, y0: &[f64]) -> CircadiaResult<Self> {
        opts.validate()?;
        let n = system.dim();
        if y0.len() != n {
            return Err(CircadiaError::Dimension {
                expected: n,
                got: y0.len(),
            });
        }
        if !t0.is_finite() || y0.iter().any(|v| !v.is_finite()) {
            return Err(CircadiaError::Numerical(
                "initial time or state contains NaN or Inf".to_string(),
            ));
        }
        let mut stepper = Self {
            system,
            opts,
            n,
            t: t0,
            y: y0.to_vec(),
            k: std::array::from_fn(|_| vec![0.0; n]),
            y_stage: vec![0.0; n],
            y_new: vec![0.0; n],
            stats: SolverStats::default(),
        };
        stepper.system.derivative(t0, &stepper.y, &mut stepper.k[0])?;
        stepper.stats.nfev += 1;
        Ok(stepper)
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    fn scale(&self, i: usize, other: f64) -> f64 {
        self.opts.atol + self.opts.rtol * self.y[i].abs().max(other.abs())
    }

    /// Initial step estimate from the local derivative scale.
    pub fn initial_step(&mut self, t_end: f64) -> CircadiaResult<f64> {
        let span = t_end - self.t;
        if span <= 0.0 {
            return Ok(0.0);
        }
        let n = self.n;
        let d0 = rms((0..n).map(|i| self.y[i] / self.scale(i, self.y[i])), n);
        let d1 = rms((0..n).map(|i| self.k[0][i] / self.scale(i, self.y[i])), n);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        let h0 = h0.min(span);

        for i in 0..n {
            self.y_stage[i] = self.y[i] + h0 * self.k[0][i];
        }
        self.system
            .derivative(self.t + h0, &self.y_stage, &mut self.k[1])?;
        self.stats.nfev += 1;
        let d2 = rms(
            (0..n).map(|i| (self.k[1][i] - self.k[0][i]) / self.scale(i, self.y[i])),
            n,
        ) / h0;

        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / 5.0)
        };
        Ok((100.0 * h0).min(h1).min(span).min(self.opts.max_step))
    }

    /// Try one step of size `h` ending at `t_new`; returns the error norm.
    ///
    /// Leaves the candidate in `y_new` and its derivative in `k[6]`.
    fn attempt(&mut self, h: f64, t_new: f64) -> CircadiaResult<f64> {
        let n = self.n;
        for (s, row) in A.iter().enumerate() {
            let stage = s + 1;
            for i in 0..n {
                let acc: f64 = row.iter().enumerate().map(|(m, &a)| a * self.k[m][i]).sum();
                self.y_stage[i] = self.y[i] + h * acc;
            }
            self.system
                .derivative(self.t + C[stage] * h, &self.y_stage, &mut self.k[stage])?;
            self.stats.nfev += 1;
        }
        for i in 0..n {
            let acc: f64 = B.iter().enumerate().map(|(m, &b)| b * self.k[m][i]).sum();
            self.y_new[i] = self.y[i] + h * acc;
        }
        self.system.derivative(t_new, &self.y_new, &mut self.k[6])?;
        self.stats.nfev += 1;

        let err_norm = rms(
            (0..n).map(|i| {
                let err: f64 = E.iter().enumerate().map(|(m, &e)| e * self.k[m][i]).sum();
                h * err / self.scale(i, self.y_new[i])
            }),
            n,
        );
        Ok(err_norm)
    }

    /// Advance by one accepted step, never past `target`.
    ///
    /// `h` is the proposed step size; returns the proposal for the next step.
    pub fn advance(&mut self, h: f64, target: f64) -> CircadiaResult<f64> {
        let mut h = h.min(self.opts.max_step);
        let mut rejected = false;
        loop {
            if self.stats.n_accepted + self.stats.n_rejected >= self.opts.max_steps {
                log::error!(
                    "integration aborted at t={:.6}: step budget of {} exhausted",
                    self.t,
                    self.opts.max_steps
                );
                return Err(CircadiaError::Solver(format!(
                    "exceeded max_steps={} at t={}",
                    self.opts.max_steps, self.t
                )));
            }
            let min_step = 10.0 * f64::EPSILON * self.t.abs().max(1.0);
            if h < min_step {
                log::error!("integration aborted at t={:.6}: step size underflow", self.t);
                return Err(CircadiaError::Solver(format!(
                    "step size {h:e} below minimum {min_step:e} at t={}",
                    self.t
                )));
            }

            let remaining = target - self.t;
            let clipped = h >= remaining;
            let (h_try, t_new) = if clipped {
                (remaining, target)
            } else {
                (h, self.t + h)
            };

            let trial = match self.attempt(h_try, t_new) {
                Ok(err_norm) if err_norm.is_finite() && self.y_new.iter().all(|v| v.is_finite()) => {
                    Ok(err_norm)
                }
                Ok(_) => Err("non-finite trial state".to_string()),
                // A stage that strays outside the model's domain of finite
                // values fails this trial only; other errors end the run.
                Err(CircadiaError::Numerical(msg)) => Err(msg),
                Err(e) => return Err(e),
            };

            let factor = match trial {
                Ok(err_norm) if err_norm <= 1.0 => {
                    let mut factor = if err_norm == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * err_norm.powf(ERROR_EXPONENT)).min(MAX_FACTOR)
                    };
                    if rejected {
                        factor = factor.min(1.0);
                    }
                    self.t = t_new;
                    std::mem::swap(&mut self.y, &mut self.y_new);
                    self.k.swap(0, 6);
                    self.stats.n_accepted += 1;

                    let next = h_try * factor;
                    return Ok(if clipped { next.max(h) } else { next });
                }
                Ok(err_norm) => (SAFETY * err_norm.powf(ERROR_EXPONENT)).max(MIN_FACTOR),
                Err(reason) => {
                    log::warn!(
                        "trial step rejected at t={:.6} with h={h_try:e}: {reason}; shrinking step",
                        self.t
                    );
                    MIN_FACTOR
                }
            };
            h = h_try * factor;
            rejected = true;
            self.stats.n_rejected += 1;
        }
    }
}

/// Integrate `system` from `t_span.0` to `t_span.1`.
///
/// With `t_eval`, the solution is sampled exactly at those times (sorted,
/// within the span); otherwise every accepted step is recorded. Only
/// forward integration is supported.
pub fn solve_ivp<S: OdeSystem + ?Sized>(
    system: &S,
    t_span: (f64, f64),
    y0: &[f64],
    t_eval: Option<&[f64]>,
    opts: &SolverOptions,
) -> CircadiaResult<Solution> {
    let (t0, t1) = t_span;
    if !t0.is_finite() || !t1.is_finite() {
        return Err(CircadiaError::Config(format!(
            "t_span must be finite, got ({t0}, {t1})"
        )));
    }
    if t1 < t0 {
        return Err(CircadiaError::Config(format!(
            "t_span must be increasing, got ({t0}, {t1})"
        )));
    }
    if let Some(grid) = t_eval {
        if grid.windows(2).any(|w| w[1] < w[0]) {
            return Err(CircadiaError::Config("t_eval must be sorted".to_string()));
        }
        if grid.iter().any(|&t| !(t0..=t1).contains(&t)) {
            return Err(CircadiaError::Config(format!(
                "t_eval must lie within t_span ({t0}, {t1})"
            )));
        }
    }

    let mut stepper = DormandPrince::new(system, opts.clone(), t0, y0)?;
    let mut solution = Solution::new(system.labels());
    let mut next_eval = 0usize;

    match t_eval {
        Some(grid) => {
            while next_eval < grid.len() && grid[next_eval] <= t0 {
                solution.push(grid[next_eval], stepper.y());
                next_eval += 1;
            }
        }
        None => solution.push(t0, stepper.y()),
    }

    let mut h = match opts.first_step {
        Some(h) => h,
        None => stepper.initial_step(t1)?,
    };

    while stepper.t() < t1 {
        let target = t_eval
            .and_then(|grid| grid.get(next_eval).copied())
            .unwrap_or(t1);
        h = stepper.advance(h, target)?;

        match t_eval {
            Some(grid) => {
                while next_eval < grid.len() && grid[next_eval] <= stepper.t() {
                    solution.push(grid[next_eval], stepper.y());
                    next_eval += 1;
                }
            }
            None => solution.push(stepper.t(), stepper.y()),
        }
    }

    solution.stats = stepper.stats();
    log::debug!(
        "solve_ivp ({t0}, {t1}): {} accepted, {} rejected, {} evaluations",
        solution.stats.n_accepted,
        solution.stats.n_rejected,
        solution.stats.nfev
    );
    Ok(solution)
}

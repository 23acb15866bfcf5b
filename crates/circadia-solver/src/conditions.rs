// ─────────────────────────────────────────────────────────────────────
// Circadia — Condition Batches
// ─────────────────────────────────────────────────────────────────────
//! Runs every paired light/rest condition of a [`ConditionBatch`]
//! through the energy model over a shared span and sample grid, and
//! classifies the sleep intervals of each run.

use circadia_physics::{EnergyModel, SLEEP_THRESHOLD};
use circadia_types::{CircadiaResult, ConditionBatch};
use serde::{Deserialize, Serialize};

use crate::dopri::solve_ivp;
use crate::intervals::get_intervals;
use crate::options::SolverOptions;
use crate::solution::Solution;

/// One simulated condition with its recomputed forcing traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRun {
    pub title: String,
    pub solution: Solution,
    /// Ungated light schedule on the sample grid.
    pub light: Vec<f64>,
    /// Rest schedule on the sample grid.
    pub rest: Vec<f64>,
    /// Spans where rest exceeds [`SLEEP_THRESHOLD`].
    pub sleep_intervals: Vec<(f64, f64)>,
}

/// Simulate each paired condition from the shared initial state `[T, S]`.
pub fn run_conditions(
    batch: &ConditionBatch,
    t_span: (f64, f64),
    t_eval: Option<&[f64]>,
    y0: &[f64],
    opts: &SolverOptions,
) -> CircadiaResult<Vec<ConditionRun>> {
    let mut runs = Vec::with_capacity(batch.len());
    for i in 0..batch.len() {
        let title = batch.title(i);
        let model = EnergyModel::new(&batch.energy_params(i)?)?;
        let solution = solve_ivp(&model, t_span, y0, t_eval, opts)?;

        let light = solution.forcing_trace(model.light());
        let rest = solution.forcing_trace(model.rest());
        let asleep: Vec<bool> = rest.iter().map(|&r| r > SLEEP_THRESHOLD).collect();
        let sleep_intervals = get_intervals(&solution.t, &asleep)?;

        log::debug!(
            "condition {title}: {} samples, {} sleep intervals",
            solution.len(),
            sleep_intervals.len()
        );
        runs.push(ConditionRun {
            title,
            solution,
            light,
            rest,
            sleep_intervals,
        });
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_json() -> &'static str {
        r#"{
            "C": {
                "mu": 24.0, "tau": 10.0, "alpha": 0.1,
                "light_conditions": [
                    {"title": "Daylight",
                     "light": {"input": "input_daily", "hours": [[6, 22]], "amp": 1.0}},
                    {"light": {"input": "input_daily_smooth", "center": 12.0, "width": 4.0}}
                ]
            },
            "S": {
                "tau_S": 16.0, "tau_R": 4.0,
                "rest_conditions": [
                    {"title": "Night sleep",
                     "rest": {"input": "input_daily", "hours": [[0, 6], [22, 24]], "amp": 1.0}},
                    {"rest": {"input": "input_variable",
                              "hours": [[[0, 8]], [[2, 10]]],
                              "amp": [[1.0], [1.0]]}}
                ]
            }
        }"#
    }

    #[test]
    fn test_runs_every_pair() {
        let batch = ConditionBatch::from_json(batch_json()).unwrap();
        let grid: Vec<f64> = (0..=72).map(|i| i as f64).collect();
        let runs = run_conditions(
            &batch,
            (0.0, 72.0),
            Some(&grid),
            &[24.0, 1.0],
            &SolverOptions::reference(),
        )
        .unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].title, "Daylight - Night sleep");
        assert_eq!(runs[1].title, "C2 - S2");
        for run in &runs {
            assert_eq!(run.solution.len(), grid.len());
            assert_eq!(run.light.len(), grid.len());
            assert_eq!(run.rest.len(), grid.len());
        }
    }

    #[test]
    fn test_sleep_intervals_classified() {
        let batch = ConditionBatch::from_json(batch_json()).unwrap();
        let grid: Vec<f64> = (0..=72).map(|i| i as f64).collect();
        let runs = run_conditions(
            &batch,
            (0.0, 72.0),
            Some(&grid),
            &[24.0, 1.0],
            &SolverOptions::reference(),
        )
        .unwrap();
        // Night sleep: 00-06 on day 0, then 22-06 across each midnight.
        assert_eq!(
            runs[0].sleep_intervals,
            vec![(0.0, 6.0), (22.0, 30.0), (46.0, 54.0), (70.0, 72.0)]
        );
        // Variable schedule: two scheduled nights, nothing on day 2.
        assert_eq!(runs[1].sleep_intervals, vec![(0.0, 8.0), (26.0, 34.0)]);
    }
}

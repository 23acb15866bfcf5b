// ─────────────────────────────────────────────────────────────────────
// Circadia — Integrated Trajectories
// ─────────────────────────────────────────────────────────────────────
//! Sampled trajectories and their readouts.
//!
//! Readouts (circadian waveform, sleepiness, forcing traces) are
//! recomputed from the sampled `t` and state values; they are never
//! integrated as extra state.

use circadia_physics::{circadian_waveform, sleepiness, ForcingInput};
use circadia_types::{CircadiaError, CircadiaResult};
use serde::{Deserialize, Serialize};

/// Integrator work counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Right-hand side evaluations.
    pub nfev: u64,
    pub n_accepted: u64,
    pub n_rejected: u64,
}

/// State trajectory sampled at increasing times.
///
/// `y[i][k]` is component `i` at time `t[k]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub t: Vec<f64>,
    pub y: Vec<Vec<f64>>,
    pub labels: Vec<String>,
    pub stats: SolverStats,
}

impl Solution {
    pub fn new(labels: &[&str]) -> Self {
        Self {
            t: Vec::new(),
            y: vec![Vec::new(); labels.len()],
            labels: labels.iter().map(|l| l.to_string()).collect(),
            stats: SolverStats::default(),
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: &[f64]) {
        self.t.push(t);
        for (series, &v) in self.y.iter_mut().zip(state) {
            series.push(v);
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Samples of the component named `label`.
    pub fn component(&self, label: &str) -> CircadiaResult<&[f64]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.y[i].as_slice())
            .ok_or_else(|| CircadiaError::Config(format!("solution has no `{label}` component")))
    }

    /// Full state at sample `k`.
    pub fn state(&self, k: usize) -> Option<Vec<f64>> {
        if k >= self.len() {
            return None;
        }
        Some(self.y.iter().map(|series| series[k]).collect())
    }

    /// Last sampled state.
    pub fn final_state(&self) -> Option<Vec<f64>> {
        self.len().checked_sub(1).and_then(|k| self.state(k))
    }

    /// Circadian waveform `f_T(T(t), t)` on the sample grid.
    pub fn circadian_rhythm(&self) -> CircadiaResult<Vec<f64>> {
        self.component("T")?
            .iter()
            .zip(&self.t)
            .map(|(&period, &t)| circadian_waveform(period, t))
            .collect()
    }

    /// Sleepiness `f_S(S(t))` on the sample grid.
    pub fn sleepiness(&self) -> CircadiaResult<Vec<f64>> {
        Ok(self.component("S")?.iter().map(|&s| sleepiness(s)).collect())
    }

    /// A forcing input evaluated on the sample grid.
    pub fn forcing_trace(&self, input: &ForcingInput) -> Vec<f64> {
        input.values(&self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circadia_types::ForcingSpec;

    fn sample() -> Solution {
        let mut sol = Solution::new(&["T", "S"]);
        sol.push(0.0, &[24.0, 1.0]);
        sol.push(6.0, &[24.0, 1.5]);
        sol.push(12.0, &[24.0, 2.0]);
        sol
    }

    #[test]
    fn test_components_by_label() {
        let sol = sample();
        assert_eq!(sol.len(), 3);
        assert_eq!(sol.component("S").unwrap(), &[1.0, 1.5, 2.0]);
        assert!(sol.component("X").is_err());
    }

    #[test]
    fn test_state_access() {
        let sol = sample();
        assert_eq!(sol.state(1), Some(vec![24.0, 1.5]));
        assert_eq!(sol.final_state(), Some(vec![24.0, 2.0]));
        assert_eq!(sol.state(3), None);
        assert_eq!(Solution::new(&["T"]).final_state(), None);
    }

    #[test]
    fn test_circadian_rhythm_recomputed() {
        let rhythm = sample().circadian_rhythm().unwrap();
        assert!((rhythm[0] + 1.0).abs() < 1e-12);
        assert!(rhythm[1].abs() < 1e-12);
        assert!((rhythm[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sleepiness_readout() {
        assert_eq!(sample().sleepiness().unwrap(), vec![1.0, 3.375, 8.0]);
    }

    #[test]
    fn test_clock_only_has_no_sleepiness() {
        let mut sol = Solution::new(&["T"]);
        sol.push(0.0, &[24.0]);
        assert!(sol.sleepiness().is_err());
        assert!(sol.circadian_rhythm().is_ok());
    }

    #[test]
    fn test_forcing_trace() {
        let input =
            ForcingInput::from_spec(&ForcingSpec::daily(vec![(5.0, 10.0)], 0.5)).unwrap();
        assert_eq!(sample().forcing_trace(&input), vec![0.0, 0.5, 0.0]);
    }
}

// ─────────────────────────────────────────────────────────────────────
// Circadia — Forcing-Input Generators
// ─────────────────────────────────────────────────────────────────────
//! Light / rest drive signals built once from a [`ForcingSpec`].
//!
//! - `input_daily`: 24 h step schedule, overlapping intervals sum.
//! - `input_daily_smooth`: Gaussian bump over the hour of day.
//! - `input_variable`: per-day step schedule, zero after the last day.
//!
//! Amplitude broadcasting and length checks happen in
//! [`ForcingInput::from_spec`]; evaluation never re-validates.

use circadia_types::{Amplitude, CircadiaResult, ForcingSpec};
use serde::{Deserialize, Serialize};

use crate::params::HOURS_PER_DAY;

/// One half-open `[start, end)` interval with its amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub amp: f64,
}

impl Interval {
    #[inline]
    fn contribution(&self, hour: f64) -> f64 {
        if hour >= self.start && hour < self.end {
            self.amp
        } else {
            0.0
        }
    }
}

/// A validated, normalized forcing-input generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForcingInput {
    Daily { intervals: Vec<Interval> },
    DailySmooth { center: f64, amp: f64, width: f64 },
    Variable { days: Vec<Vec<Interval>> },
}

fn zip_intervals(hours: &[(f64, f64)], amps: Vec<f64>) -> Vec<Interval> {
    hours
        .iter()
        .zip(amps)
        .map(|(&(start, end), amp)| Interval { start, end, amp })
        .collect()
}

/// Hour of day in `[0, 24)`.
#[inline]
fn hour_of_day(t: f64) -> f64 {
    let hour = t.rem_euclid(HOURS_PER_DAY);
    // Tiny negative t rounds up to exactly 24.0
    if hour >= HOURS_PER_DAY {
        0.0
    } else {
        hour
    }
}

impl ForcingInput {
    /// Validate `spec` and normalize it into an evaluator.
    pub fn from_spec(spec: &ForcingSpec) -> CircadiaResult<Self> {
        spec.validate()?;
        let input = match spec {
            ForcingSpec::Daily { hours, amp } => ForcingInput::Daily {
                intervals: zip_intervals(hours, amp.broadcast(hours.len())?),
            },
            ForcingSpec::DailySmooth { center, amp, width } => ForcingInput::DailySmooth {
                center: *center,
                amp: *amp,
                width: *width,
            },
            ForcingSpec::Variable { hours, amp } => {
                let mut days = Vec::with_capacity(hours.len());
                for (day, (day_hours, day_amp)) in hours.iter().zip(amp).enumerate() {
                    if matches!(day_amp, Amplitude::Uniform(_)) && day_hours.len() > 1 {
                        log::warn!(
                            "input_variable day {day}: scalar amplitude broadcast over {} intervals; \
                             migrate to per-interval amplitude lists",
                            day_hours.len()
                        );
                    }
                    days.push(zip_intervals(
                        day_hours,
                        day_amp.broadcast(day_hours.len())?,
                    ));
                }
                ForcingInput::Variable { days }
            }
        };
        Ok(input)
    }

    /// Number of scheduled days for a variable schedule; `None` when the
    /// input repeats daily.
    pub fn scheduled_days(&self) -> Option<usize> {
        match self {
            ForcingInput::Variable { days } => Some(days.len()),
            _ => None,
        }
    }

    /// Drive value at time `t` (hours).
    pub fn value(&self, t: f64) -> f64 {
        match self {
            ForcingInput::Daily { intervals } => {
                let hour = hour_of_day(t);
                intervals.iter().map(|iv| iv.contribution(hour)).sum()
            }
            ForcingInput::DailySmooth { center, amp, width } => {
                let z = (hour_of_day(t) - center) / width;
                amp * (-0.5 * z * z).exp()
            }
            ForcingInput::Variable { days } => {
                let day = (t / HOURS_PER_DAY).floor();
                if !(day >= 0.0 && day < days.len() as f64) {
                    return 0.0;
                }
                let hour = hour_of_day(t);
                days[day as usize]
                    .iter()
                    .map(|iv| iv.contribution(hour))
                    .sum()
            }
        }
    }

    /// Element-wise evaluation over a time grid.
    pub fn values(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.value(t)).collect()
    }

    /// Element-wise evaluation into a caller-provided buffer.
    pub fn values_into(&self, ts: &[f64], out: &mut [f64]) {
        for (o, &t) in out.iter_mut().zip(ts) {
            *o = self.value(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circadia_types::CircadiaError;

    fn daily(hours: Vec<(f64, f64)>, amp: f64) -> ForcingInput {
        ForcingInput::from_spec(&ForcingSpec::daily(hours, amp)).unwrap()
    }

    fn grid() -> Vec<f64> {
        (-100..400).map(|i| i as f64 * 0.37 + 0.011).collect()
    }

    #[test]
    fn test_daily_inside_and_outside() {
        let input = daily(vec![(8.0, 18.0)], 2.0);
        assert_eq!(input.value(10.0), 2.0);
        assert_eq!(input.value(20.0), 0.0);
    }

    #[test]
    fn test_daily_half_open() {
        let input = daily(vec![(8.0, 18.0)], 1.0);
        assert_eq!(input.value(8.0), 1.0);
        assert_eq!(input.value(18.0), 0.0);
    }

    #[test]
    fn test_daily_overlaps_sum() {
        let spec = ForcingSpec::Daily {
            hours: vec![(6.0, 12.0), (10.0, 14.0)],
            amp: Amplitude::PerInterval(vec![1.0, 0.5]),
        };
        let input = ForcingInput::from_spec(&spec).unwrap();
        assert_eq!(input.value(11.0), 1.5);
        assert_eq!(input.value(7.0), 1.0);
        assert_eq!(input.value(13.0), 0.5);
    }

    #[test]
    fn test_daily_periodic() {
        let input = daily(vec![(6.0, 22.0)], 1.0);
        for t in grid() {
            assert_eq!(input.value(t), input.value(t + 24.0), "t={t}");
        }
    }

    #[test]
    fn test_daily_negative_time() {
        let input = daily(vec![(20.0, 24.0)], 1.0);
        assert_eq!(input.value(-2.0), 1.0);
        assert_eq!(input.value(-1e-18), 0.0);
    }

    #[test]
    fn test_daily_mismatch_fails_loudly() {
        let spec = ForcingSpec::Daily {
            hours: vec![(6.0, 12.0), (18.0, 20.0)],
            amp: Amplitude::PerInterval(vec![1.0, 0.5, 0.25]),
        };
        assert!(matches!(
            ForcingInput::from_spec(&spec),
            Err(CircadiaError::Domain(_))
        ));
    }

    #[test]
    fn test_smooth_peak_and_defaults() {
        let input = ForcingInput::from_spec(&ForcingSpec::daily_smooth()).unwrap();
        assert!((input.value(12.0) - 1.0).abs() < 1e-12);
        assert!((input.value(36.0) - 1.0).abs() < 1e-12);
        let one_sigma = input.value(15.0);
        assert!((one_sigma - (-0.5f64).exp()).abs() < 1e-12);
        assert!(input.value(0.0) < 1e-3);
    }

    #[test]
    fn test_smooth_does_not_wrap_midnight() {
        let spec = ForcingSpec::DailySmooth {
            center: 23.0,
            amp: 1.0,
            width: 1.0,
        };
        let input = ForcingInput::from_spec(&spec).unwrap();
        // 00:30 is 1.5 h after the center across midnight but 22.5 h
        // away on the hour-of-day axis.
        assert!(input.value(24.5) < 1e-50);
    }

    fn variable() -> ForcingInput {
        let spec = ForcingSpec::Variable {
            hours: vec![
                vec![(8.0, 18.0)],
                vec![(6.0, 10.0), (16.0, 20.0)],
            ],
            amp: vec![
                Amplitude::PerInterval(vec![1.0]),
                Amplitude::PerInterval(vec![0.5, 2.0]),
            ],
        };
        ForcingInput::from_spec(&spec).unwrap()
    }

    #[test]
    fn test_variable_per_day_schedule() {
        let input = variable();
        assert_eq!(input.value(9.0), 1.0);
        assert_eq!(input.value(24.0 + 9.0), 0.5);
        assert_eq!(input.value(24.0 + 17.0), 2.0);
        assert_eq!(input.value(24.0 + 12.0), 0.0);
        assert_eq!(input.scheduled_days(), Some(2));
    }

    #[test]
    fn test_variable_zero_after_schedule() {
        let input = variable();
        for t in grid() {
            if (t / 24.0).floor() >= 2.0 {
                assert_eq!(input.value(t), 0.0, "t={t}");
            }
        }
    }

    #[test]
    fn test_variable_zero_before_schedule() {
        assert_eq!(variable().value(-15.0), 0.0);
    }

    #[test]
    fn test_variable_legacy_scalar_amp_broadcasts() {
        let spec = ForcingSpec::Variable {
            hours: vec![vec![(6.0, 10.0), (16.0, 20.0)]],
            amp: vec![Amplitude::Uniform(0.75)],
        };
        let input = ForcingInput::from_spec(&spec).unwrap();
        assert_eq!(input.value(7.0), 0.75);
        assert_eq!(input.value(17.0), 0.75);
    }

    #[test]
    fn test_variable_per_day_mismatch_fails() {
        let spec = ForcingSpec::Variable {
            hours: vec![vec![(6.0, 10.0), (16.0, 20.0)]],
            amp: vec![Amplitude::PerInterval(vec![1.0])],
        };
        assert!(ForcingInput::from_spec(&spec).is_err());
    }

    #[test]
    fn test_batched_matches_scalar() {
        let inputs = [
            daily(vec![(6.0, 22.0), (12.0, 13.0)], 1.0),
            ForcingInput::from_spec(&ForcingSpec::daily_smooth()).unwrap(),
            variable(),
        ];
        let ts = grid();
        for input in &inputs {
            let batched = input.values(&ts);
            let mut buffered = vec![f64::NAN; ts.len()];
            input.values_into(&ts, &mut buffered);
            for (i, &t) in ts.iter().enumerate() {
                assert_eq!(batched[i].to_bits(), input.value(t).to_bits());
                assert_eq!(buffered[i].to_bits(), input.value(t).to_bits());
            }
        }
    }

    #[test]
    fn test_values_non_negative_for_non_negative_amps() {
        let input = daily(vec![(6.0, 22.0)], 1.0);
        assert!(input.values(&grid()).iter().all(|&v| v >= 0.0 && v.is_finite()));
    }
}

// ─────────────────────────────────────────────────────────────────────
// Circadia — Model Parameter Configuration
// ─────────────────────────────────────────────────────────────────────
//! Serializable parameter sets for the clock, sleep and energy models.
//!
//! Key names follow the established configuration data (`mu`, `tau`,
//! `tau_S`, `tau_R`, `S_max`, `alpha`, `light`, `rest`, `hours`, `amp`,
//! `center`, `width`) so existing JSON parameter files load unchanged.
//! Forcing inputs are selected by the `input` tag instead of a stored
//! callable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CircadiaError, CircadiaResult};

/// Default sleep-pressure ceiling.
pub const DEFAULT_S_MAX: f64 = 2.0;

/// Defaults for the smooth daily profile.
pub const DEFAULT_SMOOTH_CENTER: f64 = 12.0;
pub const DEFAULT_SMOOTH_AMP: f64 = 1.0;
pub const DEFAULT_SMOOTH_WIDTH: f64 = 3.0;

fn default_s_max() -> f64 {
    DEFAULT_S_MAX
}

fn default_center() -> f64 {
    DEFAULT_SMOOTH_CENTER
}

fn default_amp() -> f64 {
    DEFAULT_SMOOTH_AMP
}

fn default_width() -> f64 {
    DEFAULT_SMOOTH_WIDTH
}

/// Amplitude field of a step schedule: one value for every interval,
/// or one value per interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amplitude {
    Uniform(f64),
    PerInterval(Vec<f64>),
}

impl Amplitude {
    /// Expand to exactly `n` per-interval amplitudes.
    ///
    /// A uniform amplitude is repeated; a list must already have `n`
    /// entries.
    pub fn broadcast(&self, n: usize) -> CircadiaResult<Vec<f64>> {
        match self {
            Amplitude::Uniform(a) => Ok(vec![*a; n]),
            Amplitude::PerInterval(amps) if amps.len() == n => Ok(amps.clone()),
            Amplitude::PerInterval(amps) => Err(CircadiaError::Domain(format!(
                "schedule has {n} intervals but {} amplitudes",
                amps.len()
            ))),
        }
    }

    fn check_finite(&self, what: &str) -> CircadiaResult<()> {
        let finite = match self {
            Amplitude::Uniform(a) => a.is_finite(),
            Amplitude::PerInterval(amps) => amps.iter().all(|a| a.is_finite()),
        };
        if finite {
            Ok(())
        } else {
            Err(CircadiaError::Domain(format!("{what} contains NaN or Inf")))
        }
    }
}

/// Forcing-input (light or rest) schedule, tagged by generator name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input")]
pub enum ForcingSpec {
    /// 24 h repeating step schedule over half-open `[start, end)` hours.
    #[serde(rename = "input_daily")]
    Daily {
        hours: Vec<(f64, f64)>,
        amp: Amplitude,
    },

    /// Gaussian bump over the hour of day.
    #[serde(rename = "input_daily_smooth")]
    DailySmooth {
        #[serde(default = "default_center")]
        center: f64,
        #[serde(default = "default_amp")]
        amp: f64,
        #[serde(default = "default_width")]
        width: f64,
    },

    /// Finite multi-day schedule indexed by elapsed day `floor(t / 24)`.
    #[serde(rename = "input_variable")]
    Variable {
        hours: Vec<Vec<(f64, f64)>>,
        amp: Vec<Amplitude>,
    },
}

impl ForcingSpec {
    /// Daily step schedule with one amplitude for all intervals.
    pub fn daily(hours: Vec<(f64, f64)>, amp: f64) -> Self {
        ForcingSpec::Daily {
            hours,
            amp: Amplitude::Uniform(amp),
        }
    }

    /// Smooth daily profile with the default center, amplitude and width.
    pub fn daily_smooth() -> Self {
        ForcingSpec::DailySmooth {
            center: DEFAULT_SMOOTH_CENTER,
            amp: DEFAULT_SMOOTH_AMP,
            width: DEFAULT_SMOOTH_WIDTH,
        }
    }

    /// Generator name as it appears in configuration data.
    pub fn name(&self) -> &'static str {
        match self {
            ForcingSpec::Daily { .. } => "input_daily",
            ForcingSpec::DailySmooth { .. } => "input_daily_smooth",
            ForcingSpec::Variable { .. } => "input_variable",
        }
    }

    /// Validate schedule shape. Mismatched `hours`/`amp` lengths fail.
    pub fn validate(&self) -> CircadiaResult<()> {
        match self {
            ForcingSpec::Daily { hours, amp } => {
                check_intervals(hours, "hours")?;
                amp.check_finite("amp")?;
                amp.broadcast(hours.len()).map(|_| ())
            }
            ForcingSpec::DailySmooth {
                center,
                amp,
                width,
            } => {
                if !center.is_finite() || !amp.is_finite() {
                    return Err(CircadiaError::Domain(format!(
                        "smooth profile center/amp must be finite, got center={center}, amp={amp}"
                    )));
                }
                if !(width.is_finite() && *width > 0.0) {
                    return Err(CircadiaError::Domain(format!(
                        "smooth profile width must be > 0, got {width}"
                    )));
                }
                Ok(())
            }
            ForcingSpec::Variable { hours, amp } => {
                if hours.len() != amp.len() {
                    return Err(CircadiaError::Domain(format!(
                        "variable schedule has {} days of hours but {} days of amp",
                        hours.len(),
                        amp.len()
                    )));
                }
                for (day, (day_hours, day_amp)) in hours.iter().zip(amp).enumerate() {
                    check_intervals(day_hours, &format!("hours[{day}]"))?;
                    day_amp.check_finite(&format!("amp[{day}]"))?;
                    day_amp.broadcast(day_hours.len()).map_err(|e| match e {
                        CircadiaError::Domain(msg) => {
                            CircadiaError::Domain(format!("day {day}: {msg}"))
                        }
                        other => other,
                    })?;
                }
                Ok(())
            }
        }
    }
}

fn check_intervals(hours: &[(f64, f64)], what: &str) -> CircadiaResult<()> {
    for (i, &(start, end)) in hours.iter().enumerate() {
        if !start.is_finite() || !end.is_finite() {
            return Err(CircadiaError::Domain(format!(
                "{what}[{i}] = ({start}, {end}) is not finite"
            )));
        }
        if start >= end {
            log::warn!("{what}[{i}] = ({start}, {end}) is empty and never active");
        }
    }
    Ok(())
}

/// Restoring force pulling the period `T` toward `mu`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum RestoringForce {
    /// `-tanh(T - mu) / tau`.
    #[default]
    Tanh,
    /// `-tanh(T - mu) * exp(-(T - mu)² / (2σ²))`, the earlier model form.
    GaussianTanh { sigma: f64 },
}

/// Parameters of the clock (period) dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockParams {
    /// Target period (hours).
    pub mu: f64,
    /// Relaxation time constant (hours). Required by the `tanh` restoring
    /// form and by the energy model's waveform coupling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau: Option<f64>,
    /// Light coupling strength.
    pub alpha: f64,
    #[serde(default)]
    pub restoring: RestoringForce,
    pub light: ForcingSpec,
}

impl ClockParams {
    /// Canonical `tanh` clock parameters.
    pub fn new(mu: f64, tau: f64, alpha: f64, light: ForcingSpec) -> Self {
        Self {
            mu,
            tau: Some(tau),
            alpha,
            restoring: RestoringForce::Tanh,
            light,
        }
    }

    /// Relaxation time constant, or a config error when absent.
    pub fn tau(&self) -> CircadiaResult<f64> {
        self.tau.ok_or_else(|| CircadiaError::missing_key("tau"))
    }

    pub fn validate(&self) -> CircadiaResult<()> {
        if !self.mu.is_finite() {
            return Err(CircadiaError::Config(format!(
                "mu must be finite, got {}",
                self.mu
            )));
        }
        if !self.alpha.is_finite() {
            return Err(CircadiaError::Config(format!(
                "alpha must be finite, got {}",
                self.alpha
            )));
        }
        if let Some(tau) = self.tau {
            check_time_constant("tau", tau)?;
        }
        match self.restoring {
            RestoringForce::Tanh => {
                self.tau()?;
            }
            RestoringForce::GaussianTanh { sigma } => {
                if !(sigma > 0.0 && sigma.is_finite()) {
                    return Err(CircadiaError::Domain(format!(
                        "sigma must be finite and positive, got {sigma}"
                    )));
                }
            }
        }
        self.light.validate()
    }

    pub fn from_json(json: &str) -> CircadiaResult<Self> {
        let params: Self = parse_json(json)?;
        params.validate()?;
        Ok(params)
    }
}

/// Parameters of the sleep-pressure dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepParams {
    /// Buildup time constant (hours).
    #[serde(rename = "tau_S")]
    pub tau_s: f64,
    /// Relief time constant (hours).
    #[serde(rename = "tau_R")]
    pub tau_r: f64,
    /// Pressure ceiling.
    #[serde(rename = "S_max", default = "default_s_max")]
    pub s_max: f64,
    pub rest: ForcingSpec,
}

impl SleepParams {
    pub fn new(tau_s: f64, tau_r: f64, rest: ForcingSpec) -> Self {
        Self {
            tau_s,
            tau_r,
            s_max: DEFAULT_S_MAX,
            rest,
        }
    }

    pub fn validate(&self) -> CircadiaResult<()> {
        check_time_constant("tau_S", self.tau_s)?;
        check_time_constant("tau_R", self.tau_r)?;
        if !self.s_max.is_finite() {
            return Err(CircadiaError::Config(format!(
                "S_max must be finite, got {}",
                self.s_max
            )));
        }
        self.rest.validate()
    }

    pub fn from_json(json: &str) -> CircadiaResult<Self> {
        let params: Self = parse_json(json)?;
        params.validate()?;
        Ok(params)
    }
}

/// Parameters of the combined clock + sleep-pressure (energy) model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyParams {
    #[serde(rename = "C")]
    pub clock: ClockParams,
    #[serde(rename = "S")]
    pub sleep: SleepParams,
}

impl EnergyParams {
    pub fn validate(&self) -> CircadiaResult<()> {
        self.clock.validate()?;
        // The waveform coupling into dS/dt is scaled by the clock's tau.
        self.clock.tau()?;
        self.sleep.validate()
    }

    pub fn from_json(json: &str) -> CircadiaResult<Self> {
        let params: Self = parse_json(json)?;
        params.validate()?;
        Ok(params)
    }
}

/// A light schedule with an optional display title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub light: ForcingSpec,
}

/// A rest schedule with an optional display title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rest: ForcingSpec,
}

/// Clock parameters shared by every condition in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockBatch {
    pub mu: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau: Option<f64>,
    pub alpha: f64,
    #[serde(default)]
    pub restoring: RestoringForce,
    pub light_conditions: Vec<LightCondition>,
}

/// Sleep parameters shared by every condition in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepBatch {
    #[serde(rename = "tau_S")]
    pub tau_s: f64,
    #[serde(rename = "tau_R")]
    pub tau_r: f64,
    #[serde(rename = "S_max", default = "default_s_max")]
    pub s_max: f64,
    pub rest_conditions: Vec<RestCondition>,
}

/// Paired light/rest conditions run through the energy model.
///
/// Condition `i` pairs `light_conditions[i]` with `rest_conditions[i]`;
/// surplus entries on the longer list are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionBatch {
    #[serde(rename = "C")]
    pub clock: ClockBatch,
    #[serde(rename = "S")]
    pub sleep: SleepBatch,
}

impl ConditionBatch {
    /// Number of paired conditions.
    pub fn len(&self) -> usize {
        self.clock
            .light_conditions
            .len()
            .min(self.sleep.rest_conditions.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Title of condition `i`, e.g. `"Daylight - Night sleep"`.
    ///
    /// Untitled conditions fall back to `C{i+1}` / `S{i+1}`.
    pub fn title(&self, i: usize) -> String {
        let c_title = self
            .clock
            .light_conditions
            .get(i)
            .and_then(|c| c.title.clone())
            .unwrap_or_else(|| format!("C{}", i + 1));
        let s_title = self
            .sleep
            .rest_conditions
            .get(i)
            .and_then(|c| c.title.clone())
            .unwrap_or_else(|| format!("S{}", i + 1));
        format!("{c_title} - {s_title}")
    }

    /// Full energy parameters for condition `i`.
    pub fn energy_params(&self, i: usize) -> CircadiaResult<EnergyParams> {
        if i >= self.len() {
            return Err(CircadiaError::Config(format!(
                "condition index {i} out of range for {} paired conditions",
                self.len()
            )));
        }
        let clock = ClockParams {
            mu: self.clock.mu,
            tau: self.clock.tau,
            alpha: self.clock.alpha,
            restoring: self.clock.restoring,
            light: self.clock.light_conditions[i].light.clone(),
        };
        let sleep = SleepParams {
            tau_s: self.sleep.tau_s,
            tau_r: self.sleep.tau_r,
            s_max: self.sleep.s_max,
            rest: self.sleep.rest_conditions[i].rest.clone(),
        };
        Ok(EnergyParams { clock, sleep })
    }

    pub fn validate(&self) -> CircadiaResult<()> {
        for i in 0..self.len() {
            self.energy_params(i)?.validate()?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> CircadiaResult<Self> {
        let batch: Self = parse_json(json)?;
        batch.validate()?;
        Ok(batch)
    }
}

/// Time constants divide the rates, so they must be finite and positive.
fn check_time_constant(key: &str, value: f64) -> CircadiaResult<()> {
    if !value.is_finite() {
        return Err(CircadiaError::Config(format!(
            "{key} must be finite, got {value}"
        )));
    }
    if value <= 0.0 {
        return Err(CircadiaError::Domain(format!(
            "{key} must be positive, got {value}"
        )));
    }
    Ok(())
}

fn parse_json<T: DeserializeOwned>(json: &str) -> CircadiaResult<T> {
    serde_json::from_str(json).map_err(|e| CircadiaError::Config(format!("JSON parse error: {e}")))
}

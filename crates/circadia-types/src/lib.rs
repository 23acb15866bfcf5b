// ─────────────────────────────────────────────────────────────────────
// Circadia — Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Parameter configuration and error hierarchy for the Circadia
//! clock / sleep-pressure kernel.

pub mod config;
pub mod error;

pub use config::{
    Amplitude, ClockBatch, ClockParams, ConditionBatch, EnergyParams, ForcingSpec,
    LightCondition, RestCondition, RestoringForce, SleepBatch, SleepParams, DEFAULT_S_MAX,
};
pub use error::{CircadiaError, CircadiaResult};

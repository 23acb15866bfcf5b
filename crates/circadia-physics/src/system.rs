// ─────────────────────────────────────────────────────────────────────
// Circadia — ODE System Interface
// ─────────────────────────────────────────────────────────────────────
//! Right-hand side interface consumed by ODE integrators.

use circadia_types::{CircadiaError, CircadiaResult};

/// A system `dy/dt = f(t, y)` with a fixed number of state components.
///
/// Implementations are pure: they may be called any number of times, at
/// any `t` and with any trial state an integrator chooses, and identical
/// inputs always produce bit-identical outputs.
pub trait OdeSystem {
    /// Number of state components.
    fn dim(&self) -> usize;

    /// Component names in state order.
    fn labels(&self) -> &'static [&'static str];

    /// Write `f(t, y)` into `dydt`.
    fn derivative(&self, t: f64, y: &[f64], dydt: &mut [f64]) -> CircadiaResult<()>;

    /// Allocating form of [`OdeSystem::derivative`].
    fn evaluate(&self, t: f64, y: &[f64]) -> CircadiaResult<Vec<f64>> {
        let mut dydt = vec![0.0; self.dim()];
        self.derivative(t, y, &mut dydt)?;
        Ok(dydt)
    }
}

/// Check that both the state and the output buffer have `expected` components.
pub(crate) fn check_dims(y: &[f64], dydt: &[f64], expected: usize) -> CircadiaResult<()> {
    if y.len() != expected {
        return Err(CircadiaError::Dimension {
            expected,
            got: y.len(),
        });
    }
    if dydt.len() != expected {
        return Err(CircadiaError::Dimension {
            expected,
            got: dydt.len(),
        });
    }
    Ok(())
}

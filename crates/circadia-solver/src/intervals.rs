// ─────────────────────────────────────────────────────────────────────
// Circadia — Interval Extraction
// ─────────────────────────────────────────────────────────────────────

use circadia_types::{CircadiaError, CircadiaResult};

/// Contiguous runs of `true` in `mask`, as `(start, end)` times.
///
/// A run starts at the time of its first `true` sample and ends at the
/// time of the first `false` sample after it, or at the last sample if
/// the run reaches the end of the sequence.
pub fn get_intervals(t: &[f64], mask: &[bool]) -> CircadiaResult<Vec<(f64, f64)>> {
    if t.len() != mask.len() {
        return Err(CircadiaError::Dimension {
            expected: t.len(),
            got: mask.len(),
        });
    }
    let mut intervals = Vec::new();
    let mut start: Option<f64> = None;
    for (&ti, &on) in t.iter().zip(mask) {
        match (on, start) {
            (true, None) => start = Some(ti),
            (false, Some(s)) => {
                intervals.push((s, ti));
                start = None;
            }
            _ => {}
        }
    }
    if let (Some(s), Some(&last)) = (start, t.last()) {
        intervals.push((s, last));
    }
    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_extracted() {
        let t = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let mask = [false, true, true, false, true, true];
        let iv = get_intervals(&t, &mask).unwrap();
        assert_eq!(iv, vec![(1.0, 3.0), (4.0, 5.0)]);
    }

    #[test]
    fn test_all_false_empty() {
        let iv = get_intervals(&[0.0, 1.0], &[false, false]).unwrap();
        assert!(iv.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(get_intervals(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(get_intervals(&[0.0, 1.0], &[true]).is_err());
    }
}

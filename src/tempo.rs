//! Tempo compatibility
//!
//! Linear-decay BPM scoring between two consecutive tracks.

/// Score how well two tempos mix, in `[0, 1]`.
///
/// The score is `1.0` for identical tempos and decays linearly to `0.0` at a
/// difference of exactly `tolerance`; anything further apart scores `0.0`.
/// With `tolerance == 0` only identical tempos score, at `1.0`.
/// Non-finite or non-positive BPM values score `0.0`.
pub fn tempo_score(bpm1: f64, bpm2: f64, tolerance: u32) -> f64 {
    if !is_valid_bpm(bpm1) || !is_valid_bpm(bpm2) {
        return 0.0;
    }

    let diff = (bpm1 - bpm2).abs();
    let tolerance = f64::from(tolerance);
    if diff > tolerance {
        return 0.0;
    }
    if tolerance == 0.0 {
        // diff is 0 here
        return 1.0;
    }
    1.0 - diff / tolerance
}

/// True when `candidate` is close enough to `previous` to be considered at all.
pub fn within_tolerance(previous: f64, candidate: f64, tolerance: u32) -> bool {
    is_valid_bpm(previous)
        && is_valid_bpm(candidate)
        && (previous - candidate).abs() <= f64::from(tolerance)
}

#[inline]
fn is_valid_bpm(bpm: f64) -> bool {
    bpm.is_finite() && bpm > 0.0
}

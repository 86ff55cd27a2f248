//! Vibe
//!
//! A run-scoped energy value per track, blending the track's tempo relative
//! to the rest of the library with the brightness of its key mode. Vibe
//! depends on the weights of a run, so it is never stored on the track.

use crate::camelot::Mode;
use crate::library::Library;

/// Key factor for major keys.
pub const MAJOR_KEY_FACTOR: f64 = 1.0;

/// Key factor for minor keys.
pub const MINOR_KEY_FACTOR: f64 = 0.85;

/// Normalized bpm used for every track when the library has a single tempo.
pub const FLAT_BPM_NORM: f64 = 0.5;

/// Weights a vibe annotation was computed with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VibeWeights {
    /// Weight on normalized bpm.
    pub bpm: f64,
    /// Weight on key factor.
    pub key: f64,
}

/// Brightness factor for a key mode.
pub const fn key_factor(mode: Mode) -> f64 {
    match mode {
        Mode::Major => MAJOR_KEY_FACTOR,
        Mode::Minor => MINOR_KEY_FACTOR,
    }
}

/// Position of `bpm` within `[min, max]`, in `[0, 1]` for in-range values.
///
/// A degenerate range (`max == min`) maps to [`FLAT_BPM_NORM`].
pub fn normalize_bpm(bpm: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        return FLAT_BPM_NORM;
    }
    (bpm - min) / span
}

/// Weighted blend of normalized bpm and key factor.
pub fn vibe(bpm_norm: f64, mode: Mode, weights: VibeWeights) -> f64 {
    weights.bpm * bpm_norm + weights.key * key_factor(mode)
}

/// Vibe values for one library under one set of weights.
#[derive(Debug, Clone, PartialEq)]
pub struct VibeAnnotation {
    weights: VibeWeights,
    values: Vec<f64>,
}

impl VibeAnnotation {
    /// Annotate every track in `library`.
    pub fn compute(library: &Library, weights: VibeWeights) -> Self {
        let values = match library.bpm_range() {
            Some((min, max)) => library
                .iter()
                .map(|t| vibe(normalize_bpm(t.bpm, min, max), t.key.mode(), weights))
                .collect(),
            None => Vec::new(),
        };
        VibeAnnotation { weights, values }
    }

    /// Weights this annotation belongs to.
    pub fn weights(&self) -> VibeWeights {
        self.weights
    }

    /// Vibe of the track at library index `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// All values, in library order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

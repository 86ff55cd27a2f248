//! Set sequencer
//!
//! Greedy, non-backtracking construction of a set. The opening track is
//! chosen from the first energy segment; every following track is the
//! best-scoring tempo-compatible candidate left in the pool, where the score
//! blends tempo, key and fit to the energy curve at that position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::energy::{energy_bonus, CurveError, CurvePlan, EnergyCurve};
use crate::harmony::{
    analyze_transition, TransitionAnalysis, TransitionLabel, OPENING_EFFECT, OPENING_ICON,
};
use crate::library::{Library, Track};
use crate::tempo::{tempo_score, within_tolerance};
use crate::vibe::{VibeAnnotation, VibeWeights};

/// Default number of tracks in a set.
pub const DEFAULT_TARGET_LENGTH: usize = 20;

/// Default maximum bpm difference between consecutive tracks.
pub const DEFAULT_BPM_TOLERANCE: u32 = 8;

/// Default weight on tempo; key gets the rest.
pub const DEFAULT_BPM_WEIGHT: f64 = 0.6;

/// Errors in a generation config. Nothing is generated when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Requested set length was zero.
    #[error("target length must be at least 1")]
    ZeroTargetLength,

    /// Bpm weight outside `[0, 1]`.
    #[error("bpm weight must be within [0, 1], got {0}")]
    BpmWeightOutOfRange(f64),

    /// Energy curve could not be used for this set length.
    #[error(transparent)]
    Curve(#[from] CurveError),
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of tracks wanted.
    pub target_length: usize,
    /// Shape of the set.
    pub energy_curve: EnergyCurve,
    /// Title of the track to open with, if any.
    pub start_title: Option<String>,
    /// Maximum bpm difference between consecutive tracks.
    pub bpm_tolerance: u32,
    /// Weight on tempo in `[0, 1]`; key weight is `1 - bpm_weight`.
    pub bpm_weight: f64,
}

impl GenerationConfig {
    /// Return a builder starting from the defaults.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::new()
    }

    /// Weight on key compatibility.
    pub fn key_weight(&self) -> f64 {
        1.0 - self.bpm_weight
    }

    /// Weights used for vibe and scoring.
    pub fn weights(&self) -> VibeWeights {
        VibeWeights {
            bpm: self.bpm_weight,
            key: self.key_weight(),
        }
    }

    /// Check the config and lay out its energy curve.
    ///
    /// Returns:
    /// - `Err(ZeroTargetLength)` if `target_length == 0`.
    /// - `Err(BpmWeightOutOfRange)` if `bpm_weight` is not within `[0, 1]`.
    /// - `Err(Curve)` if the curve has more segments than the set has tracks.
    pub fn validate(&self) -> Result<CurvePlan<'_>, ConfigError> {
        if self.target_length == 0 {
            return Err(ConfigError::ZeroTargetLength);
        }
        if !(0.0..=1.0).contains(&self.bpm_weight) {
            return Err(ConfigError::BpmWeightOutOfRange(self.bpm_weight));
        }
        Ok(self.energy_curve.plan(self.target_length)?)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            target_length: DEFAULT_TARGET_LENGTH,
            energy_curve: EnergyCurve::default(),
            start_title: None,
            bpm_tolerance: DEFAULT_BPM_TOLERANCE,
            bpm_weight: DEFAULT_BPM_WEIGHT,
        }
    }
}

/// Builder for `GenerationConfig`
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    /// Start with defaults:
    /// target_length = 20, energy_curve = "up-down-mid-up",
    /// bpm_tolerance = 8, bpm_weight = 0.6.
    pub fn new() -> Self {
        GenerationConfigBuilder {
            config: GenerationConfig::default(),
        }
    }

    /// Set the number of tracks wanted.
    pub fn target_length(mut self, length: usize) -> Self {
        self.config.target_length = length;
        self
    }

    /// Set the energy curve.
    pub fn energy_curve(mut self, curve: EnergyCurve) -> Self {
        self.config.energy_curve = curve;
        self
    }

    /// Open the set with the track titled `title`.
    pub fn start_title(mut self, title: impl Into<String>) -> Self {
        self.config.start_title = Some(title.into());
        self
    }

    /// Set the maximum bpm difference between consecutive tracks.
    pub fn bpm_tolerance(mut self, tolerance: u32) -> Self {
        self.config.bpm_tolerance = tolerance;
        self
    }

    /// Set the tempo weight (0.0..=1.0); key weight follows.
    pub fn bpm_weight(mut self, weight: f64) -> Self {
        self.config.bpm_weight = weight;
        self
    }

    /// Validate and create the `GenerationConfig`.
    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for GenerationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One placed track with the transition that led into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetEntry {
    /// The track, copied from the library.
    #[serde(flatten)]
    pub track: Track,
    /// Vibe of the track in this run.
    pub vibe: f64,
    /// Transition name.
    pub transition_label: TransitionLabel,
    /// Transition effect description.
    pub transition_effect: &'static str,
    /// Transition glyph.
    pub transition_icon: &'static str,
    /// Combined selection score; `1.0` for the opener.
    pub transition_score: f64,
}

/// How a run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOutcome {
    /// Reached the target length.
    Complete,
    /// Ran out of tempo-compatible candidates first.
    Exhausted,
}

/// Ordered result of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedSet {
    entries: Vec<SetEntry>,
    target_length: usize,
    outcome: SetOutcome,
}

impl GeneratedSet {
    /// Entries in play order.
    pub fn entries(&self) -> &[SetEntry] {
        &self.entries
    }

    /// Number of placed tracks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requested length.
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// How the run ended.
    pub fn outcome(&self) -> SetOutcome {
        self.outcome
    }

    /// True when the set reached its target length.
    pub fn is_complete(&self) -> bool {
        self.outcome == SetOutcome::Complete
    }

    /// Titles in play order.
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.track.title.as_str())
    }

    /// `(position, vibe)` points with 1-based positions, ready for charting.
    pub fn vibe_curve(&self) -> Vec<(usize, f64)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i + 1, e.vibe))
            .collect()
    }

    /// Consume the set, yielding its entries.
    pub fn into_entries(self) -> Vec<SetEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a GeneratedSet {
    type Item = &'a SetEntry;
    type IntoIter = std::slice::Iter<'a, SetEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Best candidate seen so far in one extension step
struct Pick {
    pool_slot: usize,
    score: f64,
    analysis: TransitionAnalysis,
}

/// Build a set from `library` following `config`.
///
/// The library is never modified. A set shorter than the target is a normal
/// outcome ([`SetOutcome::Exhausted`]); only an invalid config is an error.
pub fn generate(library: &Library, config: &GenerationConfig) -> Result<GeneratedSet, ConfigError> {
    let plan = config.validate()?;
    let weights = config.weights();

    log::info!(
        "generating set: {} tracks, curve `{}`, bpm tolerance {}, weights bpm {:.2} / key {:.2}",
        config.target_length,
        config.energy_curve,
        config.bpm_tolerance,
        weights.bpm,
        weights.key
    );

    let vibes = VibeAnnotation::compute(library, weights);
    let mut entries = Vec::with_capacity(config.target_length.min(library.len()));

    let Some(opener) = select_opener(library, &vibes, config, &plan) else {
        log::warn!("library is empty, nothing to sequence");
        return Ok(GeneratedSet {
            entries,
            target_length: config.target_length,
            outcome: SetOutcome::Exhausted,
        });
    };

    // Remaining library indices, kept in library order for tie-breaks
    let mut pool: Vec<usize> = (0..library.len()).filter(|&i| i != opener).collect();
    let mut previous = opener;
    entries.push(SetEntry {
        track: library.tracks()[opener].clone(),
        vibe: vibes.values()[opener],
        transition_label: TransitionLabel::Opening,
        transition_effect: OPENING_EFFECT,
        transition_icon: OPENING_ICON,
        transition_score: 1.0,
    });
    log::debug!("opening with `{}`", library.tracks()[opener].title);

    let mut outcome = SetOutcome::Complete;
    while entries.len() < config.target_length {
        let position = entries.len();
        let segment = plan.segment_at(position);
        let prev = &library.tracks()[previous];

        let mut best: Option<Pick> = None;
        for (pool_slot, &candidate) in pool.iter().enumerate() {
            let track = &library.tracks()[candidate];
            if !within_tolerance(prev.bpm, track.bpm, config.bpm_tolerance) {
                continue;
            }
            let analysis = analyze_transition(prev.key, track.key);
            let score = weights.bpm * tempo_score(prev.bpm, track.bpm, config.bpm_tolerance)
                + weights.key * analysis.key_score
                + energy_bonus(vibes.values()[candidate], segment);

            // first-seen wins ties
            let better = match &best {
                Some(b) => score > b.score,
                None => true,
            };
            if better {
                best = Some(Pick {
                    pool_slot,
                    score,
                    analysis,
                });
            }
        }

        let Some(pick) = best else {
            log::warn!(
                "no tempo-compatible track after `{}`, stopping at {} of {}",
                prev.title,
                entries.len(),
                config.target_length
            );
            outcome = SetOutcome::Exhausted;
            break;
        };

        let chosen = pool.remove(pick.pool_slot);
        let track = &library.tracks()[chosen];
        let analysis = pick.analysis;
        log::debug!(
            "position {position} ({segment}): `{}` -> `{}` {} score {:.3}",
            prev.title,
            track.title,
            analysis.label,
            pick.score
        );

        entries.push(SetEntry {
            track: track.clone(),
            vibe: vibes.values()[chosen],
            transition_label: analysis.label,
            transition_effect: analysis.effect,
            transition_icon: analysis.icon,
            transition_score: pick.score,
        });
        previous = chosen;
    }

    log::info!(
        "generated {} of {} tracks ({:?})",
        entries.len(),
        config.target_length,
        outcome
    );

    Ok(GeneratedSet {
        entries,
        target_length: config.target_length,
        outcome,
    })
}

/// Library index of the opening track, `None` for an empty library.
fn select_opener(
    library: &Library,
    vibes: &VibeAnnotation,
    config: &GenerationConfig,
    plan: &CurvePlan<'_>,
) -> Option<usize> {
    if library.is_empty() {
        return None;
    }

    if let Some(title) = config.start_title.as_deref() {
        match library.position(title) {
            Some(index) => return Some(index),
            None => log::warn!("start track `{title}` not in library, choosing automatically"),
        }
    }

    let segment = plan.segment_at(0);
    let range = segment.target_range();
    let lowest_in_range = lowest_vibe(
        vibes
            .values()
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, v)| range.contains(v)),
    );

    lowest_in_range.or_else(|| {
        log::warn!("no track in the `{segment}` vibe range, opening with the lowest vibe overall");
        lowest_vibe(vibes.values().iter().copied().enumerate())
    })
}

/// Index with the smallest vibe; earliest index wins ties.
fn lowest_vibe(values: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    values
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

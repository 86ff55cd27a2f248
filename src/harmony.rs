//! Key compatibility
//!
//! Pairwise harmonic scoring and labeling of a transition between two
//! Camelot keys. A transition is described by its *jump* (clockwise steps
//! around the wheel, `0..=11`) and whether it *flips* mode.

use std::fmt::Display;

use serde::{Serialize, Serializer};

use crate::camelot::{CamelotKey, WHEEL_POSITIONS};

/// Glyph for any mode-flipping transition that also moves around the wheel.
pub const CREATIVE_ICON: &str = "🎨";

/// Glyph for a same-position mode flip.
pub const MOOD_SWAP_ICON: &str = "🎭";

/// Glyph for the first track of a set.
pub const OPENING_ICON: &str = "🎉";

/// Glyph for a transition whose keys could not be read.
pub const INVALID_ICON: &str = "⚠️";

/// Effect text for the first track of a set.
pub const OPENING_EFFECT: &str = "Set Start";

/// Effect text for a transition whose keys could not be read.
pub const INVALID_EFFECT: &str = "Unknown";

/// Fixed description of what a given jump does to the room.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HarmonicEffect {
    /// Short human description.
    pub description: &'static str,
    /// Display glyph.
    pub icon: &'static str,
}

const fn effect(description: &'static str, icon: &'static str) -> HarmonicEffect {
    HarmonicEffect { description, icon }
}

/// Effects indexed by jump
const JUMP_EFFECTS: [HarmonicEffect; WHEEL_POSITIONS as usize] = [
    effect("Perfect Harmony", "🎯"),
    effect("Smooth Energy Lift", "🔼"),
    effect("Big Energy Lift", "🚀"),
    effect("Energetic, Emotional Rise", "🌌"),
    effect("Harmonic Surprise", "🎷"),
    effect("Sharp Dissonance", "😬"),
    effect("Super Boost", "💥"),
    effect("Classic Dissonance", "🦈"),
    effect("Dramatic, Serious Atmosphere", "🌙"),
    effect("Deep Energy Drop", "⚓️"),
    effect("Controlled Energy Drop", "🪂"),
    effect("Gentle Energy Reduction", "🔽"),
];

/// Look up the base effect for a jump; `None` past `11`.
pub fn jump_effect(jump: u8) -> Option<&'static HarmonicEffect> {
    JUMP_EFFECTS.get(jump as usize)
}

/// Name of a transition as shown to the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransitionLabel {
    /// First track of a set.
    Opening,
    /// Same key.
    PerfectVibe,
    /// Same wheel position, mode flipped.
    VibeChange,
    /// Move around the wheel.
    Vibe {
        /// Signed steps: `+1..=+6` clockwise, `-5..=-1` counter-clockwise.
        step: i8,
        /// Mode flipped along the way.
        creative: bool,
    },
    /// One of the keys could not be parsed.
    InvalidKey,
}

impl Display for TransitionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionLabel::Opening => f.write_str("Opening"),
            TransitionLabel::PerfectVibe => f.write_str("Perfect Vibe"),
            TransitionLabel::VibeChange => f.write_str("Vibe Change"),
            TransitionLabel::Vibe { step, creative } => {
                if *creative {
                    f.write_str("Creative ")?;
                }
                write!(f, "Vibe{step:+}")
            }
            TransitionLabel::InvalidKey => f.write_str("Invalid Key"),
        }
    }
}

impl Serialize for TransitionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of analysing one key-to-key transition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransitionAnalysis {
    /// False only when a key failed to parse.
    pub compatible: bool,
    /// Clockwise distance, `0..=11`.
    pub jump: u8,
    /// Mode changed.
    pub flip: bool,
    /// Harmonic score in `[0, 1]`.
    pub key_score: f64,
    /// Display name.
    pub label: TransitionLabel,
    /// Display glyph.
    pub icon: &'static str,
    /// Short description of the effect.
    pub effect: &'static str,
}

impl TransitionAnalysis {
    /// The degraded result for unreadable keys.
    pub fn invalid() -> Self {
        TransitionAnalysis {
            compatible: false,
            jump: 0,
            flip: false,
            key_score: 0.0,
            label: TransitionLabel::InvalidKey,
            icon: INVALID_ICON,
            effect: INVALID_EFFECT,
        }
    }
}

/// Clockwise distance from `from` to `to`, `0..=11`.
pub fn jump(from: CamelotKey, to: CamelotKey) -> u8 {
    (to.position() + WHEEL_POSITIONS - from.position()) % WHEEL_POSITIONS
}

/// Harmonic score for a jump/flip pair, in `[0, 1]`.
///
/// The wheel distance is penalized super-linearly (`d^1.5 * 0.05`); a mode
/// flip costs `0.05` when moving around the wheel and `0.02` in place.
pub fn key_score(jump: u8, flip: bool) -> f64 {
    let jump = jump % WHEEL_POSITIONS;
    let distance = jump.min(WHEEL_POSITIONS - jump);
    let jump_penalty = f64::from(distance).powf(1.5) * 0.05;
    let flip_penalty = match (flip, jump) {
        (false, _) => 0.0,
        (true, 0) => 0.02,
        (true, _) => 0.05,
    };
    (1.0 - (jump_penalty + flip_penalty)).max(0.0)
}

/// Analyse the transition from `from` to `to`.
pub fn analyze_transition(from: CamelotKey, to: CamelotKey) -> TransitionAnalysis {
    let jump = jump(from, to);
    let flip = from.mode() != to.mode();
    let base = &JUMP_EFFECTS[jump as usize];

    let (label, icon) = match (jump, flip) {
        (0, false) => (TransitionLabel::PerfectVibe, base.icon),
        (0, true) => (TransitionLabel::VibeChange, MOOD_SWAP_ICON),
        (j, creative) => {
            let step = if j <= 6 { j as i8 } else { j as i8 - WHEEL_POSITIONS as i8 };
            let icon = if creative { CREATIVE_ICON } else { base.icon };
            (TransitionLabel::Vibe { step, creative }, icon)
        }
    };

    TransitionAnalysis {
        compatible: true,
        jump,
        flip,
        key_score: key_score(jump, flip),
        label,
        icon,
        effect: base.description,
    }
}

/// Analyse a transition between two raw key strings.
///
/// Unreadable keys degrade to [`TransitionAnalysis::invalid`] rather than failing.
pub fn analyze_key_strings(from: &str, to: &str) -> TransitionAnalysis {
    match (from.parse::<CamelotKey>(), to.parse::<CamelotKey>()) {
        (Ok(from), Ok(to)) => analyze_transition(from, to),
        (from, to) => {
            if let Err(e) = from.and(to) {
                log::debug!("treating transition as invalid: {e}");
            }
            TransitionAnalysis::invalid()
        }
    }
}

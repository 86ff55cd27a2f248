//! Energy curve
//!
//! The user describes the shape of a set as a dash-separated list of
//! segments, e.g. `"up-down-mid-up"`. Each set position is mapped onto one
//! segment, and each segment asks for a range of vibe values.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bonus for a candidate whose vibe sits inside the target range.
pub const IN_RANGE_BONUS: f64 = 0.20;

/// Floor for the out-of-range penalty.
pub const MAX_PENALTY: f64 = -0.5;

const SEPARATOR: char = '-';

/// Inclusive range of vibe values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VibeRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl VibeRange {
    const fn new(min: f64, max: f64) -> Self {
        VibeRange { min, max }
    }

    /// True when `vibe` lies within the range, both ends inclusive.
    pub fn contains(&self, vibe: f64) -> bool {
        self.min <= vibe && vibe <= self.max
    }

    /// How far `vibe` lies outside the range; `0.0` inside.
    pub fn distance(&self, vibe: f64) -> f64 {
        if vibe < self.min {
            self.min - vibe
        } else if vibe > self.max {
            vibe - self.max
        } else {
            0.0
        }
    }
}

/// One energy level of a curve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Low energy, vibe `0.0..=0.4`.
    Down,
    /// Medium energy, vibe `0.4..=0.7`.
    Mid,
    /// High energy, vibe `0.7..=1.0`.
    Up,
    /// Unrecognized label; its range is `0.0..=1.0`, so any vibe scores the in-range bonus.
    Other(String),
}

impl Segment {
    /// Target vibe range for this segment.
    pub fn target_range(&self) -> VibeRange {
        match self {
            Segment::Down => VibeRange::new(0.0, 0.4),
            Segment::Mid => VibeRange::new(0.4, 0.7),
            Segment::Up => VibeRange::new(0.7, 1.0),
            Segment::Other(_) => VibeRange::new(0.0, 1.0),
        }
    }

    fn from_label(label: &str) -> Segment {
        match label.to_ascii_lowercase().as_str() {
            "down" => Segment::Down,
            "mid" => Segment::Mid,
            "up" => Segment::Up,
            _ => Segment::Other(label.to_string()),
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Down => f.write_str("down"),
            Segment::Mid => f.write_str("mid"),
            Segment::Up => f.write_str("up"),
            Segment::Other(label) => f.write_str(label),
        }
    }
}

/// Bonus (or penalty) for placing a track of `vibe` in `segment`.
///
/// Inside the range scores [`IN_RANGE_BONUS`]; outside it the penalty equals
/// the distance to the range, floored at [`MAX_PENALTY`]. Result lies in
/// `[-0.5, 0.2]`.
pub fn energy_bonus(vibe: f64, segment: &Segment) -> f64 {
    let range = segment.target_range();
    if range.contains(vibe) {
        return IN_RANGE_BONUS;
    }
    (-range.distance(vibe)).max(MAX_PENALTY)
}

/// Errors when building or planning an energy curve
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// No segments at all.
    #[error("energy curve is empty")]
    Empty,

    /// A segment label was blank, e.g. `"up--down"`.
    #[error("energy curve segment {index} is empty")]
    EmptySegment {
        /// Zero-based index of the blank label.
        index: usize,
    },

    /// Fewer set positions than segments.
    #[error("energy curve has {segments} segments but the set only has {target_length} tracks")]
    TooManySegments {
        /// Number of segments in the curve.
        segments: usize,
        /// Requested set length.
        target_length: usize,
    },
}

/// Ordered, non-empty list of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnergyCurve {
    segments: Vec<Segment>,
}

impl EnergyCurve {
    /// Wrap `segments`, rejecting an empty list.
    pub fn new(segments: Vec<Segment>) -> Result<Self, CurveError> {
        if segments.is_empty() {
            return Err(CurveError::Empty);
        }
        Ok(EnergyCurve { segments })
    }

    /// Segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the curve has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First segment; the one the opening track is chosen for.
    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Lay the curve out over a set of `target_length` tracks.
    pub fn plan(&self, target_length: usize) -> Result<CurvePlan<'_>, CurveError> {
        if self.segments.is_empty() {
            return Err(CurveError::Empty);
        }
        let segment_size = target_length / self.segments.len();
        if segment_size == 0 {
            return Err(CurveError::TooManySegments {
                segments: self.segments.len(),
                target_length,
            });
        }
        Ok(CurvePlan {
            curve: self,
            segment_size,
        })
    }
}

impl Default for EnergyCurve {
    fn default() -> Self {
        EnergyCurve {
            segments: vec![Segment::Up, Segment::Down, Segment::Mid, Segment::Up],
        }
    }
}

impl FromStr for EnergyCurve {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(CurveError::Empty);
        }

        let segments = s
            .split(SEPARATOR)
            .map(str::trim)
            .enumerate()
            .map(|(index, label)| {
                if label.is_empty() {
                    return Err(CurveError::EmptySegment { index });
                }
                let segment = Segment::from_label(label);
                if let Segment::Other(label) = &segment {
                    log::warn!("unknown energy segment `{label}`, accepting any vibe there");
                }
                Ok(segment)
            })
            .collect::<Result<Vec<_>, _>>()?;

        EnergyCurve::new(segments)
    }
}

impl TryFrom<String> for EnergyCurve {
    type Error = CurveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EnergyCurve> for String {
    fn from(curve: EnergyCurve) -> Self {
        curve.to_string()
    }
}

impl Display for EnergyCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// An energy curve laid out over a fixed set length.
#[derive(Debug, Clone, Copy)]
pub struct CurvePlan<'a> {
    curve: &'a EnergyCurve,
    segment_size: usize,
}

impl<'a> CurvePlan<'a> {
    /// Positions per segment; the last segment also takes the remainder.
    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Index of the segment covering zero-based set `position`.
    pub fn segment_index(&self, position: usize) -> usize {
        (position / self.segment_size).min(self.curve.segments.len() - 1)
    }

    /// Segment covering zero-based set `position`.
    pub fn segment_at(&self, position: usize) -> &'a Segment {
        &self.curve.segments[self.segment_index(position)]
    }
}

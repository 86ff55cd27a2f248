//! Track library
//!
//! An ingestion-ordered, read-only collection of tracks. Titles are the
//! user-facing identity; inside the engine tracks are addressed by their
//! index in ingestion order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camelot::CamelotKey;

/// A single track as delivered by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Title, unique within a library.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Camelot key.
    pub key: CamelotKey,
}

impl Track {
    /// Convenience constructor.
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        bpm: f64,
        key: CamelotKey,
    ) -> Self {
        Track {
            title: title.into(),
            artist: artist.into(),
            bpm,
            key,
        }
    }
}

/// Errors when assembling a library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    /// Two tracks share a title.
    #[error("duplicate track title `{0}`")]
    DuplicateTitle(String),

    /// BPM was zero, negative or not finite.
    #[error("track `{title}` has invalid bpm {bpm}")]
    InvalidBpm {
        /// Title of the offending track.
        title: String,
        /// The rejected value.
        bpm: f64,
    },
}

/// Ordered, validated set of tracks.
///
/// Library order is the tie-break order used throughout set generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Library {
    tracks: Vec<Track>,
}

impl Library {
    /// Validate and wrap `tracks`, keeping their order.
    ///
    /// Returns:
    /// - `Err(DuplicateTitle)` if a title appears twice.
    /// - `Err(InvalidBpm)` if a bpm is not a positive finite number.
    pub fn new(tracks: Vec<Track>) -> Result<Self, LibraryError> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !(track.bpm.is_finite() && track.bpm > 0.0) {
                return Err(LibraryError::InvalidBpm {
                    title: track.title.clone(),
                    bpm: track.bpm,
                });
            }
            if !seen.insert(track.title.as_str()) {
                return Err(LibraryError::DuplicateTitle(track.title.clone()));
            }
        }
        Ok(Library { tracks })
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// True when the library holds no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index` in library order.
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Index of the track titled `title`.
    pub fn position(&self, title: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.title == title)
    }

    /// Tracks in library order.
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Tracks as a slice.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// `(min, max)` bpm over the whole library, `None` when empty.
    pub fn bpm_range(&self) -> Option<(f64, f64)> {
        let mut bpms = self.tracks.iter().map(|t| t.bpm);
        let first = bpms.next()?;
        Some(bpms.fold((first, first), |(lo, hi), b| (lo.min(b), hi.max(b))))
    }
}

impl TryFrom<Vec<Track>> for Library {
    type Error = LibraryError;

    fn try_from(tracks: Vec<Track>) -> Result<Self, Self::Error> {
        Library::new(tracks)
    }
}

impl<'a> IntoIterator for &'a Library {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! # harmonic_set
//!
//! Build DJ sets where neighbouring tracks mix well in tempo and key while the
//! set as a whole follows an energy curve.
//!
//! ## Example
//! ```rust
//! use harmonic_set::{generate, GenerationConfig, Library, Track};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) A validated library, in ingestion order
//!     let library = Library::new(vec![
//!         Track::new("Opener", "Artist A", 120.0, "8A".parse()?),
//!         Track::new("Lift", "Artist B", 122.0, "9A".parse()?),
//!         Track::new("Peak", "Artist C", 124.0, "9B".parse()?),
//!     ])?;
//!
//!     // 2) Describe the set
//!     let config = GenerationConfig::builder()
//!         .target_length(3)
//!         .energy_curve("mid-up".parse()?)
//!         .bpm_tolerance(6)
//!         .bpm_weight(0.6)
//!         .build()?;
//!
//!     // 3) Generate and read it back
//!     let set = generate(&library, &config)?;
//!     for entry in &set {
//!         println!(
//!             "{} ({} {}) {} {} {:.3}",
//!             entry.track.title,
//!             entry.track.bpm,
//!             entry.track.key,
//!             entry.transition_icon,
//!             entry.transition_label,
//!             entry.transition_score
//!         );
//!     }
//!     if !set.is_complete() {
//!         println!("only {} of {} tracks fit", set.len(), set.target_length());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Scoring
//! - tempo: linear decay up to the bpm tolerance
//! - key: distance around the Camelot wheel plus a mode-flip penalty
//! - energy: bonus for landing in the current segment's vibe range, penalty otherwise

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Camelot key types.
pub use camelot::{CamelotKey, KeyParseError, Mode};

/// Energy curve planning.
pub use energy::{energy_bonus, CurveError, CurvePlan, EnergyCurve, Segment, VibeRange};

/// Key compatibility analysis.
pub use harmony::{analyze_key_strings, analyze_transition, TransitionAnalysis, TransitionLabel};

/// Track library.
pub use library::{Library, LibraryError, Track};

/// Set generation.
pub use sequencer::{
    generate, ConfigError, GeneratedSet, GenerationConfig, GenerationConfigBuilder, SetEntry,
    SetOutcome,
};

/// Tempo compatibility scoring.
pub use tempo::tempo_score;

/// Per-run vibe values.
pub use vibe::{VibeAnnotation, VibeWeights};

/// Camelot wheel notation.
pub mod camelot;

/// Energy curve segments and bonuses.
pub mod energy;

/// Key transition scoring and labeling.
pub mod harmony;

/// Validated track collections.
pub mod library;

/// Greedy set construction.
pub mod sequencer;

/// Tempo scoring.
pub mod tempo;

/// Vibe calculation.
pub mod vibe;

//! Camelot keys
//!
//! The Camelot wheel places the 24 major/minor keys on 12 positions; each
//! position has a minor (`A`) and a major (`B`) variant. Keys are written as
//! `"<1-12><A|B>"`, e.g. `"8A"` for A minor.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of positions on the Camelot wheel.
pub const WHEEL_POSITIONS: u8 = 12;

/// Key mode, encoded by the trailing letter of a Camelot key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Minor key (`A`).
    Minor,
    /// Major key (`B`).
    Major,
}

impl Mode {
    /// The Camelot letter for this mode.
    pub const fn letter(self) -> char {
        match self {
            Mode::Minor => 'A',
            Mode::Major => 'B',
        }
    }

    const fn from_letter(letter: char) -> Option<Mode> {
        match letter {
            'A' => Some(Mode::Minor),
            'B' => Some(Mode::Major),
            _ => None,
        }
    }
}

/// Errors when parsing a Camelot key string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// Input too short to hold a position and a letter.
    #[error("camelot key `{0}` is too short")]
    TooShort(String),

    /// Wheel position was not a number in `1..=12`.
    #[error("camelot key `{input}` has invalid wheel position `{position}`")]
    InvalidPosition {
        /// The full input string.
        input: String,
        /// The offending position text.
        position: String,
    },

    /// Trailing letter was neither `A` nor `B`.
    #[error("camelot key `{input}` has invalid mode letter `{letter}`")]
    InvalidMode {
        /// The full input string.
        input: String,
        /// The offending letter.
        letter: char,
    },
}

/// A key on the Camelot wheel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CamelotKey {
    position: u8,
    mode: Mode,
}

impl CamelotKey {
    /// Create a key, returning `None` if `position` is outside `1..=12`.
    pub fn new(position: u8, mode: Mode) -> Option<Self> {
        (1..=WHEEL_POSITIONS)
            .contains(&position)
            .then_some(CamelotKey { position, mode })
    }

    /// Wheel position, `1..=12`.
    pub const fn position(self) -> u8 {
        self.position
    }

    /// Major or minor.
    pub const fn mode(self) -> Mode {
        self.mode
    }

    /// True for `B` keys.
    pub const fn is_major(self) -> bool {
        matches!(self.mode, Mode::Major)
    }
}

impl FromStr for CamelotKey {
    type Err = KeyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim().to_ascii_uppercase();
        let Some(letter) = trimmed.chars().last() else {
            return Err(KeyParseError::TooShort(raw.to_string()));
        };
        if trimmed.len() < 2 {
            return Err(KeyParseError::TooShort(raw.to_string()));
        }

        let (number, _) = trimmed.split_at(trimmed.len() - letter.len_utf8());
        let mode = Mode::from_letter(letter).ok_or_else(|| KeyParseError::InvalidMode {
            input: raw.to_string(),
            letter,
        })?;

        number
            .parse::<u8>()
            .ok()
            .and_then(|position| CamelotKey::new(position, mode))
            .ok_or_else(|| KeyParseError::InvalidPosition {
                input: raw.to_string(),
                position: number.to_string(),
            })
    }
}

impl TryFrom<String> for CamelotKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CamelotKey> for String {
    fn from(key: CamelotKey) -> Self {
        key.to_string()
    }
}

impl Display for CamelotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.position, self.mode.letter())
    }
}

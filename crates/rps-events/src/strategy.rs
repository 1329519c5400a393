//! Strategy Types
//!
//! The three fixed strategies and the cyclic dominance rule between them.
//!
//! # Example
//!
//! ```
//! use rps_events::Strategy;
//!
//! let rock: Strategy = "R".parse().unwrap();
//! assert!(rock.beats(Strategy::Scissors));
//! assert_eq!(rock.to_string(), "R");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical strategy order used for initial populations and reporting.
pub const STRATEGY_ORDER: [Strategy; 3] = [Strategy::Rock, Strategy::Paper, Strategy::Scissors];

/// A fixed Rock-Paper-Scissors strategy.
///
/// Serializes to the single-letter codes `"R"`, `"P"` and `"S"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "R")]
    Rock,
    #[serde(rename = "P")]
    Paper,
    #[serde(rename = "S")]
    Scissors,
}

impl Strategy {
    /// Returns the strategy this one defeats.
    ///
    /// Rock beats Scissors, Scissors beats Paper, Paper beats Rock.
    pub fn prey(self) -> Self {
        match self {
            Strategy::Rock => Strategy::Scissors,
            Strategy::Scissors => Strategy::Paper,
            Strategy::Paper => Strategy::Rock,
        }
    }

    /// Returns true if this strategy defeats `other`.
    pub fn beats(self, other: Strategy) -> bool {
        self.prey() == other
    }

    /// Single-letter code.
    pub fn code(self) -> char {
        match self {
            Strategy::Rock => 'R',
            Strategy::Paper => 'P',
            Strategy::Scissors => 'S',
        }
    }

    /// Full name, for human-readable output.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Rock => "Rock",
            Strategy::Paper => "Paper",
            Strategy::Scissors => "Scissors",
        }
    }

    /// Position within [`STRATEGY_ORDER`].
    pub fn index(self) -> usize {
        match self {
            Strategy::Rock => 0,
            Strategy::Paper => 1,
            Strategy::Scissors => 2,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    /// Accepts the codes `R`/`P`/`S` or the full names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "r" | "rock" => Ok(Strategy::Rock),
            "p" | "paper" => Ok(Strategy::Paper),
            "s" | "scissors" => Ok(Strategy::Scissors),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Error type for parsing a [`Strategy`] from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(pub String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid strategy: '{}', expected one of R, P, S", self.0)
    }
}

impl std::error::Error for ParseStrategyError {}

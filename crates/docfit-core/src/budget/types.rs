//! Core types for character budget management.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::budget::limits::Provider;

/// Fill fraction used by [`Strategy::Aggressive`].
pub const AGGRESSIVE_FILL: f64 = 0.85;
/// Fill fraction used by [`Strategy::Balanced`].
pub const BALANCED_FILL: f64 = 0.92;
/// Fill fraction used by [`Strategy::Conservative`].
pub const CONSERVATIVE_FILL: f64 = 0.98;
/// Fill fraction used by [`Strategy::PreserveAll`].
pub const PRESERVE_ALL_FILL: f64 = 1.0;

/// How much of a provider's token ceiling a document may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Aggressive,
    #[default]
    Balanced,
    Conservative,
    /// Use the full ceiling with no proportional shrinkage.
    PreserveAll,
}

impl Strategy {
    /// Parse a strategy name leniently.
    ///
    /// Matching ignores case, surrounding whitespace and the `-`/`_` spelling
    /// difference. Anything unrecognised falls back to [`Strategy::Balanced`].
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "aggressive" => Self::Aggressive,
            "balanced" => Self::Balanced,
            "conservative" => Self::Conservative,
            "preserve_all" => Self::PreserveAll,
            other => {
                if !other.is_empty() {
                    tracing::debug!("Unknown strategy '{}', falling back to balanced", other);
                }
                Self::Balanced
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Balanced => "balanced",
            Self::Conservative => "conservative",
            Self::PreserveAll => "preserve_all",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-strategy fill fractions, all in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillFractions {
    pub aggressive: f64,
    pub balanced: f64,
    pub conservative: f64,
    pub preserve_all: f64,
}

impl FillFractions {
    pub fn for_strategy(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Aggressive => self.aggressive,
            Strategy::Balanced => self.balanced,
            Strategy::Conservative => self.conservative,
            Strategy::PreserveAll => self.preserve_all,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Strategy, f64)> {
        [
            (Strategy::Aggressive, self.aggressive),
            (Strategy::Balanced, self.balanced),
            (Strategy::Conservative, self.conservative),
            (Strategy::PreserveAll, self.preserve_all),
        ]
        .into_iter()
    }
}

impl Default for FillFractions {
    fn default() -> Self {
        Self {
            aggressive: AGGRESSIVE_FILL,
            balanced: BALANCED_FILL,
            conservative: CONSERVATIVE_FILL,
            preserve_all: PRESERVE_ALL_FILL,
        }
    }
}

/// Resolved character budget for one fitting call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharBudget {
    /// Provider profile the budget was derived from
    pub provider: Provider,
    /// Strategy after normalisation
    pub strategy: Strategy,
    /// Token ceiling actually used (explicit override or profile value)
    pub token_ceiling: u32,
    /// Fill fraction applied for the strategy
    pub fill_fraction: f64,
    /// Absolute character ceiling, always at least 1
    pub char_ceiling: usize,
}

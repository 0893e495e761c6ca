//! Request and result types for document fitting.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::budget::limits::Provider;
use crate::budget::types::Strategy;
use crate::fitter::banner;

/// Which state of the fitter produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPath {
    /// Empty input; nothing to fit
    Empty,
    /// Document passed through unchanged
    Direct,
    /// Document checked against the hard ceiling and head-truncated if needed
    SimpleTruncate,
    /// Document partitioned into sections and a subset selected
    SectionedSplit,
    /// A stage failed; fixed-size head of the original returned
    Emergency,
    /// The emergency fallback failed too; fixed apology returned
    Catastrophic,
}

impl FitPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Direct => "direct",
            Self::SimpleTruncate => "simple_truncate",
            Self::SectionedSplit => "sectioned_split",
            Self::Emergency => "emergency",
            Self::Catastrophic => "catastrophic",
        }
    }
}

impl fmt::Display for FitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fitting call.
#[derive(Debug, Clone)]
pub struct FitRequest<'a> {
    pub document: &'a str,
    /// Opaque metadata returned untouched in the result
    pub structure: Option<Value>,
    pub provider_id: &'a str,
    pub token_ceiling: Option<u32>,
    /// Strategy name; unknown or missing means balanced
    pub strategy: Option<&'a str>,
}

impl<'a> FitRequest<'a> {
    pub fn new(document: &'a str, provider_id: &'a str) -> Self {
        Self {
            document,
            structure: None,
            provider_id,
            token_ceiling: None,
            strategy: None,
        }
    }

    pub fn with_structure(mut self, structure: Value) -> Self {
        self.structure = Some(structure);
        self
    }

    pub fn with_token_ceiling(mut self, tokens: u32) -> Self {
        self.token_ceiling = Some(tokens);
        self
    }

    pub fn with_strategy(mut self, strategy: &'a str) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub(crate) fn resolved_strategy(&self) -> Strategy {
        self.strategy.map(Strategy::parse).unwrap_or_default()
    }
}

/// Outcome of fitting one document. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub text: String,
    pub truncated: bool,
    /// Size of the input in chars
    pub original_size: usize,
    /// Size of `text` in chars
    pub optimized_size: usize,
    /// Provider identifier as supplied by the caller
    pub provider: String,
    /// Profile the identifier resolved to
    pub profile: Provider,
    pub strategy: Strategy,
    /// Character ceiling derived by the budget calculator
    pub char_ceiling: usize,
    pub path: FitPath,
    pub structure: Option<Value>,
    pub split: bool,
    pub section_count: Option<usize>,
    pub selected_section_count: Option<usize>,
    /// Heuristic token estimate of `text`
    pub estimated_tokens: u32,
    pub error: Option<String>,
    /// False only when no content could be derived from the input
    pub is_valid: bool,
}

impl FitResult {
    /// Share of the original kept, in percent with one decimal.
    pub fn kept_percentage(&self) -> f64 {
        banner::kept_percentage(self.optimized_size, self.original_size)
    }
}

/// What a fitting stage produced, before the result envelope is assembled.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outcome {
    pub text: String,
    pub truncated: bool,
    pub path: FitPath,
    /// (sections found, sections selected) for the sectioned split
    pub sections: Option<(usize, usize)>,
}

impl Outcome {
    pub fn unchanged(document: &str, path: FitPath) -> Self {
        Self {
            text: document.to_string(),
            truncated: false,
            path,
            sections: None,
        }
    }

    pub fn truncated(text: String, path: FitPath) -> Self {
        Self {
            text,
            truncated: true,
            path,
            sections: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_balanced() {
        let request = FitRequest::new("doc", "openai");
        assert_eq!(request.resolved_strategy(), Strategy::Balanced);

        let request = request.with_strategy("preserve_all");
        assert_eq!(request.resolved_strategy(), Strategy::PreserveAll);
    }

    #[test]
    fn kept_percentage_matches_banner_rounding() {
        let result = FitResult {
            text: "x".repeat(2),
            truncated: true,
            original_size: 3,
            optimized_size: 2,
            provider: "azure".to_string(),
            profile: Provider::Azure,
            strategy: Strategy::Balanced,
            char_ceiling: 2,
            path: FitPath::SimpleTruncate,
            structure: None,
            split: false,
            section_count: None,
            selected_section_count: None,
            estimated_tokens: 1,
            error: None,
            is_valid: true,
        };
        assert_eq!(result.kept_percentage(), 66.7);
        assert_eq!(result.kept_percentage(), banner::kept_percentage(2, 3));
    }

    #[test]
    fn fit_path_serializes_snake_case() {
        let json = serde_json::to_string(&FitPath::SectionedSplit).unwrap();
        assert_eq!(json, "\"sectioned_split\"");
    }
}

//! Token estimation for fitted documents.
//!
//! Uses a fixed characters-per-token ratio; no tokenizer is involved.

/// Default characters-per-token ratio for natural-language text.
pub const DEFAULT_CHARS_PER_TOKEN: u32 = 4;

/// Trait for token counting implementations.
pub trait TokenCounter: Send + Sync {
    /// Count tokens in a plain text string.
    fn count_text(&self, text: &str) -> u32;
}

/// Heuristic token counter using character-based estimation.
///
/// Uses the approximation: tokens ≈ characters / `chars_per_token`, scaled
/// by an optional safety multiplier.
#[derive(Debug, Clone)]
pub struct HeuristicTokenCounter {
    /// Characters per token ratio (default: 4)
    chars_per_token: f64,
    /// Safety margin multiplier (default: 1.0, no margin)
    safety_margin: f64,
}

impl HeuristicTokenCounter {
    pub fn new(chars_per_token: f64, safety_margin: f64) -> Self {
        Self {
            chars_per_token,
            safety_margin,
        }
    }

    /// Counter with the given ratio and no safety margin.
    pub fn with_ratio(chars_per_token: u32) -> Self {
        Self::new(f64::from(chars_per_token.max(1)), 1.0)
    }
}

impl Default for HeuristicTokenCounter {
    fn default() -> Self {
        Self::with_ratio(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl TokenCounter for HeuristicTokenCounter {
    fn count_text(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }

        let char_count = text.chars().count() as f64;
        let base_tokens = char_count / self.chars_per_token;
        let adjusted_tokens = base_tokens * self.safety_margin;

        adjusted_tokens.ceil() as u32
    }
}

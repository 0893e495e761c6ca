//! Fitter configuration.
//!
//! Every policy constant the fitter uses lives here with its default value.
//! Defaults can be overridden from a JSON file; the default location is
//! `~/.docfit/config.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::budget::counter::DEFAULT_CHARS_PER_TOKEN;
use crate::budget::limits::ProviderProfile;
use crate::budget::types::FillFractions;
use crate::error::ConfigError;

/// Keywords marking high-value sections (test, requirement, scope, summary and UI terms).
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "test",
    "senaryo",
    "scenario",
    "gereksinim",
    "gereklilik",
    "requirement",
    "kapsam",
    "scope",
    "özet",
    "summary",
    "kullanıcı",
    "user",
    "arayüz",
    "interface",
    "ekran",
    "screen",
    "önemli",
    "kritik",
    "zorunlu",
];

/// Configuration for [`DocumentFitter`](crate::fitter::DocumentFitter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitterConfig {
    /// Characters per token used to turn token ceilings into char ceilings
    pub chars_per_token: u32,
    /// Fill fraction per strategy
    pub fill_fractions: FillFractions,
    /// Keyword sections are taken while the running total stays below this share of the split ceiling
    pub keyword_fill_ratio: f64,
    /// Filler sections are taken while the running total stays below this share of the split ceiling
    pub filler_fill_ratio: f64,
    /// Maximum number of non-keyword middle sections
    pub max_filler_sections: usize,
    /// Below this many chars of middle room the clamp falls back to head truncation
    pub min_middle_chars: usize,
    /// Margin kept after the first section in the three-part clamp
    pub head_margin_chars: usize,
    /// Chars of the last selected section kept by the three-part clamp
    pub tail_keep_chars: usize,
    /// Extra room left free by simple truncation
    pub truncation_safety_margin: usize,
    /// Head size kept by the emergency fallback
    pub emergency_char_limit: usize,
    pub keywords: Vec<String>,
    /// Provider profile overrides
    pub providers: Vec<ProviderProfile>,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            fill_fractions: FillFractions::default(),
            keyword_fill_ratio: 0.9,
            filler_fill_ratio: 0.8,
            max_filler_sections: 3,
            min_middle_chars: 1_000,
            head_margin_chars: 200,
            tail_keep_chars: 20_000,
            truncation_safety_margin: 200,
            emergency_char_limit: 50_000,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            providers: Vec::new(),
        }
    }
}

impl FitterConfig {
    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chars_per_token == 0 {
            return Err(ConfigError::Invalid(
                "chars_per_token must be positive".to_string(),
            ));
        }

        for (strategy, fraction) in self.fill_fractions.iter() {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "fill fraction for {} must be in (0, 1], got {}",
                    strategy, fraction
                )));
            }
        }

        for (name, ratio) in [
            ("keyword_fill_ratio", self.keyword_fill_ratio),
            ("filler_fill_ratio", self.filler_fill_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in (0, 1], got {}",
                    name, ratio
                )));
            }
        }

        for profile in &self.providers {
            if profile.token_ceiling == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: token_ceiling must be positive",
                    profile.provider
                )));
            }
            if profile.hard_char_ceiling == 0
                || profile.hard_char_ceiling > profile.absolute_char_limit
            {
                return Err(ConfigError::Invalid(format!(
                    "{}: hard_char_ceiling ({}) must be positive and within absolute_char_limit ({})",
                    profile.provider, profile.hard_char_ceiling, profile.absolute_char_limit
                )));
            }
            if let Some(split) = profile.split {
                if split.split_ceiling > profile.hard_char_ceiling {
                    return Err(ConfigError::Invalid(format!(
                        "{}: split_ceiling ({}) exceeds hard_char_ceiling ({})",
                        profile.provider, split.split_ceiling, profile.hard_char_ceiling
                    )));
                }
                if split.must_split_threshold <= profile.hard_char_ceiling {
                    return Err(ConfigError::Invalid(format!(
                        "{}: must_split_threshold ({}) must exceed hard_char_ceiling ({})",
                        profile.provider, split.must_split_threshold, profile.hard_char_ceiling
                    )));
                }
                if split.section_chars == 0 {
                    return Err(ConfigError::Invalid(format!(
                        "{}: section_chars must be positive",
                        profile.provider
                    )));
                }
            }
        }

        Ok(())
    }

    /// Load and validate configuration from a JSON file.
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let config: FitterConfig = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::info!(
            "Loaded fitter config from {:?} ({} provider overrides)",
            path,
            config.providers.len()
        );
        Ok(config)
    }

    /// Load from the default path, falling back to defaults when no file exists.
    pub async fn load_user_config() -> Result<Self, ConfigError> {
        let path = get_default_config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path).await
    }

    /// Save configuration as pretty JSON.
    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Get the default configuration file path.
///
/// Returns `~/.docfit/config.json`, or `./.docfit/config.json` when no home
/// directory is known.
pub fn get_default_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".docfit").join("config.json")
}

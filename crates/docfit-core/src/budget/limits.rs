//! Provider size limits registry.
//!
//! Provides the known token and character ceilings for the supported AI
//! providers, with per-provider overrides supplied through configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Raw message size cap enforced by the hosted OpenAI-compatible APIs.
pub const HOSTED_API_CHAR_LIMIT: usize = 1_048_576;

/// AI provider a document is being fitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
    Ollama,
    #[serde(rename = "deepseek")]
    DeepSeek,
    /// Catch-all profile for unknown identifiers
    Default,
}

impl Provider {
    /// Resolve a free-form provider identifier, case-insensitively.
    ///
    /// Unknown identifiers resolve to [`Provider::Default`].
    pub fn parse(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "openai" => Self::OpenAi,
            "azure" | "azure_openai" => Self::Azure,
            "ollama" => Self::Ollama,
            "deepseek" => Self::DeepSeek,
            "default" => Self::Default,
            other => {
                tracing::debug!("Unknown provider '{}', using default profile", other);
                Self::Default
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Azure => "azure",
            Self::Ollama => "ollama",
            Self::DeepSeek => "deepseek",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits for providers that partition oversized documents into sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitLimits {
    /// Documents longer than this (in chars) go through the sectioned split
    pub must_split_threshold: usize,
    /// Maximum size of the assembled split payload
    pub split_ceiling: usize,
    /// Maximum size of a single section
    pub section_chars: usize,
}

/// Size profile of one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub provider: Provider,
    /// Context window in tokens
    pub token_ceiling: u32,
    /// Documented raw character cap of the provider API
    pub absolute_char_limit: usize,
    /// Safety ceiling for simple truncation, well below the absolute cap
    pub hard_char_ceiling: usize,
    /// Present only for strict hard-limit providers
    #[serde(default)]
    pub split: Option<SplitLimits>,
}

impl ProviderProfile {
    /// Whether this provider partitions very large documents instead of head-truncating.
    pub fn is_strict(&self) -> bool {
        self.split.is_some()
    }
}

/// Built-in provider profiles.
///
/// Hard ceilings sit at roughly a third of the documented absolute limits.
/// These values were calibrated against the providers' real rejections and
/// may need revisiting when the upstream APIs change.
pub const KNOWN_PROVIDER_PROFILES: &[ProviderProfile] = &[
    ProviderProfile {
        provider: Provider::OpenAi,
        token_ceiling: 128_000,
        absolute_char_limit: HOSTED_API_CHAR_LIMIT,
        hard_char_ceiling: 380_000,
        split: None,
    },
    ProviderProfile {
        provider: Provider::Azure,
        token_ceiling: 128_000,
        absolute_char_limit: HOSTED_API_CHAR_LIMIT,
        hard_char_ceiling: 350_000,
        split: Some(SplitLimits {
            must_split_threshold: HOSTED_API_CHAR_LIMIT,
            split_ceiling: 350_000,
            section_chars: 40_000,
        }),
    },
    ProviderProfile {
        provider: Provider::Ollama,
        token_ceiling: 8_192,
        absolute_char_limit: 262_144,
        hard_char_ceiling: 90_000,
        split: None,
    },
    ProviderProfile {
        provider: Provider::DeepSeek,
        token_ceiling: 64_000,
        absolute_char_limit: 524_288,
        hard_char_ceiling: 150_000,
        split: None,
    },
    ProviderProfile {
        provider: Provider::Default,
        token_ceiling: 16_000,
        absolute_char_limit: 524_288,
        hard_char_ceiling: 150_000,
        split: None,
    },
];

/// Registry of provider profiles with built-in defaults and configured overrides.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    /// Overrides (higher priority than built-in)
    overrides: HashMap<Provider, ProviderProfile>,
}

impl ProviderRegistry {
    /// Create a registry with built-in profiles only.
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Create a registry with the given overrides applied on top of the built-ins.
    pub fn with_overrides(overrides: impl IntoIterator<Item = ProviderProfile>) -> Self {
        let mut registry = Self::new();
        for profile in overrides {
            registry.add_override(profile);
        }
        registry
    }

    pub fn add_override(&mut self, profile: ProviderProfile) {
        self.overrides.insert(profile.provider, profile);
    }

    /// Profile for a provider, overrides taking priority.
    pub fn get(&self, provider: Provider) -> ProviderProfile {
        if let Some(profile) = self.overrides.get(&provider) {
            return *profile;
        }

        KNOWN_PROVIDER_PROFILES
            .iter()
            .find(|p| p.provider == provider)
            .copied()
            .unwrap_or_else(default_profile)
    }

    /// Profile for a free-form identifier; unknown identifiers get the default profile.
    pub fn resolve(&self, provider_id: &str) -> ProviderProfile {
        self.get(Provider::parse(provider_id))
    }

    pub fn list_overrides(&self) -> Vec<&ProviderProfile> {
        self.overrides.values().collect()
    }
}

fn default_profile() -> ProviderProfile {
    ProviderProfile {
        provider: Provider::Default,
        token_ceiling: 16_000,
        absolute_char_limit: 524_288,
        hard_char_ceiling: 150_000,
        split: None,
    }
}

//! Document fitting for provider context windows.
//!
//! Takes a document of any size and produces a payload that satisfies the
//! target provider's hard size limits while keeping as much relevant content
//! as possible.
//!
//! # Key Components
//!
//! - [`types`]: `FitRequest`, `FitResult`, `FitPath`
//! - [`segmenter`]: Line-based document sectioning
//! - [`selection`]: Greedy keyword-aware section selection
//! - [`split`]: Sectioned split and three-part clamp
//! - [`truncate`]: Head truncation and the emergency fallback
//! - [`banner`]: Provenance banners and markers
//! - [`text`]: Char-boundary-safe slicing

pub mod banner;
pub mod segmenter;
pub mod selection;
pub mod split;
pub mod text;
pub mod truncate;
pub mod types;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

use serde_json::Value;

use crate::budget::calculator::{calculate_budget, direct_ceiling};
use crate::budget::counter::{HeuristicTokenCounter, TokenCounter};
use crate::budget::limits::{ProviderProfile, ProviderRegistry};
use crate::budget::types::{CharBudget, Strategy};
use crate::config::FitterConfig;
use crate::error::{ConfigError, FitError};

use banner::{APOLOGY_TEXT, REMAINDER_TRUNCATED_MARKER};
use selection::KeywordMatcher;
use text::{char_len, head_chars};

pub use segmenter::{DocumentSegmenter, Section};
pub use selection::{select_sections, Selection, SelectionPolicy};
pub use types::{FitPath, FitRequest, FitResult};

use types::Outcome;

/// Fits documents to provider limits.
///
/// Holds only immutable configuration; every call is independent and the
/// fitter can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct DocumentFitter {
    config: FitterConfig,
    registry: ProviderRegistry,
    matcher: KeywordMatcher,
    counter: HeuristicTokenCounter,
}

impl DocumentFitter {
    /// Create a fitter from a validated configuration.
    pub fn new(config: FitterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let matcher = KeywordMatcher::new(&config.keywords)
            .map_err(|e| ConfigError::Invalid(format!("keywords: {}", e)))?;

        Ok(Self {
            registry: ProviderRegistry::with_overrides(config.providers.iter().copied()),
            counter: HeuristicTokenCounter::with_ratio(config.chars_per_token),
            matcher,
            config,
        })
    }

    pub fn config(&self) -> &FitterConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Character budget for a provider identifier and strategy.
    pub fn budget_for(
        &self,
        provider_id: &str,
        strategy: Strategy,
        explicit_token_ceiling: Option<u32>,
    ) -> CharBudget {
        let profile = self.registry.resolve(provider_id);
        calculate_budget(
            &profile,
            strategy,
            explicit_token_ceiling,
            self.config.chars_per_token,
            &self.config.fill_fractions,
        )
    }

    /// Fit one document. Never fails; problems are reported in the result.
    pub fn fit(&self, request: FitRequest<'_>) -> FitResult {
        let strategy = request.resolved_strategy();
        let profile = self.registry.resolve(request.provider_id);
        let budget = calculate_budget(
            &profile,
            strategy,
            request.token_ceiling,
            self.config.chars_per_token,
            &self.config.fill_fractions,
        );
        let document = request.document;

        if document.is_empty() {
            tracing::warn!("Document text is empty, returning empty result");
            return self.envelope(
                &request,
                &budget,
                0,
                Outcome::unchanged("", FitPath::Empty),
                Some("empty document".to_string()),
                true,
            );
        }

        let original_chars = char_len(document);
        tracing::info!(
            "Fitting document: {} chars, provider {} ({}), strategy {}",
            original_chars,
            request.provider_id,
            profile.provider,
            strategy
        );

        let primary = guarded(|| self.run_stages(document, original_chars, &profile, &budget));
        let primary_error = match primary {
            Ok(outcome) => {
                return self.envelope(&request, &budget, original_chars, outcome, None, true);
            }
            Err(e) => e,
        };

        tracing::error!("Document fitting failed: {}", primary_error);
        let fallback = guarded(|| {
            truncate::emergency_truncate(
                document,
                original_chars,
                self.config.emergency_char_limit,
                profile.hard_char_ceiling,
            )
        });

        match fallback {
            Ok(text) => {
                tracing::warn!("Returning emergency truncation ({} chars)", char_len(&text));
                self.envelope(
                    &request,
                    &budget,
                    original_chars,
                    Outcome::truncated(text, FitPath::Emergency),
                    Some(format!("optimization error: {}", primary_error)),
                    true,
                )
            }
            Err(fallback_error) => {
                tracing::error!("Emergency truncation failed: {}", fallback_error);
                let apology = head_chars(APOLOGY_TEXT, profile.hard_char_ceiling).to_string();
                self.envelope(
                    &request,
                    &budget,
                    original_chars,
                    Outcome::truncated(apology, FitPath::Catastrophic),
                    Some(format!(
                        "{}; fallback failed: {}",
                        primary_error, fallback_error
                    )),
                    false,
                )
            }
        }
    }

    /// Direct, then sectioned split or simple truncate, then the hard clamp.
    fn run_stages(
        &self,
        document: &str,
        original_chars: usize,
        profile: &ProviderProfile,
        budget: &CharBudget,
    ) -> Result<Outcome, FitError> {
        let direct = direct_ceiling(budget, profile);
        if original_chars <= direct {
            tracing::info!(
                "Document fits the {} budget ({} <= {} chars)",
                budget.strategy,
                original_chars,
                direct
            );
            return Ok(Outcome::unchanged(document, FitPath::Direct));
        }

        let outcome = match profile.split {
            Some(limits) if original_chars > limits.must_split_threshold => {
                tracing::warn!(
                    "Document exceeds {} split threshold ({} > {} chars), sectioning",
                    profile.provider,
                    original_chars,
                    limits.must_split_threshold
                );
                split::sectioned_split(
                    document,
                    original_chars,
                    profile.provider,
                    &limits,
                    &self.config,
                    &self.matcher,
                )?
            }
            _ => truncate::simple_truncate(
                document,
                original_chars,
                profile,
                self.config.truncation_safety_margin,
            )?,
        };

        Ok(enforce_hard_ceiling(outcome, profile.hard_char_ceiling))
    }

    fn envelope(
        &self,
        request: &FitRequest<'_>,
        budget: &CharBudget,
        original_chars: usize,
        outcome: Outcome,
        error: Option<String>,
        is_valid: bool,
    ) -> FitResult {
        let optimized_size = char_len(&outcome.text);
        let estimated_tokens = self.counter.count_text(&outcome.text);
        let (section_count, selected_section_count) = match outcome.sections {
            Some((total, selected)) => (Some(total), Some(selected)),
            None => (None, None),
        };

        FitResult {
            text: outcome.text,
            truncated: outcome.truncated,
            original_size: original_chars,
            optimized_size,
            provider: request.provider_id.to_string(),
            profile: budget.provider,
            strategy: budget.strategy,
            char_ceiling: budget.char_ceiling,
            path: outcome.path,
            structure: request.structure.clone(),
            split: outcome.sections.is_some(),
            section_count,
            selected_section_count,
            estimated_tokens,
            error,
            is_valid,
        }
    }
}

impl Default for DocumentFitter {
    fn default() -> Self {
        let config = FitterConfig::default();
        let matcher = KeywordMatcher::new(&config.keywords).unwrap_or_else(|e| {
            tracing::error!("Default keywords failed to compile: {}", e);
            KeywordMatcher::empty()
        });

        Self {
            registry: ProviderRegistry::new(),
            counter: HeuristicTokenCounter::with_ratio(config.chars_per_token),
            matcher,
            config,
        }
    }
}

/// Run a stage, turning a panic into a [`FitError`].
fn guarded<T>(stage: impl FnOnce() -> Result<T, FitError>) -> Result<T, FitError> {
    match catch_unwind(AssertUnwindSafe(stage)) {
        Ok(result) => result,
        Err(payload) => Err(FitError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Final clamp: no stage may hand back more than the hard ceiling.
fn enforce_hard_ceiling(outcome: Outcome, hard_ceiling: usize) -> Outcome {
    if char_len(&outcome.text) <= hard_ceiling {
        return outcome;
    }

    tracing::warn!("Output exceeds hard ceiling of {} chars, clamping", hard_ceiling);
    let marker_chars = char_len(REMAINDER_TRUNCATED_MARKER);
    let text = if hard_ceiling > marker_chars {
        let mut text = head_chars(&outcome.text, hard_ceiling - marker_chars).to_string();
        text.push_str(REMAINDER_TRUNCATED_MARKER);
        text
    } else {
        head_chars(&outcome.text, hard_ceiling).to_string()
    };

    Outcome {
        text,
        truncated: true,
        ..outcome
    }
}

static DEFAULT_FITTER: OnceLock<DocumentFitter> = OnceLock::new();

/// Process-wide fitter with the default configuration, built on first use.
pub fn default_fitter() -> &'static DocumentFitter {
    DEFAULT_FITTER.get_or_init(DocumentFitter::default)
}

/// Fit a document with the default configuration.
///
/// Unknown providers use the default profile and unknown strategies mean
/// balanced; the call never fails. Callers with their own configuration
/// should hold a [`DocumentFitter`] instead.
pub fn fit_document_for_provider(
    document: &str,
    structure: Option<Value>,
    provider_id: &str,
    explicit_token_ceiling: Option<u32>,
    strategy: &str,
) -> FitResult {
    let request = FitRequest {
        document,
        structure,
        provider_id,
        token_ceiling: explicit_token_ceiling,
        strategy: Some(strategy),
    };
    default_fitter().fit(request)
}

/// Fit a document for Azure using the full budget.
pub fn fit_for_azure(document: &str, structure: Option<Value>) -> FitResult {
    fit_document_for_provider(
        document,
        structure,
        "azure",
        None,
        Strategy::PreserveAll.as_str(),
    )
}

pub mod budget;
pub mod config;
pub mod error;
pub mod fitter;
pub mod overflow;

pub use budget::{
    calculate_budget, direct_ceiling, CharBudget, FillFractions, HeuristicTokenCounter, Provider,
    ProviderProfile, ProviderRegistry, SplitLimits, Strategy, TokenCounter,
    KNOWN_PROVIDER_PROFILES,
};
pub use config::{get_default_config_path, FitterConfig, DEFAULT_KEYWORDS};
pub use error::{ConfigError, FitError};
pub use fitter::{
    default_fitter, fit_document_for_provider, fit_for_azure, DocumentFitter, FitPath, FitRequest,
    FitResult,
};
pub use overflow::{is_context_overflow_error, overflow_user_message};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

//! Character budget management for provider context windows.
//!
//! # Key Components
//!
//! - [`types`]: `Strategy`, `FillFractions`, `CharBudget`
//! - [`limits`]: Provider profiles registry
//! - [`counter`]: Token estimation via a fixed chars-per-token heuristic
//! - [`calculator`]: Strategy and provider to character ceiling

pub mod calculator;
pub mod counter;
pub mod limits;
pub mod types;

pub use calculator::{calculate_budget, direct_ceiling};
pub use counter::{HeuristicTokenCounter, TokenCounter};
pub use limits::{
    Provider, ProviderProfile, ProviderRegistry, SplitLimits, KNOWN_PROVIDER_PROFILES,
};
pub use types::{CharBudget, FillFractions, Strategy};

//! Budget calculation.
//!
//! Turns a provider, a strategy and an optional explicit token ceiling into a
//! single absolute character ceiling. Pure function of its inputs.

use crate::budget::limits::ProviderProfile;
use crate::budget::types::{CharBudget, FillFractions, Strategy};

/// Derive the character budget for a provider profile.
///
/// `char_ceiling = floor(token_ceiling * chars_per_token * fill_fraction)`,
/// never below 1. An explicit token ceiling replaces the profile's value when
/// it is present and positive.
pub fn calculate_budget(
    profile: &ProviderProfile,
    strategy: Strategy,
    explicit_token_ceiling: Option<u32>,
    chars_per_token: u32,
    fill_fractions: &FillFractions,
) -> CharBudget {
    let token_ceiling = explicit_token_ceiling
        .filter(|tokens| *tokens > 0)
        .unwrap_or(profile.token_ceiling);
    let fill_fraction = fill_fractions.for_strategy(strategy);

    let raw = f64::from(token_ceiling) * f64::from(chars_per_token.max(1)) * fill_fraction;
    let char_ceiling = (raw.floor() as usize).max(1);

    tracing::debug!(
        "Budget for {}: {} tokens x {} chars x {} ({}) = {} chars",
        profile.provider,
        token_ceiling,
        chars_per_token,
        fill_fraction,
        strategy,
        char_ceiling
    );

    CharBudget {
        provider: profile.provider,
        strategy,
        token_ceiling,
        fill_fraction,
        char_ceiling,
    }
}

/// Ceiling under which a document passes through untouched.
///
/// The strategy budget is capped by the provider's hard ceiling so a direct
/// pass-through never exceeds what the provider accepts.
pub fn direct_ceiling(budget: &CharBudget, profile: &ProviderProfile) -> usize {
    budget.char_ceiling.min(profile.hard_char_ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::limits::{Provider, ProviderRegistry};

    fn budget_for(provider: Provider, strategy: Strategy, explicit: Option<u32>) -> CharBudget {
        let profile = ProviderRegistry::new().get(provider);
        calculate_budget(&profile, strategy, explicit, 4, &FillFractions::default())
    }

    #[test]
    fn applies_ratio_and_fill_fraction() {
        let budget = budget_for(Provider::OpenAi, Strategy::Balanced, None);
        // 128_000 * 4 * 0.92 = 471_040
        assert_eq!(budget.char_ceiling, 471_040);
        assert_eq!(budget.token_ceiling, 128_000);
    }

    #[test]
    fn preserve_all_uses_full_ceiling() {
        let budget = budget_for(Provider::Azure, Strategy::PreserveAll, None);
        assert_eq!(budget.char_ceiling, 512_000);
    }

    #[test]
    fn aggressive_is_smallest() {
        let aggressive = budget_for(Provider::Ollama, Strategy::Aggressive, None);
        let conservative = budget_for(Provider::Ollama, Strategy::Conservative, None);
        // 8_192 * 4 * 0.85 = 27_852.8
        assert_eq!(aggressive.char_ceiling, 27_852);
        assert!(aggressive.char_ceiling < conservative.char_ceiling);
    }

    #[test]
    fn explicit_token_ceiling_overrides_profile() {
        let budget = budget_for(Provider::OpenAi, Strategy::PreserveAll, Some(1_000));
        assert_eq!(budget.token_ceiling, 1_000);
        assert_eq!(budget.char_ceiling, 4_000);
    }

    #[test]
    fn zero_explicit_ceiling_is_ignored() {
        let budget = budget_for(Provider::OpenAi, Strategy::PreserveAll, Some(0));
        assert_eq!(budget.token_ceiling, 128_000);
    }

    #[test]
    fn ceiling_is_always_positive() {
        let profile = ProviderRegistry::new().get(Provider::Default);
        let fractions = FillFractions {
            aggressive: 0.01,
            ..FillFractions::default()
        };
        let budget = calculate_budget(&profile, Strategy::Aggressive, Some(1), 4, &fractions);
        assert_eq!(budget.char_ceiling, 1);
    }

    #[test]
    fn direct_ceiling_is_capped_by_hard_ceiling() {
        let profile = ProviderRegistry::new().get(Provider::Azure);
        let budget = budget_for(Provider::Azure, Strategy::PreserveAll, None);
        assert_eq!(direct_ceiling(&budget, &profile), 350_000);

        let small = budget_for(Provider::Azure, Strategy::PreserveAll, Some(100));
        assert_eq!(direct_ceiling(&small, &profile), 400);
    }
}

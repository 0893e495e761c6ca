//! End-to-end properties of document fitting

use docfit_core::{
    fit_document_for_provider, DocumentFitter, FitPath, FitRequest, FitterConfig, Provider,
    ProviderRegistry, KNOWN_PROVIDER_PROFILES,
};

const PROVIDERS: &[&str] = &["openai", "azure", "ollama", "deepseek", "unknown-provider"];
const STRATEGIES: &[&str] = &["aggressive", "balanced", "conservative", "preserve_all"];

fn chars(text: &str) -> usize {
    text.chars().count()
}

/// `count` lines of exactly 100 chars each (newline included).
fn lines(fill: char, count: usize) -> String {
    let mut line: String = std::iter::repeat(fill).take(99).collect();
    line.push('\n');
    line.repeat(count)
}

fn hard_ceiling(provider_id: &str) -> usize {
    ProviderRegistry::new().resolve(provider_id).hard_char_ceiling
}

#[test]
fn test_document_within_budget_is_returned_unchanged() {
    let registry = ProviderRegistry::new();
    for provider_id in PROVIDERS {
        let profile = registry.resolve(provider_id);
        let fitter = DocumentFitter::default();
        let budget = fitter.budget_for(provider_id, Default::default(), None);
        let size = budget.char_ceiling.min(profile.hard_char_ceiling);

        let doc = "ö".repeat(size);
        let result = fit_document_for_provider(&doc, None, provider_id, None, "balanced");

        assert_eq!(result.path, FitPath::Direct, "provider {}", provider_id);
        assert!(!result.truncated);
        assert_eq!(result.text, doc);
        assert_eq!(result.original_size, size);
        assert_eq!(result.optimized_size, size);
    }
}

#[test]
fn test_output_never_exceeds_hard_ceiling() {
    let sizes = [1, 5_000, 95_000, 200_000, 400_000, 700_000];
    for provider_id in PROVIDERS {
        for strategy in STRATEGIES {
            for size in sizes {
                let doc = lines('q', size / 100 + 1);
                let result = fit_document_for_provider(&doc, None, provider_id, None, strategy);

                assert!(
                    result.optimized_size <= hard_ceiling(provider_id),
                    "{} / {} / {} chars -> {}",
                    provider_id,
                    strategy,
                    size,
                    result.optimized_size
                );
                assert!(!result.text.is_empty());
                assert!(result.optimized_size <= result.original_size);
                assert_eq!(result.optimized_size, chars(&result.text));
                assert!(result.error.is_none());
            }
        }
    }
}

#[test]
fn test_fitting_is_non_expanding() {
    let doc = lines('r', 8_000);
    for provider_id in PROVIDERS {
        let first = fit_document_for_provider(&doc, None, provider_id, None, "balanced");
        let second = fit_document_for_provider(&first.text, None, provider_id, None, "balanced");

        assert!(second.optimized_size <= first.optimized_size);
        assert_eq!(second.text, first.text, "provider {}", provider_id);
        assert!(!second.truncated);
    }
}

#[test]
fn test_small_openai_document() {
    let doc = "x".repeat(100);
    let result = fit_document_for_provider(&doc, None, "openai", None, "balanced");

    assert_eq!(result.text, doc);
    assert!(!result.truncated);
    assert_eq!(result.original_size, 100);
    assert_eq!(result.optimized_size, 100);
}

#[test]
fn test_empty_input() {
    let result = fit_document_for_provider("", None, "azure", None, "preserve_all");

    assert_eq!(result.text, "");
    assert!(!result.truncated);
    assert_eq!(result.original_size, 0);
    assert_eq!(result.optimized_size, 0);
    assert!(result.error.is_some());
}

#[test]
fn test_azure_500k_document_is_truncated_without_split() {
    let doc = lines('a', 5_000);
    assert_eq!(chars(&doc), 500_000);

    let result = fit_document_for_provider(&doc, None, "azure", None, "preserve_all");

    assert!(result.truncated);
    assert!(!result.split);
    assert_eq!(result.path, FitPath::SimpleTruncate);
    assert!(result.optimized_size <= 500_000);
    assert!(result.optimized_size <= 350_000);
    assert!(result.text.contains("## DOCUMENT INFO"));
    assert!(result.text.contains("500000"));
}

#[test]
fn test_simple_truncate_does_not_inspect_content() {
    // 600k chars: over the azure hard ceiling, under the must-split threshold.
    // The keyword sits in the middle third, past the kept head.
    let mut doc = lines('b', 3_800);
    doc.push_str("test senaryosu: the login screen must reject empty passwords\n");
    doc.push_str(&lines('b', 2_200));

    let result = fit_document_for_provider(&doc, None, "azure", None, "balanced");

    assert_eq!(result.path, FitPath::SimpleTruncate);
    assert!(result.truncated);
    assert!(!result.split);
    assert!(!result.text.contains("test senaryosu"));
}

#[test]
fn test_huge_azure_document_is_sectioned() {
    // 1.1M chars in 100-char lines: 28 sections of at most 40k chars
    let mut all_lines: Vec<String> = Vec::with_capacity(11_000);
    all_lines.push(format!("{:<99}\n", "Introduction"));
    for _ in 1..10_999 {
        all_lines.push(lines('x', 1));
    }
    all_lines.push(format!("{:<99}\n", "Conclusion"));
    all_lines[6_000] = format!("{:<99}\n", "Test senaryosu 42: export must finish");
    let doc: String = all_lines.concat();
    assert_eq!(chars(&doc), 1_100_000);

    let result = fit_document_for_provider(&doc, None, "azure", None, "preserve_all");

    assert_eq!(result.path, FitPath::SectionedSplit);
    assert!(result.truncated);
    assert!(result.split);
    assert!(result.optimized_size <= 350_000);
    assert_eq!(result.section_count, Some(28));
    // head, three fillers, the keyword section and the tail
    assert_eq!(result.selected_section_count, Some(6));
    assert!(result.text.contains("Introduction"));
    assert!(result.text.contains("Test senaryosu 42"));
    assert!(result.text.contains("Conclusion"));
}

#[test]
fn test_stage_failure_falls_back_to_emergency() {
    let mut profile = ProviderRegistry::new().get(Provider::DeepSeek);
    profile.hard_char_ceiling = 150;
    let config = FitterConfig {
        providers: vec![profile],
        ..FitterConfig::default()
    };
    let fitter = DocumentFitter::new(config).unwrap();

    let doc = lines('e', 50);
    let result = fitter.fit(FitRequest::new(&doc, "deepseek"));

    assert_eq!(result.path, FitPath::Emergency);
    assert!(result.is_valid);
    assert!(result.truncated);
    assert!(result.optimized_size <= 150);
    assert!(result.text.starts_with("eee"));
    assert!(result.error.unwrap().contains("optimization error"));
}

#[test]
fn test_structure_is_returned_untouched() {
    let structure = serde_json::json!({ "tables": [{ "rows": 3 }], "images": 2 });
    let doc = lines('s', 6_000);

    let result =
        fit_document_for_provider(&doc, Some(structure.clone()), "azure", None, "balanced");

    assert!(result.truncated);
    assert_eq!(result.structure, Some(structure));
}

#[test]
fn test_explicit_token_ceiling_overrides_profile() {
    let fitter = DocumentFitter::default();
    let doc = "w".repeat(3_000);

    let result = fitter.fit(
        FitRequest::new(&doc, "openai")
            .with_token_ceiling(1_000)
            .with_strategy("preserve_all"),
    );
    assert_eq!(result.char_ceiling, 4_000);
    assert_eq!(result.path, FitPath::Direct);

    let ignored = fitter.fit(FitRequest::new(&doc, "openai").with_token_ceiling(0));
    assert_eq!(ignored.char_ceiling, 471_040);
}

#[test]
fn test_builtin_profiles_are_listed_at_crate_root() {
    let fitter = DocumentFitter::default();
    assert_eq!(KNOWN_PROVIDER_PROFILES.len(), 5);
    for builtin in KNOWN_PROVIDER_PROFILES {
        assert_eq!(fitter.registry().get(builtin.provider), *builtin);
    }
}

#[test]
fn test_output_never_exceeds_input_under_overrides() {
    let mut profile = ProviderRegistry::new().get(Provider::Azure);
    if let Some(split) = profile.split.as_mut() {
        split.must_split_threshold = 500;
    }
    let config = FitterConfig {
        providers: vec![profile],
        ..FitterConfig::default()
    };
    assert!(DocumentFitter::new(config).is_err());

    // Smallest accepted threshold: just above the hard ceiling
    let mut profile = ProviderRegistry::new().get(Provider::Azure);
    profile.hard_char_ceiling = 600;
    if let Some(split) = profile.split.as_mut() {
        split.must_split_threshold = 601;
        split.split_ceiling = 600;
        split.section_chars = 200;
    }
    let config = FitterConfig {
        providers: vec![profile],
        ..FitterConfig::default()
    };
    let fitter = DocumentFitter::new(config).unwrap();

    let doc = lines('p', 10);
    let result = fitter.fit(FitRequest::new(&doc, "azure").with_token_ceiling(100));
    assert!(result.optimized_size <= result.original_size);
    assert!(result.optimized_size <= 600);
}

//! Sectioned split for strict hard-limit providers.
//!
//! Used when a document is so large that keeping only its head would drop
//! most of the content indiscriminately. The document is partitioned into
//! sections, a high-value subset is selected and reassembled under a
//! provenance banner.

use crate::budget::limits::{Provider, SplitLimits};
use crate::config::FitterConfig;
use crate::error::FitError;
use crate::fitter::banner::{split_banner, MIDDLE_TRUNCATED_MARKER, REMAINDER_TRUNCATED_MARKER};
use crate::fitter::segmenter::{DocumentSegmenter, Section};
use crate::fitter::selection::{select_sections, KeywordMatcher, SelectionPolicy};
use crate::fitter::text::{char_len, head_chars, tail_chars};
use crate::fitter::truncate::truncate_with_banner;
use crate::fitter::types::{FitPath, Outcome};

/// Partition, select and reassemble `document` under `limits.split_ceiling`.
pub(crate) fn sectioned_split(
    document: &str,
    original_chars: usize,
    provider: Provider,
    limits: &SplitLimits,
    config: &FitterConfig,
    matcher: &KeywordMatcher,
) -> Result<Outcome, FitError> {
    let sections = DocumentSegmenter::new(limits.section_chars).segment(document);
    let policy = SelectionPolicy {
        split_ceiling: limits.split_ceiling,
        keyword_fill_ratio: config.keyword_fill_ratio,
        filler_fill_ratio: config.filler_fill_ratio,
        max_filler_sections: config.max_filler_sections,
    };
    let selection = select_sections(&sections, &policy, matcher);

    if selection.indices.is_empty() {
        tracing::warn!("Sectioning produced nothing usable, truncating head instead");
        let text = truncate_with_banner(
            document,
            original_chars,
            limits.split_ceiling,
            provider,
            config.truncation_safety_margin,
        )?;
        return Ok(Outcome::truncated(text, FitPath::SectionedSplit));
    }

    let selected: Vec<&Section<'_>> = selection
        .indices
        .iter()
        .filter_map(|idx| sections.get(*idx))
        .collect();
    let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
        return Err(FitError::NoSections);
    };

    let banner = split_banner(original_chars, sections.len(), selected.len());
    let assembled = assemble(&banner, &selected);
    let assembled_chars = char_len(&assembled);

    tracing::info!(
        "Split document into {} sections, kept {} ({} chars assembled)",
        sections.len(),
        selected.len(),
        assembled_chars
    );

    let text = if assembled_chars <= limits.split_ceiling {
        assembled
    } else {
        let prefix_chars = char_len(&banner) + first.chars + config.head_margin_chars;
        let suffix_chars = config.tail_keep_chars.min(last.chars);
        clamp_three_part(
            &assembled,
            prefix_chars,
            suffix_chars,
            limits.split_ceiling,
            config.min_middle_chars,
        )?
    };

    Ok(Outcome {
        text,
        truncated: true,
        path: FitPath::SectionedSplit,
        sections: Some((sections.len(), selected.len())),
    })
}

/// Banner followed by the selected sections, each starting on its own line.
fn assemble(banner: &str, selected: &[&Section<'_>]) -> String {
    let capacity = banner.len() + selected.iter().map(|s| s.text.len() + 1).sum::<usize>();
    let mut text = String::with_capacity(capacity);
    text.push_str(banner);
    for section in selected {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(section.text);
    }
    text
}

/// Fit `assembled` under `ceiling` by cutting its middle.
///
/// Keeps the first `prefix_chars` plus as much following text as fits, then
/// the middle marker, then the last `suffix_chars`. With less than
/// `min_middle_chars` of room for the middle, falls back to head truncation.
fn clamp_three_part(
    assembled: &str,
    prefix_chars: usize,
    suffix_chars: usize,
    ceiling: usize,
    min_middle_chars: usize,
) -> Result<String, FitError> {
    let marker_chars = char_len(MIDDLE_TRUNCATED_MARKER);
    let fixed = prefix_chars + suffix_chars + marker_chars;

    if fixed + min_middle_chars > ceiling {
        tracing::warn!(
            "Not enough room for a middle section ({} fixed of {} chars), truncating head",
            fixed,
            ceiling
        );
        let trailing_chars = char_len(REMAINDER_TRUNCATED_MARKER);
        if ceiling <= trailing_chars {
            return Err(FitError::NoRoomForContent {
                banner_chars: trailing_chars,
                ceiling_chars: ceiling,
            });
        }
        let mut text = head_chars(assembled, ceiling - trailing_chars).to_string();
        text.push_str(REMAINDER_TRUNCATED_MARKER);
        return Ok(text);
    }

    let head = head_chars(assembled, ceiling - suffix_chars - marker_chars);
    let tail = tail_chars(assembled, suffix_chars);

    let mut text = String::with_capacity(head.len() + MIDDLE_TRUNCATED_MARKER.len() + tail.len());
    text.push_str(head);
    text.push_str(MIDDLE_TRUNCATED_MARKER);
    text.push_str(tail);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FitterConfig {
        FitterConfig::default()
    }

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(&config().keywords).unwrap()
    }

    fn limits(split_ceiling: usize, section_chars: usize) -> SplitLimits {
        SplitLimits {
            must_split_threshold: split_ceiling * 2,
            split_ceiling,
            section_chars,
        }
    }

    /// Paragraph lines of exactly 100 chars (newline included).
    fn line(fill: char) -> String {
        let mut line: String = std::iter::repeat(fill).take(99).collect();
        line.push('\n');
        line
    }

    #[test]
    fn keeps_head_keyword_and_tail_sections() {
        let mut doc = String::new();
        doc.push_str(&line('a').repeat(10)); // section 0
        for _ in 0..20 {
            doc.push_str(&line('b').repeat(10)); // filler sections
        }
        doc.push_str("Test senaryosu: login must work\n");
        doc.push_str(&line('c').repeat(9)); // keyword section
        doc.push_str(&line('z').repeat(10)); // tail

        let original = char_len(&doc);
        let outcome = sectioned_split(
            &doc,
            original,
            Provider::Azure,
            &limits(10_000, 1_000),
            &config(),
            &matcher(),
        )
        .unwrap();

        assert!(outcome.truncated);
        assert_eq!(outcome.path, FitPath::SectionedSplit);
        assert!(outcome.text.contains("Test senaryosu"));
        assert!(outcome.text.starts_with("\n## DOCUMENT INFO"));
        assert!(outcome.text.contains(&line('a')));
        assert!(outcome.text.ends_with(&line('z')));

        let (total, selected) = outcome.sections.unwrap();
        assert_eq!(total, 23);
        // head + 3 fillers + keyword + tail
        assert_eq!(selected, 6);
        assert!(char_len(&outcome.text) <= 10_000);
    }

    #[test]
    fn clamps_oversized_assembly_to_ceiling() {
        let doc = line('a').repeat(200);
        let original = char_len(&doc);
        // The 5_000-char head section plus the banner overflows the 5_100
        // ceiling, leaving no room for a middle.
        let outcome = sectioned_split(
            &doc,
            original,
            Provider::Azure,
            &limits(5_100, 5_000),
            &config(),
            &matcher(),
        )
        .unwrap();

        assert_eq!(char_len(&outcome.text), 5_100);
        assert!(outcome.text.ends_with(REMAINDER_TRUNCATED_MARKER));
        assert_eq!(outcome.sections, Some((4, 1)));
    }

    #[test]
    fn empty_selection_falls_back_to_banner_truncation() {
        let outcome = sectioned_split(
            "",
            0,
            Provider::Azure,
            &limits(10_000, 1_000),
            &config(),
            &matcher(),
        )
        .unwrap();

        assert_eq!(outcome.path, FitPath::SectionedSplit);
        assert!(outcome.truncated);
        assert_eq!(outcome.sections, None);
        assert!(outcome.text.starts_with("\n## DOCUMENT INFO"));
        assert!(outcome.text.ends_with(REMAINDER_TRUNCATED_MARKER));
    }

    #[test]
    fn three_part_clamp_keeps_head_and_tail() {
        let assembled = format!("{}{}{}", "H".repeat(2_000), "M".repeat(10_000), "T".repeat(2_000));
        let text = clamp_three_part(&assembled, 1_000, 2_000, 6_000, 1_000).unwrap();

        assert_eq!(char_len(&text), 6_000);
        assert!(text.starts_with(&"H".repeat(2_000)));
        assert!(text.ends_with(&"T".repeat(2_000)));
        assert!(text.contains(MIDDLE_TRUNCATED_MARKER));
    }

    #[test]
    fn three_part_clamp_falls_back_to_head_truncation() {
        let assembled = "x".repeat(10_000);
        let text = clamp_three_part(&assembled, 4_000, 2_000, 6_000, 1_000).unwrap();

        assert_eq!(char_len(&text), 6_000);
        assert!(text.ends_with(REMAINDER_TRUNCATED_MARKER));
        assert!(!text.contains(MIDDLE_TRUNCATED_MARKER));
    }

    #[test]
    fn assemble_separates_sections_without_trailing_newline() {
        let first = Section {
            index: 0,
            text: "chunk",
            chars: 5,
        };
        let last = Section {
            index: 3,
            text: "tail",
            chars: 4,
        };
        let text = assemble("banner\n", &[&first, &last]);
        assert_eq!(text, "banner\nchunk\ntail");
    }
}

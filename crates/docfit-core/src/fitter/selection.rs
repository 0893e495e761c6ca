//! Greedy section selection for the sectioned split.
//!
//! The head and tail sections carry the introduction and the conclusion, so
//! they are always kept when they fit. Middle sections are taken in document
//! order, keyword matches first in line for the remaining budget.

use regex::{Regex, RegexBuilder};

use crate::fitter::segmenter::Section;

/// Case-insensitive matcher over a fixed keyword list.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    /// Build a matcher; keywords are matched literally.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self::empty());
        }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Matcher that never matches.
    pub fn empty() -> Self {
        Self { pattern: None }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(false, |pattern| pattern.is_match(text))
    }
}

/// Thresholds for choosing middle sections.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPolicy {
    /// Total selected size (chars) the head, middle and tail must stay under
    pub split_ceiling: usize,
    /// Share of the ceiling keyword sections may fill
    pub keyword_fill_ratio: f64,
    /// Share of the ceiling filler sections may fill
    pub filler_fill_ratio: f64,
    /// Maximum number of non-keyword middle sections
    pub max_filler_sections: usize,
}

impl SelectionPolicy {
    fn keyword_limit(&self) -> usize {
        (self.split_ceiling as f64 * self.keyword_fill_ratio) as usize
    }

    fn filler_limit(&self) -> usize {
        (self.split_ceiling as f64 * self.filler_fill_ratio) as usize
    }
}

/// Sections chosen for reassembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Indices in reassembly order: head, middle sections in scan order, tail
    pub indices: Vec<usize>,
    pub keyword_sections: usize,
    pub filler_sections: usize,
    /// Sum of selected section sizes in chars
    pub total_chars: usize,
}

/// Choose which sections to keep.
///
/// 1. Section 0 is always selected
/// 2. Middle sections are scanned in order: keyword sections are taken while
///    the total stays below the keyword limit, other sections while fewer
///    than `max_filler_sections` were taken and the total stays below the
///    filler limit; scanning stops once the keyword limit is reached
/// 3. The last section is appended if the total stays below the split ceiling
pub fn select_sections(
    sections: &[Section<'_>],
    policy: &SelectionPolicy,
    matcher: &KeywordMatcher,
) -> Selection {
    let mut selection = Selection {
        indices: Vec::new(),
        keyword_sections: 0,
        filler_sections: 0,
        total_chars: 0,
    };

    let Some(head) = sections.first() else {
        return selection;
    };
    selection.indices.push(head.index);
    selection.total_chars = head.chars;

    if sections.len() < 2 {
        return selection;
    }

    let keyword_limit = policy.keyword_limit();
    let filler_limit = policy.filler_limit();
    let last = &sections[sections.len() - 1];

    for section in &sections[1..sections.len() - 1] {
        if selection.total_chars >= keyword_limit {
            break;
        }

        let candidate_total = selection.total_chars + section.chars;
        if matcher.matches(section.text) {
            if candidate_total < keyword_limit {
                selection.indices.push(section.index);
                selection.total_chars = candidate_total;
                selection.keyword_sections += 1;
            }
        } else if selection.filler_sections < policy.max_filler_sections
            && candidate_total < filler_limit
        {
            selection.indices.push(section.index);
            selection.total_chars = candidate_total;
            selection.filler_sections += 1;
        }
    }

    if selection.total_chars + last.chars < policy.split_ceiling {
        selection.indices.push(last.index);
        selection.total_chars += last.chars;
    }

    tracing::debug!(
        "Selected {} of {} sections ({} keyword, {} filler, {} chars)",
        selection.indices.len(),
        sections.len(),
        selection.keyword_sections,
        selection.filler_sections,
        selection.total_chars
    );

    selection
}

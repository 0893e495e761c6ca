//! Provenance banners and truncation markers.
//!
//! Banners are read by both humans and the receiving model, so they state
//! plainly what was kept and what was dropped.

use crate::budget::limits::Provider;

/// Appended after a head-truncated document.
pub const REMAINDER_TRUNCATED_MARKER: &str = "\n\n... (remainder truncated due to document size)";

/// Inserted between the kept head and tail of a clamped split payload.
pub const MIDDLE_TRUNCATED_MARKER: &str = "\n\n[... middle truncated ...]\n\n";

/// Appended to the emergency fallback slice.
pub const PROCESSING_ERROR_MARKER: &str = "\n\n(truncated due to a document processing error)";

/// Returned when even the emergency fallback fails.
pub const APOLOGY_TEXT: &str =
    "The document could not be prepared for AI processing. Please try again with a smaller document.";

/// Share of `original` represented by `kept`, in percent with one decimal.
pub fn kept_percentage(kept: usize, original: usize) -> f64 {
    if original == 0 {
        return 100.0;
    }
    let pct = kept as f64 / original as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Banner prepended by simple head truncation.
pub fn truncation_banner(provider: Provider, original_chars: usize, kept_chars: usize) -> String {
    format!(
        "\n## DOCUMENT INFO\n\
         This document was originally {original} characters long and exceeds the {provider} size limit.\n\
         The first {kept} characters of the document are included below.\n\n\
         Kept: {pct:.1}%\n\n",
        original = original_chars,
        provider = provider,
        kept = kept_chars,
        pct = kept_percentage(kept_chars, original_chars),
    )
}

/// Banner prepended to a sectioned split payload.
pub fn split_banner(original_chars: usize, total_sections: usize, selected_sections: usize) -> String {
    format!(
        "\n## DOCUMENT INFO\n\
         This document ({original} characters) was divided into {total} sections; \
         {selected} of them are included below, chosen by position and relevance.\n\n",
        original = original_chars,
        total = total_sections,
        selected = selected_sections,
    )
}

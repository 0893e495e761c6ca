//! Simple head truncation and the emergency fallback.

use crate::budget::limits::{Provider, ProviderProfile};
use crate::error::FitError;
use crate::fitter::banner::{
    truncation_banner, PROCESSING_ERROR_MARKER, REMAINDER_TRUNCATED_MARKER,
};
use crate::fitter::text::{char_len, head_chars};
use crate::fitter::types::{FitPath, Outcome};

/// Fit a document under the provider's hard ceiling by keeping its head.
///
/// Documents already under the hard ceiling are returned unchanged.
pub(crate) fn simple_truncate(
    document: &str,
    original_chars: usize,
    profile: &ProviderProfile,
    safety_margin: usize,
) -> Result<Outcome, FitError> {
    let ceiling = profile.hard_char_ceiling;
    if original_chars <= ceiling {
        tracing::info!(
            "Document within {} hard ceiling ({} <= {} chars), leaving unchanged",
            profile.provider,
            original_chars,
            ceiling
        );
        return Ok(Outcome::unchanged(document, FitPath::SimpleTruncate));
    }

    tracing::warn!(
        "Document too large for {} ({} > {} chars), truncating head",
        profile.provider,
        original_chars,
        ceiling
    );
    let text = truncate_with_banner(
        document,
        original_chars,
        ceiling,
        profile.provider,
        safety_margin,
    )?;
    tracing::info!("Truncated document to {} chars", char_len(&text));
    Ok(Outcome::truncated(text, FitPath::SimpleTruncate))
}

/// Banner + as much of the document head as fits + trailing marker.
///
/// The result is at most `ceiling - safety_margin` chars.
pub(crate) fn truncate_with_banner(
    document: &str,
    original_chars: usize,
    ceiling: usize,
    provider: Provider,
    safety_margin: usize,
) -> Result<String, FitError> {
    let reserve = char_len(REMAINDER_TRUNCATED_MARKER) + safety_margin;

    // The banner states the kept size, which depends on the banner's own
    // length. A smaller kept size never lengthens the banner, so sizing with
    // a draft is enough.
    let draft = truncation_banner(provider, original_chars, ceiling.saturating_sub(reserve));
    let draft_chars = char_len(&draft);
    if draft_chars + reserve >= ceiling {
        return Err(FitError::NoRoomForContent {
            banner_chars: draft_chars,
            ceiling_chars: ceiling,
        });
    }

    let keep = ceiling - reserve - draft_chars;
    let banner = truncation_banner(provider, original_chars, keep);
    let head = head_chars(document, keep);

    let mut text =
        String::with_capacity(banner.len() + head.len() + REMAINDER_TRUNCATED_MARKER.len());
    text.push_str(&banner);
    text.push_str(head);
    text.push_str(REMAINDER_TRUNCATED_MARKER);
    Ok(text)
}

/// Fixed-size head of the original, tagged as a processing-error truncation.
///
/// Never longer than `limit`, `hard_ceiling` or the original itself.
pub(crate) fn emergency_truncate(
    document: &str,
    original_chars: usize,
    limit: usize,
    hard_ceiling: usize,
) -> Result<String, FitError> {
    let budget = limit.min(hard_ceiling).min(original_chars);
    if budget == 0 {
        return Err(FitError::EmptyFallback);
    }

    let marker_chars = char_len(PROCESSING_ERROR_MARKER);
    if budget > marker_chars {
        let mut text = head_chars(document, budget - marker_chars).to_string();
        text.push_str(PROCESSING_ERROR_MARKER);
        Ok(text)
    } else {
        Ok(head_chars(document, budget).to_string())
    }
}

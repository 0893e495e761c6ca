//! Classification of upstream "payload too large" errors.

use crate::budget::limits::{Provider, ProviderRegistry};

/// Phrases providers use when rejecting an oversized request.
const OVERFLOW_PATTERNS: &[&str] = &[
    "string too long",
    "maximum context length",
    "context_length_exceeded",
];

/// Whether an upstream error message reports a context/size overflow.
pub fn is_context_overflow_error(message: &str) -> bool {
    let message = message.to_lowercase();
    OVERFLOW_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// User-facing explanation for a rejected oversized document.
pub fn overflow_user_message(provider: Provider, document_chars: usize) -> String {
    let limit = ProviderRegistry::new().get(provider).absolute_char_limit;
    format!(
        "The document is too large for {provider}. {provider} accepts at most {limit} characters \
         per request, but the document has {chars} characters. Please shorten the document or \
         split it into smaller parts.",
        provider = provider,
        limit = limit,
        chars = document_chars,
    )
}

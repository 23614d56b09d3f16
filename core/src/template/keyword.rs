//! Keyword inclusion predicate gating message acceptance per order.

/// Returns `true` when the message passes the order's keyword filter.
///
/// An empty keyword list accepts every message; otherwise at least one
/// keyword must appear in the body as a case-insensitive substring.
pub fn passes_keyword_filter(body: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let body = body.to_lowercase();
    keywords.iter().any(|kw| body.contains(&kw.to_lowercase()))
}

//! Query normalization.

/// Normalizes a raw user query into an index term.
///
/// Whitespace, hyphens and periods are removed and `&` becomes `AND`. Returns
/// `None` when nothing is left or when a character outside `[A-Za-z0-9.&]`
/// survives; callers answer that with an empty result, not an error.
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let term: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect::<String>()
        .replace('&', "AND");

    if term.is_empty() || !term.chars().all(is_allowed) {
        return None;
    }
    Some(term)
}

/// Splits a raw query into lowercase word prefixes for full-text search.
///
/// The special-character rule of [`normalize`] applies; words are the
/// alphanumeric runs of the raw text, so `M&M` gives `["m", "m"]` and
/// `reliance industries` keeps both words.
#[must_use]
pub fn search_terms(raw: &str) -> Option<Vec<String>> {
    normalize(raw)?;
    let terms: Vec<String> = words(raw).collect();
    (!terms.is_empty()).then_some(terms)
}

/// Lowercased alphanumeric runs of `text`.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '&'
}

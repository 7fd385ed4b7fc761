//! Term-frequency scoring used by the in-memory store's text search.

use crate::domain::Listing;

const NAME_WEIGHT: f32 = 2.0;
const BODY_WEIGHT: f32 = 1.0;

/// Split `text` into lower-case alphanumeric terms.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn occurrences(field: &str, terms: &[String]) -> usize {
    tokenize(field)
        .iter()
        .filter(|token| terms.contains(token))
        .count()
}

/// Weighted count of query-term occurrences in `listing`.
///
/// Name matches weigh double; description, location, and tag matches count
/// once. A score of zero means the listing does not match.
pub(crate) fn score(listing: &Listing, terms: &[String]) -> f32 {
    if terms.is_empty() {
        return 0.0;
    }
    let name = occurrences(listing.name(), terms);
    let body = occurrences(listing.description(), terms)
        + occurrences(listing.location(), terms)
        + listing
            .tags()
            .iter()
            .map(|tag| occurrences(tag, terms))
            .sum::<usize>();
    name as f32 * NAME_WEIGHT + body as f32 * BODY_WEIGHT
}

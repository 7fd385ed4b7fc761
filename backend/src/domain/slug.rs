//! URL slugs derived from listing names.

use std::collections::HashSet;

/// Slug used when a name has no ASCII alphanumeric characters.
const FALLBACK_SLUG: &str = "stay";

/// Lower-case `name`, collapse each run of non-alphanumeric characters to a
/// single `-`, and strip leading and trailing hyphens.
///
/// # Examples
/// ```
/// use backend::domain::slugify;
///
/// assert_eq!(slugify("  Beach House!! (Cornwall) "), "beach-house-cornwall");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        slug
    }
}

/// Whether `candidate` is `base` or `base-N` for some (possibly empty) run
/// of digits `N`.
pub fn is_slug_variant(base: &str, candidate: &str) -> bool {
    match candidate.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('-')
            .is_some_and(|digits| digits.chars().all(|ch| ch.is_ascii_digit())),
        None => false,
    }
}

/// Pick a free slug for `base` given the slugs already stored under that
/// prefix.
///
/// `base` itself is returned when free; otherwise the smallest `base-N`
/// with `N >= 2` that is not taken.
///
/// ```
/// use backend::domain::next_available_slug;
///
/// assert_eq!(next_available_slug("beach-house", &["beach-house-2"]), "beach-house");
/// assert_eq!(
///     next_available_slug("beach-house", &["beach-house", "beach-house-3"]),
///     "beach-house-2"
/// );
/// ```
pub fn next_available_slug<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    let taken: HashSet<&str> = existing
        .iter()
        .map(AsRef::as_ref)
        .filter(|slug| is_slug_variant(base, slug))
        .collect();
    if !taken.contains(base) {
        return base.to_owned();
    }
    let mut n = 2_u64;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

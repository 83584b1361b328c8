//! Recipe ids.
//!
//! An id is one or more runs of `[a-z0-9]` joined by single hyphens:
//! `chicken-soup`, `pho`, `7-layer-dip`. Ids are derived from a recipe's name
//! with [`slugify`] and checked on the way in with [`is_valid_id`].

/// Derives a URL-safe id from a display name.
///
/// Non-ASCII text is transliterated first (`"Борщ"` → `borshch`), `&` reads
/// as `and`, and every run of remaining punctuation or whitespace collapses
/// into a single hyphen. The result either satisfies [`is_valid_id`] or is
/// empty, which only happens for names with nothing letter- or digit-like in
/// them.
///
/// ```
/// assert_eq!(pantry::slugify("Tomato Soup"), "tomato-soup");
/// assert_eq!(pantry::slugify("  Mac & Cheese!! "), "mac-and-cheese");
/// assert_eq!(pantry::slugify("Crème brûlée"), "creme-brulee");
/// ```
pub fn slugify(name: &str) -> String {
    slug::slugify(name.replace('&', " and "))
}

/// Reports whether `id` matches the id grammar.
///
/// Rejects the empty string, uppercase, leading/trailing hyphens and
/// consecutive hyphens.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .split('-')
            .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

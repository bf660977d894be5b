//! Identifier slugs derived from human titles.
//!
//! Two rules live here and they are not interchangeable:
//! - [`sanitize`] produces filename slugs (punctuation stripped)
//! - [`simple_id`] produces record identities for lessons and modules

/// Derive a filename slug from a title.
///
/// Lowercases, drops every character that is not a letter, digit or
/// whitespace, joins the remaining words with single underscores and trims
/// underscores from both ends.
///
/// `"Grand Central Dispatch (GCD): Basics"` becomes
/// `"grand_central_dispatch_gcd_basics"`.
pub fn sanitize(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('_')
        .to_string()
}

/// Derive the record id of a lesson or module from its title.
///
/// Lowercase, with every space replaced by an underscore. Punctuation is kept.
pub fn simple_id(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

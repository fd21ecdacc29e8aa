//! Name normalization used for collision detection

/// Normalize a display name for duplicate detection.
///
/// Trims, collapses inner whitespace and lowercases. The result is only a
/// detection key; it never replaces the stored display name.
///
/// # Examples
///
/// ```
/// use lineage_domain::normalize_name;
///
/// assert_eq!(normalize_name("  Ada   LOVELACE "), "ada lovelace");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

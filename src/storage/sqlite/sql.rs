//! SQL helper functions for the `SQLite` store.

/// Escapes SQL LIKE wildcards so user input matches literally.
///
/// Uses `\` as the escape character, so the LIKE clause needs `ESCAPE '\'`.
///
/// # Examples
///
/// ```
/// use wordvault::storage::sqlite::escape_like_wildcards;
///
/// assert_eq!(escape_like_wildcards("100%"), "100\\%");
/// assert_eq!(escape_like_wildcards("snake_case"), "snake\\_case");
/// assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
/// ```
#[must_use]
pub fn escape_like_wildcards(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            },
            _ => result.push(c),
        }
    }
    result
}

/// Builds a `LIKE` pattern matching any value that contains `needle`.
#[must_use]
pub fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like_wildcards(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_like_wildcards("apple"), "apple");
        assert_eq!(escape_like_wildcards(""), "");
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(contains_pattern("fruit"), "%fruit%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
    }
}

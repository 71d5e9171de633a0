/// Longest subdomain derived from a brand name, before any `-N` suffix.
pub const MAX_SLUG_LEN: usize = 30;

/// Lower-cases `name`, collapses every run of non-alphanumerics into one hyphen and
/// trims hyphens from both ends. Falls back to `store`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "store".to_string()
    } else {
        slug.to_string()
    }
}

/// Subdomain candidate for the `attempt`-th try: `base`, then `base-2`, `base-3`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Acme"), "acme");
        assert_eq!(slugify("  Tom & Jerry's   Shop!! "), "tom-jerry-s-shop");
        assert_eq!(slugify("Café Olé"), "caf-ol");
        assert_eq!(slugify("***"), "store");
    }

    #[test]
    fn test_slug_is_truncated_without_trailing_hyphen() {
        let slug = slugify("The Extremely Long Brand Name Of A Shop");
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert_eq!(slug, "the-extremely-long-brand-name");
    }

    #[test]
    fn test_candidates() {
        assert_eq!(candidate("acme", 1), "acme");
        assert_eq!(candidate("acme", 2), "acme-2");
    }
}

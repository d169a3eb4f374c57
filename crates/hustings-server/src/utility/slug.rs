//! URL slug derivation for article titles.

/// Longest slug produced by [`slugify`].
pub const MAX_SLUG_LENGTH: usize = 96;

/// Derives a URL slug from free text.
///
/// Keeps lower-cased ASCII alphanumerics and joins every run of other
/// characters into a single dash. Leading and trailing dashes are dropped.
/// Returns an empty string when nothing usable remains.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len().min(MAX_SLUG_LENGTH));
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }

        if slug.len() >= MAX_SLUG_LENGTH {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_owned()
}

/// Returns whether the value is already a well-formed slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && value.len() <= MAX_SLUG_LENGTH && slugify(value) == value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_words_with_dashes() {
        assert_eq!(slugify("Town Hall: Q&A Night"), "town-hall-q-a-night");
        assert_eq!(slugify("  Vote   Early  "), "vote-early");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(slugify("Café élection 2026"), "caf-lection-2026");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn caps_length() {
        let slug = slugify(&"word ".repeat(100));
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn validates_slugs() {
        assert!(is_valid_slug("town-hall-2026"));
        assert!(!is_valid_slug("Town-Hall"));
        assert!(!is_valid_slug("town--hall"));
        assert!(!is_valid_slug(""));
    }
}

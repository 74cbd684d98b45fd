use regex::Regex;

/// Longest model query forwarded to providers.
pub const MAX_QUERY_CHARS: usize = 100;

/// Cleans a raw model query before it reaches any provider prompt: strips
/// everything outside letters, digits, spaces and hyphens, collapses runs
/// of spaces, trims, and truncates to [`MAX_QUERY_CHARS`]. Casing is kept
/// for prompt readability. Returns `None` when nothing usable remains.
pub fn sanitize_model_query(raw: &str) -> Option<String> {
    let cleaner = Regex::new(r"[^A-Za-z0-9\- ]").unwrap();
    let mut sanitized = cleaner.replace_all(raw, "").to_string();

    let spacer = Regex::new(r" +").unwrap();
    sanitized = spacer.replace_all(&sanitized, " ").trim().to_string();

    if sanitized.len() > MAX_QUERY_CHARS {
        sanitized.truncate(MAX_QUERY_CHARS);
        sanitized = sanitized.trim_end().to_string();
    }

    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_clean_queries_through() {
        assert_eq!(
            sanitize_model_query("Toyota Camry").as_deref(),
            Some("Toyota Camry")
        );
        assert_eq!(
            sanitize_model_query("Mercedes-AMG GT 63").as_deref(),
            Some("Mercedes-AMG GT 63")
        );
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(
            sanitize_model_query("Citro\u{eb}n C4; DROP TABLE cars--").as_deref(),
            Some("Citron C4 DROP TABLE cars--")
        );
        assert_eq!(
            sanitize_model_query("  BMW   \t M3!!  ").as_deref(),
            Some("BMW M3")
        );
    }

    #[test]
    fn rejects_queries_with_nothing_usable() {
        assert_eq!(sanitize_model_query(""), None);
        assert_eq!(sanitize_model_query("   "), None);
        assert_eq!(sanitize_model_query("!@#$%^&*()"), None);
    }

    #[test]
    fn truncates_very_long_queries() {
        let long = "A".repeat(240);
        let sanitized = sanitize_model_query(&long).unwrap();
        assert_eq!(sanitized.len(), MAX_QUERY_CHARS);
    }
}

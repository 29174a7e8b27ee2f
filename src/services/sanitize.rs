use regex::Regex;
use std::sync::OnceLock;

const MAX_STORED_CHARS: usize = 10_000;

fn markup_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"<[^>]*>",
            r"(?i)javascript:",
            r"(?i)on\w+\s*=",
            r"(?i)data:text/html",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid regex"))
        .collect()
    })
}

/// Strip HTML tags and script vectors from free text before it is stored
/// or echoed back, then cap its length.
pub fn sanitize_text(text: &str) -> String {
    let mut sanitized = text.to_string();
    for pattern in markup_patterns() {
        sanitized = pattern.replace_all(&sanitized, "").into_owned();
    }

    truncate_chars(&sanitized, MAX_STORED_CHARS).trim().to_string()
}

/// Sanitize a single form field and cap it at `max_len` characters.
pub fn validate_text_input(text: &str, max_len: usize) -> String {
    truncate_chars(&sanitize_text(text), max_len).to_string()
}

/// Sanitize a list of tags, keeping at most `max_items` non-empty entries.
pub fn validate_string_array(items: &[String], max_items: usize) -> Vec<String> {
    items
        .iter()
        .take(max_items)
        .map(|item| validate_text_input(item, 100))
        .filter(|item| !item.is_empty())
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_handlers() {
        assert_eq!(sanitize_text("<script>alert(1)</script>Paris"), "alert(1)Paris");
        assert_eq!(
            sanitize_text("<img src=x onerror=alert(1)> Lyon"),
            "Lyon"
        );
        assert_eq!(sanitize_text("JavaScript:void(0) Nice"), "void(0) Nice");
        assert_eq!(sanitize_text("a onclick = b"), "a  b");
    }

    #[test]
    fn test_every_markup_pattern_is_active() {
        assert_eq!(markup_patterns().len(), 4);
        assert_eq!(
            sanitize_text("<a href=\"data:text/html,x\">Rome</a>"),
            "Rome"
        );
        assert_eq!(sanitize_text("data:text/html;base64 Turin"), ";base64 Turin");
    }

    #[test]
    fn test_truncates_by_characters() {
        let long = "가".repeat(12_000);
        assert_eq!(sanitize_text(&long).chars().count(), 10_000);
        assert_eq!(validate_text_input("서울특별시", 2), "서울");
    }

    #[test]
    fn test_string_array_drops_empty_entries() {
        let items = vec![
            "hiking".to_string(),
            "<br>".to_string(),
            "jazz".to_string(),
            "wine".to_string(),
        ];
        assert_eq!(validate_string_array(&items, 3), vec!["hiking", "jazz"]);
    }
}

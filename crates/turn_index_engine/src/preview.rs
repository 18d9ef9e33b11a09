const TRUNCATED_MARKER: &str = "...";

/// Collapses whitespace runs to single spaces and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max_chars` characters, the last three of which
/// become the truncation marker. Counts characters, not bytes.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(TRUNCATED_MARKER.len());
    let truncated: String = text.chars().take(keep).collect();
    format!("{truncated}{TRUNCATED_MARKER}")
}

/// Normalized, bounded preview for a turn's raw text.
///
/// Text shorter than `min_chars` with nothing alphanumeric in it (empty,
/// stray punctuation, icon glyphs) is replaced by `placeholder`, so no row
/// ever renders blank. Short real content such as "4" or "ok" is kept.
pub fn build_preview(raw: &str, max_chars: usize, min_chars: usize, placeholder: &str) -> String {
    let normalized = normalize_whitespace(raw);
    if is_blank_preview(&normalized, min_chars) {
        return placeholder.to_string();
    }
    truncate_preview(&normalized, max_chars)
}

fn is_blank_preview(normalized: &str, min_chars: usize) -> bool {
    normalized.chars().count() < min_chars && !normalized.chars().any(char::is_alphanumeric)
}

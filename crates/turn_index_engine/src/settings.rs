use std::time::Duration;

/// Thresholds for the extraction heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSettings {
    /// Generic floor a candidate's text must exceed.
    pub min_candidate_chars: usize,
    /// Text length marking an element as "substantial" for the general
    /// fallback scan and the parity tier.
    pub substantial_text_chars: usize,
    /// General-fallback candidates must have fewer descendant elements.
    pub max_fallback_descendants: usize,
    /// Ancestors inspected (beyond the element) for role attributes.
    pub max_ancestor_depth: usize,
    /// A text-selector match must exceed this many characters to be used.
    pub text_selector_min_chars: usize,
    pub preview_max_chars: usize,
    pub min_preview_chars: usize,
    pub placeholder: String,
    pub dedupe_prefix_chars: usize,
    /// A text opening with a rejected fragment is a banner only while at
    /// most this many characters follow the fragment.
    pub banner_tail_chars: usize,
    /// At or above this length a turn reads as an assistant answer.
    pub long_text_chars: usize,
    /// At or below this length a question-ending turn reads as a user prompt.
    pub short_question_chars: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            min_candidate_chars: 20,
            substantial_text_chars: 50,
            max_fallback_descendants: 50,
            max_ancestor_depth: 4,
            text_selector_min_chars: 10,
            preview_max_chars: 100,
            min_preview_chars: 3,
            placeholder: "Message".to_string(),
            dedupe_prefix_chars: 50,
            banner_tail_chars: 40,
            long_text_chars: 500,
            short_question_chars: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    pub debounce: Duration,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSettings {
    pub background: String,
    pub transition: String,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            background: "#dbeafe".to_string(),
            transition: "background-color 0.3s ease".to_string(),
        }
    }
}

//! Static registry of supported chat platforms.
//!
//! Each entry bundles the hostname rules that select it with the selector
//! heuristics the extractor and watcher run against that platform's markup.
//! Adding a platform means adding one [`PlatformProfile`] to [`REGISTRY`].

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    ChatGpt,
    Claude,
    Gemini,
    DeepSeek,
    Poe,
    You,
    Character,
    Mistral,
    HuggingFace,
    Lmsys,
    Unknown,
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            PlatformId::ChatGpt => "chatgpt",
            PlatformId::Claude => "claude",
            PlatformId::Gemini => "gemini",
            PlatformId::DeepSeek => "deepseek",
            PlatformId::Poe => "poe",
            PlatformId::You => "you",
            PlatformId::Character => "character",
            PlatformId::Mistral => "mistral",
            PlatformId::HuggingFace => "huggingface",
            PlatformId::Lmsys => "lmsys",
            PlatformId::Unknown => "unknown",
        };
        f.write_str(tag)
    }
}

/// How a candidate element earns its place before role classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRule {
    /// Trimmed text must be longer than the generic floor
    /// (`ExtractionSettings::min_candidate_chars`).
    MinTextLength,
    /// Elements carrying one of these attributes are accepted with any
    /// non-empty text; unlabelled elements must clear the generic floor.
    /// Used where markup labels every turn explicitly, so short turns
    /// ("Thanks!") survive.
    RoleAttribute(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRules {
    pub rule: ContentRule,
    /// Case-insensitive fragments that mark placeholder or system text
    /// (greeting banners, disclaimers, debug markers).
    pub rejected_fragments: &'static [&'static str],
}

impl ContentRules {
    pub const GENERIC: ContentRules = ContentRules {
        rule: ContentRule::MinTextLength,
        rejected_fragments: &[],
    };
}

#[derive(Debug, PartialEq, Eq)]
pub struct PlatformProfile {
    pub id: PlatformId,
    pub display_name: &'static str,
    /// Hostname substrings selecting this profile; empty for the fallback.
    pub host_patterns: &'static [&'static str],
    pub message_selectors: &'static [&'static str],
    pub user_indicator_selectors: &'static [&'static str],
    pub assistant_indicator_selectors: &'static [&'static str],
    pub text_selectors: &'static [&'static str],
    pub observation_root: Option<&'static str>,
    pub content_rules: ContentRules,
}

impl PlatformProfile {
    pub fn matches_host(&self, hostname: &str) -> bool {
        self.host_patterns
            .iter()
            .any(|pattern| hostname.contains(pattern))
    }
}

pub static CHATGPT: PlatformProfile = PlatformProfile {
    id: PlatformId::ChatGpt,
    display_name: "ChatGPT",
    host_patterns: &["chat.openai.com", "chatgpt.com"],
    message_selectors: &[
        "[data-message-author-role]",
        ".group\\/conversation-turn",
        ".group.w-full",
        "[data-testid*=\"conversation-turn\"]",
    ],
    user_indicator_selectors: &[
        "[data-message-author-role=\"user\"]",
        "img[alt*=\"User\"]",
        ".relative.p-1.rounded-sm",
    ],
    assistant_indicator_selectors: &[
        "[data-message-author-role=\"assistant\"]",
        "svg[class*=\"icon\"]",
        "[data-testid*=\"turn\"]",
        ".markdown",
    ],
    text_selectors: &["div[class*=\"markdown\"]", ".prose", "p", "div"],
    observation_root: Some("main"),
    content_rules: ContentRules {
        rule: ContentRule::RoleAttribute(&["data-message-author-role"]),
        rejected_fragments: &["chatgpt can make mistakes"],
    },
};

pub static CLAUDE: PlatformProfile = PlatformProfile {
    id: PlatformId::Claude,
    display_name: "Claude",
    host_patterns: &["claude.ai"],
    message_selectors: &[
        "[data-testid=\"message\"]",
        "[data-is-streaming]",
        "div[class*=\"font-claude\"]",
        ".flex.flex-col.gap-3",
        ".group.relative",
    ],
    user_indicator_selectors: &[
        "[data-is-streaming=\"false\"][class*=\"border\"]",
        ".bg-bg-300",
        "div[class*=\"user\"]",
    ],
    assistant_indicator_selectors: &[
        "[data-is-streaming]",
        ".font-claude",
        "div[class*=\"assistant\"]",
        "svg[class*=\"claude\"]",
    ],
    text_selectors: &[
        ".font-claude-message",
        ".prose",
        "p",
        "div[class*=\"text\"]",
        "span",
    ],
    observation_root: None,
    content_rules: ContentRules {
        rule: ContentRule::MinTextLength,
        rejected_fragments: &[
            "how can i help you today",
            "claude can make mistakes",
            "[debug]",
        ],
    },
};

pub static GEMINI: PlatformProfile = PlatformProfile {
    id: PlatformId::Gemini,
    display_name: "Gemini",
    host_patterns: &["gemini.google.com", "bard.google.com"],
    message_selectors: &[
        "[data-test-id*=\"conversation\"]",
        "message-content",
        ".conversation-container > div",
        "div[class*=\"message\"]",
        ".model-response-container",
    ],
    user_indicator_selectors: &[
        "[data-test-id=\"user-message\"]",
        ".user-input-container",
        "div[class*=\"user\"]",
    ],
    assistant_indicator_selectors: &[
        "[data-test-id*=\"model-response\"]",
        ".model-response-container",
        "div[class*=\"response\"]",
        "div[class*=\"assistant\"]",
    ],
    text_selectors: &[
        ".response-container-content",
        ".markdown-content",
        ".message-content",
        "p",
        "div",
    ],
    observation_root: None,
    content_rules: ContentRules {
        rule: ContentRule::MinTextLength,
        rejected_fragments: &["meet gemini, your personal ai assistant", "[debug]"],
    },
};

pub static DEEPSEEK: PlatformProfile = PlatformProfile {
    id: PlatformId::DeepSeek,
    display_name: "DeepSeek",
    host_patterns: &["chat.deepseek.com", "deepseek.com"],
    message_selectors: &[
        ".message-item",
        "[data-role]",
        ".chat-message",
        ".conversation-message",
    ],
    user_indicator_selectors: &["[data-role=\"user\"]", ".message-user", ".user-message"],
    assistant_indicator_selectors: &[
        "[data-role=\"assistant\"]",
        ".message-assistant",
        ".assistant-message",
        ".ai-message",
    ],
    text_selectors: &[".message-content", ".text-content", ".markdown", "p", "div"],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

pub static POE: PlatformProfile = PlatformProfile {
    id: PlatformId::Poe,
    display_name: "Poe",
    host_patterns: &["poe.com"],
    message_selectors: &[
        "[class*=\"Message_messageRow\"]",
        "[class*=\"message\"]",
        ".ChatMessageInputContainer",
        "div[class*=\"Message\"]",
    ],
    user_indicator_selectors: &[
        "[class*=\"Message_humanMessageBubble\"]",
        "[class*=\"human\"]",
        "[class*=\"user\"]",
    ],
    assistant_indicator_selectors: &[
        "[class*=\"Message_botMessageBubble\"]",
        "[class*=\"bot\"]",
        "[class*=\"assistant\"]",
    ],
    text_selectors: &[
        "[class*=\"Markdown\"]",
        "[class*=\"message\"] p",
        "div[class*=\"text\"]",
        "span",
    ],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

pub static YOU: PlatformProfile = PlatformProfile {
    id: PlatformId::You,
    display_name: "You.com",
    host_patterns: &["you.com"],
    message_selectors: &[
        "[data-testid*=\"message\"]",
        ".chat-message",
        ".message-container",
    ],
    user_indicator_selectors: &[
        "[data-testid=\"user-message\"]",
        ".user-message",
        "[class*=\"user\"]",
    ],
    assistant_indicator_selectors: &[
        "[data-testid*=\"ai-message\"]",
        ".ai-message",
        "[class*=\"assistant\"]",
        "[class*=\"bot\"]",
    ],
    text_selectors: &[".message-text", ".markdown", "p", "div"],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

pub static CHARACTER: PlatformProfile = PlatformProfile {
    id: PlatformId::Character,
    display_name: "Character.AI",
    host_patterns: &["character.ai"],
    message_selectors: &["[data-testid=\"message\"]", ".message", "[class*=\"Message\"]"],
    user_indicator_selectors: &["[data-author=\"user\"]", ".user-message", "[class*=\"user\"]"],
    assistant_indicator_selectors: &[
        "[data-author*=\"char\"]",
        ".character-message",
        "[class*=\"character\"]",
        "[class*=\"bot\"]",
    ],
    text_selectors: &[".message-text", ".text", "p", "span"],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

pub static MISTRAL: PlatformProfile = PlatformProfile {
    id: PlatformId::Mistral,
    display_name: "Mistral",
    host_patterns: &["chat.mistral.ai", "mistral.ai"],
    message_selectors: &[".message", "[data-testid*=\"message\"]", ".chat-message"],
    user_indicator_selectors: &[".user-message", "[data-role=\"user\"]", "[class*=\"user\"]"],
    assistant_indicator_selectors: &[
        ".assistant-message",
        "[data-role=\"assistant\"]",
        "[class*=\"assistant\"]",
    ],
    text_selectors: &[".message-content", ".markdown", "p", "div"],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

pub static HUGGINGFACE: PlatformProfile = PlatformProfile {
    id: PlatformId::HuggingFace,
    display_name: "Hugging Face",
    host_patterns: &["huggingface.co"],
    message_selectors: &["[data-testid=\"message\"]", ".message", ".chat-message"],
    user_indicator_selectors: &["[data-from=\"user\"]", ".from-user", "[class*=\"user\"]"],
    assistant_indicator_selectors: &[
        "[data-from=\"assistant\"]",
        ".from-assistant",
        "[class*=\"assistant\"]",
    ],
    text_selectors: &[".prose", ".message-content", "p", "div"],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

pub static LMSYS: PlatformProfile = PlatformProfile {
    id: PlatformId::Lmsys,
    display_name: "LMSYS Chatbot Arena",
    host_patterns: &["chat.lmsys.org"],
    message_selectors: &[".message", "[role=\"log\"]", ".chatbot"],
    user_indicator_selectors: &[".user", "[class*=\"user\"]"],
    assistant_indicator_selectors: &[".bot", ".assistant", "[class*=\"bot\"]"],
    text_selectors: &[".message", "p", "div"],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

pub static UNKNOWN: PlatformProfile = PlatformProfile {
    id: PlatformId::Unknown,
    display_name: "Unknown Platform",
    host_patterns: &[],
    message_selectors: &[
        ".message",
        "[data-testid*=\"message\"]",
        "[class*=\"message\"]",
        "[class*=\"chat\"]",
        "div[role=\"log\"]",
    ],
    user_indicator_selectors: &[
        "[class*=\"user\"]",
        "[data-role=\"user\"]",
        "[data-author=\"user\"]",
    ],
    assistant_indicator_selectors: &[
        "[class*=\"assistant\"]",
        "[class*=\"bot\"]",
        "[data-role=\"assistant\"]",
        "[data-author*=\"assistant\"]",
    ],
    text_selectors: &[".text", ".content", ".markdown", "p", "div", "span"],
    observation_root: None,
    content_rules: ContentRules::GENERIC,
};

/// Detection order: first profile whose host pattern matches wins.
pub static REGISTRY: &[&PlatformProfile] = &[
    &CHATGPT,
    &CLAUDE,
    &GEMINI,
    &DEEPSEEK,
    &POE,
    &YOU,
    &CHARACTER,
    &MISTRAL,
    &HUGGINGFACE,
    &LMSYS,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_platform_has_host_patterns() {
        for profile in REGISTRY {
            assert!(!profile.host_patterns.is_empty(), "{}", profile.id);
            assert!(!profile.message_selectors.is_empty(), "{}", profile.id);
        }
        assert!(UNKNOWN.host_patterns.is_empty());
    }
}

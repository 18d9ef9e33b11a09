//! Role classification for candidate elements.
//!
//! Tiers run from explicit markup to statistics: indicator selectors, role
//! attributes on nearby ancestors, structural hints, and finally the
//! alternating position among substantial text blocks. The first tier with a
//! definitive answer wins; a candidate no tier can place is dropped.

use std::cell::OnceCell;
use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::{ElementRef, Selector};

use crate::detect::ActivePlatform;
use crate::page::{element_text, HostPage};
use crate::preview::normalize_whitespace;
use crate::settings::ExtractionSettings;
use crate::types::Role;

const ROLE_ATTRIBUTES: &[&str] = &[
    "data-message-author-role",
    "data-role",
    "data-author",
    "data-from",
    "data-testid",
    "data-test-id",
];

const USER_TOKENS: &[&str] = &["user", "human"];

const ASSISTANT_TOKENS: &[&str] = &[
    "assistant",
    "bot",
    "ai",
    "model",
    "gpt",
    "chatgpt",
    "claude",
    "gemini",
    "char",
    "character",
    "response",
];

const ASSISTANT_IMAGE_HINTS: &[&str] = &["gpt", "assistant", "claude", "gemini", "bot"];

/// An element that survived candidate selection, with its normalized text.
#[derive(Debug, Clone)]
pub(crate) struct Candidate<'a> {
    pub element: ElementRef<'a>,
    pub text: String,
}

impl<'a> Candidate<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self {
            element,
            text: normalize_whitespace(&element_text(element)),
        }
    }

    pub fn text_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Selectors for the structural tier, parsed once per extractor.
#[derive(Debug)]
pub(crate) struct StructureProbes {
    images: Option<Selector>,
    code: Option<Selector>,
    formatted: Option<Selector>,
    paragraphs: Option<Selector>,
}

impl StructureProbes {
    pub fn new() -> Self {
        Self {
            images: Selector::parse("img").ok(),
            code: Selector::parse("pre, code").ok(),
            formatted: Selector::parse("ul, ol, table, h1, h2, h3, h4, blockquote").ok(),
            paragraphs: Selector::parse("p").ok(),
        }
    }
}

pub(crate) struct ClassifyContext<'a> {
    page: &'a HostPage,
    platform: &'a ActivePlatform,
    settings: &'a ExtractionSettings,
    probes: &'a StructureProbes,
    parity: OnceCell<HashMap<NodeId, usize>>,
}

impl<'a> ClassifyContext<'a> {
    pub fn new(
        page: &'a HostPage,
        platform: &'a ActivePlatform,
        settings: &'a ExtractionSettings,
        probes: &'a StructureProbes,
    ) -> Self {
        Self {
            page,
            platform,
            settings,
            probes,
            parity: OnceCell::new(),
        }
    }

    /// Position of every substantial text element under the main region,
    /// built on first use and shared by all candidates of the pass.
    fn parity_positions(&self) -> &HashMap<NodeId, usize> {
        self.parity.get_or_init(|| {
            let region = self.page.main_region();
            region
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|element| element.id() != region.id())
                .filter(|element| {
                    normalize_whitespace(&element_text(*element)).chars().count()
                        > self.settings.substantial_text_chars
                })
                .enumerate()
                .map(|(position, element)| (element.id(), position))
                .collect()
        })
    }
}

type RoleTier = fn(&ClassifyContext<'_>, &Candidate<'_>) -> Option<Role>;

const ROLE_TIERS: &[(&str, RoleTier)] = &[
    ("indicator", by_indicator_selectors),
    ("attribute", by_role_attributes),
    ("structure", by_structure),
    ("parity", by_parity),
];

const STRUCTURE_SIGNALS: &[RoleTier] = &[
    labelled_avatar,
    code_block,
    formatted_content,
    long_text,
    short_question,
];

/// Role of the candidate and the name of the tier that decided it.
pub(crate) fn classify(
    ctx: &ClassifyContext<'_>,
    candidate: &Candidate<'_>,
) -> Option<(Role, &'static str)> {
    ROLE_TIERS
        .iter()
        .find_map(|(name, tier)| tier(ctx, candidate).map(|role| (role, *name)))
}

fn decide(user: bool, assistant: bool) -> Option<Role> {
    match (user, assistant) {
        (true, false) => Some(Role::User),
        (false, true) => Some(Role::Assistant),
        _ => None,
    }
}

fn by_indicator_selectors(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    let user = &ctx.platform.user_indicators;
    let assistant = &ctx.platform.assistant_indicators;
    let element = candidate.element;
    decide(user.matches_self(element), assistant.matches_self(element)).or_else(|| {
        decide(
            user.matches_descendant(element),
            assistant.matches_descendant(element),
        )
    })
}

fn by_role_attributes(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    std::iter::once(candidate.element)
        .chain(candidate.element.ancestors().filter_map(ElementRef::wrap))
        .take(ctx.settings.max_ancestor_depth + 1)
        .find_map(|element| {
            ROLE_ATTRIBUTES
                .iter()
                .filter_map(|attr| element.value().attr(attr))
                .find_map(role_from_attribute_value)
        })
}

fn role_from_attribute_value(value: &str) -> Option<Role> {
    let tokens: Vec<String> = value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    let has = |wanted: &[&str]| tokens.iter().any(|token| wanted.contains(&token.as_str()));
    decide(has(USER_TOKENS), has(ASSISTANT_TOKENS))
}

fn by_structure(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    STRUCTURE_SIGNALS
        .iter()
        .find_map(|signal| signal(ctx, candidate))
}

fn labelled_avatar(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    let images = ctx.probes.images.as_ref()?;
    candidate.element.select(images).find_map(|image| {
        let alt = image.value().attr("alt").unwrap_or("").to_lowercase();
        let src = image.value().attr("src").unwrap_or("").to_lowercase();
        if alt.contains("user") || src.contains("user") {
            Some(Role::User)
        } else if ASSISTANT_IMAGE_HINTS.iter().any(|hint| alt.contains(hint)) || src.contains("gpt")
        {
            Some(Role::Assistant)
        } else {
            None
        }
    })
}

fn code_block(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    let code = ctx.probes.code.as_ref()?;
    candidate
        .element
        .select(code)
        .next()
        .map(|_| Role::Assistant)
}

fn formatted_content(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    let has_blocks = ctx
        .probes
        .formatted
        .as_ref()
        .is_some_and(|formatted| candidate.element.select(formatted).next().is_some());
    let paragraphs = ctx
        .probes
        .paragraphs
        .as_ref()
        .map_or(0, |p| candidate.element.select(p).count());
    (has_blocks || paragraphs >= 3).then_some(Role::Assistant)
}

fn long_text(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    (candidate.text_chars() >= ctx.settings.long_text_chars).then_some(Role::Assistant)
}

fn short_question(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    (candidate.text.ends_with('?') && candidate.text_chars() <= ctx.settings.short_question_chars)
        .then_some(Role::User)
}

fn by_parity(ctx: &ClassifyContext<'_>, candidate: &Candidate<'_>) -> Option<Role> {
    let position = ctx.parity_positions().get(&candidate.element.id())?;
    Some(if position % 2 == 0 {
        Role::User
    } else {
        Role::Assistant
    })
}

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ego_tree::NodeId;
use engine_logging::{engine_debug, engine_info, engine_trace};
use scraper::ElementRef;

use crate::classify::{classify, Candidate, ClassifyContext, StructureProbes};
use crate::dedupe::PreviewDeduper;
use crate::detect::ActivePlatform;
use crate::page::{element_text, ElementHandle, HostPage};
use crate::platform::ContentRule;
use crate::preview::{build_preview, normalize_whitespace};
use crate::settings::ExtractionSettings;
use crate::types::ConversationTurn;

pub trait TurnExtractor {
    /// Rebuilds the ordered turn list from the page as it is now.
    ///
    /// Never fails: a page without recognizable turns yields an empty list.
    fn extract_turns(&self, page: &HostPage) -> Vec<ConversationTurn>;
}

/// Selector-driven extractor for one platform profile:
/// - first message selector with surviving candidates wins
/// - outermost candidates only
/// - general scan of the main region when no selector matches
/// - tiered role classification, bounded previews, preview dedupe.
#[derive(Debug)]
pub struct HeuristicTurnExtractor {
    platform: Arc<ActivePlatform>,
    settings: ExtractionSettings,
    probes: StructureProbes,
    passes: AtomicU64,
}

impl HeuristicTurnExtractor {
    pub fn new(platform: Arc<ActivePlatform>) -> Self {
        Self::with_settings(platform, ExtractionSettings::default())
    }

    pub fn with_settings(platform: Arc<ActivePlatform>, settings: ExtractionSettings) -> Self {
        Self {
            platform,
            settings,
            probes: StructureProbes::new(),
            passes: AtomicU64::new(0),
        }
    }

    pub fn platform(&self) -> &ActivePlatform {
        &self.platform
    }

    fn select_candidates<'a>(&self, page: &'a HostPage) -> Vec<Candidate<'a>> {
        for (source, selector) in self.platform.message_selectors.iter() {
            let survivors: Vec<Candidate<'a>> = page
                .select(selector)
                .map(Candidate::new)
                .filter(|candidate| self.admits(candidate))
                .collect();
            engine_trace!(
                "Selector {:?} left {} candidate(s)",
                source,
                survivors.len()
            );
            if !survivors.is_empty() {
                engine_debug!(
                    "Using {} candidate(s) from selector {:?}",
                    survivors.len(),
                    source
                );
                return outermost_only(survivors);
            }
        }

        let fallback = self.general_fallback(page);
        engine_debug!(
            "No message selector matched; general scan found {} candidate(s)",
            fallback.len()
        );
        outermost_only(fallback)
    }

    /// Content rules of the active profile.
    fn admits(&self, candidate: &Candidate<'_>) -> bool {
        let rules = self.platform.profile().content_rules;
        if self.is_banner(&candidate.text, rules.rejected_fragments) {
            return false;
        }
        let labelled = match rules.rule {
            ContentRule::MinTextLength => false,
            ContentRule::RoleAttribute(attributes) => attributes
                .iter()
                .any(|attr| candidate.element.value().attr(attr).is_some()),
        };
        if labelled {
            !candidate.text.is_empty()
        } else {
            candidate.text_chars() > self.settings.min_candidate_chars
        }
    }

    /// Substantial, bounded blocks of the main region: enough text, not a
    /// whole-page wrapper, not a bare text holder.
    fn general_fallback<'a>(&self, page: &'a HostPage) -> Vec<Candidate<'a>> {
        let region = page.main_region();
        let rejected = self.platform.profile().content_rules.rejected_fragments;
        region
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.id() != region.id())
            .filter(|element| element.children().any(|child| child.value().is_element()))
            .filter(|element| {
                element
                    .descendants()
                    .filter(|node| node.value().is_element())
                    .count()
                    .saturating_sub(1)
                    < self.settings.max_fallback_descendants
            })
            .map(Candidate::new)
            .filter(|candidate| candidate.text_chars() > self.settings.substantial_text_chars)
            .filter(|candidate| !self.is_banner(&candidate.text, rejected))
            .collect()
    }

    /// Whole-text match against the profile's banner fragments. A turn that
    /// merely quotes a banner phrase is kept.
    fn is_banner(&self, text: &str, fragments: &[&str]) -> bool {
        if fragments.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        fragments.iter().any(|fragment| {
            lowered.strip_prefix(*fragment).is_some_and(|tail| {
                tail.chars().count() <= self.settings.banner_tail_chars
            })
        })
    }

    fn preview_for(&self, candidate: &Candidate<'_>) -> String {
        let settings = &self.settings;
        let from_selectors = self.platform.text_selectors.iter().find_map(|(_, selector)| {
            candidate
                .element
                .select(selector)
                .map(|found| normalize_whitespace(&element_text(found)))
                .find(|text| text.chars().count() > settings.text_selector_min_chars)
        });
        let raw = from_selectors.unwrap_or_else(|| candidate.text.clone());
        build_preview(
            &raw,
            settings.preview_max_chars,
            settings.min_preview_chars,
            &settings.placeholder,
        )
    }
}

impl TurnExtractor for HeuristicTurnExtractor {
    fn extract_turns(&self, page: &HostPage) -> Vec<ConversationTurn> {
        engine_logging::set_extraction_pass(self.passes.fetch_add(1, Ordering::Relaxed) + 1);
        let pass = engine_logging::current_extraction_pass();

        let candidates = self.select_candidates(page);
        let ctx = ClassifyContext::new(page, &self.platform, &self.settings, &self.probes);
        let mut deduper = PreviewDeduper::new(self.settings.dedupe_prefix_chars);
        let mut turns = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            let Some((role, tier)) = classify(&ctx, candidate) else {
                engine_debug!(
                    "[pass {}] dropping unclassified candidate {:?}",
                    pass,
                    preview_head(&candidate.text)
                );
                continue;
            };
            let preview = self.preview_for(candidate);
            if !deduper.admit(&preview) {
                engine_trace!("[pass {}] duplicate preview {:?}", pass, preview);
                continue;
            }
            engine_trace!("[pass {}] {} via {} tier: {:?}", pass, role, tier, preview);
            turns.push(ConversationTurn {
                sequence_index: turns.len(),
                role,
                preview_text: preview,
                source: ElementHandle::of(candidate.element),
            });
        }

        engine_info!(
            "[pass {}] {} turn(s) from {} candidate(s) on {}",
            pass,
            turns.len(),
            candidates.len(),
            self.platform.display_name()
        );
        turns
    }
}

/// Drops candidates nested inside another candidate; document order is kept.
fn outermost_only(candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    let ids: HashSet<NodeId> = candidates
        .iter()
        .map(|candidate| candidate.element.id())
        .collect();
    candidates
        .into_iter()
        .filter(|candidate| {
            !candidate
                .element
                .ancestors()
                .any(|ancestor| ids.contains(&ancestor.id()))
        })
        .collect()
}

fn preview_head(text: &str) -> String {
    text.chars().take(40).collect()
}

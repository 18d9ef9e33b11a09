use engine_logging::engine_info;
use scraper::{ElementRef, Selector};

use crate::page::{hostname_of, ElementHandle, HostPage};
use crate::platform::{PlatformId, PlatformProfile, REGISTRY, UNKNOWN};
use crate::selectors::SelectorList;

/// Profile for a hostname: first registry entry whose host pattern is
/// contained in it, else the generic fallback. Total and deterministic.
pub fn detect_platform(hostname: &str) -> &'static PlatformProfile {
    let hostname = hostname.trim().to_ascii_lowercase();
    REGISTRY
        .iter()
        .copied()
        .find(|profile| profile.matches_host(&hostname))
        .unwrap_or(&UNKNOWN)
}

/// Like [`detect_platform`], for a full URL or a bare hostname.
pub fn detect_from_location(location: &str) -> &'static PlatformProfile {
    detect_platform(&hostname_of(location))
}

/// The profile chosen for this page load, with its selectors compiled.
///
/// Built once at startup and passed by reference to the extractor and the
/// watcher; it is never re-detected while the page lives.
#[derive(Debug, Clone)]
pub struct ActivePlatform {
    profile: &'static PlatformProfile,
    pub(crate) message_selectors: SelectorList,
    pub(crate) user_indicators: SelectorList,
    pub(crate) assistant_indicators: SelectorList,
    pub(crate) text_selectors: SelectorList,
    observation_root: Option<Selector>,
}

impl ActivePlatform {
    pub fn new(profile: &'static PlatformProfile) -> Self {
        Self {
            profile,
            message_selectors: SelectorList::compile_lenient(profile.message_selectors),
            user_indicators: SelectorList::compile_lenient(profile.user_indicator_selectors),
            assistant_indicators: SelectorList::compile_lenient(
                profile.assistant_indicator_selectors,
            ),
            text_selectors: SelectorList::compile_lenient(profile.text_selectors),
            observation_root: profile
                .observation_root
                .and_then(|root| Selector::parse(root).ok()),
        }
    }

    pub fn detect(location: &str) -> Self {
        Self::announce(detect_from_location(location), location)
    }

    /// Detection from the hostname the page resolved at load.
    pub fn for_page(page: &HostPage) -> Self {
        Self::announce(detect_platform(page.hostname()), page.location())
    }

    fn announce(profile: &'static PlatformProfile, location: &str) -> Self {
        engine_info!(
            "Detected platform {} ({}) for location {}",
            profile.display_name,
            profile.id,
            location
        );
        Self::new(profile)
    }

    pub fn profile(&self) -> &'static PlatformProfile {
        self.profile
    }

    pub fn id(&self) -> PlatformId {
        self.profile.id
    }

    pub fn display_name(&self) -> &'static str {
        self.profile.display_name
    }

    /// Subtree mutations are watched under: the profile's root if present on
    /// the page, else the body.
    pub fn observation_root<'a>(&self, page: &'a HostPage) -> ElementRef<'a> {
        self.observation_root
            .as_ref()
            .and_then(|selector| page.select(selector).next())
            .unwrap_or_else(|| page.body())
    }

    pub fn observation_root_handle(&self, page: &HostPage) -> ElementHandle {
        ElementHandle::of(self.observation_root(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{CHATGPT, CLAUDE, GEMINI};

    #[test]
    fn registered_hosts_resolve_to_their_profile() {
        for profile in REGISTRY {
            for pattern in profile.host_patterns {
                let detected = detect_platform(pattern);
                assert_eq!(detected.id, profile.id, "pattern {pattern}");
            }
        }
    }

    #[test]
    fn detection_is_case_insensitive_and_accepts_urls() {
        assert_eq!(detect_platform("CHATGPT.COM").id, CHATGPT.id);
        assert_eq!(detect_from_location("https://claude.ai/chat/1").id, CLAUDE.id);
        assert_eq!(detect_from_location("https://gemini.google.com/app").id, GEMINI.id);
        assert_eq!(detect_from_location("bard.google.com").id, GEMINI.id);
    }

    #[test]
    fn unmatched_hosts_fall_back_to_unknown() {
        assert_eq!(detect_platform("example.org").id, PlatformId::Unknown);
        assert_eq!(detect_platform("").id, PlatformId::Unknown);
        assert_eq!(detect_from_location("not a url at all").id, PlatformId::Unknown);
    }

    #[test]
    fn pages_are_detected_from_their_hostname() {
        let page = HostPage::new("https://Claude.AI/chat/1", "<main></main>");
        assert_eq!(page.hostname(), "claude.ai");
        assert_eq!(ActivePlatform::for_page(&page).id(), CLAUDE.id);

        let local = HostPage::new("file:///tmp/chat.html", "<main></main>");
        assert_eq!(ActivePlatform::for_page(&local).id(), PlatformId::Unknown);
    }

    #[test]
    fn observation_root_falls_back_to_body() {
        let platform = ActivePlatform::new(&CHATGPT);
        let with_main = HostPage::new("chatgpt.com", "<body><main id=m></main></body>");
        assert_eq!(platform.observation_root(&with_main).value().name(), "main");

        let without_main = HostPage::new("chatgpt.com", "<body><div></div></body>");
        assert_eq!(platform.observation_root(&without_main).value().name(), "body");
    }
}

use engine_logging::{engine_debug, engine_trace};

use crate::page::{ElementHandle, HostPage};
use crate::settings::HighlightSettings;

const BACKGROUND: &str = "background-color";
const TRANSITION: &str = "transition";

/// Inline style values a highlight replaced, needed to put them back.
///
/// Restoring writes back exactly what was there before, including the
/// absence of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a highlight stays on the page until the guard is restored"]
pub struct HighlightGuard {
    target: ElementHandle,
    prior_background: Option<String>,
    prior_transition: Option<String>,
}

impl HighlightGuard {
    /// Reverts the highlight. Inert when the element has since been
    /// removed from the page.
    pub fn restore(self, page: &mut HostPage) -> bool {
        if !page.is_attached(self.target) {
            engine_debug!("Highlight target vanished before revert");
            return false;
        }
        page.set_inline_style(self.target, BACKGROUND, self.prior_background.as_deref());
        page.set_inline_style(self.target, TRANSITION, self.prior_transition.as_deref());
        engine_trace!("Highlight reverted");
        true
    }
}

/// Scrolls to `target` and tints its background.
///
/// Returns `None` without touching the page when the handle is stale.
pub fn navigate_to(
    page: &mut HostPage,
    target: ElementHandle,
    settings: &HighlightSettings,
) -> Option<HighlightGuard> {
    if !page.scroll_into_view(target) {
        engine_debug!("Navigation target is no longer on the page");
        return None;
    }
    let guard = HighlightGuard {
        target,
        prior_background: page.inline_style(target, BACKGROUND),
        prior_transition: page.inline_style(target, TRANSITION),
    };
    page.set_inline_style(target, TRANSITION, Some(&settings.transition));
    page.set_inline_style(target, BACKGROUND, Some(&settings.background));
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<main><div id="plain">First turn</div><div id="styled" style="background-color: pink; color: black">Second turn</div></main>"#;

    #[test]
    fn restore_leaves_unstyled_element_unstyled() {
        let mut page = HostPage::new("example.org", PAGE);
        let plain = page.find("#plain").unwrap();

        let guard = navigate_to(&mut page, plain, &HighlightSettings::default()).unwrap();
        assert_eq!(page.scrolled_to(), Some(plain));
        assert_eq!(
            page.inline_style(plain, "background-color").as_deref(),
            Some("#dbeafe")
        );

        assert!(guard.restore(&mut page));
        assert_eq!(page.style_attribute(plain), None);
    }

    #[test]
    fn restore_brings_back_prior_values() {
        let mut page = HostPage::new("example.org", PAGE);
        let styled = page.find("#styled").unwrap();
        let before = page.style_attribute(styled);

        let guard = navigate_to(&mut page, styled, &HighlightSettings::default()).unwrap();
        assert!(guard.restore(&mut page));
        assert_eq!(
            page.inline_style(styled, "background-color").as_deref(),
            Some("pink")
        );
        assert_eq!(page.inline_style(styled, "transition"), None);
        assert_eq!(page.style_attribute(styled), before);
    }

    #[test]
    fn stale_targets_are_inert() {
        let mut page = HostPage::new("example.org", PAGE);
        let plain = page.find("#plain").unwrap();
        let guard = navigate_to(&mut page, plain, &HighlightSettings::default()).unwrap();

        assert!(page.remove(plain));
        assert!(!guard.restore(&mut page));
        assert!(navigate_to(&mut page, plain, &HighlightSettings::default()).is_none());
    }
}

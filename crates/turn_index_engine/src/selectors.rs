use engine_logging::engine_warn;
use scraper::{ElementRef, Selector};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("invalid selector {selector:?}: {message}")]
    Invalid { selector: String, message: String },
}

/// An ordered list of compiled selectors, remembering each source string for
/// logging.
#[derive(Debug, Clone, Default)]
pub struct SelectorList {
    entries: Vec<(&'static str, Selector)>,
}

impl SelectorList {
    /// Compiles every selector, failing on the first invalid one.
    pub fn compile_strict(sources: &[&'static str]) -> Result<Self, SelectorError> {
        let entries = sources
            .iter()
            .map(|source| compile(source).map(|selector| (*source, selector)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Compiles what it can; invalid selectors are logged and skipped so a
    /// bad heuristic never takes the rest of the list down with it.
    pub fn compile_lenient(sources: &[&'static str]) -> Self {
        let entries = sources
            .iter()
            .filter_map(|source| match compile(source) {
                Ok(selector) => Some((*source, selector)),
                Err(err) => {
                    engine_warn!("Skipping selector: {}", err);
                    None
                }
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Selector)> + '_ {
        self.entries.iter().map(|(source, selector)| (*source, selector))
    }

    pub fn matches_self(&self, element: ElementRef<'_>) -> bool {
        self.entries
            .iter()
            .any(|(_, selector)| selector.matches(&element))
    }

    pub fn matches_descendant(&self, element: ElementRef<'_>) -> bool {
        self.entries.iter().any(|(_, selector)| {
            element
                .select(selector)
                .any(|found| found.id() != element.id())
        })
    }

    pub fn matches_self_or_descendant(&self, element: ElementRef<'_>) -> bool {
        self.matches_self(element) || self.matches_descendant(element)
    }
}

fn compile(source: &str) -> Result<Selector, SelectorError> {
    Selector::parse(source).map_err(|err| SelectorError::Invalid {
        selector: source.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{REGISTRY, UNKNOWN};
    use scraper::Html;

    #[test]
    fn every_registry_selector_compiles() {
        for profile in REGISTRY.iter().copied().chain(std::iter::once(&UNKNOWN)) {
            for list in [
                profile.message_selectors,
                profile.user_indicator_selectors,
                profile.assistant_indicator_selectors,
                profile.text_selectors,
            ] {
                if let Err(err) = SelectorList::compile_strict(list) {
                    panic!("{}: {err}", profile.id);
                }
            }
            if let Some(root) = profile.observation_root {
                assert!(Selector::parse(root).is_ok(), "{}", profile.id);
            }
        }
    }

    #[test]
    fn strict_rejects_and_lenient_skips_invalid_selectors() {
        let sources: &[&'static str] = &["div", "[[broken", ".ok"];
        let err = SelectorList::compile_strict(sources).unwrap_err();
        assert!(matches!(err, SelectorError::Invalid { ref selector, .. } if selector == "[[broken"));

        let lenient = SelectorList::compile_lenient(sources);
        let kept: Vec<_> = lenient.iter().map(|(source, _)| source).collect();
        assert_eq!(kept, vec!["div", ".ok"]);
    }

    #[test]
    fn descendant_matching_excludes_the_element_itself() {
        let doc = Html::parse_fragment(r#"<div class="turn"><p class="turn">x</p></div><div class="turn">y</div>"#);
        let list = SelectorList::compile_strict(&["div.turn"]).unwrap();
        let outer = doc
            .select(&Selector::parse("div.turn").unwrap())
            .next()
            .unwrap();

        assert!(list.matches_self(outer));
        assert!(!list.matches_descendant(outer));
        let nested = SelectorList::compile_strict(&["p.turn"]).unwrap();
        assert!(nested.matches_descendant(outer));
    }
}

//! The host page: a parsed, mutable document standing in for the live DOM.
//!
//! Nodes live in the `ego_tree` arena behind [`scraper::Html`], so a node keeps
//! its id for the lifetime of the page even after it is detached. That id is
//! what [`ElementHandle`] wraps; it never owns page content.

use std::collections::HashMap;

use ego_tree::{NodeId, NodeMut, NodeRef};
use scraper::element_ref::Select;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Non-owning reference to a node of a [`HostPage`].
///
/// A handle may go stale when the page removes the node; operations through a
/// stale handle are inert rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(NodeId);

impl ElementHandle {
    pub(crate) fn of(element: ElementRef<'_>) -> Self {
        Self(element.id())
    }
}

/// One childList change, as a mutation observer would report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: ElementHandle,
    pub added: Vec<ElementHandle>,
    pub removed: Vec<ElementHandle>,
}

pub struct HostPage {
    location: String,
    hostname: String,
    html: Html,
    /// Inline style declarations written since load, keyed by node. Nodes
    /// without an entry still read from their `style` attribute.
    inline_styles: HashMap<NodeId, Vec<(String, String)>>,
    scrolled_to: Option<ElementHandle>,
    pending: Vec<MutationRecord>,
}

impl HostPage {
    pub fn new(location: &str, html: &str) -> Self {
        Self {
            location: location.trim().to_string(),
            hostname: hostname_of(location),
            html: Html::parse_document(html),
            inline_styles: HashMap::new(),
            scrolled_to: None,
            pending: Vec::new(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Lower-cased hostname of the page location.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Attached elements matching `selector`, in document order.
    ///
    /// Traverses from the root element rather than the node arena, so
    /// detached subtrees never show up.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.root_element().select(selector)
    }

    /// Resolves a handle to an element, attached or not.
    pub fn element(&self, handle: ElementHandle) -> Option<ElementRef<'_>> {
        self.html.tree.get(handle.0).and_then(ElementRef::wrap)
    }

    /// First attached element matching `selector`, in document order.
    pub fn find(&self, selector: &str) -> Option<ElementHandle> {
        let selector = Selector::parse(selector).ok()?;
        self.select(&selector).next().map(ElementHandle::of)
    }

    pub fn is_attached(&self, handle: ElementHandle) -> bool {
        let Some(node) = self.html.tree.get(handle.0) else {
            return false;
        };
        let root = self.html.tree.root().id();
        node.id() == root || node.ancestors().any(|ancestor| ancestor.id() == root)
    }

    pub fn body(&self) -> ElementRef<'_> {
        Selector::parse("body")
            .ok()
            .and_then(|sel| self.select(&sel).next())
            .unwrap_or_else(|| self.html.root_element())
    }

    /// The page's main content region: `<main>` if present, else the body.
    pub fn main_region(&self) -> ElementRef<'_> {
        Selector::parse("main")
            .ok()
            .and_then(|sel| self.select(&sel).next())
            .unwrap_or_else(|| self.body())
    }

    /// Parses `fragment` and appends its nodes to `parent`.
    ///
    /// Returns the handles of the appended top-level nodes, or `None` when
    /// `parent` is stale or not an element.
    pub fn insert_html(
        &mut self,
        parent: ElementHandle,
        fragment: &str,
    ) -> Option<Vec<ElementHandle>> {
        self.element(parent)?;
        let parsed = Html::parse_fragment(fragment);
        let mut added = Vec::new();
        {
            let mut target = self.html.tree.get_mut(parent.0)?;
            for child in parsed.root_element().children() {
                added.push(ElementHandle(graft(&mut target, child)));
            }
        }
        self.pending.push(MutationRecord {
            target: parent,
            added: added.clone(),
            removed: Vec::new(),
        });
        Some(added)
    }

    /// Detaches a node from the document. Returns false for stale handles and
    /// for the document root.
    pub fn remove(&mut self, handle: ElementHandle) -> bool {
        if !self.is_attached(handle) {
            return false;
        }
        let parent = self
            .html
            .tree
            .get(handle.0)
            .and_then(|node| node.parent())
            .map(|parent| parent.id());
        let Some(parent) = parent else {
            return false;
        };
        if let Some(mut node) = self.html.tree.get_mut(handle.0) {
            node.detach();
        }
        self.pending.push(MutationRecord {
            target: ElementHandle(parent),
            added: Vec::new(),
            removed: vec![handle],
        });
        true
    }

    /// Drains the mutation records accumulated since the last call.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending)
    }

    /// Scrolls the viewport to an attached element. Inert for stale handles.
    pub fn scroll_into_view(&mut self, handle: ElementHandle) -> bool {
        if !self.is_attached(handle) || self.element(handle).is_none() {
            return false;
        }
        self.scrolled_to = Some(handle);
        true
    }

    pub fn scrolled_to(&self) -> Option<ElementHandle> {
        self.scrolled_to
    }

    /// Current inline value of a style property.
    pub fn inline_style(&self, handle: ElementHandle, property: &str) -> Option<String> {
        let property = property.trim().to_ascii_lowercase();
        match self.inline_styles.get(&handle.0) {
            Some(declarations) => lookup(declarations, &property),
            None => lookup(&self.attribute_declarations(handle)?, &property),
        }
    }

    /// Sets (`Some`) or removes (`None`) an inline style property. Returns
    /// false when the handle does not resolve to an element.
    pub fn set_inline_style(
        &mut self,
        handle: ElementHandle,
        property: &str,
        value: Option<&str>,
    ) -> bool {
        if self.element(handle).is_none() {
            return false;
        }
        if !self.inline_styles.contains_key(&handle.0) {
            let initial = self.attribute_declarations(handle).unwrap_or_default();
            self.inline_styles.insert(handle.0, initial);
        }
        let property = property.trim().to_ascii_lowercase();
        let Some(declarations) = self.inline_styles.get_mut(&handle.0) else {
            return false;
        };
        let position = declarations.iter().position(|(name, _)| *name == property);
        match (position, value) {
            (Some(idx), Some(value)) => declarations[idx].1 = value.to_string(),
            (None, Some(value)) => declarations.push((property, value.to_string())),
            (Some(idx), None) => {
                declarations.remove(idx);
            }
            (None, None) => {}
        }
        true
    }

    /// Serialized inline style, as the `style` attribute would read now.
    pub fn style_attribute(&self, handle: ElementHandle) -> Option<String> {
        let declarations = match self.inline_styles.get(&handle.0) {
            Some(declarations) => declarations.clone(),
            None => self.attribute_declarations(handle)?,
        };
        if declarations.is_empty() {
            return None;
        }
        Some(
            declarations
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    fn attribute_declarations(&self, handle: ElementHandle) -> Option<Vec<(String, String)>> {
        let element = self.element(handle)?;
        Some(parse_declarations(element.value().attr("style").unwrap_or("")))
    }
}

fn graft(parent: &mut NodeMut<'_, Node>, source: NodeRef<'_, Node>) -> NodeId {
    let mut copy = parent.append(source.value().clone());
    let id = copy.id();
    for child in source.children() {
        graft(&mut copy, child);
    }
    id
}

fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .collect()
}

fn lookup(declarations: &[(String, String)], property: &str) -> Option<String> {
    declarations
        .iter()
        .find(|(name, _)| name == property)
        .map(|(_, value)| value.clone())
}

/// Lower-cased hostname of a location. Accepts full URLs as well as bare
/// hostnames; anything unparsable is treated as a hostname.
pub fn hostname_of(location: &str) -> String {
    let trimmed = location.trim();
    if let Some(host) = Url::parse(trimmed)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
    {
        return host.to_ascii_lowercase();
    }
    trimmed
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Concatenated descendant text of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><main id="chat"><div id="first" style="color: red; background-color: white">Hi</div></main></body></html>"#;

    #[test]
    fn hostname_from_url_or_bare_host() {
        assert_eq!(hostname_of("https://ChatGPT.com/c/123"), "chatgpt.com");
        assert_eq!(hostname_of("claude.ai/chat/abc"), "claude.ai");
        assert_eq!(hostname_of("localhost:8080"), "localhost");
        assert_eq!(hostname_of(""), "");
    }

    #[test]
    fn insert_records_mutation_and_attaches_nodes() {
        let mut page = HostPage::new("https://example.com", PAGE);
        let main = page.find("main").unwrap();

        let added = page
            .insert_html(main, r#"<div class="message">new <b>turn</b></div>"#)
            .unwrap();
        assert_eq!(added.len(), 1);
        assert!(page.is_attached(added[0]));
        assert_eq!(element_text(page.element(added[0]).unwrap()), "new turn");

        let records = page.take_mutations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, main);
        assert_eq!(records[0].added, added);
        assert!(page.take_mutations().is_empty());
    }

    #[test]
    fn removed_nodes_become_stale_and_inert() {
        let mut page = HostPage::new("https://example.com", PAGE);
        let first = page.find("#first").unwrap();

        assert!(page.remove(first));
        assert!(!page.is_attached(first));
        assert!(page.element(first).is_some());
        assert!(!page.scroll_into_view(first));
        assert!(!page.remove(first));
        assert!(page.find("#first").is_none());
        assert_eq!(page.take_mutations()[0].removed, vec![first]);
    }

    #[test]
    fn inline_style_overlay_reads_attribute_then_writes() {
        let mut page = HostPage::new("https://example.com", PAGE);
        let first = page.find("#first").unwrap();

        assert_eq!(
            page.inline_style(first, "background-color").as_deref(),
            Some("white")
        );
        assert!(page.set_inline_style(first, "background-color", Some("#dbeafe")));
        assert!(page.set_inline_style(first, "transition", Some("none")));
        assert_eq!(
            page.style_attribute(first).as_deref(),
            Some("color: red; background-color: #dbeafe; transition: none;")
        );

        assert!(page.set_inline_style(first, "transition", None));
        assert!(page.set_inline_style(first, "background-color", Some("white")));
        assert_eq!(
            page.style_attribute(first).as_deref(),
            Some("color: red; background-color: white;")
        );
    }
}

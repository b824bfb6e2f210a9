//! Smooth scrolling for in-page fragment links.

use anyhow::Result;
use dom::{Document, DocumentExt as _, NodeKey};
use log::debug;
use std::collections::HashMap;

/// Scroll `section_id` into view. Returns `false` when no such element exists.
///
/// # Errors
///
/// Propagates the document's rejection of the scroll request.
pub fn scroll_to_section<D: Document + ?Sized>(doc: &mut D, section_id: &str) -> Result<bool> {
    let Some(target) = doc.element_by_id(section_id) else {
        debug!("anchor scroll: no element with id {section_id:?}");
        return Ok(false);
    };
    doc.scroll_into_view(target)?;
    Ok(true)
}

/// Controller for a fixed set of `href="#..."` links.
#[derive(Debug, Default)]
pub struct AnchorScroll {
    links: HashMap<NodeKey, String>,
}

impl AnchorScroll {
    /// Register links with their raw `href` values. Links not starting with `#` are skipped.
    #[must_use]
    pub fn new(links: Vec<(NodeKey, String)>) -> Self {
        Self {
            links: links
                .into_iter()
                .filter(|(_, href)| href.starts_with('#'))
                .collect(),
        }
    }

    /// Registered links, in no particular order.
    pub fn links(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.links.keys().copied()
    }

    #[must_use]
    pub fn handles(&self, link: NodeKey) -> bool {
        self.links.contains_key(&link)
    }

    /// Fragment id targeted by `link`, if registered and non-empty.
    #[must_use]
    pub fn fragment(&self, link: NodeKey) -> Option<&str> {
        self.links
            .get(&link)
            .and_then(|href| href.strip_prefix('#'))
            .filter(|fragment| !fragment.is_empty())
    }

    /// Handle a click on `link`. Returns `true` when default navigation must be
    /// suppressed, which is the case for every registered link even if its
    /// target is missing.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the scroll request.
    pub fn on_click<D: Document + ?Sized>(&self, doc: &mut D, link: NodeKey) -> Result<bool> {
        if !self.handles(link) {
            return Ok(false);
        }
        if let Some(fragment) = self.fragment(link) {
            scroll_to_section(doc, fragment)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::MemoryDocument;

    #[test]
    fn click_scrolls_to_the_target_section() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let about = doc.element(body, "section", &[("id", "about")]).unwrap();
        let link = doc.element(body, "a", &[("href", "#about")]).unwrap();
        let anchors = AnchorScroll::new(doc.fragment_links());

        assert!(anchors.on_click(&mut doc, link).unwrap());
        assert_eq!(doc.scrolled_into_view(), &[about]);
    }

    #[test]
    fn missing_target_is_a_prevented_no_op() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let link = doc.element(body, "a", &[("href", "#nowhere")]).unwrap();
        let bare = doc.element(body, "a", &[("href", "#")]).unwrap();
        let anchors = AnchorScroll::new(doc.fragment_links());

        assert!(anchors.on_click(&mut doc, link).unwrap());
        assert!(anchors.on_click(&mut doc, bare).unwrap());
        assert!(doc.scrolled_into_view().is_empty());
    }

    #[test]
    fn external_links_are_not_registered() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let link = doc.element(body, "a", &[("href", "https://example.com/#top")]).unwrap();
        let anchors = AnchorScroll::new(vec![(link, "https://example.com/#top".to_owned())]);
        assert!(!anchors.on_click(&mut doc, link).unwrap());
    }

    #[test]
    fn scroll_to_section_reports_missing_ids() {
        let mut doc = MemoryDocument::new();
        assert!(!scroll_to_section(&mut doc, "projects").unwrap());
    }
}

//! A small in-memory DOM mirror.
//!
//! `MemoryDocument` keeps just enough of a document to drive the page effects
//! without a browser: the element tree, id/class/href indices, inline styles,
//! text runs, layout metrics supplied by the caller, and a log of every
//! `DOMUpdate` it accepted.

use crate::{BoxMetrics, DOMSubscriber, DOMUpdate, Document, NodeKey};
use anyhow::{Result, anyhow};
use log::trace;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Per-element state.
#[derive(Debug, Default, Clone)]
struct ElementState {
    tag: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    id: Option<String>,
    classes: HashSet<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    metrics: Option<BoxMetrics>,
}

/// In-memory document used headless and in tests.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: HashMap<NodeKey, ElementState>,
    id_index: HashMap<String, NodeKey>,
    body: NodeKey,
    next_key: u64,
    stylesheets: Vec<String>,
    scrolled: Vec<NodeKey>,
    log: Vec<DOMUpdate>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document holding only a root and an empty `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeKey(1);
        let mut nodes = HashMap::new();
        nodes.insert(
            NodeKey::ROOT,
            ElementState {
                tag: "#document".to_owned(),
                children: vec![body],
                ..ElementState::default()
            },
        );
        nodes.insert(
            body,
            ElementState {
                tag: "body".to_owned(),
                parent: Some(NodeKey::ROOT),
                ..ElementState::default()
            },
        );
        Self {
            nodes,
            id_index: HashMap::new(),
            body,
            next_key: 2,
            stylesheets: Vec::new(),
            scrolled: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Build an element with attributes in one call. Attribute writes are not logged.
    ///
    /// # Errors
    ///
    /// Returns an error when `parent` is unknown.
    pub fn element(&mut self, parent: NodeKey, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeKey> {
        let node = self.insert(parent, tag)?;
        for (name, value) in attrs {
            self.set_attr(node, name, value)?;
        }
        Ok(node)
    }

    /// Attach layout metrics to `node`.
    ///
    /// # Errors
    ///
    /// Returns an error when `node` is unknown.
    pub fn set_box_metrics(&mut self, node: NodeKey, metrics: BoxMetrics) -> Result<()> {
        self.state_mut(node)?.metrics = Some(metrics);
        Ok(())
    }

    /// Whether `node` is still attached to this document.
    #[must_use]
    pub fn contains(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Text content of `node` (empty for elements that never had text set).
    #[must_use]
    pub fn text_content(&self, node: NodeKey) -> Option<&str> {
        self.nodes
            .get(&node)
            .map(|state| state.text.as_deref().unwrap_or_default())
    }

    /// Current inline value of a style property.
    #[must_use]
    pub fn style(&self, node: NodeKey, property: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|state| state.styles.get(property))
            .map(String::as_str)
    }

    /// Attribute value, if present.
    #[must_use]
    pub fn attr(&self, node: NodeKey, name: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|state| state.attrs.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Direct children of `node`.
    #[must_use]
    pub fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(&node)
            .map_or(&[], |state| state.children.as_slice())
    }

    /// Stylesheets appended to the head, in insertion order.
    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Nodes scrolled into view, in request order.
    #[must_use]
    pub fn scrolled_into_view(&self) -> &[NodeKey] {
        &self.scrolled
    }

    /// Every update accepted so far.
    #[must_use]
    pub fn updates(&self) -> &[DOMUpdate] {
        &self.log
    }

    /// Drain the update log.
    pub fn take_updates(&mut self) -> Vec<DOMUpdate> {
        core::mem::take(&mut self.log)
    }

    fn state(&self, node: NodeKey) -> Result<&ElementState> {
        self.nodes
            .get(&node)
            .ok_or_else(|| anyhow!("unknown node {node:?}"))
    }

    fn state_mut(&mut self, node: NodeKey) -> Result<&mut ElementState> {
        self.nodes
            .get_mut(&node)
            .ok_or_else(|| anyhow!("unknown node {node:?}"))
    }

    fn mint(&mut self) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        key
    }

    /// Insert a fresh element as the last child of `parent` without logging it.
    fn insert(&mut self, parent: NodeKey, tag: &str) -> Result<NodeKey> {
        self.state(parent)?;
        let node = self.mint();
        self.link(parent, node, tag)?;
        Ok(node)
    }

    fn link(&mut self, parent: NodeKey, node: NodeKey, tag: &str) -> Result<usize> {
        let parent_state = self.state_mut(parent)?;
        let pos = parent_state.children.len();
        parent_state.children.push(node);
        self.nodes.insert(
            node,
            ElementState {
                tag: tag.to_ascii_lowercase(),
                parent: Some(parent),
                ..ElementState::default()
            },
        );
        Ok(pos)
    }

    fn set_attr(&mut self, node: NodeKey, name: &str, value: &str) -> Result<()> {
        let name_lc = name.to_ascii_lowercase();
        let previous_id = {
            let state = self.state_mut(node)?;
            state.attrs.insert(name_lc.clone(), value.to_owned());
            match name_lc.as_str() {
                "id" => {
                    let old = state.id.take();
                    if !value.is_empty() {
                        state.id = Some(value.to_owned());
                    }
                    old
                }
                "class" => {
                    state.classes = value
                        .split_whitespace()
                        .map(str::to_owned)
                        .collect();
                    None
                }
                _ => None,
            }
        };
        if name_lc == "id" {
            // Only drop the reverse mapping if it still points at this node.
            if let Some(old) = previous_id
                && self.id_index.get(&old) == Some(&node)
            {
                self.id_index.remove(&old);
            }
            if !value.is_empty() {
                self.id_index.insert(value.to_owned(), node);
            }
        }
        Ok(())
    }

    /// Remove a node (and its descendants) from all indices.
    fn remove_recursively(&mut self, node: NodeKey) {
        let Some(state) = self.nodes.remove(&node) else {
            return;
        };
        for child in state.children {
            self.remove_recursively(child);
        }
        if let Some(parent) = state.parent
            && let Some(parent_state) = self.nodes.get_mut(&parent)
        {
            parent_state.children.retain(|child| *child != node);
        }
        if let Some(id) = state.id
            && self.id_index.get(&id) == Some(&node)
        {
            self.id_index.remove(&id);
        }
    }

    /// Depth-first walk from the root, collecting nodes that satisfy `keep`.
    fn collect<F>(&self, keep: F) -> Vec<NodeKey>
    where
        F: Fn(&ElementState) -> bool,
    {
        let mut out = Vec::new();
        let mut stack = vec![NodeKey::ROOT];
        while let Some(current) = stack.pop() {
            let Some(state) = self.nodes.get(&current) else {
                continue;
            };
            if keep(state) {
                out.push(current);
            }
            stack.extend(state.children.iter().rev().copied());
        }
        out
    }
}

impl DOMSubscriber for MemoryDocument {
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()> {
        trace!("MemoryDocument::apply_update {update:?}");
        match &update {
            DOMUpdate::InsertElement { parent, node, tag, .. } => {
                if self.nodes.contains_key(node) {
                    return Err(anyhow!("node {node:?} already exists"));
                }
                self.link(*parent, *node, tag)?;
                self.next_key = self.next_key.max(node.0.wrapping_add(1));
            }
            DOMUpdate::SetAttr { node, name, value } => self.set_attr(*node, name, value)?,
            DOMUpdate::SetText { node, text } => {
                self.state_mut(*node)?.text = Some(text.clone());
            }
            DOMUpdate::SetStyle {
                node,
                property,
                value,
            } => {
                self.state_mut(*node)?
                    .styles
                    .insert(property.clone(), value.clone());
            }
            DOMUpdate::ToggleClass {
                node,
                class,
                present,
            } => {
                let state = self.state_mut(*node)?;
                if *present {
                    state.classes.insert(class.clone());
                } else {
                    state.classes.remove(class);
                }
            }
            DOMUpdate::RemoveNode { node } => {
                self.state(*node)?;
                self.remove_recursively(*node);
            }
            DOMUpdate::ScrollIntoView { node } => {
                self.state(*node)?;
                self.scrolled.push(*node);
            }
            DOMUpdate::InjectStylesheet { css } => self.stylesheets.push(css.clone()),
        }
        self.log.push(update);
        Ok(())
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> NodeKey {
        self.body
    }

    fn element_by_id(&self, id: &str) -> Option<NodeKey> {
        self.id_index.get(id).copied()
    }

    fn elements_by_any_class(&self, classes: &[&str]) -> Vec<NodeKey> {
        self.collect(|state| classes.iter().any(|class| state.classes.contains(*class)))
    }

    fn children_by_class(&self, parent: NodeKey, class: &str) -> Vec<NodeKey> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|child| {
                self.nodes
                    .get(child)
                    .is_some_and(|state| state.classes.contains(class))
            })
            .collect()
    }

    fn fragment_links(&self) -> Vec<(NodeKey, String)> {
        let links = self.collect(|state| {
            state.tag == "a"
                && state
                    .attrs
                    .get("href")
                    .is_some_and(|href| href.starts_with('#'))
        });
        links
            .into_iter()
            .filter_map(|node| {
                self.nodes
                    .get(&node)
                    .and_then(|state| state.attrs.get("href"))
                    .map(|href| (node, href.clone()))
            })
            .collect()
    }

    fn has_class(&self, node: NodeKey, class: &str) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|state| state.classes.contains(class))
    }

    fn box_metrics(&self, node: NodeKey) -> Option<BoxMetrics> {
        self.nodes.get(&node).and_then(|state| state.metrics)
    }

    fn create_element(&mut self, parent: NodeKey, tag: &str) -> Result<NodeKey> {
        self.state(parent)?;
        let node = self.mint();
        let pos = self.children(parent).len();
        self.apply_update(DOMUpdate::InsertElement {
            parent,
            node,
            tag: tag.to_owned(),
            pos,
        })?;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_lookup_is_in_document_order() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let section = doc.element(body, "section", &[("class", "b")]).unwrap();
        let inner = doc.element(section, "div", &[("class", "a")]).unwrap();
        let after = doc.element(body, "div", &[("class", "a b")]).unwrap();

        assert_eq!(doc.elements_by_any_class(&["a", "b"]), vec![section, inner, after]);
        assert_eq!(doc.elements_by_class("a"), vec![inner, after]);
    }

    #[test]
    fn class_tokens_are_case_sensitive() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let upper = doc.element(body, "div", &[("class", "Skill-Tab")]).unwrap();
        let lower = doc.element(body, "div", &[("class", "skill-tab")]).unwrap();

        assert_eq!(doc.elements_by_class("skill-tab"), vec![lower]);
        assert_eq!(doc.elements_by_class("Skill-Tab"), vec![upper]);
        assert!(!doc.has_class(upper, "skill-tab"));
        assert_eq!(doc.children_by_class(body, "SKILL-TAB"), Vec::<NodeKey>::new());

        doc.apply_update(DOMUpdate::ToggleClass {
            node: lower,
            class: "Active".to_owned(),
            present: true,
        })
        .unwrap();
        assert!(doc.has_class(lower, "Active"));
        assert!(!doc.has_class(lower, "active"));
    }

    #[test]
    fn removing_a_subtree_clears_ids() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let outer = doc.element(body, "div", &[("id", "outer")]).unwrap();
        let inner = doc.element(outer, "span", &[("id", "inner")]).unwrap();

        doc.apply_update(DOMUpdate::RemoveNode { node: outer }).unwrap();

        assert!(!doc.contains(outer));
        assert!(!doc.contains(inner));
        assert_eq!(doc.element_by_id("inner"), None);
        assert!(doc.children(body).is_empty());
    }

    #[test]
    fn updates_to_unknown_nodes_are_rejected() {
        let mut doc = MemoryDocument::new();
        let result = doc.apply_update(DOMUpdate::SetText {
            node: NodeKey(999),
            text: "x".to_owned(),
        });
        assert!(result.is_err());
        assert!(doc.updates().is_empty());
    }

    #[test]
    fn create_element_logs_an_insert() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let span = doc.create_element(body, "SPAN").unwrap();
        match doc.updates() {
            [DOMUpdate::InsertElement { parent, node, tag, pos }] => {
                assert_eq!(*parent, body);
                assert_eq!(*node, span);
                assert_eq!(tag, "SPAN");
                assert_eq!(*pos, 0);
            }
            other => panic!("unexpected log: {other:?}"),
        }
    }
}

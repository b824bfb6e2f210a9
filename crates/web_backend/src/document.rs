//! `web-sys` implementation of the [`Document`] facade.
//!
//! Live elements are handed out as [`NodeKey`]s on first lookup and kept in a
//! registry so later updates and event targets can be mapped back and forth.

use anyhow::{Result, anyhow};
use core::cell::RefCell;
use dom::{BoxMetrics, DOMSubscriber, DOMUpdate, Document, NodeKey};
use log::trace;
use std::collections::HashMap;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

/// Convert a thrown JS value into an `anyhow` error.
pub fn js_error(context: &str, err: &JsValue) -> anyhow::Error {
    let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    anyhow!("{context}: {detail}")
}

#[derive(Default)]
struct Registry {
    elements: HashMap<NodeKey, Element>,
    next_key: u64,
}

impl Registry {
    fn key_of(&self, element: &Element) -> Option<NodeKey> {
        self.elements
            .iter()
            .find_map(|(key, known)| (known == element).then_some(*key))
    }

    fn intern(&mut self, element: Element) -> NodeKey {
        if let Some(key) = self.key_of(&element) {
            return key;
        }
        self.next_key += 1;
        let key = NodeKey(self.next_key);
        self.elements.insert(key, element);
        key
    }
}

/// A [`Document`] over the page the module was loaded into.
pub struct WebDocument {
    document: web_sys::Document,
    body: NodeKey,
    registry: RefCell<Registry>,
}

impl WebDocument {
    /// Wrap `document`. Fails when the page has no `<body>` yet.
    ///
    /// # Errors
    ///
    /// Returns an error if `document.body` is null.
    pub fn new(document: web_sys::Document) -> Result<Self> {
        let body: Element = document
            .body()
            .ok_or_else(|| anyhow!("document has no body"))?
            .into();
        let mut registry = Registry::default();
        let body_key = registry.intern(body);
        Ok(Self {
            document,
            body: body_key,
            registry: RefCell::new(registry),
        })
    }

    #[inline]
    #[must_use]
    pub const fn raw(&self) -> &web_sys::Document {
        &self.document
    }

    /// Key previously handed out for `element`, if any.
    #[must_use]
    pub fn key_of(&self, element: &Element) -> Option<NodeKey> {
        self.registry.borrow().key_of(element)
    }

    /// Live element behind `node`.
    #[must_use]
    pub fn element(&self, node: NodeKey) -> Option<Element> {
        self.registry.borrow().elements.get(&node).cloned()
    }

    fn intern(&self, element: Element) -> NodeKey {
        self.registry.borrow_mut().intern(element)
    }

    fn require(&self, node: NodeKey) -> Result<Element> {
        self.element(node)
            .ok_or_else(|| anyhow!("unknown node {node:?}"))
    }

    fn require_html(&self, node: NodeKey) -> Result<HtmlElement> {
        self.require(node)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| anyhow!("node {node:?} is not an HTML element"))
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            trace!("query {selector:?} rejected");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn stylesheet(&self, css: &str) -> Result<()> {
        let head = self
            .document
            .head()
            .ok_or_else(|| anyhow!("document has no head"))?;
        let style = self
            .document
            .create_element("style")
            .map_err(|err| js_error("create <style>", &err))?;
        style.set_text_content(Some(css));
        head.append_child(&style)
            .map_err(|err| js_error("append <style>", &err))?;
        Ok(())
    }
}

impl DOMSubscriber for WebDocument {
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()> {
        trace!("web update: {update:?}");
        match update {
            DOMUpdate::InsertElement {
                parent, node, tag, ..
            } => {
                let parent_el = self.require(parent)?;
                let element = self
                    .document
                    .create_element(&tag)
                    .map_err(|err| js_error("createElement", &err))?;
                parent_el
                    .append_child(&element)
                    .map_err(|err| js_error("appendChild", &err))?;
                self.registry.get_mut().elements.insert(node, element);
            }
            DOMUpdate::SetAttr { node, name, value } => {
                self.require(node)?
                    .set_attribute(&name, &value)
                    .map_err(|err| js_error("setAttribute", &err))?;
            }
            DOMUpdate::SetText { node, text } => {
                self.require(node)?.set_text_content(Some(&text));
            }
            DOMUpdate::SetStyle {
                node,
                property,
                value,
            } => {
                self.require_html(node)?
                    .style()
                    .set_property(&property, &value)
                    .map_err(|err| js_error("style.setProperty", &err))?;
            }
            DOMUpdate::ToggleClass {
                node,
                class,
                present,
            } => {
                let classes = self.require(node)?.class_list();
                let outcome = if present {
                    classes.add_1(&class)
                } else {
                    classes.remove_1(&class)
                };
                outcome.map_err(|err| js_error("classList", &err))?;
            }
            DOMUpdate::RemoveNode { node } => {
                if let Some(element) = self.registry.get_mut().elements.remove(&node) {
                    element.remove();
                }
            }
            DOMUpdate::ScrollIntoView { node } => {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Start);
                self.require(node)?
                    .scroll_into_view_with_scroll_into_view_options(&options);
            }
            DOMUpdate::InjectStylesheet { css } => self.stylesheet(&css)?,
        }
        Ok(())
    }
}

impl Document for WebDocument {
    #[inline]
    fn body(&self) -> NodeKey {
        self.body
    }

    fn element_by_id(&self, id: &str) -> Option<NodeKey> {
        self.document
            .get_element_by_id(id)
            .map(|element| self.intern(element))
    }

    fn elements_by_any_class(&self, classes: &[&str]) -> Vec<NodeKey> {
        if classes.is_empty() {
            return Vec::new();
        }
        let selector = classes
            .iter()
            .map(|class| format!(".{class}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.query_all(&selector)
            .into_iter()
            .map(|element| self.intern(element))
            .collect()
    }

    fn children_by_class(&self, parent: NodeKey, class: &str) -> Vec<NodeKey> {
        let Some(parent_el) = self.element(parent) else {
            return Vec::new();
        };
        let children = parent_el.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .filter(|child| child.class_list().contains(class))
            .map(|child| self.intern(child))
            .collect()
    }

    fn fragment_links(&self) -> Vec<(NodeKey, String)> {
        self.query_all("a[href^=\"#\"]")
            .into_iter()
            .filter_map(|anchor| {
                let href = anchor.get_attribute("href")?;
                Some((self.intern(anchor), href))
            })
            .collect()
    }

    fn has_class(&self, node: NodeKey, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn box_metrics(&self, node: NodeKey) -> Option<BoxMetrics> {
        let element = self.element(node)?.dyn_into::<HtmlElement>().ok()?;
        Some(BoxMetrics {
            client_width: f64::from(element.client_width()),
            client_height: f64::from(element.client_height()),
            offset_left: f64::from(element.offset_left()),
            offset_top: f64::from(element.offset_top()),
        })
    }

    fn create_element(&mut self, parent: NodeKey, tag: &str) -> Result<NodeKey> {
        let pos = self.require(parent)?.child_element_count() as usize;
        let registry = self.registry.get_mut();
        registry.next_key += 1;
        let node = NodeKey(registry.next_key);
        self.apply_update(DOMUpdate::InsertElement {
            parent,
            node,
            tag: tag.to_owned(),
            pos,
        })?;
        Ok(node)
    }
}

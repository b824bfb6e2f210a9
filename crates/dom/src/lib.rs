//! Engine-agnostic DOM facade shared by the page effects and their hosts.
//!
//! Effects never touch a concrete document. They read through the [`Document`]
//! trait and mutate through [`DOMUpdate`] values, so the same controller code
//! drives a browser page (via `web_backend`) and the in-memory
//! [`MemoryDocument`] used headless and in tests.

use anyhow::Result;

pub mod geometry;
pub use geometry::{BoxMetrics, Rect, Viewport};

/// In-memory document mirror used headless and by tests.
pub mod memory;
pub use memory::MemoryDocument;

/// A 64-bit stable key for DOM nodes, minted by the owning document.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The document root (always present).
    pub const ROOT: Self = Self(0);
}

/// A single mutation applied to a document.
#[derive(Debug, Clone, PartialEq)]
pub enum DOMUpdate {
    InsertElement {
        parent: NodeKey,
        node: NodeKey,
        tag: String,
        pos: usize,
    },
    SetAttr {
        node: NodeKey,
        name: String,
        value: String,
    },
    /// Replace all children of `node` with a single text run.
    SetText { node: NodeKey, text: String },
    SetStyle {
        node: NodeKey,
        property: String,
        value: String,
    },
    ToggleClass {
        node: NodeKey,
        class: String,
        present: bool,
    },
    RemoveNode { node: NodeKey },
    /// Smoothly scroll `node` into view, aligned to its top edge.
    ScrollIntoView { node: NodeKey },
    /// Append a `<style>` block to the document head.
    InjectStylesheet { css: String },
}

/// A subscriber that receives `DOMUpdate` values and applies them to its own state.
pub trait DOMSubscriber {
    /// Apply a single `DOMUpdate` to the subscriber state.
    ///
    /// # Errors
    ///
    /// Returns an error when the update references a node the subscriber does not know
    /// or the backing document rejects the mutation.
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()>;
}

/// Read access plus element creation over a live or mirrored document.
pub trait Document: DOMSubscriber {
    /// The `<body>` element.
    fn body(&self) -> NodeKey;

    /// Element with the given id attribute (case-sensitive).
    fn element_by_id(&self, id: &str) -> Option<NodeKey>;

    /// Elements carrying any of the given class tokens, in document order, each once.
    fn elements_by_any_class(&self, classes: &[&str]) -> Vec<NodeKey>;

    /// Elements carrying the given class token, in document order.
    fn elements_by_class(&self, class: &str) -> Vec<NodeKey> {
        self.elements_by_any_class(&[class])
    }

    /// Direct children of `parent` that carry `class`.
    fn children_by_class(&self, parent: NodeKey, class: &str) -> Vec<NodeKey>;

    /// Links whose `href` attribute starts with `#`, paired with that attribute.
    fn fragment_links(&self) -> Vec<(NodeKey, String)>;

    /// Whether `node` currently carries the class token.
    fn has_class(&self, node: NodeKey, class: &str) -> bool;

    /// Layout metrics of `node`, if it is laid out.
    fn box_metrics(&self, node: NodeKey) -> Option<BoxMetrics>;

    /// Create a new element under `parent` (appended last) and return its key.
    ///
    /// # Errors
    ///
    /// Returns an error when `parent` is unknown or element creation fails.
    fn create_element(&mut self, parent: NodeKey, tag: &str) -> Result<NodeKey>;
}

/// Convenience mutators layered over [`DOMSubscriber::apply_update`].
pub trait DocumentExt: Document {
    /// Set an inline style property.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the update.
    fn set_style(&mut self, node: NodeKey, property: &str, value: &str) -> Result<()> {
        self.apply_update(DOMUpdate::SetStyle {
            node,
            property: property.to_owned(),
            value: value.to_owned(),
        })
    }

    /// Replace the text content of `node`.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the update.
    fn set_text(&mut self, node: NodeKey, text: &str) -> Result<()> {
        self.apply_update(DOMUpdate::SetText {
            node,
            text: text.to_owned(),
        })
    }

    /// Add or remove a class token.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the update.
    fn toggle_class(&mut self, node: NodeKey, class: &str, present: bool) -> Result<()> {
        self.apply_update(DOMUpdate::ToggleClass {
            node,
            class: class.to_owned(),
            present,
        })
    }

    /// Remove `node` and its descendants.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the update.
    fn remove_node(&mut self, node: NodeKey) -> Result<()> {
        self.apply_update(DOMUpdate::RemoveNode { node })
    }

    /// Smoothly scroll `node` into view.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the update.
    fn scroll_into_view(&mut self, node: NodeKey) -> Result<()> {
        self.apply_update(DOMUpdate::ScrollIntoView { node })
    }

    /// Append a stylesheet to the document head.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the update.
    fn inject_stylesheet(&mut self, css: &str) -> Result<()> {
        self.apply_update(DOMUpdate::InjectStylesheet {
            css: css.to_owned(),
        })
    }
}

impl<T: Document + ?Sized> DocumentExt for T {}

//! Scroll-triggered reveal of content blocks.
//!
//! Registered elements start transparent and shifted down; the first time an
//! element qualifies as visible it fades and slides into place. Hosts with a
//! real intersection observer pass its verdicts in; hosts without one can use
//! [`ObserverOptions::qualifies`] on element rectangles.

use anyhow::Result;
use dom::{Document, DocumentExt as _, NodeKey, Rect, Viewport};
use log::debug;
use std::collections::HashSet;

const HIDDEN_OPACITY: &str = "0";
const HIDDEN_TRANSFORM: &str = "translateY(30px)";
const REVEALED_OPACITY: &str = "1";
const REVEALED_TRANSFORM: &str = "translateY(0)";
const TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

/// Trigger settings for the viewport watcher.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Pixels trimmed from the bottom edge of the viewport.
    pub bottom_margin: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
        }
    }
}

impl ObserverOptions {
    /// The `rootMargin` string an `IntersectionObserver` expects.
    #[must_use]
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin)
    }

    /// Whether an element at `rect` counts as visible in `viewport`.
    #[must_use]
    pub fn qualifies(&self, rect: Rect, viewport: Viewport) -> bool {
        let root = Rect::new(
            0.0,
            0.0,
            viewport.width,
            (viewport.height - self.bottom_margin).max(0.0),
        );
        let Some(visible) = rect.intersection(&root) else {
            return false;
        };
        let area = rect.area();
        if area <= 0.0 {
            return false;
        }
        visible.area() / area >= self.threshold
    }
}

/// One observation delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target: NodeKey,
    pub is_intersecting: bool,
}

/// Reveal controller over a fixed set of elements.
#[derive(Debug, Default)]
pub struct ScrollReveal {
    targets: Vec<NodeKey>,
    revealed: HashSet<NodeKey>,
    options: ObserverOptions,
}

impl ScrollReveal {
    /// Register `targets` (duplicates are kept once) with default observer options.
    #[must_use]
    pub fn new(targets: &[NodeKey]) -> Self {
        let mut seen = HashSet::new();
        Self {
            targets: targets
                .iter()
                .copied()
                .filter(|node| seen.insert(*node))
                .collect(),
            revealed: HashSet::new(),
            options: ObserverOptions::default(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> ObserverOptions {
        self.options
    }

    #[inline]
    #[must_use]
    pub fn targets(&self) -> &[NodeKey] {
        &self.targets
    }

    #[must_use]
    pub fn is_revealed(&self, node: NodeKey) -> bool {
        self.revealed.contains(&node)
    }

    /// Put every target into its hidden starting state.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn register<D: Document + ?Sized>(&self, doc: &mut D) -> Result<()> {
        for &node in &self.targets {
            doc.set_style(node, "opacity", HIDDEN_OPACITY)?;
            doc.set_style(node, "transform", HIDDEN_TRANSFORM)?;
            doc.set_style(node, "transition", TRANSITION)?;
        }
        debug!("reveal: registered {} targets", self.targets.len());
        Ok(())
    }

    /// Reveal `node`. Returns `false` without touching the document when the
    /// node is unknown or already revealed.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn reveal<D: Document + ?Sized>(&mut self, doc: &mut D, node: NodeKey) -> Result<bool> {
        if !self.targets.contains(&node) || !self.revealed.insert(node) {
            return Ok(false);
        }
        doc.set_style(node, "opacity", REVEALED_OPACITY)?;
        doc.set_style(node, "transform", REVEALED_TRANSFORM)?;
        Ok(true)
    }

    /// Apply a batch of observer entries; returns how many elements were newly revealed.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn on_intersections<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        entries: &[IntersectionEntry],
    ) -> Result<usize> {
        let mut count = 0;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if self.reveal(doc, entry.target)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

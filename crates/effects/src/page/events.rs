use super::{PageTask, PortfolioPage};
use crate::anchor_scroll::scroll_to_section;
use crate::reveal::IntersectionEntry;
use anyhow::Result;
use dom::{Document, NodeKey, Viewport};
use log::trace;

/// What the host should do with the native event after a click was handled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Suppress the browser's default navigation.
    pub default_prevented: bool,
    /// Ripple overlay spawned by this click, so the host can watch its animation.
    pub ripple: Option<NodeKey>,
}

impl<D: Document> PortfolioPage<D> {
    /// Elements whose clicks the page reacts to: skill tabs, buttons and
    /// in-page links, each once, in ascending key order.
    #[must_use]
    pub fn click_targets(&self) -> Vec<NodeKey> {
        let mut targets: Vec<NodeKey> = self
            .skills
            .tabs()
            .chain(self.ripple.buttons().iter().copied())
            .chain(self.anchors.links())
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    /// Elements that lift on hover.
    #[must_use]
    pub fn hover_targets(&self) -> &[NodeKey] {
        self.hover.cards()
    }

    /// Pointer moved to client (`x`, `y`) inside `viewport`.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn pointer_move(&mut self, x: f64, y: f64, viewport: Viewport) -> Result<()> {
        self.parallax.on_pointer_move(&mut self.doc, x, y, viewport)
    }

    /// Page scrolled to `scroll_y`. The parallax update is debounced.
    pub fn scroll(&mut self, scroll_y: f64) {
        if self.parallax.is_empty() {
            return;
        }
        let id = self
            .scroll_debounce
            .call(&mut self.timers, scroll_y, PageTask::ScrollParallax);
        trace!("scroll to {scroll_y} armed {id:?}");
    }

    /// Click on `target` at client (`client_x`, `client_y`). Every effect that
    /// registered `target` reacts, as separate listeners would.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of an update.
    pub fn click(&mut self, target: NodeKey, client_x: f64, client_y: f64) -> Result<ClickOutcome> {
        self.skills.on_click(&mut self.doc, target)?;
        let ripple = self
            .ripple
            .on_click(&mut self.doc, target, client_x, client_y)?;
        let default_prevented = self.anchors.on_click(&mut self.doc, target)?;
        Ok(ClickOutcome {
            default_prevented,
            ripple,
        })
    }

    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn pointer_enter(&mut self, target: NodeKey) -> Result<bool> {
        self.hover.on_enter(&mut self.doc, target)
    }

    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn pointer_leave(&mut self, target: NodeKey) -> Result<bool> {
        self.hover.on_leave(&mut self.doc, target)
    }

    /// Intersection observer verdicts for reveal targets. Returns newly revealed count.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn intersections(&mut self, entries: &[IntersectionEntry]) -> Result<usize> {
        self.reveal.on_intersections(&mut self.doc, entries)
    }

    /// An animation on `target` finished; reclaims ripple overlays.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the removal.
    pub fn animation_end(&mut self, target: NodeKey) -> Result<bool> {
        self.ripple.on_animation_end(&mut self.doc, target)
    }

    /// Smoothly scroll the element with id `section_id` into view.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the scroll request.
    pub fn scroll_to_section(&mut self, section_id: &str) -> Result<bool> {
        scroll_to_section(&mut self.doc, section_id)
    }
}

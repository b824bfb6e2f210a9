//! Click ripple feedback for buttons.

use anyhow::Result;
use dom::{BoxMetrics, Document, DocumentExt as _, NodeKey};
use log::{debug, trace};
use std::collections::HashMap;

/// Stylesheet the ripple overlay depends on; injected once before any ripple renders.
#[must_use]
pub fn ripple_stylesheet(button_class: &str, ripple_class: &str) -> String {
    format!(
        "
.{button_class} {{
    position: relative;
    overflow: hidden;
}}

.{ripple_class} {{
    position: absolute;
    border-radius: 50%;
    background-color: rgba(255, 255, 255, 0.3);
    transform: scale(0);
    animation: ripple-animation 0.6s linear;
    pointer-events: none;
}}

@keyframes ripple-animation {{
    to {{
        transform: scale(4);
        opacity: 0;
    }}
}}
"
    )
}

/// Size and placement of one overlay, relative to its button.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RippleGeometry {
    pub diameter: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// Centre a circle covering the button's larger side on the click point.
    #[must_use]
    pub fn at_click(metrics: BoxMetrics, client_x: f64, client_y: f64) -> Self {
        let diameter = metrics.client_width.max(metrics.client_height);
        let radius = diameter / 2.0;
        Self {
            diameter,
            left: client_x - metrics.offset_left - radius,
            top: client_y - metrics.offset_top - radius,
        }
    }
}

/// Ripple controller over a fixed set of buttons.
#[derive(Debug, Default)]
pub struct Ripple {
    buttons: Vec<NodeKey>,
    /// Live overlay per button.
    live: HashMap<NodeKey, NodeKey>,
    class: String,
}

impl Ripple {
    #[must_use]
    pub fn new(buttons: &[NodeKey], ripple_class: &str) -> Self {
        Self {
            buttons: buttons.to_vec(),
            live: HashMap::new(),
            class: ripple_class.to_owned(),
        }
    }

    #[must_use]
    pub fn buttons(&self) -> &[NodeKey] {
        &self.buttons
    }

    #[must_use]
    pub fn handles(&self, button: NodeKey) -> bool {
        self.buttons.contains(&button)
    }

    /// Overlay currently attached to `button`.
    #[must_use]
    pub fn live_overlay(&self, button: NodeKey) -> Option<NodeKey> {
        self.live.get(&button).copied()
    }

    /// Number of overlays attached across all buttons.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Spawn an overlay on `button` for a click at client (`client_x`, `client_y`).
    ///
    /// Returns the new overlay, or `None` when `button` is not registered.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of an element or style update.
    pub fn on_click<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        button: NodeKey,
        client_x: f64,
        client_y: f64,
    ) -> Result<Option<NodeKey>> {
        if !self.handles(button) {
            return Ok(None);
        }
        let metrics = doc.box_metrics(button).unwrap_or_default();
        let geometry = RippleGeometry::at_click(metrics, client_x, client_y);

        if let Some(previous) = self.live.remove(&button) {
            trace!("ripple: replacing overlay {previous:?}");
            doc.remove_node(previous)?;
        }
        // Overlays left behind by other scripts are cleared too.
        for stray in doc.children_by_class(button, &self.class) {
            doc.remove_node(stray)?;
        }

        let overlay = doc.create_element(button, "span")?;
        let size = format!("{}px", geometry.diameter);
        doc.set_style(overlay, "width", &size)?;
        doc.set_style(overlay, "height", &size)?;
        doc.set_style(overlay, "left", &format!("{}px", geometry.left))?;
        doc.set_style(overlay, "top", &format!("{}px", geometry.top))?;
        doc.toggle_class(overlay, &self.class, true)?;
        self.live.insert(button, overlay);
        debug!("ripple: {overlay:?} on {button:?} {geometry:?}");
        Ok(Some(overlay))
    }

    /// The overlay's animation finished; detach it. Returns `false` for unknown nodes.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the removal.
    pub fn on_animation_end<D: Document + ?Sized>(&mut self, doc: &mut D, overlay: NodeKey) -> Result<bool> {
        let Some(button) = self
            .live
            .iter()
            .find_map(|(button, live)| (*live == overlay).then_some(*button))
        else {
            return Ok(false);
        };
        self.live.remove(&button);
        doc.remove_node(overlay)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::MemoryDocument;

    fn button(doc: &mut MemoryDocument) -> NodeKey {
        let body = doc.body();
        let node = doc.element(body, "a", &[("class", "btn")]).unwrap();
        doc.set_box_metrics(
            node,
            BoxMetrics {
                client_width: 120.0,
                client_height: 40.0,
                offset_left: 100.0,
                offset_top: 300.0,
            },
        )
        .unwrap();
        node
    }

    #[test]
    fn overlay_is_centred_on_the_click() {
        let mut doc = MemoryDocument::new();
        let btn = button(&mut doc);
        let mut ripple = Ripple::new(&[btn], "ripple");

        let overlay = ripple.on_click(&mut doc, btn, 130.0, 320.0).unwrap().unwrap();
        assert_eq!(doc.style(overlay, "width"), Some("120px"));
        assert_eq!(doc.style(overlay, "height"), Some("120px"));
        assert_eq!(doc.style(overlay, "left"), Some("-30px"));
        assert_eq!(doc.style(overlay, "top"), Some("-40px"));
        assert!(doc.has_class(overlay, "ripple"));
        assert_eq!(doc.children(btn), &[overlay]);
    }

    #[test]
    fn second_click_replaces_the_first_overlay() {
        let mut doc = MemoryDocument::new();
        let btn = button(&mut doc);
        let mut ripple = Ripple::new(&[btn], "ripple");

        let first = ripple.on_click(&mut doc, btn, 110.0, 310.0).unwrap().unwrap();
        let second = ripple.on_click(&mut doc, btn, 150.0, 320.0).unwrap().unwrap();
        assert!(!doc.contains(first));
        assert_eq!(doc.children(btn), &[second]);
        assert_eq!(ripple.live_count(), 1);
    }

    #[test]
    fn animation_end_reclaims_the_overlay() {
        let mut doc = MemoryDocument::new();
        let btn = button(&mut doc);
        let mut ripple = Ripple::new(&[btn], "ripple");

        let overlay = ripple.on_click(&mut doc, btn, 110.0, 310.0).unwrap().unwrap();
        assert!(ripple.on_animation_end(&mut doc, overlay).unwrap());
        assert!(!doc.contains(overlay));
        assert!(doc.children(btn).is_empty());
        assert_eq!(ripple.live_overlay(btn), None);
        assert!(!ripple.on_animation_end(&mut doc, overlay).unwrap());
    }

    #[test]
    fn stylesheet_targets_the_configured_classes() {
        let css = ripple_stylesheet("btn", "ripple");
        assert!(css.contains(".btn {"));
        assert!(css.contains(".ripple {"));
        assert!(css.contains("@keyframes ripple-animation"));
        assert!(css.contains("transform: scale(4);"));
    }

    #[test]
    fn unregistered_elements_get_no_ripple() {
        let mut doc = MemoryDocument::new();
        let btn = button(&mut doc);
        let mut ripple = Ripple::new(&[], "ripple");
        assert_eq!(ripple.on_click(&mut doc, btn, 0.0, 0.0).unwrap(), None);
    }
}

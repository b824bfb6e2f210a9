//! Hover lift for project cards.

use anyhow::Result;
use dom::{Document, DocumentExt as _, NodeKey};

const LIFTED: &str = "translateY(-10px) scale(1.02)";
const RESTING: &str = "translateY(0) scale(1)";

#[derive(Debug, Default)]
pub struct CardHover {
    cards: Vec<NodeKey>,
}

impl CardHover {
    #[must_use]
    pub fn new(cards: &[NodeKey]) -> Self {
        Self {
            cards: cards.to_vec(),
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[NodeKey] {
        &self.cards
    }

    #[must_use]
    pub fn handles(&self, card: NodeKey) -> bool {
        self.cards.contains(&card)
    }

    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn on_enter<D: Document + ?Sized>(&self, doc: &mut D, card: NodeKey) -> Result<bool> {
        self.set(doc, card, LIFTED)
    }

    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn on_leave<D: Document + ?Sized>(&self, doc: &mut D, card: NodeKey) -> Result<bool> {
        self.set(doc, card, RESTING)
    }

    fn set<D: Document + ?Sized>(&self, doc: &mut D, card: NodeKey, transform: &str) -> Result<bool> {
        if !self.handles(card) {
            return Ok(false);
        }
        doc.set_style(card, "transform", transform)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::MemoryDocument;

    #[test]
    fn enter_lifts_and_leave_restores() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let card = doc.element(body, "div", &[("class", "project-card")]).unwrap();
        let hover = CardHover::new(&[card]);

        assert!(hover.on_enter(&mut doc, card).unwrap());
        assert_eq!(doc.style(card, "transform"), Some(LIFTED));
        assert!(hover.on_leave(&mut doc, card).unwrap());
        assert_eq!(doc.style(card, "transform"), Some(RESTING));
        assert!(!hover.on_enter(&mut doc, body).unwrap());
    }
}

//! Fade the page in once loading completes.

use anyhow::Result;
use dom::{Document, DocumentExt as _, NodeKey};

/// Page-level opacity fade bound to the `<body>` element.
#[derive(Debug)]
pub struct LoadFade {
    body: NodeKey,
    visible: bool,
}

impl LoadFade {
    #[must_use]
    pub const fn new(body: NodeKey) -> Self {
        Self {
            body,
            visible: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide the page and arm the opacity transition.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn begin<D: Document + ?Sized>(&mut self, doc: &mut D) -> Result<()> {
        doc.set_style(self.body, "opacity", "0")?;
        doc.set_style(self.body, "transition", "opacity 0.5s ease")?;
        self.visible = false;
        Ok(())
    }

    /// Reveal the page.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn fade_in<D: Document + ?Sized>(&mut self, doc: &mut D) -> Result<()> {
        doc.set_style(self.body, "opacity", "1")?;
        self.visible = true;
        Ok(())
    }
}

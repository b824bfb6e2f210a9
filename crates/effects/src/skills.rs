//! Skill tabs: one active (tab, content) pair at a time, rotating on a timer.

use anyhow::Result;
use dom::{Document, DocumentExt as _, NodeKey};
use log::{debug, warn};

/// Controller for a fixed set of tab/content pairs.
#[derive(Debug)]
pub struct SkillTabs {
    pairs: Vec<(NodeKey, NodeKey)>,
    current: usize,
    active_class: String,
}

impl SkillTabs {
    /// Pair `tabs` with `contents` by position. Unpaired extras are ignored.
    #[must_use]
    pub fn new(tabs: &[NodeKey], contents: &[NodeKey], active_class: &str) -> Self {
        if tabs.len() != contents.len() {
            warn!(
                "skill tabs: {} tabs vs {} contents, pairing the first {}",
                tabs.len(),
                contents.len(),
                tabs.len().min(contents.len())
            );
        }
        Self {
            pairs: tabs.iter().copied().zip(contents.iter().copied()).collect(),
            current: 0,
            active_class: active_class.to_owned(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Index of the last pair shown.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Registered tabs, in pairing order.
    pub fn tabs(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.pairs.iter().map(|(tab, _)| *tab)
    }

    /// Position of `tab` among the registered tabs.
    #[must_use]
    pub fn tab_index(&self, tab: NodeKey) -> Option<usize> {
        self.pairs.iter().position(|(candidate, _)| *candidate == tab)
    }

    /// Deactivate every pair, then activate pair `index` and make it current.
    ///
    /// An out-of-range index is logged and ignored.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a class update.
    pub fn show<D: Document + ?Sized>(&mut self, doc: &mut D, index: usize) -> Result<()> {
        let Some(&(tab, content)) = self.pairs.get(index) else {
            warn!("skill tabs: index {index} out of range ({} pairs)", self.pairs.len());
            return Ok(());
        };
        for &(other_tab, other_content) in &self.pairs {
            doc.toggle_class(other_tab, &self.active_class, false)?;
            doc.toggle_class(other_content, &self.active_class, false)?;
        }
        doc.toggle_class(tab, &self.active_class, true)?;
        doc.toggle_class(content, &self.active_class, true)?;
        self.current = index;
        debug!("skill tabs: showing {index}");
        Ok(())
    }

    /// Show the pair after the current one, wrapping around.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a class update.
    pub fn auto_rotate<D: Document + ?Sized>(&mut self, doc: &mut D) -> Result<()> {
        if self.pairs.is_empty() {
            return Ok(());
        }
        let next = (self.current + 1) % self.pairs.len();
        self.show(doc, next)
    }

    /// Handle a click on `tab`. Returns `true` when it was one of ours.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a class update.
    pub fn on_click<D: Document + ?Sized>(&mut self, doc: &mut D, tab: NodeKey) -> Result<bool> {
        match self.tab_index(tab) {
            Some(index) => {
                self.show(doc, index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

//! Parallax drift for decorative orbs.
//!
//! Pointer position and page scroll each contribute a named offset per orb.
//! Whichever input changes, the orb's transform is rebuilt from the sum of
//! both offsets, so the result does not depend on event ordering.

use anyhow::Result;
use core::ops::Add;
use dom::{Document, DocumentExt as _, NodeKey, Viewport};

/// Per-orb pointer speed step: orb `i` moves `(i + 1) * 0.5` times the base.
const POINTER_SPEED_STEP: f64 = 0.5;
/// Maximum pointer travel, in pixels, for a speed of 1.
const POINTER_RANGE_PX: f64 = 50.0;
/// Per-orb scroll speed step.
const SCROLL_SPEED_STEP: f64 = 0.1;

/// A 2D offset in CSS pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct OrbOffsets {
    pointer: Offset,
    scroll: Offset,
}

/// Parallax controller over an ordered set of orbs.
#[derive(Debug, Default)]
pub struct Parallax {
    orbs: Vec<(NodeKey, OrbOffsets)>,
}

/// CSS transform for a combined offset.
#[must_use]
pub fn translate(offset: Offset) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

impl Parallax {
    #[must_use]
    pub fn new(orbs: &[NodeKey]) -> Self {
        Self {
            orbs: orbs
                .iter()
                .map(|&node| (node, OrbOffsets::default()))
                .collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    /// Combined offset currently applied to orb `index`.
    #[must_use]
    pub fn offset(&self, index: usize) -> Option<Offset> {
        self.orbs
            .get(index)
            .map(|(_, offsets)| offsets.pointer + offsets.scroll)
    }

    /// Pointer offset for orb `index` given pointer fractions of the viewport.
    #[must_use]
    pub fn pointer_offset(index: usize, fraction_x: f64, fraction_y: f64) -> Offset {
        let speed = (index as f64 + 1.0) * POINTER_SPEED_STEP;
        Offset::new(
            (fraction_x - 0.5) * speed * POINTER_RANGE_PX,
            (fraction_y - 0.5) * speed * POINTER_RANGE_PX,
        )
    }

    /// Scroll offset for orb `index` at `scroll_y` pixels.
    #[must_use]
    pub fn scroll_offset(index: usize, scroll_y: f64) -> Offset {
        let speed = (index as f64 + 1.0) * SCROLL_SPEED_STEP;
        Offset::new(0.0, scroll_y * speed)
    }

    /// Pointer moved to client coordinates (`x`, `y`) inside `viewport`.
    /// Ignored for a zero-size viewport.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn on_pointer_move<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        x: f64,
        y: f64,
        viewport: Viewport,
    ) -> Result<()> {
        if viewport.is_degenerate() {
            return Ok(());
        }
        let fraction_x = x / viewport.width;
        let fraction_y = y / viewport.height;
        for (index, (_, offsets)) in self.orbs.iter_mut().enumerate() {
            offsets.pointer = Self::pointer_offset(index, fraction_x, fraction_y);
        }
        self.apply(doc)
    }

    /// Page scrolled to `scroll_y`.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of a style update.
    pub fn on_scroll<D: Document + ?Sized>(&mut self, doc: &mut D, scroll_y: f64) -> Result<()> {
        for (index, (_, offsets)) in self.orbs.iter_mut().enumerate() {
            offsets.scroll = Self::scroll_offset(index, scroll_y);
        }
        self.apply(doc)
    }

    fn apply<D: Document + ?Sized>(&self, doc: &mut D) -> Result<()> {
        for (node, offsets) in &self.orbs {
            doc.set_style(*node, "transform", &translate(offsets.pointer + offsets.scroll))?;
        }
        Ok(())
    }
}

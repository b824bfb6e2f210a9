//! Replays a [`PortfolioPage`] over a [`MemoryDocument`] and reports what a
//! visitor would see change.

use anyhow::Result;
use core::fmt;
use core::time::Duration;
use dom::{Document as _, MemoryDocument};
use effects::PortfolioPage;
use std::io::Write;
use tokio::time::{Instant, sleep_until};

pub type HeadlessPage = PortfolioPage<MemoryDocument>;

/// A visible change on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    Typed(String),
    SkillTab(usize),
    FadedIn,
}

/// A [`Change`] stamped with page time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub at: Duration,
    pub change: Change,
}

impl fmt::Display for Frame {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.at.as_millis();
        match &self.change {
            Change::Typed(text) => write!(formatter, "{millis:>7}ms  typed  {text:?}"),
            Change::SkillTab(index) => write!(formatter, "{millis:>7}ms  skill  {index}"),
            Change::FadedIn => write!(formatter, "{millis:>7}ms  faded in"),
        }
    }
}

/// Remembers the last reported state so only differences are emitted.
#[derive(Debug, Default)]
pub struct Recorder {
    text: Option<String>,
    tab: Option<usize>,
    visible: bool,
}

impl Recorder {
    /// Compare `page` against the last observation and return the changes.
    pub fn observe(&mut self, at: Duration, page: &HeadlessPage) -> Vec<Frame> {
        let mut frames = Vec::new();
        let doc = page.document();

        let text = doc
            .text_content(page.typing().target())
            .unwrap_or_default()
            .to_owned();
        if self.text.as_ref() != Some(&text) {
            self.text = Some(text.clone());
            frames.push(Frame {
                at,
                change: Change::Typed(text),
            });
        }

        let active = &page.config().contract.active_class;
        let tab = page
            .skills()
            .tabs()
            .position(|tab_key| doc.has_class(tab_key, active));
        if tab.is_some() && tab != self.tab {
            self.tab = tab;
            if let Some(index) = tab {
                frames.push(Frame {
                    at,
                    change: Change::SkillTab(index),
                });
            }
        }

        if page.fade().is_visible() && !self.visible {
            self.visible = true;
            frames.push(Frame {
                at,
                change: Change::FadedIn,
            });
        }
        frames
    }
}

/// Deliver the page lifecycle signals a browser would send right away.
///
/// # Errors
///
/// Propagates a failure of the DOM-ready handlers.
pub fn boot(page: &mut HeadlessPage) -> Result<()> {
    page.dom_content_loaded()?;
    page.load();
    Ok(())
}

/// Run every task due up to `until` without waiting, returning the changes.
///
/// # Errors
///
/// Stops at the first failing task.
pub fn replay(page: &mut HeadlessPage, until: Duration) -> Result<Vec<Frame>> {
    let mut recorder = Recorder::default();
    let mut frames = recorder.observe(page.now(), page);
    while let Some(deadline) = page.next_deadline().filter(|deadline| *deadline <= until) {
        page.tick_timers_once(deadline)?;
        frames.extend(recorder.observe(deadline, page));
    }
    page.advance_to(until)?;
    Ok(frames)
}

/// Like [`replay`], but sleeps until each deadline and writes changes to
/// `out` as they happen.
///
/// # Errors
///
/// Stops at the first failing task or write.
pub async fn replay_live<W: Write>(page: &mut HeadlessPage, until: Duration, out: &mut W) -> Result<usize> {
    let started = Instant::now();
    let mut recorder = Recorder::default();
    let mut written = 0;
    for frame in recorder.observe(page.now(), page) {
        writeln!(out, "{frame}")?;
        written += 1;
    }
    while let Some(deadline) = page.next_deadline().filter(|deadline| *deadline <= until) {
        sleep_until(started + deadline).await;
        page.tick_timers_once(deadline)?;
        for frame in recorder.observe(deadline, page) {
            writeln!(out, "{frame}")?;
            written += 1;
        }
        out.flush()?;
    }
    sleep_until(started + until).await;
    page.advance_to(until)?;
    Ok(written)
}

/// Write `frames`, one per line.
///
/// # Errors
///
/// Propagates write failures.
pub fn render<W: Write>(frames: &[Frame], out: &mut W) -> Result<()> {
    for frame in frames {
        writeln!(out, "{frame}")?;
    }
    Ok(())
}

//! Page-time bookkeeping for the browser driver.
//!
//! The page's timer queue only knows the time it is told. Every browser
//! callback first brings it up to the wall clock, so work scheduled by the
//! callback (debounced scrolls, the load fade) is measured from the moment
//! the event arrived.

use anyhow::Result;
use core::time::Duration;
use dom::Document;
use effects::PortfolioPage;
use log::error;

/// Run the tasks that fell due before `now` and move the page clock there.
/// A failing overdue task is logged, not returned.
pub fn catch_up<D: Document>(page: &mut PortfolioPage<D>, now: Duration) {
    if let Err(err) = page.advance_to(now) {
        error!("catching up to {}ms: {err:#}", now.as_millis());
    }
}

/// [`catch_up`] to `now`, then hand the page to `action`.
///
/// # Errors
///
/// Propagates the failure of `action`.
pub fn deliver<D, F>(page: &mut PortfolioPage<D>, now: Duration, action: F) -> Result<()>
where
    D: Document,
    F: FnOnce(&mut PortfolioPage<D>) -> Result<()>,
{
    catch_up(page, now);
    action(page)
}

/// `setTimeout` delay in milliseconds for the next page deadline, seen from
/// `now`. Overdue deadlines fire at once; delays past `i32::MAX` are clamped.
#[must_use]
pub fn timeout_delay(deadline: Option<Duration>, now: Duration) -> Option<i32> {
    deadline.map(|due| i32::try_from(due.saturating_sub(now).as_millis()).unwrap_or(i32::MAX))
}

//! Visual effects for the portfolio page.
//!
//! Each effect is a small controller that owns its own state and talks to the
//! page only through the [`dom::Document`] facade. [`PortfolioPage`] wires them
//! together behind a deterministic timer queue, so the whole page can run in a
//! browser, headless, or under test with virtual time.

pub mod anchor_scroll;
pub mod card_hover;
pub mod config;
pub mod debounce;
pub mod load_fade;
pub mod page;
pub mod parallax;
pub mod reveal;
pub mod ripple;
pub mod sample_page;
pub mod skills;
pub mod timers;
pub mod typing;

pub use config::{EffectsConfig, PageContract};
pub use page::{ClickOutcome, PageTask, PortfolioPage};
pub use reveal::{IntersectionEntry, ObserverOptions};
pub use sample_page::SamplePage;
pub use timers::{TimerId, TimerQueue};
pub use typing::{TypingEngine, TypingPhase};

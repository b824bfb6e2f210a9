//! The page controller: owns the document, the timer queue and every effect.
//!
//! Hosts drive a [`PortfolioPage`] through three lifecycle calls mirroring the
//! browser (`attach` when the script runs, [`PortfolioPage::dom_content_loaded`],
//! [`PortfolioPage::load`]), the input events in [`events`], and the timer pump
//! ([`PortfolioPage::next_deadline`] / [`PortfolioPage::advance_to`]).

use crate::anchor_scroll::AnchorScroll;
use crate::card_hover::CardHover;
use crate::config::EffectsConfig;
use crate::debounce::Debounce;
use crate::load_fade::LoadFade;
use crate::parallax::Parallax;
use crate::reveal::ScrollReveal;
use crate::ripple::{Ripple, ripple_stylesheet};
use crate::skills::SkillTabs;
use crate::timers::{TimerId, TimerQueue};
use crate::typing::{TypingEngine, TypingTimings};
use anyhow::{Result, anyhow};
use core::time::Duration;
use dom::{Document, DocumentExt as _};
use log::{debug, info, warn};

pub mod events;
pub use events::ClickOutcome;

/// Work items parked on the page's timer queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageTask {
    TypeTick,
    /// First delay before the skill tabs begin rotating.
    StartSkillRotation,
    RotateSkills,
    /// Trailing edge of the scroll debounce.
    ScrollParallax,
    FadeIn,
}

/// A portfolio page with all of its effects attached.
#[derive(Debug)]
pub struct PortfolioPage<D: Document> {
    doc: D,
    config: EffectsConfig,
    timers: TimerQueue<PageTask>,
    typing: TypingEngine,
    skills: SkillTabs,
    reveal: ScrollReveal,
    parallax: Parallax,
    scroll_debounce: Debounce<f64>,
    ripple: Ripple,
    anchors: AnchorScroll,
    hover: CardHover,
    fade: LoadFade,
    ready: bool,
    loaded: bool,
}

impl<D: Document> PortfolioPage<D> {
    /// Bind every effect to `doc`. This is the moment the page script runs:
    /// the ripple stylesheet is injected and the page is hidden for the fade.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid, the typing display
    /// element is missing, or the document rejects the initial updates.
    pub fn attach(mut doc: D, config: EffectsConfig) -> Result<Self> {
        config.validate()?;
        let contract = &config.contract;
        let typed_text = doc.element_by_id(&contract.typed_text_id).ok_or_else(|| {
            anyhow!(
                "typing display element #{} not found",
                contract.typed_text_id
            )
        })?;
        let typing = TypingEngine::new(&config.words, typed_text, TypingTimings::from(&config))?;

        doc.inject_stylesheet(&ripple_stylesheet(
            &contract.button_class,
            &contract.ripple_class,
        ))?;
        let mut fade = LoadFade::new(doc.body());
        fade.begin(&mut doc)?;

        let skills = SkillTabs::new(
            &doc.elements_by_class(&contract.skill_tab_class),
            &doc.elements_by_class(&contract.skill_content_class),
            &contract.active_class,
        );
        let reveal_classes: Vec<&str> = contract.reveal_classes.iter().map(String::as_str).collect();
        let reveal = ScrollReveal::new(&doc.elements_by_any_class(&reveal_classes));
        let parallax = Parallax::new(&doc.elements_by_class(&contract.orb_class));
        let ripple = Ripple::new(
            &doc.elements_by_class(&contract.button_class),
            &contract.ripple_class,
        );
        let anchors = AnchorScroll::new(doc.fragment_links());
        let hover = CardHover::new(&doc.elements_by_class(&contract.project_card_class));

        info!(
            "page attached: {} skill pairs, {} reveal targets, {} words",
            skills.len(),
            reveal.targets().len(),
            config.words.len()
        );

        Ok(Self {
            scroll_debounce: Debounce::new(config.scroll_debounce()),
            doc,
            config,
            timers: TimerQueue::new(),
            typing,
            skills,
            reveal,
            parallax,
            ripple,
            anchors,
            hover,
            fade,
            ready: false,
            loaded: false,
        })
    }

    /// Start the effects that wait for the DOM: typing, reveal, skill tabs.
    /// Repeated calls are ignored.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of an update.
    pub fn dom_content_loaded(&mut self) -> Result<()> {
        if self.ready {
            warn!("DOMContentLoaded delivered twice; ignoring");
            return Ok(());
        }
        self.ready = true;

        let delay = self.typing.tick(&mut self.doc)?;
        self.timers.schedule(delay, PageTask::TypeTick);

        self.reveal.register(&mut self.doc)?;

        if !self.skills.is_empty() {
            self.skills.show(&mut self.doc, 0)?;
            self.timers
                .schedule(self.config.skill_start_delay(), PageTask::StartSkillRotation);
        }
        debug!("DOMContentLoaded handled at {:?}", self.timers.now());
        Ok(())
    }

    /// The load signal fired: schedule the fade-in. Repeated calls are ignored.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        self.timers
            .schedule(self.config.fade_in_delay(), PageTask::FadeIn);
    }

    /// Deadline of the next pending task, measured from page start.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Run at most one task due at or before `now`. Returns whether one ran.
    ///
    /// # Errors
    ///
    /// Propagates the failure of the task that ran.
    pub fn tick_timers_once(&mut self, now: Duration) -> Result<bool> {
        let Some((id, task)) = self.timers.pop_due(now) else {
            return Ok(false);
        };
        self.run_task(id, task)?;
        Ok(true)
    }

    /// Run every task due at or before `now`, in deadline order, then move the
    /// clock to `now`. Returns the number of tasks run.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failing task's error.
    pub fn advance_to(&mut self, now: Duration) -> Result<usize> {
        let mut ran = 0;
        while self.tick_timers_once(now)? {
            ran += 1;
        }
        self.timers.advance_clock(now);
        Ok(ran)
    }

    fn run_task(&mut self, id: TimerId, task: PageTask) -> Result<()> {
        match task {
            PageTask::TypeTick => {
                let delay = self.typing.tick(&mut self.doc)?;
                self.timers.schedule(delay, PageTask::TypeTick);
            }
            PageTask::StartSkillRotation => {
                self.timers
                    .schedule(self.config.skill_interval(), PageTask::RotateSkills);
            }
            PageTask::RotateSkills => {
                self.skills.auto_rotate(&mut self.doc)?;
                self.timers
                    .schedule(self.config.skill_interval(), PageTask::RotateSkills);
            }
            PageTask::ScrollParallax => {
                if let Some(scroll_y) = self.scroll_debounce.fire(id) {
                    self.parallax.on_scroll(&mut self.doc, scroll_y)?;
                }
            }
            PageTask::FadeIn => self.fade.fade_in(&mut self.doc)?,
        }
        Ok(())
    }

    #[must_use]
    pub const fn document(&self) -> &D {
        &self.doc
    }

    pub const fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    #[must_use]
    pub const fn config(&self) -> &EffectsConfig {
        &self.config
    }

    #[must_use]
    pub const fn typing(&self) -> &TypingEngine {
        &self.typing
    }

    #[must_use]
    pub const fn skills(&self) -> &SkillTabs {
        &self.skills
    }

    #[must_use]
    pub const fn reveal(&self) -> &ScrollReveal {
        &self.reveal
    }

    #[must_use]
    pub const fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    #[must_use]
    pub const fn ripple(&self) -> &Ripple {
        &self.ripple
    }

    #[must_use]
    pub const fn fade(&self) -> &LoadFade {
        &self.fade
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}

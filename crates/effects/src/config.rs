//! Configuration for the portfolio page effects.
//!
//! The defaults reproduce the published page. Hosts may override any field
//! from JSON (the browser entry point) or from environment variables (the
//! headless driver).

use anyhow::{Context as _, Result, bail};
use core::time::Duration;
use serde::Deserialize;
use std::env;

/// Identifiers and class names the effects expect to find in the page.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageContract {
    /// Id of the element that receives typed text. Required.
    pub typed_text_id: String,
    pub skill_tab_class: String,
    pub skill_content_class: String,
    /// Classes animated by the scroll reveal.
    pub reveal_classes: Vec<String>,
    pub project_card_class: String,
    pub orb_class: String,
    pub button_class: String,
    pub ripple_class: String,
    pub active_class: String,
}

impl Default for PageContract {
    fn default() -> Self {
        Self {
            typed_text_id: "typedText".to_owned(),
            skill_tab_class: "skill-tab".to_owned(),
            skill_content_class: "skill-content".to_owned(),
            reveal_classes: vec![
                "project-card".to_owned(),
                "interest-item".to_owned(),
                "skill-tab".to_owned(),
                "main-project".to_owned(),
            ],
            project_card_class: "project-card".to_owned(),
            orb_class: "floating-orb".to_owned(),
            button_class: "btn".to_owned(),
            ripple_class: "ripple".to_owned(),
            active_class: "active".to_owned(),
        }
    }
}

/// Runtime configuration for the page effects. All durations are milliseconds.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EffectsConfig {
    /// Words cycled by the typing effect. Must not be empty.
    pub words: Vec<String>,
    pub type_interval_ms: u64,
    pub delete_interval_ms: u64,
    /// Dwell on a fully typed word before deleting starts.
    pub word_pause_ms: u64,
    /// Delay between DOM-ready and the first skill rotation.
    pub skill_start_delay_ms: u64,
    pub skill_interval_ms: u64,
    pub scroll_debounce_ms: u64,
    /// Delay between the load signal and the fade-in.
    pub fade_in_delay_ms: u64,
    pub contract: PageContract,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            words: [
                "Developer",
                "AI Enthusiast",
                "Problem Solver",
                "Tech Student",
                "Innovator",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            type_interval_ms: 100,
            delete_interval_ms: 50,
            word_pause_ms: 2000,
            skill_start_delay_ms: 5000,
            skill_interval_ms: 4000,
            scroll_debounce_ms: 10,
            fade_in_delay_ms: 100,
            contract: PageContract::default(),
        }
    }
}

fn env_millis(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|val| val.trim().parse::<u64>().ok())
}

impl EffectsConfig {
    /// Parse a (possibly partial) JSON object; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or the result fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid effects config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// Reads the following environment variables:
    /// - `FOLIO_WORDS`: comma separated word list
    /// - `FOLIO_TYPE_MS`: typing interval
    /// - `FOLIO_DELETE_MS`: deleting interval
    /// - `FOLIO_PAUSE_MS`: pause after a fully typed word
    /// - `FOLIO_SKILL_START_MS`: delay before skill tabs start rotating
    /// - `FOLIO_SKILL_INTERVAL_MS`: skill rotation interval
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let words = env::var("FOLIO_WORDS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|word| !word.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|words| !words.is_empty())
            .unwrap_or(defaults.words);
        Self {
            words,
            type_interval_ms: env_millis("FOLIO_TYPE_MS").unwrap_or(defaults.type_interval_ms),
            delete_interval_ms: env_millis("FOLIO_DELETE_MS").unwrap_or(defaults.delete_interval_ms),
            word_pause_ms: env_millis("FOLIO_PAUSE_MS").unwrap_or(defaults.word_pause_ms),
            skill_start_delay_ms: env_millis("FOLIO_SKILL_START_MS")
                .unwrap_or(defaults.skill_start_delay_ms),
            skill_interval_ms: env_millis("FOLIO_SKILL_INTERVAL_MS")
                .unwrap_or(defaults.skill_interval_ms),
            ..defaults
        }
    }

    /// Reject configurations the effects cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty word list or a zero typing, deleting or
    /// rotation interval (those would spin the timer queue without advancing time).
    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            bail!("typing effect needs at least one word");
        }
        if self.type_interval_ms == 0 || self.delete_interval_ms == 0 {
            bail!("typing and deleting intervals must be non-zero");
        }
        if self.skill_interval_ms == 0 {
            bail!("skill rotation interval must be non-zero");
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub const fn type_interval(&self) -> Duration {
        Duration::from_millis(self.type_interval_ms)
    }

    #[inline]
    #[must_use]
    pub const fn delete_interval(&self) -> Duration {
        Duration::from_millis(self.delete_interval_ms)
    }

    #[inline]
    #[must_use]
    pub const fn word_pause(&self) -> Duration {
        Duration::from_millis(self.word_pause_ms)
    }

    #[inline]
    #[must_use]
    pub const fn skill_start_delay(&self) -> Duration {
        Duration::from_millis(self.skill_start_delay_ms)
    }

    #[inline]
    #[must_use]
    pub const fn skill_interval(&self) -> Duration {
        Duration::from_millis(self.skill_interval_ms)
    }

    #[inline]
    #[must_use]
    pub const fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    #[inline]
    #[must_use]
    pub const fn fade_in_delay(&self) -> Duration {
        Duration::from_millis(self.fade_in_delay_ms)
    }
}

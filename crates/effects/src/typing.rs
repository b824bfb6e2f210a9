//! Looping typewriter effect.
//!
//! The engine types a word one character per tick, dwells on the finished
//! word, deletes it twice as fast, then moves to the next word. Each tick
//! rewrites the display element and returns the delay until the next tick.

use crate::config::EffectsConfig;
use anyhow::{Result, bail};
use core::time::Duration;
use dom::{Document, DocumentExt as _, NodeKey};
use log::debug;

/// Where the engine is in its cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    PausedAfterWord,
    Deleting,
}

/// Tick intervals for the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypingTimings {
    pub type_interval: Duration,
    pub delete_interval: Duration,
    pub word_pause: Duration,
}

impl From<&EffectsConfig> for TypingTimings {
    fn from(config: &EffectsConfig) -> Self {
        Self {
            type_interval: config.type_interval(),
            delete_interval: config.delete_interval(),
            word_pause: config.word_pause(),
        }
    }
}

/// Typewriter state machine bound to one display element.
#[derive(Debug)]
pub struct TypingEngine {
    words: Vec<Vec<char>>,
    word: usize,
    cursor: usize,
    phase: TypingPhase,
    target: NodeKey,
    timings: TypingTimings,
}

impl TypingEngine {
    /// Build an engine that writes into `target`.
    ///
    /// # Errors
    ///
    /// Returns an error when `words` is empty.
    pub fn new<S: AsRef<str>>(words: &[S], target: NodeKey, timings: TypingTimings) -> Result<Self> {
        if words.is_empty() {
            bail!("typing effect needs at least one word");
        }
        Ok(Self {
            words: words.iter().map(|word| word.as_ref().chars().collect()).collect(),
            word: 0,
            cursor: 0,
            phase: TypingPhase::Typing,
            target,
            timings,
        })
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> TypingPhase {
        self.phase
    }

    /// Index of the word currently being typed or deleted.
    #[inline]
    #[must_use]
    pub const fn word_index(&self) -> usize {
        self.word
    }

    /// Number of characters of the current word on display.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn target(&self) -> NodeKey {
        self.target
    }

    fn current_len(&self) -> usize {
        self.words.get(self.word).map_or(0, Vec::len)
    }

    /// The text the display element should show right now.
    #[must_use]
    pub fn visible_text(&self) -> String {
        self.words
            .get(self.word)
            .map(|chars| chars.iter().take(self.cursor).collect())
            .unwrap_or_default()
    }

    /// Advance the state machine by one step without touching the document.
    ///
    /// Returns the delay until the next step.
    pub fn step(&mut self) -> Duration {
        match self.phase {
            TypingPhase::Typing => {
                let len = self.current_len();
                if self.cursor < len {
                    self.cursor += 1;
                }
                if self.cursor == len {
                    debug!("typing: word {} complete", self.word);
                    self.phase = TypingPhase::PausedAfterWord;
                    return self.timings.word_pause;
                }
                self.timings.type_interval
            }
            TypingPhase::PausedAfterWord => {
                self.phase = TypingPhase::Deleting;
                self.delete_step()
            }
            TypingPhase::Deleting => self.delete_step(),
        }
    }

    fn delete_step(&mut self) -> Duration {
        self.cursor = self.cursor.saturating_sub(1);
        if self.cursor == 0 {
            self.word = (self.word + 1) % self.words.len();
            self.phase = TypingPhase::Typing;
            debug!("typing: advancing to word {}", self.word);
            return self.timings.type_interval;
        }
        self.timings.delete_interval
    }

    /// Step once and write the visible text into the display element.
    ///
    /// The text is read before a word wrap, so the tick that deletes the last
    /// character shows an empty string rather than the next word's prefix.
    ///
    /// # Errors
    ///
    /// Propagates the document's rejection of the text update.
    pub fn tick<D: Document + ?Sized>(&mut self, doc: &mut D) -> Result<Duration> {
        let previous_word = self.word;
        let delay = self.step();
        let text = if self.word == previous_word {
            self.visible_text()
        } else {
            String::new()
        };
        doc.set_text(self.target, &text)?;
        Ok(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::MemoryDocument;

    fn timings() -> TypingTimings {
        TypingTimings {
            type_interval: Duration::from_millis(100),
            delete_interval: Duration::from_millis(50),
            word_pause: Duration::from_millis(2000),
        }
    }

    #[test]
    fn empty_word_list_is_a_configuration_error() {
        let words: [&str; 0] = [];
        assert!(TypingEngine::new(&words, NodeKey(1), timings()).is_err());
    }

    #[test]
    fn two_word_scenario_matches_expected_timeline() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let target = doc.element(body, "span", &[("id", "typedText")]).unwrap();
        let mut engine = TypingEngine::new(&["A", "BB"], target, timings()).unwrap();

        let mut frames = Vec::new();
        for _ in 0..8 {
            let delay = engine.tick(&mut doc).unwrap();
            frames.push((doc.text_content(target).unwrap().to_owned(), delay.as_millis()));
        }

        let expected = [
            ("A", 2000),
            ("", 100),
            ("B", 100),
            ("BB", 2000),
            ("B", 50),
            ("", 100),
            ("A", 2000),
            ("", 100),
        ];
        let expected: Vec<(String, u128)> = expected
            .iter()
            .map(|(text, delay)| ((*text).to_owned(), *delay))
            .collect();
        assert_eq!(frames, expected);
    }

    #[test]
    fn unicode_words_are_typed_per_character() {
        let mut engine = TypingEngine::new(&["héllo"], NodeKey(1), timings()).unwrap();
        engine.step();
        engine.step();
        assert_eq!(engine.visible_text(), "hé");
    }

    #[test]
    fn empty_word_pauses_then_moves_on() {
        let mut engine = TypingEngine::new(&["", "x"], NodeKey(1), timings()).unwrap();
        assert_eq!(engine.step(), Duration::from_millis(2000));
        assert_eq!(engine.phase(), TypingPhase::PausedAfterWord);
        engine.step();
        assert_eq!(engine.word_index(), 1);
        assert_eq!(engine.phase(), TypingPhase::Typing);
    }
}

//! Property checks for the typing engine, skill tabs and debounce.

use core::time::Duration;
use dom::{Document, MemoryDocument, NodeKey};
use effects::debounce::Debounce;
use effects::skills::SkillTabs;
use effects::typing::{TypingEngine, TypingPhase, TypingTimings};
use effects::TimerQueue;
use proptest::prelude::*;

fn timings() -> TypingTimings {
    TypingTimings {
        type_interval: Duration::from_millis(100),
        delete_interval: Duration::from_millis(50),
        word_pause: Duration::from_millis(2000),
    }
}

fn word_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zé ]{0,8}", 1..6)
}

/// Steps needed to type and delete one word of `len` characters.
fn cycle_steps(len: usize) -> usize {
    (2 * len).max(2)
}

fn skill_fixture(count: usize) -> (MemoryDocument, Vec<NodeKey>, Vec<NodeKey>) {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let tabs = (0..count)
        .map(|_| doc.element(body, "button", &[("class", "skill-tab")]).unwrap())
        .collect();
    let contents = (0..count)
        .map(|_| doc.element(body, "div", &[("class", "skill-content")]).unwrap())
        .collect();
    (doc, tabs, contents)
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds_and_wraps_only_at_zero(words in word_list(), steps in 0usize..400) {
        let mut engine = TypingEngine::new(&words, NodeKey(1), timings()).unwrap();
        for _ in 0..steps {
            let before = engine.word_index();
            engine.step();
            let len = words[engine.word_index()].chars().count();
            prop_assert!(engine.cursor() <= len);
            if engine.word_index() != before {
                prop_assert_eq!(engine.cursor(), 0);
                prop_assert_eq!(engine.phase(), TypingPhase::Typing);
                prop_assert_eq!(engine.word_index(), (before + 1) % words.len());
            }
        }
    }

    #[test]
    fn full_cycles_advance_the_word_index(words in word_list(), cycles in 0usize..12) {
        let mut engine = TypingEngine::new(&words, NodeKey(1), timings()).unwrap();
        for cycle in 0..cycles {
            let len = words[cycle % words.len()].chars().count();
            for _ in 0..cycle_steps(len) {
                engine.step();
            }
        }
        prop_assert_eq!(engine.word_index(), cycles % words.len());
        prop_assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn show_leaves_exactly_one_pair_active(count in 1usize..8, picks in prop::collection::vec(0usize..8, 1..10)) {
        let (mut doc, tabs, contents) = skill_fixture(count);
        let mut skills = SkillTabs::new(&tabs, &contents, "active");
        for pick in picks {
            let index = pick % count;
            skills.show(&mut doc, index).unwrap();
            let active_tabs: Vec<_> = tabs.iter().filter(|tab| doc.has_class(**tab, "active")).collect();
            let active_contents: Vec<_> = contents.iter().filter(|content| doc.has_class(**content, "active")).collect();
            prop_assert_eq!(active_tabs, vec![&tabs[index]]);
            prop_assert_eq!(active_contents, vec![&contents[index]]);
        }
    }

    #[test]
    fn rotating_k_times_lands_on_k_mod_n(count in 1usize..8, rotations in 0usize..30) {
        let (mut doc, tabs, contents) = skill_fixture(count);
        let mut skills = SkillTabs::new(&tabs, &contents, "active");
        skills.show(&mut doc, 0).unwrap();
        for _ in 0..rotations {
            skills.auto_rotate(&mut doc).unwrap();
        }
        prop_assert_eq!(skills.current(), rotations % count);
        prop_assert!(doc.has_class(contents[rotations % count], "active"));
    }

    #[test]
    fn debounce_fires_once_after_the_last_call(gaps in prop::collection::vec(0u64..10, 1..20)) {
        let wait = Duration::from_millis(10);
        let mut queue = TimerQueue::new();
        let mut debounce = Debounce::new(wait);
        let mut now = Duration::ZERO;
        for (call, gap) in gaps.iter().enumerate() {
            now += Duration::from_millis(*gap);
            // Every gap is shorter than `wait`, so nothing may fire yet.
            prop_assert!(queue.pop_due(now).is_none());
            queue.advance_clock(now);
            debounce.call(&mut queue, call, ());
        }

        let mut fired = Vec::new();
        while let Some((id, ())) = queue.pop_due(now + wait * 10) {
            fired.push((queue.now(), debounce.fire(id)));
        }
        prop_assert_eq!(fired, vec![(now + wait, Some(gaps.len() - 1))]);
    }
}

//! End-to-end behaviour of `PortfolioPage` over the in-memory sample page,
//! driven with virtual time.

use anyhow::Result;
use core::time::Duration;
use dom::{DOMUpdate, Document, MemoryDocument, Viewport};
use effects::{EffectsConfig, IntersectionEntry, PortfolioPage, SamplePage};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn ready_page(config: EffectsConfig) -> Result<(PortfolioPage<MemoryDocument>, SamplePage)> {
    init_logger();
    let sample = SamplePage::build()?;
    let mut page = PortfolioPage::attach(sample.doc.clone(), config)?;
    page.dom_content_loaded()?;
    Ok((page, sample))
}

fn typed(page: &PortfolioPage<MemoryDocument>, sample: &SamplePage) -> String {
    page.document()
        .text_content(sample.typed_text)
        .unwrap_or_default()
        .to_owned()
}

#[test]
fn attach_fails_without_typing_display() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.element(body, "div", &[("class", "skill-tab")]).unwrap();

    let err = PortfolioPage::attach(doc, EffectsConfig::default()).unwrap_err();
    assert!(err.to_string().contains("typedText"), "unexpected error: {err}");
}

#[test]
fn attach_fails_for_empty_word_list() {
    let sample = SamplePage::build().unwrap();
    let config = EffectsConfig {
        words: Vec::new(),
        ..EffectsConfig::default()
    };
    assert!(PortfolioPage::attach(sample.doc, config).is_err());
}

#[test]
fn attach_injects_ripple_css_and_hides_the_page() -> Result<()> {
    let sample = SamplePage::build()?;
    let page = PortfolioPage::attach(sample.doc.clone(), EffectsConfig::default())?;
    let doc = page.document();
    let body = doc.body();

    assert_eq!(doc.stylesheets().len(), 1);
    assert!(doc.stylesheets()[0].contains("@keyframes ripple-animation"));
    assert_eq!(doc.style(body, "opacity"), Some("0"));
    assert_eq!(doc.style(body, "transition"), Some("opacity 0.5s ease"));
    // Nothing else happens before DOMContentLoaded.
    assert_eq!(typed(&page, &sample), "");
    assert_eq!(page.next_deadline(), None);
    Ok(())
}

#[test]
fn typing_follows_the_two_word_timeline() -> Result<()> {
    let config = EffectsConfig {
        words: vec!["A".to_owned(), "BB".to_owned()],
        ..EffectsConfig::default()
    };
    let (mut page, sample) = ready_page(config)?;
    assert_eq!(typed(&page, &sample), "A");

    let timeline = [
        (1999, "A"),
        (2000, ""),
        (2100, "B"),
        (2200, "BB"),
        (4199, "BB"),
        (4200, "B"),
        (4250, ""),
        (4350, "A"),
        (6350, ""),
    ];
    for (at, expected) in timeline {
        page.advance_to(ms(at))?;
        assert_eq!(typed(&page, &sample), expected, "at {at}ms");
    }
    Ok(())
}

#[test]
fn skill_tabs_rotate_after_the_start_delay() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    let active = |page: &PortfolioPage<MemoryDocument>| -> Vec<usize> {
        sample
            .skill_contents
            .iter()
            .enumerate()
            .filter(|(_, node)| page.document().has_class(**node, "active"))
            .map(|(index, _)| index)
            .collect()
    };
    assert_eq!(active(&page), vec![0]);

    page.advance_to(ms(8999))?;
    assert_eq!(active(&page), vec![0]);
    page.advance_to(ms(9000))?;
    assert_eq!(active(&page), vec![1]);
    page.advance_to(ms(13000))?;
    assert_eq!(active(&page), vec![2]);
    page.advance_to(ms(17000))?;
    assert_eq!(active(&page), vec![0]);
    assert_eq!(page.skills().current(), 0);
    Ok(())
}

#[test]
fn clicking_a_tab_wins_over_rotation_state() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    page.click(sample.skill_tabs[2], 0.0, 0.0)?;
    assert!(page.document().has_class(sample.skill_tabs[2], "active"));

    // The next rotation continues from the clicked tab.
    page.advance_to(ms(9000))?;
    assert_eq!(page.skills().current(), 0);
    Ok(())
}

#[test]
fn renamed_reveal_classes_reach_every_target() -> Result<()> {
    init_logger();
    let mut config = EffectsConfig::default();
    config.contract.reveal_classes = ["project-card", "skill-tab", "hobby", "flagship"]
        .map(str::to_owned)
        .to_vec();
    let sample = SamplePage::build_with(&config.contract, 3)?;
    assert!(sample.doc.has_class(sample.interest_items[0], "hobby"));
    assert!(sample.doc.has_class(sample.main_project, "flagship"));
    assert!(!sample.doc.has_class(sample.main_project, "main-project"));

    let mut page = PortfolioPage::attach(sample.doc.clone(), config)?;
    page.dom_content_loaded()?;
    assert_eq!(page.reveal().targets().len(), 8);
    assert_eq!(page.document().style(sample.main_project, "opacity"), Some("0"));
    Ok(())
}

#[test]
fn reveal_targets_start_hidden_and_reveal_once() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    let card = sample.project_cards[0];
    assert_eq!(page.document().style(card, "opacity"), Some("0"));
    assert_eq!(page.reveal().targets().len(), 8);

    let entries = [
        IntersectionEntry {
            target: card,
            is_intersecting: true,
        },
        IntersectionEntry {
            target: sample.interest_items[1],
            is_intersecting: false,
        },
    ];
    assert_eq!(page.intersections(&entries)?, 1);
    assert_eq!(page.document().style(card, "opacity"), Some("1"));
    assert_eq!(page.document().style(card, "transform"), Some("translateY(0)"));
    assert_eq!(page.document().style(sample.interest_items[1], "opacity"), Some("0"));

    page.document_mut().take_updates();
    assert_eq!(page.intersections(&entries)?, 0);
    assert!(page.document().updates().is_empty());
    Ok(())
}

#[test]
fn scroll_bursts_update_parallax_once() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig {
        words: vec!["x".to_owned()],
        word_pause_ms: 60_000,
        ..EffectsConfig::default()
    })?;
    page.document_mut().take_updates();

    for (at, scroll_y) in [(0, 50.0), (4, 120.0), (8, 200.0)] {
        page.advance_to(ms(at))?;
        page.scroll(scroll_y);
    }
    page.advance_to(ms(17))?;
    assert!(page.document().updates().is_empty());

    page.advance_to(ms(18))?;
    let orb_writes = page
        .document()
        .updates()
        .iter()
        .filter(|update| matches!(update, DOMUpdate::SetStyle { node, .. } if sample.orbs.contains(node)))
        .count();
    assert_eq!(orb_writes, sample.orbs.len());
    assert_eq!(
        page.document().style(sample.orbs[0], "transform"),
        Some("translate(0px, 20px)")
    );
    Ok(())
}

#[test]
fn pointer_and_scroll_parallax_compose() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    page.scroll(100.0);
    page.advance_to(ms(10))?;
    page.pointer_move(1000.0, 0.0, Viewport::new(1000.0, 800.0))?;

    // Orb 1: pointer (25, -25) plus scroll (0, 20).
    assert_eq!(
        page.document().style(sample.orbs[1], "transform"),
        Some("translate(25px, -5px)")
    );
    Ok(())
}

#[test]
fn button_link_click_ripples_and_scrolls() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    let cta = sample.buttons[0];
    let outcome = page.click(cta, 400.0, 560.0)?;

    assert!(outcome.default_prevented);
    let overlay = outcome.ripple.expect("ripple overlay");
    assert_eq!(page.document().children(cta), &[overlay]);
    assert_eq!(page.document().style(overlay, "width"), Some("160px"));
    assert_eq!(page.document().style(overlay, "left"), Some("0px"));
    assert_eq!(page.document().style(overlay, "top"), Some("-60px"));
    assert_eq!(page.document().scrolled_into_view(), &[sample.links[0].1.unwrap()]);

    assert!(page.animation_end(overlay)?);
    assert!(page.document().children(cta).is_empty());
    Ok(())
}

#[test]
fn links_without_targets_only_prevent_navigation() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    let (missing, target) = sample.links[3];
    assert!(target.is_none());

    let outcome = page.click(missing, 0.0, 0.0)?;
    assert!(outcome.default_prevented);
    assert!(outcome.ripple.is_none());
    assert!(page.document().scrolled_into_view().is_empty());

    assert!(page.scroll_to_section("skills")?);
    assert!(!page.scroll_to_section("blog")?);
    Ok(())
}

#[test]
fn page_fades_in_after_load() -> Result<()> {
    let (mut page, _sample) = ready_page(EffectsConfig::default())?;
    page.advance_to(ms(500))?;
    page.load();
    page.load();

    let body = page.document().body();
    page.advance_to(ms(599))?;
    assert_eq!(page.document().style(body, "opacity"), Some("0"));
    page.advance_to(ms(600))?;
    assert_eq!(page.document().style(body, "opacity"), Some("1"));
    assert!(page.fade().is_visible());
    Ok(())
}

#[test]
fn project_cards_lift_on_hover() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    let card = sample.project_cards[1];
    assert!(page.pointer_enter(card)?);
    assert_eq!(
        page.document().style(card, "transform"),
        Some("translateY(-10px) scale(1.02)")
    );
    assert!(page.pointer_leave(card)?);
    assert_eq!(page.document().style(card, "transform"), Some("translateY(0) scale(1)"));
    assert!(!page.pointer_enter(sample.main_project)?);
    Ok(())
}

#[test]
fn repeated_dom_ready_does_not_double_the_typing_speed() -> Result<()> {
    let (mut page, sample) = ready_page(EffectsConfig::default())?;
    page.dom_content_loaded()?;
    page.advance_to(ms(100))?;
    assert_eq!(typed(&page, &sample), "De");
    Ok(())
}

#[test]
fn page_without_optional_elements_still_types() -> Result<()> {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let display = doc.element(body, "span", &[("id", "typedText")])?;
    let mut page = PortfolioPage::attach(doc, EffectsConfig::default())?;
    page.dom_content_loaded()?;
    page.scroll(300.0);
    page.pointer_move(10.0, 10.0, Viewport::new(100.0, 100.0))?;
    page.advance_to(ms(250))?;

    assert_eq!(page.document().text_content(display), Some("Dev"));
    assert!(page.skills().is_empty());
    Ok(())
}

//! An in-memory copy of the portfolio markup the effects were written for.
//!
//! Used by the headless driver and by tests; nothing here runs in a browser.

use crate::config::PageContract;
use anyhow::Result;
use dom::{BoxMetrics, Document, MemoryDocument, NodeKey};

/// Keys of the interesting elements in a [`SamplePage`].
#[derive(Clone, Debug)]
pub struct SamplePage {
    pub doc: MemoryDocument,
    pub typed_text: NodeKey,
    pub skill_tabs: Vec<NodeKey>,
    pub skill_contents: Vec<NodeKey>,
    pub project_cards: Vec<NodeKey>,
    pub interest_items: Vec<NodeKey>,
    pub main_project: NodeKey,
    pub orbs: Vec<NodeKey>,
    pub buttons: Vec<NodeKey>,
    /// `(link, target section)` for every in-page link.
    pub links: Vec<(NodeKey, Option<NodeKey>)>,
}

impl SamplePage {
    /// Build the page with the default class names.
    ///
    /// # Errors
    ///
    /// Returns an error only if the in-memory document rejects an insert.
    pub fn build() -> Result<Self> {
        Self::build_with(&PageContract::default(), 3)
    }

    /// Build the page for `contract` with `skill_count` tab/content pairs.
    ///
    /// # Errors
    ///
    /// Returns an error only if the in-memory document rejects an insert.
    pub fn build_with(contract: &PageContract, skill_count: usize) -> Result<Self> {
        let mut doc = MemoryDocument::new();
        let body = doc.body();

        let orbs = (0..3)
            .map(|_| doc.element(body, "div", &[("class", contract.orb_class.as_str())]))
            .collect::<Result<Vec<_>>>()?;

        let hero = doc.element(body, "section", &[("id", "home")])?;
        let typed_text = doc.element(hero, "span", &[("id", contract.typed_text_id.as_str())])?;
        let cta_class = format!("{} btn-primary", contract.button_class);
        let cta = doc.element(hero, "a", &[("class", cta_class.as_str()), ("href", "#projects")])?;
        let contact = doc.element(hero, "a", &[("class", contract.button_class.as_str()), ("href", "#contact")])?;
        for button in [cta, contact] {
            doc.set_box_metrics(
                button,
                BoxMetrics {
                    client_width: 160.0,
                    client_height: 48.0,
                    offset_left: 320.0,
                    offset_top: 540.0,
                },
            )?;
        }

        let skills = doc.element(body, "section", &[("id", "skills")])?;
        let skill_tabs = (0..skill_count)
            .map(|_| doc.element(skills, "button", &[("class", contract.skill_tab_class.as_str())]))
            .collect::<Result<Vec<_>>>()?;
        let skill_contents = (0..skill_count)
            .map(|_| doc.element(skills, "div", &[("class", contract.skill_content_class.as_str())]))
            .collect::<Result<Vec<_>>>()?;

        // Reveal classes not already carried by cards or tabs tag the interest
        // items (first) and the main project (last).
        let extra_reveal: Vec<&str> = contract
            .reveal_classes
            .iter()
            .map(String::as_str)
            .filter(|class| *class != contract.project_card_class && *class != contract.skill_tab_class)
            .collect();
        let interest_class = extra_reveal.first().copied().unwrap_or_default();
        let main_project_class = extra_reveal.last().copied().unwrap_or_default();

        let projects = doc.element(body, "section", &[("id", "projects")])?;
        let main_project = doc.element(projects, "article", &[("class", main_project_class)])?;
        let project_cards = (0..2)
            .map(|_| doc.element(projects, "div", &[("class", contract.project_card_class.as_str())]))
            .collect::<Result<Vec<_>>>()?;

        let interests = doc.element(body, "section", &[("id", "interests")])?;
        let interest_items = (0..2)
            .map(|_| doc.element(interests, "div", &[("class", interest_class)]))
            .collect::<Result<Vec<_>>>()?;

        let nav = doc.element(body, "nav", &[])?;
        let nav_skills = doc.element(nav, "a", &[("href", "#skills")])?;
        let nav_missing = doc.element(nav, "a", &[("href", "#blog")])?;

        let links = vec![
            (cta, Some(projects)),
            (contact, None),
            (nav_skills, Some(skills)),
            (nav_missing, None),
        ];
        doc.take_updates();

        Ok(Self {
            doc,
            typed_text,
            skill_tabs,
            skill_contents,
            project_cards,
            interest_items,
            main_project,
            orbs,
            buttons: vec![cta, contact],
            links,
        })
    }
}

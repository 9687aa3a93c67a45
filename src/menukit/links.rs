//! The back-reference view: given a section, which sections link to it
//! through their keyboards?
//!
//! The view is derived. It is recomputed from the document on demand and
//! never stored, so it cannot drift from the keyboards it summarizes.
//! Sources are reported in the order the scan first meets them (document
//! order, groups top to bottom, buttons left to right), each source named
//! once no matter how many of its buttons point at the target. A section
//! linking to itself counts. Targets that no section defines still get
//! entries; dangling references are part of the picture, not an error.
//!
//! Structural-navigation buttons ("Back", "Home" by default) would make
//! every section appear linked from everywhere, so a [`LinkFilter`] decides
//! which button labels are ignored. Callers can widen, replace, or drop the
//! exclusion set.

use std::collections::BTreeMap;

use crate::model::{Button, Document};

/// Which button labels do not count as real cross-references.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkFilter {
    excluded_labels: Vec<String>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            excluded_labels: vec!["Back".to_string(), "Home".to_string()],
        }
    }
}

impl LinkFilter {
    /// Counts every button, navigation included.
    pub fn none() -> Self {
        Self {
            excluded_labels: Vec::new(),
        }
    }

    pub fn with_labels(excluded_labels: Vec<String>) -> Self {
        Self { excluded_labels }
    }

    /// Label match is exact; "back" and "Back" are different labels.
    pub fn excludes(&self, button: &Button) -> bool {
        self.excluded_labels.iter().any(|label| label == &button.text)
    }
}

/// Names of the sections whose keyboards link to `target`, in first-seen
/// scan order, deduplicated.
pub fn incoming_links(document: &Document, target: &str, filter: &LinkFilter) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for section in document.sections() {
        for button in section.buttons() {
            if filter.excludes(button) {
                continue;
            }
            if button.target() == Some(target) && !sources.iter().any(|s| s == &section.name) {
                sources.push(section.name.clone());
            }
        }
    }
    sources
}

/// The whole view at once: every referenced target mapped to its incoming
/// sources. Agrees with [`incoming_links`] entry for entry.
pub fn back_reference_index(
    document: &Document,
    filter: &LinkFilter,
) -> BTreeMap<String, Vec<String>> {
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for section in document.sections() {
        for button in section.buttons() {
            if filter.excludes(button) {
                continue;
            }
            if let Some(target) = button.target() {
                let sources = index.entry(target.to_string()).or_default();
                if !sources.iter().any(|s| s == &section.name) {
                    sources.push(section.name.clone());
                }
            }
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Button, ButtonGroup, Section};

    fn section_with_buttons(name: &str, buttons: Vec<Button>) -> Section {
        let mut section = Section::new(name);
        section.keyboard = vec![ButtonGroup::new(buttons)];
        section
    }

    fn triangle() -> Document {
        // a -> b, b -> a, c -> b
        Document::from_sections(vec![
            section_with_buttons("a", vec![Button::link("To B", "b")]),
            section_with_buttons("b", vec![Button::link("To A", "a")]),
            section_with_buttons("c", vec![Button::link("To B", "b")]),
        ])
    }

    #[test]
    fn test_incoming_links_first_seen_order() {
        let doc = triangle();
        let filter = LinkFilter::none();

        assert_eq!(incoming_links(&doc, "b", &filter), vec!["a", "c"]);
        assert_eq!(incoming_links(&doc, "a", &filter), vec!["b"]);
        assert_eq!(incoming_links(&doc, "c", &filter), Vec::<String>::new());
    }

    #[test]
    fn test_source_reported_once_per_target() {
        let doc = Document::from_sections(vec![section_with_buttons(
            "hub",
            vec![Button::link("One", "x"), Button::link("Two", "x")],
        )]);

        assert_eq!(
            incoming_links(&doc, "x", &LinkFilter::none()),
            vec!["hub"]
        );
    }

    #[test]
    fn test_self_link_counts() {
        let doc = Document::from_sections(vec![section_with_buttons(
            "loop",
            vec![Button::link("Again", "loop")],
        )]);

        assert_eq!(
            incoming_links(&doc, "loop", &LinkFilter::none()),
            vec!["loop"]
        );
    }

    #[test]
    fn test_dangling_target_still_indexed() {
        let doc = Document::from_sections(vec![section_with_buttons(
            "start",
            vec![Button::link("Gone", "ghost")],
        )]);

        let index = back_reference_index(&doc, &LinkFilter::none());
        assert_eq!(index.get("ghost"), Some(&vec!["start".to_string()]));
    }

    #[test]
    fn test_display_only_buttons_ignored() {
        let doc = Document::from_sections(vec![section_with_buttons(
            "start",
            vec![Button::label("Just text")],
        )]);

        assert!(back_reference_index(&doc, &LinkFilter::none()).is_empty());
    }

    // --- Filter tests ---

    #[test]
    fn test_default_filter_skips_nav_labels() {
        let doc = Document::from_sections(vec![
            section_with_buttons("start", vec![Button::link("Prices", "prices")]),
            section_with_buttons("prices", vec![Button::link("Back", "start")]),
        ]);

        // Under the default filter the "Back" button is invisible.
        assert!(incoming_links(&doc, "start", &LinkFilter::default()).is_empty());
        // Opting out makes it count.
        assert_eq!(
            incoming_links(&doc, "start", &LinkFilter::none()),
            vec!["prices"]
        );
    }

    #[test]
    fn test_filter_match_is_exact() {
        let doc = Document::from_sections(vec![section_with_buttons(
            "prices",
            vec![Button::link("back", "start")],
        )]);

        // Lowercase "back" is not the excluded label "Back".
        assert_eq!(
            incoming_links(&doc, "start", &LinkFilter::default()),
            vec!["prices"]
        );
    }

    #[test]
    fn test_custom_filter_labels() {
        let doc = Document::from_sections(vec![section_with_buttons(
            "prices",
            vec![Button::link("Назад", "start")],
        )]);

        let filter = LinkFilter::with_labels(vec!["Назад".to_string()]);
        assert!(incoming_links(&doc, "start", &filter).is_empty());
    }

    #[test]
    fn test_index_agrees_with_per_target_lookup() {
        let doc = triangle();
        let filter = LinkFilter::default();

        let index = back_reference_index(&doc, &filter);
        for (target, sources) in &index {
            assert_eq!(sources, &incoming_links(&doc, target, &filter));
        }
        // And the index has no empty entries to begin with.
        assert!(index.values().all(|sources| !sources.is_empty()));
    }
}

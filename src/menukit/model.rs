//! Core document model: an ordered collection of named sections, each with
//! body text, an optional file attachment, and a button keyboard.
//!
//! Buttons reference other sections *by name* through [`CallbackData`]. The
//! references are soft: nothing here checks that a target exists, and a
//! dangling reference is a legal document state. Uniqueness of section names
//! is enforced by the mutation operations, never by the types themselves,
//! so documents parsed from files that already contain duplicates can still
//! be loaded and repaired.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MenuError, Result};

/// Soft, by-name link carried by a button. The target section may or may
/// not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackData {
    #[serde(default)]
    pub section: String,
}

impl CallbackData {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    #[serde(default)]
    pub text: String,

    /// Absent for display-only buttons. Never serialized as null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<CallbackData>,
}

impl Button {
    /// A display-only button with no link.
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
        }
    }

    /// A button linking to the named section.
    pub fn link(text: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(CallbackData::new(section)),
        }
    }

    /// Name of the section this button links to, if any.
    pub fn target(&self) -> Option<&str> {
        self.callback_data.as_ref().map(|cb| cb.section.as_str())
    }
}

/// One displayed row of buttons. Serializes as a plain array, so the file
/// format stays nested arrays of button objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonGroup {
    pub buttons: Vec<Button>,
}

impl ButtonGroup {
    pub fn new(buttons: Vec<Button>) -> Self {
        Self { buttons }
    }
}

impl From<Vec<Button>> for ButtonGroup {
    fn from(buttons: Vec<Button>) -> Self {
        Self { buttons }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default)]
    pub keyboard: Vec<ButtonGroup>,

    // Keys we don't model are kept verbatim and re-emitted on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            file: None,
            keyboard: Vec::new(),
            extra: Map::new(),
        }
    }

    /// All buttons across all groups, in group-then-button order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.keyboard.iter().flat_map(|group| group.buttons.iter())
    }
}

/// Partial update for a section. Unset parts leave the section untouched;
/// the name is immutable through updates (see [`Document::rename_section`]).
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    text: Option<String>,
    file: Option<Option<String>>,
    keyboard: Option<Vec<ButtonGroup>>,
}

impl SectionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(Some(file.into()));
        self
    }

    pub fn clear_file(mut self) -> Self {
        self.file = Some(None);
        self
    }

    pub fn keyboard(mut self, keyboard: Vec<ButtonGroup>) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    fn apply(self, section: &mut Section) {
        if let Some(text) = self.text {
            section.text = text;
        }
        if let Some(file) = self.file {
            section.file = file;
        }
        if let Some(keyboard) = self.keyboard {
            section.keyboard = keyboard;
        }
    }
}

/// The live menu document. Serializes as a top-level array of sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    // Order is meaningful: sections appear in the file in this order.
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from already-parsed sections without enforcing
    /// name uniqueness, so files that carry duplicates still load. Lookups
    /// resolve to the first match; edits enforce uniqueness from then on.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// First button in the named section whose label matches exactly,
    /// scanning groups in order.
    pub fn find_button_by_text(&self, section_name: &str, button_text: &str) -> Option<&Button> {
        self.find_by_name(section_name)?
            .buttons()
            .find(|b| b.text == button_text)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    /// Appends a section. Fails without touching the document if the name
    /// is already taken.
    pub fn add_section(&mut self, section: Section) -> Result<()> {
        if self.contains(&section.name) {
            return Err(MenuError::DuplicateName(section.name));
        }
        self.sections.push(section);
        Ok(())
    }

    /// Removes the named section and returns it. References held by other
    /// sections are left alone; they simply dangle.
    pub fn remove_section(&mut self, name: &str) -> Result<Section> {
        let idx = self
            .position(name)
            .ok_or_else(|| MenuError::SectionNotFound(name.to_string()))?;
        Ok(self.sections.remove(idx))
    }

    /// Applies a partial update to the named section.
    pub fn update_section(&mut self, name: &str, patch: SectionPatch) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| MenuError::SectionNotFound(name.to_string()))?;
        patch.apply(&mut self.sections[idx]);
        Ok(())
    }

    /// Renames a section. Renaming to the current name is a no-op success.
    /// References to the old name elsewhere are not rewritten.
    pub fn rename_section(&mut self, old: &str, new: &str) -> Result<()> {
        let idx = self
            .position(old)
            .ok_or_else(|| MenuError::SectionNotFound(old.to_string()))?;
        if old == new {
            return Ok(());
        }
        if self.contains(new) {
            return Err(MenuError::DuplicateName(new.to_string()));
        }
        self.sections[idx].name = new.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked_section(name: &str, targets: &[&str]) -> Section {
        let mut section = Section::new(name);
        section.keyboard = vec![ButtonGroup::new(
            targets.iter().map(|t| Button::link(*t, *t)).collect(),
        )];
        section
    }

    // --- Mutation tests ---

    #[test]
    fn test_add_section_appends_in_order() {
        let mut doc = Document::new();
        doc.add_section(Section::new("start")).unwrap();
        doc.add_section(Section::new("prices")).unwrap();
        doc.add_section(Section::new("contacts")).unwrap();

        assert_eq!(doc.names(), vec!["start", "prices", "contacts"]);
    }

    #[test]
    fn test_add_duplicate_name_rejected_without_mutation() {
        let mut doc = Document::new();
        doc.add_section(Section::new("start")).unwrap();

        let err = doc.add_section(Section::new("start")).unwrap_err();
        assert!(matches!(err, MenuError::DuplicateName(name) if name == "start"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_remove_section_returns_it() {
        let mut doc = Document::new();
        doc.add_section(Section::new("start")).unwrap();
        doc.add_section(Section::new("prices")).unwrap();

        let removed = doc.remove_section("start").unwrap();
        assert_eq!(removed.name, "start");
        assert_eq!(doc.names(), vec!["prices"]);
    }

    #[test]
    fn test_remove_missing_section_fails() {
        let mut doc = Document::new();
        let err = doc.remove_section("ghost").unwrap_err();
        assert!(matches!(err, MenuError::SectionNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_remove_does_not_cascade_references() {
        let mut doc = Document::new();
        doc.add_section(linked_section("start", &["prices"])).unwrap();
        doc.add_section(Section::new("prices")).unwrap();

        doc.remove_section("prices").unwrap();

        // The link from "start" now dangles, and that is fine.
        let button = doc.find_button_by_text("start", "prices").unwrap();
        assert_eq!(button.target(), Some("prices"));
        assert!(!doc.contains("prices"));
    }

    #[test]
    fn test_update_section_patches_only_given_parts() {
        let mut doc = Document::new();
        let mut section = Section::new("start");
        section.text = "hello".to_string();
        section.file = Some("logo.png".to_string());
        doc.add_section(section).unwrap();

        doc.update_section("start", SectionPatch::new().text("welcome"))
            .unwrap();

        let section = doc.find_by_name("start").unwrap();
        assert_eq!(section.text, "welcome");
        assert_eq!(section.file.as_deref(), Some("logo.png"));
    }

    #[test]
    fn test_update_section_can_clear_file() {
        let mut doc = Document::new();
        let mut section = Section::new("start");
        section.file = Some("logo.png".to_string());
        doc.add_section(section).unwrap();

        doc.update_section("start", SectionPatch::new().clear_file())
            .unwrap();

        assert_eq!(doc.find_by_name("start").unwrap().file, None);
    }

    #[test]
    fn test_update_missing_section_fails() {
        let mut doc = Document::new();
        let err = doc
            .update_section("ghost", SectionPatch::new().text("x"))
            .unwrap_err();
        assert!(matches!(err, MenuError::SectionNotFound(_)));
    }

    #[test]
    fn test_update_without_keyboard_keeps_button_order() {
        let mut doc = Document::new();
        let mut section = Section::new("start");
        section.keyboard = vec![
            ButtonGroup::new(vec![Button::link("B", "b"), Button::link("A", "a")]),
            ButtonGroup::new(vec![Button::label("Last")]),
        ];
        doc.add_section(section).unwrap();

        doc.update_section("start", SectionPatch::new().text("new text"))
            .unwrap();
        doc.update_section("start", SectionPatch::new().file("x.pdf"))
            .unwrap();

        let labels: Vec<&str> = doc
            .find_by_name("start")
            .unwrap()
            .buttons()
            .map(|b| b.text.as_str())
            .collect();
        assert_eq!(labels, vec!["B", "A", "Last"]);
    }

    #[test]
    fn test_update_keyboard_replaces_whole_keyboard() {
        let mut doc = Document::new();
        doc.add_section(linked_section("start", &["a", "b"])).unwrap();

        let new_keyboard = vec![ButtonGroup::new(vec![Button::label("Back")])];
        doc.update_section("start", SectionPatch::new().keyboard(new_keyboard))
            .unwrap();

        let section = doc.find_by_name("start").unwrap();
        assert_eq!(section.buttons().count(), 1);
        assert_eq!(section.buttons().next().unwrap().text, "Back");
    }

    // --- Rename tests ---

    #[test]
    fn test_rename_section() {
        let mut doc = Document::new();
        doc.add_section(Section::new("start")).unwrap();

        doc.rename_section("start", "home").unwrap();
        assert!(doc.contains("home"));
        assert!(!doc.contains("start"));
    }

    #[test]
    fn test_rename_to_taken_name_rejected() {
        let mut doc = Document::new();
        doc.add_section(Section::new("start")).unwrap();
        doc.add_section(Section::new("prices")).unwrap();

        let err = doc.rename_section("start", "prices").unwrap_err();
        assert!(matches!(err, MenuError::DuplicateName(name) if name == "prices"));
        assert_eq!(doc.names(), vec!["start", "prices"]);
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let mut doc = Document::new();
        doc.add_section(Section::new("start")).unwrap();

        doc.rename_section("start", "start").unwrap();
        assert_eq!(doc.names(), vec!["start"]);
    }

    #[test]
    fn test_rename_missing_section_fails() {
        let mut doc = Document::new();
        let err = doc.rename_section("ghost", "new").unwrap_err();
        assert!(matches!(err, MenuError::SectionNotFound(_)));
    }

    #[test]
    fn test_rename_does_not_rewrite_references() {
        let mut doc = Document::new();
        doc.add_section(linked_section("start", &["prices"])).unwrap();
        doc.add_section(Section::new("prices")).unwrap();

        doc.rename_section("prices", "rates").unwrap();

        // The old name stays in the button; the reference goes stale.
        let button = doc.find_button_by_text("start", "prices").unwrap();
        assert_eq!(button.target(), Some("prices"));
    }

    // --- Lookup tests ---

    #[test]
    fn test_find_by_name_first_match_wins_on_duplicates() {
        let mut first = Section::new("dup");
        first.text = "first".to_string();
        let mut second = Section::new("dup");
        second.text = "second".to_string();

        let doc = Document::from_sections(vec![first, second]);
        assert_eq!(doc.find_by_name("dup").unwrap().text, "first");
    }

    #[test]
    fn test_find_button_scans_groups_in_order() {
        let mut section = Section::new("start");
        section.keyboard = vec![
            ButtonGroup::new(vec![Button::link("Go", "a")]),
            ButtonGroup::new(vec![Button::link("Go", "b")]),
        ];
        let doc = Document::from_sections(vec![section]);

        let button = doc.find_button_by_text("start", "Go").unwrap();
        assert_eq!(button.target(), Some("a"));
    }

    #[test]
    fn test_find_button_in_missing_section() {
        let doc = Document::new();
        assert!(doc.find_button_by_text("ghost", "Go").is_none());
    }

    #[test]
    fn test_empty_name_is_representable() {
        let mut doc = Document::new();
        doc.add_section(Section::new("")).unwrap();
        assert!(doc.contains(""));

        // Uniqueness still applies to the empty name.
        let err = doc.add_section(Section::new("")).unwrap_err();
        assert!(matches!(err, MenuError::DuplicateName(_)));
    }

    // --- Serde shape tests ---

    #[test]
    fn test_button_without_callback_omits_key() {
        let value = serde_json::to_value(Button::label("Back")).unwrap();
        assert_eq!(value, serde_json::json!({ "text": "Back" }));
    }

    #[test]
    fn test_button_with_callback_nests_section() {
        let value = serde_json::to_value(Button::link("Prices", "prices")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "text": "Prices",
                "callback_data": { "section": "prices" }
            })
        );
    }

    #[test]
    fn test_button_group_serializes_as_plain_array() {
        let group = ButtonGroup::new(vec![Button::label("Back")]);
        let value = serde_json::to_value(group).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_section_omits_absent_file() {
        let value = serde_json::to_value(Section::new("start")).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("file"));
        assert!(object.contains_key("name"));
        assert!(object.contains_key("text"));
        assert!(object.contains_key("keyboard"));
    }

    #[test]
    fn test_section_keeps_unknown_keys() {
        let raw = serde_json::json!({
            "name": "start",
            "text": "hi",
            "keyboard": [],
            "color": "#ff0000",
            "meta": { "views": 3 }
        });

        let section: Section = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(section.extra.get("color"), Some(&serde_json::json!("#ff0000")));

        let back = serde_json::to_value(&section).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_section_defaults_for_missing_keys() {
        let raw = serde_json::json!({ "name": "bare" });
        let section: Section = serde_json::from_value(raw).unwrap();

        assert_eq!(section.name, "bare");
        assert_eq!(section.text, "");
        assert_eq!(section.file, None);
        assert!(section.keyboard.is_empty());
    }
}

//! In-memory form model: main fields plus repeatable section items.
//!
//! Values are stored exactly as typed. Trimming happens when a store is
//! collected, so collecting twice without edits yields equal maps.

use std::collections::BTreeMap;

use cvwizard_shared::{FieldMap, MAIN_FIELDS, Section};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Identity of one section item (UUID v7, creation-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ItemTemplates
// ---------------------------------------------------------------------------

/// Field keys each section's items are instantiated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTemplates {
    fields: BTreeMap<Section, Vec<String>>,
}

impl ItemTemplates {
    /// No templates at all; every `add_item` is a no-op.
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Register (or replace) the template for `section`.
    pub fn with(mut self, section: Section, keys: &[&str]) -> Self {
        self.fields
            .insert(section, keys.iter().map(|k| (*k).to_string()).collect());
        self
    }

    /// Drop the template for `section`.
    pub fn without(mut self, section: Section) -> Self {
        self.fields.remove(&section);
        self
    }

    pub fn get(&self, section: Section) -> Option<&[String]> {
        self.fields.get(&section).map(Vec::as_slice)
    }
}

impl Default for ItemTemplates {
    fn default() -> Self {
        Self::empty()
            .with(
                Section::Experiences,
                &["company", "role", "location", "start_date", "end_date", "description"],
            )
            .with(
                Section::Educations,
                &["institution", "degree", "field", "start_date", "end_date", "description"],
            )
            .with(Section::Skills, &["name", "level", "category"])
            .with(Section::Languages, &["name", "level"])
            .with(Section::Certifications, &["name", "issuer", "date", "url"])
            .with(
                Section::Projects,
                &["name", "role", "description", "url", "technologies"],
            )
            .with(Section::Links, &["label", "url"])
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// One repeatable entry within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    fields: FieldMap,
}

impl Item {
    fn from_template(keys: &[String]) -> Self {
        Self {
            id: ItemId::new(),
            fields: keys.iter().map(|k| (k.clone(), String::new())).collect(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Raw (untrimmed) field values in template order.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Set a field declared by the item's template. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Trimmed values, all keys present.
    pub fn collect(&self) -> FieldMap {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect()
    }

    /// Whether every field is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// SectionStore
// ---------------------------------------------------------------------------

/// Per-section lists of items, in creation order.
#[derive(Debug, Clone)]
pub struct SectionStore {
    templates: ItemTemplates,
    items: BTreeMap<Section, Vec<Item>>,
}

impl SectionStore {
    /// An empty store: no section holds any item yet.
    pub fn new(templates: ItemTemplates) -> Self {
        Self {
            templates,
            items: BTreeMap::new(),
        }
    }

    pub fn templates(&self) -> &ItemTemplates {
        &self.templates
    }

    /// Append a new empty item. `None` when the section has no template.
    pub fn add_item(&mut self, section: Section) -> Option<ItemId> {
        let template = self.templates.get(section)?;
        let item = Item::from_template(template);
        let id = item.id;
        self.items.entry(section).or_default().push(item);
        debug!(%section, %id, "item added");
        Some(id)
    }

    /// `add_item` by section name; unknown names are ignored.
    pub fn add_item_named(&mut self, name: &str) -> Option<ItemId> {
        Section::from_name(name).and_then(|section| self.add_item(section))
    }

    /// Remove exactly the item with `id`. Returns whether it existed.
    pub fn remove_item(&mut self, section: Section, id: ItemId) -> bool {
        let Some(items) = self.items.get_mut(&section) else {
            return false;
        };
        let before = items.len();
        items.retain(|item| item.id != id);
        let removed = items.len() != before;
        if removed {
            debug!(%section, %id, "item removed");
        }
        removed
    }

    pub fn items(&self, section: Section) -> &[Item] {
        self.items.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn item(&self, section: Section, id: ItemId) -> Option<&Item> {
        self.items(section).iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, section: Section, id: ItemId) -> Option<&mut Item> {
        self.items
            .get_mut(&section)?
            .iter_mut()
            .find(|item| item.id == id)
    }

    /// Set one field on one item. `false` if the item or key does not exist.
    pub fn set_field(
        &mut self,
        section: Section,
        id: ItemId,
        key: &str,
        value: impl Into<String>,
    ) -> bool {
        self.item_mut(section, id)
            .is_some_and(|item| item.set(key, value))
    }

    /// Ordered, trimmed items of `section`, skipping items whose fields are all empty.
    pub fn collect_section(&self, section: Section) -> Vec<FieldMap> {
        self.items(section)
            .iter()
            .filter(|item| !item.is_blank())
            .map(Item::collect)
            .collect()
    }

    /// `collect_section` by name; unknown names yield an empty list.
    pub fn collect_section_named(&self, name: &str) -> Vec<FieldMap> {
        Section::from_name(name)
            .map(|section| self.collect_section(section))
            .unwrap_or_default()
    }

    /// Empty every section, then give each one a single fresh item.
    pub fn reset(&mut self) {
        self.items.clear();
        for section in Section::ALL {
            self.add_item(section);
        }
    }

    /// Empty one section without adding anything back.
    fn clear_section(&mut self, section: Section) {
        self.items.remove(&section);
    }
}

// ---------------------------------------------------------------------------
// MainFields
// ---------------------------------------------------------------------------

/// Flat store of the designated top-level fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainFields {
    values: FieldMap,
}

impl MainFields {
    /// A store designating exactly `keys`, all empty.
    pub fn with_keys(keys: &[&str]) -> Self {
        Self {
            values: keys.iter().map(|k| ((*k).to_string(), String::new())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a designated field. Undesignated keys are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Trimmed value of every designated field.
    pub fn collect_main(&self) -> FieldMap {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect()
    }

    /// Whether `key` holds a non-empty value after trimming.
    pub fn is_filled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }
}

impl Default for MainFields {
    fn default() -> Self {
        Self::with_keys(&MAIN_FIELDS)
    }
}

// ---------------------------------------------------------------------------
// FormModel
// ---------------------------------------------------------------------------

/// Main fields plus all sections: the whole editable form.
#[derive(Debug, Clone)]
pub struct FormModel {
    pub main: MainFields,
    pub sections: SectionStore,
}

impl FormModel {
    /// A freshly initialised form: every section starts with one empty item.
    pub fn new(main: MainFields, templates: ItemTemplates) -> Self {
        let mut sections = SectionStore::new(templates);
        sections.reset();
        Self { main, sections }
    }

    /// Clear main fields and reset every section to one empty item.
    pub fn reset(&mut self) {
        self.main.clear();
        self.sections.reset();
    }

    /// Replace the form content with an existing payload (draft import).
    ///
    /// Keys not designated by the main store or the item templates are
    /// dropped. Sections with no items in the payload get one empty item.
    pub fn load_payload(&mut self, payload: &cvwizard_shared::SubmissionPayload) {
        self.main.clear();
        for (key, value) in &payload.main {
            if !self.main.set(key, value.as_str()) {
                debug!(key, "ignoring undesignated main field");
            }
        }

        for section in Section::ALL {
            self.sections.clear_section(section);
            for source in payload.section(section) {
                let Some(id) = self.sections.add_item(section) else {
                    break;
                };
                for (key, value) in source {
                    if !self.sections.set_field(section, id, key, value.as_str()) {
                        debug!(%section, key, "ignoring field outside item template");
                    }
                }
            }
            if self.sections.items(section).is_empty() {
                self.sections.add_item(section);
            }
        }
    }
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new(MainFields::default(), ItemTemplates::default())
    }
}

#[cfg(test)]
mod tests {
    use cvwizard_shared::SubmissionPayload;

    use super::*;

    #[test]
    fn new_form_has_one_empty_item_per_section() {
        let form = FormModel::default();
        for section in Section::ALL {
            assert_eq!(form.sections.items(section).len(), 1);
            assert!(form.sections.items(section)[0].is_blank());
        }
    }

    #[test]
    fn add_item_appends_in_creation_order() {
        let mut store = SectionStore::new(ItemTemplates::default());
        let first = store.add_item(Section::Skills).unwrap();
        let second = store.add_item(Section::Skills).unwrap();
        let ids: Vec<ItemId> = store.items(Section::Skills).iter().map(Item::id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn add_item_without_template_is_noop() {
        let mut store = SectionStore::new(ItemTemplates::default().without(Section::Links));
        assert!(store.add_item(Section::Links).is_none());
        assert!(store.items(Section::Links).is_empty());
        assert!(store.add_item_named("hobbies").is_none());
        assert!(store.add_item_named("skills").is_some());
    }

    #[test]
    fn remove_item_removes_only_that_item() {
        let mut store = SectionStore::new(ItemTemplates::default());
        let keep = store.add_item(Section::Projects).unwrap();
        let drop = store.add_item(Section::Projects).unwrap();
        let other = store.add_item(Section::Links).unwrap();

        assert!(store.remove_item(Section::Projects, drop));
        assert!(!store.remove_item(Section::Projects, drop));
        assert!(!store.remove_item(Section::Projects, other));

        assert_eq!(store.items(Section::Projects).len(), 1);
        assert_eq!(store.items(Section::Projects)[0].id(), keep);
        assert_eq!(store.items(Section::Links).len(), 1);
    }

    #[test]
    fn blank_items_are_excluded_from_collection() {
        let mut store = SectionStore::new(ItemTemplates::default());
        let _blank = store.add_item(Section::Experiences).unwrap();
        let spaces = store.add_item(Section::Experiences).unwrap();
        let filled = store.add_item(Section::Experiences).unwrap();
        store.set_field(Section::Experiences, spaces, "company", "   ");
        store.set_field(Section::Experiences, filled, "role", "  Backend Engineer ");

        let collected = store.collect_section(Section::Experiences);
        assert_eq!(collected.len(), 1);
        let item = &collected[0];
        assert_eq!(item["role"], "Backend Engineer");
        assert_eq!(item["company"], "");
        assert_eq!(item.len(), 6);
    }

    #[test]
    fn collect_unknown_section_is_empty() {
        let store = SectionStore::new(ItemTemplates::default());
        assert!(store.collect_section_named("hobbies").is_empty());
        assert!(store.collect_section(Section::Skills).is_empty());
    }

    #[test]
    fn set_field_rejects_unknown_keys() {
        let mut store = SectionStore::new(ItemTemplates::default());
        let id = store.add_item(Section::Languages).unwrap();
        assert!(store.set_field(Section::Languages, id, "name", "Inglés"));
        assert!(!store.set_field(Section::Languages, id, "issuer", "x"));
        assert!(!store.set_field(Section::Skills, id, "name", "x"));
    }

    #[test]
    fn collect_main_trims_and_is_idempotent() {
        let mut main = MainFields::default();
        main.set("full_name", "  Ana Pérez ");
        main.set("email", "ana@example.com\n");
        assert!(!main.set("nickname", "anita"));

        let first = main.collect_main();
        let second = main.collect_main();
        assert_eq!(first, second);
        assert_eq!(first["full_name"], "Ana Pérez");
        assert_eq!(first["email"], "ana@example.com");
        assert_eq!(first["summary"], "");
        assert!(!first.contains_key("nickname"));
    }

    #[test]
    fn custom_main_store_omits_undesignated_fields() {
        let main = MainFields::with_keys(&["full_name", "email"]);
        let collected = main.collect_main();
        assert_eq!(collected.len(), 2);
        assert!(!collected.contains_key("summary"));
    }

    #[test]
    fn reset_clears_main_and_leaves_one_item_each() {
        let mut form = FormModel::default();
        form.main.set("full_name", "Ana");
        form.sections.add_item(Section::Skills);
        let id = form.sections.items(Section::Skills)[0].id();
        form.sections.set_field(Section::Skills, id, "name", "Rust");

        form.reset();

        assert_eq!(form.main.get("full_name"), Some(""));
        for section in Section::ALL {
            assert_eq!(form.sections.items(section).len(), 1);
            assert!(form.sections.items(section)[0].is_blank());
        }
    }

    #[test]
    fn load_payload_keeps_template_keys_only() {
        let mut payload = SubmissionPayload::default();
        payload.main.insert("full_name".into(), "Ana".into());
        payload.main.insert("favourite_color".into(), "blue".into());
        payload.skills.push(FieldMap::from([
            ("name".to_string(), "Rust".to_string()),
            ("years".to_string(), "5".to_string()),
        ]));
        payload.skills.push(FieldMap::from([("name".to_string(), "SQL".to_string())]));

        let mut form = FormModel::default();
        form.load_payload(&payload);

        assert_eq!(form.main.get("full_name"), Some("Ana"));
        let skills = form.sections.collect_section(Section::Skills);
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0]["name"], "Rust");
        assert!(!skills[0].contains_key("years"));
        assert_eq!(form.sections.items(Section::Links).len(), 1);
    }
}

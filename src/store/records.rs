//! Generic CRUD store over one ordered record collection.
//!
//! Each store exclusively owns its in-memory collection and is the sole
//! writer of its registry key. Every mutation re-serializes the whole
//! collection into the registry. Mutations are synchronous and assume
//! single-threaded access from the owning context.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::registry::Registry;
use crate::constants::{DRAFTS_KEY, SAVED_EMAILS_KEY, WRITING_STYLES_KEY};
use crate::models::{Draft, SavedEmail, WritingStyle};

/// A record that can live in a [`RecordStore`].
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> Uuid;

    /// Attempt to read a legacy registry payload for this record type.
    /// Returns `None` when no legacy format exists or the value does not
    /// match it.
    fn migrate_legacy(_value: &Value) -> Option<Vec<Self>> {
        None
    }
}

impl Record for SavedEmail {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for WritingStyle {
    fn id(&self) -> Uuid {
        self.id
    }

    /// Writing styles were once persisted as a plain string array. Upgrade
    /// them in memory; the registry value is rewritten on the next mutation.
    fn migrate_legacy(value: &Value) -> Option<Vec<Self>> {
        let strings = value.as_array()?;
        let styles = strings
            .iter()
            .map(|s| Some(WritingStyle::from_legacy(s.as_str()?.to_string())))
            .collect::<Option<Vec<_>>>()?;
        Some(styles)
    }
}

impl Record for Draft {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Where `add` places new records in the ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Newest first (saved emails, drafts)
    Front,
    /// Append in creation order (writing styles)
    Back,
}

pub struct RecordStore<T: Record> {
    key: &'static str,
    position: InsertPosition,
    records: Vec<T>,
}

impl<T: Record> RecordStore<T> {
    /// Load the collection persisted under `key`. A missing, corrupt, or
    /// unmigratable payload yields an empty collection.
    pub fn load(key: &'static str, position: InsertPosition, registry: &Registry) -> Self {
        let records = match registry.get(key) {
            Some(value) => match serde_json::from_value::<Vec<T>>(value.clone()) {
                Ok(records) => records,
                Err(_) => T::migrate_legacy(value).unwrap_or_default(),
            },
            None => Vec::new(),
        };

        Self {
            key,
            position,
            records,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn add(&mut self, registry: &mut Registry, record: T) {
        match self.position {
            InsertPosition::Front => self.records.insert(0, record),
            InsertPosition::Back => self.records.push(record),
        }
        self.persist(registry);
    }

    /// Replace the record with a matching id. No-op if the id is unknown.
    pub fn update(&mut self, registry: &mut Registry, record: T) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id() == record.id()) {
            *existing = record;
            self.persist(registry);
        }
    }

    /// Replace the record at `index`. No-op if out of range.
    pub fn update_at(&mut self, registry: &mut Registry, index: usize, record: T) {
        if let Some(slot) = self.records.get_mut(index) {
            *slot = record;
            self.persist(registry);
        }
    }

    /// Remove the record with a matching id. No-op if the id is unknown, so
    /// deleting twice is harmless.
    #[allow(dead_code)]
    pub fn delete(&mut self, registry: &mut Registry, id: Uuid) {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        if self.records.len() != before {
            self.persist(registry);
        }
    }

    /// Remove the record at `index`. No-op if out of range.
    pub fn delete_at(&mut self, registry: &mut Registry, index: usize) {
        if index < self.records.len() {
            self.records.remove(index);
            self.persist(registry);
        }
    }

    fn persist(&self, registry: &mut Registry) {
        match serde_json::to_value(&self.records) {
            Ok(value) => registry.set(self.key, value),
            Err(e) => tracing::warn!("Failed to encode '{}' records: {}", self.key, e),
        }
    }
}

/// Saved emails, newest first.
pub fn saved_emails(registry: &Registry) -> RecordStore<SavedEmail> {
    RecordStore::load(SAVED_EMAILS_KEY, InsertPosition::Front, registry)
}

/// Writing styles, in creation order.
pub fn writing_styles(registry: &Registry) -> RecordStore<WritingStyle> {
    RecordStore::load(WRITING_STYLES_KEY, InsertPosition::Back, registry)
}

/// Drafts, newest first.
pub fn drafts(registry: &Registry) -> RecordStore<Draft> {
    RecordStore::load(DRAFTS_KEY, InsertPosition::Front, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_registry() -> (tempfile::TempDir, Registry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::open(dir.path().join("records.json"));
        (dir, registry)
    }

    #[test]
    fn test_add_then_load_round_trips_all_fields() {
        let (_dir, mut registry) = temp_registry();

        let mut store = saved_emails(&registry);
        let email = SavedEmail::new("Dear Professor".to_string(), "First".to_string());
        store.add(&mut registry, email.clone());

        // Fresh store instance reads back the persisted payload
        let reloaded = saved_emails(&registry);
        assert_eq!(reloaded.len(), 1);
        let got = &reloaded.records()[0];
        assert_eq!(got.id, email.id);
        assert_eq!(got.title, email.title);
        assert_eq!(got.content, email.content);
        assert_eq!(got.date_created, email.date_created);
    }

    #[test]
    fn test_saved_emails_insert_at_front() {
        let (_dir, mut registry) = temp_registry();
        let mut store = saved_emails(&registry);

        store.add(
            &mut registry,
            SavedEmail::new("one".to_string(), "a".to_string()),
        );
        store.add(
            &mut registry,
            SavedEmail::new("two".to_string(), "b".to_string()),
        );

        assert_eq!(store.records()[0].content, "two");
        assert_eq!(store.records()[1].content, "one");
    }

    #[test]
    fn test_writing_styles_append_at_back() {
        let (_dir, mut registry) = temp_registry();
        let mut store = writing_styles(&registry);

        store.add(
            &mut registry,
            WritingStyle::new("one".to_string(), String::new()),
        );
        store.add(
            &mut registry,
            WritingStyle::new("two".to_string(), String::new()),
        );

        assert_eq!(store.records()[0].content, "one");
        assert_eq!(store.records()[1].content, "two");
    }

    #[test]
    fn test_update_by_id_replaces_record() {
        let (_dir, mut registry) = temp_registry();
        let mut store = saved_emails(&registry);

        let email = SavedEmail::new("old".to_string(), "t".to_string());
        store.add(&mut registry, email.clone());

        let mut changed = email.clone();
        changed.content = "new".to_string();
        store.update(&mut registry, changed);

        assert_eq!(store.records()[0].content, "new");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let (_dir, mut registry) = temp_registry();
        let mut store = saved_emails(&registry);

        store.add(
            &mut registry,
            SavedEmail::new("kept".to_string(), "t".to_string()),
        );
        let stranger = SavedEmail::new("other".to_string(), "x".to_string());
        store.update(&mut registry, stranger);

        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].content, "kept");
    }

    #[test]
    fn test_delete_twice_is_noop_second_time() {
        let (_dir, mut registry) = temp_registry();
        let mut store = drafts(&registry);

        let draft = Draft::new("wip".to_string(), String::new());
        store.add(&mut registry, draft.clone());
        store.add(&mut registry, Draft::new("other".to_string(), String::new()));

        store.delete(&mut registry, draft.id);
        assert_eq!(store.len(), 1);

        store.delete(&mut registry, draft.id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].content, "other");
    }

    #[test]
    fn test_drafts_add_inserts_newest_first_and_reloads() {
        let (_dir, mut registry) = temp_registry();
        let mut store = drafts(&registry);

        store.add(&mut registry, Draft::new("older".to_string(), String::new()));
        store.add(
            &mut registry,
            Draft::new("newer".to_string(), "My draft".to_string()),
        );

        assert_eq!(store.records()[0].content, "newer");

        let reloaded = drafts(&registry);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.records()[0].title, "My draft");
        assert_eq!(reloaded.records()[1].content, "older");
    }

    #[test]
    fn test_delete_at_out_of_range_is_noop() {
        let (_dir, mut registry) = temp_registry();
        let mut store = drafts(&registry);
        store.add(&mut registry, Draft::new("wip".to_string(), String::new()));

        store.delete_at(&mut registry, 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_at_replaces_by_position() {
        let (_dir, mut registry) = temp_registry();
        let mut store = drafts(&registry);
        store.add(&mut registry, Draft::new("one".to_string(), String::new()));

        let replacement = Draft::new("two".to_string(), "renamed".to_string());
        store.update_at(&mut registry, 0, replacement);
        assert_eq!(store.records()[0].content, "two");

        store.update_at(
            &mut registry,
            9,
            Draft::new("ignored".to_string(), String::new()),
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_legacy_string_array_migrates_in_memory() {
        let (_dir, mut registry) = temp_registry();
        registry.set("WritingStyles", json!(["sample one", "sample two"]));

        let store = writing_styles(&registry);
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].content, "sample one");
        assert_eq!(store.records()[0].title, "");
        assert_eq!(store.records()[1].content, "sample two");

        // The registry payload is untouched until the next mutation
        assert_eq!(
            registry.get("WritingStyles"),
            Some(&json!(["sample one", "sample two"]))
        );
    }

    #[test]
    fn test_legacy_payload_rewritten_in_current_schema_on_mutation() {
        let (_dir, mut registry) = temp_registry();
        registry.set("WritingStyles", json!(["sample"]));

        let mut store = writing_styles(&registry);
        store.add(
            &mut registry,
            WritingStyle::new("fresh".to_string(), String::new()),
        );

        let value = registry.get("WritingStyles").unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert!(array[0].get("dateCreated").is_some());
    }

    #[test]
    fn test_corrupt_payload_loads_empty() {
        let (_dir, mut registry) = temp_registry();
        registry.set("Drafts", json!({"not": "an array"}));

        let store = drafts(&registry);
        assert!(store.is_empty());
    }
}

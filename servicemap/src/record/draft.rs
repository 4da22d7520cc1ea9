use super::composer::{blank_record, compose_record, Composition};
use super::types::{AttributeMap, Feature, PendingGeocode};
use crate::error::{Error, Result};
use crate::schema::FieldSets;
use serde_json::Value;
use std::collections::HashSet;

/// In-memory record being created or edited.
///
/// Field edits land here; [`RecordDraft::compose`] turns the current state
/// into a submittable attribute map. Identity fields of an edited record
/// are read-only.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    attributes: AttributeMap,
    read_only: HashSet<String>,
    object_id: Option<i64>,
}

impl RecordDraft {
    /// Empty draft for a new record.
    pub fn create(sets: &FieldSets) -> Self {
        Self {
            attributes: blank_record(sets),
            read_only: HashSet::new(),
            object_id: None,
        }
    }

    /// Draft seeded from a stored feature.
    pub fn edit(feature: &Feature, sets: &FieldSets) -> Self {
        let read_only = feature
            .attributes
            .keys()
            .filter(|k| sets.is_identity(k))
            .cloned()
            .collect();
        Self {
            attributes: feature.attributes.clone(),
            read_only,
            object_id: feature.object_id(),
        }
    }

    pub fn is_create(&self) -> bool {
        self.object_id.is_none()
    }

    pub fn object_id(&self) -> Option<i64> {
        self.object_id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Set a field value. New fields are appended after existing ones.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let field = field.into();
        if self.read_only.contains(&field) {
            return Err(Error::ReadOnly(field));
        }
        self.attributes.insert(field, value.into());
        Ok(())
    }

    pub fn compose(
        &self,
        schema_other_fields: &[String],
        pending: Option<&PendingGeocode>,
        sets: &FieldSets,
    ) -> Composition {
        compose_record(Some(&self.attributes), schema_other_fields, pending, sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_draft_composes_like_empty_record() {
        let sets = FieldSets::default();
        let draft = RecordDraft::create(&sets);
        assert!(draft.is_create());
        assert_eq!(
            draft.compose(&[], None, &sets),
            compose_record(None, &[], None, &sets)
        );
    }

    #[test]
    fn test_set_fields_on_create() {
        let sets = FieldSets::default();
        let mut draft = RecordDraft::create(&sets);
        draft.set("Name", "Acme").unwrap();
        draft.set("Phone_number", "617 555 0100").unwrap();
        draft.set("Transportation", 1).unwrap();

        let c = draft.compose(&[], None, &sets);
        assert!(c.is_valid());
        assert_eq!(c.attributes["Name"], json!("Acme"));
        assert_eq!(c.attributes["Phone_number"], json!("617-555-0100"));
        assert_eq!(c.attributes["Transportation"], json!(1));
    }

    #[test]
    fn test_identity_fields_are_read_only() {
        let sets = FieldSets::default();
        let feature: Feature =
            serde_json::from_value(json!({"attributes": {"OBJECTID": 9, "Name": "Acme"}})).unwrap();
        let mut draft = RecordDraft::edit(&feature, &sets);

        assert_eq!(draft.object_id(), Some(9));
        assert!(!draft.is_create());
        assert!(matches!(draft.set("OBJECTID", 10), Err(Error::ReadOnly(_))));
        draft.set("Name", "Acme Senior Center").unwrap();
        assert_eq!(draft.get("Name"), Some(&json!("Acme Senior Center")));
    }
}

//! End-to-end create/edit/delete against an in-memory layer

use serde_json::{json, Value};
use servicemap::dictionary::DictionaryCache;
use servicemap::export::{ExportSheet, PlainTextRenderer};
use servicemap::schema::fields::{CUSTOM_FIELDS, SERVICE_FLAGS};
use servicemap::schema::{LayerField, SchemaCatalog};
use servicemap::store::{parse_id_list, FeatureQuery, FeatureStore, InMemoryFeatureStore, WhereClause};
use servicemap::{DictionaryRow, Error, FieldSets, PendingGeocode, SubmissionService, ValidationError};
use std::sync::Arc;
use std::time::Duration;

fn layer_fields() -> Vec<LayerField> {
    let mut names = vec!["OBJECTID", "GlobalID", "Agency_Name", "Languages", "Website", "Search_Terms", "EditDate"];
    names.extend_from_slice(CUSTOM_FIELDS);
    names.extend_from_slice(SERVICE_FLAGS);
    names.into_iter().map(LayerField::named).collect()
}

fn dictionary_rows() -> Vec<DictionaryRow> {
    vec![
        DictionaryRow::new("Transportation", "bus, rides"),
        DictionaryRow::new("Home_Delivered_Meals", "meals on wheels, rides"),
    ]
}

fn service() -> (Arc<InMemoryFeatureStore>, SubmissionService) {
    let store = Arc::new(InMemoryFeatureStore::new(layer_fields()));
    let sets = FieldSets::default();
    let schema = SchemaCatalog::new(store.clone(), sets, Duration::from_secs(3600));
    let dictionary = DictionaryCache::new(Box::new(dictionary_rows()), Duration::from_secs(3600));
    let service = SubmissionService::new(store.clone(), schema, dictionary);
    (store, service)
}

fn stored(store: &InMemoryFeatureStore, id: i64) -> servicemap::Feature {
    store
        .query(&FeatureQuery::by_object_ids(vec![id]).with_geometry())
        .unwrap()
        .into_iter()
        .next()
        .unwrap()
}

#[test]
fn test_create_composes_and_synthesizes() {
    let (store, service) = service();
    let mut draft = service.new_draft();
    draft.set("Agency_Name", "Acme Elder Care").unwrap();
    draft.set("Phone_number", "(617) 555-0100").unwrap();
    draft.set("Transportation", 1).unwrap();
    draft.set("Home_Delivered_Meals", "1").unwrap();

    let pending = PendingGeocode::new("1 Main St, Boston, MA", 42.36, -71.06);
    let id = service.create(&draft, Some(&pending)).unwrap();
    assert_eq!(id, 1);

    let feature = stored(&store, id);
    let attrs = &feature.attributes;
    assert_eq!(attrs["Phone_number"], json!("617-555-0100"));
    assert_eq!(attrs["Address"], json!("1 Main St, Boston, MA"));
    assert_eq!(attrs["Latitude"], json!(42.36));
    assert_eq!(attrs["Transportation"], json!(1));
    assert_eq!(attrs["Home_Delivered_Meals"], json!(1));
    assert_eq!(attrs["Adult_Day_Services"], json!(0));
    assert_eq!(attrs["Languages"], Value::Null);
    assert_eq!(
        attrs["Search_Terms"],
        json!("Acme Elder Care, 1 Main St, Boston, MA, bus, rides, meals on wheels")
    );

    let geometry = feature.geometry.unwrap();
    assert_eq!(geometry.x, -71.06);
    assert_eq!(geometry.y, 42.36);
    assert_eq!(geometry.spatial_reference.wkid, 4326);
}

#[test]
fn test_invalid_phone_blocks_write() {
    let (store, service) = service();
    let mut draft = service.new_draft();
    draft.set("Agency_Name", "Acme").unwrap();
    draft.set("Phone_number", "555-0100").unwrap();

    let err = service.create(&draft, None).unwrap_err();
    assert_eq!(
        err.validation_errors(),
        [ValidationError::Phone {
            raw: "555-0100".to_string()
        }]
    );
    assert!(store.is_empty());
}

#[test]
fn test_malformed_coordinate_blocks_write() {
    let (store, service) = service();
    let mut draft = service.new_draft();
    draft.set("Agency_Name", "Acme").unwrap();
    draft.set("Latitude", "north").unwrap();
    draft.set("Longitude", "-71.06").unwrap();

    let err = service.create(&draft, None).unwrap_err();
    assert_eq!(
        err.validation_errors(),
        [ValidationError::Coordinate {
            field: "Latitude".to_string(),
            value: "north".to_string()
        }]
    );
    assert!(store.is_empty());
}

#[test]
fn test_edit_round_trip_keeps_identity_and_updates_terms() {
    let (store, service) = service();
    let mut draft = service.new_draft();
    draft.set("Agency_Name", "Acme").unwrap();
    draft.set("Transportation", 1).unwrap();
    let id = service.create(&draft, None).unwrap();

    let mut edit = service.load_for_edit(id).unwrap();
    assert_eq!(edit.object_id(), Some(id));
    assert!(matches!(edit.set("OBJECTID", 99), Err(Error::ReadOnly(_))));
    edit.set("Transportation", 0).unwrap();
    edit.set("Agency_Name", "Acme Senior Services").unwrap();

    assert_eq!(service.update(&edit, None).unwrap(), id);
    let attrs = stored(&store, id).attributes;
    assert_eq!(attrs["OBJECTID"], json!(id));
    assert_eq!(attrs["Transportation"], json!(0));
    assert_eq!(attrs["Search_Terms"], json!("Acme Senior Services"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_schema_classification_drives_composition() {
    let (_store, service) = service();
    let mut draft = service.new_draft();
    draft.set("Agency_Name", "Acme").unwrap();
    let id = service.create(&draft, None).unwrap();

    let classification = service.schema().classification().unwrap();
    assert!(classification.other.iter().any(|f| f == "Languages"));
    assert!(classification.excluded.iter().any(|f| f == "EditDate"));
    assert_eq!(classification.service_flags.len(), SERVICE_FLAGS.len());

    service.schema().invalidate();
    let edit = service.load_for_edit(id).unwrap();
    let feature = service.prepare(&edit, None).unwrap();
    assert!(feature.attributes.contains_key("Website"));
    assert!(!feature.attributes.contains_key("EditDate"));
}

#[test]
fn test_delete_and_missing_record() {
    let (store, service) = service();
    let draft = service.new_draft();
    let first = service.create(&draft, None).unwrap();
    let second = service.create(&draft, None).unwrap();
    assert_eq!(store.count(&WhereClause::All).unwrap(), 2);

    service.delete(first).unwrap();
    assert_eq!(store.count(&WhereClause::All).unwrap(), 1);
    assert!(matches!(service.delete(first), Err(Error::Collaborator(_))));
    assert!(matches!(service.load_for_edit(first), Err(Error::NotFound(_))));
    assert!(service.load_for_edit(second).is_ok());
}

#[test]
fn test_export_selected_records() {
    let (store, service) = service();
    for name in ["Acme", "Beacon", "Cedar"] {
        let mut draft = service.new_draft();
        draft.set("Agency_Name", name).unwrap();
        draft.set("Languages", "English").unwrap();
        service.create(&draft, None).unwrap();
    }

    let ids = parse_id_list("3, 1").unwrap();
    let features = store.query(&FeatureQuery::by_object_ids(ids)).unwrap();
    let sheet = ExportSheet::from_features(&features);
    assert_eq!(sheet.len(), 2);

    let text = PlainTextRenderer::default().render_string(&sheet);
    assert!(text.contains("Agency Name: Acme"));
    assert!(text.contains("Agency Name: Cedar"));
    assert!(!text.contains("Beacon"));
    assert!(text.contains("Languages: English"));
}

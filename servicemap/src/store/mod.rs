//! Collaborator seams: the feature store and the geocoder.
//!
//! Both are external services. The core only sees already-decoded values
//! or a [`crate::Error::Collaborator`] fault; retries belong to the
//! implementations.

pub mod filter;
pub mod memory;

pub use filter::{parse_id_list, WhereClause};
pub use memory::InMemoryFeatureStore;

use crate::record::{Feature, PendingGeocode};
use crate::schema::LayerField;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Minimum non-blank characters before address suggestions are requested
pub const MIN_SUGGEST_CHARS: usize = 3;

/// Query against the feature store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureQuery {
    pub filter: WhereClause,
    /// Fields to return; empty means all
    pub out_fields: Vec<String>,
    pub return_geometry: bool,
}

impl FeatureQuery {
    pub fn all() -> Self {
        Self {
            filter: WhereClause::All,
            out_fields: Vec::new(),
            return_geometry: false,
        }
    }

    pub fn by_object_ids(ids: Vec<i64>) -> Self {
        Self {
            filter: WhereClause::ObjectIds(ids),
            out_fields: Vec::new(),
            return_geometry: false,
        }
    }

    pub fn with_geometry(mut self) -> Self {
        self.return_geometry = true;
        self
    }

    pub fn with_out_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.out_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// `outFields` parameter value
    pub fn out_fields_param(&self) -> String {
        if self.out_fields.is_empty() {
            "*".to_string()
        } else {
            self.out_fields.join(",")
        }
    }
}

/// One apply-edits request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditBatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adds: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletes: Vec<i64>,
}

impl EditBatch {
    pub fn add(feature: Feature) -> Self {
        Self {
            adds: vec![feature],
            ..Default::default()
        }
    }

    pub fn update(feature: Feature) -> Self {
        Self {
            updates: vec![feature],
            ..Default::default()
        }
    }

    pub fn delete(object_id: i64) -> Self {
        Self {
            deletes: vec![object_id],
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Outcome of a single add/update/delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    #[serde(default)]
    pub object_id: Option<i64>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditResult {
    pub fn ok(object_id: i64) -> Self {
        Self {
            object_id: Some(object_id),
            success: true,
            error: None,
        }
    }

    pub fn failed(object_id: Option<i64>, error: impl Into<String>) -> Self {
        Self {
            object_id,
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResults {
    #[serde(default)]
    pub add_results: Vec<EditResult>,
    #[serde(default)]
    pub update_results: Vec<EditResult>,
    #[serde(default)]
    pub delete_results: Vec<EditResult>,
}

/// Geospatial feature store (query, apply-edits, describe)
pub trait FeatureStore: Send + Sync {
    /// Field definitions of the layer
    fn describe_fields(&self) -> Result<Vec<LayerField>>;

    fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>>;

    fn count(&self, filter: &WhereClause) -> Result<u64>;

    fn apply_edits(&self, batch: &EditBatch) -> Result<EditResults>;
}

/// Address geocoding and autocomplete
pub trait Geocoder: Send + Sync {
    /// Latitude and longitude for an address
    fn geocode(&self, address: &str) -> Result<(f64, f64)>;

    /// Address suggestions for partial input
    fn suggest(&self, input: &str) -> Result<Vec<String>>;
}

/// Suggestions for an address search box. Inputs shorter than
/// [`MIN_SUGGEST_CHARS`] get none without calling the geocoder.
pub fn address_suggestions(geocoder: &dyn Geocoder, input: &str) -> Result<Vec<String>> {
    if input.chars().filter(|c| !c.is_whitespace()).count() < MIN_SUGGEST_CHARS {
        return Ok(Vec::new());
    }
    geocoder.suggest(input)
}

/// Geocode a picked suggestion into a pending address/coordinate triple.
pub fn resolve_suggestion(geocoder: &dyn Geocoder, picked: &str) -> Result<PendingGeocode> {
    let (lat, lng) = geocoder.geocode(picked)?;
    tracing::debug!(address = picked, lat, lng, "Geocoded address suggestion");
    Ok(PendingGeocode::new(picked, lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGeocoder {
        suggest_calls: AtomicUsize,
    }

    impl Geocoder for FixedGeocoder {
        fn geocode(&self, address: &str) -> Result<(f64, f64)> {
            if address.is_empty() {
                return Err(Error::Collaborator("Geocoding failed: ZERO_RESULTS".to_string()));
            }
            Ok((42.36, -71.06))
        }

        fn suggest(&self, input: &str) -> Result<Vec<String>> {
            self.suggest_calls.fetch_add(1, Ordering::Relaxed);
            Ok(vec![format!("{}, Boston, MA", input)])
        }
    }

    fn geocoder() -> FixedGeocoder {
        FixedGeocoder {
            suggest_calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_short_input_skips_geocoder() {
        let g = geocoder();
        assert!(address_suggestions(&g, " 1 ").unwrap().is_empty());
        assert!(address_suggestions(&g, "1 2").unwrap().is_empty());
        assert_eq!(g.suggest_calls.load(Ordering::Relaxed), 0);

        let s = address_suggestions(&g, "1 Main").unwrap();
        assert_eq!(s, vec!["1 Main, Boston, MA"]);
        assert_eq!(g.suggest_calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_resolve_suggestion() {
        let pending = resolve_suggestion(&geocoder(), "1 Main St, Boston, MA").unwrap();
        assert_eq!(pending, PendingGeocode::new("1 Main St, Boston, MA", 42.36, -71.06));
    }

    #[test]
    fn test_geocoder_fault_propagates() {
        assert!(matches!(
            resolve_suggestion(&geocoder(), ""),
            Err(Error::Collaborator(_))
        ));
    }

    #[test]
    fn test_edit_batch_serialization_skips_empty_lists() {
        let batch = EditBatch::delete(4);
        assert_eq!(serde_json::to_value(&batch).unwrap(), json!({"deletes": [4]}));
        assert!(!batch.is_empty());
        assert!(EditBatch::default().is_empty());
    }

    #[test]
    fn test_edit_results_parse() {
        let results: EditResults = serde_json::from_value(json!({
            "addResults": [{"objectId": 11, "success": true}],
            "updateResults": [],
            "deleteResults": []
        }))
        .unwrap();
        assert_eq!(results.add_results, vec![EditResult::ok(11)]);
    }

    #[test]
    fn test_out_fields_param() {
        assert_eq!(FeatureQuery::all().out_fields_param(), "*");
        let q = FeatureQuery::all().with_out_fields(["Agency_Name", "Address"]);
        assert_eq!(q.out_fields_param(), "Agency_Name,Address");
    }
}

//! In-memory feature store backed by an optional JSON snapshot file.

use super::{EditBatch, EditResult, EditResults, FeatureQuery, FeatureStore, WhereClause};
use crate::record::{AttributeMap, Feature};
use crate::schema::LayerField;
use crate::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const OBJECT_ID_FIELD: &str = "OBJECTID";

/// Serialized form of a layer: schema plus features
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerSnapshot {
    #[serde(default)]
    pub fields: Vec<LayerField>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

pub struct InMemoryFeatureStore {
    fields: Vec<LayerField>,
    known: HashSet<String>,
    features: Mutex<Vec<Feature>>,
}

impl InMemoryFeatureStore {
    /// Empty layer with the given schema. An empty schema accepts any field.
    pub fn new(fields: Vec<LayerField>) -> Self {
        Self::from_snapshot(LayerSnapshot {
            fields,
            features: Vec::new(),
        })
    }

    pub fn from_snapshot(snapshot: LayerSnapshot) -> Self {
        let known = snapshot.fields.iter().map(|f| f.name.clone()).collect();
        Self {
            fields: snapshot.fields,
            known,
            features: Mutex::new(snapshot.features),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: LayerSnapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            fields = snapshot.fields.len(),
            features = snapshot.features.len(),
            "Loaded layer snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.snapshot())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            fields: self.fields.clone(),
            features: self.features.lock().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unknown_field(&self, attributes: &AttributeMap) -> Option<String> {
        if self.known.is_empty() {
            return None;
        }
        attributes
            .keys()
            .find(|k| !self.known.contains(k.as_str()) && k.as_str() != "ObjectId")
            .cloned()
    }

    fn add(&self, features: &mut Vec<Feature>, feature: &Feature) -> EditResult {
        if let Some(field) = self.unknown_field(&feature.attributes) {
            return EditResult::failed(None, format!("Field '{}' does not exist", field));
        }
        let next_id = features
            .iter()
            .filter_map(Feature::object_id)
            .max()
            .unwrap_or(0)
            + 1;

        let mut attributes = AttributeMap::new();
        attributes.insert(OBJECT_ID_FIELD.to_string(), Value::from(next_id));
        for (k, v) in &feature.attributes {
            if k != OBJECT_ID_FIELD && k != "ObjectId" {
                attributes.insert(k.clone(), v.clone());
            }
        }
        features.push(Feature {
            attributes,
            geometry: feature.geometry,
        });
        EditResult::ok(next_id)
    }

    fn update(&self, features: &mut [Feature], feature: &Feature) -> EditResult {
        let Some(id) = feature.object_id() else {
            return EditResult::failed(None, "Update is missing an object id");
        };
        if let Some(field) = self.unknown_field(&feature.attributes) {
            return EditResult::failed(Some(id), format!("Field '{}' does not exist", field));
        }
        let Some(target) = features.iter_mut().find(|f| f.object_id() == Some(id)) else {
            return EditResult::failed(Some(id), format!("Object {} not found", id));
        };
        for (k, v) in &feature.attributes {
            target.attributes.insert(k.clone(), v.clone());
        }
        if feature.geometry.is_some() {
            target.geometry = feature.geometry;
        }
        EditResult::ok(id)
    }
}

impl FeatureStore for InMemoryFeatureStore {
    fn describe_fields(&self) -> Result<Vec<LayerField>> {
        Ok(self.fields.clone())
    }

    fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>> {
        let features = self.features.lock();
        Ok(features
            .iter()
            .filter(|f| query.filter.matches(f.object_id()))
            .map(|f| {
                let attributes = if query.out_fields.is_empty() {
                    f.attributes.clone()
                } else {
                    f.attributes
                        .iter()
                        .filter(|(k, _)| query.out_fields.iter().any(|o| o == *k))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                };
                Feature {
                    attributes,
                    geometry: if query.return_geometry { f.geometry } else { None },
                }
            })
            .collect())
    }

    fn count(&self, filter: &WhereClause) -> Result<u64> {
        let features = self.features.lock();
        Ok(features.iter().filter(|f| filter.matches(f.object_id())).count() as u64)
    }

    fn apply_edits(&self, batch: &EditBatch) -> Result<EditResults> {
        let mut features = self.features.lock();
        let mut results = EditResults::default();

        for feature in &batch.adds {
            results.add_results.push(self.add(&mut features, feature));
        }
        for feature in &batch.updates {
            results.update_results.push(self.update(&mut features, feature));
        }
        for id in &batch.deletes {
            let before = features.len();
            features.retain(|f| f.object_id() != Some(*id));
            results.delete_results.push(if features.len() < before {
                EditResult::ok(*id)
            } else {
                EditResult::failed(Some(*id), format!("Object {} not found", id))
            });
        }

        Ok(results)
    }
}

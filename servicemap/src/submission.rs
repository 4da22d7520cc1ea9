//! Create/update/delete orchestration
//!
//! classify → compose → synthesize → apply-edits. Either the full composed
//! and synthesized record reaches the feature store, or nothing does.

use crate::dictionary::DictionaryCache;
use crate::error::{Error, Result};
use crate::record::{Feature, PendingGeocode, RecordDraft};
use crate::schema::{FieldSets, SchemaCatalog};
use crate::search::apply_search_terms;
use crate::store::{EditBatch, EditResult, FeatureQuery, FeatureStore};
use std::sync::Arc;
use std::time::Instant;

pub struct SubmissionService {
    store: Arc<dyn FeatureStore>,
    schema: SchemaCatalog,
    dictionary: DictionaryCache,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn FeatureStore>, schema: SchemaCatalog, dictionary: DictionaryCache) -> Self {
        Self {
            store,
            schema,
            dictionary,
        }
    }

    pub fn field_sets(&self) -> &FieldSets {
        self.schema.field_sets()
    }

    pub fn schema(&self) -> &SchemaCatalog {
        &self.schema
    }

    pub fn dictionary(&self) -> &DictionaryCache {
        &self.dictionary
    }

    /// Blank draft for a new record.
    pub fn new_draft(&self) -> RecordDraft {
        RecordDraft::create(self.field_sets())
    }

    /// Load a stored record for editing.
    pub fn load_for_edit(&self, object_id: i64) -> Result<RecordDraft> {
        let features = self
            .store
            .query(&FeatureQuery::by_object_ids(vec![object_id]).with_geometry())?;
        let feature = features
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("object {}", object_id)))?;
        Ok(RecordDraft::edit(&feature, self.field_sets()))
    }

    /// Compose, validate and synthesize a draft into the feature that would
    /// be submitted. Nothing is written.
    pub fn prepare(&self, draft: &RecordDraft, pending: Option<&PendingGeocode>) -> Result<Feature> {
        let classification = self.schema.classification()?;
        let composition = draft.compose(&classification.other, pending, self.field_sets());
        if !composition.errors.is_empty() {
            tracing::warn!(errors = composition.errors.len(), "Record failed validation");
            return Err(Error::Validation(composition.errors));
        }

        let dictionary = self.dictionary.current()?;
        let mut feature = composition.into_feature()?;
        apply_search_terms(&mut feature.attributes, &dictionary, self.field_sets());
        Ok(feature)
    }

    /// Submit a draft as a new record. Returns the new object id.
    pub fn create(&self, draft: &RecordDraft, pending: Option<&PendingGeocode>) -> Result<i64> {
        self.submit("create", || {
            let feature = self.prepare(draft, pending)?;
            let results = self.store.apply_edits(&EditBatch::add(feature))?;
            first_success(results.add_results, "add")
        })
    }

    /// Submit an edited record. The draft must come from [`Self::load_for_edit`]
    /// or otherwise carry an object id.
    pub fn update(&self, draft: &RecordDraft, pending: Option<&PendingGeocode>) -> Result<i64> {
        self.submit("update", || {
            let object_id = draft
                .object_id()
                .ok_or_else(|| Error::NotFound("object id on edited record".to_string()))?;
            let feature = self.prepare(draft, pending)?;
            let results = self.store.apply_edits(&EditBatch::update(feature))?;
            first_success(results.update_results, "update").map(|id| {
                if id != object_id {
                    tracing::warn!(expected = object_id, got = id, "Store reported a different object id");
                }
                object_id
            })
        })
    }

    pub fn delete(&self, object_id: i64) -> Result<i64> {
        self.submit("delete", || {
            let results = self.store.apply_edits(&EditBatch::delete(object_id))?;
            first_success(results.delete_results, "delete")
        })
    }

    fn submit<F>(&self, operation: &str, run: F) -> Result<i64>
    where
        F: FnOnce() -> Result<i64>,
    {
        let start = Instant::now();
        let outcome = run();
        crate::metrics::record_submission_duration(operation, start.elapsed());

        match &outcome {
            Ok(id) => {
                crate::metrics::record_submission(operation, "ok");
                tracing::info!(operation, object_id = id, "Submission succeeded");
            }
            Err(Error::Validation(_)) => {
                crate::metrics::record_submission(operation, "invalid");
            }
            Err(e) => {
                crate::metrics::record_submission(operation, "error");
                tracing::error!(operation, error = %e, "Submission failed");
            }
        }
        outcome
    }
}

fn first_success(results: Vec<EditResult>, operation: &str) -> Result<i64> {
    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| Error::Collaborator(format!("store returned no {} result", operation)))?;

    match (result.success, result.object_id) {
        (true, Some(id)) => Ok(id),
        (true, None) => Err(Error::Collaborator(format!(
            "store reported {} success without an object id",
            operation
        ))),
        (false, _) => Err(Error::Collaborator(format!(
            "{} failed: {}",
            operation,
            result.error.unwrap_or_else(|| "unknown error".to_string())
        ))),
    }
}

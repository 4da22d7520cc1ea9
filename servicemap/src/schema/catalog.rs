use super::classifier::{classify_fields, detect_drift, Classification};
use super::fields::FieldSets;
use crate::cache::TtlCache;
use crate::store::FeatureStore;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Layer schema classification memoized over the feature store's describe
/// operation.
///
/// Each rebuild is compared against the previous classification and any
/// newly appeared or removed other-fields are logged. Drift is never an
/// error; the composer defaults new fields into the next record.
pub struct SchemaCatalog {
    store: Arc<dyn FeatureStore>,
    sets: FieldSets,
    cache: TtlCache<Classification>,
}

impl SchemaCatalog {
    pub fn new(store: Arc<dyn FeatureStore>, sets: FieldSets, ttl: Duration) -> Self {
        Self {
            store,
            sets,
            cache: TtlCache::new("layer_schema", ttl),
        }
    }

    pub fn field_sets(&self) -> &FieldSets {
        &self.sets
    }

    pub fn classification(&self) -> Result<Arc<Classification>> {
        let previous = self.cache.peek();
        self.cache.get_or_refresh(|| {
            let names: Vec<String> = self
                .store
                .describe_fields()?
                .into_iter()
                .map(|f| f.name)
                .collect();
            let current = classify_fields(&names, &self.sets);

            if let Some(previous) = previous.as_deref() {
                let drift = detect_drift(previous, &current);
                if !drift.is_empty() {
                    tracing::info!(
                        added = ?drift.added,
                        removed = ?drift.removed,
                        "Layer schema changed"
                    );
                }
            }
            tracing::debug!(
                other = current.other.len(),
                service_flags = current.service_flags.len(),
                excluded = current.excluded.len(),
                "Classified layer schema"
            );
            Ok(current)
        })
    }

    /// Other (free-text) fields of the current schema.
    pub fn other_fields(&self) -> Result<Vec<String>> {
        Ok(self.classification()?.other.clone())
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

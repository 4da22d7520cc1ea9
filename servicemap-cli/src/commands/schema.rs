use anyhow::{Context, Result};
use servicemap::schema::{schema_fields, LayerDescription};
use servicemap::store::{FeatureStore, InMemoryFeatureStore};
use servicemap::{classify_fields, Config};
use std::fs;
use std::path::Path;

/// Field names from a layer description file, or from the configured
/// snapshot when no file is given.
pub fn load_field_names(config: &Config, schema: Option<&Path>) -> Result<Vec<String>> {
    match schema {
        Some(path) => {
            let content = fs::read_to_string(path).with_context(|| format!("Failed to read schema {:?}", path))?;
            let description: LayerDescription =
                serde_json::from_str(&content).with_context(|| format!("Invalid layer description in {:?}", path))?;
            Ok(description.field_names())
        }
        None => {
            let path = &config.layer.snapshot_path;
            let store = InMemoryFeatureStore::load(path)
                .with_context(|| format!("Failed to load layer snapshot {:?}", path))?;
            Ok(store.describe_fields()?.into_iter().map(|f| f.name).collect())
        }
    }
}

pub fn run_classify(config: &Config, schema: Option<&Path>) -> Result<()> {
    let names = load_field_names(config, schema)?;
    let sets = config.field_sets();
    let classification = classify_fields(&names, &sets);

    tracing::info!(
        fields = names.len(),
        other = classification.other.len(),
        service_flags = classification.service_flags.len(),
        excluded = classification.excluded.len(),
        "Classified layer schema"
    );

    let output = serde_json::json!({
        "other": classification.other,
        "service_flags": classification.service_flags,
        "excluded": classification.excluded,
        "fields": schema_fields(&names, &sets),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

use anyhow::{Context, Result};
use servicemap::export::{ExportSheet, PlainTextRenderer, SheetRenderer};
use servicemap::store::{parse_id_list, FeatureQuery, FeatureStore, InMemoryFeatureStore};
use servicemap::Config;
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn run_export(config: &Config, ids: &str, width: usize, output: Option<&Path>) -> Result<()> {
    let ids = parse_id_list(ids)?;
    let path = &config.layer.snapshot_path;
    let store =
        InMemoryFeatureStore::load(path).with_context(|| format!("Failed to load layer snapshot {:?}", path))?;

    let features = store.query(&FeatureQuery::by_object_ids(ids.clone()))?;
    if features.len() < ids.len() {
        tracing::warn!(requested = ids.len(), found = features.len(), "Some selected records were not found");
    }

    let sheet = ExportSheet::from_features(&features);
    let bytes = PlainTextRenderer { width }.render(&sheet)?;

    match output {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!(entries = sheet.len(), path = %path.display(), "Exported service centre sheet");
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

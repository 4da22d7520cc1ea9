use super::{parse_assignment, GeocodeArgs};
use anyhow::{Context, Result};
use servicemap::dictionary::{DictionaryCache, FileDictionarySource};
use servicemap::schema::SchemaCatalog;
use servicemap::store::InMemoryFeatureStore;
use servicemap::{Config, SubmissionService};
use std::sync::Arc;

/// Submission service over the configured snapshot store and dictionary file
pub fn open_service(config: &Config) -> Result<(Arc<InMemoryFeatureStore>, SubmissionService)> {
    let path = &config.layer.snapshot_path;
    let store = Arc::new(
        InMemoryFeatureStore::load(path).with_context(|| format!("Failed to load layer snapshot {:?}", path))?,
    );
    let schema = SchemaCatalog::new(store.clone(), config.field_sets(), config.schema.ttl());
    let dictionary = DictionaryCache::new(
        Box::new(FileDictionarySource::new(&config.dictionary.path)),
        config.dictionary.cache_config().ttl(),
    );
    let service = SubmissionService::new(store.clone(), schema, dictionary);
    Ok((store, service))
}

fn save_snapshot(config: &Config, store: &InMemoryFeatureStore) -> Result<()> {
    let path = &config.layer.snapshot_path;
    store
        .save(path)
        .with_context(|| format!("Failed to save layer snapshot {:?}", path))
}

pub fn run_submit(
    config: &Config,
    id: Option<i64>,
    assignments: &[String],
    geocode: &GeocodeArgs,
    dry_run: bool,
) -> Result<()> {
    let (store, service) = open_service(config)?;
    let mut draft = match id {
        Some(id) => service.load_for_edit(id)?,
        None => service.new_draft(),
    };
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        draft.set(field, value)?;
    }
    let pending = geocode.pending();

    if dry_run {
        let feature = service.prepare(&draft, pending.as_ref())?;
        println!("{}", serde_json::to_string_pretty(&feature)?);
        return Ok(());
    }

    let object_id = if draft.is_create() {
        service.create(&draft, pending.as_ref())?
    } else {
        service.update(&draft, pending.as_ref())?
    };
    save_snapshot(config, &store)?;
    println!("{}", object_id);
    Ok(())
}

pub fn run_delete(config: &Config, id: i64) -> Result<()> {
    let (store, service) = open_service(config)?;
    service.delete(id)?;
    save_snapshot(config, &store)?;
    println!("Deleted {}", id);
    Ok(())
}

use super::schema::load_field_names;
use super::{read_record, GeocodeArgs};
use anyhow::{Context, Result};
use servicemap::dictionary::{DictionarySource, FileDictionarySource};
use servicemap::{classify_fields, compose_record, load_keyword_dictionary, normalize_phone, synthesize_search_terms, Config};
use std::path::Path;

pub fn run_phone(raw: &str) -> Result<()> {
    let (normalized, error) = normalize_phone(raw);
    println!("{}", normalized);
    if let Some(error) = error {
        eprintln!("{}", error);
    }
    Ok(())
}

pub fn run_compose(config: &Config, record: &Path, schema: Option<&Path>, geocode: &GeocodeArgs) -> Result<()> {
    let existing = read_record(record)?;
    let sets = config.field_sets();
    let names = load_field_names(config, schema)?;
    let classification = classify_fields(&names, &sets);
    let pending = geocode.pending();

    let composition = compose_record(Some(&existing), &classification.other, pending.as_ref(), &sets);
    if !composition.defaulted.is_empty() {
        tracing::info!(defaulted = ?composition.defaulted, "Filled missing schema fields");
    }

    let error_count = composition.errors.len();
    let output = serde_json::json!({
        "attributes": composition.attributes,
        "geometry": composition.geometry,
        "defaulted": composition.defaulted,
        "errors": composition.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if error_count > 0 {
        anyhow::bail!("Record has {} validation error(s)", error_count);
    }
    Ok(())
}

pub fn run_search_terms(config: &Config, record: &Path, dictionary: Option<&Path>) -> Result<()> {
    let attributes = read_record(record)?;
    let path = dictionary.unwrap_or(config.dictionary.path.as_path());
    let source = FileDictionarySource::new(path);
    let rows = source
        .load_rows()
        .with_context(|| format!("Failed to load keyword dictionary {:?}", path))?;
    let dictionary = load_keyword_dictionary(&rows);

    println!("{}", synthesize_search_terms(&attributes, &dictionary, &config.field_sets()));
    Ok(())
}

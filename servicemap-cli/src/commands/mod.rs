pub mod export;
pub mod record;
pub mod schema;
pub mod submit;

pub use export::run_export;
pub use record::{run_compose, run_phone, run_search_terms};
pub use schema::run_classify;
pub use submit::{run_delete, run_submit};

use anyhow::{bail, Context, Result};
use clap::Args;
use servicemap::record::PendingGeocode;
use servicemap::{AttributeMap, Feature};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A picked geocoder suggestion, given on the command line
#[derive(Args, Debug, Default)]
pub struct GeocodeArgs {
    /// Resolved address text
    #[arg(long, requires_all = ["lat", "lng"])]
    pub address: Option<String>,

    /// Resolved latitude
    #[arg(long, requires = "address", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Resolved longitude
    #[arg(long, requires = "address", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

impl GeocodeArgs {
    pub fn pending(&self) -> Option<PendingGeocode> {
        match (&self.address, self.lat, self.lng) {
            (Some(address), Some(lat), Some(lng)) => Some(PendingGeocode::new(address.clone(), lat, lng)),
            _ => None,
        }
    }
}

/// Read a record file holding either a bare attribute object or a feature
/// (`{"attributes": {...}}`).
pub fn read_record(path: &Path) -> Result<AttributeMap> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read record {:?}", path))?;
    let value: Value = serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))?;
    match value {
        Value::Object(map) if map.get("attributes").is_some_and(Value::is_object) => {
            let feature: Feature = serde_json::from_value(Value::Object(map))?;
            Ok(feature.attributes)
        }
        Value::Object(map) => Ok(map),
        _ => bail!("Record {:?} must be a JSON object", path),
    }
}

/// Parse a `FIELD=VALUE` assignment. Values that parse as JSON numbers or
/// booleans keep that type; everything else is a string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((field, value)) = raw.split_once('=') else {
        bail!("Expected FIELD=VALUE, got '{}'", raw);
    };
    let field = field.trim();
    if field.is_empty() {
        bail!("Empty field name in '{}'", raw);
    }
    let value = match serde_json::from_str::<Value>(value) {
        Ok(v @ (Value::Number(_) | Value::Bool(_))) => v,
        _ => Value::String(value.to_string()),
    };
    Ok((field.to_string(), value))
}

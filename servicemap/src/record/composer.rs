//! Record composition
//!
//! Merges a stored (or blank) record with the current layer schema and the
//! fixed field sets into the complete attribute map sent on create/update.

use super::phone::normalize_phone;
use super::types::{display_text, flag_is_on, AttributeMap, Feature, Geometry, PendingGeocode};
use crate::error::{Error, Result, ValidationError};
use crate::schema::fields::{FieldSets, ADDRESS_FIELD, LATITUDE_FIELD, LONGITUDE_FIELD, PHONE_FIELD};
use serde_json::Value;
use std::collections::HashMap;

/// Output of [`compose_record`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    /// Complete attribute map; empty strings already replaced by null
    pub attributes: AttributeMap,
    /// Point geometry, present only when both coordinates parse
    pub geometry: Option<Geometry>,
    /// Problems that must block submission
    pub errors: Vec<ValidationError>,
    /// Schema fields the record did not carry and that were defaulted in
    pub defaulted: Vec<String>,
}

impl Composition {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a submittable feature, failing if any validation error
    /// was collected.
    pub fn into_feature(self) -> Result<Feature> {
        if !self.errors.is_empty() {
            return Err(Error::Validation(self.errors));
        }
        Ok(Feature {
            attributes: self.attributes,
            geometry: self.geometry,
        })
    }
}

/// Attribute map for a new record: every custom field, empty.
pub fn blank_record(sets: &FieldSets) -> AttributeMap {
    sets.custom_fields()
        .iter()
        .map(|f| (f.clone(), Value::String(String::new())))
        .collect()
}

/// Compose the full attribute map for a create (`existing` is `None`) or an
/// edit.
///
/// Every name in `schema_other_fields` and every service flag ends up in
/// the output exactly once. Address and coordinates come from `pending`
/// when a geocode suggestion was picked.
pub fn compose_record(
    existing: Option<&AttributeMap>,
    schema_other_fields: &[String],
    pending: Option<&PendingGeocode>,
    sets: &FieldSets,
) -> Composition {
    let blank;
    let source = match existing {
        Some(attrs) => attrs,
        None => {
            blank = blank_record(sets);
            &blank
        }
    };

    let mut attributes = AttributeMap::new();
    let mut flags: HashMap<&str, &Value> = HashMap::new();
    let mut errors = Vec::new();

    for (key, value) in source {
        if sets.is_identity(key) {
            attributes.insert(key.clone(), value.clone());
        } else if sets.is_system(key) {
            // audit fields are maintained by the store
            tracing::trace!(field = %key, "Dropping system field from edit");
        } else if sets.is_service_flag(key) {
            flags.insert(key.as_str(), value);
        } else if key == PHONE_FIELD {
            // a rejected number is kept exactly as entered
            let raw = match value {
                Value::String(s) if !s.trim().is_empty() => s.clone(),
                other => display_text(other),
            };
            let (formatted, error) = normalize_phone(&raw);
            errors.extend(error);
            attributes.insert(key.clone(), Value::String(formatted));
        } else if let Some(geocoded) = pending.and_then(|p| p.value_for(key)) {
            attributes.insert(key.clone(), geocoded);
        } else if key == LATITUDE_FIELD || key == LONGITUDE_FIELD {
            let kept = match value {
                Value::Number(_) => value.clone(),
                other => Value::String(display_text(other)),
            };
            attributes.insert(key.clone(), kept);
        } else {
            attributes.insert(key.clone(), Value::String(display_text(value)));
        }
    }

    if let Some(pending) = pending {
        for field in [ADDRESS_FIELD, LATITUDE_FIELD, LONGITUDE_FIELD] {
            if !attributes.contains_key(field) {
                if let Some(geocoded) = pending.value_for(field) {
                    attributes.insert(field.to_string(), geocoded);
                }
            }
        }
    }

    let mut defaulted = Vec::new();
    for name in schema_other_fields {
        if attributes.contains_key(name) || sets.is_service_flag(name) || sets.is_system(name) {
            continue;
        }
        attributes.insert(name.clone(), Value::String(String::new()));
        defaulted.push(name.clone());
    }
    if !defaulted.is_empty() {
        tracing::info!(fields = ?defaulted, "Defaulted schema fields missing from record");
        crate::metrics::record_schema_defaults(defaulted.len());
    }

    for flag in sets.service_flags() {
        let on = flags.get(flag.as_str()).is_some_and(|v| flag_is_on(v));
        attributes.insert(flag.clone(), Value::from(i64::from(on)));
    }

    let latitude = parse_coordinate(&attributes, LATITUDE_FIELD, &mut errors);
    let longitude = parse_coordinate(&attributes, LONGITUDE_FIELD, &mut errors);
    let geometry = match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some(Geometry::wgs84(lat, lng)),
        _ => None,
    };

    nullify_empty(&mut attributes);

    tracing::debug!(
        fields = attributes.len(),
        defaulted = defaulted.len(),
        errors = errors.len(),
        has_geometry = geometry.is_some(),
        "Composed record"
    );

    Composition {
        attributes,
        geometry,
        errors,
        defaulted,
    }
}

/// Parse a coordinate attribute. Blank is `None` without error; anything
/// present that is not a finite number is a validation error.
fn parse_coordinate(
    attributes: &AttributeMap,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<f64> {
    let text = attributes.get(field).map(display_text).unwrap_or_default();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            errors.push(ValidationError::Coordinate {
                field: field.to_string(),
                value: text,
            });
            None
        }
    }
}

/// Replace empty-string values with null; the store treats them differently.
pub(crate) fn nullify_empty(attributes: &mut AttributeMap) {
    for value in attributes.values_mut() {
        if matches!(value, Value::String(s) if s.is_empty()) {
            *value = Value::Null;
        }
    }
}

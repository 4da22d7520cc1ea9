use super::fields::FieldSets;
use super::types::{FieldKind, SchemaField};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of classifying a remote field list.
///
/// `other`, `service_flags` and `excluded` partition the distinct input
/// names; each list keeps the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub other: Vec<String>,
    pub service_flags: Vec<String>,
    pub excluded: Vec<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.other.is_empty() && self.service_flags.is_empty() && self.excluded.is_empty()
    }

    /// Editable fields (other + service flags) in input order of each bucket.
    pub fn editable(&self) -> impl Iterator<Item = &String> {
        self.other.iter().chain(self.service_flags.iter())
    }
}

/// Classify a single field name.
pub fn classify_field(name: &str, sets: &FieldSets) -> FieldKind {
    if sets.is_system(name) {
        FieldKind::System
    } else if sets.is_custom(name) {
        FieldKind::Custom
    } else if sets.is_service_flag(name) {
        FieldKind::ServiceFlag
    } else {
        FieldKind::Other
    }
}

/// Partition remote field names into other fields, service flags and
/// excluded (system or custom) fields. Repeated names are counted once.
pub fn classify_fields<S: AsRef<str>>(names: &[S], sets: &FieldSets) -> Classification {
    let mut seen = HashSet::with_capacity(names.len());
    let mut out = Classification::default();

    for name in names {
        let name = name.as_ref();
        if !seen.insert(name) {
            continue;
        }
        match classify_field(name, sets) {
            FieldKind::System | FieldKind::Custom => out.excluded.push(name.to_string()),
            FieldKind::ServiceFlag => out.service_flags.push(name.to_string()),
            FieldKind::Other => out.other.push(name.to_string()),
        }
    }

    out
}

/// Classify every field, keeping the kind alongside the name.
pub fn schema_fields<S: AsRef<str>>(names: &[S], sets: &FieldSets) -> Vec<SchemaField> {
    names
        .iter()
        .map(|n| SchemaField {
            name: n.as_ref().to_string(),
            kind: classify_field(n.as_ref(), sets),
        })
        .collect()
}

/// Other fields that appeared or disappeared between two schema snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaDrift {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SchemaDrift {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn detect_drift(previous: &Classification, current: &Classification) -> SchemaDrift {
    let before: HashSet<&str> = previous.other.iter().map(String::as_str).collect();
    let after: HashSet<&str> = current.other.iter().map(String::as_str).collect();

    SchemaDrift {
        added: current
            .other
            .iter()
            .filter(|n| !before.contains(n.as_str()))
            .cloned()
            .collect(),
        removed: previous
            .other
            .iter()
            .filter(|n| !after.contains(n.as_str()))
            .cloned()
            .collect(),
    }
}

use serde::{Deserialize, Serialize};

/// Layer description returned by the feature store's describe operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<LayerField>,
}

impl LayerDescription {
    /// Field names in the order the layer declares them.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

/// A field definition in the remote layer schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerField {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl LayerField {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            alias: None,
            editable: None,
            nullable: None,
        }
    }
}

/// How a schema field is treated during composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    System,
    Custom,
    ServiceFlag,
    Other,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Custom => write!(f, "custom"),
            Self::ServiceFlag => write!(f, "service_flag"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A schema field with its derived classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_layer_description() {
        let payload = json!({
            "name": "Service Centers",
            "geometryType": "esriGeometryPoint",
            "fields": [
                { "name": "OBJECTID", "type": "esriFieldTypeOID", "alias": "OBJECTID", "editable": false },
                { "name": "Agency_Name", "type": "esriFieldTypeString", "nullable": true },
                { "name": "Transportation", "type": "esriFieldTypeSmallInteger" }
            ]
        });

        let layer: LayerDescription = serde_json::from_value(payload).unwrap();
        assert_eq!(layer.name.as_deref(), Some("Service Centers"));
        assert_eq!(
            layer.field_names(),
            vec!["OBJECTID", "Agency_Name", "Transportation"]
        );
        assert_eq!(layer.fields[0].editable, Some(false));
        assert_eq!(
            layer.fields[1].field_type.as_deref(),
            Some("esriFieldTypeString")
        );
    }

    #[test]
    fn test_missing_fields_is_empty_layer() {
        let layer: LayerDescription = serde_json::from_value(json!({})).unwrap();
        assert!(layer.fields.is_empty());
    }
}

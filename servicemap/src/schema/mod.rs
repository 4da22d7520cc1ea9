pub mod catalog;
pub mod classifier;
pub mod fields;
pub mod types;

pub use catalog::SchemaCatalog;
pub use classifier::{
    classify_field, classify_fields, detect_drift, schema_fields, Classification, SchemaDrift,
};
pub use fields::FieldSets;
pub use types::{FieldKind, LayerDescription, LayerField, SchemaField};

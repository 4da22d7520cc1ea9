pub mod cache;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod metrics;
pub mod record;
pub mod schema;
pub mod search;
pub mod store;
pub mod submission;

pub use config::Config;
pub use dictionary::{load_keyword_dictionary, DictionaryRow, KeywordDictionary};
pub use error::{Error, Result, ValidationError};
pub use record::{compose_record, normalize_phone, AttributeMap, Composition, Feature, PendingGeocode};
pub use schema::{classify_fields, Classification, FieldSets};
pub use search::synthesize_search_terms;
pub use submission::SubmissionService;

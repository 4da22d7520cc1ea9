use crate::dictionary::KeywordDictionary;
use crate::record::{display_text, flag_is_on, AttributeMap};
use crate::schema::fields::{FieldSets, ADDRESS_FIELD, AGENCY_NAME_FIELD, SEARCH_TERMS_FIELD};
use serde_json::Value;
use std::collections::HashSet;

/// Fields always copied into the search string ahead of service phrases
pub const DESCRIPTIVE_FIELDS: &[&str] = &[AGENCY_NAME_FIELD, ADDRESS_FIELD];

const SEPARATOR: &str = ", ";

/// Ordered, deduplicated search tokens for a record.
///
/// Descriptive fields come first, then the phrases of every "on" service
/// flag, walking flags in canonical order. A flag absent from the record
/// or from the dictionary contributes nothing.
pub fn search_tokens(
    attributes: &AttributeMap,
    dictionary: &KeywordDictionary,
    sets: &FieldSets,
) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for field in DESCRIPTIVE_FIELDS {
        if let Some(value) = attributes.get(*field) {
            let text = display_text(value);
            if !text.is_empty() {
                tokens.push(text);
            }
        }
    }

    for flag in sets.service_flags() {
        let on = attributes.get(flag.as_str()).is_some_and(flag_is_on);
        if on {
            tokens.extend(dictionary.phrases(flag).iter().cloned());
        }
    }

    let mut seen = HashSet::with_capacity(tokens.len());
    tokens.retain(|t| seen.insert(t.clone()));
    tokens
}

/// Comma-joined search string. Commas inside tokens are not escaped.
pub fn synthesize_search_terms(
    attributes: &AttributeMap,
    dictionary: &KeywordDictionary,
    sets: &FieldSets,
) -> String {
    search_tokens(attributes, dictionary, sets).join(SEPARATOR)
}

/// Recompute `Search_Terms` in place, replacing any previous value. An empty
/// result is stored as null.
pub fn apply_search_terms(
    attributes: &mut AttributeMap,
    dictionary: &KeywordDictionary,
    sets: &FieldSets,
) {
    let tokens = search_tokens(attributes, dictionary, sets);
    crate::metrics::record_search_terms(tokens.len());

    let value = if tokens.is_empty() {
        Value::Null
    } else {
        Value::String(tokens.join(SEPARATOR))
    };
    attributes.insert(SEARCH_TERMS_FIELD.to_string(), value);
}

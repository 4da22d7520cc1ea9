use thiserror::Error;

/// A problem with user-supplied field values. Any of these blocks submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid phone number '{raw}'. Enter 10 digits.")]
    Phone { raw: String },

    #[error("Invalid {field} '{value}': not a number")]
    Coordinate { field: String, value: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Feature store, geocoder or dictionary source failure.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Field is read-only: {0}")]
    ReadOnly(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_all_errors() {
        let err = Error::Validation(vec![
            ValidationError::Phone {
                raw: "555-12".to_string(),
            },
            ValidationError::Coordinate {
                field: "Latitude".to_string(),
                value: "north".to_string(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("555-12"));
        assert!(msg.contains("Latitude 'north'"));
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_non_validation_error_has_no_validation_errors() {
        let err = Error::Collaborator("timeout".to_string());
        assert!(err.validation_errors().is_empty());
    }
}

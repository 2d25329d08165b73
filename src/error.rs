//! Error types for Skilldesk

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type alias using Skilldesk's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Skilldesk
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input rejected before any request was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Catalog service call failed
    #[error("Remote error: {0}")]
    Remote(RemoteError),

    /// Loading the skill list failed
    #[error("Fetch error: {0}")]
    Fetch(RemoteError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Check if error is a client error (user's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidInput(_))
    }

    /// Check if error came from the catalog service or the transport
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_) | Error::Fetch(_))
    }

    /// Field messages, when this is a validation error
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Details of the failed remote call, for remote and fetch errors
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Error::Remote(err) | Error::Fetch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        match err.operation {
            Operation::ListSkills => Error::Fetch(err),
            _ => Error::Remote(err),
        }
    }
}

/// Catalog service operations, used to label remote failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListSkills,
    CreateSkill,
    UpdateSkill,
    DeleteSkill,
    UploadPhoto,
    Login,
    Register,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListSkills => "list_skills",
            Operation::CreateSkill => "create_skill",
            Operation::UpdateSkill => "update_skill",
            Operation::DeleteSkill => "delete_skill",
            Operation::UploadPhoto => "upload_photo",
            Operation::Login => "login",
            Operation::Register => "register",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call against the catalog service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe_remote(.operation, .status, .message))]
pub struct RemoteError {
    /// Operation that failed
    pub operation: Operation,
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    /// Message returned by the service or the transport
    pub message: String,
}

impl RemoteError {
    /// The request never produced a response
    pub fn transport(operation: Operation, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };

        RemoteError {
            operation,
            status: None,
            message,
        }
    }

    /// The service answered with a non-success status
    pub fn status(operation: Operation, status: u16, body: impl Into<String>) -> Self {
        RemoteError {
            operation,
            status: Some(status),
            message: body.into(),
        }
    }

    /// The response arrived but could not be decoded
    pub fn decode(operation: Operation, err: impl fmt::Display) -> Self {
        RemoteError {
            operation,
            status: None,
            message: format!("invalid response body: {}", err),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

fn describe_remote(operation: &Operation, status: &Option<u16>, message: &str) -> String {
    match *status {
        Some(status) if message.is_empty() => format!("{} failed with status {}", operation, status),
        Some(status) => format!("{} failed with status {}: {}", operation, status, message),
        None => format!("{} failed: {}", operation, message),
    }
}

/// Per-field validation messages, keyed by the service's field name
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", join_fields(.fields))]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join_fields(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_failures_become_fetch_errors() {
        let err: Error = RemoteError::status(Operation::ListSkills, 500, "boom").into();
        assert!(matches!(err, Error::Fetch(_)));

        let err: Error = RemoteError::status(Operation::DeleteSkill, 500, "boom").into();
        assert!(matches!(err, Error::Remote(_)));
        assert!(err.is_remote());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::status(Operation::UpdateSkill, 404, "not found");
        assert_eq!(err.to_string(), "update_skill failed with status 404: not found");

        let err = RemoteError::status(Operation::DeleteSkill, 500, "");
        assert_eq!(err.to_string(), "delete_skill failed with status 500");
    }

    #[test]
    fn test_validation_errors() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("nivel", "level is required");
        errors.add("nome", "name is required");
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("nivel"));
        assert_eq!(errors.to_string(), "nivel: level is required; nome: name is required");

        let err: Error = errors.into_result().unwrap_err().into();
        assert!(err.is_client_error());
        assert!(err.validation().unwrap().contains("nome"));
    }
}

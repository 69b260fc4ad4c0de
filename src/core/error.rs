//! Typed error handling for the toy catalog
//!
//! Callers (the presentation layer) need to tell a missing toy apart from a
//! broken backend, so every fallible catalog operation returns
//! [`CatalogError`] rather than an opaque `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`CatalogError::NotFound`]: the operation targets an id the store does not know
//! - [`TransportError`]: network or storage failure (retryable by the user)
//! - [`ValidationError`]: form-boundary validation failures
//! - [`ConfigError`]: invalid configuration values
//!
//! # Example
//!
//! ```rust,ignore
//! match engine.delete_toy(&id).await {
//!     Ok(_) => {}
//!     Err(CatalogError::NotFound { id, .. }) => println!("toy {} is already gone", id),
//!     Err(e) if e.is_retryable() => println!("try again later: {}", e),
//!     Err(e) => eprintln!("unexpected: {}", e),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The main error type for catalog operations
#[derive(Debug)]
pub enum CatalogError {
    /// No entity has the requested id
    NotFound { entity_type: String, id: String },

    /// Network or storage failure
    Transport(TransportError),

    /// Input rejected at the form boundary
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),
}

/// Coarse classification of a [`CatalogError`], stable across variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    NotFound,
    Transport,
    Validation,
    Config,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            CatalogError::Transport(e) => write!(f, "{}", e),
            CatalogError::Validation(e) => write!(f, "{}", e),
            CatalogError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Transport(e) => Some(e),
            CatalogError::Validation(e) => Some(e),
            CatalogError::Config(e) => Some(e),
            CatalogError::NotFound { .. } => None,
        }
    }
}

impl CatalogError {
    /// Shorthand for a missing toy
    pub fn toy_not_found(id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            entity_type: "toy".to_string(),
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Transport(_) => ErrorKind::Transport,
            CatalogError::Validation(_) => ErrorKind::Validation,
            CatalogError::Config(_) => ErrorKind::Config,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "TOY_NOT_FOUND",
            CatalogError::Transport(e) => e.error_code(),
            CatalogError::Validation(_) => "VALIDATION_ERROR",
            CatalogError::Config(_) => "CONFIG_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// Whether the user may simply try the same operation again.
    ///
    /// Nothing in this crate retries on its own; this only drives the
    /// wording of the notification shown to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Transport(_))
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Network or storage failure reported by a persistence adapter
#[derive(Debug, Clone)]
pub struct TransportError {
    /// Adapter that failed (e.g. "http", "local")
    pub backend: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn error_code(&self) -> &'static str {
        match self.status {
            Some(_) => "BACKEND_ERROR_RESPONSE",
            None => "TRANSPORT_ERROR",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "{} backend responded with status {}: {}",
                self.backend, status, self.message
            ),
            None => write!(f, "{} backend failure: {}", self.backend, self.message),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for CatalogError {
    fn from(err: TransportError) -> Self {
        CatalogError::Transport(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    InvalidJson { message: String },

    /// Missing required argument
    MissingArgument { argument: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::MissingArgument { argument } => {
                write!(f, "Missing required argument: {}", argument)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Field names that failed, in report order
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
            ValidationError::MissingArgument { argument } => vec![argument.as_str()],
            ValidationError::InvalidJson { .. } => Vec::new(),
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for CatalogError {
    fn from(err: ConfigError) -> Self {
        CatalogError::Config(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

//! # Command Error Handling
//!
//! User-facing error extraction for acuictl and acuicola-seed, built on the handled
//! crate so every error type renders as a message plus an optional hint.

use handled::Handle;

use crate::http_utils::HttpError;
use crate::validate::ValidationError;

/// User-friendly error information that can be extracted from various error types
#[derive(Debug, Clone)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Handle<UserError> for UserError {
    fn handle(&self) -> Option<UserError> {
        Some(self.clone())
    }
}

/// Invalid command-line argument
#[derive(Debug)]
pub struct ArgumentError {
    /// The argument name that failed to parse
    pub field: String,
    /// The value that was supplied
    pub value: String,
    /// The reason why parsing failed
    pub reason: String,
}

impl std::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid {}: '{}' - {}",
            self.field, self.value, self.reason
        )
    }
}

impl std::error::Error for ArgumentError {}

impl Handle<UserError> for ArgumentError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: Some("Identifiers are non-negative integers".to_string()),
        })
    }
}

impl Handle<UserError> for HttpError {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self.status() {
            400 => Some("Invalid request. Check your input data and try again.".to_string()),
            404 => Some(
                "The requested resource was not found. Check the ID and try again.".to_string(),
            ),
            500..=599 => {
                Some("Server error. The service may be temporarily unavailable.".to_string())
            }
            _ => None,
        };
        Some(UserError {
            message: self.to_string(),
            usage_hint,
        })
    }
}

impl Handle<UserError> for ValidationError {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self {
            ValidationError::MissingRequiredProperty { .. } => Some(
                "A species parameter needs id_especie, id_parametro, Rmin and Rmax".to_string(),
            ),
            ValidationError::InvalidRange { .. } => {
                Some("Rmin must be less than or equal to Rmax".to_string())
            }
            ValidationError::EnumMismatch { .. } => {
                Some("estado must be 'activo' or 'inactivo'".to_string())
            }
            _ => None,
        };
        Some(UserError {
            message: format!("Validation failed: {}", self),
            usage_hint,
        })
    }
}

impl Handle<UserError> for serde_json::Error {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: format!("JSON parsing error: {}", self),
            usage_hint: Some(
                "Ensure the JSON is properly formatted and contains all required fields"
                    .to_string(),
            ),
        })
    }
}

impl Handle<UserError> for std::io::Error {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self.kind() {
            std::io::ErrorKind::NotFound => {
                Some("The specified file was not found. Check the file path.".to_string())
            }
            std::io::ErrorKind::PermissionDenied => {
                Some("Permission denied. Check file permissions.".to_string())
            }
            _ => None,
        };
        Some(UserError {
            message: format!("File operation error: {}", self),
            usage_hint,
        })
    }
}

/// Enhanced error formatting for CLI output
pub fn format_cli_error<E>(error: &E) -> String
where
    E: Handle<UserError> + std::fmt::Display,
{
    if let Some(user_error) = error.handle() {
        let mut output = format!("Error: {}", user_error.message);
        if let Some(hint) = user_error.usage_hint {
            output.push_str(&format!("\nHint: {}", hint));
        }
        output
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_gets_hint() {
        let error = ValidationError::MissingRequiredProperty {
            property: "Rmin".to_string(),
        };
        let rendered = format_cli_error(&error);
        assert!(rendered.starts_with("Error: Validation failed: Missing required property: Rmin"));
        assert!(rendered.contains("\nHint: "));
    }

    #[test]
    fn argument_error_message() {
        let error = ArgumentError {
            field: "id_especie_parametro".to_string(),
            value: "abc".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            format_cli_error(&error),
            "Error: Invalid id_especie_parametro: 'abc' - invalid digit found in string\nHint: Identifiers are non-negative integers"
        );
    }

    #[test]
    fn load_error_renders_through_handle() {
        let error = crate::loader::LoadError::Network("connection refused".to_string());
        let rendered = format_cli_error(&error);
        assert!(rendered.starts_with("Error: network error: connection refused"));
    }
}

//! # JSON Schema Validation
//!
//! Validates JSON payloads against the subset of JSON Schema that acuicola's request
//! schemas use:
//!
//! - `type`: null, boolean, integer, number, string, array, object
//! - `enum` on strings, `format: "date-time"` on strings
//! - `minimum` on numbers and integers
//! - `properties`, `required` and `additionalProperties: false` on objects
//! - `items` on arrays, `oneOf` unions
//!
//! ```rust
//! use acuicola::validate_value;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "Rmin": {"type": "number"},
//!         "Rmax": {"type": "number"}
//!     },
//!     "required": ["Rmin", "Rmax"]
//! });
//!
//! assert!(validate_value(&json!({"Rmin": 1.0, "Rmax": 2.0}), &schema).is_ok());
//! assert!(validate_value(&json!({"Rmin": 1.0}), &schema).is_err());
//! ```

use chrono::DateTime;
use serde_json::{Map, Value};

pub(crate) const TYPE_KEY: &str = "type";
pub(crate) const PROPERTIES_KEY: &str = "properties";
pub(crate) const REQUIRED_KEY: &str = "required";
pub(crate) const ADDITIONAL_PROPERTIES_KEY: &str = "additionalProperties";
pub(crate) const ITEMS_KEY: &str = "items";
pub(crate) const ENUM_KEY: &str = "enum";
pub(crate) const FORMAT_KEY: &str = "format";
pub(crate) const MINIMUM_KEY: &str = "minimum";
pub(crate) const ONE_OF_KEY: &str = "oneOf";

pub(crate) const TYPE_NULL: &str = "null";
pub(crate) const TYPE_BOOLEAN: &str = "boolean";
pub(crate) const TYPE_INTEGER: &str = "integer";
pub(crate) const TYPE_NUMBER: &str = "number";
pub(crate) const TYPE_STRING: &str = "string";
pub(crate) const TYPE_ARRAY: &str = "array";
pub(crate) const TYPE_OBJECT: &str = "object";

pub(crate) const FORMAT_DATE_TIME: &str = "date-time";

/// Errors that can occur during JSON schema validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The JSON schema itself is invalid or malformed
    InvalidSchema(String),
    /// The value type doesn't match what the schema expects
    TypeMismatch {
        /// The type that was expected by the schema
        expected: String,
        /// The actual type of the value being validated
        actual: String,
    },
    /// A required object property is missing
    MissingRequiredProperty {
        /// The name of the missing required property
        property: String,
    },
    /// An object carries a property the schema does not declare
    UnknownProperty {
        /// The name of the undeclared property
        property: String,
    },
    /// The value doesn't match any of the allowed enum values
    EnumMismatch {
        /// The actual value that was provided
        value: String,
        /// The list of values that would have been valid
        allowed_values: Vec<String>,
    },
    /// A string doesn't match its declared format
    FormatMismatch {
        /// The declared format
        format: String,
        /// The offending string
        value: String,
    },
    /// A number is below the schema's minimum
    BelowMinimum {
        /// The declared minimum
        minimum: f64,
        /// The offending number
        value: f64,
    },
    /// The payload is well-typed but its bounds are inverted
    InvalidRange {
        /// The supplied lower bound
        r_min: f64,
        /// The supplied upper bound
        r_max: f64,
    },
    /// An array item failed validation
    ArrayItemError {
        /// The index of the array item that failed
        index: usize,
        /// The underlying validation error for the item
        source: Box<ValidationError>,
    },
    /// An object property failed validation
    ObjectPropertyError {
        /// The name of the property that failed
        property: String,
        /// The underlying validation error for the property
        source: Box<ValidationError>,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidSchema(msg) => write!(f, "Invalid schema: {}", msg),
            ValidationError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, actual)
            }
            ValidationError::MissingRequiredProperty { property } => {
                write!(f, "Missing required property: {}", property)
            }
            ValidationError::UnknownProperty { property } => {
                write!(f, "Unknown property: {}", property)
            }
            ValidationError::EnumMismatch {
                value,
                allowed_values,
            } => {
                write!(
                    f,
                    "Enum mismatch: '{}' is not one of {:?}",
                    value, allowed_values
                )
            }
            ValidationError::FormatMismatch { format, value } => {
                write!(f, "Format mismatch: '{}' is not a valid {}", value, format)
            }
            ValidationError::BelowMinimum { minimum, value } => {
                write!(f, "Value {} is below the minimum {}", value, minimum)
            }
            ValidationError::InvalidRange { r_min, r_max } => {
                write!(
                    f,
                    "Invalid range: Rmin ({}) must be less than or equal to Rmax ({})",
                    r_min, r_max
                )
            }
            ValidationError::ArrayItemError { index, source } => {
                write!(f, "Array item error at index {}: {}", index, source)
            }
            ValidationError::ObjectPropertyError { property, source } => {
                write!(f, "Object property error at '{}': {}", property, source)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Returns the JSON Schema type name of a value.
pub(crate) fn get_value_type(value: &Value) -> String {
    match value {
        Value::Null => TYPE_NULL,
        Value::Bool(_) => TYPE_BOOLEAN,
        Value::Number(n) if n.is_i64() || n.is_u64() => TYPE_INTEGER,
        Value::Number(_) => TYPE_NUMBER,
        Value::String(_) => TYPE_STRING,
        Value::Array(_) => TYPE_ARRAY,
        Value::Object(_) => TYPE_OBJECT,
    }
    .to_string()
}

/// Validates a JSON value against a JSON schema.
///
/// # Arguments
/// * `value` - The JSON value to validate
/// * `schema` - The JSON schema to validate against
///
/// # Returns
/// * `Ok(())` - The value is valid according to the schema
/// * `Err(ValidationError)` - The first violation found
pub fn validate_value(value: &Value, schema: &Value) -> Result<(), ValidationError> {
    let schema_obj = schema
        .as_object()
        .ok_or_else(|| ValidationError::InvalidSchema("Schema must be an object".to_string()))?;

    if let Some(one_of_schemas) = schema_obj.get(ONE_OF_KEY) {
        return validate_one_of(value, one_of_schemas);
    }

    let schema_type = schema_obj
        .get(TYPE_KEY)
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            ValidationError::InvalidSchema("Schema must have a type field".to_string())
        })?;

    match schema_type {
        TYPE_NULL => expect_type(value, TYPE_NULL, Value::is_null),
        TYPE_BOOLEAN => expect_type(value, TYPE_BOOLEAN, Value::is_boolean),
        TYPE_INTEGER => {
            expect_type(value, TYPE_INTEGER, |v| v.is_i64() || v.is_u64())?;
            validate_minimum(value, schema_obj)
        }
        TYPE_NUMBER => {
            expect_type(value, TYPE_NUMBER, Value::is_number)?;
            validate_minimum(value, schema_obj)
        }
        TYPE_STRING => validate_string(value, schema_obj),
        TYPE_ARRAY => validate_array(value, schema_obj),
        TYPE_OBJECT => validate_object(value, schema_obj),
        _ => Err(ValidationError::InvalidSchema(format!(
            "Unknown schema type: {}",
            schema_type
        ))),
    }
}

fn expect_type(
    value: &Value,
    expected: &str,
    matches: impl Fn(&Value) -> bool,
) -> Result<(), ValidationError> {
    if matches(value) {
        Ok(())
    } else {
        Err(ValidationError::TypeMismatch {
            expected: expected.to_string(),
            actual: get_value_type(value),
        })
    }
}

fn validate_one_of(value: &Value, one_of_schemas: &Value) -> Result<(), ValidationError> {
    let schemas_array = one_of_schemas
        .as_array()
        .ok_or_else(|| ValidationError::InvalidSchema("oneOf must be an array".to_string()))?;

    let mut validation_errors = Vec::new();
    for schema in schemas_array {
        match validate_value(value, schema) {
            Ok(()) => return Ok(()),
            Err(e) => validation_errors.push(e),
        }
    }

    Err(ValidationError::InvalidSchema(format!(
        "Value doesn't match any oneOf schemas. Errors: {:?}",
        validation_errors
    )))
}

fn validate_minimum(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let Some(minimum) = schema.get(MINIMUM_KEY) else {
        return Ok(());
    };
    let minimum = minimum
        .as_f64()
        .ok_or_else(|| ValidationError::InvalidSchema("minimum must be a number".to_string()))?;
    match value.as_f64() {
        Some(n) if n < minimum => Err(ValidationError::BelowMinimum { minimum, value: n }),
        _ => Ok(()),
    }
}

fn validate_string(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let Value::String(string_value) = value else {
        return Err(ValidationError::TypeMismatch {
            expected: TYPE_STRING.to_string(),
            actual: get_value_type(value),
        });
    };

    if let Some(enum_values) = schema.get(ENUM_KEY) {
        validate_enum(string_value, enum_values)?;
    }

    match schema.get(FORMAT_KEY).and_then(Value::as_str) {
        Some(FORMAT_DATE_TIME) if DateTime::parse_from_rfc3339(string_value).is_err() => {
            Err(ValidationError::FormatMismatch {
                format: FORMAT_DATE_TIME.to_string(),
                value: string_value.clone(),
            })
        }
        _ => Ok(()),
    }
}

fn validate_enum(value: &str, enum_values: &Value) -> Result<(), ValidationError> {
    let enum_array = enum_values
        .as_array()
        .ok_or_else(|| ValidationError::InvalidSchema("Enum must be an array".to_string()))?;

    if enum_array.iter().any(|v| v.as_str() == Some(value)) {
        Ok(())
    } else {
        Err(ValidationError::EnumMismatch {
            value: value.to_string(),
            allowed_values: enum_array
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
        })
    }
}

fn validate_array(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let Value::Array(array) = value else {
        return Err(ValidationError::TypeMismatch {
            expected: TYPE_ARRAY.to_string(),
            actual: get_value_type(value),
        });
    };

    if let Some(items_schema) = schema.get(ITEMS_KEY) {
        for (index, item) in array.iter().enumerate() {
            validate_value(item, items_schema).map_err(|e| ValidationError::ArrayItemError {
                index,
                source: Box::new(e),
            })?;
        }
    }

    Ok(())
}

fn validate_object(value: &Value, schema: &Map<String, Value>) -> Result<(), ValidationError> {
    let Value::Object(object) = value else {
        return Err(ValidationError::TypeMismatch {
            expected: TYPE_OBJECT.to_string(),
            actual: get_value_type(value),
        });
    };

    let properties = match schema.get(PROPERTIES_KEY) {
        Some(properties) => Some(properties.as_object().ok_or_else(|| {
            ValidationError::InvalidSchema("Properties must be an object".to_string())
        })?),
        None => None,
    };

    if let Some(properties) = properties {
        for (prop_name, prop_schema) in properties {
            if let Some(prop_value) = object.get(prop_name) {
                validate_value(prop_value, prop_schema).map_err(|e| {
                    ValidationError::ObjectPropertyError {
                        property: prop_name.clone(),
                        source: Box::new(e),
                    }
                })?;
            }
        }
    }

    if let Some(required) = schema.get(REQUIRED_KEY) {
        let required_array = required.as_array().ok_or_else(|| {
            ValidationError::InvalidSchema("Required must be an array".to_string())
        })?;

        for required_prop in required_array {
            let prop_name = required_prop.as_str().ok_or_else(|| {
                ValidationError::InvalidSchema(
                    "Required property names must be strings".to_string(),
                )
            })?;

            if !object.contains_key(prop_name) {
                return Err(ValidationError::MissingRequiredProperty {
                    property: prop_name.to_string(),
                });
            }
        }
    }

    if schema.get(ADDITIONAL_PROPERTIES_KEY) == Some(&Value::Bool(false)) {
        for prop_name in object.keys() {
            if !properties.is_some_and(|p| p.contains_key(prop_name)) {
                return Err(ValidationError::UnknownProperty {
                    property: prop_name.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitive_types() {
        assert!(validate_value(&json!(null), &json!({"type": "null"})).is_ok());
        assert!(validate_value(&json!(true), &json!({"type": "boolean"})).is_ok());
        assert!(validate_value(&json!(3), &json!({"type": "integer"})).is_ok());
        assert!(validate_value(&json!(3), &json!({"type": "number"})).is_ok());
        assert!(validate_value(&json!(3.5), &json!({"type": "number"})).is_ok());
        assert!(validate_value(&json!("x"), &json!({"type": "string"})).is_ok());
    }

    #[test]
    fn integer_rejects_fraction() {
        let result = validate_value(&json!(2.5), &json!({"type": "integer"}));
        assert_eq!(
            result,
            Err(ValidationError::TypeMismatch {
                expected: "integer".to_string(),
                actual: "number".to_string(),
            })
        );
    }

    #[test]
    fn number_rejects_numeric_string() {
        let result = validate_value(&json!("2.5"), &json!({"type": "number"}));
        assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
    }

    #[test]
    fn minimum_is_inclusive() {
        let schema = json!({"type": "integer", "minimum": 1});
        assert!(validate_value(&json!(1), &schema).is_ok());
        assert_eq!(
            validate_value(&json!(0), &schema),
            Err(ValidationError::BelowMinimum {
                minimum: 1.0,
                value: 0.0
            })
        );
    }

    #[test]
    fn string_enum() {
        let schema = json!({"type": "string", "enum": ["activo", "inactivo"]});
        assert!(validate_value(&json!("activo"), &schema).is_ok());
        match validate_value(&json!("borrado"), &schema) {
            Err(ValidationError::EnumMismatch {
                value,
                allowed_values,
            }) => {
                assert_eq!(value, "borrado");
                assert_eq!(allowed_values, vec!["activo", "inactivo"]);
            }
            other => panic!("expected EnumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn date_time_format() {
        let schema = json!({"type": "string", "format": "date-time"});
        assert!(validate_value(&json!("2024-03-01T12:00:00Z"), &schema).is_ok());
        assert!(matches!(
            validate_value(&json!("ayer"), &schema),
            Err(ValidationError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn object_required_and_property_errors() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "count": {"type": "integer"}
            },
            "required": ["name"]
        });

        assert!(validate_value(&json!({"name": "a"}), &schema).is_ok());
        assert_eq!(
            validate_value(&json!({"count": 1}), &schema),
            Err(ValidationError::MissingRequiredProperty {
                property: "name".to_string()
            })
        );
        match validate_value(&json!({"name": "a", "count": "x"}), &schema) {
            Err(ValidationError::ObjectPropertyError { property, source }) => {
                assert_eq!(property, "count");
                assert!(matches!(*source, ValidationError::TypeMismatch { .. }));
            }
            other => panic!("expected ObjectPropertyError, got {:?}", other),
        }
    }

    #[test]
    fn additional_properties_false_rejects_unknown() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}},
            "additionalProperties": false
        });
        assert!(validate_value(&json!({"a": 1}), &schema).is_ok());
        assert_eq!(
            validate_value(&json!({"a": 1, "b": 2}), &schema),
            Err(ValidationError::UnknownProperty {
                property: "b".to_string()
            })
        );
    }

    #[test]
    fn open_objects_accept_unknown() {
        let schema = json!({"type": "object"});
        assert!(validate_value(&json!({"extra": "field"}), &schema).is_ok());
    }

    #[test]
    fn array_item_error_context() {
        let schema = json!({"type": "array", "items": {"type": "integer"}});
        match validate_value(&json!([1, "invalid", 3]), &schema) {
            Err(ValidationError::ArrayItemError { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, ValidationError::TypeMismatch { .. }));
            }
            other => panic!("expected ArrayItemError, got {:?}", other),
        }
    }

    #[test]
    fn one_of() {
        let schema = json!({"oneOf": [{"type": "string"}, {"type": "number"}]});
        assert!(validate_value(&json!("hello"), &schema).is_ok());
        assert!(validate_value(&json!(42), &schema).is_ok());
        assert!(matches!(
            validate_value(&json!(true), &schema),
            Err(ValidationError::InvalidSchema(_))
        ));
    }

    #[test]
    fn malformed_schemas() {
        assert!(matches!(
            validate_value(&json!(42), &json!("not an object")),
            Err(ValidationError::InvalidSchema(_))
        ));
        assert!(matches!(
            validate_value(&json!(42), &json!({"properties": {}})),
            Err(ValidationError::InvalidSchema(_))
        ));
        assert!(matches!(
            validate_value(&json!(42), &json!({"type": "unknown"})),
            Err(ValidationError::InvalidSchema(_))
        ));
    }

    #[test]
    fn validation_error_display() {
        let error = ValidationError::TypeMismatch {
            expected: "string".to_string(),
            actual: "number".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Type mismatch: expected string, got number"
        );

        let error = ValidationError::MissingRequiredProperty {
            property: "Rmin".to_string(),
        };
        assert_eq!(error.to_string(), "Missing required property: Rmin");
    }
}

//! # Request Schemas
//!
//! Shared request/response schemas for the species-parameter resource. Every payload that
//! enters the API passes through [`validate_create`] or [`validate_update`] before it is
//! deserialized, so that a malformed body is reported as a precise [`ValidationError`]
//! instead of a generic decode failure.
//!
//! Beyond the structural checks the schemas also enforce `Rmin <= Rmax`: always for a
//! creation payload, and for a patch when it carries both bounds. A patch that moves only
//! one bound is re-checked against the stored record when it is applied.
//!
//! ```rust
//! use acuicola::schemas::{validate_create, validate_update};
//! use serde_json::json;
//!
//! assert!(validate_create(&json!({"id_especie": 1, "id_parametro": 2, "Rmax": 8.5})).is_err());
//! assert!(validate_update(&json!({})).unwrap().is_noop());
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::especie_parametro::{EspecieParametroCreate, EspecieParametroUpdate, check_range};
use crate::validate::{ValidationError, validate_value};

fn id_schema() -> Value {
    json!({"type": "integer", "minimum": 0})
}

fn estado_schema() -> Value {
    json!({"type": "string", "enum": ["activo", "inactivo"]})
}

/// Schema of a stored [`EspecieParametro`](crate::EspecieParametro).
pub fn especie_parametro_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id_especie_parametro": id_schema(),
            "id_especie": id_schema(),
            "id_parametro": id_schema(),
            "Rmin": {"type": "number"},
            "Rmax": {"type": "number"},
            "fecha_creacion": {"type": "string", "format": "date-time"},
            "estado": estado_schema()
        },
        "required": ["id_especie_parametro", "id_especie", "id_parametro", "Rmin", "Rmax"],
        "additionalProperties": false
    })
}

/// Schema of an [`EspecieParametroCreate`] payload.
pub fn especie_parametro_create_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id_especie": id_schema(),
            "id_parametro": id_schema(),
            "Rmin": {"type": "number"},
            "Rmax": {"type": "number"}
        },
        "required": ["id_especie", "id_parametro", "Rmin", "Rmax"],
        "additionalProperties": false
    })
}

/// Schema of an [`EspecieParametroUpdate`] patch. Nothing is required.
pub fn especie_parametro_update_schema() -> Value {
    let mut schema = especie_parametro_schema();
    schema["required"] = json!([]);
    schema
}

/// Schema of the collection body served by `GET /api/especie-parametros`.
pub fn especie_parametro_list_schema() -> Value {
    json!({"type": "array", "items": especie_parametro_schema()})
}

/// Schema of the collection body served by `GET /api/instalaciones`.
pub fn instalacion_list_schema() -> Value {
    json!({"type": "array", "items": {"type": "object"}})
}

fn decode<T: DeserializeOwned>(payload: &Value) -> Result<T, ValidationError> {
    serde_json::from_value(payload.clone())
        .map_err(|e| ValidationError::InvalidSchema(format!("payload does not decode: {}", e)))
}

/// Validates and decodes a creation payload.
pub fn validate_create(payload: &Value) -> Result<EspecieParametroCreate, ValidationError> {
    validate_value(payload, &especie_parametro_create_schema())?;
    let create: EspecieParametroCreate = decode(payload)?;
    check_range(create.r_min, create.r_max).map_err(|e| ValidationError::InvalidRange {
        r_min: e.r_min,
        r_max: e.r_max,
    })?;
    Ok(create)
}

/// Validates and decodes a partial patch.
pub fn validate_update(payload: &Value) -> Result<EspecieParametroUpdate, ValidationError> {
    validate_value(payload, &especie_parametro_update_schema())?;
    let update: EspecieParametroUpdate = decode(payload)?;
    if let (Some(r_min), Some(r_max)) = (update.r_min, update.r_max) {
        check_range(r_min, r_max).map_err(|e| ValidationError::InvalidRange {
            r_min: e.r_min,
            r_max: e.r_max,
        })?;
    }
    Ok(update)
}

//! Facility records.
//!
//! An [`Instalacion`] is an open JSON object. The catalog interprets only
//! `id_instalacion`; every other field round-trips untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the store records a facility's identifier.
pub const ID_INSTALACION_KEY: &str = "id_instalacion";

/////////////////////////////////////////////// Instalacion ///////////////////////////////////////////////

/// A facility record.
///
/// The shape of a facility is owned by the API that serves it, so the record is kept as an
/// opaque JSON object. Only the identifier is interpreted, and only when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instalacion(Map<String, Value>);

impl Instalacion {
    /// Wraps a JSON object as a facility.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the numeric identifier, if the record carries one.
    pub fn id(&self) -> Option<u64> {
        self.0.get(ID_INSTALACION_KEY).and_then(Value::as_u64)
    }

    /// Overwrites the identifier.
    pub fn set_id(&mut self, id: u64) {
        self.0.insert(ID_INSTALACION_KEY.to_string(), Value::from(id));
    }

    /// Looks up one field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields, identifier included.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwraps the underlying JSON object.
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl TryFrom<Value> for Instalacion {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

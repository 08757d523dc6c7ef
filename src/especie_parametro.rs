//! # Species Parameter Bounds
//!
//! An [`EspecieParametro`] records the acceptable numeric range (`Rmin..=Rmax`) of one
//! monitored parameter (temperature, pH, dissolved oxygen, ...) for one species.
//!
//! Three shapes travel over the wire:
//!
//! - [`EspecieParametro`]: the stored record, identifiers and lifecycle included.
//! - [`EspecieParametroCreate`]: the creation payload; the server assigns the identifier,
//!   the creation timestamp and the initial `estado`.
//! - [`EspecieParametroUpdate`]: a partial patch; every field is optional and `{}` is a no-op.
//!
//! ```rust
//! use acuicola::{EspecieParametro, EspecieParametroCreate, EspecieParametroUpdate, Estado};
//!
//! let create = EspecieParametroCreate::new(1, 2, 24.0, 30.0);
//! let mut record = EspecieParametro::from_create(7, create, chrono::Utc::now());
//! assert_eq!(record.estado, Some(Estado::Activo));
//!
//! let patch = EspecieParametroUpdate {
//!     r_max: Some(31.5),
//!     ..Default::default()
//! };
//! record.apply(&patch).unwrap();
//! assert_eq!(record.r_max, 31.5);
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

////////////////////////////////////////////// Estado //////////////////////////////////////////////

/// Soft lifecycle flag shared by catalog records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    /// The record is in use.
    Activo,
    /// The record was soft-deleted.
    Inactivo,
}

impl Estado {
    /// Returns the wire name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Estado::Activo => "activo",
            Estado::Inactivo => "inactivo",
        }
    }
}

impl Display for Estado {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is neither `activo` nor `inactivo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstadoParseError(pub String);

impl Display for EstadoParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "invalid estado '{}': expected 'activo' or 'inactivo'",
            self.0
        )
    }
}

impl std::error::Error for EstadoParseError {}

impl FromStr for Estado {
    type Err = EstadoParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activo" => Ok(Estado::Activo),
            "inactivo" => Ok(Estado::Inactivo),
            _ => Err(EstadoParseError(s.to_string())),
        }
    }
}

/////////////////////////////////////////// Range checks ///////////////////////////////////////////

/// Error raised when a pair of bounds does not describe a range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeError {
    /// The lower bound that was supplied.
    pub r_min: f64,
    /// The upper bound that was supplied.
    pub r_max: f64,
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Rmin ({}) must be less than or equal to Rmax ({})",
            self.r_min, self.r_max
        )
    }
}

impl std::error::Error for RangeError {}

/// Checks that `r_min <= r_max` and that both bounds are finite.
pub fn check_range(r_min: f64, r_max: f64) -> Result<(), RangeError> {
    if r_min.is_finite() && r_max.is_finite() && r_min <= r_max {
        Ok(())
    } else {
        Err(RangeError { r_min, r_max })
    }
}

////////////////////////////////////////// EspecieParametro //////////////////////////////////////////

/// Acceptable range of one parameter for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EspecieParametro {
    /// Server-assigned identifier.
    pub id_especie_parametro: u64,
    /// Species reference.
    pub id_especie: u64,
    /// Parameter-type reference.
    pub id_parametro: u64,
    /// Lower acceptable bound.
    #[serde(rename = "Rmin")]
    pub r_min: f64,
    /// Upper acceptable bound.
    #[serde(rename = "Rmax")]
    pub r_max: f64,
    /// Creation timestamp, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    /// Lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<Estado>,
}

impl EspecieParametro {
    /// Builds the stored record for a creation payload.
    pub fn from_create(
        id_especie_parametro: u64,
        create: EspecieParametroCreate,
        fecha_creacion: DateTime<Utc>,
    ) -> Self {
        Self {
            id_especie_parametro,
            id_especie: create.id_especie,
            id_parametro: create.id_parametro,
            r_min: create.r_min,
            r_max: create.r_max,
            fecha_creacion: Some(fecha_creacion),
            estado: Some(Estado::Activo),
        }
    }

    /// Whether this record is active. A record without `estado` counts as active.
    pub fn is_active(&self) -> bool {
        self.estado != Some(Estado::Inactivo)
    }

    /// Whether `value` lies within `Rmin..=Rmax`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.r_min && value <= self.r_max
    }

    /// Merges a partial patch into this record.
    ///
    /// `id_especie_parametro` and `fecha_creacion` are server-assigned and ignored when
    /// present in the patch. The merged range is checked before anything is written, so a
    /// rejected patch leaves the record untouched.
    pub fn apply(&mut self, patch: &EspecieParametroUpdate) -> Result<(), RangeError> {
        let r_min = patch.r_min.unwrap_or(self.r_min);
        let r_max = patch.r_max.unwrap_or(self.r_max);
        check_range(r_min, r_max)?;

        if let Some(id_especie) = patch.id_especie {
            self.id_especie = id_especie;
        }
        if let Some(id_parametro) = patch.id_parametro {
            self.id_parametro = id_parametro;
        }
        self.r_min = r_min;
        self.r_max = r_max;
        if let Some(estado) = patch.estado {
            self.estado = Some(estado);
        }
        Ok(())
    }

    /// Soft-deletes the record.
    pub fn deactivate(&mut self) {
        self.estado = Some(Estado::Inactivo);
    }
}

/////////////////////////////////////// EspecieParametroCreate ///////////////////////////////////////

/// Creation payload for an [`EspecieParametro`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EspecieParametroCreate {
    /// Species reference.
    pub id_especie: u64,
    /// Parameter-type reference.
    pub id_parametro: u64,
    /// Lower acceptable bound.
    #[serde(rename = "Rmin")]
    pub r_min: f64,
    /// Upper acceptable bound.
    #[serde(rename = "Rmax")]
    pub r_max: f64,
}

impl EspecieParametroCreate {
    /// Creates a new payload.
    pub fn new(id_especie: u64, id_parametro: u64, r_min: f64, r_max: f64) -> Self {
        Self {
            id_especie,
            id_parametro,
            r_min,
            r_max,
        }
    }

    /// Checks the range invariant.
    pub fn check(&self) -> Result<(), RangeError> {
        check_range(self.r_min, self.r_max)
    }
}

/////////////////////////////////////// EspecieParametroUpdate ///////////////////////////////////////

/// Partial patch for an [`EspecieParametro`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EspecieParametroUpdate {
    /// Ignored when applied; identifiers are server-assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_especie_parametro: Option<u64>,
    /// New species reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_especie: Option<u64>,
    /// New parameter-type reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_parametro: Option<u64>,
    /// New lower bound.
    #[serde(default, rename = "Rmin", skip_serializing_if = "Option::is_none")]
    pub r_min: Option<f64>,
    /// New upper bound.
    #[serde(default, rename = "Rmax", skip_serializing_if = "Option::is_none")]
    pub r_max: Option<f64>,
    /// Ignored when applied; the creation timestamp is server-assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    /// New lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<Estado>,
}

impl EspecieParametroUpdate {
    /// True when the patch carries no field that [`EspecieParametro::apply`] would write.
    pub fn is_noop(&self) -> bool {
        self.id_especie.is_none()
            && self.id_parametro.is_none()
            && self.r_min.is_none()
            && self.r_max.is_none()
            && self.estado.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> EspecieParametro {
        EspecieParametro::from_create(
            1,
            EspecieParametroCreate::new(10, 20, 24.0, 30.0),
            DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn wire_names_match_contract() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(
            value,
            json!({
                "id_especie_parametro": 1,
                "id_especie": 10,
                "id_parametro": 20,
                "Rmin": 24.0,
                "Rmax": 30.0,
                "fecha_creacion": "2024-03-01T12:00:00Z",
                "estado": "activo"
            })
        );
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let parsed: EspecieParametro = serde_json::from_value(json!({
            "id_especie_parametro": 3,
            "id_especie": 1,
            "id_parametro": 2,
            "Rmin": 6.5,
            "Rmax": 8.5
        }))
        .unwrap();
        assert_eq!(parsed.fecha_creacion, None);
        assert_eq!(parsed.estado, None);
        assert!(parsed.is_active());
    }

    #[test]
    fn estado_parses_wire_names_only() {
        assert_eq!("activo".parse::<Estado>(), Ok(Estado::Activo));
        assert_eq!("inactivo".parse::<Estado>(), Ok(Estado::Inactivo));
        assert!("Activo".parse::<Estado>().is_err());
        assert!(serde_json::from_value::<Estado>(json!("borrado")).is_err());
    }

    #[test]
    fn empty_patch_is_noop() {
        let patch: EspecieParametroUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_noop());
        let mut patched = record();
        patched.apply(&patch).unwrap();
        assert_eq!(patched, record());
    }

    #[test]
    fn patch_merges_present_fields() {
        let mut patched = record();
        let patch = EspecieParametroUpdate {
            r_min: Some(22.0),
            estado: Some(Estado::Inactivo),
            ..Default::default()
        };
        patched.apply(&patch).unwrap();
        assert_eq!(patched.r_min, 22.0);
        assert_eq!(patched.r_max, 30.0);
        assert_eq!(patched.id_especie, 10);
        assert_eq!(patched.estado, Some(Estado::Inactivo));
    }

    #[test]
    fn patch_ignores_server_assigned_fields() {
        let mut patched = record();
        let patch = EspecieParametroUpdate {
            id_especie_parametro: Some(99),
            fecha_creacion: Some(Utc::now()),
            ..Default::default()
        };
        assert!(patch.is_noop());
        patched.apply(&patch).unwrap();
        assert_eq!(patched, record());
    }

    #[test]
    fn patch_rejects_inverted_range_without_writing() {
        let mut patched = record();
        let patch = EspecieParametroUpdate {
            id_especie: Some(11),
            r_min: Some(31.0),
            ..Default::default()
        };
        let err = patched.apply(&patch).unwrap_err();
        assert_eq!(err.r_min, 31.0);
        assert_eq!(patched, record());
    }

    #[test]
    fn range_check() {
        assert!(check_range(1.0, 1.0).is_ok());
        assert!(check_range(1.0, 2.0).is_ok());
        assert!(check_range(2.0, 1.0).is_err());
        assert!(check_range(f64::NAN, 1.0).is_err());
        assert!(EspecieParametroCreate::new(1, 1, 9.0, 3.0).check().is_err());
    }

    #[test]
    fn deactivate_is_soft() {
        let mut r = record();
        r.deactivate();
        assert_eq!(r.estado, Some(Estado::Inactivo));
        assert!(!r.is_active());
        assert_eq!(r.id_especie_parametro, 1);
    }

    #[test]
    fn contains_is_inclusive() {
        let r = record();
        assert!(r.contains(24.0));
        assert!(r.contains(30.0));
        assert!(!r.contains(30.1));
    }
}

//! # Data Storage Abstraction
//!
//! The catalog store behind the HTTP API. The [`DataStore`] trait gives handlers and the
//! seed routine a uniform interface; [`InMemoryDataStore`] is the only backend.
//!
//! ## Storage Model
//!
//! ```text
//! Instalacion       opaque JSON object, id_instalacion assigned on insert when absent
//! EspecieParametro  keyed by id_especie_parametro, soft-deleted through estado
//! ```
//!
//! Records are never hard-deleted. [`DataStore::deactivate_especie_parametro`] flips
//! `estado` to `inactivo` and the record stays listable.
//!
//! ```rust
//! use acuicola::{DataStore, EspecieParametroCreate, Estado, InMemoryDataStore};
//!
//! let store = InMemoryDataStore::new();
//! let created = store
//!     .create_especie_parametro(EspecieParametroCreate::new(1, 2, 24.0, 30.0))
//!     .unwrap();
//! assert_eq!(created.estado, Some(Estado::Activo));
//!
//! let removed = store
//!     .deactivate_especie_parametro(created.id_especie_parametro)
//!     .unwrap();
//! assert_eq!(removed.estado, Some(Estado::Inactivo));
//! assert_eq!(store.list_especie_parametros(&Default::default()).unwrap().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    DataStoreError, EspecieParametro, EspecieParametroCreate, EspecieParametroUpdate, Estado,
    Instalacion,
};

/// Filter for listing species parameters. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspecieParametroFilter {
    /// Only records in this lifecycle state.
    pub estado: Option<Estado>,
    /// Only records for this species.
    pub id_especie: Option<u64>,
}

impl EspecieParametroFilter {
    /// Whether `record` passes the filter. Records without `estado` count as active.
    pub fn matches(&self, record: &EspecieParametro) -> bool {
        let estado = record.estado.unwrap_or(Estado::Activo);
        self.estado.is_none_or(|wanted| wanted == estado)
            && self.id_especie.is_none_or(|wanted| wanted == record.id_especie)
    }
}

/// Trait defining the catalog storage interface.
///
/// Implementors must be thread-safe; the HTTP layer shares one store across all requests.
pub trait DataStore: Send + Sync {
    /// Lists facilities in insertion order.
    fn list_instalaciones(&self) -> Result<Vec<Instalacion>, DataStoreError>;

    /// Stores a facility, assigning `id_instalacion` when the record has none.
    ///
    /// # Returns
    /// * `Ok(Instalacion)` - The stored record, identifier included
    /// * `Err(DataStoreError::AlreadyExists)` - The supplied identifier is taken
    /// * `Err(DataStoreError::InvalidData)` - The identifier would leave no next one
    fn create_instalacion(&self, instalacion: Instalacion) -> Result<Instalacion, DataStoreError>;

    /// Lists species parameters matching `filter`, ordered by identifier.
    fn list_especie_parametros(
        &self,
        filter: &EspecieParametroFilter,
    ) -> Result<Vec<EspecieParametro>, DataStoreError>;

    /// Retrieves one species parameter.
    fn get_especie_parametro(&self, id: u64) -> Result<Option<EspecieParametro>, DataStoreError>;

    /// Creates a species parameter from a creation payload.
    ///
    /// The store assigns the identifier and `fecha_creacion`, and starts the record `activo`.
    ///
    /// # Returns
    /// * `Ok(EspecieParametro)` - The stored record
    /// * `Err(DataStoreError::InvalidData)` - `Rmin > Rmax`
    fn create_especie_parametro(
        &self,
        create: EspecieParametroCreate,
    ) -> Result<EspecieParametro, DataStoreError>;

    /// Merges a partial patch into a stored species parameter.
    ///
    /// # Returns
    /// * `Ok(EspecieParametro)` - The merged record
    /// * `Err(DataStoreError::NotFound)` - No record with that identifier
    /// * `Err(DataStoreError::InvalidData)` - The merged range is inverted
    fn update_especie_parametro(
        &self,
        id: u64,
        patch: &EspecieParametroUpdate,
    ) -> Result<EspecieParametro, DataStoreError>;

    /// Soft-deletes a species parameter by setting `estado` to `inactivo`.
    fn deactivate_especie_parametro(&self, id: u64) -> Result<EspecieParametro, DataStoreError>;
}

struct Instalaciones {
    next_id: u64,
    records: Vec<Instalacion>,
}

struct EspecieParametros {
    next_id: u64,
    records: BTreeMap<u64, EspecieParametro>,
}

/// Thread-safe in-memory implementation of [`DataStore`].
///
/// Each collection sits behind its own `Mutex`. Identifiers start at 1 and increase
/// monotonically per collection.
pub struct InMemoryDataStore {
    instalaciones: Mutex<Instalaciones>,
    especie_parametros: Mutex<EspecieParametros>,
}

impl InMemoryDataStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            instalaciones: Mutex::new(Instalaciones {
                next_id: 1,
                records: Vec::new(),
            }),
            especie_parametros: Mutex::new(EspecieParametros {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }

    fn instalaciones(&self) -> Result<MutexGuard<'_, Instalaciones>, DataStoreError> {
        self.instalaciones
            .lock()
            .map_err(|e| DataStoreError::Internal(e.to_string()))
    }

    fn especie_parametros(&self) -> Result<MutexGuard<'_, EspecieParametros>, DataStoreError> {
        self.especie_parametros
            .lock()
            .map_err(|e| DataStoreError::Internal(e.to_string()))
    }
}

// The identifier handed out after `id`. The last representable id has none.
fn successor(id: u64) -> Result<u64, DataStoreError> {
    id.checked_add(1)
        .ok_or_else(|| DataStoreError::InvalidData(format!("identifier {} leaves no next id", id)))
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore for InMemoryDataStore {
    fn list_instalaciones(&self) -> Result<Vec<Instalacion>, DataStoreError> {
        Ok(self.instalaciones()?.records.clone())
    }

    fn create_instalacion(
        &self,
        mut instalacion: Instalacion,
    ) -> Result<Instalacion, DataStoreError> {
        let mut instalaciones = self.instalaciones()?;
        match instalacion.id() {
            Some(id) => {
                if instalaciones.records.iter().any(|r| r.id() == Some(id)) {
                    return Err(DataStoreError::AlreadyExists);
                }
                let after = successor(id)?;
                instalaciones.next_id = instalaciones.next_id.max(after);
            }
            None => {
                let id = instalaciones.next_id;
                instalaciones.next_id = successor(id)?;
                instalacion.set_id(id);
            }
        }
        debug!(id_instalacion = ?instalacion.id(), "instalacion created");
        instalaciones.records.push(instalacion.clone());
        Ok(instalacion)
    }

    fn list_especie_parametros(
        &self,
        filter: &EspecieParametroFilter,
    ) -> Result<Vec<EspecieParametro>, DataStoreError> {
        Ok(self
            .especie_parametros()?
            .records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    fn get_especie_parametro(&self, id: u64) -> Result<Option<EspecieParametro>, DataStoreError> {
        Ok(self.especie_parametros()?.records.get(&id).cloned())
    }

    fn create_especie_parametro(
        &self,
        create: EspecieParametroCreate,
    ) -> Result<EspecieParametro, DataStoreError> {
        create
            .check()
            .map_err(|e| DataStoreError::InvalidData(e.to_string()))?;
        let mut especie_parametros = self.especie_parametros()?;
        let id = especie_parametros.next_id;
        especie_parametros.next_id = successor(id)?;
        let record = EspecieParametro::from_create(id, create, Utc::now());
        especie_parametros.records.insert(id, record.clone());
        debug!(id_especie_parametro = id, "especie_parametro created");
        Ok(record)
    }

    fn update_especie_parametro(
        &self,
        id: u64,
        patch: &EspecieParametroUpdate,
    ) -> Result<EspecieParametro, DataStoreError> {
        let mut especie_parametros = self.especie_parametros()?;
        let record = especie_parametros
            .records
            .get_mut(&id)
            .ok_or(DataStoreError::NotFound)?;
        record
            .apply(patch)
            .map_err(|e| DataStoreError::InvalidData(e.to_string()))?;
        debug!(id_especie_parametro = id, "especie_parametro updated");
        Ok(record.clone())
    }

    fn deactivate_especie_parametro(&self, id: u64) -> Result<EspecieParametro, DataStoreError> {
        let mut especie_parametros = self.especie_parametros()?;
        let record = especie_parametros
            .records
            .get_mut(&id)
            .ok_or(DataStoreError::NotFound)?;
        record.deactivate();
        debug!(id_especie_parametro = id, "especie_parametro deactivated");
        Ok(record.clone())
    }
}

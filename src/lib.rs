//! # Acuicola: facility and species-parameter catalog
//!
//! Acuicola keeps the reference data of an aquaculture operation: the facilities
//! (instalaciones) where stock is raised and, for every species, the acceptable range of
//! each monitored environmental parameter (water temperature, pH, dissolved oxygen, ...).
//!
//! This crate provides:
//!
//! - **Resource Loader**: fetches a collection once per activation and publishes an
//!   observable `{items, loading, error}` state that ignores results arriving after
//!   teardown
//! - **Catalog Model**: the [`EspecieParametro`] range record, its creation and patch
//!   payloads, and opaque [`Instalacion`] records
//! - **Schema Validation**: request payloads are checked against JSON schemas, including
//!   the `Rmin <= Rmax` rule, before they reach the store
//! - **HTTP API**: axum routes over a thread-safe in-memory [`DataStore`]
//! - **Seeding**: bootstraps a catalog in memory or over HTTP with a fatal-on-error exit
//!   code
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ acuictl / acuicola-seed                 │
//! ├─────────────────────────────────────────┤
//! │ Resource Loader + ApiClient (reqwest)   │
//! ├──────────────── HTTP /api ──────────────┤
//! │ Routes (axum) + request schemas         │
//! ├─────────────────────────────────────────┤
//! │ Data Store (trait, in-memory backend)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Recording a species parameter range
//!
//! ```rust
//! # use acuicola::{DataStore, EspecieParametroCreate, EspecieParametroUpdate, InMemoryDataStore};
//! let store = InMemoryDataStore::new();
//!
//! // Tilapia (species 1) water temperature (parameter 1): 24-30 °C
//! let record = store
//!     .create_especie_parametro(EspecieParametroCreate::new(1, 1, 24.0, 30.0))
//!     .unwrap();
//! assert!(record.contains(27.5));
//!
//! // Moving the upper bound below the lower one is refused
//! let patch = EspecieParametroUpdate {
//!     r_max: Some(20.0),
//!     ..Default::default()
//! };
//! assert!(store.update_especie_parametro(record.id_especie_parametro, &patch).is_err());
//! ```
//!
//! ### Validating a request payload
//!
//! ```rust
//! # use acuicola::schemas::validate_create;
//! # use serde_json::json;
//! let payload = json!({"id_especie": 2, "id_parametro": 2, "Rmin": 6.5, "Rmax": 8.0});
//! let create = validate_create(&payload).unwrap();
//! assert_eq!(create.r_min, 6.5);
//!
//! let missing = json!({"id_especie": 2, "id_parametro": 2, "Rmin": 6.5});
//! assert!(validate_create(&missing).is_err());
//! ```
//!
//! ### Serving the API
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use acuicola::{InMemoryDataStore, create_api_router};
//! # async fn serve() -> std::io::Result<()> {
//! let store = Arc::new(InMemoryDataStore::new());
//! let app = axum::Router::new().nest("/api", create_api_router(store));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

#![deny(missing_docs)]
mod data_store;
mod errors;
mod especie_parametro;
mod instalacion;
mod routes;
mod test_utils;
mod validate;

// CLI utility modules

/// Command-line interface utilities for program termination and output formatting.
///
/// This module provides common CLI utilities for acuicola binaries, including
/// error handling, formatted output, and program termination functions.
pub mod cli_utils;

/// Command-line interface command handlers.
///
/// This module contains organized command handlers for the acuictl CLI application,
/// with each resource implemented in a dedicated submodule.
pub mod commands;

/// Configuration files shared by the daemon and the clients.
pub mod config;

/// HTTP client utilities for interacting with the acuicola API.
///
/// This module provides the JSON client used by command handlers and the reqwest-backed
/// [`loader::Fetch`] implementation used by collection loads.
pub mod http_utils;

/// Collection loading with an observable loading/error state.
pub mod loader;

/// Subscriber setup for binaries.
pub mod logging;

/// JSON schemas for species-parameter payloads.
pub mod schemas;

/// Catalog bootstrapping.
pub mod seed;

pub use config::Config;
pub use data_store::{DataStore, EspecieParametroFilter, InMemoryDataStore};
pub use errors::DataStoreError;
pub use especie_parametro::{
    EspecieParametro, EspecieParametroCreate, EspecieParametroUpdate, Estado, EstadoParseError,
    RangeError, check_range,
};
pub use instalacion::{ID_INSTALACION_KEY, Instalacion};
pub use loader::{Collection, LoadError, LoadState, Resource, mount};
pub use routes::create_api_router;
pub use seed::{SeedData, SeedError, SeedReport, SeedTarget, run_seed, seed_catalog};
pub use validate::{ValidationError, validate_value};

//! # HTTP API
//!
//! Axum routes for the catalog, meant to be nested under `/api`:
//!
//! ```text
//! GET    /instalaciones               list facilities
//! POST   /instalaciones               store a facility (any JSON object)
//! GET    /especie-parametros          list, filterable by ?estado= and ?id_especie=
//! POST   /especie-parametros          create from a schema-checked payload
//! GET    /especie-parametros/:id      fetch one
//! PATCH  /especie-parametros/:id      merge a schema-checked partial patch
//! DELETE /especie-parametros/:id      soft delete, answers with the deactivated record
//! ```
//!
//! Every failure answers with a plain-text body: 400 for payloads that fail validation,
//! 404 for unknown identifiers, 409 for identifier clashes, 500 otherwise.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde_json::Value;
use tracing::{info, warn};

use crate::data_store::EspecieParametroFilter;
use crate::{DataStore, DataStoreError, EspecieParametro, Estado, Instalacion, schemas};

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn store_error(e: DataStoreError) -> (StatusCode, String) {
    let status = match e {
        DataStoreError::NotFound => StatusCode::NOT_FOUND,
        DataStoreError::AlreadyExists => StatusCode::CONFLICT,
        DataStoreError::InvalidData(_) => StatusCode::BAD_REQUEST,
        DataStoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %e, "data store failure");
    }
    (status, e.to_string())
}

fn bad_request(msg: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.to_string())
}

fn parse_filter(params: &HashMap<String, String>) -> Result<EspecieParametroFilter, String> {
    let estado = params
        .get("estado")
        .map(|s| s.parse::<Estado>())
        .transpose()
        .map_err(|e| e.to_string())?;
    let id_especie = params
        .get("id_especie")
        .map(|s| s.parse::<u64>())
        .transpose()
        .map_err(|e| format!("invalid id_especie: {}", e))?;
    Ok(EspecieParametroFilter { estado, id_especie })
}

//////////////////////////////////////////// Instalaciones ////////////////////////////////////////////

async fn list_instalaciones(
    State(store): State<Arc<dyn DataStore>>,
) -> ApiResult<Vec<Instalacion>> {
    store.list_instalaciones().map(Json).map_err(store_error)
}

async fn create_instalacion(
    State(store): State<Arc<dyn DataStore>>,
    Json(record): Json<Value>,
) -> Result<(StatusCode, Json<Instalacion>), (StatusCode, String)> {
    let instalacion = Instalacion::try_from(record)
        .map_err(|_| bad_request("an instalacion must be a JSON object"))?;
    let created = store.create_instalacion(instalacion).map_err(store_error)?;
    info!(id_instalacion = ?created.id(), "instalacion created");
    Ok((StatusCode::CREATED, Json(created)))
}

////////////////////////////////////////// EspecieParametros //////////////////////////////////////////

async fn list_especie_parametros(
    State(store): State<Arc<dyn DataStore>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<EspecieParametro>> {
    let filter = parse_filter(&params).map_err(bad_request)?;
    store
        .list_especie_parametros(&filter)
        .map(Json)
        .map_err(store_error)
}

async fn create_especie_parametro(
    State(store): State<Arc<dyn DataStore>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<EspecieParametro>), (StatusCode, String)> {
    let create = schemas::validate_create(&payload).map_err(bad_request)?;
    let created = store.create_especie_parametro(create).map_err(store_error)?;
    info!(
        id_especie_parametro = created.id_especie_parametro,
        "especie_parametro created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_especie_parametro(
    State(store): State<Arc<dyn DataStore>>,
    Path(id): Path<u64>,
) -> ApiResult<EspecieParametro> {
    store
        .get_especie_parametro(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| store_error(DataStoreError::NotFound))
}

async fn update_especie_parametro(
    State(store): State<Arc<dyn DataStore>>,
    Path(id): Path<u64>,
    Json(payload): Json<Value>,
) -> ApiResult<EspecieParametro> {
    let patch = schemas::validate_update(&payload).map_err(bad_request)?;
    let updated = store
        .update_especie_parametro(id, &patch)
        .map_err(store_error)?;
    info!(id_especie_parametro = id, "especie_parametro updated");
    Ok(Json(updated))
}

async fn deactivate_especie_parametro(
    State(store): State<Arc<dyn DataStore>>,
    Path(id): Path<u64>,
) -> ApiResult<EspecieParametro> {
    let deactivated = store
        .deactivate_especie_parametro(id)
        .map_err(store_error)?;
    info!(id_especie_parametro = id, "especie_parametro deactivated");
    Ok(Json(deactivated))
}

/////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Builds the catalog router over `store`. Nest it under `/api`.
pub fn create_api_router(store: Arc<dyn DataStore>) -> Router {
    Router::new()
        .route(
            "/instalaciones",
            get(list_instalaciones).post(create_instalacion),
        )
        .route(
            "/especie-parametros",
            get(list_especie_parametros).post(create_especie_parametro),
        )
        .route(
            "/especie-parametros/:id",
            get(get_especie_parametro)
                .patch(update_especie_parametro)
                .delete(deactivate_especie_parametro),
        )
        .with_state(store)
}

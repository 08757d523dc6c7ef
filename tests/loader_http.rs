use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use acuicola::http_utils::{ApiClient, HttpFetcher};
use acuicola::loader::{self, Collection, INSTALACIONES_ERROR, LoadError};
use acuicola::{EspecieParametro, InMemoryDataStore, Instalacion, SeedData, seed_catalog};

/// Serves a fresh catalog on an ephemeral port
async fn spawn_server() -> SocketAddr {
    let data_store = Arc::new(InMemoryDataStore::new());
    let app = Router::new().nest("/api", acuicola::create_api_router(data_store));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn empty_collection_loads_without_error() {
    let addr = spawn_server().await;
    let fetcher = Arc::new(HttpFetcher::new(format!("http://{}", addr)));

    let mut resource = loader::mount::<Instalacion, _>(fetcher, Collection::instalaciones());
    let state = resource.settled().await.unwrap();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn seeded_catalog_loads_in_order() {
    let addr = spawn_server().await;
    let base_url = format!("http://{}", addr);

    let client = ApiClient::new(base_url.clone());
    let report = seed_catalog(&client, &SeedData::default_catalog())
        .await
        .unwrap();

    let fetcher = Arc::new(HttpFetcher::new(base_url));
    let mut instalaciones =
        loader::mount::<Instalacion, _>(Arc::clone(&fetcher), Collection::instalaciones());
    let mut especie_parametros =
        loader::mount::<EspecieParametro, _>(fetcher, Collection::especie_parametros());

    let state = instalaciones.settled().await.unwrap();
    assert_eq!(state.items.len(), report.instalaciones);
    let ids: Vec<_> = state.items.iter().map(Instalacion::id).collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);

    let state = especie_parametros.settled().await.unwrap();
    assert_eq!(state.items.len(), report.especie_parametros);
    assert!(
        state
            .items
            .windows(2)
            .all(|w| w[0].id_especie_parametro < w[1].id_especie_parametro)
    );
}

#[tokio::test]
async fn missing_endpoint_is_status_failure() {
    let addr = spawn_server().await;
    let fetcher = Arc::new(HttpFetcher::new(format!("http://{}", addr)));

    let collection = Collection::new("/api/especies", INSTALACIONES_ERROR);
    let mut resource = loader::mount::<Instalacion, _>(fetcher, collection);
    let state = resource.settled().await.unwrap();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(INSTALACIONES_ERROR));
    assert!(matches!(
        state.failure,
        Some(LoadError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let fetcher = Arc::new(HttpFetcher::new("http://127.0.0.1:9".to_string()));
    let mut resource = loader::mount::<Instalacion, _>(fetcher, Collection::instalaciones());
    let state = resource.settled().await.unwrap();
    assert_eq!(
        state.error.as_deref(),
        Some("Error al cargar las instalaciones")
    );
    assert!(matches!(state.failure, Some(LoadError::Network(_))));
    assert!(state.items.is_empty());
}

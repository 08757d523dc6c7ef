use std::path::Path;
use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use acuicola::{Config, InMemoryDataStore, SeedData, create_api_router, logging, seed_catalog};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "Path to a JSON or YAML configuration file")]
    config: Option<String>,
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(optional, "Seed the store from this JSON or YAML file instead of the built-in catalog")]
    seed_file: Option<String>,
    #[arrrg(flag, "Seed the store before serving")]
    seed: bool,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"acuicolad - Acuicola catalog daemon

USAGE:
    acuicolad [OPTIONS]

OPTIONS:
    --config <PATH>      JSON or YAML configuration file
    --host <HOST>        Host to bind the HTTP server [default: 127.0.0.1]
    --port <PORT>        Port to bind the HTTP server [default: 8080]
    --seed               Seed the store before serving
    --seed-file <PATH>   Seed from this file instead of the built-in catalog (implies --seed)
    --verbose            Enable verbose logging

DESCRIPTION:
    Serves the facility and species-parameter catalog under /api/ from an
    in-memory store. Logging honours RUST_LOG.

    The server supports graceful shutdown via Ctrl+C.

API ENDPOINTS:
    GET    /api/instalaciones               List facilities
    POST   /api/instalaciones               Create a facility
    GET    /api/especie-parametros          List species parameters (?estado=, ?id_especie=)
    POST   /api/especie-parametros          Create a species parameter
    GET    /api/especie-parametros/{id}     Get a species parameter
    PATCH  /api/especie-parametros/{id}     Patch a species parameter
    DELETE /api/especie-parametros/{id}     Deactivate a species parameter"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: acuicolad [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    config.validate()?;
    logging::init(&config.log_level, args.verbose)?;

    let data_store = Arc::new(InMemoryDataStore::new());

    if args.seed || args.seed_file.is_some() {
        let data = match &args.seed_file {
            Some(path) => SeedData::from_file(Path::new(path))?,
            None => SeedData::default_catalog(),
        };
        let report = seed_catalog(data_store.as_ref(), &data).await?;
        info!(
            instalaciones = report.instalaciones,
            especie_parametros = report.especie_parametros,
            "store seeded"
        );
    }

    let app = Router::new().nest("/api", create_api_router(data_store));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    info!(%addr, "acuicolad listening");

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received, stopping server gracefully");
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
    {
        error!(error = %e, "server error");
        std::process::exit(1);
    }

    info!("acuicolad stopped");
    Ok(())
}

//! # Seeding
//!
//! Bootstraps a catalog with facilities and species parameter bounds. The same
//! [`SeedData`] can be written straight into an [`InMemoryDataStore`] (the daemon's
//! `--seed` flag) or pushed over HTTP through an [`ApiClient`] (the `acuicola-seed`
//! binary).
//!
//! [`run_seed`] is the process boundary: it awaits a seeding routine, logs the outcome and
//! turns it into an exit code. It is the only place where a failure is fatal.

use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::http_utils::ApiClient;
use crate::{DataStore, DataStoreError, EspecieParametroCreate, InMemoryDataStore, Instalacion};

/// Logged, together with the error, when a seeding routine fails.
pub const SEED_FAILURE_MESSAGE: &str = "Error al sembrar los datos iniciales";

/// Errors raised while seeding.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedError {
    /// The seed file could not be read.
    Io(String),
    /// The seed file is not valid seed data.
    Parse(String),
    /// A seed entry breaks a catalog invariant.
    Invalid(String),
    /// The in-memory store refused an entry.
    Store(DataStoreError),
    /// The API refused an entry or could not be reached.
    Http(String),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Io(msg) => write!(f, "failed to read seed file: {}", msg),
            SeedError::Parse(msg) => write!(f, "failed to parse seed file: {}", msg),
            SeedError::Invalid(msg) => write!(f, "invalid seed entry: {}", msg),
            SeedError::Store(e) => write!(f, "data store rejected seed entry: {}", e),
            SeedError::Http(msg) => write!(f, "API rejected seed entry: {}", msg),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<DataStoreError> for SeedError {
    fn from(e: DataStoreError) -> Self {
        SeedError::Store(e)
    }
}

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Facilities created.
    pub instalaciones: usize,
    /// Species parameter bounds created.
    pub especie_parametros: usize,
}

///////////////////////////////////////////// SeedData /////////////////////////////////////////////

/// A batch of records to insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedData {
    /// Facilities, inserted first.
    pub instalaciones: Vec<Instalacion>,
    /// Species parameter bounds.
    pub especie_parametros: Vec<EspecieParametroCreate>,
}

fn instalacion(value: Value) -> Instalacion {
    Instalacion::try_from(value).unwrap_or_default()
}

impl SeedData {
    /// The built-in demo catalog.
    ///
    /// Species 1 is tilapia and species 2 rainbow trout; parameter 1 is water temperature
    /// in °C, 2 is pH and 3 is dissolved oxygen in mg/L.
    pub fn default_catalog() -> Self {
        Self {
            instalaciones: vec![
                instalacion(json!({
                    "nombre": "Estanque Norte",
                    "tipo": "estanque",
                    "capacidad_m3": 1200
                })),
                instalacion(json!({
                    "nombre": "Raceway Sur",
                    "tipo": "raceway",
                    "capacidad_m3": 300
                })),
            ],
            especie_parametros: vec![
                EspecieParametroCreate::new(1, 1, 24.0, 30.0),
                EspecieParametroCreate::new(1, 2, 6.5, 8.5),
                EspecieParametroCreate::new(1, 3, 4.0, 12.0),
                EspecieParametroCreate::new(2, 1, 10.0, 16.0),
                EspecieParametroCreate::new(2, 2, 6.5, 8.0),
                EspecieParametroCreate::new(2, 3, 7.0, 14.0),
            ],
        }
    }

    /// Reads seed data from a JSON or YAML file.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SeedError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&path.to_string_lossy(), &content)
    }

    /// Parses seed text by file extension, JSON unless the name ends in `.yaml`/`.yml`,
    /// and checks every range before anything is inserted.
    pub fn parse(file_name: &str, content: &str) -> Result<Self, SeedError> {
        let data: SeedData = if file_name.ends_with(".yaml") || file_name.ends_with(".yml") {
            serde_yml::from_str(content).map_err(|e| SeedError::Parse(e.to_string()))?
        } else {
            serde_json::from_str(content).map_err(|e| SeedError::Parse(e.to_string()))?
        };
        for create in &data.especie_parametros {
            create
                .check()
                .map_err(|e| SeedError::Invalid(e.to_string()))?;
        }
        Ok(data)
    }
}

//////////////////////////////////////////// SeedTarget ////////////////////////////////////////////

/// Something seed records can be written into.
pub trait SeedTarget {
    /// Inserts one facility.
    fn create_instalacion(
        &self,
        instalacion: &Instalacion,
    ) -> impl Future<Output = Result<Instalacion, SeedError>>;

    /// Inserts one species parameter bound.
    fn create_especie_parametro(
        &self,
        create: &EspecieParametroCreate,
    ) -> impl Future<Output = Result<(), SeedError>>;
}

impl SeedTarget for InMemoryDataStore {
    async fn create_instalacion(
        &self,
        instalacion: &Instalacion,
    ) -> Result<Instalacion, SeedError> {
        Ok(DataStore::create_instalacion(self, instalacion.clone())?)
    }

    async fn create_especie_parametro(
        &self,
        create: &EspecieParametroCreate,
    ) -> Result<(), SeedError> {
        DataStore::create_especie_parametro(self, create.clone())?;
        Ok(())
    }
}

impl SeedTarget for ApiClient {
    async fn create_instalacion(
        &self,
        instalacion: &Instalacion,
    ) -> Result<Instalacion, SeedError> {
        self.post("instalaciones", instalacion)
            .await
            .map_err(|e| SeedError::Http(e.to_string()))
    }

    async fn create_especie_parametro(
        &self,
        create: &EspecieParametroCreate,
    ) -> Result<(), SeedError> {
        let _: Value = self
            .post("especie-parametros", create)
            .await
            .map_err(|e| SeedError::Http(e.to_string()))?;
        Ok(())
    }
}

/// Inserts every record of `data` into `target`, facilities first. Stops at the first
/// rejected record.
pub async fn seed_catalog<T: SeedTarget>(
    target: &T,
    data: &SeedData,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();
    for instalacion in &data.instalaciones {
        target.create_instalacion(instalacion).await?;
        report.instalaciones += 1;
    }
    for create in &data.especie_parametros {
        target.create_especie_parametro(create).await?;
        report.especie_parametros += 1;
    }
    Ok(report)
}

/// Awaits a seeding routine and maps its outcome to a process exit code: 0 on success,
/// 1 after logging [`SEED_FAILURE_MESSAGE`] with the error.
pub async fn run_seed<F, E>(routine: F) -> i32
where
    F: Future<Output = Result<SeedReport, E>>,
    E: std::fmt::Display,
{
    match routine.await {
        Ok(report) => {
            info!(
                instalaciones = report.instalaciones,
                especie_parametros = report.especie_parametros,
                "seed completed"
            );
            0
        }
        Err(e) => {
            error!(error = %e, "{}", SEED_FAILURE_MESSAGE);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_store::EspecieParametroFilter;
    use crate::test_utils::test_helpers::CapturedLogs;

    #[tokio::test]
    async fn default_catalog_seeds_store() {
        let store = InMemoryDataStore::new();
        let report = seed_catalog(&store, &SeedData::default_catalog())
            .await
            .unwrap();
        assert_eq!(
            report,
            SeedReport {
                instalaciones: 2,
                especie_parametros: 6
            }
        );

        let instalaciones = store.list_instalaciones().unwrap();
        assert_eq!(instalaciones[0].id(), Some(1));
        assert_eq!(instalaciones[1].get("nombre"), Some(&json!("Raceway Sur")));

        let records = store
            .list_especie_parametros(&EspecieParametroFilter::default())
            .unwrap();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.is_active()));
    }

    #[test]
    fn default_catalog_ranges_hold() {
        for create in SeedData::default_catalog().especie_parametros {
            assert!(create.check().is_ok(), "{:?}", create);
        }
    }

    #[test]
    fn parse_yaml_and_json() {
        let yaml = "instalaciones:\n  - nombre: Jaula 7\nespecie_parametros:\n  - id_especie: 3\n    id_parametro: 1\n    Rmin: 18\n    Rmax: 22\n";
        let data = SeedData::parse("seed.yaml", yaml).unwrap();
        assert_eq!(data.instalaciones.len(), 1);
        assert_eq!(
            data.especie_parametros,
            vec![EspecieParametroCreate::new(3, 1, 18.0, 22.0)]
        );

        let data = SeedData::parse("seed.json", r#"{"instalaciones": [{}]}"#).unwrap();
        assert_eq!(data.instalaciones.len(), 1);
        assert!(data.especie_parametros.is_empty());
    }

    #[test]
    fn parse_rejects_inverted_range() {
        let json = r#"{"especie_parametros": [{"id_especie": 1, "id_parametro": 1, "Rmin": 9, "Rmax": 3}]}"#;
        assert!(matches!(
            SeedData::parse("seed.json", json),
            Err(SeedError::Invalid(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_sections() {
        assert!(matches!(
            SeedData::parse("seed.json", r#"{"especies": []}"#),
            Err(SeedError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn successful_routine_exits_zero() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let code = run_seed(async { Ok::<_, SeedError>(SeedReport::default()) }).await;
        assert_eq!(code, 0);
        assert!(logs.contents().contains("seed completed"));
    }

    #[tokio::test]
    async fn failing_routine_exits_one_and_logs_error() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let code = run_seed(async {
            Err::<SeedReport, _>(SeedError::Http("connection refused".to_string()))
        })
        .await;
        assert_eq!(code, 1);
        let output = logs.contents();
        assert!(output.contains(SEED_FAILURE_MESSAGE), "{}", output);
        assert!(output.contains("connection refused"), "{}", output);
    }

    #[tokio::test]
    async fn unreachable_api_fails_seed() {
        let client = ApiClient::new("http://127.0.0.1:9".to_string());
        let result = seed_catalog(&client, &SeedData::default_catalog()).await;
        assert!(matches!(result, Err(SeedError::Http(_))));
    }
}

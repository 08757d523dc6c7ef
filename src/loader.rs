//! # Resource Loader
//!
//! Loads a named collection exactly once per activation and publishes a three-field
//! snapshot, `{items, loading, error}`, to whoever renders it.
//!
//! ## Lifecycle
//!
//! ```text
//! mount ──► loading = true, error = None
//!   │
//!   └─► one GET through the injected Fetch
//!         ├─ 2xx + body decodes as [T] ─► items = body (full replace)
//!         └─ anything else ───────────► error = collection message, items untouched
//!       loading = false                  (exactly once, both outcomes)
//! ```
//!
//! There is no refetch, no retry, no cache and no deduplication: every [`Resource`] owns
//! one independent request. Dropping a [`Resource`] (or calling [`Resource::unmount`])
//! marks it torn down; a request that resolves afterwards is discarded instead of being
//! written into state nobody observes.
//!
//! ## Failures
//!
//! Consumers that only want to show something read [`LoadState::error`], which always
//! carries the collection's fixed localized message (`"Error al cargar las
//! instalaciones"` for facilities). Consumers that want to tell a network outage from a
//! server error read [`LoadState::failure`], a tagged [`LoadError`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use acuicola::http_utils::HttpFetcher;
//! use acuicola::loader::{self, Collection};
//! use acuicola::Instalacion;
//!
//! # async fn example() {
//! let fetcher = Arc::new(HttpFetcher::new("http://localhost:8080".to_string()));
//! let mut resource = loader::mount::<Instalacion, _>(fetcher, Collection::instalaciones());
//! let state = resource.settled().await.unwrap();
//! match state.error {
//!     Some(message) => eprintln!("{}", message),
//!     None => println!("{} instalaciones", state.items.len()),
//! }
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use handled::Handle;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::commands::errors::UserError;

/// Path of the facilities collection.
pub const INSTALACIONES_PATH: &str = "/api/instalaciones";
/// Message shown when the facilities collection cannot be loaded.
pub const INSTALACIONES_ERROR: &str = "Error al cargar las instalaciones";
/// Path of the species-parameter collection.
pub const ESPECIE_PARAMETROS_PATH: &str = "/api/especie-parametros";
/// Message shown when the species-parameter collection cannot be loaded.
pub const ESPECIE_PARAMETROS_ERROR: &str = "Error al cargar los parámetros de especie";

////////////////////////////////////////////// Fetch //////////////////////////////////////////////

/// Raw outcome of a GET that reached a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, undecoded.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Creates a response from a status and a body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A GET that never produced a response: connection refused, DNS failure, timeout, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError(pub String);

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FetchError {}

/// The network capability a [`Resource`] loads through.
///
/// Production code uses [`HttpFetcher`](crate::http_utils::HttpFetcher); tests substitute
/// deterministic stand-ins.
pub trait Fetch: Send + Sync + 'static {
    /// Issues one GET for `path` and returns the response, whatever its status.
    fn get(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

//////////////////////////////////////////// Collection ////////////////////////////////////////////

/// A named collection endpoint and the message shown when it fails to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    path: String,
    error_message: String,
}

impl Collection {
    /// Creates a collection descriptor.
    pub fn new(path: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            error_message: error_message.into(),
        }
    }

    /// `GET /api/instalaciones`.
    pub fn instalaciones() -> Self {
        Self::new(INSTALACIONES_PATH, INSTALACIONES_ERROR)
    }

    /// `GET /api/especie-parametros`.
    pub fn especie_parametros() -> Self {
        Self::new(ESPECIE_PARAMETROS_PATH, ESPECIE_PARAMETROS_ERROR)
    }

    /// Path the collection is fetched from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Localized message published on any failure.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }
}

///////////////////////////////////////////// LoadError /////////////////////////////////////////////

/// Why a collection failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request never produced a response.
    Network(String),
    /// The server answered with a non-2xx status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },
    /// The body was not a JSON array of the expected records.
    Decode(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "network error: {}", msg),
            LoadError::Status { status, body } if body.is_empty() => {
                write!(f, "server returned HTTP {}", status)
            }
            LoadError::Status { status, body } => {
                write!(f, "server returned HTTP {}: {}", status, body)
            }
            LoadError::Decode(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl LoadError {
    /// A localized message that tells the failure kinds apart.
    ///
    /// Statuses without a specific message fall back to `fallback`, which is normally the
    /// collection's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            LoadError::Network(_) => "No se pudo conectar con el servidor".to_string(),
            LoadError::Status { status: 404, .. } => "El recurso solicitado no existe".to_string(),
            LoadError::Status {
                status: 500..=599, ..
            } => "El servidor no está disponible".to_string(),
            LoadError::Decode(_) => "La respuesta del servidor no es válida".to_string(),
            LoadError::Status { .. } => fallback.to_string(),
        }
    }
}

impl Handle<UserError> for LoadError {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self {
            LoadError::Network(_) => {
                Some("Check that the server is running and the base URL is correct.".to_string())
            }
            LoadError::Status { status: 404, .. } => {
                Some("The collection path was not found on the server.".to_string())
            }
            LoadError::Status {
                status: 500..=599, ..
            } => Some("Server error. The service may be temporarily unavailable.".to_string()),
            LoadError::Decode(_) => {
                Some("The server did not answer with a JSON array of records.".to_string())
            }
            LoadError::Status { .. } => None,
        };
        Some(UserError {
            message: self.to_string(),
            usage_hint,
        })
    }
}

///////////////////////////////////////////// LoadState /////////////////////////////////////////////

/// Observable snapshot of a collection load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    /// Last successfully loaded records, in server order.
    pub items: Vec<T>,
    /// True until the single activation settles.
    pub loading: bool,
    /// Fixed localized message when the load failed.
    pub error: Option<String>,
    /// Tagged cause of the failure, alongside `error`.
    pub failure: Option<LoadError>,
}

impl<T> LoadState<T> {
    /// The state before the request resolves.
    pub fn initial() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            failure: None,
        }
    }

    /// True once the activation has settled, successfully or not.
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::initial()
    }
}

/// The resource was torn down before its load settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unmounted;

impl std::fmt::Display for Unmounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "resource was unmounted before its load settled")
    }
}

impl std::error::Error for Unmounted {}

////////////////////////////////////////////// Resource //////////////////////////////////////////////

/// A mounted collection load.
///
/// Holds the read side of the state and the aliveness flag the loading task checks before
/// every mutation. Dropping the resource tears it down.
pub struct Resource<T> {
    state: watch::Receiver<LoadState<T>>,
    alive: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone> Resource<T> {
    /// Current snapshot.
    pub fn snapshot(&self) -> LoadState<T> {
        self.state.borrow().clone()
    }

    /// A receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.state.clone()
    }

    /// Waits until the activation settles and returns the settled snapshot.
    pub async fn settled(&mut self) -> Result<LoadState<T>, Unmounted> {
        let state = self
            .state
            .wait_for(LoadState::is_settled)
            .await
            .map_err(|_| Unmounted)?;
        Ok((*state).clone())
    }
}

impl<T> Resource<T> {
    /// Whether the resource is still mounted.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Tears the resource down and hands back the loading task.
    ///
    /// The in-flight request is not cancelled; its result is discarded when it arrives.
    /// Awaiting the returned handle waits for that to happen.
    pub fn unmount(mut self) -> JoinHandle<()> {
        self.tear_down();
        self.task.take().unwrap_or_else(|| tokio::spawn(async {}))
    }
}

impl<T> Resource<T> {
    fn tear_down(&self) {
        let _settle_excluded = self.state.borrow();
        self.alive.store(false, Ordering::Release);
    }
}

impl<T> Drop for Resource<T> {
    fn drop(&mut self) {
        self.tear_down();
    }
}

/// Mounts a collection: publishes the initial state and issues its single request.
///
/// Must be called from within a Tokio runtime.
pub fn mount<T, F>(fetcher: Arc<F>, collection: Collection) -> Resource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
    F: Fetch,
{
    let (state_tx, state_rx) = watch::channel(LoadState::initial());
    let alive = Arc::new(AtomicBool::new(true));
    let task = tokio::spawn(activate(fetcher, collection, state_tx, Arc::clone(&alive)));
    Resource {
        state: state_rx,
        alive,
        task: Some(task),
    }
}

async fn activate<T, F>(
    fetcher: Arc<F>,
    collection: Collection,
    state: watch::Sender<LoadState<T>>,
    alive: Arc<AtomicBool>,
) where
    T: DeserializeOwned + Send + Sync + 'static,
    F: Fetch,
{
    // The channel was created in the loading state; the only write is the settle below.
    let outcome = load::<T, F>(&fetcher, collection.path()).await;
    let path = collection.path();

    // Teardown flips `alive` while holding a read borrow of the channel, so the check and
    // the write below cannot interleave with it.
    let published = state.send_if_modified(|s| {
        if !alive.load(Ordering::Acquire) {
            return false;
        }
        match outcome {
            Ok(items) => {
                debug!(path, count = items.len(), "collection loaded");
                s.items = items;
            }
            Err(err) => {
                warn!(path, error = %err, "collection failed to load");
                s.error = Some(collection.error_message().to_string());
                s.failure = Some(err);
            }
        }
        s.loading = false;
        true
    });

    if !published {
        debug!(path, "resource unmounted, discarding load result");
    }
}

async fn load<T, F>(fetcher: &F, path: &str) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    F: Fetch,
{
    let response = fetcher
        .get(path)
        .await
        .map_err(|e| LoadError::Network(e.0))?;
    if !response.is_success() {
        return Err(LoadError::Status {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }
    serde_json::from_slice(&response.body).map_err(|e| LoadError::Decode(e.to_string()))
}

use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cli_utils;
use crate::loader::{Fetch, FetchError, FetchResponse};

/// A non-2xx answer from the API.
#[derive(Debug)]
pub struct HttpError {
    status: u16,
    message: String,
}

impl HttpError {
    /// HTTP status code of the answer.
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl Error for HttpError {}

fn build_client(timeout: Option<Duration>) -> Client {
    let builder = Client::builder();
    let builder = match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    // Only TLS backend initialisation can fail here; fall back to the default client.
    builder.build().unwrap_or_else(|_| Client::new())
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/////////////////////////////////////////////// ApiClient ///////////////////////////////////////////////

/// JSON client for the acuicola API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client without a request timeout.
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: String, timeout: Option<Duration>) -> Self {
        Self {
            client: build_client(timeout),
            base_url,
        }
    }

    /// Base URL the client was created with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Constructs a full API URL from a path relative to `/api/`
    pub fn api_url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        join_url(&self.base_url, &format!("api/{}", path))
    }

    /// Makes a GET request and handles the response
    pub async fn get<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Makes a POST request with JSON body and handles the response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Makes a PATCH request with JSON body and handles the response
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        debug!(%url, "PATCH");
        let response = self.client.patch(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Makes a DELETE request and handles the response
    pub async fn delete<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await?;
        self.handle_response(response).await
    }

    /// Handles HTTP response, deserializing success or returning error
    async fn handle_response<T>(&self, response: Response) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let error = response.text().await.unwrap_or_default();
            let message = if error.is_empty() {
                "No error details".to_string()
            } else {
                error
            };
            Err(Box::new(HttpError { status, message }))
        }
    }
}

////////////////////////////////////////////// HttpFetcher //////////////////////////////////////////////

/// [`Fetch`] over reqwest. Paths are resolved against the base URL as given.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher without a request timeout.
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, None)
    }

    /// Without a timeout a hung request keeps the resource loading indefinitely.
    pub fn with_timeout(base_url: String, timeout: Option<Duration>) -> Self {
        Self {
            client: build_client(timeout),
            base_url,
        }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
        let request = self.client.get(self.url(path));
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| FetchError(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError(e.to_string()))?;
            Ok(FetchResponse::new(status, body.to_vec()))
        }
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, Box<dyn Error>>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_without_double_slashes() {
        let client = ApiClient::new("http://localhost:8080/".to_string());
        assert_eq!(
            client.api_url("/especie-parametros/3"),
            "http://localhost:8080/api/especie-parametros/3"
        );
        assert_eq!(
            client.api_url("instalaciones"),
            "http://localhost:8080/api/instalaciones"
        );
    }

    #[test]
    fn fetcher_url_keeps_collection_path() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:9000".to_string());
        assert_eq!(
            fetcher.url("/api/instalaciones"),
            "http://127.0.0.1:9000/api/instalaciones"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_fetch_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let fetcher = HttpFetcher::with_timeout(
            "http://127.0.0.1:9".to_string(),
            Some(Duration::from_secs(2)),
        );
        assert!(fetcher.get("/api/instalaciones").await.is_err());
    }
}

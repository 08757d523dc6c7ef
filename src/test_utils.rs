#[cfg(test)]
pub mod test_helpers {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::Value;
    use tokio::sync::Notify;
    use tracing_subscriber::fmt::MakeWriter;

    use crate::loader::{Fetch, FetchError, FetchResponse};

    /// A fetcher that answers every request with the same canned outcome
    pub struct StubFetcher {
        outcome: Result<FetchResponse, FetchError>,
        calls: AtomicUsize,
        paths: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new(outcome: Result<FetchResponse, FetchError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                paths: Mutex::new(Vec::new()),
            }
        }

        /// Answers with `status` and `body` serialized as JSON
        pub fn json(status: u16, body: Value) -> Self {
            Self::new(Ok(FetchResponse::new(status, body.to_string())))
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested_paths(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    impl Fetch for StubFetcher {
        fn get(
            &self,
            path: &str,
        ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.paths.lock().unwrap().push(path.to_string());
            let outcome = self.outcome.clone();
            async move { outcome }
        }
    }

    /// Releases a [`GatedFetcher`]'s pending request
    pub struct Gate(Arc<Notify>);

    impl Gate {
        pub fn release(&self) {
            self.0.notify_one();
        }
    }

    /// A fetcher whose request stays pending until its gate is released
    pub struct GatedFetcher {
        outcome: Result<FetchResponse, FetchError>,
        gate: Arc<Notify>,
    }

    impl GatedFetcher {
        pub fn new(outcome: Result<FetchResponse, FetchError>) -> (Self, Gate) {
            let gate = Arc::new(Notify::new());
            (
                Self {
                    outcome,
                    gate: Arc::clone(&gate),
                },
                Gate(gate),
            )
        }
    }

    impl Fetch for GatedFetcher {
        fn get(
            &self,
            _path: &str,
        ) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
            let gate = Arc::clone(&self.gate);
            let outcome = self.outcome.clone();
            async move {
                gate.notified().await;
                outcome
            }
        }
    }

    /// Collects formatted tracing output for assertions
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        /// Installs a subscriber writing into this buffer for the current thread
        pub fn install(&self) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}

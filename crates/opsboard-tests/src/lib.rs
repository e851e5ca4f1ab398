//! Test harness for the opsboard status API
//!
//! Spins the real router up on an ephemeral port and talks to it over HTTP.
//! Log fixtures are written to temporary directories so every test reads
//! real files through [`LocalLogSource`].
//!
//! Run with: cargo test -p opsboard-tests

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use opsboard_api::{create_router, AppState};
use opsboard_core::LogSource;
use opsboard_sources::LocalLogSource;
use serde_json::Value;
use tokio::net::TcpListener;

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    client: reqwest::Client,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve the status API over the given log source
    pub async fn start(source: Arc<dyn LogSource>) -> std::io::Result<Self> {
        Self::start_router(create_router(AppState::from_source(source))).await
    }

    /// Serve an already built router
    pub async fn start_router(router: axum::Router) -> std::io::Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(std::io::Error::other)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// GET `/api/logs/status` with the given query pairs
    pub async fn status(&self, query: &[(&str, &str)]) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.base_url(), opsboard_api::STATUS_PATH))
            .query(query)
            .send()
            .await
            .expect("status request failed");
        let code = response.status().as_u16();
        let body = response.json().await.expect("status body is not JSON");
        (code, body)
    }

    /// Raw GET against an arbitrary path
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await
            .expect("request failed")
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Temporary log directory
pub struct LogDir {
    dir: tempfile::TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A path under the temp dir that does not exist
    pub fn missing(&self) -> PathBuf {
        self.dir.path().join("does-not-exist")
    }

    /// Write a log file, one line per item
    pub fn write<I, S>(&self, name: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
        }
        std::fs::write(self.dir.path().join(name), content).expect("failed to write log");
    }

    pub fn source(&self) -> Arc<dyn LogSource> {
        Arc::new(LocalLogSource::new(self.dir.path()))
    }
}

impl Default for LogDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Local timestamp `minutes_ago` before `anchor`, in log line format
pub fn stamp(anchor: DateTime<Local>, minutes_ago: i64) -> String {
    (anchor - chrono::Duration::minutes(minutes_ago))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Stamped log line `minutes_ago` before `anchor`
pub fn line(anchor: DateTime<Local>, minutes_ago: i64, message: &str) -> String {
    format!("{} - {}", stamp(anchor, minutes_ago), message)
}

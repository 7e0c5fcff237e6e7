//! Connectors for tests that never reach a server.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mongodb::Client;

use crate::database::connector::{ConnectSettings, Connector};
use crate::errors::Errors;

/// Builds an unverified client and records every connect call.
#[derive(Clone, Default)]
pub struct CountingConnector {
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<(String, u16)>>>,
    delay: Option<Duration>,
}

impl CountingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each connect open for `delay` so concurrent callers pile up.
    pub fn with_delay(delay: Duration) -> Self {
        CountingConnector {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, u16)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(&self, settings: &ConnectSettings) -> Result<Client, Errors> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((settings.host.clone(), settings.port));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(Client::with_options(settings.client_options().await?)?)
    }
}

/// Refuses every connection.
#[derive(Clone, Default)]
pub struct FailingConnector {
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl FailingConnector {
    /// Wait `delay` before refusing, like a server that times out.
    pub fn with_delay(delay: Duration) -> Self {
        FailingConnector {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FailingConnector {
    async fn connect(&self, settings: &ConnectSettings) -> Result<Client, Errors> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Err(Errors::ConnectionFailure {
            host: settings.host.clone(),
            port: settings.port,
            reason: "connection refused".to_string(),
        })
    }
}

/// In-memory sink for formatted `tracing` output.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// A subscriber writing INFO and above into this buffer, without colours.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let logs = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
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

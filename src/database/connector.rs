use std::net::Ipv6Addr;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::{bson::doc, options::ClientOptions, Client};
use tracing::debug;

use crate::config::settings::{
    Config, DEFAULT_HOST, DEFAULT_PORT, MONGODB_APP_NAME, MONGODB_HOST, MONGODB_PORT,
    MONGODB_TIMEOUT_MS,
};
use crate::errors::Errors;

/// Values read from configuration when the connection is first established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSettings {
    pub host: String,
    pub port: u16,
    pub app_name: Option<String>,
    pub timeout: Option<Duration>,
}

impl ConnectSettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ConnectSettings {
            host: host.into(),
            port,
            app_name: None,
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Errors> {
        let host = config.get_str(MONGODB_HOST, DEFAULT_HOST);
        let port = config.get_port(MONGODB_PORT, DEFAULT_PORT as u16)?;

        let app_name = if config.contains(MONGODB_APP_NAME) {
            Some(config.get_str(MONGODB_APP_NAME, ""))
        } else {
            None
        };

        let timeout = if config.contains(MONGODB_TIMEOUT_MS) {
            let millis = config.get_int(MONGODB_TIMEOUT_MS, 0)?;
            let millis = u64::try_from(millis).map_err(|_| Errors::InvalidConfig {
                key: MONGODB_TIMEOUT_MS.to_string(),
                reason: format!("{} is negative", millis),
            })?;
            Some(Duration::from_millis(millis))
        } else {
            None
        };

        Ok(ConnectSettings { host, port, app_name, timeout })
    }

    /// Connection string for the driver.
    ///
    /// `host` may be a bare host name or address, `host:port` (the port wins
    /// over `port`), or a complete `mongodb://` / `mongodb+srv://` URI.
    pub fn uri(&self) -> String {
        let host = self.host.trim();
        if host.starts_with("mongodb://") || host.starts_with("mongodb+srv://") {
            host.to_string()
        } else if host.parse::<Ipv6Addr>().is_ok() {
            format!("mongodb://[{}]:{}", host, self.port)
        } else if host.contains(':') {
            format!("mongodb://{}", host)
        } else {
            format!("mongodb://{}:{}", host, self.port)
        }
    }

    /// Driver options for these settings. Building a client from them does not touch the network.
    pub async fn client_options(&self) -> Result<ClientOptions, Errors> {
        let mut options = ClientOptions::parse(self.uri()).await?;

        if self.app_name.is_some() {
            options.app_name = self.app_name.clone();
        }
        if let Some(timeout) = self.timeout {
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);
        }

        Ok(options)
    }
}

/// Establishes the one connection a registry hands out.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, settings: &ConnectSettings) -> Result<Client, Errors>;
}

/// Connects through the MongoDB driver and pings the server before returning.
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(&self, settings: &ConnectSettings) -> Result<Client, Errors> {
        debug!("Connecting to MongoDB at {}", settings.uri());

        let client = Client::with_options(settings.client_options().await?)?;

        // The driver connects lazily; force a round trip so an unreachable
        // server fails here rather than on the first query.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| Errors::ConnectionFailure {
                host: settings.host.clone(),
                port: settings.port,
                reason: e.to_string(),
            })?;

        Ok(client)
    }
}

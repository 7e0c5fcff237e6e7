use std::sync::Arc;

use mongodb::{Client, Collection};
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::config::{self, Config};
use crate::database::connector::{ConnectSettings, Connector, MongoConnector};
use crate::errors::Errors;

/// Holds the single connection shared by everything that asks for a collection.
///
/// The connection is opened on first demand from the values in `config` and is
/// never replaced afterwards, even if the configuration changes.
pub struct ConnectionRegistry {
    config: Arc<Config>,
    connector: Box<dyn Connector>,
    outcome: tokio::sync::OnceCell<Result<Client, FailedConnect>>,
}

/// A first connect attempt that did not succeed. Kept so later callers see it too.
#[derive(Debug, Clone)]
struct FailedConnect {
    host: String,
    port: u16,
    reason: String,
}

impl From<&FailedConnect> for Errors {
    fn from(failed: &FailedConnect) -> Self {
        Errors::ConnectionFailure {
            host: failed.host.clone(),
            port: failed.port,
            reason: failed.reason.clone(),
        }
    }
}

impl ConnectionRegistry {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_connector(config, MongoConnector)
    }

    pub fn with_connector(config: Arc<Config>, connector: impl Connector + 'static) -> Self {
        ConnectionRegistry {
            config,
            connector: Box::new(connector),
            outcome: tokio::sync::OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(_)))
    }

    /// Return the shared connection, opening it first if necessary.
    ///
    /// Concurrent first callers wait on a single connect attempt and all see
    /// its result. A failed attempt is final: it is never retried, and every
    /// later call returns the same `ConnectionFailure`.
    ///
    /// Invalid configuration is reported before any attempt is made.
    pub async fn get_connection(&self) -> Result<&Client, Errors> {
        let outcome = match self.outcome.get() {
            Some(outcome) => outcome,
            None => {
                let settings = ConnectSettings::from_config(&self.config)?;
                self.outcome.get_or_init(|| self.connect(settings)).await
            }
        };

        match outcome {
            Ok(client) => Ok(client),
            Err(failed) => Err(failed.into()),
        }
    }

    /// Resolve `collection_name` in `database_name` on the shared connection.
    ///
    /// Neither needs to exist yet; the server creates them on first write.
    pub async fn get_collection<T>(
        &self,
        database_name: &str,
        collection_name: &str,
    ) -> Result<Collection<T>, Errors> {
        let client = self.get_connection().await?;
        debug!("Resolving collection {}.{}", database_name, collection_name);
        Ok(client.database(database_name).collection(collection_name))
    }

    pub async fn database_names(&self) -> Result<Vec<String>, Errors> {
        let client = self.get_connection().await?;
        Ok(client.list_database_names(None, None).await?)
    }

    async fn connect(&self, settings: ConnectSettings) -> Result<Client, FailedConnect> {
        match self.connector.connect(&settings).await {
            Ok(client) => {
                info!("Connect to MongoDB successfully");
                Ok(client)
            }
            Err(Errors::ConnectionFailure { host, port, reason }) => {
                Err(FailedConnect { host, port, reason })
            }
            Err(e) => Err(FailedConnect {
                host: settings.host,
                port: settings.port,
                reason: e.to_string(),
            }),
        }
    }
}

static DB: OnceCell<ConnectionRegistry> = OnceCell::new();

/// Process-wide registry for callers that don't carry one around.
pub struct DbSingleton;

impl DbSingleton {
    /// Install `registry` as the process-wide one. Only possible before first use.
    pub fn install(registry: ConnectionRegistry) -> Result<&'static ConnectionRegistry, Errors> {
        DB.set(registry).map_err(|_| Errors::AlreadyInitialized)?;
        Ok(Self::registry())
    }

    /// The installed registry, or a default one bound to the global configuration.
    pub fn registry() -> &'static ConnectionRegistry {
        DB.get_or_init(|| ConnectionRegistry::new(config::global().clone()))
    }
}

pub async fn get_connection() -> Result<&'static Client, Errors> {
    DbSingleton::registry().get_connection().await
}

pub async fn get_collection<T>(
    database_name: &str,
    collection_name: &str,
) -> Result<Collection<T>, Errors> {
    DbSingleton::registry()
        .get_collection(database_name, collection_name)
        .await
}

use std::process;
use std::sync::Arc;

use mongodb_util::config::settings::{DEFAULT_HOST, DEFAULT_PORT, MONGODB_HOST, MONGODB_PORT};
use mongodb_util::{logging, Config, ConnectionRegistry, DbSingleton, Errors};
use tracing::error;

#[tokio::main]
async fn main() {
    logging::init();

    match run().await {
        Ok(names) => println!("{:?}", names),
        Err(e) if e.is_fatal() => {
            error!("Connect to MongoDB failed: {}", e);
            process::exit(1);
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

/// Optional first argument: path to a TOML file with `mongodb_host` / `mongodb_port`.
fn load_config() -> Result<Config, Errors> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::new(),
    };

    if !config.contains(MONGODB_HOST) {
        config.put(MONGODB_HOST, DEFAULT_HOST);
    }
    if !config.contains(MONGODB_PORT) {
        config.put(MONGODB_PORT, DEFAULT_PORT);
    }
    config.apply_env_overrides();

    Ok(config)
}

async fn run() -> Result<Vec<String>, Errors> {
    let config = load_config()?;
    let registry = DbSingleton::install(ConnectionRegistry::new(Arc::new(config)))?;
    registry.database_names().await
}

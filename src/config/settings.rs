use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use toml::Value;
use tracing::debug;

use crate::errors::Errors;

pub const MONGODB_HOST: &str = "mongodb_host";
pub const MONGODB_PORT: &str = "mongodb_port";
pub const MONGODB_APP_NAME: &str = "mongodb_app_name";
pub const MONGODB_TIMEOUT_MS: &str = "mongodb_timeout_ms";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: i64 = 27017;

/// Keys that may be replaced from the environment by their upper-cased name.
const ENV_KEYS: [&str; 2] = [MONGODB_HOST, MONGODB_PORT];

static GLOBAL: Lazy<Arc<Config>> = Lazy::new(|| Arc::new(Config::from_env()));

/// Process-wide configuration, seeded from the environment on first use.
pub fn global() -> &'static Arc<Config> {
    &GLOBAL
}

/// String-keyed settings store.
///
/// Absent keys are never an error: every read takes the default to fall back on.
#[derive(Debug, Default)]
pub struct Config {
    values: RwLock<HashMap<String, Value>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration holding only what `MONGODB_HOST` / `MONGODB_PORT` provide.
    pub fn from_env() -> Self {
        let config = Config::new();
        config.apply_env_overrides();
        config
    }

    /// Load the top-level key/value pairs of a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, Errors> {
        let table: toml::value::Table = toml::from_str(text)?;
        let config = Config::new();
        for (key, value) in table {
            config.put(key, value);
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Errors> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    pub fn get(&self, key: &str, default: impl Into<Value>) -> Value {
        self.read(key).unwrap_or_else(|| default.into())
    }

    pub fn put(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        match self.read(key) {
            Some(Value::String(s)) => s,
            Some(Value::Integer(i)) => i.to_string(),
            Some(Value::Float(f)) => f.to_string(),
            Some(Value::Boolean(b)) => b.to_string(),
            Some(other) => other.to_string(),
            None => default.to_string(),
        }
    }

    /// Read an integer, accepting either a TOML integer or a numeric string.
    pub fn get_int(&self, key: &str, default: i64) -> Result<i64, Errors> {
        match self.read(key) {
            None => Ok(default),
            Some(Value::Integer(i)) => Ok(i),
            Some(Value::String(s)) => s.trim().parse().map_err(|e| Errors::InvalidConfig {
                key: key.to_string(),
                reason: format!("{:?} is not an integer: {}", s, e),
            }),
            Some(other) => Err(Errors::InvalidConfig {
                key: key.to_string(),
                reason: format!("expected an integer, found {}", other.type_str()),
            }),
        }
    }

    pub fn get_port(&self, key: &str, default: u16) -> Result<u16, Errors> {
        let port = self.get_int(key, i64::from(default))?;
        match u16::try_from(port) {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(Errors::InvalidConfig {
                key: key.to_string(),
                reason: format!("{} is not a valid port", port),
            }),
        }
    }

    /// Replace `mongodb_host` / `mongodb_port` with `MONGODB_HOST` / `MONGODB_PORT` when set.
    pub fn apply_env_overrides(&self) {
        for key in ENV_KEYS {
            if let Ok(value) = env::var(key.to_uppercase()) {
                debug!("Overriding {} from the environment", key);
                self.put(key, value);
            }
        }
    }

    fn read(&self, key: &str) -> Option<Value> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }
}

//! Lazily opened, process-wide MongoDB connection with collection lookup.
//!
//! ```ignore
//! use std::sync::Arc;
//! use mongodb::bson::Document;
//! use mongodb_util::{Config, ConnectionRegistry};
//!
//! let config = Arc::new(Config::new());
//! config.put("mongodb_host", "dbhost");
//!
//! let registry = ConnectionRegistry::new(config);
//! let users = registry.get_collection::<Document>("mydb", "users").await?;
//! ```

pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod models;
pub mod repository;

pub use config::Config;
pub use database::{get_collection, get_connection, ConnectionRegistry, DbSingleton};
pub use errors::Errors;
pub use repository::MongoRepo;

pub mod connector;
pub mod db;

#[cfg(test)]
pub(crate) mod testing;

pub use connector::{ConnectSettings, Connector, MongoConnector};
pub use db::{get_collection, get_connection, ConnectionRegistry, DbSingleton};

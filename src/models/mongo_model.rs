use serde::de::DeserializeOwned;
use serde::Serialize;

/// Anything that can live in a collection handed out by a `MongoRepo`.
pub trait MongoModel: Serialize + DeserializeOwned + Unpin + Send + Sync {}

impl<T> MongoModel for T where T: Serialize + DeserializeOwned + Unpin + Send + Sync {}

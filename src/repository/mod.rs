pub mod repo;

pub use repo::{index_model, MongoRepo, SortOrder};

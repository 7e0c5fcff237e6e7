use futures::stream::StreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{
    CountOptions, DeleteOptions, FindOneAndUpdateOptions, FindOneOptions, FindOptions,
    IndexOptions, InsertManyOptions, InsertOneOptions, ReplaceOptions, UpdateOptions,
};
use mongodb::results::{
    CreateIndexResult, DeleteResult, InsertManyResult, InsertOneResult, UpdateResult,
};
use mongodb::{error::Result, Collection, IndexModel};

use crate::database::db::ConnectionRegistry;
use crate::errors::Errors;
use crate::models::mongo_model::MongoModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Build an index over `keys`, optionally under an explicit name.
pub fn index_model(keys: &[(&str, SortOrder)], name: Option<&str>) -> IndexModel {
    let mut spec = Document::new();
    for (field, order) in keys {
        spec.insert(*field, order.as_i32());
    }

    let options = name.map(|name| IndexOptions::builder().name(name.to_string()).build());
    IndexModel::builder().keys(spec).options(options).build()
}

/// Thin typed handle over one collection. Every call goes straight to the driver.
pub struct MongoRepo<T: MongoModel> {
    pub col: Collection<T>,
}

impl<T: MongoModel> MongoRepo<T> {
    pub async fn init(
        registry: &ConnectionRegistry,
        database_name: &str,
        collection_name: &str,
    ) -> std::result::Result<Self, Errors> {
        let col = registry.get_collection(database_name, collection_name).await?;
        Ok(MongoRepo { col })
    }

    pub fn from_collection(col: Collection<T>) -> Self {
        MongoRepo { col }
    }

    pub async fn insert(
        &self,
        entity: &T,
        options: impl Into<Option<InsertOneOptions>>,
    ) -> Result<InsertOneResult> {
        self.col.insert_one(entity, options).await
    }

    pub async fn insert_many(
        &self,
        entities: &[T],
        options: impl Into<Option<InsertManyOptions>>,
    ) -> Result<InsertManyResult> {
        self.col.insert_many(entities, options).await
    }

    pub async fn find(&self, filter: impl Into<Option<Document>>) -> Result<Vec<T>> {
        self.find_with_options(filter, None).await
    }

    /// `options` carries sort, limit, skip and projection.
    pub async fn find_with_options(
        &self,
        filter: impl Into<Option<Document>>,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Vec<T>> {
        let mut cursor = self.col.find(filter, options).await?;
        let mut results = Vec::new();

        while let Some(result) = cursor.next().await {
            results.push(result?);
        }

        Ok(results)
    }

    pub async fn find_all(&self) -> Result<Vec<T>> {
        self.find(None).await
    }

    pub async fn find_one(
        &self,
        filter: impl Into<Option<Document>>,
        options: impl Into<Option<FindOneOptions>>,
    ) -> Result<Option<T>> {
        self.col.find_one(filter, options).await
    }

    pub async fn count(
        &self,
        filter: impl Into<Option<Document>>,
        options: impl Into<Option<CountOptions>>,
    ) -> Result<u64> {
        self.col.count_documents(filter, options).await
    }

    pub async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<UpdateResult> {
        self.col.update_one(filter, update, options).await
    }

    pub async fn update_many(
        &self,
        filter: Document,
        update: Document,
        options: impl Into<Option<UpdateOptions>>,
    ) -> Result<UpdateResult> {
        self.col.update_many(filter, update, options).await
    }

    /// Apply `update`, inserting a new document when nothing matches.
    pub async fn upsert(&self, filter: Document, update: Document) -> Result<UpdateResult> {
        let options = UpdateOptions::builder().upsert(true).build();
        self.col.update_one(filter, update, options).await
    }

    pub async fn replace(
        &self,
        filter: Document,
        replacement: &T,
        options: impl Into<Option<ReplaceOptions>>,
    ) -> Result<UpdateResult> {
        self.col.replace_one(filter, replacement, options).await
    }

    pub async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
        options: impl Into<Option<FindOneAndUpdateOptions>>,
    ) -> Result<Option<T>> {
        self.col.find_one_and_update(filter, update, options).await
    }

    pub async fn delete_one(
        &self,
        filter: Document,
        options: impl Into<Option<DeleteOptions>>,
    ) -> Result<DeleteResult> {
        self.col.delete_one(filter, options).await
    }

    pub async fn delete_many(
        &self,
        filter: Document,
        options: impl Into<Option<DeleteOptions>>,
    ) -> Result<DeleteResult> {
        self.col.delete_many(filter, options).await
    }

    pub async fn delete_all(&self) -> Result<DeleteResult> {
        self.col.delete_many(doc! {}, None).await
    }

    pub async fn create_index(&self, field: &str) -> Result<CreateIndexResult> {
        self.col
            .create_index(index_model(&[(field, SortOrder::Ascending)], None), None)
            .await
    }

    pub async fn create_named_index(&self, field: &str, name: &str) -> Result<CreateIndexResult> {
        self.col
            .create_index(index_model(&[(field, SortOrder::Ascending)], Some(name)), None)
            .await
    }

    pub async fn create_compound_index(
        &self,
        keys: &[(&str, SortOrder)],
        name: Option<&str>,
    ) -> Result<CreateIndexResult> {
        self.col.create_index(index_model(keys, name), None).await
    }

    pub async fn drop_index(&self, name: &str) -> Result<()> {
        self.col.drop_index(name, None).await
    }

    pub async fn drop_indexes(&self) -> Result<()> {
        self.col.drop_indexes(None).await
    }

    pub async fn list_index_names(&self) -> Result<Vec<String>> {
        self.col.list_index_names().await
    }
}

//! Collection repository for all MongoDB operations on the `collections`
//! collection.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::IndexOptions;
use mongodb::results::UpdateResult;
use mongodb::{Collection as MongoCollection, Database, IndexModel};

use crate::constants::{COLLECTION_COLLECTIONS, ENTITY_COLLECTION};
use crate::errors::StoreError;
use crate::models::{Collection, CollectionQuery, FIELD_DATE_CREATED, FIELD_UUID};

/// Repository for collection-record database operations.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    collection: MongoCollection<Document>,
}

impl CollectionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_COLLECTIONS),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), StoreError> {
        info!("Creating indexes for {} collection", COLLECTION_COLLECTIONS);

        let index = IndexModel::builder()
            .keys(doc! { FIELD_UUID: 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("uuid_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        Ok(())
    }

    pub async fn insert(&self, record: &Collection) -> Result<(), StoreError> {
        debug!("Repository: Inserting collection {}", record.uuid);
        self.collection
            .insert_one(record.to_document())
            .await
            .map_err(|e| StoreError::from_write(e, ENTITY_COLLECTION, record.uuid.clone()))?;
        Ok(())
    }

    pub async fn find_one(&self, query: &CollectionQuery) -> Result<Option<Collection>, StoreError> {
        debug!("Repository: Finding collection by {:?}", query);
        let found = self.collection.find_one(query.to_filter()).await?;
        Ok(found.as_ref().map(Collection::from_document))
    }

    pub async fn find(&self, query: &CollectionQuery) -> Result<Vec<Collection>, StoreError> {
        debug!("Repository: Listing collections by {:?}", query);
        let cursor = self.collection.find(query.to_filter()).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.iter().map(Collection::from_document).collect())
    }

    pub async fn update(
        &self,
        record: &Collection,
        upsert: bool,
    ) -> Result<UpdateResult, StoreError> {
        debug!(
            "Repository: Updating collection {} (upsert: {})",
            record.uuid, upsert
        );
        self.collection
            .update_one(
                doc! { FIELD_UUID: record.uuid.clone() },
                doc! {
                    "$set": record.to_update_document(),
                    "$setOnInsert": { FIELD_DATE_CREATED: DateTime::now() },
                },
            )
            .upsert(upsert)
            .await
            .map_err(|e| StoreError::from_write(e, ENTITY_COLLECTION, record.uuid.clone()))
    }
}

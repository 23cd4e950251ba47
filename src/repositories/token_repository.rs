//! Token repository for all MongoDB operations related to tokens.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::IndexOptions;
use mongodb::results::UpdateResult;
use mongodb::{Collection, Database, IndexModel};

use crate::constants::{COLLECTION_TOKENS, ENTITY_TOKEN};
use crate::errors::StoreError;
use crate::models::token::{FIELD_CONTRACT_ADDRESS, FIELD_TOKEN_ID};
use crate::models::{Token, TokenQuery, FIELD_DATE_CREATED, FIELD_UUID};

/// Repository for token-related database operations.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    collection: Collection<Document>,
}

impl TokenRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_TOKENS),
        }
    }

    /// Unique index on `uuid` and on the (`contractAddress`, `id`) pair.
    pub async fn create_indexes(&self) -> Result<(), StoreError> {
        info!("Creating indexes for {} collection", COLLECTION_TOKENS);

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { FIELD_UUID: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uuid_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { FIELD_CONTRACT_ADDRESS: 1, FIELD_TOKEN_ID: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("contract_token_unique".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    pub async fn insert(&self, token: &Token) -> Result<(), StoreError> {
        debug!("Repository: Inserting token {}", token.uuid);
        self.collection
            .insert_one(token.to_document())
            .await
            .map_err(|e| StoreError::from_write(e, ENTITY_TOKEN, token.natural_key()))?;
        Ok(())
    }

    pub async fn find_one(&self, query: &TokenQuery) -> Result<Option<Token>, StoreError> {
        debug!("Repository: Finding token by {}", query.describe());
        let found = self.collection.find_one(query.to_filter()).await?;
        Ok(found.as_ref().map(Token::from_document))
    }

    pub async fn find(&self, query: &TokenQuery) -> Result<Vec<Token>, StoreError> {
        debug!("Repository: Listing tokens by {}", query.describe());
        let cursor = self.collection.find(query.to_filter()).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.iter().map(Token::from_document).collect())
    }

    pub async fn update(&self, token: &Token, upsert: bool) -> Result<UpdateResult, StoreError> {
        debug!(
            "Repository: Updating token {} (upsert: {})",
            token.uuid, upsert
        );
        self.collection
            .update_one(
                doc! { FIELD_UUID: token.uuid.clone() },
                doc! {
                    "$set": token.to_update_document(),
                    "$setOnInsert": { FIELD_DATE_CREATED: DateTime::now() },
                },
            )
            .upsert(upsert)
            .await
            .map_err(|e| StoreError::from_write(e, ENTITY_TOKEN, token.natural_key()))
    }
}

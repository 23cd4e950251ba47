//! User repository for all MongoDB operations related to users.
//!
//! This repository encapsulates all database access logic for the users
//! collection, providing a clean interface for the store facade.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::IndexOptions;
use mongodb::results::UpdateResult;
use mongodb::{Collection, Database, IndexModel};

use crate::constants::{COLLECTION_USERS, ENTITY_USER};
use crate::errors::StoreError;
use crate::models::user::{FIELD_CODE_HASH, FIELD_LAST_SENT_CODE, FIELD_PENDING_CODE, FIELD_PHONE};
use crate::models::{User, UserQuery, FIELD_DATE_CREATED, FIELD_UUID};
use crate::utils::mask_phone;

/// Repository for user-related database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    collection: Collection<Document>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_USERS),
        }
    }

    /// Create the unique indexes backing the uuid and phone checks.
    pub async fn create_indexes(&self) -> Result<(), StoreError> {
        info!("Creating indexes for {} collection", COLLECTION_USERS);

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
                .keys(doc! { FIELD_PHONE: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("phone_unique".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    pub async fn insert(&self, user: &User) -> Result<(), StoreError> {
        debug!("Repository: Inserting user {}", user.uuid);
        self.collection
            .insert_one(user.to_document())
            .await
            .map_err(|e| StoreError::from_write(e, ENTITY_USER, mask_phone(&user.phone)))?;
        Ok(())
    }

    pub async fn find_one(&self, query: &UserQuery) -> Result<Option<User>, StoreError> {
        debug!("Repository: Finding user by {}", describe(query));
        let found = self.collection.find_one(query.to_filter()).await?;
        Ok(found.as_ref().map(User::from_document))
    }

    pub async fn find(&self, query: &UserQuery) -> Result<Vec<User>, StoreError> {
        debug!("Repository: Listing users by {}", describe(query));
        let cursor = self.collection.find(query.to_filter()).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.iter().map(User::from_document).collect())
    }

    /// Replace the user's fields keyed by uuid.
    pub async fn update(&self, user: &User, upsert: bool) -> Result<UpdateResult, StoreError> {
        debug!("Repository: Updating user {} (upsert: {})", user.uuid, upsert);
        self.collection
            .update_one(
                doc! { FIELD_UUID: user.uuid.clone() },
                doc! {
                    "$set": user.to_update_document(),
                    "$setOnInsert": { FIELD_DATE_CREATED: DateTime::now() },
                },
            )
            .upsert(upsert)
            .await
            .map_err(|e| StoreError::from_write(e, ENTITY_USER, mask_phone(&user.phone)))
    }

    /// Stamp a new pending code, but only if the previous one was sent before
    /// `cutoff`. Returns the raw result; zero matches means the window is still
    /// open.
    ///
    /// A `lastSentCode` that is neither a date nor a number reads as unset, so
    /// it is overwritten here as well.
    pub async fn stamp_code(
        &self,
        uuid: &str,
        pending_code: &str,
        code_hash: &str,
        sent_at: DateTime,
        cutoff: DateTime,
    ) -> Result<UpdateResult, StoreError> {
        debug!("Repository: Stamping verification code for user {}", uuid);
        let filter = doc! {
            FIELD_UUID: uuid,
            "$or": [
                { FIELD_LAST_SENT_CODE: null },
                { FIELD_LAST_SENT_CODE: { "$lte": cutoff } },
                { FIELD_LAST_SENT_CODE: { "$lte": cutoff.timestamp_millis() } },
                { FIELD_LAST_SENT_CODE: { "$not": { "$type": ["date", "number"] } } },
            ],
        };
        let update = doc! {
            "$set": {
                FIELD_PENDING_CODE: pending_code,
                FIELD_CODE_HASH: code_hash,
                FIELD_LAST_SENT_CODE: sent_at,
            }
        };

        Ok(self.collection.update_one(filter, update).await?)
    }
}

fn describe(query: &UserQuery) -> String {
    match query {
        UserQuery::All => "all".to_string(),
        UserQuery::ByUuid(uuid) => format!("uuid {}", uuid),
        UserQuery::ByPhone(phone) => format!("phone {}", mask_phone(phone)),
    }
}

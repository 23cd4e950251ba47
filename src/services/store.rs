//! Store facade: one MongoDB handle, one method per entity operation.

use log::{debug, info, warn};
use mongodb::bson::{doc, DateTime};
use mongodb::results::UpdateResult;
use mongodb::Client;

use crate::config::Config;
use crate::constants::{
    ENTITY_COLLECTION, ENTITY_CONNECTION, ENTITY_TOKEN, ENTITY_USER, SMS_THROTTLE_WINDOW_MS,
};
use crate::errors::StoreError;
use crate::models::{Collection, CollectionQuery, Token, TokenQuery, User, UserQuery};
use crate::repositories::{CollectionRepository, TokenRepository, UserRepository};
use crate::services::verification::{check_throttle, throttle_cutoff};
use crate::utils::mask_phone;

/// How an update treats a uuid with no stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Fail with `NotFound`.
    Strict,
    /// Create the record.
    Upsert,
}

impl UpdatePolicy {
    fn upsert(self) -> bool {
        self == UpdatePolicy::Upsert
    }

    /// Turn a zero-match strict update into `NotFound`.
    fn check(
        self,
        result: UpdateResult,
        entity: &'static str,
        uuid: &str,
    ) -> Result<UpdateResult, StoreError> {
        if self == UpdatePolicy::Strict && result.matched_count == 0 {
            warn!("Update failed: no {} with uuid {}", entity, uuid);
            return Err(StoreError::not_found(entity, uuid));
        }
        Ok(result)
    }
}

pub const USER_UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Strict;
pub const TOKEN_UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Upsert;
pub const COLLECTION_UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Upsert;

struct Connection {
    client: Client,
    users: UserRepository,
    tokens: TokenRepository,
    collections: CollectionRepository,
}

/// Data-access facade over the `users`, `tokens` and `collections` collections.
///
/// Call [`Store::connect`] once before anything else and [`Store::close`] when
/// done. Every create is a check followed by an insert; the unique indexes set
/// up by `connect` reject whichever writer loses a race.
pub struct Store {
    config: Config,
    connection: Option<Connection>,
}

impl Store {
    /// Validate the config. No network activity happens here.
    pub fn new(config: Config) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            config,
            connection: None,
        })
    }

    /// Build a store from `MONGODB_URI` and `DATABASE_NAME`.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(Config::from_env()?)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the driver session, select the database and ensure indexes.
    pub async fn connect(&mut self) -> Result<(), StoreError> {
        if self.connection.is_some() {
            return Err(StoreError::already_exists(
                ENTITY_CONNECTION,
                self.config.database_name.clone(),
            ));
        }

        info!("Connecting to MongoDB...");
        let client = Client::with_uri_str(&self.config.mongodb_uri).await?;
        let db = client.database(&self.config.database_name);
        db.run_command(doc! { "ping": 1 }).await?;

        let connection = Connection {
            users: UserRepository::new(&db),
            tokens: TokenRepository::new(&db),
            collections: CollectionRepository::new(&db),
            client,
        };
        connection.users.create_indexes().await?;
        connection.tokens.create_indexes().await?;
        connection.collections.create_indexes().await?;

        info!(
            "Connected to MongoDB database '{}'",
            self.config.database_name
        );
        self.connection = Some(connection);
        Ok(())
    }

    /// Shut the driver session down. Fails if `connect` never succeeded.
    pub async fn close(&mut self) -> Result<(), StoreError> {
        let connection = self.connection.take().ok_or(StoreError::Uninitialized)?;
        connection.client.shutdown().await;
        info!("Closed MongoDB connection");
        Ok(())
    }

    fn connection(&self) -> Result<&Connection, StoreError> {
        self.connection.as_ref().ok_or(StoreError::Uninitialized)
    }

    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    /// Insert a new user; the phone number must not be taken.
    pub async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let users = &self.connection()?.users;
        let masked = mask_phone(&user.phone);
        info!("Creating user for phone {}", masked);

        if users
            .find_one(&UserQuery::ByPhone(user.phone.clone()))
            .await?
            .is_some()
        {
            warn!("Create failed: user already exists for phone {}", masked);
            return Err(StoreError::already_exists(ENTITY_USER, masked));
        }

        let mut created = User {
            date_created: Some(DateTime::now()),
            ..user.clone()
        };
        created.ensure_uuid();
        users.insert(&created).await?;
        Ok(created)
    }

    /// Replace an existing user's fields. The user must already exist.
    pub async fn update_user(&self, user: &User) -> Result<UpdateResult, StoreError> {
        let result = self
            .connection()?
            .users
            .update(user, USER_UPDATE_POLICY.upsert())
            .await?;
        USER_UPDATE_POLICY.check(result, ENTITY_USER, &user.uuid)
    }

    pub async fn get_user_by_phone(&self, phone: &str) -> Result<User, StoreError> {
        self.connection()?
            .users
            .find_one(&UserQuery::ByPhone(phone.to_string()))
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY_USER, mask_phone(phone)))
    }

    pub async fn get_user(&self, uuid: &str) -> Result<User, StoreError> {
        self.connection()?
            .users
            .find_one(&UserQuery::ByUuid(uuid.to_string()))
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY_USER, uuid))
    }

    /// Every matching user. Results are not paginated.
    pub async fn list_users(&self, query: &UserQuery) -> Result<Vec<User>, StoreError> {
        self.connection()?.users.find(query).await
    }

    // ---------------------------------------------------------------------
    // Tokens
    // ---------------------------------------------------------------------

    /// Insert a new token; (`contract_address`, `id`) must not be taken.
    pub async fn create_token(&self, token: &Token) -> Result<Token, StoreError> {
        let tokens = &self.connection()?.tokens;
        let key = TokenQuery::ByContractAndId {
            contract_address: token.contract_address.clone(),
            id: token.id.clone(),
        };

        match self.get_token(&key).await {
            Ok(_) => {
                warn!("Create failed: token {} already exists", token.natural_key());
                return Err(StoreError::already_exists(
                    ENTITY_TOKEN,
                    token.natural_key(),
                ));
            }
            Err(StoreError::NotFound { .. }) => {
                debug!("No existing token for {}", token.natural_key());
            }
            Err(e) => return Err(e),
        }

        let mut created = Token {
            date_created: Some(DateTime::now()),
            ..token.clone()
        };
        created.ensure_uuid();
        tokens.insert(&created).await?;
        Ok(created)
    }

    /// Write the token's fields keyed by uuid, creating it if absent.
    pub async fn update_token(&self, token: &Token) -> Result<UpdateResult, StoreError> {
        let result = self
            .connection()?
            .tokens
            .update(token, TOKEN_UPDATE_POLICY.upsert())
            .await?;
        TOKEN_UPDATE_POLICY.check(result, ENTITY_TOKEN, &token.uuid)
    }

    /// First token matching `query`; missing tokens are an error.
    pub async fn get_token(&self, query: &TokenQuery) -> Result<Token, StoreError> {
        self.connection()?
            .tokens
            .find_one(query)
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY_TOKEN, query.describe()))
    }

    /// Every matching token. Results are not paginated.
    pub async fn list_tokens(&self, query: &TokenQuery) -> Result<Vec<Token>, StoreError> {
        self.connection()?.tokens.find(query).await
    }

    // ---------------------------------------------------------------------
    // Collections
    // ---------------------------------------------------------------------

    /// Insert a new collection, generating its uuid if it has none.
    pub async fn create_collection(&self, record: &Collection) -> Result<Collection, StoreError> {
        let collections = &self.connection()?.collections;

        let mut created = record.clone();
        let uuid = created.ensure_uuid().to_string();

        if self.get_collection(&uuid).await?.is_some() {
            warn!("Create failed: collection {} already exists", uuid);
            return Err(StoreError::already_exists(ENTITY_COLLECTION, uuid));
        }

        created.date_created = Some(DateTime::now());
        collections.insert(&created).await?;
        Ok(created)
    }

    /// Write the collection's fields keyed by uuid, creating it if absent.
    pub async fn update_collection(
        &self,
        record: &Collection,
    ) -> Result<UpdateResult, StoreError> {
        let result = self
            .connection()?
            .collections
            .update(record, COLLECTION_UPDATE_POLICY.upsert())
            .await?;
        COLLECTION_UPDATE_POLICY.check(result, ENTITY_COLLECTION, &record.uuid)
    }

    /// Collection by uuid. Absence is not an error here, unlike tokens.
    pub async fn get_collection(&self, uuid: &str) -> Result<Option<Collection>, StoreError> {
        self.connection()?
            .collections
            .find_one(&CollectionQuery::ByUuid(uuid.to_string()))
            .await
    }

    /// Every matching collection. Results are not paginated.
    pub async fn list_collections(
        &self,
        query: &CollectionQuery,
    ) -> Result<Vec<Collection>, StoreError> {
        self.connection()?.collections.find(query).await
    }

    // ---------------------------------------------------------------------
    // SMS verification
    // ---------------------------------------------------------------------

    /// Record a freshly sent SMS code for `phone`, creating the user on first
    /// contact.
    ///
    /// Fails with `Throttled` if the previous code went out less than 60
    /// seconds ago. The write itself is conditional on the same window, so
    /// two concurrent requests cannot both succeed.
    pub async fn create_sms_token_for(
        &self,
        phone: &str,
        pending_code: &str,
        code_hash: &str,
    ) -> Result<User, StoreError> {
        let masked = mask_phone(phone);

        let user = match self.get_user_by_phone(phone).await {
            Ok(user) => user,
            Err(StoreError::NotFound { .. }) => {
                debug!("No user for phone {}, creating one", masked);
                match self.create_user(&User::new(phone)).await {
                    Ok(user) => user,
                    // A concurrent first contact created it first.
                    Err(StoreError::AlreadyExists { .. }) => {
                        debug!("User for phone {} created concurrently", masked);
                        self.get_user_by_phone(phone).await?
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        let now = DateTime::now();
        check_throttle(user.last_sent_code, now).inspect_err(|_| {
            warn!("SMS code rejected for phone {}: sent too recently", masked);
        })?;

        let result = self
            .connection()?
            .users
            .stamp_code(&user.uuid, pending_code, code_hash, now, throttle_cutoff(now))
            .await?;

        if result.matched_count == 0 {
            warn!(
                "SMS code rejected for phone {}: concurrent request won",
                masked
            );
            // Another writer stamped a code between our read and write.
            let latest = self.get_user(&user.uuid).await?;
            check_throttle(latest.last_sent_code, now)?;
            return Err(StoreError::Throttled {
                retry_after_ms: SMS_THROTTLE_WINDOW_MS,
            });
        }

        info!("Stored new SMS code for phone {}", masked);
        Ok(User {
            pending_code: pending_code.to_string(),
            code_hash: code_hash.to_string(),
            last_sent_code: Some(now),
            ..user
        })
    }

    /// Check `code` against the user's pending code.
    pub async fn verify_sms_code(&self, phone: &str, code: &str) -> Result<bool, StoreError> {
        let user = self.get_user_by_phone(phone).await?;
        Ok(user.verify(code))
    }
}

//! Error message constants and environment variable names.

// Environment variables
pub const ENV_MONGODB_URI: &str = "MONGODB_URI";
pub const ENV_DATABASE_NAME: &str = "DATABASE_NAME";

// Entity labels used in error messages
pub const ENTITY_USER: &str = "user";
pub const ENTITY_TOKEN: &str = "token";
pub const ENTITY_COLLECTION: &str = "collection";
pub const ENTITY_CONNECTION: &str = "connection";

// Messages
pub const ERR_UNINITIALIZED: &str = "Store used before connect() or after close()";

/// MongoDB server error code for a unique index violation.
pub const MONGO_DUPLICATE_KEY: i32 = 11000;

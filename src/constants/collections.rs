//! MongoDB collection names.

pub const COLLECTION_USERS: &str = "users";
pub const COLLECTION_TOKENS: &str = "tokens";
pub const COLLECTION_COLLECTIONS: &str = "collections";

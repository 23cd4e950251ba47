//! Repository layer for database operations.
//!
//! One repository per MongoDB collection. Repositories translate typed records
//! and queries into driver calls; the existence checks and update policies
//! live in the store facade.

pub mod collection_repository;
pub mod token_repository;
pub mod user_repository;

pub use collection_repository::CollectionRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

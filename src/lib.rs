//! MongoDB data-access layer for users, tokens and collections, with a small
//! SMS verification-code workflow built on the user record.
//!
//! ```no_run
//! # async fn run() -> Result<(), mint_store::StoreError> {
//! use mint_store::services::verification::{generate_code, hash_code};
//! use mint_store::Store;
//!
//! let mut store = Store::from_env()?;
//! store.connect().await?;
//!
//! let code = generate_code();
//! store
//!     .create_sms_token_for("+15550001111", &code, &hash_code(&code))
//!     .await?;
//! assert!(store.verify_sms_code("+15550001111", &code).await?);
//!
//! store.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

pub use config::Config;
pub use errors::{ErrorKind, StoreError};
pub use models::{Collection, CollectionQuery, Token, TokenQuery, User, UserQuery};
pub use services::Store;

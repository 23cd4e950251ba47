use std::env;

use crate::constants::{ENV_DATABASE_NAME, ENV_MONGODB_URI};
use crate::errors::StoreError;

/// Connection settings for the store. Both values are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mongodb_uri: String,
    pub database_name: String,
}

impl Config {
    /// Build a config from explicit values, rejecting blank ones.
    pub fn new(
        mongodb_uri: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let config = Self {
            mongodb_uri: mongodb_uri.into(),
            database_name: database_name.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read `MONGODB_URI` and `DATABASE_NAME`, loading `.env` first if present.
    pub fn from_env() -> Result<Self, StoreError> {
        dotenv::dotenv().ok();

        Ok(Self {
            mongodb_uri: required_var(ENV_MONGODB_URI)?,
            database_name: required_var(ENV_DATABASE_NAME)?,
        })
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.mongodb_uri.trim().is_empty() {
            return Err(StoreError::MissingRequiredEnvVar(ENV_MONGODB_URI));
        }
        if self.database_name.trim().is_empty() {
            return Err(StoreError::MissingRequiredEnvVar(ENV_DATABASE_NAME));
        }
        Ok(())
    }
}

fn required_var(name: &'static str) -> Result<String, StoreError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StoreError::MissingRequiredEnvVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_new_accepts_both_values() {
        let config = Config::new("mongodb://localhost:27017", "mint").unwrap();
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "mint");
    }

    #[test]
    fn test_new_rejects_empty_uri() {
        let err = Config::new("", "mint").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredEnvVar);
        assert!(matches!(err, StoreError::MissingRequiredEnvVar("MONGODB_URI")));
    }

    #[test]
    fn test_new_rejects_blank_database_name() {
        let err = Config::new("mongodb://localhost:27017", "   ").unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingRequiredEnvVar("DATABASE_NAME")
        ));
    }

    #[test]
    fn test_required_var_missing() {
        let err = required_var("MINT_STORE_TEST_UNSET_VARIABLE").unwrap_err();
        assert_eq!(err.code(), "MISSING_REQUIRED_ENV_VAR");
    }
}

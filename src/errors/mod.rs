use mongodb::error::{ErrorKind as MongoErrorKind, WriteFailure};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    CODE_ALREADY_EXISTS, CODE_DATABASE_ERROR, CODE_MISSING_REQUIRED_ENV_VAR, CODE_NOT_FOUND,
    CODE_THROTTLED, CODE_UNINITIALIZED, ERR_UNINITIALIZED, MONGO_DUPLICATE_KEY,
};

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingRequiredEnvVar,
    NotFound,
    AlreadyExists,
    Throttled,
    Database,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingRequiredEnvVar => write!(f, "missing_required_env_var"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::AlreadyExists => write!(f, "already_exists"),
            ErrorKind::Throttled => write!(f, "throttled"),
            ErrorKind::Database => write!(f, "database"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A required configuration value is absent or blank.
    #[error("Missing required environment variable: {0}")]
    MissingRequiredEnvVar(&'static str),

    /// The operation expected an existing record and found none.
    #[error("No {entity} found for {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{}", ERR_UNINITIALIZED)]
    Uninitialized,

    /// A create found a conflicting record, or a unique index rejected the write.
    #[error("A {entity} already exists for {key}")]
    AlreadyExists { entity: &'static str, key: String },

    #[error("Verification code sent too recently, retry in {retry_after_ms}ms")]
    Throttled { retry_after_ms: i64 },

    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::MissingRequiredEnvVar(_) => ErrorKind::MissingRequiredEnvVar,
            StoreError::NotFound { .. } | StoreError::Uninitialized => ErrorKind::NotFound,
            StoreError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            StoreError::Throttled { .. } => ErrorKind::Throttled,
            StoreError::Database(_) => ErrorKind::Database,
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::MissingRequiredEnvVar(_) => CODE_MISSING_REQUIRED_ENV_VAR,
            StoreError::NotFound { .. } => CODE_NOT_FOUND,
            StoreError::Uninitialized => CODE_UNINITIALIZED,
            StoreError::AlreadyExists { .. } => CODE_ALREADY_EXISTS,
            StoreError::Throttled { .. } => CODE_THROTTLED,
            StoreError::Database(_) => CODE_DATABASE_ERROR,
        }
    }

    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn already_exists(entity: &'static str, key: impl Into<String>) -> Self {
        StoreError::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    /// Translate a unique index violation into `AlreadyExists`; every other
    /// driver error is passed through untouched.
    pub(crate) fn from_write(
        err: mongodb::error::Error,
        entity: &'static str,
        key: impl Into<String>,
    ) -> Self {
        if is_duplicate_key(&err) {
            StoreError::already_exists(entity, key)
        } else {
            StoreError::Database(err)
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        MongoErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == MONGO_DUPLICATE_KEY
        }
        _ => false,
    }
}

use mongodb::bson::{doc, DateTime, Document};

use crate::models::{generate_uuid, read_datetime, read_string, FIELD_DATE_CREATED, FIELD_UUID};
use crate::services::verification::hash_code;

pub const FIELD_PHONE: &str = "phone";
pub const FIELD_PENDING_CODE: &str = "pendingCode";
pub const FIELD_CODE_HASH: &str = "codeHash";
pub const FIELD_LAST_SENT_CODE: &str = "lastSentCode";

/// User document stored in MongoDB.
///
/// A user carries at most one pending verification code at a time; issuing a
/// new one overwrites `pending_code`, `code_hash` and `last_sent_code`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub uuid: String,
    pub phone: String,
    pub pending_code: String,
    pub code_hash: String,
    pub last_sent_code: Option<DateTime>,
    pub date_created: Option<DateTime>,
}

impl User {
    /// A fresh user for `phone` with no pending code.
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            uuid: generate_uuid(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    /// Assign a uuid if the caller did not supply one.
    pub fn ensure_uuid(&mut self) -> &str {
        if self.uuid.is_empty() {
            self.uuid = generate_uuid();
        }
        &self.uuid
    }

    /// Rebuild a user from a stored document, defaulting absent fields.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            uuid: read_string(doc, FIELD_UUID),
            phone: read_string(doc, FIELD_PHONE),
            pending_code: read_string(doc, FIELD_PENDING_CODE),
            code_hash: read_string(doc, FIELD_CODE_HASH),
            last_sent_code: read_datetime(doc, FIELD_LAST_SENT_CODE),
            date_created: read_datetime(doc, FIELD_DATE_CREATED),
        }
    }

    /// Fields written on every update. `dateCreated` is never part of it.
    pub fn to_update_document(&self) -> Document {
        let mut doc = doc! {
            FIELD_UUID: self.uuid.clone(),
            FIELD_PHONE: self.phone.clone(),
            FIELD_PENDING_CODE: self.pending_code.clone(),
            FIELD_CODE_HASH: self.code_hash.clone(),
        };
        if let Some(last_sent) = self.last_sent_code {
            doc.insert(FIELD_LAST_SENT_CODE, last_sent);
        }
        doc
    }

    /// Full document written on insert.
    pub fn to_document(&self) -> Document {
        let mut doc = self.to_update_document();
        if let Some(created) = self.date_created {
            doc.insert(FIELD_DATE_CREATED, created);
        }
        doc
    }

    /// Check a submitted code against the pending one.
    ///
    /// Both the raw code and its hash must match what is stored.
    pub fn verify(&self, code: &str) -> bool {
        if self.pending_code.is_empty() || self.code_hash.is_empty() {
            return false;
        }
        code == self.pending_code && hash_code(code) == self.code_hash
    }
}

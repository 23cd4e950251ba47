//! Record types and the typed queries used to look them up.
//!
//! Each record maps to and from a raw `Document` field by field. Reads are
//! tolerant: an absent or mistyped field becomes the default value.

pub mod collection;
pub mod query;
pub mod token;
pub mod user;

pub use collection::Collection;
pub use query::{CollectionQuery, TokenQuery, UserQuery};
pub use token::Token;
pub use user::User;

use mongodb::bson::{Bson, DateTime, Document};
use uuid::Uuid;

// Field names shared by every record
pub const FIELD_ID: &str = "_id";
pub const FIELD_UUID: &str = "uuid";
pub const FIELD_DATE_CREATED: &str = "dateCreated";

/// Generate a fresh random identifier for a new record.
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Read a string field, defaulting to empty.
pub(crate) fn read_string(doc: &Document, key: &str) -> String {
    doc.get_str(key).map(str::to_string).unwrap_or_default()
}

/// Read a field as text, accepting numbers stored by older writers.
pub(crate) fn read_text(doc: &Document, key: &str) -> String {
    match doc.get(key) {
        Some(Bson::String(s)) => s.clone(),
        Some(Bson::Int32(n)) => n.to_string(),
        Some(Bson::Int64(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Read a timestamp stored either as a BSON date or as epoch milliseconds.
pub(crate) fn read_datetime(doc: &Document, key: &str) -> Option<DateTime> {
    match doc.get(key)? {
        Bson::DateTime(dt) => Some(*dt),
        Bson::Int64(ms) => Some(DateTime::from_millis(*ms)),
        Bson::Int32(ms) => Some(DateTime::from_millis(i64::from(*ms))),
        Bson::Double(ms) if ms.is_finite() => Some(DateTime::from_millis(*ms as i64)),
        _ => None,
    }
}

/// Copy caller-supplied fields, dropping anything that would shadow a typed field.
pub(crate) fn extra_fields(source: &Document, reserved: &[&str]) -> Document {
    source
        .iter()
        .filter(|(key, _)| key.as_str() != FIELD_ID && !reserved.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

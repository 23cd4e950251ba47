use mongodb::bson::{DateTime, Document};

use crate::models::{
    extra_fields, generate_uuid, read_datetime, read_string, read_text, FIELD_DATE_CREATED,
    FIELD_UUID,
};

pub const FIELD_CONTRACT_ADDRESS: &str = "contractAddress";
pub const FIELD_TOKEN_ID: &str = "id";
pub const FIELD_SEQUENCE: &str = "sequence";

const RESERVED_FIELDS: [&str; 5] = [
    FIELD_UUID,
    FIELD_CONTRACT_ADDRESS,
    FIELD_TOKEN_ID,
    FIELD_SEQUENCE,
    FIELD_DATE_CREATED,
];

/// Token document stored in MongoDB.
///
/// A token is identified by `uuid`, and also by the pair
/// (`contract_address`, `id`). `sequence` is kept as text so large on-chain
/// numbers survive without precision loss.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    pub uuid: String,
    pub contract_address: String,
    pub id: String,
    pub sequence: String,
    pub date_created: Option<DateTime>,
    /// Caller-supplied fields stored alongside the typed ones.
    pub extra: Document,
}

impl Token {
    pub fn new(
        contract_address: impl Into<String>,
        id: impl Into<String>,
        sequence: impl ToString,
    ) -> Self {
        Self {
            uuid: generate_uuid(),
            contract_address: contract_address.into(),
            id: id.into(),
            sequence: sequence.to_string(),
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, extra: Document) -> Self {
        self.extra = extra_fields(&extra, &RESERVED_FIELDS);
        self
    }

    /// Assign a uuid if the caller did not supply one.
    pub fn ensure_uuid(&mut self) -> &str {
        if self.uuid.is_empty() {
            self.uuid = generate_uuid();
        }
        &self.uuid
    }

    pub fn from_document(doc: &Document) -> Self {
        Self {
            uuid: read_string(doc, FIELD_UUID),
            contract_address: read_string(doc, FIELD_CONTRACT_ADDRESS),
            id: read_text(doc, FIELD_TOKEN_ID),
            sequence: read_text(doc, FIELD_SEQUENCE),
            date_created: read_datetime(doc, FIELD_DATE_CREATED),
            extra: extra_fields(doc, &RESERVED_FIELDS),
        }
    }

    /// Fields written on every update, caller fields first so typed ones win.
    pub fn to_update_document(&self) -> Document {
        let mut doc = extra_fields(&self.extra, &RESERVED_FIELDS);
        doc.insert(FIELD_UUID, self.uuid.clone());
        doc.insert(FIELD_CONTRACT_ADDRESS, self.contract_address.clone());
        doc.insert(FIELD_TOKEN_ID, self.id.clone());
        doc.insert(FIELD_SEQUENCE, self.sequence.clone());
        doc
    }

    pub fn to_document(&self) -> Document {
        let mut doc = self.to_update_document();
        if let Some(created) = self.date_created {
            doc.insert(FIELD_DATE_CREATED, created);
        }
        doc
    }

    /// Composite natural key, used in logs and error messages.
    pub fn natural_key(&self) -> String {
        format!("{}/{}", self.contract_address, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_sequence_is_text() {
        let token = Token::new("0xabc", "7", 18_446_744_073_709_551_615_u64);
        assert_eq!(token.sequence, "18446744073709551615");
        assert_eq!(
            token.to_document().get_str("sequence").unwrap(),
            "18446744073709551615"
        );
    }

    #[test]
    fn test_from_document_keeps_caller_fields() {
        let token = Token::from_document(&doc! {
            "_id": mongodb::bson::oid::ObjectId::new(),
            "uuid": "t-1",
            "contractAddress": "0xabc",
            "id": "7",
            "sequence": 42_i64,
            "owner": "0xdef",
        });
        assert_eq!(token.uuid, "t-1");
        assert_eq!(token.sequence, "42");
        assert_eq!(token.extra, doc! { "owner": "0xdef" });
        assert!(token.date_created.is_none());
    }

    #[test]
    fn test_caller_fields_cannot_override_typed_fields() {
        let mut token = Token::new("0xabc", "7", 1);
        token.extra = doc! { "uuid": "hijacked", "sequence": "999", "owner": "0xdef" };

        let doc = token.to_update_document();
        assert_eq!(doc.get_str("uuid").unwrap(), token.uuid);
        assert_eq!(doc.get_str("sequence").unwrap(), "1");
        assert_eq!(doc.get_str("owner").unwrap(), "0xdef");
        assert!(!doc.contains_key("dateCreated"));
    }

    #[test]
    fn test_ensure_uuid_fills_blank_token() {
        let mut token = Token {
            contract_address: "0xabc".to_string(),
            id: "7".to_string(),
            ..Default::default()
        };
        let uuid = token.ensure_uuid().to_string();
        assert!(!uuid.is_empty());
        assert_eq!(token.ensure_uuid(), uuid);
    }

    #[test]
    fn test_with_extra_strips_reserved() {
        let token = Token::new("0xabc", "7", 1).with_extra(doc! { "_id": 5, "name": "Bolt" });
        assert_eq!(token.extra, doc! { "name": "Bolt" });
        assert_eq!(token.natural_key(), "0xabc/7");
    }
}

use mongodb::bson::{DateTime, Document};

use crate::models::{
    extra_fields, generate_uuid, read_datetime, read_string, FIELD_DATE_CREATED, FIELD_UUID,
};

const RESERVED_FIELDS: [&str; 2] = [FIELD_UUID, FIELD_DATE_CREATED];

/// Collection document stored in MongoDB.
///
/// Apart from `uuid` and `date_created`, every field is caller-defined. An
/// empty `uuid` is filled in when the collection is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub uuid: String,
    pub date_created: Option<DateTime>,
    pub fields: Document,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(fields: Document) -> Self {
        Self {
            fields: extra_fields(&fields, &RESERVED_FIELDS),
            ..Default::default()
        }
    }

    pub fn from_document(doc: &Document) -> Self {
        Self {
            uuid: read_string(doc, FIELD_UUID),
            date_created: read_datetime(doc, FIELD_DATE_CREATED),
            fields: extra_fields(doc, &RESERVED_FIELDS),
        }
    }

    /// Assign a uuid if the caller did not supply one.
    pub fn ensure_uuid(&mut self) -> &str {
        if self.uuid.is_empty() {
            self.uuid = generate_uuid();
        }
        &self.uuid
    }

    pub fn to_update_document(&self) -> Document {
        let mut doc = extra_fields(&self.fields, &RESERVED_FIELDS);
        doc.insert(FIELD_UUID, self.uuid.clone());
        doc
    }

    pub fn to_document(&self) -> Document {
        let mut doc = self.to_update_document();
        if let Some(created) = self.date_created {
            doc.insert(FIELD_DATE_CREATED, created);
        }
        doc
    }
}

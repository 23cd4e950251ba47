//! Typed lookups, each translated into a MongoDB filter document.

use mongodb::bson::{doc, Bson, Document};

use crate::models::token::{FIELD_CONTRACT_ADDRESS, FIELD_TOKEN_ID};
use crate::models::user::FIELD_PHONE;
use crate::models::FIELD_UUID;

#[derive(Debug, Clone, PartialEq)]
pub enum UserQuery {
    All,
    ByUuid(String),
    ByPhone(String),
}

impl UserQuery {
    pub fn to_filter(&self) -> Document {
        match self {
            UserQuery::All => doc! {},
            UserQuery::ByUuid(uuid) => doc! { FIELD_UUID: uuid.clone() },
            UserQuery::ByPhone(phone) => doc! { FIELD_PHONE: phone.clone() },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenQuery {
    All,
    ByUuid(String),
    ByContract(String),
    ByContractAndId {
        contract_address: String,
        id: String,
    },
}

impl TokenQuery {
    pub fn to_filter(&self) -> Document {
        match self {
            TokenQuery::All => doc! {},
            TokenQuery::ByUuid(uuid) => doc! { FIELD_UUID: uuid.clone() },
            TokenQuery::ByContract(address) => doc! { FIELD_CONTRACT_ADDRESS: address.clone() },
            TokenQuery::ByContractAndId {
                contract_address,
                id,
            } => doc! {
                FIELD_CONTRACT_ADDRESS: contract_address.clone(),
                FIELD_TOKEN_ID: id.clone(),
            },
        }
    }

    /// Human-readable key for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenQuery::All => "any token".to_string(),
            TokenQuery::ByUuid(uuid) => uuid.clone(),
            TokenQuery::ByContract(address) => address.clone(),
            TokenQuery::ByContractAndId {
                contract_address,
                id,
            } => format!("{}/{}", contract_address, id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionQuery {
    All,
    ByUuid(String),
    /// Match a caller-defined field exactly.
    ByField { field: String, value: Bson },
}

impl CollectionQuery {
    pub fn to_filter(&self) -> Document {
        match self {
            CollectionQuery::All => doc! {},
            CollectionQuery::ByUuid(uuid) => doc! { FIELD_UUID: uuid.clone() },
            CollectionQuery::ByField { field, value } => {
                let mut filter = Document::new();
                filter.insert(field.clone(), value.clone());
                filter
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_filters() {
        assert_eq!(UserQuery::All.to_filter(), doc! {});
        assert_eq!(
            UserQuery::ByPhone("+15550001111".into()).to_filter(),
            doc! { "phone": "+15550001111" }
        );
    }

    #[test]
    fn test_token_composite_filter() {
        let query = TokenQuery::ByContractAndId {
            contract_address: "0xabc".into(),
            id: "7".into(),
        };
        assert_eq!(
            query.to_filter(),
            doc! { "contractAddress": "0xabc", "id": "7" }
        );
        assert_eq!(query.describe(), "0xabc/7");
    }

    #[test]
    fn test_collection_field_filter() {
        let query = CollectionQuery::ByField {
            field: "name".into(),
            value: Bson::from("Genesis"),
        };
        assert_eq!(query.to_filter(), doc! { "name": "Genesis" });
    }
}

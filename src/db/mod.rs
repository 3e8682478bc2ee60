//! Database layer (document store).

pub mod memory;
pub mod mongo;
pub mod pipeline;
pub mod store;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use pipeline::{Projection, Stage, Sum};
pub use store::{
    DataStore, DeleteResult, FindOptions, InsertOneResult, SortOrder, UpdateOptions, UpdateResult,
};

use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::error::AppError;
use crate::time_utils::bson_datetime_rfc3339;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const BIODATA: &str = "biodata";
    pub const FAVOURITES: &str = "favourites";
    pub const SUCCESS_STORIES: &str = "successStories";
    /// Unlock records (contact-information payments)
    pub const PAYMENTS: &str = "payments";
}

/// Parse a hex document id from a path segment.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(format!("Invalid document id: {}", raw)))
}

/// Render a stored value as plain JSON.
///
/// Object ids become hex strings and dates RFC 3339 strings, matching what a
/// browser client expects from the store-shaped responses.
pub fn bson_to_json(value: Bson) -> serde_json::Value {
    match value {
        Bson::ObjectId(oid) => serde_json::Value::String(oid.to_hex()),
        Bson::DateTime(dt) => bson_datetime_rfc3339(dt)
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => serde_json::Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: Document) -> serde_json::Value {
    serde_json::Value::Object(
        doc.into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

pub fn documents_to_json(docs: Vec<Document>) -> serde_json::Value {
    serde_json::Value::Array(docs.into_iter().map(document_to_json).collect())
}

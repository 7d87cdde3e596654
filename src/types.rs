use crate::errors::ServiceError;
use bson::oid::ObjectId;
use std::fmt;
use std::str::FromStr;

pub type CollectionName = String;

/// Name of the store-assigned identifier field.
pub const ID_FIELD: &str = "_id";
/// Name of the reading timestamp field used by date-range queries.
pub const DATE_FIELD: &str = "date";

/// Length of the external hex form of an identifier.
pub const ID_HEX_LEN: usize = 24;

/// A wrapper around `bson::oid::ObjectId`, the store-assigned document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub ObjectId);

impl DocumentId {
    #[must_use]
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parses the 24-character hex form. Either letter case is accepted.
    ///
    /// # Errors
    /// Returns `InvalidIdentifier` for anything that is not exactly 24 hex digits.
    pub fn parse(s: &str) -> Result<Self, ServiceError> {
        if s.len() != ID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ServiceError::InvalidIdentifier(s.to_string()));
        }
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| ServiceError::InvalidIdentifier(s.to_string()))
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DocumentId {
    type Err = ServiceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<DocumentId> for bson::Bson {
    fn from(id: DocumentId) -> Self {
        Self::ObjectId(id.0)
    }
}

//! Document-store capability consumed by the service.
//!
//! Handlers only ever see `dyn DocumentStore`, so an in-memory fake, the
//! embedded [`MemoryStore`] and any networked backend are interchangeable.

mod memory;

pub use memory::MemoryStore;

use crate::errors::ServiceError;
use crate::query::{Cursor, DeleteReport, Filter, FindOptions};
use crate::types::DocumentId;
use bson::Document as BsonDocument;

pub trait DocumentStore: Send + Sync {
    /// Runs `filter` and returns a lazy cursor in the store's natural order.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` when the store cannot be reached.
    fn find(&self, filter: &Filter, opts: &FindOptions) -> Result<Cursor, ServiceError>;

    /// Removes the first document matching `filter`, if any.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` when the store cannot be reached.
    fn delete_one(&self, filter: &Filter) -> Result<DeleteReport, ServiceError>;

    /// Stores `doc`, assigning a fresh `_id` when the document has none.
    ///
    /// # Errors
    /// Returns `InvalidIdentifier` for a non-ObjectId or duplicate `_id`,
    /// `StoreUnavailable` when the store cannot be reached.
    fn insert_one(&self, doc: BsonDocument) -> Result<DocumentId, ServiceError>;

    /// # Errors
    /// Returns `StoreUnavailable` when the store cannot be reached.
    fn count(&self) -> Result<usize, ServiceError>;
}

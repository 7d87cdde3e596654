use super::DocumentStore;
use crate::errors::ServiceError;
use crate::query::{Cursor, DeleteReport, Filter, FindOptions, eval_filter};
use crate::types::{CollectionName, DocumentId, ID_FIELD};
use bson::{Bson, Document as BsonDocument};
use parking_lot::RwLock;
use std::sync::Arc;

/// Embedded, insertion-ordered document collection.
///
/// Readers take a cheap snapshot (`Arc` clone); writers copy the backing
/// vector only while a cursor still holds the previous snapshot.
pub struct MemoryStore {
    name: CollectionName,
    docs: RwLock<Arc<Vec<BsonDocument>>>,
    online: bool,
}

impl MemoryStore {
    pub fn new(name: impl Into<CollectionName>) -> Self {
        Self { name: name.into(), docs: RwLock::new(Arc::new(Vec::new())), online: true }
    }

    /// A store whose every call fails as if the connection were broken.
    pub fn offline(name: impl Into<CollectionName>) -> Self {
        Self { online: false, ..Self::new(name) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn ensure_online(&self) -> Result<(), ServiceError> {
        if self.online {
            Ok(())
        } else {
            Err(ServiceError::StoreUnavailable(format!("collection `{}` is not connected", self.name)))
        }
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, filter: &Filter, opts: &FindOptions) -> Result<Cursor, ServiceError> {
        self.ensure_online()?;
        let snapshot = Arc::clone(&*self.docs.read());
        log::debug!("find on {}: {} candidates, limit {:?}", self.name, snapshot.len(), opts.limit);
        Ok(Cursor::new(snapshot, filter.clone(), opts))
    }

    fn delete_one(&self, filter: &Filter) -> Result<DeleteReport, ServiceError> {
        self.ensure_online()?;
        let mut guard = self.docs.write();
        let Some(pos) = guard.iter().position(|d| eval_filter(d, filter)) else {
            return Ok(DeleteReport { deleted: 0 });
        };
        Arc::make_mut(&mut *guard).remove(pos);
        Ok(DeleteReport { deleted: 1 })
    }

    fn insert_one(&self, doc: BsonDocument) -> Result<DocumentId, ServiceError> {
        self.ensure_online()?;
        let existing = match doc.get(ID_FIELD) {
            Some(Bson::ObjectId(oid)) => Some(DocumentId(*oid)),
            Some(other) => {
                return Err(ServiceError::InvalidIdentifier(format!("`_id` must be an ObjectId, got {other}")));
            }
            None => None,
        };
        let (id, doc) = match existing {
            Some(id) => (id, doc),
            None => {
                // Identifier goes first, as the store would place it.
                let id = DocumentId::new();
                let mut with_id = BsonDocument::new();
                with_id.insert(ID_FIELD, id);
                for (k, v) in doc {
                    with_id.insert(k, v);
                }
                (id, with_id)
            }
        };
        let mut guard = self.docs.write();
        if guard.iter().any(|d| d.get(ID_FIELD) == Some(&Bson::ObjectId(id.0))) {
            return Err(ServiceError::InvalidIdentifier(format!("duplicate identifier {id}")));
        }
        Arc::make_mut(&mut *guard).push(doc);
        Ok(id)
    }

    fn count(&self) -> Result<usize, ServiceError> {
        self.ensure_online()?;
        Ok(self.docs.read().len())
    }
}

use bson::Document as BsonDocument;
use std::sync::Arc;

use super::eval::eval_filter;
use super::types::{Filter, FindOptions};

/// A forward-only, pull-based cursor over query results.
///
/// The cursor holds a snapshot of the collection taken when the query was
/// issued; documents are matched lazily as the caller advances.
#[derive(Debug, Clone)]
pub struct Cursor {
    source: Arc<Vec<BsonDocument>>,
    filter: Filter,
    pos: usize,
    remaining: Option<usize>,
}

impl Cursor {
    #[must_use]
    pub fn new(source: Arc<Vec<BsonDocument>>, filter: Filter, opts: &FindOptions) -> Self {
        Self { source, filter, pos: 0, remaining: opts.limit }
    }

    /// A cursor that yields exactly the given documents, in order.
    #[must_use]
    pub fn from_documents(docs: Vec<BsonDocument>) -> Self {
        Self::new(Arc::new(docs), Filter::True, &FindOptions::default())
    }

    pub fn advance(&mut self) -> Option<BsonDocument> {
        if self.remaining == Some(0) {
            return None;
        }
        while let Some(doc) = self.source.get(self.pos) {
            self.pos += 1;
            if eval_filter(doc, &self.filter) {
                if let Some(r) = self.remaining.as_mut() {
                    *r -= 1;
                }
                return Some(doc.clone());
            }
        }
        None
    }

    #[must_use]
    pub fn to_vec(self) -> Vec<BsonDocument> {
        self.collect()
    }
}

impl Iterator for Cursor {
    type Item = BsonDocument;
    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

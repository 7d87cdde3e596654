use crate::document::to_canonical_json;
use crate::errors::ServiceError;
use crate::inject::{ErrorParams, inject_errors};
use crate::query::Cursor;
use crate::resolver::{FilterSpec, QueryParams, resolve, resolve_by_id};
use crate::store::DocumentStore;
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;

/// Read/filter/delete operations over one sensor-reading collection.
///
/// The store handle is created once at startup and shared read-only by all
/// requests; nothing here serializes concurrent calls.
#[derive(Clone)]
pub struct PmService {
    store: Arc<dyn DocumentStore>,
}

impl PmService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every document, unmodified.
    ///
    /// # Errors
    /// `StoreUnavailable` when the store call fails.
    pub fn find_all(&self) -> Result<Vec<Value>, ServiceError> {
        Ok(self.fetch(&FilterSpec::All)?.map(|d| to_canonical_json(&d)).collect())
    }

    /// Zero or one document, always as an array.
    ///
    /// # Errors
    /// `InvalidIdentifier` for a malformed id, `StoreUnavailable` when the store call fails.
    pub fn find_by_id(&self, id: &str) -> Result<Vec<Value>, ServiceError> {
        let spec = resolve_by_id(id)?;
        Ok(self.fetch(&spec)?.map(|d| to_canonical_json(&d)).collect())
    }

    /// Filtered query with error simulation, drawing from the thread RNG.
    ///
    /// # Errors
    /// See [`PmService::find_by_params_with`].
    pub fn find_by_params(&self, params: &QueryParams) -> Result<Vec<Value>, ServiceError> {
        self.find_by_params_with(params, &mut rand::rng())
    }

    /// # Errors
    /// `MalformedParameter` for missing or unparsable parameters,
    /// `FieldNotFound` when a document lacks the named measurement,
    /// `StoreUnavailable` when the store call fails.
    pub fn find_by_params_with<R: Rng>(
        &self,
        params: &QueryParams,
        rng: &mut R,
    ) -> Result<Vec<Value>, ServiceError> {
        let error = ErrorParams::from_query(params)?;
        let spec = resolve(params)?;
        let docs = inject_errors(self.fetch(&spec)?, &error, rng)?;
        log::debug!(
            "query {spec:?} rate={} factor={} field={} -> {} docs",
            error.error_rate,
            error.factor,
            error.field_name,
            docs.len()
        );
        Ok(docs)
    }

    /// Deletes by identifier. Reports success whether or not a document
    /// matched; callers cannot tell the two apart.
    ///
    /// # Errors
    /// `InvalidIdentifier` for a malformed id, `StoreUnavailable` when the store call fails.
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let spec = resolve_by_id(id)?;
        let (filter, _) = spec.to_query();
        let report = self.store.delete_one(&filter)?;
        log::info!(target: crate::logger::AUDIT_TARGET, "delete id={id} deleted={}", report.deleted);
        Ok(())
    }

    fn fetch(&self, spec: &FilterSpec) -> Result<Cursor, ServiceError> {
        let (filter, opts) = spec.to_query();
        self.store.find(&filter, &opts).inspect_err(|e| log::error!("store find failed: {e}"))
    }
}

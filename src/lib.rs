pub mod config;
pub mod document;
pub mod errors;
pub mod http;
pub mod import;
pub mod inject;
pub mod logger;
pub mod query;
pub mod resolver;
pub mod service;
pub mod store;
pub mod types;

pub use errors::ServiceError;
pub use inject::{ErrorParams, inject_errors};
pub use resolver::{FilterSpec, QueryParams, resolve, resolve_by_id};
pub use service::PmService;
pub use store::{DocumentStore, MemoryStore};
pub use types::DocumentId;

//! Seeding the store from NDJSON or JSON-array files.

mod extjson;
mod ndjson;
mod options;
mod pipeline;

pub use extjson::{json_to_bson, json_to_document};
pub use ndjson::import_ndjson;
pub use options::{ImportOptions, ImportReport};
pub use pipeline::{import_file, import_from_reader};

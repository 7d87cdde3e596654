use crate::errors::ServiceError;
use crate::store::DocumentStore;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::extjson::json_to_document;
use super::ndjson::import_ndjson;
use super::options::{ImportOptions, ImportReport};

/// Seeds `store` from a file holding either a JSON array or NDJSON.
///
/// # Errors
/// `Io` when the file cannot be opened or a record is malformed.
pub fn import_file(
    store: &dyn DocumentStore,
    path: &Path,
    opts: &ImportOptions,
) -> Result<ImportReport, ServiceError> {
    let file = File::open(path).map_err(|e| ServiceError::Io(format!("{}: {e}", path.display())))?;
    let report = import_from_reader(store, file, opts)?;
    log::info!(
        "seeded {} documents from {} ({} skipped)",
        report.inserted,
        path.display(),
        report.skipped
    );
    Ok(report)
}

/// Sniffs the first non-whitespace byte: `[` means a JSON array, anything
/// else is read line by line.
///
/// # Errors
/// `Io` when reading fails or a record is malformed.
pub fn import_from_reader<R: Read>(
    store: &dyn DocumentStore,
    reader: R,
    opts: &ImportOptions,
) -> Result<ImportReport, ServiceError> {
    let mut reader = BufReader::new(reader);
    let mut report = ImportReport::default();
    let array_mode = loop {
        let chunk = reader.fill_buf()?;
        let Some(&first) = chunk.first() else {
            return Ok(report);
        };
        if first.is_ascii_whitespace() {
            reader.consume(1);
            continue;
        }
        break first == b'[';
    };
    if !array_mode {
        import_ndjson(store, reader, opts, &mut report)?;
        return Ok(report);
    }
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    let items: Vec<serde_json::Value> = serde_json::from_str(&s).map_err(|e| ServiceError::Io(e.to_string()))?;
    for (idx, item) in items.into_iter().enumerate() {
        match json_to_document(item) {
            Ok(doc) => {
                store.insert_one(doc)?;
                report.inserted += 1;
            }
            Err(e) if opts.skip_errors => {
                log::warn!("skipping element {idx}: {e}");
                report.skipped += 1;
            }
            Err(e) => return Err(ServiceError::Io(format!("element {idx}: {e}"))),
        }
    }
    Ok(report)
}

use crate::errors::ServiceError;
use crate::store::DocumentStore;
use std::io::{BufRead, BufReader, Read};

use super::extjson::json_to_document;
use super::options::{ImportOptions, ImportReport};

/// Loads one JSON object per line; blank lines are ignored.
///
/// # Errors
/// `Io` naming the line for an unreadable or malformed record (unless
/// `skip_errors` is set), plus anything the store rejects on insert.
pub fn import_ndjson<R: Read>(
    store: &dyn DocumentStore,
    reader: R,
    opts: &ImportOptions,
    report: &mut ImportReport,
) -> Result<(), ServiceError> {
    let mut reader = BufReader::new(reader);
    let mut line_no: usize = 0;
    let mut buf = String::with_capacity(8 * 1024);
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = serde_json::from_str::<serde_json::Value>(line)
            .map_err(|e| ServiceError::Io(e.to_string()))
            .and_then(json_to_document);
        match parsed {
            Ok(doc) => {
                store.insert_one(doc)?;
                report.inserted += 1;
            }
            Err(e) if opts.skip_errors => {
                log::warn!("skipping line {line_no}: {e}");
                report.skipped += 1;
            }
            Err(e) => return Err(ServiceError::Io(format!("line {line_no}: {e}"))),
        }
    }
    Ok(())
}

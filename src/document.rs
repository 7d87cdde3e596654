//! Canonical JSON rendering of stored documents.
//!
//! Output is relaxed extended JSON with two overrides that hold on every
//! platform: identifiers render as their 24-character hex string and
//! timestamps render as ISO-8601 UTC strings.

use bson::{Bson, Document as BsonDocument};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Renders a stored document as a JSON object, preserving field order.
#[must_use]
pub fn to_canonical_json(doc: &BsonDocument) -> Value {
    Value::Object(to_json_map(doc))
}

/// Same as [`to_canonical_json`] but hands back the object map for callers
/// that keep editing the copy.
#[must_use]
pub fn to_json_map(doc: &BsonDocument) -> Map<String, Value> {
    doc.iter().map(|(k, v)| (k.clone(), bson_to_json(v))).collect()
}

#[must_use]
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => format_datetime(*dt).map_or_else(|| value.clone().into_relaxed_extjson(), Value::String),
        Bson::Document(d) => to_canonical_json(d),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        // Non-finite doubles have no JSON form.
        Bson::Double(f) => Value::from(*f),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.clone().into_relaxed_extjson(),
    }
}

/// ISO-8601 UTC with a `Z` suffix; sub-second digits only when non-zero.
///
/// Returns `None` when the instant is outside the range chrono can represent.
#[must_use]
pub fn format_datetime(dt: bson::DateTime) -> Option<String> {
    chrono::DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

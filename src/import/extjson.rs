use crate::errors::ServiceError;
use bson::oid::ObjectId;
use bson::{Bson, Document as BsonDocument};
use serde_json::{Map, Value};

/// Converts a parsed JSON object into a BSON document.
///
/// # Errors
/// `Io` when the value is not an object or contains a malformed
/// `$oid` / `$date` wrapper.
pub fn json_to_document(value: Value) -> Result<BsonDocument, ServiceError> {
    match json_to_bson(value)? {
        Bson::Document(d) => Ok(d),
        other => Err(invalid(format!("expected a JSON object, got {other}"))),
    }
}

/// Relaxed extended JSON to BSON: `{"$oid": hex}` becomes an ObjectId and
/// `{"$date": millis | iso-8601 | {"$numberLong": s}}` a DateTime. Every other
/// value maps structurally.
///
/// # Errors
/// `Io` for malformed `$oid` / `$date` wrappers.
pub fn json_to_bson(value: Value) -> Result<Bson, ServiceError> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => number_to_bson(&n),
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect::<Result<_, _>>()?),
        Value::Object(map) => object_to_bson(map)?,
    })
}

fn object_to_bson(map: Map<String, Value>) -> Result<Bson, ServiceError> {
    if map.len() == 1 {
        if let Some(Value::String(hex)) = map.get("$oid") {
            return ObjectId::parse_str(hex)
                .map(Bson::ObjectId)
                .map_err(|_| invalid(format!("bad $oid `{hex}`")));
        }
        if let Some(date) = map.get("$date") {
            return parse_date(date).map(Bson::DateTime);
        }
    }
    let mut doc = BsonDocument::new();
    for (k, v) in map {
        doc.insert(k, json_to_bson(v)?);
    }
    Ok(Bson::Document(doc))
}

fn parse_date(v: &Value) -> Result<bson::DateTime, ServiceError> {
    let millis = match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => chrono::DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.timestamp_millis()),
        Value::Object(m) => m.get("$numberLong").and_then(Value::as_str).and_then(|s| s.parse::<i64>().ok()),
        _ => None,
    };
    millis
        .map(bson::DateTime::from_millis)
        .ok_or_else(|| invalid(format!("bad $date `{v}`")))
}

fn number_to_bson(n: &serde_json::Number) -> Bson {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32);
    }
    Bson::Double(n.as_f64().unwrap_or(f64::NAN))
}

fn invalid(msg: String) -> ServiceError {
    ServiceError::Io(msg)
}

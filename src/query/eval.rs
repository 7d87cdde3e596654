use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, MAX_PATH_DEPTH, MAX_PATH_LEN};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Cmp { path, op, value } => get_path(doc, path).is_some_and(|v| match op {
            CmpOp::Eq => v == value,
            CmpOp::Gte => matches!(compare_bson(v, value), Some(Ordering::Greater | Ordering::Equal)),
            CmpOp::Lt => compare_bson(v, value) == Some(Ordering::Less),
        }),
    }
}

fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > MAX_PATH_LEN {
        return None;
    }
    let mut parts = path.split('.');
    let mut cur = doc;
    let mut segs = 0usize;
    let mut next = parts.next();
    while let Some(part) = next {
        segs += 1;
        if segs > MAX_PATH_DEPTH {
            return None;
        }
        let v = cur.get(part)?;
        next = parts.next();
        match (v, next) {
            (_, None) => return Some(v),
            (Bson::Document(d), Some(_)) => cur = d,
            _ => return None,
        }
    }
    None
}

/// Orders two values of compatible type. Values of unrelated types have no
/// ordering and never satisfy a range comparison.
pub fn compare_bson(a: &Bson, b: &Bson) -> Option<Ordering> {
    use bson::Bson as T;
    match (a, b) {
        (T::DateTime(x), T::DateTime(y)) => Some(x.timestamp_millis().cmp(&y.timestamp_millis())),
        (T::ObjectId(x), T::ObjectId(y)) => Some(x.bytes().cmp(&y.bytes())),
        (T::String(x), T::String(y)) => Some(x.cmp(y)),
        (T::Boolean(x), T::Boolean(y)) => Some(x.cmp(y)),
        _ => match (as_f64_num(a), as_f64_num(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_f64_num(x: &Bson) -> Option<f64> {
    match x {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

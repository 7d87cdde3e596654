//! Synthetic measurement-error overlay for the filtered query endpoint.

use crate::document::to_json_map;
use crate::errors::ServiceError;
use crate::resolver::QueryParams;
use bson::Document as BsonDocument;
use rand::Rng;
use serde_json::Value;

pub const PARAM_ERROR: &str = "error";
pub const PARAM_FACTOR: &str = "factor";
pub const PARAM_VALUE: &str = "value";

/// Flag appended to every document that passed through the injector.
pub const HAS_ERROR_FIELD: &str = "hasError";
/// Numeric sub-field of a measurement that gets scaled.
pub const VALUE_FIELD: &str = "value";

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorParams {
    /// Probability in `[0, 1]` that a document is perturbed. Not clamped.
    pub error_rate: f64,
    pub factor: f64,
    pub field_name: String,
}

impl ErrorParams {
    /// Reads `error`, `factor` and `value`; all three are required.
    ///
    /// # Errors
    /// `MalformedParameter` when one is missing or a number does not parse
    /// to a finite value (`inf`, `NaN` and overflowing literals included).
    pub fn from_query(params: &QueryParams) -> Result<Self, ServiceError> {
        Ok(Self {
            error_rate: require_finite(params, PARAM_ERROR)?,
            factor: require_finite(params, PARAM_FACTOR)?,
            field_name: params.require(PARAM_VALUE)?,
        })
    }
}

fn require_finite(params: &QueryParams, name: &str) -> Result<f64, ServiceError> {
    let n: f64 = params.require(name)?;
    if n.is_finite() {
        Ok(n)
    } else {
        Err(ServiceError::MalformedParameter(format!("`{name}` must be a finite number")))
    }
}

/// Renders each document and, with probability `error_rate`, multiplies the
/// `value` of measurement `field_name` by `factor`. The stored documents are
/// never touched; only the rendered copies change.
///
/// # Errors
/// `FieldNotFound` as soon as any document lacks the named measurement or
/// its numeric `value`; `MalformedParameter` when scaling a value leaves the
/// finite range. No partial result is returned.
pub fn inject_errors<I, R>(docs: I, params: &ErrorParams, rng: &mut R) -> Result<Vec<Value>, ServiceError>
where
    I: IntoIterator<Item = BsonDocument>,
    R: Rng,
{
    docs.into_iter().map(|doc| inject_one(&doc, params, rng)).collect()
}

fn inject_one<R: Rng>(doc: &BsonDocument, params: &ErrorParams, rng: &mut R) -> Result<Value, ServiceError> {
    let hit = rng.random::<f64>() < params.error_rate;
    let mut out = to_json_map(doc);
    let measurement = out
        .get_mut(&params.field_name)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| ServiceError::FieldNotFound(params.field_name.clone()))?;
    let current = measurement
        .get(VALUE_FIELD)
        .and_then(Value::as_f64)
        .ok_or_else(|| ServiceError::FieldNotFound(format!("{}.{VALUE_FIELD}", params.field_name)))?;
    if hit {
        let scaled = current * params.factor;
        if !scaled.is_finite() {
            return Err(ServiceError::MalformedParameter(format!(
                "`{PARAM_FACTOR}` {} overflows {}.{VALUE_FIELD} = {current}",
                params.factor, params.field_name
            )));
        }
        measurement.insert(VALUE_FIELD.to_string(), Value::from(scaled));
    }
    out.insert(HAS_ERROR_FIELD.to_string(), Value::Bool(hit));
    Ok(Value::Object(out))
}

//! Filter resolution: turns request parameters into exactly one retrieval mode.
//!
//! Precedence lives in [`RESOLUTION_RULES`] and is evaluated top to bottom;
//! the first rule whose predicate holds decides the mode. `amount` beats a
//! date range even when both are supplied, and the two never combine.

use crate::errors::ServiceError;
use crate::query::{Filter, FindOptions};
use crate::types::{DATE_FIELD, DocumentId, ID_FIELD};
use std::num::NonZeroUsize;
use std::str::FromStr;

pub const PARAM_AMOUNT: &str = "amount";
pub const PARAM_START_DATE: &str = "startDate";
pub const PARAM_END_DATE: &str = "endDate";

/// Query-string pairs in request order. Lookups see the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    /// Parses a parameter that must be present.
    ///
    /// # Errors
    /// `MalformedParameter` when the parameter is missing or does not parse as `T`.
    pub fn require<T: FromStr>(&self, name: &str) -> Result<T, ServiceError> {
        let raw = self
            .get(name)
            .ok_or_else(|| ServiceError::MalformedParameter(format!("missing required parameter `{name}`")))?;
        raw.parse::<T>()
            .map_err(|_| ServiceError::MalformedParameter(format!("`{name}` has invalid value `{raw}`")))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

/// How a request retrieves documents. Exactly one mode is active per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSpec {
    All,
    Capped(NonZeroUsize),
    /// `start` inclusive, `end` exclusive. `start >= end` simply matches nothing.
    DateRange { start: bson::DateTime, end: bson::DateTime },
    ById(DocumentId),
}

impl FilterSpec {
    /// Lowers the mode into a store filter plus cursor options.
    #[must_use]
    pub fn to_query(&self) -> (Filter, FindOptions) {
        match *self {
            Self::All => (Filter::True, FindOptions::default()),
            Self::Capped(amount) => (Filter::True, FindOptions { limit: Some(amount.get()) }),
            Self::DateRange { start, end } => (
                Filter::And(vec![Filter::gte(DATE_FIELD, start), Filter::lt(DATE_FIELD, end)]),
                FindOptions::default(),
            ),
            Self::ById(id) => (Filter::equals(ID_FIELD, id), FindOptions::default()),
        }
    }
}

/// One entry of the precedence table: when `applies` holds, `build` decides.
pub struct ResolutionRule {
    pub name: &'static str,
    pub applies: fn(&QueryParams) -> bool,
    pub build: fn(&QueryParams) -> Result<FilterSpec, ServiceError>,
}

pub const RESOLUTION_RULES: &[ResolutionRule] = &[
    ResolutionRule { name: "capped", applies: has_amount, build: build_capped },
    ResolutionRule { name: "date-range", applies: has_date_range, build: build_date_range },
    ResolutionRule { name: "all", applies: always, build: build_all },
];

/// Selects the retrieval mode for a filtered query.
///
/// # Errors
/// `MalformedParameter` when the winning rule's parameters do not parse.
pub fn resolve(params: &QueryParams) -> Result<FilterSpec, ServiceError> {
    let Some(rule) = RESOLUTION_RULES.iter().find(|r| (r.applies)(params)) else {
        return Ok(FilterSpec::All);
    };
    let spec = (rule.build)(params)?;
    log::debug!("resolved filter via `{}` rule: {spec:?}", rule.name);
    Ok(spec)
}

/// Resolves a single-document lookup.
///
/// # Errors
/// `InvalidIdentifier` unless `id` is a well-formed 24-character hex identifier.
pub fn resolve_by_id(id: &str) -> Result<FilterSpec, ServiceError> {
    DocumentId::parse(id).map(FilterSpec::ById)
}

fn has_amount(params: &QueryParams) -> bool {
    params.contains(PARAM_AMOUNT)
}

fn has_date_range(params: &QueryParams) -> bool {
    params.contains(PARAM_START_DATE) && params.contains(PARAM_END_DATE)
}

fn always(_: &QueryParams) -> bool {
    true
}

#[allow(clippy::unnecessary_wraps)]
fn build_all(_: &QueryParams) -> Result<FilterSpec, ServiceError> {
    Ok(FilterSpec::All)
}

fn build_capped(params: &QueryParams) -> Result<FilterSpec, ServiceError> {
    let amount: usize = params.require(PARAM_AMOUNT)?;
    NonZeroUsize::new(amount)
        .map(FilterSpec::Capped)
        .ok_or_else(|| ServiceError::MalformedParameter(format!("`{PARAM_AMOUNT}` must be positive")))
}

fn build_date_range(params: &QueryParams) -> Result<FilterSpec, ServiceError> {
    let start: i64 = params.require(PARAM_START_DATE)?;
    let end: i64 = params.require(PARAM_END_DATE)?;
    Ok(FilterSpec::DateRange {
        start: bson::DateTime::from_millis(start),
        end: bson::DateTime::from_millis(end),
    })
}

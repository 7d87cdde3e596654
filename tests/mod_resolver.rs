use bson::Bson;
use pmservice::errors::ServiceError;
use pmservice::query::{Filter, FindOptions};
use pmservice::resolver::{FilterSpec, QueryParams, RESOLUTION_RULES, resolve, resolve_by_id};
use std::num::NonZeroUsize;

fn params(pairs: &[(&str, &str)]) -> QueryParams {
    pairs.iter().copied().collect()
}

#[test]
fn no_filter_params_resolves_to_all() {
    assert_eq!(resolve(&QueryParams::new()).unwrap(), FilterSpec::All);
    let p = params(&[("error", "0.5"), ("factor", "2"), ("value", "temp")]);
    assert_eq!(resolve(&p).unwrap(), FilterSpec::All);
}

#[test]
fn amount_resolves_to_capped() {
    let spec = resolve(&params(&[("amount", "3")])).unwrap();
    assert_eq!(spec, FilterSpec::Capped(NonZeroUsize::new(3).unwrap()));
    let (filter, opts) = spec.to_query();
    assert_eq!(filter, Filter::True);
    assert_eq!(opts, FindOptions { limit: Some(3) });
}

#[test]
fn amount_wins_over_date_range() {
    let p = params(&[("startDate", "0"), ("endDate", "1000"), ("amount", "2")]);
    assert_eq!(resolve(&p).unwrap(), FilterSpec::Capped(NonZeroUsize::new(2).unwrap()));
}

#[test]
fn date_range_needs_both_bounds() {
    assert_eq!(resolve(&params(&[("startDate", "0")])).unwrap(), FilterSpec::All);
    assert_eq!(resolve(&params(&[("endDate", "0")])).unwrap(), FilterSpec::All);
    let spec = resolve(&params(&[("startDate", "1000"), ("endDate", "2000")])).unwrap();
    assert_eq!(
        spec,
        FilterSpec::DateRange {
            start: bson::DateTime::from_millis(1000),
            end: bson::DateTime::from_millis(2000),
        }
    );
}

#[test]
fn date_range_lowers_to_half_open_interval() {
    let spec = FilterSpec::DateRange { start: bson::DateTime::from_millis(5), end: bson::DateTime::from_millis(9) };
    let (filter, opts) = spec.to_query();
    assert_eq!(opts, FindOptions::default());
    assert_eq!(
        filter,
        Filter::And(vec![
            Filter::gte("date", Bson::DateTime(bson::DateTime::from_millis(5))),
            Filter::lt("date", Bson::DateTime(bson::DateTime::from_millis(9))),
        ])
    );
}

#[test]
fn inverted_range_is_not_an_error() {
    assert!(resolve(&params(&[("startDate", "2000"), ("endDate", "1000")])).is_ok());
}

#[test]
fn malformed_numbers_are_client_errors() {
    for p in [
        params(&[("amount", "abc")]),
        params(&[("amount", "0")]),
        params(&[("amount", "-4")]),
        params(&[("amount", "")]),
        params(&[("startDate", "x"), ("endDate", "1")]),
        params(&[("startDate", "1"), ("endDate", "1.5")]),
    ] {
        assert!(matches!(resolve(&p), Err(ServiceError::MalformedParameter(_))), "{p:?}");
    }
}

#[test]
fn first_occurrence_of_a_parameter_is_used() {
    let p = params(&[("amount", "4"), ("amount", "9")]);
    assert_eq!(resolve(&p).unwrap(), FilterSpec::Capped(NonZeroUsize::new(4).unwrap()));
}

#[test]
fn rule_table_order_is_capped_then_range_then_all() {
    let names: Vec<&str> = RESOLUTION_RULES.iter().map(|r| r.name).collect();
    assert_eq!(names, ["capped", "date-range", "all"]);
}

#[test]
fn resolve_by_id_accepts_hex_and_rejects_garbage() {
    let spec = resolve_by_id("5f1a2b3c4d5e6f7a8b9c0d1e").unwrap();
    let FilterSpec::ById(id) = spec else { panic!("expected ById, got {spec:?}") };
    assert_eq!(id.to_hex(), "5f1a2b3c4d5e6f7a8b9c0d1e");
    assert!(matches!(resolve_by_id("not-an-id"), Err(ServiceError::InvalidIdentifier(_))));
    assert!(matches!(resolve_by_id("5f1a2b3c4d5e6f7a8b9c0d1"), Err(ServiceError::InvalidIdentifier(_))));
}

//! Tests for filter text parsing: tokenization, operator priority, key
//! aliases, value typing, and parse-time rejection.

use super::{
    parse_filters, split_rating_bounds, AttrKey, CompareOp, DateField, FilterValue, RatingAxis,
    StatField, TextField,
};

#[test]
fn test_numeric_filter_parses() {
    let filters = parse_filters("ar>=9").unwrap();
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].key, AttrKey::Stat(StatField::Ar));
    assert_eq!(filters[0].op, CompareOp::Ge);
    assert_eq!(filters[0].value, FilterValue::Number(9.0));
}

#[test]
fn test_multiple_filters_whitespace_separated() {
    let filters = parse_filters("ar>=9 length<200 cs:4").unwrap();
    assert_eq!(filters.len(), 3);
    assert_eq!(filters[1].key, AttrKey::Stat(StatField::Length));
    assert_eq!(filters[1].op, CompareOp::Lt);
    assert_eq!(filters[2].op, CompareOp::Eq);
}

#[test]
fn test_equality_synonyms() {
    for input in ["od=9.5", "od==9.5", "od:9.5"] {
        let filters = parse_filters(input).unwrap();
        assert_eq!(filters[0].op, CompareOp::Eq, "input {input}");
        assert_eq!(filters[0].value, FilterValue::Number(9.5));
    }
}

#[test]
fn test_two_char_operators_have_priority() {
    // `>=` must not be read as `>` with a stray `=` in the value.
    let filters = parse_filters("bpm>=180").unwrap();
    assert_eq!(filters[0].op, CompareOp::Ge);
    assert_eq!(filters[0].value, FilterValue::Number(180.0));

    let filters = parse_filters("bpm!=180").unwrap();
    assert_eq!(filters[0].op, CompareOp::Ne);
}

#[test]
fn test_key_aliases_share_variants() {
    let canonical = parse_filters("hp>5").unwrap();
    for alias in ["drain>5", "dr>5"] {
        let filters = parse_filters(alias).unwrap();
        assert_eq!(filters[0].key, canonical[0].key, "alias {alias}");
    }

    let bpm = parse_filters("bpm<200").unwrap();
    let max_bpm = parse_filters("max_bpm<200").unwrap();
    assert_eq!(bpm[0].key, max_bpm[0].key);
    assert_eq!(bpm[0].key, AttrKey::Stat(StatField::MaxBpm));

    for alias in ["difficulty=x", "diff=x", "version=x"] {
        let filters = parse_filters(alias).unwrap();
        assert_eq!(filters[0].key, AttrKey::Text(TextField::Version));
    }
}

#[test]
fn test_rating_axis_keys() {
    assert_eq!(
        parse_filters("sr>=6").unwrap()[0].key,
        AttrKey::Rating(RatingAxis::Overall)
    );
    assert_eq!(
        parse_filters("stars>=6").unwrap()[0].key,
        AttrKey::Rating(RatingAxis::Overall)
    );
    assert_eq!(
        parse_filters("aimsr>=3").unwrap()[0].key,
        AttrKey::Rating(RatingAxis::Aim)
    );
    assert_eq!(
        parse_filters("tap>=2").unwrap()[0].key,
        AttrKey::Rating(RatingAxis::Speed)
    );
}

#[test]
fn test_string_value_is_normalized() {
    let filters = parse_filters("artist=CAMELLIA").unwrap();
    assert_eq!(filters[0].value, FilterValue::Text("camellia".to_string()));
}

#[test]
fn test_quoted_values_keep_spaces() {
    let filters = parse_filters("title=\"blue bird\" ar>9").unwrap();
    assert_eq!(filters.len(), 2);
    // Normalization strips the space; the quotes let it reach the parser.
    assert_eq!(filters[0].value, FilterValue::Text("bluebird".to_string()));

    let filters = parse_filters("creator='pishifat'").unwrap();
    assert_eq!(filters[0].value, FilterValue::Text("pishifat".to_string()));
}

#[test]
fn test_date_values_validated() {
    for input in ["ranked=2021", "ranked=2021-06", "ranked=2021-06-15"] {
        let filters = parse_filters(input).unwrap();
        assert_eq!(filters[0].key, AttrKey::Date(DateField::Ranked));
        assert!(matches!(filters[0].value, FilterValue::Date(_)), "input {input}");
    }

    for input in ["ranked=21", "ranked=2021-13", "ranked=2021-6", "ranked=2021-06-32"] {
        let err = parse_filters(input).unwrap_err();
        assert!(err.is_input(), "input {input}");
    }
}

#[test]
fn test_missing_operator_mentions_spacing() {
    let err = parse_filters("ar").unwrap_err();
    assert!(err.to_string().contains("operator"));
    assert!(err.to_string().contains("spaces"));
}

#[test]
fn test_missing_key_is_rejected() {
    let err = parse_filters(">=9").unwrap_err();
    assert!(err.to_string().contains("key"));
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = parse_filters("speed>=9").unwrap_err();
    assert!(err.to_string().contains("speed"));
}

#[test]
fn test_bad_numeric_value_is_rejected() {
    let err = parse_filters("ar>=nine").unwrap_err();
    assert!(err.to_string().contains("ar"));
    assert!(err.to_string().contains("nine"));
}

#[test]
fn test_ordering_operator_on_string_rejected_at_parse() {
    let err = parse_filters("artist<camellia").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains('<'));
    assert!(msg.contains("artist"));

    // Equality family stays allowed.
    assert!(parse_filters("artist!=camellia").is_ok());
    assert!(parse_filters("status=ranked").is_ok());
    assert!(parse_filters("category<ranked").is_err());
}

#[test]
fn test_date_ordering_operators_allowed() {
    assert!(parse_filters("ranked>=2020").is_ok());
    assert!(parse_filters("updated<2023-01").is_ok());
}

#[test]
fn test_split_rating_bounds_consumes_sr_filters() {
    let filters = parse_filters("sr>=6.0 sr<=6.5 ar>9").unwrap();
    let (bounds, rest) = split_rating_bounds(filters);
    assert_eq!(bounds.lo, Some(6.0));
    assert_eq!(bounds.hi, Some(6.5));
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].key, AttrKey::Stat(StatField::Ar));
}

#[test]
fn test_split_rating_bounds_equality_pins_both() {
    let filters = parse_filters("sr=6.3").unwrap();
    let (bounds, rest) = split_rating_bounds(filters);
    assert_eq!(bounds.lo, Some(6.3));
    assert_eq!(bounds.hi, Some(6.3));
    assert!(rest.is_empty());
}

#[test]
fn test_split_rating_bounds_single_bound() {
    let (bounds, _) = split_rating_bounds(parse_filters("sr>5").unwrap());
    assert_eq!(bounds.lo, Some(5.0));
    assert_eq!(bounds.hi, None);
    assert!(bounds.is_bounded());
}

#[test]
fn test_split_rating_bounds_leaves_other_axes() {
    // Aim and speed ratings are ordinary filters, not candidate bounds.
    let filters = parse_filters("aim>=3 tap<=2").unwrap();
    let (bounds, rest) = split_rating_bounds(filters);
    assert!(!bounds.is_bounded());
    assert_eq!(rest.len(), 2);
}

#[test]
fn test_empty_input_yields_no_filters() {
    assert!(parse_filters("").unwrap().is_empty());
    assert!(parse_filters("   ").unwrap().is_empty());
}

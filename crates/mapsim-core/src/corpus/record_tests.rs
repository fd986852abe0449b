//! Tests for record types: rating geometry, mod canonicalization, category
//! mapping, and the overweight metric.

use super::record::{
    approval_category, canonical_mods, PerformanceEntry, RatingTriple, SliderProfile,
};

#[test]
fn test_rating_plane_distance() {
    let a = RatingTriple::from([6.0, 3.0, 2.0]);
    let b = RatingTriple::from([6.3, 3.4, 9.9]);
    // Speed is not part of the plane.
    assert!((a.plane_distance(&b) - 0.5).abs() < 1e-9);
    assert_eq!(a.plane(), [6.0, 3.0]);
}

#[test]
fn test_rating_triple_from_json_array() {
    let triple: RatingTriple = serde_json::from_str("[6.21, 3.1, 2.9]").unwrap();
    assert!((triple.overall - 6.21).abs() < 1e-9);
    assert!((triple.aim - 3.1).abs() < 1e-9);
    assert!((triple.speed - 2.9).abs() < 1e-9);
}

#[test]
fn test_canonical_mods_fixed_group_order() {
    assert_eq!(canonical_mods("DTHD"), "HDDT");
    assert_eq!(canonical_mods("hdhr"), "HDHR");
    assert_eq!(canonical_mods(""), "");
    assert_eq!(canonical_mods("NM"), "NM");
}

#[test]
fn test_canonical_mods_collapses_synonyms() {
    assert_eq!(canonical_mods("NC"), "DT");
    assert_eq!(canonical_mods("HDNC"), "HDDT");
}

#[test]
fn test_canonical_mods_drops_unknown() {
    assert_eq!(canonical_mods("XYZDT"), "DT");
}

#[test]
fn test_approval_category_codes() {
    assert_eq!(approval_category(-2), "graveyard");
    assert_eq!(approval_category(-1), "wip");
    assert_eq!(approval_category(0), "pending");
    assert_eq!(approval_category(1), "ranked");
    assert_eq!(approval_category(4), "loved");
    // Unknown codes resolve to empty, not an error.
    assert_eq!(approval_category(99), "");
}

#[test]
fn test_overweight_saturates_at_100_scores() {
    let mut entry = PerformanceEntry {
        id: 1,
        mods: "NM".to_string(),
        score_count: 50,
        avg_weight: 0.8,
        avg_pp: 250.0,
        max_pp: 300.0,
    };
    assert!((entry.overweight() - 0.4).abs() < 1e-9);

    entry.score_count = 250;
    assert!((entry.overweight() - 0.8).abs() < 1e-9);
}

#[test]
fn test_slider_profile_distance() {
    let a = SliderProfile {
        mean_velocity: 1.0,
        mean_length: 2.0,
        std_velocity: 0.0,
        std_length: 0.0,
        ratio: 0.5,
    };
    let mut b = a;
    assert_eq!(a.distance(&b), 0.0);

    b.mean_length = 5.0;
    assert!((a.distance(&b) - 3.0).abs() < 1e-9);
}

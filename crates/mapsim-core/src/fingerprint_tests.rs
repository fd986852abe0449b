//! Tests for the fingerprint scorer: symmetry, normalization, and the shape
//! of the time-decay window.

use proptest::prelude::*;

use crate::fingerprint::{percentage, score, Fingerprint, TimeBucket};

fn bucket(offset_ms: f64, histogram: &[f32]) -> TimeBucket {
    TimeBucket {
        offset_ms,
        histogram: histogram.to_vec(),
    }
}

fn fingerprint(buckets: &[(f64, &[f32])]) -> Fingerprint {
    Fingerprint::new(
        buckets
            .iter()
            .map(|(t, h)| bucket(*t, h))
            .collect(),
    )
}

#[test]
fn test_identical_buckets_score_full_intersection() {
    // Same offset: weight is exactly 1, so the score is the histogram sum.
    let a = fingerprint(&[(1000.0, &[1.0, 2.0, 3.0])]);
    let b = a.clone();
    let raw = score(&a, &b);
    assert!((raw - 6.0).abs() < 1e-9);
}

#[test]
fn test_empty_fingerprint_scores_zero() {
    let empty = Fingerprint::default();
    let full = fingerprint(&[(500.0, &[1.0, 1.0])]);

    assert_eq!(score(&empty, &full), 0.0);
    assert_eq!(score(&empty, &empty), 0.0);
    // Zero self-similarity must yield 0%, not a division error.
    assert_eq!(percentage(score(&empty, &full), score(&empty, &empty)), 0.0);
}

#[test]
fn test_self_percentage_is_100_for_nonempty() {
    let fp = fingerprint(&[
        (250.0, &[0.5, 1.5, 0.0]),
        (800.0, &[2.0, 0.0, 1.0]),
        (1600.0, &[0.0, 0.0, 3.0]),
    ]);
    let self_sim = score(&fp, &fp);
    assert!(self_sim > 0.0);
    assert!((percentage(self_sim, self_sim) - 100.0).abs() < 1e-9);
}

#[test]
fn test_weight_decays_with_offset_gap() {
    // One shared histogram; the only varying factor is the time gap.
    let hist: &[f32] = &[1.0];
    let base = fingerprint(&[(100.0, hist)]);

    let near = fingerprint(&[(104.0, hist)]);
    let far = fingerprint(&[(109.0, hist)]);

    let near_score = score(&base, &near);
    let far_score = score(&base, &far);
    assert!(near_score > far_score);
    assert!(far_score > 0.0);
}

#[test]
fn test_weight_zero_outside_window() {
    // At offsets 100 and 200 the window is 10 + 150 * 0.025 = 13.75 ms,
    // far smaller than the 100 ms gap: the pair contributes nothing.
    let hist: &[f32] = &[5.0];
    let a = fingerprint(&[(100.0, hist)]);
    let b = fingerprint(&[(200.0, hist)]);
    assert_eq!(score(&a, &b), 0.0);
}

#[test]
fn test_tolerance_widens_window_for_late_buckets() {
    // A 20 ms gap is outside the base 10 ms window, but at offset ~600 000 ms
    // the tolerance adds 0.025 * 600 000 = 15 000 ms, so it still matches.
    let hist: &[f32] = &[1.0];
    let early_a = fingerprint(&[(100.0, hist)]);
    let early_b = fingerprint(&[(120.0, hist)]);
    assert_eq!(score(&early_a, &early_b), 0.0);

    let late_a = fingerprint(&[(600_000.0, hist)]);
    let late_b = fingerprint(&[(600_020.0, hist)]);
    assert!(score(&late_a, &late_b) > 0.0);
}

#[test]
fn test_intersection_uses_elementwise_minimum() {
    let a = fingerprint(&[(1000.0, &[3.0, 0.0, 2.0])]);
    let b = fingerprint(&[(1000.0, &[1.0, 5.0, 2.0])]);
    // min-sum = 1 + 0 + 2 = 3, weight 1 at equal offsets.
    assert!((score(&a, &b) - 3.0).abs() < 1e-9);
}

#[test]
fn test_cross_bucket_pairs_accumulate() {
    // Two buckets 5 ms apart on each side: all four pairs fall inside the
    // window and every pair contributes.
    let hist: &[f32] = &[1.0];
    let a = fingerprint(&[(100.0, hist), (105.0, hist)]);
    let single = fingerprint(&[(100.0, hist)]);

    assert!(score(&a, &a) > score(&single, &single));
}

proptest! {
    #[test]
    fn prop_score_is_symmetric(
        offsets_a in prop::collection::vec(0.0f64..500_000.0, 0..6),
        offsets_b in prop::collection::vec(0.0f64..500_000.0, 0..6),
        values_a in prop::collection::vec(0.0f32..50.0, 4),
        values_b in prop::collection::vec(0.0f32..50.0, 4),
    ) {
        let a = Fingerprint::new(
            offsets_a.iter().map(|&t| bucket(t, &values_a)).collect(),
        );
        let b = Fingerprint::new(
            offsets_b.iter().map(|&t| bucket(t, &values_b)).collect(),
        );
        let ab = score(&a, &b);
        let ba = score(&b, &a);
        prop_assert!((ab - ba).abs() <= 1e-9 * ab.abs().max(1.0));
    }

    #[test]
    fn prop_score_is_non_negative(
        offsets in prop::collection::vec(0.0f64..500_000.0, 0..6),
        values in prop::collection::vec(0.0f32..50.0, 4),
    ) {
        let fp = Fingerprint::new(
            offsets.iter().map(|&t| bucket(t, &values)).collect(),
        );
        prop_assert!(score(&fp, &fp) >= 0.0);
    }
}

//! Structural fingerprints and the time-tolerant similarity scorer.
//!
//! A fingerprint is a set of time buckets, each holding a histogram of local
//! geometric features (inter-object angle and distance classes) observed near
//! that time offset. Two fingerprints are compared pairwise across all bucket
//! combinations: each pair contributes its histogram intersection, weighted by
//! how close the two time offsets are. The weight decays linearly to zero
//! over a 10 ms window widened by 2.5% of the pair's mean offset, so late
//! sections of long maps tolerate proportionally more drift.
//!
//! Raw scores are only meaningful relative to the query's self-similarity;
//! [`percentage`] performs that normalization.

/// Fractional widening of the decay window, as a share of the mean offset.
const TIME_TOLERANCE: f64 = 0.025;

/// Base width of the linear decay window, in milliseconds.
const DECAY_WINDOW_MS: f64 = 10.0;

/// One time bucket of a structural fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    /// Offset of this bucket from the start of the beatmap, in milliseconds.
    pub offset_ms: f64,
    /// Histogram of geometric feature classes near this offset. All buckets
    /// in a corpus share one fixed length, enforced at load time.
    pub histogram: Vec<f32>,
}

/// A beatmap's structural fingerprint: its time buckets in ascending offset
/// order. Opaque to everything except the scorer below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fingerprint {
    buckets: Vec<TimeBucket>,
}

impl Fingerprint {
    /// Wraps pre-built buckets, sorting them by offset.
    #[must_use]
    pub fn new(mut buckets: Vec<TimeBucket>) -> Self {
        buckets.sort_by(|a, b| a.offset_ms.total_cmp(&b.offset_ms));
        Self { buckets }
    }

    /// The time buckets, ascending by offset.
    #[must_use]
    pub fn buckets(&self) -> &[TimeBucket] {
        &self.buckets
    }

    /// True when the fingerprint holds no buckets. Empty fingerprints score
    /// zero against everything, including themselves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Histogram intersection: sum of element-wise minima.
fn intersection(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(x.min(*y)))
        .sum()
}

/// Linear time-proximity weight in [0, 1] for a pair of bucket offsets.
fn time_weight(t1: f64, t2: f64) -> f64 {
    let tol_ms = (t1 + t2) / 2.0 * TIME_TOLERANCE;
    (DECAY_WINDOW_MS + tol_ms - (t1 - t2).abs()).clamp(0.0, DECAY_WINDOW_MS) / DECAY_WINDOW_MS
}

/// Raw similarity between two fingerprints.
///
/// Symmetric in its arguments: every term is a symmetric weight times a
/// symmetric intersection. The double loop is O(|a|·|b|); candidates are
/// scored in parallel by the pipeline, not inside this function.
#[must_use]
pub fn score(a: &Fingerprint, b: &Fingerprint) -> f64 {
    let mut sim = 0.0;
    for lhs in &a.buckets {
        for rhs in &b.buckets {
            let weight = time_weight(lhs.offset_ms, rhs.offset_ms);
            if weight > 0.0 {
                sim += weight * intersection(&lhs.histogram, &rhs.histogram);
            }
        }
    }
    sim
}

/// Normalizes a raw pair score against the query's self-similarity, as a
/// percentage. A zero denominator (empty query fingerprint) yields 0 rather
/// than an error.
#[must_use]
pub fn percentage(raw: f64, self_similarity: f64) -> f64 {
    if self_similarity > 0.0 {
        raw / self_similarity * 100.0
    } else {
        0.0
    }
}

//! Spatial index over 2-D rating coordinates.
//!
//! Two structures, two query intents. A k-d tree over (overall, aim)
//! answers "everything near this coordinate" for the default proximity
//! search; a rating-sorted list answers "everything inside this absolute
//! window" for explicit range filters via binary search. Both are built
//! once per modifier context and never updated; the corpus is rebuilt
//! wholesale, not patched.

use crate::corpus::RatingTriple;
use crate::error::{Error, Result};
use crate::MapId;


#[derive(Debug)]
struct KdNode {
    point: [f64; 2],
    id: MapId,
    left: Option<usize>,
    right: Option<usize>,
}

/// Rating index for one modifier context.
#[derive(Debug, Default)]
pub struct RatingIndex {
    nodes: Vec<KdNode>,
    root: Option<usize>,
    /// (overall rating, id), ascending; ids break rating ties.
    sorted: Vec<(f64, MapId)>,
}

impl RatingIndex {
    /// Builds the index from every rating triple in one context.
    #[must_use]
    pub fn build(ratings: impl Iterator<Item = (MapId, RatingTriple)>) -> Self {
        let mut points: Vec<([f64; 2], MapId)> = Vec::new();
        let mut sorted = Vec::new();
        for (id, triple) in ratings {
            points.push((triple.plane(), id));
            sorted.push((triple.overall, id));
        }
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut nodes = Vec::with_capacity(points.len());
        let root = build_subtree(&mut points, 0, &mut nodes);
        tracing::info!(count = nodes.len(), "rating index built");

        Self { nodes, root, sorted }
    }

    /// Number of indexed beatmaps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every id whose coordinate lies within Euclidean distance `radius`
    /// of `center`, boundary inclusive.
    #[must_use]
    pub fn query_radius(&self, center: [f64; 2], radius: f64) -> Vec<MapId> {
        let mut out = Vec::new();
        self.collect_within(self.root, 0, center, radius, &mut out);
        out
    }

    /// Every id whose overall rating lies in `[lo, hi]`, ascending by
    /// rating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRatingRange`] when `lo > hi`; an inverted
    /// window is caller error, not an empty result.
    pub fn query_range(&self, lo: f64, hi: f64) -> Result<Vec<MapId>> {
        if lo > hi {
            return Err(Error::InvalidRatingRange { lo, hi });
        }
        let start = self.sorted.partition_point(|(rating, _)| *rating < lo);
        let end = self.sorted.partition_point(|(rating, _)| *rating <= hi);
        Ok(self.sorted[start..end].iter().map(|(_, id)| *id).collect())
    }

    fn collect_within(
        &self,
        node: Option<usize>,
        depth: usize,
        center: [f64; 2],
        radius: f64,
        out: &mut Vec<MapId>,
    ) {
        let Some(index) = node else { return };
        let node = &self.nodes[index];

        let dx = node.point[0] - center[0];
        let dy = node.point[1] - center[1];
        if dx * dx + dy * dy <= radius * radius {
            out.push(node.id);
        }

        let axis = depth % 2;
        let delta = center[axis] - node.point[axis];
        if delta - radius <= 0.0 {
            self.collect_within(node.left, depth + 1, center, radius, out);
        }
        if delta + radius >= 0.0 {
            self.collect_within(node.right, depth + 1, center, radius, out);
        }
    }
}

/// Median-split construction: the midpoint along the depth's axis becomes
/// the subtree root, halves recurse with the axis alternating.
fn build_subtree(
    points: &mut [([f64; 2], MapId)],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> Option<usize> {
    if points.is_empty() {
        return None;
    }
    let axis = depth % 2;
    let mid = points.len() / 2;
    points.select_nth_unstable_by(mid, |a, b| a.0[axis].total_cmp(&b.0[axis]));

    let (point, id) = points[mid];
    let index = nodes.len();
    nodes.push(KdNode {
        point,
        id,
        left: None,
        right: None,
    });

    let (lower, rest) = points.split_at_mut(mid);
    let left = build_subtree(lower, depth + 1, nodes);
    let right = build_subtree(&mut rest[1..], depth + 1, nodes);
    nodes[index].left = left;
    nodes[index].right = right;
    Some(index)
}

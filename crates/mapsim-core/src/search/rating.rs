//! Rating-mode search: nearest neighbours in the rating plane of one
//! modifier context, closest first.

use rayon::prelude::*;

use super::{rank_ascending, SearchContext, SearchHit};
use crate::corpus::ModContext;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::MapId;

impl SearchContext {
    /// Finds the beatmaps whose rating under `context` is closest to that
    /// of `id`, at most `limit` of them, ranked by ascending distance.
    ///
    /// This mode answers only from the local corpus; an unknown id is a
    /// not-found error, with no on-demand fallback.
    ///
    /// # Errors
    ///
    /// [`Error::MapNotFound`] when `id` has no rating under `context`.
    pub fn similar_by_rating(
        &self,
        id: MapId,
        limit: usize,
        context: ModContext,
        filters: &[Filter],
    ) -> Result<Vec<SearchHit>> {
        let rating = *self
            .corpus()
            .rating(id, context)
            .ok_or(Error::MapNotFound(id))?;

        let candidates = self
            .index(context)
            .query_radius(rating.plane(), self.config().search.rating_radius);
        tracing::debug!(
            query = id,
            context = context.label(),
            candidates = candidates.len(),
            "rating candidates selected"
        );

        let mut hits: Vec<SearchHit> = candidates
            .par_iter()
            .filter_map(|&candidate| {
                if candidate == id {
                    return None;
                }
                if !self.corpus().matches_all(candidate, filters) {
                    return None;
                }
                let distance = self
                    .corpus()
                    .rating(candidate, context)
                    .map(|triple| rating.plane_distance(triple))?;
                Some(SearchHit {
                    id: candidate,
                    score: distance,
                    rating_distance: Some(distance),
                })
            })
            .collect();

        rank_ascending(&mut hits, limit, |hit| hit.score);
        Ok(hits)
    }
}

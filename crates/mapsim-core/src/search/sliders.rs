//! Slider-mode search: nearest neighbours over the 5-component slider
//! geometry profile.

use super::{rank_ascending, SearchContext, SearchHit};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::MapId;

impl SearchContext {
    /// Finds the beatmaps whose slider geometry profile is closest to that
    /// of `id`, at most `limit` of them, ranked by ascending distance.
    ///
    /// The profile table is small enough that candidates come from a plain
    /// scan; per-candidate work is a 5-component distance, so there is
    /// nothing worth pruning.
    ///
    /// # Errors
    ///
    /// [`Error::MapNotFound`] when `id` has no slider profile.
    pub fn similar_by_sliders(
        &self,
        id: MapId,
        limit: usize,
        filters: &[Filter],
    ) -> Result<Vec<SearchHit>> {
        let profile = *self
            .corpus()
            .slider_profile(id)
            .ok_or(Error::MapNotFound(id))?;

        let mut hits: Vec<SearchHit> = self
            .corpus()
            .slider_profiles()
            .filter(|(candidate, _)| *candidate != id)
            .filter(|(candidate, _)| self.corpus().matches_all(*candidate, filters))
            .map(|(candidate, other)| SearchHit {
                id: candidate,
                score: profile.distance(other),
                rating_distance: None,
            })
            .collect();
        tracing::debug!(query = id, scanned = hits.len(), "slider profiles compared");

        rank_ascending(&mut hits, limit, |hit| hit.score);
        Ok(hits)
    }
}

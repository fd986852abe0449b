//! Structure-mode search: fuzzy fingerprint matching over a rating-pruned
//! candidate set.

use rayon::prelude::*;

use super::{rank_descending, SearchContext, SearchHit};
use crate::corpus::ModContext;
use crate::error::{Error, Result};
use crate::filter::{split_rating_bounds, Filter};
use crate::fingerprint;
use crate::MapId;

impl SearchContext {
    /// Finds the beatmaps most similar in structure to `id`, best first,
    /// at most `limit` of them.
    ///
    /// Overall-rating filters are consumed by candidate selection: an
    /// explicit bound expresses an absolute rating window and runs as a
    /// sorted range scan, while the default case expresses "ratings near
    /// mine" and runs as a proximity query around the query's own
    /// coordinate. The remaining filters are evaluated per candidate.
    ///
    /// # Errors
    ///
    /// Input errors (invalid or over-wide rating range) abort before any
    /// candidate work. [`Error::MapNotFound`] when `id` is neither in the
    /// corpus nor resolvable on demand.
    pub fn similar_by_structure(
        &self,
        id: MapId,
        limit: usize,
        filters: Vec<Filter>,
    ) -> Result<Vec<SearchHit>> {
        let (bounds, rest) = split_rating_bounds(filters);
        let range = bounds.resolve(self.config().search.max_rating_span)?;

        // Resolve the query item, falling back to on-demand derivation
        // for beatmaps the corpus has never ingested.
        let fallback;
        let (query_fp, rating) = match (
            self.corpus().fingerprint(id),
            self.corpus().rating(id, ModContext::Nomod),
        ) {
            (Some(fp), Some(triple)) => (fp, *triple),
            _ => {
                let resolver = self.resolver().ok_or(Error::MapNotFound(id))?;
                fallback = resolver.resolve(id)?;
                (&fallback.fingerprint, fallback.rating)
            }
        };
        let self_similarity = fingerprint::score(query_fp, query_fp);

        let candidates = match range {
            Some((lo, hi)) => self.index(ModContext::Nomod).query_range(lo, hi)?,
            None => self
                .index(ModContext::Nomod)
                .query_radius(rating.plane(), self.config().search.rating_radius),
        };
        tracing::debug!(
            query = id,
            candidates = candidates.len(),
            ranged = range.is_some(),
            "structure candidates selected"
        );

        let mut hits: Vec<SearchHit> = candidates
            .par_iter()
            .filter_map(|&candidate| {
                if candidate == id {
                    return None;
                }
                // No fingerprint means the candidate cannot be scored.
                let candidate_fp = self.corpus().fingerprint(candidate)?;
                if !self.corpus().matches_all(candidate, &rest) {
                    return None;
                }

                let raw = fingerprint::score(query_fp, candidate_fp);
                let score = fingerprint::percentage(raw, self_similarity);
                let rating_distance = self
                    .corpus()
                    .rating(candidate, ModContext::Nomod)
                    .map(|triple| rating.plane_distance(triple));
                Some(SearchHit {
                    id: candidate,
                    score,
                    rating_distance,
                })
            })
            .collect();

        rank_descending(&mut hits, limit, |hit| hit.score);
        Ok(hits)
    }
}

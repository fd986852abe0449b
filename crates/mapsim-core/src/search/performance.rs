//! Performance-mode search: pure filter-and-rank over the score-table
//! aggregates, no similarity scoring.

use super::{rank_descending, SearchContext};
use crate::corpus::canonical_mods;
use crate::filter::Filter;
use crate::MapId;

/// Parameters for an overweight-map query.
#[derive(Debug, Clone)]
pub struct PerformanceQuery {
    /// Lower bound on a candidate's average pp.
    pub min_pp: f64,
    /// Upper bound on a candidate's average pp.
    pub max_pp: f64,
    /// Mod combo candidates must match exactly, in any spelling
    /// (canonicalized before matching). Empty matches everything.
    pub mods_include: String,
    /// Mods that disqualify a candidate when present in its combo.
    pub mods_exclude: String,
    /// General attribute filters.
    pub filters: Vec<Filter>,
    /// Result cap.
    pub limit: usize,
}

impl Default for PerformanceQuery {
    fn default() -> Self {
        Self {
            min_pp: 0.0,
            max_pp: f64::INFINITY,
            mods_include: String::new(),
            mods_exclude: String::new(),
            filters: Vec::new(),
            limit: 100,
        }
    }
}

/// One overweight-map result. A beatmap may appear once per mod combo.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceHit {
    /// Candidate beatmap.
    pub id: MapId,
    /// Canonical mod combo the aggregate was computed for.
    pub mods: String,
    /// The overweight metric the ranking used.
    pub overweight: f64,
}

impl SearchContext {
    /// Finds the most overweight (map, mod combo) entries inside a pp
    /// window, most overweight first, at most `query.limit` of them.
    #[must_use]
    pub fn overweight_maps(&self, query: &PerformanceQuery) -> Vec<PerformanceHit> {
        let include = canonical_mods(&query.mods_include);
        let exclude = canonical_mods(&query.mods_exclude);
        let excluded_pairs: Vec<&str> = (0..exclude.len())
            .step_by(2)
            .map(|i| &exclude[i..i + 2])
            .collect();

        let mut hits: Vec<PerformanceHit> = self
            .corpus()
            .performance_entries()
            .iter()
            .filter(|entry| {
                if entry.avg_pp < query.min_pp || entry.avg_pp > query.max_pp {
                    return false;
                }
                if !include.is_empty() && entry.mods != include {
                    return false;
                }
                if excluded_pairs.iter().any(|pair| entry.mods.contains(pair)) {
                    return false;
                }
                self.corpus().matches_all(entry.id, &query.filters)
            })
            .map(|entry| PerformanceHit {
                id: entry.id,
                mods: entry.mods.clone(),
                overweight: entry.overweight(),
            })
            .collect();
        tracing::debug!(matched = hits.len(), "performance entries filtered");

        rank_descending(&mut hits, query.limit, |hit| hit.overweight);
        hits
    }
}

//! # mapsim core
//!
//! In-memory similarity search over a corpus of rhythm-game beatmaps.
//!
//! The corpus (per-beatmap attributes, structural fingerprints, rating
//! triples per modifier context, slider profiles, and score-table
//! aggregates) is loaded once from flat files at startup and never
//! mutated. Four query modes share one filter engine and one
//! rank-and-truncate stage:
//!
//! - **Structure**: time-tolerant histogram matching of fingerprints,
//!   reported as a percentage of the query's self-similarity.
//! - **Rating**: nearest neighbours in the (overall, aim) rating plane.
//! - **Sliders**: nearest neighbours over slider geometry profiles.
//! - **Performance**: filter-and-rank by the overweight metric.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mapsim_core::{parse_filters, EngineConfig, SearchContext};
//!
//! fn main() -> mapsim_core::Result<()> {
//!     let config = EngineConfig::load(None)?;
//!     let engine = SearchContext::load(config)?;
//!
//!     let filters = parse_filters("ar>=9 length<200")?;
//!     let hits = engine.similar_by_structure(2_659_353, 50, filters)?;
//!     for hit in hits {
//!         println!("{:.1}% {}", hit.score, hit.id);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod fingerprint;
#[cfg(test)]
mod fingerprint_tests;
pub mod index;
pub mod search;


/// Beatmap identifier.
pub type MapId = u32;

pub use config::{CorpusPaths, EngineConfig, SearchTuning};
pub use corpus::{CorpusStore, ModContext, RatingTriple};
pub use error::{Error, Result};
pub use filter::{parse_filters, AttrKey, AttrValue, CompareOp, Filter, FilterValue};
pub use fingerprint::{Fingerprint, TimeBucket};
pub use index::RatingIndex;
pub use search::{
    PerformanceHit, PerformanceQuery, QueryResolver, ResolvedQuery, SearchContext, SearchHit,
};

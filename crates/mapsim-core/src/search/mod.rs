//! Query pipelines.
//!
//! [`SearchContext`] owns everything a query needs: the corpus tables, one
//! rating index per modifier context, the tuning config, and an optional
//! on-demand resolver for query beatmaps the corpus has never seen. It is
//! built once during process initialization and passed by reference into
//! every query. There are no global singletons, and nothing mutates after
//! construction, so concurrent queries need no locking.
//!
//! Every mode runs the same four linear stages: resolve the query item,
//! select candidates, filter and score, rank and truncate. They differ only
//! in candidate generation and in the metric that fills [`SearchHit::score`].

use crate::config::EngineConfig;
use crate::corpus::{CorpusStore, ModContext, RatingTriple};
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::index::RatingIndex;
use crate::MapId;

mod performance;
mod rating;
mod sliders;
mod structure;


pub use performance::{PerformanceHit, PerformanceQuery};

/// One ranked result.
///
/// `score` is the mode metric: structure search fills it with the
/// similarity percentage in [0, 100], rating and slider search with the
/// distance the ranking used, performance search with the overweight
/// metric.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Candidate beatmap.
    pub id: MapId,
    /// Mode metric this hit was ranked by.
    pub score: f64,
    /// Euclidean distance in the rating plane between query and candidate,
    /// when both ratings are known.
    pub rating_distance: Option<f64>,
}

/// Fingerprint and rating derived on demand for a beatmap outside the
/// corpus.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    /// Structural fingerprint, derived the same way bulk ingestion does.
    pub fingerprint: Fingerprint,
    /// Unmodified-context rating triple.
    pub rating: RatingTriple,
}

/// On-demand resolution of a query beatmap that is not in the corpus.
///
/// Implementors own the network fetch and the derivation, including
/// timeouts and cancellation; a failure of either surfaces to the query
/// caller as a not-found style error. The engine calls this at most once
/// per query, only on the structure-search path.
pub trait QueryResolver: Send + Sync {
    /// Fetches and derives fingerprint and rating for `id`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::MapNotFound`] when the beatmap does not exist;
    /// [`crate::Error::Resolve`] for fetch or derivation failures.
    fn resolve(&self, id: MapId) -> Result<ResolvedQuery>;
}

/// Read-only query engine state: corpus, indexes, and tuning.
pub struct SearchContext {
    corpus: CorpusStore,
    indexes: [RatingIndex; 3],
    config: EngineConfig,
    resolver: Option<Box<dyn QueryResolver>>,
}

impl SearchContext {
    /// Builds the context from an already-loaded corpus, constructing one
    /// rating index per modifier context.
    #[must_use]
    pub fn new(corpus: CorpusStore, config: EngineConfig) -> Self {
        let indexes =
            ModContext::ALL.map(|context| RatingIndex::build(corpus.ratings(context).map(|(id, t)| (id, *t))));
        Self {
            corpus,
            indexes,
            config,
            resolver: None,
        }
    }

    /// Loads the corpus from the configured flat files and builds the
    /// context.
    ///
    /// # Errors
    ///
    /// Returns load errors from the corpus flat files.
    pub fn load(config: EngineConfig) -> Result<Self> {
        let corpus = CorpusStore::load(&config.corpus)?;
        Ok(Self::new(corpus, config))
    }

    /// Attaches an on-demand query resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn QueryResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The loaded corpus.
    #[must_use]
    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn index(&self, context: ModContext) -> &RatingIndex {
        &self.indexes[context.index()]
    }

    pub(crate) fn resolver(&self) -> Option<&dyn QueryResolver> {
        self.resolver.as_deref()
    }
}

/// Shared rank-and-truncate stage, best first. The sort is stable, so
/// equal scores keep candidate-generation order.
pub(crate) fn rank_descending<T>(items: &mut Vec<T>, limit: usize, score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
    items.truncate(limit);
}

/// Shared rank-and-truncate stage, smallest metric first.
pub(crate) fn rank_ascending<T>(items: &mut Vec<T>, limit: usize, score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(a).total_cmp(&score(b)));
    items.truncate(limit);
}

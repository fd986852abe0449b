//! Error types for the similarity-search engine.
//!
//! Three families matter to callers: input errors (malformed filters, bad
//! rating ranges) that should be echoed back verbatim, not-found errors that
//! front ends phrase differently, and load errors that can only occur while
//! the corpus is being built. Query evaluation itself never fails on missing
//! data; absence evaluates to non-match.

use std::path::PathBuf;

use crate::MapId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors produced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed filter input: missing operator, unknown key, bad value,
    /// or an ordering operator applied to a string filter.
    #[error("{0}")]
    Filter(String),

    /// Rating range where the minimum exceeds the maximum.
    #[error("invalid rating range: minimum ({lo:.2}) is greater than maximum ({hi:.2})")]
    InvalidRatingRange {
        /// Requested lower bound.
        lo: f64,
        /// Requested upper bound.
        hi: f64,
    },

    /// Rating range wider than the configured span cap.
    #[error(
        "rating range [{lo:.2}, {hi:.2}] is too large ({span:.2} stars > {max:.2} star limit); \
         use a smaller range"
    )]
    RatingRangeTooWide {
        /// Requested lower bound.
        lo: f64,
        /// Requested upper bound.
        hi: f64,
        /// Width of the requested range.
        span: f64,
        /// Configured maximum width.
        max: f64,
    },

    /// Query beatmap absent from the corpus and not resolvable on demand.
    #[error("beatmap {0} not found")]
    MapNotFound(MapId),

    /// On-demand resolution of the query beatmap failed (fetch error,
    /// timeout, or derivation failure). Front ends treat this like
    /// [`Error::MapNotFound`].
    #[error("could not resolve beatmap {id}: {reason}")]
    Resolve {
        /// The beatmap that was being resolved.
        id: MapId,
        /// Collaborator-supplied failure description.
        reason: String,
    },

    /// A corpus flat file could not be parsed. Only raised during the load
    /// phase, never per query.
    #[error("failed to load {}: {reason}", path.display())]
    CorpusLoad {
        /// File that failed to parse.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Configuration file or environment override could not be read.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure while reading corpus files.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON corpus table failed to deserialize.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors a front end should phrase as "map not found" rather
    /// than as bad input: the id is unknown and on-demand resolution (if
    /// any) did not produce it.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MapNotFound(_) | Self::Resolve { .. })
    }

    /// True for errors caused by the caller's query text: filter syntax and
    /// rating-range violations.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::Filter(_) | Self::InvalidRatingRange { .. } | Self::RatingRangeTooWide { .. }
        )
    }
}

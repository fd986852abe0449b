//! Engine configuration.
//!
//! The two candidate-selection constants are product tuning, not correctness
//! requirements, so they live here rather than in code: the radius of the
//! default rating-proximity ball and the maximum width of an explicit rating
//! range. Both default to the empirically tuned "about one star" values.
//!
//! Configuration merges, in order: built-in defaults, an optional TOML file,
//! and `MAPSIM_`-prefixed environment variables (`MAPSIM_SEARCH__RATING_RADIUS`
//! overrides `[search] rating_radius`).

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Euclidean radius in the (overall, aim) rating plane used when the caller
/// supplies no explicit rating bound. Distance 0.7 approximates a one-star
/// rating window.
pub const DEFAULT_RATING_RADIUS: f64 = 0.7;

/// Widest rating range an explicit `sr>=a sr<=b` filter pair may request.
pub const DEFAULT_MAX_RATING_SPAN: f64 = 1.0;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candidate-selection tuning.
    pub search: SearchTuning,
    /// Corpus flat-file locations.
    pub corpus: CorpusPaths,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search: SearchTuning::default(),
            corpus: CorpusPaths::default(),
        }
    }
}

/// Tuned constants for candidate selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchTuning {
    /// Radius for the default proximity query in the rating plane.
    pub rating_radius: f64,
    /// Maximum width of an explicit rating-range filter.
    pub max_rating_span: f64,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            rating_radius: DEFAULT_RATING_RADIUS,
            max_rating_span: DEFAULT_MAX_RATING_SPAN,
        }
    }
}

/// Locations of the corpus flat files, all relative to one data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusPaths {
    /// Directory holding the corpus files.
    pub data_dir: PathBuf,
}

impl Default for CorpusPaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl CorpusPaths {
    /// Per-beatmap numeric and string attributes.
    #[must_use]
    pub fn stats_file(&self) -> PathBuf {
        self.data_dir.join("stats.json")
    }

    /// Per-beatmap status and date attributes.
    #[must_use]
    pub fn metadata_file(&self) -> PathBuf {
        self.data_dir.join("metadata.json")
    }

    /// Rating triples for one modifier context.
    #[must_use]
    pub fn ratings_file(&self, context: crate::corpus::ModContext) -> PathBuf {
        use crate::corpus::ModContext;
        let name = match context {
            ModContext::Nomod => "ratings.json",
            ModContext::DoubleTime => "ratings_dt.json",
            ModContext::HardRock => "ratings_hr.json",
        };
        self.data_dir.join(name)
    }

    /// Directory of per-beatmap structural fingerprint files.
    #[must_use]
    pub fn buckets_dir(&self) -> PathBuf {
        self.data_dir.join("buckets")
    }

    /// Slider geometry profiles.
    #[must_use]
    pub fn sliders_file(&self) -> PathBuf {
        self.data_dir.join("sliderstats.txt")
    }

    /// Per-(beatmap, mod-combo) performance table.
    #[must_use]
    pub fn performance_file(&self) -> PathBuf {
        self.data_dir.join("maplist_pp.txt")
    }
}

impl EngineConfig {
    /// Loads configuration from defaults, an optional TOML file, and
    /// `MAPSIM_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file or an override fails to parse.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("MAPSIM_").split("__"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }
}

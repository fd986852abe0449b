//! The corpus store: every per-beatmap table, loaded once at startup and
//! immutable for the life of the process.
//!
//! Ids may be present in some tables and absent from others; that is a data
//! gap, not an error. The store exposes the corpus to the filter engine
//! through a single resolver method, [`CorpusStore::attribute`], so the
//! engine never touches record layouts directly.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::config::CorpusPaths;
use crate::error::Result;
use crate::filter::{AttrKey, AttrValue, TextField};
use crate::fingerprint::Fingerprint;
use crate::MapId;

pub mod load;
mod record;

#[cfg(test)]
mod record_tests;

pub use record::{
    approval_category, canonical_mods, MetaRecord, ModContext, PerformanceEntry, RatingTriple,
    SliderProfile, StatsRecord,
};

/// All per-beatmap tables. Built once, then read-only; shared freely across
/// query workers without locking.
#[derive(Debug, Default)]
pub struct CorpusStore {
    stats: FxHashMap<MapId, StatsRecord>,
    metadata: FxHashMap<MapId, MetaRecord>,
    ratings: [FxHashMap<MapId, RatingTriple>; 3],
    fingerprints: FxHashMap<MapId, Fingerprint>,
    sliders: FxHashMap<MapId, SliderProfile>,
    performance: Vec<PerformanceEntry>,
}

impl CorpusStore {
    /// Assembles a store from already-built tables. The loaders use this;
    /// tests use it to build synthetic corpora without touching disk.
    #[must_use]
    pub fn from_parts(
        stats: FxHashMap<MapId, StatsRecord>,
        metadata: FxHashMap<MapId, MetaRecord>,
        ratings: [FxHashMap<MapId, RatingTriple>; 3],
        fingerprints: FxHashMap<MapId, Fingerprint>,
        sliders: FxHashMap<MapId, SliderProfile>,
        performance: Vec<PerformanceEntry>,
    ) -> Self {
        Self {
            stats,
            metadata,
            ratings,
            fingerprints,
            sliders,
            performance,
        }
    }

    /// Loads every table from the configured flat files.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or any present file
    /// is malformed. Optional tables (metadata, alternate-context ratings,
    /// slider profiles, performance) load as empty when absent.
    pub fn load(paths: &CorpusPaths) -> Result<Self> {
        let stats = load::load_stats(&paths.stats_file())?;
        let metadata = load::load_metadata(&paths.metadata_file())?;
        let ratings = [
            load::load_ratings(&paths.ratings_file(ModContext::Nomod), true)?,
            load::load_ratings(&paths.ratings_file(ModContext::DoubleTime), false)?,
            load::load_ratings(&paths.ratings_file(ModContext::HardRock), false)?,
        ];
        let fingerprints = load::load_fingerprints(&paths.buckets_dir())?;
        let sliders = load::load_slider_profiles(&paths.sliders_file())?;
        let performance = load::load_performance(&paths.performance_file())?;

        tracing::info!(
            beatmaps = stats.len(),
            fingerprints = fingerprints.len(),
            "corpus ready"
        );
        Ok(Self::from_parts(
            stats,
            metadata,
            ratings,
            fingerprints,
            sliders,
            performance,
        ))
    }

    /// Structural fingerprint for a beatmap, if one was ingested.
    #[must_use]
    pub fn fingerprint(&self, id: MapId) -> Option<&Fingerprint> {
        self.fingerprints.get(&id)
    }

    /// Rating triple for a beatmap under one modifier context.
    #[must_use]
    pub fn rating(&self, id: MapId, context: ModContext) -> Option<&RatingTriple> {
        self.ratings[context.index()].get(&id)
    }

    /// Every (id, triple) pair for one modifier context, for index builds.
    pub fn ratings(&self, context: ModContext) -> impl Iterator<Item = (MapId, &RatingTriple)> {
        self.ratings[context.index()].iter().map(|(id, t)| (*id, t))
    }

    /// Slider geometry profile for a beatmap.
    #[must_use]
    pub fn slider_profile(&self, id: MapId) -> Option<&SliderProfile> {
        self.sliders.get(&id)
    }

    /// Every (id, profile) pair, for the slider-mode linear scan.
    pub fn slider_profiles(&self) -> impl Iterator<Item = (MapId, &SliderProfile)> {
        self.sliders.iter().map(|(id, p)| (*id, p))
    }

    /// The performance table.
    #[must_use]
    pub fn performance_entries(&self) -> &[PerformanceEntry] {
        &self.performance
    }

    /// Stats record for a beatmap.
    #[must_use]
    pub fn stats(&self, id: MapId) -> Option<&StatsRecord> {
        self.stats.get(&id)
    }

    /// Number of beatmaps with stats records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// True when no stats records were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// The attribute resolver handed to the filter engine: maps one filter
    /// key to the record group that stores it. Absence (unknown id, data
    /// gap, null field) is `None`, which filters treat as non-match.
    #[must_use]
    pub fn attribute(&self, id: MapId, key: AttrKey) -> Option<AttrValue<'_>> {
        match key {
            AttrKey::Id => Some(AttrValue::Number(f64::from(id))),
            AttrKey::Stat(field) => {
                use crate::filter::StatField;
                let stats = self.stats.get(&id)?;
                let value = match field {
                    StatField::Ar => stats.ar,
                    StatField::Od => stats.od,
                    StatField::Hp => stats.hp,
                    StatField::Cs => stats.cs,
                    StatField::Length => stats.length,
                    StatField::MaxBpm => stats.max_bpm,
                    StatField::Circles => stats.circles,
                    StatField::Sliders => stats.sliders,
                    StatField::Spinners => stats.spinners,
                    StatField::Divisor => stats.divisor,
                };
                value.map(AttrValue::Number)
            }
            AttrKey::Rating(axis) => self
                .rating(id, ModContext::Nomod)
                .map(|triple| AttrValue::Number(triple.axis(axis))),
            // Tags live in the metadata table, the rest in stats.
            AttrKey::Text(TextField::Tags) => self
                .metadata
                .get(&id)?
                .tags_lookup
                .as_deref()
                .map(AttrValue::Text),
            AttrKey::Text(field) => {
                let stats = self.stats.get(&id)?;
                let value = match field {
                    TextField::Artist => stats.artist_lookup.as_deref(),
                    TextField::Creator => stats.creator_lookup.as_deref(),
                    TextField::Title => stats.title_lookup.as_deref(),
                    TextField::Version => stats.version_lookup.as_deref(),
                    // Tags was matched by the arm above.
                    TextField::Source | TextField::Tags => stats.source_lookup.as_deref(),
                };
                value.map(AttrValue::Text)
            }
            AttrKey::Category => self
                .metadata
                .get(&id)?
                .approved
                .map(|code| AttrValue::Text(approval_category(code))),
            AttrKey::Date(field) => {
                use crate::filter::DateField;
                let meta = self.metadata.get(&id)?;
                let value = match field {
                    DateField::Submitted => meta.submit_date.as_deref(),
                    DateField::Ranked => meta.approved_date.as_deref(),
                    DateField::Updated => meta.last_update.as_deref(),
                };
                value.map(AttrValue::Date)
            }
        }
    }

    /// True when every filter in the list matches this beatmap.
    #[must_use]
    pub fn matches_all(&self, id: MapId, filters: &[crate::filter::Filter]) -> bool {
        filters
            .iter()
            .all(|filter| filter.matches(self.attribute(id, filter.key)))
    }
}

/// Convenience wrapper used by loaders that take the whole path set.
impl CorpusStore {
    /// Loads a corpus rooted at `data_dir` with the conventional file names.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load(&CorpusPaths {
            data_dir: data_dir.to_path_buf(),
        })
    }
}

//! Flat-file corpus loaders.
//!
//! The stats table, unmodified ratings table, and fingerprint directory are
//! required; everything else is optional and logged when absent. Malformed
//! content in any file that does exist is a load error naming the file, so
//! the query path can assume well-shaped data.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use super::record::{MetaRecord, PerformanceEntry, RatingTriple, SliderProfile, StatsRecord};
use crate::error::{Error, Result};
use crate::fingerprint::{Fingerprint, TimeBucket};
use crate::MapId;

fn load_error(path: &Path, reason: impl Into<String>) -> Error {
    Error::CorpusLoad {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn parse_id(path: &Path, raw: &str) -> Result<MapId> {
    raw.parse::<MapId>()
        .map_err(|_| load_error(path, format!("`{raw}` is not a beatmap id")))
}

/// Loads the per-beatmap stats table (`stats.json`).
pub fn load_stats(path: &Path) -> Result<FxHashMap<MapId, StatsRecord>> {
    let text = fs::read_to_string(path)?;
    let raw: FxHashMap<String, StatsRecord> = serde_json::from_str(&text)?;

    let mut stats = FxHashMap::default();
    for (key, record) in raw {
        stats.insert(parse_id(path, &key)?, record);
    }
    tracing::info!(count = stats.len(), "loaded beatmap stats");
    Ok(stats)
}

/// Loads the status/date metadata table (`metadata.json`). A missing file
/// is an empty table: metadata-backed filters then never match.
pub fn load_metadata(path: &Path) -> Result<FxHashMap<MapId, MetaRecord>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "metadata table missing, date and category filters will not match");
        return Ok(FxHashMap::default());
    }
    let text = fs::read_to_string(path)?;
    let raw: FxHashMap<String, MetaRecord> = serde_json::from_str(&text)?;

    let mut metadata = FxHashMap::default();
    for (key, record) in raw {
        metadata.insert(parse_id(path, &key)?, record);
    }
    tracing::info!(count = metadata.len(), "loaded beatmap metadata");
    Ok(metadata)
}

/// Loads one modifier context's rating table. `required` controls whether
/// a missing file is an error or an empty table.
pub fn load_ratings(path: &Path, required: bool) -> Result<FxHashMap<MapId, RatingTriple>> {
    if !path.exists() && !required {
        tracing::warn!(path = %path.display(), "rating table missing for alternate context");
        return Ok(FxHashMap::default());
    }
    let text = fs::read_to_string(path)?;
    let raw: FxHashMap<String, RatingTriple> = serde_json::from_str(&text)?;

    let mut ratings = FxHashMap::default();
    for (key, triple) in raw {
        ratings.insert(parse_id(path, &key)?, triple);
    }
    tracing::info!(path = %path.display(), count = ratings.len(), "loaded rating triples");
    Ok(ratings)
}

/// Parses one fingerprint file: alternating lines of integer time offset
/// and a JSON array holding that bucket's histogram. Every histogram in
/// the corpus must share one length; `expected_len` carries it across
/// files and is fixed by the first bucket seen.
fn parse_fingerprint(path: &Path, text: &str, expected_len: &mut Option<usize>) -> Result<Fingerprint> {
    let mut buckets = Vec::new();
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    while let Some(offset_line) = lines.next() {
        let offset: i64 = offset_line
            .trim()
            .parse()
            .map_err(|_| load_error(path, format!("bad time offset `{}`", offset_line.trim())))?;

        let Some(vector_line) = lines.next() else {
            return Err(load_error(path, format!("offset {offset} has no histogram line")));
        };
        let histogram: Vec<f32> = serde_json::from_str(vector_line.trim())
            .map_err(|e| load_error(path, format!("bad histogram for offset {offset}: {e}")))?;

        match *expected_len {
            None => *expected_len = Some(histogram.len()),
            Some(len) if len != histogram.len() => {
                return Err(load_error(
                    path,
                    format!("histogram length {} differs from corpus shape {len}", histogram.len()),
                ));
            }
            Some(_) => {}
        }
        if histogram.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(load_error(
                path,
                format!("histogram for offset {offset} holds a negative or non-finite value"),
            ));
        }

        buckets.push(TimeBucket {
            offset_ms: offset as f64,
            histogram,
        });
    }

    Ok(Fingerprint::new(buckets))
}

/// Loads every fingerprint file under `dir`. File stems are beatmap ids;
/// files that are not `<id>.dist` are skipped with a warning.
pub fn load_fingerprints(dir: &Path) -> Result<FxHashMap<MapId, Fingerprint>> {
    let mut fingerprints = FxHashMap::default();
    let mut expected_len = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let id = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
            .and_then(|stem| stem.parse::<MapId>().ok());
        let Some(id) = id else {
            tracing::warn!(path = %path.display(), "skipping non-fingerprint file");
            continue;
        };

        let text = fs::read_to_string(&path)?;
        fingerprints.insert(id, parse_fingerprint(&path, &text, &mut expected_len)?);
    }

    tracing::info!(count = fingerprints.len(), "loaded structural fingerprints");
    Ok(fingerprints)
}

/// Loads slider profiles (`sliderstats.txt`): alternating lines of
/// `<id>.sldr` and five comma-separated components.
pub fn load_slider_profiles(path: &Path) -> Result<FxHashMap<MapId, SliderProfile>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "slider profile table missing, slider search disabled");
        return Ok(FxHashMap::default());
    }

    let text = fs::read_to_string(path)?;
    let mut profiles = FxHashMap::default();
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    while let Some(name_line) = lines.next() {
        let stem = name_line.trim().split('.').next().unwrap_or("");
        let id = parse_id(path, stem)?;

        let Some(value_line) = lines.next() else {
            return Err(load_error(path, format!("profile {id} has no component line")));
        };
        let components: Vec<f64> = value_line
            .trim()
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| load_error(path, format!("bad profile components for {id}")))?;
        let &[mean_velocity, mean_length, std_velocity, std_length, ratio] = components.as_slice()
        else {
            return Err(load_error(
                path,
                format!("profile {id} has {} components, expected 5", components.len()),
            ));
        };

        profiles.insert(
            id,
            SliderProfile {
                mean_velocity,
                mean_length,
                std_velocity,
                std_length,
                ratio,
            },
        );
    }

    tracing::info!(count = profiles.len(), "loaded slider profiles");
    Ok(profiles)
}

/// Loads the performance table (`maplist_pp.txt`): one
/// `id,mods,count,weight,avg_pp,max_pp` row per line.
pub fn load_performance(path: &Path) -> Result<Vec<PerformanceEntry>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "performance table missing, overweight search disabled");
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let &[id, mods, count, weight, avg_pp, max_pp] = fields.as_slice() else {
            return Err(load_error(path, format!("bad performance row `{line}`")));
        };
        entries.push(PerformanceEntry {
            id: parse_id(path, id)?,
            mods: mods.to_string(),
            score_count: count
                .parse()
                .map_err(|_| load_error(path, format!("bad score count in `{line}`")))?,
            avg_weight: weight
                .parse()
                .map_err(|_| load_error(path, format!("bad weight in `{line}`")))?,
            avg_pp: avg_pp
                .parse()
                .map_err(|_| load_error(path, format!("bad avg pp in `{line}`")))?,
            max_pp: max_pp
                .parse()
                .map_err(|_| load_error(path, format!("bad max pp in `{line}`")))?,
        });
    }

    tracing::info!(count = entries.len(), "loaded performance entries");
    Ok(entries)
}

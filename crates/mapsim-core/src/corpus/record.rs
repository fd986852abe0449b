//! Per-beatmap record types as they arrive from the ingestion pipeline.

use serde::{Deserialize, Serialize};

use crate::filter::RatingAxis;
use crate::MapId;

/// Modifier context a rating triple was computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModContext {
    /// Unmodified gameplay.
    Nomod,
    /// Faster timing (covers the NC variant as well).
    DoubleTime,
    /// Harder geometry.
    HardRock,
}

impl ModContext {
    /// Every context, in table order.
    pub const ALL: [Self; 3] = [Self::Nomod, Self::DoubleTime, Self::HardRock];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Nomod => 0,
            Self::DoubleTime => 1,
            Self::HardRock => 2,
        }
    }

    /// Short display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Nomod => "NM",
            Self::DoubleTime => "DT",
            Self::HardRock => "HR",
        }
    }
}

impl std::str::FromStr for ModContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nm" | "nomod" => Ok(Self::Nomod),
            "dt" | "nc" => Ok(Self::DoubleTime),
            "hr" => Ok(Self::HardRock),
            other => Err(format!("unknown modifier context `{other}`")),
        }
    }
}

/// Difficulty rating triple for one (beatmap, context) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct RatingTriple {
    /// Overall rating.
    pub overall: f64,
    /// Primary difficulty axis.
    pub aim: f64,
    /// Secondary difficulty axis.
    pub speed: f64,
}

impl From<[f64; 3]> for RatingTriple {
    fn from(v: [f64; 3]) -> Self {
        Self {
            overall: v[0],
            aim: v[1],
            speed: v[2],
        }
    }
}

impl From<RatingTriple> for [f64; 3] {
    fn from(t: RatingTriple) -> Self {
        [t.overall, t.aim, t.speed]
    }
}

impl RatingTriple {
    /// The 2-D coordinate the spatial index and distance ranking use.
    #[must_use]
    pub fn plane(&self) -> [f64; 2] {
        [self.overall, self.aim]
    }

    /// Euclidean distance to another triple in the (overall, aim) plane.
    #[must_use]
    pub fn plane_distance(&self, other: &Self) -> f64 {
        let dx = self.overall - other.overall;
        let dy = self.aim - other.aim;
        dx.hypot(dy)
    }

    /// One axis of the triple.
    #[must_use]
    pub fn axis(&self, axis: RatingAxis) -> f64 {
        match axis {
            RatingAxis::Overall => self.overall,
            RatingAxis::Aim => self.aim,
            RatingAxis::Speed => self.speed,
        }
    }
}

/// Numeric and string attributes extracted from the beatmap file itself.
/// Every field is optional: older ingestion runs produced partial records,
/// and filters against absent attributes simply never match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    /// Approach rate.
    pub ar: Option<f64>,
    /// Overall difficulty.
    pub od: Option<f64>,
    /// Health drain rate.
    pub hp: Option<f64>,
    /// Circle size.
    pub cs: Option<f64>,
    /// Length in seconds.
    pub length: Option<f64>,
    /// Maximum BPM.
    pub max_bpm: Option<f64>,
    /// Circle count.
    pub circles: Option<f64>,
    /// Slider count.
    pub sliders: Option<f64>,
    /// Spinner count.
    pub spinners: Option<f64>,
    /// Rhythm divisor.
    pub divisor: Option<f64>,

    /// Song artist, as written.
    pub artist: Option<String>,
    /// Song title, as written.
    pub title: Option<String>,
    /// Beatmap creator, as written.
    pub creator: Option<String>,
    /// Difficulty name, as written.
    pub version: Option<String>,
    /// Source media, as written.
    pub source: Option<String>,

    /// Precomputed lookup form of `artist`.
    pub artist_lookup: Option<String>,
    /// Precomputed lookup form of `title`.
    pub title_lookup: Option<String>,
    /// Precomputed lookup form of `creator`.
    pub creator_lookup: Option<String>,
    /// Precomputed lookup form of `version`.
    pub version_lookup: Option<String>,
    /// Precomputed lookup form of `source`.
    pub source_lookup: Option<String>,
}

/// Status and date attributes from the host game's listing API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaRecord {
    /// Precomputed lookup form of the tag list.
    pub tags_lookup: Option<String>,
    /// Submission timestamp (ISO-8601).
    pub submit_date: Option<String>,
    /// Approval timestamp (ISO-8601), absent while unranked.
    pub approved_date: Option<String>,
    /// Last-update timestamp (ISO-8601).
    pub last_update: Option<String>,
    /// Approval state code.
    pub approved: Option<i32>,
}

/// Maps an approval state code to its category name. Unrecognized codes
/// resolve to an empty category rather than an error.
#[must_use]
pub fn approval_category(code: i32) -> &'static str {
    match code {
        -2 => "graveyard",
        -1 => "wip",
        0 => "pending",
        1 => "ranked",
        2 => "approved",
        3 => "qualified",
        4 => "loved",
        _ => "",
    }
}

/// Aggregate slider geometry profile for one beatmap: mean and standard
/// deviation of (velocity, length) over all sliders, plus the slider ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderProfile {
    /// Mean slider velocity.
    pub mean_velocity: f64,
    /// Mean slider length.
    pub mean_length: f64,
    /// Velocity standard deviation.
    pub std_velocity: f64,
    /// Length standard deviation.
    pub std_length: f64,
    /// Sliders as a share of all objects.
    pub ratio: f64,
}

impl SliderProfile {
    /// Euclidean distance between two profiles over all five components.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let d = [
            self.mean_velocity - other.mean_velocity,
            self.mean_length - other.mean_length,
            self.std_velocity - other.std_velocity,
            self.std_length - other.std_length,
            self.ratio - other.ratio,
        ];
        d.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

/// Score-table aggregate for one (beatmap, mod combo) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceEntry {
    /// Beatmap id.
    pub id: MapId,
    /// Canonical mod combo the scores were set with.
    pub mods: String,
    /// Number of recorded scores.
    pub score_count: u32,
    /// Mean positional weight of those scores in their players' top lists.
    pub avg_weight: f64,
    /// Mean pp of those scores.
    pub avg_pp: f64,
    /// Highest pp among them.
    pub max_pp: f64,
}

impl PerformanceEntry {
    /// Overweight metric: positional weight scaled by how broadly the map
    /// appears in score tables, saturating at 100 recorded scores.
    #[must_use]
    pub fn overweight(&self) -> f64 {
        f64::from(self.score_count.min(100)) / 100.0 * self.avg_weight
    }
}

/// Mod groups in canonical order; the first name of a matched group is the
/// one that appears in the canonical combo string.
const MOD_GROUPS: [&[&str]; 7] = [
    &["NM"],
    &["EZ"],
    &["HD"],
    &["HR"],
    &["HT"],
    &["DT", "NC"],
    &["FL"],
];

/// Canonicalizes a free-form mod string: case-folded, synonyms collapsed
/// (NC counts as DT), groups emitted in fixed order, unknown mods dropped.
#[must_use]
pub fn canonical_mods(mods: &str) -> String {
    let upper = mods.to_ascii_uppercase();
    let mut combo = String::new();
    for group in MOD_GROUPS {
        if group.iter().any(|m| upper.contains(m)) {
            combo.push_str(group[0]);
        }
    }
    combo
}

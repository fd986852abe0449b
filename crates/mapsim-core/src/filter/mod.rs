//! Typed filter predicates: parsing user filter text and evaluating the
//! resulting comparisons against an attribute resolver.
//!
//! A filter is `key operator value`, whitespace-separated from its peers,
//! with no whitespace around the operator. String and date values may be
//! quoted (single or double) to carry embedded spaces. Keys form a closed
//! set: every recognized key maps at parse time to one variant of
//! [`AttrKey`], including aliases (`bpm` for `max_bpm`, `drain` for `hp`)
//! and derived keys (`category` from the approval status code).
//!
//! Evaluation never fails: a missing attribute is a non-match for every
//! operator. All rejection of malformed input happens at parse time.

use crate::error::{Error, Result};

#[cfg(test)]
mod parse_tests;

/// Operator symbols in match priority order. Two-character symbols come
/// first so `>=` is not read as `>` followed by a stray `=`.
const SYMBOLS: [(&str, CompareOp); 8] = [
    ("!=", CompareOp::Ne),
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    ("==", CompareOp::Eq),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
    ("=", CompareOp::Eq),
    (":", CompareOp::Eq),
];

/// Comparison operator. `=`, `==`, and `:` all parse to [`CompareOp::Eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equality (`=`, `==`, `:`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Strictly less (`<`).
    Lt,
    /// Strictly greater (`>`).
    Gt,
    /// At most (`<=`).
    Le,
    /// At least (`>=`).
    Ge,
}

impl CompareOp {
    /// True for `<`, `>`, `<=`, `>=`, the operators string filters reject.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Gt | Self::Le | Self::Ge)
    }

    fn matches_ordering(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            Self::Eq => ord == Equal,
            Self::Ne => ord != Equal,
            Self::Lt => ord == Less,
            Self::Gt => ord == Greater,
            Self::Le => ord != Greater,
            Self::Ge => ord != Less,
        }
    }
}

/// Numeric beatmap attributes stored in the stats table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    /// Approach rate.
    Ar,
    /// Overall difficulty.
    Od,
    /// Health drain rate (`hp`, alias `drain`, `dr`).
    Hp,
    /// Circle size.
    Cs,
    /// Length in seconds.
    Length,
    /// Maximum BPM (alias `bpm`).
    MaxBpm,
    /// Circle count.
    Circles,
    /// Slider count.
    Sliders,
    /// Spinner count.
    Spinners,
    /// Rhythm divisor.
    Divisor,
}

/// Axes of a rating triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingAxis {
    /// Overall rating (`sr`, `star`, `stars`).
    Overall,
    /// Primary difficulty axis (`aim`, `aimsr`).
    Aim,
    /// Secondary difficulty axis (`tap`, `tapsr`).
    Speed,
}

/// String attributes, matched on their lookup-normalized forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// Song artist.
    Artist,
    /// Beatmap creator.
    Creator,
    /// Song title.
    Title,
    /// Difficulty name (`difficulty`, `diff`, `version`).
    Version,
    /// Source media.
    Source,
    /// Beatmap tags.
    Tags,
}

/// Date attributes from the metadata table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// Submission date (`created`, `submitted`).
    Submitted,
    /// Approval date (`ranked`).
    Ranked,
    /// Last update (`updated`).
    Updated,
}

/// A filter key resolved to its attribute family. Closed and enumerable:
/// the resolver dispatches on the variant, never on raw key strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKey {
    /// The beatmap id itself.
    Id,
    /// A numeric stat attribute.
    Stat(StatField),
    /// A rating-triple axis (unmodified context).
    Rating(RatingAxis),
    /// A lookup-normalized string attribute.
    Text(TextField),
    /// Approval category derived from the status code.
    Category,
    /// A status/date attribute.
    Date(DateField),
}

/// The three value kinds a filter can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Real-valued comparison.
    Numeric,
    /// Normalized string equality.
    Text,
    /// Partial-precision date comparison.
    Date,
}

impl AttrKey {
    /// Maps a user-facing key (including aliases) to its attribute family.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let parsed = match key {
            "id" => Self::Id,
            "ar" => Self::Stat(StatField::Ar),
            "od" => Self::Stat(StatField::Od),
            "hp" | "drain" | "dr" => Self::Stat(StatField::Hp),
            "cs" => Self::Stat(StatField::Cs),
            "length" => Self::Stat(StatField::Length),
            "bpm" | "max_bpm" => Self::Stat(StatField::MaxBpm),
            "circles" => Self::Stat(StatField::Circles),
            "sliders" => Self::Stat(StatField::Sliders),
            "spinners" => Self::Stat(StatField::Spinners),
            "divisor" => Self::Stat(StatField::Divisor),
            "sr" | "star" | "stars" => Self::Rating(RatingAxis::Overall),
            "aim" | "aimsr" => Self::Rating(RatingAxis::Aim),
            "tap" | "tapsr" => Self::Rating(RatingAxis::Speed),
            "artist" => Self::Text(TextField::Artist),
            "creator" => Self::Text(TextField::Creator),
            "title" => Self::Text(TextField::Title),
            "difficulty" | "diff" | "version" => Self::Text(TextField::Version),
            "source" => Self::Text(TextField::Source),
            "tags" => Self::Text(TextField::Tags),
            "status" | "category" => Self::Category,
            "created" | "submitted" => Self::Date(DateField::Submitted),
            "ranked" => Self::Date(DateField::Ranked),
            "updated" => Self::Date(DateField::Updated),
            _ => return None,
        };
        Some(parsed)
    }

    /// The value kind this key compares against.
    #[must_use]
    pub fn kind(self) -> ValueKind {
        match self {
            Self::Id | Self::Stat(_) | Self::Rating(_) => ValueKind::Numeric,
            Self::Text(_) | Self::Category => ValueKind::Text,
            Self::Date(_) => ValueKind::Date,
        }
    }
}

/// A parsed, typed filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Real number.
    Number(f64),
    /// Lookup-normalized string.
    Text(String),
    /// Validated date string of precision YYYY, YYYY-MM, or YYYY-MM-DD.
    Date(String),
}

/// An attribute value produced by a resolver. Text values arrive already
/// lookup-normalized; date values are ISO-8601 strings of any precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue<'a> {
    /// Numeric attribute.
    Number(f64),
    /// Lookup-normalized string attribute.
    Text(&'a str),
    /// Date attribute.
    Date(&'a str),
}

/// One parsed filter predicate. Immutable once built; evaluated against
/// resolver output, never against the data model directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Attribute family this filter targets.
    pub key: AttrKey,
    /// Comparison to perform.
    pub op: CompareOp,
    /// Parsed comparison value, kind-matched to `key`.
    pub value: FilterValue,
}

impl Filter {
    /// Evaluates this filter against a resolved attribute value. A missing
    /// attribute never matches; a kind mismatch (data gap) never matches.
    #[must_use]
    pub fn matches(&self, actual: Option<AttrValue<'_>>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match (&self.value, actual) {
            (FilterValue::Number(expected), AttrValue::Number(actual)) => {
                self.op.matches_ordering(actual.total_cmp(expected))
            }
            (FilterValue::Text(expected), AttrValue::Text(actual)) => match self.op {
                CompareOp::Eq => actual == expected,
                CompareOp::Ne => actual != expected,
                // Ordering operators are rejected at parse time.
                _ => false,
            },
            (FilterValue::Date(expected), AttrValue::Date(actual)) => {
                self.op.matches_ordering(compare_date_prefix(actual, expected))
            }
            _ => false,
        }
    }
}

/// Lowercases and strips everything but ASCII alphanumerics. The same
/// folding the corpus ETL applies when precomputing `*_lookup` fields.
#[must_use]
pub fn normalize_lookup(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Compares two dates after truncating both to the shorter precision, so a
/// `2021` query matches any date within that year. Dates are ASCII and
/// zero-padded, so prefix comparison is chronological.
fn compare_date_prefix(actual: &str, expected: &str) -> std::cmp::Ordering {
    let len = actual.len().min(expected.len());
    actual.as_bytes()[..len].cmp(&expected.as_bytes()[..len])
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Validates a date filter value: YYYY, YYYY-MM, or YYYY-MM-DD.
fn validate_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    match parts.as_slice() {
        [year] => year.len() == 4 && all_digits(year),
        [year, month] => {
            year.len() == 4
                && all_digits(year)
                && month.len() == 2
                && all_digits(month)
                && (1..=12).contains(&month.parse::<u8>().unwrap_or(0))
        }
        [year, month, day] => {
            year.len() == 4
                && all_digits(year)
                && month.len() == 2
                && all_digits(month)
                && (1..=12).contains(&month.parse::<u8>().unwrap_or(0))
                && day.len() == 2
                && all_digits(day)
                && (1..=31).contains(&day.parse::<u8>().unwrap_or(0))
        }
        _ => false,
    }
}

/// Splits filter text into tokens, honoring single and double quotes so
/// quoted values may contain spaces.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                current.push(c);
                for inner in chars.by_ref() {
                    current.push(inner);
                    if inner == c {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Strips one pair of matching outer quotes, if present.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_value(key: &str, attr: AttrKey, raw: &str) -> Result<FilterValue> {
    let raw = unquote(raw);
    match attr.kind() {
        ValueKind::Text => Ok(FilterValue::Text(normalize_lookup(raw))),
        ValueKind::Date => {
            if validate_date(raw) {
                Ok(FilterValue::Date(raw.to_string()))
            } else {
                Err(Error::Filter(format!(
                    "Invalid date value for filter `{key}`: `{raw}`. \
                     Use YYYY, YYYY-MM, or YYYY-MM-DD."
                )))
            }
        }
        ValueKind::Numeric => {
            let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            cleaned
                .parse::<f64>()
                .map(FilterValue::Number)
                .map_err(|_| {
                    Error::Filter(format!(
                        "Invalid numeric value for filter `{key}`: `{raw}`"
                    ))
                })
        }
    }
}

fn parse_token(token: &str) -> Result<Filter> {
    let mut found: Option<(usize, &str, CompareOp)> = None;
    for (symbol, op) in SYMBOLS {
        if let Some(index) = token.find(symbol) {
            found = Some((index, symbol, op));
            break;
        }
    }
    let Some((index, symbol, op)) = found else {
        return Err(Error::Filter(format!(
            "No operator found in filter `{token}`. Don't include spaces around \
             operators (e.g. `ar>=9`, not `ar >= 9`)."
        )));
    };

    let key = &token[..index];
    let raw_value = &token[index + symbol.len()..];

    if key.is_empty() {
        return Err(Error::Filter(format!(
            "No filter key found in `{token}`. Filters are `key operator value` \
             (e.g. `ar>=9`, not `>=9`)."
        )));
    }

    let Some(attr) = AttrKey::parse(key) else {
        return Err(Error::Filter(format!("Filter `{key}` is not supported.")));
    };

    if attr.kind() == ValueKind::Text && op.is_ordering() {
        return Err(Error::Filter(format!(
            "Operator `{symbol}` is not supported for string filter `{key}`. \
             Use one of: `=`, `==`, `:`, `!=`."
        )));
    }

    let value = parse_value(key, attr, raw_value)?;
    Ok(Filter {
        key: attr,
        op,
        value,
    })
}

/// Parses filter text into predicates.
///
/// # Errors
///
/// Returns [`Error::Filter`] with a caller-facing message for a missing
/// operator, empty key, unknown key, unparsable numeric or date value, or
/// an ordering operator on a string filter.
pub fn parse_filters(input: &str) -> Result<Vec<Filter>> {
    tokenize(input)
        .iter()
        .map(|token| parse_token(token))
        .collect()
}

/// Overall-rating bounds extracted from a filter list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingBounds {
    /// Lower bound, from `sr>=` / `sr>` / equality.
    pub lo: Option<f64>,
    /// Upper bound, from `sr<=` / `sr<` / equality.
    pub hi: Option<f64>,
}

impl RatingBounds {
    /// True when at least one bound was supplied.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.lo.is_some() || self.hi.is_some()
    }

    /// Turns the bounds into a concrete `[lo, hi]` window, or `None` when
    /// no bound was supplied. A single bound derives the other by
    /// `max_span`; a full pair is validated, never silently clamped.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRatingRange`] when the minimum exceeds the maximum,
    /// [`Error::RatingRangeTooWide`] when the pair spans more than
    /// `max_span`.
    pub fn resolve(self, max_span: f64) -> Result<Option<(f64, f64)>> {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) => {
                if hi < lo {
                    return Err(Error::InvalidRatingRange { lo, hi });
                }
                let span = hi - lo;
                if span > max_span {
                    return Err(Error::RatingRangeTooWide {
                        lo,
                        hi,
                        span,
                        max: max_span,
                    });
                }
                Ok(Some((lo, hi)))
            }
            (Some(lo), None) => Ok(Some((lo, lo + max_span))),
            (None, Some(hi)) => Ok(Some((hi - max_span, hi))),
            (None, None) => Ok(None),
        }
    }
}

fn tighten(slot: &mut Option<f64>, value: f64, keep_greater: bool) {
    *slot = Some(match *slot {
        Some(existing) if keep_greater => existing.max(value),
        Some(existing) => existing.min(value),
        None => value,
    });
}

/// Consumes overall-rating filters from a list, turning them into range
/// bounds for candidate selection. `>`/`>=` tighten the lower bound,
/// `<`/`<=` the upper, equality pins both. The remaining filters are
/// returned for the general evaluation pass; the range scan is inclusive,
/// so strict and non-strict bounds are treated alike.
#[must_use]
pub fn split_rating_bounds(filters: Vec<Filter>) -> (RatingBounds, Vec<Filter>) {
    let mut bounds = RatingBounds::default();
    let mut rest = Vec::with_capacity(filters.len());

    for filter in filters {
        let is_overall = filter.key == AttrKey::Rating(RatingAxis::Overall);
        let value = match &filter.value {
            FilterValue::Number(v) if is_overall => *v,
            _ => {
                rest.push(filter);
                continue;
            }
        };
        match filter.op {
            CompareOp::Ge | CompareOp::Gt => tighten(&mut bounds.lo, value, true),
            CompareOp::Le | CompareOp::Lt => tighten(&mut bounds.hi, value, false),
            CompareOp::Eq => {
                tighten(&mut bounds.lo, value, true);
                tighten(&mut bounds.hi, value, false);
            }
            // `sr!=x` is not a range bound; evaluate it like any filter.
            CompareOp::Ne => rest.push(filter),
        }
    }

    (bounds, rest)
}

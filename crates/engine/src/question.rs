use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, Feature};
use crate::config::EngineConfig;
use crate::scorer::balance_gain;

pub(crate) const LIST_PREFIX: &str = "Is your player one of these:";
pub(crate) const TEAM_PREFIX: &str = "Is your player on the ";
pub(crate) const AWARDS_QUESTION: &str = "Has your player received any awards?";

/// Fixed position buckets, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionBucket {
    #[serde(rename = "strictly a Guard")]
    Guard,
    #[serde(rename = "strictly a Forward")]
    Forward,
    #[serde(rename = "strictly a Center")]
    Center,
    #[serde(rename = "a Guard-Forward (G-F) hybrid")]
    GuardForward,
    #[serde(rename = "a Forward-Center (F-C) hybrid")]
    ForwardCenter,
}

impl PositionBucket {
    pub const ALL: [PositionBucket; 5] = [
        PositionBucket::Guard,
        PositionBucket::Forward,
        PositionBucket::Center,
        PositionBucket::GuardForward,
        PositionBucket::ForwardCenter,
    ];

    /// Normalised position code this bucket matches exactly
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            PositionBucket::Guard => "G",
            PositionBucket::Forward => "F",
            PositionBucket::Center => "C",
            PositionBucket::GuardForward => "G-F",
            PositionBucket::ForwardCenter => "F-C",
        }
    }

    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            PositionBucket::Guard => "strictly a Guard",
            PositionBucket::Forward => "strictly a Forward",
            PositionBucket::Center => "strictly a Center",
            PositionBucket::GuardForward => "a Guard-Forward (G-F) hybrid",
            PositionBucket::ForwardCenter => "a Forward-Center (F-C) hybrid",
        }
    }
}

/// A yes/no split of the pool.
///
/// This is both the predicate and the descriptor ("meta") sent alongside the
/// question text. The text is rendered from it, never the other way round,
/// except in the compatibility parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Split {
    /// Terminal enumeration of names
    List { names: Vec<String> },
    Team { value: String },
    Position { phrase: PositionBucket },
    Awards,
    /// `value > threshold` answers yes
    Numeric { col: Feature, threshold: f64 },
}

impl Split {
    /// Does the candidate fall on the "yes" side?
    #[must_use]
    pub fn matches(&self, candidate: &Candidate) -> bool {
        match self {
            Split::List { names } => names.iter().any(|n| *n == candidate.full_name),
            Split::Team { value } => candidate.team == *value,
            Split::Position { phrase } => candidate.position == phrase.code(),
            Split::Awards => candidate.has_awards(),
            Split::Numeric { col, threshold } => candidate.feature(*col) > *threshold,
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Split::List { .. })
    }

    /// Exact question text for this split
    #[must_use]
    pub fn question(&self) -> String {
        match self {
            Split::List { names } => format!("{LIST_PREFIX} {}?", names.join(", ")),
            Split::Team { value } => format!("{TEAM_PREFIX}{value}?"),
            Split::Position { phrase } => format!("Is your player {}?", phrase.phrase()),
            Split::Awards => AWARDS_QUESTION.to_string(),
            Split::Numeric { col, threshold } => numeric_question(*col, *threshold),
        }
    }
}

fn numeric_question(col: Feature, threshold: f64) -> String {
    match col {
        Feature::Height => {
            let (feet, inches) = feet_and_inches(threshold);
            format!("Is your player taller than {feet}'{inches}\"?")
        }
        Feature::Age => format!("Is your player older than {} years?", threshold.trunc() as i64),
        Feature::Weight => format!("Is your player heavier than {} lbs?", threshold.trunc() as i64),
        // `{:.1}` rounds the exact binary value half-to-even.
        _ => format!(
            "Does your player average more than {threshold:.1} {}?",
            col.stat_name()
        ),
    }
}

/// Split a centimetre height into whole feet and nearest-inch remainder.
///
/// The remainder can round up to 12 (e.g. `6'12"`); callers see it verbatim.
#[must_use]
pub fn feet_and_inches(cm: f64) -> (i64, i64) {
    let inches = cm / 2.54;
    let feet = (inches / 12.0).floor() as i64;
    let rem = inches.rem_euclid(12.0).round_ties_even() as i64;
    (feet, rem)
}

/// A question ready for the caller: display text plus its descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub meta: Split,
}

impl From<Split> for Question {
    fn from(meta: Split) -> Self {
        Self {
            question: meta.question(),
            meta,
        }
    }
}

/// Enumerates candidate splits and keeps the most balanced one.
#[derive(Debug, Clone, Copy)]
pub struct QuestionCatalogue {
    list_threshold: usize,
}

impl Default for QuestionCatalogue {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl QuestionCatalogue {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            list_threshold: config.list_threshold,
        }
    }

    /// Best split for the pool.
    ///
    /// Families are scanned team, position, awards, numeric; within a family
    /// in discovery order. Only a strictly greater gain replaces the current
    /// best, so the first maximal split wins.
    #[must_use]
    pub fn best_split(&self, pool: &[Candidate]) -> Split {
        if pool.len() <= self.list_threshold {
            return list_of(pool);
        }

        let total = pool.len();
        let mut best: Option<(f64, Split)> = None;
        let mut offer = |gain: f64, split: Split| {
            if best.as_ref().map_or(true, |(best_gain, _)| gain > *best_gain) {
                best = Some((gain, split));
            }
        };

        for team in distinct_teams(pool) {
            let left = pool.iter().filter(|c| c.team == team).count();
            // One-sided team splits still compete; the tree builder stops on them.
            offer(
                balance_gain(total, left, total - left),
                Split::Team {
                    value: team.to_string(),
                },
            );
        }

        for bucket in PositionBucket::ALL {
            let left = pool.iter().filter(|c| c.position == bucket.code()).count();
            let right = total - left;
            if left == 0 || right == 0 {
                continue;
            }
            offer(
                balance_gain(total, left, right),
                Split::Position { phrase: bucket },
            );
        }

        let with_awards = pool.iter().filter(|c| c.has_awards()).count();
        if with_awards > 0 && with_awards < total {
            offer(
                balance_gain(total, with_awards, total - with_awards),
                Split::Awards,
            );
        }

        for col in Feature::ALL {
            let values: Vec<f64> = pool.iter().map(|c| c.feature(col)).collect();
            for threshold in midpoints(&values) {
                let at_or_below = values.iter().filter(|v| **v <= threshold).count();
                let above = total - at_or_below;
                if at_or_below == 0 || above == 0 {
                    continue;
                }
                offer(
                    balance_gain(total, at_or_below, above),
                    Split::Numeric { col, threshold },
                );
            }
        }

        match best {
            Some((gain, split)) => {
                log::debug!("Best split over {total} candidates: {split:?} (gain {gain})");
                split
            }
            None => {
                log::debug!("No usable split over {total} candidates, enumerating half");
                list_of(&pool[..(total / 2).max(1)])
            }
        }
    }

    #[must_use]
    pub fn choose(&self, pool: &[Candidate]) -> Question {
        self.best_split(pool).into()
    }
}

/// Next question for the pool under default settings
#[must_use]
pub fn choose_best_question(pool: &[Candidate]) -> Question {
    QuestionCatalogue::default().choose(pool)
}

fn list_of(pool: &[Candidate]) -> Split {
    Split::List {
        names: pool.iter().map(|c| c.full_name.clone()).collect(),
    }
}

/// Non-empty team names in first-appearance order
fn distinct_teams(pool: &[Candidate]) -> Vec<&str> {
    let mut teams: Vec<&str> = Vec::new();
    for candidate in pool {
        let team = candidate.team.as_str();
        if !team.is_empty() && !teams.contains(&team) {
            teams.push(team);
        }
    }
    teams
}

/// Midpoints between consecutive distinct sorted values
pub(crate) fn midpoints(values: &[f64]) -> Vec<f64> {
    let mut uniq: Vec<f64> = values.to_vec();
    uniq.sort_by(f64::total_cmp);
    uniq.dedup_by(|a, b| a == b);
    uniq.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

//! Filtering a pool by an answered question.
//!
//! [`apply_split`] is the primary path: it filters by the descriptor that came
//! with the question. [`apply_answer_filter`] exists for callers that only kept
//! the question text. It recovers a [`Split`] from the text and defers to
//! [`apply_split`]; text it cannot read leaves the pool unchanged.

use crate::candidate::{Candidate, Feature};
use crate::question::{PositionBucket, Split, LIST_PREFIX, TEAM_PREFIX};

/// Keep the candidates whose side of `split` agrees with `answer`.
#[must_use]
pub fn apply_split(pool: &[Candidate], split: &Split, answer: bool) -> Vec<Candidate> {
    pool.iter()
        .filter(|c| split.matches(c) == answer)
        .cloned()
        .collect()
}

/// Filter by question text alone.
#[must_use]
pub fn apply_answer_filter(pool: &[Candidate], question: &str, answer: bool) -> Vec<Candidate> {
    match Split::parse(question) {
        Some(split) => apply_split(pool, &split, answer),
        None => {
            log::debug!("Unrecognised question text, pool left unchanged: {question:?}");
            pool.to_vec()
        }
    }
}

/// Position needles in match order
const POSITION_NEEDLES: [(&str, PositionBucket); 5] = [
    ("strictly a Guard", PositionBucket::Guard),
    ("strictly a Forward", PositionBucket::Forward),
    ("strictly a Center", PositionBucket::Center),
    ("Guard-Forward", PositionBucket::GuardForward),
    ("Forward-Center", PositionBucket::ForwardCenter),
];

impl Split {
    /// Recover the split a question text was rendered from.
    ///
    /// Rules are tried in a fixed order and the first match wins. Numeric
    /// thresholds come back as written in the text (whole years, whole
    /// pounds, whole inches converted to centimetres, one-decimal stats).
    #[must_use]
    pub fn parse(question: &str) -> Option<Split> {
        if let Some(body) = question.strip_prefix(LIST_PREFIX) {
            let names = body
                .trim_start()
                .trim_end_matches('?')
                .split(", ")
                .map(|n| n.trim().to_string())
                .collect();
            return Some(Split::List { names });
        }

        if let Some(rest) = question.strip_prefix(TEAM_PREFIX) {
            return Some(Split::Team {
                value: rest.trim_end_matches('?').to_string(),
            });
        }

        if let Some((_, bucket)) = POSITION_NEEDLES
            .iter()
            .find(|(needle, _)| question.contains(needle))
        {
            return Some(Split::Position { phrase: *bucket });
        }

        if question.starts_with("Has your player received any awards") {
            return Some(Split::Awards);
        }

        if let Some(tail) = after_last(question, "older than ") {
            let years = parse_number::<i64>(first_word(tail), question)?;
            return Some(numeric(Feature::Age, years as f64));
        }

        if let Some(tail) = after_last(question, "taller than ") {
            let cm = parse_feet_inches(tail.trim_end_matches('?'), question)?;
            return Some(numeric(Feature::Height, cm));
        }

        if let Some(tail) = after_last(question, "heavier than ") {
            let lbs = parse_number::<i64>(first_word(tail), question)?;
            return Some(numeric(Feature::Weight, lbs as f64));
        }

        if let Some(tail) = after_last(question, "average more than ") {
            let mut words = tail.split(' ');
            let value = parse_number::<f64>(words.next().unwrap_or_default(), question)?;
            let stat = words.next().unwrap_or_default().trim_end_matches('?');
            let Some(col) = Feature::from_column(&format!("average_{stat}")) else {
                log::warn!("Unknown stat {stat:?} in question {question:?}");
                return None;
            };
            return Some(numeric(col, value));
        }

        None
    }
}

fn numeric(col: Feature, threshold: f64) -> Split {
    Split::Numeric { col, threshold }
}

fn after_last<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.rfind(marker).map(|idx| &text[idx + marker.len()..])
}

fn first_word(text: &str) -> &str {
    text.split(' ').next().unwrap_or_default()
}

fn parse_number<T: std::str::FromStr>(raw: &str, question: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Could not read number {raw:?} in question {question:?}");
            None
        }
    }
}

/// `6'7"` → centimetres
fn parse_feet_inches(fragment: &str, question: &str) -> Option<f64> {
    let (feet, inches) = fragment.split_once('\'')?;
    let feet = parse_number::<i64>(feet, question)?;
    let inches = parse_number::<i64>(&inches.replace('"', ""), question)?;
    Some((feet * 12 + inches) as f64 * 2.54)
}

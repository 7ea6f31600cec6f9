use legend_engine::Candidate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};

pub const ROSTER_FILE_NAME: &str = "merged_player_data.csv";

/// Where a roster is looked for, relative to a project root, in order
#[must_use]
pub fn default_dataset_paths(root: &Path) -> Vec<PathBuf> {
    [
        ["my-project", "data"],
        ["data", ""],
        ["my-project", "public"],
        ["public", ""],
    ]
    .iter()
    .map(|parts| {
        parts
            .iter()
            .filter(|p| !p.is_empty())
            .fold(root.to_path_buf(), |path, part| path.join(part))
            .join(ROSTER_FILE_NAME)
    })
    .collect()
}

/// First roster file that exists under `root`
pub fn locate_dataset(root: &Path) -> Result<PathBuf> {
    let searched = default_dataset_paths(root);
    match searched.iter().find(|p| p.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(DatasetError::NotFound { searched }),
    }
}

/// Loaded players plus the number of rows that could not be read
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub candidates: Vec<Candidate>,
    pub skipped: usize,
}

/// One CSV row before coercion. Every column is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    id: Option<String>,
    full_name: Option<String>,
    team: Option<String>,
    position: Option<String>,
    height: Option<String>,
    weight: Option<String>,
    age: Option<String>,
    average_points: Option<String>,
    average_assists: Option<String>,
    average_rebounds: Option<String>,
    average_steals: Option<String>,
    average_blocks: Option<String>,
    awards_count: Option<String>,
}

/// A present value that is not a number
#[derive(Debug)]
struct Malformed {
    column: &'static str,
    value: String,
}

impl RawRecord {
    /// `has_name_column` separates a blank name cell (kept blank) from a
    /// roster without a `full_name` column (`"Unknown"`).
    fn into_candidate(self, has_name_column: bool) -> std::result::Result<Candidate, Malformed> {
        let full_name = match self.full_name {
            Some(name) => name,
            None if has_name_column => String::new(),
            None => "Unknown".to_string(),
        };
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| full_name.clone());
        let team = self.team.unwrap_or_default();
        let position = self.position.unwrap_or_default();

        let mut candidate = Candidate::new(id, full_name, team, &position);
        candidate.height = number("height", self.height.as_deref())?;
        candidate.weight = number("weight", self.weight.as_deref())?;
        candidate.age = whole("age", self.age.as_deref())?;
        candidate.average_points = number("average_points", self.average_points.as_deref())?;
        candidate.average_assists = number("average_assists", self.average_assists.as_deref())?;
        candidate.average_rebounds =
            number("average_rebounds", self.average_rebounds.as_deref())?;
        candidate.average_steals = number("average_steals", self.average_steals.as_deref())?;
        candidate.average_blocks = number("average_blocks", self.average_blocks.as_deref())?;
        candidate.awards_count = whole("awards_count", self.awards_count.as_deref())?;
        Ok(candidate)
    }
}

/// Missing, empty and non-finite values read as zero.
fn number(column: &'static str, raw: Option<&str>) -> std::result::Result<f64, Malformed> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(0.0);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Ok(0.0),
        Err(_) => Err(Malformed {
            column,
            value: raw.to_string(),
        }),
    }
}

/// Parsed as a float and truncated; negatives clamp to zero.
fn whole(column: &'static str, raw: Option<&str>) -> std::result::Result<u32, Malformed> {
    number(column, raw).map(|v| v.trunc() as u32)
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    let file = File::open(path)?;
    let roster = load_roster_from_reader(file)?;
    log::info!(
        "Loaded {} players from {} ({} rows skipped)",
        roster.candidates.len(),
        path.display(),
        roster.skipped
    );
    Ok(roster)
}

/// Read a roster from any CSV source with a header row.
///
/// Rows that fail to parse are skipped and counted; they never abort the load.
pub fn load_roster_from_reader<R: Read>(reader: R) -> Result<Roster> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    // Header problems are fatal; row problems are not.
    let has_name_column = csv.headers()?.iter().any(|h| h == "full_name");

    let mut roster = Roster::default();
    for (idx, row) in csv.deserialize::<RawRecord>().enumerate() {
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable row {}: {e}", idx + 1);
                roster.skipped += 1;
                continue;
            }
        };
        match record.into_candidate(has_name_column) {
            Ok(candidate) => roster.candidates.push(candidate),
            Err(Malformed { column, value }) => {
                log::debug!("Skipping row {}: {column} is not numeric ({value:?})", idx + 1);
                roster.skipped += 1;
            }
        }
    }
    Ok(roster)
}

use serde::{Deserialize, Serialize};

const EAST_TEAMS: &[&str] = &[
    "Celtics", "Knicks", "Nets", "76ers", "Raptors", "Bucks", "Bulls", "Cavaliers", "Pistons",
    "Pacers", "Hawks", "Heat", "Hornets", "Magic", "Wizards",
];

const WEST_TEAMS: &[&str] = &[
    "Lakers", "Clippers", "Warriors", "Kings", "Suns", "Mavericks", "Spurs", "Rockets",
    "Grizzlies", "Pelicans", "Thunder", "Trail Blazers", "Timberwolves", "Nuggets", "Jazz",
];

/// One player in the guessing pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable identifier, unique within one pool snapshot
    pub id: String,

    pub full_name: String,

    pub team: String,

    /// One of `G`, `F`, `C`, `G-F`, `F-C`, or an unrecognised label kept verbatim
    pub position: String,

    /// Height in centimetres
    pub height: f64,

    /// Weight in pounds
    pub weight: f64,

    /// Age in whole years
    pub age: u32,

    pub average_points: f64,
    pub average_assists: f64,
    pub average_rebounds: f64,
    pub average_steals: f64,
    pub average_blocks: f64,

    pub awards_count: u32,
}

impl Candidate {
    /// Create a candidate with zeroed statistics.
    ///
    /// The position is normalised on the way in; an empty position becomes `F`.
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        team: impl Into<String>,
        position: &str,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            team: team.into(),
            position: normalize_position(position),
            height: 0.0,
            weight: 0.0,
            age: 0,
            average_points: 0.0,
            average_assists: 0.0,
            average_rebounds: 0.0,
            average_steals: 0.0,
            average_blocks: 0.0,
            awards_count: 0,
        }
    }

    /// Conference the player's team belongs to
    #[must_use]
    pub fn conference(&self) -> Conference {
        Conference::for_team(&self.team)
    }

    /// Read a numeric feature as a float
    #[must_use]
    pub fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Age => f64::from(self.age),
            Feature::Height => self.height,
            Feature::Weight => self.weight,
            Feature::Points => self.average_points,
            Feature::Assists => self.average_assists,
            Feature::Rebounds => self.average_rebounds,
            Feature::Steals => self.average_steals,
            Feature::Blocks => self.average_blocks,
        }
    }

    #[must_use]
    pub const fn has_awards(&self) -> bool {
        self.awards_count > 0
    }
}

/// Map a raw position label onto the short codes.
///
/// Labels outside the synonym table pass through unchanged.
#[must_use]
pub fn normalize_position(raw: &str) -> String {
    if raw.is_empty() {
        return "F".to_string();
    }
    match raw {
        "Center-Forward" | "Forward-Center" => "F-C",
        "Guard-Forward" => "G-F",
        "Forward" => "F",
        "Guard" => "G",
        "Center" => "C",
        other => other,
    }
    .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conference {
    East,
    West,
}

impl Conference {
    /// Static membership lookup; unknown teams land in the east.
    #[must_use]
    pub fn for_team(team: &str) -> Self {
        if EAST_TEAMS.contains(&team) {
            Self::East
        } else if WEST_TEAMS.contains(&team) {
            Self::West
        } else {
            Self::East
        }
    }
}

/// Numeric attributes that can be split on a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "height")]
    Height,
    #[serde(rename = "weight")]
    Weight,
    #[serde(rename = "average_points")]
    Points,
    #[serde(rename = "average_assists")]
    Assists,
    #[serde(rename = "average_rebounds")]
    Rebounds,
    #[serde(rename = "average_steals")]
    Steals,
    #[serde(rename = "average_blocks")]
    Blocks,
}

impl Feature {
    /// Evaluation order of the threshold family
    pub const ALL: [Feature; 8] = [
        Feature::Age,
        Feature::Height,
        Feature::Weight,
        Feature::Points,
        Feature::Assists,
        Feature::Rebounds,
        Feature::Steals,
        Feature::Blocks,
    ];

    /// Column name in the roster
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Height => "height",
            Feature::Weight => "weight",
            Feature::Points => "average_points",
            Feature::Assists => "average_assists",
            Feature::Rebounds => "average_rebounds",
            Feature::Steals => "average_steals",
            Feature::Blocks => "average_blocks",
        }
    }

    /// Stat word used in "average more than" questions
    #[must_use]
    pub fn stat_name(self) -> &'static str {
        let column = self.column();
        column.strip_prefix("average_").unwrap_or(column)
    }

    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_position_synonyms() {
        assert_eq!(normalize_position("Guard"), "G");
        assert_eq!(normalize_position("Forward"), "F");
        assert_eq!(normalize_position("Center"), "C");
        assert_eq!(normalize_position("Guard-Forward"), "G-F");
        assert_eq!(normalize_position("Forward-Center"), "F-C");
        assert_eq!(normalize_position("Center-Forward"), "F-C");
        assert_eq!(normalize_position(""), "F");
        assert_eq!(normalize_position("Point Guard"), "Point Guard");
        assert_eq!(normalize_position("G"), "G");
    }

    #[test]
    fn infers_conference_from_team() {
        assert_eq!(Conference::for_team("Celtics"), Conference::East);
        assert_eq!(Conference::for_team("Lakers"), Conference::West);
        assert_eq!(Conference::for_team("Trail Blazers"), Conference::West);
        assert_eq!(Conference::for_team("Sonics"), Conference::East);
        assert_eq!(Conference::for_team(""), Conference::East);
    }

    #[test]
    fn conference_follows_team_changes() {
        let mut player = Candidate::new("1", "A", "Lakers", "G");
        assert_eq!(player.conference(), Conference::West);
        player.team = "Heat".to_string();
        assert_eq!(player.conference(), Conference::East);
    }

    #[test]
    fn feature_columns_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_column(feature.column()), Some(feature));
        }
        assert_eq!(Feature::Points.stat_name(), "points");
        assert_eq!(Feature::Age.stat_name(), "age");
        assert_eq!(Feature::from_column("average_turnovers"), None);
    }
}

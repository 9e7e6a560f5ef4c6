// Match record data model
//
// Mirrors the ball-by-ball match JSON documents: one document per match,
// `info` metadata plus nested innings/overs/deliveries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// A single match document: metadata plus the full delivery log.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    pub info: MatchInfo,
    #[serde(default)]
    pub innings: Vec<Innings>,
}

impl MatchRecord {
    /// De-duplication key for match/innings counts: first date + venue.
    ///
    /// Not guaranteed globally unique (a doubleheader at one venue on one
    /// day would collapse into a single key). Known weak invariant.
    pub fn match_id(&self) -> String {
        let date = self
            .info
            .dates
            .first()
            .map(|d| d.to_string())
            .unwrap_or_default();
        format!("{}_{}", date, self.info.venue)
    }

    /// Walk every delivery across all innings/overs in document order.
    pub fn deliveries(&self) -> impl Iterator<Item = &Delivery> {
        self.innings
            .iter()
            .flat_map(|innings| innings.overs.iter())
            .flat_map(|over| over.deliveries.iter())
    }
}

/// Match metadata: venue, date(s), raw season label and team rosters.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchInfo {
    pub venue: String,
    pub dates: Vec<NaiveDate>,
    #[serde(deserialize_with = "season_label")]
    pub season: String,
    /// Team name -> list of rostered player identifiers.
    #[serde(default)]
    pub players: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Innings {
    #[serde(default)]
    pub overs: Vec<Over>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Over {
    #[serde(default)]
    pub deliveries: Vec<Delivery>,
}

/// One ball bowled.
#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    pub batter: String,
    pub bowler: String,
    /// May be empty in older records.
    #[serde(default)]
    pub non_striker: String,
    pub runs: RunsBreakdown,
    /// Extras classification keyed by kind (wides, noballs, byes, legbyes).
    #[serde(default)]
    pub extras: BTreeMap<String, ExtraRuns>,
    #[serde(default)]
    pub wickets: Vec<Wicket>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RunsBreakdown {
    pub batter: u64,
    #[serde(default)]
    pub extras: u64,
    #[serde(default)]
    pub total: u64,
}

/// Runs attached to one extras kind. The wire form is either a bare number
/// or an object with a `runs` field, depending on the feed vintage.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ExtraRuns {
    Detailed { runs: u64 },
    Plain(u64),
}

impl ExtraRuns {
    pub fn runs(&self) -> u64 {
        match self {
            ExtraRuns::Detailed { runs } => *runs,
            ExtraRuns::Plain(runs) => *runs,
        }
    }
}

/// A wicket event attached to a delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct Wicket {
    pub player_out: String,
    pub kind: String,
    #[serde(default)]
    pub fielders: Vec<Fielder>,
}

impl Wicket {
    /// Fielders with a non-empty name (substitute fielders may be unnamed).
    pub fn named_fielders(&self) -> impl Iterator<Item = &str> {
        self.fielders
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fielder {
    #[serde(default)]
    pub name: String,
}

/// Season labels arrive as either a JSON string ("2007/08") or a bare
/// number (2021). Stringify on read so downstream code sees one type.
fn season_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Year(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(label) => label,
        Raw::Year(year) => year.to_string(),
    })
}

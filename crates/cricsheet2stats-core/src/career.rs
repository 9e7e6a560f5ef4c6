// Career aggregation
//
// Sums the season tables into one row per player and re-derives the rate
// fields from the summed counts. Best single-match performances (high score,
// best bowling) are single reductions over the season-level strings; rows
// that fail to parse are skipped rather than failing the run.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::accumulate::BowlingFigures;
use crate::emit::{BattingRow, BowlingRow};
use crate::round2;

/// A career stat cell that renders as `"-"` for players with no qualifying
/// innings. Display convention, not a missing-data signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat<T> {
    Value(T),
    Dash,
}

impl<T: Serialize> Serialize for Stat<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stat::Value(value) => value.serialize(serializer),
            Stat::Dash => serializer.serialize_str("-"),
        }
    }
}

// Deserialized from the CSV string form only: a number or "-".
impl<'de, T: FromStr> Deserialize<'de> for Stat<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if trimmed == "-" {
            return Ok(Stat::Dash);
        }
        trimmed
            .parse::<T>()
            .map(Stat::Value)
            .map_err(|_| de::Error::custom(format!("expected number or \"-\", got {raw:?}")))
    }
}

/// One career batting row per player.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CareerBattingRow {
    pub player: String,
    pub team: String,
    pub matches: u32,
    pub innings: u32,
    pub not_outs: Stat<u32>,
    pub runs: u64,
    pub balls: u64,
    pub batting_average: Stat<f64>,
    pub strike_rate: Stat<f64>,
    pub high_score: String,
    #[serde(rename = "50s")]
    pub fifties: u32,
    #[serde(rename = "100s")]
    pub hundreds: u32,
    #[serde(rename = "4s")]
    pub fours: u32,
    #[serde(rename = "6s")]
    pub sixes: u32,
    pub catches: u32,
    pub stumpings: u32,
}

/// One career bowling row per player.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CareerBowlingRow {
    pub player: String,
    pub team: String,
    pub matches: u32,
    pub innings: u32,
    pub balls_bowled: u64,
    pub runs_conceded: u64,
    pub wickets: u32,
    pub bowling_average: Stat<f64>,
    pub economy_rate: f64,
    pub strike_rate: Stat<f64>,
    #[serde(rename = "3w_hauls")]
    pub three_wicket_hauls: u32,
    #[serde(rename = "4w_hauls")]
    pub four_wicket_hauls: u32,
    #[serde(rename = "5w_hauls")]
    pub five_wicket_hauls: u32,
    pub best_bowling: String,
}

/// Numeric value of a season high-score string, ignoring the not-out marker.
fn high_score_value(raw: &str) -> Option<u64> {
    raw.trim().trim_end_matches('*').parse().ok()
}

fn join_teams(teams: &BTreeSet<String>) -> String {
    teams
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn split_teams(cell: &str, into: &mut BTreeSet<String>) {
    into.extend(
        cell.split(", ")
            .filter(|team| !team.is_empty())
            .map(str::to_string),
    );
}

#[derive(Default)]
struct BattingTotals {
    teams: BTreeSet<String>,
    matches: u32,
    innings: u32,
    not_outs: u32,
    runs: u64,
    balls: u64,
    fifties: u32,
    hundreds: u32,
    fours: u32,
    sixes: u32,
    catches: u32,
    stumpings: u32,
    // (numeric value, original string incl. marker); first max wins ties
    high_score: Option<(u64, String)>,
}

/// Sum season batting rows into one career row per player.
pub fn career_batting(rows: &[BattingRow]) -> Vec<CareerBattingRow> {
    let mut totals: BTreeMap<String, BattingTotals> = BTreeMap::new();

    for row in rows {
        let t = totals.entry(row.player.clone()).or_default();
        split_teams(&row.team, &mut t.teams);
        t.matches += row.matches;
        t.innings += row.innings;
        t.not_outs += row.not_outs;
        t.runs += row.runs;
        t.balls += row.balls;
        t.fifties += row.fifties;
        t.hundreds += row.hundreds;
        t.fours += row.fours;
        t.sixes += row.sixes;
        t.catches += row.catches;
        t.stumpings += row.stumpings;

        if let Some(value) = high_score_value(&row.high_score) {
            match &t.high_score {
                Some((best, _)) if value <= *best => {}
                _ => t.high_score = Some((value, row.high_score.clone())),
            }
        }
    }

    totals
        .into_iter()
        .map(|(player, t)| {
            let dismissals = t.innings.saturating_sub(t.not_outs);
            let batting_average = if dismissals > 0 {
                Stat::Value(round2(t.runs as f64 / dismissals as f64))
            } else {
                Stat::Value(0.0)
            };
            let strike_rate = if t.balls > 0 {
                Stat::Value(round2(t.runs as f64 * 100.0 / t.balls as f64))
            } else {
                Stat::Value(0.0)
            };

            let mut row = CareerBattingRow {
                player,
                team: join_teams(&t.teams),
                matches: t.matches,
                innings: t.innings,
                not_outs: Stat::Value(t.not_outs),
                runs: t.runs,
                balls: t.balls,
                batting_average,
                strike_rate,
                high_score: t.high_score.map(|(_, raw)| raw).unwrap_or_default(),
                fifties: t.fifties,
                hundreds: t.hundreds,
                fours: t.fours,
                sixes: t.sixes,
                catches: t.catches,
                stumpings: t.stumpings,
            };

            if row.innings == 0 {
                row.not_outs = Stat::Dash;
                row.high_score = "-".to_string();
                row.strike_rate = Stat::Dash;
                row.batting_average = Stat::Dash;
            }
            row
        })
        .collect()
}

#[derive(Default)]
struct BowlingTotals {
    teams: BTreeSet<String>,
    matches: u32,
    innings: u32,
    balls_bowled: u64,
    runs_conceded: u64,
    wickets: u32,
    three_wicket_hauls: u32,
    four_wicket_hauls: u32,
    five_wicket_hauls: u32,
    best: Option<(BowlingFigures, String)>,
}

/// Sum season bowling rows into one career row per player.
pub fn career_bowling(rows: &[BowlingRow]) -> Vec<CareerBowlingRow> {
    let mut totals: BTreeMap<String, BowlingTotals> = BTreeMap::new();

    for row in rows {
        let t = totals.entry(row.player.clone()).or_default();
        split_teams(&row.team, &mut t.teams);
        t.matches += row.matches;
        t.innings += row.innings;
        t.balls_bowled += row.balls_bowled;
        t.runs_conceded += row.runs_conceded;
        t.wickets += row.wickets;
        t.three_wicket_hauls += row.three_wicket_hauls;
        t.four_wicket_hauls += row.four_wicket_hauls;
        t.five_wicket_hauls += row.five_wicket_hauls;

        if let Ok(figures) = row.best_bowling.parse::<BowlingFigures>() {
            match &t.best {
                Some((best, _)) if figures <= *best => {}
                _ => t.best = Some((figures, row.best_bowling.clone())),
            }
        }
    }

    totals
        .into_iter()
        .map(|(player, t)| {
            let bowling_average = if t.wickets > 0 {
                Stat::Value(round2(t.runs_conceded as f64 / t.wickets as f64))
            } else {
                Stat::Value(0.0)
            };
            let economy_rate = if t.balls_bowled > 0 {
                round2(t.runs_conceded as f64 / (t.balls_bowled as f64 / 6.0))
            } else {
                0.0
            };
            let strike_rate = if t.wickets > 0 {
                Stat::Value(round2(t.balls_bowled as f64 / t.wickets as f64))
            } else {
                Stat::Value(0.0)
            };

            let mut row = CareerBowlingRow {
                player,
                team: join_teams(&t.teams),
                matches: t.matches,
                innings: t.innings,
                balls_bowled: t.balls_bowled,
                runs_conceded: t.runs_conceded,
                wickets: t.wickets,
                bowling_average,
                economy_rate,
                strike_rate,
                three_wicket_hauls: t.three_wicket_hauls,
                four_wicket_hauls: t.four_wicket_hauls,
                five_wicket_hauls: t.five_wicket_hauls,
                best_bowling: t.best.map(|(_, raw)| raw).unwrap_or_default(),
            };

            if row.innings == 0 {
                row.bowling_average = Stat::Dash;
                row.strike_rate = Stat::Dash;
                row.best_bowling = "-".to_string();
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batting_row(player: &str, season: &str) -> BattingRow {
        BattingRow {
            player: player.to_string(),
            team: "Alpha".to_string(),
            season: season.to_string(),
            matches: 0,
            innings: 0,
            not_outs: 0,
            runs: 0,
            high_score: "0".to_string(),
            balls: 0,
            strike_rate: 0.0,
            fifties: 0,
            hundreds: 0,
            fours: 0,
            sixes: 0,
            catches: 0,
            stumpings: 0,
        }
    }

    fn bowling_row(player: &str, season: &str) -> BowlingRow {
        BowlingRow {
            player: player.to_string(),
            team: "Alpha".to_string(),
            season: season.to_string(),
            matches: 0,
            innings: 0,
            balls_bowled: 0,
            runs_conceded: 0,
            wickets: 0,
            three_wicket_hauls: 0,
            four_wicket_hauls: 0,
            five_wicket_hauls: 0,
            best_bowling: String::new(),
        }
    }

    #[test]
    fn batting_average_uses_dismissals_denominator() {
        let mut row = batting_row("A", "2013");
        row.matches = 3;
        row.innings = 3;
        row.not_outs = 1;
        row.runs = 90;
        row.balls = 60;
        row.high_score = "45*".to_string();

        let career = career_batting(&[row]);
        assert_eq!(career.len(), 1);
        assert_eq!(career[0].batting_average, Stat::Value(45.0));
        assert_eq!(career[0].strike_rate, Stat::Value(150.0));
        assert_eq!(career[0].high_score, "45*");
    }

    #[test]
    fn zero_innings_batting_gets_sentinels() {
        let mut row = batting_row("A", "2013");
        row.matches = 2;
        let career = career_batting(&[row]);

        assert_eq!(career[0].matches, 2);
        assert_eq!(career[0].not_outs, Stat::Dash);
        assert_eq!(career[0].high_score, "-");
        assert_eq!(career[0].batting_average, Stat::Dash);
        assert_eq!(career[0].strike_rate, Stat::Dash);
    }

    #[test]
    fn career_high_score_keeps_the_original_marker() {
        let mut low = batting_row("A", "2013");
        low.innings = 1;
        low.high_score = "87*".to_string();
        let mut high = batting_row("A", "2014");
        high.innings = 1;
        high.high_score = "90".to_string();

        let career = career_batting(&[low, high]);
        assert_eq!(career[0].high_score, "90");
    }

    #[test]
    fn economy_rate_is_runs_per_over() {
        let mut row = bowling_row("B", "2013");
        row.innings = 2;
        row.balls_bowled = 72;
        row.runs_conceded = 60;
        row.wickets = 4;

        let career = career_bowling(&[row]);
        assert_eq!(career[0].economy_rate, 5.0);
        assert_eq!(career[0].bowling_average, Stat::Value(15.0));
        assert_eq!(career[0].strike_rate, Stat::Value(18.0));
    }

    #[test]
    fn career_best_bowling_prefers_wickets_then_fewest_runs() {
        let mut a = bowling_row("B", "2013");
        a.innings = 1;
        a.best_bowling = "3/20".to_string();
        let mut b = bowling_row("B", "2014");
        b.innings = 1;
        b.best_bowling = "3/12".to_string();
        let mut c = bowling_row("B", "2015");
        c.innings = 1;
        c.best_bowling = "not a score".to_string();

        let career = career_bowling(&[a, b, c]);
        assert_eq!(career[0].best_bowling, "3/12");
    }

    #[test]
    fn zero_innings_bowling_gets_sentinels_but_numeric_economy() {
        let mut row = bowling_row("B", "2013");
        row.matches = 1;
        let career = career_bowling(&[row]);

        assert_eq!(career[0].bowling_average, Stat::Dash);
        assert_eq!(career[0].strike_rate, Stat::Dash);
        assert_eq!(career[0].best_bowling, "-");
        assert_eq!(career[0].economy_rate, 0.0);
    }
}

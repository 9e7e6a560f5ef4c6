// Season table emission
//
// Flattens the accumulator index into flat batting/bowling rows. Derived
// fields (strike rate, high-score string, best-bowling string) are computed
// here at emission time, never stored mutably.

use serde::{Deserialize, Serialize};

use crate::accumulate::{SeasonAccumulator, StatsIndex};
use crate::round2;

/// One batting row per (player, season).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingRow {
    pub player: String,
    pub team: String,
    pub season: String,
    pub matches: u32,
    pub innings: u32,
    pub not_outs: u32,
    pub runs: u64,
    /// Rendered with a trailing `*` iff the high score was not out. The
    /// string form is the persisted representation.
    pub high_score: String,
    pub balls: u64,
    pub strike_rate: f64,
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

/// One bowling row per (player, season).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingRow {
    pub player: String,
    pub team: String,
    pub season: String,
    pub matches: u32,
    pub innings: u32,
    pub balls_bowled: u64,
    pub runs_conceded: u64,
    pub wickets: u32,
    #[serde(rename = "3w_hauls")]
    pub three_wicket_hauls: u32,
    #[serde(rename = "4w_hauls")]
    pub four_wicket_hauls: u32,
    #[serde(rename = "5w_hauls")]
    pub five_wicket_hauls: u32,
    /// Best single-match figures as "W/R"; empty if the player never bowled.
    pub best_bowling: String,
}

/// The two season-level tables, ordered by (player, season).
#[derive(Debug, Clone, Default)]
pub struct SeasonTables {
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlingRow>,
}

impl SeasonTables {
    pub fn from_index(index: &StatsIndex) -> Self {
        let mut tables = SeasonTables::default();
        for (player, season, acc) in index.iter() {
            tables.batting.push(batting_row(player, season, acc));
            tables.bowling.push(bowling_row(player, season, acc));
        }
        tables
    }
}

fn team_cell(acc: &SeasonAccumulator) -> String {
    acc.teams
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn batting_row(player: &str, season: &str, acc: &SeasonAccumulator) -> BattingRow {
    let high_score = if acc.high_score_not_out {
        format!("{}*", acc.high_score)
    } else {
        acc.high_score.to_string()
    };
    let strike_rate = if acc.balls > 0 {
        round2(acc.runs as f64 * 100.0 / acc.balls as f64)
    } else {
        0.0
    };

    BattingRow {
        player: player.to_string(),
        team: team_cell(acc),
        season: season.to_string(),
        matches: acc.matches.len() as u32,
        innings: acc.innings.len() as u32,
        not_outs: acc.not_outs.len() as u32,
        runs: acc.runs,
        high_score,
        balls: acc.balls,
        strike_rate,
        fifties: acc.fifties,
        hundreds: acc.hundreds,
        fours: acc.fours,
        sixes: acc.sixes,
        catches: acc.catches,
        stumpings: acc.stumpings,
    }
}

fn bowling_row(player: &str, season: &str, acc: &SeasonAccumulator) -> BowlingRow {
    BowlingRow {
        player: player.to_string(),
        team: team_cell(acc),
        season: season.to_string(),
        matches: acc.matches.len() as u32,
        innings: acc.bowling_innings.len() as u32,
        balls_bowled: acc.balls_bowled,
        runs_conceded: acc.runs_conceded,
        wickets: acc.wickets,
        three_wicket_hauls: acc.three_wicket_hauls,
        four_wicket_hauls: acc.four_wicket_hauls,
        five_wicket_hauls: acc.five_wicket_hauls,
        best_bowling: acc
            .best_bowling
            .map(|figures| figures.to_string())
            .unwrap_or_default(),
    }
}

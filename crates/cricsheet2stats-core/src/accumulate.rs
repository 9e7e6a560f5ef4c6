// Stat accumulation engine
//
// Consumes match records and folds them into per-(player, season)
// accumulators. Match/innings/not-out counts are ordered sets of match ids,
// so replaying duplicate deliveries within one match cannot double-count.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::delivery::{is_legal_delivery, runs_conceded, runs_scored};
use crate::model::{Delivery, MatchRecord};
use crate::season;

/// Dismissal kinds that update fielding stats.
const KIND_CAUGHT: &str = "caught";
const KIND_STUMPED: &str = "stumped";

/// Dismissal kinds credited to the bowler. Run-outs and the other obscure
/// kinds credit nobody.
const BOWLER_CREDITED_KINDS: [&str; 6] = [
    "bowled",
    "caught",
    "caught and bowled",
    "lbw",
    "stumped",
    "hit wicket",
];

fn is_bowler_credited(kind: &str) -> bool {
    BOWLER_CREDITED_KINDS.contains(&kind)
}

/// Single-match bowling figures: wickets taken and runs conceded.
///
/// Ordering is "better figures compare greater": most wickets first, ties
/// broken by fewest runs conceded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BowlingFigures {
    pub wickets: u32,
    pub runs: u64,
}

impl Ord for BowlingFigures {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wickets
            .cmp(&other.wickets)
            .then_with(|| other.runs.cmp(&self.runs))
    }
}

impl PartialOrd for BowlingFigures {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BowlingFigures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.wickets, self.runs)
    }
}

#[derive(Debug, Error)]
#[error("invalid bowling figures: {0:?}")]
pub struct ParseFiguresError(String);

impl FromStr for BowlingFigures {
    type Err = ParseFiguresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wickets, runs) = s
            .split_once('/')
            .ok_or_else(|| ParseFiguresError(s.to_string()))?;
        let wickets = wickets
            .trim()
            .parse()
            .map_err(|_| ParseFiguresError(s.to_string()))?;
        let runs = runs
            .trim()
            .parse()
            .map_err(|_| ParseFiguresError(s.to_string()))?;
        Ok(BowlingFigures { wickets, runs })
    }
}

/// Mutable per-(player, season) aggregate.
#[derive(Debug, Clone, Default)]
pub struct SeasonAccumulator {
    /// Match ids where the player was on a matchday roster.
    pub matches: BTreeSet<String>,
    /// Match ids where the player batted (faced a ball or stood non-striker).
    pub innings: BTreeSet<String>,
    /// Match ids where the player batted and was never dismissed.
    pub not_outs: BTreeSet<String>,
    pub runs: u64,
    pub high_score: u64,
    pub high_score_not_out: bool,
    /// Legal deliveries faced.
    pub balls: u64,
    pub fifties: u32,
    pub hundreds: u32,
    pub fours: u32,
    pub sixes: u32,
    pub catches: u32,
    pub stumpings: u32,
    /// Roster team names the player appeared under this season.
    pub teams: BTreeSet<String>,
    /// Match ids where the player bowled.
    pub bowling_innings: BTreeSet<String>,
    /// Legal deliveries bowled.
    pub balls_bowled: u64,
    pub runs_conceded: u64,
    pub wickets: u32,
    pub three_wicket_hauls: u32,
    pub four_wicket_hauls: u32,
    pub five_wicket_hauls: u32,
    /// Best single-match figures this season, if the player bowled at all.
    pub best_bowling: Option<BowlingFigures>,
}

/// Per-match scratch state, discarded once the match is folded in.
#[derive(Debug, Default)]
struct MatchScratch {
    batted: BTreeSet<String>,
    dismissed: BTreeSet<String>,
    runs: BTreeMap<String, u64>,
    /// Per-bowler match figures; key presence doubles as the bowled set.
    bowled: BTreeMap<String, BowlingFigures>,
}

/// Two-level keyed map: player -> canonical season -> accumulator.
#[derive(Debug, Default)]
pub struct StatsIndex {
    players: BTreeMap<String, BTreeMap<String, SeasonAccumulator>>,
}

impl StatsIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a full match corpus.
    pub fn from_matches<'a, I>(matches: I) -> Self
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        let mut index = Self::new();
        for record in matches {
            index.ingest_match(record);
        }
        index
    }

    /// Get-or-create the accumulator for (player, season).
    fn entry(&mut self, player: &str, season: &str) -> &mut SeasonAccumulator {
        self.players
            .entry(player.to_string())
            .or_default()
            .entry(season.to_string())
            .or_default()
    }

    pub fn get(&self, player: &str, season: &str) -> Option<&SeasonAccumulator> {
        self.players.get(player)?.get(season)
    }

    /// Iterate all (player, season, accumulator) triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &SeasonAccumulator)> {
        self.players.iter().flat_map(|(player, seasons)| {
            seasons
                .iter()
                .map(move |(season, acc)| (player.as_str(), season.as_str(), acc))
        })
    }

    /// Fold one match into the index, independently of all other matches.
    pub fn ingest_match(&mut self, record: &MatchRecord) {
        let match_id = record.match_id();
        let season = season::normalize(&record.info.season);

        // Squad membership on the matchday counts as a match played, whether
        // or not the player ever batted or bowled.
        for (team, roster) in &record.info.players {
            for player in roster {
                let acc = self.entry(player, &season);
                acc.matches.insert(match_id.clone());
                acc.teams.insert(team.clone());
            }
        }

        let mut scratch = MatchScratch::default();
        for delivery in record.deliveries() {
            self.ingest_delivery(&season, delivery, &mut scratch);
        }
        self.finish_match(&match_id, &season, scratch);
    }

    fn ingest_delivery(&mut self, season: &str, delivery: &Delivery, scratch: &mut MatchScratch) {
        scratch.batted.insert(delivery.batter.clone());
        if !delivery.non_striker.is_empty() {
            scratch.batted.insert(delivery.non_striker.clone());
        }

        let legal = is_legal_delivery(delivery);
        let conceded = runs_conceded(delivery);
        let scored = runs_scored(delivery);

        {
            let bowler = self.entry(&delivery.bowler, season);
            if legal {
                bowler.balls_bowled += 1;
            }
            bowler.runs_conceded += conceded;
        }
        let figures = scratch.bowled.entry(delivery.bowler.clone()).or_default();
        figures.runs += conceded;

        {
            let batter = self.entry(&delivery.batter, season);
            batter.runs += scored;
            if legal {
                batter.balls += 1;
            }
            if scored == 4 {
                batter.fours += 1;
            } else if scored == 6 {
                batter.sixes += 1;
            }
        }
        *scratch.runs.entry(delivery.batter.clone()).or_insert(0) += scored;

        for wicket in &delivery.wickets {
            scratch.dismissed.insert(wicket.player_out.clone());

            match wicket.kind.as_str() {
                KIND_CAUGHT => {
                    for fielder in wicket.named_fielders() {
                        self.entry(fielder, season).catches += 1;
                    }
                }
                KIND_STUMPED => {
                    for fielder in wicket.named_fielders() {
                        self.entry(fielder, season).stumpings += 1;
                    }
                }
                _ => {}
            }

            if is_bowler_credited(&wicket.kind) {
                self.entry(&delivery.bowler, season).wickets += 1;
                if let Some(figures) = scratch.bowled.get_mut(&delivery.bowler) {
                    figures.wickets += 1;
                }
            }
        }
    }

    fn finish_match(&mut self, match_id: &str, season: &str, scratch: MatchScratch) {
        let not_out: BTreeSet<String> = scratch
            .batted
            .difference(&scratch.dismissed)
            .cloned()
            .collect();
        for player in &not_out {
            self.entry(player, season)
                .not_outs
                .insert(match_id.to_string());
        }

        for player in &scratch.batted {
            let match_runs = scratch.runs.get(player).copied().unwrap_or(0);
            let was_not_out = not_out.contains(player);
            let acc = self.entry(player, season);

            if match_runs > acc.high_score {
                acc.high_score = match_runs;
                acc.high_score_not_out = was_not_out;
            } else if match_runs == acc.high_score && was_not_out && !acc.high_score_not_out {
                // Tie between an out and a not-out instance: prefer not-out.
                acc.high_score_not_out = true;
            }

            if match_runs >= 100 {
                acc.hundreds += 1;
            } else if match_runs >= 50 {
                acc.fifties += 1;
            }

            acc.innings.insert(match_id.to_string());
        }

        for (bowler, figures) in &scratch.bowled {
            let acc = self.entry(bowler, season);
            acc.bowling_innings.insert(match_id.to_string());

            if figures.wickets >= 5 {
                acc.five_wicket_hauls += 1;
            } else if figures.wickets == 4 {
                acc.four_wicket_hauls += 1;
            } else if figures.wickets == 3 {
                acc.three_wicket_hauls += 1;
            }

            match acc.best_bowling {
                Some(best) if *figures <= best => {}
                _ => acc.best_bowling = Some(*figures),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_record(raw: &str) -> MatchRecord {
        serde_json::from_str(raw).unwrap()
    }

    fn simple_match(deliveries: &str) -> MatchRecord {
        match_record(&format!(
            r#"{{
                "info": {{
                    "venue": "Eden Gardens",
                    "dates": ["2013-04-01"],
                    "season": "2013",
                    "players": {{"Alpha": ["A", "C"], "Beta": ["B"]}}
                }},
                "innings": [{{"overs": [{{"deliveries": [{}]}}]}}]
            }}"#,
            deliveries
        ))
    }

    fn ball(batter: &str, bowler: &str, runs: u64) -> String {
        format!(
            r#"{{"batter": "{batter}", "bowler": "{bowler}", "non_striker": "C",
                 "runs": {{"batter": {runs}, "extras": 0, "total": {runs}}}}}"#
        )
    }

    #[test]
    fn roster_membership_counts_a_match_without_batting() {
        let record = simple_match(&ball("A", "B", 1));
        let mut index = StatsIndex::new();
        index.ingest_match(&record);

        // "C" never faced a ball but is rostered and stood non-striker.
        let acc = index.get("C", "2013").unwrap();
        assert_eq!(acc.matches.len(), 1);
        assert_eq!(acc.innings.len(), 1);
        assert_eq!(acc.runs, 0);
        assert_eq!(acc.balls, 0);
    }

    #[test]
    fn duplicate_ingest_of_same_match_keeps_set_counts_stable() {
        let record = simple_match(&ball("A", "B", 4));
        let mut index = StatsIndex::new();
        index.ingest_match(&record);
        index.ingest_match(&record);

        let acc = index.get("A", "2013").unwrap();
        // Sets de-duplicate on match id; plain counters double.
        assert_eq!(acc.matches.len(), 1);
        assert_eq!(acc.innings.len(), 1);
        assert_eq!(acc.runs, 8);
    }

    #[test]
    fn not_outs_are_batted_minus_dismissed() {
        let deliveries = format!(
            r#"{},
               {{"batter": "A", "bowler": "B", "non_striker": "C",
                 "runs": {{"batter": 0, "extras": 0, "total": 0}},
                 "wickets": [{{"player_out": "A", "kind": "bowled"}}]}}"#,
            ball("A", "B", 1)
        );
        let record = simple_match(&deliveries);
        let mut index = StatsIndex::new();
        index.ingest_match(&record);

        assert_eq!(index.get("A", "2013").unwrap().not_outs.len(), 0);
        assert_eq!(index.get("C", "2013").unwrap().not_outs.len(), 1);
    }

    #[test]
    fn high_score_tie_prefers_not_out_instance() {
        // Match 1: A scores 30 and is dismissed. Match 2: A scores 30 not out.
        let m1 = match_record(
            r#"{
                "info": {"venue": "V", "dates": ["2013-04-01"], "season": "2013",
                          "players": {"Alpha": ["A"], "Beta": ["B"]}},
                "innings": [{"overs": [{"deliveries": [
                    {"batter": "A", "bowler": "B", "non_striker": "",
                     "runs": {"batter": 30, "extras": 0, "total": 30},
                     "wickets": [{"player_out": "A", "kind": "bowled"}]}
                ]}]}]
            }"#,
        );
        let m2 = match_record(
            r#"{
                "info": {"venue": "V", "dates": ["2013-04-05"], "season": "2013",
                          "players": {"Alpha": ["A"], "Beta": ["B"]}},
                "innings": [{"overs": [{"deliveries": [
                    {"batter": "A", "bowler": "B", "non_striker": "",
                     "runs": {"batter": 30, "extras": 0, "total": 30}}
                ]}]}]
            }"#,
        );

        let mut index = StatsIndex::new();
        index.ingest_match(&m1);
        index.ingest_match(&m2);

        let acc = index.get("A", "2013").unwrap();
        assert_eq!(acc.high_score, 30);
        assert!(acc.high_score_not_out);
    }

    #[test]
    fn hundred_does_not_also_count_as_fifty() {
        let deliveries: Vec<String> = (0..20).map(|_| ball("A", "B", 6)).collect();
        let record = simple_match(&deliveries.join(","));
        let mut index = StatsIndex::new();
        index.ingest_match(&record);

        let acc = index.get("A", "2013").unwrap();
        assert_eq!(acc.runs, 120);
        assert_eq!(acc.hundreds, 1);
        assert_eq!(acc.fifties, 0);
        assert_eq!(acc.sixes, 20);
    }

    #[test]
    fn wides_do_not_count_as_balls_faced_or_bowled() {
        let deliveries = format!(
            r#"{{"batter": "A", "bowler": "B", "non_striker": "C",
                 "runs": {{"batter": 0, "extras": 1, "total": 1}},
                 "extras": {{"wides": 1}}}},
               {}"#,
            ball("A", "B", 0)
        );
        let record = simple_match(&deliveries);
        let mut index = StatsIndex::new();
        index.ingest_match(&record);

        let batter = index.get("A", "2013").unwrap();
        assert_eq!(batter.balls, 1);
        let bowler = index.get("B", "2013").unwrap();
        assert_eq!(bowler.balls_bowled, 1);
        assert_eq!(bowler.runs_conceded, 1);
    }

    #[test]
    fn fielding_credit_only_for_caught_and_stumped() {
        let deliveries = r#"
            {"batter": "A", "bowler": "B", "non_striker": "C",
             "runs": {"batter": 0, "extras": 0, "total": 0},
             "wickets": [{"player_out": "A", "kind": "caught", "fielders": [{"name": "F"}]}]},
            {"batter": "C", "bowler": "B", "non_striker": "",
             "runs": {"batter": 0, "extras": 0, "total": 0},
             "wickets": [{"player_out": "C", "kind": "run out", "fielders": [{"name": "F"}]}]}
        "#;
        let record = simple_match(deliveries);
        let mut index = StatsIndex::new();
        index.ingest_match(&record);

        let fielder = index.get("F", "2013").unwrap();
        assert_eq!(fielder.catches, 1);
        assert_eq!(fielder.stumpings, 0);
    }

    #[test]
    fn run_out_is_not_credited_to_the_bowler() {
        let deliveries = r#"
            {"batter": "A", "bowler": "B", "non_striker": "C",
             "runs": {"batter": 1, "extras": 0, "total": 1},
             "wickets": [{"player_out": "C", "kind": "run out", "fielders": [{"name": "F"}]}]}
        "#;
        let record = simple_match(deliveries);
        let mut index = StatsIndex::new();
        index.ingest_match(&record);

        assert_eq!(index.get("B", "2013").unwrap().wickets, 0);
    }

    #[test]
    fn match_figures_track_hauls_and_season_best() {
        // B takes three wickets for 3 runs in one match.
        let deliveries = (0..3)
            .map(|i| {
                format!(
                    r#"{{"batter": "A", "bowler": "B", "non_striker": "C",
                         "runs": {{"batter": 1, "extras": 0, "total": 1}},
                         "wickets": [{{"player_out": "P{i}", "kind": "bowled"}}]}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        let record = simple_match(&deliveries);
        let mut index = StatsIndex::new();
        index.ingest_match(&record);

        let acc = index.get("B", "2013").unwrap();
        assert_eq!(acc.wickets, 3);
        assert_eq!(acc.three_wicket_hauls, 1);
        assert_eq!(acc.four_wicket_hauls, 0);
        assert_eq!(acc.best_bowling, Some(BowlingFigures { wickets: 3, runs: 3 }));
    }

    #[test]
    fn bowling_figures_order_most_wickets_then_fewest_runs() {
        let a: BowlingFigures = "3/20".parse().unwrap();
        let b: BowlingFigures = "3/15".parse().unwrap();
        let c: BowlingFigures = "4/40".parse().unwrap();
        assert!(b > a);
        assert!(c > b);
        assert_eq!(c.to_string(), "4/40");
        assert!("not-figures".parse::<BowlingFigures>().is_err());
    }
}

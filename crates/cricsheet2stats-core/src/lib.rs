// cricsheet2stats-core - Platform-agnostic aggregation logic
//
// This crate contains the PURE processing logic for folding ball-by-ball
// match records into per-player season and career statistics tables.
// No I/O, no async, no runtime dependencies: the same corpus always
// produces the same tables.

pub mod accumulate;
pub mod career;
pub mod delivery;
pub mod emit;
pub mod model;
pub mod season;

pub use accumulate::{BowlingFigures, SeasonAccumulator, StatsIndex};
pub use career::{career_batting, career_bowling, CareerBattingRow, CareerBowlingRow, Stat};
pub use emit::{BattingRow, BowlingRow, SeasonTables};
pub use model::{Delivery, MatchInfo, MatchRecord, Wicket};

/// Round half-away-from-zero to two decimal places, matching how the
/// emitted rate fields are persisted.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold a full match corpus into the two season-level tables.
///
/// Single-threaded, batch, one-shot: the whole corpus is aggregated before
/// any row is emitted.
pub fn aggregate_matches(matches: &[MatchRecord]) -> SeasonTables {
    let index = StatsIndex::from_matches(matches);
    SeasonTables::from_index(&index)
}

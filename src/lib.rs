// cricsheet2stats - batch aggregation pipeline
//
// One-shot: load the full match corpus, fold it into per-(player, season)
// accumulators, emit the season tables, sum them into career tables, write
// all four as CSV. No partial output: any unreadable match file aborts the
// run before anything is written.

use std::path::Path;

use anyhow::{Context, Result};
use cricsheet2stats_config::RuntimeConfig;
use cricsheet2stats_core::{aggregate_matches, career_batting, career_bowling};
use cricsheet2stats_storage::{load_matches, StatTables, TableStore};
use tracing::info;

/// Row counts from one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub matches: usize,
    pub season_batting_rows: usize,
    pub season_bowling_rows: usize,
    pub career_batting_rows: usize,
    pub career_bowling_rows: usize,
}

/// Run the full pipeline: matches directory in, four CSV tables out.
pub fn run(config: &RuntimeConfig) -> Result<RunSummary> {
    let matches = load_matches(Path::new(&config.data.matches_dir))
        .context("Failed to load match corpus")?;
    info!(
        "loaded {} match records from {}",
        matches.len(),
        config.data.matches_dir
    );

    let season = aggregate_matches(&matches);
    info!(
        "aggregated {} season batting rows, {} season bowling rows",
        season.batting.len(),
        season.bowling.len()
    );

    let career_bat = career_batting(&season.batting);
    let career_bowl = career_bowling(&season.bowling);
    info!(
        "aggregated {} career batting rows, {} career bowling rows",
        career_bat.len(),
        career_bowl.len()
    );

    let summary = RunSummary {
        matches: matches.len(),
        season_batting_rows: season.batting.len(),
        season_bowling_rows: season.bowling.len(),
        career_batting_rows: career_bat.len(),
        career_bowling_rows: career_bowl.len(),
    };

    let tables = StatTables {
        season_batting: season.batting,
        season_bowling: season.bowling,
        career_batting: career_bat,
        career_bowling: career_bowl,
    };
    TableStore::new(config.data.tables_dir.clone())
        .write_all(&tables)
        .context("Failed to write stats tables")?;

    Ok(summary)
}

// Stats table persistence
//
// The four tables are flat CSV files under one directory: season batting,
// season bowling, career batting, career bowling. Written once per
// aggregation run, then read-only for the query service's lifetime.

use std::path::{Path, PathBuf};

use cricsheet2stats_core::{BattingRow, BowlingRow, CareerBattingRow, CareerBowlingRow};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, StorageError};

pub const SEASON_BATTING_FILE: &str = "batting_stats.csv";
pub const SEASON_BOWLING_FILE: &str = "bowling_stats.csv";
pub const CAREER_BATTING_FILE: &str = "career_batting_stats.csv";
pub const CAREER_BOWLING_FILE: &str = "career_bowling_stats.csv";

/// All four tables, loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct StatTables {
    pub season_batting: Vec<BattingRow>,
    pub season_bowling: Vec<BowlingRow>,
    pub career_batting: Vec<CareerBattingRow>,
    pub career_bowling: Vec<CareerBowlingRow>,
}

/// Reads and writes the stats tables under one directory.
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write all four tables, creating the directory if needed.
    pub fn write_all(&self, tables: &StatTables) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        self.write_rows(SEASON_BATTING_FILE, &tables.season_batting)?;
        self.write_rows(SEASON_BOWLING_FILE, &tables.season_bowling)?;
        self.write_rows(CAREER_BATTING_FILE, &tables.career_batting)?;
        self.write_rows(CAREER_BOWLING_FILE, &tables.career_bowling)?;
        info!(
            "wrote {} season batting, {} season bowling, {} career batting, {} career bowling rows to {}",
            tables.season_batting.len(),
            tables.season_bowling.len(),
            tables.career_batting.len(),
            tables.career_bowling.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load all four tables.
    pub fn load_all(&self) -> Result<StatTables> {
        Ok(StatTables {
            season_batting: self.read_rows(SEASON_BATTING_FILE)?,
            season_bowling: self.read_rows(SEASON_BOWLING_FILE)?,
            career_batting: self.read_rows(CAREER_BATTING_FILE)?,
            career_bowling: self.read_rows(CAREER_BOWLING_FILE)?,
        })
    }

    fn write_rows<T: Serialize>(&self, file: &str, rows: &[T]) -> Result<()> {
        let path = self.dir.join(file);
        let mut writer = csv::Writer::from_path(&path).map_err(|source| {
            csv_error(path.clone(), source)
        })?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|source| csv_error(path.clone(), source))?;
        }
        writer
            .flush()
            .map_err(|source| StorageError::Io { path, source })?;
        Ok(())
    }

    fn read_rows<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Err(StorageError::TableUnavailable { path });
        }
        let mut reader =
            csv::Reader::from_path(&path).map_err(|source| csv_error(path.clone(), source))?;
        reader
            .deserialize()
            .map(|row| row.map_err(|source| csv_error(path.clone(), source)))
            .collect()
    }
}

fn csv_error(path: PathBuf, source: csv::Error) -> StorageError {
    if source.is_io_error() {
        match source.into_kind() {
            csv::ErrorKind::Io(io) => StorageError::Io { path, source: io },
            // is_io_error() guarantees the Io kind
            _ => unreachable!(),
        }
    } else {
        StorageError::Malformed { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricsheet2stats_core::Stat;

    fn sample_tables() -> StatTables {
        StatTables {
            season_batting: vec![BattingRow {
                player: "A".to_string(),
                team: "Alpha".to_string(),
                season: "2013".to_string(),
                matches: 1,
                innings: 1,
                not_outs: 1,
                runs: 4,
                high_score: "4*".to_string(),
                balls: 1,
                strike_rate: 400.0,
                fifties: 0,
                hundreds: 0,
                fours: 1,
                sixes: 0,
                catches: 0,
                stumpings: 0,
            }],
            season_bowling: vec![BowlingRow {
                player: "B".to_string(),
                team: "Beta".to_string(),
                season: "2013".to_string(),
                matches: 1,
                innings: 1,
                balls_bowled: 1,
                runs_conceded: 4,
                wickets: 0,
                three_wicket_hauls: 0,
                four_wicket_hauls: 0,
                five_wicket_hauls: 0,
                best_bowling: "0/4".to_string(),
            }],
            career_batting: vec![CareerBattingRow {
                player: "A".to_string(),
                team: "Alpha".to_string(),
                matches: 1,
                innings: 0,
                not_outs: Stat::Dash,
                runs: 0,
                balls: 0,
                batting_average: Stat::Dash,
                strike_rate: Stat::Dash,
                high_score: "-".to_string(),
                fifties: 0,
                hundreds: 0,
                fours: 0,
                sixes: 0,
                catches: 0,
                stumpings: 0,
            }],
            career_bowling: vec![CareerBowlingRow {
                player: "B".to_string(),
                team: "Beta".to_string(),
                matches: 1,
                innings: 1,
                balls_bowled: 1,
                runs_conceded: 4,
                wickets: 0,
                bowling_average: Stat::Value(0.0),
                economy_rate: 24.0,
                strike_rate: Stat::Value(0.0),
                three_wicket_hauls: 0,
                four_wicket_hauls: 0,
                five_wicket_hauls: 0,
                best_bowling: "0/4".to_string(),
            }],
        }
    }

    #[test]
    fn tables_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path());

        let tables = sample_tables();
        store.write_all(&tables).unwrap();
        let loaded = store.load_all().unwrap();

        assert_eq!(loaded.season_batting, tables.season_batting);
        assert_eq!(loaded.season_bowling, tables.season_bowling);
        assert_eq!(loaded.career_batting, tables.career_batting);
        assert_eq!(loaded.career_bowling, tables.career_bowling);
    }

    #[test]
    fn missing_table_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path());

        match store.load_all() {
            Err(StorageError::TableUnavailable { path }) => {
                assert!(path.ends_with(SEASON_BATTING_FILE));
            }
            other => panic!("expected TableUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn csv_headers_use_display_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path());
        store.write_all(&sample_tables()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(SEASON_BATTING_FILE)).unwrap();
        let header = raw.lines().next().unwrap();
        assert!(header.contains("50s"));
        assert!(header.contains("100s"));
        assert!(header.contains("high_score"));
    }
}

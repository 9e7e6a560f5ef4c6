//! Match-corpus loading and stats-table persistence.

pub mod error;
pub mod matches;
pub mod tables;

pub use error::StorageError;
pub use matches::load_matches;
pub use tables::{
    StatTables, TableStore, CAREER_BATTING_FILE, CAREER_BOWLING_FILE, SEASON_BATTING_FILE,
    SEASON_BOWLING_FILE,
};

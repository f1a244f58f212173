use std::path::PathBuf;
use thiserror::Error;

use crate::draft::{ChampionId, Role, Side};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Champion not found: {0}")]
    UnknownChampion(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Malformed source tables. Always fatal at load time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataIntegrityError {
    #[error("{table}: missing required columns: {}", columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<String>,
    },

    #[error("{table}: malformed row at line {line}: {message}")]
    MalformedRow {
        table: &'static str,
        line: usize,
        message: String,
    },

    #[error("{table}: table is empty")]
    EmptyTable { table: &'static str },

    #[error("{table}: duplicate row for champion {champion_id} ({role})")]
    DuplicateChampionRole {
        table: &'static str,
        champion_id: ChampionId,
        role: Role,
    },

    #[error("champion {champion_id} is listed as both '{first}' and '{second}'")]
    ConflictingName {
        champion_id: ChampionId,
        first: String,
        second: String,
    },

    #[error("champion name '{name}' is shared by ids {first} and {second}")]
    DuplicateName {
        name: String,
        first: ChampionId,
        second: ChampionId,
    },

    #[error("{table}: {column} = {value} is outside [0, 1] at line {line}")]
    RateOutOfRange {
        table: &'static str,
        column: &'static str,
        value: f64,
        line: usize,
    },
}

/// Rejection reasons for illegal bans and picks. The draft is left untouched
/// whenever one of these is produced.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("the draft is complete, no side is on the clock")]
    NoActiveTurn,

    #[error("it is not {requested}'s turn (expected {})", turn_label(.expected))]
    WrongTurn {
        requested: Side,
        expected: Option<Side>,
    },

    #[error("the ban phase is already over")]
    BanPhaseOver,

    #[error("picks are not allowed until all bans are in")]
    BansIncomplete,

    #[error("the pick phase is already over")]
    PickPhaseOver,

    #[error("champion {0} is already banned or picked")]
    ChampionUnavailable(ChampionId),

    #[error("{side} has already filled {role}")]
    RoleFilled { side: Side, role: Role },
}

fn turn_label(side: &Option<Side>) -> String {
    side.map(|s| s.to_string())
        .unwrap_or_else(|| "nobody".to_string())
}

/// Failure inside the win-probability model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("model expects {expected} features, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("model produced a non-finite value")]
    NonFinite,

    #[error("model unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

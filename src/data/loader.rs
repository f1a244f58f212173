use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use super::models::{ChampionStatRecord, PairRecord};
use crate::error::{AppError, DataIntegrityError};

pub const CHAMPION_STATS_FILE: &str = "champion_stats_by_role_API.csv";
pub const SYNERGY_DATA_FILE: &str = "champion_synergy_data.csv";
pub const MATCHUP_DATA_FILE: &str = "champion_matchup_data.csv";

pub const CHAMPION_STATS_TABLE: &str = "champion stats";
pub const SYNERGY_TABLE: &str = "synergy";
pub const MATCHUP_TABLE: &str = "matchup";

pub const CHAMPION_COLUMNS: &[&str] = &[
    "Champion_ID",
    "Champion_Name",
    "Role",
    "Pick_Rate",
    "Ban_Rate",
    "Win_Rate",
    "Pick_Count",
];

pub const PAIR_COLUMNS: &[&str] = &[
    "Champion_ID_A",
    "Role_A",
    "Champion_ID_B",
    "Role_B",
    "Pick_Count",
    "Win_Count",
    "Win_Rate",
];

/// Raw rows of the three source tables, not yet validated beyond shape.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub champion_stats: Vec<ChampionStatRecord>,
    pub synergy: Vec<PairRecord>,
    pub matchups: Vec<PairRecord>,
}

/// Parses one CSV table. Headers and fields are trimmed; all `required`
/// columns must be present before any row is read.
pub fn read_table<T, R>(
    reader: R,
    table: &'static str,
    required: &[&str],
) -> Result<Vec<T>, DataIntegrityError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DataIntegrityError::MalformedRow {
            table,
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DataIntegrityError::MissingColumns {
            table,
            columns: missing,
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<T>().enumerate() {
        let row = result.map_err(|e| DataIntegrityError::MalformedRow {
            table,
            line: e
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2),
            message: e.to_string(),
        })?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DataIntegrityError::EmptyTable { table });
    }

    Ok(rows)
}

pub fn read_table_file<T: DeserializeOwned>(
    path: &Path,
    table: &'static str,
    required: &[&str],
) -> Result<Vec<T>, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(path, e))?;
    Ok(read_table(file, table, required)?)
}

pub fn load_dataset(dir: &Path) -> Result<DataSet, AppError> {
    let champion_stats: Vec<ChampionStatRecord> = read_table_file(
        &dir.join(CHAMPION_STATS_FILE),
        CHAMPION_STATS_TABLE,
        CHAMPION_COLUMNS,
    )?;
    let synergy: Vec<PairRecord> =
        read_table_file(&dir.join(SYNERGY_DATA_FILE), SYNERGY_TABLE, PAIR_COLUMNS)?;
    let matchups: Vec<PairRecord> =
        read_table_file(&dir.join(MATCHUP_DATA_FILE), MATCHUP_TABLE, PAIR_COLUMNS)?;

    info!(
        champion_rows = champion_stats.len(),
        synergy_rows = synergy.len(),
        matchup_rows = matchups.len(),
        dir = %dir.display(),
        "loaded source tables"
    );

    Ok(DataSet {
        champion_stats,
        synergy,
        matchups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Role;

    #[test]
    fn test_reads_trimmed_champion_rows() {
        let csv = " Champion_ID , Champion_Name,Role,Pick_Rate,Ban_Rate,Win_Rate,Pick_Count\n\
                   222, Jinx ,BOTTOM,0.14,0.04,0.51,8000\n";
        let rows: Vec<ChampionStatRecord> =
            read_table(csv.as_bytes(), CHAMPION_STATS_TABLE, CHAMPION_COLUMNS).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].champion_name, "Jinx");
        assert_eq!(rows[0].role, Role::Bottom);
        assert_eq!(rows[0].ban_count, 0);
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let csv = "Champion_ID,Champion_Name,Role,Pick_Rate\n1,Annie,MIDDLE,0.02\n";
        let err = read_table::<ChampionStatRecord, _>(
            csv.as_bytes(),
            CHAMPION_STATS_TABLE,
            CHAMPION_COLUMNS,
        )
        .unwrap_err();
        match err {
            DataIntegrityError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["Ban_Rate", "Win_Rate", "Pick_Count"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_role_is_malformed_row() {
        let csv = "Champion_ID_A,Role_A,Champion_ID_B,Role_B,Pick_Count,Win_Count,Win_Rate\n\
                   1,MIDDLE,2,ROAMER,30,15,0.5\n";
        let err = read_table::<PairRecord, _>(csv.as_bytes(), SYNERGY_TABLE, PAIR_COLUMNS)
            .unwrap_err();
        assert!(matches!(err, DataIntegrityError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let csv = "Champion_ID_A,Role_A,Champion_ID_B,Role_B,Pick_Count,Win_Count,Win_Rate\n";
        let err = read_table::<PairRecord, _>(csv.as_bytes(), MATCHUP_TABLE, PAIR_COLUMNS)
            .unwrap_err();
        assert_eq!(err, DataIntegrityError::EmptyTable { table: MATCHUP_TABLE });
    }
}

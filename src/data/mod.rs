//! Source tables and the read-only statistics built from them.

pub mod loader;
pub mod models;

use std::path::Path;
use tracing::info;

use crate::analysis::{ChampionDirectory, MatchupTable, MetaAnalyzer, SynergyTable};
use crate::config::ScoringConfig;
use crate::error::AppError;
pub use loader::{load_dataset, DataSet};

/// Everything the calculators, encoder and scorer read. Built once at
/// startup and shared immutably afterwards.
#[derive(Debug, Clone)]
pub struct DraftData {
    pub directory: ChampionDirectory,
    pub meta: MetaAnalyzer,
    pub synergy: SynergyTable,
    pub matchup: MatchupTable,
    pub scoring: ScoringConfig,
}

impl DraftData {
    pub fn from_dataset(dataset: &DataSet, scoring: ScoringConfig) -> Result<Self, AppError> {
        scoring.validate()?;

        let directory = ChampionDirectory::from_records(&dataset.champion_stats)?;
        let meta = MetaAnalyzer::new(&directory, scoring.min_meta_games);
        let synergy = SynergyTable::from_records(&dataset.synergy, &scoring)?;
        let matchup = MatchupTable::from_records(&dataset.matchups, &scoring)?;

        info!(
            champions = directory.len(),
            synergy_pairs = synergy.len(),
            matchup_entries = matchup.len(),
            "statistics ready"
        );

        Ok(DraftData {
            directory,
            meta,
            synergy,
            matchup,
            scoring,
        })
    }

    pub fn load(dir: &Path, scoring: ScoringConfig) -> Result<Self, AppError> {
        let dataset = load_dataset(dir)?;
        DraftData::from_dataset(&dataset, scoring)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::ChampionDirectory;
use crate::controller::GameMode;
use crate::draft::{ActionKind, ChampionId, DraftState, Phase, Pick, Role, Side};
use crate::error::AppError;
use crate::features::FEATURE_SCHEMA_ID;

/// One entry of the chronological action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub turn: usize,
    pub action: ActionKind,
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub role: Option<Role>,
    pub side: Side,
    pub is_ai: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerPrediction {
    pub blue: f64,
    pub red: f64,
    pub winner: Side,
    pub model: String,
    /// The model failed and the neutral split was used.
    pub fallback: bool,
}

impl WinnerPrediction {
    pub fn from_blue(blue: f64, model: &str, fallback: bool) -> Self {
        WinnerPrediction {
            blue,
            red: 1.0 - blue,
            winner: if blue >= 0.5 { Side::Blue } else { Side::Red },
            model: model.to_string(),
            fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanEntry {
    pub champion_id: ChampionId,
    pub champion_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub bans: Vec<BanEntry>,
    pub picks: Vec<Pick>,
    pub vacant_roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub phase: Phase,
    pub current_side: Option<Side>,
    pub blue: TeamSnapshot,
    pub red: TeamSnapshot,
    pub is_complete: bool,
}

impl DraftSnapshot {
    pub fn capture(state: &DraftState, directory: &ChampionDirectory) -> Self {
        let team = |side: Side| {
            let t = state.team(side);
            TeamSnapshot {
                bans: t
                    .bans()
                    .iter()
                    .map(|&id| BanEntry {
                        champion_id: id,
                        champion_name: directory.label(id),
                    })
                    .collect(),
                picks: t.picks().to_vec(),
                vacant_roles: t.vacant_roles(),
            }
        };

        DraftSnapshot {
            phase: state.phase(),
            current_side: state.current_side(),
            blue: team(Side::Blue),
            red: team(Side::Red),
            is_complete: state.is_complete(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub mode: GameMode,
    pub user_side: Side,
    pub model: String,
    pub feature_schema: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: i64,
}

impl ExportMetadata {
    pub fn new(mode: GameMode, user_side: Side, model: &str, started_at: DateTime<Utc>) -> Self {
        let finished_at = Utc::now();
        ExportMetadata {
            mode,
            user_side,
            model: model.to_string(),
            feature_schema: FEATURE_SCHEMA_ID,
            started_at,
            finished_at,
            duration_secs: finished_at.signed_duration_since(started_at).num_seconds(),
        }
    }
}

/// A finished (or abandoned) draft as written to the history directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftExport {
    pub metadata: ExportMetadata,
    pub draft: DraftSnapshot,
    pub actions: Vec<ActionRecord>,
    pub prediction: Option<WinnerPrediction>,
}

impl DraftExport {
    pub fn file_name(&self) -> String {
        format!(
            "draft_{}.json",
            self.metadata.started_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Writes pretty JSON into `dir` (created if missing) and returns the
    /// file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, AppError> {
        fs::create_dir_all(dir).map_err(|e| AppError::io(dir, e))?;
        let path = dir.join(self.file_name());

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize draft: {}", e)))?;
        fs::write(&path, json).map_err(|e| AppError::io(&path, e))?;

        info!(path = %path.display(), actions = self.actions.len(), "draft exported");
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::JsonError(format!("Failed to parse draft export: {}", e)))
    }
}

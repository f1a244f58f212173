use serde::Deserialize;

use crate::draft::{ChampionId, Role};

// champion_stats_by_role_API.csv
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChampionStatRecord {
    #[serde(rename = "Champion_ID")]
    pub champion_id: ChampionId,
    #[serde(rename = "Champion_Name")]
    pub champion_name: String,
    #[serde(rename = "Role")]
    pub role: Role,
    #[serde(rename = "Pick_Rate")]
    pub pick_rate: f64,
    #[serde(rename = "Ban_Rate")]
    pub ban_rate: f64,
    #[serde(rename = "Win_Rate")]
    pub win_rate: f64,
    #[serde(rename = "Pick_Count")]
    pub pick_count: u64,
    #[serde(rename = "Ban_Count", default)]
    pub ban_count: u64,
}

// champion_synergy_data.csv / champion_matchup_data.csv
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PairRecord {
    #[serde(rename = "Champion_ID_A")]
    pub champion_a: ChampionId,
    #[serde(rename = "Role_A")]
    pub role_a: Role,
    #[serde(rename = "Champion_ID_B")]
    pub champion_b: ChampionId,
    #[serde(rename = "Role_B")]
    pub role_b: Role,
    #[serde(rename = "Pick_Count")]
    pub pick_count: u64,
    #[serde(rename = "Win_Count")]
    pub win_count: u64,
    #[serde(rename = "Win_Rate")]
    pub win_rate: f64,
}

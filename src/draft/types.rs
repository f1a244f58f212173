use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseLabelError;

pub type ChampionId = u32;

/// One of the two teams in a draft. Blue always acts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Blue, Side::Red];

    pub fn opponent(self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Blue => "blue",
            Side::Red => "red",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" | "b" => Ok(Side::Blue),
            "red" | "r" => Ok(Side::Red),
            _ => Err(ParseLabelError {
                kind: "side",
                value: s.to_string(),
            }),
        }
    }
}

/// Lane assignment. Every team fills each role exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Top,
        Role::Jungle,
        Role::Middle,
        Role::Bottom,
        Role::Utility,
    ];

    /// Position in [`Role::ALL`], also used as the encoded role index.
    pub fn index(self) -> usize {
        match self {
            Role::Top => 0,
            Role::Jungle => 1,
            Role::Middle => 2,
            Role::Bottom => 3,
            Role::Utility => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Middle => "MIDDLE",
            Role::Bottom => "BOTTOM",
            Role::Utility => "UTILITY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Ok(Role::Top),
            "JUNGLE" | "JG" | "JUNG" => Ok(Role::Jungle),
            "MIDDLE" | "MID" => Ok(Role::Middle),
            "BOTTOM" | "BOT" | "ADC" => Ok(Role::Bottom),
            "UTILITY" | "SUPPORT" | "SUP" => Ok(Role::Utility),
            _ => Err(ParseLabelError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pick {
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub role: Role,
}

impl Pick {
    pub fn new(champion_id: ChampionId, champion_name: impl Into<String>, role: Role) -> Self {
        Pick {
            champion_id,
            champion_name: champion_name.into(),
            role,
        }
    }

    pub fn slot(&self) -> RolePick {
        RolePick {
            champion_id: self.champion_id,
            role: self.role,
        }
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.champion_name, self.role)
    }
}

/// The (champion, role) pair that every statistics lookup is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RolePick {
    pub champion_id: ChampionId,
    pub role: Role,
}

impl RolePick {
    pub fn new(champion_id: ChampionId, role: Role) -> Self {
        RolePick { champion_id, role }
    }
}

/// A pick that has not been applied: the encoder and scorer treat it as if
/// it were appended to the given side's picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HypotheticalPick {
    pub side: Side,
    pub champion_id: ChampionId,
    pub role: Role,
}

impl HypotheticalPick {
    pub fn new(side: Side, champion_id: ChampionId, role: Role) -> Self {
        HypotheticalPick {
            side,
            champion_id,
            role,
        }
    }

    pub fn slot(&self) -> RolePick {
        RolePick::new(self.champion_id, self.role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[serde(rename = "ban_round_1")]
    BanRound1,
    #[serde(rename = "ban_round_2")]
    BanRound2,
    Pick,
    Complete,
}

impl Phase {
    pub fn is_ban(self) -> bool {
        matches!(self, Phase::BanRound1 | Phase::BanRound2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::BanRound1 => "ban_round_1",
            Phase::BanRound2 => "ban_round_2",
            Phase::Pick => "pick",
            Phase::Complete => "complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Ban,
    Pick,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Ban => f.write_str("ban"),
            ActionKind::Pick => f.write_str("pick"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_accepts_aliases() {
        assert_eq!("mid".parse::<Role>().unwrap(), Role::Middle);
        assert_eq!(" Support ".parse::<Role>().unwrap(), Role::Utility);
        assert_eq!("ADC".parse::<Role>().unwrap(), Role::Bottom);
        assert!("feeder".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_index_matches_canonical_order() {
        for (idx, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), idx);
        }
    }

    #[test]
    fn test_phase_json_matches_display() {
        for phase in [Phase::BanRound1, Phase::BanRound2, Phase::Pick, Phase::Complete] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase));
            assert_eq!(serde_json::from_str::<Phase>(&json).unwrap(), phase);
        }
    }

    #[test]
    fn test_role_pick_serializes_fields() {
        let json = serde_json::to_string(&RolePick::new(222, Role::Bottom)).unwrap();
        assert!(json.contains("\"champion_id\":222"));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Blue.opponent(), Side::Red);
        assert_eq!(Side::Red.opponent(), Side::Blue);
        assert_eq!("RED".parse::<Side>().unwrap(), Side::Red);
    }
}

//! Feature schema for the draft win-probability model.
//!
//! Four segments are concatenated in a fixed order. Every slot has a name and
//! a fixed index; the encoder writes slots in exactly the order the names are
//! declared here.
//!
//! ### Draft segment (49, offset 0)
//! - per-role champion id, blue then red (0 = unfilled): 10
//! - ban ids per slot, blue then red, padded with 0: 10
//! - per-role role index, blue then red (-1 = unfilled): 10
//! - phase one-hot (ban 1, ban 2, pick, 5 reserved, complete): 9
//! - pick and ban counts: 4
//! - turn indicator (1 = red on the clock): 1
//! - phase flags: 4
//! - total picks: 1
//!
//! ### Meta segment (15, offset 49)
//! - per side: avg/max of pick, ban and win rate, total presence: 14
//! - mean ban rate of banned champions: 1
//!
//! ### Synergy segment (40, offset 64)
//! - all-pairs synergy per side in pick order, padded with 0.5: 20
//! - per-role synergy with teammates per side: 10
//! - mean/min/max/variance per side: 8
//! - blue mean minus red mean, variance balance: 2
//!
//! ### Matchup segment (25, offset 104)
//! - per-role head-to-head advantage for blue (0 = unknown): 5
//! - favorable/unfavorable/neutral counts per side: 6
//! - mean/min/max/std of advantage: 4
//! - blue class fractions: 3
//! - expected win rate, roles ahead per side, best/worst role, consistency,
//!   pair count: 7
//!
//! Total: F = 129.

use std::sync::OnceLock;

use crate::draft::{Role, Side};

/// Increment this whenever the feature layout changes.
pub const FEATURE_SCHEMA_ID: u32 = 1;

pub const DRAFT_WIDTH: usize = 49;
pub const META_WIDTH: usize = 15;
pub const SYNERGY_WIDTH: usize = 40;
pub const MATCHUP_WIDTH: usize = 25;

pub const DRAFT_OFFSET: usize = 0;
pub const META_OFFSET: usize = DRAFT_OFFSET + DRAFT_WIDTH;
pub const SYNERGY_OFFSET: usize = META_OFFSET + META_WIDTH;
pub const MATCHUP_OFFSET: usize = SYNERGY_OFFSET + SYNERGY_WIDTH;

/// Feature vector length.
pub const F: usize = MATCHUP_OFFSET + MATCHUP_WIDTH;

/// Pairs among five teammates.
pub const MAX_TEAM_PAIRS: usize = 10;

pub const NEUTRAL_RATE: f32 = 0.5;
pub const EMPTY_ID: f32 = 0.0;
pub const EMPTY_ROLE: f32 = -1.0;

/// Indices of slots that other components read by name.
pub mod slot {
    use super::{DRAFT_OFFSET, MATCHUP_OFFSET, META_OFFSET, SYNERGY_OFFSET};

    pub const PHASE_ONE_HOT: usize = DRAFT_OFFSET + 30;
    pub const TURN_IS_RED: usize = DRAFT_OFFSET + 43;
    pub const TOTAL_PICKS: usize = DRAFT_OFFSET + 48;

    pub const BLUE_AVG_WIN: usize = META_OFFSET + 2;
    pub const RED_AVG_WIN: usize = META_OFFSET + 9;
    pub const BANNED_AVG_BAN: usize = META_OFFSET + 14;

    pub const SYNERGY_DIFF: usize = SYNERGY_OFFSET + 38;
    pub const SYNERGY_BALANCE: usize = SYNERGY_OFFSET + 39;

    pub const MATCHUP_MEAN: usize = MATCHUP_OFFSET + 11;
    pub const MATCHUP_PAIRS: usize = MATCHUP_OFFSET + 24;
}

/// Position of a phase in the nine-slot one-hot block.
pub fn phase_slot(phase: crate::draft::Phase) -> usize {
    use crate::draft::Phase;
    match phase {
        Phase::BanRound1 => 0,
        Phase::BanRound2 => 1,
        Phase::Pick => 2,
        Phase::Complete => 8,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl Segment {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }
}

#[derive(Debug)]
pub struct FeatureSchema {
    segments: [Segment; 4],
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// The schema, built on first use.
pub fn schema() -> &'static FeatureSchema {
    static SCHEMA: OnceLock<FeatureSchema> = OnceLock::new();
    SCHEMA.get_or_init(build_schema)
}

fn build_schema() -> FeatureSchema {
    let mut names = Vec::with_capacity(F);
    draft_names(&mut names);
    meta_names(&mut names);
    synergy_names(&mut names);
    matchup_names(&mut names);

    FeatureSchema {
        segments: [
            Segment {
                name: "draft",
                offset: DRAFT_OFFSET,
                width: DRAFT_WIDTH,
            },
            Segment {
                name: "meta",
                offset: META_OFFSET,
                width: META_WIDTH,
            },
            Segment {
                name: "synergy",
                offset: SYNERGY_OFFSET,
                width: SYNERGY_WIDTH,
            },
            Segment {
                name: "matchup",
                offset: MATCHUP_OFFSET,
                width: MATCHUP_WIDTH,
            },
        ],
        names,
    }
}

fn role_key(role: Role) -> String {
    role.as_str().to_lowercase()
}

fn draft_names(names: &mut Vec<String>) {
    for side in Side::ALL {
        for role in Role::ALL {
            names.push(format!("{side}_pick_{}", role_key(role)));
        }
    }
    for side in Side::ALL {
        for i in 0..5 {
            names.push(format!("{side}_ban_{i}"));
        }
    }
    for side in Side::ALL {
        for role in Role::ALL {
            names.push(format!("{side}_role_index_{}", role_key(role)));
        }
    }
    for i in 0..9 {
        let name = match i {
            0 => "phase_ban_round_1".to_string(),
            1 => "phase_ban_round_2".to_string(),
            2 => "phase_pick".to_string(),
            8 => "phase_complete".to_string(),
            n => format!("phase_reserved_{n}"),
        };
        names.push(name);
    }
    for name in [
        "blue_pick_count",
        "red_pick_count",
        "blue_ban_count",
        "red_ban_count",
        "turn_is_red",
        "is_ban_round_1",
        "is_ban_round_2",
        "is_pick",
        "is_complete",
        "total_picks",
    ] {
        names.push(name.to_string());
    }
}

fn meta_names(names: &mut Vec<String>) {
    for side in Side::ALL {
        for stat in [
            "avg_pick_rate",
            "avg_ban_rate",
            "avg_win_rate",
            "max_pick_rate",
            "max_ban_rate",
            "max_win_rate",
            "total_presence",
        ] {
            names.push(format!("{side}_{stat}"));
        }
    }
    names.push("banned_avg_ban_rate".to_string());
}

fn synergy_names(names: &mut Vec<String>) {
    for side in Side::ALL {
        for i in 0..MAX_TEAM_PAIRS {
            names.push(format!("{side}_synergy_pair_{i}"));
        }
    }
    for side in Side::ALL {
        for role in Role::ALL {
            names.push(format!("{side}_role_synergy_{}", role_key(role)));
        }
    }
    for side in Side::ALL {
        for stat in ["mean", "min", "max", "variance"] {
            names.push(format!("{side}_synergy_{stat}"));
        }
    }
    names.push("synergy_diff".to_string());
    names.push("synergy_balance".to_string());
}

fn matchup_names(names: &mut Vec<String>) {
    for role in Role::ALL {
        names.push(format!("matchup_advantage_{}", role_key(role)));
    }
    for side in Side::ALL {
        for class in ["favorable", "unfavorable", "neutral"] {
            names.push(format!("{side}_{class}_matchups"));
        }
    }
    for stat in ["mean", "min", "max", "std"] {
        names.push(format!("matchup_{stat}"));
    }
    for class in ["favorable", "unfavorable", "neutral"] {
        names.push(format!("blue_{class}_fraction"));
    }
    for name in [
        "matchup_expected_win_rate",
        "blue_roles_ahead",
        "red_roles_ahead",
        "best_role_advantage",
        "worst_role_advantage",
        "matchup_consistency",
        "matchup_pairs",
    ] {
        names.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_width_and_segments() {
        let s = schema();
        assert_eq!(F, 129);
        assert_eq!(s.width(), F);
        let mut next = 0;
        for seg in s.segments() {
            assert_eq!(seg.offset, next);
            next += seg.width;
        }
        assert_eq!(next, F);
    }

    #[test]
    fn test_names_are_unique() {
        let names = schema().names();
        let mut sorted: Vec<&String> = names.iter().collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }

    #[test]
    fn test_named_slots_line_up() {
        let s = schema();
        assert_eq!(s.index_of("phase_ban_round_1"), Some(slot::PHASE_ONE_HOT));
        assert_eq!(s.index_of("turn_is_red"), Some(slot::TURN_IS_RED));
        assert_eq!(s.index_of("total_picks"), Some(slot::TOTAL_PICKS));
        assert_eq!(s.index_of("blue_avg_win_rate"), Some(slot::BLUE_AVG_WIN));
        assert_eq!(s.index_of("red_avg_win_rate"), Some(slot::RED_AVG_WIN));
        assert_eq!(s.index_of("banned_avg_ban_rate"), Some(slot::BANNED_AVG_BAN));
        assert_eq!(s.index_of("synergy_diff"), Some(slot::SYNERGY_DIFF));
        assert_eq!(s.index_of("synergy_balance"), Some(slot::SYNERGY_BALANCE));
        assert_eq!(s.index_of("matchup_mean"), Some(slot::MATCHUP_MEAN));
        assert_eq!(s.index_of("matchup_pairs"), Some(slot::MATCHUP_PAIRS));
    }
}

use serde::Serialize;
use std::collections::HashMap;

use super::champion_stats::ChampionDirectory;
use crate::draft::{ChampionId, Role, RolePick};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetaStats {
    pub pick_rate: f64,
    pub ban_rate: f64,
    pub win_rate: f64,
    pub pick_count: u64,
    /// Set when global averages stood in for a missing row.
    pub fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalStats {
    pub avg_pick_rate: f64,
    pub avg_ban_rate: f64,
    pub avg_win_rate: f64,
    pub max_pick_rate: f64,
    pub max_ban_rate: f64,
    pub max_win_rate: f64,
    pub combinations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamMeta {
    pub avg_pick_rate: f64,
    pub avg_ban_rate: f64,
    pub avg_win_rate: f64,
    pub max_pick_rate: f64,
    pub max_ban_rate: f64,
    pub max_win_rate: f64,
    /// Sum of pick rate and ban rate over the team.
    pub total_presence: f64,
}

impl TeamMeta {
    pub const EMPTY: TeamMeta = TeamMeta {
        avg_pick_rate: 0.0,
        avg_ban_rate: 0.0,
        avg_win_rate: 0.5,
        max_pick_rate: 0.0,
        max_ban_rate: 0.0,
        max_win_rate: 0.5,
        total_presence: 0.0,
    };
}

/// Per-(champion, role) popularity and performance, with global averages
/// standing in for rows that are missing or under-sampled.
#[derive(Debug, Clone)]
pub struct MetaAnalyzer {
    stats: HashMap<RolePick, MetaStats>,
    primary_roles: HashMap<ChampionId, Role>,
    global: GlobalStats,
    min_games: u64,
}

impl MetaAnalyzer {
    pub fn new(directory: &ChampionDirectory, min_games: u64) -> Self {
        let mut stats = HashMap::new();
        let mut primary_roles = HashMap::new();

        for champion in directory.iter() {
            if let Some(role) = champion.primary_role() {
                primary_roles.insert(champion.id, role);
            }
            for rs in &champion.roles {
                stats.insert(
                    RolePick::new(champion.id, rs.role),
                    MetaStats {
                        pick_rate: rs.pick_rate,
                        ban_rate: rs.ban_rate,
                        win_rate: rs.win_rate,
                        pick_count: rs.pick_count,
                        fallback: false,
                    },
                );
            }
        }

        let global = global_stats(stats.values());
        MetaAnalyzer {
            stats,
            primary_roles,
            global,
            min_games,
        }
    }

    pub fn global(&self) -> GlobalStats {
        self.global
    }

    /// The recorded row, if it exists and is backed by enough games.
    pub fn lookup(&self, pick: RolePick) -> Option<MetaStats> {
        self.stats
            .get(&pick)
            .filter(|s| s.pick_count >= self.min_games)
            .copied()
    }

    pub fn champion_meta(&self, pick: RolePick) -> MetaStats {
        self.lookup(pick).unwrap_or(MetaStats {
            pick_rate: self.global.avg_pick_rate,
            ban_rate: self.global.avg_ban_rate,
            win_rate: self.global.avg_win_rate,
            pick_count: 0,
            fallback: true,
        })
    }

    pub fn team_meta(&self, team: &[RolePick]) -> TeamMeta {
        if team.is_empty() {
            return TeamMeta::EMPTY;
        }

        let rows: Vec<MetaStats> = team.iter().map(|&p| self.champion_meta(p)).collect();
        let n = rows.len() as f64;
        let sum = |f: fn(&MetaStats) -> f64| rows.iter().map(f).sum::<f64>();
        let max = |f: fn(&MetaStats) -> f64| rows.iter().map(f).fold(f64::NEG_INFINITY, f64::max);

        TeamMeta {
            avg_pick_rate: sum(|s| s.pick_rate) / n,
            avg_ban_rate: sum(|s| s.ban_rate) / n,
            avg_win_rate: sum(|s| s.win_rate) / n,
            max_pick_rate: max(|s| s.pick_rate),
            max_ban_rate: max(|s| s.ban_rate),
            max_win_rate: max(|s| s.win_rate),
            total_presence: sum(|s| s.pick_rate + s.ban_rate),
        }
    }

    /// Mean ban rate of banned champions, each taken at its most picked role.
    pub fn banned_meta(&self, bans: &[ChampionId]) -> f64 {
        if bans.is_empty() {
            return 0.0;
        }
        let total: f64 = bans
            .iter()
            .map(|id| match self.primary_roles.get(id) {
                Some(&role) => self.champion_meta(RolePick::new(*id, role)).ban_rate,
                None => self.global.avg_ban_rate,
            })
            .sum();
        total / bans.len() as f64
    }
}

fn global_stats<'a>(rows: impl Iterator<Item = &'a MetaStats>) -> GlobalStats {
    let mut g = GlobalStats {
        avg_pick_rate: 0.0,
        avg_ban_rate: 0.0,
        avg_win_rate: 0.0,
        max_pick_rate: 0.0,
        max_ban_rate: 0.0,
        max_win_rate: 0.0,
        combinations: 0,
    };
    for s in rows {
        g.combinations += 1;
        g.avg_pick_rate += s.pick_rate;
        g.avg_ban_rate += s.ban_rate;
        g.avg_win_rate += s.win_rate;
        g.max_pick_rate = g.max_pick_rate.max(s.pick_rate);
        g.max_ban_rate = g.max_ban_rate.max(s.ban_rate);
        g.max_win_rate = g.max_win_rate.max(s.win_rate);
    }

    if g.combinations == 0 {
        g.avg_win_rate = 0.5;
        g.max_win_rate = 0.5;
        return g;
    }
    let n = g.combinations as f64;
    g.avg_pick_rate /= n;
    g.avg_ban_rate /= n;
    g.avg_win_rate /= n;
    g
}
